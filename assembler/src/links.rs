use mdoc::{Document, Node};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::anchors::section_prefix;
use crate::notice::Notice;
use crate::sections::{SectionMap, file_name};

/// `](#anchor)`: a link to an anchor of the same file.
static LOCAL_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\]\(#(?P<anchor>[^)\s]+)\)").unwrap());

/// `](/docs/page.md#anchor)`: a link to another page, anchor optional.
static DOCS_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\]\(/docs/(?P<page>[A-Za-z0-9/_.-]+?\.md)(?:#(?P<anchor>[A-Za-z0-9_-]+))?\)")
        .unwrap()
});

static TABLE_ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r##"<a href="#(?P<href>[^"]+)" id="(?P<id>[^"]+)">"##).unwrap());

/// Point the links of paragraphs and tables at the anchors they will have in
/// the merged document.
///
/// Local links get `prefix`; links to other pages are resolved through
/// `sections`. Without a prefix local links stay as written. In tables, an
/// HTML anchor that links to itself (`<a href="#x" id="x">`) is prefixed too.
pub fn rewrite_links(
    doc: &mut Document,
    prefix: Option<&str>,
    sections: &SectionMap,
    file_id: usize,
    notices: &mut Vec<Notice>,
) {
    for node in doc.nodes_mut() {
        let in_table = matches!(node, Node::Table(_));
        let Some(text) = node.text_mut() else {
            continue;
        };
        // Local links first: rewritten page links are local links as well.
        if let Some(prefix) = prefix {
            *text = rewrite_local_links(text, prefix);
            if in_table {
                *text = rewrite_table_anchors(text, prefix);
            }
        }
        *text = rewrite_page_links(text, sections, file_id, notices);
    }
}

pub fn rewrite_local_links(text: &str, prefix: &str) -> String {
    LOCAL_LINK
        .replace_all(text, |caps: &Captures| format!("](#{}-{})", prefix, &caps["anchor"]))
        .into_owned()
}

pub fn rewrite_table_anchors(text: &str, prefix: &str) -> String {
    TABLE_ANCHOR
        .replace_all(text, |caps: &Captures| {
            let (href, id) = (&caps["href"], &caps["id"]);
            if href == id {
                format!(r##"<a href="#{0}-{1}" id="{0}-{1}">"##, prefix, id)
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Rewrite `](/docs/page.md#anchor)` to `](#section-page-anchor)`.
pub fn rewrite_page_links(
    text: &str,
    sections: &SectionMap,
    file_id: usize,
    notices: &mut Vec<Notice>,
) -> String {
    DOCS_LINK
        .replace_all(text, |caps: &Captures| {
            let page = &caps["page"];
            let section = match sections.lookup(page) {
                Some(section) => section,
                None => {
                    notices.push(
                        Notice::warning(format!("page `{}` has no section", page), file_id)
                            .with_note(format!(
                                "linking into the default section `{}`",
                                sections.default_section()
                            )),
                    );
                    sections.default_section()
                }
            };
            let prefix = section_prefix(section, page_stem(page));
            let target = match caps.name("anchor") {
                Some(anchor) => format!("#{}-{}", prefix, anchor.as_str()),
                None => format!("#{}", prefix),
            };
            notices.push(Notice::note(
                format!("rewrite link to `/docs/{}` as `{}`", page, target),
                file_id,
            ));
            format!("]({})", target)
        })
        .into_owned()
}

/// File name of a page without its `.md` extension.
fn page_stem(page: &str) -> &str {
    let name = file_name(page);
    name.strip_suffix(".md").unwrap_or(name)
}
