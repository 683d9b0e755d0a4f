use std::collections::HashMap;
use std::ops::Range;

use mdoc::slug;
use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Options, Parser as CmarkParser, Tag, TagEnd};
use regex::Regex;

use crate::notice::Notice;

static HTML_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\bid="(?P<id>[^"]+)""#).unwrap());
static HTML_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r##"\bhref="#(?P<fragment>[^"]+)""##).unwrap());

struct OpenHeading {
    id: Option<String>,
    text: String,
    span: Range<usize>,
}

/// Check the internal links of a rendered document.
///
/// Every heading defines an anchor: its `{#id}` attribute, or the slug of its
/// text. HTML `id` attributes define anchors too. Reports anchors defined
/// more than once and `#fragment` links, Markdown or HTML, that point
/// nowhere.
pub fn check_anchors(text: &str, file_id: usize) -> Vec<Notice> {
    let options = Options::ENABLE_HEADING_ATTRIBUTES | Options::ENABLE_TABLES;
    let parser = CmarkParser::new_ext(text, options);

    let mut anchors: Vec<(String, Range<usize>)> = Vec::new();
    let mut fragments: Vec<(String, Range<usize>)> = Vec::new();
    let mut heading: Option<OpenHeading> = None;

    for (event, span) in parser.into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { id, .. }) => {
                heading = Some(OpenHeading {
                    id: id.map(|id| id.to_string()),
                    text: String::new(),
                    span,
                });
            }
            Event::Text(s) | Event::Code(s) => {
                if let Some(open) = heading.as_mut() {
                    open.text.push_str(&s);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(open) = heading.take() {
                    let anchor = open.id.unwrap_or_else(|| slug(&open.text));
                    anchors.push((anchor, open.span));
                }
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                if let Some(fragment) = dest_url.strip_prefix('#') {
                    fragments.push((fragment.to_string(), span));
                }
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                for caps in HTML_ID.captures_iter(&html) {
                    anchors.push((caps["id"].to_string(), span.clone()));
                }
                for caps in HTML_HREF.captures_iter(&html) {
                    fragments.push((caps["fragment"].to_string(), span.clone()));
                }
            }
            _ => {}
        }
    }

    let mut notices = Vec::new();
    let mut defined: HashMap<&str, &Range<usize>> = HashMap::new();

    for (anchor, span) in &anchors {
        match defined.get(anchor.as_str()) {
            Some(first) => notices.push(
                Notice::warning(format!("duplicate anchor `#{}`", anchor), file_id)
                    .with_span(span.clone())
                    .with_note(format!("first defined at byte {}", first.start)),
            ),
            None => {
                defined.insert(anchor, span);
            }
        }
    }

    for (fragment, span) in &fragments {
        if !defined.contains_key(fragment.as_str()) {
            notices.push(
                Notice::warning(format!("link to missing anchor `#{}`", fragment), file_id)
                    .with_span(span.clone()),
            );
        }
    }

    notices
}
