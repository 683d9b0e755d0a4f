use std::ops::Range;

use mdoc::{Document, Node, NodeId};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::notice::Notice;

/// `[text]`, optionally followed by `[label]`.
static BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(?P<text>[^\]\n]+)\](?:\[(?P<label>[^\[\]\n]*)\])?").unwrap());

/// Inline every reference-style link of `doc` and drop the definitions, so
/// that documents can be concatenated without stray definitions in the
/// middle of the result.
///
/// ```text
/// Some [reference] text.          Some [reference](https://example.org) text.
///                            =>
/// [reference]: https://example.org
/// ```
///
/// `[text][label]` becomes `[text](target)`. Brackets that already open an
/// inline link are left alone. A label without a definition is reported and
/// kept as written.
pub fn inline_reference_links(doc: &mut Document, file_id: usize, notices: &mut Vec<Notice>) {
    let definitions: Vec<(NodeId, String, String)> = doc
        .iter()
        .filter_map(|(id, node)| {
            node.as_reference_link()
                .map(|link| (id, link.label().to_string(), link.target().to_string()))
        })
        .collect();

    let paragraphs: Vec<NodeId> = doc
        .iter()
        .filter(|(_, node)| matches!(node, Node::Paragraph(_)))
        .map(|(id, _)| id)
        .collect();

    for id in paragraphs {
        let base = untouched_start(doc, id);
        let Some(Node::Paragraph(text)) = doc.get_mut(id) else {
            continue;
        };
        let resolve = |label: &str| {
            definitions
                .iter()
                .find(|(_, defined, _)| defined == label)
                .map(|(_, _, target)| target.as_str())
        };
        *text = inline_text(text, resolve, |label, range, resolved| {
            let notice = match resolved {
                Some(inlined) => {
                    Notice::note(format!("inline `[{}]` to `{}`", label, inlined), file_id)
                }
                None => {
                    Notice::warning(format!("no reference definition for `[{}]`", label), file_id)
                }
            };
            let notice = match base {
                Some(base) => notice.with_span(base + range.start..base + range.end),
                None => notice,
            };
            notices.push(notice);
        });
    }

    let ids: Vec<NodeId> = definitions.into_iter().map(|(id, _, _)| id).collect();
    doc.remove_nodes(&ids);
}

/// Source offset of a paragraph whose text still matches its parsed span.
fn untouched_start(doc: &Document, id: NodeId) -> Option<usize> {
    let span = doc.span(id)?;
    let node = doc.get(id)?;
    (node.raw().len() == span.len()).then_some(span.start)
}

/// Rewrite the bracket references of `text`. `report` receives the label, the
/// byte range of the occurrence and the replacement, if any.
fn inline_text<'d>(
    text: &str,
    resolve: impl Fn(&str) -> Option<&'d str>,
    mut report: impl FnMut(&str, Range<usize>, Option<&str>),
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in BRACKETS.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let escaped = text[..whole.start()].ends_with('\\');
        let inline_link = text[whole.end()..].starts_with('(');
        if escaped || inline_link {
            continue;
        }

        let (display, label) = split_reference(&caps);
        match resolve(label) {
            Some(target) => {
                let inlined = format!("[{}]({})", display, target);
                report(label, whole.range(), Some(inlined.as_str()));
                out.push_str(&text[last..whole.start()]);
                out.push_str(&inlined);
                last = whole.end();
            }
            None => report(label, whole.range(), None),
        }
    }

    out.push_str(&text[last..]);
    out
}

/// Displayed text and label of a reference: `[text][label]`, `[text][]` (label
/// is the text) or `[label]`.
fn split_reference<'t>(caps: &Captures<'t>) -> (&'t str, &'t str) {
    let text = caps.name("text").map_or("", |m| m.as_str());
    match caps.name("label").map(|m| m.as_str()) {
        Some(label) if !label.is_empty() => (text, label),
        _ => (text, text),
    }
}
