pub mod cursor;
pub(crate) mod tokenizer;

pub use cursor::Cursor;

use crate::document::Document;
use crate::node::Node;

/// Parse markup text into a navigable [`Document`].
pub fn parse(source: &str) -> Document {
    let mut doc = Document::new();
    for (node, span) in tokenizer::tokenize_spanned(source) {
        doc.push_spanned(node, span);
    }
    doc
}

/// Split markup text into its node sequence.
///
/// Concatenating the raw text of the returned nodes reproduces `source`.
pub fn tokenize(source: &str) -> Vec<Node> {
    tokenizer::tokenize_spanned(source)
        .into_iter()
        .map(|(node, _)| node)
        .collect()
}
