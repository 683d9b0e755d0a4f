pub mod document;
pub mod node;
pub mod parser;
pub mod slug;

pub use document::{Document, DocumentError, NodeId};
pub use node::{Header, Node, NodeKind, ReferenceLink, Table};
pub use parser::{parse, tokenize};
pub use slug::slug;
