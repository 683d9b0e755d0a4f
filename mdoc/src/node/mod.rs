pub mod header;
pub mod reference;
pub mod table;

use std::fmt;

pub use header::Header;
pub use reference::ReferenceLink;
pub use table::Table;

/// One classified unit of markup text.
///
/// The raw text of every node, concatenated in document order, reproduces
/// the source it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A run of spaces, tabs and newlines.
    Whitespace(String),
    /// A fenced code block, fences included.
    CodeBlock(String),
    Header(Header),
    /// Free text up to a blank line.
    Paragraph(String),
    Table(Table),
    /// A `[label]: target` definition line.
    ReferenceLink(ReferenceLink),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Whitespace,
    CodeBlock,
    Header,
    Paragraph,
    Table,
    ReferenceLink,
}

impl Node {
    pub fn raw(&self) -> &str {
        match self {
            Node::Whitespace(raw) | Node::CodeBlock(raw) | Node::Paragraph(raw) => raw,
            Node::Header(header) => header.raw(),
            Node::Table(table) => table.raw(),
            Node::ReferenceLink(link) => link.raw(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Whitespace(_) => NodeKind::Whitespace,
            Node::CodeBlock(_) => NodeKind::CodeBlock,
            Node::Header(_) => NodeKind::Header,
            Node::Paragraph(_) => NodeKind::Paragraph,
            Node::Table(_) => NodeKind::Table,
            Node::ReferenceLink(_) => NodeKind::ReferenceLink,
        }
    }

    /// Mutable text of paragraphs and tables, the nodes that carry prose and
    /// links. Other nodes have structured or verbatim content.
    pub fn text_mut(&mut self) -> Option<&mut String> {
        match self {
            Node::Paragraph(raw) => Some(raw),
            Node::Table(table) => Some(table.raw_mut()),
            Node::Whitespace(_) | Node::CodeBlock(_) | Node::Header(_) | Node::ReferenceLink(_) => {
                None
            }
        }
    }

    pub fn as_header(&self) -> Option<&Header> {
        match self {
            Node::Header(header) => Some(header),
            _ => None,
        }
    }

    pub fn as_header_mut(&mut self) -> Option<&mut Header> {
        match self {
            Node::Header(header) => Some(header),
            _ => None,
        }
    }

    pub fn as_reference_link(&self) -> Option<&ReferenceLink> {
        match self {
            Node::ReferenceLink(link) => Some(link),
            _ => None,
        }
    }

    pub fn is_reference_link(&self) -> bool {
        matches!(self, Node::ReferenceLink(_))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw())
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Whitespace => "whitespace",
            NodeKind::CodeBlock => "code block",
            NodeKind::Header => "header",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Table => "table",
            NodeKind::ReferenceLink => "reference link",
        };
        write!(f, "{}", name)
    }
}
