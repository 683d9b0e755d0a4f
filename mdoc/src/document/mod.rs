mod error;
mod toc;

use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

pub use error::DocumentError;

use crate::node::{Header, Node, NodeKind};

static NEXT_DOCUMENT: AtomicUsize = AtomicUsize::new(0);

/// Stable handle to a node owned by a [`Document`].
///
/// Handles survive insertion and removal of other nodes. They are resolved by
/// scanning the document at call time, so a handle whose node was removed (or
/// that belongs to another document) is reported as not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    document: usize,
    index: usize,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node #{} of document #{}", self.index, self.document)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    id: NodeId,
    node: Node,
    /// Byte span in the source the node was parsed from, if any.
    span: Option<Range<usize>>,
}

/// An ordered, mutable sequence of nodes.
///
/// A clone keeps the handles of the original, each resolving to the cloned
/// counterpart of its node.
#[derive(Debug, Clone)]
pub struct Document {
    tag: usize,
    entries: Vec<Entry>,
    next_id: usize,
}

impl Default for Document {
    fn default() -> Self {
        Document {
            tag: NEXT_DOCUMENT.fetch_add(1, Ordering::Relaxed),
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    /// Tokenize `source` into a new document.
    pub fn parse(source: &str) -> Self {
        crate::parser::parse(source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn issue_id(&mut self) -> NodeId {
        let id = NodeId {
            document: self.tag,
            index: self.next_id,
        };
        self.next_id += 1;
        id
    }

    fn entry(&mut self, node: Node, span: Option<Range<usize>>) -> Entry {
        Entry {
            id: self.issue_id(),
            node,
            span,
        }
    }

    fn position(&self, id: NodeId) -> Result<usize, DocumentError> {
        self.entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(DocumentError::NodeNotFound(id))
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.node)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .map(|entry| &mut entry.node)
    }

    /// Source byte span of a parsed node. Nodes built by hand have none.
    pub fn span(&self, id: NodeId) -> Option<Range<usize>> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .and_then(|entry| entry.span.clone())
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.entries.iter().map(|entry| (entry.id, &entry.node))
    }

    pub fn ids(&self) -> Vec<NodeId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.entries.iter().map(|entry| &entry.node)
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.entries.iter_mut().map(|entry| &mut entry.node)
    }

    pub fn headers(&self) -> impl Iterator<Item = &Header> {
        self.nodes().filter_map(Node::as_header)
    }

    pub fn headers_mut(&mut self) -> impl Iterator<Item = &mut Header> {
        self.nodes_mut().filter_map(Node::as_header_mut)
    }

    pub fn kinds(&self) -> Vec<NodeKind> {
        self.nodes().map(Node::kind).collect()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.entries.first().map(|entry| entry.id)
    }

    pub fn last(&self) -> Option<NodeId> {
        self.entries.last().map(|entry| entry.id)
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// First node matching `pred`, searching from `start` (inclusive) or from
    /// the beginning of the document.
    pub fn find_first(
        &self,
        pred: impl Fn(&Node) -> bool,
        start: Option<NodeId>,
    ) -> Result<Option<NodeId>, DocumentError> {
        let from = match start {
            Some(id) => self.position(id)?,
            None => 0,
        };
        Ok(self.entries[from..]
            .iter()
            .find(|entry| pred(&entry.node))
            .map(|entry| entry.id))
    }

    pub fn next_node(&self, id: NodeId) -> Result<Option<NodeId>, DocumentError> {
        let index = self.position(id)?;
        Ok(self.entries.get(index + 1).map(|entry| entry.id))
    }

    pub fn previous_node(&self, id: NodeId) -> Result<Option<NodeId>, DocumentError> {
        let index = self.position(id)?;
        Ok(index
            .checked_sub(1)
            .map(|previous| self.entries[previous].id))
    }

    /// Nodes from `start` (included) up to `end` (excluded).
    pub fn slice(&self, start: NodeId, end: NodeId) -> Result<Vec<&Node>, DocumentError> {
        let a = self.position(start)?;
        let b = self.position(end)?;
        if b < a {
            return Err(DocumentError::InvalidRange { start, end });
        }
        Ok(self.entries[a..b].iter().map(|entry| &entry.node).collect())
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    pub fn add_child(&mut self, node: Node) -> NodeId {
        let entry = self.entry(node, None);
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    pub(crate) fn push_spanned(&mut self, node: Node, span: Range<usize>) -> NodeId {
        let entry = self.entry(node, Some(span));
        let id = entry.id;
        self.entries.push(entry);
        id
    }

    /// Insert `node` immediately before `start`.
    pub fn insert_node(&mut self, start: NodeId, node: Node) -> Result<NodeId, DocumentError> {
        let index = self.position(start)?;
        let entry = self.entry(node, None);
        let id = entry.id;
        self.entries.insert(index, entry);
        Ok(id)
    }

    /// Insert `nodes`, in order, immediately before `start`.
    pub fn insert_nodes(
        &mut self,
        start: NodeId,
        nodes: impl IntoIterator<Item = Node>,
    ) -> Result<Vec<NodeId>, DocumentError> {
        let index = self.position(start)?;
        let entries: Vec<Entry> = nodes
            .into_iter()
            .map(|node| self.entry(node, None))
            .collect();
        let ids = entries.iter().map(|entry| entry.id).collect();
        self.entries.splice(index..index, entries);
        Ok(ids)
    }

    /// Remove a node, returning it. Removing an absent node does nothing.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let index = self.position(id).ok()?;
        Some(self.entries.remove(index).node)
    }

    pub fn remove_nodes(&mut self, ids: &[NodeId]) {
        self.entries.retain(|entry| !ids.contains(&entry.id));
    }

    /// Keep only the nodes for which `pred` holds.
    pub fn retain(&mut self, mut pred: impl FnMut(&Node) -> bool) {
        self.entries.retain(|entry| pred(&entry.node));
    }

    /// Append every node of `other`, unchanged. The appended nodes get new
    /// handles in this document.
    pub fn extend(&mut self, other: Document) {
        for entry in other.entries {
            let moved = self.entry(entry.node, entry.span);
            self.entries.push(moved);
        }
    }

    /// Shift every header level by `count`.
    pub fn indent(&mut self, count: isize) {
        for header in self.headers_mut() {
            header.indent(count);
        }
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Render the document. Reference link definitions are moved after all
    /// other nodes, keeping their relative order.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.nodes().filter(|node| !node.is_reference_link()) {
            write!(f, "{}", node)?;
        }
        for node in self.nodes().filter(|node| node.is_reference_link()) {
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}
