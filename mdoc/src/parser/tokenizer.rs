use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::node::{Header, Node, ReferenceLink, Table};
use crate::parser::cursor::Cursor;

/// A full line of the form `[label]: target`. Brackets inside the label must
/// be escaped.
static REFERENCE_LINK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(?:[^\]\\]|\\.)+\]:[ \t]+\S.*$").unwrap());

const FENCES: [&str; 3] = ["```", "~~~", "---"];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Tokenize `source`, pairing every node with the byte span it was read from.
pub(crate) fn tokenize_spanned(source: &str) -> Vec<(Node, Range<usize>)> {
    let mut cursor = Cursor::new(source);
    let mut nodes = Vec::new();

    while !cursor.is_eof() {
        let start = cursor.offset();
        let node = next_node(&mut cursor);
        nodes.push((node, start..cursor.offset()));
    }

    nodes
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify and consume the node starting at the cursor. Always consumes at
/// least one character when input remains.
fn next_node(cursor: &mut Cursor<'_>) -> Node {
    let Some(c) = cursor.peek_char() else {
        return Node::Whitespace(String::new());
    };

    if is_whitespace(c) {
        return parse_whitespace(cursor);
    }

    if FENCES.contains(&cursor.peek(3)) {
        return parse_code(cursor);
    }

    if c == '#' {
        return parse_header(cursor);
    }

    if c == '[' {
        if let Some(link) = parse_reference_link(cursor) {
            return link;
        }
    }

    if let Some(table) = parse_table(cursor) {
        return table;
    }

    parse_paragraph(cursor)
}

fn parse_whitespace(cursor: &mut Cursor<'_>) -> Node {
    Node::Whitespace(cursor.read_while(is_whitespace).to_string())
}

/// Code block from an opening fence through the next identical fence, or to
/// the end of input when the block is never closed.
fn parse_code(cursor: &mut Cursor<'_>) -> Node {
    let start = cursor.offset();
    let fence = cursor.read(3);

    while !cursor.is_eof() {
        if cursor.peek(3) == fence {
            cursor.read(3);
            break;
        }
        cursor.read(1);
    }

    Node::CodeBlock(cursor.since(start).to_string())
}

fn parse_header(cursor: &mut Cursor<'_>) -> Node {
    let start = cursor.offset();
    let hashes = cursor.read_while(|c| c == '#');
    cursor.read_while(|c| c == ' ' || c == '\t');
    let title = cursor.read_while(|c| c != '\n');
    cursor.read(1);

    Node::Header(Header::parsed(
        title.trim_end(),
        hashes.chars().count(),
        cursor.since(start),
    ))
}

/// Reference link definition, or `None` (consuming nothing) if the current
/// line does not split into a label and a target.
fn parse_reference_link(cursor: &mut Cursor<'_>) -> Option<Node> {
    let line = cursor.peek_while(|c| c != '\n');
    if !REFERENCE_LINK_LINE.is_match(line) {
        return None;
    }

    let mut scanner = Cursor::new(line);
    scanner.read(1);
    let label = scanner.read_while_prev(|c, prev| c != ']' || prev == Some('\\'));
    if label.is_empty() || scanner.read(2) != "]:" {
        return None;
    }
    let target = scanner.rest().trim();
    if target.is_empty() {
        return None;
    }

    let raw = cursor.read_line();
    Some(Node::ReferenceLink(ReferenceLink::parsed(label, target, raw)))
}

/// Pipe table: a line holding `|`, a delimiter row, then every following
/// non-blank line that holds `|`.
fn parse_table(cursor: &mut Cursor<'_>) -> Option<Node> {
    let mut lines = cursor.rest().split_inclusive('\n');
    let head = lines.next()?;
    let delimiter = lines.next()?;
    if !head.contains('|') || !head.ends_with('\n') || !is_delimiter_row(delimiter) {
        return None;
    }
    let rows = lines
        .take_while(|line| line.contains('|') && !is_blank(line))
        .count();

    let start = cursor.offset();
    for _ in 0..rows + 2 {
        cursor.read_line();
    }

    Some(Node::Table(Table::new(cursor.since(start))))
}

/// Paragraph text up to and including the newline that precedes a blank line.
fn parse_paragraph(cursor: &mut Cursor<'_>) -> Node {
    let start = cursor.offset();

    while !cursor.is_eof() {
        if cursor.read(1) == "\n" {
            let line = cursor.peek_while(|c| c != '\n');
            if is_blank(line) {
                break;
            }
        }
    }

    Node::Paragraph(cursor.since(start).to_string())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\n'
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.chars().all(is_whitespace)
}

/// A table delimiter row such as `|---|:--:|` or ` --- | --- `.
pub(crate) fn is_delimiter_row(line: &str) -> bool {
    let line = line.trim();
    line.contains('-')
        && line.contains('|')
        && line
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}
