//! Property-based tests for the invariants that must hold on any input:
//! raw round-trip, indent identity and table idempotence.

use mdoc::{Document, Node, NodeKind, Table, tokenize};
use proptest::prelude::*;

/// Pieces that exercise every tokenizer branch when glued together.
const FRAGMENTS: &[&str] = &[
    "```", "~~~", "---", "#", "## ", "|", "`", "\\", "\n", "\n\n", " ", "\t", "[a]: x", "[b]",
    "]", ":", "-", "é", "日本", "word", "| a | b |\n|---|---|\n",
];

const CELL_PIECES: &[&str] = &["a", "é", "日本", "`", "\\", "|", " ", "-", ":", "x y"];

fn markup_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..40).prop_map(|parts| parts.concat())
}

fn cell_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(CELL_PIECES), 0..4).prop_map(|parts| parts.concat())
}

fn row_strategy() -> impl Strategy<Value = String> {
    (prop::collection::vec(cell_strategy(), 1..4), any::<bool>()).prop_map(|(cells, outer)| {
        let row = cells.join(" | ");
        if outer { format!("| {} |", row) } else { row }
    })
}

fn table_strategy() -> impl Strategy<Value = String> {
    (row_strategy(), prop::collection::vec(row_strategy(), 0..4)).prop_map(|(head, rows)| {
        let mut raw = format!("h {}\n|---|---|\n", head);
        for row in rows {
            raw.push_str(&row);
            raw.push('\n');
        }
        raw
    })
}

fn reformatted(raw: &str) -> String {
    let mut table = Table::new(raw);
    table.reformat();
    table.raw().to_string()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    #[test]
    fn raw_text_reproduces_any_source(source in markup_strategy()) {
        let raw: String = tokenize(&source).iter().map(Node::raw).collect();
        prop_assert_eq!(raw, source);
    }

    #[test]
    fn document_round_trips_untouched_input(source in markup_strategy()) {
        let doc = Document::parse(&source);
        if doc.kinds().contains(&NodeKind::ReferenceLink) {
            let mut expected: String = doc
                .nodes()
                .filter(|node| !node.is_reference_link())
                .map(Node::raw)
                .collect();
            expected.extend(doc.nodes().filter(|node| node.is_reference_link()).map(Node::raw));
            prop_assert_eq!(doc.to_text(), expected);
        } else {
            prop_assert_eq!(doc.to_text(), source);
        }
    }

    #[test]
    fn indent_then_unindent_is_identity(source in markup_strategy(), n in -6isize..=6) {
        let mut doc = Document::parse(&source);
        let before = doc.to_text();
        let levels: Vec<usize> = doc.headers().map(|header| header.level()).collect();

        doc.indent(n);
        doc.indent(-n);

        let after: Vec<usize> = doc.headers().map(|header| header.level()).collect();
        prop_assert_eq!(after, levels);
        prop_assert_eq!(doc.to_text(), before);
    }

    #[test]
    fn reformat_is_idempotent_for_any_table(raw in table_strategy()) {
        let once = reformatted(&raw);
        prop_assert_eq!(reformatted(&once), once);
    }

    #[test]
    fn tokenized_tables_reformat_idempotently(source in markup_strategy()) {
        for node in tokenize(&source) {
            if let Node::Table(table) = node {
                let once = reformatted(table.raw());
                prop_assert_eq!(reformatted(&once), once);
            }
        }
    }
}
