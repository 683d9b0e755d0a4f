use mdoc::{Document, DocumentError, Header, Node, NodeKind};

fn doc(text: &str) -> Document {
    Document::parse(text)
}

fn is_header(node: &Node) -> bool {
    matches!(node, Node::Header(_))
}

fn is_paragraph(node: &Node) -> bool {
    matches!(node, Node::Paragraph(_))
}

#[test]
fn find_first_from_start_and_from_node() {
    let d = doc("# A\n\ntext\n\n## B\n");
    let a = d.find_first(is_header, None).unwrap().unwrap();
    assert_eq!(d.get(a).unwrap().raw(), "# A\n");

    // The start node itself is a candidate.
    assert_eq!(d.find_first(is_header, Some(a)).unwrap(), Some(a));

    let after_a = d.next_node(a).unwrap().unwrap();
    let b = d.find_first(is_header, Some(after_a)).unwrap().unwrap();
    assert_eq!(d.get(b).unwrap().raw(), "## B\n");

    let tail = d.next_node(b).unwrap();
    assert_eq!(tail, None);
    assert_eq!(d.find_first(is_paragraph, Some(b)).unwrap(), None);
}

#[test]
fn next_and_previous_at_boundaries() {
    let d = doc("# A\n\ntext\n");
    let ids = d.ids();
    assert_eq!(ids.len(), 3);
    assert_eq!(d.previous_node(ids[0]).unwrap(), None);
    assert_eq!(d.next_node(ids[0]).unwrap(), Some(ids[1]));
    assert_eq!(d.previous_node(ids[2]).unwrap(), Some(ids[1]));
    assert_eq!(d.next_node(ids[2]).unwrap(), None);
}

#[test]
fn slice_is_half_open() {
    let d = doc("# A\n\ntext\n\n## B\n");
    let ids = d.ids();
    let nodes = d.slice(ids[1], ids[4]).unwrap();
    let kinds: Vec<NodeKind> = nodes.iter().map(|n| n.kind()).collect();
    assert_eq!(
        kinds,
        vec![NodeKind::Whitespace, NodeKind::Paragraph, NodeKind::Whitespace]
    );
    assert!(d.slice(ids[2], ids[2]).unwrap().is_empty());
}

#[test]
fn reversed_slice_is_an_error() {
    let d = doc("# A\n\ntext\n");
    let ids = d.ids();
    assert_eq!(
        d.slice(ids[2], ids[0]).unwrap_err(),
        DocumentError::InvalidRange {
            start: ids[2],
            end: ids[0]
        }
    );
}

#[test]
fn handles_survive_other_mutations() {
    let mut d = doc("# A\n\ntext\n");
    let ids = d.ids();
    let inserted = d
        .insert_node(ids[0], Node::Paragraph("intro\n".to_string()))
        .unwrap();
    d.remove_node(ids[1]);
    assert_eq!(d.get(ids[2]).unwrap().raw(), "text\n");
    assert_eq!(d.next_node(inserted).unwrap(), Some(ids[0]));
    assert_eq!(d.next_node(ids[0]).unwrap(), Some(ids[2]));
    assert_eq!(d.to_text(), "intro\n# A\ntext\n");
}

#[test]
fn removed_or_foreign_handles_are_not_found() {
    let mut d = doc("# A\n\ntext\n");
    let other = doc("# A\n\ntext\n");
    let foreign = other.first().unwrap();
    assert_eq!(
        d.next_node(foreign).unwrap_err(),
        DocumentError::NodeNotFound(foreign)
    );

    let first = d.first().unwrap();
    assert!(d.remove_node(first).is_some());
    assert!(d.remove_node(first).is_none());
    assert!(d.find_first(is_header, Some(first)).is_err());
    assert!(
        d.insert_node(first, Node::Whitespace("\n".to_string()))
            .is_err()
    );
}

#[test]
fn insert_nodes_before_start() {
    let mut d = doc("# A\n");
    let a = d.first().unwrap();
    let ids = d
        .insert_nodes(
            a,
            vec![
                Node::Header(Header::new("Cover", 1)),
                Node::Whitespace("\n".to_string()),
            ],
        )
        .unwrap();
    assert_eq!(ids.len(), 2);
    assert_eq!(d.to_text(), "# Cover\n\n# A\n");
    assert_eq!(d.next_node(ids[1]).unwrap(), Some(a));
}

#[test]
fn remove_nodes_ignores_absent_ids() {
    let mut d = doc("one\n\ntwo\n\nthree\n");
    let ids = d.ids();
    d.remove_node(ids[1]);
    d.remove_nodes(&[ids[1], ids[2], ids[3]]);
    assert_eq!(d.to_text(), "one\nthree\n");
}

#[test]
fn extend_appends_verbatim() {
    let mut acc = doc("# A {#custom}\n");
    let mut other = doc("# B\n");
    other.headers_mut().for_each(|h| h.set_id(Some("b-id".to_string())));
    acc.extend(other);
    assert_eq!(acc.len(), 2);
    assert_eq!(acc.to_text(), "# A {#custom}\n# B {#b-id}\n");
}

#[test]
fn reference_links_render_last_in_order() {
    let d = doc("[one]: /1\n\n# Title\n\n[two]: /2\nbody\n");
    assert_eq!(d.to_text(), "\n# Title\n\nbody\n[one]: /1\n[two]: /2\n");
}

#[test]
fn indent_shifts_every_header() {
    let mut d = doc("# A\n\n## B\n\ntext\n");
    d.indent(1);
    let levels: Vec<usize> = d.headers().map(Header::level).collect();
    assert_eq!(levels, vec![2, 3]);
    assert_eq!(d.to_text(), "## A\n\n### B\n\ntext\n");
}

#[test]
fn indent_never_renders_below_level_one() {
    let mut d = doc("## B\n");
    d.indent(-5);
    assert_eq!(d.headers().next().unwrap().level(), 1);
    assert_eq!(d.to_text(), "# B\n");
}

#[test]
fn indent_then_dedent_is_identity() {
    let source = "#   Spaced\n\n## B {#kept}\n\n### C\n";
    for n in [-3isize, -1, 0, 1, 4] {
        let mut d = doc(source);
        d.indent(n);
        d.indent(-n);
        assert_eq!(d.to_text(), source, "n = {}", n);
    }
}

#[test]
fn header_setters_regenerate_raw() {
    let mut header = Header::new("Title", 2);
    assert_eq!(header.raw(), "## Title\n");
    header.set_id(Some("section-title".to_string()));
    assert_eq!(header.raw(), "## Title {#section-title}\n");
    header.set_title("Other");
    header.set_level(1);
    assert_eq!(header.raw(), "# Other {#section-title}\n");
    header.set_id(None);
    assert_eq!(header.raw(), "# Other\n");
}

#[test]
fn toc_has_one_bullet_per_header() {
    let d = doc("# Getting Started\n\ntext\n\n## Café Setup\n\n### a/b c\n");
    let toc = d.toc();
    let bullets: Vec<&str> = toc.lines().filter(|l| l.trim_start().starts_with("* ")).collect();
    assert_eq!(bullets.len(), d.headers().count());
    assert_eq!(
        toc,
        "Table of Contents\n\
         =================\n   \
         * [Getting Started](#getting-started)\n      \
         * [Café Setup](#cafe-setup)\n         \
         * [a/b c](#ab-c)\n"
    );
}

#[test]
fn anchored_toc_prefers_header_ids() {
    let mut d = doc("# Intro\n\n## Setup\n");
    d.headers_mut()
        .next()
        .unwrap()
        .set_id(Some("guide-intro".to_string()));
    let toc = d.anchored_toc();
    assert!(toc.contains("   * [Intro](#guide-intro)\n"));
    assert!(toc.contains("      * [Setup](#setup)\n"));
}

#[test]
fn retain_and_find_by_kind() {
    let mut d = doc("# A\n\ntext\n\n```\ncode\n```\n");
    d.retain(|node| node.kind() != NodeKind::Whitespace);
    assert_eq!(
        d.kinds(),
        vec![NodeKind::Header, NodeKind::Paragraph, NodeKind::CodeBlock]
    );
}
