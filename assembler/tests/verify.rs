use assembler::check_anchors;

#[test]
fn consistent_document_has_no_warnings() {
    let text = "# Guide {#guide}\n\n## Setup {#guide-setup}\n\nSee [setup](#guide-setup) and [top](#guide).\n";
    assert!(check_anchors(text, 0).is_empty());
}

#[test]
fn headings_without_id_are_anchored_at_their_slug() {
    let text = "# Getting Started\n\nSee [start](#getting-started).\n";
    assert!(check_anchors(text, 0).is_empty());
}

#[test]
fn dangling_fragment() {
    let text = "# A {#a}\n\nSee [b](#b).\n";
    let notices = check_anchors(text, 0);
    assert_eq!(notices.len(), 1);
    assert!(notices[0].message.contains("#b"));
    assert!(notices[0].span.is_some());
}

#[test]
fn duplicate_anchor() {
    let notices = check_anchors("# Overview\n\n# Overview\n", 0);
    assert_eq!(notices.len(), 1);
    assert!(notices[0].message.starts_with("duplicate anchor"));
}

#[test]
fn html_anchors_count() {
    let text = "| Option | Meaning |\n|--------|---------|\n| <a href=\"#opt\" id=\"opt\">opt</a> | x |\n\n[opt](#opt)\n";
    assert!(check_anchors(text, 0).is_empty());
}
