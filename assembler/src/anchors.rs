use mdoc::{Document, Header, slug};

/// Prefix shared by every anchor of one source file: the slug of its section
/// title followed by its file stem. Without a section there is no prefix.
pub fn anchor_prefix(section: Option<&str>, stem: &str) -> Option<String> {
    section.map(|section| section_prefix(section, stem))
}

/// `slug(section + " " + stem)`, also used to address pages of other files.
pub fn section_prefix(section: &str, stem: &str) -> String {
    slug(&format!("{} {}", section, stem))
}

/// Anchor id for a header title: `prefix-slug(title)`, or the bare slug.
pub fn header_id(prefix: Option<&str>, title: &str) -> String {
    let title_slug = slug(title);
    match prefix {
        Some(prefix) => format!("{}-{}", prefix, title_slug),
        None => title_slug,
    }
}

/// Give every header of `doc` an explicit id, e.g.
/// `# Some title` becomes `# Some title {#a-prefix-some-title}`.
pub fn assign_header_ids(doc: &mut Document, prefix: Option<&str>) {
    for header in doc.headers_mut() {
        let id = header_id(prefix, header.title());
        header.set_id(Some(id));
    }
}

/// Level 1 header introducing a section, anchored at the slug of its title.
pub fn section_header(title: &str) -> Header {
    let mut header = Header::new(title, 1);
    header.set_id(Some(header_id(None, title)));
    header
}
