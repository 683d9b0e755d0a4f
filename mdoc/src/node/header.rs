/// A section header such as `## Title {#anchor}`.
///
/// The raw text is derived from `title`, `level` and `id`, and is regenerated
/// by every setter. A header read from source keeps its exact source text for
/// as long as its rendered values match what was parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    title: String,
    /// Requested level. Indentation may push it below 1; the rendered level
    /// is clamped so that shifting back restores the original.
    depth: isize,
    id: Option<String>,
    raw: String,
    parsed: Option<ParsedHeader>,
}

#[derive(Debug, Clone, PartialEq)]
struct ParsedHeader {
    title: String,
    level: usize,
    raw: String,
}

impl Header {
    pub fn new(title: impl Into<String>, level: usize) -> Self {
        let mut header = Header {
            title: title.into(),
            depth: level.max(1) as isize,
            id: None,
            raw: String::new(),
            parsed: None,
        };
        header.update_raw();
        header
    }

    pub(crate) fn parsed(title: &str, level: usize, raw: &str) -> Self {
        let level = level.max(1);
        Header {
            title: title.to_string(),
            depth: level as isize,
            id: None,
            raw: raw.to_string(),
            parsed: Some(ParsedHeader {
                title: title.to_string(),
                level,
                raw: raw.to_string(),
            }),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Header level, 1 for `#`. Never less than 1.
    pub fn level(&self) -> usize {
        self.depth.max(1) as usize
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.update_raw();
    }

    pub fn set_level(&mut self, level: usize) {
        self.depth = level.max(1) as isize;
        self.update_raw();
    }

    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id;
        self.update_raw();
    }

    /// Shift the level by `count`, which may be negative.
    pub fn indent(&mut self, count: isize) {
        self.depth += count;
        self.update_raw();
    }

    fn update_raw(&mut self) {
        if let Some(parsed) = &self.parsed {
            if self.id.is_none() && parsed.level == self.level() && parsed.title == self.title {
                self.raw.clone_from(&parsed.raw);
                return;
            }
        }
        self.raw = build_header(&self.title, self.level(), self.id.as_deref());
    }
}

/// Render a header line: `level` hashes, the title, the optional `{#id}`.
pub fn build_header(title: &str, level: usize, id: Option<&str>) -> String {
    let hashes = "#".repeat(level);
    match id {
        Some(id) => format!("{} {} {{#{}}}\n", hashes, title, id),
        None => format!("{} {}\n", hashes, title),
    }
}
