use std::collections::BTreeMap;

/// Lookup from page names to the section they are published under.
///
/// Pages are matched by their full relative path first (`tutorial/intro.md`),
/// then by file name (`intro.md`). Unknown pages belong to the default section.
#[derive(Debug, Clone, Default)]
pub struct SectionMap {
    pages: BTreeMap<String, String>,
    default_section: String,
}

impl SectionMap {
    pub fn new(default_section: impl Into<String>) -> Self {
        SectionMap {
            pages: BTreeMap::new(),
            default_section: default_section.into(),
        }
    }

    pub fn with_page(mut self, page: impl Into<String>, section: impl Into<String>) -> Self {
        self.insert(page, section);
        self
    }

    pub fn insert(&mut self, page: impl Into<String>, section: impl Into<String>) {
        self.pages.insert(page.into(), section.into());
    }

    pub fn default_section(&self) -> &str {
        &self.default_section
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Section of a known page.
    pub fn lookup(&self, page: &str) -> Option<&str> {
        self.pages
            .get(page)
            .or_else(|| self.pages.get(file_name(page)))
            .map(String::as_str)
    }

    /// Section of `page`, falling back to the default section.
    pub fn section_of(&self, page: &str) -> &str {
        self.lookup(page).unwrap_or(&self.default_section)
    }
}

/// Last path segment of a page: `tutorial/intro.md` gives `intro.md`.
pub fn file_name(page: &str) -> &str {
    page.rsplit('/').next().unwrap_or(page)
}
