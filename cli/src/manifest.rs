use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use assembler::{Cover, SectionMap};
use serde::Deserialize;

/// Description of a standalone document: which files to merge, under which
/// sections, and how the result starts.
#[derive(Debug, Deserialize)]
pub struct Manifest {
    /// Cover title. No cover is written without one.
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub subtitle: Option<String>,

    /// Put a table of contents in the cover.
    #[serde(default)]
    pub toc: bool,

    /// Section of pages linked to but not listed in `pages`.
    #[serde(default = "default_section")]
    pub default_section: String,

    /// Page file name to section title. When empty, every listed file maps
    /// to the section it is listed in.
    #[serde(default)]
    pub pages: BTreeMap<String, String>,

    #[serde(default)]
    pub sections: Vec<SectionEntry>,

    /// Literal substitutions applied to the final text, in order.
    #[serde(default)]
    pub replace: Vec<Replacement>,
}

#[derive(Debug, Deserialize)]
pub struct SectionEntry {
    /// Files of an untitled section are merged without a section header.
    #[serde(default)]
    pub title: Option<String>,

    /// Paths relative to the manifest.
    pub files: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

fn default_section() -> String {
    "Reference".to_string()
}

#[derive(Debug)]
pub enum ManifestError {
    Io { path: PathBuf, source: std::io::Error },
    Toml { path: PathBuf, source: toml::de::Error },
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::Io { path, source } => {
                write!(f, "cannot read '{}': {}", path.display(), source)
            }
            ManifestError::Toml { path, source } => {
                write!(f, "invalid manifest '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManifestError::Io { source, .. } => Some(source),
            ManifestError::Toml { source, .. } => Some(source),
        }
    }
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ManifestError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn section_map(&self) -> SectionMap {
        let mut map = SectionMap::new(self.default_section.clone());
        if self.pages.is_empty() {
            for section in &self.sections {
                let Some(title) = &section.title else {
                    continue;
                };
                for file in &section.files {
                    map.insert(page_name(file), title.clone());
                }
            }
        } else {
            for (page, section) in &self.pages {
                map.insert(page.clone(), section.clone());
            }
        }
        map
    }

    pub fn cover(&self) -> Option<Cover> {
        self.title.as_ref().map(|title| Cover {
            title: title.clone(),
            subtitle: self.subtitle.clone(),
            toc: self.toc,
        })
    }

    pub fn replacements(&self) -> Vec<(String, String)> {
        self.replace
            .iter()
            .map(|r| (r.from.clone(), r.to.clone()))
            .collect()
    }
}

/// File name of a listed path, as pages are linked by name.
fn page_name(file: &str) -> String {
    Path::new(file)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
title = "Project Documentation"
subtitle = "Version 1.0"
toc = true

[[sections]]
title = "Getting Started"
files = ["docs/installation.md", "docs/manual.md"]

[[sections]]
files = ["docs/license.md"]

[[replace]]
from = "/docs/assets/img/"
to = "https://example.org/assets/img/"
"#;

    #[test]
    fn parses_all_keys() {
        let manifest = Manifest::parse(MANIFEST).unwrap();
        assert_eq!(manifest.title.as_deref(), Some("Project Documentation"));
        assert!(manifest.toc);
        assert_eq!(manifest.default_section, "Reference");
        assert_eq!(manifest.sections.len(), 2);
        assert_eq!(manifest.sections[1].title, None);
        assert_eq!(
            manifest.replacements(),
            vec![(
                "/docs/assets/img/".to_string(),
                "https://example.org/assets/img/".to_string()
            )]
        );
    }

    #[test]
    fn listed_files_map_to_their_section() {
        let map = Manifest::parse(MANIFEST).unwrap().section_map();
        assert_eq!(map.lookup("manual.md"), Some("Getting Started"));
        assert_eq!(map.lookup("license.md"), None);
        assert_eq!(map.section_of("license.md"), "Reference");
    }

    #[test]
    fn explicit_pages_win() {
        let manifest = Manifest::parse(
            "default_section = \"File Format\"\n[pages]\n\"home.md\" = \"Introduction\"\n",
        )
        .unwrap();
        let map = manifest.section_map();
        assert_eq!(map.lookup("home.md"), Some("Introduction"));
        assert_eq!(map.section_of("request.md"), "File Format");
        assert!(manifest.cover().is_none());
    }

    #[test]
    fn unreadable_manifest() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let error = Manifest::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(error, ManifestError::Io { .. }));
        assert!(error.to_string().contains("missing.toml"));
    }

    #[test]
    fn invalid_manifest() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("manifest.toml");
        std::fs::write(&path, "toc = \"yes\"\n").unwrap();
        assert!(matches!(
            Manifest::load(&path),
            Err(ManifestError::Toml { .. })
        ));
    }
}
