use std::fmt;
use std::path::{Path, PathBuf};

use assembler::{Assembler, Assembly, SourceUnit, check_anchors};
use codespan_reporting::files::SimpleFiles;
use mdoc::DocumentError;

use crate::manifest::{Manifest, ManifestError};

/// A finished build: the assembled text with its notices, and the files the
/// notices point into. The output itself is registered as the last file.
pub struct Build {
    pub assembly: Assembly,
    pub files: SimpleFiles<String, String>,
}

#[derive(Debug)]
pub enum BuildError {
    Manifest(ManifestError),
    Read { path: PathBuf, source: std::io::Error },
    Document(DocumentError),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Manifest(e) => write!(f, "{}", e),
            BuildError::Read { path, source } => {
                write!(f, "cannot read '{}': {}", path.display(), source)
            }
            BuildError::Document(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Manifest(e) => Some(e),
            BuildError::Read { source, .. } => Some(source),
            BuildError::Document(e) => Some(e),
        }
    }
}

impl From<ManifestError> for BuildError {
    fn from(e: ManifestError) -> Self {
        BuildError::Manifest(e)
    }
}

impl From<DocumentError> for BuildError {
    fn from(e: DocumentError) -> Self {
        BuildError::Document(e)
    }
}

/// Assemble every file listed by the manifest at `path` into one document,
/// then check the internal links of the result.
pub fn build(path: &Path) -> Result<Build, BuildError> {
    let manifest = Manifest::load(path)?;
    let base_dir = path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));

    let mut files = SimpleFiles::new();
    let mut assembler = Assembler::new(manifest.section_map());

    for section in &manifest.sections {
        if let Some(title) = &section.title {
            assembler.add_section(title);
        }
        for file in &section.files {
            let file_path = base_dir.join(file);
            let text = std::fs::read_to_string(&file_path).map_err(|source| BuildError::Read {
                path: file_path.clone(),
                source,
            })?;
            let stem = file_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();

            let file_id = files.add(file.clone(), text.clone());
            let mut unit = SourceUnit::new(text, stem).with_file_id(file_id);
            if let Some(title) = &section.title {
                unit = unit.with_section(title.clone());
            }
            assembler.add_source(&unit);
        }
    }

    let mut assembly = assembler.finish(manifest.cover().as_ref())?;
    assembly.replace_all(&manifest.replacements());

    let output_id = files.add("<output>".to_string(), assembly.text.clone());
    let dangling = check_anchors(&assembly.text, output_id);
    assembly.notices.extend(dangling);

    Ok(Build { assembly, files })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn builds_a_standalone_document() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        write(
            dir.path(),
            "manifest.toml",
            "[[sections]]\ntitle = \"Getting Started\"\nfiles = [\"docs/install.md\", \"docs/usage.md\"]\n",
        );
        write(
            dir.path(),
            "docs/install.md",
            "# Install\n\nThen read [usage](/docs/usage.md#run).\n",
        );
        write(dir.path(), "docs/usage.md", "# Run\n\nRun [it].\n\n[it]: https://example.org\n");

        let build = build(&dir.path().join("manifest.toml")).unwrap();
        assert_eq!(
            build.assembly.text,
            "# Getting Started {#getting-started}\n\n\
             ## Install {#getting-started-install-install}\n\n\
             Then read [usage](#getting-started-usage-run).\n\n\n<hr>\n\n\
             ## Run {#getting-started-usage-run}\n\n\
             Run [it](https://example.org).\n\n\n\n<hr>\n\n"
        );
        assert_eq!(build.assembly.warnings().count(), 0);
    }

    #[test]
    fn dangling_links_are_reported_against_the_output() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        write(
            dir.path(),
            "manifest.toml",
            "[[sections]]\ntitle = \"Guide\"\nfiles = [\"intro.md\"]\n",
        );
        write(dir.path(), "intro.md", "# Intro\n\nSee [nowhere](#nowhere).\n");

        let build = build(&dir.path().join("manifest.toml")).unwrap();
        let warnings: Vec<_> = build.assembly.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("#guide-intro-nowhere"));
        assert_eq!(warnings[0].file_id, 1);
    }

    #[test]
    fn missing_source_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        write(dir.path(), "manifest.toml", "[[sections]]\nfiles = [\"gone.md\"]\n");
        let error = build(&dir.path().join("manifest.toml")).err().unwrap();
        assert!(matches!(error, BuildError::Read { .. }));
        assert!(error.to_string().contains("gone.md"));
    }

    #[test]
    fn cover_and_replacements() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        write(
            dir.path(),
            "manifest.toml",
            "title = \"Manual\"\n\n[[sections]]\nfiles = [\"a.md\"]\n\n\
             [[replace]]\nfrom = \"/docs/img/\"\nto = \"https://example.org/img/\"\n",
        );
        write(dir.path(), "a.md", "![logo](/docs/img/logo.png)\n");

        let build = build(&dir.path().join("manifest.toml")).unwrap();
        assert_eq!(
            build.assembly.text,
            "# Manual\n\n![logo](https://example.org/img/logo.png)\n\n\n<hr>\n\n"
        );
    }
}
