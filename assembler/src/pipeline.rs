use mdoc::{Document, DocumentError, Header, Node};

use crate::anchors::{anchor_prefix, assign_header_ids, section_header};
use crate::links::rewrite_links;
use crate::notice::Notice;
use crate::references::inline_reference_links;
use crate::sections::SectionMap;

/// Paragraph placed after every source file in an assembled document.
pub const DEFAULT_SEPARATOR: &str = "\n\n<hr>\n\n";

/// One source file to be merged.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub text: String,
    /// Title of the section the file is published under, if any.
    pub section: Option<String>,
    /// File name without extension, part of every anchor of the file.
    pub stem: String,
    /// Identifies `text` in notices.
    pub file_id: usize,
}

impl SourceUnit {
    pub fn new(text: impl Into<String>, stem: impl Into<String>) -> Self {
        SourceUnit {
            text: text.into(),
            section: None,
            stem: stem.into(),
            file_id: 0,
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_file_id(mut self, file_id: usize) -> Self {
        self.file_id = file_id;
        self
    }
}

/// Parse one source file and prepare it for merging: indent it below its
/// section header, inline its reference links, anchor its headers, rewrite
/// its links and realign its tables.
pub fn transform(unit: &SourceUnit, sections: &SectionMap, notices: &mut Vec<Notice>) -> Document {
    let mut doc = Document::parse(&unit.text);
    let prefix = anchor_prefix(unit.section.as_deref(), &unit.stem);

    if unit.section.is_some() {
        doc.indent(1);
    }
    inline_reference_links(&mut doc, unit.file_id, notices);
    assign_header_ids(&mut doc, prefix.as_deref());
    rewrite_links(&mut doc, prefix.as_deref(), sections, unit.file_id, notices);
    for node in doc.nodes_mut() {
        if let Node::Table(table) = node {
            table.reformat();
        }
    }

    doc
}

/// Front matter of an assembled document.
#[derive(Debug, Clone, Default)]
pub struct Cover {
    pub title: String,
    pub subtitle: Option<String>,
    /// Include a table of contents of the whole document.
    pub toc: bool,
}

/// Accumulates transformed source files into a single document.
#[derive(Debug)]
pub struct Assembler {
    doc: Document,
    sections: SectionMap,
    notices: Vec<Notice>,
    separator: String,
}

impl Assembler {
    pub fn new(sections: SectionMap) -> Self {
        Assembler {
            doc: Document::new(),
            sections,
            notices: Vec::new(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Start a section: a level 1 header anchored at the slug of `title`.
    pub fn add_section(&mut self, title: &str) {
        self.doc.add_child(Node::Header(section_header(title)));
        self.doc.add_child(Node::Whitespace("\n".to_string()));
    }

    pub fn add_source(&mut self, unit: &SourceUnit) {
        let doc = transform(unit, &self.sections, &mut self.notices);
        self.doc.extend(doc);
        self.doc.add_child(Node::Paragraph(self.separator.clone()));
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn diagnostics(&self) -> &[Notice] {
        &self.notices
    }

    /// Serialize the accumulated document, preceded by `cover` if given.
    pub fn finish(self, cover: Option<&Cover>) -> Result<Assembly, DocumentError> {
        let mut doc = self.doc;

        if let Some(cover) = cover {
            let blank = || Node::Whitespace("\n".to_string());
            let mut front = vec![Node::Header(Header::new(&cover.title, 1)), blank()];
            if let Some(subtitle) = &cover.subtitle {
                front.push(Node::Header(Header::new(subtitle, 2)));
                front.push(blank());
            }
            if cover.toc {
                front.push(Node::Paragraph(doc.anchored_toc()));
                front.push(blank());
            }

            match doc.first() {
                Some(first) => {
                    doc.insert_nodes(first, front)?;
                }
                None => {
                    for node in front {
                        doc.add_child(node);
                    }
                }
            }
        }

        Ok(Assembly {
            text: doc.to_text(),
            notices: self.notices,
        })
    }
}

/// The serialized result of an assembly and everything noticed on the way.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub text: String,
    pub notices: Vec<Notice>,
}

impl Assembly {
    pub fn replace_all(&mut self, replacements: &[(String, String)]) {
        self.text = replace_all(&self.text, replacements);
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(|notice| notice.is_warning())
    }
}

/// Apply literal `(from, to)` substitutions to `text`, in order.
pub fn replace_all(text: &str, replacements: &[(String, String)]) -> String {
    replacements
        .iter()
        .filter(|(from, _)| !from.is_empty())
        .fold(text.to_string(), |text, (from, to)| text.replace(from.as_str(), to))
}
