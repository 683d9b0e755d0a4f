/// A reference-style link definition: `[label]: target`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLink {
    label: String,
    target: String,
    raw: String,
}

impl ReferenceLink {
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        let label = label.into();
        let target = target.into();
        let raw = format!("[{}]: {}\n", label, target);
        ReferenceLink { label, target, raw }
    }

    pub(crate) fn parsed(label: &str, target: &str, raw: &str) -> Self {
        ReferenceLink {
            label: label.to_string(),
            target: target.trim().to_string(),
            raw: raw.to_string(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The link destination, without surrounding whitespace.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}
