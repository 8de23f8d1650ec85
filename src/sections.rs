use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Heading;

/// Read-only map from canonical heading to the document lines beneath it,
/// built once at startup. Every non-blank line after the first recognized
/// heading belongs to exactly one section; line indices are stable for the
/// process lifetime.
#[derive(Debug, Clone, Default)]
pub struct SectionStore {
    sections: BTreeMap<Heading, Vec<String>>,
}

impl SectionStore {
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read itinerary document {}", path.display()))?;
        Ok(Self::from_text(&text))
    }

    /// Segments raw document text. A line whose trimmed content exactly
    /// equals a canonical heading opens a new section; blank lines are
    /// skipped; lines before the first heading are dropped.
    pub fn from_text(text: &str) -> Self {
        let mut sections: BTreeMap<Heading, Vec<String>> = BTreeMap::new();
        let mut current: Option<(Heading, Vec<String>)> = None;

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(heading) = Heading::from_document_line(line) {
                if let Some((open, lines)) = current.take() {
                    sections.insert(open, lines);
                }
                current = Some((heading, Vec::new()));
            } else if let Some((_, lines)) = current.as_mut() {
                lines.push(line.to_string());
            }
        }

        if let Some((open, lines)) = current {
            sections.insert(open, lines);
        }

        Self { sections }
    }

    /// Lines of one section, in document order. Unseen headings yield an
    /// empty slice rather than an error.
    pub fn section_lines(&self, heading: Heading) -> &[String] {
        self.sections
            .get(&heading)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
