//! The descriptor accumulator.
//!
//! Sections are collected in memory in the order the orchestrator appends
//! them and flushed to disk exactly once, atomically, when the document is
//! complete. A failure anywhere mid-run therefore never leaves a
//! half-written descriptor behind; the previous descriptor (if any) stays
//! intact until [`ComposeDocument::commit`] renames the finished one over
//! it.

use crate::compose::markup::{SectionMap, render};
use crate::utils::fs::safe_write;
use anyhow::Result;
use std::path::Path;

/// Fixed document header: format version plus the opener every service
/// section nests under.
const HEADER: &str = "version: '2'\nservices:\n";

/// In-memory orchestration descriptor.
///
/// Construction writes the fixed header; appends are monotonic and the
/// accumulator never re-reads or rewrites what it already holds. The call
/// order is the contract: service sections first, then proxy, databases,
/// queues, custom blocks, and the top-level network trailer.
#[derive(Debug)]
pub struct ComposeDocument {
    buffer: String,
}

impl ComposeDocument {
    /// Initialize the descriptor with its fixed header.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: HEADER.to_string(),
        }
    }

    /// Append a section under `services:`, preceded by a blank-line
    /// separator, serialized at base indentation.
    pub fn append_section(&mut self, section: &SectionMap) {
        self.buffer.push('\n');
        self.buffer.push_str(&render(section, 1));
    }

    /// Append a top-level section (the `networks:` trailer), preceded by a
    /// blank-line separator.
    pub fn append_top_level(&mut self, section: &SectionMap) {
        self.buffer.push('\n');
        self.buffer.push_str(&render(section, 0));
    }

    /// The accumulated descriptor text.
    #[must_use]
    pub fn contents(&self) -> &str {
        &self.buffer
    }

    /// Atomically write the finished descriptor to `path`.
    pub fn commit(&self, path: &Path) -> Result<()> {
        tracing::debug!(
            target: "compose",
            "Committing {} bytes to {}",
            self.buffer.len(),
            path.display()
        );
        safe_write(path, &self.buffer)
    }
}

impl Default for ComposeDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::markup::Node;
    use tempfile::tempdir;

    fn section(name: &str) -> SectionMap {
        let mut body = SectionMap::new();
        body.insert("image".to_string(), Node::Scalar("nginx:1.10".to_string()));
        let mut map = SectionMap::new();
        map.insert(name.to_string(), Node::Map(body));
        map
    }

    #[test]
    fn test_header_written_first() {
        let doc = ComposeDocument::new();
        assert_eq!(doc.contents(), "version: '2'\nservices:\n");
    }

    #[test]
    fn test_sections_are_blank_line_separated() {
        let mut doc = ComposeDocument::new();
        doc.append_section(&section("api"));
        doc.append_section(&section("worker"));

        let expected = "\
version: '2'
services:

  api:
    image: nginx:1.10

  worker:
    image: nginx:1.10
";
        assert_eq!(doc.contents(), expected);
    }

    #[test]
    fn test_top_level_section_is_not_indented() {
        let mut doc = ComposeDocument::new();
        doc.append_top_level(&section("networks"));

        assert!(doc.contents().contains("\nnetworks:\n  image:"));
    }

    #[test]
    fn test_appends_are_monotonic() {
        let mut doc = ComposeDocument::new();
        doc.append_section(&section("api"));
        let after_first = doc.contents().to_string();

        doc.append_section(&section("worker"));
        assert!(doc.contents().starts_with(&after_first));
    }

    #[test]
    fn test_commit_writes_parseable_yaml() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("docker-compose.yml");

        let mut doc = ComposeDocument::new();
        doc.append_section(&section("api"));
        doc.commit(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&content).unwrap();
        assert_eq!(parsed["version"].as_str().unwrap(), "2");
        assert_eq!(
            parsed["services"]["api"]["image"].as_str().unwrap(),
            "nginx:1.10"
        );
    }
}
