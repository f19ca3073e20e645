/*!
 * Glossary post-processing for terminology consistency.
 *
 * After a chunk has been translated, fixed source terms that the provider
 * left untouched are replaced with their preferred target-language form.
 * All terms are replaced in one pass; at each position the longest source
 * term wins, and replaced text is never matched again.
 */

use anyhow::{Context, Result};
use log::warn;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Map;
use std::path::Path;

/// A single source → target terminology pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    pub source: String,
    pub target: String,
}

impl GlossaryEntry {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self { source: source.into(), target: target.into() }
    }
}

/// Accepted on-disk glossary layouts
#[derive(Deserialize)]
#[serde(untagged)]
enum GlossaryFile {
    /// `{"AI Agent": "AIエージェント", ...}`
    Map(Map<String, serde_json::Value>),
    /// `[{"source": "...", "target": "..."}, ...]`
    List(Vec<GlossaryEntry>),
}

/// Ordered, read-only set of glossary entries
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    entries: Vec<GlossaryEntry>,
    matcher: Option<Regex>,
}

impl Glossary {
    /// Build a glossary; entries are ordered by descending source length.
    ///
    /// The sort is stable, so equal-length terms keep their input order.
    pub fn new(entries: Vec<GlossaryEntry>) -> Self {
        let mut entries: Vec<GlossaryEntry> = entries
            .into_iter()
            .filter(|e| !e.source.is_empty())
            .collect();
        entries.sort_by(|a, b| b.source.chars().count().cmp(&a.source.chars().count()));
        let matcher = Self::build_matcher(&entries);
        Self { entries, matcher }
    }

    /// Alternation of all source terms in entry order. The regex engine
    /// prefers earlier alternatives, so the longest term wins at a position.
    fn build_matcher(entries: &[GlossaryEntry]) -> Option<Regex> {
        if entries.is_empty() {
            return None;
        }
        let alternation = entries
            .iter()
            .map(|e| regex::escape(&e.source))
            .collect::<Vec<_>>()
            .join("|");
        match Regex::new(&alternation) {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!("Glossary too large for a single pass, applying terms one by one: {}", e);
                None
            }
        }
    }

    fn target_for<'a>(&'a self, source: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|e| e.source == source)
            .map(|e| e.target.as_str())
            .unwrap_or(source)
    }

    /// Load entries from a JSON file (object map or list of pairs)
    pub fn load_entries<P: AsRef<Path>>(path: P) -> Result<Vec<GlossaryEntry>> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read glossary file: {:?}", path))?;
        let parsed: GlossaryFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse glossary file: {:?}", path))?;

        let entries = match parsed {
            GlossaryFile::Map(map) => map
                .into_iter()
                .filter_map(|(source, target)| match target {
                    serde_json::Value::String(target) => Some(GlossaryEntry { source, target }),
                    _ => None,
                })
                .collect(),
            GlossaryFile::List(list) => list,
        };
        Ok(entries)
    }

    /// Entries in application order
    pub fn entries(&self) -> &[GlossaryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace every occurrence of each source term with its target term
    pub fn apply(&self, text: &str) -> String {
        if let Some(matcher) = &self.matcher {
            return matcher
                .replace_all(text, |caps: &Captures| self.target_for(&caps[0]).to_string())
                .into_owned();
        }

        let mut result = text.to_string();
        for entry in &self.entries {
            if result.contains(entry.source.as_str()) {
                result = result.replace(entry.source.as_str(), &entry.target);
            }
        }
        result
    }
}
