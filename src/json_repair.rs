/*!
 * Repair of JSON files whose `description` value contains raw quotes.
 *
 * Hand-edited tool manifests often end up with prose such as
 * `"description": "Use "plan" mode first"`. The first `description`
 * value in the file has its unescaped quotes escaped, the result is
 * parsed strictly and written back pretty-printed. Files that already
 * parse are left untouched.
 */

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::file_utils::FileManager;

static DESCRIPTION_OPENING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""description"\s*:\s*""#).unwrap()
});

// What may follow the closing quote of a value: a comma ending the line or
// introducing the next key, the end of the line, or the end of the object
static VALUE_TERMINATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[ \t]*(?:,[ \t]*(?:\r?\n|"[^"\n]*"\s*:)|\r?\n|\}|$)"#).unwrap()
});

/// What `repair_file` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairOutcome {
    /// The file was valid JSON and was not touched
    AlreadyValid,
    /// The file was fixed and rewritten
    Repaired,
}

/// Escape every `"` in `body` not already preceded by a backslash
pub fn escape_unescaped_quotes(body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 8);
    let mut previous = None;
    for c in body.chars() {
        if c == '"' && previous != Some('\\') {
            out.push('\\');
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

/// Repair the first `description` value of `content`.
///
/// The value ends at the first unescaped quote followed by something that
/// can close a JSON value. Returns `None` when there is no description
/// value or no such quote.
pub fn repair_description(content: &str) -> Option<String> {
    let body_start = DESCRIPTION_OPENING.find(content)?.end();
    let closing = find_closing_quote(content, body_start)?;

    let mut repaired = String::with_capacity(content.len() + 8);
    repaired.push_str(&content[..body_start]);
    repaired.push_str(&escape_unescaped_quotes(&content[body_start..closing]));
    repaired.push_str(&content[closing..]);
    Some(repaired)
}

fn find_closing_quote(content: &str, from: usize) -> Option<usize> {
    let mut previous = None;
    for (offset, c) in content[from..].char_indices() {
        let index = from + offset;
        if c == '"' && previous != Some('\\') && VALUE_TERMINATOR.is_match(&content[index + 1..]) {
            return Some(index);
        }
        if c == '\n' {
            return None;
        }
        previous = Some(c);
    }
    None
}

/// Pretty-print a JSON value with two-space indentation and a trailing newline
pub fn to_pretty_json(value: &serde_json::Value) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    out.push('\n');
    Ok(out)
}

/// Repair a JSON string; valid input yields `Ok(None)`
pub fn repair_str(content: &str) -> Result<Option<String>> {
    if serde_json::from_str::<serde_json::Value>(content).is_ok() {
        return Ok(None);
    }

    let repaired = repair_description(content)
        .ok_or_else(|| anyhow::anyhow!("Invalid JSON without a description value to repair"))?;
    let value: serde_json::Value = serde_json::from_str(&repaired)
        .context("JSON is still invalid after escaping description quotes")?;
    Ok(Some(to_pretty_json(&value)?))
}

/// Repair a file in place. Nothing is written unless the result parses.
pub fn repair_file<P: AsRef<Path>>(path: P) -> Result<RepairOutcome> {
    let path = path.as_ref();
    let content = FileManager::read_to_string(path)?;

    match repair_str(&content).with_context(|| format!("Failed to repair {}", path.display()))? {
        None => Ok(RepairOutcome::AlreadyValid),
        Some(fixed) => {
            FileManager::write_to_file(path, &fixed)?;
            Ok(RepairOutcome::Repaired)
        }
    }
}
