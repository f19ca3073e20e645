/*!
 * JSON tree walking with per-leaf translation eligibility.
 *
 * Only string leaves are ever candidates. Whether a leaf is translated is
 * decided from its own key and value, never from its ancestors. Arrays
 * pass their key down to their elements. The rebuilt tree always has the
 * same keys, key order, array lengths and nesting as the input.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Values at most this long that look like identifiers are left alone
pub const IDENTIFIER_MAX_CHARS: usize = 32;

static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_\-./:]+$").unwrap()
});

/// How keys not named in any list are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InclusionMode {
    /// Translate everything except ignored keys and short identifier-like values
    #[default]
    IncludeExceptIgnored,
    /// Translate only keys listed in `include_keys`
    IncludeOnly,
}

/// Inclusion policy for JSON string leaves
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonPolicy {
    #[serde(default)]
    pub mode: InclusionMode,

    /// Keys whose values are never translated
    #[serde(default)]
    pub ignore_keys: HashSet<String>,

    /// Keys whose values are always translated, overriding everything else
    #[serde(default)]
    pub prefer_keys: HashSet<String>,

    /// Keys translated in `include_only` mode
    #[serde(default)]
    pub include_keys: HashSet<String>,
}

/// Whether a value is restricted to identifier characters
pub fn looks_identifier_like(value: &str) -> bool {
    IDENTIFIER_REGEX.is_match(value)
}

impl JsonPolicy {
    pub fn with_mode(mut self, mode: InclusionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn ignore<I: IntoIterator<Item = S>, S: Into<String>>(mut self, keys: I) -> Self {
        self.ignore_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn prefer<I: IntoIterator<Item = S>, S: Into<String>>(mut self, keys: I) -> Self {
        self.prefer_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn include<I: IntoIterator<Item = S>, S: Into<String>>(mut self, keys: I) -> Self {
        self.include_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Decide whether the string leaf `value` under `key` should be translated
    pub fn should_translate(&self, key: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            return false;
        }
        if self.prefer_keys.contains(key) {
            return true;
        }
        if self.ignore_keys.contains(key) {
            return false;
        }
        match self.mode {
            InclusionMode::IncludeExceptIgnored => {
                !(looks_identifier_like(value) && value.chars().count() <= IDENTIFIER_MAX_CHARS)
            }
            InclusionMode::IncludeOnly => self.include_keys.contains(key),
        }
    }
}

/// Collect eligible string leaves in document order
pub fn collect_eligible(value: &Value, policy: &JsonPolicy) -> Vec<String> {
    let mut found = Vec::new();
    visit(value, "", policy, &mut found);
    found
}

fn visit(value: &Value, key: &str, policy: &JsonPolicy, found: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            if policy.should_translate(key, s) {
                found.push(s.clone());
            }
        }
        Value::Array(items) => {
            for item in items {
                visit(item, key, policy, found);
            }
        }
        Value::Object(map) => {
            for (child_key, child) in map {
                visit(child, child_key, policy, found);
            }
        }
        _ => {}
    }
}

/// Rebuild `value`, replacing every eligible string leaf with `f(leaf)`.
///
/// Leaves are visited in the same order as `collect_eligible`.
pub fn map_eligible<F>(value: Value, key: &str, policy: &JsonPolicy, f: &mut F) -> Value
where
    F: FnMut(&str) -> String,
{
    match value {
        Value::String(s) => {
            if policy.should_translate(key, &s) {
                Value::String(f(&s))
            } else {
                Value::String(s)
            }
        }
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(map_eligible(item, key, policy, f));
            }
            Value::Array(out)
        }
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (child_key, child) in map {
                let mapped = map_eligible(child, &child_key, policy, f);
                out.insert(child_key, mapped);
            }
            Value::Object(out)
        }
        other => other,
    }
}
