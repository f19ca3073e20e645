use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for target-language handling
///
/// Target languages arrive as ISO 639-1/639-3 codes, optionally with a
/// region suffix (`ja-JP`, `pt_BR`). Providers want different spellings:
/// the chat provider wants a readable name for its prompt, DeepL wants its
/// own upper-case code.

/// ISO 639-2/B codes that differ from their 639-2/T counterpart
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("per", "fas"),
    ("rum", "ron"),
    ("slo", "slk"),
];

/// Split `ja-JP` / `ja_JP` into (`ja`, Some(`JP`))
pub fn split_locale(code: &str) -> (String, Option<String>) {
    let trimmed = code.trim();
    match trimmed.split_once(['-', '_']) {
        Some((primary, region)) if !region.is_empty() => {
            (primary.to_lowercase(), Some(region.to_uppercase()))
        }
        _ => (trimmed.to_lowercase(), None),
    }
}

/// Resolve the primary subtag of a code to an isolang language
fn lookup(code: &str) -> Option<Language> {
    let (primary, _) = split_locale(code);
    match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => {
            let part2t = PART2B_TO_PART2T
                .iter()
                .find(|(b, _)| *b == primary)
                .map(|(_, t)| *t)
                .unwrap_or(primary.as_str());
            Language::from_639_3(part2t)
        }
        _ => None,
    }
}

/// Validate that a code names a known language (region suffix allowed)
pub fn validate_language_code(code: &str) -> Result<()> {
    lookup(code)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Normalize to ISO 639-1 when one exists, otherwise ISO 639-3
pub fn normalize_to_part1(code: &str) -> Result<String> {
    let lang = lookup(code).ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))?;
    Ok(lang
        .to_639_1()
        .map(|c| c.to_string())
        .unwrap_or_else(|| lang.to_639_3().to_string()))
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let lang = lookup(code).ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;
    Ok(lang.to_name().to_string())
}

/// Map a target code onto DeepL's `target_lang` vocabulary.
///
/// Every Japanese variant collapses to `JA`. English and Portuguese need a
/// regional variant, everything else is the upper-cased primary subtag.
pub fn deepl_target_code(code: &str) -> String {
    let (primary, region) = split_locale(code);
    let primary = normalize_to_part1(&primary).unwrap_or(primary);

    match (primary.as_str(), region.as_deref()) {
        ("ja", _) => "JA".to_string(),
        ("en", Some("GB")) => "EN-GB".to_string(),
        ("en", _) => "EN-US".to_string(),
        ("pt", Some("BR")) => "PT-BR".to_string(),
        ("pt", _) => "PT-PT".to_string(),
        ("zh", Some("TW")) | ("zh", Some("HANT")) => "ZH-HANT".to_string(),
        ("zh", _) => "ZH".to_string(),
        (other, _) => other.to_uppercase(),
    }
}
