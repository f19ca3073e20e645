/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use std::str::FromStr;
use std::time::Duration;
use yadtwai::app_config::{Config, LogLevel, ProviderConfig, ProviderKind};
use yadtwai::errors::AppError;
use yadtwai::translation::json_walker::InclusionMode;
use crate::common;

/// Test that an empty config object picks up every default
#[test]
fn test_config_withEmptyObject_shouldUseDefaults() -> Result<()> {
    let config: Config = serde_json::from_str("{}")?;

    assert_eq!(config.target_language, "ja");
    assert_eq!(config.translation.max_chunk_chars, 4000);
    assert_eq!(config.translation.chunk_delay_ms, 500);
    assert_eq!(config.translation.document_delay_ms, 1000);
    assert_eq!(config.translation.providers.len(), 2);
    assert_eq!(config.translation.providers[0].provider_type, ProviderKind::OpenAI);
    assert_eq!(config.translation.providers[1].provider_type, ProviderKind::DeepL);
    assert_eq!(config.documents.extensions, vec!["md", "markdown", "txt", "json"]);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
    Ok(())
}

/// Test that a full config file is read with its values
#[test]
fn test_load_withFullConfig_shouldReadAllSections() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_config_file(temp_dir.path(), r#"{
        "target_language": "fr",
        "log_level": "debug",
        "translation": {
            "providers": [
                {"type": "deepl", "api_key": "abc:fx", "retry": {"max_attempts": 2, "base_delay_ms": 10, "growth": "linear", "max_delay_ms": 15}}
            ],
            "max_chunk_chars": 1200
        },
        "documents": {"translate_json": false, "exclude_patterns": ["**/vendor/**"]},
        "json": {"mode": "include_only", "include_keys": ["description"]},
        "glossary": [{"source": "AI", "target": "IA"}]
    }"#)?;

    let config = Config::load(&path)?;

    assert_eq!(config.target_language, "fr");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.translation.max_chunk_chars, 1200);
    assert!(!config.documents.translate_json);
    assert!(config.documents.translate_text);
    assert_eq!(config.json.mode, InclusionMode::IncludeOnly);
    assert!(config.json.include_keys.contains("description"));
    assert_eq!(config.glossary.len(), 1);

    let deepl = &config.translation.providers[0];
    assert_eq!(deepl.resolve_api_key().as_deref(), Some("abc:fx"));
    let policy = deepl.backoff_policy();
    assert_eq!(policy.max_attempts, 2);
    assert_eq!(policy.delay_for_retry(1), Duration::from_millis(10));
    assert_eq!(policy.delay_for_retry(2), Duration::from_millis(15));
    Ok(())
}

/// Test that a missing config file is a fatal configuration error
#[test]
fn test_load_withMissingFile_shouldReturnMissingConfiguration() {
    let error = Config::load("definitely/not/here/conf.json").unwrap_err();
    assert!(matches!(
        error.downcast_ref::<AppError>(),
        Some(AppError::MissingConfiguration(_))
    ));
}

/// Test that invalid JSON is reported rather than replaced by defaults
#[test]
fn test_load_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_config_file(temp_dir.path(), "{ not json")?;
    assert!(Config::load(&path).is_err());
    Ok(())
}

/// Test validation failures
#[test]
fn test_validate_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    config.target_language = "xx-invalid".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.translation.providers.clear();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.translation.max_chunk_chars = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.translation.providers[0].endpoint = "not a url".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.documents.translate_text = false;
    config.documents.translate_json = false;
    assert!(config.validate().is_err());
}

/// Test default retry policies per provider
#[test]
fn test_defaultRetry_shouldDifferPerProvider() {
    let openai = ProviderConfig::new(ProviderKind::OpenAI).backoff_policy();
    assert_eq!(openai.max_attempts, 5);
    assert_eq!(openai.delay_for_retry(1), Duration::from_secs(2));
    assert_eq!(openai.delay_for_retry(3), Duration::from_secs(8));

    let deepl = ProviderConfig::new(ProviderKind::DeepL).backoff_policy();
    assert_eq!(deepl.max_attempts, 3);
    assert_eq!(deepl.delay_for_retry(1), Duration::from_secs(5));
    assert_eq!(deepl.delay_for_retry(2), Duration::from_secs(10));
}

/// Test credential resolution through a named environment variable
#[test]
fn test_resolveApiKey_withUnsetVariable_shouldReturnNone() {
    let mut provider = ProviderConfig::new(ProviderKind::OpenAI);
    provider.api_key_env = Some("YADTWAI_TEST_VARIABLE_THAT_IS_NEVER_SET".to_string());
    assert_eq!(provider.resolve_api_key(), None);

    provider.api_key = "  sk-inline  ".to_string();
    assert_eq!(provider.resolve_api_key().as_deref(), Some("sk-inline"));
}

/// Test provider defaults for model and endpoint
#[test]
fn test_providerConfig_withEmptyFields_shouldUseDefaults() -> Result<()> {
    let provider: ProviderConfig = serde_json::from_str(r#"{"type": "openai"}"#)?;
    assert_eq!(provider.get_model(), "gpt-4o-mini");
    assert_eq!(provider.get_endpoint(), "https://api.openai.com/v1");

    let deepl: ProviderConfig = serde_json::from_str(r#"{"type": "deepl"}"#)?;
    assert_eq!(deepl.get_endpoint(), "");
    Ok(())
}

/// Test provider kind parsing and display
#[test]
fn test_providerKind_fromStrAndDisplay_shouldRoundTrip() -> Result<()> {
    assert_eq!(ProviderKind::from_str("DeepL")?, ProviderKind::DeepL);
    assert_eq!(ProviderKind::OpenAI.to_string(), "openai");
    assert!(ProviderKind::from_str("ollama").is_err());
    Ok(())
}

/// Test glossary loading merges the file after inline entries
#[test]
fn test_loadGlossary_withFile_shouldMergeAndSort() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let glossary_file = common::create_test_file(
        temp_dir.path(),
        "glossary.json",
        r#"{"AI Agent": "AIエージェント", "AI": "人工知能"}"#,
    )?;

    let mut config = Config::default();
    config.glossary = vec![yadtwai::translation::GlossaryEntry::new("LLM", "大規模言語モデル")];
    config.glossary_path = Some(glossary_file.to_string_lossy().to_string());

    let glossary = config.load_glossary()?;
    let sources: Vec<&str> = glossary.entries().iter().map(|e| e.source.as_str()).collect();
    assert_eq!(sources, vec!["AI Agent", "LLM", "AI"]);
    Ok(())
}
