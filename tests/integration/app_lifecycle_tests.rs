/*!
 * Tests for the path from a configuration file to a ready controller
 */

use anyhow::Result;
use std::time::Duration;
use yadtwai::app_config::Config;
use yadtwai::app_controller::Controller;
use yadtwai::errors::AppError;
use yadtwai::partition::BatchSelection;
use yadtwai::translation::TranslationContext;
use crate::common;

const UNSET_VARIABLE: &str = "YADTWAI_TEST_VARIABLE_THAT_IS_NEVER_SET";

/// Providers are built in configured order from inline credentials
#[test]
fn test_fromConfig_withCredentials_shouldKeepProviderOrder() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_config_file(temp_dir.path(), r#"{
        "translation": {
            "providers": [
                {"type": "deepl", "api_key": "key:fx"},
                {"type": "openai", "api_key": "sk-test", "model": "gpt-4o"}
            ],
            "max_chunk_chars": 2000,
            "chunk_delay_ms": 250
        },
        "glossary": [{"source": "AI", "target": "AI"}]
    }"#)?;

    let config = Config::load(&path)?;
    config.validate()?;
    let context = TranslationContext::from_config(&config)?;

    assert_eq!(context.chain.provider_ids(), vec!["deepl", "openai"]);
    assert_eq!(context.max_chunk_chars, 2000);
    assert_eq!(context.chunk_delay, Duration::from_millis(250));
    assert_eq!(context.glossary.len(), 1);
    assert_eq!(context.target_language, "ja");
    Ok(())
}

/// A provider without a credential is skipped silently
#[test]
fn test_fromConfig_withMissingCredential_shouldSkipProvider() -> Result<()> {
    let config: Config = serde_json::from_str(&format!(r#"{{
        "translation": {{
            "providers": [
                {{"type": "openai", "api_key_env": "{}"}},
                {{"type": "deepl", "api_key": "key"}}
            ]
        }}
    }}"#, UNSET_VARIABLE))?;

    let context = TranslationContext::from_config(&config)?;
    assert_eq!(context.chain.provider_ids(), vec!["deepl"]);
    Ok(())
}

/// No usable provider at all is a fatal configuration error
#[test]
fn test_fromConfig_withoutAnyCredential_shouldFail() -> Result<()> {
    let config: Config = serde_json::from_str(&format!(r#"{{
        "translation": {{
            "providers": [
                {{"type": "openai", "api_key_env": "{0}"}},
                {{"type": "deepl", "api_key_env": "{0}"}}
            ]
        }}
    }}"#, UNSET_VARIABLE))?;

    let result = TranslationContext::from_config(&config);
    assert!(matches!(result, Err(AppError::MissingConfiguration(_))));
    assert!(Controller::with_config(&config).is_err());
    Ok(())
}

/// An unreadable glossary file stops the run before any document
#[test]
fn test_fromConfig_withMissingGlossaryFile_shouldFail() -> Result<()> {
    let mut config: Config = serde_json::from_str(
        r#"{"translation": {"providers": [{"type": "deepl", "api_key": "key"}]}}"#,
    )?;
    config.glossary_path = Some("no/such/glossary.json".to_string());

    assert!(matches!(
        TranslationContext::from_config(&config),
        Err(AppError::MissingConfiguration(_))
    ));
    Ok(())
}

/// Document listing applies extensions, exclusions and the batch selection
#[test]
fn test_listDocuments_withConfig_shouldApplyFilters() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "docs/a.md", "a")?;
    common::create_test_file(root, "docs/b.txt", "b")?;
    common::create_test_file(root, "docs/drafts/c.md", "c")?;
    common::create_test_file(root, "docs/d.rst", "d")?;

    let config: Config = serde_json::from_str(
        r#"{"documents": {"extensions": ["md", "txt"], "exclude_patterns": ["**/drafts/**"]}}"#,
    )?;

    let all = Controller::list_documents(root, &config.documents, &BatchSelection::default())?;
    assert_eq!(all, vec![root.join("docs/a.md"), root.join("docs/b.txt")]);

    let mut sharded = Vec::new();
    for current in 0..2 {
        let selection = BatchSelection::new(current, 2)?;
        sharded.extend(Controller::list_documents(root, &config.documents, &selection)?);
    }
    sharded.sort();
    assert_eq!(sharded, all);
    Ok(())
}

/// An out-of-range batch selection is rejected
#[test]
fn test_batchSelection_withCurrentOutOfRange_shouldBeConfigurationError() {
    assert!(matches!(
        BatchSelection::new(5, 2),
        Err(AppError::MissingConfiguration(_))
    ));
}

/// A single file input lands in exactly one of several batches
#[test]
fn test_listDocuments_withSingleFileAndBatches_shouldSelectItOnce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "guide.md", "Guide.\n")?;

    let mut hits = Vec::new();
    for current in 0..4 {
        let selection = BatchSelection::new(current, 4)?;
        let selected = Controller::list_documents(&file, &Config::default().documents, &selection)?;
        if !selected.is_empty() {
            assert_eq!(selected, vec![file.clone()]);
            hits.push(current);
        }
    }

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0], yadtwai::partition::batch_index("guide.md", 4));
    Ok(())
}
