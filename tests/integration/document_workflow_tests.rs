/*!
 * End-to-end document processing tests with mock providers
 */

use anyhow::Result;
use std::fs;
use std::time::Duration;
use yadtwai::app_config::DocumentConfig;
use yadtwai::app_controller::{Controller, DocumentOutcome, RunSummary};
use yadtwai::partition::BatchSelection;
use yadtwai::providers::mock::{MockProvider, MockReply};
use yadtwai::translation::BackoffPolicy;
use crate::common;

/// A document whose providers are all exhausted is left untouched and the
/// run carries on with the next one
#[tokio::test]
async fn test_run_withExhaustedProviders_shouldLeaveDocumentAndContinue() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let first = common::create_test_file(root, "a.md", "First document.\n")?;
    let second = common::create_test_file(root, "b.md", "Second document.\n")?;

    let openai = MockProvider::scripted("openai", vec![MockReply::Status(500), MockReply::Status(500)])
        .with_backoff(BackoffPolicy::immediate(2));
    let deepl = MockProvider::failing("deepl", 456);
    let controller = common::mock_controller(&[openai.clone(), deepl.clone()]);

    let summary = controller.run(root, &BatchSelection::default()).await?;

    assert_eq!(summary, RunSummary { translated: 1, unchanged: 0, skipped: 0, failed: 1 });
    assert_eq!(fs::read_to_string(&first)?, "First document.\n");
    assert_eq!(fs::read_to_string(&second)?, "[ja] Second document.\n");
    assert_eq!(openai.request_count(), 3);
    assert_eq!(deepl.request_count(), 1);
    Ok(())
}

/// A failure in a later chunk keeps the whole document unmodified
#[tokio::test]
async fn test_processDocument_withLateChunkFailure_shouldNotWritePartialResult() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original = "one paragraph\n\ntwo paragraph\n";
    let path = common::create_test_file(temp_dir.path(), "doc.md", original)?;

    let provider = MockProvider::new(
        "openai",
        vec![MockReply::Translate],
        MockReply::Status(400),
    );
    let controller = Controller::new(
        common::mock_context(&[provider]).with_max_chunk_chars(14),
        DocumentConfig::default(),
    );

    assert!(controller.process_document(&path).await.is_err());
    assert_eq!(fs::read_to_string(&path)?, original);
    Ok(())
}

/// JSON documents are rewritten pretty-printed with identifiers kept
#[tokio::test]
async fn test_processDocument_withJson_shouldRewriteEligibleValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "tool.json",
        r#"{"name":"foo-bar","description":"Lists every file in the workspace."}"#,
    )?;
    let controller = common::mock_controller(&[MockProvider::working("openai")]);

    assert_eq!(controller.process_document(&path).await?, DocumentOutcome::Translated);
    assert_eq!(
        fs::read_to_string(&path)?,
        "{\n  \"name\": \"foo-bar\",\n  \"description\": \"[ja] Lists every file in the workspace.\"\n}\n"
    );
    Ok(())
}

/// Malformed JSON fails the document without touching it
#[tokio::test]
async fn test_processDocument_withMalformedJson_shouldFailWithoutWriting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let broken = r#"{"description": "Use "plan" mode"}"#;
    let path = common::create_test_file(temp_dir.path(), "tool.json", broken)?;
    let provider = MockProvider::working("openai");
    let controller = common::mock_controller(&[provider.clone()]);

    assert!(controller.process_document(&path).await.is_err());
    assert_eq!(fs::read_to_string(&path)?, broken);
    assert_eq!(provider.request_count(), 0);
    Ok(())
}

/// Identical output is reported as unchanged
#[tokio::test]
async fn test_processDocument_withIdenticalTranslation_shouldReportUnchanged() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "same.txt", "Tokyo\n")?;
    let provider = MockProvider::working("deepl").with_custom_response(|text, _| text.to_string());
    let controller = common::mock_controller(&[provider]);

    assert_eq!(controller.process_document(&path).await?, DocumentOutcome::Unchanged);
    Ok(())
}

/// A JSON document without eligible strings keeps its original bytes
#[tokio::test]
async fn test_processDocument_withJsonWithoutProse_shouldNotRewrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let compact = r#"{"name":"foo-bar","count":3,"tags":["a-b","c_d"]}"#;
    let path = common::create_test_file(temp_dir.path(), "ids.json", compact)?;
    let provider = MockProvider::working("openai");
    let controller = common::mock_controller(&[provider.clone()]);

    assert_eq!(controller.process_document(&path).await?, DocumentOutcome::Unchanged);
    assert_eq!(fs::read_to_string(&path)?, compact);
    assert_eq!(provider.request_count(), 0);
    Ok(())
}

/// Disabled document kinds are skipped without provider calls
#[tokio::test]
async fn test_run_withJsonDisabled_shouldSkipJsonDocuments() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "guide.md", "Guide text.\n")?;
    let json = common::create_test_file(root, "data.json", r#"{"title": "Some title text"}"#)?;

    let provider = MockProvider::working("openai");
    let documents = DocumentConfig { translate_json: false, ..DocumentConfig::default() };
    let controller = Controller::new(common::mock_context(&[provider.clone()]), documents);

    let summary = controller.run(root, &BatchSelection::default()).await?;

    assert_eq!(summary.translated, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(fs::read_to_string(&json)?, r#"{"title": "Some title text"}"#);
    assert_eq!(provider.request_count(), 1);
    Ok(())
}

/// Independent batch runs together translate each document exactly once
#[tokio::test]
async fn test_run_withBatches_shouldTranslateEachDocumentOnce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    for i in 0..12 {
        common::create_test_file(root, &format!("docs/page-{}.md", i), &format!("Page {}\n", i))?;
    }

    let mut translated = 0;
    for current in 0..3 {
        let controller = common::mock_controller(&[MockProvider::working("openai")]);
        let summary = controller.run(root, &BatchSelection::new(current, 3)?).await?;
        assert_eq!(summary.failed, 0);
        translated += summary.translated;
    }

    assert_eq!(translated, 12);
    for i in 0..12 {
        let content = fs::read_to_string(root.join(format!("docs/page-{}.md", i)))?;
        assert_eq!(content, format!("[ja] Page {}\n", i));
    }
    Ok(())
}

/// Documents are spaced by the document delay, the first one starts at once
#[tokio::test(start_paused = true)]
async fn test_run_withDocumentDelay_shouldPauseBetweenDocuments() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "a.md", "First.\n")?;
    common::create_test_file(root, "b.md", "Second.\n")?;
    let controller = common::mock_controller(&[MockProvider::working("openai")])
        .with_document_delay(Duration::from_secs(1));

    let start = tokio::time::Instant::now();
    let summary = controller.run(root, &BatchSelection::default()).await?;
    let elapsed = start.elapsed();

    assert_eq!(summary.translated, 2);
    assert!(elapsed >= Duration::from_secs(1), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(2), "elapsed {:?}", elapsed);
    Ok(())
}

/// A single file input is processed on its own
#[tokio::test]
async fn test_run_withSingleFile_shouldProcessOnlyThatFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = common::create_test_file(temp_dir.path(), "one.md", "One.\n")?;
    let other = common::create_test_file(temp_dir.path(), "two.md", "Two.\n")?;
    let controller = common::mock_controller(&[MockProvider::working("openai")]);

    let summary = controller.run(&target, &BatchSelection::default()).await?;

    assert_eq!(summary.translated, 1);
    assert_eq!(fs::read_to_string(&other)?, "Two.\n");
    Ok(())
}

/// A missing input path is an error
#[test]
fn test_run_withMissingInput_shouldFail() {
    let controller = common::mock_controller(&[MockProvider::working("openai")]);
    let result = tokio_test::block_on(
        controller.run(std::path::Path::new("no/such/dir"), &BatchSelection::default()),
    );
    assert!(result.is_err());
}
