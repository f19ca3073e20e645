/*!
 * Common test utilities for the yadtwai test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use yadtwai::app_config::DocumentConfig;
use yadtwai::app_controller::Controller;
use yadtwai::providers::Provider;
use yadtwai::providers::mock::MockProvider;
use yadtwai::translation::{FallbackChain, TranslationContext};

/// Routes library logs through env_logger (RUST_LOG) once per test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory,
/// creating parent directories as needed
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds a Japanese translation context over the given mock providers
pub fn mock_context(providers: &[MockProvider]) -> TranslationContext {
    let chain = FallbackChain::new(
        providers
            .iter()
            .cloned()
            .map(|p| Arc::new(p) as Arc<dyn Provider>)
            .collect(),
    );
    TranslationContext::new("ja", chain)
}

/// Builds a controller with default document settings and no pacing
pub fn mock_controller(providers: &[MockProvider]) -> Controller {
    Controller::new(mock_context(providers), DocumentConfig::default())
}

/// Writes a minimal config file with inline credentials
pub fn create_config_file(dir: &Path, body: &str) -> Result<PathBuf> {
    create_test_file(dir, "conf.json", body)
}
