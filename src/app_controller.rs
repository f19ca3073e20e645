use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::{Config, DocumentConfig};
use crate::file_utils::{DocumentKind, FileManager};
use crate::partition::{self, BatchSelection};
use crate::translation::{DocumentTranslator, TranslationContext};

// @module: Application controller for document processing

/// What happened to a single document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// Translated and written back
    Translated,
    /// Translated, but the result equals the original so nothing was written
    Unchanged,
    /// Its kind is disabled in the configuration
    Skipped,
}

/// Counters for a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub translated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.translated + self.unchanged + self.skipped + self.failed
    }

    fn record(&mut self, outcome: DocumentOutcome) {
        match outcome {
            DocumentOutcome::Translated => self.translated += 1,
            DocumentOutcome::Unchanged => self.unchanged += 1,
            DocumentOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// Main application controller for document translation
pub struct Controller {
    // @field: Shared translation state
    context: TranslationContext,
    // @field: Which documents are handled
    documents: DocumentConfig,
    // @field: Pause between documents
    document_delay: Duration,
}

impl Controller {
    pub fn new(context: TranslationContext, documents: DocumentConfig) -> Self {
        Self {
            context,
            documents,
            document_delay: Duration::ZERO,
        }
    }

    pub fn with_document_delay(mut self, delay: Duration) -> Self {
        self.document_delay = delay;
        self
    }

    // @method: Create a controller from configuration, building the provider chain
    pub fn with_config(config: &Config) -> Result<Self> {
        let context = TranslationContext::from_config(config)?;
        Ok(Self::new(context, config.documents.clone())
            .with_document_delay(Duration::from_millis(config.translation.document_delay_ms)))
    }

    pub fn context(&self) -> &TranslationContext {
        &self.context
    }

    /// Documents under `input` that this run is responsible for, in order
    pub fn collect_documents(&self, input: &Path, selection: &BatchSelection) -> Result<Vec<PathBuf>> {
        Self::list_documents(input, &self.documents, selection)
    }

    /// Documents under `input` selected by `documents` and `selection`.
    ///
    /// A single file skips the extension and exclusion filters but still
    /// belongs to exactly one batch; a directory is searched recursively.
    pub fn list_documents(
        input: &Path,
        documents: &DocumentConfig,
        selection: &BatchSelection,
    ) -> Result<Vec<PathBuf>> {
        if !input.exists() {
            return Err(anyhow::anyhow!("Input path does not exist: {:?}", input));
        }

        if FileManager::file_exists(input) {
            // Hashed by file name, relative to its own directory
            let root = input.parent().unwrap_or_else(|| Path::new(""));
            let selected = partition::partition(vec![input.to_path_buf()], root, selection);
            if selected.is_empty() {
                info!(
                    "Batch {}/{}: {:?} belongs to another batch",
                    selection.current, selection.total, input
                );
            }
            return Ok(selected);
        }

        let found = FileManager::find_documents(input, &documents.extensions, &documents.exclude_patterns)?;
        let found_count = found.len();
        let selected = partition::partition(found, input, selection);

        if !selection.is_everything() {
            info!(
                "Batch {}/{}: {} of {} document(s)",
                selection.current, selection.total, selected.len(), found_count
            );
        }
        Ok(selected)
    }

    /// Translate every document under `input` belonging to `selection`
    pub async fn run(&self, input: &Path, selection: &BatchSelection) -> Result<RunSummary> {
        let documents = self.collect_documents(input, selection)?;
        if documents.is_empty() {
            warn!("No documents found in {:?}", input);
            return Ok(RunSummary::default());
        }
        Ok(self.run_documents(&documents).await)
    }

    /// Process documents one after the other. A failing document is logged
    /// and counted, and never stops the run.
    pub async fn run_documents(&self, documents: &[PathBuf]) -> RunSummary {
        let start_time = Instant::now();
        let mut summary = RunSummary::default();

        let progress = ProgressBar::new(documents.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style.progress_chars("█▓▒░"));

        for (index, path) in documents.iter().enumerate() {
            if index > 0 && !self.document_delay.is_zero() {
                tokio::time::sleep(self.document_delay).await;
            }

            let file_name = path
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            progress.set_message(format!("Processing: {}", file_name));

            match self.process_document(path).await {
                Ok(outcome) => {
                    debug!("{:?}: {:?}", path, outcome);
                    summary.record(outcome);
                }
                Err(e) => {
                    error!("Error processing file {}: {:#}", path.display(), e);
                    summary.failed += 1;
                }
            }
            progress.inc(1);
        }

        progress.finish_with_message("Processing complete");

        info!(
            "Run completed in {}: {} translated, {} unchanged, {} skipped, {} failed",
            Self::format_duration(start_time.elapsed()),
            summary.translated,
            summary.unchanged,
            summary.skipped,
            summary.failed
        );
        summary
    }

    /// Translate one document and write it back if it changed.
    ///
    /// The file is only written after the whole document translated.
    pub async fn process_document(&self, path: &Path) -> Result<DocumentOutcome> {
        let kind = DocumentKind::from_path(path);
        let enabled = match kind {
            DocumentKind::Plain => self.documents.translate_text,
            DocumentKind::Structured => self.documents.translate_json,
        };
        if !enabled {
            return Ok(DocumentOutcome::Skipped);
        }

        let content = FileManager::read_to_string(path)?;
        let mut translator = DocumentTranslator::new(&self.context);
        let translated = match kind {
            DocumentKind::Plain => translator.translate_text(&content).await,
            DocumentKind::Structured => translator.translate_json(&content).await,
        }
        .with_context(|| format!("Document left unmodified: {}", path.display()))?;

        let stats = translator.stats();
        debug!(
            "{}: {} chunk(s), {} retry(ies)",
            path.display(),
            stats.chunks_translated,
            stats.retries
        );

        // Nothing eligible in a JSON document: keep its original formatting
        let nothing_translated = kind == DocumentKind::Structured && stats.leaves_translated == 0;
        if nothing_translated || translated == content {
            return Ok(DocumentOutcome::Unchanged);
        }

        FileManager::write_to_file(path, &translated)?;
        info!("Translated {}", path.display());
        Ok(DocumentOutcome::Translated)
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
