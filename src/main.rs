// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use yadtwai::app_config::{self, Config};
use yadtwai::app_controller::Controller;
use yadtwai::json_repair::{self, RepairOutcome};
use yadtwai::partition::BatchSelection;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate documents in place (default command)
    Translate {
        /// Document or directory to process
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        #[command(flatten)]
        options: TranslateOptions,
    },

    /// Escape stray quotes in the first "description" value of a JSON file
    RepairJson {
        /// JSON file to repair in place
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Generate shell completions for yadtwai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct TranslateOptions {
    /// Target language code (e.g., 'ja', 'fr', 'pt-BR')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Index of the batch handled by this run
    #[arg(long, env = "BATCH_CURRENT", default_value_t = 0)]
    batch_current: usize,

    /// Number of batches the document set is split into
    #[arg(long, env = "BATCH_TOTAL", default_value_t = 1)]
    batch_total: usize,

    /// List the documents of this batch without translating them
    #[arg(long)]
    dry_run: bool,
}

/// YADTwAI - Yet Another Document Translator with AI
///
/// Translates markdown, text and JSON documents in place while leaving
/// fenced code and identifiers untouched.
#[derive(Parser, Debug)]
#[command(name = "yadtwai")]
#[command(version)]
#[command(about = "AI-powered document translation tool")]
#[command(long_about = "YADTwAI translates documentation and JSON resources in place using OpenAI and DeepL with automatic fallback.

EXAMPLES:
    yadtwai docs/                               # Translate using conf.json
    yadtwai -t fr docs/                         # Translate into French
    yadtwai --dry-run docs/                     # List documents without translating
    BATCH_TOTAL=4 BATCH_CURRENT=2 yadtwai docs/ # Handle one quarter of the files
    yadtwai repair-json tools.json              # Fix raw quotes in a description
    yadtwai completions bash > yadtwai.bash     # Generate bash completions

CREDENTIALS:
    openai - OPENAI_API_KEY (or api_key / api_key_env in conf.json)
    deepl  - DEEPL_API_KEY  (free keys ending in :fx use the free endpoint)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Document or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    options: TranslateOptions,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The boxed logger accepts everything; the global max level filters
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info by default, refined once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "yadtwai", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::RepairJson { file }) => run_repair(&file),
        Some(Commands::Translate { input_path, options }) => run_translate(&input_path, options).await,
        None => {
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;
            run_translate(&input_path, cli.options).await
        }
    }
}

fn run_repair(file: &Path) -> Result<()> {
    match json_repair::repair_file(file)? {
        RepairOutcome::AlreadyValid => info!("Already valid: {}", file.display()),
        RepairOutcome::Repaired => info!("Repaired: {}", file.display()),
    }
    Ok(())
}

async fn run_translate(input_path: &Path, options: TranslateOptions) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let mut config = Config::load(&options.config_path)?;

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate()
        .context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let selection = BatchSelection::new(options.batch_current, options.batch_total)?;

    if options.dry_run {
        // Listing does not need provider credentials
        let documents = Controller::list_documents(input_path, &config.documents, &selection)?;
        for document in &documents {
            println!("{}", document.display());
        }
        info!("{} document(s) selected", documents.len());
        return Ok(());
    }

    let controller = Controller::with_config(&config)?;
    let summary = controller.run(input_path, &selection).await?;

    if summary.failed > 0 {
        warn!("{} document(s) could not be translated and were left unmodified", summary.failed);
    }
    Ok(())
}
