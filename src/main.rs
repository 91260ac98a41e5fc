// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{LevelFilter, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use backtranslate::app_config::{self, Config, TranslationDirection, TranslationProvider};
use backtranslate::app_controller::{Controller, StopReason};
use backtranslate::errors::AppError;
use backtranslate::logging::{self, CustomLogger};
use backtranslate::translation::TranslationService;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "openrouter")]
    OpenRouter,
    Gemini,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::OpenRouter => TranslationProvider::OpenRouter,
            CliTranslationProvider::Gemini => TranslationProvider::Gemini,
        }
    }
}

/// CLI Wrapper for TranslationDirection to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationDirection {
    #[value(name = "en_to_fr")]
    EnToFr,
    #[value(name = "fr_to_en")]
    FrToEn,
}

impl From<CliTranslationDirection> for TranslationDirection {
    fn from(cli_direction: CliTranslationDirection) -> Self {
        match cli_direction {
            CliTranslationDirection::EnToFr => TranslationDirection::EnToFr,
            CliTranslationDirection::FrToEn => TranslationDirection::FrToEn,
        }
    }
}

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for backtranslate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// backtranslate - iterative English/French back-translation
///
/// Picks files from directory pools, translates them with an LLM provider and
/// alternates the translation direction every cycle.
#[derive(Parser, Debug)]
#[command(name = "backtranslate")]
#[command(version)]
#[command(about = "Iterative back-translation over directory pools")]
#[command(long_about = "backtranslate runs translation cycles over directory pools, alternating
between English→French and French→English.

EXAMPLES:
    backtranslate                                  # One cycle using conf.json
    backtranslate --cycles 10                      # Ten cycles, alternating direction
    backtranslate --translation-type fr_to_en      # Start from the French pool
    backtranslate -p gemini -m gemini-2.5-flash    # Use a specific provider and model
    backtranslate completions bash > backtranslate.bash

POOLS (under --pooling-dir):
    input_pool  -> french_pool  (en_to_fr, originals to input_pool_completed)
    french_pool -> output_pool  (fr_to_en, originals to french_pool_completed)

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created. API keys come from OPENROUTER_API_KEY or
    GEMINI_API_KEY/GOOGLE_API_KEY, else from ~/.api-<provider>.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Number of cycles to run; zero or negative runs none
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    cycles: Option<i64>,

    /// Direction of the first cycle
    #[arg(short = 't', long, value_enum)]
    translation_type: Option<CliTranslationDirection>,

    /// Root directory of the pools
    #[arg(long)]
    pooling_dir: Option<PathBuf>,

    /// Log directory, relative to the local base directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "BACKTRANSLATE_CONFIG", default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the configuration says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "backtranslate", &mut std::io::stdout());
        return Ok(());
    }

    run_cycles(cli).await
}

async fn run_cycles(options: CommandLineOptions) -> Result<()> {
    let config = load_config(&options)?;
    logging::set_level(config.log_level.to_level_filter());

    let log_file = config.log_filepath();
    logging::attach_log_file(&log_file).with_context(|| format!("Failed to open log file: {:?}", log_file))?;

    let credentials = config
        .resolve_credentials()
        .context("Failed to resolve provider credentials")?;
    info!(
        "Using {} with model {} (pools under {:?})",
        config.translation.provider, credentials.model, config.pooling_dir
    );

    let service = Arc::new(TranslationService::new(&config.translation, credentials));
    if let Err(e) = service.test_connection().await {
        warn!("Connection check failed, continuing anyway: {}", e);
    }
    let controller = Controller::new(&config, service);

    let cancel = controller.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current cycle");
            cancel.cancel();
        }
    });

    let summary = controller.run().await;
    match summary.stop_reason {
        StopReason::Completed | StopReason::PoolExhausted(_) | StopReason::Cancelled => Ok(()),
        StopReason::Failed(e) => {
            error!("Run aborted after {} cycle(s)", summary.cycles_completed);
            Err(AppError::from(e)).context("Translation run failed")
        }
    }
}

/// Load the config file, or write a default one when missing, then apply CLI overrides
fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let config_path = Path::new(&options.config_path);
    let mut config = if config_path.exists() {
        Config::load(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", options.config_path);
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    if let Some(cycles) = options.cycles {
        config.cycles = cycles;
    }
    if let Some(direction) = &options.translation_type {
        config.initial_direction = direction.clone().into();
    }
    if let Some(pooling_dir) = &options.pooling_dir {
        config.pooling_dir = pooling_dir.clone();
    }
    if let Some(log_dir) = &options.log_dir {
        config.log_dir = log_dir.clone();
    }
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        config.translation.model_name = Some(model.clone());
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}
