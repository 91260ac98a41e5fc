use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::AppError;
use crate::rate_limiter::RateLimitConfig;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and resolving provider credentials once at startup.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Number of back-translation cycles to attempt
    #[serde(default = "default_cycles")]
    pub cycles: i64,

    /// Direction of the first cycle
    #[serde(default)]
    pub initial_direction: TranslationDirection,

    /// Root directory holding the pools
    #[serde(default = "default_pooling_dir")]
    pub pooling_dir: PathBuf,

    /// Log directory, relative to `local_base_dir`
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Base directory for local artifacts such as logs
    #[serde(default = "default_local_base_dir")]
    pub local_base_dir: PathBuf,

    /// Translation provider and model settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Direction of a single translation cycle
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TranslationDirection {
    /// English to French
    #[default]
    EnToFr,
    /// French to English
    FrToEn,
}

impl TranslationDirection {
    /// ISO 639-1 code of the language translated from
    pub fn source_language(&self) -> &'static str {
        match self {
            Self::EnToFr => "en",
            Self::FrToEn => "fr",
        }
    }

    /// ISO 639-1 code of the language translated into
    pub fn target_language(&self) -> &'static str {
        match self {
            Self::EnToFr => "fr",
            Self::FrToEn => "en",
        }
    }

    /// The other direction
    pub fn flipped(&self) -> Self {
        match self {
            Self::EnToFr => Self::FrToEn,
            Self::FrToEn => Self::EnToFr,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnToFr => "en_to_fr",
            Self::FrToEn => "fr_to_en",
        }
    }
}

impl std::fmt::Display for TranslationDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TranslationDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en_to_fr" => Ok(Self::EnToFr),
            "fr_to_en" => Ok(Self::FrToEn),
            _ => Err(anyhow!("Invalid translation type: {}", s)),
        }
    }
}

/// Directory layout of the pools under a pooling root
///
/// The layout is asymmetric: the French pool is both the output of
/// `en_to_fr` and the input of `fr_to_en`, while `fr_to_en` writes to a
/// separate output pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolLayout {
    root: PathBuf,
}

impl PoolLayout {
    pub const INPUT_POOL: &'static str = "input_pool";
    pub const FRENCH_POOL: &'static str = "french_pool";
    pub const OUTPUT_POOL: &'static str = "output_pool";
    const COMPLETED_SUFFIX: &'static str = "_completed";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // @returns: Name of the pool a direction reads from
    fn input_pool_name(direction: TranslationDirection) -> &'static str {
        match direction {
            TranslationDirection::EnToFr => Self::INPUT_POOL,
            TranslationDirection::FrToEn => Self::FRENCH_POOL,
        }
    }

    /// Pool the direction picks pending files from
    pub fn input_dir(&self, direction: TranslationDirection) -> PathBuf {
        self.root.join(Self::input_pool_name(direction))
    }

    /// Pool the direction writes translations into
    pub fn output_dir(&self, direction: TranslationDirection) -> PathBuf {
        let output_pool = match direction {
            TranslationDirection::EnToFr => Self::FRENCH_POOL,
            TranslationDirection::FrToEn => Self::OUTPUT_POOL,
        };
        self.root.join(output_pool)
    }

    /// Pool the direction moves processed originals into
    pub fn completed_dir(&self, direction: TranslationDirection) -> PathBuf {
        self.root.join(format!(
            "{}{}",
            Self::input_pool_name(direction),
            Self::COMPLETED_SUFFIX
        ))
    }
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: OpenRouter chat completions
    #[default]
    OpenRouter,
    // @provider: Google Gemini
    Gemini,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenRouter => "OpenRouter",
            Self::Gemini => "Gemini",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenRouter => "openrouter".to_string(),
            Self::Gemini => "gemini".to_string(),
        }
    }

    // @returns: Environment variables consulted for the API key, in order
    pub fn api_key_env_vars(&self) -> &'static [&'static str] {
        match self {
            Self::OpenRouter => &["OPENROUTER_API_KEY"],
            Self::Gemini => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
        }
    }

    // @returns: Dotfile in the home directory holding the model override
    pub fn model_file_name(&self) -> String {
        format!(".model-{}", self.to_lowercase_string())
    }

    // @returns: Dotfile in the home directory holding the API key
    pub fn api_key_file_name(&self) -> String {
        format!(".api-{}", self.to_lowercase_string())
    }

    pub fn default_model(&self) -> String {
        match self {
            Self::OpenRouter => default_openrouter_model(),
            Self::Gemini => default_gemini_model(),
        }
    }

    pub fn default_endpoint(&self) -> String {
        match self {
            Self::OpenRouter => default_openrouter_endpoint(),
            Self::Gemini => default_gemini_endpoint(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openrouter" => Ok(Self::OpenRouter),
            "gemini" => Ok(Self::Gemini),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Model override applying to any provider
    #[serde(default)]
    pub model_name: Option<String>,

    /// Gemini model used when no explicit or dotfile model is set
    #[serde(default = "default_gemini_model")]
    pub gemini_model_name: String,

    /// API key file; defaults to `~/.api-<provider>`
    #[serde(default)]
    pub api_key_path: Option<PathBuf>,

    /// Service endpoint URL; empty means the provider default
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Temperature parameter for text generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum number of tokens to generate per request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Client-side request rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            model_name: None,
            gemini_model_name: default_gemini_model(),
            api_key_path: None,
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Credentials and model resolved once at startup
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub api_key: String,
    pub model: String,
}

// Keep the key out of logs
impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_cycles() -> i64 {
    1
}

fn default_pooling_dir() -> PathBuf {
    PathBuf::from("./data/pooling")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}

fn default_local_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.1 // Low temperature for consistent translations
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_openrouter_model() -> String {
    "deepseek/deepseek-chat-v3-0324:free".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_openrouter_endpoint() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// Name of the log file inside the log directory
pub const LOG_FILE_NAME: &str = "backtranslate.log";

// @returns: Trimmed file content if the file exists and is not blank
fn read_trimmed(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(content) => {
            let content = content.trim();
            (!content.is_empty()).then(|| content.to_string())
        }
        Err(e) => {
            debug!("Failed to read {:?}: {}", path, e);
            None
        }
    }
}

impl Config {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Write this configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.pooling_dir.as_os_str().is_empty() {
            return Err(anyhow!("Pooling directory cannot be empty"));
        }
        if self.log_dir.as_os_str().is_empty() {
            return Err(anyhow!("Log directory cannot be empty"));
        }
        if self.translation.timeout_secs == 0 {
            return Err(anyhow!("Request timeout must be greater than zero"));
        }
        if !(0.0..=2.0).contains(&self.translation.temperature) {
            return Err(anyhow!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.translation.temperature
            ));
        }
        Ok(())
    }

    /// Pool layout under the configured pooling directory
    pub fn pool_layout(&self) -> PoolLayout {
        PoolLayout::new(&self.pooling_dir)
    }

    /// Directory holding the log file
    pub fn log_dir_path(&self) -> PathBuf {
        self.local_base_dir.join(&self.log_dir)
    }

    /// Path of the append-only log file
    pub fn log_filepath(&self) -> PathBuf {
        self.log_dir_path().join(LOG_FILE_NAME)
    }

    /// Resolve the model name against the user's home directory
    pub fn resolve_model_name(&self) -> String {
        self.resolve_model_name_in(dirs::home_dir().as_deref())
    }

    /// Resolve the model name
    ///
    /// Order: explicit model, `<home>/.model-<provider>`, the Gemini
    /// model setting when the provider is Gemini, then the provider default.
    pub fn resolve_model_name_in(&self, home: Option<&Path>) -> String {
        let translation = &self.translation;

        if let Some(model) = translation.model_name.as_deref().map(str::trim) {
            if !model.is_empty() {
                return model.to_string();
            }
        }

        if let Some(home) = home {
            let model_file = home.join(translation.provider.model_file_name());
            if let Some(model) = read_trimmed(&model_file) {
                debug!("Model name loaded from {:?}", model_file);
                return model;
            }
        }

        if translation.provider == TranslationProvider::Gemini {
            let gemini_model = translation.gemini_model_name.trim();
            if !gemini_model.is_empty() {
                return gemini_model.to_string();
            }
        }

        translation.provider.default_model()
    }

    /// Resolve the API key from the process environment and home directory
    pub fn resolve_api_key(&self) -> Result<String, AppError> {
        self.resolve_api_key_with(|name| std::env::var(name).ok(), dirs::home_dir().as_deref())
    }

    /// Resolve the API key
    ///
    /// Order: the provider's environment variables, then the configured key
    /// file or `<home>/.api-<provider>`.
    pub fn resolve_api_key_with<F>(&self, env: F, home: Option<&Path>) -> Result<String, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = self.translation.provider;

        for var in provider.api_key_env_vars() {
            if let Some(key) = env(var) {
                let key = key.trim();
                if !key.is_empty() {
                    info!("{} API key loaded from environment variable {}", provider.display_name(), var);
                    return Ok(key.to_string());
                }
            }
        }

        let key_path = match &self.translation.api_key_path {
            Some(path) => expand_home(path, home),
            None => home
                .map(|h| h.join(provider.api_key_file_name()))
                .ok_or_else(|| AppError::Config("Home directory not found and no API key path configured".to_string()))?,
        };
        info!("Attempting to load {} API key from: {:?}", provider.display_name(), key_path);

        if !key_path.exists() {
            return Err(AppError::Config(format!(
                "API key not found in environment ({}) and file not found at {:?}",
                provider.api_key_env_vars().join(", "),
                key_path
            )));
        }

        let content = fs::read_to_string(&key_path)
            .map_err(|e| AppError::Config(format!("Cannot read API key file {:?}: {}", key_path, e)))?;
        let key = content.trim();
        if key.is_empty() {
            return Err(AppError::Config(format!("API key file is empty: {:?}", key_path)));
        }

        info!("{} API key loaded successfully from file", provider.display_name());
        Ok(key.to_string())
    }

    /// Resolve credentials and model for the configured provider
    pub fn resolve_credentials(&self) -> Result<ProviderCredentials, AppError> {
        Ok(ProviderCredentials {
            api_key: self.resolve_api_key()?,
            model: self.resolve_model_name(),
        })
    }
}

// @returns: Path with a leading `~` replaced by the home directory
fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            cycles: default_cycles(),
            initial_direction: TranslationDirection::default(),
            pooling_dir: default_pooling_dir(),
            log_dir: default_log_dir(),
            local_base_dir: default_local_base_dir(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if !self.endpoint.trim().is_empty() {
            return self.endpoint.trim().to_string();
        }
        self.provider.default_endpoint()
    }
}
