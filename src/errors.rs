/*!
 * Error types for the backtranslate application.
 *
 * This module contains custom error types for the different layers of the
 * application, using the thiserror crate for ergonomic error definitions.
 * Translation errors are data for the cycle executor (they end up in the
 * output pool), while pool and cycle errors drive control flow.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Marker written in front of a backend configuration failure in the output pool
pub const BACKEND_CONFIG_ERROR_MARKER: &str = "BACKEND_CONFIG_ERROR:";

/// Marker written in front of any other translation failure in the output pool
pub const TRANSLATION_ERROR_MARKER: &str = "TRANSLATION_ERROR:";

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The API answered but carried no usable text
    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The backend could not be set up (client construction, credentials)
    #[error("Backend configuration error: {0}")]
    BackendConfig(String),

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl TranslationError {
    /// Whether this failure stems from backend configuration rather than a single request
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::BackendConfig(_) | Self::Provider(ProviderError::AuthenticationError(_))
        )
    }

    /// Human-readable text written into the output pool in place of a translation
    pub fn diagnostic(&self) -> String {
        let marker = if self.is_config_error() {
            BACKEND_CONFIG_ERROR_MARKER
        } else {
            TRANSLATION_ERROR_MARKER
        };
        format!("{} {}", marker, self)
    }
}

/// Errors raised by the directory-backed file pool
#[derive(Error, Debug)]
pub enum PoolError {
    /// The pool directory is missing or holds no regular files
    #[error("No files found in pool directory: {}", .0.display())]
    Empty(PathBuf),

    /// Any other filesystem failure while operating on the pool
    #[error("Pool I/O error on {}: {source}", path.display())]
    Io {
        /// Path that was being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl PoolError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors that escape a single translation cycle
#[derive(Error, Debug)]
pub enum CycleError {
    /// No pending work in the direction's input pool
    #[error("Pool exhausted: {}", .0.display())]
    EmptyPool(PathBuf),

    /// Unexpected pool failure (reading the input or writing the output)
    #[error("Pool error: {0}")]
    Pool(PoolError),
}

impl CycleError {
    /// Whether the cycle stopped because there was nothing left to process
    pub fn is_pool_exhausted(&self) -> bool {
        matches!(self, Self::EmptyPool(_))
    }
}

impl From<PoolError> for CycleError {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Empty(dir) => Self::EmptyPool(dir),
            other => Self::Pool(other),
        }
    }
}

/// Application-level errors surfaced by the binary
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or unresolvable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error escaping a translation cycle
    #[error("Cycle error: {0}")]
    Cycle(#[from] CycleError),
}
