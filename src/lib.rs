/*!
 * # backtranslate - iterative back-translation over directory pools
 *
 * Repeatedly translates pooled text files between English and French with a
 * remote LLM, alternating direction every cycle, and moves each file through
 * a pending / output / completed lifecycle on disk.
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration, pool layout and credential resolution
 * - `file_pool`: Directory-backed work queues
 * - `translation`: The `TranslationBackend` capability and provider-backed service
 * - `providers`: OpenRouter and Gemini clients, plus a mock backend
 * - `cycle_executor`: One pick → translate → write → move cycle
 * - `app_controller`: Multi-cycle runs with alternating direction
 * - `progress`: Cycle counter and metric records
 * - `rate_limiter`: Per-minute and per-hour request windows
 * - `logging`: Console and append-only file logger
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## Pool layout
 *
 * | direction | input         | output        | completed               |
 * |-----------|---------------|---------------|-------------------------|
 * | en_to_fr  | `input_pool`  | `french_pool` | `input_pool_completed`  |
 * | fr_to_en  | `french_pool` | `output_pool` | `french_pool_completed` |
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod cycle_executor;
pub mod errors;
pub mod file_pool;
pub mod language_utils;
pub mod logging;
pub mod progress;
pub mod providers;
pub mod rate_limiter;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::{Config, PoolLayout, TranslationDirection, TranslationProvider};
pub use app_controller::{Controller, RunSummary, StopReason};
pub use cycle_executor::{CycleExecutor, CycleOutcome, CycleReport};
pub use errors::{AppError, CycleError, PoolError, ProviderError, TranslationError};
pub use file_pool::FilePool;
pub use progress::ProgressRecorder;
pub use translation::{TranslationBackend, TranslationRequest, TranslationService};
