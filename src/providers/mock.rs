/*!
 * Mock translation backend for testing.
 *
 * This module provides a mock backend that simulates different behaviors:
 * - `MockBackend::reversing()` - Returns the input reversed
 * - `MockBackend::working()` - Prefixes the input with the target language
 * - `MockBackend::failing()` - Always fails with an API error
 * - `MockBackend::config_failing()` - Always fails with a configuration error
 * - `MockBackend::empty()` - Always fails with an empty response
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::{ProviderError, TranslationError};
use crate::translation::{TranslationBackend, TranslationRequest};

/// A request as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
}

/// Behavior mode for the mock backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Reverses the characters of the input
    Reverse,
    /// Returns `[<target>] <text>`
    Working,
    /// Fails every Nth request, works like `Working` otherwise
    Intermittent { fail_every: usize },
    /// Always fails with an API error
    Failing,
    /// Always fails with a backend configuration error
    ConfigFailing,
    /// Always fails with an empty response error
    Empty,
}

/// Mock backend for testing cycle behavior
#[derive(Debug)]
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of `translate` calls, shared across clones
    call_count: Arc<AtomicUsize>,
    /// Every request received, shared across clones
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn reversing() -> Self {
        Self::new(MockBehavior::Reverse)
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn config_failing() -> Self {
        Self::new(MockBehavior::ConfigFailing)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Number of translate calls so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Snapshot of the requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

impl Clone for MockBackend {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            call_count: Arc::clone(&self.call_count),
            requests: Arc::clone(&self.requests),
        }
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    async fn translate(&self, request: TranslationRequest<'_>) -> Result<String, TranslationError> {
        let count = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(RecordedRequest {
            text: request.text.to_string(),
            source_language: request.source_language.to_string(),
            target_language: request.target_language.to_string(),
        });

        match self.behavior {
            MockBehavior::Reverse => Ok(request.text.chars().rev().collect()),

            MockBehavior::Working => Ok(format!("[{}] {}", request.target_language, request.text)),

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                    }
                    .into())
                } else {
                    Ok(format!("[{}] {}", request.target_language, request.text))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }
            .into()),

            MockBehavior::ConfigFailing => Err(TranslationError::BackendConfig(
                "Simulated client construction failure".to_string(),
            )),

            MockBehavior::Empty => Err(ProviderError::EmptyResponse("Simulated empty response".to_string()).into()),
        }
    }

    fn backend_name(&self) -> &str {
        "Mock"
    }
}
