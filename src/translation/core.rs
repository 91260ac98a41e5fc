/*!
 * Core translation service implementation.
 *
 * This module defines the `TranslationBackend` capability consumed by the
 * cycle executor and `TranslationService`, the backend that dispatches to the
 * configured remote provider.
 */

use async_trait::async_trait;
use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use std::time::Instant;

use crate::app_config::{ProviderCredentials, TranslationConfig, TranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::providers::Provider;
use crate::providers::gemini::{Gemini, GeminiRequest};
use crate::providers::openrouter::{OpenRouter, OpenRouterRequest};
use crate::rate_limiter::RateLimiter;

use super::prompts::PromptTemplate;

/// One text to translate between two ISO 639-1 languages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationRequest<'a> {
    pub text: &'a str,
    pub source_language: &'a str,
    pub target_language: &'a str,
    /// Per-request model override
    pub model: Option<&'a str>,
}

impl<'a> TranslationRequest<'a> {
    pub fn new(text: &'a str, source_language: &'a str, target_language: &'a str) -> Self {
        Self {
            text,
            source_language,
            target_language,
            model: None,
        }
    }

    pub fn with_model(mut self, model: &'a str) -> Self {
        self.model = Some(model);
        self
    }
}

/// Capability that turns text in one language into text in another
///
/// Ordinary failures come back as `TranslationError`; implementations never
/// panic on a bad response. Callers short-circuit blank input before calling.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn translate(&self, request: TranslationRequest<'_>) -> Result<String, TranslationError>;

    /// Name used in log lines
    fn backend_name(&self) -> &str;
}

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    OpenRouter { client: OpenRouter },
    Gemini { client: Gemini },
}

/// Translation backend backed by a remote LLM provider
pub struct TranslationService {
    /// Configuration for the translation service
    config: TranslationConfig,

    /// API key and default model
    credentials: ProviderCredentials,

    /// Provider client, built on first use
    provider: OnceCell<TranslationProviderImpl>,

    /// Client-side request limiter
    rate_limiter: Option<RateLimiter>,

    /// User prompt template
    prompt: PromptTemplate,
}

impl std::fmt::Debug for TranslationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationService")
            .field("provider", &self.config.provider)
            .field("model", &self.credentials.model)
            .finish_non_exhaustive()
    }
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    ///
    /// Nothing touches the network here; the HTTP client is built on the
    /// first translation so that a construction failure surfaces per request.
    pub fn new(config: &TranslationConfig, credentials: ProviderCredentials) -> Self {
        let rate_limiter = config
            .rate_limit
            .enabled
            .then(|| RateLimiter::new(config.rate_limit.clone()));

        Self {
            config: config.clone(),
            credentials,
            provider: OnceCell::new(),
            rate_limiter,
            prompt: PromptTemplate::default(),
        }
    }

    pub fn provider(&self) -> TranslationProvider {
        self.config.provider
    }

    /// Model used when a request carries no override
    pub fn model(&self) -> &str {
        &self.credentials.model
    }

    fn client(&self) -> Result<&TranslationProviderImpl, TranslationError> {
        self.provider.get_or_try_init(|| {
            let endpoint = self.config.get_endpoint();
            let timeout = self.config.timeout_secs;
            debug!("Building {} client for {}", self.config.provider, endpoint);

            match self.config.provider {
                TranslationProvider::OpenRouter => {
                    OpenRouter::new(self.credentials.api_key.clone(), endpoint, timeout)
                        .map(|client| TranslationProviderImpl::OpenRouter { client })
                        .map_err(|e| TranslationError::BackendConfig(format!("OpenRouter client setup failed: {}", e)))
                }
                TranslationProvider::Gemini => Gemini::new(self.credentials.api_key.clone(), &endpoint, timeout)
                    .map(|client| TranslationProviderImpl::Gemini { client })
                    .map_err(|e| TranslationError::BackendConfig(format!("Gemini client setup failed: {}", e))),
            }
        })
    }

    /// Send one prompt to the provider and extract the answer text
    async fn complete_prompt(&self, model: &str, prompt: String) -> Result<String, TranslationError> {
        let text = match self.client()? {
            TranslationProviderImpl::OpenRouter { client } => {
                let request = OpenRouterRequest::new(model)
                    .add_message("user", prompt)
                    .temperature(self.config.temperature)
                    .max_tokens(self.config.max_tokens);
                let response = client.complete(request).await?;
                if let Some(usage) = &response.usage {
                    debug!(
                        "OpenRouter token usage: prompt={}, completion={}, total={}",
                        usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
                    );
                }
                OpenRouter::extract_text(&response)
            }
            TranslationProviderImpl::Gemini { client } => {
                let request = GeminiRequest::new(model)
                    .add_user_text(prompt)
                    .temperature(self.config.temperature)
                    .max_output_tokens(self.config.max_tokens);
                let response = client.complete(request).await?;
                Gemini::extract_text(&response)
            }
        };

        if text.is_empty() {
            return Err(ProviderError::EmptyResponse(format!(
                "{} returned no translated text for model {}",
                self.config.provider, model
            ))
            .into());
        }
        Ok(text)
    }

    /// Send a tiny request to check that credentials and model are accepted
    pub async fn test_connection(&self) -> Result<(), TranslationError> {
        let model = self.model();
        match self.client()? {
            TranslationProviderImpl::OpenRouter { client } => client.test_connection(model).await?,
            TranslationProviderImpl::Gemini { client } => client.test_connection(model).await?,
        }
        info!("Connection to {} with model {} succeeded", self.config.provider, model);
        Ok(())
    }
}

#[async_trait]
impl TranslationBackend for TranslationService {
    async fn translate(&self, request: TranslationRequest<'_>) -> Result<String, TranslationError> {
        let model = request.model.unwrap_or(&self.credentials.model);
        let prompt = self
            .prompt
            .render_for_codes(request.source_language, request.target_language, request.text);

        if let Some(limiter) = &self.rate_limiter {
            if limiter.wait_if_needed().await {
                info!("Rate limit reached, resumed after waiting");
            }
        }

        let start_time = Instant::now();
        let result = self.complete_prompt(model, prompt).await;
        match &result {
            Ok(text) => debug!(
                "{} translated {} -> {} ({} chars) in {:?}",
                self.config.provider,
                request.source_language,
                request.target_language,
                text.chars().count(),
                start_time.elapsed()
            ),
            Err(e) => warn!("{} translation failed after {:?}: {}", self.config.provider, start_time.elapsed(), e),
        }
        result
    }

    fn backend_name(&self) -> &str {
        self.config.provider.display_name()
    }
}
