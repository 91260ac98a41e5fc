/*!
 * Tests for the translation service and backends
 */

use backtranslate::app_config::{ProviderCredentials, TranslationConfig, TranslationProvider};
use backtranslate::providers::mock::MockBackend;
use backtranslate::translation::{PromptTemplate, TranslationBackend, TranslationRequest, TranslationService};

fn credentials() -> ProviderCredentials {
    ProviderCredentials {
        api_key: "secret-key".to_string(),
        model: "resolved/model".to_string(),
    }
}

#[test]
fn test_translationService_new_shouldKeepResolvedModel() {
    let mut config = TranslationConfig::default();
    config.provider = TranslationProvider::Gemini;

    let service = TranslationService::new(&config, credentials());

    assert_eq!(service.model(), "resolved/model");
    assert_eq!(service.provider(), TranslationProvider::Gemini);
    assert_eq!(service.backend_name(), "Gemini");
}

#[test]
fn test_providerCredentials_debug_shouldRedactKey() {
    let debug = format!("{:?}", credentials());
    assert!(!debug.contains("secret-key"));
    assert!(debug.contains("resolved/model"));
}

#[tokio::test]
async fn test_translationService_withUnparsableEndpoint_shouldReturnConfigDiagnostic() {
    let mut config = TranslationConfig::default();
    config.provider = TranslationProvider::Gemini;
    config.endpoint = "not a url".to_string();

    let service = TranslationService::new(&config, credentials());
    let error = service
        .translate(TranslationRequest::new("Hello", "en", "fr"))
        .await
        .unwrap_err();

    assert!(error.diagnostic().starts_with("BACKEND_CONFIG_ERROR:"));
}

#[test]
fn test_defaultPrompt_withFrenchToEnglish_shouldNameBothLanguages() {
    let prompt = PromptTemplate::default().render_for_codes("fr", "en", "Bonjour");
    assert_eq!(
        prompt,
        "Translate the following French text to English:\n\nBonjour\n\n\
         Provide only the translation without any additional comments or explanations."
    );
}

#[tokio::test]
async fn test_mockBackend_empty_shouldReturnTranslationDiagnostic() {
    let error = MockBackend::empty()
        .translate(TranslationRequest::new("Hello", "en", "fr"))
        .await
        .unwrap_err();
    assert!(error.diagnostic().starts_with("TRANSLATION_ERROR:"));
}

#[tokio::test]
async fn test_mockBackend_working_shouldRecordLanguages() {
    let backend = MockBackend::working();
    let result = backend
        .translate(TranslationRequest::new("Hello", "en", "fr"))
        .await
        .unwrap();

    assert_eq!(result, "[fr] Hello");
    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].source_language, "en");
    assert_eq!(requests[0].target_language, "fr");
}

#[tokio::test]
async fn test_testConnection_withUnparsableEndpoint_shouldReturnConfigError() {
    let mut config = TranslationConfig::default();
    config.provider = TranslationProvider::Gemini;
    config.endpoint = "not a url".to_string();

    let service = TranslationService::new(&config, credentials());
    let error = service.test_connection().await.unwrap_err();

    assert!(error.is_config_error(), "got {:?}", error);
}

#[tokio::test]
async fn test_testConnection_withUnreachableOpenRouter_shouldReturnProviderError() {
    let mut config = TranslationConfig::default();
    config.provider = TranslationProvider::OpenRouter;
    config.endpoint = "http://127.0.0.1:9/api/v1".to_string();
    config.rate_limit.enabled = false;

    let service = TranslationService::new(&config, credentials());
    let error = service.test_connection().await.unwrap_err();

    assert!(!error.is_config_error(), "got {:?}", error);
    assert!(error.diagnostic().starts_with("TRANSLATION_ERROR:"));
}
