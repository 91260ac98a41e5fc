/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;
use backtranslate::errors::{
    AppError, BACKEND_CONFIG_ERROR_MARKER, CycleError, PoolError, ProviderError,
    TRANSLATION_ERROR_MARKER, TranslationError,
};

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 503,
        message: "Upstream unavailable".to_string(),
    };
    let display = error.to_string();
    assert!(display.contains("503"));
    assert!(display.contains("Upstream unavailable"));
}

#[test]
fn test_translationError_diagnostic_withBackendConfig_shouldUseConfigMarker() {
    let error = TranslationError::BackendConfig("client setup failed".to_string());
    let diagnostic = error.diagnostic();
    assert!(diagnostic.starts_with(BACKEND_CONFIG_ERROR_MARKER));
    assert!(diagnostic.contains("client setup failed"));
}

#[test]
fn test_translationError_diagnostic_withAuthenticationError_shouldUseConfigMarker() {
    let error: TranslationError = ProviderError::AuthenticationError("invalid key".to_string()).into();
    assert!(error.is_config_error());
    assert!(error.diagnostic().starts_with("BACKEND_CONFIG_ERROR: "));
}

#[test]
fn test_translationError_diagnostic_withOtherFailures_shouldUseTranslationMarker() {
    let failures = [
        ProviderError::EmptyResponse("no text".to_string()),
        ProviderError::RateLimitExceeded("quota".to_string()),
        ProviderError::ConnectionError("timeout".to_string()),
    ];
    for failure in failures {
        let error = TranslationError::from(failure);
        assert!(!error.is_config_error());
        assert!(error.diagnostic().starts_with(TRANSLATION_ERROR_MARKER), "{}", error.diagnostic());
    }
}

#[test]
fn test_cycleError_fromEmptyPool_shouldBeExhaustion() {
    let error = CycleError::from(PoolError::Empty(PathBuf::from("/pool/input_pool")));
    assert!(error.is_pool_exhausted());
}

#[test]
fn test_cycleError_fromIoError_shouldNotBeExhaustion() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error = CycleError::from(PoolError::io("/pool/french_pool/a.txt", io));
    assert!(!error.is_pool_exhausted());
    assert!(error.to_string().contains("french_pool/a.txt"));
}

#[test]
fn test_appError_fromCycleError_shouldWrapWithPath() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let app_error: AppError = CycleError::from(PoolError::io("/pool/input_pool", io)).into();
    assert!(matches!(app_error, AppError::Cycle(_)));
    assert!(app_error.to_string().starts_with("Cycle error: "));
    assert!(app_error.to_string().contains("input_pool"));
}
