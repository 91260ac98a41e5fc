use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for prompt construction
///
/// Backends receive ISO 639-1 codes from the translation direction; prompts
/// need English language names. Codes are resolved through ISO 639-1 and
/// ISO 639-2 (both /T and /B variants).
const BIBLIOGRAPHIC_CODES: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("per", "fas"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Look up a language from an ISO 639-1 or ISO 639-2 code
pub fn lookup_language(code: &str) -> Option<Language> {
    let normalized = code.trim().to_lowercase();
    match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => {
            let terminological = BIBLIOGRAPHIC_CODES
                .iter()
                .find(|(bibliographic, _)| *bibliographic == normalized)
                .map(|(_, terminological)| *terminological)
                .unwrap_or(normalized.as_str());
            Language::from_639_3(terminological)
        }
        _ => None,
    }
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    lookup_language(code)
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Language name for prompts, falling back to the upper-cased code
pub fn display_name_or_code(code: &str) -> String {
    get_language_name(code).unwrap_or_else(|_| code.trim().to_uppercase())
}
