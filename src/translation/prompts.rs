/*!
 * Prompt templates for plain-text translation.
 */

use crate::language_utils;

/// User prompt template for a single translation request.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// The default translation prompt.
    pub const PLAIN_TRANSLATION: &'static str = "Translate the following {source_language} text to {target_language}:\n\n{text}\n\nProvide only the translation without any additional comments or explanations.";

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Render the template with the given language names and text.
    pub fn render(&self, source_language: &str, target_language: &str, text: &str) -> String {
        // Text goes last so placeholders inside it are left alone
        self.template
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language)
            .replace("{text}", text)
    }

    /// Render from ISO language codes, resolving their English names.
    pub fn render_for_codes(&self, source_code: &str, target_code: &str, text: &str) -> String {
        self.render(
            &language_utils::display_name_or_code(source_code),
            &language_utils::display_name_or_code(target_code),
            text,
        )
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(Self::PLAIN_TRANSLATION)
    }
}
