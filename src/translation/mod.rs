/*!
 * Translation backends for the back-translation cycles.
 *
 * - `core`: the `TranslationBackend` capability and the provider-backed service
 * - `prompts`: prompt templates sent to the providers
 */

pub use self::core::{TranslationBackend, TranslationRequest, TranslationService};
pub use self::prompts::PromptTemplate;

pub mod core;
pub mod prompts;
