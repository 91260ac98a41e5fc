/*!
 * Single translation cycle.
 *
 * A cycle picks one pending file from the direction's input pool, translates
 * it, writes the result (or a diagnostic) under the same name into the output
 * pool, and moves the original into the completed pool.
 */

use log::{error, info, warn};
use std::path::Path;
use std::sync::Arc;

use crate::app_config::{PoolLayout, TranslationDirection};
use crate::errors::CycleError;
use crate::file_pool::FilePool;
use crate::translation::{TranslationBackend, TranslationRequest};

/// How the translate step ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The backend returned a translation
    Translated,
    /// Input was blank; an empty output was written without calling the backend
    EmptyInput,
    /// The backend failed; the diagnostic text was written as output
    Failed(String),
}

/// Result of one cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub filename: String,
    pub direction: TranslationDirection,
    pub outcome: CycleOutcome,
    /// Whether the original reached the completed pool
    pub moved: bool,
}

/// Runs one pick → translate → write → move cycle
pub struct CycleExecutor {
    layout: PoolLayout,
    backend: Arc<dyn TranslationBackend>,
}

impl CycleExecutor {
    pub fn new(layout: PoolLayout, backend: Arc<dyn TranslationBackend>) -> Self {
        Self { layout, backend }
    }

    pub fn layout(&self) -> &PoolLayout {
        &self.layout
    }

    /// Run one cycle in `direction`
    ///
    /// Only pool exhaustion and I/O failures on the input read or output
    /// write escape as errors. Translation failures become diagnostic output
    /// and a failed move is logged.
    pub async fn run_cycle(&self, direction: TranslationDirection) -> Result<CycleReport, CycleError> {
        let input_dir = self.layout.input_dir(direction);
        let output_dir = self.layout.output_dir(direction);
        let completed_dir = self.layout.completed_dir(direction);

        let filename = FilePool::pick_pending(&input_dir)?;
        info!("Processing file: {} ({})", filename, direction);

        let text = FilePool::read_pending(&input_dir, &filename)?;
        let (content, outcome) = self.translate_text(&text, direction).await;

        let output_path = FilePool::write_output(&output_dir, &filename, &content)?;
        info!("Output written to: {:?}", output_path);

        let moved = Self::complete_input(&input_dir, &completed_dir, &filename);

        Ok(CycleReport {
            filename,
            direction,
            outcome,
            moved,
        })
    }

    // @returns: Output content and how it was produced
    async fn translate_text(&self, text: &str, direction: TranslationDirection) -> (String, CycleOutcome) {
        if text.trim().is_empty() {
            info!("Input text is empty, writing empty output");
            return (String::new(), CycleOutcome::EmptyInput);
        }

        let request = TranslationRequest::new(text, direction.source_language(), direction.target_language());
        match self.backend.translate(request).await {
            Ok(translated) => (translated, CycleOutcome::Translated),
            Err(e) => {
                let diagnostic = e.diagnostic();
                error!("{} translation failed: {}", self.backend.backend_name(), diagnostic);
                (diagnostic.clone(), CycleOutcome::Failed(diagnostic))
            }
        }
    }

    fn complete_input(input_dir: &Path, completed_dir: &Path, filename: &str) -> bool {
        match FilePool::move_to_completed(input_dir, completed_dir, filename) {
            Ok(moved) => {
                if moved {
                    info!("Moved {} to {:?}", filename, completed_dir);
                }
                moved
            }
            Err(e) => {
                warn!("Failed to move {} to completed pool: {}", filename, e);
                false
            }
        }
    }
}
