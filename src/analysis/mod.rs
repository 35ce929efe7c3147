pub mod types;
pub mod prompt;
pub mod mime;
pub mod parser;
pub mod orchestrator;
pub mod report;

pub use types::*;
pub use prompt::{prompt_for, select_prompt, SYSTEM_INSTRUCTION};
pub use mime::image_mime_type;
pub use parser::{normalize_reply, ParseStrategy};
pub use orchestrator::ScanAnalyzer;
pub use report::format_report;

use thiserror::Error;

/// User-facing cause when the upstream host cannot be reached.
pub const CONNECTIVITY_FAILURE_MESSAGE: &str =
    "Connection to the upstream model failed. Please check your internet connection.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Image too large. Max {}MB.", .limit / (1024 * 1024))]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Analysis failed: {0}")]
    UpstreamFailure(String),
}
