//! Errors raised while turning markdown into a paper.

use thiserror::Error;

/// A failure that aborts a pipeline run.
///
/// Directive attributes and highlight languages never produce errors; they
/// fall back to defaults. Only the parse stage can fail.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to render markdown: {0}")]
    Render(#[from] std::io::Error),

    #[error("rendered markdown is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// An input file the paper renderer does not accept.
#[derive(Debug, Error)]
#[error("unsupported input {}: expected a markdown or plain text file", path.display())]
pub struct UnsupportedInput {
    pub path: std::path::PathBuf,
}
