use thiserror::Error;

use ssebrot_core::CoreError;
use ssebrot_render::RenderError;

/// Errors surfaced by the explorer binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    #[error("malformed command {input:?}: {reason}")]
    MalformedCommand { input: String, reason: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
