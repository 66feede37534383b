use thiserror::Error;

/// Errors originating from the core escape-time engine and navigation model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid iteration count: {0} (must be >= 1)")]
    InvalidIterations(u32),

    #[error("invalid escape radius squared: {0} (must be finite and > 0.0)")]
    InvalidEscapeRadius(f32),

    #[error("invalid complex rectangle: {reason}")]
    InvalidRect { reason: String },

    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid zoom fraction: {0} (must be in [0, 1))")]
    InvalidZoomFraction(f32),

    #[error("invalid pan fraction: {0} (must be finite)")]
    InvalidPanFraction(f32),
}
