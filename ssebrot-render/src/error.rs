use thiserror::Error;

/// Errors originating from frame computation and coloring.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("palette built for {palette} iterations cannot color a grid computed with {grid}")]
    PaletteMismatch { palette: u32, grid: u32 },

    #[error(transparent)]
    Core(#[from] ssebrot_core::CoreError),
}
