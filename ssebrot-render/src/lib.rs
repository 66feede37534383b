pub mod buffer;
pub mod error;
pub mod iteration_grid;
pub mod palette;
pub mod renderer;

pub use buffer::RenderBuffer;
pub use error::RenderError;
pub use iteration_grid::IterationGrid;
pub use palette::Palette;
pub use renderer::{compute, compute_with_backend};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
