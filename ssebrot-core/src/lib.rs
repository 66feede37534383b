pub mod engine;
pub mod error;
pub mod history;
pub mod rect;
pub mod scalar;
pub mod simd;
pub mod viewport;

// Re-export primary types for convenience.
pub use engine::{EngineConfig, EngineMode};
pub use error::CoreError;
pub use history::History;
pub use rect::ComplexRect;
pub use simd::{Backend, LaneKernel};
pub use viewport::{PanDirection, Viewport};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
