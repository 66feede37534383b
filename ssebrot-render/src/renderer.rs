use std::time::Instant;

use tracing::debug;

use ssebrot_core::scalar::fill_scalar;
use ssebrot_core::{Backend, ComplexRect, EngineConfig, EngineMode};

use crate::error::RenderError;
use crate::iteration_grid::IterationGrid;

/// Compute escape counts for every pixel of a `width × height` image of `rect`.
///
/// `EngineMode::Vectorized` runs the widest lane kernel the CPU supports.
/// Both modes return identical grids.  The call is synchronous and runs
/// on the calling thread.
pub fn compute(
    width: u32,
    height: u32,
    rect: &ComplexRect,
    config: &EngineConfig,
    mode: EngineMode,
) -> crate::Result<IterationGrid> {
    match mode {
        EngineMode::Scalar => run(width, height, rect, config, None),
        EngineMode::Vectorized => run(width, height, rect, config, Some(Backend::detect())),
    }
}

/// Like [`compute`] in vectorized mode, but with an explicit lane backend.
pub fn compute_with_backend(
    width: u32,
    height: u32,
    rect: &ComplexRect,
    config: &EngineConfig,
    backend: Backend,
) -> crate::Result<IterationGrid> {
    run(width, height, rect, config, Some(backend))
}

fn run(
    width: u32,
    height: u32,
    rect: &ComplexRect,
    config: &EngineConfig,
    backend: Option<Backend>,
) -> crate::Result<IterationGrid> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }

    let start = Instant::now();
    let engine = backend.map_or("scalar", Backend::name);
    debug!(width, height, iterations = config.iterations(), engine, "Starting frame");

    let mut grid = IterationGrid::new(width, height, config.iterations());
    match backend {
        None => fill_scalar(rect, width, height, config, &mut grid.data),
        Some(b) => b.fill(rect, width, height, config, &mut grid.data),
    }

    debug!(
        elapsed_us = start.elapsed().as_micros() as u64,
        engine, "Frame complete"
    );
    Ok(grid)
}
