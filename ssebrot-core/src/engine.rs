use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Parameters shared by every escape-time engine.
///
/// Fields are private: [`EngineConfig::new`] and deserialization are the only
/// ways to build one, so every engine can rely on `iterations >= 1` and a
/// finite, positive `r2_max`.
///
/// Changing `iterations` changes the palette size, so a palette built for
/// one config must be rebuilt before coloring grids from another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEngineConfig")]
pub struct EngineConfig {
    iterations: u32,
    r2_max: f32,
}

/// Deserialization goes through [`EngineConfig::new`] so a bad config file
/// cannot smuggle in a zero iteration count or a non-finite radius.
#[derive(Deserialize)]
struct RawEngineConfig {
    iterations: u32,
    r2_max: f32,
}

impl TryFrom<RawEngineConfig> for EngineConfig {
    type Error = CoreError;

    fn try_from(raw: RawEngineConfig) -> Result<Self, Self::Error> {
        Self::new(raw.iterations, raw.r2_max)
    }
}

impl EngineConfig {
    pub const DEFAULT_ITERATIONS: u32 = 255;
    pub const DEFAULT_R2_MAX: f32 = 100.0;

    pub fn new(iterations: u32, r2_max: f32) -> crate::Result<Self> {
        if iterations < 1 {
            return Err(CoreError::InvalidIterations(iterations));
        }
        if r2_max <= 0.0 || !r2_max.is_finite() {
            return Err(CoreError::InvalidEscapeRadius(r2_max));
        }
        Ok(Self { iterations, r2_max })
    }

    /// Maximum number of iterations; a pixel that never escapes reports this value.
    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Escape threshold on `|z|²`. Iteration stops once `x² + y² >= r2_max`.
    #[inline]
    pub fn r2_max(&self) -> f32 {
        self.r2_max
    }

    /// Return a copy with a different `iterations` value.
    pub fn with_iterations(self, iterations: u32) -> crate::Result<Self> {
        Self::new(iterations, self.r2_max)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            iterations: Self::DEFAULT_ITERATIONS,
            r2_max: Self::DEFAULT_R2_MAX,
        }
    }
}

/// Which engine computes a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    /// The per-pixel reference loop.
    #[default]
    Scalar,
    /// The widest lane kernel available on this CPU.
    Vectorized,
}

impl EngineMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Vectorized => "vectorized",
        }
    }

    /// The other mode; mirrors flipping the "use SSE" toggle.
    pub fn toggled(self) -> Self {
        match self {
            Self::Scalar => Self::Vectorized,
            Self::Vectorized => Self::Scalar,
        }
    }
}
