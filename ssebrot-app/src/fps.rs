use std::time::{Duration, Instant};

use tracing::info;

/// Frames averaged per FPS report.
const WINDOW: u32 = 10;

/// Counts rendered frames and reports the rate once per window.
#[derive(Debug)]
pub struct FrameCounter {
    frames: u32,
    window_start: Instant,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self {
            frames: 0,
            window_start: Instant::now(),
        }
    }

    /// Record one finished frame; returns the FPS when a window completes.
    pub fn tick(&mut self) -> Option<f32> {
        self.frames += 1;
        if self.frames < WINDOW {
            return None;
        }
        let fps = fps(self.frames, self.window_start.elapsed());
        info!(fps, "Frame rate");
        self.frames = 0;
        self.window_start = Instant::now();
        Some(fps)
    }
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new()
    }
}

fn fps(frames: u32, elapsed: Duration) -> f32 {
    let secs = elapsed.as_secs_f32();
    if secs > 0.0 {
        frames as f32 / secs
    } else {
        f32::INFINITY
    }
}
