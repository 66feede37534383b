use std::time::{Duration, Instant};

use tracing::{debug, info};

use ssebrot_core::{ComplexRect, EngineConfig, EngineMode, History, PanDirection, Viewport};
use ssebrot_render::{compute, IterationGrid, Palette, RenderBuffer};

use crate::command::{Command, Selection, SelectionBox};
use crate::error::AppError;
use crate::fps::FrameCounter;
use crate::preferences::AppPreferences;

/// One computed and colored frame.
pub struct Frame {
    pub grid: IterationGrid,
    pub buffer: RenderBuffer,
    pub elapsed: Duration,
    pub fps: Option<f32>,
}

/// The controlling layer: owns the view, its undo history, the palette, and
/// the engine choice, and serializes mutate → compute → color.
pub struct Explorer {
    viewport: Viewport,
    history: History,
    config: EngineConfig,
    palette: Palette,
    mode: EngineMode,
    width: u32,
    height: u32,
    pan_dx: f32,
    pan_dy: f32,
    zoom_fraction: f32,
    frames: FrameCounter,
}

impl Explorer {
    pub fn new(prefs: &AppPreferences) -> Result<Self, AppError> {
        let config = prefs.engine_config()?;
        ssebrot_core::rect::check_dimensions(prefs.image_width, prefs.image_height)?;
        Ok(Self {
            viewport: Viewport::new(prefs.initial_view()),
            history: History::new(prefs.history_capacity),
            palette: Palette::build(config.iterations()),
            config,
            mode: prefs.mode,
            width: prefs.image_width,
            height: prefs.image_height,
            pan_dx: prefs.pan_dx,
            pan_dy: prefs.pan_dy,
            zoom_fraction: prefs.zoom_fraction,
            frames: FrameCounter::new(),
        })
    }

    pub fn rect(&self) -> &ComplexRect {
        self.viewport.rect()
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Apply one command.  Returns `true` if the view changed.
    ///
    /// A rejected mutation leaves both the view and the history as they were.
    pub fn apply(&mut self, command: &Command) -> Result<bool, AppError> {
        let changed = match *command {
            Command::Pan(direction) => {
                let fraction = match direction {
                    PanDirection::Left | PanDirection::Right => self.pan_dx,
                    PanDirection::Up | PanDirection::Down => self.pan_dy,
                };
                self.mutate(|vp| vp.pan(direction, fraction))?;
                true
            }
            Command::ZoomIn => {
                let f = self.zoom_fraction;
                self.mutate(|vp| vp.zoom_in(f))?;
                true
            }
            Command::ZoomOut => {
                let f = self.zoom_fraction;
                self.mutate(|vp| vp.zoom_out(f))?;
                true
            }
            Command::Select(selection) => {
                let b = self.selection_box(selection);
                let (w, h) = (self.width, self.height);
                self.mutate(|vp| vp.zoom_to_pixel_rect(b.x, b.y, b.width, b.height, w, h))?;
                true
            }
            Command::Reset => {
                self.mutate(|vp| {
                    vp.set_rect(ComplexRect::DEFAULT);
                    Ok(())
                })?;
                true
            }
            Command::Undo => self.undo(),
            Command::Mode(mode) => {
                self.mode = mode.unwrap_or_else(|| self.mode.toggled());
                info!(mode = self.mode.label(), "Engine mode");
                false
            }
        };
        if changed {
            self.log_rect();
        }
        Ok(changed)
    }

    /// Restore the previous view.  Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(rect) => {
                self.viewport.set_rect(rect);
                true
            }
            None => {
                debug!("Nothing to undo");
                false
            }
        }
    }

    /// Compute and color the current view.
    pub fn render_frame(&mut self) -> Result<Frame, AppError> {
        let start = Instant::now();
        let grid = compute(self.width, self.height, self.rect(), &self.config, self.mode)?;
        let buffer = self.palette.colorize(&grid)?;
        let elapsed = start.elapsed();
        let fps = self.frames.tick();
        Ok(Frame {
            grid,
            buffer,
            elapsed,
            fps,
        })
    }

    /// Apply a viewport change on a copy, then commit it and record the old view.
    fn mutate<F>(&mut self, f: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut Viewport) -> ssebrot_core::Result<()>,
    {
        let mut next = self.viewport;
        f(&mut next)?;
        self.history.push(*self.viewport.rect());
        self.viewport = next;
        Ok(())
    }

    fn selection_box(&self, selection: Selection) -> SelectionBox {
        match selection {
            Selection::Default => SelectionBox::default_for(self.width, self.height),
            Selection::At { x, y } => SelectionBox::centered_at(x, y, self.width, self.height),
            Selection::Box(b) => b,
        }
    }

    fn log_rect(&self) {
        let r = self.rect();
        info!(
            xa = r.xa(),
            ya = r.ya(),
            xb = r.xb(),
            yb = r.yb(),
            history = self.history_len(),
            "Rect"
        );
    }
}
