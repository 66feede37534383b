mod app_dir;
mod command;
mod error;
mod explorer;
mod fps;
mod preferences;

use std::io::{self, BufRead};
use std::path::Path;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};

use ssebrot_core::{Backend, ComplexRect, EngineMode};
use ssebrot_render::{compute, compute_with_backend, IterationGrid};

use command::Command;
use error::AppError;
use explorer::Explorer;
use preferences::AppPreferences;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Escape-time Mandelbrot explorer with scalar and SIMD engines.
#[derive(Debug, Parser)]
#[command(name = "ssebrot", version)]
struct Args {
    /// Image width in pixels (overrides preferences).
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels (overrides preferences).
    #[arg(long)]
    height: Option<u32>,

    /// Maximum iteration count (overrides preferences).
    #[arg(long)]
    iterations: Option<u32>,

    /// Engine to render with (overrides preferences).
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    #[command(subcommand)]
    command: Option<Subcmd>,
}

#[derive(Debug, Subcommand)]
enum Subcmd {
    /// Apply navigation commands, rendering after each one.
    ///
    /// Commands: d/a/s/w pan, + and - zoom, z undo, `select [X Y [W H]]`,
    /// `mode [scalar|vector]`, reset.  Reads one command per stdin line when
    /// none are given.
    Explore { commands: Vec<String> },

    /// Time every engine on the default view and check they agree.
    Bench {
        #[arg(long, default_value_t = 10)]
        frames: u32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Scalar,
    Vector,
}

impl From<ModeArg> for EngineMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Scalar => EngineMode::Scalar,
            ModeArg::Vector => EngineMode::Vectorized,
        }
    }
}

impl Args {
    /// Preferences with command-line overrides applied.
    fn effective(&self, prefs: &AppPreferences) -> AppPreferences {
        let mut p = prefs.clone();
        if let Some(w) = self.width {
            p.image_width = w;
        }
        if let Some(h) = self.height {
            p.image_height = h;
        }
        if let Some(n) = self.iterations {
            p.iterations = n;
        }
        if let Some(m) = self.mode {
            p.mode = m.into();
        }
        p
    }
}

// ---------------------------------------------------------------------------
// Explore
// ---------------------------------------------------------------------------

fn explore(settings: &AppPreferences, commands: &[String]) -> Result<ComplexRect, AppError> {
    let mut explorer = Explorer::new(settings)?;
    report(&mut explorer, "start")?;

    let mut run = |line: &str| -> Result<(), AppError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }
        // A bad command is reported and skipped; it never ends the session.
        match line.parse::<Command>().and_then(|cmd| explorer.apply(&cmd)) {
            Ok(_) => report(&mut explorer, line),
            Err(e) => {
                warn!("{e}");
                Ok(())
            }
        }
    };

    if commands.is_empty() {
        for line in io::stdin().lock().lines() {
            run(&line?)?;
        }
    } else {
        for cmd in commands {
            run(cmd)?;
        }
    }

    Ok(*explorer.rect())
}

/// Run a session and remember where it ended, if the preferences ask for it.
fn explore_and_save(
    prefs: &mut AppPreferences,
    settings: &AppPreferences,
    commands: &[String],
    path: &Path,
) -> Result<(), AppError> {
    let last = explore(settings, commands)?;
    if prefs.restore_last_view {
        prefs.last_view = Some(last);
        prefs.save_to(path);
    }
    Ok(())
}

fn report(explorer: &mut Explorer, label: &str) -> Result<(), AppError> {
    let frame = explorer.render_frame()?;
    let r = explorer.rect();
    debug!(bytes = frame.buffer.pixels.len(), "Colored frame");
    println!(
        "{label:>12}  [{:+.6}, {:+.6}] x [{:+.6}, {:+.6}]  {:<10}  {:>8.2} ms  interior {:>7}{}",
        r.xa(),
        r.xb(),
        r.ya(),
        r.yb(),
        explorer.mode().label(),
        frame.elapsed.as_secs_f64() * 1e3,
        frame.grid.interior_count(),
        frame.fps.map(|f| format!("  {f:.1} fps")).unwrap_or_default(),
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Bench
// ---------------------------------------------------------------------------

fn time_frames<F>(frames: u32, mut f: F) -> Result<(Duration, IterationGrid), AppError>
where
    F: FnMut() -> ssebrot_render::Result<IterationGrid>,
{
    let mut last = f()?;
    let start = Instant::now();
    for _ in 0..frames {
        last = f()?;
    }
    Ok((start.elapsed() / frames.max(1), last))
}

fn bench(settings: &AppPreferences, frames: u32) -> Result<(), AppError> {
    let config = settings.engine_config()?;
    let (w, h) = (settings.image_width, settings.image_height);
    let rect = ComplexRect::DEFAULT;
    info!(width = w, height = h, iterations = config.iterations(), frames, "Benchmark");

    let (scalar_time, reference) =
        time_frames(frames, || compute(w, h, &rect, &config, EngineMode::Scalar))?;
    println!("{:>12}  {:>9.2} ms/frame", "scalar", ms(scalar_time));

    let mut all_match = true;
    for backend in Backend::available() {
        let (t, grid) = time_frames(frames, || compute_with_backend(w, h, &rect, &config, backend))?;
        let verdict = match reference.first_mismatch(&grid) {
            None => "match".to_string(),
            Some((x, y, want, got)) => {
                all_match = false;
                format!("MISMATCH at ({x}, {y}): scalar {want}, {backend} {got}")
            }
        };
        println!(
            "{:>12}  {:>9.2} ms/frame  x{:<6.2} {verdict}",
            backend.name(),
            ms(t),
            scalar_time.as_secs_f64() / t.as_secs_f64().max(f64::MIN_POSITIVE),
        );
    }

    if all_match {
        info!(selected = %Backend::detect(), "All engines agree");
    } else {
        warn!("Vector engines diverged from the scalar reference");
    }
    Ok(())
}

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1e3
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    info!("Starting ssebrot");

    let mut prefs = AppPreferences::load();
    let settings = args.effective(&prefs);

    let path = app_dir::preferences_path();
    match &args.command {
        Some(Subcmd::Bench { frames }) => bench(&settings, *frames),
        Some(Subcmd::Explore { commands }) => explore_and_save(&mut prefs, &settings, commands, &path),
        None => explore_and_save(&mut prefs, &settings, &[], &path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_preferences() {
        let args = Args::parse_from([
            "ssebrot",
            "--width",
            "320",
            "--mode",
            "vector",
            "bench",
            "--frames",
            "3",
        ]);
        let eff = args.effective(&AppPreferences::default());
        assert_eq!(eff.image_width, 320);
        assert_eq!(eff.image_height, 600);
        assert_eq!(eff.mode, EngineMode::Vectorized);
        assert!(matches!(args.command, Some(Subcmd::Bench { frames: 3 })));
    }

    #[test]
    fn explore_collects_commands() {
        let args = Args::parse_from(["ssebrot", "explore", "d", "select 1 2 3 4", "z"]);
        match args.command {
            Some(Subcmd::Explore { commands }) => assert_eq!(commands.len(), 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn explore_skips_bad_commands() {
        let settings = AppPreferences {
            image_width: 40,
            image_height: 30,
            iterations: 32,
            last_view: None,
            ..AppPreferences::default()
        };
        let cmds: Vec<String> = ["d", "bogus", "# comment", "", "+", "z", "z"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let last = explore(&settings, &cmds).unwrap();
        assert_eq!(last, ComplexRect::DEFAULT);
    }

    #[test]
    fn session_end_view_is_saved_only_when_restoring() {
        let dir = std::env::temp_dir().join(format!("ssebrot-session-{}", std::process::id()));
        let path = dir.join("preferences.json");
        let settings = AppPreferences {
            image_width: 30,
            image_height: 20,
            iterations: 16,
            last_view: None,
            ..AppPreferences::default()
        };
        let cmds = vec!["+".to_string()];

        let mut prefs = settings.clone();
        explore_and_save(&mut prefs, &settings, &cmds, &path).unwrap();
        let saved = AppPreferences::load_from(&path);
        let zoomed = saved.last_view.unwrap();
        assert!(zoomed.width() < ComplexRect::DEFAULT.width());
        assert_eq!(prefs.last_view, Some(zoomed));

        let _ = std::fs::remove_file(&path);
        let mut prefs = AppPreferences {
            restore_last_view: false,
            ..settings.clone()
        };
        explore_and_save(&mut prefs, &settings, &cmds, &path).unwrap();
        assert!(!path.exists());
        assert_eq!(prefs.last_view, None);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn bench_runs_on_tiny_frame() {
        let settings = AppPreferences {
            image_width: 17,
            image_height: 5,
            iterations: 16,
            ..AppPreferences::default()
        };
        bench(&settings, 1).unwrap();
    }
}
