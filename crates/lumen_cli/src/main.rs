use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use lumen_renderer::{
    render, render_single, render_to_writer, Camera, CancelToken, Progress, RenderError,
    RenderOptions,
};

mod cli;
mod logger;
mod output;

use cli::Args;
use logger::init_logger;
use output::OutputTarget;

/// Layout seed for random built-in scenes when no `--seed` is given.
const DEFAULT_SCENE_SEED: u64 = 0;

/// How often the monitor wakes to check progress and the time limit.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Minimum time between "Scanlines remaining" log lines.
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    log::info!("Lumen {}", env!("CARGO_PKG_VERSION"));

    let target = OutputTarget::from_arg(&args.output)?;
    let scene = lumen_scene::load(&args.scene, args.seed.unwrap_or(DEFAULT_SCENE_SEED))
        .with_context(|| format!("failed to load scene '{}'", args.scene))?;

    let mut config = scene.camera;
    if let Some(width) = args.width {
        config.image_width = width;
    }
    if let Some(samples) = args.samples {
        config.samples_per_pixel = samples;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    let camera = Camera::initialize(config).context("invalid camera settings")?;

    let progress = Arc::new(Progress::new());
    let cancel = CancelToken::new();
    let mut options = RenderOptions::new()
        .with_progress(progress.clone())
        .with_cancel(cancel.clone());
    options.seed = args.seed;
    options.threads = args.threads;

    let mode = if args.single {
        "Single-threaded"
    } else {
        "Multi-threaded"
    };
    log::info!("Starting {} render of '{}'", mode.to_lowercase(), scene.name);

    let start = Instant::now();
    let done = AtomicBool::new(false);
    let result = std::thread::scope(|s| {
        s.spawn(|| monitor(&progress, &cancel, &done, args.time_limit));

        let result = match (&target, args.single) {
            (OutputTarget::Stdout, false) => {
                render_to_writer(&camera, &scene.world, &options, std::io::stdout().lock())
                    .map(|()| None)
            }
            (_, false) => render(&camera, &scene.world, &options).map(Some),
            (_, true) => render_single(&camera, &scene.world, &options).map(Some),
        };
        done.store(true, Ordering::Relaxed);
        result
    });

    let image = match result {
        Err(RenderError::Cancelled) => {
            anyhow::bail!(
                "render cancelled after {:?} with {} scanlines remaining",
                start.elapsed(),
                progress.rows_remaining()
            )
        }
        other => other.context("render failed")?,
    };

    log::info!("Rendering completed in: {:?}", start.elapsed());
    log::info!("Mode: {}", mode);

    if let Some(image) = image {
        target.save(&image)?;
    }

    Ok(())
}

/// Log remaining scanlines while a render runs, and cancel it once the
/// time limit passes. Returns when `done` is set.
fn monitor(progress: &Progress, cancel: &CancelToken, done: &AtomicBool, time_limit: Option<f64>) {
    let deadline = deadline_after(Instant::now(), time_limit);
    let mut last_report: Option<(Instant, u32)> = None;

    while !done.load(Ordering::Relaxed) {
        let remaining = progress.rows_remaining();
        let due = match last_report {
            None => progress.total_rows() > 0,
            Some((at, reported)) => reported != remaining && at.elapsed() >= REPORT_INTERVAL,
        };
        if due {
            log::info!(
                "Scanlines remaining: {} ({:.0}% done)",
                remaining,
                progress.fraction() * 100.0
            );
            last_report = Some((Instant::now(), remaining));
        }

        if let Some(deadline) = deadline {
            if Instant::now() >= deadline && !cancel.is_cancelled() {
                log::warn!("Time limit reached, cancelling render");
                cancel.cancel();
            }
        }

        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Instant at which a render started at `start` runs out of time.
///
/// Limits too large to represent mean no deadline.
fn deadline_after(start: Instant, time_limit: Option<f64>) -> Option<Instant> {
    let limit = Duration::try_from_secs_f64(time_limit?).ok()?;
    start.checked_add(limit)
}
