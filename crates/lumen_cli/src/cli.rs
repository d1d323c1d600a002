use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "A CPU path tracer for spheres", version)]
pub struct Args {
    /// Built-in scene name (three_spheres, cover, ground) or a JSON scene file
    #[arg(long, default_value = "three_spheres")]
    pub scene: String,

    /// Output path: `-` streams PPM to stdout, otherwise `.ppm` or `.png`
    #[arg(short, long, default_value = "-")]
    pub output: String,

    /// Image width in pixels; height follows the scene's aspect ratio
    #[arg(long)]
    pub width: Option<u32>,

    /// Samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum ray bounces
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Base seed; the same seed renders the same image
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads (defaults to one per core)
    #[arg(long, short = 'j')]
    pub threads: Option<usize>,

    /// Render on a single thread
    #[arg(long)]
    pub single: bool,

    /// Cancel the render after this many seconds
    #[arg(long, value_name = "SECONDS", value_parser = parse_time_limit)]
    pub time_limit: Option<f64>,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

fn parse_time_limit(arg: &str) -> Result<f64, String> {
    let secs: f64 = arg.parse().map_err(|e| format!("{e}"))?;
    if secs.is_finite() && secs >= 0.0 {
        Ok(secs)
    } else {
        Err(format!("expected a finite, non-negative number of seconds, got {arg}"))
    }
}
