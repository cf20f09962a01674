use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::scenes::SceneKind;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
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

/// Command line arguments.
///
/// Render options left unset fall back to the settings file, then to the
/// scene's defaults.
#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "Offline Monte Carlo path tracer for sphere scenes")]
pub struct Args {
    /// Built-in scene to render
    #[arg(long, value_enum)]
    pub scene: Option<SceneKind>,

    /// JSON settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image width over height; the height is derived from it
    #[arg(long)]
    pub aspect_ratio: Option<f32>,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum number of bounces per path
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Seed for scene generation and sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Edge length of render buckets in pixels
    #[arg(long)]
    pub bucket_size: Option<u32>,

    /// Number of worker threads (defaults to one per core)
    #[arg(long, short = 'j', conflicts_with = "single_threaded")]
    pub threads: Option<usize>,

    /// Render on the main thread, row by row
    #[arg(long)]
    pub single_threaded: bool,

    /// Output file (.ppm or .png), or "-" for PPM on stdout
    #[arg(short, long, default_value = "image.ppm")]
    pub output: PathBuf,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "lumen", "--scene", "glass", "--width", "320", "-s", "8", "--max-depth", "4", "-o", "out.png",
        ])
        .expect("valid arguments");

        assert_eq!(args.scene, Some(SceneKind::Glass));
        assert_eq!(args.width, Some(320));
        assert_eq!(args.samples, Some(8));
        assert_eq!(args.max_depth, Some(4));
        assert_eq!(args.output, PathBuf::from("out.png"));
        assert!(args.aspect_ratio.is_none());
        assert!(!args.single_threaded);
    }

    #[test]
    fn test_threads_conflict_with_single_threaded() {
        let result = Args::try_parse_from(["lumen", "--threads", "4", "--single-threaded"]);
        assert!(result.is_err());
    }
}
