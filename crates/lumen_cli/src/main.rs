use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_renderer::{render, render_parallel, save, write_ppm, Camera, ImageBuffer};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod cli;
mod config;
mod scenes;

use cli::Args;
use config::{RenderJob, Settings};

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    log::info!("Starting lumen");

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let job = settings.resolve(&args)?;

    let image = run(&job, &args)?;
    write_image(&image, &args.output)?;

    Ok(())
}

/// Build the scene and camera, then render on the requested thread setup.
fn run(job: &RenderJob, args: &Args) -> Result<ImageBuffer> {
    let camera = Camera::new(&job.camera).context("invalid camera settings")?;

    // Scene generation and single-threaded sampling use separate streams
    let mut scene_rng = StdRng::seed_from_u64(job.config.seed);
    let world = job.scene.build(&mut scene_rng);

    let image = if args.single_threaded {
        let mut rng = StdRng::seed_from_u64(job.config.seed.wrapping_add(1));
        render(&camera, &world, &job.config, &mut rng)?
    } else if let Some(threads) = args.threads {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("failed to build render thread pool")?;
        pool.install(|| render_parallel(&camera, &world, &job.config))?
    } else {
        render_parallel(&camera, &world, &job.config)?
    };

    Ok(image)
}

fn write_image(image: &ImageBuffer, output: &Path) -> Result<()> {
    if output == Path::new("-") {
        write_ppm(image, io::stdout().lock()).context("failed to write image to stdout")?;
    } else {
        save(image, output).with_context(|| format!("failed to write {}", output.display()))?;
    }
    Ok(())
}
