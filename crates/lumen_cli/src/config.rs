//! Render settings: JSON settings file merged with command line overrides.

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use lumen_renderer::{CameraSettings, RenderConfig, DEFAULT_BUCKET_SIZE};
use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::scenes::SceneKind;

const DEFAULT_WIDTH: u32 = 400;
const DEFAULT_ASPECT_RATIO: f32 = 16.0 / 9.0;
const DEFAULT_SAMPLES: u32 = 100;
const DEFAULT_MAX_DEPTH: u32 = 50;

/// Contents of a settings file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub scene: Option<SceneKind>,
    pub image_width: Option<u32>,
    pub aspect_ratio: Option<f32>,
    pub samples_per_pixel: Option<u32>,
    pub max_depth: Option<u32>,
    pub seed: Option<u64>,
    pub bucket_size: Option<u32>,
    /// Replaces the scene's camera; its aspect ratio is always taken from the image
    pub camera: Option<CameraSettings>,
}

/// Everything needed to start a render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub scene: SceneKind,
    pub config: RenderConfig,
    pub camera: CameraSettings,
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse settings file {}", path.display()))?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Merge with command line arguments. Flags win over the file, the file
    /// wins over the scene defaults.
    pub fn resolve(&self, args: &Args) -> Result<RenderJob> {
        let scene = args.scene.or(self.scene).unwrap_or_default();

        let image_width = args.width.or(self.image_width).unwrap_or(DEFAULT_WIDTH);
        let aspect_ratio = args
            .aspect_ratio
            .or(self.aspect_ratio)
            .unwrap_or(DEFAULT_ASPECT_RATIO);
        ensure!(
            aspect_ratio > 0.0 && aspect_ratio.is_finite(),
            "aspect ratio must be positive, got {aspect_ratio}"
        );

        let config = RenderConfig {
            image_width,
            image_height: image_height(image_width, aspect_ratio),
            samples_per_pixel: args
                .samples
                .or(self.samples_per_pixel)
                .unwrap_or(DEFAULT_SAMPLES),
            max_depth: args.max_depth.or(self.max_depth).unwrap_or(DEFAULT_MAX_DEPTH),
            seed: args.seed.or(self.seed).unwrap_or_default(),
            bucket_size: args
                .bucket_size
                .or(self.bucket_size)
                .unwrap_or(DEFAULT_BUCKET_SIZE),
        };
        config.validate()?;

        let camera = self
            .camera
            .unwrap_or_else(|| scene.camera())
            .with_aspect_ratio(aspect_ratio);

        Ok(RenderJob {
            scene,
            config,
            camera,
        })
    }
}

/// Height for the given width and aspect ratio, never below one pixel.
fn image_height(width: u32, aspect_ratio: f32) -> u32 {
    ((width as f32 / aspect_ratio) as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use lumen_math::Vec3;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["lumen"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).expect("valid arguments")
    }

    #[test]
    fn test_defaults() {
        let job = Settings::default().resolve(&args(&[])).expect("valid settings");

        assert_eq!(job.scene, SceneKind::Glass);
        assert_eq!(job.config.image_width, 400);
        assert_eq!(job.config.image_height, 225);
        assert_eq!(job.config.samples_per_pixel, 100);
        assert_eq!(job.config.max_depth, 50);
        assert_eq!(job.camera, SceneKind::Glass.camera().with_aspect_ratio(16.0 / 9.0));
    }

    #[test]
    fn test_cli_overrides_file() {
        let settings = Settings {
            scene: Some(SceneKind::Metal),
            image_width: Some(800),
            samples_per_pixel: Some(500),
            seed: Some(11),
            ..Settings::default()
        };
        let job = settings
            .resolve(&args(&["--width", "200", "--aspect-ratio", "2", "--scene", "cover"]))
            .expect("valid settings");

        assert_eq!(job.scene, SceneKind::Cover);
        assert_eq!(job.config.image_width, 200);
        assert_eq!(job.config.image_height, 100);
        assert_eq!(job.config.samples_per_pixel, 500);
        assert_eq!(job.config.seed, 11);
        assert_eq!(job.camera.aspect_ratio, 2.0);
    }

    #[test]
    fn test_file_camera_replaces_scene_camera() {
        let json = r#"{
            "scene": "hollow",
            "max_depth": 8,
            "camera": { "look_from": [0.0, 0.0, 2.0], "look_at": [0.0, 0.0, -1.0], "vfov": 40.0 }
        }"#;
        let settings: Settings = serde_json::from_str(json).expect("valid json");
        let job = settings.resolve(&args(&[])).expect("valid settings");

        assert_eq!(job.scene, SceneKind::Hollow);
        assert_eq!(job.config.max_depth, 8);
        assert_eq!(job.camera.look_from, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(job.camera.vfov, 40.0);
        assert_eq!(job.camera.aspect_ratio, 16.0 / 9.0);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: std::result::Result<Settings, _> = serde_json::from_str(r#"{ "sampels": 4 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_values_fail_fast() {
        assert!(Settings::default().resolve(&args(&["-s", "0"])).is_err());
        assert!(Settings::default().resolve(&args(&["--width", "0"])).is_err());
        assert!(Settings::default()
            .resolve(&args(&["--aspect-ratio=-1.5"]))
            .is_err());
    }

    #[test]
    fn test_zero_depth_is_allowed() {
        let job = Settings::default()
            .resolve(&args(&["--max-depth", "0"]))
            .expect("valid settings");
        assert_eq!(job.config.max_depth, 0);
    }

    #[test]
    fn test_image_height_never_zero() {
        assert_eq!(image_height(400, 16.0 / 9.0), 225);
        assert_eq!(image_height(1, 16.0 / 9.0), 1);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = Settings::load("/nonexistent/lumen.json").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/lumen.json"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("lumen_settings_{}.json", std::process::id()));
        fs::write(&path, r#"{ "image_width": 64, "seed": 5 }"#).expect("write settings");

        let settings = Settings::load(&path).expect("valid settings file");
        assert_eq!(settings.image_width, Some(64));
        assert_eq!(settings.seed, Some(5));

        fs::remove_file(&path).ok();
    }
}
