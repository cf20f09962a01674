//! Built-in scenes and their default cameras.

use std::sync::Arc;

use clap::ValueEnum;
use lumen_math::{gen_f32, gen_f32_range, random_vec3, random_vec3_range, Point3, Vec3};
use lumen_renderer::{
    CameraSettings, Color, Dielectric, HittableList, Lambertian, Material, Metal, Sphere,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Scenes that can be rendered without a scene file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Field of small random spheres around three large ones
    Cover,
    /// Row of mirror spheres sharing one material
    Metal,
    /// Row of glass spheres with small metal spheres behind them
    #[default]
    Glass,
    /// Three spheres on a yellow ground, the left one a hollow glass bubble
    Hollow,
}

impl SceneKind {
    /// Populate the scene. Random placement and materials are drawn from `rng`.
    pub fn build(self, rng: &mut dyn RngCore) -> HittableList {
        let world = match self {
            SceneKind::Cover => cover_scene(rng),
            SceneKind::Metal => metal_scene(),
            SceneKind::Glass => glass_scene(),
            SceneKind::Hollow => hollow_scene(),
        };
        log::info!("Built {:?} scene with {} spheres", self, world.len());
        world
    }

    /// Camera that frames the scene.
    pub fn camera(self) -> CameraSettings {
        let settings = CameraSettings::default();
        match self {
            SceneKind::Cover => settings
                .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
                .with_lens(20.0, 0.1, 10.0),
            SceneKind::Metal | SceneKind::Glass => settings
                .with_position(Point3::new(4.0, 1.0, -0.6), Point3::new(0.0, 0.0, -0.6), Vec3::Y)
                .with_lens(55.0, 0.0, 10.0),
            SceneKind::Hollow => settings
                .with_position(Point3::new(-2.0, 2.0, 1.0), Point3::new(0.0, 0.0, -1.0), Vec3::Y)
                .with_lens(20.0, 0.0, 3.4),
        }
    }
}

fn sphere(world: &mut HittableList, center: Point3, radius: f32, material: &Arc<dyn Material>) {
    world.add(Box::new(Sphere::new(center, radius, Arc::clone(material))));
}

fn ground(world: &mut HittableList, y: f32) {
    let gray: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
    sphere(world, Point3::new(0.0, y, 0.0), 1000.0, &gray);
}

fn cover_scene(rng: &mut dyn RngCore) -> HittableList {
    let mut world = HittableList::new();
    ground(&mut world, -1000.0);

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let keep_clear = Point3::new(4.0, 0.2, 0.0);

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Point3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );

            if (center - keep_clear).length() <= 0.9 {
                continue;
            }

            let material: Arc<dyn Material> = if choose_mat < 0.8 {
                // diffuse
                let albedo = random_vec3(rng) * random_vec3(rng);
                Arc::new(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                let albedo = random_vec3_range(rng, 0.5, 1.0);
                let fuzz = gen_f32_range(rng, 0.0, 0.5);
                Arc::new(Metal::new(albedo, fuzz))
            } else {
                Arc::clone(&glass)
            };
            sphere(&mut world, center, 0.2, &material);
        }
    }

    sphere(&mut world, Point3::new(0.0, 1.0, 0.0), 1.0, &glass);

    let brown: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1)));
    sphere(&mut world, Point3::new(-4.0, 1.0, 0.0), 1.0, &brown);

    let mirror: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0));
    sphere(&mut world, Point3::new(4.0, 1.0, 0.0), 1.0, &mirror);

    world
}

fn metal_scene() -> HittableList {
    let mut world = HittableList::new();
    ground(&mut world, -1000.5);

    let metal: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0));
    for x in [0.0, 1.25, -1.25] {
        sphere(&mut world, Point3::new(x, 0.0, 0.0), 0.5, &metal);
    }
    for x in [0.0, -0.75, 0.75] {
        sphere(&mut world, Point3::new(x, 0.75, 0.5), 0.2, &metal);
    }

    world
}

fn glass_scene() -> HittableList {
    let mut world = HittableList::new();
    ground(&mut world, -1000.5);

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let metal: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0));
    for x in [0.0, 1.25, -1.25] {
        sphere(&mut world, Point3::new(x, 0.0, 0.0), 0.5, &glass);
        sphere(&mut world, Point3::new(x, -0.3, -1.0), 0.2, &metal);
    }

    world
}

fn hollow_scene() -> HittableList {
    let mut world = HittableList::new();

    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0)));
    let center: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5)));
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let gold: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.0));

    sphere(&mut world, Point3::new(0.0, -100.5, -1.5), 100.0, &ground);
    sphere(&mut world, Point3::new(0.0, 0.0, -1.0), 0.5, &center);
    // Negative inner radius turns the glass ball into a thin bubble
    sphere(&mut world, Point3::new(-1.0, 0.0, -1.0), 0.5, &glass);
    sphere(&mut world, Point3::new(-1.0, 0.0, -1.0), -0.45, &glass);
    sphere(&mut world, Point3::new(1.0, 0.0, -1.0), 0.5, &gold);

    world
}
