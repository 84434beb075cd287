//! Built-in demo scenes.
//!
//! Every builder takes the target resolution, a random source for the
//! procedural parts and an image cache for textures loaded from disk.

use std::sync::Arc;

use prism_core::ImageCache;
use prism_math::{Color, Vec3};
use rand::RngCore;

use crate::error::BuildResult;
use crate::sampling::{gen_f32, gen_f32_range, random_vec3, random_vec3_range};
use crate::{
    make_box, Background, BvhNode, Camera, CheckerTexture, ConstantMedium, Dielectric,
    DiffuseLight, Hittable, HittableList, ImageTexture, Lambertian, Material, Metal,
    NoiseTexture, Quad, RotateY, Scene, Sphere, Texture, Translate,
};

/// Texture file used by the earth scenes, resolved through the image cache.
pub const EARTH_TEXTURE: &str = "earthmap.jpg";

/// Signature shared by all scene builders.
pub type SceneBuilder =
    fn(u32, u32, &mut dyn RngCore, &mut ImageCache) -> BuildResult<Scene>;

/// All demo scenes in menu order.
pub const SCENES: [(&str, SceneBuilder); 9] = [
    ("Random Spheres", random_spheres),
    ("Checkered Spheres", checkered_spheres),
    ("Earth", earth),
    ("Perlin Spheres", perlin_spheres),
    ("Quad Scene", quads),
    ("Simple Light", simple_light),
    ("Cornell Box", cornell_box),
    ("Cornell Smoke", cornell_smoke),
    ("Final Scene", final_scene),
];

const SKY: Background = Background::Solid(Color::new(0.7, 0.8, 1.0));
const BLACK: Background = Background::Solid(Color::ZERO);

fn camera(
    width: u32,
    height: u32,
    look_from: Vec3,
    look_at: Vec3,
    vfov: f32,
    defocus_angle: f32,
    focus_dist: f32,
) -> Camera {
    Camera::new()
        .with_resolution(width, height)
        .with_position(look_from, look_at, Vec3::Y)
        .with_lens(vfov, defocus_angle, focus_dist)
}

fn lambertian(r: f32, g: f32, b: f32) -> Arc<dyn Material> {
    Arc::new(Lambertian::from_color(Color::new(r, g, b)))
}

fn ground_checker() -> Arc<dyn Texture> {
    Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ))
}

/// The classic cover image: a field of small random spheres around three
/// large ones. Diffuse spheres bounce upward during the shutter interval.
pub fn random_spheres(
    width: u32,
    height: u32,
    rng: &mut dyn RngCore,
    _images: &mut ImageCache,
) -> BuildResult<Scene> {
    let mut world = HittableList::new();

    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(ground_checker()));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground)));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32_range(rng, -1.0, 1.0),
                0.2,
                b as f32 + 0.9 * gen_f32_range(rng, -1.0, 1.0),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = random_vec3(rng) * random_vec3(rng);
                let center2 = center + Vec3::new(0.0, gen_f32_range(rng, 0.0, 0.5), 0.0);
                let material: Arc<dyn Material> = Arc::new(Lambertian::from_color(albedo));
                world.add(Arc::new(Sphere::moving(center, center2, 0.2, material)));
            } else if choose_mat < 0.95 {
                let albedo = random_vec3_range(rng, 0.5, 1.0);
                let fuzz = gen_f32_range(rng, 0.0, 0.5);
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz)))));
            } else {
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5)))));
            }
        }
    }

    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(2.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(0.4, 0.2, 0.1),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    let world = BvhNode::from_list(&world)?;
    let camera = camera(width, height, Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0, 0.0, 10.0);

    Ok(Scene::new("Random Spheres", Arc::new(world), camera, SKY))
}

pub fn checkered_spheres(
    width: u32,
    height: u32,
    _rng: &mut dyn RngCore,
    _images: &mut ImageCache,
) -> BuildResult<Scene> {
    let checker: Arc<dyn Material> = Arc::new(Lambertian::new(ground_checker()));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, checker.clone())));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, checker)));

    let camera = camera(width, height, Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0, 0.0, 10.0);
    Ok(Scene::new("Checkered Spheres", Arc::new(world), camera, SKY))
}

pub fn earth(
    width: u32,
    height: u32,
    _rng: &mut dyn RngCore,
    images: &mut ImageCache,
) -> BuildResult<Scene> {
    let texture = Arc::new(ImageTexture::new(images.load(EARTH_TEXTURE)));
    let surface: Arc<dyn Material> = Arc::new(Lambertian::new(texture));
    let globe = Sphere::new(Vec3::ZERO, 2.0, surface);

    let camera = camera(width, height, Vec3::new(0.0, 0.0, 12.0), Vec3::ZERO, 20.0, 0.0, 10.0);
    Ok(Scene::new("Earth", Arc::new(globe), camera, SKY))
}

pub fn perlin_spheres(
    width: u32,
    height: u32,
    rng: &mut dyn RngCore,
    _images: &mut ImageCache,
) -> BuildResult<Scene> {
    let marble: Arc<dyn Material> =
        Arc::new(Lambertian::new(Arc::new(NoiseTexture::new(4.0, rng))));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, marble.clone())));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble)));

    let camera = camera(width, height, Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0, 0.0, 10.0);
    Ok(Scene::new("Perlin Spheres", Arc::new(world), camera, SKY))
}

pub fn quads(
    width: u32,
    height: u32,
    _rng: &mut dyn RngCore,
    _images: &mut ImageCache,
) -> BuildResult<Scene> {
    let faces = [
        // left red
        (
            Vec3::new(-3.0, -2.0, 5.0),
            Vec3::new(0.0, 0.0, -4.0),
            Vec3::new(0.0, 4.0, 0.0),
            lambertian(1.0, 0.2, 0.2),
        ),
        // back green
        (
            Vec3::new(-2.0, -2.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
            lambertian(0.2, 1.0, 0.2),
        ),
        // right blue
        (
            Vec3::new(3.0, -2.0, 1.0),
            Vec3::new(0.0, 0.0, 4.0),
            Vec3::new(0.0, 4.0, 0.0),
            lambertian(0.2, 0.2, 1.0),
        ),
        // upper orange
        (
            Vec3::new(-2.0, 3.0, 1.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 4.0),
            lambertian(1.0, 0.5, 0.0),
        ),
        // lower teal
        (
            Vec3::new(-2.0, -3.0, 5.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -4.0),
            lambertian(0.2, 0.8, 0.8),
        ),
    ];

    let mut world = HittableList::new();
    for (q, u, v, material) in faces {
        world.add(Arc::new(Quad::new(q, u, v, material)));
    }

    let camera = camera(width, height, Vec3::new(0.0, 0.0, 9.0), Vec3::ZERO, 80.0, 0.0, 10.0);
    Ok(Scene::new("Quad Scene", Arc::new(world), camera, SKY))
}

pub fn simple_light(
    width: u32,
    height: u32,
    rng: &mut dyn RngCore,
    _images: &mut ImageCache,
) -> BuildResult<Scene> {
    let marble: Arc<dyn Material> =
        Arc::new(Lambertian::new(Arc::new(NoiseTexture::new(4.0, rng))));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::from_color(Color::splat(4.0)));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, marble.clone())));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble)));
    world.add(Arc::new(Quad::new(
        Vec3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        light,
    )));

    let camera = camera(
        width,
        height,
        Vec3::new(26.0, 3.0, 6.0),
        Vec3::new(0.0, 2.0, 0.0),
        20.0,
        0.0,
        10.0,
    );
    Ok(Scene::new("Simple Light", Arc::new(world), camera, BLACK))
}

/// Red, green and white walls of the 555-unit Cornell room.
fn cornell_walls(world: &mut HittableList, white: &Arc<dyn Material>) {
    let red = lambertian(0.65, 0.05, 0.05);
    let green = lambertian(0.12, 0.45, 0.15);

    world.add(Arc::new(Quad::new(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    )));
    world.add(Arc::new(Quad::new(
        Vec3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    )));
    // floor
    world.add(Arc::new(Quad::new(
        Vec3::ZERO,
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    )));
    // ceiling
    world.add(Arc::new(Quad::new(
        Vec3::new(555.0, 555.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        white.clone(),
    )));
    // back
    world.add(Arc::new(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white.clone(),
    )));
}

/// The tall and short blocks of the Cornell box, rotated and placed.
fn cornell_blocks(white: &Arc<dyn Material>) -> [Arc<dyn Hittable>; 2] {
    let tall: Arc<dyn Hittable> = Arc::new(make_box(
        Vec3::ZERO,
        Vec3::new(165.0, 330.0, 165.0),
        white.clone(),
    ));
    let tall: Arc<dyn Hittable> = Arc::new(RotateY::new(tall, 15.0));
    let tall: Arc<dyn Hittable> = Arc::new(Translate::new(tall, Vec3::new(265.0, 0.0, 295.0)));

    let short: Arc<dyn Hittable> =
        Arc::new(make_box(Vec3::ZERO, Vec3::splat(165.0), white.clone()));
    let short: Arc<dyn Hittable> = Arc::new(RotateY::new(short, -18.0));
    let short: Arc<dyn Hittable> = Arc::new(Translate::new(short, Vec3::new(130.0, 0.0, 65.0)));

    [tall, short]
}

fn cornell_camera(width: u32, height: u32) -> Camera {
    camera(
        width,
        height,
        Vec3::new(278.0, 278.0, -800.0),
        Vec3::new(278.0, 278.0, 0.0),
        40.0,
        0.0,
        10.0,
    )
}

pub fn cornell_box(
    width: u32,
    height: u32,
    _rng: &mut dyn RngCore,
    _images: &mut ImageCache,
) -> BuildResult<Scene> {
    let white = lambertian(0.73, 0.73, 0.73);
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::from_color(Color::splat(15.0)));

    let mut world = HittableList::new();
    cornell_walls(&mut world, &white);
    world.add(Arc::new(Quad::new(
        Vec3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        light,
    )));
    for block in cornell_blocks(&white) {
        world.add(block);
    }

    Ok(Scene::new("Cornell Box", Arc::new(world), cornell_camera(width, height), BLACK))
}

pub fn cornell_smoke(
    width: u32,
    height: u32,
    _rng: &mut dyn RngCore,
    _images: &mut ImageCache,
) -> BuildResult<Scene> {
    let white = lambertian(0.73, 0.73, 0.73);
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::from_color(Color::splat(7.0)));

    let mut world = HittableList::new();
    cornell_walls(&mut world, &white);
    world.add(Arc::new(Quad::new(
        Vec3::new(113.0, 554.0, 127.0),
        Vec3::new(330.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 305.0),
        light,
    )));

    let [tall, short] = cornell_blocks(&white);
    world.add(Arc::new(ConstantMedium::with_color(tall, 0.01, Color::ZERO)?));
    world.add(Arc::new(ConstantMedium::with_color(short, 0.01, Color::ONE)?));

    Ok(Scene::new("Cornell Smoke", Arc::new(world), cornell_camera(width, height), BLACK))
}

/// Everything at once: a field of boxes, motion blur, glass, metal, smoke,
/// an image texture, noise and an instanced cluster of spheres.
pub fn final_scene(
    width: u32,
    height: u32,
    rng: &mut dyn RngCore,
    images: &mut ImageCache,
) -> BuildResult<Scene> {
    let mut world = HittableList::new();

    let ground = lambertian(0.48, 0.83, 0.53);
    let boxes_per_side = 20;
    let mut boxes1 = HittableList::new();
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let w = 100.0;
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let y1 = gen_f32_range(rng, 1.0, 101.0);

            boxes1.add(Arc::new(make_box(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + w, y1, z0 + w),
                ground.clone(),
            )));
        }
    }
    world.add(Arc::new(BvhNode::from_list(&boxes1)?));

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::from_color(Color::splat(7.0)));
    world.add(Arc::new(Quad::new(
        Vec3::new(123.0, 554.0, 147.0),
        Vec3::new(300.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 265.0),
        light,
    )));

    let center1 = Vec3::new(400.0, 400.0, 200.0);
    let center2 = center1 + Vec3::new(30.0, 0.0, 0.0);
    world.add(Arc::new(Sphere::moving(center1, center2, 50.0, lambertian(0.7, 0.3, 0.1))));

    world.add(Arc::new(Sphere::new(
        Vec3::new(260.0, 150.0, 45.0),
        50.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    )));

    // Glass shell filled with blue smoke
    let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(360.0, 150.0, 145.0),
        70.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(boundary.clone());
    world.add(Arc::new(ConstantMedium::with_color(
        boundary,
        0.2,
        Color::new(0.2, 0.4, 0.9),
    )?));

    // Thin mist over everything
    let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::ZERO,
        5000.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(Arc::new(ConstantMedium::with_color(boundary, 0.0001, Color::ONE)?));

    let earth: Arc<dyn Material> =
        Arc::new(Lambertian::new(Arc::new(ImageTexture::new(images.load(EARTH_TEXTURE)))));
    world.add(Arc::new(Sphere::new(Vec3::new(400.0, 200.0, 400.0), 100.0, earth)));

    let marble: Arc<dyn Material> =
        Arc::new(Lambertian::new(Arc::new(NoiseTexture::new(0.2, rng))));
    world.add(Arc::new(Sphere::new(Vec3::new(220.0, 280.0, 300.0), 80.0, marble)));

    let white = lambertian(0.73, 0.73, 0.73);
    let mut cluster = HittableList::new();
    for _ in 0..1000 {
        cluster.add(Arc::new(Sphere::new(random_vec3_range(rng, 0.0, 165.0), 10.0, white.clone())));
    }
    let cluster: Arc<dyn Hittable> = Arc::new(BvhNode::from_list(&cluster)?);
    let cluster: Arc<dyn Hittable> = Arc::new(RotateY::new(cluster, 15.0));
    world.add(Arc::new(Translate::new(cluster, Vec3::new(-100.0, 270.0, 395.0))));

    let camera = camera(
        width,
        height,
        Vec3::new(478.0, 278.0, -600.0),
        Vec3::new(278.0, 278.0, 0.0),
        40.0,
        0.0,
        10.0,
    );
    Ok(Scene::new("Final Scene", Arc::new(world), camera, BLACK))
}

/// Build a single demo scene by its menu name.
pub fn build_scene(
    name: &str,
    width: u32,
    height: u32,
    rng: &mut dyn RngCore,
    images: &mut ImageCache,
) -> Option<BuildResult<Scene>> {
    SCENES
        .iter()
        .find(|(scene_name, _)| scene_name.eq_ignore_ascii_case(name))
        .map(|(_, builder)| builder(width, height, rng, images))
}

/// The full set of demo scenes, built up front.
#[derive(Debug, Clone, Default)]
pub struct SceneList {
    scenes: Vec<Scene>,
}

impl SceneList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every scene in [`SCENES`].
    pub fn setup(
        width: u32,
        height: u32,
        rng: &mut dyn RngCore,
        images: &mut ImageCache,
    ) -> BuildResult<Self> {
        let mut list = Self::new();
        for (name, builder) in SCENES {
            log::debug!("Building scene '{}'", name);
            list.add(builder(width, height, rng, images)?);
        }
        Ok(list)
    }

    pub fn add(&mut self, scene: Scene) {
        self.scenes.push(scene);
    }

    pub fn get(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    /// Look a scene up by name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<&Scene> {
        self.scenes
            .iter()
            .find(|scene| scene.name.eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> Vec<&str> {
        self.scenes.iter().map(|scene| scene.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn clear(&mut self) {
        self.scenes.clear();
    }
}
