//! kinetic2d demo runner.
//!
//! Builds a small scene (a static ground, falling crates, a ghost trigger
//! zone and an animated walker whose pose follows its velocity) and runs it.
//!
//! - default build: headless, a fixed number of frames with a fixed frame
//!   step, optionally dumping a JSON snapshot of the final scene
//! - `--features raylib`: opens a window and runs until it is closed
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --frames 600 --dump scene.json
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use glam::{UVec2, Vec2};
use log::{info, warn};
use serde::Serialize;

use kinetic2d::components::animation::Animation;
use kinetic2d::components::physicalproperties::PhysicalProperties;
use kinetic2d::components::state::StateBinding;
use kinetic2d::entities::circle::CircleShape;
use kinetic2d::entities::convex::ConvexShape;
use kinetic2d::entities::shape::RectangleShape;
use kinetic2d::entities::sprite::Sprite;
use kinetic2d::entities::statefulsprite::StatefulSprite;
use kinetic2d::events::collision::CollisionRecord;
use kinetic2d::render::{Color, DrawCommand, DrawLayer};
use kinetic2d::resources::engineconfig::EngineConfig;
use kinetic2d::resources::scene::Scene;
use kinetic2d::resources::texture::TextureInfo;
use kinetic2d::systems::scheduler::Scheduler;

/// Gravity used when the configuration leaves it at zero.
const DEMO_GRAVITY: f32 = 0.01;
const GROUND_HEIGHT: f32 = 20.0;
const CRATE_SIZE: u32 = 32;

/// kinetic2d: 2D entity simulation demo
#[derive(Parser)]
#[command(version, about = "Runs the kinetic2d demo scene.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, short, value_name = "PATH", default_value = "config.ini")]
    config: PathBuf,

    /// Number of frames to simulate (headless only).
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Number of falling crates.
    #[arg(long, default_value_t = 8)]
    crates: usize,

    /// Seed for crate placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Write a JSON snapshot of the final scene to this path.
    #[arg(long, value_name = "PATH")]
    dump: Option<PathBuf>,

    /// Write the current configuration to the config path and exit.
    #[arg(long)]
    write_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Pose {
    Idle,
    Walk,
}

#[derive(Serialize)]
struct EntitySnapshot {
    id: String,
    tag: String,
    position: Vec2,
    rotation: f32,
    physics: Option<PhysicalProperties>,
    animation: Option<String>,
    state: Option<String>,
}

#[derive(Serialize)]
struct SceneSnapshot {
    frame_count: u64,
    elapsed_ms: u128,
    gravity: Vec2,
    entities: Vec<EntitySnapshot>,
    collisions: Vec<CollisionRecord>,
}

fn snapshot(scene: &Scene) -> SceneSnapshot {
    let entities = scene
        .entities
        .all()
        .into_iter()
        .map(|e| {
            let core = e.core();
            EntitySnapshot {
                id: core.id().to_string(),
                tag: core.tag().to_string(),
                position: core.position(),
                rotation: core.transform.rotation,
                physics: core.physics.clone(),
                animation: e.animation_id().map(str::to_string),
                state: e.state_name(),
            }
        })
        .collect();
    let mut collisions: Vec<_> = scene.collisions().iter().collect();
    collisions.sort_by(|x, y| x.0.cmp(y.0));
    SceneSnapshot {
        frame_count: scene.time.frame_count,
        elapsed_ms: scene.time.elapsed.as_millis(),
        gravity: scene.gravity,
        entities,
        collisions: collisions.into_iter().map(|(_, r)| r.clone()).collect(),
    }
}

fn build_scene(config: &EngineConfig, crates: usize, rng: &mut fastrand::Rng) -> Result<Scene, String> {
    let mut scene = Scene::from_config(config);
    if scene.gravity == Vec2::ZERO {
        scene.set_gravity_down(DEMO_GRAVITY);
    }
    let width = config.window_width as f32;
    let height = config.window_height as f32;

    let crate_tex =
        TextureInfo::new("crate", CRATE_SIZE, CRATE_SIZE).with_source("assets/textures/crate.png");
    let walker_tex = TextureInfo::new("walker", 128, 64).with_source("assets/textures/walker.png");
    let frame = UVec2::splat(32);
    let idle = Animation::still("walker_idle", &walker_tex, Some(frame));
    let walk = Animation::looping("walker_walk", &walker_tex, frame, Duration::from_millis(100))
        .with_range(4, 7)?;
    scene.add_texture(crate_tex);
    scene.add_texture(walker_tex);

    scene.add(
        RectangleShape::new("ground", "static", Vec2::new(width, GROUND_HEIGHT))
            .with_position(Vec2::new(0.0, height - GROUND_HEIGHT))
            .with_fill(Color::rgba(90, 90, 90, 255))
            .with_physics(PhysicalProperties::immovable()),
    );

    scene.add(
        ConvexShape::new(
            "ramp",
            "static",
            vec![Vec2::new(0.0, 40.0), Vec2::new(80.0, 0.0), Vec2::new(80.0, 40.0)],
        )
        .with_position(Vec2::new(width - 80.0, height - GROUND_HEIGHT - 40.0))
        .with_fill(Color::rgba(120, 100, 80, 255))
        .with_outline(Color::BLACK, 1.0)
        .with_physics(PhysicalProperties::immovable()),
    );
    scene.add(
        CircleShape::new("ball", "ball", 12.0)
            .with_position(Vec2::new(width / 4.0, 0.0))
            .with_fill(Color::RED)
            .with_physics(PhysicalProperties::new().with_restitution(0.8)),
    );

    for i in 0..crates {
        let x = rng.f32() * (width - CRATE_SIZE as f32);
        let y = rng.f32() * height / 2.0;
        let mass = 0.5 + rng.f32() * 2.0;
        scene.add(
            Sprite::new(format!("crate-{}", i), "crate")
                .with_texture("crate")
                .with_position(Vec2::new(x, y))
                .with_physics(PhysicalProperties::new().with_mass(mass).with_restitution(0.3)),
        );
    }

    let mut trigger = RectangleShape::new("trigger", "zone", Vec2::new(width / 4.0, height / 4.0))
        .with_position(Vec2::new(width * 0.375, height / 2.0))
        .with_fill(Color::rgba(0, 255, 0, 40))
        .with_physics(PhysicalProperties::ghost());
    trigger.core.draw_index = -1;
    trigger.core.hooks.on_collision_begin(|_, peer, ctx| {
        info!("'{}' entered the trigger zone", peer.id);
        ctx.enqueue(
            DrawCommand::Circle {
                center: peer.position,
                radius: 6.0,
                color: Color::GREEN,
            },
            DrawLayer::Post,
        );
        Ok(())
    });
    trigger.core.hooks.on_collision_end(|_, peer, _| {
        info!("'{}' left the trigger zone", peer.id);
        Ok(())
    });
    scene.add(trigger);

    let mut walker = StatefulSprite::new(
        "walker",
        "npc",
        vec![
            StateBinding::new(Pose::Idle, idle.id())
                .when(|core| core.velocity().x.abs() <= 0.1),
            StateBinding::new(Pose::Walk, walk.id())
                .when(|core| core.velocity().x.abs() > 0.1),
        ],
        Some(Pose::Idle),
    )
    .with_position(Vec2::new(width / 2.0, height - GROUND_HEIGHT - 64.0))
    .with_physics(
        PhysicalProperties::new()
            .with_velocity(Vec2::new(1.5, 0.0))
            .with_damping(0.0),
    )
    .with_draw_index(1);
    walker.core.hooks.on_pre_draw(move |core, _| {
        let x = core.position().x;
        if let Some(p) = core.physics.as_mut()
            && ((x < 0.0 && p.velocity.x < 0.0) || (x > width && p.velocity.x > 0.0))
        {
            p.velocity.x = -p.velocity.x;
        }
        Ok(())
    });
    scene.add_animation(idle);
    scene.add_animation(walk);
    scene.add(walker);

    Ok(scene)
}

#[cfg(not(feature = "raylib"))]
fn run_headless(config: &EngineConfig, mut scene: Scene, frames: u64) -> Scene {
    use kinetic2d::render::RecordingRenderer;
    use kinetic2d::systems::time::ManualClock;

    let step = 1000 / u64::from(config.target_fps.max(1));
    let mut scheduler = Scheduler::new(ManualClock::from_millis(step));
    scheduler.on_frame(|scene| {
        if scene.time.frame_count % 120 == 0 {
            info!(
                "frame {}: {} entities, {} contacts",
                scene.time.frame_count,
                scene.entities.len(),
                scene.collisions().len()
            );
        }
    });
    let mut renderer = RecordingRenderer::new();
    let reports = scheduler.run_frames(&mut scene, &mut renderer, frames);
    let events: usize = reports.iter().map(|r| r.events.len()).sum();
    info!(
        "Simulated {} frames ({} collision events, {} commands in the last frame)",
        reports.len(),
        events,
        renderer.last_frame.len()
    );
    scene
}

#[cfg(feature = "raylib")]
fn run_window(config: &EngineConfig, mut scene: Scene) -> Result<Scene, String> {
    use kinetic2d::render::raylib_backend::RaylibRenderer;

    let mut renderer = RaylibRenderer::open(config);
    renderer.load_textures(&scene.assets.textures)?;
    let mut scheduler = Scheduler::default();
    while !renderer.should_close() {
        scheduler.run_frame(&mut scene, &mut renderer);
    }
    Ok(scene)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = EngineConfig::with_path(cli.config.clone());
    if cli.write_config {
        match config.save_to_file() {
            Ok(()) => println!("Configuration written to {}", cli.config.display()),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }

    let mut rng = match cli.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let scene = match build_scene(&config, cli.crates, &mut rng) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Error building scene: {e}");
            std::process::exit(1);
        }
    };

    #[cfg(feature = "raylib")]
    let scene = match run_window(&config, scene) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    #[cfg(not(feature = "raylib"))]
    let scene = run_headless(&config, scene, cli.frames);

    if let Some(path) = cli.dump {
        let result = serde_json::to_string_pretty(&snapshot(&scene))
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));
        match result {
            Ok(()) => info!("Scene snapshot written to {}", path.display()),
            Err(e) => {
                eprintln!("Error writing snapshot: {e}");
                std::process::exit(1);
            }
        }
    }
}
