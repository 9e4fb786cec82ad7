//! State machine and animation playback integration tests: priority
//! hierarchy, predicate precedence and completion callbacks, driven through
//! the scheduler.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use glam::{UVec2, Vec2};

use kinetic2d::components::animation::{Animation, AnimationMode};
use kinetic2d::components::state::{StateBinding, Transition};
use kinetic2d::entities::statefulsprite::StatefulSprite;
use kinetic2d::render::{DrawCommand, RecordingRenderer};
use kinetic2d::resources::scene::Scene;
use kinetic2d::resources::texture::TextureInfo;
use kinetic2d::systems::scheduler::Scheduler;
use kinetic2d::systems::time::ManualClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Pose {
    Idle,
    Walk,
    Attack,
    Hurt,
    Fly,
}

/// 4x2 sheet of 16px frames.
fn sheet() -> TextureInfo {
    TextureInfo::new("hero", 64, 32)
}

fn frame() -> UVec2 {
    UVec2::splat(16)
}

struct Input {
    moving: Rc<Cell<bool>>,
    attack: Rc<Cell<bool>>,
    attacks_done: Rc<Cell<u32>>,
}

fn hero_scene() -> (Scene, Input) {
    let tex = sheet();
    let input = Input {
        moving: Rc::new(Cell::new(false)),
        attack: Rc::new(Cell::new(false)),
        attacks_done: Rc::new(Cell::new(0)),
    };

    let mut scene = Scene::new();
    scene.add_animation(Animation::still("idle", &tex, Some(frame())));
    scene.add_animation(
        Animation::looping("walk", &tex, frame(), Duration::ZERO)
            .with_range(0, 3)
            .unwrap(),
    );
    let done = input.attacks_done.clone();
    scene.add_animation(
        Animation::once("attack", &tex, frame(), Duration::ZERO)
            .with_range(4, 7)
            .unwrap()
            .on_done(move |_| done.set(done.get() + 1)),
    );
    scene.add_texture(tex);

    let (idle_moving, idle_attack) = (input.moving.clone(), input.attack.clone());
    let walk_moving = input.moving.clone();
    let attack = input.attack.clone();
    let hero = StatefulSprite::new(
        "hero",
        "player",
        vec![
            StateBinding::new(Pose::Idle, "idle")
                .when(move |_| !idle_moving.get() && !idle_attack.get()),
            StateBinding::new(Pose::Walk, "walk").when(move |_| walk_moving.get()),
            StateBinding::new(Pose::Attack, "attack").when(move |_| attack.get()),
        ],
        Some(Pose::Idle),
    )
    .with_position(Vec2::new(100.0, 100.0));
    scene.add(hero);
    (scene, input)
}

fn hero_state(scene: &Scene) -> Option<Pose> {
    scene.get::<StatefulSprite<Pose>>("hero")?.current_state()
}

// ==== HIERARCHY TESTS ====

#[test]
fn test_attack_blocks_walk_until_done() {
    let (mut scene, input) = hero_scene();
    let mut sched = Scheduler::new(ManualClock::from_millis(16));
    let mut renderer = RecordingRenderer::new();

    input.moving.set(true);
    sched.run_frame(&mut scene, &mut renderer);
    assert_eq!(hero_state(&scene), Some(Pose::Walk));

    input.attack.set(true);
    sched.run_frame(&mut scene, &mut renderer);
    assert_eq!(hero_state(&scene), Some(Pose::Attack));
    assert_eq!(scene.animation("attack").unwrap().frame_index(), 5);
    match &renderer.last_frame[0] {
        DrawCommand::Sprite(s) => {
            assert_eq!((s.source.left, s.source.top), (16, 16));
            assert_eq!(s.origin, Vec2::splat(8.0));
        }
        other => panic!("unexpected command {:?}", other),
    }

    input.attack.set(false);
    for _ in 0..3 {
        sched.run_frame(&mut scene, &mut renderer);
        assert_eq!(hero_state(&scene), Some(Pose::Attack));
    }
    assert!(scene.animation("attack").unwrap().is_done());
    assert_eq!(scene.animation("attack").unwrap().frame_index(), 7);
    assert_eq!(input.attacks_done.get(), 1);

    sched.run_frame(&mut scene, &mut renderer);
    assert_eq!(hero_state(&scene), Some(Pose::Walk));
    assert_eq!(scene.animation("walk").unwrap().frame_index(), 1);
    assert_eq!(input.attacks_done.get(), 1);
}

#[test]
fn test_direct_transitions_report_outcome() {
    let (mut scene, _input) = hero_scene();
    let Scene {
        entities, assets, ..
    } = &mut scene;
    let hero = entities
        .get_mut("hero")
        .and_then(|e| e.as_any_mut().downcast_mut::<StatefulSprite<Pose>>())
        .unwrap();
    let animations = &mut assets.animations;

    assert_eq!(hero.set_state(Pose::Idle, true, animations), Transition::Unchanged);
    assert_eq!(hero.set_state(Pose::Walk, true, animations), Transition::Adopted);
    assert_eq!(hero.set_state(Pose::Idle, true, animations), Transition::Blocked);
    assert_eq!(hero.current_state(), Some(Pose::Walk));
    assert_eq!(hero.set_state(Pose::Idle, false, animations), Transition::Adopted);
    assert_eq!(hero.set_state(Pose::Fly, false, animations), Transition::UnknownState);
    assert_eq!(hero.current_state(), Some(Pose::Idle));
    assert_eq!(hero.current_state_name().as_deref(), Some("Idle"));
}

#[test]
fn test_adopting_rewinds_animation() {
    let (mut scene, input) = hero_scene();
    let mut sched = Scheduler::new(ManualClock::from_millis(16));
    input.moving.set(true);
    sched.run_frames(&mut scene, &mut RecordingRenderer::new(), 3);
    assert_eq!(scene.animation("walk").unwrap().frame_index(), 3);

    let Scene {
        entities, assets, ..
    } = &mut scene;
    let hero = entities
        .get_mut("hero")
        .and_then(|e| e.as_any_mut().downcast_mut::<StatefulSprite<Pose>>())
        .unwrap();
    assert_eq!(hero.set_state(Pose::Idle, false, &mut assets.animations), Transition::Adopted);
    assert_eq!(hero.set_state(Pose::Walk, true, &mut assets.animations), Transition::Adopted);
    assert_eq!(assets.animations.get("walk").unwrap().frame_index(), 0);
}

// ==== PREDICATE PRECEDENCE TESTS ====

#[test]
fn test_last_true_predicate_wins_within_a_frame() {
    let tex = sheet();
    let mut scene = Scene::new();
    scene.add_animation(Animation::looping("walk", &tex, frame(), Duration::ZERO));
    scene.add_animation(Animation::looping("fly", &tex, frame(), Duration::ZERO));
    scene.add_texture(tex);
    scene.add(StatefulSprite::new(
        "hero",
        "player",
        vec![
            StateBinding::new(Pose::Walk, "walk").when(|_| true),
            StateBinding::new(Pose::Fly, "fly").when(|_| true),
        ],
        None,
    ));

    let mut sched = Scheduler::new(ManualClock::from_millis(16));
    let mut renderer = RecordingRenderer::new();
    for _ in 0..3 {
        sched.run_frame(&mut scene, &mut renderer);
        assert_eq!(hero_state(&scene), Some(Pose::Fly));
    }
}

#[test]
fn test_higher_priority_earlier_predicate_keeps_state() {
    let tex = sheet();
    let mut scene = Scene::new();
    scene.add_animation(Animation::finite_loop("hurt", &tex, frame(), Duration::ZERO, 5));
    scene.add_animation(Animation::looping("walk", &tex, frame(), Duration::ZERO));
    scene.add_texture(tex);
    scene.add(StatefulSprite::new(
        "hero",
        "player",
        vec![
            StateBinding::new(Pose::Hurt, "hurt").when(|_| true),
            StateBinding::new(Pose::Walk, "walk").when(|_| true),
        ],
        None,
    ));

    let mut sched = Scheduler::new(ManualClock::from_millis(16));
    sched.run_frame(&mut scene, &mut RecordingRenderer::new());
    assert_eq!(hero_state(&scene), Some(Pose::Hurt));
}

#[test]
fn test_predicates_see_entity_core() {
    let tex = sheet();
    let mut scene = Scene::new();
    scene.add_animation(Animation::still("idle", &tex, Some(frame())));
    scene.add_animation(Animation::looping("walk", &tex, frame(), Duration::ZERO));
    scene.add_texture(tex);
    let mut hero = StatefulSprite::new(
        "hero",
        "player",
        vec![
            StateBinding::new(Pose::Idle, "idle").when(|core| core.position().x < 50.0),
            StateBinding::new(Pose::Walk, "walk").when(|core| core.position().x >= 50.0),
        ],
        Some(Pose::Idle),
    );
    hero.core.hooks.on_post_draw(|core, _| {
        core.transform.translate(Vec2::new(30.0, 0.0));
        Ok(())
    });
    scene.add(hero);

    let mut sched = Scheduler::new(ManualClock::from_millis(16));
    let reports = sched.run_frames(&mut scene, &mut RecordingRenderer::new(), 3);
    assert_eq!(reports.len(), 3);
    assert_eq!(hero_state(&scene), Some(Pose::Walk));
    let names = scene.get::<StatefulSprite<Pose>>("hero").unwrap().state_names();
    assert_eq!(names, vec!["Idle", "Walk"]);
}

// ==== PLAYBACK TESTS ====

#[test]
fn test_finite_loop_finishes_after_n_wraps() {
    let tex = sheet();
    let mut textures = kinetic2d::resources::store::ResourceStore::new();
    let fired = Rc::new(Cell::new(0));
    let counter = fired.clone();
    let mut anim = Animation::finite_loop("blink", &tex, frame(), Duration::ZERO, 3)
        .with_range(0, 1)
        .unwrap()
        .on_done(move |a| {
            assert_eq!(a.loops_completed(), 3);
            counter.set(counter.get() + 1);
        });
    textures.upsert(tex);
    assert_eq!(anim.mode(), AnimationMode::FiniteLoop { max_loops: 3 });

    let mut indices = Vec::new();
    for _ in 0..5 {
        anim.update(Duration::from_millis(16), &textures);
        indices.push(anim.frame_index());
    }
    assert_eq!(indices, vec![1, 0, 1, 0, 1]);
    assert!(!anim.is_done());

    anim.update(Duration::from_millis(16), &textures);
    assert!(anim.is_done());
    assert_eq!(anim.frame_index(), 1);
    for _ in 0..10 {
        anim.update(Duration::from_millis(16), &textures);
    }
    assert_eq!(anim.frame_index(), 1);
    assert_eq!(fired.get(), 1);

    anim.reset();
    assert!(!anim.is_done());
    assert_eq!(anim.frame_index(), 0);
}

#[test]
fn test_frame_duration_paces_playback() {
    let tex = sheet();
    let mut textures = kinetic2d::resources::store::ResourceStore::new();
    let mut anim = Animation::looping("walk", &tex, frame(), Duration::from_millis(100));
    textures.upsert(tex);

    let mut changes = 0;
    for _ in 0..20 {
        if anim.update(Duration::from_millis(50), &textures) {
            changes += 1;
        }
    }
    // the first frame change needs 100 ms, then one every other tick
    assert_eq!(changes, 9);
    assert_eq!(anim.frame_index(), 1);
}
