//! Frame scheduler integration tests: ordering, lifecycle, contact events and
//! overlays, driven headless through the public API.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use glam::{UVec2, Vec2};

use kinetic2d::components::animation::Animation;
use kinetic2d::components::physicalproperties::PhysicalProperties;
use kinetic2d::entities::shape::RectangleShape;
use kinetic2d::entities::sprite::Sprite;
use kinetic2d::events::collision::CollisionEvent;
use kinetic2d::render::{Color, DrawCommand, DrawLayer, RecordingRenderer};
use kinetic2d::resources::scene::Scene;
use kinetic2d::resources::texture::TextureInfo;
use kinetic2d::systems::scheduler::{FrameReport, Scheduler};
use kinetic2d::systems::time::ManualClock;

fn scheduler() -> Scheduler<ManualClock> {
    Scheduler::new(ManualClock::from_millis(16))
}

fn block(id: &str, position: Vec2, size: Vec2) -> RectangleShape {
    RectangleShape::new(id, "block", size).with_position(position)
}

fn begins(report: &FrameReport) -> usize {
    report
        .events
        .iter()
        .filter(|e| matches!(e, CollisionEvent::Begin(_)))
        .count()
}

fn ends(report: &FrameReport) -> usize {
    report
        .events
        .iter()
        .filter(|e| matches!(e, CollisionEvent::End(_)))
        .count()
}

// ==== CONTACT EVENT TESTS ====

#[test]
fn test_ghost_passes_through_static_with_begin_and_end() {
    let mut scene = Scene::new();
    scene.add(
        block("ghost", Vec2::ZERO, Vec2::splat(10.0)).with_physics(
            PhysicalProperties::ghost()
                .with_velocity(Vec2::new(0.0, 5.0))
                .with_damping(0.0),
        ),
    );
    scene.add(
        block("floor", Vec2::new(0.0, 20.0), Vec2::new(100.0, 10.0))
            .with_physics(PhysicalProperties::immovable()),
    );

    let log = Rc::new(RefCell::new(Vec::new()));
    let floor = scene.entity_mut("floor").unwrap().core_mut();
    let begin_log = log.clone();
    floor.hooks.on_collision_begin(move |core, peer, _| {
        begin_log.borrow_mut().push(format!("begin {} {}", core.id(), peer.id));
        Ok(())
    });
    let end_log = log.clone();
    floor.hooks.on_collision_end(move |core, peer, _| {
        end_log.borrow_mut().push(format!("end {} {}", core.id(), peer.id));
        Ok(())
    });

    let mut renderer = RecordingRenderer::new();
    let reports = scheduler().run_frames(&mut scene, &mut renderer, 10);

    let begin_frames: Vec<u64> = reports.iter().filter(|r| begins(r) > 0).map(|r| r.frame).collect();
    let end_frames: Vec<u64> = reports.iter().filter(|r| ends(r) > 0).map(|r| r.frame).collect();
    assert_eq!(begin_frames, vec![2]);
    assert_eq!(end_frames, vec![7]);
    assert_eq!(*log.borrow(), vec!["begin floor ghost", "end floor ghost"]);

    let ghost = scene.entity("ghost").unwrap().core();
    assert_eq!(ghost.velocity(), Vec2::new(0.0, 5.0));
    assert_eq!(ghost.position(), Vec2::new(0.0, 50.0));
}

#[test]
fn test_end_fires_on_survivor_when_peer_is_destroyed() {
    let mut scene = Scene::new();
    let ended = Rc::new(RefCell::new(Vec::new()));
    let mut sensor = block("sensor", Vec2::ZERO, Vec2::splat(10.0))
        .with_physics(PhysicalProperties::ghost());
    let ended_hook = ended.clone();
    sensor.core.hooks.on_collision_end(move |_, peer, _| {
        ended_hook.borrow_mut().push(peer.id.clone());
        Ok(())
    });
    scene.add(sensor);
    scene.add(
        block("coin", Vec2::splat(2.0), Vec2::splat(4.0))
            .with_physics(PhysicalProperties::ghost()),
    );

    let mut sched = scheduler();
    let mut renderer = RecordingRenderer::new();
    let first = sched.run_frame(&mut scene, &mut renderer);
    assert_eq!(begins(&first), 1);

    scene.entity_mut("coin").unwrap().core_mut().destroy();
    let second = sched.run_frame(&mut scene, &mut renderer);
    assert_eq!(second.reaped, vec!["coin"]);
    assert_eq!(ends(&second), 1);
    assert_eq!(*ended.borrow(), vec!["coin"]);
}

#[test]
fn test_body_comes_to_rest_on_ground() {
    for ground_first in [false, true] {
        let mut scene = Scene::new();
        scene.set_gravity_down(0.01);
        let body = block("body", Vec2::ZERO, Vec2::splat(10.0))
            .with_physics(PhysicalProperties::new());
        let ground = block("ground", Vec2::new(0.0, 50.0), Vec2::new(100.0, 10.0))
            .with_physics(PhysicalProperties::immovable());
        if ground_first {
            scene.add(ground);
            scene.add(body);
        } else {
            scene.add(body);
            scene.add(ground);
        }

        scheduler().run_frames(&mut scene, &mut RecordingRenderer::new(), 300);

        let core = scene.entity("body").unwrap().core();
        let y = core.position().y;
        assert!((39.9..41.0).contains(&y), "resting y {} (ground first: {})", y, ground_first);
        assert!(core.velocity().y.abs() < 0.5);
        assert!(scene.has_collision("body"));
        assert_eq!(scene.collisions_of("ground"), vec!["body"]);
        assert_eq!(scene.entity("ground").unwrap().core().position(), Vec2::new(0.0, 50.0));
    }
}

// ==== LIFECYCLE TESTS ====

#[test]
fn test_destroyed_mid_frame_is_not_rendered_and_gone_next_frame() {
    let mut scene = Scene::new();
    scene.add_texture(TextureInfo::new("tex", 8, 8));
    let mut hunter = Sprite::new("hunter", "enemy").with_texture("tex");
    hunter.core.hooks.on_pre_draw(|_, ctx| {
        ctx.destroy("prey");
        Ok(())
    });
    scene.add(hunter);
    scene.add(Sprite::new("prey", "player").with_texture("tex").with_position(Vec2::splat(50.0)));

    let mut sched = scheduler();
    let mut renderer = RecordingRenderer::new();
    let report = sched.run_frame(&mut scene, &mut renderer);
    assert_eq!(report.rendered, vec!["hunter"]);
    assert_eq!(report.reaped, vec!["prey"]);
    assert_eq!(renderer.sprite_textures(), vec!["tex"]);
    assert!(!scene.contains("prey"));
    assert_eq!(scene.entities.len(), 1);
}

#[test]
fn test_retagged_entity_keeps_id_and_tag_across_frames() {
    let mut scene = Scene::new();
    scene.add(block("crate", Vec2::ZERO, Vec2::ONE));
    scene.add(block("wall", Vec2::splat(50.0), Vec2::ONE));
    assert!(scene.retag("crate", "loot"));

    let mut sched = scheduler();
    let mut renderer = RecordingRenderer::new();
    sched.run_frame(&mut scene, &mut renderer);

    assert!(scene.contains("crate"));
    assert_eq!(scene.entity("crate").unwrap().core().id(), "crate");
    assert_eq!(scene.entities.by_tag("loot").len(), 1);
    assert_eq!(scene.entities.by_tag("block").len(), 1);

    assert_eq!(scene.entities.remove_tag("block"), 1);
    assert!(scene.contains("crate"));
    assert!(!scene.contains("wall"));
}

#[test]
fn test_entities_added_by_hook_wait_for_next_frame() {
    let mut scene = Scene::new();
    let mut emitter = block("emitter", Vec2::ZERO, Vec2::ONE);
    emitter.core.hooks.on_pre_draw(|core, ctx| {
        let id = format!("spark-{}", ctx.time.frame_count);
        ctx.spawn(RectangleShape::new(id, "spark", Vec2::ONE).with_position(core.position()));
        Ok(())
    });
    scene.add(emitter);

    let mut sched = scheduler();
    let mut renderer = RecordingRenderer::new();
    let first = sched.run_frame(&mut scene, &mut renderer);
    assert_eq!(first.rendered, vec!["emitter"]);
    let second = sched.run_frame(&mut scene, &mut renderer);
    assert_eq!(second.rendered, vec!["emitter", "spark-0"]);
    assert_eq!(scene.entities.by_tag("spark").len(), 2);
}

#[test]
fn test_pre_layer_draw_from_hook_lands_next_frame() {
    let mut scene = Scene::new();
    let mut painter = block("painter", Vec2::ZERO, Vec2::ONE);
    painter.core.hooks.on_post_draw(|_, ctx| {
        ctx.enqueue(
            DrawCommand::Line {
                from: Vec2::ZERO,
                to: Vec2::splat(10.0),
                color: Color::RED,
            },
            DrawLayer::Pre,
        );
        ctx.enqueue(
            DrawCommand::Circle {
                center: Vec2::ZERO,
                radius: 2.0,
                color: Color::BLUE,
            },
            DrawLayer::Post,
        );
        Ok(())
    });
    scene.add(painter);

    let mut sched = scheduler();
    let mut renderer = RecordingRenderer::new();
    sched.run_frame(&mut scene, &mut renderer);
    assert_eq!(renderer.last_frame.len(), 2);
    assert!(matches!(renderer.last_frame[1], DrawCommand::Circle { .. }));

    sched.run_frame(&mut scene, &mut renderer);
    assert_eq!(renderer.last_frame.len(), 3);
    assert!(matches!(renderer.last_frame[0], DrawCommand::Line { .. }));
    assert_eq!(scene.queued_draws(DrawLayer::Pre), 1);
}

// ==== ANIMATION TESTS ====

#[test]
fn test_animated_sprite_draws_advancing_frames() {
    let mut scene = Scene::new();
    let tex = TextureInfo::new("sheet", 64, 16);
    let anim = Animation::looping("run", &tex, UVec2::splat(16), Duration::ZERO);
    let runner = Sprite::new("runner", "npc").with_animation(&anim);
    scene.add_texture(tex);
    scene.add_animation(anim);
    scene.add(runner);

    let mut sched = scheduler();
    let mut renderer = RecordingRenderer::new();
    let mut lefts = Vec::new();
    for _ in 0..5 {
        sched.run_frame(&mut scene, &mut renderer);
        match &renderer.last_frame[0] {
            DrawCommand::Sprite(s) => {
                assert_eq!(s.origin, Vec2::splat(8.0));
                lefts.push(s.source.left);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
    assert_eq!(lefts, vec![16, 32, 48, 0, 16]);
}

#[test]
fn test_missing_animation_degrades_to_no_draw() {
    let mut scene = Scene::new();
    let tex = TextureInfo::new("sheet", 64, 16);
    let anim = Animation::looping("gone", &tex, UVec2::splat(16), Duration::ZERO);
    scene.add_texture(tex);
    scene.add(Sprite::new("orphan", "npc").with_animation(&anim));

    let mut renderer = RecordingRenderer::new();
    let report = scheduler().run_frame(&mut scene, &mut renderer);
    assert_eq!(report.rendered, vec!["orphan"]);
    assert!(renderer.last_frame.is_empty());
}

// ==== OVERLAY TESTS ====

#[test]
fn test_entity_overlay_follows_each_entity() {
    let mut scene = Scene::new();
    scene.drawing_options.show_ids = true;
    scene.drawing_options.show_bounds = true;
    scene.add(block("a", Vec2::ZERO, Vec2::ONE));
    scene.add(block("b", Vec2::splat(5.0), Vec2::ONE));

    let mut renderer = RecordingRenderer::new();
    scheduler().run_frame(&mut scene, &mut renderer);
    assert_eq!(renderer.texts(), vec!["Id: a\n", "Id: b\n"]);
    assert_eq!(renderer.last_frame.len(), 6);
}

#[test]
fn test_view_overlay_appears_after_warmup() {
    let mut scene = Scene::new();
    scene.drawing_options.show_fps = true;
    scene.drawing_options.show_delta_time = true;

    let mut sched = Scheduler::new(ManualClock::from_millis(20));
    let mut renderer = RecordingRenderer::new();
    sched.run_frames(&mut scene, &mut renderer, 5);
    assert!(renderer.texts().is_empty());
    sched.run_frame(&mut scene, &mut renderer);
    assert_eq!(renderer.texts(), vec!["FPS: 50.00\nDeltaTime: 20.00 ms\n"]);
}

#[test]
fn test_clear_color_and_present_count() {
    let mut scene = Scene::new();
    scene.drawing_options.clear_color = Color::rgba(10, 20, 30, 255);
    let mut renderer = RecordingRenderer::new();
    scheduler().run_frames(&mut scene, &mut renderer, 3);
    assert_eq!(renderer.presented, 3);
}
