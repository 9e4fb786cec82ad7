//! The frame pass.
//!
//! One call to [`Scheduler::run_frame`] advances a [`Scene`] by exactly one
//! frame, in this order:
//!
//! 1. drain the pre raw-draw queue to the renderer
//! 2. clear every entity's contact flags
//! 3. detach the live entities into a snapshot ordered by draw index, then
//!    insertion order; entities spawned during the frame join afterwards
//! 4. for each snapshot entry: skip if invisible; reap if destroyed;
//!    otherwise state predicates, pre-draw listeners, animation tick,
//!    gravity, collision against every later entry, integration, draw,
//!    post-draw listeners and the entity overlay
//! 5. reattach survivors and drop destroyed entities
//! 6. drain the post raw-draw queue, then the view overlay
//! 7. diff contacts against the previous frame and fire begin/end listeners
//! 8. run frame hooks and present
//! 9. store the measured frame duration as the next frame's delta
//!
//! Listener faults are logged and never abort the pass.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, trace};

use crate::components::hooks::{self, HookContext, HookKind};
use crate::entities::Entity;
use crate::events::collision::{CollisionEvent, CollisionRecord, CollisionSet, diff};
use crate::render::{DrawLayer, Renderer};
use crate::resources::scene::Scene;
use crate::resources::store::Detached;
use crate::systems::debug::{self, FrameStats};
use crate::systems::time::{FrameClock, SystemClock};
use crate::systems::{animation, collision, physics};

/// Called once per frame, after contact events and before presentation.
pub type FrameHook = Box<dyn FnMut(&mut Scene)>;

/// Cooperative stop flag, checked between frames.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// What happened during one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Index of the frame, starting at 0.
    pub frame: u64,
    /// Ids of the entities that reached the draw step, in draw order.
    pub rendered: Vec<String>,
    /// Ids of the entities removed at the end of the pass.
    pub reaped: Vec<String>,
    pub events: Vec<CollisionEvent>,
}

pub struct Scheduler<C: FrameClock = SystemClock> {
    clock: C,
    frame_hooks: Vec<FrameHook>,
    stats: FrameStats,
    stop: StopHandle,
}

impl Default for Scheduler<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock::new())
    }
}

impl<C: FrameClock> Scheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            frame_hooks: Vec::new(),
            stats: FrameStats::new(),
            stop: StopHandle::default(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Register a hook run once per frame, in registration order.
    pub fn on_frame(&mut self, hook: impl FnMut(&mut Scene) + 'static) {
        self.frame_hooks.push(Box::new(hook));
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Run frames until the stop handle is triggered. Returns the number of
    /// frames run.
    pub fn run(&mut self, scene: &mut Scene, renderer: &mut dyn Renderer) -> u64 {
        let mut frames = 0;
        while !self.stop.is_stopped() {
            self.run_frame(scene, renderer);
            frames += 1;
        }
        info!("Scheduler stopped after {} frames", frames);
        frames
    }

    /// Run at most `count` frames, stopping early if the stop handle fires.
    pub fn run_frames(
        &mut self,
        scene: &mut Scene,
        renderer: &mut dyn Renderer,
        count: u64,
    ) -> Vec<FrameReport> {
        let mut reports = Vec::new();
        for _ in 0..count {
            if self.stop.is_stopped() {
                break;
            }
            reports.push(self.run_frame(scene, renderer));
        }
        reports
    }

    /// Advance `scene` by one frame.
    pub fn run_frame(&mut self, scene: &mut Scene, renderer: &mut dyn Renderer) -> FrameReport {
        self.clock.restart();
        let mut report = FrameReport {
            frame: scene.time.frame_count,
            ..FrameReport::default()
        };

        renderer.begin_frame(scene.drawing_options.clear_color);
        for command in scene.drain_draws(DrawLayer::Pre) {
            renderer.draw(&command);
        }

        scene.reset_collision_flags();

        let mut snapshot = scene.entities.detach_all();
        snapshot.sort_by_key(|d| (d.item.core().draw_index, d.seq()));

        let delta = scene.time.delta;
        let delta_millis = scene.time.delta_millis();
        let gravity = scene.gravity;
        let entity_overlay = scene.drawing_options.any_entity_overlay();
        let mut ctx = HookContext::new(scene.time, gravity);
        let mut contacts = CollisionSet::new();

        for i in 0..snapshot.len() {
            {
                let core = snapshot[i].item.core();
                if !core.visible || core.is_destroyed() {
                    continue;
                }
            }

            {
                let entity = &mut *snapshot[i].item;
                entity.update_state(&mut scene.assets.animations);
                hooks::fire(entity.core_mut(), HookKind::PreDraw, &mut ctx);
            }
            apply_requests(&mut ctx, &mut snapshot, scene);
            if snapshot[i].item.core().is_destroyed() {
                continue;
            }

            let (head, tail) = snapshot.split_at_mut(i + 1);
            let entity = &mut *head[i].item;

            animation::advance(entity, &mut scene.assets, delta);
            physics::apply_gravity(entity.core_mut(), gravity);

            for other in tail.iter_mut() {
                let other = &mut *other.item;
                if !other.core().visible || other.core().is_destroyed() {
                    continue;
                }
                if collision::detect_and_resolve(entity, other, &scene.assets) {
                    contacts.record(entity.core(), other.core());
                }
            }

            physics::integrate(entity.core_mut(), delta_millis);

            if let Some(command) = entity.draw_command(&scene.assets) {
                renderer.draw(&command);
            }
            report.rendered.push(entity.core().id().to_string());

            hooks::fire(entity.core_mut(), HookKind::PostDraw, &mut ctx);

            if entity_overlay {
                let entity = &*snapshot[i].item;
                for command in debug::entity_overlay(
                    entity,
                    &scene.assets,
                    &scene.drawing_options,
                    scene.collisions(),
                ) {
                    renderer.draw(&command);
                }
            }
            apply_requests(&mut ctx, &mut snapshot, scene);
        }

        for detached in snapshot {
            let core = detached.item.core();
            if core.visible && core.is_destroyed() {
                debug!("Reaped entity '{}'", core.id());
                report.reaped.push(core.id().to_string());
            } else {
                scene.entities.reattach(detached);
            }
        }
        for spawned in ctx.take_spawned() {
            scene.add_boxed(spawned);
        }

        for command in scene.drain_draws(DrawLayer::Post) {
            renderer.draw(&command);
        }
        if let Some(command) = self.stats.view_overlay(&scene.time, &scene.drawing_options) {
            renderer.draw(&command);
        }

        report.events = diff(scene.collisions(), &contacts);
        for event in &report.events {
            match event {
                CollisionEvent::Begin(record) => {
                    trace!("Collision begin: '{}' / '{}'", record.a.id, record.b.id);
                    fire_pair(scene, record, HookKind::CollisionBegin, &mut ctx);
                }
                CollisionEvent::End(record) => {
                    trace!("Collision end: '{}' / '{}'", record.a.id, record.b.id);
                    fire_pair(scene, record, HookKind::CollisionEnd, &mut ctx);
                }
            }
        }
        scene.replace_collisions(contacts);
        apply_late_requests(&mut ctx, scene);

        for hook in self.frame_hooks.iter_mut() {
            hook(scene);
        }
        renderer.present();

        scene.time.advance(self.clock.elapsed());
        report
    }
}

/// Apply listener requests raised during the entity pass. Destroy requests
/// mark snapshot entries; entries not reached yet are then skipped.
fn apply_requests(
    ctx: &mut HookContext,
    snapshot: &mut [Detached<Box<dyn Entity>>],
    scene: &mut Scene,
) {
    for id in ctx.take_destroyed() {
        match snapshot.iter_mut().find(|d| d.item.core().id() == id) {
            Some(target) => target.item.core_mut().destroy(),
            None => debug!("Destroy request for unknown entity '{}'", id),
        }
    }
    for (command, layer) in ctx.take_draws() {
        scene.enqueue(command, layer);
    }
}

/// Apply listener requests raised by contact listeners, after the entity
/// pass. Destroyed entities are reaped next frame.
fn apply_late_requests(ctx: &mut HookContext, scene: &mut Scene) {
    for id in ctx.take_destroyed() {
        match scene.entity_mut(&id) {
            Some(target) => target.core_mut().destroy(),
            None => debug!("Destroy request for unknown entity '{}'", id),
        }
    }
    for (command, layer) in ctx.take_draws() {
        scene.enqueue(command, layer);
    }
    for spawned in ctx.take_spawned() {
        scene.add_boxed(spawned);
    }
}

/// Fire a contact event on both participants still in the scene.
fn fire_pair(scene: &mut Scene, record: &CollisionRecord, kind: HookKind, ctx: &mut HookContext) {
    for (id, peer) in [(&record.a.id, &record.b), (&record.b.id, &record.a)] {
        if let Some(entity) = scene.entity_mut(id) {
            hooks::fire_collision(entity.core_mut(), kind, peer, ctx);
        }
    }
}
