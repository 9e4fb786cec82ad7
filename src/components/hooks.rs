//! Per-entity listener registries.
//!
//! Every entity owns an [`EntityHooks`] with one ordered listener list per
//! event kind. Listeners run synchronously, in registration order, at the
//! point the scheduler raises the event:
//!
//! - pre-draw: before the entity's animation, gravity and collision step
//! - post-draw: right after the entity has been handed to the renderer
//! - collision begin / end: after the entity pass, once per new or ended
//!   contact pair (see [`crate::events::collision`])
//!
//! A listener that returns `Err` is logged; the remaining listeners and
//! entities still run. Listeners added while a list is firing run from the
//! next event on.
//!
//! Listeners reach the rest of the scene only through [`HookContext`],
//! whose requests (spawn, destroy, raw draws) the scheduler applies at fixed
//! points of the frame.

use glam::Vec2;
use log::warn;
use smallvec::SmallVec;

use crate::entities::{Entity, EntityCore};
use crate::events::collision::CollisionPeer;
use crate::render::{DrawCommand, DrawLayer};
use crate::resources::worldtime::WorldTime;

pub type HookResult = Result<(), String>;

pub type EntityHook = Box<dyn FnMut(&mut EntityCore, &mut HookContext) -> HookResult>;

pub type CollisionHook =
    Box<dyn FnMut(&mut EntityCore, &CollisionPeer, &mut HookContext) -> HookResult>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    PreDraw,
    PostDraw,
    CollisionBegin,
    CollisionEnd,
}

type EntityHookList = SmallVec<[EntityHook; 1]>;
type CollisionHookList = SmallVec<[CollisionHook; 1]>;

#[derive(Default)]
pub struct EntityHooks {
    pre_draw: EntityHookList,
    post_draw: EntityHookList,
    collision_begin: CollisionHookList,
    collision_end: CollisionHookList,
}

impl EntityHooks {
    pub fn len(&self, kind: HookKind) -> usize {
        match kind {
            HookKind::PreDraw => self.pre_draw.len(),
            HookKind::PostDraw => self.post_draw.len(),
            HookKind::CollisionBegin => self.collision_begin.len(),
            HookKind::CollisionEnd => self.collision_end.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pre_draw.is_empty()
            && self.post_draw.is_empty()
            && self.collision_begin.is_empty()
            && self.collision_end.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn on_pre_draw(
        &mut self,
        hook: impl FnMut(&mut EntityCore, &mut HookContext) -> HookResult + 'static,
    ) {
        self.pre_draw.push(Box::new(hook));
    }

    pub fn on_post_draw(
        &mut self,
        hook: impl FnMut(&mut EntityCore, &mut HookContext) -> HookResult + 'static,
    ) {
        self.post_draw.push(Box::new(hook));
    }

    pub fn on_collision_begin(
        &mut self,
        hook: impl FnMut(&mut EntityCore, &CollisionPeer, &mut HookContext) -> HookResult + 'static,
    ) {
        self.collision_begin.push(Box::new(hook));
    }

    pub fn on_collision_end(
        &mut self,
        hook: impl FnMut(&mut EntityCore, &CollisionPeer, &mut HookContext) -> HookResult + 'static,
    ) {
        self.collision_end.push(Box::new(hook));
    }
}

fn entity_list(hooks: &mut EntityHooks, kind: HookKind) -> &mut EntityHookList {
    match kind {
        HookKind::PostDraw => &mut hooks.post_draw,
        _ => &mut hooks.pre_draw,
    }
}

fn collision_list(hooks: &mut EntityHooks, kind: HookKind) -> &mut CollisionHookList {
    match kind {
        HookKind::CollisionEnd => &mut hooks.collision_end,
        _ => &mut hooks.collision_begin,
    }
}

/// Fire the pre-draw or post-draw listeners of `core`.
pub fn fire(core: &mut EntityCore, kind: HookKind, ctx: &mut HookContext) {
    let mut list = std::mem::take(entity_list(&mut core.hooks, kind));
    for hook in list.iter_mut() {
        if let Err(e) = hook(core, ctx) {
            warn!("{:?} listener of '{}' failed: {}", kind, core.id(), e);
        }
    }
    let added = std::mem::replace(entity_list(&mut core.hooks, kind), list);
    entity_list(&mut core.hooks, kind).extend(added);
}

/// Fire the collision-begin or collision-end listeners of `core`.
pub fn fire_collision(
    core: &mut EntityCore,
    kind: HookKind,
    peer: &CollisionPeer,
    ctx: &mut HookContext,
) {
    let mut list = std::mem::take(collision_list(&mut core.hooks, kind));
    for hook in list.iter_mut() {
        if let Err(e) = hook(core, peer, ctx) {
            warn!(
                "{:?} listener of '{}' (peer '{}') failed: {}",
                kind, core.id(), peer.id, e
            );
        }
    }
    let added = std::mem::replace(collision_list(&mut core.hooks, kind), list);
    collision_list(&mut core.hooks, kind).extend(added);
}

/// What a listener may see and request beyond its own entity.
pub struct HookContext {
    pub time: WorldTime,
    pub gravity: Vec2,
    spawned: Vec<Box<dyn Entity>>,
    destroyed: Vec<String>,
    draws: Vec<(DrawCommand, DrawLayer)>,
}

impl HookContext {
    pub fn new(time: WorldTime, gravity: Vec2) -> Self {
        Self {
            time,
            gravity,
            spawned: Vec::new(),
            destroyed: Vec::new(),
            draws: Vec::new(),
        }
    }

    /// Add an entity to the scene once the current frame is over.
    pub fn spawn(&mut self, entity: impl Entity) {
        self.spawned.push(Box::new(entity));
    }

    /// Mark another entity (by id) as destroyed.
    pub fn destroy(&mut self, id: impl Into<String>) {
        self.destroyed.push(id.into());
    }

    /// Queue a raw draw. Pre-layer draws requested during a frame are drawn
    /// at the start of the next one.
    pub fn enqueue(&mut self, command: DrawCommand, layer: DrawLayer) {
        self.draws.push((command, layer));
    }

    pub(crate) fn take_spawned(&mut self) -> Vec<Box<dyn Entity>> {
        std::mem::take(&mut self.spawned)
    }

    pub(crate) fn take_destroyed(&mut self) -> Vec<String> {
        std::mem::take(&mut self.destroyed)
    }

    pub(crate) fn take_draws(&mut self) -> Vec<(DrawCommand, DrawLayer)> {
        std::mem::take(&mut self.draws)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ctx() -> HookContext {
        HookContext::new(WorldTime::default(), Vec2::ZERO)
    }

    #[test]
    fn test_listeners_fire_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut core = EntityCore::new("a", "t");
        for n in 0..3 {
            let log = log.clone();
            core.hooks.on_pre_draw(move |_, _| {
                log.borrow_mut().push(n);
                Ok(())
            });
        }
        fire(&mut core, HookKind::PreDraw, &mut ctx());
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert_eq!(core.hooks.len(HookKind::PreDraw), 3);
    }

    #[test]
    fn test_failing_listener_does_not_stop_others() {
        let hits = Rc::new(RefCell::new(0));
        let mut core = EntityCore::new("a", "t");
        core.hooks
            .on_post_draw(|_, _| Err(String::from("boom")));
        let h = hits.clone();
        core.hooks.on_post_draw(move |_, _| {
            *h.borrow_mut() += 1;
            Ok(())
        });
        fire(&mut core, HookKind::PostDraw, &mut ctx());
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_listener_added_while_firing_runs_next_time() {
        let hits = Rc::new(RefCell::new(0));
        let mut core = EntityCore::new("a", "t");
        let h = hits.clone();
        let mut armed = false;
        core.hooks.on_pre_draw(move |core, _| {
            if !armed {
                armed = true;
                let h = h.clone();
                core.hooks.on_pre_draw(move |_, _| {
                    *h.borrow_mut() += 1;
                    Ok(())
                });
            }
            Ok(())
        });
        fire(&mut core, HookKind::PreDraw, &mut ctx());
        assert_eq!(*hits.borrow(), 0);
        assert_eq!(core.hooks.len(HookKind::PreDraw), 2);
        fire(&mut core, HookKind::PreDraw, &mut ctx());
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_collision_listener_sees_peer() {
        let seen = Rc::new(RefCell::new(String::new()));
        let mut core = EntityCore::new("a", "t");
        let s = seen.clone();
        core.hooks.on_collision_end(move |_, peer, _| {
            s.borrow_mut().push_str(&peer.id);
            Ok(())
        });
        let peer = CollisionPeer::of(&EntityCore::new("wall", "static"));
        fire_collision(&mut core, HookKind::CollisionBegin, &peer, &mut ctx());
        assert!(seen.borrow().is_empty());
        fire_collision(&mut core, HookKind::CollisionEnd, &peer, &mut ctx());
        assert_eq!(*seen.borrow(), "wall");
    }

    #[test]
    fn test_context_requests_are_drained() {
        let mut c = ctx();
        c.destroy("x");
        c.enqueue(
            DrawCommand::Line {
                from: Vec2::ZERO,
                to: Vec2::ONE,
                color: crate::render::Color::WHITE,
            },
            DrawLayer::Post,
        );
        assert_eq!(c.take_destroyed(), vec!["x".to_string()]);
        assert!(c.take_destroyed().is_empty());
        assert_eq!(c.take_draws().len(), 1);
    }
}
