//! Scene entities.
//!
//! Every entity kind shares an [`EntityCore`] (identity, transform,
//! lifecycle flags, optional physics, listeners) and implements the
//! [`Entity`] capability trait the frame scheduler works through. Optional
//! capabilities show up as trait methods with empty defaults: an entity is
//! animated when [`Entity::animation_id`] returns an id, and stateful when
//! [`Entity::state_name`] does.
//!
//! Submodules overview:
//! - [`sprite`] – textured entity, optionally driven by one animation
//! - [`statefulsprite`] – sprite whose animation is picked by a state machine
//! - [`shape`] – untextured rectangle, typically walls and platforms
//! - [`circle`] – untextured circle colliding as its bounding square
//! - [`convex`] – untextured convex polygon colliding as its point extent

pub mod circle;
pub mod convex;
pub mod shape;
pub mod sprite;
pub mod statefulsprite;

use std::any::Any;
use std::fmt;

use glam::Vec2;

use crate::components::animation::Animation;
use crate::components::hooks::EntityHooks;
use crate::components::physicalproperties::PhysicalProperties;
use crate::components::transform::Transform;
use crate::render::{DrawCommand, FloatRect};
use crate::resources::scene::Assets;
use crate::resources::store::{Identifiable, ResourceStore, RetagToken};
use crate::systems::physics;

/// State shared by every entity kind.
pub struct EntityCore {
    id: String,
    tag: String,
    pub transform: Transform,
    /// Invisible entities are skipped entirely by the scheduler.
    pub visible: bool,
    /// Lower indices are processed and drawn first.
    pub draw_index: i32,
    pub physics: Option<PhysicalProperties>,
    pub hooks: EntityHooks,
    destroyed: bool,
}

impl fmt::Debug for EntityCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCore")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("transform", &self.transform)
            .field("visible", &self.visible)
            .field("draw_index", &self.draw_index)
            .field("physics", &self.physics)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl EntityCore {
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            transform: Transform::default(),
            visible: true,
            draw_index: 0,
            physics: None,
            hooks: EntityHooks::default(),
            destroyed: false,
        }
    }

    /// Copy of everything except listeners, under a new id.
    pub fn duplicate(&self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: self.tag.clone(),
            transform: self.transform,
            visible: self.visible,
            draw_index: self.draw_index,
            physics: self.physics.clone(),
            hooks: EntityHooks::default(),
            destroyed: false,
        }
    }

    /// Unique id. Fixed for the lifetime of the entity.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Group tag. Change it through [`crate::resources::scene::Scene::retag`]
    /// so the store's tag index follows.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.transform.position = position;
    }

    /// Mark for removal. The entity is reaped by the scheduler.
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Give the entity physical properties, or adjust the existing ones.
    pub fn configure_physics(&mut self, configure: impl FnOnce(&mut PhysicalProperties)) {
        configure(self.physics.get_or_insert_with(PhysicalProperties::default));
    }

    pub fn is_physics_configured(&self) -> bool {
        self.physics.is_some()
    }

    /// Physics configured with collisions enabled.
    pub fn is_collidable(&self) -> bool {
        self.physics.as_ref().is_some_and(|p| p.collision_enabled)
    }

    pub fn velocity(&self) -> Vec2 {
        self.physics.as_ref().map_or(Vec2::ZERO, |p| p.velocity)
    }

    /// Accumulate a force for the next integration step.
    pub fn apply_force(&mut self, force: Vec2) {
        physics::apply_force(self, force, None);
    }

    /// Accumulate a force applied at a world point, nudging the rotation.
    pub fn apply_force_at(&mut self, force: Vec2, point: Vec2) {
        physics::apply_force(self, force, Some(point));
    }
}

/// Capability set the frame scheduler drives.
pub trait Entity: Any {
    fn core(&self) -> &EntityCore;

    fn core_mut(&mut self) -> &mut EntityCore;

    /// Size of the untransformed local rectangle.
    fn local_size(&self, assets: &Assets) -> Vec2;

    /// Renderer command for this frame; `None` draws nothing.
    fn draw_command(&self, assets: &Assets) -> Option<DrawCommand>;

    /// Id of the animation currently driving this entity, if any.
    fn animation_id(&self) -> Option<&str> {
        None
    }

    /// Display name of the current state, for stateful entities.
    fn state_name(&self) -> Option<String> {
        None
    }

    /// Kind-specific work at the start of the entity's pre-draw step, before
    /// its pre-draw listeners run.
    fn update_state(&mut self, _animations: &mut ResourceStore<Animation>) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Frame size of the current animation.
    fn frame_size(&self, assets: &Assets) -> Option<Vec2> {
        let id = self.animation_id()?;
        assets.animations.get(id).map(|a| a.frame_size().as_vec2())
    }

    /// World-space axis-aligned bounds.
    fn global_bounds(&self, assets: &Assets) -> FloatRect {
        self.core()
            .transform
            .global_bounds(self.local_size(assets))
    }
}

impl Identifiable for Box<dyn Entity> {
    fn id(&self) -> &str {
        self.core().id()
    }
    fn tag(&self) -> &str {
        self.core().tag()
    }
    fn set_tag(&mut self, tag: String, _: RetagToken) {
        self.core_mut().tag = tag;
    }
}
