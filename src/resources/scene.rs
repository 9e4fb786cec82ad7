//! The simulation context.
//!
//! A [`Scene`] owns everything one simulation needs: live entities, the
//! texture and animation stores, gravity, frame timing, overlay options,
//! raw draw queues and the collision baseline. It is passed explicitly to
//! the scheduler, so several scenes can run side by side.

use std::collections::VecDeque;

use glam::Vec2;
use log::debug;

use crate::components::animation::Animation;
use crate::entities::Entity;
use crate::events::collision::CollisionSet;
use crate::render::{DrawCommand, DrawLayer};
use crate::resources::drawingoptions::DrawingOptions;
use crate::resources::engineconfig::EngineConfig;
use crate::resources::store::ResourceStore;
use crate::resources::texture::TextureInfo;
use crate::resources::worldtime::WorldTime;

/// Shared, read-mostly data entities draw from.
#[derive(Default)]
pub struct Assets {
    pub textures: ResourceStore<TextureInfo>,
    pub animations: ResourceStore<Animation>,
}

#[derive(Default)]
pub struct Scene {
    pub entities: ResourceStore<Box<dyn Entity>>,
    pub assets: Assets,
    pub gravity: Vec2,
    pub time: WorldTime,
    pub drawing_options: DrawingOptions,
    pre_draws: VecDeque<DrawCommand>,
    post_draws: VecDeque<DrawCommand>,
    collisions: CollisionSet,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene set up from the gravity and overlay settings of `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            gravity: config.gravity(),
            drawing_options: config.drawing_options(),
            ..Self::default()
        }
    }

    /// Register an entity, replacing any entity with the same id.
    pub fn add(&mut self, entity: impl Entity) {
        self.add_boxed(Box::new(entity));
    }

    pub fn add_boxed(&mut self, entity: Box<dyn Entity>) {
        if let Some(old) = self.entities.upsert(entity) {
            debug!("Replaced entity '{}'", old.core().id());
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Box<dyn Entity>> {
        self.entities.remove(id)
    }

    /// Move an entity to another tag group. Returns false for unknown ids.
    pub fn retag(&mut self, id: &str, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        debug!("Retagging entity '{}' as '{}'", id, tag);
        self.entities.retag(id, tag)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains(id)
    }

    pub fn entity(&self, id: &str) -> Option<&dyn Entity> {
        self.entities.get(id).map(|e| e.as_ref())
    }

    pub fn entity_mut(&mut self, id: &str) -> Option<&mut (dyn Entity + 'static)> {
        self.entities.get_mut(id).map(|e| e.as_mut())
    }

    /// Entity `id` as its concrete kind.
    pub fn get<T: Entity>(&self, id: &str) -> Option<&T> {
        self.entities.get(id)?.as_any().downcast_ref::<T>()
    }

    pub fn get_mut<T: Entity>(&mut self, id: &str) -> Option<&mut T> {
        self.entities.get_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    /// Every entity of kind `T`, in insertion order.
    pub fn all<T: Entity>(&self) -> Vec<&T> {
        self.entities
            .all()
            .into_iter()
            .filter_map(|e| e.as_any().downcast_ref::<T>())
            .collect()
    }

    pub fn add_texture(&mut self, texture: TextureInfo) {
        self.assets.textures.upsert(texture);
    }

    pub fn add_animation(&mut self, animation: Animation) {
        self.assets.animations.upsert(animation);
    }

    pub fn animation(&self, id: &str) -> Option<&Animation> {
        self.assets.animations.get(id)
    }

    pub fn animation_mut(&mut self, id: &str) -> Option<&mut Animation> {
        self.assets.animations.get_mut(id)
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    pub fn set_gravity_xy(&mut self, x: f32, y: f32) {
        self.gravity = Vec2::new(x, y);
    }

    /// Straight-down gravity of the given strength.
    pub fn set_gravity_down(&mut self, strength: f32) {
        self.gravity = Vec2::new(0.0, strength);
    }

    /// Queue a raw draw on one of the two raw-draw layers.
    pub fn enqueue(&mut self, command: DrawCommand, layer: DrawLayer) {
        match layer {
            DrawLayer::Pre => self.pre_draws.push_back(command),
            DrawLayer::Post => self.post_draws.push_back(command),
        }
    }

    pub(crate) fn drain_draws(&mut self, layer: DrawLayer) -> VecDeque<DrawCommand> {
        match layer {
            DrawLayer::Pre => std::mem::take(&mut self.pre_draws),
            DrawLayer::Post => std::mem::take(&mut self.post_draws),
        }
    }

    pub fn queued_draws(&self, layer: DrawLayer) -> usize {
        match layer {
            DrawLayer::Pre => self.pre_draws.len(),
            DrawLayer::Post => self.post_draws.len(),
        }
    }

    /// Contacts detected during the last completed frame.
    pub fn collisions(&self) -> &CollisionSet {
        &self.collisions
    }

    pub(crate) fn replace_collisions(&mut self, collisions: CollisionSet) -> CollisionSet {
        std::mem::replace(&mut self.collisions, collisions)
    }

    /// Ids of the entities `id` touched during the last completed frame.
    pub fn collisions_of(&self, id: &str) -> Vec<&str> {
        self.collisions.peers_of(id)
    }

    pub fn has_collision(&self, id: &str) -> bool {
        self.collisions.has_collision(id)
    }

    /// Clear the per-frame contact flags of every entity.
    pub fn reset_collision_flags(&mut self) {
        for entity in self.entities.iter_mut() {
            if let Some(p) = entity.core_mut().physics.as_mut() {
                p.reset_contacts();
            }
        }
    }
}
