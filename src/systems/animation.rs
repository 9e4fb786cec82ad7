//! Animation tick used by the scheduler.
//!
//! Looks up the animation an entity currently shows and advances it by the
//! frame delta. The per-mode rules live on
//! [`Animation::update`](crate::components::animation::Animation::update).
//!
//! # Related
//!
//! - [`crate::components::animation`] – playback modes and frame math
//! - [`crate::components::state`] – picks the current animation of stateful entities

use std::time::Duration;

use log::error;

use crate::entities::Entity;
use crate::resources::scene::Assets;

/// Advance the current animation of `entity`. Returns true when its frame
/// changed; false for non-animated entities and unknown animations.
pub fn advance(entity: &dyn Entity, assets: &mut Assets, delta: Duration) -> bool {
    let Some(animation_id) = entity.animation_id() else {
        return false;
    };
    let Assets {
        textures,
        animations,
    } = assets;
    match animations.get_mut(animation_id) {
        Some(animation) => animation.update(delta, textures),
        None => {
            error!(
                "Entity '{}': animation '{}' not found",
                entity.core().id(),
                animation_id
            );
            false
        }
    }
}
