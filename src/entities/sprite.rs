//! Textured entity.
//!
//! A [`Sprite`] shows either a whole texture or the current frame of one
//! animation. An animated sprite keeps its origin on the frame center, so
//! its position is the center of both the drawn frame and its collision box.

use std::any::Any;

use glam::Vec2;
use log::error;

use crate::components::animation::Animation;
use crate::components::physicalproperties::PhysicalProperties;
use crate::entities::{Entity, EntityCore};
use crate::render::{Color, DrawCommand, IntRect, SpriteDraw};
use crate::resources::scene::Assets;

#[derive(Debug)]
pub struct Sprite {
    pub core: EntityCore,
    pub texture_id: Option<String>,
    animation_id: Option<String>,
    pub tint: Color,
}

impl Sprite {
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            core: EntityCore::new(id, tag),
            texture_id: None,
            animation_id: None,
            tint: Color::WHITE,
        }
    }

    /// Show a whole texture.
    pub fn with_texture(mut self, texture_id: impl Into<String>) -> Self {
        self.texture_id = Some(texture_id.into());
        self
    }

    /// Drive the sprite with `animation`, which should be registered in the
    /// scene under the same id.
    pub fn with_animation(mut self, animation: &Animation) -> Self {
        self.set_animation(animation);
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.core.transform.position = position;
        self
    }

    pub fn with_physics(mut self, physics: PhysicalProperties) -> Self {
        self.core.physics = Some(physics);
        self
    }

    pub fn with_draw_index(mut self, draw_index: i32) -> Self {
        self.core.draw_index = draw_index;
        self
    }

    pub fn set_animation(&mut self, animation: &Animation) {
        self.animation_id = Some(animation.id().to_string());
        self.texture_id = Some(animation.texture_id().to_string());
        self.core.transform.origin = animation.frame_size().as_vec2() / 2.0;
    }

    pub fn clear_animation(&mut self) {
        self.animation_id = None;
    }

    /// Copy this sprite under a new id. Physical properties are cloned,
    /// listeners are not carried over.
    pub fn duplicate(&self, id: impl Into<String>) -> Self {
        Self {
            core: self.core.duplicate(id),
            texture_id: self.texture_id.clone(),
            animation_id: self.animation_id.clone(),
            tint: self.tint,
        }
    }
}

/// Draw command for a textured entity.
///
/// With an animation the frame rectangle comes from it; otherwise the whole
/// texture is used. Missing assets are logged and draw nothing.
pub(crate) fn textured_draw(
    core: &EntityCore,
    texture_id: Option<&str>,
    animation_id: Option<&str>,
    tint: Color,
    assets: &Assets,
) -> Option<DrawCommand> {
    let (texture_id, source) = match animation_id {
        Some(animation_id) => {
            let Some(animation) = assets.animations.get(animation_id) else {
                error!("Entity '{}': animation '{}' not found", core.id(), animation_id);
                return None;
            };
            let Some(source) = animation.current_rect(&assets.textures) else {
                error!(
                    "Entity '{}': texture '{}' of animation '{}' not usable",
                    core.id(),
                    animation.texture_id(),
                    animation_id
                );
                return None;
            };
            (animation.texture_id().to_string(), source)
        }
        None => {
            let texture_id = texture_id?;
            let Some(texture) = assets.textures.get(texture_id) else {
                error!("Entity '{}': texture '{}' not found", core.id(), texture_id);
                return None;
            };
            (
                texture_id.to_string(),
                IntRect::new(0, 0, texture.width as i32, texture.height as i32),
            )
        }
    };

    let t = &core.transform;
    Some(DrawCommand::Sprite(SpriteDraw {
        texture_id,
        source,
        position: t.position,
        origin: t.origin,
        rotation: t.rotation,
        scale: t.scale,
        tint,
    }))
}

/// Local size of a textured entity: the animation frame, else the texture.
pub(crate) fn textured_size(
    texture_id: Option<&str>,
    animation_id: Option<&str>,
    assets: &Assets,
) -> Vec2 {
    if let Some(animation) = animation_id.and_then(|id| assets.animations.get(id)) {
        return animation.frame_size().as_vec2();
    }
    texture_id
        .and_then(|id| assets.textures.get(id))
        .map_or(Vec2::ZERO, |t| Vec2::new(t.width as f32, t.height as f32))
}

impl Entity for Sprite {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn local_size(&self, assets: &Assets) -> Vec2 {
        textured_size(
            self.texture_id.as_deref(),
            self.animation_id.as_deref(),
            assets,
        )
    }

    fn draw_command(&self, assets: &Assets) -> Option<DrawCommand> {
        textured_draw(
            &self.core,
            self.texture_id.as_deref(),
            self.animation_id.as_deref(),
            self.tint,
            assets,
        )
    }

    fn animation_id(&self) -> Option<&str> {
        self.animation_id.as_deref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
