//! Untextured circle entity.
//!
//! The local rectangle is the circle's bounding square (`2r` per side), so
//! the collision box is that square under the entity's transform.

use std::any::Any;

use glam::Vec2;

use crate::components::physicalproperties::PhysicalProperties;
use crate::entities::{Entity, EntityCore};
use crate::render::{Color, DrawCommand};
use crate::resources::scene::Assets;

#[derive(Debug)]
pub struct CircleShape {
    pub core: EntityCore,
    pub radius: f32,
    pub fill: Color,
}

impl CircleShape {
    pub fn new(id: impl Into<String>, tag: impl Into<String>, radius: f32) -> Self {
        Self {
            core: EntityCore::new(id, tag),
            radius: radius.max(0.0),
            fill: Color::WHITE,
        }
    }

    /// Place the top-left corner of the bounding square at `position`.
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.core.transform.position = position;
        self
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_physics(mut self, physics: PhysicalProperties) -> Self {
        self.core.physics = Some(physics);
        self
    }

    pub fn duplicate(&self, id: impl Into<String>) -> Self {
        Self {
            core: self.core.duplicate(id),
            radius: self.radius,
            fill: self.fill,
        }
    }

    /// World-space center.
    pub fn center(&self) -> Vec2 {
        self.core.transform.transform_point(Vec2::splat(self.radius))
    }
}

impl Entity for CircleShape {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn local_size(&self, _assets: &Assets) -> Vec2 {
        Vec2::splat(self.radius * 2.0)
    }

    fn draw_command(&self, _assets: &Assets) -> Option<DrawCommand> {
        // non-uniform scale draws the inscribed circle
        let scale = self.core.transform.scale.abs().min_element();
        Some(DrawCommand::Circle {
            center: self.center(),
            radius: self.radius * scale,
            color: self.fill,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
