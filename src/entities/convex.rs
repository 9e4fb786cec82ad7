//! Untextured convex polygon entity.
//!
//! Points are given in local pixels and drawn in order. The local rectangle
//! spans from the local origin to the largest point coordinate, and that
//! rectangle is what collides.

use std::any::Any;

use glam::Vec2;

use crate::components::physicalproperties::PhysicalProperties;
use crate::entities::{Entity, EntityCore};
use crate::render::{Color, DrawCommand};
use crate::resources::scene::Assets;

#[derive(Debug)]
pub struct ConvexShape {
    pub core: EntityCore,
    points: Vec<Vec2>,
    pub fill: Color,
    pub outline: Color,
    pub outline_thickness: f32,
}

impl ConvexShape {
    pub fn new(id: impl Into<String>, tag: impl Into<String>, points: Vec<Vec2>) -> Self {
        Self {
            core: EntityCore::new(id, tag),
            points,
            fill: Color::WHITE,
            outline: Color::TRANSPARENT,
            outline_thickness: 0.0,
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.core.transform.position = position;
        self
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_outline(mut self, outline: Color, thickness: f32) -> Self {
        self.outline = outline;
        self.outline_thickness = thickness;
        self
    }

    pub fn with_physics(mut self, physics: PhysicalProperties) -> Self {
        self.core.physics = Some(physics);
        self
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn set_points(&mut self, points: Vec<Vec2>) {
        self.points = points;
    }

    pub fn duplicate(&self, id: impl Into<String>) -> Self {
        Self {
            core: self.core.duplicate(id),
            points: self.points.clone(),
            fill: self.fill,
            outline: self.outline,
            outline_thickness: self.outline_thickness,
        }
    }

    /// Points mapped into world space.
    pub fn world_points(&self) -> Vec<Vec2> {
        let t = &self.core.transform;
        self.points.iter().map(|p| t.transform_point(*p)).collect()
    }
}

impl Entity for ConvexShape {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn local_size(&self, _assets: &Assets) -> Vec2 {
        self.points.iter().copied().fold(Vec2::ZERO, Vec2::max)
    }

    fn draw_command(&self, _assets: &Assets) -> Option<DrawCommand> {
        if self.points.len() < 3 {
            return None;
        }
        Some(DrawCommand::Polygon {
            points: self.world_points(),
            fill: self.fill,
            outline: self.outline,
            outline_thickness: self.outline_thickness,
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
