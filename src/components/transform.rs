//! World placement of an entity.
//!
//! A [`Transform`] maps an entity's local rectangle (`0..size`) into world
//! space: the local point at `origin` lands on `position`, the rectangle is
//! scaled around that point and then rotated by `rotation` degrees
//! (clockwise on a y-down screen).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::render::FloatRect;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    /// Rotation in degrees.
    pub rotation: f32,
    pub scale: Vec2,
    /// Local-space pivot for rotation and scale.
    pub origin: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            origin: Vec2::ZERO,
        }
    }
}

impl Transform {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.rotation += degrees;
    }

    /// Map a local point into world space.
    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        self.position + rotate_degrees((local - self.origin) * self.scale, self.rotation)
    }

    /// Axis-aligned world rectangle enclosing a local rectangle of `size`.
    pub fn global_bounds(&self, size: Vec2) -> FloatRect {
        let corners = [
            self.transform_point(Vec2::ZERO),
            self.transform_point(Vec2::new(size.x, 0.0)),
            self.transform_point(Vec2::new(0.0, size.y)),
            self.transform_point(size),
        ];
        let min = corners.iter().copied().fold(Vec2::splat(f32::MAX), Vec2::min);
        let max = corners.iter().copied().fold(Vec2::splat(f32::MIN), Vec2::max);
        FloatRect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

/// Rotate `v` by `degrees` around the origin.
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    if degrees == 0.0 {
        return v;
    }
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}
