//! Untextured rectangle entity.

use std::any::Any;

use glam::Vec2;

use crate::components::physicalproperties::PhysicalProperties;
use crate::entities::{Entity, EntityCore};
use crate::render::{Color, DrawCommand};
use crate::resources::scene::Assets;

#[derive(Debug)]
pub struct RectangleShape {
    pub core: EntityCore,
    pub size: Vec2,
    pub fill: Color,
    pub outline: Color,
    pub outline_thickness: f32,
}

impl RectangleShape {
    pub fn new(id: impl Into<String>, tag: impl Into<String>, size: Vec2) -> Self {
        Self {
            core: EntityCore::new(id, tag),
            size,
            fill: Color::WHITE,
            outline: Color::TRANSPARENT,
            outline_thickness: 0.0,
        }
    }

    /// Place the top-left corner at `position`.
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
            size: self.size,
            fill: self.fill,
            outline: self.outline,
            outline_thickness: self.outline_thickness,
        }
    }
}

impl Entity for RectangleShape {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn local_size(&self, _assets: &Assets) -> Vec2 {
        self.size
    }

    fn draw_command(&self, _assets: &Assets) -> Option<DrawCommand> {
        let t = &self.core.transform;
        Some(DrawCommand::Rect {
            position: t.position,
            size: self.size * t.scale,
            origin: t.origin * t.scale,
            rotation: t.rotation,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_follow_position() {
        let assets = Assets::default();
        let r = RectangleShape::new("ground", "static", Vec2::new(100.0, 10.0))
            .with_position(Vec2::new(0.0, 50.0));
        let b = r.global_bounds(&assets);
        assert_eq!(b.position(), Vec2::new(0.0, 50.0));
        assert_eq!(b.size(), Vec2::new(100.0, 10.0));
        assert!(r.frame_size(&assets).is_none());
    }

    #[test]
    fn test_draw_applies_scale() {
        let mut r = RectangleShape::new("r", "t", Vec2::new(4.0, 2.0)).with_fill(Color::RED);
        r.core.transform.scale = Vec2::splat(2.0);
        match r.draw_command(&Assets::default()) {
            Some(DrawCommand::Rect { size, fill, .. }) => {
                assert_eq!(size, Vec2::new(8.0, 4.0));
                assert_eq!(fill, Color::RED);
            }
            other => panic!("unexpected draw: {:?}", other),
        }
    }
}
