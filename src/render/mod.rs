//! Renderer collaborator interface.
//!
//! The simulation core never draws pixels itself. Every visual the frame
//! scheduler produces is expressed as a [`DrawCommand`] and handed to a
//! [`Renderer`] implementation, which owns the window, textures and fonts.
//!
//! Submodules:
//! - [`recording`] – headless renderer that stores the commands it receives
//! - `raylib_backend` – window renderer backed by raylib (feature `raylib`)

pub mod recording;
#[cfg(feature = "raylib")]
pub mod raylib_backend;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use recording::RecordingRenderer;

/// RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const RED: Color = Color::rgba(255, 0, 0, 255);
    pub const GREEN: Color = Color::rgba(0, 255, 0, 255);
    pub const BLUE: Color = Color::rgba(0, 0, 255, 255);
    pub const MAGENTA: Color = Color::rgba(255, 0, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Integer rectangle in texture space. Width or height may be negative to
/// express a flipped source rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl IntRect {
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Axis-aligned rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FloatRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl FloatRect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Which raw-draw queue a command goes to.
///
/// `Pre` is drained before any entity is processed, `Post` after the entity
/// pass and destruction bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawLayer {
    Pre,
    Post,
}

/// A textured quad cut from a sprite sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    pub texture_id: String,
    /// Source rectangle on the texture (negative extents flip).
    pub source: IntRect,
    pub position: Vec2,
    /// Pivot in local (unscaled) pixels.
    pub origin: Vec2,
    /// Degrees, clockwise in screen space.
    pub rotation: f32,
    pub scale: Vec2,
    pub tint: Color,
}

/// Drawable primitive accepted by a [`Renderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite(SpriteDraw),
    Rect {
        position: Vec2,
        size: Vec2,
        origin: Vec2,
        rotation: f32,
        fill: Color,
        outline: Color,
        outline_thickness: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    /// Convex polygon in world space, points in drawing order.
    Polygon {
        points: Vec<Vec2>,
        fill: Color,
        outline: Color,
        outline_thickness: f32,
    },
    Text {
        text: String,
        position: Vec2,
        size: u32,
        color: Color,
    },
}

/// Rendering backend consumed by the frame scheduler.
///
/// Calls arrive in frame order: one `begin_frame`, any number of `draw`
/// calls, then one `present`.
pub trait Renderer {
    fn begin_frame(&mut self, _clear: Color) {}
    fn draw(&mut self, command: &DrawCommand);
    fn present(&mut self);
}
