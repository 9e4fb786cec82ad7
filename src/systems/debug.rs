//! Diagnostic overlay.
//!
//! Produces extra [`DrawCommand`]s according to
//! [`DrawingOptions`](crate::resources::drawingoptions::DrawingOptions):
//!
//! - per entity, right after it is drawn: bounds box, collision box, origin
//!   marker and a text block (id, tag, animation, state, contact peers)
//! - per frame, after the post raw-draw queue: FPS and delta time, optionally
//!   averaged over the last N frames
//!
//! The per-frame block stays hidden for the first few frames, while the
//! measured deltas still include startup work.

use log::trace;

use crate::entities::Entity;
use crate::events::collision::CollisionSet;
use crate::render::{Color, DrawCommand};
use crate::resources::drawingoptions::DrawingOptions;
use crate::resources::scene::Assets;
use crate::resources::worldtime::WorldTime;
use crate::systems::collision::bounding_box;

/// Frames skipped before the per-frame overlay shows up.
pub const WARMUP_FRAMES: u32 = 5;

const BOUNDS_FILL: Color = Color::rgba(255, 255, 255, 10);

/// Overlay commands for one entity.
pub fn entity_overlay(
    entity: &dyn Entity,
    assets: &Assets,
    options: &DrawingOptions,
    collisions: &CollisionSet,
) -> Vec<DrawCommand> {
    let mut commands = Vec::new();
    if !options.any_entity_overlay() {
        return commands;
    }
    let core = entity.core();
    let bounds = entity.global_bounds(assets);

    if options.show_bounds {
        commands.push(DrawCommand::Rect {
            position: bounds.position(),
            size: bounds.size(),
            origin: glam::Vec2::ZERO,
            rotation: 0.0,
            fill: BOUNDS_FILL,
            outline: options.bounds_color,
            outline_thickness: 1.0,
        });
    }

    if options.show_collision_boxes
        && let Some(obb) = bounding_box(entity, assets)
    {
        commands.push(DrawCommand::Rect {
            position: obb.center,
            size: obb.half_size * 2.0,
            origin: obb.half_size,
            rotation: obb.rotation,
            fill: Color::TRANSPARENT,
            outline: options.collision_box_color,
            outline_thickness: options.collision_box_thickness,
        });
    }

    let mut text = String::new();
    if options.show_ids {
        text.push_str(&format!("Id: {}\n", core.id()));
    }
    if options.show_tags {
        text.push_str(&format!("Tag: {}\n", core.tag()));
    }
    if options.show_animation
        && let Some(animation_id) = entity.animation_id()
    {
        text.push_str(&format!("Animation: {}\n", animation_id));
    }
    if options.show_state
        && let Some(state) = entity.state_name()
    {
        text.push_str(&format!("State: {}\n", state));
    }
    if options.show_collided_ids && core.is_collidable() {
        text.push_str(&format!(
            "Colliding: {}\n",
            collisions.peers_of(core.id()).join(",")
        ));
    }
    if options.show_origin {
        let global = core.transform.position;
        let local = core.transform.origin;
        text.push_str(&format!(
            "Origin G/L: X:{:.0} Y:{:.0} / X:{:.0} Y:{:.0}\n",
            global.x, global.y, local.x, local.y
        ));
        commands.push(DrawCommand::Circle {
            center: global,
            radius: options.origin_radius,
            color: options.origin_color,
        });
    }

    if !text.is_empty() {
        commands.push(DrawCommand::Text {
            text,
            position: bounds.position(),
            size: options.text_size,
            color: options.text_color,
        });
    }
    commands
}

/// Rolling state behind the per-frame overlay.
#[derive(Debug, Default)]
pub struct FrameStats {
    frames_seen: u32,
    fps: Vec<f32>,
    fps_index: usize,
    delta: Vec<f32>,
    delta_index: usize,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay text for the frame that just finished, or `None` while
    /// warming up or when nothing is enabled.
    pub fn view_overlay(&mut self, time: &WorldTime, options: &DrawingOptions) -> Option<DrawCommand> {
        if self.frames_seen < WARMUP_FRAMES {
            self.frames_seen += 1;
            return None;
        }
        if !options.any_view_overlay() {
            return None;
        }

        let mut text = String::new();
        if options.show_fps {
            let fps = push_sample(&mut self.fps, &mut self.fps_index, options.average_fps_over, time.fps());
            text.push_str(&format!("FPS: {:.2}\n", fps));
        }
        if options.show_delta_time {
            let delta = push_sample(
                &mut self.delta,
                &mut self.delta_index,
                options.average_delta_over,
                time.delta_millis(),
            );
            text.push_str(&format!("DeltaTime: {:.2} ms\n", delta));
        }
        trace!("view overlay: {}", text.trim_end());

        Some(DrawCommand::Text {
            text,
            position: glam::Vec2::ZERO,
            size: options.text_size,
            color: options.text_color,
        })
    }
}

/// Record `value` in a ring of `window` samples and return the mean.
/// A window of zero returns the raw value. A fresh or resized ring is filled
/// with the first value.
fn push_sample(ring: &mut Vec<f32>, index: &mut usize, window: usize, value: f32) -> f32 {
    if window == 0 {
        return value;
    }
    if ring.len() != window {
        *ring = vec![value; window];
        *index = 0;
    }
    ring[*index] = value;
    *index = (*index + 1) % window;
    ring.iter().sum::<f32>() / window as f32
}
