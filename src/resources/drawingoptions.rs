//! Diagnostic overlay switches.
//!
//! Every flag defaults to off. When a flag is on, the scheduler asks
//! [`crate::systems::debug`] for the matching overlay commands after each
//! entity is drawn (per-entity items) or once per frame (view items).

use serde::{Deserialize, Serialize};

use crate::render::Color;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingOptions {
    pub clear_color: Color,

    pub show_bounds: bool,
    pub bounds_color: Color,
    pub show_collision_boxes: bool,
    pub collision_box_color: Color,
    pub collision_box_thickness: f32,
    pub show_origin: bool,
    pub origin_color: Color,
    pub origin_radius: f32,

    pub show_ids: bool,
    pub show_tags: bool,
    pub show_animation: bool,
    pub show_state: bool,
    pub show_collided_ids: bool,
    pub text_color: Color,
    pub text_size: u32,

    pub show_fps: bool,
    /// Number of frames to average FPS over; 0 shows the raw value.
    pub average_fps_over: usize,
    pub show_delta_time: bool,
    /// Number of frames to average delta time over; 0 shows the raw value.
    pub average_delta_over: usize,
}

impl Default for DrawingOptions {
    fn default() -> Self {
        Self {
            clear_color: Color::BLACK,
            show_bounds: false,
            bounds_color: Color::MAGENTA,
            show_collision_boxes: false,
            collision_box_color: Color::RED,
            collision_box_thickness: 2.0,
            show_origin: false,
            origin_color: Color::BLUE,
            origin_radius: 5.0,
            show_ids: false,
            show_tags: false,
            show_animation: false,
            show_state: false,
            show_collided_ids: false,
            text_color: Color::WHITE,
            text_size: 12,
            show_fps: false,
            average_fps_over: 0,
            show_delta_time: false,
            average_delta_over: 0,
        }
    }
}

impl DrawingOptions {
    /// True when any per-entity overlay item is enabled.
    pub fn any_entity_overlay(&self) -> bool {
        self.show_bounds
            || self.show_collision_boxes
            || self.show_origin
            || self.show_ids
            || self.show_tags
            || self.show_animation
            || self.show_state
            || self.show_collided_ids
    }

    /// True when any per-frame overlay item is enabled.
    pub fn any_view_overlay(&self) -> bool {
        self.show_fps || self.show_delta_time
    }
}
