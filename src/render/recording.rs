//! Headless renderer.
//!
//! Keeps every command of the frame being built and the last presented frame.
//! Used by the demo binary when no window backend is compiled in, and by the
//! tests to observe what the scheduler drew.

use super::{Color, DrawCommand, Renderer};

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    current: Vec<DrawCommand>,
    /// Commands of the most recently presented frame.
    pub last_frame: Vec<DrawCommand>,
    /// Number of `present` calls so far.
    pub presented: u64,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture ids of every sprite drawn in the last presented frame, in order.
    pub fn sprite_textures(&self) -> Vec<&str> {
        self.last_frame
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite(s) => Some(s.texture_id.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All text lines drawn in the last presented frame.
    pub fn texts(&self) -> Vec<&str> {
        self.last_frame
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self, _clear: Color) {
        self.current.clear();
    }

    fn draw(&mut self, command: &DrawCommand) {
        self.current.push(command.clone());
    }

    fn present(&mut self) {
        self.last_frame = std::mem::take(&mut self.current);
        self.presented += 1;
    }
}
