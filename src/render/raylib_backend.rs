//! Window renderer backed by raylib.
//!
//! Commands received between `begin_frame` and `present` are buffered and
//! replayed inside a single raylib drawing scope when the frame is presented.
//! Textures are loaded from [`TextureInfo::source`]; sprites whose texture
//! is not loaded are drawn as a magenta placeholder.

use raylib::prelude::*;
use rustc_hash::FxHashMap;

use super::{Color as KColor, DrawCommand, Renderer, SpriteDraw};
use crate::components::transform::rotate_degrees;
use crate::resources::engineconfig::EngineConfig;
use crate::resources::store::ResourceStore;
use crate::resources::texture::TextureInfo;

pub struct RaylibRenderer {
    rl: RaylibHandle,
    thread: RaylibThread,
    textures: FxHashMap<String, Texture2D>,
    clear: KColor,
    pending: Vec<DrawCommand>,
}

fn color(c: KColor) -> Color {
    Color::new(c.r, c.g, c.b, c.a)
}

fn vec2(v: glam::Vec2) -> Vector2 {
    Vector2 { x: v.x, y: v.y }
}

impl RaylibRenderer {
    /// Open a window sized and titled from `config`.
    pub fn open(config: &EngineConfig) -> Self {
        let (mut rl, thread) = raylib::init()
            .size(config.window_width as i32, config.window_height as i32)
            .title(&config.title)
            .build();
        rl.set_target_fps(config.target_fps);
        Self {
            rl,
            thread,
            textures: FxHashMap::default(),
            clear: KColor::BLACK,
            pending: Vec::new(),
        }
    }

    /// Load every texture that has a source path. Textures without a source
    /// are skipped.
    pub fn load_textures(&mut self, store: &ResourceStore<TextureInfo>) -> Result<(), String> {
        for info in store.all() {
            let Some(path) = info.source.as_deref() else {
                continue;
            };
            let texture = self
                .rl
                .load_texture(&self.thread, path)
                .map_err(|e| format!("Failed to load texture '{}' from {}: {:?}", info.id(), path, e))?;
            log::info!("Loaded texture '{}' from {}", info.id(), path);
            self.textures.insert(info.id().to_string(), texture);
        }
        Ok(())
    }

    pub fn should_close(&self) -> bool {
        self.rl.window_should_close()
    }
}

fn draw_sprite(d: &mut RaylibDrawHandle, textures: &FxHashMap<String, Texture2D>, s: &SpriteDraw) {
    let width = s.source.width.abs() as f32 * s.scale.x.abs();
    let height = s.source.height.abs() as f32 * s.scale.y.abs();
    let dest = Rectangle::new(s.position.x, s.position.y, width, height);
    let origin = vec2(s.origin * s.scale.abs());
    match textures.get(&s.texture_id) {
        Some(tex) => {
            let src = Rectangle::new(
                s.source.left as f32,
                s.source.top as f32,
                s.source.width as f32,
                s.source.height as f32,
            );
            d.draw_texture_pro(tex, src, dest, origin, s.rotation, color(s.tint));
        }
        None => d.draw_rectangle_pro(dest, origin, s.rotation, Color::MAGENTA),
    }
}

fn draw_command(d: &mut RaylibDrawHandle, textures: &FxHashMap<String, Texture2D>, command: &DrawCommand) {
    match command {
        DrawCommand::Sprite(s) => draw_sprite(d, textures, s),
        DrawCommand::Rect {
            position,
            size,
            origin,
            rotation,
            fill,
            outline,
            outline_thickness,
        } => {
            if fill.a > 0 {
                let rec = Rectangle::new(position.x, position.y, size.x, size.y);
                d.draw_rectangle_pro(rec, vec2(*origin), *rotation, color(*fill));
            }
            if *outline_thickness > 0.0 && outline.a > 0 {
                let corners = [
                    glam::Vec2::ZERO,
                    glam::Vec2::new(size.x, 0.0),
                    *size,
                    glam::Vec2::new(0.0, size.y),
                ]
                .map(|c| *position + rotate_degrees(c - *origin, *rotation));
                for k in 0..4 {
                    d.draw_line_ex(
                        vec2(corners[k]),
                        vec2(corners[(k + 1) % 4]),
                        *outline_thickness,
                        color(*outline),
                    );
                }
            }
        }
        DrawCommand::Line { from, to, color: c } => {
            d.draw_line_v(vec2(*from), vec2(*to), color(*c));
        }
        DrawCommand::Circle {
            center,
            radius,
            color: c,
        } => {
            d.draw_circle_v(vec2(*center), *radius, color(*c));
        }
        DrawCommand::Polygon {
            points,
            fill,
            outline,
            outline_thickness,
        } => {
            let mut pts: Vec<Vector2> = points.iter().map(|p| vec2(*p)).collect();
            if fill.a > 0 && pts.len() >= 3 {
                // raylib culls fans that are not counter-clockwise on screen
                let area: f32 = (0..pts.len())
                    .map(|k| {
                        let (a, b) = (pts[k], pts[(k + 1) % pts.len()]);
                        a.x * b.y - b.x * a.y
                    })
                    .sum();
                if area > 0.0 {
                    pts.reverse();
                }
                d.draw_triangle_fan(&pts, color(*fill));
            }
            if *outline_thickness > 0.0 && outline.a > 0 {
                for k in 0..pts.len() {
                    d.draw_line_ex(
                        pts[k],
                        pts[(k + 1) % pts.len()],
                        *outline_thickness,
                        color(*outline),
                    );
                }
            }
        }
        DrawCommand::Text {
            text,
            position,
            size,
            color: c,
        } => {
            d.draw_text(text, position.x as i32, position.y as i32, *size as i32, color(*c));
        }
    }
}

impl Renderer for RaylibRenderer {
    fn begin_frame(&mut self, clear: KColor) {
        self.clear = clear;
        self.pending.clear();
    }

    fn draw(&mut self, command: &DrawCommand) {
        self.pending.push(command.clone());
    }

    fn present(&mut self) {
        let Self {
            rl,
            thread,
            textures,
            clear,
            pending,
        } = self;
        let mut d = rl.begin_drawing(thread);
        d.clear_background(color(*clear));
        for command in pending.drain(..) {
            draw_command(&mut d, textures, &command);
        }
    }
}
