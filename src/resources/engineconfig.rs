//! Engine configuration resource.
//!
//! Settings loaded from an INI file. Defaults are safe for startup; any key
//! missing from the file keeps its current value.
//!
//! # Configuration File Format
//!
//! ```ini
//! [physics]
//! gravity_x = 0.0
//! gravity_y = 0.01
//!
//! [window]
//! width = 1280
//! height = 720
//! target_fps = 120
//! title = kinetic2d
//!
//! [debug]
//! show_collision_boxes = true
//! show_ids = true
//! show_fps = true
//! ```

use configparser::ini::Ini;
use glam::Vec2;
use log::info;
use std::path::PathBuf;

use crate::resources::drawingoptions::DrawingOptions;

const DEFAULT_GRAVITY_X: f32 = 0.0;
const DEFAULT_GRAVITY_Y: f32 = 0.0;
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_TARGET_FPS: u32 = 120;
const DEFAULT_TITLE: &str = "kinetic2d";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Constant force applied to every eligible body each frame.
    pub gravity_x: f32,
    pub gravity_y: f32,
    pub window_width: u32,
    pub window_height: u32,
    /// Frame rate cap requested from the window backend. The core itself
    /// never caps or fixes its time step.
    pub target_fps: u32,
    pub title: String,
    /// Overlay switches from the `[debug]` section.
    pub debug: DrawingOptions,
    pub config_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            gravity_x: DEFAULT_GRAVITY_X,
            gravity_y: DEFAULT_GRAVITY_Y,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            title: DEFAULT_TITLE.to_string(),
            debug: DrawingOptions::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    pub fn gravity(&self) -> Vec2 {
        Vec2::new(self.gravity_x, self.gravity_y)
    }

    pub fn drawing_options(&self) -> DrawingOptions {
        self.debug.clone()
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values. Returns an error if the
    /// file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [physics] section
        if let Some(x) = config.getfloat("physics", "gravity_x").ok().flatten() {
            self.gravity_x = x as f32;
        }
        if let Some(y) = config.getfloat("physics", "gravity_y").ok().flatten() {
            self.gravity_y = y as f32;
        }

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(title) = config.get("window", "title") {
            self.title = title;
        }

        // [debug] section
        let flag = |key: &str| config.getbool("debug", key).ok().flatten();
        let debug = &mut self.debug;
        for (key, slot) in [
            ("show_bounds", &mut debug.show_bounds),
            ("show_collision_boxes", &mut debug.show_collision_boxes),
            ("show_origin", &mut debug.show_origin),
            ("show_ids", &mut debug.show_ids),
            ("show_tags", &mut debug.show_tags),
            ("show_animation", &mut debug.show_animation),
            ("show_state", &mut debug.show_state),
            ("show_collided_ids", &mut debug.show_collided_ids),
            ("show_fps", &mut debug.show_fps),
            ("show_delta_time", &mut debug.show_delta_time),
        ] {
            if let Some(value) = flag(key) {
                *slot = value;
            }
        }
        if let Some(n) = config.getuint("debug", "average_fps_over").ok().flatten() {
            debug.average_fps_over = n as usize;
        }
        if let Some(n) = config.getuint("debug", "average_delta_over").ok().flatten() {
            debug.average_delta_over = n as usize;
        }

        info!(
            "Loaded config: gravity=({}, {}), {}x{} window, fps={}",
            self.gravity_x, self.gravity_y, self.window_width, self.window_height, self.target_fps
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("physics", "gravity_x", Some(self.gravity_x.to_string()));
        config.set("physics", "gravity_y", Some(self.gravity_y.to_string()));

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "title", Some(self.title.clone()));

        let debug = &self.debug;
        for (key, value) in [
            ("show_bounds", debug.show_bounds),
            ("show_collision_boxes", debug.show_collision_boxes),
            ("show_origin", debug.show_origin),
            ("show_ids", debug.show_ids),
            ("show_tags", debug.show_tags),
            ("show_animation", debug.show_animation),
            ("show_state", debug.show_state),
            ("show_collided_ids", debug.show_collided_ids),
            ("show_fps", debug.show_fps),
            ("show_delta_time", debug.show_delta_time),
        ] {
            config.set("debug", key, Some(value.to_string()));
        }
        config.set(
            "debug",
            "average_fps_over",
            Some(debug.average_fps_over.to_string()),
        );
        config.set(
            "debug",
            "average_delta_over",
            Some(debug.average_delta_over.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity_x = gravity.x;
        self.gravity_y = gravity.y;
    }
}
