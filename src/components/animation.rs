//! Sprite-sheet animation data and per-mode playback.
//!
//! An [`Animation`] cuts frames out of one texture laid out as a grid of
//! equally sized cells, read left to right and top to bottom. Frame `i` sits
//! at column `i % columns` and row `i / columns`, where
//! `columns = texture_width / frame_width`.
//!
//! Playback modes:
//! - [`AnimationMode::Static`] never advances
//! - [`AnimationMode::Loop`] cycles through its frame range forever
//! - [`AnimationMode::FiniteLoop`] cycles a fixed number of times, then
//!   completes
//! - [`AnimationMode::Once`] plays its range a single time, then completes
//!
//! Completion sets the done flag, fires the completion callback once and
//! freezes the animation on the last frame of its range until
//! [`Animation::reset`] is called.
//!
//! Animations live in the scene's animation store and are referenced by id,
//! so several entities may share one. They are ticked by
//! [`crate::systems::animation`].

use std::fmt;
use std::time::Duration;

use glam::UVec2;
use log::error;
use serde::{Deserialize, Serialize};

use crate::render::IntRect;
use crate::resources::store::{Identifiable, ResourceStore, RetagToken};
use crate::resources::texture::TextureInfo;

/// Priority reported when there is no animation at all.
pub const NO_ANIMATION_PRIORITY: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationMode {
    Static,
    Loop,
    FiniteLoop { max_loops: u32 },
    Once,
}

impl AnimationMode {
    /// Interrupt priority used by the state machine. Higher values are harder
    /// to interrupt.
    pub fn priority(self) -> i32 {
        match self {
            AnimationMode::Static => 0,
            AnimationMode::Loop => 1,
            AnimationMode::FiniteLoop { .. } => 2,
            AnimationMode::Once => 3,
        }
    }
}

/// Priority of an optional animation; [`NO_ANIMATION_PRIORITY`] for `None`.
pub fn priority_of(animation: Option<&Animation>) -> i32 {
    animation.map_or(NO_ANIMATION_PRIORITY, Animation::priority)
}

/// Called once when a finite animation completes.
pub type AnimationCallback = Box<dyn FnMut(&Animation)>;

/// Grid geometry of a sprite sheet for a given frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub columns: u32,
    pub rows: u32,
}

impl SheetLayout {
    /// `None` when the frame is empty or larger than the texture.
    pub fn of(texture: &TextureInfo, frame_size: UVec2) -> Option<Self> {
        if frame_size.x == 0 || frame_size.y == 0 {
            return None;
        }
        let columns = texture.width / frame_size.x;
        let rows = texture.height / frame_size.y;
        (columns > 0 && rows > 0).then_some(Self { columns, rows })
    }

    pub fn frame_count(&self) -> usize {
        (self.columns as usize) * (self.rows as usize)
    }
}

/// Source rectangle of frame `index`.
///
/// A flipped axis negates the rectangle's extent and moves its origin to the
/// far edge of the frame; the frame position itself is unchanged.
pub fn frame_rect(index: usize, columns: u32, frame_size: UVec2, flip: (bool, bool)) -> IntRect {
    let columns = columns.max(1) as usize;
    let (w, h) = (frame_size.x as i32, frame_size.y as i32);
    let mut rect = IntRect::new(
        (index % columns) as i32 * w,
        (index / columns) as i32 * h,
        w,
        h,
    );
    if flip.0 {
        rect.left += w;
        rect.width = -w;
    }
    if flip.1 {
        rect.top += h;
        rect.height = -h;
    }
    rect
}

pub struct Animation {
    id: String,
    tag: String,
    mode: AnimationMode,
    texture_id: String,
    frame_size: UVec2,
    frame_duration: Duration,
    elapsed: Duration,
    frame_index: usize,
    /// Inclusive frame range; `None` plays the whole sheet.
    range: Option<(usize, usize)>,
    /// Cell count of the sheet the animation was cut from.
    sheet_frames: usize,
    done: bool,
    loops_completed: u32,
    flip: (bool, bool),
    on_done: Option<AnimationCallback>,
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("id", &self.id)
            .field("mode", &self.mode)
            .field("texture_id", &self.texture_id)
            .field("frame_size", &self.frame_size)
            .field("frame_index", &self.frame_index)
            .field("range", &self.range)
            .field("done", &self.done)
            .field("loops_completed", &self.loops_completed)
            .finish_non_exhaustive()
    }
}

impl Animation {
    fn with_mode(
        id: impl Into<String>,
        mode: AnimationMode,
        texture: &TextureInfo,
        frame_size: Option<UVec2>,
        frame_duration: Duration,
    ) -> Self {
        // An empty frame size means "the whole texture".
        let frame_size = frame_size
            .filter(|s| s.x > 0 && s.y > 0)
            .unwrap_or(UVec2::new(texture.width, texture.height));
        Self {
            id: id.into(),
            tag: String::from("animation"),
            mode,
            texture_id: texture.id().to_string(),
            frame_size,
            frame_duration,
            elapsed: Duration::ZERO,
            frame_index: 0,
            range: None,
            sheet_frames: SheetLayout::of(texture, frame_size).map_or(0, |l| l.frame_count()),
            done: false,
            loops_completed: 0,
            flip: (false, false),
            on_done: None,
        }
    }

    /// A single frame that never changes.
    pub fn still(id: impl Into<String>, texture: &TextureInfo, frame_size: Option<UVec2>) -> Self {
        Self::with_mode(id, AnimationMode::Static, texture, frame_size, Duration::ZERO)
    }

    pub fn looping(
        id: impl Into<String>,
        texture: &TextureInfo,
        frame_size: UVec2,
        frame_duration: Duration,
    ) -> Self {
        Self::with_mode(id, AnimationMode::Loop, texture, Some(frame_size), frame_duration)
    }

    pub fn finite_loop(
        id: impl Into<String>,
        texture: &TextureInfo,
        frame_size: UVec2,
        frame_duration: Duration,
        max_loops: u32,
    ) -> Self {
        Self::with_mode(
            id,
            AnimationMode::FiniteLoop { max_loops },
            texture,
            Some(frame_size),
            frame_duration,
        )
    }

    pub fn once(
        id: impl Into<String>,
        texture: &TextureInfo,
        frame_size: UVec2,
        frame_duration: Duration,
    ) -> Self {
        Self::with_mode(id, AnimationMode::Once, texture, Some(frame_size), frame_duration)
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Restrict playback to the inclusive frame range `start..=end`.
    pub fn with_range(mut self, start: usize, end: usize) -> Result<Self, String> {
        self.set_range(start, end)?;
        Ok(self)
    }

    /// Register the completion callback.
    pub fn on_done(mut self, callback: impl FnMut(&Animation) + 'static) -> Self {
        self.on_done = Some(Box::new(callback));
        self
    }

    pub fn set_range(&mut self, start: usize, end: usize) -> Result<(), String> {
        if start > end {
            return Err(format!(
                "Animation '{}': range start {} is after end {}",
                self.id, start, end
            ));
        }
        self.range = Some((start, end));
        self.frame_index = self.first_frame();
        Ok(())
    }

    /// Play the whole sheet again.
    pub fn clear_range(&mut self) {
        self.range = None;
    }

    pub fn set_flipped(&mut self, flip_x: bool, flip_y: bool) {
        self.flip = (flip_x, flip_y);
    }

    pub fn set_frame_duration(&mut self, frame_duration: Duration) {
        self.frame_duration = frame_duration;
    }

    /// Rewind to the start of the range and clear the completion state.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.frame_index = self.first_frame();
        self.done = false;
        self.loops_completed = 0;
    }

    pub fn mode(&self) -> AnimationMode {
        self.mode
    }

    pub fn priority(&self) -> i32 {
        self.mode.priority()
    }

    pub fn texture_id(&self) -> &str {
        &self.texture_id
    }

    pub fn frame_size(&self) -> UVec2 {
        self.frame_size
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn range(&self) -> Option<(usize, usize)> {
        self.range
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn loops_completed(&self) -> u32 {
        self.loops_completed
    }

    pub fn flipped(&self) -> (bool, bool) {
        self.flip
    }

    /// Inclusive range actually played for a sheet with `frame_count` cells.
    pub fn effective_range(&self, frame_count: usize) -> (usize, usize) {
        let last = frame_count.saturating_sub(1);
        match self.range {
            Some((start, end)) => {
                let end = end.min(last);
                (start.min(end), end)
            }
            None => (0, last),
        }
    }

    /// Start of the range, clamped to the sheet.
    fn first_frame(&self) -> usize {
        self.effective_range(self.sheet_frames).0
    }

    /// Source rectangle of the current frame, or `None` when the texture is
    /// unknown or smaller than one frame. The index is clamped to the sheet.
    pub fn current_rect(&self, textures: &ResourceStore<TextureInfo>) -> Option<IntRect> {
        let texture = textures.get(&self.texture_id)?;
        let layout = SheetLayout::of(texture, self.frame_size)?;
        let last = layout.frame_count().saturating_sub(1);
        Some(frame_rect(
            self.frame_index.min(last),
            layout.columns,
            self.frame_size,
            self.flip,
        ))
    }

    /// Advance playback by one tick of `delta`.
    ///
    /// The frame moves when the time spent on it has reached the frame
    /// duration; `delta` is then added to the time spent on the (possibly
    /// new) frame. Returns true when the frame changed.
    pub fn update(&mut self, delta: Duration, textures: &ResourceStore<TextureInfo>) -> bool {
        if self.mode == AnimationMode::Static || self.done {
            return false;
        }
        if let AnimationMode::FiniteLoop { max_loops } = self.mode
            && self.loops_completed >= max_loops
        {
            self.finish();
            return false;
        }

        let Some(texture) = textures.get(&self.texture_id) else {
            error!(
                "Animation '{}': texture '{}' not found",
                self.id, self.texture_id
            );
            return false;
        };
        let Some(layout) = SheetLayout::of(texture, self.frame_size) else {
            error!(
                "Animation '{}': frame {}x{} does not fit texture '{}' ({}x{})",
                self.id,
                self.frame_size.x,
                self.frame_size.y,
                texture.id(),
                texture.width,
                texture.height
            );
            return false;
        };
        let (start, end) = self.effective_range(layout.frame_count());

        let mut advanced = false;
        if self.elapsed >= self.frame_duration {
            self.elapsed = Duration::ZERO;
            let before = self.frame_index;
            if self.frame_index < start || self.frame_index > end {
                self.frame_index = start;
            } else if self.frame_index == end {
                self.wrap(start);
            } else {
                self.frame_index += 1;
            }
            advanced = self.frame_index != before;
        }
        self.elapsed = self.elapsed.saturating_add(delta);
        advanced
    }

    fn wrap(&mut self, start: usize) {
        match self.mode {
            AnimationMode::Static => {}
            AnimationMode::Loop => self.frame_index = start,
            AnimationMode::FiniteLoop { max_loops } => {
                self.loops_completed = self.loops_completed.saturating_add(1);
                if self.loops_completed >= max_loops {
                    self.finish();
                } else {
                    self.frame_index = start;
                }
            }
            AnimationMode::Once => {
                self.loops_completed = self.loops_completed.saturating_add(1);
                self.finish();
            }
        }
    }

    fn finish(&mut self) {
        self.done = true;
        if let Some(mut callback) = self.on_done.take() {
            callback(self);
            // kept for the next run after a reset
            self.on_done = Some(callback);
        }
    }
}

impl Identifiable for Animation {
    fn id(&self) -> &str {
        &self.id
    }
    fn tag(&self) -> &str {
        &self.tag
    }
    fn set_tag(&mut self, tag: String, _: RetagToken) {
        self.tag = tag;
    }
}
