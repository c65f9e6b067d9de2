//! Capability interface to the window/render/audio service.
//!
//! The loop engine and the drawing primitives only ever talk to a
//! [`Backend`]. The native implementation lives in the `sketch-sdl` crate;
//! [`crate::HeadlessBackend`] renders into memory.

use std::fmt;
use std::path::Path;

use crate::color::Color;
use crate::config::WindowConfig;
use crate::input::Event;

/// Opaque failure message reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError(pub String);

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for BackendError {}

impl From<String> for BackendError {
    fn from(msg: String) -> Self {
        BackendError(msg)
    }
}

impl From<&str> for BackendError {
    fn from(msg: &str) -> Self {
        BackendError(msg.to_string())
    }
}

/// Handle of a backend-resident texture.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Handle of a backend-decoded sound buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundId(pub u32);

/// Integer rectangle in surface pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// True when the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

pub trait Backend {
    /// Creates the window and render surface, destroying any previous one.
    ///
    /// Textures created on the previous surface are invalidated. The previous
    /// surface may be gone even when this fails.
    fn create_surface(&mut self, config: &WindowConfig) -> Result<(), BackendError>;

    /// Current drawable size in pixels.
    fn surface_size(&self) -> (u32, u32);

    fn clear(&mut self, color: Color) -> Result<(), BackendError>;
    fn draw_point(&mut self, x: i32, y: i32, color: Color) -> Result<(), BackendError>;
    fn draw_line(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    ) -> Result<(), BackendError>;
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), BackendError>;
    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), BackendError>;

    /// Uploads a `width * height` ARGB8888 buffer into a new texture.
    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u32],
    ) -> Result<TextureId, BackendError>;

    /// Replaces the whole content of an existing texture.
    fn update_texture(&mut self, texture: TextureId, pixels: &[u32]) -> Result<(), BackendError>;

    /// Draws a texture stretched into `dst`, or over the whole surface when `None`.
    fn copy_texture(&mut self, texture: TextureId, dst: Option<Rect>) -> Result<(), BackendError>;
    fn destroy_texture(&mut self, texture: TextureId);

    fn load_sound(&mut self, path: &Path) -> Result<SoundId, BackendError>;

    /// Starts playback on any free channel.
    ///
    /// `loops` follows the mixer convention: `0` plays once, `n > 0` plays
    /// `n + 1` times, negative repeats forever.
    fn play_sound(&mut self, sound: SoundId, loops: i32) -> Result<(), BackendError>;

    /// Whether anything at all is audible on the shared output.
    fn is_sound_playing(&self) -> bool;
    fn free_sound(&mut self, sound: SoundId);

    /// Next pending input event, `None` once the queue is empty.
    fn poll_event(&mut self) -> Option<Event>;

    /// Flushes everything drawn since the previous present.
    fn present(&mut self);

    /// Blocks the caller for `millis` milliseconds.
    fn delay(&mut self, millis: u32);

    /// Last error message recorded by the backend, empty when none.
    fn last_error(&self) -> String;
}
