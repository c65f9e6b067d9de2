//! In-memory backend.
//!
//! Renders into a software framebuffer instead of a window, records every
//! command it receives, and replays scripted input. Sleeping is recorded,
//! not performed, so a whole loop runs as fast as the draw closure allows.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::{Path, PathBuf};

use crate::backend::{Backend, BackendError, Rect, SoundId, TextureId};
use crate::color::Color;
use crate::config::WindowConfig;
use crate::input::Event;

const OPAQUE_BLACK: u32 = 0xff00_0000;

/// A draw request as received by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Clear(Color),
    Point {
        x: i32,
        y: i32,
        color: Color,
    },
    Line {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    },
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
    },
    CopyTexture {
        texture: TextureId,
        dst: Option<Rect>,
    },
    Present,
}

/// An active playback on the simulated mixer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Playback {
    pub sound: SoundId,
    // remaining repeats after the current pass, negative = forever
    pub loops: i32,
}

#[derive(Debug)]
struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    uploads: u32,
}

#[derive(Debug, Default)]
pub struct HeadlessBackend {
    width: u32,
    height: u32,
    surface: Vec<u32>,
    frame: Vec<u32>,
    presents: u64,
    surfaces_created: u32,
    commands: Vec<DrawCommand>,
    textures: HashMap<TextureId, Texture>,
    sounds: HashMap<SoundId, PathBuf>,
    playbacks: Vec<Playback>,
    next_id: u32,
    pending: VecDeque<Event>,
    // events released once `presents` reaches the key
    scheduled: BTreeMap<u64, Vec<Event>>,
    delays: Vec<u32>,
    fail_surface: bool,
    fail_uploads: bool,
    last_error: String,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an event for the next drain.
    pub fn push_event(&mut self, event: Event) {
        self.pending.push_back(event);
    }

    pub fn push_events(&mut self, events: impl IntoIterator<Item = Event>) {
        self.pending.extend(events);
    }

    /// Queues an event that becomes visible once `presents` frames were shown.
    pub fn schedule_event(&mut self, presents: u64, event: Event) {
        self.scheduled.entry(presents).or_default().push(event);
    }

    /// Delivers a quit event after `presents` frames.
    pub fn quit_after(&mut self, presents: u64) {
        self.schedule_event(presents, Event::Quit);
    }

    /// Makes the next surface creations fail.
    pub fn fail_surface_creation(&mut self, fail: bool) {
        self.fail_surface = fail;
    }

    /// Makes texture creation and updates fail.
    pub fn fail_uploads(&mut self, fail: bool) {
        self.fail_uploads = fail;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Back buffer: everything drawn so far, presented or not.
    pub fn surface(&self) -> &[u32] {
        &self.surface
    }

    /// Content of the last presented frame.
    pub fn frame(&self) -> &[u32] {
        &self.frame
    }

    pub fn surface_pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.offset(x as i32, y as i32).map(|i| self.surface[i])
    }

    pub fn frame_pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.offset(x as i32, y as i32).map(|i| self.frame[i])
    }

    pub fn present_count(&self) -> u64 {
        self.presents
    }

    pub fn surfaces_created(&self) -> u32 {
        self.surfaces_created
    }

    /// Every sleep requested through `delay`, in milliseconds.
    pub fn delays(&self) -> &[u32] {
        &self.delays
    }

    /// Last buffer uploaded to a texture.
    pub fn texture_pixels(&self, texture: TextureId) -> Option<&[u32]> {
        self.textures.get(&texture).map(|t| t.pixels.as_slice())
    }

    /// Number of uploads into a texture, creation included.
    pub fn texture_uploads(&self, texture: TextureId) -> u32 {
        self.textures.get(&texture).map_or(0, |t| t.uploads)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }

    pub fn playbacks(&self) -> &[Playback] {
        &self.playbacks
    }

    /// Finishes one pass of every active playback.
    ///
    /// Playbacks with repeats left start over, infinite ones never end.
    pub fn advance_audio(&mut self) {
        self.playbacks.retain_mut(|p| match p.loops {
            0 => false,
            n if n > 0 => {
                p.loops -= 1;
                true
            }
            _ => true,
        });
    }

    fn fail(&mut self, msg: String) -> BackendError {
        self.last_error = msg.clone();
        BackendError(msg)
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn put(&mut self, x: i32, y: i32, argb: u32) {
        if let Some(i) = self.offset(x, y) {
            self.surface[i] = argb;
        }
    }

    // Intersection of `rect` with the surface as (x0, y0, x1, y1), exclusive end.
    fn clip(&self, rect: Rect) -> Option<(i32, i32, i32, i32)> {
        if rect.is_empty() {
            return None;
        }
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = rect.x.saturating_add(rect.w).min(self.width as i32);
        let y1 = rect.y.saturating_add(rect.h).min(self.height as i32);
        (x1 > x0 && y1 > y0).then_some((x0, y0, x1, y1))
    }

    // Cohen-Sutherland against the surface. Widened so that any pair of i32
    // endpoints can be clipped without overflow.
    fn clip_line(
        &self,
        mut a: (i64, i64),
        mut b: (i64, i64),
    ) -> Option<((i64, i64), (i64, i64))> {
        const LEFT: u8 = 1;
        const RIGHT: u8 = 2;
        const TOP: u8 = 4;
        const BOTTOM: u8 = 8;

        if self.width == 0 || self.height == 0 {
            return None;
        }
        let (xmax, ymax) = (self.width as i64 - 1, self.height as i64 - 1);
        let code = |(x, y): (i64, i64)| {
            let mut c = 0;
            if x < 0 {
                c |= LEFT;
            } else if x > xmax {
                c |= RIGHT;
            }
            if y < 0 {
                c |= TOP;
            } else if y > ymax {
                c |= BOTTOM;
            }
            c
        };
        // (v - v0) * (w1 - w0) / (v1 - v0) can exceed i64
        let lerp = |from: i64, delta: i64, num: i64, den: i64| {
            from + (delta as i128 * num as i128 / den as i128) as i64
        };

        // each pass settles one edge for one endpoint; integer rounding may
        // need a few more, a line still outside after that misses the surface
        for _ in 0..8 {
            let (ca, cb) = (code(a), code(b));
            if ca | cb == 0 {
                return Some((a, b));
            }
            if ca & cb != 0 {
                return None;
            }
            let c = if ca != 0 { ca } else { cb };
            let (dx, dy) = (b.0 - a.0, b.1 - a.1);
            let p = if c & TOP != 0 {
                (lerp(a.0, dx, -a.1, dy), 0)
            } else if c & BOTTOM != 0 {
                (lerp(a.0, dx, ymax - a.1, dy), ymax)
            } else if c & LEFT != 0 {
                (0, lerp(a.1, dy, -a.0, dx))
            } else {
                (xmax, lerp(a.1, dy, xmax - a.0, dx))
            };
            if c == ca {
                a = p;
            } else {
                b = p;
            }
        }
        None
    }

    fn raster_line(&mut self, x1: i64, y1: i64, x2: i64, y2: i64, argb: u32) {
        let Some(((x1, y1), (x2, y2))) = self.clip_line((x1, y1), (x2, y2)) else {
            return;
        };
        // Bresenham, both endpoints included
        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x1, y1);
        loop {
            self.put(x as i32, y as i32, argb);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

/// Source-over blend of straight-alpha ARGB words.
fn blend(dst: u32, src: u32) -> u32 {
    let sa = src >> 24;
    match sa {
        0xff => src,
        0 => dst,
        _ => {
            let da = dst >> 24;
            let mix = |shift: u32| {
                let s = (src >> shift) & 0xff;
                let d = (dst >> shift) & 0xff;
                (s * sa + d * (255 - sa) + 127) / 255
            };
            let a = sa + (da * (255 - sa) + 127) / 255;
            a << 24 | mix(16) << 16 | mix(8) << 8 | mix(0)
        }
    }
}

impl Backend for HeadlessBackend {
    fn create_surface(&mut self, config: &WindowConfig) -> Result<(), BackendError> {
        if self.fail_surface {
            return Err(self.fail(format!(
                "could not create {}x{} surface",
                config.width, config.height
            )));
        }
        if !self.textures.is_empty() {
            log::debug!(
                "dropping {} textures of the previous surface",
                self.textures.len()
            );
            self.textures.clear();
        }
        self.width = config.width;
        self.height = config.height;
        let len = config.width as usize * config.height as usize;
        self.surface = vec![OPAQUE_BLACK; len];
        self.frame = vec![OPAQUE_BLACK; len];
        self.surfaces_created += 1;
        Ok(())
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) -> Result<(), BackendError> {
        self.commands.push(DrawCommand::Clear(color));
        self.surface.fill(color.to_argb());
        Ok(())
    }

    fn draw_point(&mut self, x: i32, y: i32, color: Color) -> Result<(), BackendError> {
        self.commands.push(DrawCommand::Point { x, y, color });
        self.put(x, y, color.to_argb());
        Ok(())
    }

    fn draw_line(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    ) -> Result<(), BackendError> {
        self.commands.push(DrawCommand::Line {
            x1,
            y1,
            x2,
            y2,
            color,
        });
        self.raster_line(x1.into(), y1.into(), x2.into(), y2.into(), color.to_argb());
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), BackendError> {
        self.commands.push(DrawCommand::FillRect { rect, color });
        if let Some((x0, y0, x1, y1)) = self.clip(rect) {
            let argb = color.to_argb();
            for y in y0..y1 {
                for x in x0..x1 {
                    self.put(x, y, argb);
                }
            }
        }
        Ok(())
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), BackendError> {
        self.commands.push(DrawCommand::StrokeRect { rect, color });
        if rect.is_empty() {
            return Ok(());
        }
        let argb = color.to_argb();
        let (left, top) = (i64::from(rect.x), i64::from(rect.y));
        let (right, bottom) = (left + i64::from(rect.w) - 1, top + i64::from(rect.h) - 1);
        self.raster_line(left, top, right, top, argb);
        self.raster_line(left, bottom, right, bottom, argb);
        self.raster_line(left, top, left, bottom, argb);
        self.raster_line(right, top, right, bottom, argb);
        Ok(())
    }

    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u32],
    ) -> Result<TextureId, BackendError> {
        if self.fail_uploads {
            return Err(self.fail("texture creation failed".to_string()));
        }
        if width == 0 || height == 0 {
            return Err(self.fail(format!("cannot create a {width}x{height} texture")));
        }
        if pixels.len() != width as usize * height as usize {
            return Err(self.fail(format!(
                "texture data has {} pixels, expected {width}x{height}",
                pixels.len()
            )));
        }
        let id = TextureId(self.next_id());
        self.textures.insert(
            id,
            Texture {
                width,
                height,
                pixels: pixels.to_vec(),
                uploads: 1,
            },
        );
        Ok(id)
    }

    fn update_texture(&mut self, texture: TextureId, pixels: &[u32]) -> Result<(), BackendError> {
        if self.fail_uploads {
            return Err(self.fail("texture update failed".to_string()));
        }
        let Some(tex) = self.textures.get_mut(&texture) else {
            return Err(self.fail(format!("unknown texture {}", texture.0)));
        };
        if pixels.len() != tex.pixels.len() {
            let expected = tex.pixels.len();
            return Err(self.fail(format!(
                "texture update has {} pixels, expected {expected}",
                pixels.len()
            )));
        }
        tex.pixels.copy_from_slice(pixels);
        tex.uploads += 1;
        Ok(())
    }

    fn copy_texture(&mut self, texture: TextureId, dst: Option<Rect>) -> Result<(), BackendError> {
        self.commands.push(DrawCommand::CopyTexture { texture, dst });
        let Some(tex) = self.textures.get(&texture) else {
            return Err(self.fail(format!("unknown texture {}", texture.0)));
        };
        let dst = dst.unwrap_or(Rect::new(0, 0, self.width as i32, self.height as i32));
        let Some((x0, y0, x1, y1)) = self.clip(dst) else {
            return Ok(());
        };

        // nearest-neighbour sampling
        let (tw, th) = (tex.width as i64, tex.height as i64);
        let mut writes = Vec::with_capacity(((x1 - x0) * (y1 - y0)) as usize);
        for y in y0..y1 {
            let sy = (i64::from(y) - i64::from(dst.y)) * th / i64::from(dst.h);
            for x in x0..x1 {
                let sx = (i64::from(x) - i64::from(dst.x)) * tw / i64::from(dst.w);
                writes.push((x, y, tex.pixels[(sy * tw + sx) as usize]));
            }
        }
        for (x, y, src) in writes {
            if let Some(i) = self.offset(x, y) {
                self.surface[i] = blend(self.surface[i], src);
            }
        }
        Ok(())
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture);
    }

    fn load_sound(&mut self, path: &Path) -> Result<SoundId, BackendError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => {
                let id = SoundId(self.next_id());
                self.sounds.insert(id, path.to_path_buf());
                Ok(id)
            }
            _ => Err(self.fail(format!("Couldn't open '{}'", path.display()))),
        }
    }

    fn play_sound(&mut self, sound: SoundId, loops: i32) -> Result<(), BackendError> {
        if !self.sounds.contains_key(&sound) {
            return Err(self.fail(format!("unknown sound {}", sound.0)));
        }
        self.playbacks.push(Playback { sound, loops });
        Ok(())
    }

    fn is_sound_playing(&self) -> bool {
        !self.playbacks.is_empty()
    }

    fn free_sound(&mut self, sound: SoundId) {
        self.sounds.remove(&sound);
        self.playbacks.retain(|p| p.sound != sound);
    }

    fn poll_event(&mut self) -> Option<Event> {
        let due: Vec<u64> = self
            .scheduled
            .range(..=self.presents)
            .map(|(k, _)| *k)
            .collect();
        for key in due {
            if let Some(events) = self.scheduled.remove(&key) {
                self.pending.extend(events);
            }
        }
        self.pending.pop_front()
    }

    fn present(&mut self) {
        self.commands.push(DrawCommand::Present);
        self.frame.copy_from_slice(&self.surface);
        self.presents += 1;
    }

    fn delay(&mut self, millis: u32) {
        self.delays.push(millis);
    }

    fn last_error(&self) -> String {
        self.last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(w: u32, h: u32) -> HeadlessBackend {
        let mut b = HeadlessBackend::new();
        b.create_surface(&WindowConfig::new(w, h)).unwrap();
        b
    }

    #[test]
    fn blend_extremes() {
        assert_eq!(blend(0xff00_0000, 0xff12_3456), 0xff12_3456);
        assert_eq!(blend(0xff12_3456, 0x00ff_ffff), 0xff12_3456);
        assert_eq!(blend(0xff00_0000, 0x80ff_ffff), 0xff80_8080);
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut b = backend(4, 4);
        b.fill_rect(Rect::new(-2, 2, 4, 10), Color::RED).unwrap();
        let red = Color::RED.to_argb();
        assert_eq!(b.surface_pixel(0, 2), Some(red));
        assert_eq!(b.surface_pixel(1, 3), Some(red));
        assert_eq!(b.surface_pixel(2, 2), Some(OPAQUE_BLACK));
        assert_eq!(b.surface_pixel(0, 1), Some(OPAQUE_BLACK));
    }

    #[test]
    fn outline_leaves_interior() {
        let mut b = backend(5, 5);
        b.draw_rect(Rect::new(0, 0, 5, 5), Color::WHITE).unwrap();
        let white = Color::WHITE.to_argb();
        assert_eq!(b.surface_pixel(0, 0), Some(white));
        assert_eq!(b.surface_pixel(4, 4), Some(white));
        assert_eq!(b.surface_pixel(4, 0), Some(white));
        assert_eq!(b.surface_pixel(2, 2), Some(OPAQUE_BLACK));
    }

    #[test]
    fn line_includes_endpoints() {
        let mut b = backend(8, 8);
        b.draw_line(1, 1, 6, 4, Color::GREEN).unwrap();
        let green = Color::GREEN.to_argb();
        assert_eq!(b.surface_pixel(1, 1), Some(green));
        assert_eq!(b.surface_pixel(6, 4), Some(green));
    }

    #[test]
    fn empty_texture_is_refused() {
        let mut b = backend(4, 4);
        assert!(b.create_texture(0, 4, &[]).is_err());
        assert!(b.create_texture(3, 0, &[]).is_err());
        assert_eq!(b.texture_count(), 0);
    }

    #[test]
    fn long_line_is_clipped_to_the_surface() {
        let mut b = backend(4, 4);
        b.draw_line(-1_000_000_000, 2, 1_000_000_000, 2, Color::RED)
            .unwrap();
        let red = Color::RED.to_argb();
        assert!((0..4).all(|x| b.surface_pixel(x, 2) == Some(red)));
        assert_eq!(b.surface_pixel(0, 1), Some(OPAQUE_BLACK));
    }

    #[test]
    fn texture_copy_scales_nearest() {
        let mut b = backend(4, 4);
        let id = b
            .create_texture(2, 1, &[0xff11_1111, 0xff22_2222])
            .unwrap();
        b.copy_texture(id, None).unwrap();
        assert_eq!(b.surface_pixel(0, 0), Some(0xff11_1111));
        assert_eq!(b.surface_pixel(1, 3), Some(0xff11_1111));
        assert_eq!(b.surface_pixel(2, 0), Some(0xff22_2222));
        assert_eq!(b.surface_pixel(3, 3), Some(0xff22_2222));
    }

    #[test]
    fn unknown_texture_sets_last_error() {
        let mut b = backend(2, 2);
        assert!(b.copy_texture(TextureId(99), None).is_err());
        assert_eq!(b.last_error(), "unknown texture 99");
    }

    #[test]
    fn scheduled_events_wait_for_presents() {
        let mut b = backend(1, 1);
        b.schedule_event(1, Event::KeyDown(crate::Key::SPACE));
        assert_eq!(b.poll_event(), None);
        b.present();
        assert_eq!(b.poll_event(), Some(Event::KeyDown(crate::Key::SPACE)));
        assert_eq!(b.poll_event(), None);
    }

    #[test]
    fn surface_recreation_drops_textures() {
        let mut b = backend(2, 2);
        b.create_texture(1, 1, &[0]).unwrap();
        assert_eq!(b.texture_count(), 1);
        b.create_surface(&WindowConfig::new(3, 3)).unwrap();
        assert_eq!(b.texture_count(), 0);
        assert_eq!(b.surface_size(), (3, 3));
        assert_eq!(b.surfaces_created(), 2);
    }

    #[test]
    fn advance_audio_follows_loop_counts() {
        let mut b = HeadlessBackend::new();
        b.sounds.insert(SoundId(1), PathBuf::from("a.wav"));
        b.play_sound(SoundId(1), 1).unwrap();
        b.advance_audio();
        assert!(b.is_sound_playing());
        b.advance_audio();
        assert!(!b.is_sound_playing());
    }
}
