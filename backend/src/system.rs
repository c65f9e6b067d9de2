use std::collections::HashMap;
use std::path::Path;

use sdl2::event::Event as SdlEvent;
use sdl2::mixer::{self, Channel, Chunk};
use sdl2::pixels::{Color as SdlColor, PixelFormatEnum};
use sdl2::rect::{Point, Rect as SdlRect};
use sdl2::render::{BlendMode, Texture, TextureCreator, WindowCanvas};
use sdl2::video::WindowContext;

use sketch::{
    Backend, BackendError, Color, Event, Key, Rect, SoundId, TextureId, WindowConfig,
};

const CHUNK_SIZE: i32 = 1024;
const MIX_CHANNELS: i32 = 16;

fn sdl_color(c: Color) -> SdlColor {
    SdlColor::RGBA(c.r, c.g, c.b, c.a)
}

// Empty rectangles draw nothing instead of being handed to SDL.
fn sdl_rect(r: Rect) -> Option<SdlRect> {
    if r.is_empty() {
        return None;
    }
    Some(SdlRect::new(r.x, r.y, r.w as u32, r.h as u32))
}

fn err(e: impl ToString) -> BackendError {
    BackendError(e.to_string())
}

/// Window, renderer, event pump and mixer of one SDL session.
pub struct System {
    _sdl_context: sdl2::Sdl,
    video_subsystem: sdl2::VideoSubsystem,
    _audio_subsystem: Option<sdl2::AudioSubsystem>,
    timer: sdl2::TimerSubsystem,
    event_pump: sdl2::EventPump,
    canvas: Option<WindowCanvas>,
    texture_creator: Option<TextureCreator<WindowContext>>,
    textures: HashMap<TextureId, Texture>,
    chunks: HashMap<SoundId, Chunk>,
    audio_open: bool,
    next_id: u32,
}

impl System {
    /// Initializes SDL video, timer and events; audio is optional.
    ///
    /// No window exists until the first `create_surface`.
    pub fn new() -> Result<System, BackendError> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;
        let timer = sdl_context.timer()?;
        let event_pump = sdl_context.event_pump()?;

        let audio_subsystem = match sdl_context.audio() {
            Ok(a) => Some(a),
            Err(e) => {
                log::warn!("audio subsystem unavailable: {e}");
                None
            }
        };
        let audio_open = audio_subsystem.is_some() && Self::open_audio();

        Ok(System {
            _sdl_context: sdl_context,
            video_subsystem,
            _audio_subsystem: audio_subsystem,
            timer,
            event_pump,
            canvas: None,
            texture_creator: None,
            textures: HashMap::new(),
            chunks: HashMap::new(),
            audio_open,
            next_id: 0,
        })
    }

    fn open_audio() -> bool {
        let format = if cfg!(target_endian = "big") {
            mixer::AUDIO_S16MSB
        } else {
            mixer::DEFAULT_FORMAT
        };
        match mixer::open_audio(
            mixer::DEFAULT_FREQUENCY,
            format,
            mixer::DEFAULT_CHANNELS,
            CHUNK_SIZE,
        ) {
            Ok(()) => {
                mixer::allocate_channels(MIX_CHANNELS);
                true
            }
            Err(e) => {
                log::warn!("could not open audio, sounds are disabled: {e}");
                false
            }
        }
    }

    fn canvas(&mut self) -> Result<&mut WindowCanvas, BackendError> {
        self.canvas
            .as_mut()
            .ok_or_else(|| BackendError("no window has been created".to_string()))
    }

    fn destroy_textures(&mut self) {
        for (_, texture) in self.textures.drain() {
            // SAFETY: the renderer owning the texture is still alive here
            unsafe { texture.destroy() };
        }
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl Backend for System {
    fn create_surface(&mut self, config: &WindowConfig) -> Result<(), BackendError> {
        if !self.textures.is_empty() {
            log::warn!(
                "re-creating the window invalidates {} loaded images",
                self.textures.len()
            );
        }
        self.destroy_textures();
        self.texture_creator = None;
        self.canvas = None;

        let window = match self
            .video_subsystem
            .window(&config.title, config.width, config.height)
            .position_centered()
            .set_window_flags(config.flags.bits())
            .build()
        {
            Ok(w) => w,
            Err(e) => return Err(err(format!("Error while building window: {e}"))),
        };
        let canvas = window
            .into_canvas()
            .build()
            .map_err(|e| err(format!("Error while creating renderer: {e}")))?;

        self.texture_creator = Some(canvas.texture_creator());
        self.canvas = Some(canvas);
        Ok(())
    }

    fn surface_size(&self) -> (u32, u32) {
        self.canvas
            .as_ref()
            .map_or((0, 0), |canvas| canvas.window().size())
    }

    fn clear(&mut self, color: Color) -> Result<(), BackendError> {
        let canvas = self.canvas()?;
        canvas.set_draw_color(sdl_color(color));
        canvas.clear();
        Ok(())
    }

    fn draw_point(&mut self, x: i32, y: i32, color: Color) -> Result<(), BackendError> {
        let canvas = self.canvas()?;
        canvas.set_draw_color(sdl_color(color));
        canvas.draw_point(Point::new(x, y)).map_err(err)
    }

    fn draw_line(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    ) -> Result<(), BackendError> {
        let canvas = self.canvas()?;
        canvas.set_draw_color(sdl_color(color));
        canvas
            .draw_line(Point::new(x1, y1), Point::new(x2, y2))
            .map_err(err)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), BackendError> {
        let Some(rect) = sdl_rect(rect) else {
            return Ok(());
        };
        let canvas = self.canvas()?;
        canvas.set_draw_color(sdl_color(color));
        canvas.fill_rect(rect).map_err(err)
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), BackendError> {
        let Some(rect) = sdl_rect(rect) else {
            return Ok(());
        };
        let canvas = self.canvas()?;
        canvas.set_draw_color(sdl_color(color));
        canvas.draw_rect(rect).map_err(err)
    }

    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u32],
    ) -> Result<TextureId, BackendError> {
        let creator = self
            .texture_creator
            .as_ref()
            .ok_or_else(|| err("no window has been created"))?;
        let mut texture = creator
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(err)?;
        texture.set_blend_mode(BlendMode::Blend);
        // ARGB8888 is a packed native-endian word, exactly our pixel layout
        if let Err(e) = texture.update(None, bytemuck::cast_slice(pixels), width as usize * 4) {
            // SAFETY: freshly created by the live renderer
            unsafe { texture.destroy() };
            return Err(err(e));
        }

        let id = TextureId(self.next_id());
        self.textures.insert(id, texture);
        Ok(id)
    }

    fn update_texture(&mut self, texture: TextureId, pixels: &[u32]) -> Result<(), BackendError> {
        let texture = self
            .textures
            .get_mut(&texture)
            .ok_or_else(|| err(format!("unknown texture {}", texture.0)))?;
        let width = texture.query().width;
        texture
            .update(None, bytemuck::cast_slice(pixels), width as usize * 4)
            .map_err(err)
    }

    fn copy_texture(&mut self, texture: TextureId, dst: Option<Rect>) -> Result<(), BackendError> {
        let dst = match dst {
            Some(rect) => match sdl_rect(rect) {
                Some(r) => Some(r),
                None => return Ok(()),
            },
            None => None,
        };
        let texture = self
            .textures
            .get(&texture)
            .ok_or_else(|| err(format!("unknown texture {}", texture.0)))?;
        let canvas = self
            .canvas
            .as_mut()
            .ok_or_else(|| err("no window has been created"))?;
        canvas.copy(texture, None, dst).map_err(err)
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        if let Some(texture) = self.textures.remove(&texture) {
            // SAFETY: textures are dropped from the map whenever the renderer goes away
            unsafe { texture.destroy() };
        }
    }

    fn load_sound(&mut self, path: &Path) -> Result<SoundId, BackendError> {
        if !self.audio_open {
            return Err(err("audio device is not open"));
        }
        let chunk = Chunk::from_file(path)?;
        let id = SoundId(self.next_id());
        self.chunks.insert(id, chunk);
        Ok(id)
    }

    fn play_sound(&mut self, sound: SoundId, loops: i32) -> Result<(), BackendError> {
        let chunk = self
            .chunks
            .get(&sound)
            .ok_or_else(|| err(format!("unknown sound {}", sound.0)))?;
        Channel::all().play(chunk, loops)?;
        Ok(())
    }

    fn is_sound_playing(&self) -> bool {
        self.audio_open && Channel::all().is_playing()
    }

    fn free_sound(&mut self, sound: SoundId) {
        self.chunks.remove(&sound);
    }

    fn poll_event(&mut self) -> Option<Event> {
        loop {
            let event = match self.event_pump.poll_event()? {
                SdlEvent::Quit { .. } => Event::Quit,
                SdlEvent::MouseMotion { x, y, .. } => Event::MouseMotion { x, y },
                SdlEvent::KeyDown {
                    keycode: Some(keycode),
                    ..
                } => Event::KeyDown(Key(keycode.into_i32())),
                SdlEvent::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => Event::KeyUp(Key(keycode.into_i32())),
                _ => continue,
            };
            return Some(event);
        }
    }

    fn present(&mut self) {
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.present();
        }
    }

    fn delay(&mut self, millis: u32) {
        self.timer.delay(millis);
    }

    fn last_error(&self) -> String {
        sdl2::get_error()
    }
}

impl Drop for System {
    fn drop(&mut self) {
        self.destroy_textures();
        self.chunks.clear();
        if self.audio_open {
            mixer::close_audio();
        }
    }
}
