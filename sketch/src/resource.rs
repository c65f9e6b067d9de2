//! Caller-owned images and sounds.
//!
//! An [`Image`] keeps its decoded pixels on the CPU side next to the backend
//! texture built from them. Pixel writes are batched: nothing changes on
//! screen until [`Sketch::sync_image`] re-uploads the whole buffer.
//!
//! The session never frees resources on its own. Release them with
//! [`Sketch::free_image`] and [`Sketch::free_sound`].

use std::path::Path;

use sketch_resources::Pixmap;

use crate::backend::{Backend, Rect, SoundId, TextureId};
use crate::draw::report;
use crate::error::{ResourceLoadError, Result};
use crate::sketch::Sketch;

/// Decoded image plus its texture.
#[derive(Debug)]
pub struct Image {
    pixmap: Pixmap,
    texture: TextureId,
}

impl Image {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Pixels as `0xAARRGGBB` words, row-major.
    pub fn pixels(&self) -> &[u32] {
        self.pixmap.pixels()
    }

    /// Writable pixels. The texture is stale until the image is synced.
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        self.pixmap.pixels_mut()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixmap.pixels()[i])
    }

    /// Writes one pixel; out-of-range coordinates are ignored and return `false`.
    pub fn set_pixel(&mut self, x: u32, y: u32, argb: u32) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixmap.pixels_mut()[i] = argb;
                true
            }
            None => false,
        }
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width() && y < self.height())
            .then(|| y as usize * self.width() as usize + x as usize)
    }
}

/// Handle to a decoded sound buffer owned by the backend mixer.
#[derive(Debug, PartialEq, Eq)]
pub struct Sound {
    id: SoundId,
}

impl Sound {
    pub fn id(&self) -> SoundId {
        self.id
    }
}

impl<B: Backend> Sketch<B> {
    /// Loads an image file (PNG, JPEG, GIF, BMP, TIFF, WEBP, ICO).
    ///
    /// On failure nothing in the session changes.
    pub fn load_image(&mut self, path: impl AsRef<Path>) -> Result<Image> {
        let path = path.as_ref();
        let pixmap = Pixmap::load(path).map_err(|e| {
            log::warn!("{e}");
            ResourceLoadError::Decode(e)
        })?;
        let texture = self
            .backend
            .create_texture(pixmap.width(), pixmap.height(), pixmap.pixels())
            .map_err(|source| {
                log::warn!("texture upload failed for {}: {source}", path.display());
                ResourceLoadError::Upload {
                    path: Some(path.to_path_buf()),
                    source,
                }
            })?;

        log::debug!(
            "loaded image {} ({}x{}) as {texture:?}",
            path.display(),
            pixmap.width(),
            pixmap.height()
        );
        Ok(Image { pixmap, texture })
    }

    /// Builds an image from pixels produced in memory.
    pub fn create_image(&mut self, pixmap: Pixmap) -> Result<Image> {
        let texture = self
            .backend
            .create_texture(pixmap.width(), pixmap.height(), pixmap.pixels())
            .map_err(|source| {
                log::warn!("texture upload failed: {source}");
                ResourceLoadError::Upload { path: None, source }
            })?;
        Ok(Image { pixmap, texture })
    }

    /// Re-uploads the full pixel buffer to the image's texture.
    pub fn sync_image(&mut self, image: &Image) -> Result<()> {
        self.backend.update_texture(image.texture, image.pixels())?;
        Ok(())
    }

    /// Destroys the texture and drops the pixel buffer.
    pub fn free_image(&mut self, image: Image) {
        self.backend.destroy_texture(image.texture);
    }

    /// Draws an image at its native size.
    pub fn image(&mut self, image: &Image, x: i32, y: i32) {
        let dst = Rect::new(x, y, image.width() as i32, image.height() as i32);
        report("image", self.backend.copy_texture(image.texture, Some(dst)));
    }

    pub fn image_scaled(&mut self, image: &Image, x: i32, y: i32, w: i32, h: i32) {
        let dst = Rect::new(x, y, w, h);
        report("image", self.backend.copy_texture(image.texture, Some(dst)));
    }

    /// Stretches an image over the whole surface.
    pub fn image_fill(&mut self, image: &Image) {
        report("image", self.backend.copy_texture(image.texture, None));
    }

    pub fn load_sound(&mut self, path: impl AsRef<Path>) -> Result<Sound> {
        let path = path.as_ref();
        let id = self.backend.load_sound(path).map_err(|source| {
            log::warn!("sound loading failed for {}: {source}", path.display());
            ResourceLoadError::Audio {
                path: path.to_path_buf(),
                source,
            }
        })?;
        log::debug!("loaded sound {} as {id:?}", path.display());
        Ok(Sound { id })
    }

    /// Plays a sound on the first free channel.
    ///
    /// `loops == 0` plays once, `loops < 0` repeats until the program ends,
    /// `loops == n` plays `n + 1` times.
    pub fn play_sound(&mut self, sound: &Sound, loops: i32) -> Result<()> {
        self.backend.play_sound(sound.id, loops)?;
        Ok(())
    }

    /// Whether any sound is currently audible, not just this one.
    pub fn is_sound_playing(&self, _sound: &Sound) -> bool {
        self.backend.is_sound_playing()
    }

    pub fn free_sound(&mut self, sound: Sound) {
        self.backend.free_sound(sound.id);
    }
}
