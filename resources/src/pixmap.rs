use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors produced while turning a file into a [`Pixmap`].
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error decoding {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid pixel data length: expected {expected}, got {actual}")]
    Length { expected: usize, actual: usize },
}

/// Packs 8-bit channels into a `0xAARRGGBB` word.
#[inline(always)]
pub const fn argb(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// CPU-side image in ARGB8888.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Pixmap {
    /// Fully transparent pixmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn from_argb(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, DecodeError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(DecodeError::Length {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds a pixmap from tightly packed RGBA bytes.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, DecodeError> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(DecodeError::Length {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| argb(px[0], px[1], px[2], px[3]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Reads and decodes an image file.
    ///
    /// The container format is sniffed from the content, so a `.png` holding
    /// JPEG data still loads. Grayscale, paletted, 16-bit and RGB sources are
    /// all widened to ARGB8888.
    pub fn load(path: &Path) -> Result<Self, DecodeError> {
        let data = std::fs::read(path).map_err(|source| DecodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = image::load_from_memory(&data).map_err(|source| DecodeError::Image {
            path: path.to_path_buf(),
            source,
        })?;

        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("decoded {} ({width}x{height})", path.display());
        Self::from_rgba8(width, height, rgba.as_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "sketch-resources-{}-{name}",
            std::process::id()
        ))
    }

    #[test]
    fn argb_packs_alpha_in_high_byte() {
        assert_eq!(argb(0x11, 0x22, 0x33, 0x44), 0x4411_2233);
        assert_eq!(argb(255, 0, 0, 255), 0xffff_0000);
    }

    #[test]
    fn from_rgba8_reorders_channels() {
        let bytes = [1, 2, 3, 4, 10, 20, 30, 40];
        let pm = Pixmap::from_rgba8(2, 1, &bytes).unwrap();
        assert_eq!(pm.pixels(), &[0x0401_0203, 0x280a_141e]);
    }

    #[test]
    fn from_rgba8_rejects_short_buffer() {
        let err = Pixmap::from_rgba8(2, 2, &[0; 12]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Length {
                expected: 16,
                actual: 12
            }
        ));
    }

    #[test]
    fn from_argb_checks_dimensions() {
        assert!(Pixmap::from_argb(3, 3, vec![0; 9]).is_ok());
        assert!(Pixmap::from_argb(3, 3, vec![0; 8]).is_err());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Pixmap::load(&temp_path("does-not-exist.png")).unwrap_err();
        assert!(matches!(err, DecodeError::Io { .. }));
    }

    #[test]
    fn load_garbage_is_decode_error() {
        let path = temp_path("garbage.png");
        std::fs::write(&path, b"definitely not an image").unwrap();
        let err = Pixmap::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, DecodeError::Image { .. }));
    }

    #[test]
    fn load_rgb_png_widens_to_opaque_argb() {
        let path = temp_path("rgb.png");
        let mut img = image::RgbImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        img.put_pixel(1, 1, image::Rgb([0, 0, 255]));
        img.save(&path).unwrap();

        let pm = Pixmap::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!((pm.width(), pm.height()), (2, 2));
        assert_eq!(pm.pixels()[0], 0xffff_0000);
        assert_eq!(pm.pixels()[1], 0xff00_0000);
        assert_eq!(pm.pixels()[3], 0xff00_00ff);
    }
}
