//! Decoding of sketch assets into the canonical in-memory pixel format.
//!
//! Every image, whatever its container or channel layout, comes out of this
//! crate as a [`Pixmap`] of `0xAARRGGBB` words, row-major, top row first.

pub mod pixmap;

pub use pixmap::{argb, DecodeError, Pixmap};
