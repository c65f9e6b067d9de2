//! SDL2 implementation of the sketch [`Backend`](sketch::Backend).

pub mod system;

pub use system::System;
