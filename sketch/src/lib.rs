//! Immediate-mode 2D sketching on top of a pluggable window backend.
//!
//! A [`Sketch`] owns the backend, the drawing state (stroke, fill, frame rate)
//! and the input state. [`Sketch::run`] drives the fixed-rate loop: drain
//! events, call the draw closure, present, sleep.
//!
//! ```no_run
//! use sketch::{Color, HeadlessBackend, Sketch, WindowConfig};
//!
//! let mut s = Sketch::new(HeadlessBackend::new(), WindowConfig::new(320, 240))?;
//! s.fill(Color::rgb(255, 0, 0));
//! s.run(|s| {
//!     let (x, y) = (s.mouse_x(), s.mouse_y());
//!     s.rect(x, y, 100, 100);
//! })?;
//! # Ok::<(), sketch::SketchError>(())
//! ```

pub mod backend;
pub mod color;
pub mod config;
pub mod error;
pub mod headless;
pub mod input;
pub mod logging;
pub mod resource;
pub mod state;

mod draw;
mod engine;
mod sketch;

pub use backend::{Backend, BackendError, Rect, SoundId, TextureId};
pub use color::Color;
pub use config::{WindowConfig, WindowFlags};
pub use engine::LoopState;
pub use error::{ResourceLoadError, Result, SketchError};
pub use headless::{DrawCommand, HeadlessBackend, Playback};
pub use input::{Event, Input, Key};
pub use resource::{Image, Sound};
pub use sketch::{Callback, CallbackSlot, Callbacks, Sketch, DEFAULT_BACKGROUND};
pub use sketch_resources::Pixmap;
pub use state::DrawingState;
