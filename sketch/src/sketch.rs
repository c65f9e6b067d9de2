use crate::backend::Backend;
use crate::color::Color;
use crate::config::{WindowConfig, WindowFlags};
use crate::engine::LoopState;
use crate::error::{Result, SketchError};
use crate::input::{Input, Key};
use crate::state::DrawingState;

/// Surface color right after the window is (re)created.
pub const DEFAULT_BACKGROUND: Color = Color::gray(200);

/// Event callback. It receives the session so it can read input and change
/// drawing state.
pub type Callback<B> = Box<dyn FnMut(&mut Sketch<B>)>;

/// Optional callback: either unset or one boxed closure.
pub struct CallbackSlot<B>(Option<Callback<B>>);

impl<B> Default for CallbackSlot<B> {
    fn default() -> Self {
        Self(None)
    }
}

impl<B> CallbackSlot<B> {
    pub fn set(&mut self, f: impl FnMut(&mut Sketch<B>) + 'static) {
        self.0 = Some(Box::new(f));
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub(crate) fn take(&mut self) -> Option<Callback<B>> {
        self.0.take()
    }

    // Puts a callback back after it ran unless it was replaced meanwhile.
    pub(crate) fn restore(&mut self, f: Callback<B>) {
        if self.0.is_none() {
            self.0 = Some(f);
        }
    }
}

/// The optional callback slots fired by the loop.
pub struct Callbacks<B> {
    pub quit: CallbackSlot<B>,
    pub key_down: CallbackSlot<B>,
    pub key_up: CallbackSlot<B>,
}

impl<B> Default for Callbacks<B> {
    fn default() -> Self {
        Self {
            quit: CallbackSlot::default(),
            key_down: CallbackSlot::default(),
            key_up: CallbackSlot::default(),
        }
    }
}

/// One sketching session: backend, window, drawing state, input and loop.
pub struct Sketch<B> {
    pub(crate) backend: B,
    pub(crate) config: WindowConfig,
    pub(crate) state: DrawingState,
    pub(crate) input: Input,
    pub(crate) callbacks: Callbacks<B>,
    pub(crate) loop_state: LoopState,
}

impl<B: Backend> Sketch<B> {
    /// Creates the window and clears it to the default background.
    ///
    /// A backend that cannot create the surface yields `SketchError::Init`;
    /// no session exists in that case, so the loop can never be entered.
    pub fn new(mut backend: B, config: WindowConfig) -> Result<Self> {
        backend.create_surface(&config).map_err(|e| {
            log::error!("window initialization failed: {e}");
            SketchError::Init(e)
        })?;
        log::info!(
            "surface created: {}x{} flags={:?}",
            config.width,
            config.height,
            config.flags
        );

        let mut sketch = Self {
            backend,
            config,
            state: DrawingState::default(),
            input: Input::default(),
            callbacks: Callbacks::default(),
            loop_state: LoopState::Idle,
        };
        sketch.background(DEFAULT_BACKGROUND);
        Ok(sketch)
    }

    /// Re-creates the window with a new size and flags.
    ///
    /// The previous surface is destroyed together with the textures of every
    /// image loaded on it.
    ///
    /// On failure the recorded config keeps the old size, but the backend may
    /// already have torn down the old window (the SDL backend does). Treat a
    /// failed `size` as fatal for drawing.
    pub fn size(&mut self, width: u32, height: u32, flags: WindowFlags) -> Result<()> {
        let config = WindowConfig {
            width,
            height,
            flags,
            ..self.config.clone()
        };
        self.backend.create_surface(&config).map_err(|e| {
            log::error!("window re-creation failed: {e}");
            SketchError::Init(e)
        })?;
        log::info!("surface re-created: {width}x{height} flags={flags:?}");
        self.config = config;
        self.background(DEFAULT_BACKGROUND);
        Ok(())
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.backend.surface_size().0
    }

    pub fn height(&self) -> u32 {
        self.backend.surface_size().1
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn mouse_x(&self) -> i32 {
        self.input.mouse_x()
    }

    pub fn mouse_y(&self) -> i32 {
        self.input.mouse_y()
    }

    /// Last key pressed, kept after release.
    pub fn key(&self) -> Option<Key> {
        self.input.key()
    }

    pub fn frame_rate(&self) -> u32 {
        self.state.frame_rate()
    }

    /// Changes the loop rate; the sleep following the current tick already
    /// uses the new period.
    pub fn set_frame_rate(&mut self, fps: u32) -> Result<()> {
        self.state.set_frame_rate(fps)?;
        log::debug!(
            "frame rate set to {fps} ({} ms period)",
            self.state.frame_period_millis()
        );
        Ok(())
    }

    /// Blocks for `millis` milliseconds.
    pub fn delay(&mut self, millis: u32) {
        self.backend.delay(millis);
    }

    pub fn callbacks(&mut self) -> &mut Callbacks<B> {
        &mut self.callbacks
    }

    pub fn on_quit(&mut self, f: impl FnMut(&mut Sketch<B>) + 'static) {
        self.callbacks.quit.set(f);
    }

    pub fn on_key_down(&mut self, f: impl FnMut(&mut Sketch<B>) + 'static) {
        self.callbacks.key_down.set(f);
    }

    pub fn on_key_up(&mut self, f: impl FnMut(&mut Sketch<B>) + 'static) {
        self.callbacks.key_up.set(f);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Gives the backend back, dropping the session.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Last error string reported by the backend.
    pub fn last_error(&self) -> String {
        self.backend.last_error()
    }

    pub fn print_error(&self) {
        log::error!("{}", self.last_error());
    }
}
