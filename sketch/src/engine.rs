// Loop engine: a non-preemptive fixed-tick scheduler.

use crate::backend::Backend;
use crate::error::{Result, SketchError};
use crate::input::Event;
use crate::sketch::{CallbackSlot, Callbacks, Sketch};

/// Lifecycle of the loop.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Terminated,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Tick {
    Continue,
    Quit,
}

impl<B: Backend> Sketch<B> {
    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    /// Runs the loop until the backend reports a quit event.
    ///
    /// Each tick drains every queued event, calls `draw` once, presents the
    /// frame and sleeps for the frame period. The tick that sees the quit
    /// event neither draws nor presents; it fires the quit callback and
    /// returns. A terminated session cannot be run again.
    pub fn run<F>(&mut self, mut draw: F) -> Result<()>
    where
        F: FnMut(&mut Sketch<B>),
    {
        match self.loop_state {
            LoopState::Idle => {}
            LoopState::Running => return Err(SketchError::LoopRunning),
            LoopState::Terminated => return Err(SketchError::LoopTerminated),
        }

        self.loop_state = LoopState::Running;
        log::debug!("loop running at {} fps", self.state.frame_rate());

        let mut ticks: u64 = 0;
        while self.tick(&mut draw) == Tick::Continue {
            ticks += 1;
        }

        self.loop_state = LoopState::Terminated;
        log::debug!("loop terminated after {ticks} frames");
        Ok(())
    }

    fn tick<F>(&mut self, draw: &mut F) -> Tick
    where
        F: FnMut(&mut Sketch<B>),
    {
        if self.drain_events() == Tick::Quit {
            log::info!("quit requested");
            self.fire(|c| &mut c.quit);
            return Tick::Quit;
        }

        draw(self);
        self.backend.present();

        // read after the callback so a rate change applies to this sleep
        self.backend.delay(self.state.frame_period_millis());
        Tick::Continue
    }

    // Applies every queued event in order; a quit event stops the drain.
    fn drain_events(&mut self) -> Tick {
        while let Some(event) = self.backend.poll_event() {
            match event {
                Event::Quit => return Tick::Quit,
                Event::MouseMotion { x, y } => self.input.move_to(x, y),
                Event::KeyDown(key) => {
                    self.fire(|c| &mut c.key_down);
                    self.input.press(key);
                }
                Event::KeyUp(key) => {
                    self.fire(|c| &mut c.key_up);
                    self.input.release(key);
                }
            }
        }
        Tick::Continue
    }

    fn fire(&mut self, slot: fn(&mut Callbacks<B>) -> &mut CallbackSlot<B>) {
        if let Some(mut callback) = slot(&mut self.callbacks).take() {
            callback(self);
            slot(&mut self.callbacks).restore(callback);
        }
    }
}
