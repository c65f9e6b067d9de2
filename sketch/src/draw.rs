// Drawing primitives.
//
// None of these present the frame; that only happens at the end of a tick.

use crate::backend::{Backend, BackendError, Rect};
use crate::color::Color;
use crate::sketch::Sketch;

// Draw calls never abort the loop: a failing primitive is logged and dropped.
pub(crate) fn report(what: &str, result: Result<(), BackendError>) {
    if let Err(e) = result {
        log::warn!("{what} failed: {e}");
    }
}

impl<B: Backend> Sketch<B> {
    /// Sets the stroke color and enables stroking.
    pub fn stroke(&mut self, color: Color) {
        self.state.set_stroke(color);
    }

    /// Disables stroking; the stroke color is kept.
    pub fn no_stroke(&mut self) {
        self.state.disable_stroke();
    }

    /// Enables stroking again with the last stroke color.
    pub fn enable_stroke(&mut self) {
        self.state.enable_stroke();
    }

    /// Sets the fill color and enables filling.
    pub fn fill(&mut self, color: Color) {
        self.state.set_fill(color);
    }

    /// Disables filling; the fill color is kept.
    pub fn no_fill(&mut self) {
        self.state.disable_fill();
    }

    pub fn enable_fill(&mut self) {
        self.state.enable_fill();
    }

    /// Clears the whole surface, ignoring stroke and fill settings.
    pub fn background(&mut self, color: Color) {
        report("background", self.backend.clear(color));
    }

    pub fn point(&mut self, x: i32, y: i32) {
        if let Some(color) = self.state.stroke() {
            report("point", self.backend.draw_point(x, y, color));
        }
    }

    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        if let Some(color) = self.state.stroke() {
            report("line", self.backend.draw_line(x1, y1, x2, y2, color));
        }
    }

    /// Filled rectangle with an outline drawn on top of the fill.
    pub fn rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let rect = Rect::new(x, y, w, h);
        if let Some(color) = self.state.fill() {
            report("rect fill", self.backend.fill_rect(rect, color));
        }
        if let Some(color) = self.state.stroke() {
            report("rect outline", self.backend.draw_rect(rect, color));
        }
    }
}
