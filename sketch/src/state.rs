//! Persisted drawing state read by every primitive.

use crate::color::Color;
use crate::error::{Result, SketchError};

pub const DEFAULT_FRAME_RATE: u32 = 60;

/// Stroke/fill colors, their enabled flags, and the loop rate.
///
/// Disabling stroke or fill keeps the stored color; `enable_stroke` and
/// `enable_fill` bring the last color back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingState {
    stroke: Color,
    fill: Color,
    stroke_enabled: bool,
    fill_enabled: bool,
    frame_rate: u32,
    // 1000 / frame_rate, integer division
    period_millis: u32,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            stroke: Color::BLACK,
            fill: Color::WHITE,
            stroke_enabled: true,
            fill_enabled: true,
            frame_rate: DEFAULT_FRAME_RATE,
            period_millis: 1000 / DEFAULT_FRAME_RATE,
        }
    }
}

impl DrawingState {
    pub fn set_stroke(&mut self, color: Color) {
        self.stroke = color;
        self.stroke_enabled = true;
    }

    pub fn enable_stroke(&mut self) {
        self.stroke_enabled = true;
    }

    pub fn disable_stroke(&mut self) {
        self.stroke_enabled = false;
    }

    pub fn set_fill(&mut self, color: Color) {
        self.fill = color;
        self.fill_enabled = true;
    }

    pub fn enable_fill(&mut self) {
        self.fill_enabled = true;
    }

    pub fn disable_fill(&mut self) {
        self.fill_enabled = false;
    }

    /// Stroke color if stroke is enabled.
    pub fn stroke(&self) -> Option<Color> {
        self.stroke_enabled.then_some(self.stroke)
    }

    /// Fill color if fill is enabled.
    pub fn fill(&self) -> Option<Color> {
        self.fill_enabled.then_some(self.fill)
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke
    }

    pub fn fill_color(&self) -> Color {
        self.fill
    }

    pub fn is_stroke_enabled(&self) -> bool {
        self.stroke_enabled
    }

    pub fn is_fill_enabled(&self) -> bool {
        self.fill_enabled
    }

    /// Sets the target rate; zero is rejected and leaves the state as it was.
    pub fn set_frame_rate(&mut self, fps: u32) -> Result<()> {
        if fps == 0 {
            return Err(SketchError::InvalidFrameRate(fps));
        }
        self.frame_rate = fps;
        self.period_millis = 1000 / fps;
        Ok(())
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    pub fn frame_period_millis(&self) -> u32 {
        self.period_millis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let st = DrawingState::default();
        assert_eq!(st.stroke(), Some(Color::BLACK));
        assert_eq!(st.fill(), Some(Color::WHITE));
        assert_eq!(st.frame_rate(), 60);
        assert_eq!(st.frame_period_millis(), 16);
    }

    #[test]
    fn disable_keeps_color() {
        let mut st = DrawingState::default();
        let c = Color::rgba(10, 20, 30, 40);
        st.set_stroke(c);
        st.disable_stroke();
        assert_eq!(st.stroke(), None);
        assert_eq!(st.stroke_color(), c);

        st.set_fill(c);
        st.disable_fill();
        assert_eq!(st.fill(), None);
        assert_eq!(st.fill_color(), c);
    }

    #[test]
    fn enable_restores_last_color() {
        let mut st = DrawingState::default();
        st.set_fill(Color::RED);
        st.disable_fill();
        st.enable_fill();
        assert_eq!(st.fill(), Some(Color::RED));
    }

    #[test]
    fn setter_after_disable_restores_exact_color() {
        let mut st = DrawingState::default();
        let c = Color::rgb(1, 2, 3);
        for _ in 0..3 {
            st.disable_stroke();
            st.set_stroke(c);
            assert_eq!(st.stroke(), Some(c));
        }
    }

    #[test]
    fn frame_period_truncates() {
        let mut st = DrawingState::default();
        st.set_frame_rate(30).unwrap();
        assert_eq!(st.frame_period_millis(), 33);
        st.set_frame_rate(7).unwrap();
        assert_eq!(st.frame_period_millis(), 142);
        st.set_frame_rate(2000).unwrap();
        assert_eq!(st.frame_period_millis(), 0);
    }

    #[test]
    fn zero_frame_rate_is_rejected() {
        let mut st = DrawingState::default();
        st.set_frame_rate(25).unwrap();
        assert!(matches!(
            st.set_frame_rate(0),
            Err(SketchError::InvalidFrameRate(0))
        ));
        assert_eq!(st.frame_rate(), 25);
        assert_eq!(st.frame_period_millis(), 40);
    }
}
