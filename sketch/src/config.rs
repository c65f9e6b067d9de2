//! Window configuration.

use bitflags::bitflags;

bitflags! {
    /// Display mode flags, combinable with `|`.
    ///
    /// Bit values are the SDL window flags so a native backend can pass them
    /// straight through.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u32 {
        const FULLSCREEN = 0x0000_0001;
        const OPENGL = 0x0000_0002;
        const HIDDEN = 0x0000_0008;
        const BORDERLESS = 0x0000_0010;
        const RESIZABLE = 0x0000_0020;
        const MINIMIZED = 0x0000_0040;
        const MAXIMIZED = 0x0000_0080;
        const INPUT_GRABBED = 0x0000_0100;
    }
}

/// Window/surface configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub flags: WindowFlags,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "sketch".to_string(),
            width: 200,
            height: 200,
            flags: WindowFlags::empty(),
        }
    }
}

impl WindowConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_flags(mut self, flags: WindowFlags) -> Self {
        self.flags = flags;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_combine() {
        let flags = WindowFlags::OPENGL | WindowFlags::RESIZABLE;
        assert_eq!(flags.bits(), 0x22);
        assert!(flags.contains(WindowFlags::OPENGL));
        assert!(!flags.contains(WindowFlags::HIDDEN));
    }

    #[test]
    fn builder_keeps_defaults() {
        let cfg = WindowConfig::new(1024, 768).with_flags(WindowFlags::OPENGL);
        assert_eq!(cfg.title, "sketch");
        assert_eq!((cfg.width, cfg.height), (1024, 768));
        assert_eq!(cfg.flags, WindowFlags::OPENGL);
    }
}
