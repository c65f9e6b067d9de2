//! Input events and the live input state read by draw code.

use std::collections::HashSet;

/// Key code as reported by the backend.
///
/// Printable keys use their ASCII value, so `Key::from_char('a')` matches the
/// `a` key regardless of modifiers. Other keys use the SDL keycode space.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Key(pub i32);

impl Key {
    pub const BACKSPACE: Key = Key(8);
    pub const TAB: Key = Key(9);
    pub const RETURN: Key = Key(13);
    pub const ESCAPE: Key = Key(27);
    pub const SPACE: Key = Key(32);
    pub const RIGHT: Key = Key(0x4000_004f);
    pub const LEFT: Key = Key(0x4000_0050);
    pub const DOWN: Key = Key(0x4000_0051);
    pub const UP: Key = Key(0x4000_0052);

    pub const fn from_char(c: char) -> Key {
        Key(c as i32)
    }

    /// ASCII character for printable keys.
    pub fn as_char(self) -> Option<char> {
        u8::try_from(self.0)
            .ok()
            .filter(|b| b.is_ascii_graphic() || *b == b' ')
            .map(char::from)
    }
}

/// Platform-agnostic input event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    Quit,
    // x, y in surface coordinates
    MouseMotion { x: i32, y: i32 },
    KeyDown(Key),
    KeyUp(Key),
}

/// Live input state.
///
/// `key()` is the last key pressed: releasing it does not clear it.
/// Currently held keys are tracked separately in `is_key_down`.
#[derive(Debug, Default, Clone)]
pub struct Input {
    mouse_x: i32,
    mouse_y: i32,
    last_key: Option<Key>,
    keys_down: HashSet<Key>,
}

impl Input {
    pub fn mouse_x(&self) -> i32 {
        self.mouse_x
    }

    pub fn mouse_y(&self) -> i32 {
        self.mouse_y
    }

    pub fn key(&self) -> Option<Key> {
        self.last_key
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub(crate) fn move_to(&mut self, x: i32, y: i32) {
        self.mouse_x = x;
        self.mouse_y = y;
    }

    pub(crate) fn press(&mut self, key: Key) {
        self.last_key = Some(key);
        self.keys_down.insert(key);
    }

    pub(crate) fn release(&mut self, key: Key) {
        self.keys_down.remove(&key);
    }
}
