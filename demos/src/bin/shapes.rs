use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use sketch::logging::{init_logging, LoggingConfig};
use sketch::{Color, Key, Sketch, WindowConfig, WindowFlags};
use sketch_sdl::System;

// Press 1, 2 or 3 to switch between rectangle, line and point.
fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = WindowConfig::new(1024, 768)
        .with_title("shapes")
        .with_flags(WindowFlags::OPENGL);
    let mut s = Sketch::new(System::new()?, config)?;

    let mode = Rc::new(Cell::new('1'));
    let m = mode.clone();
    s.on_key_up(move |s| {
        if let Some(c) = s.key().and_then(Key::as_char) {
            m.set(c);
        }
    });
    s.on_quit(|_| log::info!("bye"));

    s.fill(Color::rgba(255, 0, 0, 255));
    s.stroke(Color::rgba(0, 0, 0, 255));

    s.run(|s| {
        let (x, y) = (s.mouse_x(), s.mouse_y());
        match mode.get() {
            '1' => s.rect(x, y, 100, 100),
            '2' => s.line(x, y, x + 100, y + 100),
            '3' => s.point(x, y),
            _ => {}
        }
    })?;
    Ok(())
}
