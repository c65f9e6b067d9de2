use anyhow::{Context, Result};
use sketch::logging::{init_logging, LoggingConfig};
use sketch::{Color, Key, Sketch, WindowConfig};
use sketch_sdl::System;

// Usage: sound FILE
// Space plays the sound once, l loops it; the window is red while anything plays.
fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    let path = std::env::args().nth(1).context("missing sound file")?;

    let mut s = Sketch::new(System::new()?, WindowConfig::new(320, 240).with_title("sound"))?;
    let sound = s
        .load_sound(&path)
        .with_context(|| format!("cannot load {path}"))?;
    s.set_frame_rate(30)?;

    s.run(|s| {
        if s.input().is_key_down(Key::SPACE) && !s.is_sound_playing(&sound) {
            if let Err(e) = s.play_sound(&sound, 0) {
                log::warn!("{e}");
            }
        }
        if s.input().is_key_down(Key::from_char('l')) && !s.is_sound_playing(&sound) {
            if let Err(e) = s.play_sound(&sound, -1) {
                log::warn!("{e}");
            }
        }
        if s.is_sound_playing(&sound) {
            s.background(Color::RED);
        } else {
            s.background(Color::gray(200));
        }
    })?;

    s.free_sound(sound);
    Ok(())
}
