use anyhow::{Context, Result};
use sketch::logging::{init_logging, LoggingConfig};
use sketch::{Sketch, WindowConfig, WindowFlags};
use sketch_sdl::System;

// Loads an image, folds the blue channel into red, and paints with it.
fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "brush.png".to_string());

    let config = WindowConfig::new(1024, 768)
        .with_title("pixels")
        .with_flags(WindowFlags::OPENGL);
    let mut s = Sketch::new(System::new()?, config)?;

    let mut image = s
        .load_image(&path)
        .with_context(|| format!("cannot load {path}"))?;
    for px in image.pixels_mut() {
        *px |= *px << 16;
    }
    s.sync_image(&image)?;

    s.run(|s| {
        let (x, y) = (s.mouse_x(), s.mouse_y());
        s.image(&image, x, y);
    })?;
    Ok(())
}
