use anyhow::{Context, Result};
use sketch::logging::{init_logging, LoggingConfig};
use sketch::{Sketch, WindowConfig, WindowFlags};
use sketch_sdl::System;

// Usage: image [FILE]   (defaults to brush.png)
fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "brush.png".to_string());

    let config = WindowConfig::new(1024, 768)
        .with_title("image")
        .with_flags(WindowFlags::OPENGL);
    let mut s = Sketch::new(System::new()?, config)?;

    let image = s
        .load_image(&path)
        .with_context(|| format!("cannot load {path}"))?;

    s.run(|s| {
        let (x, y) = (s.mouse_x(), s.mouse_y());
        s.image(&image, x, y);
    })?;

    s.free_image(image);
    Ok(())
}
