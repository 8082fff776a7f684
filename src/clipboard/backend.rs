use anyhow::Result;
use image::RgbaImage;

use super::content::{ClipContent, Target};

/// Trait for clipboard backend abstraction
/// Supports different clipboard systems (Wayland now, X11 later)
/// Reads snapshot a buffer for the monitor and the viewers; writes carry
/// viewer edits back to the buffer they came from
pub trait ClipboardBackend: Send + Sync {
    /// Read the current content of a buffer
    /// Absent or unreadable representations come back as None fields,
    /// never as errors
    fn read(&self, target: Target) -> Result<ClipContent>;

    /// Write text to a buffer
    fn write_text(&self, target: Target, text: &str) -> Result<()>;

    /// Write an image to a buffer (transported as PNG)
    fn write_image(&self, target: Target, image: &RgbaImage) -> Result<()>;

    /// Get the backend name (for logging/debugging)
    fn name(&self) -> &'static str;
}
