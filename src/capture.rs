use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::Context;
use image::RgbaImage;

use crate::clipboard::{ClipboardBackend, Target};
use crate::error::ActionError;

/// Runs the external screenshot tool and pushes the result to the clipboard
///
/// The tool gets a fresh temp file path appended to its configured argv and
/// is expected to write a PNG there. The call blocks until the tool exits,
/// which lets region-select tools like grimshot hold the screen as long as
/// they need.
pub struct ScreenCapture {
    command: Vec<String>,
}

impl ScreenCapture {
    pub fn new(command: Vec<String>) -> Self {
        ScreenCapture { command }
    }

    /// Take a screenshot and place it in the system clipboard
    pub fn take(&self, backend: &dyn ClipboardBackend) -> Result<(), ActionError> {
        let file = tempfile::Builder::new()
            .prefix("clipsight-")
            .suffix(".png")
            .tempfile()
            .context("failed to create capture file")?;
        let image = self.run_tool(file.path())?;
        backend.write_image(Target::Clipboard, &image)?;
        log::info!("Captured {}x{} screenshot", image.width(), image.height());
        Ok(())
    }

    fn run_tool(&self, path: &Path) -> Result<RgbaImage, ActionError> {
        let (program, args) = self
            .command
            .split_first()
            .context("capture command is empty")?;

        let status = Command::new(program)
            .args(args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("failed to run capture command `{program}`"))?;
        if !status.success() {
            return Err(ActionError::External {
                command: program.clone(),
                status,
            });
        }

        let image = image::open(path)
            .map_err(|_| ActionError::Decode {
                path: path.display().to_string(),
            })?
            .to_rgba8();
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::fake::FakeBackend;
    use image::Rgba;

    fn fixture_png(dir: &Path) -> String {
        let path = dir.join("fixture.png");
        RgbaImage::from_pixel(6, 5, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_capture_lands_in_clipboard() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = fixture_png(dir.path());
        let capture = ScreenCapture::new(vec!["cp".to_string(), fixture]);
        let backend = FakeBackend::new();

        capture.take(&backend).unwrap();
        assert_eq!(backend.write_count(), 1);
        let image = backend.image_of(Target::Clipboard).unwrap();
        assert_eq!(image.dimensions(), (6, 5));
    }

    #[test]
    fn test_tool_failure_writes_nothing() {
        let capture = ScreenCapture::new(vec!["false".to_string()]);
        let backend = FakeBackend::new();

        let err = capture.take(&backend).unwrap_err();
        assert!(matches!(err, ActionError::External { .. }));
        assert!(err.to_string().starts_with("`false` failed"));
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_unreadable_capture_reports_decode_error() {
        // `true` exits cleanly without producing a PNG
        let capture = ScreenCapture::new(vec!["true".to_string()]);
        let backend = FakeBackend::new();

        let err = capture.take(&backend).unwrap_err();
        assert!(matches!(err, ActionError::Decode { .. }));
        assert!(err.to_string().starts_with("Cannot load"));
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_empty_command_is_rejected() {
        let capture = ScreenCapture::new(Vec::new());
        let backend = FakeBackend::new();

        let err = capture.take(&backend).unwrap_err();
        assert!(matches!(err, ActionError::Backend(_)));
        assert!(!err.is_silent());
    }
}
