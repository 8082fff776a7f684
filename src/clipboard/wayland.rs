use anyhow::{Context, Result, anyhow};
use image::RgbaImage;
use std::process::{Command, Stdio};

use super::backend::ClipboardBackend;
use super::content::{ClipContent, Target, encode_png};

/// Wayland clipboard backend using wl-clipboard tools
/// Requires wl-copy and wl-paste to be installed
pub struct WaylandBackend;

impl WaylandBackend {
    /// Create a new Wayland clipboard backend
    pub fn new() -> Result<Self> {
        // Verify wl-copy is available (wl-paste ships in the same package)
        Command::new("wl-copy")
            .arg("--version")
            .output()
            .context("wl-copy not found. Install wl-clipboard package")?;

        log::debug!("WaylandBackend initialized successfully");
        Ok(WaylandBackend)
    }
}

/// Run wl-paste for one representation of a buffer
/// wl-paste exits nonzero when the buffer is empty or lacks the requested
/// type; that is absent content, not a failure
fn paste(target: Target, args: &[&str]) -> Result<Option<Vec<u8>>> {
    let mut cmd = Command::new("wl-paste");
    if let Some(flag) = target.primary_flag() {
        cmd.arg(flag);
    }
    let output = cmd
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .context("Failed to run wl-paste. Install wl-clipboard package")?;

    if !output.status.success() || output.stdout.is_empty() {
        return Ok(None);
    }
    Ok(Some(output.stdout))
}

impl ClipboardBackend for WaylandBackend {
    fn read(&self, target: Target) -> Result<ClipContent> {
        let text = match paste(target, &["--no-newline", "--type", "text"])? {
            Some(bytes) => match String::from_utf8(bytes) {
                Ok(text) => Some(text),
                Err(_) => {
                    log::debug!("Discarding non-UTF-8 text from {}", target.label());
                    None
                }
            },
            None => None,
        };

        let image = match paste(target, &["--type", "image/png"])? {
            Some(bytes) => match image::load_from_memory(&bytes) {
                Ok(image) => Some(image.to_rgba8()),
                Err(e) => {
                    log::debug!("Discarding undecodable image from {}: {}", target.label(), e);
                    None
                }
            },
            None => None,
        };

        log::debug!(
            "Read {}: text={} image={}",
            target.label(),
            text.is_some(),
            image.is_some()
        );
        Ok(ClipContent { text, image })
    }

    fn write_text(&self, target: Target, text: &str) -> Result<()> {
        let mut cmd = Command::new("wl-copy");
        if let Some(flag) = target.primary_flag() {
            cmd.arg(flag);
        }
        let mut child = cmd
            .arg("--type")
            .arg("text/plain")
            .arg("--")
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("Failed to spawn wl-copy")?;

        let status = child.wait().context("Failed to wait for wl-copy")?;

        if !status.success() {
            return Err(anyhow!("wl-copy failed with status: {}", status));
        }

        log::debug!("Wrote {} bytes text to {}", text.len(), target.label());
        Ok(())
    }

    fn write_image(&self, target: Target, image: &RgbaImage) -> Result<()> {
        let data = encode_png(image)?;

        let mut cmd = Command::new("wl-copy");
        if let Some(flag) = target.primary_flag() {
            cmd.arg(flag);
        }
        let mut child = cmd
            .arg("--type")
            .arg("image/png")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("Failed to spawn wl-copy for image")?;

        use std::io::Write;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&data)
                .context("Failed to write image to wl-copy stdin")?;
        }

        let status = child.wait().context("Failed to wait for wl-copy")?;

        if !status.success() {
            return Err(anyhow!("wl-copy failed with status: {}", status));
        }

        log::debug!("Wrote {} bytes image to {}", data.len(), target.label());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Wayland"
    }
}
