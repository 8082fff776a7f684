use anyhow::{Context, Result};
use image::RgbaImage;
use std::io::Cursor;

/// Which OS clipboard buffer an operation addresses
/// Wayland exposes two: the regular clipboard and the primary selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The regular clipboard (explicit copy)
    Clipboard,
    /// The primary selection (highlighted text, middle-click paste)
    Selection,
}

impl Target {
    /// Both buffers, in menu display order
    pub const ALL: [Target; 2] = [Target::Clipboard, Target::Selection];

    /// Buffer name used in menu labels and viewer titles
    pub fn label(&self) -> &'static str {
        match self {
            Target::Clipboard => "clipboard",
            Target::Selection => "selection",
        }
    }

    /// Extra flag wl-clipboard tools need to address this buffer
    pub fn primary_flag(&self) -> Option<&'static str> {
        match self {
            Target::Clipboard => None,
            Target::Selection => Some("--primary"),
        }
    }
}

/// Classification of buffer content for the menu labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentKind {
    /// Empty buffer, or content that is neither text nor image
    #[default]
    Unknown,
    Text,
    Image,
}

impl ContentKind {
    /// Label vocabulary shown next to the buffer name
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Unknown => "unknown",
            ContentKind::Text => "text",
            ContentKind::Image => "image",
        }
    }
}

/// Snapshot of one clipboard buffer
/// The two representations are not mutually exclusive: some sources offer
/// both text and an image for the same content
#[derive(Debug, Clone, Default)]
pub struct ClipContent {
    pub text: Option<String>,
    pub image: Option<RgbaImage>,
}

impl ClipContent {
    pub fn from_text(text: impl Into<String>) -> Self {
        ClipContent {
            text: Some(text.into()),
            image: None,
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        ClipContent {
            text: None,
            image: Some(image),
        }
    }

    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_text() && !self.has_image()
    }

    /// Classify for the menu labels
    /// Checked in order: text first, then image, so content carrying both
    /// representations reports Image
    pub fn kind(&self) -> ContentKind {
        let mut kind = ContentKind::Unknown;
        if self.has_text() {
            kind = ContentKind::Text;
        }
        if self.has_image() {
            kind = ContentKind::Image;
        }
        kind
    }
}

/// Encode an image as PNG bytes for transport to external tools
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .context("Failed to encode image as PNG")?;
    Ok(png)
}
