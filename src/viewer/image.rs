use std::path::Path;

use anyhow::Result;
use image::{Rgba, RgbaImage};

use crate::clipboard::{ClipboardBackend, Target};
use crate::error::ActionError;
use crate::viewer::zoom::{ScrollBar, ZoomState};

/// Radius in image pixels of the disc stamped by a pointer drag
pub const ANNOTATION_RADIUS: i64 = 5;
pub const ANNOTATION_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Extra pixels requested around the image for window chrome
pub const CHROME_WIDTH: u32 = 20;
pub const CHROME_HEIGHT: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Closed,
    OpenEmpty,
    OpenWithImage,
}

/// Image viewer with zoom, fit-to-window, and drag annotation
///
/// A viewer opened from a clipboard buffer stays bound to it: every
/// annotation writes the full image straight back, so the buffer always
/// matches what is on screen. Opening from a file clears the binding and
/// the viewer becomes a plain display. Zoom and scroll only change how
/// the image is projected, never its pixels.
pub struct ImageViewer {
    visible: bool,
    image: Option<RgbaImage>,
    binding: Option<Target>,
    zoom: ZoomState,
    fit_to_window: bool,
    pub h_scroll: ScrollBar,
    pub v_scroll: ScrollBar,
    requested_size: Option<(u32, u32)>,
    /// Bumped on every pixel change so the renderer can cache encodings
    revision: u64,
}

impl Default for ImageViewer {
    fn default() -> Self {
        ImageViewer {
            visible: false,
            image: None,
            binding: None,
            zoom: ZoomState::default(),
            fit_to_window: false,
            h_scroll: ScrollBar::default(),
            v_scroll: ScrollBar::default(),
            requested_size: None,
            revision: 0,
        }
    }
}

impl ImageViewer {
    pub fn new() -> Self {
        ImageViewer::default()
    }

    pub fn state(&self) -> ViewerState {
        if !self.visible {
            ViewerState::Closed
        } else if self.image.is_some() {
            ViewerState::OpenWithImage
        } else {
            ViewerState::OpenEmpty
        }
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|i| i.dimensions())
    }

    pub fn binding(&self) -> Option<Target> {
        self.binding
    }

    pub fn scale(&self) -> f64 {
        self.zoom.scale()
    }

    pub fn fit_to_window(&self) -> bool {
        self.fit_to_window
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Pixel size the viewer would like its window to have
    pub fn requested_size(&self) -> Option<(u32, u32)> {
        self.requested_size
    }

    /// Content extent at the current scale
    pub fn scaled_size(&self) -> Option<(i64, i64)> {
        let (w, h) = self.image.as_ref()?.dimensions();
        let scale = self.zoom.scale();
        Some((
            (w as f64 * scale).round() as i64,
            (h as f64 * scale).round() as i64,
        ))
    }

    /// Show an image taken from a clipboard buffer and bind to it
    pub fn open_from_clipboard(&mut self, target: Target, image: RgbaImage) {
        self.binding = Some(target);
        self.show_image(image);
        log::debug!("Image viewer opened from {}", target.label());
    }

    /// Show an image loaded from disk; the viewer is not bound to anything
    ///
    /// A file that fails to decode leaves the viewer exactly as it was.
    pub fn open_from_path(&mut self, path: &Path) -> Result<(), ActionError> {
        let image = image::open(path)
            .map_err(|_| ActionError::Decode {
                path: path.display().to_string(),
            })?
            .to_rgba8();
        self.binding = None;
        self.show_image(image);
        log::debug!("Image viewer opened from {}", path.display());
        Ok(())
    }

    /// Show the viewer pane without content
    pub fn open_empty(&mut self) {
        self.visible = true;
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.binding = None;
        self.image = None;
        self.requested_size = None;
    }

    fn show_image(&mut self, image: RgbaImage) {
        let (w, h) = image.dimensions();
        self.requested_size = Some((w + CHROME_WIDTH, h + CHROME_HEIGHT));
        self.image = Some(image);
        self.zoom.reset();
        self.h_scroll.value = 0;
        self.v_scroll.value = 0;
        self.h_scroll.set_range(w as i64, self.h_scroll.page_step);
        self.v_scroll.set_range(h as i64, self.v_scroll.page_step);
        self.revision += 1;
        self.visible = true;
    }

    /// Stamp a red disc at image coordinates and sync the bound buffer
    pub fn annotate(
        &mut self,
        x: u32,
        y: u32,
        backend: &dyn ClipboardBackend,
    ) -> Result<()> {
        let Some(image) = self.image.as_mut() else {
            return Ok(());
        };
        stamp_disc(image, x, y);
        self.revision += 1;
        if let Some(target) = self.binding {
            backend.write_image(target, image)?;
        }
        Ok(())
    }

    pub fn can_zoom_in(&self) -> bool {
        self.can_zoom() && self.zoom.can_zoom_in()
    }

    pub fn can_zoom_out(&self) -> bool {
        self.can_zoom() && self.zoom.can_zoom_out()
    }

    pub fn zoom_in(&mut self) {
        if !self.can_zoom_in() {
            return;
        }
        let factor = self.zoom.zoom_in();
        self.apply_zoom(factor);
    }

    pub fn zoom_out(&mut self) {
        if !self.can_zoom_out() {
            return;
        }
        let factor = self.zoom.zoom_out();
        self.apply_zoom(factor);
    }

    pub fn normal_size(&mut self) {
        if !self.can_zoom() {
            return;
        }
        self.zoom.reset();
        self.reset_ranges();
    }

    /// Toggle fit-to-window; leaving fit mode returns to normal size
    pub fn toggle_fit(&mut self) {
        if !self.visible || self.image.is_none() {
            return;
        }
        self.fit_to_window = !self.fit_to_window;
        if !self.fit_to_window {
            self.normal_size();
        }
    }

    /// Update scrollbar ranges for the viewport the shell is drawing into
    pub fn sync_viewport(&mut self, viewport_w: u32, viewport_h: u32) {
        if let Some((w, h)) = self.scaled_size() {
            self.h_scroll.set_range(w, viewport_w as i64);
            self.v_scroll.set_range(h, viewport_h as i64);
        }
    }

    pub fn scroll_view(&mut self, dx: i64, dy: i64) {
        if self.fit_to_window || self.image.is_none() {
            return;
        }
        self.h_scroll.scroll_by(dx);
        self.v_scroll.scroll_by(dy);
    }

    fn can_zoom(&self) -> bool {
        self.visible && self.image.is_some() && !self.fit_to_window
    }

    fn apply_zoom(&mut self, factor: f64) {
        self.reset_ranges();
        self.h_scroll.adjust(factor);
        self.v_scroll.adjust(factor);
    }

    fn reset_ranges(&mut self) {
        if let Some((w, h)) = self.scaled_size() {
            self.h_scroll.set_range(w, self.h_scroll.page_step);
            self.v_scroll.set_range(h, self.v_scroll.page_step);
        }
    }
}

/// Point-sampled filled disc, clipped to the image bounds
fn stamp_disc(image: &mut RgbaImage, cx: u32, cy: u32) {
    let (w, h) = image.dimensions();
    let (cx, cy) = (cx as i64, cy as i64);
    for dy in -ANNOTATION_RADIUS..=ANNOTATION_RADIUS {
        for dx in -ANNOTATION_RADIUS..=ANNOTATION_RADIUS {
            if dx * dx + dy * dy > ANNOTATION_RADIUS * ANNOTATION_RADIUS {
                continue;
            }
            let (px, py) = (cx + dx, cy + dy);
            if px < 0 || py < 0 || px >= w as i64 || py >= h as i64 {
                continue;
            }
            image.put_pixel(px as u32, py as u32, ANNOTATION_COLOR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::fake::FakeBackend;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn black_image(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, BLACK)
    }

    #[test]
    fn test_open_resets_zoom() {
        let mut viewer = ImageViewer::new();
        viewer.open_from_clipboard(Target::Clipboard, black_image(8, 8));
        viewer.zoom_in();
        viewer.zoom_in();
        assert!((viewer.scale() - 1.5625).abs() < 1e-9);

        viewer.open_from_clipboard(Target::Clipboard, black_image(8, 8));
        assert_eq!(viewer.scale(), 1.0);
        assert_eq!(viewer.state(), ViewerState::OpenWithImage);
        assert_eq!(viewer.binding(), Some(Target::Clipboard));
    }

    #[test]
    fn test_open_requests_image_plus_chrome() {
        let mut viewer = ImageViewer::new();
        viewer.open_from_clipboard(Target::Selection, black_image(100, 60));
        assert_eq!(viewer.requested_size(), Some((120, 90)));
    }

    #[test]
    fn test_open_from_path_clears_binding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        black_image(4, 4).save(&path).unwrap();

        let mut viewer = ImageViewer::new();
        viewer.open_from_clipboard(Target::Clipboard, black_image(8, 8));
        viewer.open_from_path(&path).unwrap();

        assert_eq!(viewer.binding(), None);
        assert_eq!(viewer.image_size(), Some((4, 4)));

        // Annotations on a file image never reach the clipboard
        let backend = FakeBackend::new();
        viewer.annotate(2, 2, &backend).unwrap();
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_decode_failure_leaves_viewer_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        let mut viewer = ImageViewer::new();
        viewer.open_from_clipboard(Target::Clipboard, black_image(8, 8));
        let revision = viewer.revision();

        let err = viewer.open_from_path(&path).unwrap_err();
        assert_eq!(err.to_string(), format!("Cannot load {}.", path.display()));
        assert_eq!(viewer.binding(), Some(Target::Clipboard));
        assert_eq!(viewer.image_size(), Some((8, 8)));
        assert_eq!(viewer.revision(), revision);
    }

    #[test]
    fn test_annotation_stamps_bounded_disc() {
        let mut viewer = ImageViewer::new();
        viewer.open_from_clipboard(Target::Clipboard, black_image(20, 20));
        let backend = FakeBackend::new();
        viewer.annotate(10, 10, &backend).unwrap();

        let image = viewer.image().unwrap();
        assert_eq!(*image.get_pixel(10, 10), ANNOTATION_COLOR);
        // dx = 5 sits exactly on the radius
        assert_eq!(*image.get_pixel(15, 10), ANNOTATION_COLOR);
        assert_eq!(*image.get_pixel(10, 15), ANNOTATION_COLOR);
        // dx = dy = 4 is outside the disc
        assert_eq!(*image.get_pixel(14, 14), BLACK);
    }

    #[test]
    fn test_annotation_clips_at_edges() {
        let mut viewer = ImageViewer::new();
        viewer.open_from_clipboard(Target::Clipboard, black_image(8, 8));
        let backend = FakeBackend::new();
        viewer.annotate(0, 0, &backend).unwrap();

        let image = viewer.image().unwrap();
        assert_eq!(*image.get_pixel(0, 0), ANNOTATION_COLOR);
        assert_eq!(*image.get_pixel(7, 7), BLACK);
    }

    #[test]
    fn test_annotation_writes_back_when_bound() {
        let mut viewer = ImageViewer::new();
        viewer.open_from_clipboard(Target::Clipboard, black_image(16, 16));
        let backend = FakeBackend::new();
        viewer.annotate(8, 8, &backend).unwrap();

        assert_eq!(backend.write_count(), 1);
        let written = backend.image_of(Target::Clipboard).unwrap();
        assert_eq!(*written.get_pixel(8, 8), ANNOTATION_COLOR);
    }

    #[test]
    fn test_zoom_recenters_scrollbars() {
        let mut viewer = ImageViewer::new();
        viewer.open_from_clipboard(Target::Clipboard, black_image(400, 400));
        viewer.sync_viewport(100, 80);

        viewer.zoom_in();
        // round(1.25 * 0 + 0.25 * page / 2) per axis
        assert_eq!(viewer.h_scroll.value, 13);
        assert_eq!(viewer.v_scroll.value, 10);
        assert_eq!(viewer.h_scroll.maximum, 400);
    }

    #[test]
    fn test_fit_mode_gates_zoom() {
        let mut viewer = ImageViewer::new();
        viewer.open_from_clipboard(Target::Clipboard, black_image(8, 8));
        viewer.zoom_in();
        viewer.toggle_fit();

        assert!(viewer.fit_to_window());
        assert!(!viewer.can_zoom_in());
        viewer.zoom_in();
        assert!((viewer.scale() - 1.25).abs() < 1e-9);

        viewer.toggle_fit();
        assert!(!viewer.fit_to_window());
        assert_eq!(viewer.scale(), 1.0);
    }

    #[test]
    fn test_revision_tracks_pixel_changes_only() {
        let mut viewer = ImageViewer::new();
        viewer.open_from_clipboard(Target::Clipboard, black_image(8, 8));
        let after_open = viewer.revision();

        viewer.zoom_in();
        viewer.scroll_view(3, 3);
        assert_eq!(viewer.revision(), after_open);

        let backend = FakeBackend::new();
        viewer.annotate(4, 4, &backend).unwrap();
        assert_eq!(viewer.revision(), after_open + 1);
    }

    #[test]
    fn test_open_empty_then_close() {
        let mut viewer = ImageViewer::new();
        viewer.open_empty();
        assert_eq!(viewer.state(), ViewerState::OpenEmpty);

        viewer.close();
        assert_eq!(viewer.state(), ViewerState::Closed);
        assert_eq!(viewer.binding(), None);
    }
}
