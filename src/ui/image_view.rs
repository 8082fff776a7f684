use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use ratatui::prelude::*;
use ratatui::widgets::{
    Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui_image::StatefulImage;
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;

use super::Palette;
use crate::print::fit_size;
use crate::viewer::{ImageViewer, ViewerState};

/// Terminal-side image state: the protocol picker plus the encoded
/// protocol for the currently displayed view of the image
pub struct ImagePane {
    picker: Picker,
    protocol: Option<StatefulProtocol>,
    cache_key: Option<CacheKey>,
}

/// Everything the displayed view depends on; re-encode when any part changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    revision: u64,
    scale_milli: u64,
    h_value: i64,
    v_value: i64,
    fit: bool,
    area: Rect,
}

impl ImagePane {
    /// Auto-detect terminal capabilities (Kitty, Sixel, iTerm2, or
    /// halfblocks fallback); must run before the terminal enters raw mode
    pub fn detect() -> Self {
        let picker = Picker::from_query_stdio().unwrap_or_else(|_| Picker::from_fontsize((8, 12)));
        ImagePane {
            picker,
            protocol: None,
            cache_key: None,
        }
    }

    /// Fixed font size, no terminal query
    pub fn with_font_size(width: u16, height: u16) -> Self {
        ImagePane {
            picker: Picker::from_fontsize((width, height)),
            protocol: None,
            cache_key: None,
        }
    }

    pub fn font_size(&self) -> (u16, u16) {
        self.picker.font_size()
    }
}

/// Render the image viewer pane and return the cell area the image
/// occupies, which mouse events are mapped against
pub fn render_image_view(
    frame: &mut Frame,
    area: Rect,
    viewer: &mut ImageViewer,
    pane: &mut ImagePane,
    focused: bool,
    palette: &Palette,
) -> Rect {
    let suffix = match (viewer.binding(), viewer.state()) {
        (Some(target), _) => format!(" [{}]", target.label()),
        (None, ViewerState::OpenWithImage) => " [file]".to_string(),
        _ => String::new(),
    };
    let border_style = if focused {
        Style::default().fg(palette.default_fg)
    } else {
        palette.disabled
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            format!(" image viewer{suffix} "),
            palette.title,
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if viewer.state() != ViewerState::OpenWithImage {
        let placeholder = Paragraph::new("no image")
            .style(palette.disabled)
            .alignment(Alignment::Center);
        frame.render_widget(placeholder, inner);
        return inner;
    }

    // Manual mode keeps one column and one row for the scrollbars
    let image_area = if viewer.fit_to_window() {
        inner
    } else {
        Rect {
            width: inner.width.saturating_sub(1),
            height: inner.height.saturating_sub(1),
            ..inner
        }
    };
    if image_area.width == 0 || image_area.height == 0 {
        return image_area;
    }

    let font = pane.picker.font_size();
    let viewport_px = (
        image_area.width as u32 * font.0 as u32,
        image_area.height as u32 * font.1 as u32,
    );
    viewer.sync_viewport(viewport_px.0, viewport_px.1);

    let key = CacheKey {
        revision: viewer.revision(),
        scale_milli: (viewer.scale() * 1000.0).round() as u64,
        h_value: viewer.h_scroll.value,
        v_value: viewer.v_scroll.value,
        fit: viewer.fit_to_window(),
        area: image_area,
    };
    if pane.cache_key != Some(key) || pane.protocol.is_none() {
        if let Some(image) = viewer.image() {
            let region = visible_region(
                image,
                viewer.scale(),
                viewer.h_scroll.value,
                viewer.v_scroll.value,
                viewport_px,
                viewer.fit_to_window(),
            );
            pane.protocol = Some(
                pane.picker
                    .new_resize_protocol(DynamicImage::ImageRgba8(region)),
            );
            pane.cache_key = Some(key);
        }
    }
    if let Some(protocol) = pane.protocol.as_mut() {
        frame.render_stateful_widget(StatefulImage::default(), image_area, protocol);
    }

    if !viewer.fit_to_window() {
        render_scrollbars(frame, inner, image_area, viewer, palette);
    }

    image_area
}

fn render_scrollbars(
    frame: &mut Frame,
    inner: Rect,
    image_area: Rect,
    viewer: &ImageViewer,
    palette: &Palette,
) {
    let v_rect = Rect::new(image_area.right(), image_area.y, 1, image_area.height);
    let h_rect = Rect::new(image_area.x, image_area.bottom(), image_area.width, 1);
    if v_rect.right() > inner.right() || h_rect.bottom() > inner.bottom() {
        return;
    }

    let mut v_state = ScrollbarState::new(viewer.v_scroll.maximum as usize + 1)
        .position(viewer.v_scroll.value as usize)
        .viewport_content_length(viewer.v_scroll.page_step.max(0) as usize);
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight).style(palette.scrollbar),
        v_rect,
        &mut v_state,
    );

    let mut h_state = ScrollbarState::new(viewer.h_scroll.maximum as usize + 1)
        .position(viewer.h_scroll.value as usize)
        .viewport_content_length(viewer.h_scroll.page_step.max(0) as usize);
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::HorizontalBottom).style(palette.scrollbar),
        h_rect,
        &mut h_state,
    );
}

/// The part of the image that is on screen, already sized in pixels for
/// the viewport so the terminal protocol renders it one to one
fn visible_region(
    image: &RgbaImage,
    scale: f64,
    h_value: i64,
    v_value: i64,
    viewport_px: (u32, u32),
    fit: bool,
) -> RgbaImage {
    let (iw, ih) = image.dimensions();
    if iw == 0 || ih == 0 {
        return image.clone();
    }

    if fit {
        let (tw, th) = fit_size((iw, ih), viewport_px);
        if tw == 0 || th == 0 {
            return image.clone();
        }
        return imageops::resize(image, tw, th, FilterType::Triangle);
    }

    let x0 = ((h_value as f64 / scale).floor() as u32).min(iw - 1);
    let y0 = ((v_value as f64 / scale).floor() as u32).min(ih - 1);
    let w = ((viewport_px.0 as f64 / scale).ceil() as u32)
        .max(1)
        .min(iw - x0);
    let h = ((viewport_px.1 as f64 / scale).ceil() as u32)
        .max(1)
        .min(ih - y0);
    let crop = imageops::crop_imm(image, x0, y0, w, h).to_image();
    if (scale - 1.0).abs() < f64::EPSILON {
        return crop;
    }

    let dst_w = ((w as f64 * scale).round() as u32).clamp(1, viewport_px.0.max(1));
    let dst_h = ((h as f64 * scale).round() as u32).clamp(1, viewport_px.1.max(1));
    imageops::resize(&crop, dst_w, dst_h, FilterType::Nearest)
}

/// Map a terminal cell to the image pixel under the cell's center
///
/// Cells quantize the projection to the font size; the exact zoom and
/// scroll arithmetic lives in the viewer state, this only inverts it.
pub fn cell_to_image_px(
    cell: (u16, u16),
    view_area: Rect,
    font_size: (u16, u16),
    image_size: (u32, u32),
    scale: f64,
    scroll: (i64, i64),
    fit: bool,
) -> Option<(u32, u32)> {
    let (col, row) = cell;
    if col < view_area.x
        || row < view_area.y
        || col >= view_area.right()
        || row >= view_area.bottom()
    {
        return None;
    }
    let (iw, ih) = image_size;
    if iw == 0 || ih == 0 {
        return None;
    }

    let (fw, fh) = (font_size.0 as f64, font_size.1 as f64);
    let px = (col - view_area.x) as f64 * fw + fw / 2.0;
    let py = (row - view_area.y) as f64 * fh + fh / 2.0;

    let (ix, iy) = if fit {
        let viewport = (
            view_area.width as u32 * font_size.0 as u32,
            view_area.height as u32 * font_size.1 as u32,
        );
        let (dw, dh) = fit_size(image_size, viewport);
        if dw == 0 || dh == 0 || px >= dw as f64 || py >= dh as f64 {
            return None;
        }
        (px * iw as f64 / dw as f64, py * ih as f64 / dh as f64)
    } else {
        (
            (px + scroll.0 as f64) / scale,
            (py + scroll.1 as f64) / scale,
        )
    };

    let (ix, iy) = (ix.floor(), iy.floor());
    if ix >= iw as f64 || iy >= ih as f64 {
        return None;
    }
    Some((ix as u32, iy as u32))
}
