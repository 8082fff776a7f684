use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use super::Palette;
use crate::viewer::TextViewer;

/// Render the text viewer with its cursor, scrolled so the cursor stays
/// visible
pub fn render_text_editor(
    frame: &mut Frame,
    area: Rect,
    viewer: &TextViewer,
    focused: bool,
    palette: &Palette,
) {
    let binding = viewer.binding().map(|t| t.label()).unwrap_or("unbound");
    let border_style = if focused {
        Style::default().fg(palette.default_fg)
    } else {
        palette.disabled
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            format!(" text viewer [{binding}] "),
            palette.title,
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let (row, col) = viewer.cursor();
    let prefix: String = viewer.lines()[row].chars().take(col).collect();
    let cursor_w = prefix.as_str().width() as u16;

    let scroll_y = (row as u16 + 1).saturating_sub(inner.height);
    let scroll_x = (cursor_w + 1).saturating_sub(inner.width);

    let paragraph = Paragraph::new(viewer.lines().join("\n"))
        .style(palette.editor_text)
        .scroll((scroll_y, scroll_x));
    frame.render_widget(paragraph, inner);

    if focused {
        frame.set_cursor_position((
            inner.x + cursor_w - scroll_x,
            inner.y + row as u16 - scroll_y,
        ));
    }
}
