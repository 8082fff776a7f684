use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use tui_input::Input;

use super::Palette;
use super::layout::centered_rect;
use crate::print::PrintTarget;

/// Render error modal with dismissal instructions
pub fn render_error_modal(frame: &mut Frame, area: Rect, error_msg: &str, palette: &Palette) {
    let overlay_area = centered_rect(70, 30, area);

    // Clear the background area first to hide underlying content
    frame.render_widget(Clear, overlay_area);

    let error_text = format!("{}\n\nPress any key to dismiss...", error_msg);

    let paragraph = Paragraph::new(error_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.error_border)
                .title(Span::styled(" error ", palette.error_title))
                .style(Style::default().bg(palette.modal_bg))
                .padding(ratatui::widgets::Padding::uniform(2)),
        )
        .style(palette.error_text)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, overlay_area);
}

/// Render the path prompt for opening an image file from disk
pub fn render_path_prompt(frame: &mut Frame, area: Rect, input: &Input, palette: &Palette) {
    let overlay_area = centered_rect(60, 20, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.prompt_border)
        .title(Span::styled(" open image ", palette.title))
        .style(Style::default().bg(palette.modal_bg))
        .padding(ratatui::widgets::Padding::horizontal(1));
    let inner = block.inner(overlay_area);

    let paragraph = Paragraph::new(input.value())
        .style(palette.prompt_text)
        .block(block);
    frame.render_widget(paragraph, overlay_area);

    if inner.width > 0 && inner.height > 0 {
        let cursor_x = (inner.x + input.visual_cursor() as u16).min(inner.right() - 1);
        frame.set_cursor_position((cursor_x, inner.y));
    }
}

/// Render print destination picker
pub fn render_print_picker(
    frame: &mut Frame,
    area: Rect,
    targets: &[PrintTarget],
    selected: usize,
    palette: &Palette,
) {
    let overlay_area = centered_rect(50, 40, area);
    frame.render_widget(Clear, overlay_area);

    let items: Vec<ListItem> = targets
        .iter()
        .map(|target| ListItem::new(target.name.clone()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" print to ", palette.title))
                .style(Style::default().bg(palette.modal_bg)),
        )
        .highlight_symbol("► ")
        .highlight_style(palette.menu_item_selected)
        .style(Style::default().fg(palette.default_fg));

    let mut list_state = ListState::default();
    list_state.select(Some(selected));

    frame.render_stateful_widget(list, overlay_area, &mut list_state);
}
