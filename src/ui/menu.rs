use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use super::Palette;
use crate::clipboard::Target;
use crate::tray::TrayMenu;

/// Render the tray menu: the two actions, a separator, and the live
/// content label of each clipboard buffer
pub fn render_menu(
    frame: &mut Frame,
    area: Rect,
    menu: &TrayMenu,
    pulse: bool,
    palette: &Palette,
) {
    let separator_width = area.width.saturating_sub(4).max(1) as usize;

    let rows: Vec<ListItem> = vec![
        ListItem::new("take screenshot").style(palette.menu_item),
        ListItem::new("quit").style(palette.menu_item),
        ListItem::new("─".repeat(separator_width)).style(palette.menu_separator),
        ListItem::new(menu.label(Target::Clipboard)).style(palette.menu_item),
        ListItem::new(menu.label(Target::Selection)).style(palette.menu_item),
    ];

    let title = if pulse {
        Line::from(vec![
            Span::styled(" clipsight ", palette.title),
            Span::styled("● ", palette.pulse),
        ])
    } else {
        Line::from(Span::styled(" clipsight ", palette.title))
    };

    let list = List::new(rows)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_symbol("► ")
        .highlight_style(palette.menu_item_selected);

    let mut state = ListState::default();
    state.select(Some(display_row(menu.selected_index())));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Map a selectable entry index to its display row, skipping the separator
fn display_row(index: usize) -> usize {
    if index < 2 { index } else { index + 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_row_skips_separator() {
        assert_eq!(display_row(0), 0);
        assert_eq!(display_row(1), 1);
        assert_eq!(display_row(2), 3);
        assert_eq!(display_row(3), 4);
    }
}
