use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::Palette;
use crate::app::AppMode;

const MENU_HINTS: &[(&[&str], &str)] = &[
    (&["j", "k"], "move"),
    (&["Enter"], "select"),
    (&["s"], "screenshot"),
    (&["o"], "open image"),
    (&["q"], "quit"),
];

const TEXT_HINTS: &[(&[&str], &str)] = &[
    (&["Esc"], "close"),
    (&["Tab"], "switch pane"),
    (&["↑", "↓", "←", "→"], "move"),
];

const IMAGE_HINTS: &[(&[&str], &str)] = &[
    (&["+", "-"], "zoom"),
    (&["0"], "normal size"),
    (&["f"], "fit"),
    (&["drag"], "annotate"),
    (&["o"], "open file"),
    (&["p"], "print"),
    (&["Esc"], "close"),
];

const PATH_HINTS: &[(&[&str], &str)] = &[
    (&["Enter"], "open"),
    (&["Esc"], "cancel"),
];

const PRINT_HINTS: &[(&[&str], &str)] = &[
    (&["j", "k"], "move"),
    (&["Enter"], "print"),
    (&["Esc"], "cancel"),
];

/// Render keyboard hints bar showing mode-specific shortcuts
pub fn render_keyboard_hints(frame: &mut Frame, area: Rect, mode: AppMode, palette: &Palette) {
    let hint_data = match mode {
        AppMode::Menu => MENU_HINTS,
        AppMode::TextView => TEXT_HINTS,
        AppMode::ImageView => IMAGE_HINTS,
        AppMode::PathPrompt => PATH_HINTS,
        AppMode::PrintPicker => PRINT_HINTS,
    };

    let mut hints = Vec::new();

    for (keys, description) in hint_data {
        // Add keys with styled separators
        for (i, key) in keys.iter().enumerate() {
            if i > 0 {
                hints.push(Span::styled(
                    "/",
                    palette.status_desc.add_modifier(Modifier::DIM),
                ));
            }
            hints.push(Span::styled(*key, palette.status_key));
        }

        hints.push(Span::raw(" "));
        hints.push(Span::styled(*description, palette.status_desc));
        hints.push(Span::raw("  "));
    }

    let paragraph =
        Paragraph::new(Line::from(hints)).style(palette.status_desc.bg(palette.status_bar_bg));

    frame.render_widget(paragraph, area);
}
