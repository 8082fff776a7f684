use ratatui::prelude::*;

/// Fixed color palette for all UI elements
#[derive(Debug, Clone)]
pub struct Palette {
    // === Defaults ===
    pub default_fg: Color,
    pub default_bg: Color,

    // === Menu ===
    pub title: Style,
    pub menu_item: Style,
    pub menu_item_selected: Style,
    pub menu_separator: Style,
    pub pulse: Style,
    pub disabled: Style,

    // === Viewers ===
    pub editor_text: Style,
    pub scrollbar: Style,

    // === Status Bar ===
    pub status_key: Style,
    pub status_desc: Style,
    pub status_bar_bg: Color,

    // === Modals ===
    pub modal_bg: Color,
    pub error_title: Style,
    pub error_text: Style,
    pub error_border: Style,
    pub prompt_text: Style,
    pub prompt_border: Style,
}

impl Default for Palette {
    fn default() -> Self {
        let fg = Color::Rgb(205, 214, 244);
        let bg = Color::Rgb(30, 30, 46);

        Palette {
            default_fg: fg,
            default_bg: bg,

            title: Style::default()
                .fg(Color::Rgb(137, 180, 250))
                .add_modifier(Modifier::BOLD),
            menu_item: Style::default().fg(fg),
            menu_item_selected: Style::default()
                .fg(Color::Rgb(137, 180, 250))
                .add_modifier(Modifier::BOLD),
            menu_separator: Style::default().fg(Color::Rgb(108, 112, 134)),
            pulse: Style::default()
                .fg(Color::Rgb(249, 226, 175))
                .add_modifier(Modifier::BOLD),
            disabled: Style::default()
                .fg(Color::Rgb(108, 112, 134))
                .add_modifier(Modifier::DIM),

            editor_text: Style::default().fg(fg),
            scrollbar: Style::default().fg(Color::Rgb(108, 112, 134)),

            status_key: Style::default().add_modifier(Modifier::BOLD),
            status_desc: Style::default().fg(Color::Rgb(166, 173, 200)),
            status_bar_bg: Color::Rgb(24, 24, 37),

            modal_bg: Color::Rgb(24, 24, 37),
            error_title: Style::default()
                .fg(Color::Rgb(243, 139, 168))
                .add_modifier(Modifier::BOLD),
            error_text: Style::default().fg(fg),
            error_border: Style::default().fg(Color::Rgb(243, 139, 168)),
            prompt_text: Style::default().fg(Color::Rgb(249, 226, 175)),
            prompt_border: Style::default().fg(fg),
        }
    }
}
