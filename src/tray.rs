use std::time::{Duration, Instant};

use crate::clipboard::{ContentKind, Target};

/// Entries of the tray menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    TakeScreenshot,
    Quit,
    InspectClipboard,
    InspectSelection,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [
        MenuItem::TakeScreenshot,
        MenuItem::Quit,
        MenuItem::InspectClipboard,
        MenuItem::InspectSelection,
    ];
}

/// Tray menu state: one live content label per buffer plus a short
/// pulse after every observed clipboard change
///
/// The labels double as the inspect entries, so selecting
/// "clipboard: image" opens the viewer on whatever the label described.
pub struct TrayMenu {
    clipboard_kind: ContentKind,
    selection_kind: ContentKind,
    selected: usize,
    pulse_until: Option<Instant>,
    pulse_duration: Duration,
}

impl TrayMenu {
    pub fn new(pulse_duration: Duration) -> Self {
        TrayMenu {
            clipboard_kind: ContentKind::default(),
            selection_kind: ContentKind::default(),
            selected: 0,
            pulse_until: None,
            pulse_duration,
        }
    }

    pub fn kind(&self, target: Target) -> ContentKind {
        match target {
            Target::Clipboard => self.clipboard_kind,
            Target::Selection => self.selection_kind,
        }
    }

    pub fn set_kind(&mut self, target: Target, kind: ContentKind) {
        match target {
            Target::Clipboard => self.clipboard_kind = kind,
            Target::Selection => self.selection_kind = kind,
        }
    }

    /// Menu label for an inspect entry, e.g. "clipboard: image"
    pub fn label(&self, target: Target) -> String {
        format!("{}: {}", target.label(), self.kind(target).label())
    }

    /// Flash the tray icon; restarts the window on every change
    pub fn pulse(&mut self) {
        self.pulse_until = Some(Instant::now() + self.pulse_duration);
    }

    pub fn pulse_active(&self, now: Instant) -> bool {
        self.pulse_until.is_some_and(|until| now < until)
    }

    pub fn selected(&self) -> MenuItem {
        MenuItem::ALL[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % MenuItem::ALL.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + MenuItem::ALL.len() - 1) % MenuItem::ALL.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_follow_kind_updates() {
        let mut menu = TrayMenu::new(Duration::from_millis(600));
        assert_eq!(menu.label(Target::Clipboard), "clipboard: unknown");
        assert_eq!(menu.label(Target::Selection), "selection: unknown");

        menu.set_kind(Target::Clipboard, ContentKind::Image);
        menu.set_kind(Target::Selection, ContentKind::Text);
        assert_eq!(menu.label(Target::Clipboard), "clipboard: image");
        assert_eq!(menu.label(Target::Selection), "selection: text");
    }

    #[test]
    fn test_pulse_window() {
        let mut menu = TrayMenu::new(Duration::from_millis(600));
        let now = Instant::now();
        assert!(!menu.pulse_active(now));

        menu.pulse();
        assert!(menu.pulse_active(Instant::now()));
        assert!(!menu.pulse_active(now + Duration::from_secs(5)));
    }

    #[test]
    fn test_selection_wraps() {
        let mut menu = TrayMenu::new(Duration::from_millis(600));
        assert_eq!(menu.selected(), MenuItem::TakeScreenshot);

        menu.select_prev();
        assert_eq!(menu.selected(), MenuItem::InspectSelection);
        menu.select_next();
        assert_eq!(menu.selected(), MenuItem::TakeScreenshot);
    }
}
