use ratatui::Frame;
use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use std::path::Path;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::capture::ScreenCapture;
use crate::clipboard::{ClipboardBackend, ContentKind, Target};
use crate::config::Config;
use crate::error::ActionError;
use crate::event::{AppEvent, ViewerAction};
use crate::print::{self, PrintTarget};
use crate::tray::{MenuItem, TrayMenu};
use crate::ui::{self, ImagePane, Palette};
use crate::viewer::{ImageViewer, TextViewer};

/// Application mode determines which keybindings are active and which
/// pane has keyboard focus
///
/// Viewers stay open across mode changes; the mode only says where input
/// goes. PathPrompt and PrintPicker are modal: they suspend the pane that
/// opened them until answered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Tray menu pane (the default surface)
    #[default]
    Menu,
    /// Text viewer focused, keys edit the buffer
    TextView,
    /// Image viewer focused, keys drive zoom/fit/annotate/print
    ImageView,
    /// Modal file-path prompt for opening an image from disk
    PathPrompt,
    /// Modal print destination picker
    PrintPicker,
}

/// Main application state
pub struct App {
    /// Current interaction mode
    pub mode: AppMode,

    /// Tray menu with the live per-buffer content labels
    pub menu: TrayMenu,

    /// Text viewer pane
    pub text_viewer: TextViewer,

    /// Image viewer pane
    pub image_viewer: ImageViewer,

    /// Clipboard backend shared by the monitor and both viewers
    backend: Box<dyn ClipboardBackend>,

    /// External region-capture tool
    capture: ScreenCapture,

    /// Application configuration
    pub config: Config,

    /// Channel delivering buffer-change notifications from the watchers
    events_rx: Receiver<AppEvent>,

    /// Terminal-side image render state (protocol picker + scaled cache)
    image_pane: ImagePane,

    /// Cell area the image occupied last frame; mouse drags are mapped
    /// against this
    image_view_area: Rect,

    /// Reported action error (shown in a modal, dismissed by any key)
    pub error: Option<String>,

    /// File-path prompt input
    pub path_input: Input,

    /// Mode to return to when a modal is cancelled
    prompt_return: AppMode,

    /// Print destinations offered by the picker
    pub print_targets: Vec<PrintTarget>,

    /// Currently selected print destination
    pub print_selected: usize,

    /// Fixed UI palette
    palette: Palette,

    /// Flag to request application exit
    pub should_quit: bool,
}

impl App {
    /// Create the application state and take the initial label snapshot
    pub fn new(
        config: Config,
        backend: Box<dyn ClipboardBackend>,
        events_rx: Receiver<AppEvent>,
        image_pane: ImagePane,
    ) -> Self {
        log::info!("Using {} clipboard backend", backend.name());

        let capture = ScreenCapture::new(config.capture.command.clone());
        let menu = TrayMenu::new(Duration::from_millis(config.general.pulse_duration_ms));

        let mut app = App {
            mode: AppMode::default(),
            menu,
            text_viewer: TextViewer::new(),
            image_viewer: ImageViewer::new(),
            backend,
            capture,
            config,
            events_rx,
            image_pane,
            image_view_area: Rect::default(),
            error: None,
            path_input: Input::default(),
            prompt_return: AppMode::default(),
            print_targets: Vec::new(),
            print_selected: 0,
            palette: Palette::default(),
            should_quit: false,
        };

        // Label both buffers before the first change notification arrives
        app.refresh_labels();
        app
    }

    /// Classify both buffers and set their menu labels, without a pulse
    pub fn refresh_labels(&mut self) {
        for target in Target::ALL {
            let kind = self.classify(target);
            self.menu.set_kind(target, kind);
        }
    }

    /// Apply all pending watcher notifications (non-blocking)
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.dispatch(event);
        }
    }

    /// Dispatch one application event
    ///
    /// The single funnel for every state change: the key and mouse
    /// handlers translate input into events, the watchers send theirs
    /// over the channel, and everything runs to completion here in
    /// arrival order on the loop thread.
    pub fn dispatch(&mut self, event: AppEvent) {
        match event {
            AppEvent::ClipboardChanged(target) => self.on_clipboard_changed(target),
            AppEvent::MenuItemSelected(item) => self.on_menu_item(item),
            AppEvent::PointerDragged { x, y } => {
                let result = self.image_viewer.annotate(x, y, self.backend.as_ref());
                self.report(result);
            }
            AppEvent::ActionTriggered(action) => self.on_viewer_action(action),
        }
    }

    /// Re-read the changed buffer, re-label its menu entry and pulse the
    /// tray marker. Never an error; unreadable content labels as unknown.
    fn on_clipboard_changed(&mut self, target: Target) {
        let kind = self.classify(target);
        log::debug!("{} changed, now {}", target.label(), kind.label());
        self.menu.set_kind(target, kind);
        self.menu.pulse();
    }

    fn classify(&self, target: Target) -> ContentKind {
        match self.backend.read(target) {
            Ok(content) => content.kind(),
            Err(e) => {
                log::debug!("Failed to read {}: {}", target.label(), e);
                ContentKind::Unknown
            }
        }
    }

    fn on_menu_item(&mut self, item: MenuItem) {
        match item {
            MenuItem::TakeScreenshot => {
                log::info!("Taking screenshot");
                let result = self.capture.take(self.backend.as_ref());
                self.report(result);
            }
            MenuItem::Quit => self.quit(),
            MenuItem::InspectClipboard => {
                let result = self.inspect(Target::Clipboard);
                self.report(result);
            }
            MenuItem::InspectSelection => {
                let result = self.inspect(Target::Selection);
                self.report(result);
            }
        }
    }

    /// Open the viewer(s) matching the buffer's current content
    ///
    /// The text and image checks are independent: content carrying both
    /// representations opens both viewers, and focus lands on the image
    /// viewer because its check runs second.
    fn inspect(&mut self, target: Target) -> Result<(), ActionError> {
        let content = self.backend.read(target)?;
        if content.is_empty() {
            return Err(ActionError::Unclassified);
        }
        if let Some(text) = content.text {
            self.text_viewer.open(target, text);
            self.mode = AppMode::TextView;
        }
        if let Some(image) = content.image {
            self.image_viewer.open_from_clipboard(target, image);
            self.mode = AppMode::ImageView;
        }
        Ok(())
    }

    fn on_viewer_action(&mut self, action: ViewerAction) {
        match action {
            ViewerAction::ZoomIn => self.image_viewer.zoom_in(),
            ViewerAction::ZoomOut => self.image_viewer.zoom_out(),
            ViewerAction::NormalSize => self.image_viewer.normal_size(),
            ViewerAction::ToggleFitToWindow => self.image_viewer.toggle_fit(),
            ViewerAction::OpenFile => self.open_path_prompt(),
            ViewerAction::Print => {
                let result = self.begin_print();
                self.report(result);
            }
        }
    }

    /// Route an action result: silent failures only log, the rest open
    /// the error modal. No failure is fatal; each action aborts leaving
    /// whatever it had not yet touched unchanged.
    fn report<E: Into<ActionError>>(&mut self, result: Result<(), E>) {
        if let Err(e) = result {
            let e = e.into();
            if e.is_silent() {
                log::debug!("Action aborted: {}", e);
            } else {
                log::warn!("{}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    /// Request application exit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Open the file-path prompt; Enter opens the file, Esc cancels
    fn open_path_prompt(&mut self) {
        self.prompt_return = self.mode;
        self.path_input.reset();
        self.mode = AppMode::PathPrompt;
    }

    /// Answer the path prompt: empty input cancels, anything else is
    /// opened as an image file. Decode failure reports and leaves both
    /// the viewer and the calling pane exactly as they were.
    fn confirm_path(&mut self) -> Result<(), ActionError> {
        let path = self.path_input.value().trim().to_string();
        self.mode = self.prompt_return;
        if path.is_empty() {
            return Err(ActionError::Cancelled);
        }
        self.image_viewer.open_from_path(Path::new(&path))?;
        self.mode = AppMode::ImageView;
        Ok(())
    }

    /// List print destinations and open the picker
    fn begin_print(&mut self) -> Result<(), ActionError> {
        if self.image_viewer.image().is_none() {
            // Print is only offered once an image is shown
            return Ok(());
        }
        let targets = print::list_targets(&self.config.print.list_command)?;
        if targets.is_empty() {
            return Err(ActionError::NoPrinters);
        }
        self.print_targets = targets;
        self.print_selected = 0;
        self.mode = AppMode::PrintPicker;
        Ok(())
    }

    /// Compose the page for the chosen destination and spool it
    fn confirm_print(&mut self) -> Result<(), ActionError> {
        let Some(image) = self.image_viewer.image() else {
            return Ok(());
        };
        let page = print::compose_page(image, self.config.print.page_geometry());
        let target = &self.print_targets[self.print_selected];
        print::spool(target, &page, &self.config.print.spool_command)?;
        self.mode = AppMode::ImageView;
        Ok(())
    }

    /// Move focus to the next open pane: menu, text viewer, image viewer
    fn cycle_focus(&mut self) {
        self.mode = match self.mode {
            AppMode::Menu if self.text_viewer.is_open() => AppMode::TextView,
            AppMode::Menu if self.image_viewer.is_open() => AppMode::ImageView,
            AppMode::TextView if self.image_viewer.is_open() => AppMode::ImageView,
            AppMode::TextView | AppMode::ImageView => AppMode::Menu,
            other => other,
        };
    }

    /// Close the focused viewer (clearing its binding) and fall back to
    /// the other open viewer, else the menu
    fn close_focused_viewer(&mut self) {
        match self.mode {
            AppMode::TextView => {
                self.text_viewer.close();
                self.mode = if self.image_viewer.is_open() {
                    AppMode::ImageView
                } else {
                    AppMode::Menu
                };
            }
            AppMode::ImageView => {
                self.image_viewer.close();
                self.mode = if self.text_viewer.is_open() {
                    AppMode::TextView
                } else {
                    AppMode::Menu
                };
            }
            _ => {}
        }
    }

    /// Handle one keyboard event based on current mode
    ///
    /// Never fatal: action failures surface in the error modal and the
    /// loop keeps running.
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Any key dismisses the error modal first
        if self.error.is_some() {
            self.error = None;
            return;
        }

        match self.mode {
            AppMode::Menu => self.handle_menu_key(key),
            AppMode::TextView => self.handle_text_key(key),
            AppMode::ImageView => self.handle_image_key(key),
            AppMode::PathPrompt => self.handle_path_key(key),
            AppMode::PrintPicker => self.handle_print_key(key),
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.menu.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.menu.select_prev(),
            KeyCode::Enter => self.dispatch(AppEvent::MenuItemSelected(self.menu.selected())),
            KeyCode::Char('s') => {
                self.dispatch(AppEvent::MenuItemSelected(MenuItem::TakeScreenshot));
            }
            KeyCode::Char('o') => {
                self.dispatch(AppEvent::ActionTriggered(ViewerAction::OpenFile));
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.dispatch(AppEvent::MenuItemSelected(MenuItem::Quit));
            }
            KeyCode::Tab => self.cycle_focus(),
            _ => {}
        }
    }

    fn handle_text_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.close_focused_viewer(),
            KeyCode::Tab => self.cycle_focus(),
            KeyCode::Enter => {
                let result = self.text_viewer.insert_newline(self.backend.as_ref());
                self.report(result);
            }
            KeyCode::Backspace => {
                let result = self.text_viewer.backspace(self.backend.as_ref());
                self.report(result);
            }
            KeyCode::Delete => {
                let result = self.text_viewer.delete(self.backend.as_ref());
                self.report(result);
            }
            KeyCode::Left => self.text_viewer.move_left(),
            KeyCode::Right => self.text_viewer.move_right(),
            KeyCode::Up => self.text_viewer.move_up(),
            KeyCode::Down => self.text_viewer.move_down(),
            KeyCode::Home => self.text_viewer.move_home(),
            KeyCode::End => self.text_viewer.move_end(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let result = self.text_viewer.insert_char(c, self.backend.as_ref());
                self.report(result);
            }
            _ => {}
        }
    }

    fn handle_image_key(&mut self, key: KeyEvent) {
        let (step_x, step_y) = self.scroll_step();
        match key.code {
            KeyCode::Esc => self.close_focused_viewer(),
            KeyCode::Tab => self.cycle_focus(),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.dispatch(AppEvent::ActionTriggered(ViewerAction::ZoomIn));
            }
            KeyCode::Char('-') => {
                self.dispatch(AppEvent::ActionTriggered(ViewerAction::ZoomOut));
            }
            KeyCode::Char('0') => {
                self.dispatch(AppEvent::ActionTriggered(ViewerAction::NormalSize));
            }
            KeyCode::Char('f') => {
                self.dispatch(AppEvent::ActionTriggered(ViewerAction::ToggleFitToWindow));
            }
            KeyCode::Char('o') => {
                self.dispatch(AppEvent::ActionTriggered(ViewerAction::OpenFile));
            }
            KeyCode::Char('p') => {
                self.dispatch(AppEvent::ActionTriggered(ViewerAction::Print));
            }
            KeyCode::Left => self.image_viewer.scroll_view(-step_x, 0),
            KeyCode::Right => self.image_viewer.scroll_view(step_x, 0),
            KeyCode::Up => self.image_viewer.scroll_view(0, -step_y),
            KeyCode::Down => self.image_viewer.scroll_view(0, step_y),
            KeyCode::PageUp => {
                self.image_viewer
                    .scroll_view(0, -self.image_viewer.v_scroll.page_step);
            }
            KeyCode::PageDown => {
                self.image_viewer
                    .scroll_view(0, self.image_viewer.v_scroll.page_step);
            }
            _ => {}
        }
    }

    fn handle_path_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                log::debug!("File open cancelled");
                self.mode = self.prompt_return;
            }
            KeyCode::Enter => {
                let result = self.confirm_path();
                self.report(result);
            }
            _ => {
                // Editing keys go to tui-input (chars, backspace, arrows,
                // Ctrl+A/E/W, ...)
                self.path_input.handle_event(&Event::Key(key));
            }
        }
    }

    fn handle_print_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                log::debug!("Print cancelled");
                self.mode = AppMode::ImageView;
            }
            KeyCode::Enter => {
                let result = self.confirm_print();
                self.report(result);
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.print_selected + 1 < self.print_targets.len() {
                    self.print_selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.print_selected = self.print_selected.saturating_sub(1);
            }
            _ => {}
        }
    }

    /// Handle one mouse event
    ///
    /// Left drags over the image pane stamp annotations regardless of
    /// which pane has keyboard focus, like drawing on an unfocused
    /// window. Modals suspend all pointer input.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.error.is_some() || matches!(self.mode, AppMode::PathPrompt | AppMode::PrintPicker)
        {
            return;
        }
        match mouse.kind {
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((x, y)) = self.pointer_to_image_px(mouse.column, mouse.row) {
                    self.dispatch(AppEvent::PointerDragged { x, y });
                }
            }
            MouseEventKind::ScrollUp => {
                let (_, step_y) = self.scroll_step();
                self.image_viewer.scroll_view(0, -step_y);
            }
            MouseEventKind::ScrollDown => {
                let (_, step_y) = self.scroll_step();
                self.image_viewer.scroll_view(0, step_y);
            }
            _ => {}
        }
    }

    /// Image pixel under a terminal cell, if the cell is over the image
    fn pointer_to_image_px(&self, column: u16, row: u16) -> Option<(u32, u32)> {
        let image_size = self.image_viewer.image_size()?;
        ui::cell_to_image_px(
            (column, row),
            self.image_view_area,
            self.image_pane.font_size(),
            image_size,
            self.image_viewer.scale(),
            (
                self.image_viewer.h_scroll.value,
                self.image_viewer.v_scroll.value,
            ),
            self.image_viewer.fit_to_window(),
        )
    }

    /// One cell's worth of image pixels, the keyboard/wheel scroll step
    fn scroll_step(&self) -> (i64, i64) {
        let (fw, fh) = self.image_pane.font_size();
        (fw as i64, fh as i64)
    }

    /// Render the TUI
    pub fn draw(&mut self, frame: &mut Frame) {
        let size = frame.area();

        frame.render_widget(
            ratatui::widgets::Block::default()
                .style(ratatui::prelude::Style::default().bg(self.palette.default_bg)),
            size,
        );

        let (content_area, hints_area) = ui::main_layout(size);
        let pulse = self.menu.pulse_active(Instant::now());

        self.image_view_area = Rect::default();

        let text_open = self.text_viewer.is_open();
        let image_open = self.image_viewer.is_open();

        if text_open || image_open {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(26), Constraint::Min(20)])
                .split(content_area);
            ui::render_menu(frame, columns[0], &self.menu, pulse, &self.palette);

            match (text_open, image_open) {
                (true, true) => {
                    let rows = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                        .split(columns[1]);
                    ui::render_text_editor(
                        frame,
                        rows[0],
                        &self.text_viewer,
                        self.mode == AppMode::TextView,
                        &self.palette,
                    );
                    self.image_view_area = ui::render_image_view(
                        frame,
                        rows[1],
                        &mut self.image_viewer,
                        &mut self.image_pane,
                        self.mode == AppMode::ImageView,
                        &self.palette,
                    );
                }
                (true, false) => {
                    ui::render_text_editor(
                        frame,
                        columns[1],
                        &self.text_viewer,
                        self.mode == AppMode::TextView,
                        &self.palette,
                    );
                }
                (false, _) => {
                    self.image_view_area = ui::render_image_view(
                        frame,
                        columns[1],
                        &mut self.image_viewer,
                        &mut self.image_pane,
                        self.mode == AppMode::ImageView,
                        &self.palette,
                    );
                }
            }
        } else {
            ui::render_menu(frame, content_area, &self.menu, pulse, &self.palette);
        }

        ui::render_keyboard_hints(frame, hints_area, self.mode, &self.palette);

        match self.mode {
            AppMode::PathPrompt => {
                ui::render_path_prompt(frame, size, &self.path_input, &self.palette);
            }
            AppMode::PrintPicker => {
                ui::render_print_picker(
                    frame,
                    size,
                    &self.print_targets,
                    self.print_selected,
                    &self.palette,
                );
            }
            _ => {}
        }

        // The error modal overlays everything else
        if let Some(ref message) = self.error {
            ui::render_error_modal(frame, size, message, &self.palette);
        }
    }
}
