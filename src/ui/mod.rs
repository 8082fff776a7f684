pub mod dialogs;
pub mod image_view;
pub mod layout;
pub mod menu;
pub mod status;
pub mod style;
pub mod text_editor;

pub use dialogs::{render_error_modal, render_path_prompt, render_print_picker};
pub use image_view::{ImagePane, cell_to_image_px, render_image_view};
pub use layout::{centered_rect, main_layout};
pub use menu::render_menu;
pub use status::render_keyboard_hints;
pub use style::Palette;
pub use text_editor::render_text_editor;
