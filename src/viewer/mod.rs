pub mod image;
pub mod text;
pub mod zoom;

pub use image::{ImageViewer, ViewerState};
pub use text::TextViewer;
pub use zoom::{ScrollBar, ZoomState};
