use crate::clipboard::Target;
use crate::tray::MenuItem;

/// Events the application loop dispatches
/// Keyboard and mouse input is translated into these before any state is
/// touched; watcher threads deliver ClipboardChanged over the channel.
/// Handlers run to completion on the loop thread, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// A clipboard buffer changed; the payload is re-read, never carried
    ClipboardChanged(Target),
    /// A tray menu entry was chosen
    MenuItemSelected(MenuItem),
    /// Pointer dragged over the image viewer, in image pixel coordinates
    PointerDragged { x: u32, y: u32 },
    /// An image viewer action was invoked
    ActionTriggered(ViewerAction),
}

/// Actions available from the image viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    ZoomIn,
    ZoomOut,
    NormalSize,
    ToggleFitToWindow,
    OpenFile,
    Print,
}
