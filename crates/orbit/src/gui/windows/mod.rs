use std::time::Duration;

pub mod manager;
pub mod model;
pub mod taskbar;

pub use manager::{OpenOutcome, WindowManager};
pub use model::{
    ContentBlock, ContentBuilder, Gesture, OpenRequest, ResizeEdge, TransitionKind, WindowBody,
    WindowControl, WindowEntry, WindowError, WindowHandle, WindowRegion,
};
pub use taskbar::{MenubarPills, NoIndicators, TaskbarIndicators};

pub const MIN_WIDTH: f64 = 320.0;
pub const MIN_HEIGHT: f64 = 200.0;
pub const TITLEBAR_HEIGHT: f64 = 38.0;
/// Horizontal strip of title bar that must stay on screen while dragging.
pub const GRAB_MARGIN: f64 = 60.0;
pub const Z_FLOOR: u32 = 150;
pub const MINIMIZED_SCALE: f64 = 0.08;
pub const RESIZE_HANDLE: f64 = 6.0;

pub const OPEN_TRANSITION: Duration = Duration::from_millis(300);
pub const CLOSE_TRANSITION: Duration = Duration::from_millis(300);
pub const RESTORE_TRANSITION: Duration = Duration::from_millis(350);
