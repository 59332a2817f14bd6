use std::time::Duration;

pub mod model;
pub mod view;

pub use model::{CursorAction, LauncherAction, LauncherState, Nav, Phase, Slot};
pub use view::{CenterContent, LauncherFrame, frame};

pub const OUTER_RADIUS: f64 = 180.0; // click outside closes
pub const CENTER_RADIUS: f64 = 42.0; // "all apps" hub
pub const ICON_ORBIT_RADIUS: f64 = 110.0;
pub const ICON_SIZE: f64 = 46.0;

pub const STAGGER_STEP: Duration = Duration::from_millis(35);
pub const STAGGER_RAMP: Duration = Duration::from_millis(180);
pub const LAUNCH_GRACE: Duration = Duration::from_millis(220);

pub const ENTRY_SCALE_MIN: f64 = 0.3;
pub const PULSE_AMPLITUDE: f64 = 0.2;
pub const HOVER_ALPHA: f64 = 0.32;
pub const LAUNCH_ALPHA: f64 = 0.55;
pub const LABEL_MAX_CHARS: usize = 9;

pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}
