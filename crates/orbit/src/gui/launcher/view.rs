use super::model::{LauncherState, Slot};
use super::{HOVER_ALPHA, ICON_ORBIT_RADIUS, LABEL_MAX_CHARS, LAUNCH_ALPHA};
use crate::gui::theme::ThemeColors;
use orbitctl::geometry::{self, Point};
use orbitctl::icon;
use palette::Srgba;
use std::time::Instant;

/// Everything the visual layer needs to paint one launcher frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LauncherFrame {
    pub center: Point,
    pub slots: Vec<SlotVisual>,
    pub highlight: Option<Highlight>,
    pub center_content: CenterContent,
    pub ring_fill: Srgba<f64>,
    pub center_fill: Srgba<f64>,
    pub divider_color: Srgba<f64>,
    /// Canvas angles of the sector boundaries; empty for rings of fewer than two slots.
    pub dividers: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotVisual {
    pub index: usize,
    pub center: Point,
    pub scale: f64,
    pub alpha: f64,
    pub label: String,
    /// Drawn in place of the icon when the application has none.
    pub glyph: Option<String>,
    pub emphasized: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: Srgba<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CenterContent {
    App(String),
    AllApps { hovered: bool },
}

struct SlotPainter<'a> {
    slot: &'a Slot,
    index: usize,
    count: usize,
    state: &'a LauncherState,
}

impl<'a> SlotPainter<'a> {
    fn new(slot: &'a Slot, index: usize, state: &'a LauncherState) -> Self {
        Self {
            slot,
            index,
            count: state.slots.len(),
            state,
        }
    }

    fn visual(&self, now: Instant) -> SlotVisual {
        let angle = geometry::slice_angle(self.index, self.count);
        let app = &self.slot.app;
        SlotVisual {
            index: self.index,
            center: self.state.center.polar(angle, ICON_ORBIT_RADIUS),
            scale: self.state.slot_scale(self.index, now),
            alpha: self.state.slot_progress(self.index, now),
            label: truncate_label(&app.label),
            glyph: app
                .icon
                .is_none()
                .then(|| icon::fallback_glyph(&app.label)),
            emphasized: SlotEmphasis::resolve(self.state, self.index) != SlotEmphasis::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotEmphasis {
    Launching,
    Hovered,
    Idle,
}

impl SlotEmphasis {
    /// Launching wins over hovering.
    fn resolve(state: &LauncherState, index: usize) -> Self {
        if state.launching_slot == Some(index) {
            Self::Launching
        } else if state.hovered_slot == Some(index) {
            Self::Hovered
        } else {
            Self::Idle
        }
    }

    fn alpha(&self, launch_progress: f64) -> Option<f64> {
        match self {
            Self::Launching => Some(LAUNCH_ALPHA * (1.0 - launch_progress)),
            Self::Hovered => Some(HOVER_ALPHA),
            Self::Idle => None,
        }
    }
}

/// Labels longer than the ring can fit keep their first characters and an ellipsis.
pub fn truncate_label(label: &str) -> String {
    if label.chars().count() > LABEL_MAX_CHARS {
        let mut short: String = label.chars().take(LABEL_MAX_CHARS - 1).collect();
        short.push('…');
        short
    } else {
        label.to_string()
    }
}

fn highlight(state: &LauncherState, colors: &ThemeColors, now: Instant) -> Option<Highlight> {
    let index = state.launching_slot.or(state.hovered_slot)?;
    let slot = state.slots.get(index)?;
    let progress = state.launch_progress(now).unwrap_or(0.0);
    let alpha = SlotEmphasis::resolve(state, index).alpha(progress)?;
    let (start_angle, end_angle) = geometry::slice_bounds(index, state.slots.len());
    Some(Highlight {
        index,
        start_angle,
        end_angle,
        color: colors.highlight(slot.app.accent, alpha),
    })
}

fn center_content(state: &LauncherState) -> CenterContent {
    match state.get_hovered_app() {
        Some(app) => CenterContent::App(app.label.to_string()),
        None => CenterContent::AllApps {
            hovered: state.center_hovered,
        },
    }
}

/// Builds the frame for `now`, or `None` while the launcher is closed.
pub fn frame(state: &LauncherState, colors: &ThemeColors, now: Instant) -> Option<LauncherFrame> {
    if !state.is_open {
        return None;
    }
    let n = state.slots.len();
    let slots = state
        .slots
        .iter()
        .enumerate()
        .map(|(i, slot)| SlotPainter::new(slot, i, state).visual(now))
        .collect();
    let dividers = if n >= 2 {
        (0..n).map(|i| geometry::slice_bounds(i, n).0).collect()
    } else {
        Vec::new()
    };

    Some(LauncherFrame {
        center: state.center,
        slots,
        highlight: highlight(state, colors, now),
        center_content: center_content(state),
        ring_fill: colors.ring,
        center_fill: colors.center_fill(state.center_hovered),
        divider_color: colors.divider,
        dividers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::viewport::Viewport;
    use orbitctl::registry::AppRegistry;
    use std::time::Duration;

    fn open_builtin() -> (LauncherState, Instant) {
        let mut state = LauncherState::new();
        let now = Instant::now();
        state.open(
            Point::new(900.0, 500.0),
            &Viewport::default(),
            &AppRegistry::builtin(),
            now,
        );
        (state, now)
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Terminal"), "Terminal");
        assert_eq!(truncate_label("Abcdefghi"), "Abcdefghi");
        assert_eq!(truncate_label("Screen Recorder"), "Screen R…");
    }

    #[test]
    fn test_closed_launcher_has_no_frame() {
        let state = LauncherState::new();
        assert!(frame(&state, &ThemeColors::default(), Instant::now()).is_none());
    }

    #[test]
    fn test_frame_layout() {
        let (state, t0) = open_builtin();
        let f = frame(&state, &ThemeColors::default(), t0).unwrap();
        assert_eq!(f.slots.len(), 6);
        assert_eq!(f.dividers.len(), 6);
        // slot 0 sits straight above the centre
        let top = f.slots[0].center;
        assert!((top.x - 900.0).abs() < 1e-9);
        assert!((top.y - (500.0 - ICON_ORBIT_RADIUS)).abs() < 1e-9);
        assert_eq!(f.slots[0].alpha, 0.0);
        assert_eq!(f.highlight, None);
        assert_eq!(f.center_content, CenterContent::AllApps { hovered: false });
        assert_eq!(f.center_fill, ThemeColors::default().center_circle);
    }

    #[test]
    fn test_hover_and_launch_highlight() {
        let (mut state, t0) = open_builtin();
        let colors = ThemeColors::default();
        state.hovered_slot = Some(2);
        let f = frame(&state, &colors, t0).unwrap();
        let h = f.highlight.unwrap();
        assert_eq!(h.index, 2);
        assert_eq!(h.color.alpha, HOVER_ALPHA);
        assert_eq!(f.center_content, CenterContent::App("Settings".into()));
        assert!(f.slots[2].emphasized);

        state.launch(2, t0);
        let h = frame(&state, &colors, t0).unwrap().highlight.unwrap();
        assert_eq!(h.color.alpha, LAUNCH_ALPHA);
        let later = t0 + Duration::from_millis(110);
        let h = frame(&state, &colors, later).unwrap().highlight.unwrap();
        assert!((h.color.alpha - LAUNCH_ALPHA * 0.5).abs() < 1e-9);
    }
}
