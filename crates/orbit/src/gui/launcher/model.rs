use crate::gui::launcher::{
    CENTER_RADIUS, ENTRY_SCALE_MIN, LAUNCH_GRACE, OUTER_RADIUS, PULSE_AMPLITUDE, STAGGER_RAMP,
    STAGGER_STEP, ease_out_cubic,
};
use crate::gui::viewport::Viewport;
use orbitctl::geometry::{Point, Ring, RingHit};
use orbitctl::registry::{AppDescriptor, AppId, AppRegistry};
use std::f64::consts::PI;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub app: AppDescriptor,
}

impl Slot {
    pub fn new(app: AppDescriptor) -> Self {
        Self { app }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Open,
    Hovering(usize),
    CenterHovering,
    Launching(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Forward,
    Backward,
}

/// Outcome of a primary click while the launcher is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LauncherAction {
    None,
    Closed,
    /// The hub was clicked; the drawer opens with this search prefix.
    OpenDrawer(String),
    Launching(usize),
}

pub struct LauncherState {
    pub is_open: bool,
    pub hovered_slot: Option<usize>,
    pub center_hovered: bool,
    pub launching_slot: Option<usize>,
    pub launch_started: Option<Instant>,
    pub opened_at: Option<Instant>,
    pub center: Point,
    pub slots: Vec<Slot>,
    redrawing: bool,
    ring: Ring,
}

impl Default for LauncherState {
    fn default() -> Self {
        Self::new()
    }
}

impl LauncherState {
    pub fn new() -> Self {
        Self {
            is_open: false,
            hovered_slot: None,
            center_hovered: false,
            launching_slot: None,
            launch_started: None,
            opened_at: None,
            center: Point::default(),
            slots: Vec::new(),
            redrawing: false,
            ring: Ring::new(CENTER_RADIUS, OUTER_RADIUS),
        }
    }

    pub fn phase(&self) -> Phase {
        if !self.is_open {
            Phase::Closed
        } else if let Some(i) = self.launching_slot {
            Phase::Launching(i)
        } else if let Some(i) = self.hovered_slot {
            Phase::Hovering(i)
        } else if self.center_hovered {
            Phase::CenterHovering
        } else {
            Phase::Open
        }
    }

    pub fn is_launching(&self) -> bool {
        self.launching_slot.is_some()
    }

    /// Opens around `anchor`, rebuilding the ring from the registry's current pin order.
    pub fn open(&mut self, anchor: Point, viewport: &Viewport, registry: &AppRegistry, now: Instant) {
        self.slots = registry.ring().into_iter().map(Slot::new).collect();
        self.center = viewport.clamp_center(anchor, OUTER_RADIUS);
        self.is_open = true;
        self.hovered_slot = None;
        self.center_hovered = false;
        self.launching_slot = None;
        self.launch_started = None;
        self.opened_at = Some(now);
        self.redrawing = true;
        log::debug!(
            "Launcher opened at ({:.0}, {:.0}) with {} slots",
            self.center.x,
            self.center.y,
            self.slots.len()
        );
    }

    /// Returns whether the launcher was open. The redraw loop keeps running until
    /// [`finish_close_transition`](Self::finish_close_transition).
    pub fn close(&mut self) -> bool {
        if !self.is_open {
            return false;
        }
        self.is_open = false;
        self.hovered_slot = None;
        self.center_hovered = false;
        self.launching_slot = None;
        self.launch_started = None;
        log::debug!("Launcher closed");
        true
    }

    pub fn finish_close_transition(&mut self) {
        if !self.is_open {
            self.redrawing = false;
        }
    }

    /// Whether the visual layer should keep its redraw loop alive.
    pub fn is_animating(&self) -> bool {
        self.redrawing
    }

    fn interactive(&self) -> bool {
        self.is_open && !self.is_launching()
    }

    fn hit(&self, cursor: Point) -> RingHit {
        self.ring.hit(cursor - self.center, self.slots.len())
    }

    pub fn update_cursor(&mut self, cursor: Point) -> CursorAction {
        if !self.interactive() {
            return CursorAction::default();
        }

        let (hovered, center) = match self.hit(cursor) {
            RingHit::Slice(i) => (Some(i), false),
            RingHit::Center => (None, true),
            RingHit::Empty | RingHit::Outside => (None, false),
        };
        let changed = hovered != self.hovered_slot || center != self.center_hovered;
        self.hovered_slot = hovered;
        self.center_hovered = center;

        CursorAction::new(changed, hovered.is_some() || center)
    }

    pub fn click(&mut self, cursor: Point, now: Instant) -> LauncherAction {
        if !self.interactive() {
            return LauncherAction::None;
        }
        match self.hit(cursor) {
            RingHit::Outside => {
                self.close();
                LauncherAction::Closed
            }
            RingHit::Center => {
                self.close();
                LauncherAction::OpenDrawer(String::new())
            }
            RingHit::Slice(i) => {
                if self.launch(i, now) {
                    LauncherAction::Launching(i)
                } else {
                    LauncherAction::None
                }
            }
            RingHit::Empty => LauncherAction::None,
        }
    }

    /// Moves the hover one slot around the ring, wrapping.
    pub fn navigate(&mut self, nav: Nav) -> bool {
        let n = self.slots.len();
        if !self.interactive() || n == 0 {
            return false;
        }
        self.hovered_slot = Some(match (self.hovered_slot, nav) {
            (None, Nav::Forward) => 0,
            (None, Nav::Backward) => n - 1,
            (Some(i), Nav::Forward) => (i + 1) % n,
            (Some(i), Nav::Backward) => (i + n - 1) % n,
        });
        self.center_hovered = false;
        true
    }

    /// Launches the hovered slot, if any.
    pub fn activate(&mut self, now: Instant) -> Option<usize> {
        let i = self.hovered_slot?;
        self.launch(i, now).then_some(i)
    }

    pub fn launch(&mut self, index: usize, now: Instant) -> bool {
        if !self.interactive() || index >= self.slots.len() {
            return false;
        }
        self.launching_slot = Some(index);
        self.launch_started = Some(now);
        self.hovered_slot = Some(index);
        self.center_hovered = false;
        log::debug!("Launching slot {} ({})", index, self.slots[index].app.id);
        true
    }

    /// An ASCII letter or digit closes the launcher and becomes the drawer's search prefix.
    pub fn type_char(&mut self, c: char) -> Option<String> {
        if !self.interactive() || !c.is_ascii_alphanumeric() {
            return None;
        }
        self.close();
        Some(c.to_string())
    }

    /// Ends the launch grace period once it has elapsed, returning the app to open.
    pub fn tick(&mut self, now: Instant) -> Option<AppId> {
        let index = self.launching_slot?;
        let started = self.launch_started?;
        if now.saturating_duration_since(started) < LAUNCH_GRACE {
            return None;
        }
        let id = self.slots.get(index).map(|s| s.app.id.clone());
        self.close();
        id
    }

    /// Entrance progress of slot `index` in `[0, 1]`.
    pub fn slot_progress(&self, index: usize, now: Instant) -> f64 {
        let Some(opened_at) = self.opened_at else {
            return 1.0;
        };
        let elapsed = now.saturating_duration_since(opened_at).as_secs_f64();
        let delay = STAGGER_STEP.as_secs_f64() * index as f64;
        ((elapsed - delay) / STAGGER_RAMP.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn launch_progress(&self, now: Instant) -> Option<f64> {
        let started = self.launch_started?;
        let elapsed = now.saturating_duration_since(started).as_secs_f64();
        Some((elapsed / LAUNCH_GRACE.as_secs_f64()).clamp(0.0, 1.0))
    }

    pub fn slot_scale(&self, index: usize, now: Instant) -> f64 {
        if self.launching_slot == Some(index)
            && let Some(t) = self.launch_progress(now)
        {
            return 1.0 + PULSE_AMPLITUDE * (PI * t).sin();
        }
        let t = self.slot_progress(index, now);
        ENTRY_SCALE_MIN + (1.0 - ENTRY_SCALE_MIN) * ease_out_cubic(t)
    }

    pub fn get_hovered_app(&self) -> Option<&AppDescriptor> {
        self.hovered_slot
            .and_then(|idx| self.slots.get(idx))
            .map(|slot| &slot.app)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorAction {
    pub should_redraw: bool,
    pub over_target: bool,
}

impl CursorAction {
    pub fn new(should_redraw: bool, over_target: bool) -> Self {
        Self {
            should_redraw,
            over_target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbitctl::registry::{AppDescriptor, Category};
    use std::time::Duration;

    fn registry_with(n: usize) -> AppRegistry {
        let apps = (0..n)
            .map(|i| AppDescriptor::new(format!("app{i}"), format!("App {i}"), Category::System).pinned(true))
            .collect();
        AppRegistry::new(apps)
    }

    fn open_with(n: usize) -> (LauncherState, Instant) {
        let mut state = LauncherState::new();
        let now = Instant::now();
        state.open(Point::new(960.0, 540.0), &Viewport::default(), &registry_with(n), now);
        (state, now)
    }

    #[test]
    fn test_stagger_at_200ms() {
        let (state, t0) = open_with(4);
        let now = t0 + Duration::from_millis(200);
        assert!(state.slot_scale(0, now) >= 0.99);
        let p3 = state.slot_progress(3, now);
        assert!(p3 > 0.0 && p3 < 1.0, "slot 3 progress {p3}");
        assert!(state.slot_scale(3, now) < 0.99);
        // slot 3 has not started at all before its 105ms offset
        assert_eq!(state.slot_progress(3, t0 + Duration::from_millis(100)), 0.0);
        assert_eq!(state.slot_scale(3, t0), ENTRY_SCALE_MIN);
    }

    #[test]
    fn test_open_clamps_center() {
        let mut state = LauncherState::new();
        state.open(Point::new(5.0, 5.0), &Viewport::default(), &registry_with(3), Instant::now());
        assert_eq!(state.center, Point::new(OUTER_RADIUS, OUTER_RADIUS));
        assert_eq!(state.phase(), Phase::Open);
    }

    #[test]
    fn test_hover_tracks_slices_and_center() {
        let (mut state, _) = open_with(4);
        let c = state.center;

        let action = state.update_cursor(c + Point::new(100.0, 0.0));
        assert_eq!(action, CursorAction::new(true, true));
        assert_eq!(state.phase(), Phase::Hovering(1));
        assert_eq!(state.get_hovered_app().unwrap().id.as_str(), "app1");

        // same slice: nothing to redraw
        assert!(!state.update_cursor(c + Point::new(120.0, 5.0)).should_redraw);

        state.update_cursor(c + Point::new(3.0, 3.0));
        assert_eq!(state.phase(), Phase::CenterHovering);

        let action = state.update_cursor(c + Point::new(500.0, 0.0));
        assert_eq!(action, CursorAction::new(true, false));
        assert_eq!(state.phase(), Phase::Open);
    }

    #[test]
    fn test_click_outcomes() {
        let (mut state, now) = open_with(4);
        let c = state.center;
        assert_eq!(
            state.click(c + Point::new(300.0, 0.0), now),
            LauncherAction::Closed
        );
        assert!(!state.is_open);

        let (mut state, now) = open_with(4);
        assert_eq!(
            state.click(state.center, now),
            LauncherAction::OpenDrawer(String::new())
        );

        let (mut state, now) = open_with(4);
        let c = state.center;
        assert_eq!(
            state.click(c + Point::new(0.0, 100.0), now),
            LauncherAction::Launching(2)
        );
        assert_eq!(state.phase(), Phase::Launching(2));
        // not interactable while launching
        assert_eq!(state.click(c + Point::new(300.0, 0.0), now), LauncherAction::None);
        assert!(!state.navigate(Nav::Forward));
        assert_eq!(state.type_char('a'), None);
    }

    #[test]
    fn test_launch_grace_then_close() {
        let (mut state, t0) = open_with(4);
        assert!(state.launch(1, t0));
        assert_eq!(state.tick(t0 + Duration::from_millis(219)), None);
        assert!(state.is_open);

        let mid = t0 + Duration::from_millis(110);
        assert!((state.slot_scale(1, mid) - 1.2).abs() < 1e-9);

        assert_eq!(
            state.tick(t0 + Duration::from_millis(220)),
            Some(AppId::from("app1"))
        );
        assert_eq!(state.phase(), Phase::Closed);
        assert_eq!(state.hovered_slot, None);
        assert!(state.is_animating());
        state.finish_close_transition();
        assert!(!state.is_animating());
    }

    #[test]
    fn test_keyboard_navigation_wraps() {
        let (mut state, _) = open_with(4);
        assert!(state.navigate(Nav::Backward));
        assert_eq!(state.hovered_slot, Some(3));
        state.navigate(Nav::Forward);
        assert_eq!(state.hovered_slot, Some(0));

        let (mut state, now) = open_with(4);
        assert_eq!(state.activate(now), None);
        state.navigate(Nav::Forward);
        state.navigate(Nav::Forward);
        assert_eq!(state.activate(now), Some(1));
    }

    #[test]
    fn test_empty_ring_is_inert() {
        let (mut state, now) = open_with(0);
        assert!(!state.navigate(Nav::Forward));
        let c = state.center;
        assert_eq!(state.click(c + Point::new(0.0, -100.0), now), LauncherAction::None);
        assert!(state.is_open);
    }

    #[test]
    fn test_type_char_forwards_prefix() {
        let (mut state, _) = open_with(4);
        assert_eq!(state.type_char('-'), None);
        assert_eq!(state.type_char('é'), None);
        assert_eq!(state.type_char('٣'), None);
        assert!(state.is_open);
        assert_eq!(state.type_char('t'), Some("t".to_string()));
        assert!(!state.is_open);
    }

    #[test]
    fn test_reopen_reflects_new_pins() {
        let mut registry = registry_with(2);
        let mut state = LauncherState::new();
        let now = Instant::now();
        state.open(Point::default(), &Viewport::default(), &registry, now);
        assert_eq!(state.slots.len(), 2);
        state.close();
        registry.unpin(&AppId::from("app0")).unwrap();
        state.open(Point::default(), &Viewport::default(), &registry, now);
        assert_eq!(state.slots.len(), 1);
        assert_eq!(state.slots[0].app.id.as_str(), "app1");
    }
}
