use super::model::{
    FlyOut, Gesture, OpenRequest, ResizeEdge, Transition, TransitionKind, WindowCollection,
    WindowEntry, WindowError, WindowRegion,
};
use super::taskbar::TaskbarIndicators;
use super::{
    CLOSE_TRANSITION, GRAB_MARGIN, MINIMIZED_SCALE, OPEN_TRANSITION, RESTORE_TRANSITION,
    TITLEBAR_HEIGHT, Z_FLOOR,
};
use crate::gui::viewport::{MENUBAR_HEIGHT, Viewport};
use orbitctl::geometry::{Point, Rect};
use orbitctl::registry::AppId;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Created,
    /// Already open; raised instead.
    Focused,
    /// Already open but minimized; restored and raised.
    Restored,
}

/// Owns every application window. At most one gesture is active at a time.
#[derive(Debug, Default)]
pub struct WindowManager {
    windows: WindowCollection,
    gesture: Option<Gesture>,
    viewport: Viewport,
}

impl WindowManager {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Fullscreen windows follow the new work area.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let area = viewport.work_area();
        for entry in self.windows.iter_mut().filter(|w| w.fullscreen) {
            entry.rect = area;
        }
    }

    pub fn get(&self, id: &AppId) -> Option<&WindowEntry> {
        self.windows.get(id)
    }

    pub fn get_mut(&mut self, id: &AppId) -> Option<&mut WindowEntry> {
        self.windows.get_mut(id)
    }

    fn live(&self, id: &AppId) -> Option<&WindowEntry> {
        self.windows.get(id).filter(|w| w.is_live())
    }

    fn live_mut(&mut self, id: &AppId) -> Option<&mut WindowEntry> {
        self.windows.get_mut(id).filter(|w| w.is_live())
    }

    /// Every entry in open order, including ones still playing their closing transition.
    pub fn windows(&self) -> impl Iterator<Item = &WindowEntry> {
        self.windows.iter()
    }

    /// Number of open windows; closing ones no longer count.
    pub fn count(&self) -> usize {
        self.windows.iter().filter(|w| w.is_live()).count()
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    fn next_z(&self) -> u32 {
        self.windows
            .max_z()
            .unwrap_or(0)
            .max(Z_FLOOR)
            .saturating_add(1)
    }

    pub fn open(&mut self, request: OpenRequest, now: Instant) -> OpenOutcome {
        if let Some(minimized) = self.live(&request.app_id).map(|w| w.minimized) {
            return if minimized {
                self.restore(&request.app_id, now);
                OpenOutcome::Restored
            } else {
                self.bring_to_front(&request.app_id);
                OpenOutcome::Focused
            };
        }
        // a window still fading out for this app is finished off first
        self.windows.remove(&request.app_id);

        let vp = self.viewport;
        let rect = Rect::new(
            ((vp.width - request.width) / 2.0).round(),
            ((vp.height - request.height) / 2.0).round().max(MENUBAR_HEIGHT),
            request.width,
            request.height,
        );
        let z = self.next_z();
        let OpenRequest {
            app_id,
            title,
            builder,
            ..
        } = request;

        match self.windows.insert(WindowEntry::new(app_id, title, rect, z)) {
            Ok(entry) => {
                let handle = entry.handle();
                builder(&mut entry.body, &handle);
                entry.transition = Some(Transition {
                    kind: TransitionKind::Opening,
                    started: now,
                    duration: OPEN_TRANSITION,
                });
                log::info!("Opened window '{}' for {}", handle.title, handle.app_id);
                OpenOutcome::Created
            }
            Err(WindowError::Duplicate(id)) => {
                log::warn!("Refusing duplicate window for {}", id);
                OpenOutcome::Focused
            }
        }
    }

    /// Starts the closing transition. Closing a window twice is a no-op.
    pub fn close(&mut self, id: &AppId, now: Instant) -> bool {
        let Some(entry) = self.live_mut(id) else {
            return false;
        };
        entry.transition = Some(Transition {
            kind: TransitionKind::Closing,
            started: now,
            duration: CLOSE_TRANSITION,
        });
        log::info!("Closing window for {}", id);
        self.cancel_gesture_for(id);
        true
    }

    /// Hides the window, flying it onto its taskbar indicator when one exists.
    pub fn minimize(&mut self, id: &AppId, indicators: &dyn TaskbarIndicators) -> bool {
        let target = indicators.indicator_rect(id);
        let Some(entry) = self.live_mut(id).filter(|w| !w.minimized) else {
            return false;
        };
        entry.fly_out = target.map(|t| FlyOut {
            translate: t.center() - entry.rect.center(),
            scale: MINIMIZED_SCALE,
        });
        entry.minimized = true;
        entry.transition = None;
        log::debug!(
            "Minimized {} ({})",
            id,
            if entry.fly_out.is_some() { "fly-out" } else { "hidden" }
        );
        self.cancel_gesture_for(id);
        true
    }

    /// Un-minimizes and raises. The restore transition only plays if the window flew out.
    pub fn restore(&mut self, id: &AppId, now: Instant) -> bool {
        let z = self.next_z();
        let Some(entry) = self.live_mut(id).filter(|w| w.minimized) else {
            return false;
        };
        entry.minimized = false;
        entry.z_order = z;
        entry.transition = entry.fly_out.take().map(|_| Transition {
            kind: TransitionKind::Restoring,
            started: now,
            duration: RESTORE_TRANSITION,
        });
        log::debug!("Restored {}", id);
        true
    }

    pub fn toggle_fullscreen(&mut self, id: &AppId) -> bool {
        let area = self.viewport.work_area();
        let Some(entry) = self.live_mut(id) else {
            return false;
        };
        if entry.fullscreen {
            if let Some(saved) = entry.saved_rect.take() {
                entry.rect = saved;
            }
            entry.fullscreen = false;
        } else {
            entry.saved_rect = Some(entry.rect);
            entry.rect = area;
            entry.fullscreen = true;
        }
        self.cancel_gesture_for(id);
        true
    }

    pub fn bring_to_front(&mut self, id: &AppId) -> bool {
        let z = self.next_z();
        match self.live_mut(id) {
            Some(entry) => {
                entry.z_order = z;
                true
            }
            None => false,
        }
    }

    fn gesture_target(&self, id: &AppId) -> Option<Rect> {
        if self.gesture.is_some() {
            return None;
        }
        self.live(id)
            .filter(|w| w.is_interactive() && !w.fullscreen)
            .map(|w| w.rect)
    }

    pub fn begin_drag(&mut self, id: &AppId, pointer: Point) -> bool {
        let Some(rect) = self.gesture_target(id) else {
            return false;
        };
        self.gesture = Some(Gesture::Drag {
            app_id: id.clone(),
            grab_offset: pointer - rect.origin(),
        });
        log::debug!("Drag started on {}", id);
        true
    }

    pub fn begin_resize(&mut self, id: &AppId, edge: ResizeEdge, pointer: Point) -> bool {
        let Some(start) = self.gesture_target(id) else {
            return false;
        };
        self.gesture = Some(Gesture::Resize {
            app_id: id.clone(),
            edge,
            anchor: pointer,
            start,
        });
        log::debug!("Resize ({}) started on {}", edge, id);
        true
    }

    /// Applies the pointer to the active gesture; returns whether any geometry changed.
    pub fn update_gesture(&mut self, pointer: Point) -> bool {
        let Some(gesture) = self.gesture.clone() else {
            return false;
        };
        let vp = self.viewport;
        let Some(entry) = self.live_mut(gesture.app_id()) else {
            self.gesture = None;
            return false;
        };
        let before = entry.rect;
        match gesture {
            Gesture::Drag { grab_offset, .. } => {
                let target = pointer - grab_offset;
                entry.rect.x = target
                    .x
                    .max(-entry.rect.w + GRAB_MARGIN)
                    .min(vp.width - GRAB_MARGIN);
                entry.rect.y = target
                    .y
                    .min(vp.height - TITLEBAR_HEIGHT)
                    .max(MENUBAR_HEIGHT);
            }
            Gesture::Resize {
                edge,
                anchor,
                start,
                ..
            } => {
                let delta = pointer - anchor;
                entry.rect = edge.resize(start, delta.x, delta.y);
            }
        }
        entry.rect != before
    }

    pub fn end_gesture(&mut self) -> Option<Gesture> {
        self.gesture.take()
    }

    fn cancel_gesture_for(&mut self, id: &AppId) {
        if self.gesture.as_ref().is_some_and(|g| g.app_id() == id) {
            self.gesture = None;
        }
    }

    fn stacked(&self) -> Vec<&WindowEntry> {
        let mut visible: Vec<&WindowEntry> =
            self.windows.iter().filter(|w| w.is_interactive()).collect();
        visible.sort_by(|a, b| b.z_order.cmp(&a.z_order));
        visible
    }

    /// Topmost visible window under `p` and the part of it that was hit.
    pub fn hit_test(&self, p: Point) -> Option<(AppId, WindowRegion)> {
        self.stacked()
            .into_iter()
            .find_map(|w| w.region_at(p).map(|region| (w.app_id.clone(), region)))
    }

    /// Most recently focused visible window.
    pub fn top_window(&self) -> Option<AppId> {
        self.stacked().first().map(|w| w.app_id.clone())
    }

    pub fn minimized(&self) -> impl Iterator<Item = &WindowEntry> {
        self.windows.iter().filter(|w| w.is_live() && w.minimized)
    }

    /// Advances transitions; returns the windows whose closing transition finished.
    pub fn tick(&mut self, now: Instant) -> Vec<AppId> {
        let mut removed = Vec::new();
        for entry in self.windows.iter_mut() {
            if entry.transition.is_some_and(|t| t.is_done(now)) {
                if entry.is_closing() {
                    removed.push(entry.app_id.clone());
                } else {
                    entry.transition = None;
                }
            }
        }
        for id in &removed {
            self.windows.remove(id);
            log::debug!("Removed window for {}", id);
        }
        removed
    }

    pub fn is_animating(&self) -> bool {
        self.windows.iter().any(|w| w.transition.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::windows::model::{ContentBlock, WindowBody, WindowHandle};
    use crate::gui::windows::taskbar::{MenubarPills, NoIndicators};
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    fn request(id: &str, w: f64, h: f64) -> OpenRequest {
        OpenRequest {
            app_id: AppId::from(id),
            title: id.to_uppercase(),
            width: w,
            height: h,
            builder: Box::new(|body: &mut WindowBody, handle: &WindowHandle| {
                body.push(ContentBlock::Heading(handle.title.clone()));
            }),
        }
    }

    fn manager() -> (WindowManager, Instant) {
        (WindowManager::new(Viewport::default()), Instant::now())
    }

    fn place(wm: &mut WindowManager, id: &str, rect: Rect) {
        wm.get_mut(&AppId::from(id)).unwrap().rect = rect;
    }

    #[test]
    fn test_open_centers_and_builds_once() {
        let (mut wm, now) = manager();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let req = OpenRequest {
            builder: Box::new(move |body: &mut WindowBody, _: &WindowHandle| {
                counter.set(counter.get() + 1);
                body.push(ContentBlock::Text("hi".into()));
            }),
            ..request("terminal", 680.0, 440.0)
        };
        assert_eq!(wm.open(req, now), OpenOutcome::Created);
        assert_eq!(wm.open(request("terminal", 680.0, 440.0), now), OpenOutcome::Focused);
        assert_eq!(calls.get(), 1);

        let w = wm.get(&AppId::from("terminal")).unwrap();
        assert_eq!(w.rect, Rect::new(620.0, 320.0, 680.0, 440.0));
        assert_eq!(w.body.blocks, vec![ContentBlock::Text("hi".into())]);
    }

    #[test]
    fn test_single_instance_raises_existing() {
        let (mut wm, now) = manager();
        wm.open(request("files", 720.0, 480.0), now);
        wm.open(request("music", 340.0, 480.0), now);
        let before = wm.count();
        assert_eq!(wm.open(request("files", 720.0, 480.0), now), OpenOutcome::Focused);
        assert_eq!(wm.count(), before);
        let files = wm.get(&AppId::from("files")).unwrap().z_order;
        let music = wm.get(&AppId::from("music")).unwrap().z_order;
        assert!(files > music);
        assert_eq!(wm.top_window(), Some(AppId::from("files")));
    }

    #[test]
    fn test_z_order_floor() {
        let (mut wm, now) = manager();
        wm.open(request("files", 720.0, 480.0), now);
        assert_eq!(wm.get(&AppId::from("files")).unwrap().z_order, Z_FLOOR + 1);
        wm.open(request("music", 340.0, 480.0), now);
        assert_eq!(wm.get(&AppId::from("music")).unwrap().z_order, Z_FLOOR + 2);
        wm.bring_to_front(&AppId::from("files"));
        assert_eq!(wm.get(&AppId::from("files")).unwrap().z_order, Z_FLOOR + 3);
    }

    #[test]
    fn test_z_order_saturates() {
        let (mut wm, now) = manager();
        wm.open(request("files", 720.0, 480.0), now);
        wm.open(request("music", 340.0, 480.0), now);
        wm.get_mut(&AppId::from("files")).unwrap().z_order = u32::MAX;
        assert!(wm.bring_to_front(&AppId::from("music")));
        assert_eq!(wm.get(&AppId::from("music")).unwrap().z_order, u32::MAX);
        assert_eq!(wm.get(&AppId::from("files")).unwrap().z_order, u32::MAX);
    }

    #[test]
    fn test_duplicate_open_focuses_existing() {
        let (mut wm, now) = manager();
        wm.open(request("files", 720.0, 480.0), now);
        let err = wm
            .windows
            .insert(WindowEntry::new("files".into(), "Files".into(), Rect::default(), 1))
            .unwrap_err();
        assert_eq!(err, WindowError::Duplicate(AppId::from("files")));
        assert_eq!(wm.open(request("files", 100.0, 100.0), now), OpenOutcome::Focused);
        assert_eq!(wm.count(), 1);
    }

    #[test]
    fn test_close_is_idempotent_and_finishes_after_transition() {
        let (mut wm, now) = manager();
        let id = AppId::from("files");
        wm.open(request("files", 720.0, 480.0), now);
        assert!(wm.close(&id, now));
        assert!(!wm.close(&id, now));
        assert_eq!(wm.count(), 0);
        assert!(wm.tick(now + Duration::from_millis(299)).is_empty());
        assert_eq!(wm.tick(now + CLOSE_TRANSITION), vec![id.clone()]);
        assert!(wm.get(&id).is_none());
        assert!(!wm.close(&id, now));
        assert!(!wm.is_animating());
    }

    #[test]
    fn test_reopen_while_closing_creates_fresh_window() {
        let (mut wm, now) = manager();
        let id = AppId::from("files");
        wm.open(request("files", 720.0, 480.0), now);
        place(&mut wm, "files", Rect::new(5.0, 40.0, 720.0, 480.0));
        wm.close(&id, now);
        assert_eq!(wm.open(request("files", 720.0, 480.0), now), OpenOutcome::Created);
        assert_eq!(wm.windows().count(), 1);
        assert_eq!(wm.get(&id).unwrap().rect.x, 600.0);
    }

    #[test]
    fn test_drag_follows_pointer_and_clamps() {
        let (mut wm, now) = manager();
        let id = AppId::from("files");
        wm.open(request("files", 400.0, 300.0), now);
        place(&mut wm, "files", Rect::new(100.0, 100.0, 400.0, 300.0));

        assert!(wm.begin_drag(&id, Point::new(110.0, 110.0)));
        wm.update_gesture(Point::new(160.0, 90.0));
        assert_eq!(wm.get(&id).unwrap().rect.origin(), Point::new(150.0, 80.0));

        wm.update_gesture(Point::new(-2000.0, 90.0));
        assert_eq!(wm.get(&id).unwrap().rect.x, -340.0);
        wm.update_gesture(Point::new(5000.0, 5000.0));
        let r = wm.get(&id).unwrap().rect;
        assert_eq!((r.x, r.y), (1920.0 - 60.0, 1080.0 - TITLEBAR_HEIGHT));
        wm.update_gesture(Point::new(500.0, -500.0));
        assert_eq!(wm.get(&id).unwrap().rect.y, MENUBAR_HEIGHT);

        assert!(matches!(wm.end_gesture(), Some(Gesture::Drag { .. })));
        assert!(!wm.update_gesture(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_only_one_gesture_at_a_time() {
        let (mut wm, now) = manager();
        wm.open(request("files", 400.0, 300.0), now);
        wm.open(request("music", 400.0, 300.0), now);
        let files = AppId::from("files");
        assert!(wm.begin_drag(&files, Point::new(700.0, 400.0)));
        assert!(!wm.begin_resize(&AppId::from("music"), ResizeEdge::East, Point::new(0.0, 0.0)));
        assert!(!wm.begin_drag(&files, Point::new(700.0, 400.0)));
    }

    #[test]
    fn test_resize_from_left_edge() {
        let (mut wm, now) = manager();
        let id = AppId::from("files");
        wm.open(request("files", 500.0, 300.0), now);
        place(&mut wm, "files", Rect::new(200.0, 100.0, 500.0, 300.0));
        assert!(wm.begin_resize(&id, ResizeEdge::West, Point::new(200.0, 250.0)));
        wm.update_gesture(Point::new(160.0, 250.0));
        let r = wm.get(&id).unwrap().rect;
        assert_eq!((r.x, r.w), (160.0, 540.0));
    }

    #[test]
    fn test_fullscreen_is_an_involution() {
        let (mut wm, now) = manager();
        let id = AppId::from("files");
        wm.open(request("files", 400.0, 300.0), now);
        let original = Rect::new(123.25, 77.5, 401.0, 299.0);
        place(&mut wm, "files", original);

        assert!(wm.toggle_fullscreen(&id));
        assert_eq!(wm.get(&id).unwrap().rect, Viewport::default().work_area());
        // no gestures while fullscreen
        assert!(!wm.begin_drag(&id, Point::new(300.0, 40.0)));
        assert!(!wm.begin_resize(&id, ResizeEdge::East, Point::new(1919.0, 400.0)));

        assert!(wm.toggle_fullscreen(&id));
        let w = wm.get(&id).unwrap();
        assert_eq!(w.rect, original);
        assert!(!w.fullscreen);
        assert_eq!(w.saved_rect, None);
    }

    #[test]
    fn test_minimize_flies_to_indicator_and_restores_geometry() {
        let (mut wm, now) = manager();
        let id = AppId::from("files");
        wm.open(request("files", 400.0, 300.0), now);
        place(&mut wm, "files", Rect::new(100.0, 100.0, 400.0, 300.0));
        let pills = MenubarPills::layout(wm.windows());
        let target = pills.indicator_rect(&id).unwrap();

        assert!(wm.minimize(&id, &pills));
        assert!(!wm.minimize(&id, &pills));
        let w = wm.get(&id).unwrap();
        let fly = w.fly_out.unwrap();
        assert_eq!(fly.scale, MINIMIZED_SCALE);
        assert_eq!(w.rect.center() + fly.translate, target.center());
        assert_eq!(wm.top_window(), None);
        assert_eq!(wm.hit_test(Point::new(300.0, 250.0)), None);

        assert!(wm.restore(&id, now));
        assert!(!wm.restore(&id, now));
        let w = wm.get(&id).unwrap();
        assert!(!w.minimized);
        assert_eq!(w.fly_out, None);
        assert_eq!(w.rect, Rect::new(100.0, 100.0, 400.0, 300.0));
        assert_eq!(w.transition.unwrap().kind, TransitionKind::Restoring);
    }

    #[test]
    fn test_minimize_without_indicator_skips_fly_out() {
        let (mut wm, now) = manager();
        let id = AppId::from("files");
        wm.open(request("files", 400.0, 300.0), now);
        assert!(wm.minimize(&id, &NoIndicators));
        assert_eq!(wm.get(&id).unwrap().fly_out, None);
        assert!(wm.restore(&id, now));
        assert_eq!(wm.get(&id).unwrap().transition, None);
    }

    #[test]
    fn test_open_restores_minimized_window() {
        let (mut wm, now) = manager();
        let id = AppId::from("files");
        wm.open(request("files", 400.0, 300.0), now);
        wm.minimize(&id, &NoIndicators);
        assert_eq!(wm.open(request("files", 400.0, 300.0), now), OpenOutcome::Restored);
        assert!(!wm.get(&id).unwrap().minimized);
        assert_eq!(wm.count(), 1);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let (mut wm, now) = manager();
        wm.open(request("files", 400.0, 300.0), now);
        wm.open(request("music", 400.0, 300.0), now);
        let (id, region) = wm.hit_test(Viewport::default().center()).unwrap();
        assert_eq!(id, AppId::from("music"));
        assert_eq!(region, WindowRegion::Body);
        assert_eq!(wm.hit_test(Point::new(5.0, 1000.0)), None);
    }
}
