use super::{MIN_HEIGHT, MIN_WIDTH, RESIZE_HANDLE, TITLEBAR_HEIGHT};
use orbitctl::geometry::{Point, Rect};
use orbitctl::registry::AppId;
use serde::Serialize;
use std::time::{Duration, Instant};
use strum::{Display as StrumDisplay, EnumIter, IntoEnumIterator};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("A window for '{0}' is already open")]
    Duplicate(AppId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, StrumDisplay, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeEdge {
    fn west(&self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    fn east(&self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }

    fn north(&self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    fn south(&self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    /// Geometry after dragging this edge by `(dx, dy)` from `start`. Sizes saturate at the
    /// minimum; a west or north edge keeps the opposite edge where it was.
    pub fn resize(&self, start: Rect, dx: f64, dy: f64) -> Rect {
        let mut r = start;
        if self.east() {
            r.w = (start.w + dx).max(MIN_WIDTH);
        }
        if self.west() {
            r.w = (start.w - dx).max(MIN_WIDTH);
            r.x = start.x + (start.w - r.w);
        }
        if self.south() {
            r.h = (start.h + dy).max(MIN_HEIGHT);
        }
        if self.north() {
            r.h = (start.h - dy).max(MIN_HEIGHT);
            r.y = start.y + (start.h - r.h);
        }
        r
    }

    /// Handle under `p`, corners taking precedence over edges.
    pub fn at(rect: Rect, p: Point) -> Option<Self> {
        if !rect.inflate(RESIZE_HANDLE / 2.0).contains(p) {
            return None;
        }
        let near_w = p.x - rect.x < RESIZE_HANDLE;
        let near_e = rect.right() - p.x < RESIZE_HANDLE;
        let near_n = p.y - rect.y < RESIZE_HANDLE;
        let near_s = rect.bottom() - p.y < RESIZE_HANDLE;
        Self::iter().find(|edge| {
            let wants = |want: bool, near: bool| !want || near;
            let corner = (edge.west() || edge.east()) && (edge.north() || edge.south());
            wants(edge.west(), near_w)
                && wants(edge.east(), near_e)
                && wants(edge.north(), near_n)
                && wants(edge.south(), near_s)
                && (corner || !((near_w || near_e) && (near_n || near_s)))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, StrumDisplay)]
pub enum WindowControl {
    Close,
    Minimize,
    Fullscreen,
}

impl WindowControl {
    /// Hit box of the control button inside the title bar of `rect`.
    pub fn rect(&self, rect: Rect) -> Rect {
        let slot = *self as usize as f64;
        Rect::new(rect.x + 12.0 + slot * 20.0, rect.y + 13.0, 12.0, 12.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRegion {
    TitleBar,
    Control(WindowControl),
    Resize(ResizeEdge),
    Body,
}

impl WindowRegion {
    pub fn resolve(rect: Rect, fullscreen: bool, p: Point) -> Option<Self> {
        if !fullscreen && let Some(edge) = ResizeEdge::at(rect, p) {
            return Some(Self::Resize(edge));
        }
        if !rect.contains(p) {
            return None;
        }
        if let Some(control) = WindowControl::iter().find(|c| c.rect(rect).contains(p)) {
            return Some(Self::Control(control));
        }
        if p.y < rect.y + TITLEBAR_HEIGHT {
            Some(Self::TitleBar)
        } else {
            Some(Self::Body)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ContentBlock {
    Heading(String),
    Text(String),
    Notice(String),
    Lines(Vec<String>),
}

/// Body region of a window, populated once by its content builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WindowBody {
    pub blocks: Vec<ContentBlock>,
}

impl WindowBody {
    pub fn push(&mut self, block: ContentBlock) {
        self.blocks.push(block);
    }
}

/// What a content builder may know about the window it fills.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowHandle {
    pub app_id: AppId,
    pub title: String,
}

pub type ContentBuilder = Box<dyn FnOnce(&mut WindowBody, &WindowHandle)>;

pub struct OpenRequest {
    pub app_id: AppId,
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub builder: ContentBuilder,
}

impl std::fmt::Debug for OpenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRequest")
            .field("app_id", &self.app_id)
            .field("title", &self.title)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransitionKind {
    Opening,
    Closing,
    Restoring,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub kind: TransitionKind,
    pub started: Instant,
    pub duration: Duration,
}

impl Transition {
    pub fn progress(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        (elapsed / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn is_done(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

/// Transform that flies a minimized window onto its taskbar indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlyOut {
    pub translate: Point,
    pub scale: f64,
}

#[derive(Debug)]
pub struct WindowEntry {
    pub app_id: AppId,
    pub title: String,
    pub rect: Rect,
    pub z_order: u32,
    pub minimized: bool,
    pub fullscreen: bool,
    /// Geometry to return to; only meaningful while fullscreen.
    pub saved_rect: Option<Rect>,
    pub fly_out: Option<FlyOut>,
    pub transition: Option<Transition>,
    pub body: WindowBody,
}

impl WindowEntry {
    pub fn new(app_id: AppId, title: String, rect: Rect, z_order: u32) -> Self {
        Self {
            app_id,
            title,
            rect,
            z_order,
            minimized: false,
            fullscreen: false,
            saved_rect: None,
            fly_out: None,
            transition: None,
            body: WindowBody::default(),
        }
    }

    pub fn handle(&self) -> WindowHandle {
        WindowHandle {
            app_id: self.app_id.clone(),
            title: self.title.clone(),
        }
    }

    pub fn is_closing(&self) -> bool {
        self.transition
            .is_some_and(|t| t.kind == TransitionKind::Closing)
    }

    /// Closing windows are still drawn but no longer count as open.
    pub fn is_live(&self) -> bool {
        !self.is_closing()
    }

    /// Visible and able to receive pointer input.
    pub fn is_interactive(&self) -> bool {
        self.is_live() && !self.minimized
    }

    pub fn region_at(&self, p: Point) -> Option<WindowRegion> {
        WindowRegion::resolve(self.rect, self.fullscreen, p)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Drag {
        app_id: AppId,
        grab_offset: Point,
    },
    Resize {
        app_id: AppId,
        edge: ResizeEdge,
        anchor: Point,
        start: Rect,
    },
}

impl Gesture {
    pub fn app_id(&self) -> &AppId {
        match self {
            Self::Drag { app_id, .. } | Self::Resize { app_id, .. } => app_id,
        }
    }
}

/// Windows keyed by application id; at most one entry per id.
#[derive(Debug, Default)]
pub struct WindowCollection {
    entries: Vec<WindowEntry>,
}

impl WindowCollection {
    pub fn insert(&mut self, entry: WindowEntry) -> Result<&mut WindowEntry, WindowError> {
        if self.contains(&entry.app_id) {
            return Err(WindowError::Duplicate(entry.app_id));
        }
        self.entries.push(entry);
        let last = self.entries.len() - 1;
        Ok(&mut self.entries[last])
    }

    pub fn contains(&self, id: &AppId) -> bool {
        self.entries.iter().any(|e| &e.app_id == id)
    }

    pub fn get(&self, id: &AppId) -> Option<&WindowEntry> {
        self.entries.iter().find(|e| &e.app_id == id)
    }

    pub fn get_mut(&mut self, id: &AppId) -> Option<&mut WindowEntry> {
        self.entries.iter_mut().find(|e| &e.app_id == id)
    }

    pub fn remove(&mut self, id: &AppId) -> Option<WindowEntry> {
        let index = self.entries.iter().position(|e| &e.app_id == id)?;
        Some(self.entries.remove(index))
    }

    /// Entries in open order.
    pub fn iter(&self) -> impl Iterator<Item = &WindowEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut WindowEntry> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_z(&self) -> Option<u32> {
        self.entries.iter().map(|e| e.z_order).max()
    }
}
