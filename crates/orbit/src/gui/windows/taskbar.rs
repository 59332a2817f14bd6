use super::model::WindowEntry;
use orbitctl::geometry::{Point, Rect};
use orbitctl::registry::AppId;

const PILL_START_X: f64 = 120.0;
const PILL_Y: f64 = 4.0;
const PILL_HEIGHT: f64 = 20.0;
const PILL_PADDING: f64 = 24.0;
const PILL_CHAR_WIDTH: f64 = 7.0;
const PILL_GAP: f64 = 6.0;

/// Where each window's taskbar indicator currently sits on screen.
pub trait TaskbarIndicators {
    fn indicator_rect(&self, app_id: &AppId) -> Option<Rect>;
}

/// No taskbar at all: minimized windows hide without flying anywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIndicators;

impl TaskbarIndicators for NoIndicators {
    fn indicator_rect(&self, _app_id: &AppId) -> Option<Rect> {
        None
    }
}

/// Menubar pills, one per live window in open order, laid out left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenubarPills {
    pills: Vec<(AppId, Rect)>,
}

impl MenubarPills {
    pub fn layout<'a>(windows: impl IntoIterator<Item = &'a WindowEntry>) -> Self {
        let mut x = PILL_START_X;
        let pills = windows
            .into_iter()
            .filter(|w| w.is_live())
            .map(|w| {
                let width = PILL_PADDING + PILL_CHAR_WIDTH * w.title.chars().count() as f64;
                let rect = Rect::new(x, PILL_Y, width, PILL_HEIGHT);
                x += width + PILL_GAP;
                (w.app_id.clone(), rect)
            })
            .collect();
        Self { pills }
    }

    pub fn hit(&self, p: Point) -> Option<&AppId> {
        self.pills
            .iter()
            .find(|(_, rect)| rect.contains(p))
            .map(|(id, _)| id)
    }

    pub fn pills(&self) -> &[(AppId, Rect)] {
        &self.pills
    }
}

impl TaskbarIndicators for MenubarPills {
    fn indicator_rect(&self, app_id: &AppId) -> Option<Rect> {
        self.pills
            .iter()
            .find(|(id, _)| id == app_id)
            .map(|(_, rect)| *rect)
    }
}
