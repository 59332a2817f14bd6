use orbitctl::geometry::{Point, Rect};
use orbitctl::registry::AppId;

const ITEM_WIDTH: f64 = 200.0;
const ITEM_HEIGHT: f64 = 24.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    CreateFolder,
    CreateFile,
    ChangeWallpaper,
    DisplaySettings,
    About,
    /// Restores a minimized window.
    Show { app_id: AppId, title: String },
}

impl MenuItem {
    pub fn label(&self) -> String {
        match self {
            Self::CreateFolder => "Create Folder".to_string(),
            Self::CreateFile => "Create File".to_string(),
            Self::ChangeWallpaper => "Change Wallpaper".to_string(),
            Self::DisplaySettings => "Display Settings".to_string(),
            Self::About => "About Orbit".to_string(),
            Self::Show { title, .. } => format!("Show {title}"),
        }
    }
}

/// Desktop context menu, anchored at the click that opened it.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub at: Point,
    pub items: Vec<MenuItem>,
}

impl ContextMenu {
    pub fn new<'a>(at: Point, minimized: impl IntoIterator<Item = (&'a AppId, &'a str)>) -> Self {
        let mut items = vec![
            MenuItem::CreateFolder,
            MenuItem::CreateFile,
            MenuItem::ChangeWallpaper,
            MenuItem::DisplaySettings,
            MenuItem::About,
        ];
        items.extend(minimized.into_iter().map(|(id, title)| MenuItem::Show {
            app_id: id.clone(),
            title: title.to_string(),
        }));
        Self { at, items }
    }

    pub fn item_rect(&self, index: usize) -> Rect {
        Rect::new(
            self.at.x,
            self.at.y + index as f64 * ITEM_HEIGHT,
            ITEM_WIDTH,
            ITEM_HEIGHT,
        )
    }

    pub fn item_at(&self, p: Point) -> Option<usize> {
        (0..self.items.len()).find(|&i| self.item_rect(i).contains(p))
    }
}
