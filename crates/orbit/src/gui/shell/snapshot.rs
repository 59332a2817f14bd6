use super::{Mode, Shell};
use crate::gui::launcher::CenterContent;
use crate::gui::windows::TransitionKind;
use crate::wallpaper::Wallpaper;
use orbitctl::geometry::{Point, Rect};
use serde::Serialize;

/// Serializable view of the whole shell, as answered to `dump`.
#[derive(Debug, Clone, Serialize)]
pub struct ShellSnapshot {
    pub mode: Mode,
    pub launcher: Option<LauncherSnapshot>,
    pub drawer: Option<DrawerSnapshot>,
    pub context_menu: Option<Vec<String>>,
    pub windows: Vec<WindowSnapshot>,
    pub pinned: Vec<String>,
    pub wallpaper: WallpaperSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct LauncherSnapshot {
    pub center: Point,
    pub hovered: Option<usize>,
    pub launching: Option<usize>,
    pub center_label: String,
    pub slots: Vec<SlotSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotSnapshot {
    pub app_id: String,
    pub label: String,
    pub scale: f64,
    pub alpha: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DrawerSnapshot {
    pub query: String,
    pub results: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowSnapshot {
    pub app_id: String,
    pub title: String,
    pub rect: Rect,
    pub z_order: u32,
    pub minimized: bool,
    pub fullscreen: bool,
    pub transition: Option<TransitionKind>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WallpaperSnapshot {
    pub style: String,
    pub theme: String,
}

impl From<Wallpaper> for WallpaperSnapshot {
    fn from(wp: Wallpaper) -> Self {
        Self {
            style: wp.style.to_string(),
            theme: wp.theme_name().to_string(),
        }
    }
}

impl ShellSnapshot {
    pub fn capture(shell: &Shell) -> Self {
        let launcher = shell.launcher_frame().map(|frame| LauncherSnapshot {
            center: frame.center,
            hovered: shell.launcher.hovered_slot,
            launching: shell.launcher.launching_slot,
            center_label: match frame.center_content {
                CenterContent::App(label) => label,
                CenterContent::AllApps { .. } => "All Apps".to_string(),
            },
            slots: frame
                .slots
                .into_iter()
                .zip(&shell.launcher.slots)
                .map(|(visual, slot)| SlotSnapshot {
                    app_id: slot.app.id.to_string(),
                    label: visual.label,
                    scale: visual.scale,
                    alpha: visual.alpha,
                })
                .collect(),
        });
        let drawer = shell.drawer.open.then(|| DrawerSnapshot {
            query: shell.drawer.query.clone(),
            results: shell
                .drawer_results()
                .into_iter()
                .map(|id| id.to_string())
                .collect(),
        });
        let mut windows: Vec<WindowSnapshot> = shell
            .windows
            .windows()
            .map(|w| WindowSnapshot {
                app_id: w.app_id.to_string(),
                title: w.title.clone(),
                rect: w.rect,
                z_order: w.z_order,
                minimized: w.minimized,
                fullscreen: w.fullscreen,
                transition: w.transition.map(|t| t.kind),
            })
            .collect();
        windows.sort_by_key(|w| w.z_order);

        Self {
            mode: shell.mode(),
            launcher,
            drawer,
            context_menu: shell
                .context_menu
                .as_ref()
                .map(|m| m.items.iter().map(|i| i.label()).collect()),
            windows,
            pinned: shell
                .registry
                .pinned_order()
                .iter()
                .map(|id| id.to_string())
                .collect(),
            wallpaper: shell.wallpaper.into(),
        }
    }
}
