//! The shell controller: owns launcher, windows, drawer and context menu, and routes input
//! between them.

use crate::clock::Clock;
use crate::config::{self, Config, KeyBindings};
use crate::events::{AppEvent, Input};
use crate::gui::apps::{LaunchContext, LaunchTable};
use crate::gui::launcher::{self, LauncherFrame, LauncherState};
use crate::gui::theme::ThemeColors;
use crate::gui::viewport::Viewport;
use crate::gui::windows::{MenubarPills, OpenOutcome, WindowManager};
use crate::wallpaper::{Wallpaper, WallpaperStyle};
use orbitctl::geometry::{Point, Rect};
use orbitctl::registry::{AppId, AppRegistry};
use orbitctl::store::KeyValueStore;
use std::time::Instant;

pub mod dispatch;
pub mod menu;
pub mod snapshot;

pub use dispatch::{InputKind, Mode};
pub use menu::{ContextMenu, MenuItem};
pub use snapshot::ShellSnapshot;

/// Hit box of the logo at the left end of the menubar.
pub const LOGO_RECT: Rect = Rect {
    x: 8.0,
    y: 4.0,
    w: 28.0,
    h: 20.0,
};

/// Observable result of handling an event.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEffect {
    LauncherOpened { center: Point },
    LauncherClosed,
    LaunchStarted(AppId),
    WindowOpened(AppId),
    WindowFocused(AppId),
    WindowRestored(AppId),
    WindowMinimized(AppId),
    WindowClosing(AppId),
    WindowRemoved(AppId),
    FullscreenToggled { app_id: AppId, fullscreen: bool },
    DrawerOpened { query: String },
    DrawerClosed,
    ContextMenuOpened,
    ContextMenuClosed,
    PinsChanged,
    WallpaperChanged(Wallpaper),
    ConfigApplied,
    Redraw,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drawer {
    pub open: bool,
    pub query: String,
}

pub struct Shell {
    launcher: LauncherState,
    windows: WindowManager,
    registry: AppRegistry,
    launch_table: LaunchTable,
    wallpaper: Wallpaper,
    drawer: Drawer,
    context_menu: Option<ContextMenu>,
    viewport: Viewport,
    keys: KeyBindings,
    pointer: Option<Point>,
    theme: ThemeColors,
    clock: Box<dyn Clock>,
    store: Box<dyn KeyValueStore>,
}

impl Shell {
    /// Builds the shell, restoring pins and the wallpaper preference from `store`.
    pub fn new(config: &Config, store: Box<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        let mut registry = AppRegistry::builtin();
        registry.load_pins(store.as_ref());
        let wallpaper = Wallpaper::load(store.as_ref());
        Self {
            launcher: LauncherState::new(),
            windows: WindowManager::new(config.viewport),
            registry,
            launch_table: LaunchTable::builtin(),
            wallpaper,
            drawer: Drawer::default(),
            context_menu: None,
            viewport: config.viewport,
            keys: config.keys,
            pointer: None,
            theme: ThemeColors::default(),
            clock,
            store,
        }
    }

    pub fn launcher(&self) -> &LauncherState {
        &self.launcher
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    pub fn wallpaper(&self) -> Wallpaper {
        self.wallpaper
    }

    pub fn drawer(&self) -> &Drawer {
        &self.drawer
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn keys(&self) -> KeyBindings {
        self.keys
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Whether frames are still needed to advance some animation.
    pub fn is_animating(&self) -> bool {
        self.launcher.is_animating() || self.windows.is_animating()
    }

    pub fn launcher_frame(&self) -> Option<LauncherFrame> {
        launcher::frame(&self.launcher, &self.theme, self.now())
    }

    pub fn pills(&self) -> MenubarPills {
        MenubarPills::layout(self.windows.windows())
    }

    /// Drawer matches for the current query, best first.
    pub fn drawer_results(&self) -> Vec<AppId> {
        self.registry
            .search(&self.drawer.query)
            .into_iter()
            .map(|app| app.id.clone())
            .collect()
    }

    /// Entry point for everything coming from the outside world.
    pub fn apply(&mut self, event: AppEvent) -> Vec<ShellEffect> {
        match event {
            AppEvent::Show => self.show_launcher(),
            AppEvent::Hide => self.hide_launcher(),
            AppEvent::Toggle => self.toggle_launcher(self.pointer),
            AppEvent::Input(input) => self.dispatch(input),
            AppEvent::Launch(id) => self.launch_app(&id),
            AppEvent::Pin(id) => self.pin(&id),
            AppEvent::Unpin(id) => self.unpin(&id),
            AppEvent::MovePin { from, to } => self.move_pin(&from, &to),
            AppEvent::Wallpaper { style, theme } => self.set_wallpaper(style, theme.unwrap_or(0)),
            AppEvent::Dump(reply) => {
                if reply.try_send(self.dump_json()).is_err() {
                    log::warn!("Dump requester went away");
                }
                Vec::new()
            }
            AppEvent::ConfigReload => {
                log::info!("Config changed, reloading");
                self.apply_config(&config::load_or_default())
            }
        }
    }

    pub fn show_launcher(&mut self) -> Vec<ShellEffect> {
        if self.launcher.is_open {
            return Vec::new();
        }
        self.open_launcher(self.pointer)
    }

    pub fn hide_launcher(&mut self) -> Vec<ShellEffect> {
        if self.launcher.is_launching() || !self.launcher.close() {
            return Vec::new();
        }
        vec![ShellEffect::LauncherClosed]
    }

    /// Launcher toggle key: closes an open launcher or opens one around `anchor`.
    pub fn toggle_launcher(&mut self, anchor: Option<Point>) -> Vec<ShellEffect> {
        if self.launcher.is_launching() {
            Vec::new()
        } else if self.launcher.is_open {
            self.hide_launcher()
        } else {
            self.open_launcher(anchor)
        }
    }

    fn open_launcher(&mut self, anchor: Option<Point>) -> Vec<ShellEffect> {
        let mut effects = self.close_context_menu();
        let anchor = anchor.unwrap_or_else(|| self.viewport.center());
        let now = self.now();
        self.launcher
            .open(anchor, &self.viewport, &self.registry, now);
        effects.push(ShellEffect::LauncherOpened {
            center: self.launcher.center,
        });
        effects
    }

    pub fn open_drawer(&mut self, query: String) -> Vec<ShellEffect> {
        let mut effects = self.close_context_menu();
        if self.launcher.close() {
            effects.push(ShellEffect::LauncherClosed);
        }
        self.drawer = Drawer {
            open: true,
            query: query.clone(),
        };
        effects.push(ShellEffect::DrawerOpened { query });
        effects
    }

    pub fn close_drawer(&mut self) -> Vec<ShellEffect> {
        if !self.drawer.open {
            return Vec::new();
        }
        self.drawer = Drawer::default();
        vec![ShellEffect::DrawerClosed]
    }

    fn close_context_menu(&mut self) -> Vec<ShellEffect> {
        match self.context_menu.take() {
            Some(_) => vec![ShellEffect::ContextMenuClosed],
            None => Vec::new(),
        }
    }

    pub fn open_context_menu(&mut self, at: Point) -> Vec<ShellEffect> {
        let minimized: Vec<(AppId, String)> = self
            .windows
            .minimized()
            .map(|w| (w.app_id.clone(), w.title.clone()))
            .collect();
        self.context_menu = Some(ContextMenu::new(
            at,
            minimized.iter().map(|(id, title)| (id, title.as_str())),
        ));
        vec![ShellEffect::ContextMenuOpened]
    }

    pub fn select_menu_item(&mut self, index: usize) -> Vec<ShellEffect> {
        let Some(item) = self
            .context_menu
            .as_ref()
            .and_then(|m| m.items.get(index).cloned())
        else {
            return Vec::new();
        };
        let mut effects = self.close_context_menu();
        match item {
            MenuItem::ChangeWallpaper | MenuItem::DisplaySettings | MenuItem::About => {
                effects.extend(self.launch_app(&AppId::from("settings")));
            }
            MenuItem::Show { app_id, .. } => {
                let now = self.now();
                if self.windows.restore(&app_id, now) {
                    effects.push(ShellEffect::WindowRestored(app_id));
                }
            }
            MenuItem::CreateFolder | MenuItem::CreateFile => {
                log::debug!("'{}' has no effect on the simulated desktop", item.label());
            }
        }
        effects
    }

    /// Opens the window for `id`, or focuses the one already open.
    pub fn launch_app(&mut self, id: &AppId) -> Vec<ShellEffect> {
        let ctx = LaunchContext {
            wallpaper: self.wallpaper,
            label: None,
        };
        let request = self.launch_table.request(id, &self.registry, ctx);
        let now = self.now();
        let effect = match self.windows.open(request, now) {
            OpenOutcome::Created => ShellEffect::WindowOpened(id.clone()),
            OpenOutcome::Focused => ShellEffect::WindowFocused(id.clone()),
            OpenOutcome::Restored => ShellEffect::WindowRestored(id.clone()),
        };
        vec![effect]
    }

    fn save_pins(&self) {
        if let Err(e) = self.registry.save_pins(self.store.as_ref()) {
            log::warn!("Failed to persist pinned apps: {}", e);
        }
    }

    pub fn pin(&mut self, id: &AppId) -> Vec<ShellEffect> {
        match self.registry.pin(id) {
            Ok(true) => {
                self.save_pins();
                vec![ShellEffect::PinsChanged]
            }
            Ok(false) => Vec::new(),
            Err(e) => {
                log::warn!("Cannot pin {}: {}", id, e);
                Vec::new()
            }
        }
    }

    pub fn unpin(&mut self, id: &AppId) -> Vec<ShellEffect> {
        match self.registry.unpin(id) {
            Ok(true) => {
                self.save_pins();
                vec![ShellEffect::PinsChanged]
            }
            Ok(false) => Vec::new(),
            Err(e) => {
                log::warn!("Cannot unpin {}: {}", id, e);
                Vec::new()
            }
        }
    }

    /// Drawer drag-and-drop: `from` takes the ring position of `to`.
    pub fn move_pin(&mut self, from: &AppId, to: &AppId) -> Vec<ShellEffect> {
        match self.registry.move_pin(from, to) {
            Ok(true) => {
                self.save_pins();
                vec![ShellEffect::PinsChanged]
            }
            Ok(false) => Vec::new(),
            Err(e) => {
                log::warn!("Cannot reorder {}: {}", from, e);
                Vec::new()
            }
        }
    }

    pub fn set_wallpaper(&mut self, style: WallpaperStyle, theme: usize) -> Vec<ShellEffect> {
        let Some(wallpaper) = Wallpaper::new(style, theme) else {
            log::warn!("Wallpaper style {} has no theme {}", style, theme);
            return Vec::new();
        };
        if wallpaper == self.wallpaper {
            return Vec::new();
        }
        self.wallpaper = wallpaper;
        if let Err(e) = wallpaper.save(self.store.as_ref()) {
            log::warn!("Failed to persist wallpaper: {}", e);
        }
        vec![ShellEffect::WallpaperChanged(wallpaper)]
    }

    /// Takes a new viewport and key bindings without disturbing open windows.
    pub fn apply_config(&mut self, config: &Config) -> Vec<ShellEffect> {
        self.viewport = config.viewport;
        self.keys = config.keys;
        self.windows.set_viewport(config.viewport);
        vec![ShellEffect::ConfigApplied]
    }

    /// Called by the visual layer once the launcher's closing transition has played.
    pub fn finish_launcher_close(&mut self) {
        self.launcher.finish_close_transition();
    }

    pub fn mode(&self) -> Mode {
        Mode::of(self)
    }

    pub fn snapshot(&self) -> ShellSnapshot {
        ShellSnapshot::capture(self)
    }

    pub fn dump_json(&self) -> String {
        match serde_json::to_string(&self.snapshot()) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize shell state: {}", e);
                "{}".to_string()
            }
        }
    }
}
