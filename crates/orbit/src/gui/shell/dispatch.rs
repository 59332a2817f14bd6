use super::{LOGO_RECT, Shell, ShellEffect};
use crate::events::{Button, Input, Key};
use crate::gui::launcher::{LauncherAction, Nav};
use crate::gui::viewport::MENUBAR_HEIGHT;
use crate::gui::windows::{Gesture, WindowControl, WindowRegion};
use orbitctl::geometry::Point;
use orbitctl::registry::AppId;
use serde::Serialize;
use std::time::Instant;

/// Which component currently owns input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Desktop,
    Launcher,
    Drawer,
    Dragging,
    Resizing,
}

impl Mode {
    pub fn of(shell: &Shell) -> Self {
        match shell.windows.gesture() {
            Some(Gesture::Drag { .. }) => Self::Dragging,
            Some(Gesture::Resize { .. }) => Self::Resizing,
            None if shell.launcher.is_open => Self::Launcher,
            None if shell.drawer.open => Self::Drawer,
            None => Self::Desktop,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Cancel,
    DrawerToggle,
    LauncherToggle,
    Navigate,
    Activate,
    Char,
    PointerMove,
    PointerDown,
    PointerUp,
    DoubleClick,
    Frame,
}

impl InputKind {
    /// Keys not bound to anything classify as `None`.
    pub fn classify(input: &Input, shell: &Shell) -> Option<Self> {
        let kind = match input {
            Input::PointerMove(_) => Self::PointerMove,
            Input::PointerDown(..) => Self::PointerDown,
            Input::PointerUp(_) => Self::PointerUp,
            Input::DoubleClick(_) => Self::DoubleClick,
            Input::Frame => Self::Frame,
            Input::Key(Key::Escape) => Self::Cancel,
            Input::Key(k) if *k == shell.keys.drawer.key() => Self::DrawerToggle,
            Input::Key(k) if *k == shell.keys.launcher.key() => Self::LauncherToggle,
            Input::Key(Key::Left | Key::Right | Key::Up | Key::Down) => Self::Navigate,
            Input::Key(Key::Enter) => Self::Activate,
            Input::Key(Key::Char(_)) => Self::Char,
            Input::Key(_) => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Any,
    In(Mode),
}

impl Scope {
    fn admits(&self, mode: Mode) -> bool {
        match self {
            Self::Any => true,
            Self::In(m) => *m == mode,
        }
    }
}

type Handler = fn(&mut Shell, &Input, Instant) -> Vec<ShellEffect>;

/// First matching row wins. Pairs without a row are ignored.
const ROUTES: &[(Scope, InputKind, Handler)] = &[
    (Scope::Any, InputKind::Frame, on_frame),
    (Scope::Any, InputKind::Cancel, on_cancel),
    (Scope::In(Mode::Dragging), InputKind::PointerMove, on_gesture_move),
    (Scope::In(Mode::Resizing), InputKind::PointerMove, on_gesture_move),
    (Scope::In(Mode::Dragging), InputKind::PointerUp, on_gesture_end),
    (Scope::In(Mode::Resizing), InputKind::PointerUp, on_gesture_end),
    (Scope::In(Mode::Launcher), InputKind::PointerMove, on_launcher_hover),
    (Scope::In(Mode::Launcher), InputKind::PointerDown, on_launcher_click),
    (Scope::In(Mode::Launcher), InputKind::Navigate, on_launcher_navigate),
    (Scope::In(Mode::Launcher), InputKind::Activate, on_launcher_activate),
    (Scope::In(Mode::Launcher), InputKind::Char, on_launcher_char),
    (Scope::In(Mode::Launcher), InputKind::LauncherToggle, on_launcher_toggle),
    (Scope::In(Mode::Launcher), InputKind::DrawerToggle, on_drawer_toggle),
    (Scope::In(Mode::Drawer), InputKind::DrawerToggle, on_drawer_toggle),
    (Scope::In(Mode::Drawer), InputKind::Char, on_drawer_char),
    (Scope::In(Mode::Drawer), InputKind::Activate, on_drawer_activate),
    (Scope::In(Mode::Desktop), InputKind::LauncherToggle, on_launcher_toggle),
    (Scope::In(Mode::Desktop), InputKind::DrawerToggle, on_drawer_toggle),
    (Scope::In(Mode::Desktop), InputKind::PointerDown, on_desktop_pointer_down),
    (Scope::In(Mode::Desktop), InputKind::DoubleClick, on_desktop_double_click),
];

pub fn route(mode: Mode, kind: InputKind) -> Option<Handler> {
    ROUTES
        .iter()
        .find(|(scope, k, _)| *k == kind && scope.admits(mode))
        .map(|(_, _, handler)| *handler)
}

fn position(input: &Input) -> Option<Point> {
    match input {
        Input::PointerMove(p)
        | Input::PointerDown(p, _)
        | Input::PointerUp(p)
        | Input::DoubleClick(p) => Some(*p),
        Input::Key(_) | Input::Frame => None,
    }
}

impl Shell {
    pub fn dispatch(&mut self, input: Input) -> Vec<ShellEffect> {
        if let Some(p) = position(&input) {
            self.pointer = Some(p);
        }
        let Some(kind) = InputKind::classify(&input, self) else {
            return Vec::new();
        };
        let mode = self.mode();
        match route(mode, kind) {
            Some(handler) => {
                let now = self.now();
                handler(self, &input, now)
            }
            None => Vec::new(),
        }
    }
}

fn on_frame(shell: &mut Shell, _input: &Input, now: Instant) -> Vec<ShellEffect> {
    let mut effects = Vec::new();
    if let Some(id) = shell.launcher.tick(now) {
        log::info!("Launching {}", id);
        effects.push(ShellEffect::LauncherClosed);
        effects.extend(shell.launch_app(&id));
    }
    effects.extend(
        shell
            .windows
            .tick(now)
            .into_iter()
            .map(ShellEffect::WindowRemoved),
    );
    if effects.is_empty() && shell.launcher.is_open {
        effects.push(ShellEffect::Redraw);
    }
    effects
}

/// Context menu, then the focused window, then the drawer, then the launcher; one per event.
fn on_cancel(shell: &mut Shell, _input: &Input, now: Instant) -> Vec<ShellEffect> {
    if shell.context_menu.is_some() {
        return shell.close_context_menu();
    }
    if let Some(id) = shell.windows.top_window()
        && shell.windows.close(&id, now)
    {
        return vec![ShellEffect::WindowClosing(id)];
    }
    if shell.drawer.open {
        return shell.close_drawer();
    }
    shell.hide_launcher()
}

fn on_gesture_move(shell: &mut Shell, input: &Input, _now: Instant) -> Vec<ShellEffect> {
    match position(input) {
        Some(p) if shell.windows.update_gesture(p) => vec![ShellEffect::Redraw],
        _ => Vec::new(),
    }
}

fn on_gesture_end(shell: &mut Shell, _input: &Input, _now: Instant) -> Vec<ShellEffect> {
    if let Some(gesture) = shell.windows.end_gesture() {
        log::debug!("Gesture on {} ended", gesture.app_id());
    }
    Vec::new()
}

fn on_launcher_hover(shell: &mut Shell, input: &Input, _now: Instant) -> Vec<ShellEffect> {
    let Some(p) = position(input) else {
        return Vec::new();
    };
    if shell.launcher.update_cursor(p).should_redraw {
        vec![ShellEffect::Redraw]
    } else {
        Vec::new()
    }
}

fn on_launcher_click(shell: &mut Shell, input: &Input, now: Instant) -> Vec<ShellEffect> {
    let Input::PointerDown(p, Button::Primary) = input else {
        return Vec::new();
    };
    match shell.launcher.click(*p, now) {
        LauncherAction::None => Vec::new(),
        LauncherAction::Closed => vec![ShellEffect::LauncherClosed],
        LauncherAction::OpenDrawer(query) => {
            let mut effects = vec![ShellEffect::LauncherClosed];
            effects.extend(shell.open_drawer(query));
            effects
        }
        LauncherAction::Launching(i) => launch_started(shell, i),
    }
}

fn launch_started(shell: &Shell, index: usize) -> Vec<ShellEffect> {
    shell
        .launcher
        .slots
        .get(index)
        .map(|slot| vec![ShellEffect::LaunchStarted(slot.app.id.clone())])
        .unwrap_or_default()
}

fn on_launcher_navigate(shell: &mut Shell, input: &Input, _now: Instant) -> Vec<ShellEffect> {
    let nav = match input {
        Input::Key(Key::Right | Key::Down) => Nav::Forward,
        Input::Key(Key::Left | Key::Up) => Nav::Backward,
        _ => return Vec::new(),
    };
    if shell.launcher.navigate(nav) {
        vec![ShellEffect::Redraw]
    } else {
        Vec::new()
    }
}

fn on_launcher_activate(shell: &mut Shell, _input: &Input, now: Instant) -> Vec<ShellEffect> {
    match shell.launcher.activate(now) {
        Some(i) => launch_started(shell, i),
        None => Vec::new(),
    }
}

fn on_launcher_char(shell: &mut Shell, input: &Input, _now: Instant) -> Vec<ShellEffect> {
    let Input::Key(Key::Char(c)) = input else {
        return Vec::new();
    };
    match shell.launcher.type_char(*c) {
        Some(prefix) => {
            let mut effects = vec![ShellEffect::LauncherClosed];
            effects.extend(shell.open_drawer(prefix));
            effects
        }
        None => Vec::new(),
    }
}

fn on_launcher_toggle(shell: &mut Shell, _input: &Input, _now: Instant) -> Vec<ShellEffect> {
    let anchor = shell.pointer;
    shell.toggle_launcher(anchor)
}

fn on_drawer_toggle(shell: &mut Shell, _input: &Input, _now: Instant) -> Vec<ShellEffect> {
    if shell.launcher.is_launching() {
        Vec::new()
    } else if shell.drawer.open {
        shell.close_drawer()
    } else {
        shell.open_drawer(String::new())
    }
}

fn on_drawer_char(shell: &mut Shell, input: &Input, _now: Instant) -> Vec<ShellEffect> {
    let Input::Key(Key::Char(c)) = input else {
        return Vec::new();
    };
    shell.drawer.query.push(*c);
    vec![ShellEffect::Redraw]
}

/// Enter in the drawer launches the best match.
fn on_drawer_activate(shell: &mut Shell, _input: &Input, _now: Instant) -> Vec<ShellEffect> {
    let Some(id) = shell.drawer_results().into_iter().next() else {
        return Vec::new();
    };
    let mut effects = shell.close_drawer();
    effects.extend(shell.launch_app(&id));
    effects
}

fn on_desktop_pointer_down(shell: &mut Shell, input: &Input, now: Instant) -> Vec<ShellEffect> {
    let Input::PointerDown(p, button) = *input else {
        return Vec::new();
    };

    let mut effects = Vec::new();
    if let Some(hit) = shell.context_menu.as_ref().map(|menu| menu.item_at(p)) {
        if button == Button::Primary
            && let Some(index) = hit
        {
            return shell.select_menu_item(index);
        }
        effects.extend(shell.close_context_menu());
    }

    match button {
        Button::Primary => effects.extend(primary_down(shell, p, now)),
        Button::Secondary => {
            if p.y >= MENUBAR_HEIGHT && shell.windows.hit_test(p).is_none() {
                effects.extend(shell.open_context_menu(p));
            }
        }
    }
    effects
}

fn primary_down(shell: &mut Shell, p: Point, now: Instant) -> Vec<ShellEffect> {
    if p.y < MENUBAR_HEIGHT {
        return menubar_click(shell, p, now);
    }
    let Some((id, region)) = shell.windows.hit_test(p) else {
        return Vec::new();
    };
    shell.windows.bring_to_front(&id);
    let mut effects = vec![ShellEffect::WindowFocused(id.clone())];
    match region {
        WindowRegion::TitleBar => {
            shell.windows.begin_drag(&id, p);
        }
        WindowRegion::Resize(edge) => {
            shell.windows.begin_resize(&id, edge, p);
        }
        WindowRegion::Control(WindowControl::Close) => {
            if shell.windows.close(&id, now) {
                effects.push(ShellEffect::WindowClosing(id));
            }
        }
        WindowRegion::Control(WindowControl::Minimize) => {
            let pills = shell.pills();
            if shell.windows.minimize(&id, &pills) {
                effects.push(ShellEffect::WindowMinimized(id));
            }
        }
        WindowRegion::Control(WindowControl::Fullscreen) => {
            effects.extend(toggle_fullscreen(shell, id));
        }
        WindowRegion::Body => {}
    }
    effects
}

fn menubar_click(shell: &mut Shell, p: Point, now: Instant) -> Vec<ShellEffect> {
    if LOGO_RECT.contains(p) {
        let center = shell.viewport.center();
        return shell.toggle_launcher(Some(center));
    }
    let Some(id) = shell.pills().hit(p).cloned() else {
        return Vec::new();
    };
    if shell.windows.restore(&id, now) {
        vec![ShellEffect::WindowRestored(id)]
    } else if shell.windows.bring_to_front(&id) {
        vec![ShellEffect::WindowFocused(id)]
    } else {
        Vec::new()
    }
}

fn toggle_fullscreen(shell: &mut Shell, id: AppId) -> Vec<ShellEffect> {
    if !shell.windows.toggle_fullscreen(&id) {
        return Vec::new();
    }
    let fullscreen = shell.windows.get(&id).is_some_and(|w| w.fullscreen);
    vec![ShellEffect::FullscreenToggled {
        app_id: id,
        fullscreen,
    }]
}

/// Double-clicking a title bar toggles fullscreen.
fn on_desktop_double_click(shell: &mut Shell, input: &Input, _now: Instant) -> Vec<ShellEffect> {
    let Some(p) = position(input) else {
        return Vec::new();
    };
    match shell.windows.hit_test(p) {
        Some((id, WindowRegion::TitleBar)) => toggle_fullscreen(shell, id),
        _ => Vec::new(),
    }
}
