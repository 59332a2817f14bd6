use orbit::clock::ManualClock;
use orbit::config::Config;
use orbit::events::{AppEvent, Button, Input, Key};
use orbit::gui::shell::{LOGO_RECT, Mode, Shell, ShellEffect};
use orbit::gui::windows::TransitionKind;
use orbitctl::geometry::{Point, Rect};
use orbitctl::registry::AppId;
use orbitctl::store::MemoryStore;

fn shell() -> (Shell, ManualClock) {
    let clock = ManualClock::new();
    let shell = Shell::new(
        &Config::default(),
        Box::new(MemoryStore::new()),
        Box::new(clock.clone()),
    );
    (shell, clock)
}

fn input(shell: &mut Shell, input: Input) -> Vec<ShellEffect> {
    shell.apply(AppEvent::Input(input))
}

fn key(shell: &mut Shell, k: Key) -> Vec<ShellEffect> {
    input(shell, Input::Key(k))
}

fn terminal() -> AppId {
    AppId::from("terminal")
}

#[test]
fn keyboard_launch_opens_window_after_grace_period() {
    let (mut shell, clock) = shell();

    let effects = shell.apply(AppEvent::Toggle);
    assert!(effects.contains(&ShellEffect::LauncherOpened {
        center: Point::new(960.0, 540.0)
    }));
    assert_eq!(shell.mode(), Mode::Launcher);

    key(&mut shell, Key::Right);
    assert_eq!(shell.launcher().hovered_slot, Some(0));
    let effects = key(&mut shell, Key::Enter);
    assert_eq!(effects, vec![ShellEffect::LaunchStarted(terminal())]);

    // input during the launch pulse is ignored
    assert!(key(&mut shell, Key::Escape).is_empty());
    assert!(key(&mut shell, Key::Right).is_empty());

    clock.advance_ms(100);
    let effects = input(&mut shell, Input::Frame);
    assert!(!effects.contains(&ShellEffect::WindowOpened(terminal())));
    assert_eq!(shell.windows().count(), 0);

    clock.advance_ms(120);
    let effects = input(&mut shell, Input::Frame);
    assert!(effects.contains(&ShellEffect::LauncherClosed));
    assert!(effects.contains(&ShellEffect::WindowOpened(terminal())));
    assert_eq!(shell.mode(), Mode::Desktop);

    let window = shell.windows().get(&terminal()).unwrap();
    assert_eq!(window.rect, Rect::new(620.0, 320.0, 680.0, 440.0));
}

#[test]
fn pointer_launch_uses_slot_under_cursor() {
    let (mut shell, clock) = shell();
    shell.apply(AppEvent::Toggle);
    clock.advance_ms(400);

    let frame = shell.launcher_frame().unwrap();
    let target = frame.slots[2].center;
    let id = shell.launcher().slots[2].app.id.clone();

    let effects = input(&mut shell, Input::PointerMove(target));
    assert_eq!(effects, vec![ShellEffect::Redraw]);
    assert_eq!(shell.launcher().hovered_slot, Some(2));

    let effects = input(&mut shell, Input::PointerDown(target, Button::Primary));
    assert_eq!(effects, vec![ShellEffect::LaunchStarted(id.clone())]);

    clock.advance_ms(220);
    let effects = input(&mut shell, Input::Frame);
    assert!(effects.contains(&ShellEffect::WindowOpened(id)));
}

#[test]
fn relaunch_focuses_existing_window() {
    let (mut shell, _clock) = shell();
    shell.apply(AppEvent::Launch(terminal()));
    shell.apply(AppEvent::Launch(AppId::from("files")));
    assert_eq!(shell.windows().count(), 2);

    let effects = shell.apply(AppEvent::Launch(terminal()));
    assert_eq!(effects, vec![ShellEffect::WindowFocused(terminal())]);
    assert_eq!(shell.windows().count(), 2);
    assert_eq!(shell.windows().top_window(), Some(terminal()));
}

#[test]
fn escape_unwinds_one_layer_at_a_time() {
    let (mut shell, clock) = shell();
    shell.apply(AppEvent::Launch(terminal()));

    // context menu first
    let effects = input(
        &mut shell,
        Input::PointerDown(Point::new(100.0, 900.0), Button::Secondary),
    );
    assert_eq!(effects, vec![ShellEffect::ContextMenuOpened]);
    assert_eq!(key(&mut shell, Key::Escape), vec![ShellEffect::ContextMenuClosed]);
    assert_eq!(shell.windows().count(), 1);

    // then the focused window, even with the launcher open
    shell.apply(AppEvent::Toggle);
    assert_eq!(
        key(&mut shell, Key::Escape),
        vec![ShellEffect::WindowClosing(terminal())]
    );
    assert_eq!(shell.windows().count(), 0);
    assert_eq!(shell.mode(), Mode::Launcher);

    // then the launcher
    assert_eq!(key(&mut shell, Key::Escape), vec![ShellEffect::LauncherClosed]);
    assert!(key(&mut shell, Key::Escape).is_empty());

    clock.advance_ms(300);
    let effects = input(&mut shell, Input::Frame);
    assert!(effects.contains(&ShellEffect::WindowRemoved(terminal())));
    assert!(shell.windows().get(&terminal()).is_none());
}

#[test]
fn escape_closes_drawer_after_windows() {
    let (mut shell, _clock) = shell();
    shell.apply(AppEvent::Launch(terminal()));

    key(&mut shell, Key::Tab);
    assert_eq!(shell.mode(), Mode::Drawer);
    key(&mut shell, Key::Char('c'));
    key(&mut shell, Key::Char('h'));
    assert_eq!(shell.drawer().query, "ch");

    assert_eq!(
        key(&mut shell, Key::Escape),
        vec![ShellEffect::WindowClosing(terminal())]
    );
    assert_eq!(key(&mut shell, Key::Escape), vec![ShellEffect::DrawerClosed]);
    assert_eq!(shell.mode(), Mode::Desktop);
}

#[test]
fn typing_in_launcher_moves_to_drawer() {
    let (mut shell, _clock) = shell();
    shell.apply(AppEvent::Toggle);

    let effects = key(&mut shell, Key::Char('m'));
    assert_eq!(
        effects,
        vec![
            ShellEffect::LauncherClosed,
            ShellEffect::DrawerOpened { query: "m".into() }
        ]
    );
    key(&mut shell, Key::Char('u'));
    assert_eq!(shell.drawer_results().first(), Some(&AppId::from("music")));

    let effects = key(&mut shell, Key::Enter);
    assert!(effects.contains(&ShellEffect::DrawerClosed));
    assert!(effects.contains(&ShellEffect::WindowOpened(AppId::from("music"))));
}

#[test]
fn title_bar_drag_moves_window() {
    let (mut shell, _clock) = shell();
    shell.apply(AppEvent::Launch(terminal()));

    let grab = Point::new(900.0, 335.0);
    let effects = input(&mut shell, Input::PointerDown(grab, Button::Primary));
    assert_eq!(effects, vec![ShellEffect::WindowFocused(terminal())]);
    assert_eq!(shell.mode(), Mode::Dragging);

    input(&mut shell, Input::PointerMove(Point::new(1000.0, 435.0)));
    let rect = shell.windows().get(&terminal()).unwrap().rect;
    assert_eq!((rect.x, rect.y), (720.0, 420.0));

    // the title bar never goes above the menubar
    input(&mut shell, Input::PointerMove(Point::new(1000.0, 0.0)));
    let rect = shell.windows().get(&terminal()).unwrap().rect;
    assert_eq!(rect.y, 28.0);

    input(&mut shell, Input::PointerUp(Point::new(1000.0, 0.0)));
    assert_eq!(shell.mode(), Mode::Desktop);
}

#[test]
fn double_click_title_bar_toggles_fullscreen() {
    let (mut shell, _clock) = shell();
    shell.apply(AppEvent::Launch(terminal()));
    let title_bar = Point::new(900.0, 335.0);

    let effects = input(&mut shell, Input::DoubleClick(title_bar));
    assert_eq!(
        effects,
        vec![ShellEffect::FullscreenToggled {
            app_id: terminal(),
            fullscreen: true
        }]
    );
    let rect = shell.windows().get(&terminal()).unwrap().rect;
    assert_eq!(rect, Rect::new(0.0, 28.0, 1920.0, 1052.0));

    input(&mut shell, Input::DoubleClick(Point::new(900.0, 40.0)));
    let rect = shell.windows().get(&terminal()).unwrap().rect;
    assert_eq!(rect, Rect::new(620.0, 320.0, 680.0, 440.0));
}

fn click(shell: &mut Shell, p: Point) -> Vec<ShellEffect> {
    input(shell, Input::PointerDown(p, Button::Primary))
}

#[test]
fn title_bar_controls_act_on_window() {
    let (mut shell, _clock) = shell();
    shell.apply(AppEvent::Launch(terminal()));

    // controls sit in the title bar of the window at (620, 320)
    let effects = click(&mut shell, Point::new(678.0, 339.0));
    assert_eq!(
        effects,
        vec![
            ShellEffect::WindowFocused(terminal()),
            ShellEffect::FullscreenToggled {
                app_id: terminal(),
                fullscreen: true
            }
        ]
    );
    assert_eq!(shell.mode(), Mode::Desktop);

    // fullscreen moves the close button to the top left of the work area
    let effects = click(&mut shell, Point::new(18.0, 47.0));
    assert_eq!(
        effects,
        vec![
            ShellEffect::WindowFocused(terminal()),
            ShellEffect::WindowClosing(terminal())
        ]
    );
    assert_eq!(shell.windows().count(), 0);
    assert_eq!(shell.mode(), Mode::Desktop);
}

#[test]
fn minimize_then_restore_from_menubar() {
    let (mut shell, _clock) = shell();
    shell.apply(AppEvent::Launch(terminal()));

    let effects = click(&mut shell, Point::new(658.0, 339.0));
    assert_eq!(
        effects,
        vec![
            ShellEffect::WindowFocused(terminal()),
            ShellEffect::WindowMinimized(terminal())
        ]
    );
    let window = shell.windows().get(&terminal()).unwrap();
    assert!(window.minimized);
    // "Terminal" pill is 80 px wide at x = 120, so it is centred on (160, 14)
    let fly_out = window.fly_out.unwrap();
    assert_eq!(fly_out.translate, Point::new(-800.0, -526.0));
    assert_eq!(fly_out.scale, 0.08);

    // the logo opens the launcher at the middle of the screen, wherever the pointer is
    let effects = click(&mut shell, LOGO_RECT.center());
    assert_eq!(
        effects,
        vec![ShellEffect::LauncherOpened {
            center: Point::new(960.0, 540.0)
        }]
    );
    assert_eq!(key(&mut shell, Key::Escape), vec![ShellEffect::LauncherClosed]);

    let pill = Point::new(150.0, 14.0);
    assert_eq!(click(&mut shell, pill), vec![ShellEffect::WindowRestored(terminal())]);
    let window = shell.windows().get(&terminal()).unwrap();
    assert!(!window.minimized);
    assert_eq!(window.transition.map(|t| t.kind), Some(TransitionKind::Restoring));

    // a pill for a visible window only raises it
    assert_eq!(click(&mut shell, pill), vec![ShellEffect::WindowFocused(terminal())]);
}

#[test]
fn resize_handle_drag_resizes_window() {
    let (mut shell, _clock) = shell();
    shell.apply(AppEvent::Launch(terminal()));

    // two pixels inside the right edge at x = 1300
    let effects = click(&mut shell, Point::new(1298.0, 500.0));
    assert_eq!(effects, vec![ShellEffect::WindowFocused(terminal())]);
    assert_eq!(shell.mode(), Mode::Resizing);

    let effects = input(&mut shell, Input::PointerMove(Point::new(1398.0, 520.0)));
    assert_eq!(effects, vec![ShellEffect::Redraw]);
    let rect = shell.windows().get(&terminal()).unwrap().rect;
    assert_eq!(rect, Rect::new(620.0, 320.0, 780.0, 440.0));

    // shrinking stops at the minimum width
    input(&mut shell, Input::PointerMove(Point::new(700.0, 500.0)));
    let rect = shell.windows().get(&terminal()).unwrap().rect;
    assert_eq!(rect, Rect::new(620.0, 320.0, 320.0, 440.0));

    input(&mut shell, Input::PointerUp(Point::new(700.0, 500.0)));
    assert_eq!(shell.mode(), Mode::Desktop);
}

#[test]
fn slots_enter_with_stagger() {
    let (mut shell, clock) = shell();
    shell.apply(AppEvent::Toggle);
    clock.advance_ms(200);

    let frame = shell.launcher_frame().unwrap();
    assert_eq!(frame.slots.len(), 6);
    assert!((frame.slots[0].scale - 1.0).abs() < 1e-9);
    assert!(frame.slots[5].scale < 1.0);
    assert!(frame.slots.windows(2).all(|w| w[0].scale >= w[1].scale));
}

#[test]
fn pins_survive_restart() {
    let clock = ManualClock::new();
    let store = MemoryStore::new();
    let mut shell = Shell::new(
        &Config::default(),
        Box::new(store.clone()),
        Box::new(clock.clone()),
    );
    shell.apply(AppEvent::Pin(AppId::from("chess")));
    shell.apply(AppEvent::Unpin(terminal()));

    let reopened = Shell::new(&Config::default(), Box::new(store), Box::new(clock));
    let pinned = reopened.registry().pinned_order();
    assert!(pinned.contains(&AppId::from("chess")));
    assert!(!pinned.contains(&terminal()));
}
