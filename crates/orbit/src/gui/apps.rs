use crate::gui::windows::{ContentBlock, OpenRequest, WindowBody, WindowHandle};
use crate::wallpaper::{Wallpaper, WallpaperStyle};
use orbitctl::registry::{AppId, AppRegistry};
use std::collections::HashMap;
use strum::IntoEnumIterator;

pub const PLACEHOLDER_WIDTH: f64 = 520.0;
pub const PLACEHOLDER_HEIGHT: f64 = 380.0;

/// State a content builder may read when its window opens.
#[derive(Debug, Clone, Default)]
pub struct LaunchContext {
    pub wallpaper: Wallpaper,
    /// Label of the application being launched, if it is in the catalog.
    pub label: Option<String>,
}

const ABOUT_FACTS: &[(&str, &str)] = &[
    ("Version", env!("CARGO_PKG_VERSION")),
    ("Shell", "orbit"),
    ("Launcher", "radial, 8 slots"),
    ("Windows", "single instance per app"),
];

type Builder = fn(&mut WindowBody, &WindowHandle, &LaunchContext);

#[derive(Clone, Copy)]
pub struct Presentation {
    pub width: f64,
    pub height: f64,
    pub builder: Builder,
}

impl Presentation {
    const fn new(width: f64, height: f64, builder: Builder) -> Self {
        Self {
            width,
            height,
            builder,
        }
    }
}

/// Presentation descriptors by application id.
pub struct LaunchTable {
    entries: HashMap<AppId, Presentation>,
}

impl Default for LaunchTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LaunchTable {
    pub fn builtin() -> Self {
        let entries = [
            ("terminal", Presentation::new(680.0, 440.0, build_terminal)),
            ("files", Presentation::new(720.0, 480.0, build_files)),
            ("browser", Presentation::new(800.0, 540.0, build_browser)),
            ("monitor", Presentation::new(520.0, 440.0, build_monitor)),
            ("music", Presentation::new(340.0, 480.0, build_music)),
            ("settings", Presentation::new(680.0, 440.0, build_settings)),
        ]
        .into_iter()
        .map(|(id, p)| (AppId::from(id), p))
        .collect();
        Self { entries }
    }

    pub fn get(&self, id: &AppId) -> Option<&Presentation> {
        self.entries.get(id)
    }

    /// Window request for `id`; unknown ids get the placeholder presentation.
    pub fn request(&self, id: &AppId, registry: &AppRegistry, ctx: LaunchContext) -> OpenRequest {
        let label = registry.get(id).map(|app| app.label.to_string());
        let presentation = self.get(id).copied().unwrap_or(Presentation::new(
            PLACEHOLDER_WIDTH,
            PLACEHOLDER_HEIGHT,
            build_placeholder,
        ));
        let ctx = LaunchContext {
            label: label.clone(),
            ..ctx
        };
        OpenRequest {
            app_id: id.clone(),
            title: label.unwrap_or_else(|| id.to_string()),
            width: presentation.width,
            height: presentation.height,
            builder: Box::new(move |body: &mut WindowBody, handle: &WindowHandle| {
                (presentation.builder)(body, handle, &ctx)
            }),
        }
    }
}

fn build_placeholder(body: &mut WindowBody, handle: &WindowHandle, ctx: &LaunchContext) {
    body.push(ContentBlock::Heading(handle.title.clone()));
    let notice = match &ctx.label {
        Some(label) => format!("{label} is not yet implemented"),
        None => "App not available".to_string(),
    };
    body.push(ContentBlock::Notice(notice));
}

fn build_terminal(body: &mut WindowBody, _handle: &WindowHandle, _ctx: &LaunchContext) {
    body.push(ContentBlock::Lines(vec![
        "orbit shell 0.1".to_string(),
        "Type 'help' for a list of commands.".to_string(),
        "user@orbit:~$ ".to_string(),
    ]));
}

fn build_files(body: &mut WindowBody, _handle: &WindowHandle, _ctx: &LaunchContext) {
    body.push(ContentBlock::Heading("Home".to_string()));
    body.push(ContentBlock::Lines(
        ["Desktop", "Documents", "Downloads", "Music", "Pictures", "Videos"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    ));
}

fn build_browser(body: &mut WindowBody, _handle: &WindowHandle, _ctx: &LaunchContext) {
    body.push(ContentBlock::Text("about:blank".to_string()));
    body.push(ContentBlock::Notice("No network connection".to_string()));
}

fn build_monitor(body: &mut WindowBody, _handle: &WindowHandle, _ctx: &LaunchContext) {
    body.push(ContentBlock::Heading("Processes".to_string()));
    body.push(ContentBlock::Lines(vec![
        "orbit        2.1%".to_string(),
        "compositor   1.4%".to_string(),
        "idle        96.5%".to_string(),
    ]));
}

fn build_music(body: &mut WindowBody, _handle: &WindowHandle, _ctx: &LaunchContext) {
    body.push(ContentBlock::Heading("Nothing playing".to_string()));
    body.push(ContentBlock::Text("Your library is empty".to_string()));
}

fn build_settings(body: &mut WindowBody, _handle: &WindowHandle, ctx: &LaunchContext) {
    body.push(ContentBlock::Heading("Wallpaper".to_string()));
    body.push(ContentBlock::Lines(
        WallpaperStyle::iter()
            .map(|style| {
                let marker = if style == ctx.wallpaper.style { "*" } else { " " };
                format!("{marker} {} ({})", style.label(), style.themes().join(", "))
            })
            .collect(),
    ));
    body.push(ContentBlock::Text(format!(
        "Current: {} / {}",
        ctx.wallpaper.style.label(),
        ctx.wallpaper.theme_name()
    )));
    body.push(ContentBlock::Heading("About".to_string()));
    body.push(ContentBlock::Lines(
        ABOUT_FACTS
            .iter()
            .map(|(label, value)| format!("{label:<14}{value}"))
            .collect(),
    ));
}
