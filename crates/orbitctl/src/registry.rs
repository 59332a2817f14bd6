use crate::icon::{self, IconName};
use crate::store::{self, KeyValueStore, StoreError};
use derive_more::{AsRef, Deref, Display, From, Into};
use palette::Srgb;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

/// Most applications the launcher ring can show at once.
pub const MAX_RING: usize = 8;

pub const PINNED_KEY: &str = "orbit.pinned";

const NEUTRAL_ACCENT: Srgb<u8> = Srgb::new(0x8e, 0x8e, 0x93);

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct AppId(String);

crate::impl_string_newtype!(AppId);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct AppLabel(String);

crate::impl_string_newtype!(AppLabel);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Category {
    System,
    Internet,
    Media,
    Graphics,
    Dev,
    Office,
    Games,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::System => "System",
            Self::Internet => "Internet",
            Self::Media => "Media",
            Self::Graphics => "Graphics",
            Self::Dev => "Development",
            Self::Office => "Office",
            Self::Games => "Games",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppDescriptor {
    pub id: AppId,
    pub label: AppLabel,
    pub accent: Srgb<u8>,
    pub icon: Option<IconName>,
    pub category: Category,
    pub pinned: bool,
    pub keywords: Vec<String>,
}

impl AppDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>, category: Category) -> Self {
        Self {
            id: AppId::new(id),
            label: AppLabel::new(label),
            accent: NEUTRAL_ACCENT,
            icon: None,
            category,
            pinned: false,
            keywords: Vec::new(),
        }
    }

    /// Accepts `#rrggbb`; anything unparseable keeps the neutral accent.
    pub fn with_accent(mut self, hex: &str) -> Self {
        self.accent = Srgb::from_str(hex).unwrap_or(NEUTRAL_ACCENT);
        self
    }

    pub fn with_icon(mut self, name: &str) -> Self {
        self.icon = icon::find_icon(&IconName::from(name));
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Drawer search relevance; 0 means no match.
    pub fn search_score(&self, query: &str) -> u32 {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return 0;
        }
        let label = self.label.to_lowercase();
        if label.starts_with(&q) {
            100
        } else if label.contains(&q) {
            60
        } else if self.keywords.iter().any(|k| k.contains(&q)) {
            40
        } else if self.category.label().to_lowercase().contains(&q) {
            20
        } else {
            0
        }
    }
}

struct CatalogEntry {
    id: &'static str,
    label: &'static str,
    accent: &'static str,
    icon: Option<&'static str>,
    category: Category,
    pinned: bool,
    keywords: &'static [&'static str],
}

macro_rules! catalog {
    ($(($id:literal, $label:literal, $accent:literal, $icon:expr, $cat:ident, $pinned:literal, [$($kw:literal),*])),* $(,)?) => {
        &[$(CatalogEntry {
            id: $id,
            label: $label,
            accent: $accent,
            icon: $icon,
            category: Category::$cat,
            pinned: $pinned,
            keywords: &[$($kw),*],
        }),*]
    };
}

const CATALOG: &[CatalogEntry] = catalog![
    ("terminal", "Terminal", "#3478F6", Some("terminal"), System, true, ["bash", "shell", "cli", "console"]),
    ("files", "Files", "#34C759", Some("files"), System, true, ["folder", "explorer", "nautilus"]),
    ("settings", "Settings", "#FF9500", Some("settings"), System, true, ["config", "preferences", "control"]),
    ("monitor", "Monitor", "#00C7BE", Some("monitor"), System, true, ["htop", "task", "processes", "cpu"]),
    ("disk_usage", "Disk Usage", "#5856D6", Some("disk"), System, false, ["storage", "space", "df"]),
    ("sysinfo", "System Info", "#3478F6", None, System, false, ["about", "hardware", "neofetch"]),
    ("packages", "Packages", "#AF52DE", Some("box"), System, false, ["apt", "install", "package", "manager"]),
    ("users", "Users", "#FF9500", Some("users"), System, false, ["accounts", "permissions", "groups"]),
    ("logs", "Logs", "#8E8E93", None, System, false, ["journal", "syslog", "dmesg"]),
    ("browser", "Browser", "#5856D6", Some("browser"), Internet, true, ["web", "firefox", "chrome", "surf"]),
    ("email", "Email", "#3478F6", Some("email"), Internet, false, ["mail", "thunderbird", "inbox"]),
    ("chat", "Chat", "#34C759", Some("chat"), Internet, false, ["messenger", "irc", "discord", "slack"]),
    ("torrent", "Torrent", "#FF9500", Some("download"), Internet, false, ["bittorrent", "transmission", "download"]),
    ("ftp", "FTP Client", "#8E8E93", None, Internet, false, ["filezilla", "sftp", "transfer"]),
    ("music", "Music", "#FF3B30", Some("music"), Media, true, ["audio", "player", "mpv", "spotify"]),
    ("video", "Video Player", "#FF6600", Some("video"), Media, false, ["vlc", "movie", "film", "mpv"]),
    ("podcast", "Podcasts", "#AF52DE", None, Media, false, ["rss", "audio", "feed"]),
    ("recorder", "Screen Recorder", "#FF3B30", None, Media, false, ["obs", "capture", "record", "screencast"]),
    ("imageview", "Image Viewer", "#34C759", Some("image"), Media, false, ["photo", "picture", "gallery", "feh"]),
    ("radio", "Radio", "#FF9500", None, Media, false, ["stream", "fm", "online"]),
    ("photoeditor", "Photo Editor", "#FF9500", Some("image"), Graphics, false, ["gimp", "photoshop", "edit", "paint"]),
    ("vectordraw", "Vector Draw", "#34C759", Some("pen"), Graphics, false, ["inkscape", "svg", "illustrator", "draw"]),
    ("screenshot", "Screenshot", "#3478F6", None, Graphics, false, ["capture", "snip", "print screen"]),
    ("colorpicker", "Color Picker", "#FF3B30", None, Graphics, false, ["eyedropper", "hex", "rgb"]),
    ("codeeditor", "Code Editor", "#007ACC", Some("code"), Dev, false, ["vscode", "vim", "nano", "text", "ide"]),
    ("gitclient", "Git Client", "#F05032", None, Dev, false, ["github", "gitlab", "version", "repo"]),
    ("database", "Database", "#336791", Some("table"), Dev, false, ["sql", "sqlite", "postgres", "mysql"]),
    ("apitester", "API Tester", "#FF6C37", None, Dev, false, ["postman", "curl", "http", "rest"]),
    ("debugger", "Debugger", "#CC342D", None, Dev, false, ["gdb", "lldb", "breakpoint", "trace"]),
    ("writer", "Writer", "#185ABD", None, Office, false, ["word", "document", "libreoffice", "text"]),
    ("spreadsheet", "Spreadsheet", "#107C41", Some("table"), Office, false, ["excel", "calc", "csv", "libreoffice"]),
    ("presenter", "Presenter", "#C43E1C", None, Office, false, ["powerpoint", "slides", "impress"]),
    ("pdfreader", "PDF Reader", "#EC1C24", Some("pdf"), Office, false, ["evince", "zathura", "document"]),
    ("notes", "Notes", "#FFD60A", None, Office, false, ["memo", "jot", "obsidian", "notepad"]),
    ("solitaire", "Solitaire", "#34C759", None, Games, false, ["cards", "klondike", "patience"]),
    ("mines", "Mines", "#8E8E93", None, Games, false, ["minesweeper", "puzzle"]),
    ("chess", "Chess", "#1C1C1E", None, Games, false, ["board", "strategy"]),
    ("tetris", "Tetris", "#FF3B30", None, Games, false, ["blocks", "puzzle", "arcade"]),
    ("snake", "Snake", "#34C759", None, Games, false, ["classic", "arcade", "retro"]),
];

pub fn builtin_catalog() -> Vec<AppDescriptor> {
    CATALOG
        .iter()
        .map(|e| {
            let app = AppDescriptor::new(e.id, e.label, e.category)
                .with_accent(e.accent)
                .pinned(e.pinned)
                .with_keywords(e.keywords);
            match e.icon {
                Some(name) => app.with_icon(name),
                None => app,
            }
        })
        .collect()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown application '{0}'")]
    UnknownApp(AppId),
    #[error("At most {max} applications can be pinned")]
    PinLimit { max: usize },
    #[error("Application '{0}' is not pinned")]
    NotPinned(AppId),
}

/// Catalog of known applications plus the user's pin order.
///
/// The `pinned` flag of every descriptor and `pinned_order` always describe the same set.
#[derive(Debug, Clone)]
pub struct AppRegistry {
    apps: Vec<AppDescriptor>,
    pinned_order: Vec<AppId>,
}

impl AppRegistry {
    pub fn new(mut apps: Vec<AppDescriptor>) -> Self {
        let mut pinned_order = Vec::new();
        for app in apps.iter_mut().filter(|a| a.pinned) {
            if pinned_order.len() < MAX_RING {
                pinned_order.push(app.id.clone());
            } else {
                app.pinned = false;
            }
        }
        Self { apps, pinned_order }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_catalog())
    }

    pub fn apps(&self) -> &[AppDescriptor] {
        &self.apps
    }

    pub fn get(&self, id: &AppId) -> Option<&AppDescriptor> {
        self.apps.iter().find(|a| &a.id == id)
    }

    fn get_mut(&mut self, id: &AppId) -> Result<&mut AppDescriptor, RegistryError> {
        self.apps
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| RegistryError::UnknownApp(id.clone()))
    }

    pub fn pinned_order(&self) -> &[AppId] {
        &self.pinned_order
    }

    pub fn pinned_count(&self) -> usize {
        self.apps.iter().filter(|a| a.pinned).count()
    }

    pub fn is_pinned(&self, id: &AppId) -> bool {
        self.get(id).is_some_and(|a| a.pinned)
    }

    /// Returns `Ok(false)` when the application was already pinned.
    pub fn pin(&mut self, id: &AppId) -> Result<bool, RegistryError> {
        let at_limit = self.pinned_count() >= MAX_RING;
        let app = self.get_mut(id)?;
        if app.pinned {
            return Ok(false);
        }
        if at_limit {
            return Err(RegistryError::PinLimit { max: MAX_RING });
        }
        app.pinned = true;
        self.pinned_order.push(id.clone());
        Ok(true)
    }

    /// Returns `Ok(false)` when the application was not pinned.
    pub fn unpin(&mut self, id: &AppId) -> Result<bool, RegistryError> {
        let app = self.get_mut(id)?;
        if !app.pinned {
            return Ok(false);
        }
        app.pinned = false;
        self.pinned_order.retain(|p| p != id);
        Ok(true)
    }

    /// Flips the pin and reports whether the application ends up pinned.
    pub fn toggle_pin(&mut self, id: &AppId) -> Result<bool, RegistryError> {
        if self.is_pinned(id) {
            self.unpin(id).map(|_| false)
        } else {
            self.pin(id).map(|_| true)
        }
    }

    /// Moves the pinned `from` into the position currently held by the pinned `to`.
    pub fn move_pin(&mut self, from: &AppId, to: &AppId) -> Result<bool, RegistryError> {
        if from == to {
            return Ok(false);
        }
        let position = |id: &AppId| {
            self.pinned_order
                .iter()
                .position(|p| p == id)
                .ok_or_else(|| RegistryError::NotPinned(id.clone()))
        };
        let (fi, ti) = (position(from)?, position(to)?);
        let moved = self.pinned_order.remove(fi);
        self.pinned_order.insert(ti, moved);
        Ok(true)
    }

    /// Applications shown by the launcher: pin order first, then any pinned stragglers.
    pub fn ring(&self) -> Vec<AppDescriptor> {
        let mut ordered: Vec<&AppDescriptor> = self
            .pinned_order
            .iter()
            .filter_map(|id| self.get(id).filter(|a| a.pinned))
            .collect();
        for app in self.apps.iter().filter(|a| a.pinned) {
            if !ordered.iter().any(|o| o.id == app.id) {
                ordered.push(app);
            }
        }
        ordered.into_iter().take(MAX_RING).cloned().collect()
    }

    /// Replaces the pin set with `stored`. Unknown ids are skipped; an empty list keeps the defaults.
    pub fn restore_pins(&mut self, stored: &[AppId]) {
        let known: Vec<AppId> = stored
            .iter()
            .filter(|id| self.get(id).is_some())
            .fold(Vec::new(), |mut acc, id| {
                if !acc.contains(id) && acc.len() < MAX_RING {
                    acc.push(id.clone());
                }
                acc
            });
        if stored.is_empty() {
            return;
        }
        for app in &mut self.apps {
            app.pinned = known.contains(&app.id);
        }
        self.pinned_order = known;
    }

    pub fn load_pins(&mut self, store: &dyn KeyValueStore) {
        if let Some(stored) = store::load_json::<Vec<AppId>>(store, PINNED_KEY) {
            self.restore_pins(&stored);
        }
    }

    pub fn save_pins(&self, store: &dyn KeyValueStore) -> Result<(), StoreError> {
        store::save_json(store, PINNED_KEY, &self.pinned_order)
    }

    /// Matching applications by descending score; ties keep catalog order.
    pub fn search(&self, query: &str) -> Vec<&AppDescriptor> {
        let mut scored: Vec<(u32, &AppDescriptor)> = self
            .apps
            .iter()
            .map(|app| (app.search_score(query), app))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, app)| app).collect()
    }

    /// Catalog grouped by category, in category order, skipping empty groups.
    pub fn by_category(&self) -> Vec<(Category, Vec<&AppDescriptor>)> {
        Category::iter()
            .map(|cat| {
                (
                    cat,
                    self.apps.iter().filter(|a| a.category == cat).collect::<Vec<_>>(),
                )
            })
            .filter(|(_, apps)| !apps.is_empty())
            .collect()
    }
}
