use crate::wallpaper::WallpaperStyle;
use async_channel::Sender;
use orbitctl::geometry::Point;
use orbitctl::registry::AppId;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Button {
    #[strum(serialize = "primary", serialize = "left", serialize = "1")]
    Primary,
    #[strum(serialize = "secondary", serialize = "right", serialize = "3")]
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Tab,
    Space,
    Enter,
    Super,
    F(u8),
    Left,
    Right,
    Up,
    Down,
    Char(char),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown key '{0}'")]
pub struct UnknownKey(pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(if c == ' ' { Key::Space } else { Key::Char(c) });
        }
        let key = match s.to_ascii_lowercase().as_str() {
            "escape" | "esc" => Key::Escape,
            "tab" => Key::Tab,
            "space" => Key::Space,
            "enter" | "return" => Key::Enter,
            "super" | "meta" => Key::Super,
            "left" | "arrowleft" => Key::Left,
            "right" | "arrowright" => Key::Right,
            "up" | "arrowup" => Key::Up,
            "down" | "arrowdown" => Key::Down,
            other => other
                .strip_prefix('f')
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| (1..=12).contains(n))
                .map(Key::F)
                .ok_or_else(|| UnknownKey(s.to_string()))?,
        };
        Ok(key)
    }
}

/// Raw input as delivered by the input surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    PointerMove(Point),
    PointerDown(Point, Button),
    PointerUp(Point),
    DoubleClick(Point),
    Key(Key),
    /// One display refresh.
    Frame,
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    Show,
    Hide,
    Toggle,
    Input(Input),
    Launch(AppId),
    Pin(AppId),
    Unpin(AppId),
    /// `from` takes the ring position of `to`.
    MovePin {
        from: AppId,
        to: AppId,
    },
    Wallpaper {
        style: WallpaperStyle,
        theme: Option<usize>,
    },
    /// Reply with the shell state serialized as JSON.
    Dump(Sender<String>),
    ConfigReload,
}
