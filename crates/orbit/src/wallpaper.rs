use orbitctl::store::{self, KeyValueStore, StoreError};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

pub const WALLPAPER_KEY: &str = "orbit.wallpaper";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WallpaperStyle {
    #[default]
    Mountains,
    Gradient,
    Geometric,
    Stars,
    Waves,
}

impl WallpaperStyle {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mountains => "Mountains",
            Self::Gradient => "Gradient",
            Self::Geometric => "Geometric",
            Self::Stars => "Stars",
            Self::Waves => "Waves",
        }
    }

    pub fn themes(&self) -> &'static [&'static str] {
        match self {
            Self::Mountains => &["Night", "Dawn", "Day", "Dusk"],
            Self::Gradient => &["Sunset", "Ocean", "Aurora", "Midnight"],
            Self::Geometric => &["Dark", "Colorful", "Neon"],
            Self::Stars => &["Deep Space", "Nebula", "Starfield"],
            Self::Waves => &["Ocean", "Sunset Sea", "Arctic"],
        }
    }
}

/// Stored shape of the preference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredWallpaper {
    style_id: String,
    theme_index: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Wallpaper {
    pub style: WallpaperStyle,
    pub theme: usize,
}

impl Wallpaper {
    /// Returns `None` if `theme` does not exist for `style`.
    pub fn new(style: WallpaperStyle, theme: usize) -> Option<Self> {
        (theme < style.themes().len()).then_some(Self { style, theme })
    }

    pub fn theme_name(&self) -> &'static str {
        self.style.themes().get(self.theme).copied().unwrap_or_default()
    }

    fn from_stored(stored: StoredWallpaper) -> Self {
        let Ok(style) = stored.style_id.parse::<WallpaperStyle>() else {
            log::warn!("Unknown wallpaper style '{}', using default", stored.style_id);
            return Self::default();
        };
        let last = style.themes().len() - 1;
        let theme = usize::try_from(stored.theme_index).unwrap_or(0).min(last);
        Self { style, theme }
    }

    /// Missing or malformed preferences fall back to the default wallpaper.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        store::load_json::<StoredWallpaper>(store, WALLPAPER_KEY)
            .map(Self::from_stored)
            .unwrap_or_default()
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StoreError> {
        let stored = StoredWallpaper {
            style_id: self.style.to_string(),
            theme_index: self.theme as i64,
        };
        store::save_json(store, WALLPAPER_KEY, &stored)
    }
}
