use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct IconName(String);

crate::impl_string_newtype!(IconName);

/// Glyph names shipped with the shell's icon set.
pub const BUILTIN_ICONS: &[&str] = &[
    "terminal", "files", "browser", "music", "settings", "monitor", "email", "chat", "video",
    "code", "image", "pdf", "gamepad", "disk", "users", "download", "table", "pen", "box",
];

pub fn find_icon(icon_name: &IconName) -> Option<IconName> {
    if icon_name.is_empty() {
        return None;
    }

    BUILTIN_ICONS
        .iter()
        .find(|known| known.eq_ignore_ascii_case(icon_name))
        .map(|known| IconName::from(*known))
}

/// Two-letter stand-in drawn for applications without an icon.
pub fn fallback_glyph(label: &str) -> String {
    label.chars().take(2).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_icon_is_case_insensitive() {
        assert_eq!(
            find_icon(&IconName::from("Terminal")),
            Some(IconName::from("terminal"))
        );
        assert_eq!(find_icon(&IconName::from("nope")), None);
        assert_eq!(find_icon(&IconName::from("")), None);
    }

    #[test]
    fn test_fallback_glyph() {
        assert_eq!(fallback_glyph("System Info"), "Sy");
        assert_eq!(fallback_glyph("X"), "X");
    }
}
