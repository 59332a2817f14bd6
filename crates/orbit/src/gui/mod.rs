pub mod apps;
pub mod launcher;
pub mod shell;
pub mod theme;
pub mod viewport;
pub mod windows;
