pub mod geometry;
pub mod icon;
pub mod macros;
pub mod registry;
pub mod store;
