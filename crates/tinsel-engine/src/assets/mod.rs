pub mod atlas;
pub mod loader;
pub mod registry;
