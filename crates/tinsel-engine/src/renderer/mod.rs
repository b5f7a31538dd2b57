pub mod instance;

pub use instance::{DisplayExtra, DisplayInstance, DisplayList};
