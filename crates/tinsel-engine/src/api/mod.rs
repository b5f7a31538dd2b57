pub mod control;
pub mod engine;
pub mod error;
pub mod game;
pub mod types;
