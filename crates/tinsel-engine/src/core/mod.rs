pub mod collision;
pub mod layout;
pub mod scene;
pub mod state;
pub mod time;
pub mod timers;
