pub mod emitter;
pub mod node;
pub mod shape;
pub mod sprite;
