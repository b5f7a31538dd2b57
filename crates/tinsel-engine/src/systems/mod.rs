pub mod animation;
pub mod emitter;
pub mod particles;
pub mod render;
pub mod rng;
