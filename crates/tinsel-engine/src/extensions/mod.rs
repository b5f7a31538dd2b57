// extensions/mod.rs
//
// Procedural animation: easing curves, tweens and shakes.
// Each keeps its own registry keyed by NodeId and writes into the scene once per frame.

pub mod easing;
pub mod shake;
pub mod tween;

pub use easing::{Easing, ease, lerp, lerp_vec2};
pub use shake::ShakeState;
pub use tween::{Tween, TweenLoop, TweenState, TweenTarget, Wobble};
