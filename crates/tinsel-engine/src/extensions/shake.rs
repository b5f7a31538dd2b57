// extensions/shake.rs
//
// Screen/node shake: a short decaying jitter that restores the start pose.

use glam::Vec2;

use crate::api::types::NodeId;
use crate::core::scene::Scene;
use crate::systems::rng::Rng;

/// Frames a shake lasts.
pub const SHAKE_FRAMES: u32 = 10;

#[derive(Debug, Clone)]
struct Shake {
    node: NodeId,
    start_pos: Vec2,
    start_rotation: f32,
    magnitude: f32,
    step: f32,
    angular: bool,
    tilt: f32,
    counter: u32,
}

/// Active shakes, at most one per node.
#[derive(Debug, Default)]
pub struct ShakeState {
    shakes: Vec<Shake>,
}

impl ShakeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start shaking a node. `magnitude` is an offset in units, or an angle in
    /// radians when `angular`. Returns false if the node is missing or already
    /// shaking.
    pub fn add(&mut self, scene: &Scene, node: NodeId, magnitude: f32, angular: bool) -> bool {
        if self.is_shaking(node) {
            return false;
        }
        let Some(target) = scene.get(node) else {
            log::warn!("shake: node {:?} does not exist", node);
            return false;
        };
        self.shakes.push(Shake {
            node,
            start_pos: target.pos,
            start_rotation: target.rotation,
            magnitude,
            step: magnitude / SHAKE_FRAMES as f32,
            angular,
            tilt: 1.0,
            counter: 0,
        });
        true
    }

    pub fn is_shaking(&self, node: NodeId) -> bool {
        self.shakes.iter().any(|s| s.node == node)
    }

    /// Advance every shake by one frame.
    pub fn tick(&mut self, scene: &mut Scene, rng: &mut Rng) {
        self.shakes.retain_mut(|shake| {
            let Some(node) = scene.get_mut(shake.node) else {
                return false;
            };
            node.pos = shake.start_pos;
            node.rotation = shake.start_rotation;

            if shake.counter >= SHAKE_FRAMES {
                return false;
            }
            shake.counter += 1;
            shake.magnitude -= shake.step;

            if shake.angular {
                node.rotation = shake.start_rotation + shake.magnitude * shake.tilt;
                shake.tilt = -shake.tilt;
            } else {
                let m = shake.magnitude;
                node.pos += Vec2::new(rng.range_f32(-m, m), rng.range_f32(-m, m));
            }
            true
        });
    }

    pub fn len(&self) -> usize {
        self.shakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shakes.is_empty()
    }
}
