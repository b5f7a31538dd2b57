//! Animation system: advances frame playback of multi-frame sprites.

use crate::core::scene::Scene;

/// Tick every playing sprite by `dt` seconds. Returns how many changed frame.
///
/// Call this once per frame before building the display list.
pub fn tick_animations(scene: &mut Scene, dt: f32) -> usize {
    let mut changed = 0;
    for node in scene.iter_mut() {
        if let Some(sprite) = node.sprite_mut() {
            let count = sprite.frame_count();
            if sprite.animation.tick(dt, count) {
                changed += 1;
            }
        }
    }
    changed
}
