//! Sprite particles: short-lived nodes that drift, shrink, spin and fade out.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::api::types::NodeId;
use crate::core::scene::Scene;
use crate::systems::rng::Rng;

/// Smallest alpha speed a particle may have.
pub const MIN_ALPHA_SPEED: f32 = 0.001;

/// Burst configuration. Ranges are `(min, max)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleEffect {
    /// Burst center in the particles' parent space.
    pub origin: Vec2,
    pub count: u32,
    /// Added to each particle's vertical velocity every frame.
    pub gravity: f32,
    /// Pick each angle at random instead of spacing them evenly.
    pub random_spacing: bool,
    /// Emission angles in radians.
    pub angle: (f32, f32),
    pub size: (f32, f32),
    pub speed: (f32, f32),
    pub scale_speed: (f32, f32),
    pub alpha_speed: (f32, f32),
    pub rotation_speed: (f32, f32),
}

impl Default for ParticleEffect {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            count: 20,
            gravity: 0.0,
            random_spacing: true,
            angle: (0.0, 6.28),
            size: (4.0, 16.0),
            speed: (0.3, 3.0),
            scale_speed: (0.01, 0.05),
            alpha_speed: (0.02, 0.02),
            rotation_speed: (0.01, 0.03),
        }
    }
}

impl ParticleEffect {
    pub fn new(origin: Vec2) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    // -- Builder pattern --

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Spread angles evenly from `min` to `max`.
    pub fn evenly_spaced(mut self) -> Self {
        self.random_spacing = false;
        self
    }

    pub fn with_angle(mut self, min: f32, max: f32) -> Self {
        self.angle = (min, max);
        self
    }

    pub fn with_size(mut self, min: f32, max: f32) -> Self {
        self.size = (min, max);
        self
    }

    pub fn with_speed(mut self, min: f32, max: f32) -> Self {
        self.speed = (min, max);
        self
    }

    pub fn with_scale_speed(mut self, min: f32, max: f32) -> Self {
        self.scale_speed = (min, max);
        self
    }

    pub fn with_alpha_speed(mut self, min: f32, max: f32) -> Self {
        self.alpha_speed = (min, max);
        self
    }

    pub fn with_rotation_speed(mut self, min: f32, max: f32) -> Self {
        self.rotation_speed = (min, max);
        self
    }

    /// Emission angle of the `index`th particle.
    fn angle_for(&self, index: u32, rng: &mut Rng) -> f32 {
        let (min, max) = self.angle;
        if self.random_spacing {
            return rng.range_f32(min, max);
        }
        if self.count <= 1 {
            return min;
        }
        min + (max - min) * index as f32 / (self.count - 1) as f32
    }
}

/// A live particle. Position, velocity and appearance live on its node.
#[derive(Debug, Clone)]
pub struct Particle {
    pub node: NodeId,
    pub gravity: f32,
    pub scale_speed: f32,
    pub alpha_speed: f32,
    pub rotation_speed: f32,
}

impl Particle {
    /// Advance one frame. Returns false once the particle has faded out.
    pub fn tick(&self, scene: &mut Scene) -> bool {
        let Some(node) = scene.get_mut(self.node) else {
            return false;
        };
        node.vel.y += self.gravity;
        node.pos += node.vel;
        if node.scale.x - self.scale_speed > 0.0 {
            node.scale -= Vec2::splat(self.scale_speed);
        }
        node.rotation += self.rotation_speed;
        node.alpha -= self.alpha_speed;
        node.alpha > 0.0
    }
}

/// Registry of live particles.
#[derive(Debug, Default)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a burst. `factory` creates each particle's node; the node is
    /// resized, centered on the origin and set in motion.
    pub fn spawn(
        &mut self,
        scene: &mut Scene,
        rng: &mut Rng,
        effect: &ParticleEffect,
        mut factory: impl FnMut(&mut Scene) -> NodeId,
    ) -> Vec<NodeId> {
        let mut spawned = Vec::with_capacity(effect.count as usize);
        for index in 0..effect.count {
            let node_id = factory(scene);
            let Some(node) = scene.get_mut(node_id) else {
                log::warn!("particle factory returned unknown node {:?}", node_id);
                continue;
            };

            let size = rng.range_f32(effect.size.0, effect.size.1);
            let angle = effect.angle_for(index, rng) % TAU;
            let speed = rng.range_f32(effect.speed.0, effect.speed.1);

            node.size = Vec2::splat(size);
            node.pos = effect.origin - node.size * 0.5;
            node.vel = Vec2::new(angle.cos(), angle.sin()) * speed;
            node.visible = true;
            if let Some(sprite) = node.sprite_mut() {
                if sprite.is_animated() {
                    sprite.show(rng.next_int(sprite.frame_count() as u32) as usize);
                }
            }

            let mut alpha_speed = rng.range_f32(effect.alpha_speed.0, effect.alpha_speed.1);
            if alpha_speed < MIN_ALPHA_SPEED {
                log::warn!("particle alpha speed {} clamped to {}", alpha_speed, MIN_ALPHA_SPEED);
                alpha_speed = MIN_ALPHA_SPEED;
            }

            self.particles.push(Particle {
                node: node_id,
                gravity: effect.gravity,
                scale_speed: rng.range_f32(effect.scale_speed.0, effect.scale_speed.1),
                alpha_speed,
                rotation_speed: rng.range_f32(effect.rotation_speed.0, effect.rotation_speed.1),
            });
            spawned.push(node_id);
        }
        spawned
    }

    /// Advance every particle one frame. Faded particles are detached, queued
    /// for destruction and dropped. Returns how many were dropped.
    pub fn tick(&mut self, scene: &mut Scene) -> usize {
        let before = self.particles.len();
        self.particles.retain(|particle| {
            if particle.tick(scene) {
                return true;
            }
            if scene.contains(particle.node) {
                scene.destroy_later(particle.node);
            }
            false
        });
        before - self.particles.len()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Drop every particle and destroy its node.
    pub fn clear(&mut self, scene: &mut Scene) {
        for particle in self.particles.drain(..) {
            scene.destroy(particle.node);
        }
    }
}
