use std::fmt::Debug;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::control::Control;
use crate::api::types::{Bounds, Edge, EmitterId, NodeId, TweenId};
use crate::assets::loader::LoadProgress;
use crate::assets::registry::AssetTable;
use crate::components::emitter::{Emitter, EmitterState};
use crate::core::collision::{self, HitOptions, HitTarget};
use crate::core::scene::Scene;
use crate::core::time::FrameClock;
use crate::extensions::easing::Easing;
use crate::extensions::shake::ShakeState;
use crate::extensions::tween::{Tween, TweenState, Wobble};
use crate::input::state::InputState;
use crate::systems::emitter::fire_emitter;
use crate::systems::particles::{ParticleEffect, ParticleSystem};
use crate::systems::rng::Rng;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Stage width in game units.
    pub width: f32,
    /// Stage height in game units.
    pub height: f32,
    /// Fixed update rate (default: 60).
    pub fps: u32,
    /// Seed for the engine's random source.
    pub seed: u64,
    /// Cap on fixed steps run for one host frame (default: 10).
    pub max_steps_per_frame: u32,
    /// Longest press, in milliseconds, that still counts as a tap (default: 200).
    pub tap_threshold_ms: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 512.0,
            height: 512.0,
            fps: 60,
            seed: 42,
            max_steps_per_frame: 10,
            tap_threshold_ms: 200.0,
        }
    }
}

impl GameConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The core contract every game must fulfill.
pub trait Game: Sized + 'static {
    /// Game states, e.g. `Play` and `End`. Passed to `update` every frame.
    type State: Copy + PartialEq + Debug;

    /// Return engine configuration. Called once before loading.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// State the machine starts in.
    fn initial_state(&self) -> Self::State;

    /// Called after every asset finishes loading.
    fn load(&mut self, _progress: LoadProgress<'_>) {}

    /// Build the scene and register callbacks. Called once, after loading.
    fn setup(&mut self, ctx: &mut EngineContext, control: &mut Control<Self>);

    /// The game loop tick, run with the current state unless paused.
    fn update(&mut self, state: Self::State, ctx: &mut EngineContext, control: &mut Control<Self>);
}

/// Mutable access to engine state, passed to every game callback.
pub struct EngineContext {
    pub scene: Scene,
    pub tweens: TweenState,
    pub shakes: ShakeState,
    pub particles: ParticleSystem,
    pub emitters: EmitterState,
    pub rng: Rng,
    pub input: InputState,
    pub assets: AssetTable,
    pub clock: FrameClock,
}

impl EngineContext {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            scene: Scene::new(config.width, config.height),
            tweens: TweenState::new(),
            shakes: ShakeState::new(),
            particles: ParticleSystem::new(),
            emitters: EmitterState::new(),
            rng: Rng::new(config.seed),
            input: InputState::new(config.tap_threshold_ms),
            assets: AssetTable::new(),
            clock: FrameClock::new(),
        }
    }

    // -- Sprites from loaded assets --

    /// Spawn a sprite showing the named texture.
    pub fn sprite(&mut self, name: &str) -> Option<NodeId> {
        match self.assets.texture(name) {
            Some(texture) => Some(self.scene.sprite(texture)),
            None => {
                log::warn!("sprite: no texture named `{}`", name);
                None
            }
        }
    }

    /// Spawn a multi-frame sprite from named textures.
    pub fn animated_sprite(&mut self, names: &[&str]) -> Option<NodeId> {
        let frames = self.assets.frames(names);
        if frames.is_empty() {
            return None;
        }
        Some(self.scene.animated_sprite(&frames))
    }

    /// Spawn a button from up, over and down textures.
    pub fn button(&mut self, names: &[&str]) -> Option<NodeId> {
        let frames = self.assets.frames(names);
        if frames.is_empty() {
            return None;
        }
        Some(self.scene.button(&frames))
    }

    // -- Tweens --

    /// Register a tween. Earlier tweens on the node writing the same
    /// properties are cancelled.
    pub fn tween(&mut self, node: NodeId, tween: Tween) -> Option<TweenId> {
        if !self.scene.contains(node) {
            log::warn!("tween: node {:?} does not exist", node);
            return None;
        }
        Some(self.tweens.add(node, tween))
    }

    /// Slide a node from where it is to `to`.
    pub fn slide(&mut self, node: NodeId, to: Vec2, frames: u32, easing: Easing, yoyo: bool) -> Option<TweenId> {
        self.slide_with(node, to, frames, (easing, easing), yoyo)
    }

    /// Slide with separate x and y easing.
    pub fn slide_with(
        &mut self,
        node: NodeId,
        to: Vec2,
        frames: u32,
        (easing_x, easing_y): (Easing, Easing),
        yoyo: bool,
    ) -> Option<TweenId> {
        let from = self.scene.get(node)?.pos;
        let tween = Tween::slide(from, to, frames, easing_x)
            .with_easing_y(easing_y)
            .yoyo(yoyo);
        self.tween(node, tween)
    }

    pub fn fade_in(&mut self, node: NodeId, frames: u32) -> Option<TweenId> {
        let from = self.scene.get(node)?.alpha;
        self.tween(node, Tween::alpha(from, 1.0, frames, Easing::Sine))
    }

    pub fn fade_out(&mut self, node: NodeId, frames: u32) -> Option<TweenId> {
        let from = self.scene.get(node)?.alpha;
        self.tween(node, Tween::alpha(from, 0.0, frames, Easing::Sine))
    }

    /// Damped scale wobble. The node snaps to rest scale first, so a
    /// re-trigger always starts a clean wobble.
    pub fn wobble(&mut self, node: NodeId, params: Wobble) -> Option<TweenId> {
        let target = self.scene.get_mut(node)?;
        target.scale = Vec2::ONE;
        self.tween(node, Tween::wobble(params))
    }

    /// Cancel a tween. The property keeps its last written value.
    pub fn remove_tween(&mut self, id: TweenId) -> bool {
        self.tweens.remove(id)
    }

    pub fn shake(&mut self, node: NodeId, magnitude: f32, angular: bool) -> bool {
        self.shakes.add(&self.scene, node, magnitude, angular)
    }

    // -- Particles --

    /// Spawn a particle burst; `factory` creates each particle's node.
    pub fn particle_effect(
        &mut self,
        effect: &ParticleEffect,
        factory: impl FnMut(&mut Scene) -> NodeId,
    ) -> Vec<NodeId> {
        self.particles.spawn(&mut self.scene, &mut self.rng, effect, factory)
    }

    /// Register a stopped emitter that runs `factory` every `interval_ms`.
    pub fn emitter(&mut self, interval_ms: f64, factory: impl FnMut(&mut EngineContext) + 'static) -> EmitterId {
        self.emitters.add(Emitter::new(interval_ms, Box::new(factory)))
    }

    /// Start an emitter. A stopped emitter fires once right away.
    pub fn play_emitter(&mut self, id: EmitterId) {
        if self.emitters.start(id) {
            fire_emitter(self, id);
        }
    }

    pub fn stop_emitter(&mut self, id: EmitterId) {
        self.emitters.stop(id);
    }

    pub fn remove_emitter(&mut self, id: EmitterId) -> bool {
        self.emitters.remove(id)
    }

    // -- Collision --

    pub fn contain(&mut self, node: NodeId, bounds: Bounds, bounce: bool) -> Option<Edge> {
        collision::contain(&mut self.scene, node, bounds, bounce)
    }

    /// Keep a node inside the stage.
    pub fn contain_in_stage(&mut self, node: NodeId, bounce: bool) -> Option<Edge> {
        let bounds = self.scene.stage_bounds();
        self.contain(node, bounds, bounce)
    }

    pub fn hit(&mut self, a: NodeId, target: &HitTarget, options: HitOptions) -> Option<Edge> {
        collision::hit(&mut self.scene, a, target, options)
    }

    pub fn hit_each(
        &mut self,
        a: NodeId,
        target: &HitTarget,
        options: HitOptions,
        on_hit: impl FnMut(&mut Scene, Edge, NodeId),
    ) -> bool {
        collision::hit_each(&mut self.scene, a, target, options, on_hit)
    }

    // -- Random --

    /// Random integer in `min..=max`.
    pub fn random_int(&mut self, min: i32, max: i32) -> i32 {
        self.rng.range_i32(min, max)
    }

    /// Random float in `min..max`.
    pub fn random_float(&mut self, min: f32, max: f32) -> f32 {
        self.rng.range_f32(min, max)
    }

    /// Node count that still needs destroying at the end of the frame.
    pub fn pending_destroy(&self) -> usize {
        self.scene.pending_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::sprite::{Texture, TextureId};

    fn ctx() -> EngineContext {
        let mut ctx = EngineContext::new(&GameConfig::default());
        ctx.assets.register_image("cat.png", 32.0, 32.0);
        ctx
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config = GameConfig::from_json(r#"{ "width": 800, "seed": 7 }"#).unwrap();
        assert_eq!(config.width, 800.0);
        assert_eq!(config.height, 512.0);
        assert_eq!(config.seed, 7);
        assert_eq!(config.fps, 60);
        assert_eq!(config.tap_threshold_ms, 200.0);
    }

    #[test]
    fn sprite_by_name() {
        let mut ctx = ctx();
        let cat = ctx.sprite("cat.png").unwrap();
        assert_eq!(ctx.scene.size(cat), Vec2::new(32.0, 32.0));
        assert!(ctx.sprite("dog.png").is_none());
    }

    #[test]
    fn slide_reaches_target() {
        let mut ctx = ctx();
        let cat = ctx.sprite("cat.png").unwrap();
        ctx.slide(cat, Vec2::new(100.0, 50.0), 4, Easing::Smoothstep, false).unwrap();
        for _ in 0..4 {
            ctx.tweens.tick(&mut ctx.scene);
        }
        assert_eq!(ctx.scene.get(cat).unwrap().pos, Vec2::new(100.0, 50.0));
        assert!(ctx.tweens.is_empty());
    }

    #[test]
    fn retriggered_wobble_replaces_the_old_one() {
        let mut ctx = ctx();
        let cat = ctx.sprite("cat.png").unwrap();
        let first = ctx.wobble(cat, Wobble::default()).unwrap();
        ctx.tweens.tick(&mut ctx.scene);
        ctx.tweens.tick(&mut ctx.scene);
        let second = ctx.wobble(cat, Wobble::default()).unwrap();

        assert!(!ctx.tweens.contains(first));
        assert!(ctx.tweens.contains(second));
        assert_eq!(ctx.tweens.len(), 1);
        assert_eq!(ctx.scene.get(cat).unwrap().scale, Vec2::ONE);
    }

    #[test]
    fn tween_on_missing_node_is_refused() {
        let mut ctx = ctx();
        assert!(ctx.tween(NodeId(999), Tween::fade_in(10)).is_none());
        assert!(ctx.tweens.is_empty());
    }

    #[test]
    fn play_emitter_fires_immediately() {
        let mut ctx = ctx();
        let id = ctx.emitter(300.0, |ctx| {
            let effect = ParticleEffect::new(Vec2::new(100.0, 100.0)).with_count(3);
            let texture = Texture::new(TextureId(0), 8.0, 8.0);
            ctx.particle_effect(&effect, |scene| scene.sprite(texture));
        });
        assert!(ctx.particles.is_empty());

        ctx.play_emitter(id);
        assert_eq!(ctx.particles.len(), 3);

        // Already playing: no extra burst.
        ctx.play_emitter(id);
        assert_eq!(ctx.particles.len(), 3);
        assert!(ctx.emitters.is_playing(id));
    }

    #[test]
    fn contain_in_stage_uses_stage_size() {
        let mut ctx = ctx();
        let cat = ctx.sprite("cat.png").unwrap();
        ctx.scene.get_mut(cat).unwrap().pos = Vec2::new(600.0, 10.0);
        assert_eq!(ctx.contain_in_stage(cat, false), Some(Edge::Right));
        assert_eq!(ctx.scene.get(cat).unwrap().pos.x, 480.0);
    }
}
