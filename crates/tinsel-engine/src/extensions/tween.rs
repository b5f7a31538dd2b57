// extensions/tween.rs
//
// Tween system: eased property transitions on display nodes, counted in frames.
//
// Usage:
//   let mut tweens = TweenState::new();
//   tweens.add(node, Tween::slide(from, to, 30, Easing::Smoothstep));
//   tweens.tick(&mut scene);  // once per frame
//
// Tweens are exclusive per property: adding one cancels every earlier tween on
// the same node that writes any of the same properties.

use std::collections::BTreeMap;

use glam::Vec2;

use super::easing::Easing;
use crate::api::types::{NodeId, TweenId};
use crate::core::scene::Scene;
use crate::components::node::DisplayNode;

/// Property bits a tween writes.
pub mod props {
    pub const POS_X: u8 = 1 << 0;
    pub const POS_Y: u8 = 1 << 1;
    pub const SCALE_X: u8 = 1 << 2;
    pub const SCALE_Y: u8 = 1 << 3;
    pub const ROTATION: u8 = 1 << 4;
    pub const ALPHA: u8 = 1 << 5;
    pub const WIDTH: u8 = 1 << 6;
    pub const HEIGHT: u8 = 1 << 7;

    pub const POSITION: u8 = POS_X | POS_Y;
    pub const SCALE: u8 = SCALE_X | SCALE_Y;
    pub const SIZE: u8 = WIDTH | HEIGHT;
}

/// Amplitude below which a wobble is considered at rest.
const WOBBLE_REST_EPSILON: f32 = 0.001;

/// Rest scale of a wobbling node.
const REST_SCALE: Vec2 = Vec2::ONE;

/// What property a tween animates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenTarget {
    Position { from: Vec2, to: Vec2 },
    PositionX { from: f32, to: f32 },
    PositionY { from: f32, to: f32 },
    Rotation { from: f32, to: f32 },
    Scale { from: Vec2, to: Vec2 },
    Alpha { from: f32, to: f32 },
    Size { from: Vec2, to: Vec2 },
    /// Scale swings between rest and `peak`. After every full oscillation the
    /// peak's distance from rest shrinks by `friction`.
    Wobble {
        peak: Vec2,
        friction: f32,
        oscillations: u32,
        completed: u32,
    },
}

impl TweenTarget {
    /// Properties written by this target.
    pub fn props(&self) -> u8 {
        match self {
            TweenTarget::Position { .. } => props::POSITION,
            TweenTarget::PositionX { .. } => props::POS_X,
            TweenTarget::PositionY { .. } => props::POS_Y,
            TweenTarget::Rotation { .. } => props::ROTATION,
            TweenTarget::Scale { .. } | TweenTarget::Wobble { .. } => props::SCALE,
            TweenTarget::Alpha { .. } => props::ALPHA,
            TweenTarget::Size { .. } => props::SIZE,
        }
    }
}

/// What happens when a pass completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenLoop {
    /// Stop and remove the tween.
    #[default]
    Once,
    /// Restart from the beginning.
    Loop,
    /// Reverse direction (yoyo).
    PingPong,
}

/// Wobble parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wobble {
    /// Scale at the peak of the first swing.
    pub scale: Vec2,
    /// Frames per swing.
    pub frames: u32,
    /// Full oscillations before the node comes to rest.
    pub oscillations: u32,
    /// Amplitude multiplier applied after each oscillation.
    pub friction: f32,
    pub easing: Easing,
}

impl Default for Wobble {
    fn default() -> Self {
        Self {
            scale: Vec2::new(1.2, 1.2),
            frames: 10,
            oscillations: 10,
            friction: 0.98,
            easing: Easing::Smoothstep,
        }
    }
}

/// A single tween animation.
#[derive(Debug, Clone)]
pub struct Tween {
    pub target: TweenTarget,
    /// Frames per pass.
    pub frames: u32,
    /// Frames elapsed in the current pass.
    pub frame: u32,
    pub easing: Easing,
    /// Separate curve for the y component of vector targets.
    pub easing_y: Option<Easing>,
    pub loop_mode: TweenLoop,
    /// Whether currently playing (can be paused).
    pub playing: bool,
    /// For ping-pong: current direction (true = forward).
    forward: bool,
    /// Optional event id reported when the tween completes.
    pub on_complete: Option<u32>,
}

impl Tween {
    pub fn new(target: TweenTarget, frames: u32, easing: Easing) -> Self {
        Self {
            target,
            frames,
            frame: 0,
            easing,
            easing_y: None,
            loop_mode: TweenLoop::Once,
            playing: true,
            forward: true,
            on_complete: None,
        }
    }

    pub fn slide(from: Vec2, to: Vec2, frames: u32, easing: Easing) -> Self {
        Self::new(TweenTarget::Position { from, to }, frames, easing)
    }

    pub fn rotation(from: f32, to: f32, frames: u32, easing: Easing) -> Self {
        Self::new(TweenTarget::Rotation { from, to }, frames, easing)
    }

    pub fn scale(from: Vec2, to: Vec2, frames: u32, easing: Easing) -> Self {
        Self::new(TweenTarget::Scale { from, to }, frames, easing)
    }

    pub fn alpha(from: f32, to: f32, frames: u32, easing: Easing) -> Self {
        Self::new(TweenTarget::Alpha { from, to }, frames, easing)
    }

    pub fn size(from: Vec2, to: Vec2, frames: u32, easing: Easing) -> Self {
        Self::new(TweenTarget::Size { from, to }, frames, easing)
    }

    pub fn fade_in(frames: u32) -> Self {
        Self::alpha(0.0, 1.0, frames, Easing::Sine)
    }

    pub fn fade_out(frames: u32) -> Self {
        Self::alpha(1.0, 0.0, frames, Easing::Sine)
    }

    /// Damped scale wobble starting from rest.
    pub fn wobble(params: Wobble) -> Self {
        let target = TweenTarget::Wobble {
            peak: params.scale,
            friction: params.friction,
            oscillations: params.oscillations,
            completed: 0,
        };
        Self::new(target, params.frames, params.easing).with_loop(TweenLoop::PingPong)
    }

    // -- Builder methods --

    pub fn with_loop(mut self, mode: TweenLoop) -> Self {
        self.loop_mode = mode;
        self
    }

    /// Ping-pong between the endpoints forever.
    pub fn yoyo(self, yoyo: bool) -> Self {
        if yoyo {
            self.with_loop(TweenLoop::PingPong)
        } else {
            self
        }
    }

    pub fn with_easing_y(mut self, easing: Easing) -> Self {
        self.easing_y = Some(easing);
        self
    }

    pub fn with_on_complete(mut self, event_id: u32) -> Self {
        self.on_complete = Some(event_id);
        self
    }

    pub fn paused(mut self) -> Self {
        self.playing = false;
        self
    }

    /// Normalized progress of the current pass.
    pub fn progress(&self) -> f32 {
        if self.frames == 0 {
            1.0
        } else {
            (self.frame as f32 / self.frames as f32).min(1.0)
        }
    }

    pub fn is_forward(&self) -> bool {
        self.forward
    }

    /// Write the value for pass progress `raw`. At 1 the endpoint is written exactly.
    fn apply(&self, node: &mut DisplayNode, raw: f32) {
        let done = raw >= 1.0;
        let ex = if done { 1.0 } else { self.easing.apply(raw) };
        let ey = if done { 1.0 } else { self.easing_y.unwrap_or(self.easing).apply(raw) };
        let forward = self.forward;

        let scalar = |from: f32, to: f32, e: f32| {
            if forward {
                mix(from, to, e)
            } else {
                mix(to, from, e)
            }
        };
        let vector = |from: Vec2, to: Vec2| Vec2::new(scalar(from.x, to.x, ex), scalar(from.y, to.y, ey));

        match self.target {
            TweenTarget::Position { from, to } => node.pos = vector(from, to),
            TweenTarget::PositionX { from, to } => node.pos.x = scalar(from, to, ex),
            TweenTarget::PositionY { from, to } => node.pos.y = scalar(from, to, ey),
            TweenTarget::Rotation { from, to } => node.rotation = scalar(from, to, ex),
            TweenTarget::Scale { from, to } => node.scale = vector(from, to),
            TweenTarget::Alpha { from, to } => node.alpha = scalar(from, to, ex),
            TweenTarget::Size { from, to } => node.size = vector(from, to),
            TweenTarget::Wobble { peak, .. } => node.scale = vector(REST_SCALE, peak),
        }
    }
}

/// Interpolate, landing exactly on the endpoints.
#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    if t == 1.0 {
        b
    } else if t == 0.0 {
        a
    } else {
        a + (b - a) * t
    }
}

/// Manages all active tweens. Ticks run in registration order.
#[derive(Debug, Default)]
pub struct TweenState {
    tweens: BTreeMap<TweenId, (NodeId, Tween)>,
    next_id: u32,
    /// Completed tween events to be polled.
    completed_events: Vec<u32>,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tween for a node, cancelling earlier tweens on the same node that
    /// write any of the same properties.
    pub fn add(&mut self, node: NodeId, tween: Tween) -> TweenId {
        let mask = tween.target.props();
        self.tweens.retain(|id, (n, t)| {
            let clash = *n == node && t.target.props() & mask != 0;
            if clash {
                log::debug!("tween {:?} on {:?} superseded", id, node);
            }
            !clash
        });

        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.insert(id, (node, tween));
        id
    }

    /// Cancel a tween. The property keeps its last written value.
    pub fn remove(&mut self, id: TweenId) -> bool {
        self.tweens.remove(&id).is_some()
    }

    /// Cancel all tweens on a node.
    pub fn remove_node(&mut self, node: NodeId) {
        self.tweens.retain(|_, (n, _)| *n != node);
    }

    pub fn pause(&mut self, id: TweenId) {
        if let Some((_, tween)) = self.tweens.get_mut(&id) {
            tween.playing = false;
        }
    }

    pub fn resume(&mut self, id: TweenId) {
        if let Some((_, tween)) = self.tweens.get_mut(&id) {
            tween.playing = true;
        }
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.get(&id).map(|(_, t)| t)
    }

    pub fn contains(&self, id: TweenId) -> bool {
        self.tweens.contains_key(&id)
    }

    /// Whether any tween targets the node.
    pub fn is_tweening(&self, node: NodeId) -> bool {
        self.tweens.values().any(|(n, _)| *n == node)
    }

    /// Advance every playing tween by one frame and write the results.
    /// Tweens whose node no longer exists are dropped.
    /// Returns the number of tweens that completed this tick.
    pub fn tick(&mut self, scene: &mut Scene) -> usize {
        let mut finished = Vec::new();
        let mut completed = 0;

        for (&id, (node_id, tween)) in self.tweens.iter_mut() {
            if !tween.playing {
                continue;
            }
            let Some(node) = scene.get_mut(*node_id) else {
                log::debug!("tween {:?} dropped: node {:?} is gone", id, node_id);
                finished.push(id);
                continue;
            };

            tween.frame += 1;
            let raw = tween.progress();
            tween.apply(node, raw);

            if raw < 1.0 {
                continue;
            }

            match tween.loop_mode {
                TweenLoop::Once => {
                    if let Some(event_id) = tween.on_complete {
                        self.completed_events.push(event_id);
                    }
                    finished.push(id);
                    completed += 1;
                }
                TweenLoop::Loop => {
                    tween.frame = 0;
                }
                TweenLoop::PingPong => {
                    tween.frame = 0;
                    tween.forward = !tween.forward;
                    if tween.forward && damp_wobble(tween, node) {
                        if let Some(event_id) = tween.on_complete {
                            self.completed_events.push(event_id);
                        }
                        finished.push(id);
                        completed += 1;
                    }
                }
            }
        }

        for id in finished {
            self.tweens.remove(&id);
        }
        completed
    }

    /// Drain completed tween events.
    pub fn drain_completed(&mut self) -> impl Iterator<Item = u32> + '_ {
        self.completed_events.drain(..)
    }

    /// Number of active tweens.
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
        self.completed_events.clear();
    }
}

/// Shrink a wobble after a full oscillation. Returns true when it has come to rest.
fn damp_wobble(tween: &mut Tween, node: &mut DisplayNode) -> bool {
    let TweenTarget::Wobble { peak, friction, oscillations, completed } = &mut tween.target else {
        return false;
    };
    *completed += 1;
    *peak = REST_SCALE + (*peak - REST_SCALE) * *friction;

    let amplitude = (*peak - REST_SCALE).abs().max_element();
    if *completed >= *oscillations || amplitude < WOBBLE_REST_EPSILON {
        node.scale = REST_SCALE;
        return true;
    }
    false
}
