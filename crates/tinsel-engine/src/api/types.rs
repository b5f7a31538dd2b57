use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle to a display node in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Handle to a running tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u32);

/// Handle to a particle emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmitterId(pub u32);

/// Handle to a deferred callback scheduled with `wait`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u32);

/// One side of an axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub fn as_str(self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Right => "right",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
        }
    }

    /// Top and bottom are vertical edges.
    pub fn is_vertical(self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Containment region.
///
/// `width` and `height` are the right and bottom limits measured from the
/// origin of the parent space, not extents added to `x`/`y`. A stage of
/// 512x512 with a 32 unit top border is `{ x: 0, y: 32, width: 512, height: 512 }`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.width
    }

    pub fn bottom(&self) -> f32 {
        self.height
    }

    /// Zero, negative or inverted regions never contain anything.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0
            || self.height <= 0.0
            || self.right() <= self.left()
            || self.bottom() <= self.top()
            || !(self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite())
    }
}
