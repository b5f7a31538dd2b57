//! Containment and axis-aligned box collision between display nodes.
//!
//! Boxes are a node's position plus its layout size. Scale is a render-only
//! property and never enlarges a collision box.

use glam::Vec2;

use crate::api::types::{Bounds, Edge, NodeId};
use crate::core::scene::Scene;

/// Keep a node inside `bounds`, clamping it against every crossed edge.
///
/// With `bounce`, the velocity component across a crossed edge is negated
/// once per axis. Returns the edge hit this call, preferring top, bottom,
/// left, right in that order when several are crossed.
pub fn contain(scene: &mut Scene, node: NodeId, bounds: Bounds, bounce: bool) -> Option<Edge> {
    if bounds.is_degenerate() {
        return None;
    }
    let size = scene.size(node);
    let target = scene.get_mut(node)?;

    let mut crossed = [false; 4];
    if target.pos.x < bounds.left() {
        target.pos.x = bounds.left();
        crossed[3] = true;
    }
    if target.pos.y < bounds.top() {
        target.pos.y = bounds.top();
        crossed[0] = true;
    }
    if target.pos.x + size.x > bounds.right() {
        target.pos.x = bounds.right() - size.x;
        crossed[1] = true;
    }
    if target.pos.y + size.y > bounds.bottom() {
        target.pos.y = bounds.bottom() - size.y;
        crossed[2] = true;
    }

    let [top, right, bottom, left] = crossed;
    if bounce {
        if left || right {
            target.vel.x = -target.vel.x;
        }
        if top || bottom {
            target.vel.y = -target.vel.y;
        }
    }

    if top {
        Some(Edge::Top)
    } else if bottom {
        Some(Edge::Bottom)
    } else if left {
        Some(Edge::Left)
    } else if right {
        Some(Edge::Right)
    } else {
        None
    }
}

/// [`contain`], then call `on_collide` once if an edge was hit.
pub fn contain_then(
    scene: &mut Scene,
    node: NodeId,
    bounds: Bounds,
    bounce: bool,
    on_collide: impl FnOnce(&mut Scene, Edge),
) -> Option<Edge> {
    let edge = contain(scene, node, bounds, bounce)?;
    on_collide(scene, edge);
    Some(edge)
}

/// What a node is tested against.
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    One(NodeId),
    /// Members are tested independently, in order.
    Many(Vec<NodeId>),
}

impl HitTarget {
    /// Every current child of a group.
    pub fn children_of(scene: &Scene, group: NodeId) -> Self {
        HitTarget::Many(scene.children(group).to_vec())
    }
}

/// Collision response flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitOptions {
    /// Push the first node out of the second.
    pub react: bool,
    /// Negate the first node's velocity along the resolved axis.
    pub bounce: bool,
    /// Compare boxes in stage space rather than parent space.
    pub global: bool,
}

impl HitOptions {
    pub fn react() -> Self {
        Self { react: true, ..Self::default() }
    }

    pub fn bounce() -> Self {
        Self { react: true, bounce: true, global: false }
    }

    pub fn global(mut self) -> Self {
        self.global = true;
        self
    }
}

/// Strict box overlap. Symmetric in its arguments.
pub fn overlaps(scene: &Scene, a: NodeId, b: NodeId, global: bool) -> bool {
    let (Some((a_min, a_size)), Some((b_min, b_size))) =
        (scene.bounding_box(a, global), scene.bounding_box(b, global))
    else {
        return false;
    };
    let a_max = a_min + a_size;
    let b_max = b_min + b_size;
    a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
}

/// Whether a stage-space point lies inside a node's global box.
pub fn hit_test_point(scene: &Scene, point: Vec2, node: NodeId) -> bool {
    let Some((min, size)) = scene.bounding_box(node, true) else {
        return false;
    };
    let max = min + size;
    point.x >= min.x && point.x < max.x && point.y >= min.y && point.y < max.y
}

/// Test `a` against `target`. Returns the side of `a` that collided with the
/// first member hit, or `None`.
pub fn hit(scene: &mut Scene, a: NodeId, target: &HitTarget, options: HitOptions) -> Option<Edge> {
    let mut first = None;
    hit_each(scene, a, target, options, |_, edge, _| {
        first.get_or_insert(edge);
    });
    first
}

/// Test `a` against every member of `target` in order and call `on_hit` with
/// the colliding side of `a` for each collision. Members that are detached or
/// destroyed when their turn comes are skipped. Returns whether anything hit.
pub fn hit_each(
    scene: &mut Scene,
    a: NodeId,
    target: &HitTarget,
    options: HitOptions,
    mut on_hit: impl FnMut(&mut Scene, Edge, NodeId),
) -> bool {
    let members = match target {
        HitTarget::One(b) => std::slice::from_ref(b),
        HitTarget::Many(members) => members.as_slice(),
    };

    let mut any = false;
    for &member in members {
        if member == a || scene.parent(member).is_none() {
            continue;
        }
        if let Some(edge) = collide_pair(scene, a, member, options) {
            any = true;
            on_hit(scene, edge, member);
        }
    }
    any
}

/// Resolve one pair. Reports the colliding side of `a`.
fn collide_pair(scene: &mut Scene, a: NodeId, b: NodeId, options: HitOptions) -> Option<Edge> {
    let (a_min, a_size) = scene.bounding_box(a, options.global)?;
    let (b_min, b_size) = scene.bounding_box(b, options.global)?;

    let half_sum = (a_size + b_size) * 0.5;
    let distance = (a_min + a_size * 0.5) - (b_min + b_size * 0.5);
    let overlap = half_sum - distance.abs();

    if overlap.x > 0.0 && overlap.y > 0.0 {
        // Separate along the axis of least penetration.
        let (edge, push) = if overlap.x >= overlap.y {
            if distance.y > 0.0 {
                (Edge::Top, Vec2::new(0.0, overlap.y))
            } else {
                (Edge::Bottom, Vec2::new(0.0, -overlap.y))
            }
        } else if distance.x > 0.0 {
            (Edge::Left, Vec2::new(overlap.x, 0.0))
        } else {
            (Edge::Right, Vec2::new(-overlap.x, 0.0))
        };
        if options.react {
            respond(scene, a, push, edge, options.bounce);
        }
        return Some(edge);
    }

    if !options.react {
        return None;
    }

    // No overlap now: check whether this frame's integration carried `a`
    // through `b`. Nodes that were not integrated this frame never sweep.
    let motion = scene.get(a)?.frame_motion() - scene.get(b)?.frame_motion();
    if motion == Vec2::ZERO {
        return None;
    }
    let (t, edge) = swept_entry(a_min - motion, a_size, motion, b_min, b_size)?;
    let contact = a_min - motion + motion * t;
    respond(scene, a, contact - a_min, edge, options.bounce);
    Some(edge)
}

fn respond(scene: &mut Scene, a: NodeId, push: Vec2, edge: Edge, bounce: bool) {
    let Some(node) = scene.get_mut(a) else { return };
    node.pos += push;
    if bounce {
        if edge.is_vertical() {
            node.vel.y = -node.vel.y;
        } else {
            node.vel.x = -node.vel.x;
        }
    }
}

/// Swept box test. `start` is the moving box's origin before the step and
/// `motion` its displacement. Returns the entry time in [0, 1) and the moving
/// box's leading side when it enters the static box during the step.
fn swept_entry(start: Vec2, size: Vec2, motion: Vec2, b_min: Vec2, b_size: Vec2) -> Option<(f32, Edge)> {
    // Minkowski expansion of b by the moving box.
    let lo = b_min - size;
    let hi = b_min + b_size;

    let axis = |s: f32, m: f32, lo: f32, hi: f32| -> Option<(f32, f32)> {
        if m == 0.0 {
            if s > lo && s < hi {
                Some((f32::NEG_INFINITY, f32::INFINITY))
            } else {
                None
            }
        } else {
            let t0 = (lo - s) / m;
            let t1 = (hi - s) / m;
            Some((t0.min(t1), t0.max(t1)))
        }
    };

    let (x_entry, x_exit) = axis(start.x, motion.x, lo.x, hi.x)?;
    let (y_entry, y_exit) = axis(start.y, motion.y, lo.y, hi.y)?;
    let entry = x_entry.max(y_entry);
    let exit = x_exit.min(y_exit);

    if entry >= exit || !(0.0..1.0).contains(&entry) {
        return None;
    }

    let edge = if x_entry > y_entry {
        if motion.x > 0.0 {
            Edge::Right
        } else {
            Edge::Left
        }
    } else if motion.y > 0.0 {
        Edge::Bottom
    } else {
        Edge::Top
    };
    Some((entry, edge))
}
