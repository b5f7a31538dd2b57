use std::collections::HashMap;

use glam::Vec2;

use crate::api::error::SceneError;
use crate::api::types::{Bounds, NodeId};
use crate::components::node::{DisplayNode, NodeKind};
use crate::components::shape::{RectangleComponent, TextComponent, TilingComponent};
use crate::components::sprite::{ButtonState, SpriteComponent, Texture};

/// Scene graph: an arena of display nodes rooted at the stage.
///
/// Client code holds `NodeId` handles; the arena owns the records. Detaching a
/// node keeps its record alive so it can be re-attached, `destroy` frees it.
/// Global positions are derived on query by walking the parent chain.
pub struct Scene {
    nodes: HashMap<NodeId, DisplayNode>,
    stage: NodeId,
    next_id: u32,
    pending_destroy: Vec<NodeId>,
}

impl Scene {
    /// Create a scene whose stage covers `width x height`.
    pub fn new(width: f32, height: f32) -> Self {
        let stage = NodeId(0);
        let mut nodes = HashMap::with_capacity(256);
        nodes.insert(
            stage,
            DisplayNode::new(stage, NodeKind::Stage).with_size(Vec2::new(width, height)),
        );
        Self {
            nodes,
            stage,
            next_id: 1,
            pending_destroy: Vec::new(),
        }
    }

    pub fn stage(&self) -> NodeId {
        self.stage
    }

    /// The stage's area in its own coordinates.
    pub fn stage_bounds(&self) -> Bounds {
        let size = self.size(self.stage);
        Bounds::new(0.0, 0.0, size.x, size.y)
    }

    /// Generate the next unique node ID.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Insert a node and attach it to the stage. A colliding id is replaced
    /// with a fresh one; the id actually used is returned.
    pub fn spawn(&mut self, mut node: DisplayNode) -> NodeId {
        if self.nodes.contains_key(&node.id) {
            let fresh = self.next_id();
            log::warn!("node id {:?} already in use, spawning as {:?}", node.id, fresh);
            node.id = fresh;
        }
        self.next_id = self.next_id.max(node.id.0 + 1);
        node.parent = None;
        node.children.clear();

        let id = node.id;
        self.nodes.insert(id, node);
        self.link(self.stage, id);
        id
    }

    fn spawn_kind(&mut self, kind: NodeKind) -> NodeId {
        let id = self.next_id();
        self.spawn(DisplayNode::new(id, kind))
    }

    // -- Constructors --

    pub fn sprite(&mut self, texture: Texture) -> NodeId {
        self.spawn_kind(NodeKind::Sprite(SpriteComponent::new(texture)))
    }

    /// Multi-frame sprite; sized from its first frame.
    pub fn animated_sprite(&mut self, frames: &[Texture]) -> NodeId {
        self.spawn_kind(NodeKind::Sprite(SpriteComponent::with_frames(frames.to_vec())))
    }

    /// Sprite with up/over/down frames that reacts to the pointer.
    pub fn button(&mut self, frames: &[Texture]) -> NodeId {
        let mut sprite = SpriteComponent::with_frames(frames.to_vec());
        sprite.button = Some(ButtonState::Up);
        self.spawn_kind(NodeKind::Sprite(sprite))
    }

    pub fn text(&mut self, content: &str, font: &str, fill: &str, pos: Vec2) -> NodeId {
        let id = self.spawn_kind(NodeKind::Text(TextComponent::new(content, font, fill)));
        if let Some(node) = self.nodes.get_mut(&id) {
            node.pos = pos;
        }
        id
    }

    pub fn rectangle(&mut self, size: Vec2, fill: &str) -> NodeId {
        let id = self.spawn_kind(NodeKind::Rectangle(RectangleComponent::new(fill)));
        if let Some(node) = self.nodes.get_mut(&id) {
            node.size = size;
        }
        id
    }

    pub fn tiling_sprite(&mut self, size: Vec2, texture: Texture) -> NodeId {
        let id = self.spawn_kind(NodeKind::TilingSprite(TilingComponent::new(texture)));
        if let Some(node) = self.nodes.get_mut(&id) {
            node.size = size;
        }
        id
    }

    /// Create a group on the stage adopting `children` in order.
    pub fn group(&mut self, children: &[NodeId]) -> NodeId {
        let id = self.spawn_kind(NodeKind::Group);
        for &child in children {
            if let Err(err) = self.add_child(id, child) {
                log::warn!("group {:?}: skipped child {:?}: {}", id, child, err);
            }
        }
        id
    }

    // -- Lookup --

    pub fn get(&self, id: NodeId) -> Option<&DisplayNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut DisplayNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Children in paint order. Empty for unknown nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// True iff the node currently has no children.
    pub fn group_is_empty(&self, id: NodeId) -> bool {
        self.children(id).is_empty()
    }

    /// Whether the node is connected to the stage.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        for _ in 0..=self.nodes.len() {
            if current == self.stage {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        false
    }

    /// Whether the node is attached and it and every ancestor are visible.
    pub fn is_shown(&self, id: NodeId) -> bool {
        let mut current = id;
        for _ in 0..=self.nodes.len() {
            let Some(node) = self.nodes.get(&current) else {
                return false;
            };
            if !node.visible {
                return false;
            }
            if current == self.stage {
                return true;
            }
            match node.parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        false
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.nodes.values().find(|n| n.tag == tag).map(|n| n.id)
    }

    /// Number of node records, stage included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &DisplayNode> {
        self.nodes.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut DisplayNode> {
        self.nodes.values_mut()
    }

    // -- Geometry --

    /// Layout size. Groups report the extent of their children.
    pub fn size(&self, id: NodeId) -> Vec2 {
        let Some(node) = self.nodes.get(&id) else {
            return Vec2::ZERO;
        };
        match node.kind {
            NodeKind::Group => node.children.iter().fold(Vec2::ZERO, |extent, &child| {
                let pos = self.nodes.get(&child).map(|c| c.pos).unwrap_or(Vec2::ZERO);
                extent.max(pos + self.size(child))
            }),
            _ => node.size,
        }
    }

    pub fn half_size(&self, id: NodeId) -> Vec2 {
        self.size(id) * 0.5
    }

    /// Center in parent space.
    pub fn center(&self, id: NodeId) -> Option<Vec2> {
        self.nodes.get(&id).map(|n| n.pos + self.half_size(id))
    }

    /// Position in stage space. Detached nodes resolve relative to their
    /// topmost ancestor.
    pub fn global_position(&self, id: NodeId) -> Option<Vec2> {
        let mut node = self.nodes.get(&id)?;
        let mut pos = node.pos;
        for _ in 0..self.nodes.len() {
            let Some(parent) = node.parent.and_then(|p| self.nodes.get(&p)) else {
                break;
            };
            pos += parent.pos;
            node = parent;
        }
        Some(pos)
    }

    pub fn global_center(&self, id: NodeId) -> Option<Vec2> {
        self.global_position(id).map(|pos| pos + self.half_size(id))
    }

    /// Box origin and size, in parent space or stage space.
    pub fn bounding_box(&self, id: NodeId, global: bool) -> Option<(Vec2, Vec2)> {
        let origin = if global {
            self.global_position(id)?
        } else {
            self.nodes.get(&id)?.pos
        };
        Some((origin, self.size(id)))
    }

    /// Apply one frame of the node's velocity.
    pub fn move_by_velocity(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.integrate();
        }
    }

    /// Forget every node's motion from the previous frame.
    pub fn settle_all(&mut self) {
        for node in self.nodes.values_mut() {
            node.settle();
        }
    }

    // -- Structure edits --

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
    }

    fn unlink(&mut self, child: NodeId) -> Option<NodeId> {
        let parent = self.nodes.get_mut(&child)?.parent.take()?;
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.retain(|&c| c != child);
        }
        Some(parent)
    }

    /// Move `child` under `parent`, appending it to the paint order.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        if !self.nodes.contains_key(&child) {
            return Err(SceneError::UnknownNode(child));
        }
        if child == self.stage {
            return Err(SceneError::StageIsRoot);
        }
        let mut ancestor = Some(parent);
        while let Some(current) = ancestor {
            if current == child {
                return Err(SceneError::Cycle { parent, child });
            }
            ancestor = self.parent(current);
        }

        self.unlink(child);
        self.link(parent, child);
        Ok(())
    }

    pub fn add_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<(), SceneError> {
        for &child in children {
            self.add_child(parent, child)?;
        }
        Ok(())
    }

    /// Detach `child` if `parent` owns it.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.unlink(child).is_some()
    }

    /// Detach a node from its parent without destroying it.
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.unlink(id).is_some()
    }

    pub fn remove_many(&mut self, ids: &[NodeId]) {
        for &id in ids {
            self.remove(id);
        }
    }

    /// Detach and free a node and its whole subtree. Returns the number of
    /// records freed.
    pub fn destroy(&mut self, id: NodeId) -> usize {
        if id == self.stage {
            log::warn!("refusing to destroy the stage");
            return 0;
        }
        self.unlink(id);

        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
                freed += 1;
            }
        }
        freed
    }

    /// Detach now and free during the end-of-frame cleanup pass.
    pub fn destroy_later(&mut self, id: NodeId) {
        if id == self.stage {
            return;
        }
        self.unlink(id);
        self.pending_destroy.push(id);
    }

    /// Free nodes queued with `destroy_later`. Nodes re-attached in the
    /// meantime survive. Returns the number of records freed.
    pub fn flush_pending(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending_destroy);
        let mut freed = 0;
        for id in pending {
            if self.parent(id).is_none() {
                freed += self.destroy(id);
            }
        }
        freed
    }

    pub fn pending_len(&self) -> usize {
        self.pending_destroy.len()
    }

    /// Destroy everything below the stage.
    pub fn clear(&mut self) {
        let children = self.children(self.stage).to_vec();
        for child in children {
            self.destroy(child);
        }
        self.pending_destroy.clear();
    }

    // -- Z-order --

    pub fn bring_to_front(&mut self, id: NodeId) {
        let len = self.parent(id).map(|p| self.children(p).len()).unwrap_or(0);
        self.set_child_index(id, len.saturating_sub(1));
    }

    pub fn send_to_back(&mut self, id: NodeId) {
        self.set_child_index(id, 0);
    }

    /// Move a node within its parent's paint order. Index is clamped.
    pub fn set_child_index(&mut self, id: NodeId, index: usize) {
        let Some(parent) = self.parent(id) else { return };
        let Some(node) = self.nodes.get_mut(&parent) else { return };
        let Some(current) = node.children.iter().position(|&c| c == id) else { return };
        node.children.remove(current);
        let index = index.min(node.children.len());
        node.children.insert(index, id);
    }

    /// Every attached node below the stage, depth-first, in paint order.
    pub fn paint_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.children(self.stage).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    // -- Relative placement --

    /// Anchor's box origin expressed in `node`'s parent space.
    fn anchor_origin(&self, anchor: NodeId, node: NodeId) -> Option<Vec2> {
        let parent = self.parent(node);
        if parent == Some(anchor) {
            return Some(Vec2::ZERO);
        }
        let anchor_global = self.global_position(anchor)?;
        let parent_global = parent
            .and_then(|p| self.global_position(p))
            .unwrap_or(Vec2::ZERO);
        Some(anchor_global - parent_global)
    }

    fn place(&mut self, anchor: NodeId, node: NodeId, f: impl FnOnce(Vec2, Vec2, Vec2) -> Vec2) {
        let Some(origin) = self.anchor_origin(anchor, node) else { return };
        let a_size = self.size(anchor);
        let b_size = self.size(node);
        if let Some(b) = self.nodes.get_mut(&node) {
            b.pos = f(origin, a_size, b_size);
        }
    }

    /// Center `node` inside `anchor`.
    pub fn put_center(&mut self, anchor: NodeId, node: NodeId, offset: Vec2) {
        self.place(anchor, node, |a, a_size, b_size| a + a_size * 0.5 - b_size * 0.5 + offset);
    }

    /// Place `node` above `anchor`, horizontally centered.
    pub fn put_top(&mut self, anchor: NodeId, node: NodeId, offset: Vec2) {
        self.place(anchor, node, |a, a_size, b_size| {
            Vec2::new(a.x + a_size.x * 0.5 - b_size.x * 0.5, a.y - b_size.y) + offset
        });
    }

    /// Place `node` to the right of `anchor`, vertically centered.
    pub fn put_right(&mut self, anchor: NodeId, node: NodeId, offset: Vec2) {
        self.place(anchor, node, |a, a_size, b_size| {
            Vec2::new(a.x + a_size.x, a.y + a_size.y * 0.5 - b_size.y * 0.5) + offset
        });
    }

    /// Place `node` below `anchor`, horizontally centered.
    pub fn put_bottom(&mut self, anchor: NodeId, node: NodeId, offset: Vec2) {
        self.place(anchor, node, |a, a_size, b_size| {
            Vec2::new(a.x + a_size.x * 0.5 - b_size.x * 0.5, a.y + a_size.y) + offset
        });
    }

    /// Place `node` to the left of `anchor`, vertically centered.
    pub fn put_left(&mut self, anchor: NodeId, node: NodeId, offset: Vec2) {
        self.place(anchor, node, |a, a_size, b_size| {
            Vec2::new(a.x - b_size.x, a.y + a_size.y * 0.5 - b_size.y * 0.5) + offset
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::sprite::TextureId;

    fn tex(w: f32, h: f32) -> Texture {
        Texture::new(TextureId(0), w, h)
    }

    #[test]
    fn spawn_attaches_to_stage() {
        let mut scene = Scene::new(512.0, 512.0);
        let id = scene.sprite(tex(32.0, 32.0));
        assert_eq!(scene.parent(id), Some(scene.stage()));
        assert_eq!(scene.children(scene.stage()), &[id]);
        assert!(scene.is_attached(id));
    }

    #[test]
    fn add_child_reparents() {
        let mut scene = Scene::new(512.0, 512.0);
        let a = scene.group(&[]);
        let b = scene.group(&[]);
        let s = scene.sprite(tex(8.0, 8.0));

        scene.add_child(a, s).unwrap();
        scene.add_child(b, s).unwrap();

        assert!(scene.children(a).is_empty());
        assert_eq!(scene.children(b), &[s]);
        assert_eq!(scene.parent(s), Some(b));
    }

    #[test]
    fn add_child_rejects_cycles_and_stage() {
        let mut scene = Scene::new(100.0, 100.0);
        let outer = scene.group(&[]);
        let inner = scene.group(&[]);
        scene.add_child(outer, inner).unwrap();

        assert_eq!(
            scene.add_child(inner, outer),
            Err(SceneError::Cycle { parent: inner, child: outer })
        );
        assert_eq!(scene.add_child(outer, outer), Err(SceneError::Cycle { parent: outer, child: outer }));
        assert_eq!(scene.add_child(outer, scene.stage()), Err(SceneError::StageIsRoot));
        assert_eq!(scene.add_child(outer, NodeId(999)), Err(SceneError::UnknownNode(NodeId(999))));
    }

    #[test]
    fn remove_detaches_without_destroying() {
        let mut scene = Scene::new(100.0, 100.0);
        let s = scene.sprite(tex(8.0, 8.0));
        assert!(scene.remove(s));
        assert!(scene.contains(s));
        assert!(!scene.is_attached(s));
        assert!(!scene.remove(s));

        scene.add_child(scene.stage(), s).unwrap();
        assert!(scene.is_attached(s));
    }

    #[test]
    fn hidden_ancestor_hides_descendants() {
        let mut scene = Scene::new(512.0, 512.0);
        let s = scene.sprite(tex(16.0, 16.0));
        let inner = scene.group(&[s]);
        let outer = scene.group(&[inner]);
        assert!(scene.is_shown(s));

        scene.get_mut(outer).unwrap().visible = false;
        assert!(!scene.is_shown(s));
        assert!(scene.get(s).unwrap().visible);

        scene.get_mut(outer).unwrap().visible = true;
        scene.remove(inner);
        assert!(!scene.is_shown(s));
    }

    #[test]
    fn global_position_sums_parents() {
        let mut scene = Scene::new(512.0, 512.0);
        let s = scene.sprite(tex(16.0, 16.0));
        let inner = scene.group(&[s]);
        let outer = scene.group(&[inner]);
        scene.get_mut(outer).unwrap().pos = Vec2::new(100.0, 10.0);
        scene.get_mut(inner).unwrap().pos = Vec2::new(0.0, 32.0);
        scene.get_mut(s).unwrap().pos = Vec2::new(5.0, 5.0);

        assert_eq!(scene.global_position(s), Some(Vec2::new(105.0, 47.0)));
        assert_eq!(scene.global_center(s), Some(Vec2::new(113.0, 55.0)));
    }

    #[test]
    fn group_size_is_child_extent() {
        let mut scene = Scene::new(512.0, 512.0);
        let a = scene.sprite(tex(64.0, 32.0));
        let b = scene.sprite(tex(64.0, 32.0));
        scene.get_mut(b).unwrap().pos = Vec2::new(448.0, 96.0);
        let group = scene.group(&[a, b]);
        assert_eq!(scene.size(group), Vec2::new(512.0, 128.0));
    }

    #[test]
    fn destroy_frees_subtree() {
        let mut scene = Scene::new(100.0, 100.0);
        let a = scene.sprite(tex(1.0, 1.0));
        let b = scene.sprite(tex(1.0, 1.0));
        let group = scene.group(&[a, b]);

        assert_eq!(scene.destroy(group), 3);
        assert!(!scene.contains(a));
        assert!(scene.group_is_empty(scene.stage()));
    }

    #[test]
    fn destroy_later_waits_for_flush() {
        let mut scene = Scene::new(100.0, 100.0);
        let a = scene.sprite(tex(1.0, 1.0));
        let b = scene.sprite(tex(1.0, 1.0));
        scene.destroy_later(a);
        scene.destroy_later(b);
        scene.add_child(scene.stage(), b).unwrap();

        assert!(!scene.is_attached(a));
        assert!(scene.contains(a));
        assert_eq!(scene.flush_pending(), 1);
        assert!(!scene.contains(a));
        assert!(scene.contains(b));
    }

    #[test]
    fn z_order_moves() {
        let mut scene = Scene::new(100.0, 100.0);
        let a = scene.sprite(tex(1.0, 1.0));
        let b = scene.sprite(tex(1.0, 1.0));
        let c = scene.sprite(tex(1.0, 1.0));

        scene.bring_to_front(a);
        assert_eq!(scene.children(scene.stage()), &[b, c, a]);
        scene.send_to_back(c);
        assert_eq!(scene.children(scene.stage()), &[c, b, a]);
    }

    #[test]
    fn paint_order_is_depth_first() {
        let mut scene = Scene::new(100.0, 100.0);
        let a = scene.sprite(tex(1.0, 1.0));
        let b = scene.sprite(tex(1.0, 1.0));
        let group = scene.group(&[a, b]);
        let c = scene.sprite(tex(1.0, 1.0));
        assert_eq!(scene.paint_order(), vec![group, a, b, c]);
    }

    #[test]
    fn put_bottom_and_center_on_stage() {
        let mut scene = Scene::new(512.0, 512.0);
        let paddle = scene.sprite(tex(96.0, 16.0));
        scene.put_bottom(scene.stage(), paddle, Vec2::new(0.0, -24.0));
        assert_eq!(scene.get(paddle).unwrap().pos, Vec2::new(208.0, 488.0));

        let cat = scene.sprite(tex(64.0, 64.0));
        scene.put_center(scene.stage(), cat, Vec2::new(-32.0, -32.0));
        assert_eq!(scene.get(cat).unwrap().pos, Vec2::new(192.0, 192.0));
    }

    #[test]
    fn put_right_and_left_of_sibling() {
        let mut scene = Scene::new(512.0, 512.0);
        let a = scene.sprite(tex(32.0, 32.0));
        scene.get_mut(a).unwrap().pos = Vec2::new(100.0, 100.0);
        let b = scene.sprite(tex(16.0, 16.0));

        scene.put_right(a, b, Vec2::ZERO);
        assert_eq!(scene.get(b).unwrap().pos, Vec2::new(132.0, 108.0));
        scene.put_left(a, b, Vec2::ZERO);
        assert_eq!(scene.get(b).unwrap().pos, Vec2::new(84.0, 108.0));
        scene.put_top(a, b, Vec2::ZERO);
        assert_eq!(scene.get(b).unwrap().pos, Vec2::new(108.0, 84.0));
    }

    #[test]
    fn spawn_with_used_id_gets_fresh_one() {
        let mut scene = Scene::new(100.0, 100.0);
        let id = scene.spawn(DisplayNode::new(NodeId(0), NodeKind::Group));
        assert_ne!(id, scene.stage());
        assert!(scene.contains(id));
    }
}
