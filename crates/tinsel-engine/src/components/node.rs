use glam::Vec2;

use crate::api::types::NodeId;
use crate::components::shape::{RectangleComponent, TextComponent, TilingComponent};
use crate::components::sprite::SpriteComponent;

/// What a display node draws, if anything.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Root of the scene graph. Its size is the display surface.
    Stage,
    /// Container without visual content. Its size is the extent of its children.
    Group,
    Sprite(SpriteComponent),
    Text(TextComponent),
    Rectangle(RectangleComponent),
    TilingSprite(TilingComponent),
}

impl NodeKind {
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Stage | NodeKind::Group)
    }
}

/// Fat display node: shared transform state plus a kind-specific payload.
/// Parent and child links are owned by the scene graph.
#[derive(Debug, Clone)]
pub struct DisplayNode {
    /// Unique identifier.
    pub id: NodeId,
    /// Free-form tag for lookups.
    pub tag: String,
    pub kind: NodeKind,
    /// Position relative to the parent.
    pub pos: Vec2,
    /// Layout size (unscaled). Ignored for groups, whose size is computed.
    pub size: Vec2,
    /// Render scale. Does not affect collision boxes.
    pub scale: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    pub alpha: f32,
    pub visible: bool,
    /// Velocity in units per frame.
    pub vel: Vec2,
    /// Whether the pointer can drag this node.
    pub draggable: bool,
    /// Start and end of this frame's `integrate` moves.
    pub(crate) stepped: Option<(Vec2, Vec2)>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl DisplayNode {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        let size = match &kind {
            NodeKind::Sprite(sprite) => sprite
                .current_frame()
                .map(|t| Vec2::new(t.width, t.height))
                .unwrap_or(Vec2::ZERO),
            NodeKind::Text(text) => text.estimated_size(),
            NodeKind::TilingSprite(tiling) => Vec2::new(tiling.texture.width, tiling.texture.height),
            _ => Vec2::ZERO,
        };
        Self {
            id,
            tag: String::new(),
            kind,
            pos: Vec2::ZERO,
            size,
            scale: Vec2::ONE,
            rotation: 0.0,
            alpha: 1.0,
            visible: true,
            vel: Vec2::ZERO,
            draggable: false,
            stepped: None,
            parent: None,
            children: Vec::new(),
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_vel(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn draggable(mut self) -> Self {
        self.draggable = true;
        self
    }

    // -- Accessors --

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn sprite(&self) -> Option<&SpriteComponent> {
        match &self.kind {
            NodeKind::Sprite(sprite) => Some(sprite),
            _ => None,
        }
    }

    pub fn sprite_mut(&mut self) -> Option<&mut SpriteComponent> {
        match &mut self.kind {
            NodeKind::Sprite(sprite) => Some(sprite),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut TextComponent> {
        match &mut self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn tiling_mut(&mut self) -> Option<&mut TilingComponent> {
        match &mut self.kind {
            NodeKind::TilingSprite(tiling) => Some(tiling),
            _ => None,
        }
    }

    /// Replace the text content. No-op for non-text nodes.
    pub fn set_content(&mut self, content: impl Into<String>) {
        let size = match self.text_mut() {
            Some(text) => {
                text.content = content.into();
                text.estimated_size()
            }
            None => return,
        };
        self.size = size;
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
    }

    /// Apply one frame of velocity.
    pub fn integrate(&mut self) {
        let from = match self.stepped {
            Some((from, to)) if to == self.pos => from,
            _ => self.pos,
        };
        self.pos += self.vel;
        self.stepped = Some((from, self.pos));
    }

    /// Displacement from `integrate` this frame. Zero once the position has
    /// been set by anything else, so placed or respawned nodes never sweep.
    pub fn frame_motion(&self) -> Vec2 {
        match self.stepped {
            Some((from, to)) if to == self.pos => to - from,
            _ => Vec2::ZERO,
        }
    }

    /// Forget this frame's motion.
    pub fn settle(&mut self) {
        self.stepped = None;
    }
}
