use bytemuck::{Pod, Zeroable};
use serde::Serialize;

/// Per-node draw data read by the host renderer straight out of wasm memory.
/// Must match the host protocol: 12 floats = 48 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DisplayInstance {
    /// Global x of the node's box origin.
    pub x: f32,
    /// Global y of the node's box origin.
    pub y: f32,
    /// Layout width in game units.
    pub width: f32,
    /// Layout height in game units.
    pub height: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Rotation in radians.
    pub rotation: f32,
    /// Opacity multiplied down the tree.
    pub alpha: f32,
    /// One of the `KIND_*` constants.
    pub kind: f32,
    /// Texture id for sprites and tiling sprites, index into
    /// [`DisplayList::extras`] for text and rectangles.
    pub texture: f32,
    /// Tile scroll offset, tiling sprites only.
    pub tile_x: f32,
    pub tile_y: f32,
}

impl DisplayInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub const KIND_SPRITE: f32 = 0.0;
    pub const KIND_TEXT: f32 = 1.0;
    pub const KIND_RECTANGLE: f32 = 2.0;
    pub const KIND_TILING: f32 = 3.0;
}

/// Drawing parameters that do not fit in floats.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DisplayExtra {
    Text {
        content: String,
        font: String,
        fill: String,
    },
    Rectangle {
        fill: String,
        stroke: String,
        line_width: f32,
    },
}

/// One frame's worth of draw data, in paint order.
#[derive(Debug, Default)]
pub struct DisplayList {
    pub instances: Vec<DisplayInstance>,
    pub extras: Vec<DisplayExtra>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            extras: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.extras.clear();
    }

    pub fn push(&mut self, instance: DisplayInstance) {
        self.instances.push(instance);
    }

    /// Store an extra and return its index.
    pub fn push_extra(&mut self, extra: DisplayExtra) -> u32 {
        self.extras.push(extra);
        (self.extras.len() - 1) as u32
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for host reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    /// Instance data as a flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Extras as a JSON array.
    pub fn extras_json(&self) -> String {
        serde_json::to_string(&self.extras).unwrap_or_else(|err| {
            log::warn!("display extras not serializable: {}", err);
            String::from("[]")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_instance_is_12_floats() {
        assert_eq!(std::mem::size_of::<DisplayInstance>(), 48);
        assert_eq!(DisplayInstance::STRIDE_BYTES, 48);
    }

    #[test]
    fn push_and_flatten() {
        let mut list = DisplayList::new();
        list.push(DisplayInstance {
            x: 1.0,
            alpha: 0.5,
            ..Default::default()
        });
        list.push(DisplayInstance::default());
        assert_eq!(list.instance_count(), 2);
        assert_eq!(list.as_floats().len(), 24);
        assert_eq!(list.as_floats()[0], 1.0);
        assert_eq!(list.as_floats()[7], 0.5);
    }

    #[test]
    fn extras_serialize_tagged() {
        let mut list = DisplayList::new();
        let index = list.push_extra(DisplayExtra::Text {
            content: String::from("Score: 0"),
            font: String::from("20px puzzler"),
            fill: String::from("black"),
        });
        assert_eq!(index, 0);
        let json: serde_json::Value = serde_json::from_str(&list.extras_json()).unwrap();
        assert_eq!(json[0]["type"], "text");
        assert_eq!(json[0]["content"], "Score: 0");
    }
}
