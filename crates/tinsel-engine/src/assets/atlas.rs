use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A texture atlas in TexturePacker's JSON format, hash or array flavour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasFile {
    pub frames: AtlasFrames,
    #[serde(default)]
    pub meta: AtlasMeta,
}

/// Frames keyed by name (hash export) or listed with a `filename` (array export).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AtlasFrames {
    Hash(BTreeMap<String, FrameEntry>),
    Array(Vec<NamedFrame>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameEntry {
    pub frame: FrameRect,
    /// Packed rotated 90 degrees clockwise.
    #[serde(default)]
    pub rotated: bool,
    #[serde(default)]
    pub trimmed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedFrame {
    pub filename: String,
    #[serde(flatten)]
    pub entry: FrameEntry,
}

/// Pixel rectangle inside the atlas image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtlasMeta {
    /// Image file name, relative to the atlas JSON.
    #[serde(default)]
    pub image: String,
}

impl AtlasFile {
    /// Parse an atlas from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Every frame as `(name, entry)`. Hash atlases come out sorted by name,
    /// array atlases in file order.
    pub fn frames(&self) -> Vec<(&str, &FrameEntry)> {
        match &self.frames {
            AtlasFrames::Hash(map) => map.iter().map(|(name, entry)| (name.as_str(), entry)).collect(),
            AtlasFrames::Array(list) => list.iter().map(|f| (f.filename.as_str(), &f.entry)).collect(),
        }
    }

    /// Path of the atlas image, resolved against the directory of `json_path`.
    pub fn image_path(&self, json_path: &str) -> String {
        match json_path.rfind('/') {
            Some(slash) => format!("{}/{}", &json_path[..slash], self.meta.image),
            None => self.meta.image.clone(),
        }
    }
}

impl FrameEntry {
    /// Size of the frame as displayed.
    pub fn size(&self) -> (f32, f32) {
        if self.rotated {
            (self.frame.h, self.frame.w)
        } else {
            (self.frame.w, self.frame.h)
        }
    }
}
