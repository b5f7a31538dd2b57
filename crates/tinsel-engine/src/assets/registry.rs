use std::collections::HashMap;

use crate::assets::atlas::AtlasFile;
use crate::components::sprite::{Texture, TextureId};

/// Where a texture's pixels live, for the host renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRegion {
    pub image: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotated: bool,
}

/// Handle to a loaded sound, played by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(pub u32);

/// Handle to a loaded font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// Every loaded asset, looked up by name.
///
/// Atlas frames register under their frame name, standalone images, sounds
/// and fonts under their path, plain JSON under its path.
#[derive(Debug, Default)]
pub struct AssetTable {
    textures: HashMap<String, Texture>,
    regions: Vec<TextureRegion>,
    sounds: HashMap<String, SoundId>,
    fonts: HashMap<String, FontId>,
    data: HashMap<String, serde_json::Value>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_region(&mut self, name: &str, region: TextureRegion) -> Texture {
        let id = TextureId(self.regions.len() as u32);
        let texture = Texture::new(id, region.width, region.height);
        self.regions.push(region);
        if self.textures.insert(name.to_owned(), texture).is_some() {
            log::warn!("texture `{}` registered twice, keeping the latest", name);
        }
        texture
    }

    /// Register a whole image as one texture.
    pub fn register_image(&mut self, path: &str, width: f32, height: f32) -> Texture {
        self.add_region(
            path,
            TextureRegion {
                image: path.to_owned(),
                x: 0.0,
                y: 0.0,
                width,
                height,
                rotated: false,
            },
        )
    }

    /// Register every frame of an atlas. Returns the number of frames added.
    pub fn register_atlas(&mut self, json_path: &str, atlas: &AtlasFile) -> usize {
        let image = atlas.image_path(json_path);
        let frames = atlas.frames();
        for (name, entry) in &frames {
            let (width, height) = entry.size();
            self.add_region(
                name,
                TextureRegion {
                    image: image.clone(),
                    x: entry.frame.x,
                    y: entry.frame.y,
                    width,
                    height,
                    rotated: entry.rotated,
                },
            );
        }
        frames.len()
    }

    pub fn register_sound(&mut self, path: &str) -> SoundId {
        let next = SoundId(self.sounds.len() as u32);
        *self.sounds.entry(path.to_owned()).or_insert(next)
    }

    pub fn register_font(&mut self, path: &str) -> FontId {
        let next = FontId(self.fonts.len() as u32);
        *self.fonts.entry(path.to_owned()).or_insert(next)
    }

    pub fn register_data(&mut self, path: &str, value: serde_json::Value) {
        self.data.insert(path.to_owned(), value);
    }

    // -- Lookup --

    pub fn texture(&self, name: &str) -> Option<Texture> {
        self.textures.get(name).copied()
    }

    /// Textures for several names, skipping unknown ones.
    pub fn frames(&self, names: &[&str]) -> Vec<Texture> {
        names
            .iter()
            .filter_map(|name| {
                let texture = self.texture(name);
                if texture.is_none() {
                    log::warn!("unknown texture `{}`", name);
                }
                texture
            })
            .collect()
    }

    /// Numbered frames `prefix{start..=end}suffix`, e.g. `explosion0.png`.
    pub fn frame_series(&self, start: u32, end: u32, prefix: &str, suffix: &str) -> Vec<Texture> {
        let names: Vec<String> = (start..=end).map(|i| format!("{prefix}{i}{suffix}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        self.frames(&refs)
    }

    pub fn region(&self, id: TextureId) -> Option<&TextureRegion> {
        self.regions.get(id.0 as usize)
    }

    pub fn sound(&self, path: &str) -> Option<SoundId> {
        self.sounds.get(path).copied()
    }

    pub fn font(&self, path: &str) -> Option<FontId> {
        self.fonts.get(path).copied()
    }

    pub fn data(&self, path: &str) -> Option<&serde_json::Value> {
        self.data.get(path)
    }

    pub fn texture_count(&self) -> usize {
        self.regions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atlas() -> AtlasFile {
        AtlasFile::from_json(
            r#"{
                "frames": {
                    "explosion0.png": { "frame": { "x": 0, "y": 0, "w": 16, "h": 16 } },
                    "explosion1.png": { "frame": { "x": 16, "y": 0, "w": 16, "h": 16 } },
                    "paddle.png": { "frame": { "x": 32, "y": 0, "w": 96, "h": 16 } }
                },
                "meta": { "image": "breakout.png" }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn atlas_frames_register_by_name() {
        let mut table = AssetTable::new();
        assert_eq!(table.register_atlas("images/breakout.json", &atlas()), 3);

        let paddle = table.texture("paddle.png").unwrap();
        assert_eq!((paddle.width, paddle.height), (96.0, 16.0));
        let region = table.region(paddle.id).unwrap();
        assert_eq!(region.image, "images/breakout.png");
        assert_eq!(region.x, 32.0);
    }

    #[test]
    fn frame_series_skips_missing() {
        let mut table = AssetTable::new();
        table.register_atlas("breakout.json", &atlas());
        let frames = table.frame_series(0, 2, "explosion", ".png");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1], table.texture("explosion1.png").unwrap());
    }

    #[test]
    fn sounds_and_fonts_are_stable_handles() {
        let mut table = AssetTable::new();
        let bounce = table.register_sound("sounds/bounce.wav");
        table.register_sound("sounds/music.mp3");
        assert_eq!(table.register_sound("sounds/bounce.wav"), bounce);
        assert_eq!(table.sound("sounds/bounce.wav"), Some(bounce));
        assert_eq!(table.font("fonts/puzzler.otf"), None);
        table.register_font("fonts/puzzler.otf");
        assert!(table.font("fonts/puzzler.otf").is_some());
    }

    #[test]
    fn images_register_by_path() {
        let mut table = AssetTable::new();
        let texture = table.register_image("images/bg.png", 512.0, 512.0);
        assert_eq!(table.texture("images/bg.png"), Some(texture));
        assert!(table.texture("bg.png").is_none());
    }
}
