use glam::Vec2;

use crate::components::sprite::Texture;

/// Text content drawn by the host renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextComponent {
    pub content: String,
    /// CSS-style font string, e.g. "20px puzzler".
    pub font: String,
    pub fill: String,
}

impl TextComponent {
    pub fn new(content: impl Into<String>, font: impl Into<String>, fill: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font: font.into(),
            fill: fill.into(),
        }
    }

    /// Rough layout box, used until the host reports a measured size.
    /// Reads the pixel size from the font string and assumes ~0.6em glyphs.
    pub fn estimated_size(&self) -> Vec2 {
        let px = self
            .font
            .split_whitespace()
            .find_map(|part| part.strip_suffix("px").and_then(|n| n.parse::<f32>().ok()))
            .unwrap_or(16.0);
        Vec2::new(self.content.chars().count() as f32 * px * 0.6, px)
    }
}

/// Filled and optionally stroked rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct RectangleComponent {
    pub fill: String,
    pub stroke: String,
    pub line_width: f32,
}

impl RectangleComponent {
    pub fn new(fill: impl Into<String>) -> Self {
        Self {
            fill: fill.into(),
            stroke: String::from("none"),
            line_width: 0.0,
        }
    }

    pub fn with_stroke(mut self, stroke: impl Into<String>, line_width: f32) -> Self {
        self.stroke = stroke.into();
        self.line_width = line_width;
        self
    }
}

/// A texture repeated over the node's area, scrolled by `tile_offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct TilingComponent {
    pub texture: Texture,
    pub tile_offset: Vec2,
}

impl TilingComponent {
    pub fn new(texture: Texture) -> Self {
        Self {
            texture,
            tile_offset: Vec2::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_size_from_font_string() {
        let text = TextComponent::new("Score", "20px puzzler", "violet");
        let size = text.estimated_size();
        assert_eq!(size.y, 20.0);
        assert!((size.x - 60.0).abs() < 0.001);
    }

    #[test]
    fn text_size_without_px_falls_back() {
        let text = TextComponent::new("ab", "bold serif", "black");
        assert_eq!(text.estimated_size().y, 16.0);
    }
}
