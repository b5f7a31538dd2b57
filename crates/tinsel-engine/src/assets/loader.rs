//! Asset list loading through a host-provided source.

use std::collections::HashMap;

use crate::api::error::AssetError;
use crate::assets::atlas::AtlasFile;
use crate::assets::registry::AssetTable;

/// Asset category, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Json,
    Audio,
    Font,
}

impl AssetKind {
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
        let kind = match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "webp" => AssetKind::Image,
            "json" => AssetKind::Json,
            "mp3" | "ogg" | "wav" | "webm" => AssetKind::Audio,
            "ttf" | "otf" | "ttc" | "woff" | "woff2" => AssetKind::Font,
            _ => return None,
        };
        Some(kind)
    }
}

/// What a source hands back for one path.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Text(String),
    Image { width: f32, height: f32 },
    /// Decoded and held by the host.
    Audio,
    /// Registered with the host's font system.
    Font,
}

impl Fetched {
    fn label(&self) -> &'static str {
        match self {
            Fetched::Text(_) => "text",
            Fetched::Image { .. } => "image",
            Fetched::Audio => "audio",
            Fetched::Font => "font",
        }
    }
}

/// Fetches asset contents. Implemented by the host environment.
pub trait AssetSource {
    fn fetch(&mut self, path: &str, kind: AssetKind) -> Result<Fetched, AssetError>;
}

/// Source backed by entries pushed in ahead of loading.
#[derive(Debug, Default)]
pub struct MemorySource {
    entries: HashMap<String, Fetched>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, fetched: Fetched) {
        self.entries.insert(path.into(), fetched);
    }

    pub fn insert_text(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.insert(path, Fetched::Text(text.into()));
    }

    pub fn insert_image(&mut self, path: impl Into<String>, width: f32, height: f32) {
        self.insert(path, Fetched::Image { width, height });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AssetSource for MemorySource {
    fn fetch(&mut self, path: &str, _kind: AssetKind) -> Result<Fetched, AssetError> {
        self.entries.get(path).cloned().ok_or_else(|| AssetError::Fetch {
            path: path.to_owned(),
            reason: String::from("not provided by the host"),
        })
    }
}

/// Progress report after each asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress<'a> {
    pub loaded: usize,
    pub total: usize,
    pub path: &'a str,
}

impl LoadProgress<'_> {
    /// Fraction loaded, 0 to 1.
    pub fn ratio(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.loaded as f32 / self.total as f32
        }
    }
}

/// Load every path into a fresh table, reporting progress after each one.
/// Stops at the first failure.
pub fn load_assets<S: AsRef<str>>(
    paths: &[S],
    source: &mut dyn AssetSource,
    mut on_progress: impl FnMut(LoadProgress<'_>),
) -> Result<AssetTable, AssetError> {
    let mut table = AssetTable::new();
    let total = paths.len();

    for (index, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        let kind = AssetKind::from_path(path).ok_or_else(|| AssetError::Unsupported {
            path: path.to_owned(),
        })?;
        let fetched = source.fetch(path, kind)?;
        register(&mut table, path, kind, fetched)?;
        on_progress(LoadProgress {
            loaded: index + 1,
            total,
            path,
        });
    }

    log::info!("loaded {} assets ({} textures)", total, table.texture_count());
    Ok(table)
}

fn register(table: &mut AssetTable, path: &str, kind: AssetKind, fetched: Fetched) -> Result<(), AssetError> {
    let mismatch = |expected: &'static str, fetched: &Fetched| AssetError::UnexpectedContent {
        path: path.to_owned(),
        expected,
        found: fetched.label(),
    };

    match (kind, fetched) {
        (AssetKind::Image, Fetched::Image { width, height }) => {
            table.register_image(path, width, height);
        }
        (AssetKind::Json, Fetched::Text(text)) => {
            let parse_error = |source| AssetError::Parse {
                path: path.to_owned(),
                source,
            };
            let value: serde_json::Value = serde_json::from_str(&text).map_err(parse_error)?;
            if value.get("frames").is_some() {
                let atlas: AtlasFile = serde_json::from_value(value).map_err(parse_error)?;
                let count = table.register_atlas(path, &atlas);
                log::debug!("atlas `{}`: {} frames", path, count);
            } else {
                table.register_data(path, value);
            }
        }
        (AssetKind::Audio, Fetched::Audio) => {
            table.register_sound(path);
        }
        (AssetKind::Font, Fetched::Font) => {
            table.register_font(path);
        }
        (AssetKind::Image, other) => return Err(mismatch("image", &other)),
        (AssetKind::Json, other) => return Err(mismatch("text", &other)),
        (AssetKind::Audio, other) => return Err(mismatch("audio", &other)),
        (AssetKind::Font, other) => return Err(mismatch("font", &other)),
    }
    Ok(())
}
