use serde::{Deserialize, Serialize};

use crate::resources::store::{Identifiable, RetagToken};

/// Texture metadata known to the simulation.
///
/// Pixel data lives in the renderer; the core only needs the sheet size to
/// cut animation frames and to size non-animated sprites. `source` is an
/// optional hint (usually a file path) the renderer can load from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureInfo {
    id: String,
    tag: String,
    pub width: u32,
    pub height: u32,
    pub source: Option<String>,
}

impl TextureInfo {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            tag: String::from("texture"),
            width,
            height,
            source: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Identifiable for TextureInfo {
    fn id(&self) -> &str {
        &self.id
    }
    fn tag(&self) -> &str {
        &self.tag
    }
    fn set_tag(&mut self, tag: String, _: RetagToken) {
        self.tag = tag;
    }
}
