//! JSON font sources.
use crate::charmap::{parse_codepoint, CharacterMap};
use crate::error::{Error, Result};
use crate::glyph::GlyphDescriptor;
use crate::metadata::FontMetadata;
use crate::notdef::notdef_glyph;
use crate::registry::NOTDEF;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSource {
    metadata: FontMetadata,
    #[serde(default)]
    glyphs: Vec<GlyphDescriptor>,
    #[serde(default)]
    character_map: IndexMap<String, String>,
}

/// Everything needed to build one font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSource {
    pub metadata: FontMetadata,
    /// In source order; duplicates are kept so the registry can reject them.
    pub glyphs: Vec<GlyphDescriptor>,
    pub character_map: CharacterMap,
}

impl FontSource {
    pub fn load(path: impl AsRef<Path>) -> Result<FontSource> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    /// Parse a source document; `origin` is only used in error messages.
    pub fn from_json(text: &str, origin: &Path) -> Result<FontSource> {
        let raw: RawSource = serde_json::from_str(text).map_err(|source| Error::Source {
            path: origin.to_path_buf(),
            source,
        })?;
        let mut character_map = CharacterMap::new();
        // document order, so the last spelling of a code point wins
        for (key, glyph) in raw.character_map {
            character_map.insert(parse_codepoint(&key)?, glyph);
        }
        Ok(FontSource {
            metadata: raw.metadata,
            glyphs: raw.glyphs,
            character_map,
        })
    }

    pub fn has_notdef(&self) -> bool {
        self.glyphs.iter().any(|g| g.name == NOTDEF)
    }

    /// Put a synthesized `.notdef` at the front unless the source has one.
    /// Returns whether a glyph was added.
    pub fn add_notdef(&mut self) -> bool {
        if self.has_notdef() {
            return false;
        }
        self.glyphs.insert(0, notdef_glyph(&self.metadata));
        true
    }
}
