use crate::error::MappingError;
use crate::registry::GlyphOrder;
use std::collections::BTreeMap;

/// Code point to glyph name, as supplied by the font source. Later
/// assignments to the same code point replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterMap {
    entries: BTreeMap<char, String>,
}

/// What to do with a code point whose glyph is not in the font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingPolicy {
    /// Leave the code point unmapped.
    #[default]
    Lenient,
    /// Fail the build.
    Strict,
}

impl CharacterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, codepoint: char, glyph: impl Into<String>) {
        let glyph = glyph.into();
        if let Some(previous) = self.entries.insert(codepoint, glyph.clone()) {
            if previous != glyph {
                log::debug!(
                    "U+{:04X} reassigned from '{}' to '{}'",
                    u32::from(codepoint),
                    previous,
                    glyph
                );
            }
        }
    }

    pub fn get(&self, codepoint: char) -> Option<&str> {
        self.entries.get(&codepoint).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.entries.iter().map(|(c, g)| (*c, g.as_str()))
    }

    /// Resolve glyph names against the frozen glyph order. The result is
    /// keyed by code point, so it is strictly ascending with no duplicates.
    pub fn resolve(
        &self,
        glyphs: &GlyphOrder,
        policy: MappingPolicy,
    ) -> Result<BTreeMap<u32, u16>, MappingError> {
        let mut mapping = BTreeMap::new();
        for (codepoint, name) in self.iter() {
            match glyphs.glyph_id(name) {
                Some(gid) => {
                    mapping.insert(u32::from(codepoint), gid);
                }
                None if policy == MappingPolicy::Strict => {
                    return Err(MappingError::UnregisteredGlyph {
                        codepoint: codepoint.into(),
                        glyph: name.to_string(),
                    })
                }
                None => log::debug!(
                    "Dropping U+{:04X}: no glyph named '{}'",
                    u32::from(codepoint),
                    name
                ),
            }
        }
        Ok(mapping)
    }
}

impl<S: Into<String>> FromIterator<(char, S)> for CharacterMap {
    fn from_iter<I: IntoIterator<Item = (char, S)>>(iter: I) -> Self {
        let mut map = CharacterMap::new();
        for (codepoint, glyph) in iter {
            map.insert(codepoint, glyph);
        }
        map
    }
}

/// Parse a code point written as `U+0041`, `0x41` or `65`.
pub fn parse_codepoint(text: &str) -> Result<char, MappingError> {
    let invalid = || MappingError::InvalidCodepoint(text.to_string());
    let trimmed = text.trim();
    let value = if let Some(hex) = trimmed
        .strip_prefix("U+")
        .or_else(|| trimmed.strip_prefix("u+"))
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16).map_err(|_| invalid())?
    } else {
        trimmed.parse::<u32>().map_err(|_| invalid())?
    };
    char::from_u32(value).ok_or_else(invalid)
}
