use crate::error::RegistrationError;
use crate::glyph::GlyphRecord;
use std::collections::HashMap;

pub const NOTDEF: &str = ".notdef";

/// Collects glyph records while the font is being assembled.
#[derive(Debug, Default)]
pub struct GlyphRegistry {
    records: Vec<GlyphRecord>,
    names: HashMap<String, usize>,
}

impl GlyphRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, record: GlyphRecord) -> Result<(), RegistrationError> {
        if self.names.contains_key(record.name()) {
            return Err(RegistrationError::DuplicateName(record.name().to_string()));
        }
        self.names
            .insert(record.name().to_string(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Freeze the glyph order: `.notdef` first, everything else in
    /// registration order.
    pub fn finalize(self) -> Result<GlyphOrder, RegistrationError> {
        let notdef = *self
            .names
            .get(NOTDEF)
            .ok_or(RegistrationError::MissingNotdef)?;
        if self.records.len() > usize::from(u16::MAX) {
            return Err(RegistrationError::TooManyGlyphs(self.records.len()));
        }
        let mut records = self.records;
        let first = records.remove(notdef);
        records.insert(0, first);
        let ids = records
            .iter()
            .enumerate()
            .map(|(ix, r)| (r.name().to_string(), ix as u16))
            .collect();
        Ok(GlyphOrder { records, ids })
    }
}

/// The frozen set of glyphs with their final indices.
#[derive(Debug, Clone)]
pub struct GlyphOrder {
    records: Vec<GlyphRecord>,
    ids: HashMap<String, u16>,
}

impl GlyphOrder {
    pub fn num_glyphs(&self) -> u16 {
        // finalize() caps the count at u16::MAX
        self.records.len() as u16
    }

    pub fn glyph_id(&self, name: &str) -> Option<u16> {
        self.ids.get(name).copied()
    }

    pub fn glyph(&self, id: u16) -> Option<&GlyphRecord> {
        self.records.get(usize::from(id))
    }

    pub fn glyphs(&self) -> &[GlyphRecord] {
        &self.records
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name())
    }
}
