use crate::error::SerializationError;
use crate::font::read_directory;
use crate::tables;
use crate::tables::loca::LocaFormat;
use otspec::{Deserialize, ReaderContext, Serialize, Tag};
use std::collections::BTreeMap;

/// The compiled tables of a font, keyed by tag.
///
/// Tables are held as bytes; typed views are decoded on request, reading
/// the tables they depend on (`head` before `loca`, `hhea` before `hmtx`,
/// `loca` before `glyf`) as needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontTableSet {
    tables: BTreeMap<Tag, Vec<u8>>,
}

impl FontTableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Returns `true` if the provided tag is a table in this set.
    pub fn contains(&self, tag: Tag) -> bool {
        self.tables.contains_key(&tag)
    }

    pub fn insert(&mut self, tag: Tag, data: Vec<u8>) -> Option<Vec<u8>> {
        self.tables.insert(tag, data)
    }

    /// Serialize a table and store its bytes.
    pub fn insert_table<T: Serialize>(
        &mut self,
        tag: Tag,
        table: &T,
    ) -> Result<(), SerializationError> {
        let data = otspec::ser::to_bytes(table)?;
        self.tables.insert(tag, data);
        Ok(())
    }

    pub fn get(&self, tag: Tag) -> Option<&[u8]> {
        self.tables.get(&tag).map(Vec::as_slice)
    }

    /// Tags and bytes in ascending tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&Tag, &Vec<u8>)> {
        self.tables.iter()
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tables.keys()
    }

    /// Split a finished sfnt binary back into its tables.
    pub fn from_sfnt(bytes: &[u8]) -> Result<Self, SerializationError> {
        let (_, records) = read_directory(bytes)?;
        let tables = records
            .into_iter()
            .map(|r| {
                let start = r.offset as usize;
                (r.tag, bytes[start..start + r.length as usize].to_vec())
            })
            .collect();
        Ok(FontTableSet { tables })
    }

    fn required(&self, tag: Tag) -> Result<&[u8], SerializationError> {
        self.get(tag).ok_or(SerializationError::MissingTable(tag))
    }

    /// Decode a self-contained table.
    pub fn decode<T: Deserialize>(&self, tag: Tag) -> Result<T, SerializationError> {
        Ok(otspec::de::from_bytes(self.required(tag)?)?)
    }

    pub fn head(&self) -> Result<tables::head::head, SerializationError> {
        self.decode(tables::head::TAG)
    }

    pub fn hmtx(&self) -> Result<tables::hmtx::hmtx, SerializationError> {
        let hhea: tables::hhea::hhea = self.decode(tables::hhea::TAG)?;
        let data = self.required(tables::hmtx::TAG)?;
        Ok(tables::hmtx::from_bytes(
            &mut ReaderContext::new(data.to_vec()),
            hhea.numberOfHMetrics,
        )?)
    }

    pub fn loca(&self) -> Result<tables::loca::loca, SerializationError> {
        let head = self.head()?;
        let format = LocaFormat::from_index_to_loc_format(head.indexToLocFormat).ok_or_else(
            || {
                SerializationError::Malformed(
                    tables::head::TAG,
                    format!("indexToLocFormat {}", head.indexToLocFormat),
                )
            },
        )?;
        let maxp: tables::maxp::maxp = self.decode(tables::maxp::TAG)?;
        let data = self.required(tables::loca::TAG)?;
        Ok(tables::loca::from_bytes(
            &mut ReaderContext::new(data.to_vec()),
            format,
            maxp.numGlyphs,
        )?)
    }

    pub fn glyf(&self) -> Result<tables::glyf::glyf, SerializationError> {
        let loca = self.loca()?;
        let data = self.required(tables::glyf::TAG)?;
        Ok(tables::glyf::from_bytes(data, &loca)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::SfntSerializer;
    use crate::tables::hmtx::{hmtx, Metric};

    #[test]
    fn tables_survive_container() {
        let mut set = FontTableSet::new();
        set.insert(tables::head::TAG, vec![0; 54]);
        set.insert(Tag::new(b"post"), vec![0, 3, 0, 0, 1]);
        let font = SfntSerializer::default().serialize(&set).unwrap();
        let back = FontTableSet::from_sfnt(&font).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back.get(Tag::new(b"post")), Some(&[0, 3, 0, 0, 1][..]));
        assert!(back.contains(tables::head::TAG));
    }

    #[test]
    fn hmtx_needs_hhea() {
        let mut set = FontTableSet::new();
        let table = hmtx {
            metrics: vec![
                Metric {
                    advanceWidth: 500,
                    lsb: 0,
                },
                Metric {
                    advanceWidth: 300,
                    lsb: 10,
                },
            ],
        };
        let (bytes, _) = table.to_bytes(true).unwrap();
        set.insert(tables::hmtx::TAG, bytes);
        assert_eq!(
            set.hmtx(),
            Err(SerializationError::MissingTable(tables::hhea::TAG))
        );
    }
}
