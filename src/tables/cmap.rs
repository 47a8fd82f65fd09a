use crate::font::get_search_range;
use otspec::types::*;
use otspec::{
    table, DeserializationError, Deserialize, Deserializer, ReaderContext, SerializationError,
    Serialize, Tag,
};
use std::collections::BTreeMap;
use std::convert::TryInto;

/// The 'cmap' OpenType tag.
pub const TAG: Tag = Tag::new(b"cmap");

table!(
    EncodingRecord {
        uint16 platformID
        uint16 encodingID
        uint32 subtableOffset
    }

    SequentialMapGroup {
        uint32 startCharCode
        uint32 endCharCode
        uint32 startGlyphID
    }
);

/// Runs of consecutive code points mapped to consecutive glyph IDs, as
/// `(first code point, last code point, first glyph)`.
fn runs(map: &BTreeMap<uint32, uint16>) -> Vec<(uint32, uint32, uint16)> {
    let mut runs: Vec<(uint32, uint32, uint16)> = vec![];
    for (&code, &gid) in map {
        if let Some(last) = runs.last_mut() {
            let offset = code - last.0;
            if code == last.1 + 1 && u32::from(last.2) + offset == u32::from(gid) {
                last.1 = code;
                continue;
            }
        }
        runs.push((code, code, gid));
    }
    runs
}

/// A format 4 subtable. Every segment is written in idDelta form, so the
/// glyph ID array is only ever non-empty when reading other fonts.
#[allow(non_camel_case_types, non_snake_case)]
#[derive(Clone, Debug, PartialEq)]
pub struct cmap4 {
    language: uint16,
    endCode: Vec<uint16>,
    startCode: Vec<uint16>,
    idDelta: Vec<int16>,
    idRangeOffsets: Vec<uint16>,
    glyphIdArray: Vec<uint16>,
}

impl cmap4 {
    pub fn from_mapping(
        language: uint16,
        map: &BTreeMap<uint32, uint16>,
    ) -> Result<Self, SerializationError> {
        let mut subtable = cmap4 {
            language,
            endCode: vec![],
            startCode: vec![],
            idDelta: vec![],
            idRangeOffsets: vec![],
            glyphIdArray: vec![],
        };
        for (start, end, gid) in runs(map) {
            // U+FFFF is reserved for the terminating segment
            let end = end.min(0xFFFE);
            if start > end {
                log::debug!("U+FFFF cannot be mapped in a format 4 subtable");
                continue;
            }
            let start: uint16 = start.try_into().map_err(|_| {
                SerializationError(format!("U+{:04X} is outside the BMP", start))
            })?;
            let end = end as uint16;
            subtable.startCode.push(start);
            subtable.endCode.push(end);
            subtable.idDelta.push(gid.wrapping_sub(start) as int16);
            subtable.idRangeOffsets.push(0);
        }
        subtable.startCode.push(0xFFFF);
        subtable.endCode.push(0xFFFF);
        subtable.idDelta.push(1);
        subtable.idRangeOffsets.push(0);
        Ok(subtable)
    }

    fn seg_count(&self) -> usize {
        self.endCode.len()
    }

    fn length(&self) -> usize {
        16 + 8 * self.seg_count() + 2 * self.glyphIdArray.len()
    }

    pub fn to_mapping(&self) -> BTreeMap<uint32, uint16> {
        let mut map = BTreeMap::new();
        let seg_count = self.seg_count();
        for i in 0..seg_count {
            let (start, end) = (self.startCode[i], self.endCode[i]);
            if start == 0xFFFF {
                break;
            }
            let delta = self.idDelta[i] as uint16;
            let range_offset = usize::from(self.idRangeOffsets[i]);
            for code in start..=end {
                let gid = if range_offset == 0 {
                    code.wrapping_add(delta)
                } else {
                    let index = (range_offset / 2 + usize::from(code - start) + i)
                        .checked_sub(seg_count);
                    match index.and_then(|ix| self.glyphIdArray.get(ix)) {
                        Some(0) | None => 0,
                        Some(g) => g.wrapping_add(delta),
                    }
                };
                if gid != 0 {
                    map.insert(u32::from(code), gid);
                }
            }
        }
        map
    }
}

impl Serialize for cmap4 {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        let length: uint16 = self.length().try_into().map_err(|_| {
            SerializationError("Format 4 cmap subtable is too large".to_string())
        })?;
        let seg_count = self.seg_count() as uint16;
        let (search_range, entry_selector, range_shift) = get_search_range(seg_count, 2);
        4_u16.to_bytes(data)?;
        length.to_bytes(data)?;
        self.language.to_bytes(data)?;
        (seg_count * 2).to_bytes(data)?;
        search_range.to_bytes(data)?;
        entry_selector.to_bytes(data)?;
        range_shift.to_bytes(data)?;
        self.endCode.to_bytes(data)?;
        0_u16.to_bytes(data)?;
        self.startCode.to_bytes(data)?;
        self.idDelta.to_bytes(data)?;
        self.idRangeOffsets.to_bytes(data)?;
        self.glyphIdArray.to_bytes(data)
    }
}

impl Deserialize for cmap4 {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let _format: uint16 = c.de()?;
        let length: uint16 = c.de()?;
        let language: uint16 = c.de()?;
        let seg_count_x2: uint16 = c.de()?;
        let seg_count = usize::from(seg_count_x2 / 2);
        c.skip(6);
        let end_code: Vec<uint16> = c.de_counted(seg_count)?;
        c.skip(2);
        let start_code: Vec<uint16> = c.de_counted(seg_count)?;
        let id_delta: Vec<int16> = c.de_counted(seg_count)?;
        let id_range_offsets: Vec<uint16> = c.de_counted(seg_count)?;
        let remainder = usize::from(length).saturating_sub(16 + seg_count * 8);
        let glyph_id_array: Vec<uint16> = c.de_counted(remainder / 2)?;
        Ok(cmap4 {
            language,
            endCode: end_code,
            startCode: start_code,
            idDelta: id_delta,
            idRangeOffsets: id_range_offsets,
            glyphIdArray: glyph_id_array,
        })
    }
}

/// A format 12 subtable, for mappings that leave the BMP.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, PartialEq)]
pub struct cmap12 {
    language: uint32,
    groups: Vec<SequentialMapGroup>,
}

impl cmap12 {
    pub fn from_mapping(language: uint16, map: &BTreeMap<uint32, uint16>) -> Self {
        cmap12 {
            language: language.into(),
            groups: runs(map)
                .into_iter()
                .map(|(start, end, gid)| SequentialMapGroup {
                    startCharCode: start,
                    endCharCode: end,
                    startGlyphID: gid.into(),
                })
                .collect(),
        }
    }

    pub fn to_mapping(&self) -> BTreeMap<uint32, uint16> {
        let mut map = BTreeMap::new();
        for group in &self.groups {
            for code in group.startCharCode..=group.endCharCode {
                let gid = group.startGlyphID + (code - group.startCharCode);
                map.insert(code, gid as uint16);
            }
        }
        map
    }
}

impl Serialize for cmap12 {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        let length = 16 + 12 * self.groups.len();
        12_u16.to_bytes(data)?;
        0_u16.to_bytes(data)?;
        (length as uint32).to_bytes(data)?;
        self.language.to_bytes(data)?;
        (self.groups.len() as uint32).to_bytes(data)?;
        self.groups.to_bytes(data)
    }
}

impl Deserialize for cmap12 {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        c.skip(8);
        let language: uint32 = c.de()?;
        let num_groups: uint32 = c.de()?;
        let groups = c.de_counted(num_groups as usize)?;
        Ok(cmap12 { language, groups })
    }
}

/// One encoding of the character map.
#[allow(non_snake_case)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CmapSubtable {
    /// 4 or 12.
    pub format: uint16,
    pub platformID: uint16,
    pub encodingID: uint16,
    pub languageID: uint16,
    pub mapping: BTreeMap<uint32, uint16>,
}

impl CmapSubtable {
    /// A Windows Unicode subtable: format 4 on the BMP encoding when every
    /// code point fits, format 12 on the full-repertoire encoding otherwise.
    pub fn windows_unicode(mapping: BTreeMap<uint32, uint16>) -> Self {
        let bmp_only = mapping.keys().next_back().map_or(true, |&c| c < 0xFFFF);
        let bmp_segments = runs(&mapping).len() + 1;
        if bmp_only && 16 + 8 * bmp_segments <= usize::from(u16::MAX) {
            CmapSubtable {
                format: 4,
                platformID: 3,
                encodingID: 1,
                languageID: 0,
                mapping,
            }
        } else {
            CmapSubtable {
                format: 12,
                platformID: 3,
                encodingID: 10,
                languageID: 0,
                mapping,
            }
        }
    }
}

impl Serialize for CmapSubtable {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        match self.format {
            4 => cmap4::from_mapping(self.languageID, &self.mapping)?.to_bytes(data),
            12 => cmap12::from_mapping(self.languageID, &self.mapping).to_bytes(data),
            f => Err(SerializationError(format!("Can't write cmap format {}", f))),
        }
    }
}

#[allow(non_camel_case_types)]
#[derive(Clone, Debug, PartialEq)]
pub struct cmap {
    pub subtables: Vec<CmapSubtable>,
}

impl cmap {
    pub fn new(mapping: BTreeMap<uint32, uint16>) -> Self {
        cmap {
            subtables: vec![CmapSubtable::windows_unicode(mapping)],
        }
    }
}

impl Serialize for cmap {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        let mut output: Vec<u8> = vec![];
        let mut records: Vec<EncodingRecord> = vec![];
        let offset_base = 4 + 8 * self.subtables.len();
        for st in &self.subtables {
            records.push(EncodingRecord {
                platformID: st.platformID,
                encodingID: st.encodingID,
                subtableOffset: (offset_base + output.len()) as uint32,
            });
            st.to_bytes(&mut output)?;
        }
        0_u16.to_bytes(data)?;
        (records.len() as uint16).to_bytes(data)?;
        records.to_bytes(data)?;
        output.to_bytes(data)
    }
}

impl Deserialize for cmap {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let start = c.ptr;
        let _version: uint16 = c.de()?;
        let num_tables: uint16 = c.de()?;
        let records: Vec<EncodingRecord> = c.de_counted(num_tables.into())?;
        let mut subtables = Vec::with_capacity(records.len());
        for er in records {
            c.seek(start + er.subtableOffset as usize)?;
            let peeked = c.peek(2)?;
            let format = u16::from_be_bytes([peeked[0], peeked[1]]);
            let (language, mapping) = match format {
                4 => {
                    let st: cmap4 = c.de()?;
                    (st.language, st.to_mapping())
                }
                12 => {
                    let st: cmap12 = c.de()?;
                    (st.language as uint16, st.to_mapping())
                }
                other => {
                    return Err(DeserializationError(format!(
                        "Unsupported cmap subtable format {}",
                        other
                    )))
                }
            };
            subtables.push(CmapSubtable {
                format,
                platformID: er.platformID,
                encodingID: er.encodingID,
                languageID: language,
                mapping,
            });
        }
        Ok(cmap { subtables })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mapping(pairs: &[(u32, u16)]) -> BTreeMap<u32, u16> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn format4_bytes() {
        let table = cmap::new(mapping(&[(32, 1), (160, 1), (65, 2)]));
        let expected = vec![
            0x00, 0x00, 0x00, 0x01, 0x00, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, 0x0c, 0x00, 0x04,
            0x00, 0x30, 0x00, 0x00, 0x00, 0x08, 0x00, 0x08, 0x00, 0x02, 0x00, 0x00, 0x00, 0x20,
            0x00, 0x41, 0x00, 0xa0, 0xff, 0xff, 0x00, 0x00, 0x00, 0x20, 0x00, 0x41, 0x00, 0xa0,
            0xff, 0xff, 0xff, 0xe1, 0xff, 0xc1, 0xff, 0x61, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];
        let serialized = otspec::ser::to_bytes(&table).unwrap();
        assert_eq!(serialized, expected);
        let deserialized: cmap = otspec::de::from_bytes(&serialized).unwrap();
        assert_eq!(deserialized, table);
    }

    #[test]
    fn runs_merge_into_segments() {
        let map = mapping(&[(0x41, 3), (0x42, 4), (0x43, 5), (0x45, 6), (0x46, 2)]);
        assert_eq!(
            runs(&map),
            vec![(0x41, 0x43, 3), (0x45, 0x45, 6), (0x46, 0x46, 2)]
        );
        let st = cmap4::from_mapping(0, &map).unwrap();
        assert_eq!(st.seg_count(), 4);
        assert_eq!(st.to_mapping(), map);
    }

    #[test]
    fn reads_glyph_id_array_segments() {
        // One segment 'a'..'c' resolved through the glyph ID array.
        let st = cmap4 {
            language: 0,
            endCode: vec![0x63, 0xFFFF],
            startCode: vec![0x61, 0xFFFF],
            idDelta: vec![0, 1],
            idRangeOffsets: vec![4, 0],
            glyphIdArray: vec![7, 0, 9],
        };
        assert_eq!(st.to_mapping(), mapping(&[(0x61, 7), (0x63, 9)]));
        let bytes = otspec::ser::to_bytes(&st).unwrap();
        let back: cmap4 = otspec::de::from_bytes(&bytes).unwrap();
        assert_eq!(back, st);
    }

    #[test]
    fn astral_plane_uses_format12() {
        let map = mapping(&[(0x20, 1), (0x1F600, 2), (0x1F601, 3)]);
        let table = cmap::new(map.clone());
        assert_eq!(table.subtables[0].format, 12);
        assert_eq!(table.subtables[0].encodingID, 10);
        let serialized = otspec::ser::to_bytes(&table).unwrap();
        // header, one record, then a 16-byte group header and two groups
        assert_eq!(serialized.len(), 4 + 8 + 16 + 2 * 12);
        let deserialized: cmap = otspec::de::from_bytes(&serialized).unwrap();
        assert_eq!(deserialized.subtables[0].mapping, map);
    }

    #[test]
    fn empty_mapping_is_only_terminator() {
        let table = cmap::new(BTreeMap::new());
        assert_eq!(table.subtables[0].format, 4);
        let serialized = otspec::ser::to_bytes(&table).unwrap();
        assert_eq!(serialized.len(), 4 + 8 + 16 + 8);
        let deserialized: cmap = otspec::de::from_bytes(&serialized).unwrap();
        assert!(deserialized.subtables[0].mapping.is_empty());
    }
}
