use crate::error::SerializationError;
use otspec::types::*;
use otspec::{DeserializationError, Deserializer, ReaderContext, Serialize, Tag};

/// The 'loca' OpenType tag.
pub const TAG: Tag = Tag::new(b"loca");

/// How glyph offsets are stored; mirrored by `head.indexToLocFormat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaFormat {
    /// Offset divided by two, as `uint16`.
    Short,
    Long,
}

impl LocaFormat {
    pub fn index_to_loc_format(self) -> int16 {
        match self {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        }
    }

    pub fn from_index_to_loc_format(value: int16) -> Option<Self> {
        match value {
            0 => Some(LocaFormat::Short),
            1 => Some(LocaFormat::Long),
            _ => None,
        }
    }
}

/// Byte offsets of each glyph in `glyf`, plus the end of the last glyph.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct loca {
    pub indices: Vec<uint32>,
}

impl loca {
    /// Whether every offset survives being halved into a `uint16`.
    pub fn fits_short(&self) -> bool {
        self.indices.iter().all(|&o| o % 2 == 0 && o / 2 <= 0xFFFF)
    }

    pub fn to_bytes(&self, format: LocaFormat) -> Result<Vec<u8>, SerializationError> {
        let mut data = vec![];
        match format {
            LocaFormat::Long => self.indices.to_bytes(&mut data)?,
            LocaFormat::Short => {
                if !self.fits_short() {
                    let end = self.indices.last().copied().unwrap_or(0);
                    return Err(SerializationError::ShortLocaOverflow(end));
                }
                for offset in &self.indices {
                    ((offset / 2) as uint16).to_bytes(&mut data)?;
                }
            }
        }
        Ok(data)
    }

    /// Byte range of glyph `gid` within `glyf`.
    pub fn glyph_range(&self, gid: usize) -> Option<std::ops::Range<usize>> {
        let start = *self.indices.get(gid)? as usize;
        let end = *self.indices.get(gid + 1)? as usize;
        (start <= end).then(|| start..end)
    }
}

/// Read `num_glyphs + 1` offsets.
pub fn from_bytes(
    c: &mut ReaderContext,
    format: LocaFormat,
    num_glyphs: uint16,
) -> Result<loca, DeserializationError> {
    let count = usize::from(num_glyphs) + 1;
    let indices = match format {
        LocaFormat::Long => c.de_counted(count)?,
        LocaFormat::Short => {
            let halves: Vec<uint16> = c.de_counted(count)?;
            halves.into_iter().map(|x| u32::from(x) * 2).collect()
        }
    };
    Ok(loca { indices })
}
