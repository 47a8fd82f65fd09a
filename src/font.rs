//! The sfnt container: table directory, checksums and the head adjustment.
use crate::error::SerializationError;
use crate::table_store::FontTableSet;
use crate::tables::head;
use log::debug;
use otspec::types::*;
use otspec::{table, Deserializer, ReaderContext, Serializer, Tag};
use std::convert::TryInto;
use std::num::Wrapping;

/// `sfntVersion` for fonts with TrueType outlines.
pub const SFNT_VERSION_TRUETYPE: uint32 = 0x00010000;

/// The value every font's checksum identity sums to.
pub const CHECKSUM_MAGIC: uint32 = 0xB1B0AFBA;

const HEADER_SIZE: usize = 12;
const RECORD_SIZE: usize = 16;

table!(
    TableHeader {
        uint32 sfntVersion
        uint16 numTables
        uint16 searchRange
        uint16 entrySelector
        uint16 rangeShift
    }

    TableRecord {
        Tag tag
        uint32 checksum
        uint32 offset
        uint32 length
    }
);

/// The `(searchRange, entrySelector, rangeShift)` triple for a binary
/// search over `n` items of `itemsize` bytes.
pub fn get_search_range(n: uint16, itemsize: uint16) -> (uint16, uint16, uint16) {
    if n == 0 {
        return (0, 0, 0);
    }
    let entry_selector = 15 - n.leading_zeros();
    let search_range = (1_u32 << entry_selector) * u32::from(itemsize);
    let range_shift = u32::from(n) * u32::from(itemsize) - search_range;
    // every caller keeps n * itemsize within 16 bits
    (
        search_range as uint16,
        entry_selector as uint16,
        range_shift as uint16,
    )
}

/// Wrapping sum of big-endian `uint32` words, the last one zero-padded.
pub fn checksum(x: &[u8]) -> uint32 {
    let mut sum = Wrapping(0u32);
    for slice in x.chunks(4) {
        let mut word = [0u8; 4];
        word[..slice.len()].copy_from_slice(slice);
        sum += Wrapping(u32::from_be_bytes(word));
    }
    sum.0
}

/// What `head.checksumAdjustment` balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumScope {
    /// The sum of the table checksums plus the adjustment is the magic
    /// number.
    #[default]
    Tables,
    /// The checksum of the whole file, header and directory included, is
    /// the magic number.
    WholeFont,
}

/// Lays a table set out as a single sfnt binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SfntSerializer {
    pub scope: ChecksumScope,
}

fn narrow_u32(value: usize, what: &str) -> Result<uint32, SerializationError> {
    value.try_into().map_err(|_| SerializationError::Overflow {
        what: what.to_string(),
        width: 32,
    })
}

/// A copy of `head` with `checksumAdjustment` zeroed.
fn zeroed_head(data: &[u8]) -> Result<Vec<u8>, SerializationError> {
    let field = head::CHECKSUM_ADJUSTMENT_OFFSET..head::CHECKSUM_ADJUSTMENT_OFFSET + 4;
    if data.len() < field.end {
        return Err(SerializationError::Malformed(
            head::TAG,
            format!("{} bytes is too short", data.len()),
        ));
    }
    let mut copy = data.to_vec();
    copy[field].fill(0);
    Ok(copy)
}

fn read_adjustment(buffer: &[u8], head_offset: usize) -> Option<uint32> {
    let start = head_offset + head::CHECKSUM_ADJUSTMENT_OFFSET;
    let bytes: [u8; 4] = buffer.get(start..start + 4)?.try_into().ok()?;
    Some(u32::from_be_bytes(bytes))
}

impl SfntSerializer {
    pub fn new(scope: ChecksumScope) -> Self {
        SfntSerializer { scope }
    }

    pub fn serialize(&self, tables: &FontTableSet) -> Result<Vec<u8>, SerializationError> {
        if !tables.contains(head::TAG) {
            return Err(SerializationError::MissingTable(head::TAG));
        }
        let num_tables: uint16 = tables.len().try_into().map_err(|_| {
            SerializationError::Overflow {
                what: "numTables".to_string(),
                width: 16,
            }
        })?;
        let (search_range, entry_selector, range_shift) =
            get_search_range(num_tables, RECORD_SIZE as uint16);

        let mut buffer: Vec<u8> = vec![];
        buffer.put(TableHeader {
            sfntVersion: SFNT_VERSION_TRUETYPE,
            numTables: num_tables,
            searchRange: search_range,
            entrySelector: entry_selector,
            rangeShift: range_shift,
        })?;

        let mut body: Vec<u8> = vec![];
        let mut pos = HEADER_SIZE + RECORD_SIZE * tables.len();
        let mut head_offset = 0;
        let mut table_sum = Wrapping(0u32);
        // BTreeMap iteration is ascending tag order
        for (tag, data) in tables.iter() {
            let data = if *tag == head::TAG {
                head_offset = pos;
                zeroed_head(data)?
            } else {
                data.to_vec()
            };
            let table_checksum = checksum(&data);
            table_sum += Wrapping(table_checksum);
            buffer.put(TableRecord {
                tag: *tag,
                checksum: table_checksum,
                offset: narrow_u32(pos, "table offset")?,
                length: narrow_u32(data.len(), "table length")?,
            })?;
            debug!(
                "{} at {} ({} bytes, checksum {:#010x})",
                tag,
                pos,
                data.len(),
                table_checksum
            );
            let padded_len = (data.len() + 3) & !3;
            body.extend(data);
            body.resize(body.len().next_multiple_of(4), 0);
            pos += padded_len;
        }
        narrow_u32(pos, "font length")?;
        buffer.extend(body);

        let adjustment = match self.scope {
            ChecksumScope::Tables => CHECKSUM_MAGIC.wrapping_sub(table_sum.0),
            ChecksumScope::WholeFont => CHECKSUM_MAGIC.wrapping_sub(checksum(&buffer)),
        };
        let field = head_offset + head::CHECKSUM_ADJUSTMENT_OFFSET;
        buffer[field..field + 4].copy_from_slice(&adjustment.to_be_bytes());
        debug!("checksumAdjustment {:#010x}", adjustment);

        verify(&buffer, self.scope)?;
        Ok(buffer)
    }
}

/// Read the offset table and directory of an sfnt binary.
pub fn read_directory(
    bytes: &[u8],
) -> Result<(TableHeader, Vec<TableRecord>), SerializationError> {
    let mut c = ReaderContext::new(bytes.to_vec());
    let header: TableHeader = c.de()?;
    let records: Vec<TableRecord> = c.de_counted(header.numTables.into())?;
    for record in &records {
        let end = record.offset as usize + record.length as usize;
        if end > bytes.len() {
            return Err(SerializationError::Malformed(
                record.tag,
                format!("extends to {} in a {}-byte font", end, bytes.len()),
            ));
        }
    }
    Ok((header, records))
}

/// Re-read a finished binary: every directory checksum must match its
/// table and the checksum identity for `scope` must hold.
pub fn verify(bytes: &[u8], scope: ChecksumScope) -> Result<(), SerializationError> {
    let (_, records) = read_directory(bytes)?;
    let mut table_sum = Wrapping(0u32);
    let mut adjustment = None;
    for record in &records {
        let start = record.offset as usize;
        let data = &bytes[start..start + record.length as usize];
        let table_checksum = if record.tag == head::TAG {
            adjustment = read_adjustment(bytes, start);
            checksum(&zeroed_head(data)?)
        } else {
            checksum(data)
        };
        if table_checksum != record.checksum {
            return Err(SerializationError::ChecksumMismatch(record.tag));
        }
        table_sum += Wrapping(table_checksum);
    }
    let adjustment = adjustment.ok_or(SerializationError::MissingTable(head::TAG))?;
    let total = match scope {
        ChecksumScope::Tables => (table_sum + Wrapping(adjustment)).0,
        ChecksumScope::WholeFont => checksum(bytes),
    };
    if total != CHECKSUM_MAGIC {
        return Err(SerializationError::ChecksumAdjustment(total));
    }
    Ok(())
}
