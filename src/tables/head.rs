use crate::glyph::BoundingBox;
use crate::tables::loca::LocaFormat;
use otspec::types::*;
use otspec::{table, Tag};

/// The 'head' OpenType tag.
pub const TAG: Tag = Tag::new(b"head");

/// Byte offset of `checksumAdjustment` within the table.
pub const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;

pub const MAGIC_NUMBER: uint32 = 0x5F0F3CF5;

table!(head {
    uint16 majorVersion
    uint16 minorVersion
    Fixed fontRevision
    uint32 checksumAdjustment
    uint32 magicNumber
    uint16 flags
    uint16 unitsPerEm
    LONGDATETIME created
    LONGDATETIME modified
    int16 xMin
    int16 yMin
    int16 xMax
    int16 yMax
    uint16 macStyle
    uint16 lowestRecPPEM
    int16 fontDirectionHint
    int16 indexToLocFormat
    int16 glyphDataFormat
});

/// `macStyle` bits.
pub const MAC_STYLE_BOLD: uint16 = 1 << 0;
pub const MAC_STYLE_ITALIC: uint16 = 1 << 1;

/// Create a `head` table with a zero checksum adjustment, to be patched
/// once the whole font is laid out.
#[allow(clippy::too_many_arguments)]
pub fn new(
    font_revision: Fixed,
    upm: uint16,
    bounds: BoundingBox,
    created: LONGDATETIME,
    modified: LONGDATETIME,
    mac_style: uint16,
    loca_format: LocaFormat,
) -> head {
    head {
        majorVersion: 1,
        minorVersion: 0,
        fontRevision: font_revision,
        checksumAdjustment: 0,
        magicNumber: MAGIC_NUMBER,
        // baseline at y=0, left sidebearing point at x=0
        flags: 0b11,
        unitsPerEm: upm,
        created,
        modified,
        xMin: bounds.x_min,
        yMin: bounds.y_min,
        xMax: bounds.x_max,
        yMax: bounds.y_max,
        macStyle: mac_style,
        lowestRecPPEM: 6,
        fontDirectionHint: 2,
        indexToLocFormat: loca_format.index_to_loc_format(),
        glyphDataFormat: 0,
    }
}
