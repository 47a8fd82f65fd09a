use encoding::all::{MAC_ROMAN, UTF_16BE};
use encoding::{DecoderTrap, EncoderTrap, EncodingRef};
use otspec::types::*;
use otspec::{
    table, DeserializationError, Deserialize, Deserializer, ReaderContext, SerializationError,
    Serialize, Serializer, Tag,
};
use std::convert::TryInto;

/// The 'name' OpenType tag.
pub const TAG: Tag = Tag::new(b"name");

pub const PLATFORM_MACINTOSH: uint16 = 1;
pub const PLATFORM_WINDOWS: uint16 = 3;

fn get_encoding(platform_id: uint16) -> EncodingRef {
    if platform_id == PLATFORM_MACINTOSH {
        MAC_ROMAN
    } else {
        UTF_16BE
    }
}

/// Descriptive names of the name table nameID entries this crate writes
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum NameRecordID {
    /// Copyright notice
    Copyright = 0,
    /// Font Family name
    FontFamilyName = 1,
    /// Font Subfamily name
    FontSubfamilyName = 2,
    /// Unique font identifier
    UniqueID = 3,
    /// Full font name that reflects all family and relevant subfamily descriptors
    FullFontName = 4,
    /// Version string
    Version = 5,
    /// PostScript name for the font
    PostscriptName = 6,
    /// Manufacturer Name
    Manufacturer = 8,
    /// Designer
    Designer = 9,
}

impl From<NameRecordID> for u16 {
    fn from(namerecord: NameRecordID) -> u16 {
        namerecord as u16
    }
}

table!(NameRecordInternal {
    uint16 platformID
    uint16 encodingID
    uint16 languageID
    uint16 nameID
    uint16 length
    uint16 stringOffset
});

/// A single name record to be placed inside the name table
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    /// Platform ID (1=Macintosh, 3=Windows)
    pub platformID: uint16,
    /// Identifier for encoding of string content. Platform-specific.
    pub encodingID: uint16,
    /// Identifier for language of string content. Platform-specific.
    pub languageID: uint16,
    /// The numeric identifier representing the type of data. See NameRecordID.
    pub nameID: uint16,
    /// The actual content
    pub string: String,
}

impl NameRecord {
    /// Create a new name record for the Windows platform, Unicode BMP,
    /// US English (3,1,0x409)
    pub fn windows_unicode<T, U>(n: T, s: U) -> NameRecord
    where
        T: Into<u16>,
        U: Into<String>,
    {
        NameRecord {
            platformID: PLATFORM_WINDOWS,
            encodingID: 1,
            languageID: 0x409,
            nameID: n.into(),
            string: s.into(),
        }
    }

    /// Create a Macintosh Roman, English (1,0,0) record, if every character
    /// of the string exists in Mac Roman.
    pub fn mac_roman<T, U>(n: T, s: U) -> Option<NameRecord>
    where
        T: Into<u16>,
        U: Into<String>,
    {
        let string = s.into();
        get_encoding(PLATFORM_MACINTOSH)
            .encode(&string, EncoderTrap::Strict)
            .ok()?;
        Some(NameRecord {
            platformID: PLATFORM_MACINTOSH,
            encodingID: 0,
            languageID: 0,
            nameID: n.into(),
            string,
        })
    }

    fn sort_key(&self) -> (uint16, uint16, uint16, uint16) {
        (
            self.platformID,
            self.encodingID,
            self.languageID,
            self.nameID,
        )
    }
}

/// Represents a font's name (Naming) table
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct name {
    pub records: Vec<NameRecord>,
}

impl name {
    /// Build the table from (ID, string) pairs, emitting a Macintosh record
    /// where the string allows it and a Windows record always.
    pub fn new<I>(entries: I) -> name
    where
        I: IntoIterator<Item = (NameRecordID, String)>,
    {
        let mut records = vec![];
        for (id, string) in entries {
            if let Some(mac) = NameRecord::mac_roman(id, string.clone()) {
                records.push(mac);
            }
            records.push(NameRecord::windows_unicode(id, string));
        }
        records.sort_by_key(|r| r.sort_key());
        name { records }
    }

    pub fn get(&self, platform_id: uint16, name_id: NameRecordID) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.platformID == platform_id && r.nameID == u16::from(name_id))
            .map(|r| r.string.as_str())
    }
}

impl Serialize for name {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        let count: uint16 = self
            .records
            .len()
            .try_into()
            .map_err(|_| SerializationError("Too many name records".to_string()))?;
        let storage_offset: uint16 = (6 + 12 * u32::from(count))
            .try_into()
            .map_err(|_| SerializationError("Too many name records".to_string()))?;
        let mut string_pool: Vec<u8> = Vec::new();
        data.put(0_u16)?;
        data.put(count)?;
        data.put(storage_offset)?;
        for record in &self.records {
            let encoded = get_encoding(record.platformID)
                .encode(&record.string, EncoderTrap::Strict)
                .map_err(|e| {
                    SerializationError(format!("Can't encode name {}: {}", record.nameID, e))
                })?;
            let too_long = |_| SerializationError("String pool overflows 64k".to_string());
            let nri = NameRecordInternal {
                platformID: record.platformID,
                encodingID: record.encodingID,
                languageID: record.languageID,
                nameID: record.nameID,
                length: encoded.len().try_into().map_err(too_long)?,
                stringOffset: string_pool.len().try_into().map_err(too_long)?,
            };
            data.put(nri)?;
            string_pool.extend(encoded);
        }
        data.put(string_pool)
    }
}

impl Deserialize for name {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let start = c.ptr;
        let _version: uint16 = c.de()?;
        let count: uint16 = c.de()?;
        let storage_offset: uint16 = c.de()?;
        let internal_records: Vec<NameRecordInternal> = c.de_counted(count.into())?;
        c.seek(start + usize::from(storage_offset))?;
        let pool: Vec<u8> = c.de()?;
        let mut records: Vec<NameRecord> = Vec::with_capacity(count.into());
        for ir in internal_records {
            let start = usize::from(ir.stringOffset);
            let string_as_bytes = pool
                .get(start..start + usize::from(ir.length))
                .ok_or_else(|| DeserializationError("Name string out of bounds".to_string()))?;
            let string = get_encoding(ir.platformID)
                .decode(string_as_bytes, DecoderTrap::Replace)
                .map_err(|e| DeserializationError(e.to_string()))?;
            records.push(NameRecord {
                string,
                platformID: ir.platformID,
                encodingID: ir.encodingID,
                languageID: ir.languageID,
                nameID: ir.nameID,
            })
        }
        Ok(name { records })
    }
}
