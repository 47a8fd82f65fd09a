use crate::error::SerializationError;
use crate::tables::head::{MAC_STYLE_BOLD, MAC_STYLE_ITALIC};
use chrono::NaiveDateTime;
use otspec::types::*;
use otspec::Tag;
use serde::Deserialize;

const POSTSCRIPT_FORBIDDEN: &[char] = &['[', ']', '(', ')', '{', '}', '<', '>', '/', '%'];
const POSTSCRIPT_NAME_MAX: usize = 63;

/// Font-wide naming and vertical metrics. Only `familyName` is required;
/// everything else falls back to conventional values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FontMetadata {
    pub family_name: String,
    pub style_name: String,
    pub version_string: String,
    /// Defaults to `{family}-{style}`.
    pub unique_identifier: Option<String>,
    /// Defaults to the family and style names with spaces removed.
    pub postscript_name: Option<String>,
    pub units_per_em: uint16,
    pub ascender: FWORD,
    pub descender: FWORD,
    pub line_gap: FWORD,
    pub cap_height: FWORD,
    pub x_height: FWORD,
    pub weight_class: uint16,
    pub width_class: uint16,
    pub fs_type: uint16,
    pub vendor_id: String,
    pub copyright: Option<String>,
    pub manufacturer: Option<String>,
    pub designer: Option<String>,
    pub created: Option<NaiveDateTime>,
    pub modified: Option<NaiveDateTime>,
}

impl Default for FontMetadata {
    fn default() -> Self {
        FontMetadata {
            family_name: String::new(),
            style_name: "Regular".to_string(),
            version_string: "Version 1.0".to_string(),
            unique_identifier: None,
            postscript_name: None,
            units_per_em: 1000,
            ascender: 800,
            descender: -200,
            line_gap: 0,
            cap_height: 700,
            x_height: 500,
            weight_class: 400,
            width_class: 5,
            fs_type: 0,
            vendor_id: "NONE".to_string(),
            copyright: None,
            manufacturer: None,
            designer: None,
            created: None,
            modified: None,
        }
    }
}

impl FontMetadata {
    pub fn new(family_name: impl Into<String>) -> Self {
        FontMetadata {
            family_name: family_name.into(),
            ..Default::default()
        }
    }

    /// Check the values the binary tables cannot represent or that make no
    /// sense as a font.
    pub fn validate(&self) -> Result<(), SerializationError> {
        let bad = |msg: String| Err(SerializationError::Metadata(msg));
        if self.family_name.trim().is_empty() {
            return bad("familyName must not be empty".to_string());
        }
        if self.style_name.trim().is_empty() {
            return bad("styleName must not be empty".to_string());
        }
        if !(16..=16384).contains(&self.units_per_em) {
            return bad(format!(
                "unitsPerEm {} is outside 16..=16384",
                self.units_per_em
            ));
        }
        if self.descender > self.ascender {
            return bad(format!(
                "descender {} lies above ascender {}",
                self.descender, self.ascender
            ));
        }
        if !(1..=1000).contains(&self.weight_class) {
            return bad(format!("weightClass {} is outside 1..=1000", self.weight_class));
        }
        if !(1..=9).contains(&self.width_class) {
            return bad(format!("widthClass {} is outside 1..=9", self.width_class));
        }
        self.vendor_tag()?;
        Ok(())
    }

    pub fn unique_identifier(&self) -> String {
        self.unique_identifier
            .clone()
            .unwrap_or_else(|| format!("{}-{}", self.family_name, self.style_name))
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.family_name, self.style_name)
    }

    /// A PostScript name: printable ASCII without the delimiters PostScript
    /// reserves, at most 63 characters.
    pub fn postscript_name(&self) -> String {
        let raw = match &self.postscript_name {
            Some(name) => name.clone(),
            None => format!("{}-{}", self.family_name, self.style_name),
        };
        raw.chars()
            .filter(|c| c.is_ascii_graphic() && !POSTSCRIPT_FORBIDDEN.contains(c))
            .take(POSTSCRIPT_NAME_MAX)
            .collect()
    }

    /// `fontRevision` from the first decimal number in the version string,
    /// e.g. `Version 1.002` gives 1.002.
    pub fn font_revision(&self) -> Fixed {
        let s = self.version_string.as_str();
        let start = match s.find(|c: char| c.is_ascii_digit()) {
            Some(start) => start,
            None => return Fixed::from_integer(1),
        };
        let rest = &s[start..];
        let int_len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let integer: i16 = rest[..int_len].parse().unwrap_or(1);
        let frac: String = rest[int_len..]
            .strip_prefix('.')
            .unwrap_or("")
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .take(9)
            .collect();
        let numerator: u32 = frac.parse().unwrap_or(0);
        Fixed::from_decimal(integer, numerator, frac.len() as u32)
    }

    fn style_words(&self) -> Vec<String> {
        self.style_name
            .split_whitespace()
            .map(|w| w.to_ascii_lowercase())
            .collect()
    }

    pub fn is_bold(&self) -> bool {
        self.style_words().iter().any(|w| w == "bold")
    }

    pub fn is_italic(&self) -> bool {
        self.style_words()
            .iter()
            .any(|w| w == "italic" || w == "oblique")
    }

    pub fn mac_style(&self) -> uint16 {
        let mut style = 0;
        if self.is_bold() {
            style |= MAC_STYLE_BOLD;
        }
        if self.is_italic() {
            style |= MAC_STYLE_ITALIC;
        }
        style
    }

    pub fn vendor_tag(&self) -> Result<Tag, SerializationError> {
        Tag::from_raw(&self.vendor_id).map_err(|_| {
            SerializationError::Metadata(format!(
                "vendorId '{}' must be one to four printable ASCII characters",
                self.vendor_id
            ))
        })
    }

    pub fn created(&self) -> LONGDATETIME {
        self.created.map(LONGDATETIME::from).unwrap_or_default()
    }

    pub fn modified(&self) -> LONGDATETIME {
        self.modified.map(LONGDATETIME::from).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn defaults_from_json() {
        let md: FontMetadata = serde_json::from_str(r#"{"familyName": "Forge Sans"}"#).unwrap();
        assert_eq!(md.units_per_em, 1000);
        assert_eq!(md.ascender, 800);
        assert_eq!(md.descender, -200);
        assert_eq!(md.style_name, "Regular");
        assert_eq!(md.unique_identifier(), "Forge Sans-Regular");
        assert_eq!(md.full_name(), "Forge Sans Regular");
        assert_eq!(md.postscript_name(), "ForgeSans-Regular");
        assert_eq!(md.font_revision(), Fixed::from_integer(1));
        assert!(md.validate().is_ok());
    }

    #[test]
    fn explicit_names_win() {
        let md: FontMetadata = serde_json::from_str(
            r#"{"familyName": "Forge", "styleName": "Bold Italic",
                "uniqueIdentifier": "forge-bi-2024", "postscriptName": "Forge(Bold)/It",
                "created": "2020-01-28T21:31:22"}"#,
        )
        .unwrap();
        assert_eq!(md.unique_identifier(), "forge-bi-2024");
        assert_eq!(md.postscript_name(), "ForgeBoldIt");
        assert_eq!(md.mac_style(), 3);
        assert_eq!(
            md.created(),
            LONGDATETIME::from(
                NaiveDate::from_ymd_opt(2020, 1, 28)
                    .unwrap()
                    .and_hms_opt(21, 31, 22)
                    .unwrap()
            )
        );
        assert_eq!(md.modified(), LONGDATETIME(0));
    }

    #[test]
    fn postscript_name_is_truncated() {
        let md = FontMetadata::new("A".repeat(80));
        assert_eq!(md.postscript_name().len(), 63);
    }

    #[test]
    fn revision_from_version_string() {
        let mut md = FontMetadata::new("Forge");
        md.version_string = "Version 1.002; build 7".to_string();
        assert_eq!(md.font_revision(), Fixed::from_decimal(1, 2, 3));
        md.version_string = "2.5".to_string();
        assert_eq!(md.font_revision(), Fixed(0x0002_8000));
        md.version_string = "beta".to_string();
        assert_eq!(md.font_revision(), Fixed::from_integer(1));
    }

    #[test]
    fn validation_failures() {
        assert!(FontMetadata::default().validate().is_err());
        let mut md = FontMetadata::new("Forge");
        md.units_per_em = 8;
        assert!(matches!(md.validate(), Err(SerializationError::Metadata(_))));
        md.units_per_em = 2048;
        md.vendor_id = "TOOLONG".to_string();
        assert!(md.validate().is_err());
        md.vendor_id = "AB".to_string();
        assert_eq!(md.vendor_tag().unwrap(), Tag::new(b"AB  "));
        assert!(md.validate().is_ok());
    }
}
