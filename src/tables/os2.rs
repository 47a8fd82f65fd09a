use bitflags::bitflags;
use otspec::types::*;
use otspec::{table, Tag};
use std::collections::{BTreeMap, BTreeSet};

/// The 'OS/2' OpenType tag.
pub const TAG: Tag = Tag::new(b"OS/2");

pub type Panose = [u8; 10];

bitflags! {
    /// Font selection flags (`fsSelection`)
    pub struct FsSelection: u16 {
        const ITALIC = 0x0001;
        const UNDERSCORE = 0x0002;
        const NEGATIVE = 0x0004;
        const OUTLINED = 0x0008;
        const STRIKEOUT = 0x0010;
        const BOLD = 0x0020;
        const REGULAR = 0x0040;
        const USE_TYPO_METRICS = 0x0080;
        const WWS = 0x0100;
        const OBLIQUE = 0x0200;
    }
}

table!(
    /// A version 4 OS/2 and Windows metrics table
    os2 {
        uint16 version
        int16 xAvgCharWidth
        uint16 usWeightClass
        uint16 usWidthClass
        uint16 fsType
        int16 ySubscriptXSize
        int16 ySubscriptYSize
        int16 ySubscriptXOffset
        int16 ySubscriptYOffset
        int16 ySuperscriptXSize
        int16 ySuperscriptYSize
        int16 ySuperscriptXOffset
        int16 ySuperscriptYOffset
        int16 yStrikeoutSize
        int16 yStrikeoutPosition
        int16 sFamilyClass
        Panose panose
        uint32 ulUnicodeRange1
        uint32 ulUnicodeRange2
        uint32 ulUnicodeRange3
        uint32 ulUnicodeRange4
        Tag achVendID
        uint16 fsSelection
        uint16 usFirstCharIndex
        uint16 usLastCharIndex
        int16 sTypoAscender
        int16 sTypoDescender
        int16 sTypoLineGap
        uint16 usWinAscent
        uint16 usWinDescent
        uint32 ulCodePageRange1
        uint32 ulCodePageRange2
        int16 sxHeight
        int16 sCapHeight
        uint16 usDefaultChar
        uint16 usBreakChar
        uint16 usMaxContext
    }
);

/// Unicode blocks and their `ulUnicodeRange` bit. Only the first block of
/// each bit is listed where a bit covers several.
const UNICODE_RANGES: &[(u32, u32, u8)] = &[
    (0x0000, 0x007F, 0),   // Basic Latin
    (0x0080, 0x00FF, 1),   // Latin-1 Supplement
    (0x0100, 0x017F, 2),   // Latin Extended-A
    (0x0180, 0x024F, 3),   // Latin Extended-B
    (0x0250, 0x02AF, 4),   // IPA Extensions
    (0x02B0, 0x02FF, 5),   // Spacing Modifier Letters
    (0x0300, 0x036F, 6),   // Combining Diacritical Marks
    (0x0370, 0x03FF, 7),   // Greek and Coptic
    (0x0400, 0x052F, 9),   // Cyrillic and Cyrillic Supplement
    (0x0530, 0x058F, 10),  // Armenian
    (0x0590, 0x05FF, 11),  // Hebrew
    (0x0600, 0x06FF, 13),  // Arabic
    (0x0900, 0x097F, 15),  // Devanagari
    (0x0E00, 0x0E7F, 24),  // Thai
    (0x10A0, 0x10FF, 26),  // Georgian
    (0x1100, 0x11FF, 28),  // Hangul Jamo
    (0x1E00, 0x1EFF, 29),  // Latin Extended Additional
    (0x1F00, 0x1FFF, 30),  // Greek Extended
    (0x2000, 0x206F, 31),  // General Punctuation
    (0x2070, 0x209F, 32),  // Superscripts and Subscripts
    (0x20A0, 0x20CF, 33),  // Currency Symbols
    (0x2100, 0x214F, 35),  // Letterlike Symbols
    (0x2150, 0x218F, 36),  // Number Forms
    (0x2190, 0x21FF, 37),  // Arrows
    (0x2200, 0x22FF, 38),  // Mathematical Operators
    (0x2300, 0x23FF, 39),  // Miscellaneous Technical
    (0x2500, 0x257F, 43),  // Box Drawing
    (0x2580, 0x259F, 44),  // Block Elements
    (0x25A0, 0x25FF, 45),  // Geometric Shapes
    (0x2600, 0x26FF, 46),  // Miscellaneous Symbols
    (0x2700, 0x27BF, 47),  // Dingbats
    (0x3000, 0x303F, 48),  // CJK Symbols and Punctuation
    (0x3040, 0x309F, 49),  // Hiragana
    (0x30A0, 0x30FF, 50),  // Katakana
    (0x3100, 0x312F, 51),  // Bopomofo
    (0x3130, 0x318F, 52),  // Hangul Compatibility Jamo
    (0x3200, 0x32FF, 54),  // Enclosed CJK Letters and Months
    (0x3300, 0x33FF, 55),  // CJK Compatibility
    (0xAC00, 0xD7AF, 56),  // Hangul Syllables
    (0x4E00, 0x9FFF, 59),  // CJK Unified Ideographs
    (0xE000, 0xF8FF, 60),  // Private Use Area
    (0xF900, 0xFAFF, 61),  // CJK Compatibility Ideographs
    (0xFB00, 0xFB4F, 62),  // Alphabetic Presentation Forms
    (0xFB50, 0xFDFF, 63),  // Arabic Presentation Forms-A
    (0xFF00, 0xFFEF, 68),  // Halfwidth and Fullwidth Forms
    (0xFFF0, 0xFFFF, 69),  // Specials
];

/// Bit 57 is set by any code point outside the Basic Multilingual Plane.
const NON_PLANE_0_BIT: u8 = 57;

/// The four `ulUnicodeRange` words for a set of mapped code points.
pub fn calc_unicode_ranges<'a>(codepoints: impl IntoIterator<Item = &'a u32>) -> [uint32; 4] {
    let mut bits: BTreeSet<u8> = BTreeSet::new();
    for &cp in codepoints {
        if cp > 0xFFFF {
            bits.insert(NON_PLANE_0_BIT);
            continue;
        }
        if let Some(&(_, _, bit)) = UNICODE_RANGES
            .iter()
            .find(|(start, end, _)| (*start..=*end).contains(&cp))
        {
            bits.insert(bit);
        }
    }
    let mut words = [0; 4];
    for bit in bits {
        words[usize::from(bit / 32)] |= 1 << (bit % 32);
    }
    words
}

/// The two `ulCodePageRange` words. Latin 1 needs printable ASCII and a
/// distinguishing Latin-1 letter; Korean Wansung needs Hangul.
pub fn calc_code_page_ranges(mapping: &BTreeMap<u32, u16>) -> [uint32; 2] {
    let contains = |c: char| mapping.contains_key(&(c as u32));
    let has_ascii = (0x20..0x7F).all(|x| mapping.contains_key(&x));
    let has_hangul = mapping
        .keys()
        .any(|&cp| (0x3131..=0x318E).contains(&cp) || (0xAC00..=0xD7A3).contains(&cp));

    let mut pages = [0; 2];
    if has_ascii && contains('Þ') {
        pages[0] |= 1 << 0; // Latin 1
    }
    if has_hangul {
        pages[0] |= 1 << 19; // Korean Wansung
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use otspec::{de, ser};
    use pretty_assertions::assert_eq;

    fn sample() -> os2 {
        os2 {
            version: 4,
            xAvgCharWidth: 500,
            usWeightClass: 700,
            usWidthClass: 5,
            fsType: 0,
            ySubscriptXSize: 650,
            ySubscriptYSize: 600,
            ySubscriptXOffset: 0,
            ySubscriptYOffset: 75,
            ySuperscriptXSize: 650,
            ySuperscriptYSize: 600,
            ySuperscriptXOffset: 0,
            ySuperscriptYOffset: 350,
            yStrikeoutSize: 50,
            yStrikeoutPosition: 110,
            sFamilyClass: 0,
            panose: [0; 10],
            ulUnicodeRange1: 1,
            ulUnicodeRange2: 0,
            ulUnicodeRange3: 0,
            ulUnicodeRange4: 0,
            achVendID: Tag::new(b"NONE"),
            fsSelection: (FsSelection::BOLD | FsSelection::USE_TYPO_METRICS).bits(),
            usFirstCharIndex: 0x20,
            usLastCharIndex: 0x7E,
            sTypoAscender: 800,
            sTypoDescender: -200,
            sTypoLineGap: 0,
            usWinAscent: 900,
            usWinDescent: 200,
            ulCodePageRange1: 0,
            ulCodePageRange2: 0,
            sxHeight: 500,
            sCapHeight: 700,
            usDefaultChar: 0,
            usBreakChar: 0x20,
            usMaxContext: 0,
        }
    }

    #[test]
    fn os2_v4_layout() {
        let table = sample();
        let bytes = ser::to_bytes(&table).unwrap();
        assert_eq!(bytes.len(), 96);
        assert_eq!(&bytes[58..62], b"NONE");
        assert_eq!(&bytes[62..64], &[0x00, 0xa0]);
        let back: os2 = de::from_bytes(&bytes).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn unicode_range_bits() {
        let cps = vec![0x41, 0xE9, 0xAC00, 0x1F600];
        let ranges = calc_unicode_ranges(&cps);
        assert_eq!(ranges[0], 0b11);
        assert_eq!(ranges[1], (1 << (56 - 32)) | (1 << (57 - 32)));
        assert_eq!(ranges[2], 0);
        assert_eq!(calc_unicode_ranges(&[0xFFF0]), [0, 0, 1 << (69 - 64), 0]);
    }

    #[test]
    fn code_pages() {
        let mut mapping: BTreeMap<u32, u16> = (0x20..0x7F).map(|c| (c, 1)).collect();
        assert_eq!(calc_code_page_ranges(&mapping), [0, 0]);
        mapping.insert('Þ' as u32, 2);
        assert_eq!(calc_code_page_ranges(&mapping), [1, 0]);
        mapping.insert(0xAC00, 3);
        assert_eq!(calc_code_page_ranges(&mapping), [1 | (1 << 19), 0]);
    }
}
