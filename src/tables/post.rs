use otspec::types::*;
use otspec::{table, Tag};

/// The 'post' OpenType tag.
pub const TAG: Tag = Tag::new(b"post");

table!(
    /// A version 3.0 PostScript table: no glyph names are stored
    post {
        Fixed version
        Fixed italicAngle
        FWORD underlinePosition
        FWORD underlineThickness
        uint32 isFixedPitch
        uint32 minMemType42
        uint32 maxMemType42
        uint32 minMemType1
        uint32 maxMemType1
    }
);

impl post {
    /// An upright `post` table with underline metrics scaled from the em.
    pub fn new(upm: uint16, is_fixed_pitch: bool) -> post {
        let upm = i32::from(upm);
        post {
            version: Fixed::from_integer(3),
            italicAngle: Fixed::default(),
            // upm is at most 16384, so both values fit an FWORD
            underlinePosition: (-(upm * 75) / 1000) as FWORD,
            underlineThickness: (upm * 50 / 1000) as FWORD,
            isFixedPitch: is_fixed_pitch.into(),
            minMemType42: 0,
            maxMemType42: 0,
            minMemType1: 0,
            maxMemType1: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otspec::{de, ser};
    use pretty_assertions::assert_eq;

    #[test]
    fn post_v3() {
        let fpost = post::new(1000, true);
        assert_eq!(fpost.underlinePosition, -75);
        assert_eq!(fpost.underlineThickness, 50);
        let binary_post = vec![
            0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0xb5, 0x00, 0x32, 0x00, 0x00,
            0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(ser::to_bytes(&fpost).unwrap(), binary_post);
        let deserialized: post = de::from_bytes(&binary_post).unwrap();
        assert_eq!(deserialized, fpost);
    }

    #[test]
    fn underline_truncates() {
        let fpost = post::new(2048, false);
        assert_eq!(fpost.underlinePosition, -153);
        assert_eq!(fpost.underlineThickness, 102);
        assert_eq!(fpost.isFixedPitch, 0);
    }
}
