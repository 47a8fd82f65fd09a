use otspec::types::*;
use otspec::{table, Tag};

/// The 'maxp' OpenType tag.
pub const TAG: Tag = Tag::new(b"maxp");

table!(
    /// The version 1.0 maximum profile, as required by TrueType outlines
    maxp {
        Fixed version
        uint16 numGlyphs
        uint16 maxPoints
        uint16 maxContours
        uint16 maxCompositePoints
        uint16 maxCompositeContours
        uint16 maxZones
        uint16 maxTwilightPoints
        uint16 maxStorage
        uint16 maxFunctionDefs
        uint16 maxInstructionDefs
        uint16 maxStackElements
        uint16 maxSizeOfInstructions
        uint16 maxComponentElements
        uint16 maxComponentDepth
    }
);

impl maxp {
    /// Creates a new `maxp` table with version=1.0 for a font of simple,
    /// uninstructed glyphs.
    pub fn new10(num_glyphs: uint16, max_points: uint16, max_contours: uint16) -> maxp {
        maxp {
            version: Fixed::from_integer(1),
            numGlyphs: num_glyphs,
            maxPoints: max_points,
            maxContours: max_contours,
            maxCompositePoints: 0,
            maxCompositeContours: 0,
            maxZones: 2,
            maxTwilightPoints: 0,
            maxStorage: 0,
            maxFunctionDefs: 0,
            maxInstructionDefs: 0,
            maxStackElements: 0,
            maxSizeOfInstructions: 0,
            maxComponentElements: 0,
            maxComponentDepth: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otspec::{de, ser};
    use pretty_assertions::assert_eq;

    #[test]
    fn maxp_ser_10() {
        let fmaxp = maxp::new10(5, 12, 2);
        let binary_maxp = vec![
            0x00, 0x01, 0x00, 0x00, 0x00, 0x05, 0x00, 0x0c, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(ser::to_bytes(&fmaxp).unwrap(), binary_maxp);
        let deserialized: maxp = de::from_bytes(&binary_maxp).unwrap();
        assert_eq!(deserialized, fmaxp);
    }
}
