use crate::metrics::FontMetrics;
use otspec::types::*;
use otspec::{table, Tag};

/// The 'hhea' OpenType tag.
pub const TAG: Tag = Tag::new(b"hhea");

table!(
    /// The horizontal header table
    hhea {
        uint16 majorVersion
        uint16 minorVersion
        FWORD ascender
        FWORD descender
        FWORD lineGap
        UFWORD advanceWidthMax
        FWORD minLeftSideBearing
        FWORD minRightSideBearing
        FWORD xMaxExtent
        int16 caretSlopeRise
        int16 caretSlopeRun
        int16 caretOffset
        int16 reserved0
        int16 reserved1
        int16 reserved2
        int16 reserved3
        int16 metricDataFormat
        uint16 numberOfHMetrics
    }
);

impl hhea {
    /// Build the header for an upright font from its vertical metrics and
    /// the aggregates computed over the glyph set.
    pub fn new(
        ascender: FWORD,
        descender: FWORD,
        line_gap: FWORD,
        metrics: &FontMetrics,
        number_of_hmetrics: uint16,
    ) -> hhea {
        hhea {
            majorVersion: 1,
            minorVersion: 0,
            ascender,
            descender,
            lineGap: line_gap,
            advanceWidthMax: metrics.advance_width_max,
            minLeftSideBearing: metrics.min_left_side_bearing,
            minRightSideBearing: metrics.min_right_side_bearing,
            xMaxExtent: metrics.x_max_extent,
            caretSlopeRise: 1,
            caretSlopeRun: 0,
            caretOffset: 0,
            reserved0: 0,
            reserved1: 0,
            reserved2: 0,
            reserved3: 0,
            metricDataFormat: 0,
            numberOfHMetrics: number_of_hmetrics,
        }
    }
}
