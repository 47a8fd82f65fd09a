use crate::error::SerializationError;
use crate::glyph::BoundingBox;
use crate::registry::GlyphOrder;
use crate::tables::hmtx::Metric;
use otspec::types::*;
use std::convert::TryInto;

/// Per-glyph horizontal metrics and the font-wide figures the header tables
/// declare. Everything is exact integer arithmetic over the frozen glyph
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    /// One entry per glyph, in glyph order.
    pub hmetrics: Vec<Metric>,
    /// Union of the boxes of all glyphs with contours; zero if none have any.
    pub bounds: BoundingBox,
    pub num_glyphs: uint16,
    pub max_points: uint16,
    pub max_contours: uint16,
    pub advance_width_max: uint16,
    pub min_left_side_bearing: FWORD,
    pub min_right_side_bearing: FWORD,
    pub x_max_extent: FWORD,
    /// Rounded mean of the non-zero advance widths.
    pub avg_char_width: FWORD,
    /// Every non-zero advance is the same.
    pub is_fixed_pitch: bool,
}

fn narrow<T: TryInto<U>, U>(value: T, what: &str, width: u8) -> Result<U, SerializationError> {
    value.try_into().map_err(|_| SerializationError::Overflow {
        what: what.to_string(),
        width,
    })
}

impl FontMetrics {
    pub fn from_glyphs(order: &GlyphOrder) -> Result<FontMetrics, SerializationError> {
        let glyphs = order.glyphs();
        let hmetrics: Vec<Metric> = glyphs
            .iter()
            .map(|g| Metric {
                advanceWidth: g.advance_width(),
                lsb: if g.is_empty() { 0 } else { g.bounds().x_min },
            })
            .collect();

        let outlined = || glyphs.iter().filter(|g| !g.is_empty());
        let bounds = outlined()
            .map(|g| g.bounds())
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();

        let max_points = glyphs.iter().map(|g| g.num_points()).max().unwrap_or(0);
        let max_contours = glyphs.iter().map(|g| g.contours().len()).max().unwrap_or(0);

        let min_lsb = outlined().map(|g| i32::from(g.bounds().x_min)).min();
        let min_rsb = outlined()
            .map(|g| i32::from(g.advance_width()) - i32::from(g.bounds().x_max))
            .min();
        let x_max_extent = outlined()
            .map(|g| i32::from(g.bounds().x_min) + g.bounds().width())
            .max();

        let advances: Vec<u32> = glyphs
            .iter()
            .map(|g| u32::from(g.advance_width()))
            .filter(|w| *w > 0)
            .collect();
        let avg_char_width = if advances.is_empty() {
            0
        } else {
            let n = advances.len() as u64;
            let total: u64 = advances.iter().map(|w| u64::from(*w)).sum();
            (total + n / 2) / n
        };
        let is_fixed_pitch = !advances.is_empty() && advances.iter().all(|w| *w == advances[0]);

        Ok(FontMetrics {
            bounds,
            num_glyphs: order.num_glyphs(),
            max_points: narrow(max_points, "maxPoints", 16)?,
            max_contours: narrow(max_contours, "maxContours", 16)?,
            advance_width_max: hmetrics.iter().map(|m| m.advanceWidth).max().unwrap_or(0),
            min_left_side_bearing: narrow(min_lsb.unwrap_or(0), "minLeftSideBearing", 16)?,
            min_right_side_bearing: narrow(min_rsb.unwrap_or(0), "minRightSideBearing", 16)?,
            x_max_extent: narrow(x_max_extent.unwrap_or(0), "xMaxExtent", 16)?,
            avg_char_width: narrow(avg_char_width, "xAvgCharWidth", 16)?,
            is_fixed_pitch,
            hmetrics,
        })
    }
}
