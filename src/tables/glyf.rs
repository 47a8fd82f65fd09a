//! Simple TrueType glyph outlines.
//!
//! Each glyph is written as its contour count, bounding box, contour end
//! points, an empty instruction block, and then the point flags and the x
//! and y deltas. Deltas that fit in a byte are written as a byte with the
//! sign folded into the flag; zero deltas take no space at all. Runs of
//! identical flags are compressed with the REPEAT bit.
use crate::error::SerializationError;
use crate::glyph::{ContourPoint, GlyphRecord};
use crate::tables::loca::loca;
use bitflags::bitflags;
use itertools::izip;
use otspec::types::*;
use otspec::{DeserializationError, Deserialize, Deserializer, ReaderContext, Serialize, Tag};
use std::convert::TryInto;

/// The 'glyf' OpenType tag.
pub const TAG: Tag = Tag::new(b"glyf");

bitflags! {
    struct SimpleGlyphFlags: u8 {
        const ON_CURVE_POINT = 0x01;
        const X_SHORT_VECTOR = 0x02;
        const Y_SHORT_VECTOR = 0x04;
        const REPEAT_FLAG = 0x08;
        const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR = 0x10;
        const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR = 0x20;
        const OVERLAP_SIMPLE = 0x40;
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Default)]
#[allow(non_snake_case)]
pub struct Glyph {
    pub xMin: int16,
    pub yMin: int16,
    pub xMax: int16,
    pub yMax: int16,
    pub contours: Vec<Vec<ContourPoint>>,
}

impl From<&GlyphRecord> for Glyph {
    fn from(record: &GlyphRecord) -> Self {
        let bounds = record.bounds();
        Glyph {
            xMin: bounds.x_min,
            yMin: bounds.y_min,
            xMax: bounds.x_max,
            yMax: bounds.y_max,
            contours: record
                .contours()
                .iter()
                .map(|c| c.points().to_vec())
                .collect(),
        }
    }
}

impl Glyph {
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    fn end_points(&self) -> Result<Vec<uint16>, otspec::SerializationError> {
        let mut count = 0_usize;
        self.contours
            .iter()
            .map(|c| {
                count += c.len();
                (count - 1).try_into().map_err(|_| {
                    otspec::SerializationError(format!("{} points do not fit a glyph", count))
                })
            })
            .collect()
    }

    fn compile_deltas(&self) -> (Vec<SimpleGlyphFlags>, Vec<u8>, Vec<u8>) {
        let mut last_x = 0_i16;
        let mut last_y = 0_i16;
        let mut flags = vec![];
        let mut xs: Vec<u8> = vec![];
        let mut ys: Vec<u8> = vec![];
        for point in self.contours.iter().flatten() {
            let mut flag = if point.on_curve {
                SimpleGlyphFlags::ON_CURVE_POINT
            } else {
                SimpleGlyphFlags::empty()
            };
            flag |= encode_delta(
                point.x.wrapping_sub(last_x),
                &mut xs,
                SimpleGlyphFlags::X_SHORT_VECTOR,
                SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
            );
            flag |= encode_delta(
                point.y.wrapping_sub(last_y),
                &mut ys,
                SimpleGlyphFlags::Y_SHORT_VECTOR,
                SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
            );
            flags.push(flag);
            last_x = point.x;
            last_y = point.y;
        }
        (flags, xs, ys)
    }
}

fn encode_delta(
    delta: i16,
    out: &mut Vec<u8>,
    short: SimpleGlyphFlags,
    same_or_positive: SimpleGlyphFlags,
) -> SimpleGlyphFlags {
    if delta == 0 {
        same_or_positive
    } else if (-255..=255).contains(&delta) {
        out.push(delta.unsigned_abs() as u8);
        if delta > 0 {
            short | same_or_positive
        } else {
            short
        }
    } else {
        out.extend_from_slice(&delta.to_be_bytes());
        SimpleGlyphFlags::empty()
    }
}

/// Collapse runs of three or more identical flags into flag, count pairs.
fn compress_flags(flags: &[SimpleGlyphFlags]) -> Vec<u8> {
    let mut out = vec![];
    let mut i = 0;
    while i < flags.len() {
        let flag = flags[i];
        let run = flags[i..]
            .iter()
            .take(256)
            .take_while(|f| **f == flag)
            .count();
        if run >= 3 {
            out.push((flag | SimpleGlyphFlags::REPEAT_FLAG).bits());
            out.push((run - 1) as u8);
        } else {
            out.extend(std::iter::repeat(flag.bits()).take(run));
        }
        i += run;
    }
    out
}

impl Serialize for Glyph {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), otspec::SerializationError> {
        if self.is_empty() {
            return Ok(());
        }
        let num_contours: int16 = self.contours.len().try_into().map_err(|_| {
            otspec::SerializationError(format!("{} contours", self.contours.len()))
        })?;
        num_contours.to_bytes(data)?;
        self.xMin.to_bytes(data)?;
        self.yMin.to_bytes(data)?;
        self.xMax.to_bytes(data)?;
        self.yMax.to_bytes(data)?;
        self.end_points()?.to_bytes(data)?;
        // instructionLength
        0_u16.to_bytes(data)?;
        let (flags, xs, ys) = self.compile_deltas();
        data.extend(compress_flags(&flags));
        data.extend(xs);
        data.extend(ys);
        Ok(())
    }
}

fn decode_deltas(
    c: &mut ReaderContext,
    flags: &[SimpleGlyphFlags],
    short: SimpleGlyphFlags,
    same_or_positive: SimpleGlyphFlags,
) -> Result<Vec<int16>, DeserializationError> {
    let mut last = 0_i16;
    let mut coords = Vec::with_capacity(flags.len());
    for flag in flags {
        let delta: int16 = if flag.contains(short) {
            let magnitude: u8 = c.de()?;
            if flag.contains(same_or_positive) {
                i16::from(magnitude)
            } else {
                -i16::from(magnitude)
            }
        } else if flag.contains(same_or_positive) {
            0
        } else {
            c.de()?
        };
        last = last.wrapping_add(delta);
        coords.push(last);
    }
    Ok(coords)
}

/// Reads one simple glyph; an input with no bytes left is an empty glyph.
impl Deserialize for Glyph {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        if c.remaining() == 0 {
            return Ok(Glyph::default());
        }
        let num_contours: int16 = c.de()?;
        if num_contours < 0 {
            return Err(DeserializationError(
                "Composite glyphs are not supported".to_string(),
            ));
        }
        let mut glyph = Glyph {
            xMin: c.de()?,
            yMin: c.de()?,
            xMax: c.de()?,
            yMax: c.de()?,
            contours: vec![],
        };
        let end_points: Vec<uint16> = c.de_counted(num_contours as usize)?;
        let instruction_length: uint16 = c.de()?;
        c.skip(instruction_length.into());
        let num_points = end_points.last().map_or(0, |&e| usize::from(e) + 1);

        let mut flags: Vec<SimpleGlyphFlags> = Vec::with_capacity(num_points);
        while flags.len() < num_points {
            let flag = SimpleGlyphFlags::from_bits_truncate(c.de()?);
            let repeat: u8 = if flag.contains(SimpleGlyphFlags::REPEAT_FLAG) {
                c.de()?
            } else {
                0
            };
            for _ in 0..=repeat {
                flags.push(flag);
            }
        }
        flags.truncate(num_points);

        let xs = decode_deltas(
            c,
            &flags,
            SimpleGlyphFlags::X_SHORT_VECTOR,
            SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
        )?;
        let ys = decode_deltas(
            c,
            &flags,
            SimpleGlyphFlags::Y_SHORT_VECTOR,
            SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
        )?;
        let points: Vec<ContourPoint> = izip!(&xs, &ys, &flags)
            .map(|(x, y, flag)| ContourPoint {
                x: *x,
                y: *y,
                on_curve: flag.contains(SimpleGlyphFlags::ON_CURVE_POINT),
            })
            .collect();

        let mut start = 0;
        for end in end_points {
            let end = usize::from(end) + 1;
            if end <= start || end > points.len() {
                return Err(DeserializationError(
                    "Contour end points out of order".to_string(),
                ));
            }
            glyph.contours.push(points[start..end].to_vec());
            start = end;
        }
        Ok(glyph)
    }
}

/// The glyph data table, one entry per glyph in glyph order.
#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct glyf {
    pub glyphs: Vec<Glyph>,
}

impl glyf {
    pub fn from_records(records: &[GlyphRecord]) -> Self {
        glyf {
            glyphs: records.iter().map(Glyph::from).collect(),
        }
    }

    /// Write every glyph, padding each to a four-byte boundary, and return
    /// the table together with its offsets.
    pub fn compile(&self) -> Result<(Vec<u8>, loca), SerializationError> {
        let mut data: Vec<u8> = vec![];
        let mut indices: Vec<uint32> = Vec::with_capacity(self.glyphs.len() + 1);
        for glyph in &self.glyphs {
            indices.push(offset(data.len())?);
            glyph.to_bytes(&mut data)?;
            data.resize((data.len() + 3) & !3, 0);
        }
        indices.push(offset(data.len())?);
        Ok((data, loca { indices }))
    }
}

fn offset(len: usize) -> Result<uint32, SerializationError> {
    len.try_into().map_err(|_| SerializationError::Overflow {
        what: "glyf offset".to_string(),
        width: 32,
    })
}

/// Read the glyphs `loca` points at.
pub fn from_bytes(data: &[u8], locations: &loca) -> Result<glyf, DeserializationError> {
    let num_glyphs = locations.indices.len().saturating_sub(1);
    let mut glyphs = Vec::with_capacity(num_glyphs);
    for gid in 0..num_glyphs {
        let range = locations
            .glyph_range(gid)
            .filter(|r| r.end <= data.len())
            .ok_or_else(|| DeserializationError(format!("Bad loca entry for glyph {}", gid)))?;
        glyphs.push(otspec::de::from_bytes(&data[range])?);
    }
    Ok(glyf { glyphs })
}
