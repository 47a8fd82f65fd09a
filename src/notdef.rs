use crate::glyph::GlyphDescriptor;
use crate::metadata::FontMetadata;
use crate::pen::{PathOp, Point};
use crate::registry::NOTDEF;

fn make_box(x_min: i16, y_min: i16, x_max: i16, y_max: i16, reverse: bool) -> Vec<PathOp> {
    let mut corners = vec![
        Point::new(x_min, y_min),
        Point::new(x_min, y_max),
        Point::new(x_max, y_max),
        Point::new(x_max, y_min),
    ];
    if reverse {
        corners[1..].reverse();
    }
    let mut ops = vec![PathOp::MoveTo(corners[0])];
    ops.extend(corners[1..].iter().map(|p| PathOp::LineTo(*p)));
    ops.push(PathOp::Close);
    ops
}

/// The conventional hollow box: half an em wide, spanning descender to
/// ascender, with a stroke of 5% of the em. The outer contour runs
/// clockwise and the inner one counter-clockwise; a box too short to hold
/// the counter is left solid.
pub fn notdef_glyph(info: &FontMetadata) -> GlyphDescriptor {
    let upm = i32::from(info.units_per_em);
    let width = (upm + 1) / 2;
    let stroke = (upm * 5 + 50) / 100;
    // upm is at most 16384, so all of these fit an i16
    let (x_min, x_max) = (stroke as i16, (width - stroke) as i16);
    let (y_min, y_max) = (info.descender, info.ascender);

    let mut outline = make_box(x_min, y_min, x_max, y_max, false);
    // a box shorter than two strokes has no room for the counter
    let inner_y_min = i32::from(y_min) + stroke;
    let inner_y_max = i32::from(y_max) - stroke;
    if inner_y_min < inner_y_max {
        let stroke = stroke as i16;
        outline.extend(make_box(
            x_min + stroke,
            inner_y_min as i16,
            x_max - stroke,
            inner_y_max as i16,
            true,
        ));
    }
    GlyphDescriptor::new(NOTDEF, width as u16, outline)
}
