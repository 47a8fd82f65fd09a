use crate::pen::PathOp;
use otspec::types::*;
use serde::Deserialize;

/// A point in a finished contour.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct ContourPoint {
    pub x: int16,
    pub y: int16,
    pub on_curve: bool,
}

impl ContourPoint {
    pub fn on(x: int16, y: int16) -> Self {
        ContourPoint {
            x,
            y,
            on_curve: true,
        }
    }

    pub fn off(x: int16, y: int16) -> Self {
        ContourPoint {
            x,
            y,
            on_curve: false,
        }
    }
}

/// A closed quadratic loop. Starts and ends on-curve; consecutive off-curve
/// points never appear because the pen makes every implied point explicit.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Contour {
    points: Vec<ContourPoint>,
}

impl Contour {
    pub(crate) fn new(points: Vec<ContourPoint>) -> Self {
        Contour { points }
    }

    pub fn points(&self) -> &[ContourPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub struct BoundingBox {
    pub x_min: int16,
    pub y_min: int16,
    pub x_max: int16,
    pub y_max: int16,
}

impl BoundingBox {
    /// The box around every point of every contour, or `None` if there are
    /// no points at all.
    pub fn of_contours(contours: &[Contour]) -> Option<BoundingBox> {
        let mut points = contours.iter().flat_map(|c| c.points.iter());
        let first = points.next()?;
        let seed = BoundingBox {
            x_min: first.x,
            y_min: first.y,
            x_max: first.x,
            y_max: first.y,
        };
        Some(points.fold(seed, |bb, p| BoundingBox {
            x_min: bb.x_min.min(p.x),
            y_min: bb.y_min.min(p.y),
            x_max: bb.x_max.max(p.x),
            y_max: bb.y_max.max(p.y),
        }))
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    pub fn width(&self) -> i32 {
        i32::from(self.x_max) - i32::from(self.x_min)
    }
}

/// One glyph as it arrives from the outside world.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphDescriptor {
    pub name: String,
    pub advance_width: uint16,
    #[serde(default)]
    pub outline: Vec<PathOp>,
}

impl GlyphDescriptor {
    pub fn new(name: impl Into<String>, advance_width: uint16, outline: Vec<PathOp>) -> Self {
        GlyphDescriptor {
            name: name.into(),
            advance_width,
            outline,
        }
    }
}

/// A drawn glyph. Never changes once the pen has produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRecord {
    name: String,
    advance_width: uint16,
    contours: Vec<Contour>,
    bounds: BoundingBox,
}

impl GlyphRecord {
    /// The bounding box is computed here; a glyph without contours gets the
    /// zero box.
    pub fn new(name: impl Into<String>, advance_width: uint16, contours: Vec<Contour>) -> Self {
        let bounds = BoundingBox::of_contours(&contours).unwrap_or_default();
        GlyphRecord {
            name: name.into(),
            advance_width,
            contours,
            bounds,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn advance_width(&self) -> uint16 {
        self.advance_width
    }

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn num_points(&self) -> usize {
        self.contours.iter().map(|c| c.len()).sum()
    }
}
