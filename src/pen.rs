//! Turning path operations into TrueType contours.
//!
//! The pen is a two-state machine. `moveTo` opens a contour, `lineTo` and
//! `quadTo` extend it, `close` finishes it. A `quadTo` with several control
//! points is the usual TrueType shorthand for a chain of quadratic segments;
//! the implied on-curve point halfway between each pair of controls is made
//! explicit here so that every contour alternates properly.
use crate::error::GeometryError;
use crate::glyph::{BoundingBox, Contour, ContourPoint};
use otspec::types::*;
use serde::Deserialize;

/// A point in font design units.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Deserialize)]
#[serde(from = "(int16, int16)")]
pub struct Point {
    pub x: int16,
    pub y: int16,
}

impl Point {
    pub fn new(x: int16, y: int16) -> Self {
        Point { x, y }
    }

    /// The halfway point, rounding halves upwards.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point {
            x: half_round_up(self.x, other.x),
            y: half_round_up(self.y, other.y),
        }
    }
}

fn half_round_up(a: int16, b: int16) -> int16 {
    // The mean of two int16s is always an int16.
    (i32::from(a) + i32::from(b) + 1).div_euclid(2) as int16
}

impl From<(int16, int16)> for Point {
    fn from((x, y): (int16, int16)) -> Self {
        Point { x, y }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathOp {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { controls: Vec<Point>, end: Point },
    Close,
}

impl PathOp {
    fn name(&self) -> &'static str {
        match self {
            PathOp::MoveTo(_) => "moveTo",
            PathOp::LineTo(_) => "lineTo",
            PathOp::QuadTo { .. } => "quadTo",
            PathOp::Close => "close",
        }
    }
}

#[derive(Debug)]
enum PenState {
    Idle,
    Open(Vec<ContourPoint>),
}

/// The contours of one glyph and the box around them.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Outline {
    pub contours: Vec<Contour>,
    pub bounds: BoundingBox,
}

#[derive(Debug)]
pub struct OutlinePen {
    state: PenState,
    contours: Vec<Contour>,
    index: usize,
}

impl Default for OutlinePen {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlinePen {
    pub fn new() -> Self {
        OutlinePen {
            state: PenState::Idle,
            contours: vec![],
            index: 0,
        }
    }

    /// Feed one operation to the pen.
    pub fn apply(&mut self, op: &PathOp) -> Result<(), GeometryError> {
        let result = match op {
            PathOp::MoveTo(p) => self.move_to(*p),
            PathOp::LineTo(p) => self.open_contour(op).map(|pts| pts.push(on(p))),
            PathOp::QuadTo { controls, end } => self
                .open_contour(op)
                .map(|pts| push_quadratic(pts, controls, end)),
            PathOp::Close => self.close(),
        };
        self.index += 1;
        result
    }

    fn move_to(&mut self, p: Point) -> Result<(), GeometryError> {
        if let PenState::Open(_) = self.state {
            return Err(GeometryError::MoveWhileOpen { index: self.index });
        }
        self.state = PenState::Open(vec![on(&p)]);
        Ok(())
    }

    fn open_contour(&mut self, op: &PathOp) -> Result<&mut Vec<ContourPoint>, GeometryError> {
        match &mut self.state {
            PenState::Open(points) => Ok(points),
            PenState::Idle => Err(GeometryError::NoOpenContour {
                op: op.name(),
                index: self.index,
            }),
        }
    }

    fn close(&mut self) -> Result<(), GeometryError> {
        let mut points = match std::mem::replace(&mut self.state, PenState::Idle) {
            PenState::Open(points) => points,
            PenState::Idle => {
                return Err(GeometryError::NoOpenContour {
                    op: PathOp::Close.name(),
                    index: self.index,
                })
            }
        };
        let n = points.len();
        if n > 2
            && points[n - 2].on_curve
            && points[n - 1].x == points[0].x
            && points[n - 1].y == points[0].y
        {
            points.pop();
        }
        if points.len() < 2 {
            log::debug!("Dropping single-point contour ending at operation {}", self.index);
            return Ok(());
        }
        self.contours.push(Contour::new(points));
        Ok(())
    }

    /// Finish the glyph. Fails if a contour is still open.
    pub fn finish(self) -> Result<Outline, GeometryError> {
        if let PenState::Open(_) = self.state {
            return Err(GeometryError::Unclosed);
        }
        let bounds = BoundingBox::of_contours(&self.contours).unwrap_or_default();
        Ok(Outline {
            contours: self.contours,
            bounds,
        })
    }
}

fn on(p: &Point) -> ContourPoint {
    ContourPoint::on(p.x, p.y)
}

fn push_quadratic(points: &mut Vec<ContourPoint>, controls: &[Point], end: &Point) {
    for (i, control) in controls.iter().enumerate() {
        points.push(ContourPoint::off(control.x, control.y));
        if let Some(next) = controls.get(i + 1) {
            points.push(on(&control.midpoint(next)));
        }
    }
    points.push(on(end));
}

/// Run a whole operation stream through a fresh pen.
pub fn draw(ops: &[PathOp]) -> Result<Outline, GeometryError> {
    let mut pen = OutlinePen::new();
    for op in ops {
        pen.apply(op)?;
    }
    pen.finish()
}
