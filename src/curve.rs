//! Normalized path segments and the bezier arithmetic on top of them
use crate::{BBox, DrawCmd, EPSILON, Point, Scalar, Transform};
use std::fmt;

/// Maximum depth of the recursive midpoint subdivision used by arc length
/// and intersection. Each level halves the parameter range, so `2^-24` of a
/// segment is far below any useful resolution.
pub const MAX_DEPTH: usize = 24;

/// Operations common to normalized segments.
///
/// All operations are context free, a segment stores its absolute start point.
pub trait Curve: Sized + Copy + Into<NormSegment> {
    /// Apply affine transformation to every control point
    fn transform(&self, tr: Transform) -> Self;

    /// Point at which curve starts
    fn start(&self) -> Point;

    /// Point at which curve ends
    fn end(&self) -> Point;

    /// Evaluate curve at parameter value `t` in `0.0..=1.0`
    fn at(&self, t: Scalar) -> Point;

    /// Derivative of the curve with respect to `t`
    fn tangent(&self, t: Scalar) -> Point;

    /// Split the curve at parameter value `t`
    fn split_at(&self, t: Scalar) -> (Self, Self);

    /// Optimized version of `Curve::split_at(0.5)`
    fn split(&self) -> (Self, Self) {
        self.split_at(0.5)
    }

    /// Sub-curve starting at parameter value `a` and ending at value `b`
    fn cut(&self, a: Scalar, b: Scalar) -> Self {
        let tail = if a <= 0.0 { *self } else { self.split_at(a).1 };
        if b >= 1.0 || a >= 1.0 {
            return tail;
        }
        let a = a.max(0.0);
        tail.split_at((b - a) / (1.0 - a)).0
    }

    /// Extend provided `init` bounding box with the bounding box of the curve
    ///
    /// For cubic curves this is the box of the control polygon, a superset of
    /// the extent of the curve itself.
    fn bbox(&self, init: Option<BBox>) -> BBox;

    /// Whether the curve can be treated as a straight line within `epsilon`
    fn is_straight(&self, epsilon: Scalar) -> bool;

    /// Identical curve directed from end to start
    fn reverse(&self) -> Self;

    /// Distance between start and end points
    fn chord_length(&self) -> Scalar {
        self.start().dist(self.end())
    }

    /// Length of the curve, computed by recursive midpoint subdivision until
    /// sub-curves are straight within `epsilon`.
    fn arclength(&self, epsilon: Scalar) -> Scalar {
        arclength_rec(*self, epsilon, 0)
    }
}

fn arclength_rec<C: Curve>(curve: C, epsilon: Scalar, depth: usize) -> Scalar {
    if curve.is_straight(epsilon) {
        return curve.chord_length();
    }
    if depth >= MAX_DEPTH {
        tracing::warn!(depth, "arc length subdivision depth limit reached");
        return curve.chord_length();
    }
    let (c0, c1) = curve.split();
    arclength_rec(c0, epsilon, depth + 1) + arclength_rec(c1, epsilon, depth + 1)
}

// -----------------------------------------------------------------------------
// Line
// -----------------------------------------------------------------------------

/// Straight line segment
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line(pub [Point; 2]);

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Line([p0, p1]) = self;
        write!(f, "Line {:?} {:?}", p0, p1)
    }
}

impl Line {
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        Self([p0.into(), p1.into()])
    }

    /// Start and end points of the line
    pub fn points(&self) -> [Point; 2] {
        self.0
    }

    pub fn length(&self) -> Scalar {
        self.chord_length()
    }

    /// Direction vector from start to end
    pub fn direction(&self) -> Point {
        self.end() - self.start()
    }

    /// Find intersection of two infinite lines
    ///
    /// Returns pair of `t` parameters for this line and the other line, found by
    /// solving `self.at(t0) == other.at(t1)`. Parallel or collinear lines have no
    /// solution. Intersection of the segments requires both parameters in `0.0..=1.0`.
    pub fn intersect(&self, other: Line) -> Option<(Scalar, Scalar)> {
        let d0 = self.direction();
        let d1 = other.direction();
        let det = d1.cross(d0);
        if det.abs() <= EPSILON * d0.length() * d1.length() || !det.is_finite() {
            return None;
        }
        let offset = other.start() - self.start();
        let t0 = d1.cross(offset) / det;
        let t1 = d0.cross(offset) / det;
        Some((t0, t1))
    }

    /// Intersection parameters of two line segments
    pub fn intersect_segment(&self, other: Line) -> Option<(Scalar, Scalar)> {
        let (t0, t1) = self.intersect(other)?;
        if (0.0..=1.0).contains(&t0) && (0.0..=1.0).contains(&t1) {
            Some((t0, t1))
        } else {
            None
        }
    }
}

impl Curve for Line {
    fn transform(&self, tr: Transform) -> Self {
        let Line([p0, p1]) = self;
        Self([tr.apply(*p0), tr.apply(*p1)])
    }

    fn start(&self) -> Point {
        self.0[0]
    }

    fn end(&self) -> Point {
        self.0[1]
    }

    fn at(&self, t: Scalar) -> Point {
        let Self([p0, p1]) = self;
        p0.lerp(*p1, t)
    }

    fn tangent(&self, _t: Scalar) -> Point {
        self.direction()
    }

    fn split_at(&self, t: Scalar) -> (Self, Self) {
        let Self([p0, p1]) = *self;
        let mid = self.at(t);
        (Self([p0, mid]), Self([mid, p1]))
    }

    fn bbox(&self, init: Option<BBox>) -> BBox {
        let Self([p0, p1]) = *self;
        BBox::new(p0, p1).union_opt(init)
    }

    fn is_straight(&self, _epsilon: Scalar) -> bool {
        true
    }

    fn reverse(&self) -> Self {
        let Self([p0, p1]) = *self;
        Self([p1, p0])
    }

    fn arclength(&self, _epsilon: Scalar) -> Scalar {
        self.chord_length()
    }
}

// -----------------------------------------------------------------------------
// Cubic bezier curve
// -----------------------------------------------------------------------------

/// Cubic bezier curve
///
/// Polynomial form:
/// `(1 - t) ^ 3 * p0 + 3 * (1 - t) ^ 2 * t * p1 + 3 * (1 - t) * t ^ 2 * p2 + t ^ 3 * p3`
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cubic(pub [Point; 4]);

impl fmt::Debug for Cubic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Cubic([p0, p1, p2, p3]) = self;
        write!(f, "Cubic {:?} {:?} {:?} {:?}", p0, p1, p2, p3)
    }
}

impl Cubic {
    pub fn new(
        p0: impl Into<Point>,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        p3: impl Into<Point>,
    ) -> Self {
        Self([p0.into(), p1.into(), p2.into(), p3.into()])
    }

    pub fn points(&self) -> [Point; 4] {
        self.0
    }

    /// Length of the control polygon `|p1 - p0| + |p2 - p1| + |p3 - p2|`
    pub fn polygon_length(&self) -> Scalar {
        let Self([p0, p1, p2, p3]) = *self;
        p0.dist(p1) + p1.dist(p2) + p2.dist(p3)
    }
}

impl Curve for Cubic {
    fn transform(&self, tr: Transform) -> Self {
        let Cubic([p0, p1, p2, p3]) = self;
        Self([tr.apply(*p0), tr.apply(*p1), tr.apply(*p2), tr.apply(*p3)])
    }

    fn start(&self) -> Point {
        self.0[0]
    }

    fn end(&self) -> Point {
        self.0[3]
    }

    fn at(&self, t: Scalar) -> Point {
        let Self([p0, p1, p2, p3]) = self;
        let (t1, t_1) = (t, 1.0 - t);
        let (t2, t_2) = (t1 * t1, t_1 * t_1);
        let (t3, t_3) = (t2 * t1, t_2 * t_1);
        t_3 * *p0 + 3.0 * t1 * t_2 * *p1 + 3.0 * t2 * t_1 * *p2 + t3 * *p3
    }

    fn tangent(&self, t: Scalar) -> Point {
        let Self([p0, p1, p2, p3]) = *self;
        let t_1 = 1.0 - t;
        3.0 * (t_1 * t_1 * (p1 - p0) + 2.0 * t * t_1 * (p2 - p1) + t * t * (p3 - p2))
    }

    /// Midpoint split by repeated averaging of adjacent control points
    fn split(&self) -> (Self, Self) {
        let Self([p0, p1, p2, p3]) = *self;
        let p01 = 0.5 * (p0 + p1);
        let p12 = 0.5 * (p1 + p2);
        let p23 = 0.5 * (p2 + p3);
        let p012 = 0.5 * (p01 + p12);
        let p123 = 0.5 * (p12 + p23);
        let mid = 0.5 * (p012 + p123);
        (Self([p0, p01, p012, mid]), Self([mid, p123, p23, p3]))
    }

    /// de Casteljau split at arbitrary `t`
    fn split_at(&self, t: Scalar) -> (Self, Self) {
        let Self([p0, p1, p2, p3]) = *self;
        let p01 = p0.lerp(p1, t);
        let p12 = p1.lerp(p2, t);
        let p23 = p2.lerp(p3, t);
        let p012 = p01.lerp(p12, t);
        let p123 = p12.lerp(p23, t);
        let mid = p012.lerp(p123, t);
        (Self([p0, p01, p012, mid]), Self([mid, p123, p23, p3]))
    }

    fn bbox(&self, init: Option<BBox>) -> BBox {
        let Self([p0, p1, p2, p3]) = *self;
        BBox::new(p0, p3).extend(p1).extend(p2).union_opt(init)
    }

    /// Control polygon is longer than the chord by less than `epsilon`.
    ///
    /// Non-finite control points are reported as straight so that recursive
    /// algorithms terminate on them immediately.
    fn is_straight(&self, epsilon: Scalar) -> bool {
        let deviation = (self.polygon_length() - self.chord_length()).abs();
        !(deviation >= epsilon)
    }

    fn reverse(&self) -> Self {
        let Self([p0, p1, p2, p3]) = *self;
        Self([p3, p2, p1, p0])
    }
}

// -----------------------------------------------------------------------------
// NormSegment
// -----------------------------------------------------------------------------

/// Segment of a normalized path, either a straight line or a cubic curve
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NormSegment {
    Line(Line),
    Curve(Cubic),
}

impl NormSegment {
    /// Convert to line if it is a line variant of the segment
    pub fn to_line(&self) -> Option<Line> {
        match self {
            NormSegment::Line(line) => Some(*line),
            NormSegment::Curve(_) => None,
        }
    }

    /// Convert to cubic if it is a curve variant of the segment
    pub fn to_cubic(&self) -> Option<Cubic> {
        match self {
            NormSegment::Curve(cubic) => Some(*cubic),
            NormSegment::Line(_) => None,
        }
    }

    /// Straight line connecting start and end of the segment
    pub fn chord(&self) -> Line {
        Line::new(self.start(), self.end())
    }

    /// Same segment with its first control point moved to `start`
    pub fn with_start(&self, start: Point) -> Self {
        match *self {
            NormSegment::Line(Line([_, p1])) => Line([start, p1]).into(),
            NormSegment::Curve(Cubic([_, p1, p2, p3])) => Cubic([start, p1, p2, p3]).into(),
        }
    }

    /// Same segment with its last control point moved to `end`
    pub fn with_end(&self, end: Point) -> Self {
        match *self {
            NormSegment::Line(Line([p0, _])) => Line([p0, end]).into(),
            NormSegment::Curve(Cubic([p0, p1, p2, _])) => Cubic([p0, p1, p2, end]).into(),
        }
    }

    /// Drawing command that renders this segment from the current point
    pub fn draw_cmd(&self) -> DrawCmd {
        match *self {
            NormSegment::Line(Line([_, p1])) => DrawCmd::LineTo(p1),
            NormSegment::Curve(Cubic([_, p1, p2, p3])) => DrawCmd::CurveTo(p1, p2, p3),
        }
    }
}

impl fmt::Debug for NormSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormSegment::Line(line) => write!(f, "{:?}", line),
            NormSegment::Curve(cubic) => write!(f, "{:?}", cubic),
        }
    }
}

impl Curve for NormSegment {
    fn transform(&self, tr: Transform) -> Self {
        match self {
            NormSegment::Line(line) => line.transform(tr).into(),
            NormSegment::Curve(cubic) => cubic.transform(tr).into(),
        }
    }

    fn start(&self) -> Point {
        match self {
            NormSegment::Line(line) => line.start(),
            NormSegment::Curve(cubic) => cubic.start(),
        }
    }

    fn end(&self) -> Point {
        match self {
            NormSegment::Line(line) => line.end(),
            NormSegment::Curve(cubic) => cubic.end(),
        }
    }

    fn at(&self, t: Scalar) -> Point {
        match self {
            NormSegment::Line(line) => line.at(t),
            NormSegment::Curve(cubic) => cubic.at(t),
        }
    }

    fn tangent(&self, t: Scalar) -> Point {
        match self {
            NormSegment::Line(line) => line.tangent(t),
            NormSegment::Curve(cubic) => cubic.tangent(t),
        }
    }

    fn split(&self) -> (Self, Self) {
        match self {
            NormSegment::Line(line) => {
                let (l0, l1) = line.split();
                (l0.into(), l1.into())
            }
            NormSegment::Curve(cubic) => {
                let (c0, c1) = cubic.split();
                (c0.into(), c1.into())
            }
        }
    }

    fn split_at(&self, t: Scalar) -> (Self, Self) {
        match self {
            NormSegment::Line(line) => {
                let (l0, l1) = line.split_at(t);
                (l0.into(), l1.into())
            }
            NormSegment::Curve(cubic) => {
                let (c0, c1) = cubic.split_at(t);
                (c0.into(), c1.into())
            }
        }
    }

    fn bbox(&self, init: Option<BBox>) -> BBox {
        match self {
            NormSegment::Line(line) => line.bbox(init),
            NormSegment::Curve(cubic) => cubic.bbox(init),
        }
    }

    fn is_straight(&self, epsilon: Scalar) -> bool {
        match self {
            NormSegment::Line(line) => line.is_straight(epsilon),
            NormSegment::Curve(cubic) => cubic.is_straight(epsilon),
        }
    }

    fn reverse(&self) -> Self {
        match self {
            NormSegment::Line(line) => line.reverse().into(),
            NormSegment::Curve(cubic) => cubic.reverse().into(),
        }
    }

    fn arclength(&self, epsilon: Scalar) -> Scalar {
        match self {
            NormSegment::Line(line) => line.arclength(epsilon),
            NormSegment::Curve(cubic) => cubic.arclength(epsilon),
        }
    }
}

impl From<Line> for NormSegment {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<Cubic> for NormSegment {
    fn from(cubic: Cubic) -> Self {
        Self::Curve(cubic)
    }
}
