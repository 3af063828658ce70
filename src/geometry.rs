//! Points, affine transforms and axis aligned bounding boxes
use std::{
    fmt,
    ops::{Add, Div, Mul, Neg, Sub},
};

pub type Scalar = f64;
pub const EPSILON: f64 = f64::EPSILON;
pub const PI: f64 = std::f64::consts::PI;

/// Default accuracy used by straightness tests, arc length and intersection
pub const DEFAULT_EPSILON: Scalar = 1e-5;

/// Format floats in a compact way suitable for PostScript operators
pub fn scalar_fmt(f: &mut fmt::Formatter<'_>, value: Scalar) -> fmt::Result {
    let value_abs = value.abs();
    if value_abs.fract() < EPSILON && value_abs < 1e15 {
        write!(f, "{}", value.trunc() as i64)
    } else if value_abs > 9999.0 || value_abs <= 0.0001 {
        write!(f, "{:.6e}", value)
    } else {
        let ten: Scalar = 10.0;
        let round = ten.powi(9 - (value_abs.trunc() + 1.0).log10().ceil() as i32);
        write!(f, "{}", (value * round).round() / round)
    }
}

/// 2D point or vector, coordinates are expressed in points
#[derive(Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point(pub [Scalar; 2]);

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Point([x, y]) = self;
        scalar_fmt(f, *x)?;
        write!(f, ",")?;
        scalar_fmt(f, *y)
    }
}

/// Space separated form used by PostScript operators
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Point([x, y]) = self;
        scalar_fmt(f, *x)?;
        write!(f, " ")?;
        scalar_fmt(f, *y)
    }
}

impl Point {
    #[inline]
    pub const fn new(x: Scalar, y: Scalar) -> Self {
        Self([x, y])
    }

    #[inline]
    pub fn x(self) -> Scalar {
        self.0[0]
    }

    #[inline]
    pub fn y(self) -> Scalar {
        self.0[1]
    }

    /// Length of the vector
    pub fn length(self) -> Scalar {
        let Self([x, y]) = self;
        x.hypot(y)
    }

    /// Distance between two points
    pub fn dist(self, other: Self) -> Scalar {
        (self - other).length()
    }

    pub fn dot(self, other: Self) -> Scalar {
        let Self([x0, y0]) = self;
        let Self([x1, y1]) = other;
        x0 * x1 + y0 * y1
    }

    /// z-component of the cross product, positive if `other` is counterclockwise from `self`
    pub fn cross(self, other: Self) -> Scalar {
        let Self([x0, y0]) = self;
        let Self([x1, y1]) = other;
        x0 * y1 - y0 * x1
    }

    /// Unit vector with the same direction, `None` for a zero vector
    pub fn normalize(self) -> Option<Point> {
        let length = self.length();
        if length < EPSILON || !length.is_finite() {
            None
        } else {
            Some(self / length)
        }
    }

    /// Angle of the vector relative to the x axis in degrees, in `(-180, 180]`
    pub fn angle_deg(self) -> Scalar {
        self.y().atan2(self.x()).to_degrees()
    }

    /// Linear interpolation between `self` (t = 0) and `other` (t = 1)
    pub fn lerp(self, other: Self, t: Scalar) -> Self {
        (1.0 - t) * self + t * other
    }

    /// Whether both coordinates differ by less than `EPSILON`
    pub fn is_close_to(self, other: Point) -> bool {
        let Self([x0, y0]) = self;
        let Self([x1, y1]) = other;
        (x0 - x1).abs() < EPSILON && (y0 - y1).abs() < EPSILON
    }

    pub fn is_finite(self) -> bool {
        self.x().is_finite() && self.y().is_finite()
    }
}

impl From<(Scalar, Scalar)> for Point {
    #[inline]
    fn from((x, y): (Scalar, Scalar)) -> Self {
        Self([x, y])
    }
}

impl From<[Scalar; 2]> for Point {
    #[inline]
    fn from(xy: [Scalar; 2]) -> Self {
        Self(xy)
    }
}

impl Mul<Point> for Scalar {
    type Output = Point;

    #[inline]
    fn mul(self, Point([x, y]): Point) -> Self::Output {
        Point([self * x, self * y])
    }
}

impl Mul<Scalar> for Point {
    type Output = Point;

    #[inline]
    fn mul(self, rhs: Scalar) -> Self::Output {
        rhs * self
    }
}

impl Div<Scalar> for Point {
    type Output = Point;

    #[inline]
    fn div(self, rhs: Scalar) -> Self::Output {
        let Point([x, y]) = self;
        Point([x / rhs, y / rhs])
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, Point([x1, y1]): Point) -> Self::Output {
        let Point([x0, y0]) = self;
        Point([x0 + x1, y0 + y1])
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, Point([x1, y1]): Point) -> Self::Output {
        let Point([x0, y0]) = self;
        Point([x0 - x1, y0 - y1])
    }
}

impl Neg for Point {
    type Output = Point;

    #[inline]
    fn neg(self) -> Self::Output {
        let Point([x, y]) = self;
        Point([-x, -y])
    }
}

/// 2D affine transformation
///
/// Stored as an array [m00, m01, m02, m10, m11, m12] but semantically corresponds to
/// a matrix:
/// ┌             ┐
/// │ m00 m01 m02 │
/// │ m10 m11 m12 │
/// │   0   0   1 │
/// └             ┘
/// Builder methods (`translate`, `scale`, ...) apply the new transformation *before*
/// `self`, so `identity().translate(..).rotate(..)` rotates first and translates second.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform([Scalar; 6]);

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub const fn identity() -> Self {
        Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
    }

    /// Construct transformation from its matrix coefficients
    pub const fn new(
        m00: Scalar,
        m01: Scalar,
        m02: Scalar,
        m10: Scalar,
        m11: Scalar,
        m12: Scalar,
    ) -> Self {
        Self([m00, m01, m02, m10, m11, m12])
    }

    /// Matrix coefficients `[m00, m01, m02, m10, m11, m12]`
    pub fn coefficients(&self) -> [Scalar; 6] {
        self.0
    }

    /// Apply this transformation to a point
    pub fn apply(&self, point: Point) -> Point {
        let Self([m00, m01, m02, m10, m11, m12]) = self;
        let Point([x, y]) = point;
        Point([x * m00 + y * m01 + m02, x * m10 + y * m11 + m12])
    }

    /// Apply only the linear part, used for displacement vectors
    pub fn apply_vector(&self, vector: Point) -> Point {
        let Self([m00, m01, _, m10, m11, _]) = self;
        let Point([x, y]) = vector;
        Point([x * m00 + y * m01, x * m10 + y * m11])
    }

    /// Find the inverse transformation, `None` if it is degenerate
    pub fn invert(&self) -> Option<Self> {
        // inv([[M, v], [0, 1]]) = [[inv(M), - inv(M) * v], [0, 1]]
        let Self([m00, m01, m02, m10, m11, m12]) = self;
        let det = m00 * m11 - m10 * m01;
        if det.abs() <= EPSILON {
            return None;
        }
        let o00 = m11 / det;
        let o01 = -m01 / det;
        let o10 = -m10 / det;
        let o11 = m00 / det;
        let o02 = -o00 * m02 - o01 * m12;
        let o12 = -o10 * m02 - o11 * m12;
        Some(Self([o00, o01, o02, o10, o11, o12]))
    }

    /// Translation by `[tx, ty]` applied before self
    pub fn translate(&self, tx: Scalar, ty: Scalar) -> Self {
        self.matmul(Self([1.0, 0.0, tx, 0.0, 1.0, ty]))
    }

    /// Scaling by `[sx, sy]` relative to the origin applied before self
    pub fn scale(&self, sx: Scalar, sy: Scalar) -> Self {
        self.matmul(Self([sx, 0.0, 0.0, 0.0, sy, 0.0]))
    }

    /// Scaling relative to the point `p` applied before self
    pub fn scale_around(&self, sx: Scalar, sy: Scalar, p: impl Into<Point>) -> Self {
        let p = p.into();
        self.translate(p.x(), p.y())
            .scale(sx, sy)
            .translate(-p.x(), -p.y())
    }

    /// Counterclockwise rotation by angle `a` (radians) around the origin applied before self
    pub fn rotate(&self, a: Scalar) -> Self {
        let (sin, cos) = a.sin_cos();
        self.matmul(Self([cos, -sin, 0.0, sin, cos, 0.0]))
    }

    /// Rotation around point `p` by angle `a` (radians) applied before self
    pub fn rotate_around(&self, a: Scalar, p: impl Into<Point>) -> Self {
        let p = p.into();
        self.translate(p.x(), p.y())
            .rotate(a)
            .translate(-p.x(), -p.y())
    }

    /// Shear `x += shx * y`, `y += shy * x` applied before self
    pub fn shear(&self, shx: Scalar, shy: Scalar) -> Self {
        self.matmul(Self([1.0, shx, 0.0, shy, 1.0, 0.0]))
    }

    /// Multiply transformations in matrix form, `other` is applied first
    pub fn matmul(&self, other: Transform) -> Self {
        let Self([s00, s01, s02, s10, s11, s12]) = self;
        let Self([o00, o01, o02, o10, o11, o12]) = other;
        Self([
            s00 * o00 + s01 * o10,
            s00 * o01 + s01 * o11,
            s00 * o02 + s01 * o12 + s02,
            s10 * o00 + s11 * o10,
            s10 * o01 + s11 * o11,
            s10 * o02 + s11 * o12 + s12,
        ])
    }
}

impl Mul<Transform> for Transform {
    type Output = Transform;

    fn mul(self, other: Transform) -> Self::Output {
        self.matmul(other)
    }
}

/// Non-empty bounding box with sides directed along the axes
///
/// The empty box is represented by `Option::<BBox>::None` throughout the crate.
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    min: Point,
    max: Point,
}

impl BBox {
    /// Smallest box containing both `p0` and `p1`
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        let Point([x0, y0]) = p0.into();
        let Point([x1, y1]) = p1.into();
        Self {
            min: Point([x0.min(x1), y0.min(y1)]),
            max: Point([x0.max(x1), y0.max(y1)]),
        }
    }

    /// Smallest box containing all points, `None` if there are none
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        points.into_iter().fold(None, |bbox, point| match bbox {
            None => Some(BBox::new(point, point)),
            Some(bbox) => Some(bbox.extend(point)),
        })
    }

    #[inline]
    pub fn min(&self) -> Point {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Point {
        self.max
    }

    #[inline]
    pub fn x(&self) -> Scalar {
        self.min.x()
    }

    #[inline]
    pub fn y(&self) -> Scalar {
        self.min.y()
    }

    #[inline]
    pub fn width(&self) -> Scalar {
        self.max.x() - self.min.x()
    }

    #[inline]
    pub fn height(&self) -> Scalar {
        self.max.y() - self.min.y()
    }

    /// Determine if the point is inside of the bounding box (borders included)
    pub fn contains(&self, point: Point) -> bool {
        let Point([x, y]) = point;
        self.min.x() <= x && x <= self.max.x() && self.min.y() <= y && y <= self.max.y()
    }

    /// Bounding box extended so it would contain provided point
    pub fn extend(&self, point: Point) -> Self {
        let Point([x, y]) = point;
        Self {
            min: Point([self.min.x().min(x), self.min.y().min(y)]),
            max: Point([self.max.x().max(x), self.max.y().max(y)]),
        }
    }

    /// Bounding box that spans both boxes
    pub fn union(&self, other: BBox) -> Self {
        self.extend(other.min).extend(other.max)
    }

    pub fn union_opt(&self, other: Option<BBox>) -> Self {
        match other {
            Some(other) => self.union(other),
            None => *self,
        }
    }

    /// Intersection of two boxes, `None` if they do not overlap
    pub fn intersect(&self, other: BBox) -> Option<BBox> {
        let (x_min, x_max) =
            range_intersect(self.min.x(), self.max.x(), other.min.x(), other.max.x())?;
        let (y_min, y_max) =
            range_intersect(self.min.y(), self.max.y(), other.min.y(), other.max.y())?;
        Some(BBox {
            min: Point::new(x_min, y_min),
            max: Point::new(x_max, y_max),
        })
    }

    /// Whether two boxes overlap, touching borders count as an overlap
    pub fn intersects(&self, other: BBox) -> bool {
        self.min.x() <= other.max.x()
            && other.min.x() <= self.max.x()
            && self.min.y() <= other.max.y()
            && other.min.y() <= self.max.y()
    }

    /// Box grown by `size` in every direction
    pub fn enlarge(&self, size: Scalar) -> Self {
        let delta = Point::new(size, size);
        BBox::new(self.min - delta, self.max + delta)
    }

    /// Bounding box of the transformed corners
    pub fn transform(&self, tr: Transform) -> Self {
        let corners = [
            self.min,
            Point::new(self.min.x(), self.max.y()),
            self.max,
            Point::new(self.max.x(), self.min.y()),
        ];
        let p0 = tr.apply(corners[0]);
        corners[1..]
            .iter()
            .fold(BBox::new(p0, p0), |bbox, p| bbox.extend(tr.apply(*p)))
    }
}

fn range_intersect(
    r0_min: Scalar,
    r0_max: Scalar,
    r1_min: Scalar,
    r1_max: Scalar,
) -> Option<(Scalar, Scalar)> {
    if r0_min > r1_max || r1_min > r0_max {
        None
    } else {
        Some((r0_min.max(r1_min), r0_max.min(r1_max)))
    }
}

impl fmt::Debug for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBox x=")?;
        scalar_fmt(f, self.x())?;
        write!(f, ", y=")?;
        scalar_fmt(f, self.y())?;
        write!(f, ", w=")?;
        scalar_fmt(f, self.width())?;
        write!(f, ", h=")?;
        scalar_fmt(f, self.height())
    }
}
