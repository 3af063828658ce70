//! Circular arcs and their approximation by cubic bezier curves
use crate::{BBox, Cubic, Point, Scalar, utils::wrap_above};
use std::fmt;

/// Default maximum angular extent (degrees) of a single cubic approximating an arc
pub const DEFAULT_ARC_STEP: Scalar = 45.0;

/// Circular arc, angles are measured in degrees counterclockwise from the x axis
#[derive(Clone, Copy, PartialEq)]
pub struct Arc {
    center: Point,
    radius: Scalar,
    /// start angle
    angle: Scalar,
    /// signed angular size, positive for counterclockwise arcs
    sweep: Scalar,
}

impl fmt::Debug for Arc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Arc center:{:?} radius:{:.3?} angle:{:.3?} sweep:{:.3?}",
            self.center, self.radius, self.angle, self.sweep
        )
    }
}

impl Arc {
    /// Arc from `angle1` to `angle2`, going counterclockwise if `ccw` is set
    /// (PostScript `arc`) and clockwise otherwise (PostScript `arcn`).
    ///
    /// A negative angular size wraps into `(0, 360]`, a size above a full turn
    /// drops whole turns but keeps one, so it lands in `[360, 720)`.
    pub fn new(center: Point, radius: Scalar, angle1: Scalar, angle2: Scalar, ccw: bool) -> Self {
        let sweep = if ccw {
            turn_sweep(angle2 - angle1)
        } else {
            -turn_sweep(angle1 - angle2)
        };
        Self {
            center,
            radius,
            angle: angle1,
            sweep,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> Scalar {
        self.radius
    }

    /// Signed angular size of the arc in degrees
    pub fn sweep(&self) -> Scalar {
        self.sweep
    }

    /// Point on the circle at `angle` degrees
    pub fn point_at_angle(&self, angle: Scalar) -> Point {
        let (sin, cos) = angle.to_radians().sin_cos();
        self.center + self.radius * Point::new(cos, sin)
    }

    pub fn start(&self) -> Point {
        self.point_at_angle(self.angle)
    }

    pub fn end(&self) -> Point {
        self.point_at_angle(self.angle + self.sweep)
    }

    /// Exact bounding box: end points plus every axis extreme inside the sweep
    pub fn bbox(&self, init: Option<BBox>) -> BBox {
        let (lo, hi) = if self.sweep >= 0.0 {
            (self.angle, self.angle + self.sweep)
        } else {
            (self.angle + self.sweep, self.angle)
        };
        let mut bbox = BBox::new(self.start(), self.end()).union_opt(init);
        // a full turn passes at most five multiples of 90 degrees
        let first = (lo / 90.0).ceil();
        for index in 0..5 {
            let angle = (first + index as Scalar) * 90.0;
            if !(angle <= hi) {
                break;
            }
            bbox = bbox.extend(self.point_at_angle(angle));
        }
        bbox
    }

    /// Convert arc to an iterator over cubic segments spanning at most `step` degrees
    pub fn to_cubics(&self, step: Scalar) -> ArcCubicIter {
        ArcCubicIter::new(*self, step)
    }
}

/// Reduce angular size of a counterclockwise arc, zero stays zero
fn turn_sweep(sweep: Scalar) -> Scalar {
    if sweep < 0.0 {
        let sweep = wrap_above(sweep, 0.0, 360.0);
        if sweep == 0.0 { 360.0 } else { sweep }
    } else if sweep > 360.0 {
        wrap_above(sweep, 360.0, 360.0)
    } else {
        sweep
    }
}

/// Approximate arc with a sequence of cubic bezier curves
///
/// Arc of size `dphi` is split into `floor(|dphi| / step) + 1` equal pieces, each
/// piece from `phi1` to `phi2` becomes:
///     P0 = C + r * (cos(phi1), sin(phi1))
///     P1 = P0 + l * (-sin(phi1), cos(phi1))
///     P2 = P3 + l * (sin(phi2), -cos(phi2))
///     P3 = C + r * (cos(phi2), sin(phi2))
/// where
///     l = r * 4 * (1 - cos(dphi / 2)) / (3 * sin(dphi / 2))
/// A negative piece size yields clockwise curves.
pub struct ArcCubicIter {
    arc: Arc,
    segment_delta: Scalar,
    segment_index: usize,
    segment_count: usize,
}

impl ArcCubicIter {
    fn new(arc: Arc, step: Scalar) -> Self {
        let step = if step > 0.0 { step } else { DEFAULT_ARC_STEP };
        let segment_count = if arc.radius == 0.0 || arc.sweep == 0.0 || !arc.sweep.is_finite() {
            0
        } else {
            (arc.sweep.abs() / step).floor() as usize + 1
        };
        let segment_delta = if segment_count == 0 {
            0.0
        } else {
            arc.sweep / segment_count as Scalar
        };
        Self {
            arc,
            segment_delta,
            segment_index: 0,
            segment_count,
        }
    }

    fn angle_at(&self, index: usize) -> Scalar {
        if index == self.segment_count {
            self.arc.angle + self.arc.sweep
        } else {
            self.arc.angle + self.segment_delta * index as Scalar
        }
    }
}

impl Iterator for ArcCubicIter {
    type Item = Cubic;

    fn next(&mut self) -> Option<Self::Item> {
        if self.segment_index >= self.segment_count {
            return None;
        }
        // adjacent cubics share end points exactly, the last one ends at `Arc::end`
        let phi1 = self.angle_at(self.segment_index);
        self.segment_index += 1;
        let phi2 = self.angle_at(self.segment_index);

        let radius = self.arc.radius;
        let half = self.segment_delta.to_radians() / 2.0;
        let l = radius * 4.0 * (1.0 - half.cos()) / (3.0 * half.sin());
        let (sin1, cos1) = phi1.to_radians().sin_cos();
        let (sin2, cos2) = phi2.to_radians().sin_cos();
        let p0 = self.arc.point_at_angle(phi1);
        let p3 = self.arc.point_at_angle(phi2);
        let p1 = p0 + l * Point::new(-sin1, cos1);
        let p2 = p3 + l * Point::new(sin2, -cos2);
        Some(Cubic([p0, p1, p2, p3]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.segment_count - self.segment_index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ArcCubicIter {}

/// Geometry of a PostScript `arct` element resolved against the current point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TangentArc {
    /// Tangents are parallel or radius is zero, only a line to `p1` is drawn
    Line(Point),
    /// Line from the current point to the arc start followed by the arc
    Arc(Arc),
}

impl TangentArc {
    /// Arc of `radius` tangent to the line from `current` to `p1` and to the
    /// line from `p1` to `p2`.
    pub fn new(current: Point, p1: Point, p2: Point, radius: Scalar) -> Self {
        let d1 = current - p1;
        let d2 = p2 - p1;
        let (l1, l2) = (d1.length(), d2.length());
        if l1 == 0.0 || l2 == 0.0 || 1.0 + radius == 1.0 {
            return TangentArc::Line(p1);
        }
        let alpha = (d1.dot(d2) / (l1 * l2)).clamp(-1.0, 1.0).acos();
        if !(alpha.sin().abs() >= 1e-15) {
            return TangentArc::Line(p1);
        }
        let radius = radius.abs();
        let dist = radius / (alpha / 2.0).tan();
        let t1 = p1 + d1 * (dist / l1);
        let t2 = p1 + d2 * (dist / l2);
        let bisector = match (d1 / l1 + d2 / l2).normalize() {
            Some(bisector) => bisector,
            None => return TangentArc::Line(p1),
        };
        let center = p1 + bisector * (radius / (alpha / 2.0).sin());
        let ccw = (-d1).cross(d2) > 0.0;
        let angle1 = (t1 - center).angle_deg();
        let angle2 = (t2 - center).angle_deg();
        TangentArc::Arc(Arc::new(center, radius, angle1, angle2, ccw))
    }

    /// Point where the drawing ends
    pub fn end(&self) -> Point {
        match self {
            TangentArc::Line(p1) => *p1,
            TangentArc::Arc(arc) => arc.end(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Curve, DEFAULT_EPSILON, PI, assert_approx_eq};

    fn assert_close(p: Point, q: Point) {
        assert!(p.dist(q) < 1e-9, "{:?} != {:?}", p, q);
    }

    #[test]
    fn test_sweep() {
        let c = Point::new(0.0, 0.0);
        assert_approx_eq!(Arc::new(c, 1.0, 0.0, 90.0, true).sweep(), 90.0);
        assert_approx_eq!(Arc::new(c, 1.0, 0.0, -90.0, true).sweep(), 270.0);
        assert_approx_eq!(Arc::new(c, 1.0, 0.0, 90.0, false).sweep(), -270.0);
        assert_approx_eq!(Arc::new(c, 1.0, 90.0, 0.0, false).sweep(), -90.0);
        assert_approx_eq!(Arc::new(c, 1.0, 0.0, 360.0, true).sweep(), 360.0);
        assert_approx_eq!(Arc::new(c, 1.0, 0.0, 720.0, true).sweep(), 360.0);
        assert_approx_eq!(Arc::new(c, 1.0, 30.0, 30.0, true).sweep(), 0.0);
        assert_approx_eq!(Arc::new(c, 1.0, 0.0, -360.0, true).sweep(), 360.0);

        // more than a full turn keeps one extra turn
        assert_approx_eq!(Arc::new(c, 1.0, 0.0, 540.0, true).sweep(), 540.0);
        assert_approx_eq!(Arc::new(c, 1.0, 0.0, 400.0, true).sweep(), 400.0);
        assert_approx_eq!(Arc::new(c, 1.0, 0.0, 900.0, true).sweep(), 540.0);
        assert_approx_eq!(Arc::new(c, 1.0, 540.0, 0.0, false).sweep(), -540.0);
        assert_approx_eq!(Arc::new(c, 1.0, 0.0, 1080.0, true).sweep(), 360.0);
    }

    #[test]
    fn test_cubics_above_full_turn() {
        let arc = Arc::new(Point::new(0.0, 0.0), 1.0, 0.0, 540.0, true);
        let cubics: Vec<_> = arc.to_cubics(DEFAULT_ARC_STEP).collect();
        assert_eq!(cubics.len(), 13);
        assert_close(cubics[0].start(), Point::new(1.0, 0.0));
        assert_close(cubics[12].end(), Point::new(-1.0, 0.0));
        let length: Scalar = cubics.iter().map(|c| c.arclength(DEFAULT_EPSILON)).sum();
        assert_approx_eq!(length, 3.0 * PI, 1e-2);

        // the normalized path addresses all of the cubics
        let mut path = crate::Path::new();
        path.arc((0.0, 0.0), 1.0, 0.0, 540.0);
        let norm = path.normalize().expect("arc path normalizes");
        assert_eq!(norm.range(), 13);
    }

    #[test]
    fn test_cubics() {
        let arc = Arc::new(Point::new(0.0, 0.0), 1.0, 0.0, 90.0, true);
        let cubics: Vec<_> = arc.to_cubics(DEFAULT_ARC_STEP).collect();
        assert_eq!(cubics.len(), 3);
        assert_close(cubics[0].start(), Point::new(1.0, 0.0));
        assert_close(cubics[2].end(), Point::new(0.0, 1.0));
        for pair in cubics.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
        let length: Scalar = cubics.iter().map(|c| c.arclength(DEFAULT_EPSILON)).sum();
        assert_approx_eq!(length, PI / 2.0, 1e-3);
        // points stay on the circle
        for cubic in cubics.iter() {
            for i in 0..=10 {
                assert_approx_eq!(cubic.at(i as Scalar / 10.0).length(), 1.0, 1e-4);
            }
        }

        // clockwise arc
        let arc = Arc::new(Point::new(1.0, 1.0), 2.0, 90.0, 0.0, false);
        let cubics: Vec<_> = arc.to_cubics(30.0).collect();
        assert_eq!(cubics.len(), 4);
        assert_close(cubics[0].start(), Point::new(1.0, 3.0));
        assert_close(cubics[3].end(), Point::new(3.0, 1.0));
        let mid = cubics[1].end();
        assert_approx_eq!(mid.dist(Point::new(1.0, 1.0)), 2.0, 1e-9);
        assert!(mid.x() > 1.0 && mid.y() > 1.0);

        let degenerate = Arc::new(Point::new(0.0, 0.0), 0.0, 0.0, 90.0, true);
        assert_eq!(degenerate.to_cubics(DEFAULT_ARC_STEP).count(), 0);
        let empty = Arc::new(Point::new(0.0, 0.0), 1.0, 10.0, 10.0, true);
        assert_eq!(empty.to_cubics(DEFAULT_ARC_STEP).len(), 0);
    }

    #[test]
    fn test_bbox() {
        let arc = Arc::new(Point::new(0.0, 0.0), 1.0, 45.0, 135.0, true);
        let bbox = arc.bbox(None);
        assert_approx_eq!(bbox.max().y(), 1.0, 1e-12);
        assert_approx_eq!(bbox.min().y(), (2.0 as Scalar).sqrt() / 2.0, 1e-12);
        assert_approx_eq!(bbox.width(), (2.0 as Scalar).sqrt(), 1e-12);

        let circle = Arc::new(Point::new(1.0, 2.0), 3.0, 0.0, 360.0, true);
        let bbox = circle.bbox(None);
        assert_close(bbox.min(), Point::new(-2.0, -1.0));
        assert_close(bbox.max(), Point::new(4.0, 5.0));

        // clockwise from 90 to 0 covers the first quadrant only
        let arc = Arc::new(Point::new(0.0, 0.0), 1.0, 90.0, 0.0, false);
        let bbox = arc.bbox(None);
        assert_close(bbox.min(), Point::new(0.0, 0.0));
        assert_close(bbox.max(), Point::new(1.0, 1.0));
    }

    #[test]
    fn test_tangent_arc() {
        // corner at (1, 0) turning left towards (1, 1)
        let arct = TangentArc::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0), 0.5);
        let arc = match arct {
            TangentArc::Arc(arc) => arc,
            TangentArc::Line(_) => panic!("expected arc"),
        };
        assert_close(arc.center(), Point::new(0.5, 0.5));
        assert_close(arc.start(), Point::new(0.5, 0.0));
        assert_close(arc.end(), Point::new(1.0, 0.5));
        assert_approx_eq!(arc.sweep(), 90.0, 1e-9);

        // turning right
        let arct = TangentArc::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, -1.0), 0.5);
        match arct {
            TangentArc::Arc(arc) => {
                assert_close(arc.center(), Point::new(0.5, -0.5));
                assert_approx_eq!(arc.sweep(), -90.0, 1e-9);
                assert_close(arct.end(), Point::new(1.0, -0.5));
            }
            TangentArc::Line(_) => panic!("expected arc"),
        }

        // collinear tangents and zero radius
        let arct = TangentArc::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0), 0.5);
        assert_eq!(arct, TangentArc::Line(Point::new(1.0, 0.0)));
        let arct = TangentArc::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0), 0.0);
        assert_eq!(arct.end(), Point::new(1.0, 0.0));
    }
}
