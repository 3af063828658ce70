//! Raw path operators and primitive drawing commands
use crate::{Point, Scalar, scalar_fmt};
use std::fmt;

/// Single operator of a raw path
///
/// Relative variants carry displacements which are resolved against the current
/// point while the path is walked. Angles of `Arc` are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathElement {
    MoveTo(Point),
    LineTo(Point),
    CurveTo(Point, Point, Point),
    RMoveTo(Point),
    RLineTo(Point),
    RCurveTo(Point, Point, Point),
    /// Circular arc, counterclockwise (PostScript `arc`) if `ccw` is set and
    /// clockwise (PostScript `arcn`) otherwise
    Arc {
        center: Point,
        radius: Scalar,
        angle1: Scalar,
        angle2: Scalar,
        ccw: bool,
    },
    /// Arc tangent to the lines from the current point to `p1` and from `p1` to `p2`
    TangentArc { p1: Point, p2: Point, radius: Scalar },
    Close,
}

impl PathElement {
    /// Whether a path is allowed to start with this element
    pub fn starts_path(&self) -> bool {
        matches!(self, PathElement::MoveTo(_) | PathElement::Arc { .. })
    }

    /// PostScript operator name
    pub fn operator(&self) -> &'static str {
        use PathElement::*;
        match self {
            MoveTo(_) => "moveto",
            LineTo(_) => "lineto",
            CurveTo(..) => "curveto",
            RMoveTo(_) => "rmoveto",
            RLineTo(_) => "rlineto",
            RCurveTo(..) => "rcurveto",
            Arc { ccw: true, .. } => "arc",
            Arc { ccw: false, .. } => "arcn",
            TangentArc { .. } => "arct",
            Close => "closepath",
        }
    }
}

/// PostScript form, operands followed by the operator
impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PathElement::*;
        match self {
            MoveTo(p) | LineTo(p) | RMoveTo(p) | RLineTo(p) => write!(f, "{} ", p)?,
            CurveTo(p1, p2, p3) | RCurveTo(p1, p2, p3) => write!(f, "{} {} {} ", p1, p2, p3)?,
            Arc {
                center,
                radius,
                angle1,
                angle2,
                ..
            } => {
                write!(f, "{} ", center)?;
                for value in [radius, angle1, angle2] {
                    scalar_fmt(f, *value)?;
                    write!(f, " ")?;
                }
            }
            TangentArc { p1, p2, radius } => {
                write!(f, "{} {} ", p1, p2)?;
                scalar_fmt(f, *radius)?;
                write!(f, " ")?;
            }
            Close => {}
        }
        write!(f, "{}", self.operator())
    }
}

/// Primitive drawing command consumed by output serializers
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrawCmd {
    MoveTo(Point),
    LineTo(Point),
    CurveTo(Point, Point, Point),
    ClosePath,
}

impl fmt::Display for DrawCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCmd::MoveTo(p) => write!(f, "{} moveto", p),
            DrawCmd::LineTo(p) => write!(f, "{} lineto", p),
            DrawCmd::CurveTo(p1, p2, p3) => write!(f, "{} {} {} curveto", p1, p2, p3),
            DrawCmd::ClosePath => write!(f, "closepath"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_display() {
        let elements = [
            (PathElement::MoveTo(Point::new(1.0, 2.0)), "1 2 moveto"),
            (PathElement::RLineTo(Point::new(-0.5, 0.25)), "-0.5 0.25 rlineto"),
            (
                PathElement::CurveTo(Point::new(0.0, 1.0), Point::new(2.0, 3.0), Point::new(4.0, 5.0)),
                "0 1 2 3 4 5 curveto",
            ),
            (
                PathElement::Arc {
                    center: Point::new(0.0, 0.0),
                    radius: 1.0,
                    angle1: 0.0,
                    angle2: 90.0,
                    ccw: false,
                },
                "0 0 1 0 90 arcn",
            ),
            (
                PathElement::TangentArc {
                    p1: Point::new(1.0, 0.0),
                    p2: Point::new(1.0, 1.0),
                    radius: 0.5,
                },
                "1 0 1 1 0.5 arct",
            ),
            (PathElement::Close, "closepath"),
        ];
        for (element, expected) in elements {
            assert_eq!(element.to_string(), expected);
        }
    }

    #[test]
    fn test_starts_path() {
        assert!(PathElement::MoveTo(Point::new(0.0, 0.0)).starts_path());
        assert!(
            PathElement::Arc {
                center: Point::new(0.0, 0.0),
                radius: 1.0,
                angle1: 0.0,
                angle2: 90.0,
                ccw: true,
            }
            .starts_path()
        );
        assert!(!PathElement::LineTo(Point::new(0.0, 0.0)).starts_path());
        assert!(!PathElement::RMoveTo(Point::new(0.0, 0.0)).starts_path());
        assert!(!PathElement::Close.starts_path());
    }

    #[test]
    fn test_draw_cmd_display() {
        assert_eq!(DrawCmd::MoveTo(Point::new(0.0, 1.5)).to_string(), "0 1.5 moveto");
        assert_eq!(DrawCmd::ClosePath.to_string(), "closepath");
    }
}
