//! Raw paths: sequences of PostScript style path operators
use crate::{
    BBox, Curve, DrawCmd, Error, NormPath, NormalizeOptions, PathElement, Point, Scalar, Step,
    WalkContext, normalize::normalize, ps::PathParser,
};
use std::{fmt, io::Write, ops::Add, str::FromStr};

/// Uninterpreted sequence of path elements
///
/// Raw path may mix absolute, relative and arc elements in any order. All geometric
/// queries go through its normalized form, see [`Path::normalize`].
#[derive(Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    elements: Vec<PathElement>,
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in self.elements.iter() {
            writeln!(f, "{:?}", element)?;
        }
        Ok(())
    }
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<PathElement>) -> Self {
        Self { elements }
    }

    /// Straight line from `p0` to `p1`
    pub fn line(p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        let mut path = Self::new();
        path.move_to(p0).line_to(p1);
        path
    }

    /// Cubic bezier curve with control points `p0`, `p1`, `p2`, `p3`
    pub fn curve(
        p0: impl Into<Point>,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        p3: impl Into<Point>,
    ) -> Self {
        let mut path = Self::new();
        path.move_to(p0).curve_to(p1, p2, p3);
        path
    }

    /// Closed rectangle with corner at `(x, y)`
    pub fn rect(x: Scalar, y: Scalar, width: Scalar, height: Scalar) -> Self {
        let mut path = Self::new();
        path.move_to((x, y))
            .rline_to((width, 0.0))
            .rline_to((0.0, height))
            .rline_to((-width, 0.0))
            .close();
        path
    }

    /// Closed circle
    pub fn circle(center: impl Into<Point>, radius: Scalar) -> Self {
        let mut path = Self::new();
        path.arc(center, radius, 0.0, 360.0).close();
        path
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append element
    pub fn push(&mut self, element: PathElement) -> &mut Self {
        self.elements.push(element);
        self
    }

    pub fn move_to(&mut self, p: impl Into<Point>) -> &mut Self {
        self.push(PathElement::MoveTo(p.into()))
    }

    pub fn line_to(&mut self, p: impl Into<Point>) -> &mut Self {
        self.push(PathElement::LineTo(p.into()))
    }

    pub fn curve_to(
        &mut self,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        p3: impl Into<Point>,
    ) -> &mut Self {
        self.push(PathElement::CurveTo(p1.into(), p2.into(), p3.into()))
    }

    pub fn rmove_to(&mut self, d: impl Into<Point>) -> &mut Self {
        self.push(PathElement::RMoveTo(d.into()))
    }

    pub fn rline_to(&mut self, d: impl Into<Point>) -> &mut Self {
        self.push(PathElement::RLineTo(d.into()))
    }

    /// Relative cubic curve, all control points are displacements from the current point
    pub fn rcurve_to(
        &mut self,
        d1: impl Into<Point>,
        d2: impl Into<Point>,
        d3: impl Into<Point>,
    ) -> &mut Self {
        self.push(PathElement::RCurveTo(d1.into(), d2.into(), d3.into()))
    }

    /// Counterclockwise arc from `angle1` to `angle2` (degrees)
    pub fn arc(
        &mut self,
        center: impl Into<Point>,
        radius: Scalar,
        angle1: Scalar,
        angle2: Scalar,
    ) -> &mut Self {
        self.push(PathElement::Arc {
            center: center.into(),
            radius,
            angle1,
            angle2,
            ccw: true,
        })
    }

    /// Clockwise arc from `angle1` to `angle2` (degrees)
    pub fn arcn(
        &mut self,
        center: impl Into<Point>,
        radius: Scalar,
        angle1: Scalar,
        angle2: Scalar,
    ) -> &mut Self {
        self.push(PathElement::Arc {
            center: center.into(),
            radius,
            angle1,
            angle2,
            ccw: false,
        })
    }

    /// Arc of `radius` tangent to the lines from the current point to `p1` and from `p1` to `p2`
    pub fn arct(&mut self, p1: impl Into<Point>, p2: impl Into<Point>, radius: Scalar) -> &mut Self {
        self.push(PathElement::TangentArc {
            p1: p1.into(),
            p2: p2.into(),
            radius,
        })
    }

    pub fn close(&mut self) -> &mut Self {
        self.push(PathElement::Close)
    }

    /// Context after all elements have been walked
    pub fn context(&self) -> WalkContext {
        self.elements
            .iter()
            .fold(WalkContext::new(), |ctx, element| ctx.update(element))
    }

    /// Bounding box of the raw path, `None` if nothing is drawn
    ///
    /// Unlike the normalized path this uses exact extents of circular arcs, curves
    /// contribute the box of their control points.
    pub fn bbox(&self) -> Option<BBox> {
        let mut ctx = WalkContext::new();
        let mut bbox = None;
        for element in self.elements.iter() {
            let (step, next) = ctx.step(element);
            bbox = match step {
                Step::Move(_) => bbox,
                Step::Line(line) => Some(line.bbox(bbox)),
                Step::Curve(cubic) => Some(cubic.bbox(bbox)),
                Step::Arc { line, arc } => {
                    let bbox = line.map_or(bbox, |line| Some(line.bbox(bbox)));
                    Some(arc.bbox(bbox))
                }
                Step::Close { chord } => chord.map_or(bbox, |chord| Some(chord.bbox(bbox))),
            };
            ctx = next;
        }
        bbox
    }

    /// Normalize with default options
    pub fn normalize(&self) -> Result<NormPath, Error> {
        normalize(self, &NormalizeOptions::default())
    }

    pub fn normalize_with(&self, options: &NormalizeOptions) -> Result<NormPath, Error> {
        normalize(self, options)
    }

    /// Primitive drawing commands of the normalized path
    pub fn draw_cmds(&self) -> Result<Vec<DrawCmd>, Error> {
        Ok(self.normalize()?.draw_cmds().collect())
    }

    /// Write raw PostScript operators, one element per line
    pub fn write_ps(&self, mut out: impl Write) -> Result<(), Error> {
        if let Some(first) = self.elements.first() {
            if !first.starts_path() {
                return Err(Error::MalformedPath {
                    reason: format!("path starts with `{}`", first.operator()),
                });
            }
        }
        for element in self.elements.iter() {
            writeln!(out, "{}", element)?;
        }
        Ok(())
    }
}

/// Elements in PostScript syntax separated by spaces, parsed back by `FromStr`
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut elements = self.elements.iter();
        if let Some(element) = elements.next() {
            write!(f, "{}", element)?;
        }
        for element in elements {
            write!(f, " {}", element)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(text: &str) -> Result<Path, Self::Err> {
        let mut path = Path::new();
        PathParser::new(text.as_bytes()).parse(&mut path)?;
        Ok(path)
    }
}

impl Add<&Path> for Path {
    type Output = Path;

    fn add(mut self, other: &Path) -> Self::Output {
        self.elements.extend_from_slice(&other.elements);
        self
    }
}

impl Add for Path {
    type Output = Path;

    fn add(mut self, other: Path) -> Self::Output {
        self.elements.extend(other.elements);
        self
    }
}

impl Extend<PathElement> for Path {
    fn extend<T: IntoIterator<Item = PathElement>>(&mut self, iter: T) {
        self.elements.extend(iter)
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<T: IntoIterator<Item = PathElement>>(iter: T) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Path {
    type Item = PathElement;
    type IntoIter = std::vec::IntoIter<PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}
