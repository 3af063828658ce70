//! Walk context threaded through a raw path
use crate::{Arc, Cubic, Line, PathElement, Point, TangentArc};

/// State required to resolve context dependent path elements
///
/// Context is an immutable value, each element produces the context for the
/// element that follows it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WalkContext {
    /// Point where the previous element ended, `None` before the first move and after a close
    pub current_point: Option<Point>,
    /// Start point of the active subpath
    pub subpath_start: Option<Point>,
}

/// Path element with every context dependency resolved to absolute geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Start of a new subpath, explicit or implied
    Move(Point),
    Line(Line),
    Curve(Cubic),
    /// Arc, preceded by a line from the current point to the arc start if
    /// there is a current point
    Arc { line: Option<Line>, arc: Arc },
    /// End of the subpath with the chord of the implicit closing edge
    Close { chord: Option<Line> },
}

impl WalkContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context after `element` has been drawn
    pub fn update(&self, element: &PathElement) -> WalkContext {
        self.step(element).1
    }

    /// Resolve `element` against this context, returns its geometry and the next context
    ///
    /// Elements that need a current point but have none act as a move to their end
    /// point, with relative displacements resolved against the origin.
    pub fn step(&self, element: &PathElement) -> (Step, WalkContext) {
        let origin = Point::new(0.0, 0.0);
        match *element {
            PathElement::MoveTo(p) => (Step::Move(p), Self::started(p)),
            PathElement::RMoveTo(d) => {
                let p = self.current_point.unwrap_or(origin) + d;
                (Step::Move(p), Self::started(p))
            }
            PathElement::LineTo(p) => self.line_to(p),
            PathElement::RLineTo(d) => match self.current_point {
                Some(current) => self.line_to(current + d),
                None => self.implicit_move(element, d),
            },
            PathElement::CurveTo(p1, p2, p3) => self.curve_to(p1, p2, p3),
            PathElement::RCurveTo(d1, d2, d3) => match self.current_point {
                Some(current) => self.curve_to(current + d1, current + d2, current + d3),
                None => self.implicit_move(element, d3),
            },
            PathElement::Arc {
                center,
                radius,
                angle1,
                angle2,
                ccw,
            } => {
                let arc = Arc::new(center, radius, angle1, angle2, ccw);
                let line = self
                    .current_point
                    .map(|current| Line::new(current, arc.start()));
                (Step::Arc { line, arc }, self.drawn(arc.start(), arc.end()))
            }
            PathElement::TangentArc { p1, p2, radius } => {
                let Some(current) = self.current_point else {
                    return self.implicit_move(element, p1);
                };
                match TangentArc::new(current, p1, p2, radius) {
                    TangentArc::Line(end) => self.line_to(end),
                    TangentArc::Arc(arc) => {
                        let line = Some(Line::new(current, arc.start()));
                        (Step::Arc { line, arc }, self.drawn(current, arc.end()))
                    }
                }
            }
            PathElement::Close => {
                let chord = match (self.current_point, self.subpath_start) {
                    (Some(current), Some(start)) => Some(Line::new(current, start)),
                    _ => None,
                };
                (Step::Close { chord }, Self::default())
            }
        }
    }

    /// Context right after a move to `p`
    fn started(p: Point) -> Self {
        Self {
            current_point: Some(p),
            subpath_start: Some(p),
        }
    }

    /// Context after drawing from `start` to `end`, `start` is only used if
    /// there is no active subpath
    fn drawn(&self, start: Point, end: Point) -> Self {
        Self {
            current_point: Some(end),
            subpath_start: self.subpath_start.or(self.current_point).or(Some(start)),
        }
    }

    fn line_to(&self, p: Point) -> (Step, Self) {
        match self.current_point {
            Some(current) => (Step::Line(Line::new(current, p)), self.drawn(current, p)),
            None => self.implicit_move(&PathElement::LineTo(p), p),
        }
    }

    fn curve_to(&self, p1: Point, p2: Point, p3: Point) -> (Step, Self) {
        match self.current_point {
            Some(current) => (
                Step::Curve(Cubic::new(current, p1, p2, p3)),
                self.drawn(current, p3),
            ),
            None => self.implicit_move(&PathElement::CurveTo(p1, p2, p3), p3),
        }
    }

    fn implicit_move(&self, element: &PathElement, p: Point) -> (Step, Self) {
        tracing::warn!(
            operator = element.operator(),
            "element without current point, treated as a move"
        );
        (Step::Move(p), Self::started(p))
    }
}
