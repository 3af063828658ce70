//! Normalized paths: subpaths made only of lines and cubic curves
use crate::{
    BBox, Curve, DrawCmd, EPSILON, Error, Line, NormSegment, Point, Scalar, Transform,
    intersect::intersect,
};
use std::{fmt, io::Write, ops::Add};

/// Non-empty sequence of connected segments, end of each segment is the start of the next one
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormSubpath {
    segments: Vec<NormSegment>,
    /// Whether subpath has an implicit line connecting its end to its start
    closed: bool,
}

impl fmt::Debug for NormSubpath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self.segments.iter() {
            writeln!(f, "{:?}", segment)?;
        }
        if self.closed {
            writeln!(f, "Close")
        } else {
            writeln!(f, "End")
        }
    }
}

impl NormSubpath {
    pub fn new(segments: Vec<NormSegment>, closed: bool) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments, closed })
        }
    }

    pub fn segments(&self) -> &[NormSegment] {
        &self.segments
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn start(&self) -> Point {
        self.first().start()
    }

    /// End of the last segment, the implicit closing edge is not included
    pub fn end(&self) -> Point {
        self.last().end()
    }

    fn first(&self) -> &NormSegment {
        self.segments.first().expect("NormSubpath is never empty")
    }

    fn last(&self) -> &NormSegment {
        self.segments.last().expect("NormSubpath is never empty")
    }

    /// Implicit line from the end back to the start of a closed subpath
    pub fn closing_edge(&self) -> Option<Line> {
        self.closed.then(|| Line::new(self.end(), self.start()))
    }

    /// Segments followed by the closing edge if subpath is closed
    pub fn edges(&self) -> impl Iterator<Item = NormSegment> + '_ {
        self.segments
            .iter()
            .copied()
            .chain(self.closing_edge().map(NormSegment::from))
    }

    /// Number of parameter units, the closing edge counts as one unit
    pub fn range(&self) -> usize {
        self.segments.len() + self.closed as usize
    }

    pub fn bbox(&self, init: Option<BBox>) -> BBox {
        self.edges()
            .fold(init, |bbox, edge| Some(edge.bbox(bbox)))
            .expect("NormSubpath is never empty")
    }

    pub fn arclength(&self, epsilon: Scalar) -> Scalar {
        self.edges().map(|edge| edge.arclength(epsilon)).sum()
    }

    /// Subpath traversed in the opposite direction
    pub fn reverse(&self) -> Self {
        Self {
            segments: self.segments.iter().rev().map(Curve::reverse).collect(),
            closed: self.closed,
        }
    }

    pub fn transform(&self, tr: Transform) -> Self {
        Self {
            segments: self.segments.iter().map(|s| s.transform(tr)).collect(),
            closed: self.closed,
        }
    }

    /// Drop segments shorter than `epsilon`
    ///
    /// Length of a segment is measured from the end of the last kept segment, the next
    /// kept segment is attached to that end. If material at the end of the subpath was
    /// dropped the last kept segment is extended to the original end point.
    pub fn merge_short_segments(&self, epsilon: Scalar) -> Self {
        let start = self.start();
        let mut kept: Vec<NormSegment> = Vec::with_capacity(self.segments.len());
        let mut dropped_tail = false;
        for segment in self.segments.iter() {
            let anchor = kept.last().map_or(start, |last| last.end());
            let segment = segment.with_start(anchor);
            if segment.arclength(epsilon) < epsilon {
                dropped_tail = true;
            } else {
                kept.push(segment);
                dropped_tail = false;
            }
        }
        match kept.last_mut() {
            None => kept.push(Line::new(start, self.end()).into()),
            Some(last) if dropped_tail => *last = last.with_end(self.end()),
            Some(_) => {}
        }
        Self {
            segments: kept,
            closed: self.closed,
        }
    }

    fn draw_cmds(&self) -> impl Iterator<Item = DrawCmd> + '_ {
        std::iter::once(DrawCmd::MoveTo(self.start()))
            .chain(self.segments.iter().map(NormSegment::draw_cmd))
            .chain(self.closed.then_some(DrawCmd::ClosePath))
    }
}

/// Canonical form of a path: sequence of subpaths made only of lines and cubic curves
///
/// Positions along the path are addressed by a single parameter `t`, its integer
/// part selects an edge (segment or implicit closing line) and its fractional part
/// the position within that edge. Negative values are counted from the end of the path.
#[derive(Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormPath {
    subpaths: Vec<NormSubpath>,
}

impl fmt::Debug for NormPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subpaths.is_empty() {
            return writeln!(f, "Empty");
        }
        for subpath in self.subpaths.iter() {
            write!(f, "{:?}", subpath)?;
        }
        Ok(())
    }
}

impl NormPath {
    pub fn new(subpaths: Vec<NormSubpath>) -> Self {
        Self { subpaths }
    }

    pub fn subpaths(&self) -> &[NormSubpath] {
        &self.subpaths
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// Number of segments, implicit closing edges excluded
    pub fn segments_count(&self) -> usize {
        self.subpaths.iter().map(|sp| sp.segments.len()).sum()
    }

    /// All edges of the path in parameter order
    pub fn edges(&self) -> impl Iterator<Item = NormSegment> + '_ {
        self.subpaths.iter().flat_map(NormSubpath::edges)
    }

    /// Valid parameters are in `-range..=range`
    pub fn range(&self) -> usize {
        self.subpaths.iter().map(NormSubpath::range).sum()
    }

    /// Bounding box of the path, `None` for an empty path
    pub fn bbox(&self) -> Option<BBox> {
        self.subpaths
            .iter()
            .fold(None, |bbox, subpath| Some(subpath.bbox(bbox)))
    }

    pub fn arclength(&self, epsilon: Scalar) -> Scalar {
        self.subpaths.iter().map(|sp| sp.arclength(epsilon)).sum()
    }

    /// Find the edge addressed by `t` and the position inside of it
    ///
    /// Integer parameters address the end of the preceding edge.
    fn resolve(&self, t: Scalar) -> Option<(NormSegment, Scalar)> {
        let range = self.range() as Scalar;
        if range == 0.0 || !t.is_finite() || t.abs() > range {
            return None;
        }
        let t = if t < 0.0 { range + t } else { t };
        let index = (t.ceil() as usize).saturating_sub(1);
        let edge = self.edges().nth(index)?;
        Some((edge, t - index as Scalar))
    }

    /// Point at parameter `t`, `None` if `t` is out of range
    pub fn at(&self, t: Scalar) -> Option<Point> {
        let (edge, t) = self.resolve(t)?;
        Some(edge.at(t))
    }

    /// Tangent line at parameter `t`
    ///
    /// Line starts at the point of the path and follows its direction, its length is
    /// the derivative magnitude unless `length` is provided. Returns `None` if `t` is
    /// out of range or the derivative vanishes.
    pub fn tangent(&self, t: Scalar, length: Option<Scalar>) -> Option<Line> {
        let (edge, t) = self.resolve(t)?;
        let point = edge.at(t);
        let direction = edge.tangent(t);
        let direction = match length {
            None if direction.length() < EPSILON => return None,
            None => direction,
            Some(length) => direction.normalize()? * length,
        };
        Some(Line::new(point, point + direction))
    }

    /// First point of the path
    pub fn begin(&self) -> Option<Point> {
        self.at(0.0)
    }

    /// Last point of the path, start of the last subpath if it is closed
    pub fn end(&self) -> Option<Point> {
        self.at(self.range() as Scalar)
    }

    /// Split path at parameters `params`
    ///
    /// Returns `params.len() + 1` fragments ordered along the path. Parameters are
    /// resolved like in [`NormPath::at`], clamped into the valid range and sorted. A
    /// fragment without material is `None`. Closed subpaths which are cut become open
    /// with their closing edge turned into an explicit line. A fragment starting at a
    /// subpath boundary begins with a zero length line at the end of the preceding
    /// subpath, so that [`NormPath::glue`] keeps the gap between the subpaths.
    pub fn split(&self, params: &[Scalar]) -> Vec<Option<NormPath>> {
        let range = self.range() as Scalar;
        let mut params: Vec<Scalar> = params
            .iter()
            .map(|t| {
                let t = if t.is_nan() { 0.0 } else { *t };
                let t = if t < 0.0 { range + t } else { t };
                t.clamp(0.0, range)
            })
            .collect();
        params.sort_by(|a, b| a.total_cmp(b));
        let _span = tracing::debug_span!("split", params = params.len(), range).entered();

        let mut fragments = Vec::with_capacity(params.len() + 1);
        let mut builder = FragmentBuilder::default();
        let mut params = params.into_iter().peekable();
        let mut offset = 0.0;
        let mut previous: Option<&NormSubpath> = None;
        for subpath in self.subpaths.iter() {
            let mut cut = false;
            while params.next_if(|t| *t <= offset).is_some() {
                fragments.push(builder.finish());
                cut = true;
            }
            if let Some(previous) = previous.filter(|_| cut) {
                builder.junction = Some(if previous.closed {
                    previous.start()
                } else {
                    previous.end()
                });
            }
            previous = Some(subpath);
            let end = offset + subpath.range() as Scalar;
            if params.peek().is_none_or(|t| *t >= end) {
                builder.push_subpath(subpath.clone());
                offset = end;
                continue;
            }
            for (index, edge) in subpath.edges().enumerate() {
                let edge_start = offset + index as Scalar;
                while params.next_if(|t| *t <= edge_start).is_some() {
                    fragments.push(builder.finish());
                }
                // split remaining part of the edge sequentially so pieces share end points
                let mut rest = edge;
                let mut prev = 0.0;
                while let Some(t) = params.next_if(|t| *t < edge_start + 1.0) {
                    let local = t - edge_start;
                    if local > prev {
                        let (head, tail) = rest.split_at((local - prev) / (1.0 - prev));
                        builder.push_segment(head);
                        rest = tail;
                        prev = local;
                    }
                    fragments.push(builder.finish());
                }
                builder.push_segment(rest);
            }
            builder.finish_subpath();
            offset = end;
        }
        for _ in params {
            fragments.push(builder.finish());
        }
        fragments.push(builder.finish());
        fragments
    }

    /// Path with every subpath traversed in the opposite direction, subpath order is kept
    pub fn reversed(&self) -> Self {
        Self {
            subpaths: self.subpaths.iter().map(NormSubpath::reverse).collect(),
        }
    }

    /// Join `other` to the end of this path
    ///
    /// First subpath of `other` continues the last subpath of `self` from its end point.
    /// Fails if the last subpath of `self` is closed.
    pub fn glue(&self, other: &NormPath) -> Result<NormPath, Error> {
        let Some(last) = self.subpaths.last() else {
            return Ok(other.clone());
        };
        if last.closed {
            return Err(Error::Glue);
        }
        let Some((first, rest)) = other.subpaths.split_first() else {
            return Ok(self.clone());
        };
        let mut segments = last.segments.clone();
        let head = first.first().with_start(last.end());
        // zero length line left by a split at a subpath boundary
        if !matches!(head, NormSegment::Line(line) if line.start() == line.end()) {
            segments.push(head);
        }
        segments.extend(first.segments[1..].iter().copied());

        let mut subpaths = self.subpaths[..self.subpaths.len() - 1].to_vec();
        subpaths.push(NormSubpath {
            segments,
            closed: first.closed,
        });
        subpaths.extend(rest.iter().cloned());
        Ok(Self { subpaths })
    }

    /// Apply affine transformation to every control point
    pub fn transformed(&self, tr: Transform) -> Self {
        Self {
            subpaths: self.subpaths.iter().map(|sp| sp.transform(tr)).collect(),
        }
    }

    /// All pairs of parameters `(t_self, t_other)` where paths intersect
    pub fn intersect(&self, other: &NormPath, epsilon: Scalar) -> Vec<(Scalar, Scalar)> {
        intersect(self, other, epsilon)
    }

    /// Drop segments shorter than `epsilon`, see [`NormSubpath::merge_short_segments`]
    pub fn merge_short_segments(&self, epsilon: Scalar) -> Self {
        Self {
            subpaths: self
                .subpaths
                .iter()
                .map(|sp| sp.merge_short_segments(epsilon))
                .collect(),
        }
    }

    /// Drawing commands rendering this path, each subpath starts with `MoveTo`
    pub fn draw_cmds(&self) -> impl Iterator<Item = DrawCmd> + '_ {
        self.subpaths.iter().flat_map(NormSubpath::draw_cmds)
    }

    /// Write PostScript operators, one command per line
    pub fn write_ps(&self, mut out: impl Write) -> Result<(), Error> {
        for cmd in self.draw_cmds() {
            writeln!(out, "{}", cmd)?;
        }
        Ok(())
    }
}

impl fmt::Display for NormPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cmds = self.draw_cmds();
        if let Some(cmd) = cmds.next() {
            write!(f, "{}", cmd)?;
        }
        for cmd in cmds {
            write!(f, " {}", cmd)?;
        }
        Ok(())
    }
}

impl Add<&NormPath> for NormPath {
    type Output = NormPath;

    fn add(mut self, other: &NormPath) -> Self::Output {
        self.subpaths.extend(other.subpaths.iter().cloned());
        self
    }
}

impl Add for NormPath {
    type Output = NormPath;

    fn add(mut self, other: NormPath) -> Self::Output {
        self.subpaths.extend(other.subpaths);
        self
    }
}

impl Extend<NormSubpath> for NormPath {
    fn extend<T: IntoIterator<Item = NormSubpath>>(&mut self, iter: T) {
        self.subpaths.extend(iter)
    }
}

impl FromIterator<NormSubpath> for NormPath {
    fn from_iter<T: IntoIterator<Item = NormSubpath>>(iter: T) -> Self {
        Self {
            subpaths: iter.into_iter().collect(),
        }
    }
}

/// Accumulates the subpaths of a single split fragment
#[derive(Default)]
struct FragmentBuilder {
    subpaths: Vec<NormSubpath>,
    segments: Vec<NormSegment>,
    /// point the next material is preceded by, set when cut at a subpath boundary
    junction: Option<Point>,
}

impl FragmentBuilder {
    fn push_junction(&mut self) {
        if let Some(junction) = self.junction.take() {
            self.subpaths.push(NormSubpath {
                segments: vec![Line::new(junction, junction).into()],
                closed: false,
            });
        }
    }

    fn push_subpath(&mut self, subpath: NormSubpath) {
        self.finish_subpath();
        self.push_junction();
        self.subpaths.push(subpath);
    }

    fn push_segment(&mut self, segment: NormSegment) {
        if self.segments.is_empty() {
            self.push_junction();
        }
        self.segments.push(segment);
    }

    fn finish_subpath(&mut self) {
        if let Some(subpath) = NormSubpath::new(std::mem::take(&mut self.segments), false) {
            self.subpaths.push(subpath);
        }
    }

    fn finish(&mut self) -> Option<NormPath> {
        self.finish_subpath();
        if self.subpaths.is_empty() {
            None
        } else {
            Some(NormPath::new(std::mem::take(&mut self.subpaths)))
        }
    }
}
