//! Intersection of normalized paths by recursive subdivision
use crate::{Curve, MAX_DEPTH, NormPath, NormSegment, Scalar};

/// Slack of local parameters at piece ends, crossings found twice are merged afterwards
const PARAM_SLACK: Scalar = 1e-9;

/// Segment together with the range of path parameters it covers
///
/// A piece covers `t0..t1`, its end belongs to the piece only if nothing follows it,
/// that is for the last edge of an open subpath. Otherwise the end point is covered
/// by the start of the next piece or edge.
#[derive(Debug, Clone, Copy)]
struct Piece {
    segment: NormSegment,
    t0: Scalar,
    t1: Scalar,
    owns_end: bool,
}

impl Piece {
    /// Whole segment with parameters `0.0..=1.0`
    fn whole(segment: NormSegment) -> Self {
        Self {
            segment,
            t0: 0.0,
            t1: 1.0,
            owns_end: true,
        }
    }

    fn split(&self) -> (Piece, Piece) {
        let (s0, s1) = self.segment.split();
        let tm = 0.5 * (self.t0 + self.t1);
        (
            Piece {
                segment: s0,
                t0: self.t0,
                t1: tm,
                owns_end: false,
            },
            Piece {
                segment: s1,
                t0: tm,
                t1: self.t1,
                owns_end: self.owns_end,
            },
        )
    }

    /// Whether local parameter `t` of the chord lies on this piece
    fn covers(&self, t: Scalar) -> bool {
        t >= -PARAM_SLACK && (t < 1.0 || (self.owns_end && t <= 1.0 + PARAM_SLACK))
    }

    /// Map local parameter of the segment to the path parameter
    fn param(&self, t: Scalar) -> Scalar {
        self.t0 + t.clamp(0.0, 1.0) * (self.t1 - self.t0)
    }
}

/// One piece per edge of the path, in path parameter order
fn edge_pieces(path: &NormPath) -> Vec<Piece> {
    let mut pieces = Vec::with_capacity(path.range());
    for subpath in path.subpaths() {
        let last = subpath.range() - 1;
        for (index, segment) in subpath.edges().enumerate() {
            let t0 = pieces.len() as Scalar;
            pieces.push(Piece {
                segment,
                t0,
                t1: t0 + 1.0,
                owns_end: index == last && !subpath.is_closed(),
            });
        }
    }
    pieces
}

/// Find all pairs of path parameters `(ta, tb)` where paths `a` and `b` cross
///
/// Edges of `a` are iterated in the outer loop and edges of `b` in the inner one,
/// each pair is subdivided depth first so the order of results is stable. Chords
/// that are parallel or collinear are reported as not intersecting. A crossing at
/// a vertex shared by two edges is reported once, and so is a crossing found again
/// within `epsilon` of both parameters of an earlier one. Intersecting a path with
/// itself reports every self crossing once in each order.
pub fn intersect(a: &NormPath, b: &NormPath, epsilon: Scalar) -> Vec<(Scalar, Scalar)> {
    let _span = tracing::debug_span!("intersect", a = a.range(), b = b.range()).entered();
    let mut result = Vec::new();
    let mut depth_exceeded = false;
    let pieces_b = edge_pieces(b);
    for pa in edge_pieces(a) {
        for pb in pieces_b.iter() {
            depth_exceeded |= intersect_pieces(pa, *pb, epsilon, &mut result);
        }
    }
    if depth_exceeded {
        tracing::warn!(depth = MAX_DEPTH, "intersection subdivision depth limit reached");
    }
    tracing::debug!(count = result.len(), "intersections found");
    result
}

/// Intersections of two segments
pub fn intersect_segments(
    a: NormSegment,
    b: NormSegment,
    epsilon: Scalar,
) -> Vec<(Scalar, Scalar)> {
    let mut result = Vec::new();
    if intersect_pieces(Piece::whole(a), Piece::whole(b), epsilon, &mut result) {
        tracing::warn!(depth = MAX_DEPTH, "intersection subdivision depth limit reached");
    }
    result
}

/// Append intersections of two pieces to `result`, returns true if subdivision
/// was cut short by [`MAX_DEPTH`]
fn intersect_pieces(
    a: Piece,
    b: Piece,
    epsilon: Scalar,
    result: &mut Vec<(Scalar, Scalar)>,
) -> bool {
    // stack is popped from the end, pairs are pushed in reverse of the visiting order
    let mut queue = vec![(a, b, 0usize)];
    let mut depth_exceeded = false;
    while let Some((a, b, depth)) = queue.pop() {
        if !a.segment.bbox(None).intersects(b.segment.bbox(None)) {
            continue;
        }
        let mut a_straight = a.segment.is_straight(epsilon);
        let mut b_straight = b.segment.is_straight(epsilon);
        if depth >= MAX_DEPTH {
            depth_exceeded = true;
            a_straight = true;
            b_straight = true;
        }
        match (a_straight, b_straight) {
            (false, false) => {
                let (aa, ab) = a.split();
                let (ba, bb) = b.split();
                queue.push((ab, bb, depth + 1));
                queue.push((aa, bb, depth + 1));
                queue.push((ab, ba, depth + 1));
                queue.push((aa, ba, depth + 1));
            }
            (true, false) => {
                let (ba, bb) = b.split();
                queue.push((a, bb, depth + 1));
                queue.push((a, ba, depth + 1));
            }
            (false, true) => {
                let (aa, ab) = a.split();
                queue.push((ab, b, depth + 1));
                queue.push((aa, b, depth + 1));
            }
            (true, true) => {
                let Some((ta, tb)) = a.segment.chord().intersect(b.segment.chord()) else {
                    continue;
                };
                if !a.covers(ta) || !b.covers(tb) {
                    continue;
                }
                let (ta, tb) = (a.param(ta), b.param(tb));
                let found = result
                    .iter()
                    .any(|(sa, sb)| (sa - ta).abs() <= epsilon && (sb - tb).abs() <= epsilon);
                if !found {
                    result.push((ta, tb));
                }
            }
        }
    }
    depth_exceeded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cubic, DEFAULT_EPSILON, Line, NormSubpath, Point, assert_approx_eq};

    fn path(segments: Vec<NormSegment>, closed: bool) -> NormPath {
        NormPath::new(vec![NormSubpath::new(segments, closed).unwrap()])
    }

    #[test]
    fn test_crossing_lines() {
        let a = path(vec![Line::new((0.0, 0.0), (2.0, 2.0)).into()], false);
        let b = path(vec![Line::new((0.0, 2.0), (2.0, 0.0)).into()], false);
        let result = a.intersect(&b, DEFAULT_EPSILON);
        assert_eq!(result.len(), 1);
        let (ta, tb) = result[0];
        assert!(a.at(ta).unwrap().dist(Point::new(1.0, 1.0)) < 1e-9);
        assert!(b.at(tb).unwrap().dist(Point::new(1.0, 1.0)) < 1e-9);
    }

    #[test]
    fn test_parallel_and_disjoint() {
        let a = path(vec![Line::new((0.0, 0.0), (2.0, 0.0)).into()], false);
        let b = path(vec![Line::new((0.0, 1.0), (2.0, 1.0)).into()], false);
        assert!(a.intersect(&b, DEFAULT_EPSILON).is_empty());
        // collinear overlap is not reported
        let c = path(vec![Line::new((1.0, 0.0), (3.0, 0.0)).into()], false);
        assert!(a.intersect(&c, DEFAULT_EPSILON).is_empty());
        let d = path(vec![Line::new((5.0, 5.0), (6.0, 7.0)).into()], false);
        assert!(a.intersect(&d, DEFAULT_EPSILON).is_empty());
    }

    #[test]
    fn test_curve_line() {
        // curve crosses the line y = 0.5 twice
        let curve: NormSegment = Cubic::new((0.0, 0.0), (1.0, 2.0), (2.0, 2.0), (3.0, 0.0)).into();
        let line: NormSegment = Line::new((-1.0, 0.5), (4.0, 0.5)).into();
        let result = intersect_segments(curve, line, DEFAULT_EPSILON);
        assert_eq!(result.len(), 2);
        for (tc, tl) in result.iter() {
            let pc = curve.at(*tc);
            let pl = line.at(*tl);
            assert_approx_eq!(pc.y(), 0.5, 1e-3);
            assert!(pc.dist(pl) < 1e-3);
        }
        assert!(result[0].0 < result[1].0);

        // symmetry
        let swapped = intersect_segments(line, curve, DEFAULT_EPSILON);
        assert_eq!(swapped.len(), 2);
        for ((ta, tb), (sb, sa)) in result.iter().zip(swapped.iter()) {
            assert!(curve.at(*ta).dist(curve.at(*sa)) < 1e-4);
            assert!(line.at(*tb).dist(line.at(*sb)) < 1e-4);
        }
    }

    #[test]
    fn test_curve_curve() {
        let a: NormSegment = Cubic::new((0.0, 0.0), (1.0, 3.0), (2.0, -3.0), (3.0, 0.0)).into();
        let b: NormSegment = Cubic::new((0.0, 1.0), (1.0, -1.0), (2.0, 2.0), (3.0, -1.0)).into();
        let result = intersect_segments(a, b, DEFAULT_EPSILON);
        assert!(!result.is_empty());
        for (ta, tb) in result.iter() {
            assert!(a.at(*ta).dist(b.at(*tb)) < 5e-3);
        }
        let swapped = intersect_segments(b, a, DEFAULT_EPSILON);
        assert_eq!(result.len(), swapped.len());
    }

    #[test]
    fn test_crossing_at_split_point() {
        // x(t) = 3t, the line crosses at the first subdivision point t = 0.5
        let curve: NormSegment =
            Cubic::new((0.0, 0.0), (1.0, 2.0), (2.0, -2.0), (3.0, 0.0)).into();
        let line: NormSegment = Line::new((1.5, -2.0), (1.5, 2.0)).into();
        let result = intersect_segments(curve, line, DEFAULT_EPSILON);
        assert_eq!(result.len(), 1);
        assert_approx_eq!(result[0].0, 0.5, 1e-9);
        assert_approx_eq!(result[0].1, 0.5, 1e-9);
        assert_eq!(intersect_segments(line, curve, DEFAULT_EPSILON).len(), 1);
    }

    #[test]
    fn test_crossing_at_vertex() {
        let a = path(
            vec![
                Line::new((0.0, 0.0), (1.0, 1.0)).into(),
                Line::new((1.0, 1.0), (2.0, 2.0)).into(),
            ],
            false,
        );
        let b = path(vec![Line::new((0.0, 2.0), (2.0, 0.0)).into()], false);
        assert_eq!(a.intersect(&b, DEFAULT_EPSILON), vec![(1.0, 0.5)]);
        assert_eq!(b.intersect(&a, DEFAULT_EPSILON), vec![(0.5, 1.0)]);

        // start of a closed subpath is shared with the end of its closing edge
        let square = path(
            vec![
                Line::new((0.0, 0.0), (2.0, 0.0)).into(),
                Line::new((2.0, 0.0), (2.0, 2.0)).into(),
                Line::new((2.0, 2.0), (0.0, 2.0)).into(),
            ],
            true,
        );
        let corner = path(vec![Line::new((-1.0, 1.0), (1.0, -1.0)).into()], false);
        assert_eq!(square.intersect(&corner, DEFAULT_EPSILON), vec![(0.0, 0.5)]);

        // end of an open path is covered
        let end = path(vec![Line::new((3.0, 0.0), (1.0, 1.0)).into()], false);
        let result = end.intersect(&a, DEFAULT_EPSILON);
        assert_eq!(result.len(), 1);
        assert_approx_eq!(result[0].0, 1.0, 1e-12);
        assert_approx_eq!(result[0].1, 1.0, 1e-12);
    }

    #[test]
    fn test_self_intersection() {
        // bow tie, adjacent edges only touch at shared vertices
        let bow = path(
            vec![
                Line::new((0.0, 0.0), (2.0, 2.0)).into(),
                Line::new((2.0, 2.0), (2.0, 0.0)).into(),
                Line::new((2.0, 0.0), (0.0, 2.0)).into(),
            ],
            true,
        );
        let result = bow.intersect(&bow, DEFAULT_EPSILON);
        assert_eq!(result.len(), 2);
        assert_approx_eq!(result[0].0, 0.5, 1e-12);
        assert_approx_eq!(result[0].1, 2.5, 1e-12);
        assert_approx_eq!(result[1].0, 2.5, 1e-12);
        assert_approx_eq!(result[1].1, 0.5, 1e-12);

        // loop crosses itself at (0.5, 0.3) for t = 0.5 -+ sqrt(0.15)
        let looped = path(
            vec![Cubic::new((0.0, 0.0), (2.0, 1.0), (-1.0, 1.0), (1.0, 0.0)).into()],
            false,
        );
        let t0 = 0.5 - (0.15 as Scalar).sqrt();
        let t1 = 0.5 + (0.15 as Scalar).sqrt();
        let result = looped.intersect(&looped, DEFAULT_EPSILON);
        assert_eq!(result.len(), 2, "{:?}", result);
        for (ta, tb) in result.iter() {
            let (lo, hi) = if ta < tb { (*ta, *tb) } else { (*tb, *ta) };
            assert_approx_eq!(lo, t0, 1e-3);
            assert_approx_eq!(hi, t1, 1e-3);
            let pa = looped.at(*ta).unwrap();
            assert!(pa.dist(Point::new(0.5, 0.3)) < 1e-3);
            assert!(pa.dist(looped.at(*tb).unwrap()) < 1e-3);
        }
        assert!((result[0].0 < result[0].1) != (result[1].0 < result[1].1));
    }

    #[test]
    fn test_depth_limit() {
        // zero tolerance never considers a curve straight
        let curve: NormSegment = Cubic::new((0.0, 0.0), (1.0, 2.0), (2.0, 2.0), (3.0, 0.0)).into();
        let line: NormSegment = Line::new((-1.0, 0.5), (4.0, 0.5)).into();
        let mut result = Vec::new();
        let exceeded = intersect_pieces(Piece::whole(curve), Piece::whole(line), 0.0, &mut result);
        assert!(exceeded);
        assert_eq!(result.len(), 2);
        for (tc, _) in result.iter() {
            assert_approx_eq!(curve.at(*tc).y(), 0.5, 1e-9);
        }

        let mut result = Vec::new();
        let exceeded = intersect_pieces(
            Piece::whole(curve),
            Piece::whole(line),
            DEFAULT_EPSILON,
            &mut result,
        );
        assert!(!exceeded);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_degenerate_segments() {
        let line: NormSegment = Line::new((1.5, -1.0), (1.5, 1.0)).into();

        // NaN deviation counts as straight, only the chord is intersected
        let nan: NormSegment =
            Cubic::new((0.0, 0.0), (Scalar::NAN, Scalar::NAN), (2.0, 2.0), (3.0, 0.0)).into();
        let result = intersect_segments(nan, line, DEFAULT_EPSILON);
        assert!(result.len() <= 1);
        for (ta, tb) in result.iter() {
            assert!((0.0..=1.0).contains(ta) && (0.0..=1.0).contains(tb));
        }

        let inf: NormSegment =
            Cubic::new((0.0, 0.0), (Scalar::INFINITY, 1.0), (2.0, 2.0), (3.0, 0.0)).into();
        let result = intersect_segments(inf, line, DEFAULT_EPSILON);
        assert!(result.iter().all(|(ta, tb)| ta.is_finite() && tb.is_finite()));

        // all control points coincide, chord is empty
        let point: NormSegment =
            Cubic::new((1.5, 0.0), (1.5, 0.0), (1.5, 0.0), (1.5, 0.0)).into();
        assert!(intersect_segments(point, line, DEFAULT_EPSILON).is_empty());
    }

    #[test]
    fn test_path_params() {
        // second edge of `a` crosses the closing edge of `b`
        let a = path(
            vec![
                Line::new((-2.0, -1.0), (-1.0, -1.0)).into(),
                Line::new((-1.0, -1.0), (1.0, 1.0)).into(),
            ],
            false,
        );
        let b = path(
            vec![
                Line::new((2.0, 0.0), (2.0, 3.0)).into(),
                Line::new((2.0, 3.0), (-3.0, 3.0)).into(),
                Line::new((-3.0, 3.0), (-3.0, 0.0)).into(),
            ],
            true,
        );
        let result = a.intersect(&b, DEFAULT_EPSILON);
        assert_eq!(result.len(), 1);
        let (ta, tb) = result[0];
        assert_approx_eq!(ta, 1.5, 1e-9);
        assert_approx_eq!(tb, 3.6, 1e-9);
        let result = b.intersect(&a, DEFAULT_EPSILON);
        assert_eq!(result.len(), 1);
        assert_approx_eq!(result[0].0, 3.6, 1e-9);
        assert_approx_eq!(result[0].1, 1.5, 1e-9);
    }
}
