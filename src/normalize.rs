//! Conversion of raw paths into normalized paths
use crate::{
    DEFAULT_ARC_STEP, Error, NormPath, NormSegment, NormSubpath, Path, Scalar, Step,
    WalkContext,
};

/// Parameters of the normalization
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizeOptions {
    /// Maximum angle in degrees covered by a single cubic approximating an arc
    pub arc_step: Scalar,
    /// If set, segments shorter than this value are merged with their neighbours
    pub merge_epsilon: Option<Scalar>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            arc_step: DEFAULT_ARC_STEP,
            merge_epsilon: None,
        }
    }
}

/// Convert raw path into its normalized form
///
/// Fails with [`Error::MalformedPath`] if the path does not start with a move or an arc.
pub fn normalize(path: &Path, options: &NormalizeOptions) -> Result<NormPath, Error> {
    let _span = tracing::debug_span!("normalize", elements = path.elements().len()).entered();
    if let Some(first) = path.elements().first() {
        if !first.starts_path() {
            return Err(Error::MalformedPath {
                reason: format!("path starts with `{}`", first.operator()),
            });
        }
    }

    let mut subpaths: Vec<NormSubpath> = Vec::new();
    let mut segments: Vec<NormSegment> = Vec::new();
    let mut finish = |segments: &mut Vec<NormSegment>, closed: bool| {
        if let Some(subpath) = NormSubpath::new(std::mem::take(segments), closed) {
            subpaths.push(subpath);
        }
    };

    let mut ctx = WalkContext::new();
    for element in path.elements() {
        let (step, next) = ctx.step(element);
        match step {
            Step::Move(_) => finish(&mut segments, false),
            Step::Line(line) => segments.push(line.into()),
            Step::Curve(cubic) => segments.push(cubic.into()),
            Step::Arc { line, arc } => {
                segments.extend(line.map(NormSegment::from));
                segments.extend(arc.to_cubics(options.arc_step).map(NormSegment::from));
            }
            Step::Close { .. } => finish(&mut segments, true),
        }
        ctx = next;
    }
    finish(&mut segments, false);

    let norm = NormPath::new(subpaths);
    let norm = match options.merge_epsilon {
        Some(epsilon) => norm.merge_short_segments(epsilon),
        None => norm,
    };
    tracing::debug!(
        subpaths = norm.subpaths().len(),
        segments = norm.segments_count(),
        "path normalized"
    );
    Ok(norm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cubic, Curve, DEFAULT_EPSILON, Line, PI, PathElement, Point, assert_approx_eq};

    #[test]
    fn test_malformed() {
        let mut path = Path::new();
        path.line_to((1.0, 1.0));
        assert!(matches!(
            normalize(&path, &NormalizeOptions::default()),
            Err(Error::MalformedPath { .. })
        ));
        let path = Path::from_elements(vec![PathElement::Close]);
        assert!(path.normalize().is_err());
        let path = Path::from_elements(vec![PathElement::RMoveTo(Point::new(1.0, 1.0))]);
        assert!(path.normalize().is_err());
        // empty path is fine
        assert!(Path::new().normalize().unwrap().is_empty());
    }

    #[test]
    fn test_lines_and_curves() -> Result<(), Error> {
        let mut path = Path::new();
        path.move_to((0.0, 0.0))
            .line_to((1.0, 0.0))
            .rcurve_to((1.0, 1.0), (2.0, 1.0), (3.0, 0.0))
            .rline_to((0.0, -1.0))
            .close();
        let norm = path.normalize()?;
        assert_eq!(norm.subpaths().len(), 1);
        let subpath = &norm.subpaths()[0];
        assert!(subpath.is_closed());
        assert_eq!(
            subpath.segments(),
            &[
                Line::new((0.0, 0.0), (1.0, 0.0)).into(),
                Cubic::new((1.0, 0.0), (2.0, 1.0), (3.0, 1.0), (4.0, 0.0)).into(),
                Line::new((4.0, 0.0), (4.0, -1.0)).into(),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_subpaths() -> Result<(), Error> {
        let mut path = Path::new();
        path.move_to((0.0, 0.0))
            .line_to((1.0, 0.0))
            .move_to((2.0, 0.0))
            .move_to((5.0, 0.0))
            .rline_to((1.0, 0.0))
            .close()
            // after close there is no current point, line starts a new subpath
            .line_to((7.0, 0.0))
            .line_to((8.0, 0.0));
        let norm = path.normalize()?;
        assert_eq!(norm.subpaths().len(), 3);
        assert_eq!(norm.subpaths()[1].start(), Point::new(5.0, 0.0));
        assert!(norm.subpaths()[1].is_closed());
        assert_eq!(norm.subpaths()[2].start(), Point::new(7.0, 0.0));
        assert_eq!(norm.range(), 4);
        Ok(())
    }

    #[test]
    fn test_quarter_arc() -> Result<(), Error> {
        let mut path = Path::new();
        path.arc((0.0, 0.0), 1.0, 0.0, 90.0);
        let norm = path.normalize()?;
        assert_eq!(norm.subpaths().len(), 1);
        assert!(norm.edges().all(|edge| edge.to_cubic().is_some()));
        assert_approx_eq!(norm.arclength(DEFAULT_EPSILON), PI / 2.0, 1e-3);
        Ok(())
    }

    #[test]
    fn test_arc_connecting_line() -> Result<(), Error> {
        let mut path = Path::new();
        path.move_to((0.0, 0.0)).arcn((2.0, 0.0), 1.0, 180.0, 0.0);
        let norm = path.normalize()?;
        let segments = norm.subpaths()[0].segments();
        assert_eq!(segments[0].to_line(), Some(Line::new((0.0, 0.0), segments[1].start())));
        assert!(segments[1].start().dist(Point::new(1.0, 0.0)) < 1e-9);
        // clockwise from 180 to 0 passes over the top
        let top = norm.at(norm.range() as Scalar / 2.0 + 0.5).unwrap();
        assert!(top.y() > 0.0);
        assert!(norm.end().unwrap().dist(Point::new(3.0, 0.0)) < 1e-9);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
        Ok(())
    }

    #[test]
    fn test_arc_step() -> Result<(), Error> {
        let mut path = Path::new();
        path.arc((0.0, 0.0), 1.0, 0.0, 360.0);
        let options = NormalizeOptions {
            arc_step: 90.0,
            merge_epsilon: None,
        };
        let norm = path.normalize_with(&options)?;
        assert_eq!(norm.segments_count(), 5);
        let norm = path.normalize()?;
        assert_eq!(norm.segments_count(), 9);
        Ok(())
    }

    #[test]
    fn test_merge() -> Result<(), Error> {
        let mut path = Path::new();
        path.move_to((0.0, 0.0))
            .rline_to((1.0, 0.0))
            .rline_to((1e-7, 0.0))
            .rline_to((0.0, 1.0));
        let options = NormalizeOptions {
            merge_epsilon: Some(1e-5),
            ..NormalizeOptions::default()
        };
        let norm = path.normalize_with(&options)?;
        assert_eq!(norm.segments_count(), 2);
        assert!(norm.end().unwrap().dist(Point::new(1.0000001, 1.0)) < 1e-12);
        assert_eq!(path.normalize()?.segments_count(), 3);
        Ok(())
    }
}
