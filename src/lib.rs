//! Geometry kernel for PostScript style paths.
//!
//! Main features:
//!  - Raw paths built from PostScript operators, including relative moves and circular arcs
//!  - Normalization into lines and cubic bezier curves
//!  - Arc length, bounding boxes, evaluation and tangents by path parameter
//!  - Splitting, glueing, reversing and transforming normalized paths
//!  - Intersection of paths by recursive subdivision
//!
//! Normalized paths are addressed by a parameter `t`: integer part selects an
//! edge (closing edges of closed subpaths included) and fractional part is the
//! position on that edge.
mod arc;
mod context;
mod curve;
mod element;
mod error;
mod geometry;
mod intersect;
mod normalize;
mod normpath;
mod path;
mod ps;
mod utils;

pub use arc::{Arc, ArcCubicIter, DEFAULT_ARC_STEP, TangentArc};
pub use context::{Step, WalkContext};
pub use curve::{Cubic, Curve, Line, MAX_DEPTH, NormSegment};
pub use element::{DrawCmd, PathElement};
pub use error::Error;
pub use geometry::{BBox, DEFAULT_EPSILON, EPSILON, PI, Point, Scalar, Transform, scalar_fmt};
pub use intersect::{intersect, intersect_segments};
pub use normalize::{NormalizeOptions, normalize};
pub use normpath::{NormPath, NormSubpath};
pub use path::Path;
