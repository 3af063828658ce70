//! Utility functions used across the crate
use crate::Scalar;

/// Map `value` into `[base, base + period)` by adding multiples of `period`
pub(crate) fn wrap_above(value: Scalar, base: Scalar, period: Scalar) -> Scalar {
    base + (value - base).rem_euclid(period)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[macro_export]
    macro_rules! assert_approx_eq {
        ( $v0:expr, $v1: expr ) => {{
            assert!(($v0 - $v1).abs() < $crate::EPSILON, "{} != {}", $v0, $v1);
        }};
        ( $v0:expr, $v1: expr, $e: expr ) => {{
            assert!(($v0 - $v1).abs() < $e, "{} != {}", $v0, $v1);
        }};
    }

    #[test]
    fn test_wrap_above() {
        assert_approx_eq!(wrap_above(-90.0, 0.0, 360.0), 270.0);
        assert_approx_eq!(wrap_above(725.0, 10.0, 360.0), 365.0);
        assert_approx_eq!(wrap_above(10.0, 10.0, 360.0), 10.0);
    }
}
