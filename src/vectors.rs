use glam::{DMat2, DVec2};

/// Two dimensional vector used throughout the simulation.
pub type Vector2 = DVec2;

/// Decimal digits used for geometric equality checks.
pub const EQUALITY_PRECISION: i32 = 7;

/// Operations on [`Vector2`] that `glam` does not provide under the names
/// the simulation uses.
pub trait VectorExt {
    /// Scalar z component of the 2D cross product.
    fn cross(self, other: Self) -> f64;

    /// Unit vector in the same direction.
    /// Returns the zero vector when the magnitude is exactly zero.
    fn unit(self) -> Self;

    /// Left hand normal, the vector rotated by +90°.
    fn normal(self) -> Self;

    /// Compares both components after rounding to [`EQUALITY_PRECISION`] digits.
    fn is_equal(self, other: Self) -> bool;
}

impl VectorExt for DVec2 {
    #[inline]
    fn cross(self, other: Self) -> f64 {
        self.perp_dot(other)
    }

    #[inline]
    fn unit(self) -> Self {
        let magnitude = self.length();
        if magnitude == 0.0 {
            return DVec2::ZERO;
        }
        self / magnitude
    }

    #[inline]
    fn normal(self) -> Self {
        self.perp()
    }

    fn is_equal(self, other: Self) -> bool {
        round_to(self.x, EQUALITY_PRECISION) == round_to(other.x, EQUALITY_PRECISION)
            && round_to(self.y, EQUALITY_PRECISION) == round_to(other.y, EQUALITY_PRECISION)
    }
}

/// Rounds `value` to `precision` decimal digits.
pub fn round_to(value: f64, precision: i32) -> f64 {
    let factor = 10f64.powi(precision);
    (value * factor).round() / factor
}

/// Sign of `value`, `0.0` for both zeros.
///
/// `f64::signum` maps `0.0` to `1.0`, which would turn a degenerate axis into
/// a real collision normal.
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Counter clockwise rotation matrix `[[cos, -sin], [sin, cos]]`.
pub fn rotation_matrix(angle: f64) -> DMat2 {
    let (sin, cos) = angle.sin_cos();
    DMat2::from_cols(DVec2::new(cos, sin), DVec2::new(-sin, cos))
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_unit_has_length_one() {
        for v in [
            DVec2::new(3.0, 4.0),
            DVec2::new(-0.001, 0.0),
            DVec2::new(1e6, -2e6),
        ] {
            assert_relative_eq!(v.unit().length(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_unit_of_zero_is_zero() {
        assert_eq!(DVec2::ZERO.unit(), DVec2::ZERO);
    }

    #[test]
    fn test_cross_and_normal() {
        let a = DVec2::new(2.0, 0.0);
        let b = DVec2::new(0.0, 3.0);
        assert_eq!(a.cross(b), 6.0);
        assert_eq!(b.cross(a), -6.0);
        assert_eq!(DVec2::new(1.0, 2.0).normal(), DVec2::new(-2.0, 1.0));
    }

    #[test]
    fn test_is_equal_absorbs_noise() {
        let a = DVec2::new(0.1 + 0.2, 1.0);
        let b = DVec2::new(0.3, 1.0 + 1e-10);
        assert!(a.is_equal(b));
        assert!(!a.is_equal(DVec2::new(0.3001, 1.0)));
    }

    #[test]
    fn test_rotation_matrix_quarter_turn() {
        let rotated = rotation_matrix(FRAC_PI_2) * DVec2::X;
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(rotated.y, 1.0, epsilon = 1e-12);
        assert_eq!(rotation_matrix(0.0) * DVec2::new(5.0, -2.0), DVec2::new(5.0, -2.0));
    }

    #[test]
    fn test_sign_of_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        assert_eq!(sign(-3.0), -1.0);
        assert_eq!(sign(2.0), 1.0);
    }
}
