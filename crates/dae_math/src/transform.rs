// Transform utilities for DMat4
//
// Extends glam::DMat4 with the constructors COLLADA transform elements need.
// glam is column-major and multiplies column vectors, which matches COLLADA's
// convention once the row-major <matrix> text is transposed.

use glam::{DMat4, DVec3};

/// Extension trait for DMat4 to build matrices from COLLADA element data
pub trait Mat4Ext {
    /// Build a matrix from 16 values in row-major order (the `<matrix>` layout).
    fn from_row_major(values: &[f64; 16]) -> Self;

    /// Rotation of `degrees` around `axis`. The axis does not need to be normalized.
    /// A zero-length axis yields the identity.
    fn from_axis_angle_degrees(axis: DVec3, degrees: f64) -> Self;
}

impl Mat4Ext for DMat4 {
    fn from_row_major(values: &[f64; 16]) -> Self {
        DMat4::from_cols_array(values).transpose()
    }

    fn from_axis_angle_degrees(axis: DVec3, degrees: f64) -> Self {
        let axis = axis.normalize_or_zero();
        if axis == DVec3::ZERO {
            return DMat4::IDENTITY;
        }
        DMat4::from_axis_angle(axis, degrees.to_radians())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_translation_column() {
        #[rustfmt::skip]
        let values = [
            1.0, 0.0, 0.0, 10.0,
            0.0, 1.0, 0.0, 20.0,
            0.0, 0.0, 1.0, 30.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        let mat = DMat4::from_row_major(&values);
        let p = mat.transform_point3(DVec3::new(1.0, 2.0, 3.0));

        assert_eq!(p, DVec3::new(11.0, 22.0, 33.0));
    }

    #[test]
    fn test_axis_angle_degrees_z() {
        let mat = DMat4::from_axis_angle_degrees(DVec3::Z, 90.0);
        let v = mat.transform_vector3(DVec3::X);

        assert!((v - DVec3::Y).length() < 1e-9);
    }

    #[test]
    fn test_axis_angle_unnormalized_axis() {
        let a = DMat4::from_axis_angle_degrees(DVec3::new(0.0, 0.0, 5.0), 45.0);
        let b = DMat4::from_axis_angle_degrees(DVec3::Z, 45.0);

        assert!(a.abs_diff_eq(b, 1e-12));
    }

    #[test]
    fn test_axis_angle_zero_axis_is_identity() {
        let mat = DMat4::from_axis_angle_degrees(DVec3::ZERO, 30.0);
        assert_eq!(mat, DMat4::IDENTITY);
    }
}
