// Re-export glam for convenience
pub use glam::*;

// COLLADA math helpers
mod color;
mod transform;
pub use color::{luminance, rgb_to_rgba, LUMINANCE_WEIGHTS};
pub use transform::Mat4Ext;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dvec3_creation() {
        let v = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_dmat4_multiplication_order() {
        let t = DMat4::from_translation(DVec3::new(1.0, 0.0, 0.0));
        let s = DMat4::from_scale(DVec3::splat(2.0));

        // T * S scales first, then translates
        let p = (t * s).transform_point3(DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(p, DVec3::new(3.0, 0.0, 0.0));

        let p = (s * t).transform_point3(DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(p, DVec3::new(4.0, 0.0, 0.0));
    }
}
