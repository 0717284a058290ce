//! Color helpers shared by material and light resolution.

use glam::{DVec3, DVec4};

/// Rec.709 luminance weights used by COLLADA's RGB_ZERO opacity mode.
pub const LUMINANCE_WEIGHTS: DVec3 = DVec3::new(0.212671, 0.715160, 0.072169);

/// Relative luminance of a linear RGB color.
pub fn luminance(rgb: DVec3) -> f64 {
    rgb.dot(LUMINANCE_WEIGHTS)
}

/// Extend an RGB color to RGBA with alpha = 1.
pub fn rgb_to_rgba(rgb: DVec3) -> DVec4 {
    rgb.extend(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luminance_of_white_is_one() {
        assert!((luminance(DVec3::ONE) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_luminance_of_primaries() {
        assert!((luminance(DVec3::X) - 0.212671).abs() < 1e-12);
        assert!((luminance(DVec3::Y) - 0.715160).abs() < 1e-12);
        assert!((luminance(DVec3::Z) - 0.072169).abs() < 1e-12);
    }

    #[test]
    fn test_rgb_to_rgba() {
        assert_eq!(
            rgb_to_rgba(DVec3::new(0.1, 0.2, 0.3)),
            DVec4::new(0.1, 0.2, 0.3, 1.0)
        );
    }
}
