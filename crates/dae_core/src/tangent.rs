//! Per-triangle tangent space generation.
//!
//! Used when a batch does not carry both TEXTANGENT and TEXBINORMAL inputs.
//! Each spatial axis is solved independently against the texture-space
//! edge deltas (Maya's tangent and binormal derivation), then the result is
//! orthonormalized against each corner's normal.

use dae_math::DVec3;

use crate::geometry::VertexAttributes;

/// Fill `tex_tangent` and `tex_binormal` for every triangle in `corners`.
///
/// `corners` is a flat list of triangle corners; a trailing partial
/// triangle is left untouched.
pub fn generate_tangents(corners: &mut [VertexAttributes]) {
    for triangle in corners.chunks_exact_mut(3) {
        let v = [triangle[0].vertex, triangle[1].vertex, triangle[2].vertex];
        let n = [triangle[0].normal, triangle[1].normal, triangle[2].normal];
        let t = [
            triangle[0].tex_coord,
            triangle[1].tex_coord,
            triangle[2].tex_coord,
        ];

        let tangents = triangle_tangents(v, n, t);
        for (corner, tangent) in triangle.iter_mut().zip(tangents) {
            corner.tex_tangent = tangent;
            corner.tex_binormal = tangent.cross(corner.normal).normalize_or_zero();
        }
    }
}

/// Tangents for the three corners of one triangle.
///
/// `v` are positions, `n` normals and `t` texture coordinates (only x/y used).
pub fn triangle_tangents(v: [DVec3; 3], n: [DVec3; 3], t: [DVec3; 3]) -> [DVec3; 3] {
    let ds1 = t[1].x - t[0].x;
    let dt1 = t[1].y - t[0].y;
    let ds2 = t[2].x - t[0].x;
    let dt2 = t[2].y - t[0].y;

    let edge1 = v[1] - v[0];
    let edge2 = v[2] - v[0];

    let raw = DVec3::new(
        axis_tangent(edge1.x, edge2.x, ds1, dt1, ds2, dt2),
        axis_tangent(edge1.y, edge2.y, ds1, dt1, ds2, dt2),
        axis_tangent(edge1.z, edge2.z, ds1, dt1, ds2, dt2),
    );

    n.map(|normal| orthonormalize(raw, normal))
}

/// Solve one axis of the tangent from the (position, s, t) edge vectors.
fn axis_tangent(dp1: f64, dp2: f64, ds1: f64, dt1: f64, ds2: f64, dt2: f64) -> f64 {
    let mut cross = DVec3::new(dp1, ds1, dt1)
        .cross(DVec3::new(dp2, ds2, dt2))
        .normalize_or_zero();

    // Degenerate UV tangent plane
    if cross.x.abs() < f64::EPSILON {
        cross.x = 1.0;
    }

    -cross.y / cross.x
}

/// Gram-Schmidt `tangent` against `normal` and normalize.
fn orthonormalize(tangent: DVec3, normal: DVec3) -> DVec3 {
    let normal = normal.normalize_or_zero();
    let projected = (tangent - normal * tangent.dot(normal)).normalize_or_zero();

    if projected == DVec3::ZERO && normal != DVec3::ZERO {
        // Tangent collapsed onto the normal; any perpendicular direction is valid
        return normal.any_orthonormal_vector();
    }
    projected
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-5;

    fn corner(vertex: DVec3, normal: DVec3, uv: (f64, f64)) -> VertexAttributes {
        VertexAttributes {
            vertex,
            normal,
            tex_coord: DVec3::new(uv.0, uv.1, 0.0),
            ..Default::default()
        }
    }

    fn assert_tangent_frame(c: &VertexAttributes) {
        let n = c.normal.normalize();
        assert!(c.tex_tangent.dot(n).abs() < EPS, "tangent not orthogonal: {:?}", c);
        assert!((c.tex_tangent.length() - 1.0).abs() < EPS, "tangent not unit: {:?}", c);
        assert!((c.tex_binormal.length() - 1.0).abs() < EPS, "binormal not unit: {:?}", c);
    }

    #[test]
    fn test_axis_aligned_triangle() {
        let mut corners = vec![
            corner(DVec3::ZERO, DVec3::Z, (0.0, 0.0)),
            corner(DVec3::X, DVec3::Z, (1.0, 0.0)),
            corner(DVec3::Y, DVec3::Z, (0.0, 1.0)),
        ];

        generate_tangents(&mut corners);

        for c in &corners {
            assert!((c.tex_tangent - DVec3::X).length() < EPS);
            assert!((c.tex_binormal - DVec3::new(0.0, -1.0, 0.0)).length() < EPS);
        }
    }

    #[test]
    fn test_tangents_orthogonal_to_normals() {
        let normals = [
            DVec3::new(0.1, 0.2, 1.0).normalize(),
            DVec3::new(-0.3, 0.1, 1.0).normalize(),
            DVec3::new(0.0, -0.2, 1.0).normalize(),
        ];
        let mut corners = vec![
            corner(DVec3::new(0.0, 0.0, 0.0), normals[0], (0.1, 0.2)),
            corner(DVec3::new(2.0, 0.5, 0.3), normals[1], (0.9, 0.3)),
            corner(DVec3::new(0.4, 1.7, -0.2), normals[2], (0.3, 0.8)),
        ];

        generate_tangents(&mut corners);

        for c in &corners {
            assert_tangent_frame(c);
        }
    }

    #[test]
    fn test_unnormalized_normals_still_orthogonal() {
        let mut corners = vec![
            corner(DVec3::ZERO, DVec3::new(0.0, 0.0, 3.0), (0.0, 0.0)),
            corner(DVec3::new(1.0, 0.0, 1.0), DVec3::new(0.0, 0.5, 2.0), (1.0, 0.0)),
            corner(DVec3::Y, DVec3::new(0.2, 0.0, 4.0), (0.0, 1.0)),
        ];

        generate_tangents(&mut corners);

        for c in &corners {
            assert_tangent_frame(c);
        }
    }

    #[test]
    fn test_degenerate_uvs_produce_finite_frame() {
        // All corners share one UV: the solve is singular on every axis
        let mut corners = vec![
            corner(DVec3::ZERO, DVec3::Z, (0.5, 0.5)),
            corner(DVec3::X, DVec3::Z, (0.5, 0.5)),
            corner(DVec3::Y, DVec3::Z, (0.5, 0.5)),
        ];

        generate_tangents(&mut corners);

        for c in &corners {
            assert!(c.tex_tangent.is_finite());
            assert!(c.tex_binormal.is_finite());
            assert_tangent_frame(c);
        }
    }

    #[test]
    fn test_partial_triangle_ignored() {
        let mut corners = vec![
            corner(DVec3::ZERO, DVec3::Z, (0.0, 0.0)),
            corner(DVec3::X, DVec3::Z, (1.0, 0.0)),
            corner(DVec3::Y, DVec3::Z, (0.0, 1.0)),
            corner(DVec3::ONE, DVec3::Z, (1.0, 1.0)),
        ];

        generate_tangents(&mut corners);

        assert_eq!(corners[3].tex_tangent, DVec3::ZERO);
        assert_ne!(corners[0].tex_tangent, DVec3::ZERO);
    }
}
