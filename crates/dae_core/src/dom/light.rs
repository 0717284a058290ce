//! Light library types.

use dae_math::DVec3;

use super::Extra;

/// A `<light>` element.
#[derive(Clone, Debug)]
pub struct Light {
    pub id: String,
    pub name: Option<String>,
    pub technique: LightTechnique,

    /// Vendor `<extra>` blocks, in document order
    pub extra: Vec<Extra>,
}

/// The `<technique_common>` of a light.
#[derive(Clone, Debug)]
pub enum LightTechnique {
    Ambient {
        color: Option<DVec3>,
    },
    Directional {
        color: Option<DVec3>,
    },
    Point {
        color: Option<DVec3>,
        attenuation: Attenuation,
    },
    Spot {
        color: Option<DVec3>,
        attenuation: Attenuation,
        falloff_angle: Option<f64>,
        falloff_exponent: Option<f64>,
    },
}

/// Attenuation coefficients as written in the document (absent ones are `None`).
#[derive(Clone, Copy, Debug, Default)]
pub struct Attenuation {
    pub constant: Option<f64>,
    pub linear: Option<f64>,
    pub quadratic: Option<f64>,
}
