//! Light interpretation.

use std::f64::consts::PI;

use dae_math::{rgb_to_rgba, DVec4};

use crate::dom::{Attenuation, Extra, Light, LightTechnique};
use crate::factory::SceneFactory;

/// Attenuation with document defaults applied (1, 0, 0).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightAttenuation {
    pub constant: f64,
    pub linear: f64,
    pub quadratic: f64,
}

impl Default for LightAttenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }
}

impl From<Attenuation> for LightAttenuation {
    fn from(a: Attenuation) -> Self {
        let defaults = Self::default();
        Self {
            constant: a.constant.unwrap_or(defaults.constant),
            linear: a.linear.unwrap_or(defaults.linear),
            quadratic: a.quadratic.unwrap_or(defaults.quadratic),
        }
    }
}

/// A resolved light.
#[derive(Clone, Debug, PartialEq)]
pub enum LightDescriptor {
    Ambient {
        color: DVec4,
    },
    Directional {
        color: DVec4,
    },
    Point {
        color: DVec4,
        attenuation: LightAttenuation,
    },
    Spot {
        color: DVec4,
        attenuation: LightAttenuation,
        exponent: f64,
        /// Half-angle of the cone, radians
        cutoff: f64,
    },
}

impl LightDescriptor {
    /// Resolve a `<light>`.
    ///
    /// Ambient and directional lights without a color resolve to `None`.
    pub fn resolve(light: &Light) -> Option<Self> {
        let descriptor = match &light.technique {
            LightTechnique::Ambient { color } => LightDescriptor::Ambient {
                color: rgb_to_rgba((*color)?),
            },
            LightTechnique::Directional { color } => LightDescriptor::Directional {
                color: rgb_to_rgba((*color)?),
            },
            LightTechnique::Point { color, attenuation } => LightDescriptor::Point {
                color: color.map_or(DVec4::ONE, rgb_to_rgba),
                attenuation: (*attenuation).into(),
            },
            LightTechnique::Spot {
                color,
                attenuation,
                falloff_angle,
                falloff_exponent,
            } => {
                let cutoff = match falloff_angle {
                    // Taken as given; only the vendor value is in degrees
                    Some(angle) => angle / 2.0,
                    None => extra_falloff(&light.extra)
                        .map_or(PI, |degrees| degrees.to_radians() / 2.0),
                };
                LightDescriptor::Spot {
                    color: color.map_or(DVec4::ONE, rgb_to_rgba),
                    attenuation: (*attenuation).into(),
                    exponent: falloff_exponent.unwrap_or(0.0),
                    cutoff,
                }
            }
        };

        Some(descriptor)
    }

    /// Materialize this light as a scene node.
    pub fn create_node<F: SceneFactory>(&self, name: &str, factory: &mut F) -> F::Node {
        match *self {
            LightDescriptor::Ambient { color } => factory.create_ambient_light_node(name, color),
            LightDescriptor::Directional { color } => {
                factory.create_directional_light_node(name, color)
            }
            LightDescriptor::Point { color, attenuation } => {
                factory.create_point_light_node(name, color, attenuation)
            }
            LightDescriptor::Spot {
                color,
                attenuation,
                exponent,
                cutoff,
            } => factory.create_spot_light_node(name, color, attenuation, exponent, cutoff),
        }
    }
}

/// Vendor falloff angle in degrees: the first `<falloff>` child of any
/// element inside an `<extra><technique>` block, in document order.
fn extra_falloff(extras: &[Extra]) -> Option<f64> {
    extras
        .iter()
        .flat_map(|extra| &extra.techniques)
        .flat_map(|technique| &technique.elements)
        .flat_map(|element| element.children.iter().filter_map(|node| node.as_element()))
        .filter(|child| child.name == "falloff")
        .find_map(|child| child.get_text()?.trim().parse::<f64>().ok())
}
