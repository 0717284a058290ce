//! The abstract builder the importer drives.
//!
//! The importer never creates renderer objects itself. Every material,
//! geometry batch and scene node is materialized through a [`SceneFactory`]
//! supplied by the caller, so the same import logic feeds any engine.

use dae_math::{DMat4, DVec4};

use crate::geometry::VertexAttributes;
use crate::light::LightAttenuation;
use crate::material::MaterialDescriptor;

/// Builder for concrete engine objects.
///
/// Handles are cloned when one imported object is referenced from several
/// places (a geometry instanced by two nodes, a sub-document attached twice),
/// so cheap reference-counted handles are the natural choice.
pub trait SceneFactory {
    type Material: Clone;
    type Geometry: Clone;
    type Node: Clone;

    /// Create a material. Opacity is already folded into the colors.
    fn create_material(&mut self, material: &MaterialDescriptor) -> Self::Material;

    /// Create a triangle batch. `corners.len()` is a multiple of 3 and
    /// every corner carries a tangent and binormal.
    fn create_geometry(&mut self, corners: &[VertexAttributes]) -> Self::Geometry;

    fn create_group_node(
        &mut self,
        name: &str,
        local_transform: DMat4,
        children: Vec<Self::Node>,
    ) -> Self::Node;

    fn create_shape_node(
        &mut self,
        name: &str,
        material: &Self::Material,
        geometry: &Self::Geometry,
    ) -> Self::Node;

    fn create_ambient_light_node(&mut self, name: &str, color: DVec4) -> Self::Node;

    fn create_directional_light_node(&mut self, name: &str, color: DVec4) -> Self::Node;

    fn create_point_light_node(
        &mut self,
        name: &str,
        color: DVec4,
        attenuation: LightAttenuation,
    ) -> Self::Node;

    /// `cutoff` is the half-angle of the cone in radians.
    fn create_spot_light_node(
        &mut self,
        name: &str,
        color: DVec4,
        attenuation: LightAttenuation,
        exponent: f64,
        cutoff: f64,
    ) -> Self::Node;

    /// Informational side channel. Forwards to the `log` facade by default.
    fn log_info(&mut self, source: &str, message: &str) {
        log::info!(target: source, "{}", message);
    }

    /// Error side channel for non-fatal problems. Forwards to the `log` facade by default.
    fn log_error(&mut self, source: &str, message: &str) {
        log::error!(target: source, "{}", message);
    }
}
