//! Visual scene and node types.

use dae_math::{DMat4, DVec3, Mat4Ext};

/// A `<visual_scene>` element.
#[derive(Clone, Debug, Default)]
pub struct VisualScene {
    pub id: String,
    pub name: Option<String>,
    pub nodes: Vec<Node>,
}

/// A `<node>` element.
#[derive(Clone, Debug, Default)]
pub struct Node {
    pub id: Option<String>,
    pub name: Option<String>,

    /// Transform elements in document order
    pub transforms: Vec<TransformElement>,

    pub instance_geometries: Vec<InstanceGeometry>,
    pub instance_lights: Vec<InstanceLight>,

    /// Nested `<node>` children
    pub children: Vec<Node>,

    pub instance_nodes: Vec<InstanceNode>,
}

impl Node {
    /// Depth-first search for a node with the given id, including `self`.
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

/// A transform element inside a `<node>`.
#[derive(Clone, Debug)]
pub enum TransformElement {
    /// `<matrix>`: 16 values, row-major
    Matrix([f64; 16]),

    /// `<rotate>`: axis x, y, z and angle in degrees
    Rotate([f64; 4]),

    Scale(DVec3),
    Translate(DVec3),

    /// `<lookat>`: eye, interest, up
    LookAt([f64; 9]),

    /// `<skew>`: angle, rotation axis, translation axis
    Skew([f64; 7]),
}

impl TransformElement {
    /// The matrix this element contributes, `None` for elements that are
    /// recognized but not evaluated (`<lookat>`, `<skew>`).
    pub fn to_matrix(&self) -> Option<DMat4> {
        match self {
            TransformElement::Matrix(values) => Some(DMat4::from_row_major(values)),
            TransformElement::Rotate([x, y, z, degrees]) => Some(DMat4::from_axis_angle_degrees(
                DVec3::new(*x, *y, *z),
                *degrees,
            )),
            TransformElement::Scale(s) => Some(DMat4::from_scale(*s)),
            TransformElement::Translate(t) => Some(DMat4::from_translation(*t)),
            TransformElement::LookAt(_) | TransformElement::Skew(_) => None,
        }
    }
}

/// `<instance_geometry>`.
#[derive(Clone, Debug, Default)]
pub struct InstanceGeometry {
    pub url: String,

    /// `<bind_material><technique_common><instance_material>` entries
    pub bind_material: Vec<InstanceMaterial>,
}

/// `<instance_material symbol="..." target="...">`.
#[derive(Clone, Debug, Default)]
pub struct InstanceMaterial {
    pub symbol: String,
    pub target: String,
}

/// `<instance_light>`.
#[derive(Clone, Debug, Default)]
pub struct InstanceLight {
    pub url: String,
}

/// `<instance_node>`.
#[derive(Clone, Debug, Default)]
pub struct InstanceNode {
    pub url: String,
}
