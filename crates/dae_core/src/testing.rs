//! Test support: a factory that records what it was asked to build, and
//! small document fixtures.

use std::path::PathBuf;
use std::rc::Rc;

use dae_math::{DMat4, DVec4};

use crate::dom::{
    Accessor, ColorOrTexture, Document, Effect, EffectProfile, Geometry, GeometryKind,
    InstanceGeometry, InstanceMaterial, Material, Mesh, Node, OpaqueMode, PhongShading, Primitive,
    ProfileCommon, SceneInstance, Semantic, SharedInput, Source, SourceArray, ShadingTechnique,
    Transparent, Triangles, UnsharedInput, Vertices, VisualScene,
};
use crate::factory::SceneFactory;
use crate::geometry::VertexAttributes;
use crate::light::LightAttenuation;
use crate::material::MaterialDescriptor;

/// A node built by [`RecordingFactory`].
#[derive(Clone, Debug, PartialEq)]
pub enum TestNode {
    Group {
        name: String,
        transform: DMat4,
        children: Vec<Rc<TestNode>>,
    },
    Shape {
        name: String,
        material: usize,
        geometry: usize,
    },
    AmbientLight {
        name: String,
        color: DVec4,
    },
    DirectionalLight {
        name: String,
        color: DVec4,
    },
    PointLight {
        name: String,
        color: DVec4,
        attenuation: LightAttenuation,
    },
    SpotLight {
        name: String,
        color: DVec4,
        attenuation: LightAttenuation,
        exponent: f64,
        cutoff: f64,
    },
}

impl TestNode {
    pub fn name(&self) -> &str {
        match self {
            TestNode::Group { name, .. }
            | TestNode::Shape { name, .. }
            | TestNode::AmbientLight { name, .. }
            | TestNode::DirectionalLight { name, .. }
            | TestNode::PointLight { name, .. }
            | TestNode::SpotLight { name, .. } => name,
        }
    }

    pub fn children(&self) -> &[Rc<TestNode>] {
        match self {
            TestNode::Group { children, .. } => children,
            _ => &[],
        }
    }

    pub fn transform(&self) -> DMat4 {
        match self {
            TestNode::Group { transform, .. } => *transform,
            _ => DMat4::IDENTITY,
        }
    }
}

/// Factory handing out indices into its own recording vectors.
#[derive(Debug, Default)]
pub struct RecordingFactory {
    pub materials: Vec<MaterialDescriptor>,
    pub geometries: Vec<Vec<VertexAttributes>>,
    pub infos: Vec<String>,
    pub errors: Vec<String>,
}

impl SceneFactory for RecordingFactory {
    type Material = usize;
    type Geometry = usize;
    type Node = Rc<TestNode>;

    fn create_material(&mut self, material: &MaterialDescriptor) -> usize {
        self.materials.push(material.clone());
        self.materials.len() - 1
    }

    fn create_geometry(&mut self, corners: &[VertexAttributes]) -> usize {
        self.geometries.push(corners.to_vec());
        self.geometries.len() - 1
    }

    fn create_group_node(
        &mut self,
        name: &str,
        local_transform: DMat4,
        children: Vec<Rc<TestNode>>,
    ) -> Rc<TestNode> {
        Rc::new(TestNode::Group {
            name: name.to_string(),
            transform: local_transform,
            children,
        })
    }

    fn create_shape_node(&mut self, name: &str, material: &usize, geometry: &usize) -> Rc<TestNode> {
        Rc::new(TestNode::Shape {
            name: name.to_string(),
            material: *material,
            geometry: *geometry,
        })
    }

    fn create_ambient_light_node(&mut self, name: &str, color: DVec4) -> Rc<TestNode> {
        Rc::new(TestNode::AmbientLight {
            name: name.to_string(),
            color,
        })
    }

    fn create_directional_light_node(&mut self, name: &str, color: DVec4) -> Rc<TestNode> {
        Rc::new(TestNode::DirectionalLight {
            name: name.to_string(),
            color,
        })
    }

    fn create_point_light_node(
        &mut self,
        name: &str,
        color: DVec4,
        attenuation: LightAttenuation,
    ) -> Rc<TestNode> {
        Rc::new(TestNode::PointLight {
            name: name.to_string(),
            color,
            attenuation,
        })
    }

    fn create_spot_light_node(
        &mut self,
        name: &str,
        color: DVec4,
        attenuation: LightAttenuation,
        exponent: f64,
        cutoff: f64,
    ) -> Rc<TestNode> {
        Rc::new(TestNode::SpotLight {
            name: name.to_string(),
            color,
            attenuation,
            exponent,
            cutoff,
        })
    }

    fn log_info(&mut self, source: &str, message: &str) {
        self.infos.push(format!("{}: {}", source, message));
    }

    fn log_error(&mut self, source: &str, message: &str) {
        self.errors.push(format!("{}: {}", source, message));
    }
}

/// A fresh, empty directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("dae_core_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// A single triangle with positions only, bound to `symbol`.
pub fn triangle_geometry(id: &str, symbol: &str) -> Geometry {
    let source = Source {
        id: format!("{}-pos", id),
        array: SourceArray::Float("0 0 0  1 0 0  0 1 0".to_string()),
        accessor: Some(Accessor { count: 3, stride: 3 }),
    };
    let mesh = Mesh {
        sources: vec![source],
        vertices: Vertices {
            id: format!("{}-verts", id),
            inputs: vec![UnsharedInput {
                semantic: Semantic::Position,
                source: format!("#{}-pos", id),
            }],
        },
        primitives: vec![Primitive::Triangles(Triangles {
            material: Some(symbol.to_string()),
            count: 1,
            inputs: vec![SharedInput {
                semantic: Semantic::Vertex,
                source: format!("#{}-verts", id),
                offset: 0,
                set: None,
            }],
            p: "0 1 2".to_string(),
        })],
    };
    Geometry {
        id: id.to_string(),
        name: None,
        kind: GeometryKind::Mesh(mesh),
    }
}

/// A phong effect with the given diffuse color and the material instancing it.
///
/// The effect carries an A_ONE `<transparent>` with alpha 1, as exporters
/// write for opaque surfaces.
pub fn phong_material(id: &str, diffuse: DVec4) -> (Material, Effect) {
    let effect = Effect {
        id: format!("{}-fx", id),
        name: None,
        profiles: vec![EffectProfile::Common(ProfileCommon {
            newparams: Vec::new(),
            technique: ShadingTechnique::Phong(PhongShading {
                diffuse: Some(ColorOrTexture::Color(diffuse)),
                transparent: Some(Transparent {
                    opaque: Some(OpaqueMode::AOne),
                    value: ColorOrTexture::Color(DVec4::ONE),
                }),
                ..Default::default()
            }),
        })],
    };
    let material = Material {
        id: id.to_string(),
        name: None,
        instance_effect: format!("#{}-fx", id),
    };
    (material, effect)
}

/// A node instancing `geometry`, binding `symbol` to `material`.
pub fn shape_node(name: &str, geometry: &str, symbol: &str, material: &str) -> Node {
    Node {
        name: Some(name.to_string()),
        instance_geometries: vec![InstanceGeometry {
            url: format!("#{}", geometry),
            bind_material: vec![InstanceMaterial {
                symbol: symbol.to_string(),
                target: format!("#{}", material),
            }],
        }],
        ..Default::default()
    }
}

/// A document whose default scene `Scene` holds `nodes`.
pub fn scene_document(nodes: Vec<Node>) -> Document {
    Document {
        visual_scenes: vec![VisualScene {
            id: "Scene".to_string(),
            name: None,
            nodes,
        }],
        scene: Some(SceneInstance {
            instance_visual_scene: "#Scene".to_string(),
        }),
        ..Default::default()
    }
}
