//! Example: Import a small in-memory scene and print the resulting graph.
//!
//! Run with: cargo run --example inspect_scene -- [options.json]
//!
//! The optional JSON file overrides import options, e.g.
//! `{ "flip_texcoord_v": false }`.

use std::env;
use std::rc::Rc;

use anyhow::Context;
use dae_core::dom::{
    Accessor, Attenuation, ColorOrTexture, Document, Effect, EffectProfile, Geometry,
    GeometryKind, InstanceGeometry, InstanceLight, InstanceMaterial, Light, LightTechnique,
    Material, Mesh, Node, OpaqueMode, PhongShading, Polylist, Primitive, ProfileCommon, SceneInstance,
    Semantic, ShadingTechnique, SharedInput, Source, SourceArray, TransformElement,
    Transparent, UnsharedInput, Vertices, VisualScene,
};
use dae_core::{
    load_dae_with_options, ImportOptions, LightAttenuation, MaterialDescriptor, MemorySource,
    SceneFactory, VertexAttributes,
};
use dae_math::{DMat4, DVec3, DVec4};

/// What the printing factory builds.
enum Item {
    Group {
        name: String,
        transform: DMat4,
        children: Vec<Rc<Item>>,
    },
    Shape {
        name: String,
        material: usize,
        geometry: usize,
    },
    Light {
        name: String,
        kind: &'static str,
        color: DVec4,
    },
}

#[derive(Default)]
struct PrintingFactory {
    materials: Vec<MaterialDescriptor>,
    triangle_counts: Vec<usize>,
}

impl SceneFactory for PrintingFactory {
    type Material = usize;
    type Geometry = usize;
    type Node = Rc<Item>;

    fn create_material(&mut self, material: &MaterialDescriptor) -> usize {
        self.materials.push(material.clone());
        self.materials.len() - 1
    }

    fn create_geometry(&mut self, corners: &[VertexAttributes]) -> usize {
        self.triangle_counts.push(corners.len() / 3);
        self.triangle_counts.len() - 1
    }

    fn create_group_node(&mut self, name: &str, transform: DMat4, children: Vec<Rc<Item>>) -> Rc<Item> {
        Rc::new(Item::Group {
            name: name.to_string(),
            transform,
            children,
        })
    }

    fn create_shape_node(&mut self, name: &str, material: &usize, geometry: &usize) -> Rc<Item> {
        Rc::new(Item::Shape {
            name: name.to_string(),
            material: *material,
            geometry: *geometry,
        })
    }

    fn create_ambient_light_node(&mut self, name: &str, color: DVec4) -> Rc<Item> {
        light(name, "ambient", color)
    }

    fn create_directional_light_node(&mut self, name: &str, color: DVec4) -> Rc<Item> {
        light(name, "directional", color)
    }

    fn create_point_light_node(&mut self, name: &str, color: DVec4, _: LightAttenuation) -> Rc<Item> {
        light(name, "point", color)
    }

    fn create_spot_light_node(
        &mut self,
        name: &str,
        color: DVec4,
        _: LightAttenuation,
        _: f64,
        _: f64,
    ) -> Rc<Item> {
        light(name, "spot", color)
    }
}

fn light(name: &str, kind: &'static str, color: DVec4) -> Rc<Item> {
    Rc::new(Item::Light {
        name: name.to_string(),
        kind,
        color,
    })
}

fn print_item(item: &Item, factory: &PrintingFactory, depth: usize) {
    let indent = "  ".repeat(depth);
    match item {
        Item::Group {
            name,
            transform,
            children,
        } => {
            let pos = transform.transform_point3(DVec3::ZERO);
            println!(
                "{}{} (origin at {:.2}, {:.2}, {:.2})",
                indent, name, pos.x, pos.y, pos.z
            );
            for child in children {
                print_item(child, factory, depth + 1);
            }
        }
        Item::Shape {
            name,
            material,
            geometry,
        } => {
            let diffuse = factory.materials[*material].diffuse;
            println!(
                "{}shape {}: {} triangles, diffuse ({:.2}, {:.2}, {:.2}, {:.2})",
                indent,
                name,
                factory.triangle_counts[*geometry],
                diffuse.x,
                diffuse.y,
                diffuse.z,
                diffuse.w
            );
        }
        Item::Light { name, kind, color } => {
            println!(
                "{}{} light {}: ({:.2}, {:.2}, {:.2})",
                indent, kind, name, color.x, color.y, color.z
            );
        }
    }
}

/// A unit quad written as one polylist polygon, a phong material and a lamp.
fn demo_document() -> Document {
    let positions = Source {
        id: "quad-pos".to_string(),
        array: SourceArray::Float("0 0 0  1 0 0  1 1 0  0 1 0".to_string()),
        accessor: Some(Accessor { count: 4, stride: 3 }),
    };
    let mesh = Mesh {
        sources: vec![positions],
        vertices: Vertices {
            id: "quad-verts".to_string(),
            inputs: vec![UnsharedInput {
                semantic: Semantic::Position,
                source: "#quad-pos".to_string(),
            }],
        },
        primitives: vec![Primitive::Polylist(Polylist {
            material: Some("surface".to_string()),
            count: 1,
            inputs: vec![SharedInput {
                semantic: Semantic::Vertex,
                source: "#quad-verts".to_string(),
                offset: 0,
                set: None,
            }],
            vcount: "4".to_string(),
            p: "0 1 2 3".to_string(),
        })],
    };

    let effect = Effect {
        id: "blue-fx".to_string(),
        name: None,
        profiles: vec![EffectProfile::Common(ProfileCommon {
            newparams: Vec::new(),
            technique: ShadingTechnique::Phong(PhongShading {
                diffuse: Some(ColorOrTexture::Color(DVec4::new(0.1, 0.2, 0.8, 1.0))),
                transparent: Some(Transparent {
                    opaque: Some(OpaqueMode::AOne),
                    value: ColorOrTexture::Color(DVec4::ONE),
                }),
                ..Default::default()
            }),
        })],
    };

    let quad_node = Node {
        id: Some("quad-node".to_string()),
        name: Some("Quad".to_string()),
        transforms: vec![
            TransformElement::Translate(DVec3::new(0.0, 2.0, 0.0)),
            TransformElement::Rotate([0.0, 0.0, 1.0, 45.0]),
        ],
        instance_geometries: vec![InstanceGeometry {
            url: "#quad".to_string(),
            bind_material: vec![InstanceMaterial {
                symbol: "surface".to_string(),
                target: "#blue".to_string(),
            }],
        }],
        instance_lights: vec![InstanceLight {
            url: "#lamp".to_string(),
        }],
        ..Default::default()
    };

    Document {
        visual_scenes: vec![VisualScene {
            id: "DemoScene".to_string(),
            name: None,
            nodes: vec![quad_node],
        }],
        effects: vec![effect],
        geometries: vec![Geometry {
            id: "quad".to_string(),
            name: None,
            kind: GeometryKind::Mesh(mesh),
        }],
        lights: vec![Light {
            id: "lamp".to_string(),
            name: Some("Lamp".to_string()),
            technique: LightTechnique::Point {
                color: Some(DVec3::new(1.0, 0.9, 0.8)),
                attenuation: Attenuation::default(),
            },
            extra: Vec::new(),
        }],
        materials: vec![Material {
            id: "blue".to_string(),
            name: None,
            instance_effect: "#blue-fx".to_string(),
        }],
        scene: Some(SceneInstance {
            instance_visual_scene: "#DemoScene".to_string(),
        }),
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = match env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path))?
        }
        None => ImportOptions::default(),
    };

    let source = MemorySource::new().with("demo.dae", demo_document());
    let mut factory = PrintingFactory::default();

    let root = load_dae_with_options("demo.dae", &source, &mut factory, &options)?;

    println!("=== Imported scene ===");
    println!("Materials: {}", factory.materials.len());
    println!("Geometry batches: {}", factory.triangle_counts.len());
    println!();
    print_item(&root, &factory, 0);

    Ok(())
}
