//! Typed COLLADA 1.4 document tree.
//!
//! These types are what the XML binding layer hands to the importer. They
//! mirror the schema closely and are consumed read-only. Numeric payloads
//! that COLLADA stores as whitespace-separated text (`<p>`, `<vcount>`,
//! `<float_array>`) are kept as text so the importer can parse them
//! permissively.

mod effect;
mod geometry;
mod light;
mod scene;

pub use effect::*;
pub use geometry::*;
pub use light::*;
pub use scene::*;

/// A complete COLLADA document.
#[derive(Clone, Debug, Default)]
pub struct Document {
    /// `<library_visual_scenes>` contents, in document order
    pub visual_scenes: Vec<VisualScene>,

    /// `<library_effects>` contents
    pub effects: Vec<Effect>,

    /// `<library_geometries>` contents
    pub geometries: Vec<Geometry>,

    /// `<library_images>` contents
    pub images: Vec<Image>,

    /// `<library_lights>` contents
    pub lights: Vec<Light>,

    /// `<library_materials>` contents
    pub materials: Vec<Material>,

    /// `<library_nodes>` contents
    pub nodes: Vec<Node>,

    /// The `<scene>` element
    pub scene: Option<SceneInstance>,
}

impl Document {
    /// Find a visual scene by id.
    pub fn visual_scene(&self, id: &str) -> Option<&VisualScene> {
        self.visual_scenes.iter().find(|s| s.id == id)
    }

    /// Find an effect by id.
    pub fn effect(&self, id: &str) -> Option<&Effect> {
        self.effects.iter().find(|e| e.id == id)
    }

    /// Find a geometry by id.
    pub fn geometry(&self, id: &str) -> Option<&Geometry> {
        self.geometries.iter().find(|g| g.id == id)
    }

    /// Find an image by id.
    pub fn image(&self, id: &str) -> Option<&Image> {
        self.images.iter().find(|i| i.id == id)
    }

    /// Find a light by id.
    pub fn light(&self, id: &str) -> Option<&Light> {
        self.lights.iter().find(|l| l.id == id)
    }

    /// Find a material by id.
    pub fn material(&self, id: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    /// Find a node in `<library_nodes>` by id, searching nested nodes depth-first.
    pub fn library_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find_map(|n| n.find(id))
    }
}

/// The `<scene>` element: which visual scene is the default.
#[derive(Clone, Debug, Default)]
pub struct SceneInstance {
    /// `<instance_visual_scene url="...">`
    pub instance_visual_scene: String,
}

/// An `<image>` in `<library_images>`.
#[derive(Clone, Debug, Default)]
pub struct Image {
    pub id: String,
    pub name: Option<String>,

    /// `<init_from>` URI, if the image references a file
    pub init_from: Option<String>,
}

/// A `<material>` in `<library_materials>`.
#[derive(Clone, Debug, Default)]
pub struct Material {
    pub id: String,
    pub name: Option<String>,

    /// `<instance_effect url="...">`
    pub instance_effect: String,
}

/// An `<extra>` block holding vendor techniques.
#[derive(Clone, Debug, Default)]
pub struct Extra {
    pub techniques: Vec<ExtraTechnique>,
}

/// A `<technique profile="...">` inside `<extra>`.
///
/// The content is vendor-defined, so it stays generic XML.
#[derive(Clone, Debug)]
pub struct ExtraTechnique {
    pub profile: String,
    pub elements: Vec<xmltree::Element>,
}
