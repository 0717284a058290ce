//! Geometry library types.

/// A `<geometry>` element.
#[derive(Clone, Debug)]
pub struct Geometry {
    pub id: String,
    pub name: Option<String>,
    pub kind: GeometryKind,
}

/// What a `<geometry>` contains.
#[derive(Clone, Debug)]
pub enum GeometryKind {
    /// A `<mesh>`
    Mesh(Mesh),

    /// `<convex_mesh>`, `<spline>` or anything else (element name kept for diagnostics)
    Unsupported(String),
}

/// A `<mesh>` element.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub sources: Vec<Source>,
    pub vertices: Vertices,
    pub primitives: Vec<Primitive>,
}

/// A `<source>` element.
#[derive(Clone, Debug, Default)]
pub struct Source {
    pub id: String,
    pub array: SourceArray,

    /// `<technique_common><accessor>`
    pub accessor: Option<Accessor>,
}

/// The array payload of a `<source>`.
#[derive(Clone, Debug, Default)]
pub enum SourceArray {
    /// `<float_array>` text content
    Float(String),

    /// `<Name_array>`, `<int_array>`, `<bool_array>` and friends
    #[default]
    Other,
}

/// An `<accessor>` describing how the flat array splits into tuples.
#[derive(Clone, Debug)]
pub struct Accessor {
    pub count: usize,
    pub stride: usize,
}

impl Default for Accessor {
    fn default() -> Self {
        Self {
            count: 0,
            stride: 1,
        }
    }
}

/// The `<vertices>` element.
#[derive(Clone, Debug, Default)]
pub struct Vertices {
    pub id: String,
    pub inputs: Vec<UnsharedInput>,
}

/// An `<input>` without offset (inside `<vertices>`).
#[derive(Clone, Debug)]
pub struct UnsharedInput {
    pub semantic: Semantic,
    pub source: String,
}

/// An `<input>` with offset (inside a primitive).
#[derive(Clone, Debug)]
pub struct SharedInput {
    pub semantic: Semantic,
    pub source: String,
    pub offset: usize,
    pub set: Option<u32>,
}

/// Input semantics the importer cares about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Semantic {
    Position,
    Vertex,
    Normal,
    TexCoord,
    TexTangent,
    TexBinormal,
    Other(String),
}

impl Semantic {
    /// Map a `semantic` attribute value to its variant.
    pub fn from_name(name: &str) -> Self {
        match name {
            "POSITION" => Semantic::Position,
            "VERTEX" => Semantic::Vertex,
            "NORMAL" => Semantic::Normal,
            "TEXCOORD" => Semantic::TexCoord,
            "TEXTANGENT" => Semantic::TexTangent,
            "TEXBINORMAL" => Semantic::TexBinormal,
            other => Semantic::Other(other.to_string()),
        }
    }
}

/// A primitive batch inside a `<mesh>`.
#[derive(Clone, Debug)]
pub enum Primitive {
    Triangles(Triangles),
    Polylist(Polylist),

    /// `<lines>`, `<polygons>`, `<tristrips>` and the rest
    Unsupported(String),
}

/// A `<triangles>` element.
#[derive(Clone, Debug, Default)]
pub struct Triangles {
    /// Material symbol bound by the instantiating node
    pub material: Option<String>,
    pub count: usize,
    pub inputs: Vec<SharedInput>,

    /// `<p>` text content
    pub p: String,
}

/// A `<polylist>` element.
#[derive(Clone, Debug, Default)]
pub struct Polylist {
    pub material: Option<String>,
    pub count: usize,
    pub inputs: Vec<SharedInput>,

    /// `<vcount>` text content
    pub vcount: String,

    /// `<p>` text content
    pub p: String,
}
