//! Mesh import: source decoding, triangulation and vertex assembly.
//!
//! A `<mesh>` becomes one triangle batch per primitive element. Corners are
//! never shared: each triangle owns three independent [`VertexAttributes`]
//! records, so per-corner normals, UVs and tangents survive unchanged.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use dae_math::DVec3;

use crate::dom::{Geometry, GeometryKind, Mesh, Primitive, Semantic, SharedInput, SourceArray};
use crate::factory::SceneFactory;
use crate::options::ImportOptions;
use crate::tangent::generate_tangents;
use crate::url::{parse_float_list, parse_int_list, DaeUrl};

/// Attributes of one triangle corner.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct VertexAttributes {
    pub vertex: DVec3,
    pub normal: DVec3,
    pub tex_coord: DVec3,
    pub tex_tangent: DVec3,
    pub tex_binormal: DVec3,
}

/// A view over a flat float array split into tuples of `stride` values.
///
/// Only the first three components of a tuple are read; missing components
/// and out-of-range reads are zero.
#[derive(Clone, Copy, Debug)]
pub struct MeshSource<'a> {
    values: &'a [f64],
    stride: usize,
}

impl<'a> MeshSource<'a> {
    pub fn new(values: &'a [f64], stride: usize) -> Self {
        Self { values, stride }
    }

    /// The tuple at `index` as a 3-vector.
    pub fn get(&self, index: usize) -> DVec3 {
        let mut result = [0.0; 3];
        let base = index * self.stride;
        for (i, slot) in result.iter_mut().enumerate().take(self.stride.min(3)) {
            *slot = self.values.get(base + i).copied().unwrap_or(0.0);
        }
        DVec3::from_array(result)
    }
}

/// One triangulated primitive batch before it reaches the factory.
#[derive(Clone, Debug, Default)]
pub struct AssembledBatch {
    /// Material symbol to be bound by the instantiating node
    pub material_symbol: Option<String>,
    pub corners: Vec<VertexAttributes>,
}

impl AssembledBatch {
    pub fn triangle_count(&self) -> usize {
        self.corners.len() / 3
    }
}

/// A batch after it has been handed to the factory.
#[derive(Clone, Debug)]
pub struct GeometryBatch<G> {
    pub geometry: G,
    pub material_symbol: Option<String>,
}

/// All batches of one `<geometry>`.
///
/// Built once per geometry id and shared by every node that instances it.
#[derive(Clone, Debug)]
pub struct ImportedGeometry<G> {
    pub id: String,
    pub batches: Vec<GeometryBatch<G>>,
}

/// Which corner attribute an input channel writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Attribute {
    Position,
    Normal,
    TexCoord,
    TexTangent,
    TexBinormal,
}

impl Attribute {
    fn from_semantic(semantic: &Semantic) -> Option<Self> {
        match semantic {
            Semantic::Position | Semantic::Vertex => Some(Attribute::Position),
            Semantic::Normal => Some(Attribute::Normal),
            Semantic::TexCoord => Some(Attribute::TexCoord),
            Semantic::TexTangent => Some(Attribute::TexTangent),
            Semantic::TexBinormal => Some(Attribute::TexBinormal),
            Semantic::Other(_) => None,
        }
    }
}

/// A resolved input: which attribute, from which source, at which offset.
struct Channel<'a> {
    attribute: Attribute,
    source: MeshSource<'a>,
    offset: usize,
}

/// Converts `<geometry>` elements into factory geometry batches.
pub struct GeometryImporter<'o> {
    options: &'o ImportOptions,
}

impl<'o> GeometryImporter<'o> {
    pub fn new(options: &'o ImportOptions) -> Self {
        Self { options }
    }

    /// Import a geometry, emitting one factory geometry per primitive batch.
    ///
    /// Unsupported geometry kinds yield an empty batch list.
    pub fn import<F: SceneFactory>(
        &self,
        geometry: &Geometry,
        factory: &mut F,
    ) -> ImportedGeometry<F::Geometry> {
        let batches = match &geometry.kind {
            GeometryKind::Mesh(mesh) => self.assemble(mesh),
            GeometryKind::Unsupported(kind) => {
                log::debug!("Geometry '{}' is a <{}>, importing as empty", geometry.id, kind);
                Vec::new()
            }
        };

        let triangle_count: usize = batches.iter().map(AssembledBatch::triangle_count).sum();
        log::debug!(
            "Imported geometry '{}': {} batches, {} triangles",
            geometry.id,
            batches.len(),
            triangle_count
        );

        let batches = batches
            .into_iter()
            .map(|batch| GeometryBatch {
                geometry: factory.create_geometry(&batch.corners),
                material_symbol: batch.material_symbol,
            })
            .collect();

        ImportedGeometry {
            id: geometry.id.clone(),
            batches,
        }
    }

    /// Triangulate every supported primitive of a mesh into corner lists.
    ///
    /// Tangents and binormals are generated for batches that do not supply both.
    pub fn assemble(&self, mesh: &Mesh) -> Vec<AssembledBatch> {
        let arrays: Vec<(&str, Vec<f64>, usize)> = mesh
            .sources
            .iter()
            .filter_map(|source| match &source.array {
                SourceArray::Float(text) => {
                    let stride = source.accessor.as_ref().map_or(0, |a| a.stride);
                    Some((source.id.as_str(), parse_float_list(text), stride))
                }
                SourceArray::Other => None,
            })
            .collect();

        let mut sources: HashMap<&str, MeshSource<'_>> = arrays
            .iter()
            .map(|(id, values, stride)| (*id, MeshSource::new(values, *stride)))
            .collect();

        // <vertices> is addressed by its own id; alias it to the POSITION source
        let position = mesh
            .vertices
            .inputs
            .iter()
            .find(|input| input.semantic == Semantic::Position)
            .and_then(|input| sources.get(DaeUrl::parse(&input.source).id.as_str()).copied());
        if let Some(position) = position {
            sources.insert(mesh.vertices.id.as_str(), position);
        }

        let mut batches = Vec::new();
        for primitive in &mesh.primitives {
            match primitive {
                Primitive::Triangles(tris) => {
                    let channels = self.channels(mesh, &tris.inputs, &sources);
                    let indices = parse_int_list(&tris.p);
                    let available = addressable_corners(&indices, &tris.inputs);
                    let corner_count = clamp_corners(
                        tris.count.saturating_mul(3),
                        available - available % 3,
                        "triangles",
                    );
                    let mut corners = self.read_corners(&channels, &indices, corner_count);

                    if !has_tangent_inputs(&channels) {
                        generate_tangents(&mut corners);
                    }

                    batches.push(AssembledBatch {
                        material_symbol: tris.material.clone(),
                        corners,
                    });
                }
                Primitive::Polylist(polys) => {
                    let channels = self.channels(mesh, &polys.inputs, &sources);
                    let polygon_sizes = parse_int_list(&polys.vcount);
                    let indices = parse_int_list(&polys.p);
                    let vertex_count = clamp_corners(
                        polygon_sizes.iter().fold(0usize, |acc, &k| acc.saturating_add(k)),
                        addressable_corners(&indices, &polys.inputs),
                        "polylist",
                    );

                    let polygon_corners = self.read_corners(&channels, &indices, vertex_count);
                    let mut corners = fan_triangulate(&polygon_sizes, &polygon_corners);

                    if !has_tangent_inputs(&channels) {
                        generate_tangents(&mut corners);
                    }

                    batches.push(AssembledBatch {
                        material_symbol: polys.material.clone(),
                        corners,
                    });
                }
                Primitive::Unsupported(kind) => {
                    log::debug!("Skipping unsupported primitive <{}>", kind);
                }
            }
        }

        batches
    }

    /// Resolve the inputs of a primitive to attribute channels.
    ///
    /// A VERTEX input pulls in every `<vertices>` input at its offset.
    fn channels<'a>(
        &self,
        mesh: &Mesh,
        inputs: &[SharedInput],
        sources: &HashMap<&str, MeshSource<'a>>,
    ) -> Vec<Channel<'a>> {
        let mut channels: Vec<Channel<'a>> = Vec::new();
        let mut push = |attribute: Attribute, source_url: &str, offset: usize| {
            // Only the first TEXCOORD set is used
            if attribute == Attribute::TexCoord
                && channels.iter().any(|c| c.attribute == Attribute::TexCoord)
            {
                return;
            }
            match sources.get(DaeUrl::parse(source_url).id.as_str()) {
                Some(source) => channels.push(Channel {
                    attribute,
                    source: *source,
                    offset,
                }),
                None => log::warn!("Input source '{}' not found, ignoring input", source_url),
            }
        };

        for input in inputs {
            let Some(attribute) = Attribute::from_semantic(&input.semantic) else {
                continue;
            };

            if input.semantic == Semantic::Vertex {
                push(attribute, &input.source, input.offset);

                let targets_vertices = DaeUrl::parse(&input.source).id == mesh.vertices.id;
                if targets_vertices {
                    for extra in &mesh.vertices.inputs {
                        if extra.semantic == Semantic::Position {
                            continue;
                        }
                        if let Some(attribute) = Attribute::from_semantic(&extra.semantic) {
                            push(attribute, &extra.source, input.offset);
                        }
                    }
                }
            } else {
                push(attribute, &input.source, input.offset);
            }
        }

        channels
    }

    /// Read `count` corners; the index stride is `indices.len() / count`.
    fn read_corners(
        &self,
        channels: &[Channel<'_>],
        indices: &[usize],
        count: usize,
    ) -> Vec<VertexAttributes> {
        let mut corners = vec![VertexAttributes::default(); count];
        if count == 0 {
            return corners;
        }
        let stride = indices.len() / count;

        for channel in channels {
            for (i, corner) in corners.iter_mut().enumerate() {
                let index = indices.get(i * stride + channel.offset).copied().unwrap_or(0);
                let value = channel.source.get(index);

                match channel.attribute {
                    Attribute::Position => corner.vertex = value,
                    Attribute::Normal => corner.normal = value,
                    Attribute::TexCoord => {
                        corner.tex_coord = if self.options.flip_texcoord_v {
                            DVec3::new(value.x, 1.0 - value.y, value.z)
                        } else {
                            value
                        };
                    }
                    Attribute::TexTangent => corner.tex_tangent = value,
                    Attribute::TexBinormal => corner.tex_binormal = value,
                }
            }
        }

        corners
    }
}

/// Corners the `<p>` list can address given the primitive's interleave width.
fn addressable_corners(indices: &[usize], inputs: &[SharedInput]) -> usize {
    let width = inputs
        .iter()
        .map(|input| input.offset.saturating_add(1))
        .max()
        .unwrap_or(1);
    indices.len() / width
}

fn clamp_corners(requested: usize, available: usize, kind: &str) -> usize {
    if requested > available {
        log::warn!(
            "<{}> declares {} corners but <p> holds {}, truncating",
            kind,
            requested,
            available
        );
        available
    } else {
        requested
    }
}

/// Both TEXTANGENT and TEXBINORMAL must be present; one alone counts as absent.
fn has_tangent_inputs(channels: &[Channel<'_>]) -> bool {
    let has = |attribute| channels.iter().any(|c| c.attribute == attribute);
    has(Attribute::TexTangent) && has(Attribute::TexBinormal)
}

/// Fan-triangulate polygons from their first vertex.
///
/// `polygon_sizes[i]` consecutive items of `corners` form polygon `i`. A
/// k-gon yields (v0, v1, v2), (v0, v2, v3), ... for k - 2 triangles.
/// Polygons with fewer than 3 vertices are dropped.
pub fn fan_triangulate<T: Copy>(polygon_sizes: &[usize], corners: &[T]) -> Vec<T> {
    let triangle_count = polygon_sizes
        .iter()
        .fold(0usize, |acc, &k| acc.saturating_add(k.saturating_sub(2)));
    // A k-gon never yields more than 3k items
    let capacity = triangle_count
        .saturating_mul(3)
        .min(corners.len().saturating_mul(3));
    let mut triangles = Vec::with_capacity(capacity);

    let mut start: usize = 0;
    for &size in polygon_sizes {
        if start >= corners.len() {
            break;
        }
        let end = start.saturating_add(size).min(corners.len());
        let polygon = &corners[start..end];

        if polygon.len() >= 3 {
            for i in 1..polygon.len() - 1 {
                triangles.push(polygon[0]);
                triangles.push(polygon[i]);
                triangles.push(polygon[i + 1]);
            }
        }

        start = start.saturating_add(size);
    }

    triangles
}
