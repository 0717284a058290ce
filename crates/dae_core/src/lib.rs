//! DAE Core - COLLADA 1.4 scene import through an abstract factory.
//!
//! This crate provides:
//!
//! - **Document model**: typed COLLADA elements (`dom`) as produced by an XML binding
//! - **Geometry import**: triangulation, attribute assembly, tangent generation
//! - **Materials and lights**: `profile_COMMON` effects and `technique_common` lights
//! - **Scene graph construction**: node hierarchy, transforms, external references
//!
//! Nothing here creates engine objects. A [`SceneFactory`] supplied by the
//! caller receives every material, geometry batch and node.
//!
//! # Example
//!
//! ```ignore
//! use dae_core::{load_dae, MemorySource};
//!
//! let source = MemorySource::new().with("scene.dae", document);
//! let root = load_dae("scene.dae", &source, &mut my_factory)?;
//! ```

pub mod dom;
pub mod factory;
pub mod geometry;
pub mod light;
pub mod loader;
pub mod material;
pub mod options;
pub mod scene;
pub mod tangent;
pub mod texture;
pub mod url;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use factory::SceneFactory;
pub use geometry::VertexAttributes;
pub use light::LightAttenuation;
pub use loader::{
    load_dae, load_dae_with_options, load_document, DocumentSource, ImportError, Importer, LoadResult,
    MemorySource,
};
pub use material::MaterialDescriptor;
pub use options::ImportOptions;
