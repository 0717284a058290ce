//! Import configuration.

use serde::{Deserialize, Serialize};

use crate::material::MaterialDescriptor;

/// Options controlling how a document is interpreted.
///
/// Every field has a default, so a partial JSON/TOML table deserializes
/// into a complete set of options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Convert texture coordinates from file convention (origin bottom-left)
    /// to texture-space convention with `v' = 1 - v`
    pub flip_texcoord_v: bool,

    /// Follow `<instance_node>` URLs into other documents
    pub resolve_external_references: bool,

    /// Material for batches without a binding, or whose binding cannot be resolved
    pub default_material: MaterialDescriptor,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            flip_texcoord_v: true,
            resolve_external_references: true,
            default_material: MaterialDescriptor::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ImportOptions::default();
        assert!(options.flip_texcoord_v);
        assert!(options.resolve_external_references);
        assert_eq!(options.default_material.shininess, 50.0);
    }

    #[test]
    fn test_partial_json() {
        let options: ImportOptions =
            serde_json::from_str(r#"{ "flip_texcoord_v": false }"#).unwrap();

        assert!(!options.flip_texcoord_v);
        assert!(options.resolve_external_references);
        assert_eq!(options.default_material, MaterialDescriptor::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut options = ImportOptions::default();
        options.default_material.shininess = 12.0;
        options.resolve_external_references = false;

        let json = serde_json::to_string(&options).unwrap();
        let back: ImportOptions = serde_json::from_str(&json).unwrap();

        assert_eq!(back, options);
    }
}
