//! URL, path and numeric-text helpers.

use std::path::{Component, Path, PathBuf};

/// A parsed COLLADA URL such as `#Cube-mesh` or `parts.dae#Wheel`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DaeUrl {
    /// External document path, `None` for a local reference
    pub file: Option<String>,

    /// Fragment id (may be empty)
    pub id: String,
}

impl DaeUrl {
    /// Parse a URL.
    ///
    /// `#id` is local. `file#id` is external. A URL without `#` names an
    /// external document with an empty id.
    pub fn parse(url: &str) -> Self {
        if let Some(id) = url.strip_prefix('#') {
            return Self {
                file: None,
                id: id.to_string(),
            };
        }

        match url.split_once('#') {
            Some((file, id)) => Self {
                file: Some(file.to_string()),
                id: id.to_string(),
            },
            None => Self {
                file: Some(url.to_string()),
                id: String::new(),
            },
        }
    }

    /// True when the URL points into the current document.
    pub fn is_local(&self) -> bool {
        self.file.as_deref().map_or(true, str::is_empty)
    }
}

/// Resolve a document-relative reference (texture or external document).
///
/// A leading `file:///` is dropped. Absolute remainders are kept, everything
/// else is joined onto the directory of `document`.
pub fn resolve_relative(document: &Path, reference: &str) -> PathBuf {
    let reference = reference.strip_prefix("file:///").unwrap_or(reference);
    let reference = Path::new(reference);

    if reference.is_absolute() {
        return normalize_path(reference);
    }

    let base = document.parent().unwrap_or_else(|| Path::new(""));
    normalize_path(&base.join(reference))
}

/// Lexically normalize a path: drop `.` and collapse `..` where possible.
///
/// Used for cache keys, so it must not touch the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if can_pop {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Parse whitespace-separated integers. Malformed tokens read as 0.
pub fn parse_int_list(text: &str) -> Vec<usize> {
    text.split_whitespace()
        .map(|token| token.parse::<usize>().unwrap_or(0))
        .collect()
}

/// Parse whitespace-separated floats. Malformed tokens read as 0.
pub fn parse_float_list(text: &str) -> Vec<f64> {
    text.split_whitespace()
        .map(|token| token.parse::<f64>().unwrap_or(0.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_url() {
        let url = DaeUrl::parse("#Cube-mesh");
        assert_eq!(url.file, None);
        assert_eq!(url.id, "Cube-mesh");
        assert!(url.is_local());
    }

    #[test]
    fn test_parse_external_url() {
        let url = DaeUrl::parse("parts/wheel.dae#Wheel");
        assert_eq!(url.file.as_deref(), Some("parts/wheel.dae"));
        assert_eq!(url.id, "Wheel");
        assert!(!url.is_local());
    }

    #[test]
    fn test_parse_url_without_fragment() {
        let url = DaeUrl::parse("other.dae");
        assert_eq!(url.file.as_deref(), Some("other.dae"));
        assert_eq!(url.id, "");
    }

    #[test]
    fn test_resolve_relative_strips_file_scheme() {
        let doc = Path::new("assets/scenes/main.dae");
        let resolved = resolve_relative(doc, "file:///textures/wood.png");
        assert_eq!(resolved, PathBuf::from("assets/scenes/textures/wood.png"));
    }

    #[test]
    fn test_resolve_relative_parent_dir() {
        let doc = Path::new("assets/scenes/main.dae");
        let resolved = resolve_relative(doc, "../props/chair.dae");
        assert_eq!(resolved, PathBuf::from("assets/props/chair.dae"));
    }

    #[test]
    fn test_resolve_relative_absolute_kept() {
        let doc = Path::new("assets/main.dae");
        let resolved = resolve_relative(doc, "/opt/shared/lamp.dae");
        assert_eq!(resolved, PathBuf::from("/opt/shared/lamp.dae"));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("a/./b/../c.dae")), PathBuf::from("a/c.dae"));
        assert_eq!(normalize_path(Path::new("../x.dae")), PathBuf::from("../x.dae"));
        assert_eq!(normalize_path(Path::new("/../x.dae")), PathBuf::from("/x.dae"));
    }

    #[test]
    fn test_parse_lists_are_permissive() {
        assert_eq!(parse_int_list("0 1 x 3\n4"), vec![0, 1, 0, 3, 4]);
        assert_eq!(parse_float_list("1.5 abc -2"), vec![1.5, 0.0, -2.0]);
        assert!(parse_int_list("   ").is_empty());
    }
}
