//! Visual scene to factory scene graph.
//!
//! A visual scene becomes a group node named after the scene. Each `<node>`
//! becomes a group carrying its local transform, with children in this
//! order: one shape per geometry batch, lights, nested nodes, then
//! `<instance_node>` targets.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use dae_math::DMat4;

use crate::dom::{Document, InstanceGeometry, InstanceNode, Node, TransformElement, VisualScene};
use crate::factory::SceneFactory;
use crate::light::LightDescriptor;
use crate::loader::{DocumentLoader, ImportError, LoadResult, LoadSession};
use crate::url::DaeUrl;

/// Compose a node's transform elements in document order.
///
/// Each element post-multiplies the accumulated matrix, so the last element
/// is the first applied to a point. `<lookat>` and `<skew>` are skipped.
pub fn compose_transforms(transforms: &[TransformElement]) -> DMat4 {
    transforms
        .iter()
        .filter_map(TransformElement::to_matrix)
        .fold(DMat4::IDENTITY, |acc, m| acc * m)
}

fn node_name(node: &Node) -> &str {
    node.name
        .as_deref()
        .or(node.id.as_deref())
        .unwrap_or_default()
}

/// Walks one document's default scene, driving the factory.
pub(crate) struct SceneGraphBuilder<'l, 'a, F: SceneFactory> {
    loader: &'l mut DocumentLoader<F>,
    session: &'l mut LoadSession<'a, F>,
    document: Arc<Document>,

    /// Library nodes currently being expanded
    active_nodes: HashSet<String>,
}

impl<'l, 'a, F: SceneFactory> SceneGraphBuilder<'l, 'a, F> {
    pub fn new(loader: &'l mut DocumentLoader<F>, session: &'l mut LoadSession<'a, F>) -> Self {
        let document = Arc::clone(loader.document());
        Self {
            loader,
            session,
            document,
            active_nodes: HashSet::new(),
        }
    }

    pub fn build_default_scene(&mut self) -> LoadResult<F::Node> {
        let document = Arc::clone(&self.document);
        let scene = document
            .scene
            .as_ref()
            .ok_or_else(|| ImportError::NoDefaultScene(self.loader.path().to_path_buf()))?;

        let id = DaeUrl::parse(&scene.instance_visual_scene).id;
        let visual_scene = document
            .visual_scene(&id)
            .ok_or_else(|| ImportError::MissingVisualScene {
                path: self.loader.path().to_path_buf(),
                id: id.clone(),
            })?;

        self.build_visual_scene(visual_scene)
    }

    fn build_visual_scene(&mut self, scene: &VisualScene) -> LoadResult<F::Node> {
        log::debug!(
            "Building visual scene '{}' ({} root nodes)",
            scene.id,
            scene.nodes.len()
        );

        let mut children = Vec::with_capacity(scene.nodes.len());
        for node in &scene.nodes {
            children.push(self.build_node(node)?);
        }

        Ok(self
            .session
            .factory
            .create_group_node(&scene.id, DMat4::IDENTITY, children))
    }

    fn build_node(&mut self, node: &Node) -> LoadResult<F::Node> {
        let name = node_name(node);
        let mut children = Vec::new();

        for instance in &node.instance_geometries {
            self.instance_geometry(name, instance, &mut children);
        }

        for instance in &node.instance_lights {
            let id = DaeUrl::parse(&instance.url).id;
            let Some(light) = self.document.light(&id) else {
                log::debug!("Light '{}' not in library, skipping", id);
                continue;
            };
            let Some(descriptor) = LightDescriptor::resolve(light) else {
                log::debug!("Light '{}' has no color, skipping", id);
                continue;
            };
            let light_name = light.name.as_deref().unwrap_or(&light.id);
            children.push(descriptor.create_node(light_name, self.session.factory));
        }

        for child in &node.children {
            children.push(self.build_node(child)?);
        }

        for instance in &node.instance_nodes {
            if let Some(target) = self.instance_node(instance)? {
                children.push(target);
            }
        }

        let transform = compose_transforms(&node.transforms);
        Ok(self
            .session
            .factory
            .create_group_node(name, transform, children))
    }

    /// One shape per batch, each with its bound (or default) material.
    fn instance_geometry(
        &mut self,
        name: &str,
        instance: &InstanceGeometry,
        children: &mut Vec<F::Node>,
    ) {
        let id = DaeUrl::parse(&instance.url).id;
        let Some(geometry) = self.loader.geometry(self.session, &id) else {
            log::warn!("Geometry '{}' not found, skipping instance in '{}'", id, name);
            return;
        };

        let bindings: HashMap<&str, &str> = instance
            .bind_material
            .iter()
            .map(|m| (m.symbol.as_str(), m.target.as_str()))
            .collect();

        for batch in &geometry.batches {
            let material = self.bound_material(batch.material_symbol.as_deref(), &bindings);
            let shape = self
                .session
                .factory
                .create_shape_node(name, &material, &batch.geometry);
            children.push(shape);
        }
    }

    fn bound_material(&mut self, symbol: Option<&str>, bindings: &HashMap<&str, &str>) -> F::Material {
        let Some(symbol) = symbol else {
            return self.loader.default_material(self.session);
        };

        let resolved = match bindings.get(symbol) {
            Some(target) => {
                let id = DaeUrl::parse(target).id;
                self.loader.material(self.session, &id)
            }
            None => None,
        };

        match resolved {
            Some(material) => material,
            None => {
                log::warn!(
                    "Unresolved material binding '{}' in {}, using default material",
                    symbol,
                    self.loader.path().display()
                );
                self.loader.default_material(self.session)
            }
        }
    }

    /// Expand an `<instance_node>`.
    ///
    /// A local URL instantiates a library node. An external URL attaches the
    /// referenced document's whole default scene, whatever the fragment says.
    fn instance_node(&mut self, instance: &InstanceNode) -> LoadResult<Option<F::Node>> {
        let url = DaeUrl::parse(&instance.url);

        let file = match url.file {
            Some(file) if !file.is_empty() => file,
            _ => return self.library_node(&url.id),
        };

        if !self.session.options.resolve_external_references {
            log::info!("Not following external reference '{}'", instance.url);
            return Ok(None);
        }

        log::debug!(
            "Attaching default scene of '{}' for instance_node '{}'",
            file,
            instance.url
        );
        let sub_loader = self.loader.sub_loader(self.session, &file)?;
        sub_loader.scene_graph(self.session).map(Some)
    }

    fn library_node(&mut self, id: &str) -> LoadResult<Option<F::Node>> {
        let document = Arc::clone(&self.document);
        let Some(target) = document.library_node(id) else {
            log::warn!("Library node '{}' not found", id);
            return Ok(None);
        };

        if !self.active_nodes.insert(id.to_string()) {
            return Err(ImportError::CyclicNode {
                path: self.loader.path().to_path_buf(),
                id: id.to_string(),
            });
        }
        let result = self.build_node(target);
        self.active_nodes.remove(id);

        result.map(Some)
    }
}
