//! Document loading.
//!
//! A load starts from one root document and pulls in every document its
//! `<instance_node>` elements reference. Each document gets a
//! [`DocumentLoader`] owning the per-document caches (geometry batches,
//! material handles, texture paths, sub-documents), so an object referenced
//! several times is built once and its handle is cloned.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use thiserror::Error;

use crate::dom::Document;
use crate::factory::SceneFactory;
use crate::geometry::{GeometryImporter, ImportedGeometry};
use crate::material::resolve_effect;
use crate::options::ImportOptions;
use crate::scene::SceneGraphBuilder;
use crate::texture::TextureCache;
use crate::url::{normalize_path, resolve_relative, DaeUrl};

/// Errors that abort a load.
///
/// Problems confined to one object (a missing texture, an unresolved
/// binding) are logged and do not stop the load.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cyclic external reference to {}", .0.display())]
    CyclicReference(PathBuf),

    #[error("node '{id}' in {} instances itself", .path.display())]
    CyclicNode { path: PathBuf, id: String },

    #[error("{} has no default <scene>", .0.display())]
    NoDefaultScene(PathBuf),

    #[error("visual scene '{id}' not found in {}", .path.display())]
    MissingVisualScene { path: PathBuf, id: String },
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, ImportError>;

/// Where documents come from.
///
/// The XML binding is outside this crate; a source hands back an already
/// parsed document for a path.
pub trait DocumentSource {
    fn open(&self, path: &Path) -> io::Result<Arc<Document>>;
}

/// A [`DocumentSource`] over documents held in memory, keyed by normalized path.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    documents: HashMap<PathBuf, Arc<Document>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, document: Document) {
        self.documents
            .insert(normalize_path(path.as_ref()), Arc::new(document));
    }

    /// Builder-style [`MemorySource::insert`].
    pub fn with(mut self, path: impl AsRef<Path>, document: Document) -> Self {
        self.insert(path, document);
        self
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSource for MemorySource {
    fn open(&self, path: &Path) -> io::Result<Arc<Document>> {
        self.documents
            .get(&normalize_path(path))
            .cloned()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("document not found: {}", path.display()),
                )
            })
    }
}

/// Owns a factory and a document source and runs loads against them.
///
/// Every [`Importer::load`] starts with empty caches.
pub struct Importer<F, S> {
    factory: F,
    source: S,
    options: ImportOptions,
}

impl<F: SceneFactory, S: DocumentSource> Importer<F, S> {
    pub fn new(factory: F, source: S) -> Self {
        Self {
            factory,
            source,
            options: ImportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn into_factory(self) -> F {
        self.factory
    }

    /// Load the default scene of the document at `path`.
    pub fn load(&mut self, path: impl AsRef<Path>) -> LoadResult<F::Node> {
        load_dae_with_options(path, &self.source, &mut self.factory, &self.options)
    }
}

/// Load the default scene of the document at `path` with default options.
pub fn load_dae<F: SceneFactory>(
    path: impl AsRef<Path>,
    source: &dyn DocumentSource,
    factory: &mut F,
) -> LoadResult<F::Node> {
    load_dae_with_options(path, source, factory, &ImportOptions::default())
}

/// Load the default scene of the document at `path`.
///
/// Returns the root group node. External documents are opened through
/// `source`, relative to the document that references them.
pub fn load_dae_with_options<F: SceneFactory>(
    path: impl AsRef<Path>,
    source: &dyn DocumentSource,
    factory: &mut F,
    options: &ImportOptions,
) -> LoadResult<F::Node> {
    let mut session = LoadSession::new(factory, source, options);
    let mut loader = DocumentLoader::open(&mut session, path.as_ref())?;
    loader.scene_graph(&mut session)
}

/// Load an already parsed root document.
///
/// `path` locates the document for relative texture and external references.
pub fn load_document<F: SceneFactory>(
    document: Arc<Document>,
    path: impl AsRef<Path>,
    source: &dyn DocumentSource,
    factory: &mut F,
    options: &ImportOptions,
) -> LoadResult<F::Node> {
    let mut session = LoadSession::new(factory, source, options);
    let mut loader = DocumentLoader::from_document(normalize_path(path.as_ref()), document);
    loader.scene_graph(&mut session)
}

/// State shared by every document of one load.
pub(crate) struct LoadSession<'a, F> {
    pub factory: &'a mut F,
    pub source: &'a dyn DocumentSource,
    pub options: &'a ImportOptions,

    /// Documents whose scene graph is currently being built
    loading: HashSet<PathBuf>,
}

impl<'a, F> LoadSession<'a, F> {
    pub fn new(factory: &'a mut F, source: &'a dyn DocumentSource, options: &'a ImportOptions) -> Self {
        Self {
            factory,
            source,
            options,
            loading: HashSet::new(),
        }
    }
}

/// Loader for a single document.
pub(crate) struct DocumentLoader<F: SceneFactory> {
    path: PathBuf,
    document: Arc<Document>,
    geometries: HashMap<String, Rc<ImportedGeometry<F::Geometry>>>,
    materials: HashMap<String, F::Material>,
    default_material: Option<F::Material>,
    textures: TextureCache,

    /// Sub-documents, keyed by normalized path
    sub_loaders: HashMap<PathBuf, DocumentLoader<F>>,

    /// Built default scene, reused when the document is referenced again
    scene_graph: Option<F::Node>,
}

impl<F: SceneFactory> DocumentLoader<F> {
    pub fn open(session: &mut LoadSession<'_, F>, path: &Path) -> LoadResult<Self> {
        let path = normalize_path(path);
        session
            .factory
            .log_info("DocumentLoader", &format!("Loading {}", path.display()));

        let document = session.source.open(&path).map_err(|source| ImportError::Io {
            path: path.clone(),
            source,
        })?;

        session
            .factory
            .log_info("DocumentLoader", &format!("Loading {} finished", path.display()));
        Ok(Self::from_document(path, document))
    }

    pub fn from_document(path: PathBuf, document: Arc<Document>) -> Self {
        Self {
            path,
            document,
            geometries: HashMap::new(),
            materials: HashMap::new(),
            default_material: None,
            textures: TextureCache::new(),
            sub_loaders: HashMap::new(),
            scene_graph: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    /// Build (once) and return the document's default scene.
    pub fn scene_graph(&mut self, session: &mut LoadSession<'_, F>) -> LoadResult<F::Node> {
        if let Some(node) = &self.scene_graph {
            log::debug!("Reusing scene graph of {}", self.path.display());
            return Ok(node.clone());
        }

        if !session.loading.insert(self.path.clone()) {
            return Err(ImportError::CyclicReference(self.path.clone()));
        }
        let path = self.path.clone();
        let result = SceneGraphBuilder::new(self, session).build_default_scene();
        session.loading.remove(&path);

        let node = result?;
        self.scene_graph = Some(node.clone());
        Ok(node)
    }

    /// The loader for `file`, resolved relative to this document, opened on first use.
    pub fn sub_loader(
        &mut self,
        session: &mut LoadSession<'_, F>,
        file: &str,
    ) -> LoadResult<&mut DocumentLoader<F>> {
        let path = resolve_relative(&self.path, file);
        match self.sub_loaders.entry(path) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let loader = DocumentLoader::open(session, entry.key())?;
                Ok(entry.insert(loader))
            }
        }
    }

    /// Imported batches of geometry `id`, or `None` if the library lacks it.
    pub fn geometry(
        &mut self,
        session: &mut LoadSession<'_, F>,
        id: &str,
    ) -> Option<Rc<ImportedGeometry<F::Geometry>>> {
        if let Some(imported) = self.geometries.get(id) {
            return Some(Rc::clone(imported));
        }

        let geometry = self.document.geometry(id)?;
        let imported = Rc::new(GeometryImporter::new(session.options).import(geometry, session.factory));
        self.geometries.insert(id.to_string(), Rc::clone(&imported));
        Some(imported)
    }

    /// Material handle for material `id`, or `None` if it (or its effect)
    /// is not in the document.
    pub fn material(&mut self, session: &mut LoadSession<'_, F>, id: &str) -> Option<F::Material> {
        if let Some(handle) = self.materials.get(id) {
            return Some(handle.clone());
        }

        let document = Arc::clone(&self.document);
        let material = document.material(id)?;
        let effect_id = DaeUrl::parse(&material.instance_effect).id;
        let Some(effect) = document.effect(&effect_id) else {
            log::warn!("Material '{}' instances unknown effect '{}'", id, effect_id);
            return None;
        };

        let parameters = resolve_effect(effect);
        let texture_path = match parameters.image_id.as_deref() {
            Some(image_id) => self
                .textures
                .resolve(&document, &self.path, image_id, session.factory),
            None => None,
        };

        let descriptor = parameters.into_descriptor(texture_path);
        log::debug!("Creating material '{}': {:?}", id, descriptor);
        let handle = session.factory.create_material(&descriptor);
        self.materials.insert(id.to_string(), handle.clone());
        Some(handle)
    }

    /// The options' default material, created on first use.
    pub fn default_material(&mut self, session: &mut LoadSession<'_, F>) -> F::Material {
        if let Some(handle) = &self.default_material {
            return handle.clone();
        }
        let handle = session.factory.create_material(&session.options.default_material);
        self.default_material = Some(handle.clone());
        handle
    }
}
