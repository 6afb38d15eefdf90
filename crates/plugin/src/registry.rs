//! Name-keyed collection of mesh loaders, and the host that owns it.

use std::path::Path;

use corelib::{CoreError, CoreResult};
use renderer::{Mesh, RenderBackend};

use crate::loader::MeshLoader;

/// Registered mesh loaders, in registration order.
#[derive(Default)]
pub struct LoaderRegistry {
    loaders: Vec<Box<dyn MeshLoader>>,
}

impl LoaderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loader. Names must be unique.
    pub fn add(&mut self, loader: Box<dyn MeshLoader>) -> CoreResult<()> {
        if self.find_by_name(loader.name()).is_some() {
            return Err(CoreError::DuplicateLoader(loader.name().to_string()));
        }
        log::info!("Registered mesh loader '{}'", loader.name());
        self.loaders.push(loader);
        Ok(())
    }

    /// Unregister the loader called `name`, handing it back if it existed.
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn MeshLoader>> {
        let pos = self.loaders.iter().position(|l| l.name() == name)?;
        log::info!("Unregistered mesh loader '{}'", name);
        Some(self.loaders.remove(pos))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&dyn MeshLoader> {
        self.loaders
            .iter()
            .find(|l| l.name() == name)
            .map(|l| l.as_ref())
    }

    /// Find a loader by file extension (without the dot, any case).
    pub fn find_by_extension(&self, ext: &str) -> Option<&dyn MeshLoader> {
        self.loaders
            .iter()
            .find(|l| l.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .map(|l| l.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.loaders.iter().map(|l| l.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

/// Host runtime state that plugins register into.
#[derive(Default)]
pub struct Host {
    mesh_loaders: LoaderRegistry,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh_loaders(&self) -> &LoaderRegistry {
        &self.mesh_loaders
    }

    pub fn mesh_loaders_mut(&mut self) -> &mut LoaderRegistry {
        &mut self.mesh_loaders
    }

    /// Load `path` with whichever registered loader claims its extension.
    pub fn load_mesh(
        &self,
        name: &str,
        path: &Path,
        backend: &mut dyn RenderBackend,
    ) -> CoreResult<Mesh> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let loader = self
            .mesh_loaders
            .find_by_extension(ext)
            .ok_or_else(|| CoreError::NoLoader(path.display().to_string()))?;
        log::debug!("Loading '{}' with {}", path.display(), loader.name());
        loader.load(name, path, backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::ObjMeshLoader;
    use renderer::MemoryBackend;

    struct StubLoader;

    impl MeshLoader for StubLoader {
        fn name(&self) -> &str {
            "StubLoader"
        }

        fn extensions(&self) -> &[&str] {
            &["stub", "stb"]
        }

        fn load(&self, name: &str, _: &Path, _: &mut dyn RenderBackend) -> CoreResult<Mesh> {
            Err(CoreError::Backend(format!("stub cannot load {name}")))
        }
    }

    #[test]
    fn add_find_remove() {
        let mut registry = LoaderRegistry::new();
        assert!(registry.is_empty());
        registry.add(Box::new(ObjMeshLoader)).unwrap();
        registry.add(Box::new(StubLoader)).unwrap();

        assert_eq!(registry.names(), ["OBJMeshLoader", "StubLoader"]);
        assert_eq!(
            registry.find_by_extension("OBJ").map(|l| l.name()),
            Some("OBJMeshLoader")
        );
        assert_eq!(
            registry.find_by_extension("stb").map(|l| l.name()),
            Some("StubLoader")
        );
        assert!(registry.find_by_extension("fbx").is_none());

        let removed = registry.remove("OBJMeshLoader").unwrap();
        assert_eq!(removed.name(), "OBJMeshLoader");
        assert!(registry.find_by_name("OBJMeshLoader").is_none());
        assert!(registry.remove("OBJMeshLoader").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = LoaderRegistry::new();
        registry.add(Box::new(ObjMeshLoader)).unwrap();
        let err = registry.add(Box::new(ObjMeshLoader)).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateLoader(name) if name == "OBJMeshLoader"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn host_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.OBJ");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let mut host = Host::new();
        host.mesh_loaders_mut().add(Box::new(ObjMeshLoader)).unwrap();

        let mut backend = MemoryBackend::new();
        let mesh = host.load_mesh("tri", &path, &mut backend).unwrap();
        assert_eq!(mesh.submeshes.len(), 1);

        let err = host
            .load_mesh("x", Path::new("scene.fbx"), &mut backend)
            .unwrap_err();
        assert!(matches!(err, CoreError::NoLoader(_)));
    }
}
