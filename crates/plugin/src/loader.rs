//! Mesh loader capability and the OBJ implementation of it.

use std::path::Path;

use corelib::CoreResult;
use renderer::{Mesh, RenderBackend, upload_mesh};

/// A named way of turning a file into a [`Mesh`].
pub trait MeshLoader {
    /// Unique name used for registration and lookup.
    fn name(&self) -> &str;

    /// File extensions (without the dot) this loader understands.
    fn extensions(&self) -> &[&str];

    /// Load the file at `path` as a mesh called `name`, creating its
    /// buffers through `backend`.
    fn load(&self, name: &str, path: &Path, backend: &mut dyn RenderBackend) -> CoreResult<Mesh>;
}

/// Wavefront OBJ loader: parse, flatten, upload.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjMeshLoader;

impl ObjMeshLoader {
    pub const NAME: &'static str = "OBJMeshLoader";
}

impl MeshLoader for ObjMeshLoader {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn extensions(&self) -> &[&str] {
        &["obj"]
    }

    fn load(&self, name: &str, path: &Path, backend: &mut dyn RenderBackend) -> CoreResult<Mesh> {
        let raw = asset::load_obj_from_path(path, name)?;
        let built = asset::flatten(&raw)?;
        let mesh = upload_mesh(&built, backend)?;
        log::info!(
            "{}: loaded '{}' from {} ({} triangles)",
            Self::NAME,
            name,
            path.display(),
            built.triangle_count()
        );
        Ok(mesh)
    }
}
