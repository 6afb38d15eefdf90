//! Plugin surface: exposes the OBJ mesh loader to a [`Host`] by name.

pub mod loader;
pub mod registry;

use corelib::CoreResult;

pub use loader::{MeshLoader, ObjMeshLoader};
pub use registry::{Host, LoaderRegistry};

/// Something that adds capabilities to a [`Host`] when loaded and takes
/// them back when unloaded.
pub trait Plugin {
    fn name(&self) -> &str;

    fn inscribe(&self, host: &mut Host) -> CoreResult<()>;

    fn unscribe(&self, host: &mut Host);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ObjMeshLoaderPlugin;

impl ObjMeshLoaderPlugin {
    pub const NAME: &'static str = "OBJMeshLoaderPlugin";
}

impl Plugin for ObjMeshLoaderPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn inscribe(&self, host: &mut Host) -> CoreResult<()> {
        host.mesh_loaders_mut().add(Box::new(ObjMeshLoader))
    }

    fn unscribe(&self, host: &mut Host) {
        if host.mesh_loaders_mut().remove(ObjMeshLoader::NAME).is_none() {
            log::warn!("{}: '{}' was not registered", Self::NAME, ObjMeshLoader::NAME);
        }
    }
}

static PLUGIN: ObjMeshLoaderPlugin = ObjMeshLoaderPlugin;

/// Plugin entry point.
pub fn plugin_main() -> &'static dyn Plugin {
    &PLUGIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::CoreError;

    #[test]
    fn inscribe_then_unscribe() {
        let plugin = plugin_main();
        assert_eq!(plugin.name(), "OBJMeshLoaderPlugin");

        let mut host = Host::new();
        plugin.inscribe(&mut host).unwrap();
        assert!(host.mesh_loaders().find_by_name("OBJMeshLoader").is_some());

        plugin.unscribe(&mut host);
        assert!(host.mesh_loaders().is_empty());

        // Unloading twice is harmless.
        plugin.unscribe(&mut host);
        assert!(host.mesh_loaders().is_empty());
    }

    #[test]
    fn inscribing_twice_fails() {
        let mut host = Host::new();
        plugin_main().inscribe(&mut host).unwrap();
        let err = plugin_main().inscribe(&mut host).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateLoader(_)));
    }
}
