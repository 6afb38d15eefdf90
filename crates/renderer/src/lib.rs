//! Renderer side of mesh loading: the buffer-creation collaborator and the
//! assembly of a [`BuiltMesh`](asset::BuiltMesh) into a drawable [`Mesh`].
//! Handles returned by a backend are opaque to everything above it.

pub mod backend;
pub mod gpu;
pub mod mesh;

pub use backend::{BufferHandle, BufferRole, MemoryBackend, RenderBackend, StoredBuffer};
pub use gpu::WgpuBackend;
pub use mesh::{Attrib, AttribFormat, IndexElement, Mesh, SubMesh, VertexLayout, upload_mesh};
