//! GPU-facing mesh object: named vertex buffers, a vertex layout and one
//! submesh per index buffer.

use asset::BuiltMesh;
use corelib::{CoreError, CoreResult};

use crate::backend::{BufferHandle, BufferRole, RenderBackend};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttribFormat {
    Float2,
    Float3,
}

impl AttribFormat {
    pub fn size(self) -> u32 {
        match self {
            AttribFormat::Float2 => 8,
            AttribFormat::Float3 => 12,
        }
    }
}

/// One vertex stream. Each stream lives in its own buffer, so `stride` is
/// also the element size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attrib {
    pub name: String,
    pub format: AttribFormat,
    pub stride: u32,
}

impl Attrib {
    pub fn new(name: impl Into<String>, format: AttribFormat) -> Self {
        Self {
            name: name.into(),
            format,
            stride: format.size(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VertexLayout {
    pub attribs: Vec<Attrib>,
}

impl VertexLayout {
    pub fn find(&self, name: &str) -> Option<&Attrib> {
        self.attribs.iter().find(|a| a.name == name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexElement {
    Uint32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubMesh {
    pub name: String,
    pub index_buffer: BufferHandle,
    pub element: IndexElement,
    pub index_count: u32,
    pub base_index: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mesh {
    pub name: String,
    pub buffers: Vec<(String, BufferHandle)>,
    pub vertex: VertexLayout,
    pub submeshes: Vec<SubMesh>,
}

impl Mesh {
    pub fn buffer(&self, name: &str) -> Option<BufferHandle> {
        self.buffers
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, handle)| handle)
    }
}

/// Request the vertex streams and index buffers of `built` from `backend`
/// and assemble the resulting handles into a [`Mesh`].
///
/// Order of requests: position, texcoord (if present), normal (if present),
/// then one index buffer per submesh in group order.
pub fn upload_mesh(built: &BuiltMesh, backend: &mut dyn RenderBackend) -> CoreResult<Mesh> {
    let mut mesh = Mesh {
        name: built.name.clone(),
        buffers: Vec::new(),
        vertex: VertexLayout::default(),
        submeshes: Vec::with_capacity(built.groups.len()),
    };

    let mut add_stream = |name: &str, format: AttribFormat, bytes: &[u8]| -> CoreResult<()> {
        let handle = backend.create_buffer(BufferRole::Vertex, name, bytes)?;
        mesh.buffers.push((name.to_string(), handle));
        mesh.vertex.attribs.push(Attrib::new(name, format));
        Ok(())
    };

    add_stream(
        "position",
        AttribFormat::Float3,
        bytemuck::cast_slice(&built.positions),
    )?;
    if built.attributes.texcoords {
        add_stream(
            "texcoord",
            AttribFormat::Float2,
            bytemuck::cast_slice(&built.texcoords),
        )?;
    }
    if built.attributes.normals {
        add_stream(
            "normal",
            AttribFormat::Float3,
            bytemuck::cast_slice(&built.normals),
        )?;
    }

    for group in &built.groups {
        let index_count = u32::try_from(group.indices.len())
            .map_err(|_| CoreError::IndexOverflow(group.indices.len()))?;
        let label = format!("{}/{}", built.name, group.name);
        let index_buffer =
            backend.create_buffer(BufferRole::Index, &label, bytemuck::cast_slice(&group.indices))?;
        mesh.submeshes.push(SubMesh {
            name: group.name.clone(),
            index_buffer,
            element: IndexElement::Uint32,
            index_count,
            base_index: 0,
        });
    }

    log::info!(
        "Mesh '{}': {} vertices, {} stream(s), {} submesh(es)",
        mesh.name,
        built.vertex_count(),
        mesh.vertex.attribs.len(),
        mesh.submeshes.len()
    );

    Ok(mesh)
}
