//! Buffer-creation interface and an in-memory implementation.

use corelib::CoreResult;

/// What a buffer will be bound as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferRole {
    Vertex,
    Index,
}

/// Opaque buffer id handed out by a [`RenderBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Uploads raw bytes somewhere and returns a handle to them.
pub trait RenderBackend {
    fn create_buffer(
        &mut self,
        role: BufferRole,
        label: &str,
        contents: &[u8],
    ) -> CoreResult<BufferHandle>;
}

/// A buffer recorded by [`MemoryBackend`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredBuffer {
    pub role: BufferRole,
    pub label: String,
    pub contents: Vec<u8>,
}

/// Keeps every requested buffer in memory. Handles are dense indices.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    buffers: Vec<StoredBuffer>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: BufferHandle) -> Option<&StoredBuffer> {
        usize::try_from(handle.0)
            .ok()
            .and_then(|i| self.buffers.get(i))
    }

    pub fn buffers(&self) -> &[StoredBuffer] {
        &self.buffers
    }

    /// Total bytes held across all buffers.
    pub fn total_bytes(&self) -> usize {
        self.buffers.iter().map(|b| b.contents.len()).sum()
    }
}

impl RenderBackend for MemoryBackend {
    fn create_buffer(
        &mut self,
        role: BufferRole,
        label: &str,
        contents: &[u8],
    ) -> CoreResult<BufferHandle> {
        let handle = BufferHandle(self.buffers.len() as u64);
        log::trace!(
            "MemoryBackend: {:?} buffer '{}' ({} bytes) -> {:?}",
            role,
            label,
            contents.len(),
            handle
        );
        self.buffers.push(StoredBuffer {
            role,
            label: label.to_string(),
            contents: contents.to_vec(),
        });
        Ok(handle)
    }
}
