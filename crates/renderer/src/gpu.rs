//! wgpu-backed [`RenderBackend`]: headless device, one GPU buffer per request.

use wgpu::{
    Buffer, BufferUsages, Device, DeviceDescriptor, Features, Instance, InstanceDescriptor,
    Limits, PowerPreference, util::DeviceExt,
};

use corelib::{CoreError, CoreResult};

use crate::backend::{BufferHandle, BufferRole, RenderBackend};

pub struct WgpuBackend {
    device: Device,
    buffers: Vec<Buffer>,
}

impl WgpuBackend {
    /// Create a device without a surface. Blocks until the adapter and
    /// device requests resolve.
    pub fn new_headless() -> CoreResult<Self> {
        pollster::block_on(Self::request())
    }

    async fn request() -> CoreResult<Self> {
        let instance = Instance::new(&InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| CoreError::Backend(format!("No suitable GPU adapter: {e}")))?;

        let info = adapter.get_info();
        log::info!("Using adapter '{}' ({:?})", info.name, info.backend);

        // Buffers are filled at creation, so the queue is never needed.
        let (device, _queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("Mesh Upload Device"),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                ..Default::default()
            })
            .await
            .map_err(|e| CoreError::Backend(format!("request_device failed: {e}")))?;

        Ok(Self {
            device,
            buffers: Vec::new(),
        })
    }

    pub fn buffer(&self, handle: BufferHandle) -> Option<&Buffer> {
        usize::try_from(handle.0)
            .ok()
            .and_then(|i| self.buffers.get(i))
    }
}

impl RenderBackend for WgpuBackend {
    fn create_buffer(
        &mut self,
        role: BufferRole,
        label: &str,
        contents: &[u8],
    ) -> CoreResult<BufferHandle> {
        let usage = match role {
            BufferRole::Vertex => BufferUsages::VERTEX,
            BufferRole::Index => BufferUsages::INDEX,
        };
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            });

        let handle = BufferHandle(self.buffers.len() as u64);
        log::debug!(
            "Uploaded {:?} buffer '{}' ({} bytes) -> {:?}",
            role,
            label,
            contents.len(),
            handle
        );
        self.buffers.push(buffer);
        Ok(handle)
    }
}
