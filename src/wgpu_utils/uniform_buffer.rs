use std::mem::size_of;

/// A GPU uniform holding exactly one `Content`
///
/// The last uploaded value is remembered, and writing an equal value again is
/// skipped. Per-frame transform and material syncs rely on this.
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    uploaded: Option<Content>,
}

impl<Content: bytemuck::Pod + PartialEq> UniformBuffer<Content> {
    pub fn new(device: &wgpu::Device, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: size_of::<Content>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            uploaded: None,
        }
    }

    /// Queues a write of `content`; returns false if it was already uploaded
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) -> bool {
        if self.uploaded.as_ref() == Some(&content) {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&content));
        self.uploaded = Some(content);
        true
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}
