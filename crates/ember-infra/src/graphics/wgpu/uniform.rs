// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use ember_core::renderer::api::UniformBufferDescriptor;
use ember_core::renderer::error::ResourceError;
use ember_core::renderer::traits::UniformBuffer;
use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

static NEXT_UNIFORM_ID: AtomicU64 = AtomicU64::new(1);

/// A uniform block reflected from a shader, with a CPU shadow copy.
///
/// Writes land in the shadow; [`UniformBuffer::commit`] flushes the whole
/// block to the GPU in one transfer. The shadow keeps partial updates cheap
/// and makes a commit idempotent between writes.
#[derive(Debug)]
pub struct WgpuUniformBuffer {
    id: u64,
    descriptor: UniformBufferDescriptor,
    queue: wgpu::Queue,
    buffer: wgpu::Buffer,
    shadow: Mutex<Box<[u8]>>,
}

impl WgpuUniformBuffer {
    pub(crate) fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        descriptor: UniformBufferDescriptor,
    ) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&descriptor.name),
            size: descriptor.size as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::info!(
            "WgpuUniformBuffer: Created uniform block '{}' ({} bytes, binding {})",
            descriptor.name,
            descriptor.size,
            descriptor.binding,
        );

        let shadow = vec![0u8; descriptor.size as usize].into_boxed_slice();
        Self {
            id: NEXT_UNIFORM_ID.fetch_add(1, Ordering::Relaxed),
            descriptor,
            queue: queue.clone(),
            buffer,
            shadow: Mutex::new(shadow),
        }
    }

    /// A process-unique identity, used to detect two distinct blocks bound
    /// to the same shader binding.
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn wgpu_buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// The `@binding` index the block was declared with.
    pub(crate) fn binding(&self) -> u32 {
        self.descriptor.binding
    }
}

impl UniformBuffer for WgpuUniformBuffer {
    fn descriptor(&self) -> &UniformBufferDescriptor {
        &self.descriptor
    }

    fn write_bytes(&self, offset: usize, data: &[u8]) -> Result<(), ResourceError> {
        let mut shadow = self.shadow.lock().unwrap();
        let end = offset + data.len();
        if end > shadow.len() {
            return Err(ResourceError::OutOfBounds {
                offset,
                len: data.len(),
                capacity: shadow.len(),
            });
        }
        shadow[offset..end].copy_from_slice(data);
        Ok(())
    }

    fn commit(&self) -> Result<(), ResourceError> {
        let shadow = self.shadow.lock().unwrap();
        self.queue.write_buffer(&self.buffer, 0, &shadow);
        log::debug!(
            "WgpuUniformBuffer: Committed {} bytes to '{}'",
            shadow.len(),
            self.descriptor.name,
        );
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
