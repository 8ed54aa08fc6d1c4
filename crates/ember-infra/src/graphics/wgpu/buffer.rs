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

use ember_core::renderer::api::{BufferDescriptor, ResourceUsage};
use ember_core::renderer::error::ResourceError;
use ember_core::renderer::traits::Buffer;
use std::any::Any;
use wgpu::util::DeviceExt;

use super::conversions::buffer_usages;

/// A vertex, index or constant buffer backed by a `wgpu::Buffer`.
#[derive(Debug)]
pub struct WgpuBuffer {
    descriptor: BufferDescriptor,
    queue: wgpu::Queue,
    buffer: wgpu::Buffer,
    byte_size: u64,
}

impl WgpuBuffer {
    pub(crate) fn create(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        descriptor: &BufferDescriptor,
        initial_data: Option<&[u8]>,
    ) -> Result<Self, ResourceError> {
        let byte_size = descriptor.byte_size();
        if byte_size == 0 {
            return Err(ResourceError::InvalidDescriptor(
                "buffer byte size must be non-zero".into(),
            ));
        }
        if descriptor.usage == ResourceUsage::Immutable && initial_data.is_none() {
            return Err(ResourceError::InvalidDescriptor(
                "immutable buffers require initial data".into(),
            ));
        }
        if let Some(data) = initial_data {
            if data.len() as u64 > byte_size {
                return Err(ResourceError::OutOfBounds {
                    offset: 0,
                    len: data.len(),
                    capacity: byte_size as usize,
                });
            }
        }

        let usage = buffer_usages(descriptor);
        let buffer = match initial_data {
            Some(data) if data.len() as u64 == byte_size => {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: descriptor.label.as_deref(),
                    contents: data,
                    usage,
                })
            }
            Some(data) => {
                // Partial initial contents. Pad to the full logical size so
                // the driver buffer always matches `byte_size`.
                let mut contents = vec![0u8; byte_size as usize];
                contents[..data.len()].copy_from_slice(data);
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: descriptor.label.as_deref(),
                    contents: &contents,
                    usage,
                })
            }
            None => device.create_buffer(&wgpu::BufferDescriptor {
                label: descriptor.label.as_deref(),
                size: byte_size,
                usage,
                mapped_at_creation: false,
            }),
        };

        log::info!(
            "WgpuBuffer: Created {:?} buffer '{}' ({} bytes)",
            descriptor.kind,
            descriptor.label.as_deref().unwrap_or_default(),
            byte_size,
        );

        Ok(Self {
            descriptor: descriptor.clone(),
            queue: queue.clone(),
            buffer,
            byte_size,
        })
    }

    pub(crate) fn wgpu_buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

impl Buffer for WgpuBuffer {
    fn descriptor(&self) -> &BufferDescriptor {
        &self.descriptor
    }

    fn byte_size(&self) -> u64 {
        self.byte_size
    }

    fn set_data(&self, data: &[u8]) -> Result<(), ResourceError> {
        self.set_data_at_offset(0, data)
    }

    fn set_data_at_offset(&self, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        let end_offset = offset + data.len() as u64;
        if end_offset > self.byte_size {
            return Err(ResourceError::OutOfBounds {
                offset: offset as usize,
                len: data.len(),
                capacity: self.byte_size as usize,
            });
        }
        if data.is_empty() {
            return Ok(());
        }

        self.queue.write_buffer(&self.buffer, offset, data);
        log::debug!(
            "WgpuBuffer: Wrote {} bytes at offset {} to buffer '{}'",
            data.len(),
            offset,
            self.descriptor.label.as_deref().unwrap_or_default(),
        );
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
