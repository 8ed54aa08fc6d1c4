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

//! Defines data structures related to GPU buffer resources.

use super::common::{CpuAccessFlags, ResourceUsage};
use std::borrow::Cow;

/// The role a buffer plays when bound to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferKind {
    /// Holds per-vertex data consumed by the vertex shader.
    #[default]
    Vertex,
    /// Holds 32-bit indices for indexed draws.
    Index,
    /// Holds constant data. Buffers of this kind are not bindable through
    /// `bind_buffer`; uniform data flows through shader-owned uniform buffers.
    Constant,
}

/// A descriptor used to create a GPU buffer.
///
/// The descriptor is copied into the buffer at creation. Mutating the
/// original afterwards does not affect the created resource.
#[derive(Debug, Clone)]
pub struct BufferDescriptor {
    /// An optional debug label for the buffer.
    pub label: Option<Cow<'static, str>>,
    /// The role the buffer plays in the pipeline.
    pub kind: BufferKind,
    /// The number of elements in the buffer.
    pub count: u32,
    /// The size of a single element in bytes.
    pub stride: u32,
    /// A hint describing how often the contents change.
    pub usage: ResourceUsage,
    /// The CPU's access rights to the buffer.
    pub access: CpuAccessFlags,
}

impl BufferDescriptor {
    /// The total size of the buffer in bytes (`count * stride`).
    pub fn byte_size(&self) -> u64 {
        self.count as u64 * self.stride as u64
    }
}

impl Default for BufferDescriptor {
    fn default() -> Self {
        Self {
            label: None,
            kind: BufferKind::Vertex,
            count: 0,
            stride: 1,
            usage: ResourceUsage::Default,
            access: CpuAccessFlags::NONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_size_is_count_times_stride() {
        let desc = BufferDescriptor {
            kind: BufferKind::Vertex,
            count: 3,
            stride: 20,
            ..Default::default()
        };
        assert_eq!(desc.byte_size(), 60);
    }

    #[test]
    fn byte_size_does_not_overflow_u32() {
        let desc = BufferDescriptor {
            count: u32::MAX,
            stride: 16,
            ..Default::default()
        };
        assert_eq!(desc.byte_size(), u32::MAX as u64 * 16);
    }

    #[test]
    fn default_descriptor_is_empty_vertex_buffer() {
        let desc = BufferDescriptor::default();
        assert_eq!(desc.kind, BufferKind::Vertex);
        assert_eq!(desc.count, 0);
        assert_eq!(desc.stride, 1);
        assert_eq!(desc.byte_size(), 0);
        assert!(desc.access.is_empty());
    }
}
