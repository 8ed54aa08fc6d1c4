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

use crate::renderer::api::shader::UniformBufferDescriptor;
use crate::renderer::error::ResourceError;
use std::any::Any;

/// A uniform block owned by a [`Shader`], backed by a host-side staging copy.
///
/// The host copy is allocated at reflection time with exactly the byte size
/// the shader declares and is never resized. Writes land in the host copy;
/// [`commit`] uploads it to the GPU.
///
/// [`Shader`]: super::Shader
/// [`commit`]: UniformBuffer::commit
pub trait UniformBuffer: Any + Send + Sync {
    /// Returns the reflected metadata for this uniform block.
    fn descriptor(&self) -> &UniformBufferDescriptor;

    /// Writes raw bytes into the host copy at the given byte offset.
    ///
    /// ## Errors
    /// * `ResourceError::OutOfBounds` - If the write range exceeds the block size.
    fn write_bytes(&self, offset: usize, data: &[u8]) -> Result<(), ResourceError>;

    /// Uploads the host copy to the GPU.
    ///
    /// Must be called after writes for them to be visible to shaders. Calling
    /// it with no pending writes re-uploads the same contents and is harmless.
    fn commit(&self) -> Result<(), ResourceError>;

    /// Returns a reference to the underlying `Any` trait object.
    fn as_any(&self) -> &dyn Any;
}

/// Typed write access for [`UniformBuffer`] trait objects.
///
/// Separate from the object-safe trait so that `dyn UniformBuffer` stays
/// usable while callers still get a typed API.
pub trait UniformBufferExt {
    /// Writes a plain-old-data value into the host copy at the given byte offset.
    ///
    /// ## Errors
    /// * `ResourceError::OutOfBounds` - If the value does not fit at `offset`.
    fn write<T: bytemuck::Pod>(&self, offset: usize, value: &T) -> Result<(), ResourceError>;
}

impl<U: UniformBuffer + ?Sized> UniformBufferExt for U {
    fn write<T: bytemuck::Pod>(&self, offset: usize, value: &T) -> Result<(), ResourceError> {
        self.write_bytes(offset, bytemuck::bytes_of(value))
    }
}
