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

use crate::renderer::api::buffer::BufferDescriptor;
use crate::renderer::error::ResourceError;
use std::any::Any;

/// A GPU buffer resource owned by a render context.
///
/// It must also implement `Any` to allow for downcasting within
/// backend-specific implementations of the [`RenderContext`].
///
/// [`RenderContext`]: super::RenderContext
pub trait Buffer: Any + Send + Sync {
    /// Returns the descriptor the buffer was created with.
    fn descriptor(&self) -> &BufferDescriptor;

    /// The total size of the buffer in bytes.
    fn byte_size(&self) -> u64;

    /// Replaces the buffer contents from the start, discarding what was there.
    ///
    /// The previous contents become undefined in their entirety, including any
    /// range beyond `data.len()`. Use this for per-frame rewrites where
    /// nothing from the previous frame must survive.
    ///
    /// ## Errors
    /// * `ResourceError::OutOfBounds` - If `data` is larger than the buffer.
    fn set_data(&self, data: &[u8]) -> Result<(), ResourceError>;

    /// Writes `data` at `offset` without touching the rest of the buffer.
    ///
    /// The caller promises not to overwrite any region the GPU may still be
    /// reading this frame; only the written range changes.
    ///
    /// ## Errors
    /// * `ResourceError::OutOfBounds` - If the write range exceeds the buffer.
    fn set_data_at_offset(&self, offset: u64, data: &[u8]) -> Result<(), ResourceError>;

    /// Returns a reference to the underlying `Any` trait object.
    fn as_any(&self) -> &dyn Any;
}
