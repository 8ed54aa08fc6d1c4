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

use crate::renderer::api::texture::Texture2DDescriptor;
use crate::renderer::error::ResourceError;
use std::any::Any;

/// A 2D texture resource owned by a render context.
///
/// It must also implement `Any` to allow for downcasting within
/// backend-specific implementations of the [`RenderContext`].
///
/// [`RenderContext`]: super::RenderContext
pub trait Texture2D: Any + Send + Sync {
    /// Returns the descriptor the texture was created with.
    fn descriptor(&self) -> &Texture2DDescriptor;

    /// The width of the texture in pixels.
    fn width(&self) -> u32 {
        self.descriptor().width
    }

    /// The height of the texture in pixels.
    fn height(&self) -> u32 {
        self.descriptor().height
    }

    /// Replaces the texture contents with `data`, tightly packed rows.
    ///
    /// Only plain sampled textures accept uploads after creation.
    ///
    /// ## Errors
    /// * `ResourceError::InvalidDescriptor` - If the texture is a depth
    ///   texture or was created as a render target.
    /// * `ResourceError::SizeMismatch` - If `data` does not cover the full
    ///   texture.
    fn set_data(&self, data: &[u8]) -> Result<(), ResourceError>;

    /// Returns a reference to the underlying `Any` trait object.
    fn as_any(&self) -> &dyn Any;
}
