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

use crate::renderer::api::common::ShaderStage;
use crate::renderer::api::shader::{ShaderDescriptor, VertexLayout};
use crate::renderer::traits::UniformBuffer;
use std::any::Any;
use std::sync::Arc;

/// A compiled shader and the interface metadata reflected from it.
///
/// A shader owns one [`UniformBuffer`] per uniform block its source declares.
/// The set is fixed at creation; looking up a name the shader never declared
/// returns `None`.
pub trait Shader: Any + Send + Sync {
    /// Returns the descriptor the shader was created with.
    fn descriptor(&self) -> &ShaderDescriptor;

    /// The pipeline stage this shader was compiled for.
    fn stage(&self) -> ShaderStage;

    /// Looks up a uniform buffer by its block name in the shader source.
    fn uniform_buffer(&self, name: &str) -> Option<Arc<dyn UniformBuffer>>;

    /// Returns every uniform buffer the shader declares.
    fn uniform_buffers(&self) -> Vec<Arc<dyn UniformBuffer>>;

    /// The vertex input layout reflected from the entry point.
    ///
    /// `None` for any stage other than [`ShaderStage::Vertex`].
    fn vertex_layout(&self) -> Option<&VertexLayout>;

    /// Returns a reference to the underlying `Any` trait object.
    fn as_any(&self) -> &dyn Any;
}
