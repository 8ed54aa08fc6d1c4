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

use crate::renderer::api::pipeline::{
    DepthStencilStateDescriptor, PipelineStateDescriptor, RasterizerStateDescriptor,
};
use std::any::Any;

/// A rasterizer configuration created by a render context.
pub trait RasterizerState: Any + Send + Sync {
    /// Returns the descriptor the state was created with.
    fn descriptor(&self) -> &RasterizerStateDescriptor;

    /// Returns a reference to the underlying `Any` trait object.
    fn as_any(&self) -> &dyn Any;
}

/// A depth/stencil configuration created by a render context.
pub trait DepthStencilState: Any + Send + Sync {
    /// Returns the descriptor the state was created with.
    fn descriptor(&self) -> &DepthStencilStateDescriptor;

    /// Returns a reference to the underlying `Any` trait object.
    fn as_any(&self) -> &dyn Any;
}

/// A group of shaders and rasterizer state bound to the pipeline as one unit.
///
/// Binding a pipeline state binds each present member in a fixed order:
/// rasterizer state, vertex shader, pixel shader, geometry shader, compute
/// shader. Absent members leave the corresponding pipeline slot untouched.
pub trait PipelineState: Any + Send + Sync {
    /// Returns the descriptor the state was created with.
    fn descriptor(&self) -> &PipelineStateDescriptor;

    /// Returns a reference to the underlying `Any` trait object.
    fn as_any(&self) -> &dyn Any;
}
