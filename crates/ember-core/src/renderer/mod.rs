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

//! Provides the public, backend-agnostic rendering contracts for the Ember Engine.
//!
//! This module defines the "common language" for all rendering operations. It
//! contains the abstract `traits` (like [`RenderContext`]), descriptor data
//! structures (like [`BufferDescriptor`]), and error types that form the stable,
//! public-facing API for rendering.
//!
//! This module defines the 'what' of rendering, while the 'how' is handled by a
//! concrete backend implementation in the `ember-infra` crate (a WGPU backend)
//! which implements these traits. Application code composes a context against
//! these traits without needing to know the specifics of the underlying
//! graphics API.

pub mod api;
pub mod error;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::{ContextError, RenderError, ResourceError, ShaderError};
pub use self::traits::{
    Buffer, DepthStencilState, PipelineState, RasterizerState, RenderContext, RenderTarget, Shader,
    Texture2D, UniformBuffer, UniformBufferExt, Viewport,
};
