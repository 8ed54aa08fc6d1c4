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

//! Defines the core architectural traits for the rendering subsystem.
//!
//! This module contains the fundamental contracts that decouple the engine's
//! rendering logic from any specific graphics backend.
//!
//! - [`RenderContext`]: The main interface exposing the GPU pipeline.
//! - [`Texture2D`], [`Buffer`], [`Shader`], [`UniformBuffer`]: GPU resources.
//! - [`RasterizerState`], [`DepthStencilState`], [`PipelineState`]: Pipeline state objects.
//! - [`RenderTarget`], [`Viewport`]: Output surface configuration.
//!
//! Every resource trait extends `Any` so a backend can downcast resources it
//! receives back through bind calls to its own concrete types.

mod buffer;
mod context;
mod pipeline;
mod shader;
mod target;
mod texture;
mod uniform_buffer;

pub use self::buffer::Buffer;
pub use self::context::RenderContext;
pub use self::pipeline::{DepthStencilState, PipelineState, RasterizerState};
pub use self::shader::Shader;
pub use self::target::{RenderTarget, Viewport};
pub use self::texture::Texture2D;
pub use self::uniform_buffer::{UniformBuffer, UniformBufferExt};
