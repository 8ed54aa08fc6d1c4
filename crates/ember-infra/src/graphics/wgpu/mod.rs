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

//! The `wgpu` rendering backend.
//!
//! [`WgpuRenderContext`] is the entry point; the remaining modules hold the
//! concrete resource types it hands out through the `ember-core` traits and
//! the conversion helpers between engine enums and `wgpu` enums.

mod buffer;
mod context;
mod conversions;
mod pipeline;
mod shader;
mod target;
mod texture;
mod uniform;

pub use self::buffer::WgpuBuffer;
pub use self::context::WgpuRenderContext;
pub use self::pipeline::{WgpuDepthStencilState, WgpuPipelineState, WgpuRasterizerState};
pub use self::shader::WgpuShader;
pub use self::target::{WgpuRenderTarget, WgpuViewport};
pub use self::texture::WgpuTexture2D;
pub use self::uniform::WgpuUniformBuffer;
