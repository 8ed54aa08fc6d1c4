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

use crate::math::LinearRgba;
use crate::platform::window::SurfaceHandle;
use crate::renderer::api::*;
use crate::renderer::error::{ContextError, RenderError, ResourceError};
use crate::renderer::traits::{
    Buffer, DepthStencilState, PipelineState, RasterizerState, RenderTarget, Shader, Texture2D,
    UniformBuffer, Viewport,
};
use std::any::Any;
use std::sync::Arc;

/// An interface to expose the functionality of the GPU pipeline.
///
/// A context is created empty and brought up in two steps: [`create_device`]
/// and then [`create_swapchain`]. Resource creation requires a device; draws
/// and presentation additionally require a swapchain.
///
/// Binding methods stage state for the next draw and never fail; structural
/// problems with the accumulated state (a missing vertex shader, an unbound
/// uniform) surface as errors from [`draw`] and [`draw_indexed`]. The context
/// is single-threaded: one frame is built and presented at a time.
///
/// [`create_device`]: RenderContext::create_device
/// [`create_swapchain`]: RenderContext::create_swapchain
/// [`draw`]: RenderContext::draw
/// [`draw_indexed`]: RenderContext::draw_indexed
pub trait RenderContext: Any {
    /// Creates the graphics device.
    ///
    /// ## Arguments
    /// * `descriptor` - The resolution and presentation format to initialize with.
    ///
    /// ## Errors
    /// * `ContextError::DeviceAlreadyCreated` - If a device already exists. The
    ///   stored descriptor is left untouched in that case.
    /// * `ContextError::NoSuitableAdapter` - If no compatible adapter is found.
    /// * `ContextError::DeviceRequestFailed` - If the adapter refuses the request.
    fn create_device(&mut self, descriptor: &DeviceDescriptor) -> Result<(), ContextError>;

    /// Creates the swapchain used for presentation.
    ///
    /// ## Arguments
    /// * `descriptor` - The swapchain texture configuration.
    /// * `window` - The window to present into. The context keeps the handle
    ///   alive for as long as the swapchain exists.
    ///
    /// ## Errors
    /// * `ContextError::DeviceNotCreated` - If called before [`RenderContext::create_device`].
    /// * `ContextError::SwapchainAlreadyCreated` - If a swapchain already exists.
    /// * `ContextError::SurfaceCreationFailed` - If the window cannot back a surface.
    fn create_swapchain(
        &mut self,
        descriptor: &SwapchainDescriptor,
        window: SurfaceHandle,
    ) -> Result<(), ContextError>;

    /// Creates a 2D texture, optionally filled with initial data.
    ///
    /// ## Arguments
    /// * `descriptor` - The texture configuration.
    /// * `initial_data` - One tightly-packed pixel slice per layer. `None`
    ///   leaves the contents uninitialized. A [`TextureKind::Cubemap`] requires
    ///   exactly six slices; anything else is rejected.
    ///
    /// ## Errors
    /// * `ResourceError::InvalidDescriptor` - If the data layout does not match the kind.
    /// * `ResourceError::CreationFailed` - If the backend rejects the texture.
    fn create_texture_2d(
        &self,
        descriptor: &Texture2DDescriptor,
        initial_data: Option<&[&[u8]]>,
    ) -> Result<Box<dyn Texture2D>, ResourceError>;

    /// Creates a depth texture sized by the descriptor.
    ///
    /// The descriptor's format must be a depth format.
    fn create_depth_2d(
        &self,
        descriptor: &Texture2DDescriptor,
    ) -> Result<Box<dyn Texture2D>, ResourceError>;

    /// Creates a GPU buffer, optionally filled with initial data.
    ///
    /// Vertex buffers honor the descriptor's usage and access fields; index
    /// buffers are always GPU-resident and writable, regardless of the
    /// descriptor.
    ///
    /// ## Arguments
    /// * `descriptor` - The buffer configuration. The byte size is
    ///   `count * stride`.
    /// * `initial_data` - Initial contents, at most `byte_size` bytes.
    fn create_buffer(
        &self,
        descriptor: &BufferDescriptor,
        initial_data: Option<&[u8]>,
    ) -> Result<Box<dyn Buffer>, ResourceError>;

    /// Compiles a shader from source and reflects its interface.
    ///
    /// On success the shader owns one [`UniformBuffer`] per uniform block in
    /// the source, and vertex shaders carry their reflected input layout.
    /// A reflection failure is reported exactly like a compilation failure;
    /// no shader object is produced.
    ///
    /// ## Arguments
    /// * `descriptor` - The stage and entry point to compile for.
    /// * `source` - The shader source text.
    ///
    /// ## Errors
    /// * `ResourceError::Shader` - For compile, reflection, entry point, and
    ///   unsupported-stage failures.
    fn create_shader(
        &self,
        descriptor: &ShaderDescriptor,
        source: &str,
    ) -> Result<Arc<dyn Shader>, ResourceError>;

    /// Creates a viewport. Never fails; a viewport is plain state.
    fn create_viewport(&self, descriptor: &ViewportDescriptor) -> Box<dyn Viewport>;

    /// Creates a render target that draws into the given texture.
    ///
    /// ## Errors
    /// * `ResourceError::InvalidDescriptor` - If the texture was not created
    ///   as a render target.
    /// * `ResourceError::BackendMismatch` - If the texture belongs to another backend.
    fn create_render_target(
        &self,
        texture: &dyn Texture2D,
    ) -> Result<Box<dyn RenderTarget>, ResourceError>;

    /// Groups shaders and rasterizer state into a single bindable unit.
    ///
    /// Pure aggregation; never fails.
    fn create_pipeline_state(&self, descriptor: PipelineStateDescriptor) -> Box<dyn PipelineState>;

    /// Creates a rasterizer state object from the descriptor.
    fn create_rasterizer_state(
        &self,
        descriptor: &RasterizerStateDescriptor,
    ) -> Result<Arc<dyn RasterizerState>, ResourceError>;

    /// Creates a depth/stencil state object from the descriptor.
    fn create_depth_stencil_state(
        &self,
        descriptor: &DepthStencilStateDescriptor,
    ) -> Result<Box<dyn DepthStencilState>, ResourceError>;

    /// Binds a shader to its stage. A vertex shader also applies its input layout.
    fn bind_shader(&mut self, shader: &dyn Shader);

    /// Binds a rasterizer state.
    fn bind_rasterizer_state(&mut self, state: &dyn RasterizerState);

    /// Binds a depth/stencil state.
    fn bind_depth_stencil_state(&mut self, state: &dyn DepthStencilState);

    /// Binds every member of a pipeline state in a fixed order:
    /// rasterizer state, vertex, pixel, geometry, then compute shader.
    fn bind_pipeline_state(&mut self, state: &dyn PipelineState);

    /// Binds a texture for pixel shader sampling, or unbinds the slot with `None`.
    fn bind_texture(&mut self, slot: u32, texture: Option<&dyn Texture2D>);

    /// Binds a vertex or index buffer.
    ///
    /// Dispatch happens on the buffer's kind: vertex buffers bind at `slot`
    /// with their creation stride, index buffers always bind as 32-bit
    /// indices and ignore `slot`. The `stage` parameter is accepted for all
    /// kinds and currently ignored.
    fn bind_buffer(&mut self, buffer: &dyn Buffer, slot: u32, stage: BindStage);

    /// Binds a uniform buffer at its reflected slot for the given stage.
    ///
    /// Binding for [`BindStage::Geometry`] is a no-op on this backend family.
    fn bind_uniform_buffer(&mut self, uniform_buffer: &dyn UniformBuffer, stage: BindStage);

    /// Binds a render target and an optional depth/stencil texture.
    fn bind_render_target(
        &mut self,
        render_target: &dyn RenderTarget,
        depth_stencil: Option<&dyn Texture2D>,
    );

    /// Clears a render target to the given color.
    fn clear(&mut self, render_target: &dyn RenderTarget, color: LinearRgba)
        -> Result<(), RenderError>;

    /// Clears a depth texture to depth `1.0` and stencil `0`.
    fn clear_depth(&mut self, depth_texture: &dyn Texture2D) -> Result<(), RenderError>;

    /// Returns the swapchain's back buffer as a texture.
    ///
    /// The returned handle stays valid across frames; the backend resolves it
    /// to the current frame's image internally.
    ///
    /// ## Errors
    /// * `RenderError::Context` - If no swapchain exists.
    fn back_buffer(&mut self) -> Result<Arc<dyn Texture2D>, RenderError>;

    /// Draws `vertex_count` vertices from the bound vertex buffer.
    ///
    /// ## Errors
    /// * `RenderError::MissingRenderTarget` / `MissingVertexShader` - If the
    ///   accumulated bind state is structurally incomplete.
    /// * `RenderError::UniformNotBound` / `TextureNotBound` - If the bound
    ///   shaders declare resources that were never bound.
    fn draw(&mut self, vertex_count: u32, start_offset: u32) -> Result<(), RenderError>;

    /// Draws `index_count` indices from the bound index buffer.
    ///
    /// Shares the bind-state requirements of [`RenderContext::draw`].
    fn draw_indexed(&mut self, index_count: u32, start_offset: u32) -> Result<(), RenderError>;

    /// Presents the frame.
    ///
    /// ## Arguments
    /// * `vsync` - If `true`, presentation waits for the vertical blank.
    fn present(&mut self, vsync: bool) -> Result<(), RenderError>;

    /// Applies a viewport's dimensions and depth range to subsequent draws.
    fn set_viewport(&mut self, viewport: &dyn Viewport);

    /// Applies a scissor rectangle to subsequent draws.
    fn set_scissor(&mut self, rect: Rect);

    /// Returns the descriptor the device was created with, unmodified.
    ///
    /// `None` until [`RenderContext::create_device`] succeeds.
    fn device_descriptor(&self) -> Option<&DeviceDescriptor>;

    /// Returns information about the adapter backing the device.
    fn adapter_info(&self) -> Option<&RendererAdapterInfo>;

    /// Returns a reference to the underlying `Any` trait object.
    fn as_any(&self) -> &dyn Any;
}
