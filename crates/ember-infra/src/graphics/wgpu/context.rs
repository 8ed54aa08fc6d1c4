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

//! The `wgpu` implementation of the render context.
//!
//! The context owns the instance, the logical device and the swapchain, and
//! accumulates bind state between draws. Draws translate the accumulated
//! state into a `wgpu` render pass on the fly; pipelines are compiled lazily
//! and cached by the combination of shaders, fixed-function state and
//! attachment formats that defines them.

use ember_core::math::LinearRgba;
use ember_core::platform::window::SurfaceHandle;
use ember_core::renderer::api::*;
use ember_core::renderer::error::{ContextError, RenderError, ResourceError};
use ember_core::renderer::traits::{
    Buffer, DepthStencilState, PipelineState, RasterizerState, RenderContext, RenderTarget,
    Shader, Texture2D, UniformBuffer, Viewport,
};
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wgpu::SurfaceTargetUnsafe;

use super::buffer::WgpuBuffer;
use super::conversions::{from_wgpu_texture_format, present_mode, IntoWgpu};
use super::pipeline::{
    build_depth_stencil_state, build_primitive_state, WgpuDepthStencilState, WgpuPipelineState,
    WgpuRasterizerState,
};
use super::shader::WgpuShader;
use super::target::{WgpuRenderTarget, WgpuViewport};
use super::texture::{BackBufferSlot, WgpuTexture2D};
use super::uniform::WgpuUniformBuffer;

/// The device-level state created by `create_device`.
struct DeviceState {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    /// All sampled textures share one linear clamp sampler, bound next to
    /// each texture in the pass bind group.
    default_sampler: wgpu::Sampler,
    /// The descriptor the device was created with, returned unmodified.
    descriptor: DeviceDescriptor,
    adapter_info: RendererAdapterInfo,
}

/// The presentation state created by `create_swapchain`.
struct SwapchainState {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    /// Keeps the window alive for as long as the surface borrows from it.
    _window: SurfaceHandle,
    /// The frame acquired for the current cycle, if any.
    frame: Option<wgpu::SurfaceTexture>,
    /// Shared with the back-buffer texture and its render targets; holds the
    /// live view of `frame`.
    slot: BackBufferSlot,
    back_buffer: Arc<WgpuTexture2D>,
    vsync: bool,
}

/// The parts of a bound shader a draw needs, cloned out of the shader so the
/// bind survives the caller dropping its handle.
struct BoundShader {
    id: u64,
    module: wgpu::ShaderModule,
    entry_point: String,
    vertex_layout: Option<VertexLayout>,
    texture_slots: Vec<u32>,
    /// Reflected uniform blocks as `(binding, name)` pairs.
    uniform_blocks: Vec<(u32, String)>,
}

impl BoundShader {
    fn from_shader(shader: &WgpuShader) -> Self {
        Self {
            id: shader.id(),
            module: shader.wgpu_module().clone(),
            entry_point: shader.entry_point().to_owned(),
            vertex_layout: shader.vertex_layout().cloned(),
            texture_slots: shader.texture_slots().to_vec(),
            uniform_blocks: shader
                .uniform_blocks()
                .iter()
                .map(|block| (block.binding(), block.descriptor().name.clone()))
                .collect(),
        }
    }
}

struct BoundUniform {
    id: u64,
    buffer: wgpu::Buffer,
}

struct BoundBuffer {
    buffer: wgpu::Buffer,
    stride: u32,
}

struct DepthAttachment {
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    has_stencil: bool,
}

/// Bind state accumulated between draws.
///
/// Uniform bindings are tracked per stage, mirroring the per-stage slot
/// tables of the APIs this interface was shaped after. At draw time the two
/// tables merge into one bind group; a binding populated from both stages
/// must resolve to the same buffer.
#[derive(Default)]
struct PassState {
    vertex_shader: Option<BoundShader>,
    pixel_shader: Option<BoundShader>,
    /// Accepted and held, but never dispatched; the context has no compute
    /// submission path.
    compute_shader: Option<BoundShader>,
    rasterizer: RasterizerStateDescriptor,
    depth_stencil: DepthStencilStateDescriptor,
    vertex_buffer: Option<BoundBuffer>,
    index_buffer: Option<BoundBuffer>,
    vertex_uniforms: HashMap<u32, BoundUniform>,
    pixel_uniforms: HashMap<u32, BoundUniform>,
    textures: HashMap<u32, wgpu::TextureView>,
    render_target: Option<WgpuRenderTarget>,
    depth_target: Option<DepthAttachment>,
}

impl std::fmt::Debug for PassState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassState")
            .field("vertex_shader", &self.vertex_shader.is_some())
            .field("pixel_shader", &self.pixel_shader.is_some())
            .field("compute_shader", &self.compute_shader.is_some())
            .field("render_target", &self.render_target.is_some())
            .field("depth_target", &self.depth_target.is_some())
            .field("uniforms", &(self.vertex_uniforms.len() + self.pixel_uniforms.len()))
            .field("textures", &self.textures.len())
            .finish()
    }
}

/// Everything that makes two draws need distinct `wgpu` pipelines.
///
/// The bind group layouts are a pure function of the shader pair, so the
/// shader ids stand in for them. The vertex stride is part of the key
/// because `wgpu` bakes it into the pipeline while the engine takes it from
/// whichever vertex buffer is bound.
#[derive(Debug, PartialEq, Eq, Hash)]
struct PipelineKey {
    vertex_shader: u64,
    pixel_shader: Option<u64>,
    rasterizer: RasterizerStateDescriptor,
    depth_stencil: DepthStencilStateDescriptor,
    color_format: wgpu::TextureFormat,
    depth_format: Option<wgpu::TextureFormat>,
    vertex_stride: u32,
}

enum DrawCall {
    Arrays { vertex_count: u32, start: u32 },
    Indexed { index_count: u32, start: u32 },
}

/// A [`RenderContext`] backed by `wgpu`.
///
/// Created empty; [`RenderContext::create_device`] and
/// [`RenderContext::create_swapchain`] bring it up. See the trait for the
/// operation contracts.
pub struct WgpuRenderContext {
    instance: wgpu::Instance,
    device_state: Option<DeviceState>,
    swapchain: Option<SwapchainState>,
    pass_state: PassState,
    pipeline_cache: HashMap<PipelineKey, wgpu::RenderPipeline>,
    viewport: Option<ViewportDescriptor>,
    scissor: Option<Rect>,
}

impl WgpuRenderContext {
    /// Creates a context with no device or swapchain.
    pub fn new() -> Self {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::new_without_display_handle());
        log::info!("WgpuRenderContext: Instance created.");

        Self {
            instance,
            device_state: None,
            swapchain: None,
            pass_state: PassState::default(),
            pipeline_cache: HashMap::new(),
            viewport: None,
            scissor: None,
        }
    }

    fn ready_device(&self) -> Result<&DeviceState, ResourceError> {
        self.device_state.as_ref().ok_or_else(|| {
            ResourceError::CreationFailed("no graphics device has been created yet".into())
        })
    }

    /// Acquires the surface frame for this cycle if none is held, retrying
    /// once through a reconfigure when the surface was lost or outdated.
    fn ensure_frame(&mut self) -> Result<(), RenderError> {
        let device_state = self
            .device_state
            .as_ref()
            .ok_or(RenderError::Context(ContextError::DeviceNotCreated))?;
        let state = self
            .swapchain
            .as_mut()
            .ok_or(RenderError::Context(ContextError::SwapchainNotCreated))?;

        if state.frame.is_some() {
            return Ok(());
        }

        let frame = match state.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(frame)
            | wgpu::CurrentSurfaceTexture::Suboptimal(frame) => frame,
            wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated => {
                log::warn!("WgpuRenderContext: Surface lost or outdated, reconfiguring.");
                state.surface.configure(&device_state.device, &state.config);
                match state.surface.get_current_texture() {
                    wgpu::CurrentSurfaceTexture::Success(frame)
                    | wgpu::CurrentSurfaceTexture::Suboptimal(frame) => frame,
                    e => return Err(RenderError::SurfaceAcquisitionFailed(format!("{e:?}"))),
                }
            }
            e => return Err(RenderError::SurfaceAcquisitionFailed(format!("{e:?}"))),
        };

        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("back-buffer-view"),
            ..Default::default()
        });
        *state.slot.lock().unwrap() = Some(view);
        state.frame = Some(frame);
        Ok(())
    }

    fn record_draw(&mut self, call: DrawCall) -> Result<(), RenderError> {
        // --- 1. Resolve the color attachment ---
        let Some(target) = self.pass_state.render_target.clone() else {
            return Err(RenderError::MissingRenderTarget);
        };
        if target.is_back_buffer() && target.resolve_view().is_none() {
            self.ensure_frame()?;
        }
        let Some(view) = target.resolve_view() else {
            return Err(RenderError::SurfaceAcquisitionFailed(
                "the back buffer view is unavailable".into(),
            ));
        };

        let device_state = self
            .device_state
            .as_ref()
            .ok_or(RenderError::Context(ContextError::DeviceNotCreated))?;
        let pass = &self.pass_state;

        // --- 2. Validate the accumulated bind state ---
        let Some(vs) = pass.vertex_shader.as_ref() else {
            return Err(RenderError::MissingVertexShader);
        };
        let ps = pass.pixel_shader.as_ref();

        let needs_vertices = vs
            .vertex_layout
            .as_ref()
            .is_some_and(|layout| !layout.attributes.is_empty());
        if needs_vertices && pass.vertex_buffer.is_none() {
            return Err(RenderError::MissingVertexBuffer);
        }
        if matches!(call, DrawCall::Indexed { .. }) && pass.index_buffer.is_none() {
            return Err(RenderError::MissingIndexBuffer);
        }

        for (binding, name) in &vs.uniform_blocks {
            if !pass.vertex_uniforms.contains_key(binding) {
                return Err(RenderError::UniformNotBound { name: name.clone() });
            }
        }
        if let Some(ps) = ps {
            for (binding, name) in &ps.uniform_blocks {
                if !pass.pixel_uniforms.contains_key(binding) {
                    return Err(RenderError::UniformNotBound { name: name.clone() });
                }
            }
        }

        let pixel_blocks = ps.map(|ps| ps.uniform_blocks.as_slice()).unwrap_or(&[]);
        let bindings = merged_bindings(&vs.uniform_blocks, pixel_blocks);
        for binding in &bindings {
            if let (Some(a), Some(b)) = (
                pass.vertex_uniforms.get(binding),
                pass.pixel_uniforms.get(binding),
            ) {
                if a.id != b.id {
                    return Err(RenderError::ConflictingUniformBinding { binding: *binding });
                }
            }
        }

        let texture_slots = ps.map(|ps| ps.texture_slots.as_slice()).unwrap_or(&[]);
        for slot in texture_slots {
            if !pass.textures.contains_key(slot) {
                return Err(RenderError::TextureNotBound { slot: *slot });
            }
        }

        // --- 3. Fetch or compile the pipeline ---
        let key = PipelineKey {
            vertex_shader: vs.id,
            pixel_shader: ps.map(|ps| ps.id),
            rasterizer: pass.rasterizer,
            depth_stencil: pass.depth_stencil,
            color_format: target.format(),
            depth_format: pass.depth_target.as_ref().map(|depth| depth.format),
            vertex_stride: pass.vertex_buffer.as_ref().map(|vb| vb.stride).unwrap_or(0),
        };
        let pipeline = match self.pipeline_cache.get(&key) {
            Some(pipeline) => pipeline.clone(),
            None => {
                let pipeline = build_render_pipeline(&device_state.device, &key, vs, ps)?;
                log::info!(
                    "WgpuRenderContext: Compiled render pipeline (vs {}, ps {:?}, color {:?})",
                    key.vertex_shader,
                    key.pixel_shader,
                    key.color_format,
                );
                self.pipeline_cache.insert(key, pipeline.clone());
                pipeline
            }
        };

        // --- 4. Build the frame bind groups ---
        let mut uniform_entries = Vec::with_capacity(bindings.len());
        for binding in &bindings {
            // Validated above: every merged binding is bound for at least
            // one stage, and shared bindings agree on the buffer.
            let bound = pass
                .vertex_uniforms
                .get(binding)
                .or_else(|| pass.pixel_uniforms.get(binding));
            if let Some(bound) = bound {
                uniform_entries.push(wgpu::BindGroupEntry {
                    binding: *binding,
                    resource: bound.buffer.as_entire_binding(),
                });
            }
        }
        let uniform_group = device_state
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("uniform-bind-group"),
                layout: &pipeline.get_bind_group_layout(0),
                entries: &uniform_entries,
            });

        let texture_group = if texture_slots.is_empty() {
            None
        } else {
            let mut entries = Vec::with_capacity(texture_slots.len() * 2);
            for slot in texture_slots {
                if let Some(view) = pass.textures.get(slot) {
                    entries.push(wgpu::BindGroupEntry {
                        binding: slot * 2,
                        resource: wgpu::BindingResource::TextureView(view),
                    });
                    entries.push(wgpu::BindGroupEntry {
                        binding: slot * 2 + 1,
                        resource: wgpu::BindingResource::Sampler(&device_state.default_sampler),
                    });
                }
            }
            Some(
                device_state
                    .device
                    .create_bind_group(&wgpu::BindGroupDescriptor {
                        label: Some("texture-bind-group"),
                        layout: &pipeline.get_bind_group_layout(1),
                        entries: &entries,
                    }),
            )
        };

        // --- 5. Record and submit the pass ---
        let mut encoder =
            device_state
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("draw-encoder"),
                });

        {
            let depth_stencil_attachment =
                pass.depth_target
                    .as_ref()
                    .map(|depth| wgpu::RenderPassDepthStencilAttachment {
                        view: &depth.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: depth.has_stencil.then_some(wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        }),
                    });

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("draw-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&pipeline);
            render_pass.set_bind_group(0, &uniform_group, &[]);
            if let Some(group) = &texture_group {
                render_pass.set_bind_group(1, group, &[]);
            }
            if let Some(vertex_buffer) = &pass.vertex_buffer {
                render_pass.set_vertex_buffer(0, vertex_buffer.buffer.slice(..));
            }
            if let DrawCall::Indexed { .. } = call {
                if let Some(index_buffer) = &pass.index_buffer {
                    render_pass
                        .set_index_buffer(index_buffer.buffer.slice(..), wgpu::IndexFormat::Uint32);
                }
            }

            let (target_width, target_height) = target.size();
            if let Some(viewport) = &self.viewport {
                let width = viewport.width.min(target_width);
                let height = viewport.height.min(target_height);
                if width > 0 && height > 0 {
                    render_pass.set_viewport(
                        0.0,
                        0.0,
                        width as f32,
                        height as f32,
                        viewport.min_depth,
                        viewport.max_depth,
                    );
                }
            }
            if pass.rasterizer.scissor_enabled {
                if let Some(rect) = self.scissor {
                    let x = rect.left.min(target_width);
                    let y = rect.top.min(target_height);
                    let width = rect.width().min(target_width - x);
                    let height = rect.height().min(target_height - y);
                    render_pass.set_scissor_rect(x, y, width, height);
                }
            }

            match call {
                DrawCall::Arrays {
                    vertex_count,
                    start,
                } => render_pass.draw(start..start + vertex_count, 0..1),
                DrawCall::Indexed { index_count, start } => {
                    render_pass.draw_indexed(start..start + index_count, 0, 0..1)
                }
            }
        }

        device_state.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }
}

impl Default for WgpuRenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext for WgpuRenderContext {
    fn create_device(&mut self, descriptor: &DeviceDescriptor) -> Result<(), ContextError> {
        if self.device_state.is_some() {
            return Err(ContextError::DeviceAlreadyCreated);
        }

        let (adapter, device, queue) = pollster::block_on(request_device(&self.instance))?;

        device.on_uncaptured_error(Arc::new(|e| {
            log::error!("WgpuRenderContext: Uncaptured device error: {e:?}");
        }));

        let info = adapter.get_info();
        let adapter_info = RendererAdapterInfo {
            name: info.name.clone(),
            backend_type: backend_type(info.backend),
            device_type: device_type(info.device_type),
        };

        let default_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("default-sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        log::info!(
            "WgpuRenderContext: Logical device ready on \"{}\" ({:?}).",
            info.name,
            info.backend,
        );

        self.device_state = Some(DeviceState {
            adapter,
            device,
            queue,
            default_sampler,
            descriptor: *descriptor,
            adapter_info,
        });
        Ok(())
    }

    fn create_swapchain(
        &mut self,
        descriptor: &SwapchainDescriptor,
        window: SurfaceHandle,
    ) -> Result<(), ContextError> {
        let device_state = self
            .device_state
            .as_ref()
            .ok_or(ContextError::DeviceNotCreated)?;
        if self.swapchain.is_some() {
            return Err(ContextError::SwapchainAlreadyCreated);
        }

        // --- 1. Create the surface ---
        let surface = unsafe {
            let target = SurfaceTargetUnsafe::from_window(&window)
                .map_err(|e| ContextError::SurfaceCreationFailed(e.to_string()))?;
            self.instance
                .create_surface_unsafe(target)
                .map_err(|e| ContextError::SurfaceCreationFailed(e.to_string()))?
        };

        // --- 2. Negotiate the format ---
        let caps = surface.get_capabilities(&device_state.adapter);
        if caps.formats.is_empty() {
            return Err(ContextError::SurfaceCreationFailed(
                "the surface reports no compatible formats".into(),
            ));
        }
        let requested = descriptor.format.into_wgpu();
        let format = if caps.formats.contains(&requested) {
            requested
        } else {
            let fallback = caps
                .formats
                .iter()
                .copied()
                .find(|f| f.is_srgb())
                .unwrap_or(caps.formats[0]);
            log::warn!(
                "WgpuRenderContext: Surface does not support {requested:?}, using {fallback:?}.",
            );
            fallback
        };
        let engine_format = from_wgpu_texture_format(format).ok_or_else(|| {
            ContextError::SurfaceCreationFailed(format!(
                "surface format {format:?} has no engine equivalent"
            ))
        })?;

        // --- 3. Configure and expose the back buffer ---
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: descriptor.width.max(1),
            height: descriptor.height.max(1),
            present_mode: present_mode(true),
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device_state.device, &config);

        let slot: BackBufferSlot = Arc::new(Mutex::new(None));
        let back_buffer = Arc::new(WgpuTexture2D::back_buffer(
            Texture2DDescriptor {
                label: Some("back-buffer".into()),
                width: config.width,
                height: config.height,
                format: engine_format,
                kind: TextureKind::Regular,
                usage: ResourceUsage::Default,
                mip_level_count: 1,
                render_target: true,
            },
            device_state.queue.clone(),
            slot.clone(),
        ));

        log::info!(
            "WgpuRenderContext: Swapchain created ({}x{}, {:?}).",
            config.width,
            config.height,
            format,
        );

        self.swapchain = Some(SwapchainState {
            surface,
            config,
            _window: window,
            frame: None,
            slot,
            back_buffer,
            vsync: true,
        });
        Ok(())
    }

    fn create_texture_2d(
        &self,
        descriptor: &Texture2DDescriptor,
        initial_data: Option<&[&[u8]]>,
    ) -> Result<Box<dyn Texture2D>, ResourceError> {
        let state = self.ready_device()?;
        let texture = WgpuTexture2D::create(&state.device, &state.queue, descriptor, initial_data)?;
        Ok(Box::new(texture))
    }

    fn create_depth_2d(
        &self,
        descriptor: &Texture2DDescriptor,
    ) -> Result<Box<dyn Texture2D>, ResourceError> {
        let state = self.ready_device()?;
        let texture = WgpuTexture2D::create_depth(&state.device, &state.queue, descriptor)?;
        Ok(Box::new(texture))
    }

    fn create_buffer(
        &self,
        descriptor: &BufferDescriptor,
        initial_data: Option<&[u8]>,
    ) -> Result<Box<dyn Buffer>, ResourceError> {
        let state = self.ready_device()?;
        let buffer = WgpuBuffer::create(&state.device, &state.queue, descriptor, initial_data)?;
        Ok(Box::new(buffer))
    }

    fn create_shader(
        &self,
        descriptor: &ShaderDescriptor,
        source: &str,
    ) -> Result<Arc<dyn Shader>, ResourceError> {
        let state = self.ready_device()?;
        let shader = WgpuShader::create(&state.device, &state.queue, descriptor, source)?;
        Ok(Arc::new(shader))
    }

    fn create_viewport(&self, descriptor: &ViewportDescriptor) -> Box<dyn Viewport> {
        Box::new(WgpuViewport::new(descriptor))
    }

    fn create_render_target(
        &self,
        texture: &dyn Texture2D,
    ) -> Result<Box<dyn RenderTarget>, ResourceError> {
        let texture = texture
            .as_any()
            .downcast_ref::<WgpuTexture2D>()
            .ok_or(ResourceError::BackendMismatch)?;
        let target = WgpuRenderTarget::for_texture(texture)?;
        Ok(Box::new(target))
    }

    fn create_pipeline_state(&self, descriptor: PipelineStateDescriptor) -> Box<dyn PipelineState> {
        Box::new(WgpuPipelineState::new(descriptor))
    }

    fn create_rasterizer_state(
        &self,
        descriptor: &RasterizerStateDescriptor,
    ) -> Result<Arc<dyn RasterizerState>, ResourceError> {
        self.ready_device()?;
        Ok(Arc::new(WgpuRasterizerState::new(descriptor)))
    }

    fn create_depth_stencil_state(
        &self,
        descriptor: &DepthStencilStateDescriptor,
    ) -> Result<Box<dyn DepthStencilState>, ResourceError> {
        self.ready_device()?;
        Ok(Box::new(WgpuDepthStencilState::new(descriptor)))
    }

    fn bind_shader(&mut self, shader: &dyn Shader) {
        let Some(shader) = shader.as_any().downcast_ref::<WgpuShader>() else {
            log::warn!("WgpuRenderContext: Ignoring shader from another backend.");
            return;
        };
        match shader.stage() {
            ShaderStage::Vertex => {
                self.pass_state.vertex_shader = Some(BoundShader::from_shader(shader));
            }
            ShaderStage::Pixel => {
                self.pass_state.pixel_shader = Some(BoundShader::from_shader(shader));
            }
            ShaderStage::Compute => {
                self.pass_state.compute_shader = Some(BoundShader::from_shader(shader));
            }
            ShaderStage::Geometry => {
                log::warn!("WgpuRenderContext: Geometry shaders are not supported; bind ignored.");
            }
        }
    }

    fn bind_rasterizer_state(&mut self, state: &dyn RasterizerState) {
        self.pass_state.rasterizer = *state.descriptor();
    }

    fn bind_depth_stencil_state(&mut self, state: &dyn DepthStencilState) {
        self.pass_state.depth_stencil = *state.descriptor();
    }

    fn bind_pipeline_state(&mut self, state: &dyn PipelineState) {
        let descriptor = state.descriptor();
        if let Some(rasterizer) = &descriptor.rasterizer_state {
            self.bind_rasterizer_state(rasterizer.as_ref());
        }
        if let Some(shader) = &descriptor.vertex_shader {
            self.bind_shader(shader.as_ref());
        }
        if let Some(shader) = &descriptor.pixel_shader {
            self.bind_shader(shader.as_ref());
        }
        if let Some(shader) = &descriptor.geometry_shader {
            self.bind_shader(shader.as_ref());
        }
        if let Some(shader) = &descriptor.compute_shader {
            self.bind_shader(shader.as_ref());
        }
    }

    fn bind_texture(&mut self, slot: u32, texture: Option<&dyn Texture2D>) {
        let Some(texture) = texture else {
            self.pass_state.textures.remove(&slot);
            return;
        };
        let Some(texture) = texture.as_any().downcast_ref::<WgpuTexture2D>() else {
            log::warn!("WgpuRenderContext: Ignoring texture from another backend (slot {slot}).");
            return;
        };
        let descriptor = texture.descriptor();
        if descriptor.format.is_depth_format() || matches!(descriptor.kind, TextureKind::Cubemap) {
            log::warn!(
                "WgpuRenderContext: Slot {slot} needs a sampleable 2D color texture; bind ignored.",
            );
            return;
        }
        let Some(view) = texture.texture_view() else {
            log::warn!(
                "WgpuRenderContext: The back buffer cannot be sampled; bind ignored (slot {slot}).",
            );
            return;
        };
        self.pass_state.textures.insert(slot, view.clone());
    }

    fn bind_buffer(&mut self, buffer: &dyn Buffer, slot: u32, _stage: BindStage) {
        let Some(buffer) = buffer.as_any().downcast_ref::<WgpuBuffer>() else {
            log::warn!("WgpuRenderContext: Ignoring buffer from another backend.");
            return;
        };
        let descriptor = buffer.descriptor();
        match descriptor.kind {
            BufferKind::Vertex => {
                if slot != 0 {
                    log::warn!(
                        "WgpuRenderContext: Only vertex stream 0 is supported; ignoring slot {slot}.",
                    );
                    return;
                }
                self.pass_state.vertex_buffer = Some(BoundBuffer {
                    buffer: buffer.wgpu_buffer().clone(),
                    stride: descriptor.stride,
                });
            }
            BufferKind::Index => {
                self.pass_state.index_buffer = Some(BoundBuffer {
                    buffer: buffer.wgpu_buffer().clone(),
                    stride: descriptor.stride,
                });
            }
            BufferKind::Constant => {
                log::warn!(
                    "WgpuRenderContext: Constant buffers bind through bind_uniform_buffer; ignored.",
                );
            }
        }
    }

    fn bind_uniform_buffer(&mut self, uniform_buffer: &dyn UniformBuffer, stage: BindStage) {
        let Some(uniform) = uniform_buffer.as_any().downcast_ref::<WgpuUniformBuffer>() else {
            log::warn!("WgpuRenderContext: Ignoring uniform buffer from another backend.");
            return;
        };
        let bound = BoundUniform {
            id: uniform.id(),
            buffer: uniform.wgpu_buffer().clone(),
        };
        match stage {
            BindStage::Vertex => {
                self.pass_state.vertex_uniforms.insert(uniform.binding(), bound);
            }
            BindStage::Pixel => {
                self.pass_state.pixel_uniforms.insert(uniform.binding(), bound);
            }
            BindStage::Geometry => {
                log::debug!("WgpuRenderContext: Geometry-stage uniform bind is a no-op.");
            }
        }
    }

    fn bind_render_target(
        &mut self,
        render_target: &dyn RenderTarget,
        depth_stencil: Option<&dyn Texture2D>,
    ) {
        let Some(target) = render_target.as_any().downcast_ref::<WgpuRenderTarget>() else {
            log::warn!("WgpuRenderContext: Ignoring render target from another backend.");
            return;
        };
        self.pass_state.render_target = Some(target.clone());

        self.pass_state.depth_target = depth_stencil.and_then(|texture| {
            let Some(texture) = texture.as_any().downcast_ref::<WgpuTexture2D>() else {
                log::warn!("WgpuRenderContext: Ignoring depth texture from another backend.");
                return None;
            };
            let descriptor = texture.descriptor();
            if !descriptor.format.is_depth_format() {
                log::warn!(
                    "WgpuRenderContext: {:?} is not a depth format; depth attachment ignored.",
                    descriptor.format,
                );
                return None;
            }
            texture.texture_view().map(|view| DepthAttachment {
                view: view.clone(),
                format: descriptor.format.into_wgpu(),
                has_stencil: descriptor.format.has_stencil(),
            })
        });
    }

    fn clear(
        &mut self,
        render_target: &dyn RenderTarget,
        color: LinearRgba,
    ) -> Result<(), RenderError> {
        let Some(target) = render_target.as_any().downcast_ref::<WgpuRenderTarget>() else {
            return Err(RenderError::Resource(ResourceError::BackendMismatch));
        };
        let target = target.clone();
        if target.is_back_buffer() && target.resolve_view().is_none() {
            self.ensure_frame()?;
        }
        let Some(view) = target.resolve_view() else {
            return Err(RenderError::SurfaceAcquisitionFailed(
                "the back buffer view is unavailable".into(),
            ));
        };
        let device_state = self
            .device_state
            .as_ref()
            .ok_or(RenderError::Context(ContextError::DeviceNotCreated))?;

        let mut encoder =
            device_state
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("clear-encoder"),
                });
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("clear-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color.into_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        device_state.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn clear_depth(&mut self, depth_texture: &dyn Texture2D) -> Result<(), RenderError> {
        let Some(texture) = depth_texture.as_any().downcast_ref::<WgpuTexture2D>() else {
            return Err(RenderError::Resource(ResourceError::BackendMismatch));
        };
        let descriptor = texture.descriptor();
        if !descriptor.format.is_depth_format() {
            return Err(RenderError::Resource(ResourceError::InvalidDescriptor(
                "clear_depth expects a depth texture".into(),
            )));
        }
        let Some(view) = texture.texture_view() else {
            return Err(RenderError::Resource(ResourceError::InvalidDescriptor(
                "the back buffer has no depth contents".into(),
            )));
        };
        let device_state = self
            .device_state
            .as_ref()
            .ok_or(RenderError::Context(ContextError::DeviceNotCreated))?;

        let mut encoder =
            device_state
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("clear-depth-encoder"),
                });
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("clear-depth-pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: descriptor.format.has_stencil().then_some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(0),
                    store: wgpu::StoreOp::Store,
                }),
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        device_state.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn back_buffer(&mut self) -> Result<Arc<dyn Texture2D>, RenderError> {
        self.ensure_frame()?;
        let state = self
            .swapchain
            .as_ref()
            .ok_or(RenderError::Context(ContextError::SwapchainNotCreated))?;
        Ok(state.back_buffer.clone())
    }

    fn draw(&mut self, vertex_count: u32, start_offset: u32) -> Result<(), RenderError> {
        self.record_draw(DrawCall::Arrays {
            vertex_count,
            start: start_offset,
        })
    }

    fn draw_indexed(&mut self, index_count: u32, start_offset: u32) -> Result<(), RenderError> {
        self.record_draw(DrawCall::Indexed {
            index_count,
            start: start_offset,
        })
    }

    fn present(&mut self, vsync: bool) -> Result<(), RenderError> {
        let device_state = self
            .device_state
            .as_ref()
            .ok_or(RenderError::Context(ContextError::DeviceNotCreated))?;
        let state = self
            .swapchain
            .as_mut()
            .ok_or(RenderError::Context(ContextError::SwapchainNotCreated))?;

        if let Some(frame) = state.frame.take() {
            // The back buffer view dies with the frame.
            state.slot.lock().unwrap().take();
            frame.present();
        } else {
            log::debug!("WgpuRenderContext: Present without an acquired frame; nothing to flip.");
        }

        if vsync != state.vsync {
            state.vsync = vsync;
            state.config.present_mode = present_mode(vsync);
            state.surface.configure(&device_state.device, &state.config);
            log::info!("WgpuRenderContext: Present mode changed (vsync {vsync}).");
        }
        Ok(())
    }

    fn set_viewport(&mut self, viewport: &dyn Viewport) {
        self.viewport = Some(*viewport.descriptor());
    }

    fn set_scissor(&mut self, rect: Rect) {
        self.scissor = Some(rect);
    }

    fn device_descriptor(&self) -> Option<&DeviceDescriptor> {
        self.device_state.as_ref().map(|state| &state.descriptor)
    }

    fn adapter_info(&self) -> Option<&RendererAdapterInfo> {
        self.device_state.as_ref().map(|state| &state.adapter_info)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl std::fmt::Debug for WgpuRenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuRenderContext")
            .field("device", &self.device_state.is_some())
            .field("swapchain", &self.swapchain.is_some())
            .field("pass_state", &self.pass_state)
            .field("cached_pipelines", &self.pipeline_cache.len())
            .finish()
    }
}

async fn request_device(
    instance: &wgpu::Instance,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue), ContextError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .map_err(|_| ContextError::NoSuitableAdapter)?;

    // Wireframe fill and depth-clip disable are optional adapter features.
    let optional_features = wgpu::Features::POLYGON_MODE_LINE | wgpu::Features::DEPTH_CLIP_CONTROL;
    let features_to_enable = adapter.features() & optional_features;

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("ember-device"),
            required_features: features_to_enable,
            required_limits: wgpu::Limits::default(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::default(),
        })
        .await
        .map_err(|e| ContextError::DeviceRequestFailed(e.to_string()))?;

    Ok((adapter, device, queue))
}

/// Compiles a pipeline for the key, reporting validation problems as a typed
/// error through an error scope instead of the device error callback.
fn build_render_pipeline(
    device: &wgpu::Device,
    key: &PipelineKey,
    vs: &BoundShader,
    ps: Option<&BoundShader>,
) -> Result<wgpu::RenderPipeline, RenderError> {
    let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    // Group 0 always exists so the texture group can sit at index 1.
    let pixel_blocks = ps.map(|ps| ps.uniform_blocks.as_slice()).unwrap_or(&[]);
    let bindings = merged_bindings(&vs.uniform_blocks, pixel_blocks);
    let uniform_entries: Vec<wgpu::BindGroupLayoutEntry> = bindings
        .iter()
        .map(|binding| wgpu::BindGroupLayoutEntry {
            binding: *binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        })
        .collect();
    let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("uniform-bind-group-layout"),
        entries: &uniform_entries,
    });

    let texture_layout = match ps {
        Some(ps) if !ps.texture_slots.is_empty() => {
            let mut entries = Vec::with_capacity(ps.texture_slots.len() * 2);
            for &slot in &ps.texture_slots {
                entries.push(wgpu::BindGroupLayoutEntry {
                    binding: slot * 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                });
                entries.push(wgpu::BindGroupLayoutEntry {
                    binding: slot * 2 + 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                });
            }
            Some(
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("texture-bind-group-layout"),
                    entries: &entries,
                }),
            )
        }
        _ => None,
    };

    let mut group_layouts: Vec<Option<&wgpu::BindGroupLayout>> = vec![Some(&uniform_layout)];
    if let Some(layout) = &texture_layout {
        group_layouts.push(Some(layout));
    }
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("ember-pipeline-layout"),
        bind_group_layouts: &group_layouts,
        immediate_size: 0,
    });

    let mut attributes: Vec<wgpu::VertexAttribute> = Vec::new();
    if let Some(layout) = &vs.vertex_layout {
        for attribute in &layout.attributes {
            attributes.push(wgpu::VertexAttribute {
                format: attribute.format.into_wgpu(),
                offset: attribute.offset as u64,
                shader_location: attribute.location,
            });
        }
    }
    let vertex_buffers = if attributes.is_empty() {
        Vec::new()
    } else {
        vec![wgpu::VertexBufferLayout {
            array_stride: key.vertex_stride as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &attributes,
        }]
    };

    let color_targets = [Some(wgpu::ColorTargetState {
        format: key.color_format,
        blend: None,
        write_mask: wgpu::ColorWrites::ALL,
    })];
    let fragment = ps.map(|ps| wgpu::FragmentState {
        module: &ps.module,
        entry_point: Some(&ps.entry_point),
        targets: &color_targets,
        compilation_options: Default::default(),
    });

    let depth_stencil = key
        .depth_format
        .map(|format| build_depth_stencil_state(&key.depth_stencil, format, key.rasterizer.depth_bias));

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("ember-render-pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &vs.module,
            entry_point: Some(&vs.entry_point),
            buffers: &vertex_buffers,
            compilation_options: Default::default(),
        },
        fragment,
        primitive: build_primitive_state(&key.rasterizer),
        depth_stencil,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    if let Some(error) = pollster::block_on(error_scope.pop()) {
        return Err(RenderError::PipelineCreationFailed(error.to_string()));
    }
    Ok(pipeline)
}

/// The union of the uniform bindings both stages declare, ascending.
fn merged_bindings(vertex_blocks: &[(u32, String)], pixel_blocks: &[(u32, String)]) -> Vec<u32> {
    let mut bindings: Vec<u32> = vertex_blocks
        .iter()
        .chain(pixel_blocks.iter())
        .map(|(binding, _)| *binding)
        .collect();
    bindings.sort_unstable();
    bindings.dedup();
    bindings
}

fn backend_type(backend: wgpu::Backend) -> GraphicsBackendType {
    match backend {
        wgpu::Backend::Vulkan => GraphicsBackendType::Vulkan,
        wgpu::Backend::Metal => GraphicsBackendType::Metal,
        wgpu::Backend::Dx12 => GraphicsBackendType::Dx12,
        wgpu::Backend::Gl => GraphicsBackendType::OpenGL,
        wgpu::Backend::BrowserWebGpu => GraphicsBackendType::WebGpu,
        _ => GraphicsBackendType::Unknown,
    }
}

fn device_type(device_type: wgpu::DeviceType) -> RendererDeviceType {
    match device_type {
        wgpu::DeviceType::IntegratedGpu => RendererDeviceType::IntegratedGpu,
        wgpu::DeviceType::DiscreteGpu => RendererDeviceType::DiscreteGpu,
        wgpu::DeviceType::VirtualGpu => RendererDeviceType::VirtualGpu,
        wgpu::DeviceType::Cpu => RendererDeviceType::Cpu,
        _ => RendererDeviceType::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_type_conversion() {
        assert_eq!(backend_type(wgpu::Backend::Vulkan), GraphicsBackendType::Vulkan);
        assert_eq!(backend_type(wgpu::Backend::Metal), GraphicsBackendType::Metal);
        assert_eq!(backend_type(wgpu::Backend::Dx12), GraphicsBackendType::Dx12);
        assert_eq!(backend_type(wgpu::Backend::Gl), GraphicsBackendType::OpenGL);
        assert_eq!(
            backend_type(wgpu::Backend::BrowserWebGpu),
            GraphicsBackendType::WebGpu
        );
    }

    #[test]
    fn test_device_type_conversion() {
        assert_eq!(
            device_type(wgpu::DeviceType::DiscreteGpu),
            RendererDeviceType::DiscreteGpu
        );
        assert_eq!(
            device_type(wgpu::DeviceType::IntegratedGpu),
            RendererDeviceType::IntegratedGpu
        );
        assert_eq!(device_type(wgpu::DeviceType::Cpu), RendererDeviceType::Cpu);
        assert_eq!(
            device_type(wgpu::DeviceType::Other),
            RendererDeviceType::Unknown
        );
    }

    #[test]
    fn merged_bindings_dedupe_across_stages() {
        let vertex = vec![(0, "scene".to_string()), (2, "model".to_string())];
        let pixel = vec![(0, "scene".to_string()), (1, "material".to_string())];
        assert_eq!(merged_bindings(&vertex, &pixel), vec![0, 1, 2]);
        assert_eq!(merged_bindings(&[], &[]), Vec::<u32>::new());
    }

    fn key_with_fill_mode(fill_mode: FillMode) -> PipelineKey {
        PipelineKey {
            vertex_shader: 1,
            pixel_shader: Some(2),
            rasterizer: RasterizerStateDescriptor {
                fill_mode,
                ..Default::default()
            },
            depth_stencil: DepthStencilStateDescriptor::default(),
            color_format: wgpu::TextureFormat::Bgra8UnormSrgb,
            depth_format: None,
            vertex_stride: 24,
        }
    }

    #[test]
    fn pipeline_key_distinguishes_fixed_function_state() {
        assert_eq!(
            key_with_fill_mode(FillMode::Solid),
            key_with_fill_mode(FillMode::Solid)
        );
        assert_ne!(
            key_with_fill_mode(FillMode::Solid),
            key_with_fill_mode(FillMode::Wireframe)
        );
    }

    #[test]
    fn context_starts_without_device_or_swapchain() {
        let context = WgpuRenderContext::new();
        assert!(context.device_descriptor().is_none());
        assert!(context.adapter_info().is_none());
    }

    #[test]
    fn resource_creation_requires_a_device() {
        let context = WgpuRenderContext::new();
        let result = context.create_buffer(&BufferDescriptor::default(), None);
        assert!(matches!(result, Err(ResourceError::CreationFailed(_))));
        let result = context.create_texture_2d(&Texture2DDescriptor::default(), None);
        assert!(matches!(result, Err(ResourceError::CreationFailed(_))));
    }

    #[test]
    fn draw_without_target_reports_missing_target() {
        let mut context = WgpuRenderContext::new();
        assert!(matches!(
            context.draw(3, 0),
            Err(RenderError::MissingRenderTarget)
        ));
    }

    #[test]
    fn back_buffer_requires_device_and_swapchain() {
        let mut context = WgpuRenderContext::new();
        assert!(matches!(
            context.back_buffer(),
            Err(RenderError::Context(ContextError::DeviceNotCreated))
        ));
        assert!(matches!(
            context.present(true),
            Err(RenderError::Context(ContextError::DeviceNotCreated))
        ));
    }

    #[test]
    fn viewport_state_is_plain_data() {
        let context = WgpuRenderContext::new();
        let viewport = context.create_viewport(&ViewportDescriptor {
            width: 1280,
            height: 720,
            min_depth: 0.0,
            max_depth: 1.0,
        });
        assert_eq!(viewport.descriptor().width, 1280);
        assert_eq!(viewport.descriptor().height, 720);
    }
}
