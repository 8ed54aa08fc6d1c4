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

// Ember Engine Sandbox
// Main binary for testing and demos: renders a tinted triangle through the
// whole stack (window, event queue, input system, wgpu render context).

use std::mem;

use anyhow::{anyhow, Result};
use ember_core::input::{InputSystem, Key};
use ember_core::math::LinearRgba;
use ember_core::platform::{EngineWindow, EventQueue, WindowDescriptor};
use ember_core::renderer::{
    BindStage, BufferDescriptor, BufferKind, CpuAccessFlags, CullMode, DeviceDescriptor, FillMode,
    PipelineStateDescriptor, RasterizerStateDescriptor, RenderContext, ResourceUsage, Shader,
    ShaderDescriptor, ShaderStage, SwapchainDescriptor, TextureFormat, UniformBuffer,
    ViewportDescriptor,
};
use ember_core::FrameTimer;
use ember_infra::graphics::wgpu::WgpuRenderContext;
use ember_infra::platform::WinitWindow;

const TRIANGLE_WGSL: &str = include_str!("triangle.wgsl");

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 3],
}

const VERTICES: &[Vertex] = &[
    Vertex {
        position: [0.0, 0.5, 0.0],
        color: [1.0, 0.0, 0.0],
    },
    Vertex {
        position: [-0.5, -0.5, 0.0],
        color: [0.0, 1.0, 0.0],
    },
    Vertex {
        position: [0.5, -0.5, 0.0],
        color: [0.0, 0.0, 1.0],
    },
];

const INDICES: &[u32] = &[0, 1, 2];

fn main() -> Result<()> {
    init_logging();

    // --- Step 1: Window and event wiring ---
    let events = EventQueue::new();
    let mut window = WinitWindow::new();
    let window_descriptor = WindowDescriptor::default().with_title("Ember Sandbox");
    if !window.init(&window_descriptor) {
        return Err(anyhow!("window creation failed"));
    }
    window.set_event_sender(events.sender());
    let surface = window
        .surface_handle()
        .ok_or_else(|| anyhow!("window has no surface handle"))?;
    let (width, height) = window.client_size();
    window.show();

    // --- Step 2: Device and swapchain ---
    let mut context = WgpuRenderContext::new();
    context.create_device(&DeviceDescriptor {
        width,
        height,
        format: TextureFormat::Bgra8Unorm,
    })?;
    context.create_swapchain(
        &SwapchainDescriptor {
            width,
            height,
            format: TextureFormat::Bgra8Unorm,
            ..Default::default()
        },
        surface,
    )?;
    if let Some(info) = context.adapter_info() {
        log::info!(
            "Sandbox: rendering on '{}' ({:?} / {:?}).",
            info.name,
            info.backend_type,
            info.device_type
        );
    }

    // --- Step 3: Shaders, geometry, and the animated tint ---
    let vertex_shader = context.create_shader(
        &ShaderDescriptor {
            label: Some("triangle-vs".into()),
            stage: ShaderStage::Vertex,
            entry_point: "vs_main".into(),
        },
        TRIANGLE_WGSL,
    )?;
    let pixel_shader = context.create_shader(
        &ShaderDescriptor {
            label: Some("triangle-ps".into()),
            stage: ShaderStage::Pixel,
            entry_point: "fs_main".into(),
        },
        TRIANGLE_WGSL,
    )?;
    let tint = pixel_shader
        .uniform_buffer("tint")
        .ok_or_else(|| anyhow!("triangle shader has no 'tint' uniform block"))?;

    let vertex_buffer = context.create_buffer(
        &BufferDescriptor {
            label: Some("triangle-vertices".into()),
            kind: BufferKind::Vertex,
            count: VERTICES.len() as u32,
            stride: mem::size_of::<Vertex>() as u32,
            usage: ResourceUsage::Immutable,
            access: CpuAccessFlags::NONE,
        },
        Some(bytemuck::cast_slice(VERTICES)),
    )?;
    let index_buffer = context.create_buffer(
        &BufferDescriptor {
            label: Some("triangle-indices".into()),
            kind: BufferKind::Index,
            count: INDICES.len() as u32,
            stride: mem::size_of::<u32>() as u32,
            usage: ResourceUsage::Immutable,
            access: CpuAccessFlags::NONE,
        },
        Some(bytemuck::cast_slice(INDICES)),
    )?;

    // --- Step 4: Fixed-function state and the frame target ---
    let solid = context.create_rasterizer_state(&RasterizerStateDescriptor::default())?;
    let wireframe = context.create_rasterizer_state(&RasterizerStateDescriptor {
        fill_mode: FillMode::Wireframe,
        cull_mode: CullMode::None,
        ..Default::default()
    })?;
    let pipeline = context.create_pipeline_state(PipelineStateDescriptor {
        rasterizer_state: Some(solid),
        vertex_shader: Some(vertex_shader),
        pixel_shader: Some(pixel_shader),
        geometry_shader: None,
        compute_shader: None,
    });
    let viewport = context.create_viewport(&ViewportDescriptor {
        width,
        height,
        ..Default::default()
    });
    let frame_target = {
        let back_buffer = context.back_buffer()?;
        context.create_render_target(back_buffer.as_ref())?
    };

    // --- Step 5: Frame loop ---
    let mut input = InputSystem::new();
    let mut timer = FrameTimer::new();
    let mut wireframe_on = false;
    let mut vsync = true;
    let clear_color = LinearRgba::new(0.02, 0.02, 0.05, 1.0);

    log::info!("Sandbox: entering frame loop (Escape quits, Ctrl+W wireframe, V vsync).");
    loop {
        if window.update() {
            log::info!("Sandbox: window closed.");
            break;
        }
        input.process_events(events.receiver());
        input.update();

        if input.is_key_pressed(Key::Escape) {
            log::info!("Sandbox: escape pressed, quitting.");
            break;
        }
        if input.is_key_combination_pressed(Key::LControl, Key::W, None) {
            wireframe_on = !wireframe_on;
            log::info!("Sandbox: wireframe {}.", if wireframe_on { "on" } else { "off" });
        }
        if input.is_key_pressed(Key::V) {
            vsync = !vsync;
            log::info!("Sandbox: vsync {}.", if vsync { "on" } else { "off" });
        }

        let tick = timer.elapsed_secs_f32().unwrap_or_default();
        let pulse = 0.75 + 0.25 * (tick * 2.0).sin();
        let tint_color: [f32; 4] = [pulse, pulse, pulse, 1.0];
        tint.write_bytes(0, bytemuck::bytes_of(&tint_color))?;
        tint.commit()?;

        context.clear(frame_target.as_ref(), clear_color)?;
        context.bind_render_target(frame_target.as_ref(), None);
        context.set_viewport(viewport.as_ref());
        context.bind_pipeline_state(pipeline.as_ref());
        if wireframe_on {
            context.bind_rasterizer_state(wireframe.as_ref());
        }
        context.bind_buffer(vertex_buffer.as_ref(), 0, BindStage::Vertex);
        context.bind_buffer(index_buffer.as_ref(), 0, BindStage::Vertex);
        context.bind_uniform_buffer(tint.as_ref(), BindStage::Pixel);
        context.draw_indexed(INDICES.len() as u32, 0)?;
        context.present(vsync)?;
    }

    Ok(())
}

fn init_logging() {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .init();
}
