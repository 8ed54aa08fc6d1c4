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

use ember_core::renderer::api::{
    DepthStencilStateDescriptor, PipelineStateDescriptor, RasterizerStateDescriptor,
};
use ember_core::renderer::traits::{DepthStencilState, PipelineState, RasterizerState};
use std::any::Any;

use super::conversions::IntoWgpu;

/// Rasterizer configuration as a bindable object.
///
/// The descriptor is pure data; `wgpu` consumes it when a render pipeline is
/// compiled, not when the state is created.
#[derive(Debug)]
pub struct WgpuRasterizerState {
    descriptor: RasterizerStateDescriptor,
}

impl WgpuRasterizerState {
    pub(crate) fn new(descriptor: &RasterizerStateDescriptor) -> Self {
        Self {
            descriptor: *descriptor,
        }
    }
}

impl RasterizerState for WgpuRasterizerState {
    fn descriptor(&self) -> &RasterizerStateDescriptor {
        &self.descriptor
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Depth/stencil toggles as a bindable object.
#[derive(Debug)]
pub struct WgpuDepthStencilState {
    descriptor: DepthStencilStateDescriptor,
}

impl WgpuDepthStencilState {
    pub(crate) fn new(descriptor: &DepthStencilStateDescriptor) -> Self {
        Self {
            descriptor: *descriptor,
        }
    }
}

impl DepthStencilState for WgpuDepthStencilState {
    fn descriptor(&self) -> &DepthStencilStateDescriptor {
        &self.descriptor
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A bundle of shaders and rasterizer state bound as one unit.
pub struct WgpuPipelineState {
    descriptor: PipelineStateDescriptor,
}

impl WgpuPipelineState {
    pub(crate) fn new(descriptor: PipelineStateDescriptor) -> Self {
        Self { descriptor }
    }
}

impl PipelineState for WgpuPipelineState {
    fn descriptor(&self) -> &PipelineStateDescriptor {
        &self.descriptor
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl std::fmt::Debug for WgpuPipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuPipelineState")
            .field(
                "rasterizer_state",
                &self.descriptor.rasterizer_state.is_some(),
            )
            .field("vertex_shader", &self.descriptor.vertex_shader.is_some())
            .field("pixel_shader", &self.descriptor.pixel_shader.is_some())
            .field(
                "geometry_shader",
                &self.descriptor.geometry_shader.is_some(),
            )
            .field("compute_shader", &self.descriptor.compute_shader.is_some())
            .finish()
    }
}

/// Expands rasterizer toggles into the `wgpu` primitive state.
///
/// The scissor, multisample and line smoothing toggles have no pipeline
/// equivalent here: scissoring is always available through the scissor rect,
/// and sample behavior follows the render target.
pub(crate) fn build_primitive_state(descriptor: &RasterizerStateDescriptor) -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: if descriptor.front_face_clockwise {
            wgpu::FrontFace::Cw
        } else {
            wgpu::FrontFace::Ccw
        },
        cull_mode: descriptor.cull_mode.into_wgpu(),
        unclipped_depth: !descriptor.depth_clip_enabled,
        polygon_mode: descriptor.fill_mode.into_wgpu(),
        conservative: false,
    }
}

/// Expands the depth/stencil toggles into the fixed-function `wgpu` state.
///
/// Depth testing is `Less` with writes. The stencil rule highlights depth
/// failures: front faces increment, back faces decrement, both wrapping,
/// with the test itself always passing and full masks.
pub(crate) fn build_depth_stencil_state(
    descriptor: &DepthStencilStateDescriptor,
    format: wgpu::TextureFormat,
    depth_bias: i32,
) -> wgpu::DepthStencilState {
    let stencil = if descriptor.stencil_enabled {
        wgpu::StencilState {
            front: wgpu::StencilFaceState {
                compare: wgpu::CompareFunction::Always,
                fail_op: wgpu::StencilOperation::Keep,
                depth_fail_op: wgpu::StencilOperation::IncrementWrap,
                pass_op: wgpu::StencilOperation::Keep,
            },
            back: wgpu::StencilFaceState {
                compare: wgpu::CompareFunction::Always,
                fail_op: wgpu::StencilOperation::Keep,
                depth_fail_op: wgpu::StencilOperation::DecrementWrap,
                pass_op: wgpu::StencilOperation::Keep,
            },
            read_mask: 0xFF,
            write_mask: 0xFF,
        }
    } else {
        wgpu::StencilState::default()
    };

    wgpu::DepthStencilState {
        format,
        depth_write_enabled: Some(descriptor.depth_enabled),
        depth_compare: if descriptor.depth_enabled {
            Some(wgpu::CompareFunction::Less)
        } else {
            Some(wgpu::CompareFunction::Always)
        },
        stencil,
        bias: wgpu::DepthBiasState {
            constant: depth_bias,
            slope_scale: 0.0,
            clamp: 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::renderer::api::{CullMode, FillMode, TextureFormat};

    #[test]
    fn primitive_state_follows_descriptor() {
        let descriptor = RasterizerStateDescriptor {
            fill_mode: FillMode::Wireframe,
            cull_mode: CullMode::Back,
            front_face_clockwise: true,
            ..Default::default()
        };
        let state = build_primitive_state(&descriptor);

        assert_eq!(wgpu::PolygonMode::Line, state.polygon_mode);
        assert_eq!(Some(wgpu::Face::Back), state.cull_mode);
        assert_eq!(wgpu::FrontFace::Cw, state.front_face);
        assert!(!state.unclipped_depth);
    }

    #[test]
    fn default_primitive_state_is_permissive() {
        let state = build_primitive_state(&RasterizerStateDescriptor::default());

        assert_eq!(wgpu::PolygonMode::Fill, state.polygon_mode);
        assert_eq!(None, state.cull_mode);
        assert_eq!(wgpu::FrontFace::Ccw, state.front_face);
        assert_eq!(wgpu::PrimitiveTopology::TriangleList, state.topology);
    }

    #[test]
    fn depth_testing_uses_less_with_writes() {
        let descriptor = DepthStencilStateDescriptor::default();
        let state = build_depth_stencil_state(
            &descriptor,
            TextureFormat::Depth24PlusStencil8.into_wgpu(),
            0,
        );

        assert_eq!(Some(true), state.depth_write_enabled);
        assert_eq!(Some(wgpu::CompareFunction::Less), state.depth_compare);
        assert_eq!(wgpu::TextureFormat::Depth24PlusStencil8, state.format);
    }

    #[test]
    fn stencil_marks_depth_failures() {
        let descriptor = DepthStencilStateDescriptor {
            depth_enabled: true,
            stencil_enabled: true,
        };
        let state =
            build_depth_stencil_state(&descriptor, wgpu::TextureFormat::Depth24PlusStencil8, 0);

        assert_eq!(
            wgpu::StencilOperation::IncrementWrap,
            state.stencil.front.depth_fail_op
        );
        assert_eq!(
            wgpu::StencilOperation::DecrementWrap,
            state.stencil.back.depth_fail_op
        );
        assert_eq!(wgpu::CompareFunction::Always, state.stencil.front.compare);
        assert_eq!(0xFF, state.stencil.read_mask);
        assert_eq!(0xFF, state.stencil.write_mask);
    }

    #[test]
    fn disabled_depth_never_discards() {
        let descriptor = DepthStencilStateDescriptor {
            depth_enabled: false,
            stencil_enabled: false,
        };
        let state = build_depth_stencil_state(&descriptor, wgpu::TextureFormat::Depth32Float, 4);

        assert_eq!(Some(false), state.depth_write_enabled);
        assert_eq!(Some(wgpu::CompareFunction::Always), state.depth_compare);
        assert_eq!(4, state.bias.constant);
    }
}
