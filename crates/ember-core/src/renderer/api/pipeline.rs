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

//! Defines data structures used to configure the fixed-function pipeline state.

use crate::renderer::traits::{RasterizerState, Shader};
use std::sync::Arc;

/// How polygons are filled during rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillMode {
    /// Fill the interior of each polygon.
    #[default]
    Solid,
    /// Draw only polygon edges.
    Wireframe,
}

/// Which polygon faces are discarded during rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    /// No faces are culled.
    #[default]
    None,
    /// Front-facing polygons are culled.
    Front,
    /// Back-facing polygons are culled.
    Back,
}

/// A descriptor used to create a rasterizer state.
///
/// The defaults mirror a permissive rasterizer: solid fill, no culling,
/// counter-clockwise front faces, depth clipping and scissor testing enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterizerStateDescriptor {
    /// How polygons are filled.
    pub fill_mode: FillMode,
    /// Which faces are culled.
    pub cull_mode: CullMode,
    /// If `true`, clockwise-wound triangles are considered front-facing.
    pub front_face_clockwise: bool,
    /// A constant bias added to each fragment's depth value.
    pub depth_bias: i32,
    /// Whether fragments outside the depth range are clipped.
    pub depth_clip_enabled: bool,
    /// Whether the scissor rectangle limits rasterization.
    pub scissor_enabled: bool,
    /// Whether multisample anti-aliasing is active.
    pub multisample_enabled: bool,
    /// Whether lines are anti-aliased.
    pub line_antialiasing_enabled: bool,
}

impl Default for RasterizerStateDescriptor {
    fn default() -> Self {
        Self {
            fill_mode: FillMode::Solid,
            cull_mode: CullMode::None,
            front_face_clockwise: false,
            depth_bias: 0,
            depth_clip_enabled: true,
            scissor_enabled: true,
            multisample_enabled: false,
            line_antialiasing_enabled: false,
        }
    }
}

/// A descriptor used to create a depth/stencil state.
///
/// Only the enable switches are configurable. The comparison and stencil
/// operations are fixed: depth writes use a `Less` comparison, and the
/// stencil path increments on depth-fail for front faces and decrements
/// for back faces (both wrapping, always passing, masks `0xFF`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilStateDescriptor {
    /// Whether depth testing and writing are enabled.
    pub depth_enabled: bool,
    /// Whether the stencil test is enabled.
    pub stencil_enabled: bool,
}

impl Default for DepthStencilStateDescriptor {
    fn default() -> Self {
        Self {
            depth_enabled: true,
            stencil_enabled: false,
        }
    }
}

/// A descriptor grouping the shaders and rasterizer state bound as one unit.
///
/// Members are shared references. A pipeline state keeps its shaders and
/// rasterizer state alive for as long as it exists; binding it binds every
/// present member in a fixed order (rasterizer state first, then vertex,
/// pixel, geometry, and compute shaders).
#[derive(Clone, Default)]
pub struct PipelineStateDescriptor {
    /// The rasterizer state to bind, if any.
    pub rasterizer_state: Option<Arc<dyn RasterizerState>>,
    /// The vertex shader to bind, if any.
    pub vertex_shader: Option<Arc<dyn Shader>>,
    /// The pixel shader to bind, if any.
    pub pixel_shader: Option<Arc<dyn Shader>>,
    /// The geometry shader to bind, if any.
    pub geometry_shader: Option<Arc<dyn Shader>>,
    /// The compute shader to bind, if any.
    pub compute_shader: Option<Arc<dyn Shader>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rasterizer_defaults_are_permissive() {
        let desc = RasterizerStateDescriptor::default();
        assert_eq!(desc.fill_mode, FillMode::Solid);
        assert_eq!(desc.cull_mode, CullMode::None);
        assert!(!desc.front_face_clockwise);
        assert_eq!(desc.depth_bias, 0);
        assert!(desc.depth_clip_enabled);
        assert!(desc.scissor_enabled);
        assert!(!desc.multisample_enabled);
        assert!(!desc.line_antialiasing_enabled);
    }

    #[test]
    fn depth_stencil_defaults_to_depth_only() {
        let desc = DepthStencilStateDescriptor::default();
        assert!(desc.depth_enabled);
        assert!(!desc.stencil_enabled);
    }

    #[test]
    fn pipeline_descriptor_defaults_to_empty() {
        let desc = PipelineStateDescriptor::default();
        assert!(desc.rasterizer_state.is_none());
        assert!(desc.vertex_shader.is_none());
        assert!(desc.pixel_shader.is_none());
        assert!(desc.geometry_shader.is_none());
        assert!(desc.compute_shader.is_none());
    }
}
