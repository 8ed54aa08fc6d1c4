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

use wgpu;

use ember_core::math::LinearRgba;
use ember_core::renderer::api::{
    BufferDescriptor, BufferKind, CpuAccessFlags, CullMode, FillMode, ResourceUsage, ShaderStage,
    Texture2DDescriptor, TextureFormat, VertexFormat,
};

/// A local extension trait to convert our engine's types into WGPU-compatible types.
/// This avoids Rust's orphan rules while keeping an idiomatic `.into_wgpu()` syntax.
pub trait IntoWgpu<T> {
    /// Consumes self and converts it into a WGPU-compatible type.
    fn into_wgpu(self) -> T;
}

// --- Colors ---

impl IntoWgpu<wgpu::Color> for LinearRgba {
    fn into_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

// --- Texture formats ---

impl IntoWgpu<wgpu::TextureFormat> for TextureFormat {
    fn into_wgpu(self) -> wgpu::TextureFormat {
        match self {
            TextureFormat::R8Unorm => wgpu::TextureFormat::R8Unorm,
            TextureFormat::Rg8Unorm => wgpu::TextureFormat::Rg8Unorm,
            TextureFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
            TextureFormat::Rgba8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            TextureFormat::Bgra8Unorm => wgpu::TextureFormat::Bgra8Unorm,
            TextureFormat::Bgra8UnormSrgb => wgpu::TextureFormat::Bgra8UnormSrgb,
            TextureFormat::R16Float => wgpu::TextureFormat::R16Float,
            TextureFormat::Rg16Float => wgpu::TextureFormat::Rg16Float,
            TextureFormat::Rgba16Float => wgpu::TextureFormat::Rgba16Float,
            TextureFormat::R32Float => wgpu::TextureFormat::R32Float,
            TextureFormat::Rg32Float => wgpu::TextureFormat::Rg32Float,
            TextureFormat::Rgba32Float => wgpu::TextureFormat::Rgba32Float,
            TextureFormat::Depth16Unorm => wgpu::TextureFormat::Depth16Unorm,
            TextureFormat::Depth24Plus => wgpu::TextureFormat::Depth24Plus,
            TextureFormat::Depth24PlusStencil8 => wgpu::TextureFormat::Depth24PlusStencil8,
            TextureFormat::Depth32Float => wgpu::TextureFormat::Depth32Float,
        }
    }
}

/// Converts a WGPU texture format back into its engine equivalent.
/// This is a free function because we cannot implement `From` due to orphan rules.
///
/// Returns `None` for surface formats the engine does not model; callers
/// treat that like any other unusable surface.
pub fn from_wgpu_texture_format(format: wgpu::TextureFormat) -> Option<TextureFormat> {
    match format {
        wgpu::TextureFormat::R8Unorm => Some(TextureFormat::R8Unorm),
        wgpu::TextureFormat::Rg8Unorm => Some(TextureFormat::Rg8Unorm),
        wgpu::TextureFormat::Rgba8Unorm => Some(TextureFormat::Rgba8Unorm),
        wgpu::TextureFormat::Rgba8UnormSrgb => Some(TextureFormat::Rgba8UnormSrgb),
        wgpu::TextureFormat::Bgra8Unorm => Some(TextureFormat::Bgra8Unorm),
        wgpu::TextureFormat::Bgra8UnormSrgb => Some(TextureFormat::Bgra8UnormSrgb),
        wgpu::TextureFormat::R16Float => Some(TextureFormat::R16Float),
        wgpu::TextureFormat::Rg16Float => Some(TextureFormat::Rg16Float),
        wgpu::TextureFormat::Rgba16Float => Some(TextureFormat::Rgba16Float),
        wgpu::TextureFormat::R32Float => Some(TextureFormat::R32Float),
        wgpu::TextureFormat::Rg32Float => Some(TextureFormat::Rg32Float),
        wgpu::TextureFormat::Rgba32Float => Some(TextureFormat::Rgba32Float),
        wgpu::TextureFormat::Depth16Unorm => Some(TextureFormat::Depth16Unorm),
        wgpu::TextureFormat::Depth24Plus => Some(TextureFormat::Depth24Plus),
        wgpu::TextureFormat::Depth24PlusStencil8 => Some(TextureFormat::Depth24PlusStencil8),
        wgpu::TextureFormat::Depth32Float => Some(TextureFormat::Depth32Float),
        _ => None,
    }
}

// --- Rasterizer state ---

impl IntoWgpu<wgpu::PolygonMode> for FillMode {
    fn into_wgpu(self) -> wgpu::PolygonMode {
        match self {
            FillMode::Solid => wgpu::PolygonMode::Fill,
            FillMode::Wireframe => wgpu::PolygonMode::Line,
        }
    }
}

impl IntoWgpu<Option<wgpu::Face>> for CullMode {
    fn into_wgpu(self) -> Option<wgpu::Face> {
        match self {
            CullMode::None => None,
            CullMode::Front => Some(wgpu::Face::Front),
            CullMode::Back => Some(wgpu::Face::Back),
        }
    }
}

// --- Vertex formats ---

impl IntoWgpu<wgpu::VertexFormat> for VertexFormat {
    fn into_wgpu(self) -> wgpu::VertexFormat {
        match self {
            VertexFormat::Float32 => wgpu::VertexFormat::Float32,
            VertexFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
            VertexFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
            VertexFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
            VertexFormat::Uint32 => wgpu::VertexFormat::Uint32,
            VertexFormat::Uint32x2 => wgpu::VertexFormat::Uint32x2,
            VertexFormat::Uint32x3 => wgpu::VertexFormat::Uint32x3,
            VertexFormat::Uint32x4 => wgpu::VertexFormat::Uint32x4,
            VertexFormat::Sint32 => wgpu::VertexFormat::Sint32,
            VertexFormat::Sint32x2 => wgpu::VertexFormat::Sint32x2,
            VertexFormat::Sint32x3 => wgpu::VertexFormat::Sint32x3,
            VertexFormat::Sint32x4 => wgpu::VertexFormat::Sint32x4,
        }
    }
}

// --- Shader stages ---

impl IntoWgpu<wgpu::ShaderStages> for ShaderStage {
    fn into_wgpu(self) -> wgpu::ShaderStages {
        match self {
            ShaderStage::Vertex => wgpu::ShaderStages::VERTEX,
            ShaderStage::Pixel => wgpu::ShaderStages::FRAGMENT,
            ShaderStage::Compute => wgpu::ShaderStages::COMPUTE,
            // wgpu has no geometry stage. Shader creation rejects the stage
            // before a visibility mask is ever built for it.
            ShaderStage::Geometry => wgpu::ShaderStages::empty(),
        }
    }
}

// --- Usage flags ---

/// Derives the `wgpu` usage set for a buffer descriptor.
///
/// Index buffers ignore the descriptor's usage and access fields entirely and
/// always come out GPU-resident and writable. Staging buffers carry no bind
/// point; they exist for transfers and mapping only, and map for reading or
/// writing but never both (read access wins when a descriptor asks for both).
/// Immutable buffers get no `COPY_DST`, so the creation upload is the only
/// write they ever see.
pub(crate) fn buffer_usages(descriptor: &BufferDescriptor) -> wgpu::BufferUsages {
    if descriptor.kind == BufferKind::Index {
        return wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST;
    }

    if descriptor.usage == ResourceUsage::Staging {
        if descriptor.access.contains(CpuAccessFlags::READ) {
            return wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST;
        }
        if descriptor.access.contains(CpuAccessFlags::WRITE) {
            return wgpu::BufferUsages::MAP_WRITE | wgpu::BufferUsages::COPY_SRC;
        }
        return wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::COPY_SRC;
    }

    let mut usages = match descriptor.kind {
        BufferKind::Vertex => wgpu::BufferUsages::VERTEX,
        BufferKind::Constant => wgpu::BufferUsages::UNIFORM,
        BufferKind::Index => wgpu::BufferUsages::INDEX,
    };
    if descriptor.usage != ResourceUsage::Immutable {
        usages |= wgpu::BufferUsages::COPY_DST;
    }
    usages
}

/// Derives the `wgpu` usage set for a texture descriptor.
///
/// Depth textures are pure attachments and are never sampled. Color textures
/// are always sampleable and uploadable; the `render_target` flag adds
/// attachment usage on top.
pub(crate) fn texture_usages(descriptor: &Texture2DDescriptor) -> wgpu::TextureUsages {
    if descriptor.format.is_depth_format() {
        return wgpu::TextureUsages::RENDER_ATTACHMENT;
    }
    let mut usages = wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST;
    if descriptor.render_target {
        usages |= wgpu::TextureUsages::RENDER_ATTACHMENT;
    }
    usages
}

/// Selects a presentation mode for a vsync preference. The `Auto*` modes are
/// valid on every surface, so toggling vsync never needs a capability check.
pub(crate) fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_rgba_conversion() {
        let color = LinearRgba::new(0.25, 0.5, 0.75, 1.0);
        let converted: wgpu::Color = color.into_wgpu();
        assert_eq!(0.25, converted.r);
        assert_eq!(0.5, converted.g);
        assert_eq!(0.75, converted.b);
        assert_eq!(1.0, converted.a);
    }

    #[test]
    fn test_texture_format_conversion() {
        assert_eq!(
            wgpu::TextureFormat::Rgba8Unorm,
            TextureFormat::Rgba8Unorm.into_wgpu()
        );
        assert_eq!(
            wgpu::TextureFormat::Bgra8UnormSrgb,
            TextureFormat::Bgra8UnormSrgb.into_wgpu()
        );
        assert_eq!(
            wgpu::TextureFormat::Depth24PlusStencil8,
            TextureFormat::Depth24PlusStencil8.into_wgpu()
        );
    }

    #[test]
    fn test_texture_format_round_trip() {
        let formats = [
            TextureFormat::R8Unorm,
            TextureFormat::Rgba8UnormSrgb,
            TextureFormat::Rgba16Float,
            TextureFormat::Depth32Float,
        ];
        for format in formats {
            assert_eq!(Some(format), from_wgpu_texture_format(format.into_wgpu()));
        }
    }

    #[test]
    fn test_unmodeled_wgpu_format_is_rejected() {
        assert_eq!(None, from_wgpu_texture_format(wgpu::TextureFormat::Rgb10a2Unorm));
    }

    #[test]
    fn test_fill_mode_conversion() {
        assert_eq!(wgpu::PolygonMode::Fill, FillMode::Solid.into_wgpu());
        assert_eq!(wgpu::PolygonMode::Line, FillMode::Wireframe.into_wgpu());
    }

    #[test]
    fn test_cull_mode_conversion() {
        assert_eq!(None::<wgpu::Face>, CullMode::None.into_wgpu());
        assert_eq!(Some(wgpu::Face::Front), CullMode::Front.into_wgpu());
        assert_eq!(Some(wgpu::Face::Back), CullMode::Back.into_wgpu());
    }

    #[test]
    fn test_vertex_format_conversion() {
        assert_eq!(
            wgpu::VertexFormat::Float32x3,
            VertexFormat::Float32x3.into_wgpu()
        );
        assert_eq!(wgpu::VertexFormat::Uint32, VertexFormat::Uint32.into_wgpu());
        assert_eq!(
            wgpu::VertexFormat::Sint32x4,
            VertexFormat::Sint32x4.into_wgpu()
        );
    }

    #[test]
    fn test_shader_stage_conversion() {
        assert_eq!(wgpu::ShaderStages::VERTEX, ShaderStage::Vertex.into_wgpu());
        assert_eq!(wgpu::ShaderStages::FRAGMENT, ShaderStage::Pixel.into_wgpu());
        assert_eq!(
            wgpu::ShaderStages::COMPUTE,
            ShaderStage::Compute.into_wgpu()
        );
        assert!(<ShaderStage as IntoWgpu<wgpu::ShaderStages>>::into_wgpu(
            ShaderStage::Geometry
        )
        .is_empty());
    }

    #[test]
    fn test_vertex_buffer_usages() {
        let descriptor = BufferDescriptor {
            kind: BufferKind::Vertex,
            ..Default::default()
        };
        assert_eq!(
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            buffer_usages(&descriptor)
        );
    }

    #[test]
    fn test_index_buffer_usages_ignore_the_descriptor() {
        let expected = wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST;
        for usage in [
            ResourceUsage::Default,
            ResourceUsage::Immutable,
            ResourceUsage::Dynamic,
            ResourceUsage::Staging,
        ] {
            let descriptor = BufferDescriptor {
                kind: BufferKind::Index,
                usage,
                access: CpuAccessFlags::READ,
                ..Default::default()
            };
            assert_eq!(expected, buffer_usages(&descriptor));
        }
    }

    #[test]
    fn test_immutable_vertex_buffer_gets_no_copy_dst() {
        let descriptor = BufferDescriptor {
            kind: BufferKind::Vertex,
            usage: ResourceUsage::Immutable,
            ..Default::default()
        };
        assert_eq!(wgpu::BufferUsages::VERTEX, buffer_usages(&descriptor));
    }

    #[test]
    fn test_staging_buffer_usages() {
        let read_back = BufferDescriptor {
            usage: ResourceUsage::Staging,
            access: CpuAccessFlags::READ,
            ..Default::default()
        };
        assert_eq!(
            wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            buffer_usages(&read_back)
        );

        let both = BufferDescriptor {
            usage: ResourceUsage::Staging,
            access: CpuAccessFlags::READ.union(CpuAccessFlags::WRITE),
            ..Default::default()
        };
        assert_eq!(
            wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            buffer_usages(&both)
        );
    }

    #[test]
    fn test_sampled_texture_usages() {
        let descriptor = Texture2DDescriptor::default();
        assert_eq!(
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            texture_usages(&descriptor)
        );
    }

    #[test]
    fn test_render_target_texture_usages() {
        let descriptor = Texture2DDescriptor {
            render_target: true,
            ..Default::default()
        };
        assert!(texture_usages(&descriptor).contains(wgpu::TextureUsages::RENDER_ATTACHMENT));
        assert!(texture_usages(&descriptor).contains(wgpu::TextureUsages::TEXTURE_BINDING));
    }

    #[test]
    fn test_depth_texture_usages() {
        let descriptor = Texture2DDescriptor {
            format: TextureFormat::Depth24PlusStencil8,
            ..Default::default()
        };
        assert_eq!(
            wgpu::TextureUsages::RENDER_ATTACHMENT,
            texture_usages(&descriptor)
        );
    }

    #[test]
    fn test_present_mode_selection() {
        assert_eq!(wgpu::PresentMode::AutoVsync, present_mode(true));
        assert_eq!(wgpu::PresentMode::AutoNoVsync, present_mode(false));
    }
}
