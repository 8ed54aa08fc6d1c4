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
    ShaderDescriptor, ShaderStage, UniformBufferDescriptor, VertexAttribute, VertexFormat,
    VertexLayout,
};
use ember_core::renderer::error::{ResourceError, ShaderError};
use ember_core::renderer::traits::{Shader, UniformBuffer};
use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::uniform::WgpuUniformBuffer;

static NEXT_SHADER_ID: AtomicU64 = AtomicU64::new(1);

/// A compiled WGSL shader stage with its reflected interface.
///
/// Creation parses and validates the source with `naga` before handing it to
/// `wgpu`, so a broken shader is reported as a typed error instead of a
/// delayed device error. Reflection walks only the globals the entry point
/// actually uses: a file holding both a vertex and a fragment entry point
/// yields independent shader objects with independent uniform blocks.
pub struct WgpuShader {
    id: u64,
    descriptor: ShaderDescriptor,
    module: wgpu::ShaderModule,
    uniform_buffers: Vec<Arc<WgpuUniformBuffer>>,
    vertex_layout: Option<VertexLayout>,
    texture_slots: Vec<u32>,
}

impl WgpuShader {
    pub(crate) fn create(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        descriptor: &ShaderDescriptor,
        source: &str,
    ) -> Result<Self, ResourceError> {
        let reflection = parse_and_reflect(descriptor, source)?;

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: descriptor.label.as_deref(),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let uniform_buffers = reflection
            .uniform_blocks
            .into_iter()
            .map(|block| Arc::new(WgpuUniformBuffer::new(device, queue, block)))
            .collect::<Vec<_>>();

        log::info!(
            "WgpuShader: Compiled {:?} shader '{}' (entry '{}', {} uniform block(s))",
            descriptor.stage,
            descriptor.label.as_deref().unwrap_or_default(),
            descriptor.entry_point,
            uniform_buffers.len(),
        );

        Ok(Self {
            id: NEXT_SHADER_ID.fetch_add(1, Ordering::Relaxed),
            descriptor: descriptor.clone(),
            module,
            uniform_buffers,
            vertex_layout: reflection.vertex_layout,
            texture_slots: reflection.texture_slots,
        })
    }

    /// A process-unique identity, used to key pipeline caching.
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn wgpu_module(&self) -> &wgpu::ShaderModule {
        &self.module
    }

    pub(crate) fn entry_point(&self) -> &str {
        &self.descriptor.entry_point
    }

    /// The texture slots the entry point samples from, ascending.
    pub(crate) fn texture_slots(&self) -> &[u32] {
        &self.texture_slots
    }

    pub(crate) fn uniform_blocks(&self) -> &[Arc<WgpuUniformBuffer>] {
        &self.uniform_buffers
    }
}

impl Shader for WgpuShader {
    fn descriptor(&self) -> &ShaderDescriptor {
        &self.descriptor
    }

    fn stage(&self) -> ShaderStage {
        self.descriptor.stage
    }

    fn uniform_buffer(&self, name: &str) -> Option<Arc<dyn UniformBuffer>> {
        self.uniform_buffers
            .iter()
            .find(|buffer| buffer.descriptor().name == name)
            .map(|buffer| buffer.clone() as Arc<dyn UniformBuffer>)
    }

    fn uniform_buffers(&self) -> Vec<Arc<dyn UniformBuffer>> {
        self.uniform_buffers
            .iter()
            .map(|buffer| buffer.clone() as Arc<dyn UniformBuffer>)
            .collect()
    }

    fn vertex_layout(&self) -> Option<&VertexLayout> {
        self.vertex_layout.as_ref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl std::fmt::Debug for WgpuShader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuShader")
            .field("id", &self.id)
            .field("descriptor", &self.descriptor)
            .field("uniform_blocks", &self.uniform_buffers.len())
            .finish()
    }
}

/// Everything the engine needs to know about a shader's interface.
struct ReflectionData {
    uniform_blocks: Vec<UniformBufferDescriptor>,
    vertex_layout: Option<VertexLayout>,
    texture_slots: Vec<u32>,
}

fn naga_stage(stage: ShaderStage) -> Option<naga::ShaderStage> {
    match stage {
        ShaderStage::Vertex => Some(naga::ShaderStage::Vertex),
        ShaderStage::Pixel => Some(naga::ShaderStage::Fragment),
        ShaderStage::Compute => Some(naga::ShaderStage::Compute),
        ShaderStage::Geometry => None,
    }
}

/// Parses, validates and reflects a WGSL source for one entry point.
///
/// Pure with respect to the GPU: no device is touched, which keeps the whole
/// front end testable on machines without an adapter.
fn parse_and_reflect(
    descriptor: &ShaderDescriptor,
    source: &str,
) -> Result<ReflectionData, ShaderError> {
    let Some(expected_stage) = naga_stage(descriptor.stage) else {
        return Err(ShaderError::StageUnsupported {
            stage: descriptor.stage,
        });
    };

    let module = naga::front::wgsl::parse_str(source).map_err(|err| {
        ShaderError::CompilationFailed {
            stage: descriptor.stage,
            details: err.emit_to_string(source),
        }
    })?;

    let info = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .map_err(|err| ShaderError::CompilationFailed {
        stage: descriptor.stage,
        details: err.emit_to_string(source),
    })?;

    let entry_index = module
        .entry_points
        .iter()
        .position(|ep| ep.stage == expected_stage && ep.name == *descriptor.entry_point)
        .ok_or_else(|| ShaderError::MissingEntryPoint {
            entry_point: descriptor.entry_point.to_string(),
        })?;
    let entry_point = &module.entry_points[entry_index];
    let entry_info = info.get_entry_point(entry_index);

    let mut uniform_blocks = Vec::new();
    let mut texture_slots = Vec::new();

    for (handle, var) in module.global_variables.iter() {
        if entry_info[handle].is_empty() {
            continue;
        }

        match var.space {
            naga::AddressSpace::Uniform => {
                let binding = var.binding.as_ref().ok_or_else(|| {
                    ShaderError::ReflectionFailed {
                        details: format!(
                            "uniform block '{}' has no binding",
                            var.name.as_deref().unwrap_or_default()
                        ),
                    }
                })?;
                if binding.group != 0 {
                    return Err(ShaderError::ReflectionFailed {
                        details: format!(
                            "uniform block '{}' must bind in group 0, found group {}",
                            var.name.as_deref().unwrap_or_default(),
                            binding.group
                        ),
                    });
                }
                uniform_blocks.push(UniformBufferDescriptor {
                    name: var.name.clone().unwrap_or_default(),
                    size: module.types[var.ty].inner.size(module.to_ctx()),
                    binding: binding.binding,
                    variable_count: match module.types[var.ty].inner {
                        naga::TypeInner::Struct { ref members, .. } => members.len() as u32,
                        _ => 1,
                    },
                });
            }
            naga::AddressSpace::Handle => {
                if !matches!(module.types[var.ty].inner, naga::TypeInner::Image { .. }) {
                    continue;
                }
                // Samplers ride along implicitly: texture slot `s` binds the
                // image at `2s` and its sampler at `2s + 1`, both in group 1.
                let binding = var.binding.as_ref().ok_or_else(|| {
                    ShaderError::ReflectionFailed {
                        details: format!(
                            "texture '{}' has no binding",
                            var.name.as_deref().unwrap_or_default()
                        ),
                    }
                })?;
                if binding.group != 1 || binding.binding % 2 != 0 {
                    return Err(ShaderError::ReflectionFailed {
                        details: format!(
                            "texture '{}' must bind at an even binding in group 1",
                            var.name.as_deref().unwrap_or_default()
                        ),
                    });
                }
                texture_slots.push(binding.binding / 2);
            }
            _ => {}
        }
    }

    uniform_blocks.sort_by_key(|block| block.binding);
    texture_slots.sort_unstable();

    let vertex_layout = if descriptor.stage == ShaderStage::Vertex {
        Some(reflect_vertex_layout(&module, entry_point)?)
    } else {
        None
    };

    Ok(ReflectionData {
        uniform_blocks,
        vertex_layout,
        texture_slots,
    })
}

/// Builds the vertex input layout from the entry point's arguments,
/// flattening struct inputs. Attributes are packed tightly in location order.
fn reflect_vertex_layout(
    module: &naga::Module,
    entry_point: &naga::EntryPoint,
) -> Result<VertexLayout, ShaderError> {
    let mut inputs: Vec<(u32, String, VertexFormat)> = Vec::new();

    for argument in &entry_point.function.arguments {
        match &argument.binding {
            Some(binding) => {
                if let naga::Binding::Location { location, .. } = binding {
                    let format = attribute_format(&module.types[argument.ty].inner)
                        .ok_or_else(|| reflection_type_error(argument.name.as_deref()))?;
                    inputs.push((
                        *location,
                        argument.name.clone().unwrap_or_default(),
                        format,
                    ));
                }
            }
            None => {
                let naga::TypeInner::Struct { ref members, .. } = module.types[argument.ty].inner
                else {
                    continue;
                };
                for member in members {
                    if let Some(naga::Binding::Location { location, .. }) = &member.binding {
                        let format = attribute_format(&module.types[member.ty].inner)
                            .ok_or_else(|| reflection_type_error(member.name.as_deref()))?;
                        inputs.push((*location, member.name.clone().unwrap_or_default(), format));
                    }
                }
            }
        }
    }

    inputs.sort_by_key(|(location, _, _)| *location);
    if inputs.windows(2).any(|pair| pair[0].0 == pair[1].0) {
        return Err(ShaderError::ReflectionFailed {
            details: "duplicate vertex input location".into(),
        });
    }

    let mut attributes = Vec::with_capacity(inputs.len());
    let mut offset = 0u32;
    for (location, name, format) in inputs {
        attributes.push(VertexAttribute {
            name,
            location,
            format,
            offset,
        });
        offset += format.size();
    }

    Ok(VertexLayout {
        attributes,
        stride: offset,
    })
}

fn reflection_type_error(name: Option<&str>) -> ShaderError {
    ShaderError::ReflectionFailed {
        details: format!(
            "vertex input '{}' has no 32-bit scalar or vector equivalent",
            name.unwrap_or_default()
        ),
    }
}

fn attribute_format(inner: &naga::TypeInner) -> Option<VertexFormat> {
    match *inner {
        naga::TypeInner::Scalar(scalar) => scalar_format(scalar, 1),
        naga::TypeInner::Vector { size, scalar } => scalar_format(
            scalar,
            match size {
                naga::VectorSize::Bi => 2,
                naga::VectorSize::Tri => 3,
                naga::VectorSize::Quad => 4,
            },
        ),
        _ => None,
    }
}

fn scalar_format(scalar: naga::Scalar, components: u32) -> Option<VertexFormat> {
    if scalar.width != 4 {
        return None;
    }
    Some(match (scalar.kind, components) {
        (naga::ScalarKind::Float, 1) => VertexFormat::Float32,
        (naga::ScalarKind::Float, 2) => VertexFormat::Float32x2,
        (naga::ScalarKind::Float, 3) => VertexFormat::Float32x3,
        (naga::ScalarKind::Float, 4) => VertexFormat::Float32x4,
        (naga::ScalarKind::Uint, 1) => VertexFormat::Uint32,
        (naga::ScalarKind::Uint, 2) => VertexFormat::Uint32x2,
        (naga::ScalarKind::Uint, 3) => VertexFormat::Uint32x3,
        (naga::ScalarKind::Uint, 4) => VertexFormat::Uint32x4,
        (naga::ScalarKind::Sint, 1) => VertexFormat::Sint32,
        (naga::ScalarKind::Sint, 2) => VertexFormat::Sint32x2,
        (naga::ScalarKind::Sint, 3) => VertexFormat::Sint32x3,
        (naga::ScalarKind::Sint, 4) => VertexFormat::Sint32x4,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    const VERTEX_SOURCE: &str = r#"
        struct SceneUniforms {
            view_projection: mat4x4<f32>,
            tint: vec4<f32>,
        };

        @group(0) @binding(0) var<uniform> scene: SceneUniforms;

        struct VertexInput {
            @location(0) position: vec3<f32>,
            @location(1) color: vec3<f32>,
        };

        struct VertexOutput {
            @builtin(position) clip_position: vec4<f32>,
            @location(0) color: vec3<f32>,
        };

        @vertex
        fn vs_main(input: VertexInput) -> VertexOutput {
            var out: VertexOutput;
            out.clip_position = scene.view_projection * vec4<f32>(input.position, 1.0);
            out.color = input.color * scene.tint.rgb;
            return out;
        }
    "#;

    const FRAGMENT_SOURCE: &str = r#"
        @group(1) @binding(0) var albedo_texture: texture_2d<f32>;
        @group(1) @binding(1) var albedo_sampler: sampler;

        @fragment
        fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
            return textureSample(albedo_texture, albedo_sampler, uv);
        }
    "#;

    fn vertex_descriptor(entry_point: &'static str) -> ShaderDescriptor {
        ShaderDescriptor {
            label: None,
            stage: ShaderStage::Vertex,
            entry_point: Cow::Borrowed(entry_point),
        }
    }

    #[test]
    fn reflects_vertex_layout_in_location_order() {
        let reflection =
            parse_and_reflect(&vertex_descriptor("vs_main"), VERTEX_SOURCE).unwrap();
        let layout = reflection.vertex_layout.unwrap();

        assert_eq!(2, layout.attributes.len());
        assert_eq!("position", layout.attributes[0].name);
        assert_eq!(0, layout.attributes[0].location);
        assert_eq!(VertexFormat::Float32x3, layout.attributes[0].format);
        assert_eq!(0, layout.attributes[0].offset);
        assert_eq!("color", layout.attributes[1].name);
        assert_eq!(12, layout.attributes[1].offset);
        assert_eq!(24, layout.stride);
    }

    #[test]
    fn reflects_uniform_block_layout() {
        let reflection =
            parse_and_reflect(&vertex_descriptor("vs_main"), VERTEX_SOURCE).unwrap();

        assert_eq!(1, reflection.uniform_blocks.len());
        let block = &reflection.uniform_blocks[0];
        assert_eq!("scene", block.name);
        assert_eq!(80, block.size);
        assert_eq!(0, block.binding);
        assert_eq!(2, block.variable_count);
    }

    #[test]
    fn unused_globals_are_not_reflected() {
        let source = r#"
            struct Unused { value: vec4<f32> };
            @group(0) @binding(0) var<uniform> live: vec4<f32>;
            @group(0) @binding(1) var<uniform> dead: Unused;

            @vertex
            fn vs_main() -> @builtin(position) vec4<f32> {
                return live;
            }
        "#;
        let reflection = parse_and_reflect(&vertex_descriptor("vs_main"), source).unwrap();

        assert_eq!(1, reflection.uniform_blocks.len());
        assert_eq!("live", reflection.uniform_blocks[0].name);
        assert_eq!(1, reflection.uniform_blocks[0].variable_count);
    }

    #[test]
    fn reflects_fragment_texture_slots() {
        let descriptor = ShaderDescriptor {
            label: None,
            stage: ShaderStage::Pixel,
            entry_point: Cow::Borrowed("fs_main"),
        };
        let reflection = parse_and_reflect(&descriptor, FRAGMENT_SOURCE).unwrap();

        assert_eq!(vec![0], reflection.texture_slots);
        assert!(reflection.vertex_layout.is_none());
    }

    #[test]
    fn missing_entry_point_is_reported() {
        let result = parse_and_reflect(&vertex_descriptor("missing"), VERTEX_SOURCE);
        assert!(matches!(
            result,
            Err(ShaderError::MissingEntryPoint { entry_point }) if entry_point == "missing"
        ));
    }

    #[test]
    fn entry_point_stage_must_match() {
        // `fs_main` exists, but not as a vertex entry point.
        let descriptor = vertex_descriptor("fs_main");
        assert!(matches!(
            parse_and_reflect(&descriptor, FRAGMENT_SOURCE),
            Err(ShaderError::MissingEntryPoint { .. })
        ));
    }

    #[test]
    fn geometry_stage_is_unsupported() {
        let descriptor = ShaderDescriptor {
            label: None,
            stage: ShaderStage::Geometry,
            entry_point: Cow::Borrowed("gs_main"),
        };
        assert!(matches!(
            parse_and_reflect(&descriptor, VERTEX_SOURCE),
            Err(ShaderError::StageUnsupported {
                stage: ShaderStage::Geometry
            })
        ));
    }

    #[test]
    fn invalid_source_fails_compilation() {
        let result = parse_and_reflect(&vertex_descriptor("vs_main"), "not wgsl at all");
        assert!(matches!(
            result,
            Err(ShaderError::CompilationFailed {
                stage: ShaderStage::Vertex,
                ..
            })
        ));
    }

    #[test]
    fn odd_texture_binding_is_rejected() {
        let source = r#"
            @group(1) @binding(1) var albedo_texture: texture_2d<f32>;
            @group(1) @binding(2) var albedo_sampler: sampler;

            @fragment
            fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
                return textureSample(albedo_texture, albedo_sampler, uv);
            }
        "#;
        let descriptor = ShaderDescriptor {
            label: None,
            stage: ShaderStage::Pixel,
            entry_point: Cow::Borrowed("fs_main"),
        };
        assert!(matches!(
            parse_and_reflect(&descriptor, source),
            Err(ShaderError::ReflectionFailed { .. })
        ));
    }

    #[test]
    fn compute_shader_reflects_uniforms_only() {
        let source = r#"
            @group(0) @binding(0) var<uniform> step: vec4<f32>;
            @group(0) @binding(1) var<storage, read_write> data: array<vec4<f32>>;

            @compute @workgroup_size(64)
            fn cs_main(@builtin(global_invocation_id) id: vec3<u32>) {
                data[id.x] = data[id.x] + step;
            }
        "#;
        let descriptor = ShaderDescriptor {
            label: None,
            stage: ShaderStage::Compute,
            entry_point: Cow::Borrowed("cs_main"),
        };
        let reflection = parse_and_reflect(&descriptor, source).unwrap();

        assert_eq!(1, reflection.uniform_blocks.len());
        assert_eq!("step", reflection.uniform_blocks[0].name);
        assert!(reflection.vertex_layout.is_none());
    }
}
