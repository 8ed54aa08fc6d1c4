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

//! Defines data structures related to shader modules and their reflected interface.

use super::common::ShaderStage;
use std::borrow::Cow;

/// Describes a shader to be created by the render context.
#[derive(Debug, Clone)]
pub struct ShaderDescriptor {
    /// An optional debug label for the shader module.
    pub label: Option<Cow<'static, str>>,
    /// The pipeline stage the shader is compiled for.
    pub stage: ShaderStage,
    /// The name of the entry point function in the source.
    pub entry_point: Cow<'static, str>,
}

impl Default for ShaderDescriptor {
    fn default() -> Self {
        Self {
            label: None,
            stage: ShaderStage::Vertex,
            entry_point: Cow::Borrowed("main"),
        }
    }
}

/// Metadata for a uniform buffer discovered by shader reflection.
///
/// `size` is the byte size of the block as declared in the shader. The host
/// copy a shader allocates for this block always has exactly this size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformBufferDescriptor {
    /// The block name as declared in the shader source.
    pub name: String,
    /// The byte size of the block.
    pub size: u32,
    /// The binding slot the block is declared at.
    pub binding: u32,
    /// The number of member variables in the block.
    pub variable_count: u32,
}

/// The memory format of a single vertex attribute's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// One 32-bit float component.
    Float32,
    /// Two 32-bit float components.
    Float32x2,
    /// Three 32-bit float components.
    Float32x3,
    /// Four 32-bit float components.
    Float32x4,
    /// One 32-bit unsigned integer component.
    Uint32,
    /// Two 32-bit unsigned integer components.
    Uint32x2,
    /// Three 32-bit unsigned integer components.
    Uint32x3,
    /// Four 32-bit unsigned integer components.
    Uint32x4,
    /// One 32-bit signed integer component.
    Sint32,
    /// Two 32-bit signed integer components.
    Sint32x2,
    /// Three 32-bit signed integer components.
    Sint32x3,
    /// Four 32-bit signed integer components.
    Sint32x4,
}

impl VertexFormat {
    /// The size of one attribute of this format in bytes.
    pub const fn size(&self) -> u32 {
        match self {
            VertexFormat::Float32 | VertexFormat::Uint32 | VertexFormat::Sint32 => 4,
            VertexFormat::Float32x2 | VertexFormat::Uint32x2 | VertexFormat::Sint32x2 => 8,
            VertexFormat::Float32x3 | VertexFormat::Uint32x3 | VertexFormat::Sint32x3 => 12,
            VertexFormat::Float32x4 | VertexFormat::Uint32x4 | VertexFormat::Sint32x4 => 16,
        }
    }
}

/// A single vertex input attribute reflected from a vertex shader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    /// The attribute name from the shader source.
    pub name: String,
    /// The shader location the attribute is bound to.
    pub location: u32,
    /// The data format of the attribute.
    pub format: VertexFormat,
    /// The byte offset of the attribute within one vertex.
    pub offset: u32,
}

/// The complete vertex input layout reflected from a vertex shader.
///
/// Attributes are ordered by location with offsets packed tightly; `stride`
/// is the total byte size of one vertex.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VertexLayout {
    /// The attributes, ordered by shader location.
    pub attributes: Vec<VertexAttribute>,
    /// The byte size of one complete vertex.
    pub stride: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_format_sizes() {
        assert_eq!(VertexFormat::Float32.size(), 4);
        assert_eq!(VertexFormat::Float32x3.size(), 12);
        assert_eq!(VertexFormat::Uint32x4.size(), 16);
        assert_eq!(VertexFormat::Sint32x2.size(), 8);
    }

    #[test]
    fn shader_descriptor_defaults_to_vertex_main() {
        let desc = ShaderDescriptor::default();
        assert_eq!(desc.stage, ShaderStage::Vertex);
        assert_eq!(desc.entry_point.as_ref(), "main");
        assert!(desc.label.is_none());
    }

    #[test]
    fn vertex_layout_default_is_empty() {
        let layout = VertexLayout::default();
        assert!(layout.attributes.is_empty());
        assert_eq!(layout.stride, 0);
    }
}
