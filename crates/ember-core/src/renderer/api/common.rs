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

//! Provides common, backend-agnostic enums and data structures for the rendering API.

/// Defines the programmable stage in the graphics pipeline a shader module is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// The vertex shader stage.
    Vertex,
    /// The pixel (fragment) shader stage.
    Pixel,
    /// The geometry shader stage.
    Geometry,
    /// The compute shader stage.
    Compute,
}

/// The shader stage a uniform buffer or texture is bound for.
///
/// Binding a resource for a stage routes it to that stage's binding table.
/// Binding for [`BindStage::Geometry`] is accepted but has no effect on
/// backends without geometry shader support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindStage {
    /// Bind for the vertex shader.
    Vertex,
    /// Bind for the pixel shader.
    Pixel,
    /// Bind for the geometry shader.
    Geometry,
}

/// Flags representing which shader stages can access a resource binding.
///
/// Multiple stages can be combined using bitwise operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderStageFlags {
    bits: u32,
}

impl ShaderStageFlags {
    /// No shader stages.
    pub const NONE: Self = Self { bits: 0 };
    /// Vertex shader stage.
    pub const VERTEX: Self = Self { bits: 1 << 0 };
    /// Pixel shader stage.
    pub const PIXEL: Self = Self { bits: 1 << 1 };
    /// Geometry shader stage.
    pub const GEOMETRY: Self = Self { bits: 1 << 2 };
    /// Compute shader stage.
    pub const COMPUTE: Self = Self { bits: 1 << 3 };
    /// All graphics stages (vertex + pixel).
    pub const VERTEX_PIXEL: Self = Self {
        bits: Self::VERTEX.bits | Self::PIXEL.bits,
    };

    /// Creates a new set of shader stage flags from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// Creates flags from a single shader stage.
    pub const fn from_stage(stage: ShaderStage) -> Self {
        match stage {
            ShaderStage::Vertex => Self::VERTEX,
            ShaderStage::Pixel => Self::PIXEL,
            ShaderStage::Geometry => Self::GEOMETRY,
            ShaderStage::Compute => Self::COMPUTE,
        }
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Combines two sets of flags.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Checks if these flags contain a specific stage.
    pub const fn contains(&self, stage: ShaderStage) -> bool {
        let stage_bits = Self::from_stage(stage).bits;
        (self.bits & stage_bits) == stage_bits
    }

    /// Checks if these flags are empty (no stages).
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl std::ops::BitOr for ShaderStageFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for ShaderStageFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

/// An axis-aligned rectangle in pixel coordinates, used for scissor testing.
///
/// The origin is the top-left corner of the render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// The left edge in pixels.
    pub left: u32,
    /// The right edge in pixels.
    pub right: u32,
    /// The top edge in pixels.
    pub top: u32,
    /// The bottom edge in pixels.
    pub bottom: u32,
}

impl Rect {
    /// Creates a rectangle from its four edges.
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// The width of the rectangle. Returns 0 if the edges are inverted.
    pub const fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    /// The height of the rectangle. Returns 0 if the edges are inverted.
    pub const fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

/// How often a resource's contents are expected to change.
///
/// This is a hint the backend uses to place the resource in suitable memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResourceUsage {
    /// Read and written by the GPU. The common case.
    #[default]
    Default,
    /// Written once at creation, then read-only.
    Immutable,
    /// Updated by the CPU at least once per frame.
    Dynamic,
    /// Used for data transfer between CPU and GPU.
    Staging,
}

/// Flags describing the CPU's access rights to a mappable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CpuAccessFlags {
    bits: u32,
}

impl CpuAccessFlags {
    /// The CPU does not access the resource.
    pub const NONE: Self = Self { bits: 0 };
    /// The CPU can write to the resource.
    pub const WRITE: Self = Self { bits: 1 << 0 };
    /// The CPU can read from the resource.
    pub const READ: Self = Self { bits: 1 << 1 };

    /// Creates a new set of access flags from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self { bits }
    }

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Combines two sets of flags.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Checks if these flags contain all flags in `other`.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Checks if these flags are empty.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl Default for CpuAccessFlags {
    fn default() -> Self {
        Self::NONE
    }
}

impl std::ops::BitOr for CpuAccessFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for CpuAccessFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_stage_flags_from_stage() {
        assert_eq!(
            ShaderStageFlags::from_stage(ShaderStage::Vertex),
            ShaderStageFlags::VERTEX
        );
        assert_eq!(
            ShaderStageFlags::from_stage(ShaderStage::Compute),
            ShaderStageFlags::COMPUTE
        );
    }

    #[test]
    fn shader_stage_flags_union_and_contains() {
        let flags = ShaderStageFlags::VERTEX | ShaderStageFlags::PIXEL;
        assert_eq!(flags, ShaderStageFlags::VERTEX_PIXEL);
        assert!(flags.contains(ShaderStage::Vertex));
        assert!(flags.contains(ShaderStage::Pixel));
        assert!(!flags.contains(ShaderStage::Compute));
        assert!(!flags.is_empty());
    }

    #[test]
    fn shader_stage_flags_or_assign() {
        let mut flags = ShaderStageFlags::NONE;
        assert!(flags.is_empty());
        flags |= ShaderStageFlags::GEOMETRY;
        assert!(flags.contains(ShaderStage::Geometry));
        assert!(!flags.contains(ShaderStage::Vertex));
    }

    #[test]
    fn cpu_access_flags_combination() {
        let rw = CpuAccessFlags::READ | CpuAccessFlags::WRITE;
        assert!(rw.contains(CpuAccessFlags::READ));
        assert!(rw.contains(CpuAccessFlags::WRITE));
        assert!(CpuAccessFlags::default().is_empty());
    }

    #[test]
    fn rect_dimensions() {
        let rect = Rect::new(10, 110, 20, 70);
        assert_eq!(rect.width(), 100);
        assert_eq!(rect.height(), 50);

        let inverted = Rect::new(100, 10, 0, 0);
        assert_eq!(inverted.width(), 0);
    }
}
