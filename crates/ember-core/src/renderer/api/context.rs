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

//! Defines configuration structures for the device and swapchain lifecycle.

use super::texture::TextureFormat;

/// A backend-agnostic representation of a graphics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GraphicsBackendType {
    /// Vulkan API.
    Vulkan,
    /// Apple's Metal API.
    Metal,
    /// Microsoft's DirectX 12 API.
    Dx12,
    /// OpenGL API.
    OpenGL,
    /// WebGPU API (for web builds).
    WebGpu,
    /// An unknown or unsupported backend.
    #[default]
    Unknown,
}

/// The physical type of a graphics device (GPU).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RendererDeviceType {
    /// A GPU integrated into the CPU.
    IntegratedGpu,
    /// A discrete, dedicated GPU.
    DiscreteGpu,
    /// A virtualized or software-based GPU.
    VirtualGpu,
    /// A software renderer running on the CPU.
    Cpu,
    /// An unknown or unsupported device type.
    #[default]
    Unknown,
}

/// Provides standardized, backend-agnostic information about the graphics adapter.
#[derive(Debug, Clone, Default)]
pub struct RendererAdapterInfo {
    /// The name of the adapter (e.g., "NVIDIA GeForce RTX 4090").
    pub name: String,
    /// The graphics API backend this adapter is associated with.
    pub backend_type: GraphicsBackendType,
    /// The physical type of the adapter.
    pub device_type: RendererDeviceType,
}

/// A descriptor that defines the resolution and presentation format of a device.
///
/// The context stores a copy at creation; [`RenderContext::device_descriptor`]
/// returns exactly what was passed in, with no backend-applied adjustments.
///
/// [`RenderContext::device_descriptor`]: crate::renderer::traits::RenderContext::device_descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// The width of the presentation area in pixels.
    pub width: u32,
    /// The height of the presentation area in pixels.
    pub height: u32,
    /// The presentation texture format.
    pub format: TextureFormat,
}

impl Default for DeviceDescriptor {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            format: TextureFormat::Rgba8Unorm,
        }
    }
}

/// A descriptor that defines the swapchain textures used for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapchainDescriptor {
    /// The width of the swapchain textures in pixels.
    pub width: u32,
    /// The height of the swapchain textures in pixels.
    pub height: u32,
    /// The format of the swapchain textures.
    pub format: TextureFormat,
    /// Whether presentation happens in a window rather than exclusive fullscreen.
    pub windowed: bool,
    /// The numerator of the display refresh rate.
    pub refresh_rate_numerator: u16,
    /// The denominator of the display refresh rate.
    pub refresh_rate_denominator: u16,
}

impl Default for SwapchainDescriptor {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            format: TextureFormat::Rgba8Unorm,
            windowed: true,
            refresh_rate_numerator: 60,
            refresh_rate_denominator: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_descriptor_defaults() {
        let desc = DeviceDescriptor::default();
        assert_eq!(desc.width, 0);
        assert_eq!(desc.height, 0);
        assert_eq!(desc.format, TextureFormat::Rgba8Unorm);
    }

    #[test]
    fn swapchain_descriptor_defaults_to_windowed_60hz() {
        let desc = SwapchainDescriptor::default();
        assert!(desc.windowed);
        assert_eq!(desc.refresh_rate_numerator, 60);
        assert_eq!(desc.refresh_rate_denominator, 1);
        assert_eq!(desc.format, TextureFormat::Rgba8Unorm);
    }
}
