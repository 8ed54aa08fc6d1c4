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

use ember_core::renderer::api::ViewportDescriptor;
use ember_core::renderer::error::ResourceError;
use ember_core::renderer::traits::{RenderTarget, Texture2D, Viewport};
use std::any::Any;

use super::texture::{BackBufferSlot, TextureBacking, WgpuTexture2D};

#[derive(Clone)]
enum TargetBacking {
    /// A view over a render-target texture, created once.
    Texture { view: wgpu::TextureView },
    /// The swapchain back buffer, re-resolved on every use since the live
    /// view changes with each acquire.
    BackBuffer { slot: BackBufferSlot },
}

/// A color attachment the context can clear and draw into.
#[derive(Clone)]
pub struct WgpuRenderTarget {
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    backing: TargetBacking,
}

impl WgpuRenderTarget {
    pub(crate) fn for_texture(texture: &WgpuTexture2D) -> Result<Self, ResourceError> {
        if !texture.descriptor().render_target {
            return Err(ResourceError::InvalidDescriptor(
                "texture was not created as a render target".into(),
            ));
        }

        let format = super::conversions::IntoWgpu::into_wgpu(texture.descriptor().format);
        let backing = match texture.backing() {
            TextureBacking::Owned {
                texture: wgpu_texture,
                ..
            } => TargetBacking::Texture {
                // Attachments are always a single 2D slice, also for cubemap
                // textures, which attach through their first face.
                view: wgpu_texture.create_view(&wgpu::TextureViewDescriptor {
                    label: texture.descriptor().label.as_deref(),
                    dimension: Some(wgpu::TextureViewDimension::D2),
                    base_mip_level: 0,
                    mip_level_count: Some(1),
                    base_array_layer: 0,
                    array_layer_count: Some(1),
                    ..Default::default()
                }),
            },
            TextureBacking::BackBuffer { slot } => TargetBacking::BackBuffer {
                slot: slot.clone(),
            },
        };

        Ok(Self {
            format,
            width: texture.descriptor().width,
            height: texture.descriptor().height,
            backing,
        })
    }

    /// The view to attach for the next pass, or `None` when the back buffer
    /// has not been acquired yet this frame.
    pub(crate) fn resolve_view(&self) -> Option<wgpu::TextureView> {
        match &self.backing {
            TargetBacking::Texture { view } => Some(view.clone()),
            TargetBacking::BackBuffer { slot } => slot.lock().unwrap().clone(),
        }
    }

    pub(crate) fn is_back_buffer(&self) -> bool {
        matches!(self.backing, TargetBacking::BackBuffer { .. })
    }

    pub(crate) fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// The attachment extent in pixels, used to clamp viewport and scissor
    /// rectangles to what the pass can legally cover.
    pub(crate) fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl RenderTarget for WgpuRenderTarget {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl std::fmt::Debug for WgpuRenderTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuRenderTarget")
            .field("format", &self.format)
            .field("back_buffer", &self.is_back_buffer())
            .finish()
    }
}

/// Viewport state applied through `set_viewport`.
#[derive(Debug, Clone)]
pub struct WgpuViewport {
    descriptor: ViewportDescriptor,
}

impl WgpuViewport {
    pub(crate) fn new(descriptor: &ViewportDescriptor) -> Self {
        Self {
            descriptor: *descriptor,
        }
    }
}

impl Viewport for WgpuViewport {
    fn descriptor(&self) -> &ViewportDescriptor {
        &self.descriptor
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.descriptor.width = width;
        self.descriptor.height = height;
    }

    fn set_depth(&mut self, min_depth: f32, max_depth: f32) {
        self.descriptor.min_depth = min_depth;
        self.descriptor.max_depth = max_depth;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_tracks_size_changes() {
        let mut viewport = WgpuViewport::new(&ViewportDescriptor {
            width: 800,
            height: 600,
            ..Default::default()
        });

        viewport.set_size(1920, 1080);

        assert_eq!(1920, viewport.descriptor().width);
        assert_eq!(1080, viewport.descriptor().height);
    }

    #[test]
    fn viewport_tracks_depth_changes() {
        let mut viewport = WgpuViewport::new(&ViewportDescriptor::default());

        viewport.set_depth(0.25, 0.75);

        assert_eq!(0.25, viewport.descriptor().min_depth);
        assert_eq!(0.75, viewport.descriptor().max_depth);
        assert_eq!(0, viewport.descriptor().width);
    }
}
