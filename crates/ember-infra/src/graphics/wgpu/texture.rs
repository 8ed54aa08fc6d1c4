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

use ember_core::renderer::api::{Texture2DDescriptor, TextureKind};
use ember_core::renderer::error::ResourceError;
use ember_core::renderer::traits::Texture2D;
use std::any::Any;
use std::sync::{Arc, Mutex};

use super::conversions::{texture_usages, IntoWgpu};

/// The shared slot through which the context republishes the live surface
/// view after every acquire.
pub(crate) type BackBufferSlot = Arc<Mutex<Option<wgpu::TextureView>>>;

/// What a [`WgpuTexture2D`] resolves to on the GPU.
pub(crate) enum TextureBacking {
    /// A texture owned by this object. `view` is the sampling view for color
    /// textures and the attachment view for depth textures.
    Owned {
        /// The driver texture.
        texture: wgpu::Texture,
        /// The default view over the whole texture.
        view: wgpu::TextureView,
    },
    /// The swapchain back buffer. The slot holds the current frame's view,
    /// or `None` between present and the next acquire.
    BackBuffer {
        /// Shared with the context's swapchain state.
        slot: BackBufferSlot,
    },
}

/// A 2D texture backed by a `wgpu::Texture`, or by the swapchain surface.
pub struct WgpuTexture2D {
    descriptor: Texture2DDescriptor,
    queue: wgpu::Queue,
    backing: TextureBacking,
}

impl WgpuTexture2D {
    /// Creates a color texture, uploading one data slice per layer when
    /// initial data is given.
    pub(crate) fn create(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        descriptor: &Texture2DDescriptor,
        initial_data: Option<&[&[u8]]>,
    ) -> Result<Self, ResourceError> {
        validate_color_descriptor(descriptor)?;
        validate_initial_data(descriptor, initial_data)?;

        let layer_count = descriptor.kind.layer_count();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: descriptor.label.as_deref(),
            size: wgpu::Extent3d {
                width: descriptor.width,
                height: descriptor.height,
                depth_or_array_layers: layer_count,
            },
            mip_level_count: descriptor.mip_level_count.max(1),
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: descriptor.format.into_wgpu(),
            usage: texture_usages(descriptor),
            view_formats: &[],
        });

        if let Some(layers) = initial_data {
            for (layer, data) in layers.iter().enumerate() {
                upload_layer(queue, &texture, descriptor, layer as u32, data);
            }
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: descriptor.label.as_deref(),
            dimension: Some(match descriptor.kind {
                TextureKind::Regular => wgpu::TextureViewDimension::D2,
                TextureKind::Cubemap => wgpu::TextureViewDimension::Cube,
            }),
            ..Default::default()
        });

        log::info!(
            "WgpuTexture2D: Created texture '{}' ({}x{}, {:?}, {:?})",
            descriptor.label.as_deref().unwrap_or_default(),
            descriptor.width,
            descriptor.height,
            descriptor.format,
            descriptor.kind,
        );

        Ok(Self {
            descriptor: descriptor.clone(),
            queue: queue.clone(),
            backing: TextureBacking::Owned { texture, view },
        })
    }

    /// Creates a depth texture.
    ///
    /// The stored descriptor is normalized the way the GPU will actually use
    /// it: default usage, no mips, never a color target.
    pub(crate) fn create_depth(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        descriptor: &Texture2DDescriptor,
    ) -> Result<Self, ResourceError> {
        validate_depth_descriptor(descriptor)?;

        let descriptor = Texture2DDescriptor {
            usage: Default::default(),
            mip_level_count: 1,
            render_target: false,
            ..descriptor.clone()
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: descriptor.label.as_deref(),
            size: wgpu::Extent3d {
                width: descriptor.width,
                height: descriptor.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: descriptor.format.into_wgpu(),
            usage: texture_usages(&descriptor),
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: descriptor.label.as_deref(),
            ..Default::default()
        });

        log::info!(
            "WgpuTexture2D: Created depth texture '{}' ({}x{}, {:?})",
            descriptor.label.as_deref().unwrap_or_default(),
            descriptor.width,
            descriptor.height,
            descriptor.format,
        );

        Ok(Self {
            descriptor,
            queue: queue.clone(),
            backing: TextureBacking::Owned { texture, view },
        })
    }

    /// Wraps the swapchain back buffer. The context refills `slot` with the
    /// live surface view after each acquire.
    pub(crate) fn back_buffer(
        descriptor: Texture2DDescriptor,
        queue: wgpu::Queue,
        slot: BackBufferSlot,
    ) -> Self {
        Self {
            descriptor,
            queue,
            backing: TextureBacking::BackBuffer { slot },
        }
    }

    pub(crate) fn backing(&self) -> &TextureBacking {
        &self.backing
    }

    /// The view used when this texture is sampled or bound as a depth
    /// attachment. `None` for the back buffer, which is never sampled.
    pub(crate) fn texture_view(&self) -> Option<&wgpu::TextureView> {
        match &self.backing {
            TextureBacking::Owned { view, .. } => Some(view),
            TextureBacking::BackBuffer { .. } => None,
        }
    }
}

impl Texture2D for WgpuTexture2D {
    fn descriptor(&self) -> &Texture2DDescriptor {
        &self.descriptor
    }

    fn set_data(&self, data: &[u8]) -> Result<(), ResourceError> {
        if self.descriptor.format.is_depth_format() {
            return Err(ResourceError::InvalidDescriptor(
                "depth textures do not accept uploads".into(),
            ));
        }
        if self.descriptor.render_target {
            return Err(ResourceError::InvalidDescriptor(
                "render target textures do not accept uploads".into(),
            ));
        }
        if self.descriptor.kind == TextureKind::Cubemap {
            return Err(ResourceError::InvalidDescriptor(
                "cubemap face data is provided at creation".into(),
            ));
        }

        let expected = layer_size_in_bytes(&self.descriptor);
        if data.len() != expected {
            return Err(ResourceError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        match &self.backing {
            TextureBacking::Owned { texture, .. } => {
                upload_layer(&self.queue, texture, &self.descriptor, 0, data);
                log::debug!(
                    "WgpuTexture2D: Wrote {} bytes to texture '{}'",
                    data.len(),
                    self.descriptor.label.as_deref().unwrap_or_default(),
                );
                Ok(())
            }
            // Unreachable through the public constructors: the back buffer
            // descriptor always carries `render_target`.
            TextureBacking::BackBuffer { .. } => Err(ResourceError::InvalidDescriptor(
                "the back buffer does not accept uploads".into(),
            )),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl std::fmt::Debug for WgpuTexture2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuTexture2D")
            .field("descriptor", &self.descriptor)
            .field(
                "backing",
                match &self.backing {
                    TextureBacking::Owned { .. } => &"Owned",
                    TextureBacking::BackBuffer { .. } => &"BackBuffer",
                },
            )
            .finish()
    }
}

/// One tightly packed layer of the texture, in bytes.
fn layer_size_in_bytes(descriptor: &Texture2DDescriptor) -> usize {
    descriptor.width as usize
        * descriptor.height as usize
        * descriptor.format.bytes_per_pixel() as usize
}

fn validate_color_descriptor(descriptor: &Texture2DDescriptor) -> Result<(), ResourceError> {
    if descriptor.width == 0 || descriptor.height == 0 {
        return Err(ResourceError::InvalidDescriptor(
            "texture dimensions must be non-zero".into(),
        ));
    }
    if descriptor.format.is_depth_format() {
        return Err(ResourceError::InvalidDescriptor(
            "depth formats are created through the depth texture path".into(),
        ));
    }
    Ok(())
}

fn validate_initial_data(
    descriptor: &Texture2DDescriptor,
    initial_data: Option<&[&[u8]]>,
) -> Result<(), ResourceError> {
    let Some(layers) = initial_data else {
        return Ok(());
    };

    let expected_layers = descriptor.kind.layer_count() as usize;
    if layers.len() != expected_layers {
        return Err(ResourceError::InvalidDescriptor(format!(
            "{:?} textures take {} data slice(s), got {}",
            descriptor.kind,
            expected_layers,
            layers.len()
        )));
    }

    let layer_size = layer_size_in_bytes(descriptor);
    for data in layers {
        if data.len() != layer_size {
            return Err(ResourceError::SizeMismatch {
                expected: layer_size,
                actual: data.len(),
            });
        }
    }
    Ok(())
}

fn validate_depth_descriptor(descriptor: &Texture2DDescriptor) -> Result<(), ResourceError> {
    if descriptor.width == 0 || descriptor.height == 0 {
        return Err(ResourceError::InvalidDescriptor(
            "texture dimensions must be non-zero".into(),
        ));
    }
    if !descriptor.format.is_depth_format() {
        return Err(ResourceError::InvalidDescriptor(format!(
            "{:?} is not a depth format",
            descriptor.format
        )));
    }
    if descriptor.kind == TextureKind::Cubemap {
        return Err(ResourceError::InvalidDescriptor(
            "depth textures cannot be cubemaps".into(),
        ));
    }
    Ok(())
}

fn upload_layer(
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    descriptor: &Texture2DDescriptor,
    layer: u32,
    data: &[u8],
) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d {
                x: 0,
                y: 0,
                z: layer,
            },
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(descriptor.width * descriptor.format.bytes_per_pixel()),
            rows_per_image: Some(descriptor.height),
        },
        wgpu::Extent3d {
            width: descriptor.width,
            height: descriptor.height,
            depth_or_array_layers: 1,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::renderer::api::TextureFormat;

    fn rgba_descriptor(width: u32, height: u32) -> Texture2DDescriptor {
        Texture2DDescriptor {
            width,
            height,
            format: TextureFormat::Rgba8Unorm,
            ..Default::default()
        }
    }

    #[test]
    fn zero_extent_is_rejected() {
        let descriptor = rgba_descriptor(0, 4);
        assert!(matches!(
            validate_color_descriptor(&descriptor),
            Err(ResourceError::InvalidDescriptor(_))
        ));
    }

    #[test]
    fn depth_format_is_rejected_on_color_path() {
        let descriptor = Texture2DDescriptor {
            format: TextureFormat::Depth32Float,
            ..rgba_descriptor(4, 4)
        };
        assert!(matches!(
            validate_color_descriptor(&descriptor),
            Err(ResourceError::InvalidDescriptor(_))
        ));
    }

    #[test]
    fn color_format_is_rejected_on_depth_path() {
        let descriptor = rgba_descriptor(4, 4);
        assert!(matches!(
            validate_depth_descriptor(&descriptor),
            Err(ResourceError::InvalidDescriptor(_))
        ));
    }

    #[test]
    fn cubemap_requires_six_slices() {
        let descriptor = Texture2DDescriptor {
            kind: TextureKind::Cubemap,
            ..rgba_descriptor(2, 2)
        };
        let face = [0u8; 16];
        let five: Vec<&[u8]> = (0..5).map(|_| &face[..]).collect();
        assert!(matches!(
            validate_initial_data(&descriptor, Some(&five)),
            Err(ResourceError::InvalidDescriptor(_))
        ));

        let six: Vec<&[u8]> = (0..6).map(|_| &face[..]).collect();
        assert!(validate_initial_data(&descriptor, Some(&six)).is_ok());
    }

    #[test]
    fn regular_texture_takes_one_slice() {
        let descriptor = rgba_descriptor(2, 2);
        let pixels = [0u8; 16];
        let two: Vec<&[u8]> = (0..2).map(|_| &pixels[..]).collect();
        assert!(matches!(
            validate_initial_data(&descriptor, Some(&two)),
            Err(ResourceError::InvalidDescriptor(_))
        ));
        assert!(validate_initial_data(&descriptor, Some(&[&pixels[..]])).is_ok());
    }

    #[test]
    fn short_slice_reports_size_mismatch() {
        let descriptor = rgba_descriptor(2, 2);
        let short = [0u8; 8];
        assert!(matches!(
            validate_initial_data(&descriptor, Some(&[&short[..]])),
            Err(ResourceError::SizeMismatch {
                expected: 16,
                actual: 8
            })
        ));
    }

    #[test]
    fn missing_data_is_fine() {
        let descriptor = Texture2DDescriptor {
            kind: TextureKind::Cubemap,
            ..rgba_descriptor(2, 2)
        };
        assert!(validate_initial_data(&descriptor, None).is_ok());
    }

    #[test]
    fn layer_size_follows_format() {
        assert_eq!(16, layer_size_in_bytes(&rgba_descriptor(2, 2)));
        let half_float = Texture2DDescriptor {
            format: TextureFormat::Rgba16Float,
            ..rgba_descriptor(2, 2)
        };
        assert_eq!(32, layer_size_in_bytes(&half_float));
    }
}
