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

//! Defines the hierarchy of error types for the rendering subsystem.

use crate::renderer::api::common::ShaderStage;
use std::fmt;

/// An error related to the creation, compilation, or reflection of a shader.
#[derive(Debug)]
pub enum ShaderError {
    /// The shader source failed to compile into a backend-specific module.
    CompilationFailed {
        /// The pipeline stage the shader was created for.
        stage: ShaderStage,
        /// Detailed error messages from the shader compiler.
        details: String,
    },
    /// The shader compiled but its interface could not be reflected.
    ///
    /// Reflection failures are treated with the same severity as compilation
    /// failures: the shader is unusable without its uniform and input metadata.
    ReflectionFailed {
        /// A description of what reflection could not resolve.
        details: String,
    },
    /// The specified entry point is not present in the compiled module.
    MissingEntryPoint {
        /// The entry point name that was not found.
        entry_point: String,
    },
    /// The requested pipeline stage has no support on the active backend.
    StageUnsupported {
        /// The unsupported stage.
        stage: ShaderStage,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::CompilationFailed { stage, details } => {
                write!(f, "Shader compilation failed for stage {stage:?}: {details}")
            }
            ShaderError::ReflectionFailed { details } => {
                write!(f, "Shader reflection failed: {details}")
            }
            ShaderError::MissingEntryPoint { entry_point } => {
                write!(f, "Entry point '{entry_point}' not found in shader module")
            }
            ShaderError::StageUnsupported { stage } => {
                write!(f, "Shader stage {stage:?} is not supported by this backend")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to the creation or use of a GPU resource (buffers, textures, etc.).
#[derive(Debug)]
pub enum ResourceError {
    /// The descriptor provided for the resource violates a structural requirement.
    InvalidDescriptor(String),
    /// The graphics backend rejected the resource at creation time.
    CreationFailed(String),
    /// A write would land partially or fully outside the resource's storage.
    OutOfBounds {
        /// The byte offset the write started at.
        offset: usize,
        /// The length of the data being written.
        len: usize,
        /// The total size of the resource in bytes.
        capacity: usize,
    },
    /// The data provided does not match the size the resource was created with.
    SizeMismatch {
        /// The size the resource expects, in bytes.
        expected: usize,
        /// The size of the data provided, in bytes.
        actual: usize,
    },
    /// A shader-specific error occurred.
    Shader(ShaderError),
    /// A resource created by a different backend was passed to this one.
    BackendMismatch,
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::InvalidDescriptor(msg) => {
                write!(f, "Invalid resource descriptor: {msg}")
            }
            ResourceError::CreationFailed(msg) => {
                write!(f, "Backend failed to create resource: {msg}")
            }
            ResourceError::OutOfBounds {
                offset,
                len,
                capacity,
            } => {
                write!(
                    f,
                    "Write of {len} bytes at offset {offset} exceeds resource capacity of {capacity} bytes"
                )
            }
            ResourceError::SizeMismatch { expected, actual } => {
                write!(
                    f,
                    "Data size mismatch: resource expects {expected} bytes, got {actual}"
                )
            }
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::BackendMismatch => {
                write!(f, "Resource was created by a different graphics backend.")
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

/// An error related to the lifecycle of the render context itself.
#[derive(Debug)]
pub enum ContextError {
    /// `create_device` was called while a device already exists.
    DeviceAlreadyCreated,
    /// `create_swapchain` was called while a swapchain already exists.
    SwapchainAlreadyCreated,
    /// An operation requiring a device was attempted before `create_device`.
    DeviceNotCreated,
    /// An operation requiring a swapchain was attempted before `create_swapchain`.
    SwapchainNotCreated,
    /// No graphics adapter compatible with the surface could be found.
    NoSuitableAdapter,
    /// The adapter refused to provide a logical device.
    DeviceRequestFailed(String),
    /// The rendering surface could not be created from the window handle.
    SurfaceCreationFailed(String),
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextError::DeviceAlreadyCreated => {
                write!(f, "A graphics device has already been created.")
            }
            ContextError::SwapchainAlreadyCreated => {
                write!(f, "A swapchain has already been created.")
            }
            ContextError::DeviceNotCreated => {
                write!(f, "No graphics device has been created yet.")
            }
            ContextError::SwapchainNotCreated => {
                write!(f, "No swapchain has been created yet.")
            }
            ContextError::NoSuitableAdapter => {
                write!(f, "No suitable graphics adapter was found.")
            }
            ContextError::DeviceRequestFailed(msg) => {
                write!(f, "Failed to request logical device: {msg}")
            }
            ContextError::SurfaceCreationFailed(msg) => {
                write!(f, "Failed to create rendering surface: {msg}")
            }
        }
    }
}

impl std::error::Error for ContextError {}

/// A high-level error that can occur while recording or submitting frame work.
#[derive(Debug)]
pub enum RenderError {
    /// Failed to acquire the next frame from the swapchain/surface for rendering.
    ///
    /// Usually transient; the caller may retry on the next frame.
    SurfaceAcquisitionFailed(String),
    /// The backend failed to build a pipeline from the bound state.
    PipelineCreationFailed(String),
    /// A draw was issued with no render target bound.
    MissingRenderTarget,
    /// A draw was issued with no vertex shader bound.
    MissingVertexShader,
    /// A draw was issued but the vertex shader consumes vertex attributes and
    /// no vertex buffer is bound.
    MissingVertexBuffer,
    /// An indexed draw was issued with no index buffer bound.
    MissingIndexBuffer,
    /// A uniform buffer declared by the bound shaders was never bound.
    UniformNotBound {
        /// The name of the missing uniform block.
        name: String,
    },
    /// A texture slot declared by the pixel shader has no texture bound.
    TextureNotBound {
        /// The sampler/texture slot that is missing.
        slot: u32,
    },
    /// Two different uniform buffers were bound to the same shader binding.
    ConflictingUniformBinding {
        /// The binding index both buffers mapped to.
        binding: u32,
    },
    /// An error occurred while managing a GPU resource.
    Resource(ResourceError),
    /// A context lifecycle violation occurred.
    Context(ContextError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::SurfaceAcquisitionFailed(msg) => {
                write!(f, "Failed to acquire surface for rendering: {msg}")
            }
            RenderError::PipelineCreationFailed(msg) => {
                write!(f, "Failed to create render pipeline: {msg}")
            }
            RenderError::MissingRenderTarget => {
                write!(f, "Draw issued with no render target bound.")
            }
            RenderError::MissingVertexShader => {
                write!(f, "Draw issued with no vertex shader bound.")
            }
            RenderError::MissingVertexBuffer => {
                write!(f, "Draw issued with no vertex buffer bound.")
            }
            RenderError::MissingIndexBuffer => {
                write!(f, "Indexed draw issued with no index buffer bound.")
            }
            RenderError::UniformNotBound { name } => {
                write!(f, "Uniform buffer '{name}' is declared but not bound.")
            }
            RenderError::TextureNotBound { slot } => {
                write!(f, "Texture slot {slot} is declared but has no texture bound.")
            }
            RenderError::ConflictingUniformBinding { binding } => {
                write!(
                    f,
                    "Conflicting uniform buffers bound to shader binding {binding}."
                )
            }
            RenderError::Resource(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
            RenderError::Context(err) => {
                write!(f, "Render context error: {err}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Resource(err) => Some(err),
            RenderError::Context(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::Resource(err)
    }
}

impl From<ContextError> for RenderError {
    fn from(err: ContextError) -> Self {
        RenderError::Context(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn shader_error_display() {
        let err = ShaderError::CompilationFailed {
            stage: ShaderStage::Vertex,
            details: "Syntax error at line 5".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Shader compilation failed for stage Vertex: Syntax error at line 5"
        );

        let err_refl = ShaderError::ReflectionFailed {
            details: "binding for 'Globals' is missing".to_string(),
        };
        assert_eq!(
            format!("{err_refl}"),
            "Shader reflection failed: binding for 'Globals' is missing"
        );
    }

    #[test]
    fn resource_error_display_wrapping_shader_error() {
        let shader_err = ShaderError::MissingEntryPoint {
            entry_point: "vs_main".to_string(),
        };
        let res_err: ResourceError = shader_err.into();
        assert_eq!(
            format!("{res_err}"),
            "Shader resource error: Entry point 'vs_main' not found in shader module"
        );
        assert!(res_err.source().is_some());
    }

    #[test]
    fn resource_error_out_of_bounds_display() {
        let err = ResourceError::OutOfBounds {
            offset: 60,
            len: 16,
            capacity: 64,
        };
        assert_eq!(
            format!("{err}"),
            "Write of 16 bytes at offset 60 exceeds resource capacity of 64 bytes"
        );
    }

    #[test]
    fn render_error_display_wrapping_context_error() {
        let ctx_err = ContextError::DeviceNotCreated;
        let render_err: RenderError = ctx_err.into();
        assert_eq!(
            format!("{render_err}"),
            "Render context error: No graphics device has been created yet."
        );
        assert!(render_err.source().is_some());
    }

    #[test]
    fn render_error_source_chain_reaches_shader_error() {
        let shader_err = ShaderError::StageUnsupported {
            stage: ShaderStage::Geometry,
        };
        let res_err: ResourceError = shader_err.into();
        let render_err: RenderError = res_err.into();
        assert!(render_err.source().is_some());
        assert!(render_err.source().unwrap().source().is_some());
    }
}
