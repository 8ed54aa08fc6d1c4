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

//! Backend-agnostic rendering API.
//!
//! Organized into several logical sub-modules:
//!
//! - **[`common`]**: Shared enums (stages, usage, access flags).
//! - **[`buffer`]** / **[`texture`]** / **[`shader`]**: Resource descriptors.
//! - **[`pipeline`]**: Static pipeline state configuration.
//! - **[`viewport`]**: Viewport dimensions and depth range.
//! - **[`context`]**: Device and swapchain configuration.
//!
//! Every descriptor here is a plain value type. A descriptor passed to a
//! creation method is copied into the resource; mutating the original
//! afterwards has no effect on anything already created.

pub mod buffer;
pub mod common;
pub mod context;
pub mod pipeline;
pub mod shader;
pub mod texture;
pub mod viewport;

pub use self::buffer::*;
pub use self::common::*;
pub use self::context::*;
pub use self::pipeline::*;
pub use self::shader::*;
pub use self::texture::*;
pub use self::viewport::*;
