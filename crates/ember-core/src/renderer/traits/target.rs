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

use crate::renderer::api::viewport::ViewportDescriptor;
use std::any::Any;

/// A color attachment that draws can render into.
///
/// Render targets carry no public state of their own; the backend resolves
/// one to a concrete attachment view when it is bound or cleared.
pub trait RenderTarget: Any + Send + Sync {
    /// Returns a reference to the underlying `Any` trait object.
    fn as_any(&self) -> &dyn Any;
}

/// A viewport covering a region of the render target.
pub trait Viewport: Any + Send + Sync {
    /// Returns the viewport's current dimensions and depth range.
    fn descriptor(&self) -> &ViewportDescriptor;

    /// Resizes the viewport.
    fn set_size(&mut self, width: u32, height: u32);

    /// Changes the depth range mapped by the viewport.
    fn set_depth(&mut self, min_depth: f32, max_depth: f32);

    /// Returns a reference to the underlying `Any` trait object.
    fn as_any(&self) -> &dyn Any;
}
