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

//! Defines the viewport descriptor.

/// A descriptor for a viewport covering a region of the render target.
///
/// The viewport origin is always the top-left corner of the target; only
/// the extent and depth range are configurable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportDescriptor {
    /// The width of the viewport in pixels.
    pub width: u32,
    /// The height of the viewport in pixels.
    pub height: u32,
    /// The near end of the depth range, normally `0.0`.
    pub min_depth: f32,
    /// The far end of the depth range, normally `1.0`.
    pub max_depth: f32,
}

impl Default for ViewportDescriptor {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_depth_range_is_zero_to_one() {
        let desc = ViewportDescriptor::default();
        assert_eq!(desc.min_depth, 0.0);
        assert_eq!(desc.max_depth, 1.0);
        assert_eq!(desc.width, 0);
        assert_eq!(desc.height, 0);
    }
}
