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

use crate::platform::event::WindowEvent;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::sync::Arc;

/// Combines the windowing handle traits required by graphics backends into
/// one object-safe trait.
pub trait WindowHandleSource: HasWindowHandle + HasDisplayHandle {}

impl<T: HasWindowHandle + HasDisplayHandle> WindowHandleSource for T {}

/// A shared, thread-safe handle to a live OS window.
///
/// The render context keeps one of these alive for as long as its swapchain
/// exists, so the surface can never outlive the window behind it.
pub type SurfaceHandle = Arc<dyn WindowHandleSource + Send + Sync>;

/// Configuration for creating an OS window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDescriptor {
    /// The width of the client area in physical pixels.
    pub width: u32,
    /// The height of the client area in physical pixels.
    pub height: u32,
    /// The internal window name, used where the OS wants a class-like identifier.
    pub name: String,
    /// The text shown in the window's title bar.
    pub title: String,
}

impl WindowDescriptor {
    /// Returns the descriptor with the title bar text replaced.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Returns the descriptor with the client area size replaced.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl Default for WindowDescriptor {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            name: String::from("ember-window"),
            title: String::from("Ember Engine"),
        }
    }
}

/// A trait that abstracts the behavior of an OS window.
///
/// Any windowing backend (Winit, SDL2, Glfw, etc.) can implement this trait
/// to drive the engine. The window delivers its raw events through the
/// sender installed with [`set_event_sender`]; while no sender is installed,
/// events are silently discarded.
///
/// [`set_event_sender`]: EngineWindow::set_event_sender
pub trait EngineWindow {
    /// Creates and initializes the window without showing it.
    ///
    /// Returns `false` if the OS refuses to create the window. Calling this
    /// twice on the same instance is a misuse and also returns `false`.
    fn init(&mut self, descriptor: &WindowDescriptor) -> bool;

    /// Pumps the OS message loop, draining a bounded batch of pending
    /// messages and publishing the translated events.
    ///
    /// Must be called once per frame. Calling it more than once per frame is
    /// safe and simply drains more messages.
    ///
    /// ## Returns
    /// `true` if the window was closed during this call.
    fn update(&mut self) -> bool;

    /// Shows the window.
    ///
    /// Returns the previous visibility state: `true` if the window was
    /// already visible.
    fn show(&mut self) -> bool;

    /// Hides the window.
    ///
    /// Returns the previous visibility state, like [`EngineWindow::show`].
    fn hide(&mut self) -> bool;

    /// Returns whether the window is currently visible.
    ///
    /// This checks the visibility flag only; a window fully covered by other
    /// windows still reports `true`.
    fn is_visible(&self) -> bool;

    /// Returns the size of the client area available for drawing, in
    /// physical pixels, or `(0, 0)` if the window is not initialized.
    fn client_size(&self) -> (u32, u32);

    /// Returns the outer window size, including decorations, or `(0, 0)` if
    /// the window is not initialized.
    fn window_size(&self) -> (u32, u32);

    /// Confines the cursor to the window's client area, or releases it.
    ///
    /// Best-effort: a backend that cannot confine the cursor ignores the call.
    fn confine_cursor(&mut self, confine: bool);

    /// Installs the sender half of the event channel the window publishes into.
    ///
    /// Replaces any previously installed sender.
    fn set_event_sender(&mut self, sender: flume::Sender<WindowEvent>);

    /// Clones a shared handle suitable for surface creation.
    ///
    /// Returns `None` before [`EngineWindow::init`] succeeds.
    fn surface_handle(&self) -> Option<SurfaceHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_defaults() {
        let descriptor = WindowDescriptor::default();
        assert_eq!(descriptor.width, 1024);
        assert_eq!(descriptor.height, 768);
        assert_eq!(descriptor.name, "ember-window");
        assert_eq!(descriptor.title, "Ember Engine");
    }

    #[test]
    fn descriptor_builder_chains() {
        let descriptor = WindowDescriptor::default()
            .with_title("Demo")
            .with_dimensions(640, 480);
        assert_eq!(descriptor.title, "Demo");
        assert_eq!(descriptor.width, 640);
        assert_eq!(descriptor.height, 480);
        assert_eq!(descriptor.name, "ember-window");
    }
}
