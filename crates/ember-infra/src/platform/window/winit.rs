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

//! A `winit`-based implementation of the `EngineWindow` trait.

use crate::platform::input::{translate_device_event, translate_window_event};
use ember_core::platform::event::WindowEvent;
use ember_core::platform::window::{EngineWindow, SurfaceHandle, WindowDescriptor};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, WindowEvent as WinitWindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{CursorGrabMode, Window, WindowId};

/// The maximum number of translated events forwarded per `update` call.
///
/// Events beyond the batch stay buffered for the next call, so a burst of OS
/// messages cannot stall a frame.
const EVENT_BATCH_LIMIT: usize = 16;

/// The state driven by the winit application callbacks.
///
/// `pump_app_events` borrows the event loop and the handler at the same time,
/// so everything the callbacks touch lives here, apart from the loop itself.
#[derive(Debug)]
struct WindowState {
    descriptor: WindowDescriptor,
    window: Option<Arc<Window>>,
    pending: VecDeque<WindowEvent>,
    close_requested: bool,
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.descriptor.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.descriptor.width,
                self.descriptor.height,
            ))
            .with_visible(false);

        match event_loop.create_window(attributes) {
            Ok(window) => {
                log::info!("WinitWindow: window created (id: {:?}).", window.id());
                self.window = Some(Arc::new(window));
            }
            Err(error) => {
                log::error!("WinitWindow: window creation failed: {error}");
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WinitWindowEvent,
    ) {
        let Some(window) = &self.window else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        if matches!(event, WinitWindowEvent::CloseRequested) {
            log::info!("WinitWindow: close requested.");
            self.close_requested = true;
        }

        if let Some(translated) = translate_window_event(&event) {
            self.pending.push_back(translated);
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(translated) = translate_device_event(&event) {
            self.pending.push_back(translated);
        }
    }
}

/// A desktop window backed by `winit`, pumped cooperatively from the frame loop.
///
/// The window owns its own event loop and drains it with a zero timeout on
/// every [`EngineWindow::update`] call, so the engine keeps control of the
/// frame instead of handing it to a callback-driven run loop. Translated
/// events are forwarded to the sender installed with
/// [`EngineWindow::set_event_sender`].
pub struct WinitWindow {
    event_loop: Option<EventLoop<()>>,
    state: WindowState,
    sender: Option<flume::Sender<WindowEvent>>,
    visible: bool,
}

impl WinitWindow {
    /// Creates a window wrapper with no OS resources behind it yet.
    ///
    /// Call [`EngineWindow::init`] to create the actual window.
    pub fn new() -> Self {
        Self {
            event_loop: None,
            state: WindowState {
                descriptor: WindowDescriptor::default(),
                window: None,
                pending: VecDeque::new(),
                close_requested: false,
            },
            sender: None,
            visible: false,
        }
    }

    /// Drains the OS message queue without blocking.
    fn pump_platform(&mut self) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };

        let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.state);
        if let PumpStatus::Exit(code) = status {
            log::info!("WinitWindow: event loop exited (code {code}).");
            self.state.close_requested = true;
        }
    }

    /// Forwards at most [`EVENT_BATCH_LIMIT`] buffered events to the installed
    /// sender. Without a sender the buffer is discarded.
    fn forward_events(&mut self) {
        let Some(sender) = &self.sender else {
            self.state.pending.clear();
            return;
        };

        let batch = self.state.pending.len().min(EVENT_BATCH_LIMIT);
        for _ in 0..batch {
            let Some(event) = self.state.pending.pop_front() else {
                break;
            };
            match sender.try_send(event) {
                Ok(()) => {}
                Err(flume::TrySendError::Full(dropped)) => {
                    log::warn!("WinitWindow: event queue full, dropping {dropped:?}.");
                }
                Err(flume::TrySendError::Disconnected(_)) => {
                    log::error!("WinitWindow: event receiver disconnected, discarding events.");
                    self.sender = None;
                    self.state.pending.clear();
                    return;
                }
            }
        }
    }
}

impl Default for WinitWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WinitWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WinitWindow")
            .field("initialized", &self.state.window.is_some())
            .field("visible", &self.visible)
            .field("close_requested", &self.state.close_requested)
            .field("pending_events", &self.state.pending.len())
            .finish()
    }
}

impl EngineWindow for WinitWindow {
    /// Creates the OS window, hidden, sized from the descriptor.
    ///
    /// The descriptor's `name` has no portable `winit` equivalent and is
    /// ignored by this backend; only `title` reaches the OS.
    fn init(&mut self, descriptor: &WindowDescriptor) -> bool {
        if self.event_loop.is_some() || self.state.window.is_some() {
            log::warn!("WinitWindow: init called on an already initialized window.");
            return false;
        }

        let event_loop = match EventLoop::new() {
            Ok(event_loop) => event_loop,
            Err(error) => {
                log::error!("WinitWindow: event loop creation failed: {error}");
                return false;
            }
        };

        log::info!(
            "WinitWindow: creating window '{}' ({}x{}).",
            descriptor.title,
            descriptor.width,
            descriptor.height
        );

        self.state.descriptor = descriptor.clone();
        self.event_loop = Some(event_loop);

        // The first pump delivers the resume callback that creates the window.
        self.pump_platform();

        if self.state.window.is_none() {
            log::error!("WinitWindow: no window arrived during initialization.");
            self.event_loop = None;
            return false;
        }
        true
    }

    /// Pumps the message loop and forwards a bounded batch of events.
    ///
    /// Once the window has been closed, every later call keeps returning
    /// `true`.
    fn update(&mut self) -> bool {
        self.pump_platform();
        self.forward_events();
        self.state.close_requested
    }

    fn show(&mut self) -> bool {
        let previous = self.visible;
        if let Some(window) = &self.state.window {
            window.set_visible(true);
            self.visible = true;
        }
        previous
    }

    fn hide(&mut self) -> bool {
        let previous = self.visible;
        if let Some(window) = &self.state.window {
            window.set_visible(false);
            self.visible = false;
        }
        previous
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn client_size(&self) -> (u32, u32) {
        match &self.state.window {
            Some(window) => {
                let size = window.inner_size();
                (size.width, size.height)
            }
            None => (0, 0),
        }
    }

    fn window_size(&self) -> (u32, u32) {
        match &self.state.window {
            Some(window) => {
                let size = window.outer_size();
                (size.width, size.height)
            }
            None => (0, 0),
        }
    }

    /// Confines the cursor to the window, falling back to a hard lock where
    /// the compositor cannot confine (Wayland without pointer constraints).
    fn confine_cursor(&mut self, confine: bool) {
        let Some(window) = &self.state.window else {
            return;
        };

        if confine {
            if let Err(error) = window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
            {
                log::warn!("WinitWindow: cursor confinement unavailable: {error}");
            }
        } else if let Err(error) = window.set_cursor_grab(CursorGrabMode::None) {
            log::warn!("WinitWindow: cursor release failed: {error}");
        }
    }

    fn set_event_sender(&mut self, sender: flume::Sender<WindowEvent>) {
        self.sender = Some(sender);
    }

    fn surface_handle(&self) -> Option<SurfaceHandle> {
        let window = self.state.window.as_ref()?;
        Some(window.clone() as SurfaceHandle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::platform::event::{EventQueue, WheelDirection};

    #[test]
    fn test_uninitialized_window_reports_empty_state() {
        let window = WinitWindow::new();
        assert_eq!(window.client_size(), (0, 0));
        assert_eq!(window.window_size(), (0, 0));
        assert!(!window.is_visible());
        assert!(window.surface_handle().is_none());
    }

    #[test]
    fn test_show_before_init_keeps_the_window_hidden() {
        let mut window = WinitWindow::new();
        assert!(!window.show());
        assert!(!window.is_visible());
        assert!(!window.hide());
    }

    #[test]
    fn test_update_without_init_reports_open() {
        let mut window = WinitWindow::new();
        assert!(!window.update());
    }

    #[test]
    fn test_update_forwards_a_bounded_batch() {
        let queue = EventQueue::new();
        let mut window = WinitWindow::new();
        window.set_event_sender(queue.sender());

        for _ in 0..(EVENT_BATCH_LIMIT + 4) {
            window.state.pending.push_back(WindowEvent::Wheel {
                direction: WheelDirection::Up,
            });
        }

        window.update();
        assert_eq!(queue.len(), EVENT_BATCH_LIMIT);
        assert_eq!(window.state.pending.len(), 4);

        window.update();
        assert_eq!(queue.len(), EVENT_BATCH_LIMIT + 4);
        assert!(window.state.pending.is_empty());
    }

    #[test]
    fn test_events_without_a_sender_are_discarded() {
        let mut window = WinitWindow::new();
        window.state.pending.push_back(WindowEvent::FocusLost);

        window.update();
        assert!(window.state.pending.is_empty());
    }

    #[test]
    fn test_forwarded_events_keep_their_order() {
        let queue = EventQueue::new();
        let mut window = WinitWindow::new();
        window.set_event_sender(queue.sender());

        window
            .state
            .pending
            .push_back(WindowEvent::Resized {
                width: 640,
                height: 480,
            });
        window.state.pending.push_back(WindowEvent::FocusLost);

        window.update();
        let drained: Vec<_> = queue.receiver().try_iter().collect();
        assert_eq!(
            drained,
            vec![
                WindowEvent::Resized {
                    width: 640,
                    height: 480,
                },
                WindowEvent::FocusLost,
            ]
        );
    }
}
