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

//! Provides translation from a concrete windowing backend (`winit`) to the engine's window events.
//!
//! This module acts as an adapter layer, decoupling the rest of the engine from the
//! specific event format of the `winit` crate. Keys outside the engine's key set
//! translate to `None` and never cross the window boundary.

use ember_core::input::Key;
use ember_core::platform::event::{WheelDirection, WindowEvent};
use winit::event::{
    DeviceEvent, ElementState, MouseButton as WinitMouseButton, MouseScrollDelta,
    WindowEvent as WinitWindowEvent,
};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Translates a `winit::event::WindowEvent` into the engine's [`WindowEvent`] format.
///
/// This function acts as an adapter, filtering and converting raw windowing events
/// into a format that the engine's core systems can understand and process. OS key
/// repeats are filtered out here, so a [`WindowEvent::KeyDown`] always marks a real
/// key transition.
///
/// # Returns
///
/// Returns `Some(WindowEvent)` if the event is one the engine consumes, or `None`
/// otherwise.
pub fn translate_window_event(event: &WinitWindowEvent) -> Option<WindowEvent> {
    match event {
        WinitWindowEvent::KeyboardInput {
            event: key_event, ..
        } => {
            if let PhysicalKey::Code(keycode) = key_event.physical_key {
                let key = map_keycode(keycode)?;
                match key_event.state {
                    ElementState::Pressed if !key_event.repeat => {
                        Some(WindowEvent::KeyDown { key })
                    }
                    ElementState::Released => Some(WindowEvent::KeyUp { key }),
                    _ => None,
                }
            } else {
                None
            }
        }
        WinitWindowEvent::MouseInput { state, button, .. } => {
            let button = map_mouse_button(*button)?;
            match state {
                ElementState::Pressed => Some(WindowEvent::MouseButtonDown { button }),
                ElementState::Released => Some(WindowEvent::MouseButtonUp { button }),
            }
        }
        WinitWindowEvent::CursorMoved { position, .. } => Some(WindowEvent::MouseMoved {
            x: position.x as f32,
            y: position.y as f32,
        }),
        WinitWindowEvent::MouseWheel { delta, .. } => {
            let amount = match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                MouseScrollDelta::PixelDelta(position) => position.y as f32,
            };
            map_wheel(amount).map(|direction| WindowEvent::Wheel { direction })
        }
        WinitWindowEvent::Focused(false) => Some(WindowEvent::FocusLost),
        WinitWindowEvent::CloseRequested => Some(WindowEvent::CloseRequested),
        WinitWindowEvent::Resized(size) => Some(WindowEvent::Resized {
            width: size.width,
            height: size.height,
        }),
        _ => None,
    }
}

/// Translates a `winit::event::DeviceEvent` into the engine's [`WindowEvent`] format.
///
/// Only raw mouse motion is consumed. Relative deltas come from the device
/// rather than the cursor, so they keep arriving while the cursor is confined
/// and are free of OS pointer acceleration.
pub fn translate_device_event(event: &DeviceEvent) -> Option<WindowEvent> {
    match event {
        DeviceEvent::MouseMotion { delta } => Some(WindowEvent::MouseMovedRelative {
            dx: delta.0 as f32,
            dy: delta.1 as f32,
        }),
        _ => None,
    }
}

// --- Private Helper Functions ---

/// Maps a physical `winit` keycode to the engine's [`Key`] set.
fn map_keycode(keycode: KeyCode) -> Option<Key> {
    let key = match keycode {
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Enter => Key::Enter,
        KeyCode::Escape => Key::Escape,
        KeyCode::Space => Key::Space,
        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::Numpad0 => Key::Numpad0,
        KeyCode::Numpad1 => Key::Numpad1,
        KeyCode::Numpad2 => Key::Numpad2,
        KeyCode::Numpad3 => Key::Numpad3,
        KeyCode::Numpad4 => Key::Numpad4,
        KeyCode::Numpad5 => Key::Numpad5,
        KeyCode::Numpad6 => Key::Numpad6,
        KeyCode::Numpad7 => Key::Numpad7,
        KeyCode::Numpad8 => Key::Numpad8,
        KeyCode::Numpad9 => Key::Numpad9,
        KeyCode::NumpadMultiply => Key::Multiply,
        KeyCode::NumpadAdd => Key::Add,
        KeyCode::NumpadSubtract => Key::Subtract,
        KeyCode::NumpadDecimal => Key::Decimal,
        KeyCode::NumpadDivide => Key::Divide,
        // winit reports sided modifiers only. The generic Shift/Control/Alt
        // keys are driven by the input system's aliasing, not by translation.
        KeyCode::ShiftLeft => Key::LShift,
        KeyCode::ShiftRight => Key::RShift,
        KeyCode::ControlLeft => Key::LControl,
        KeyCode::ControlRight => Key::RControl,
        KeyCode::AltLeft => Key::LAlt,
        KeyCode::AltRight => Key::RAlt,
        _ => return None,
    };
    Some(key)
}

/// Maps a `winit` mouse button to the engine's [`Key`] set.
///
/// Buttons beyond the five the engine tracks map to `None`.
fn map_mouse_button(button: WinitMouseButton) -> Option<Key> {
    match button {
        WinitMouseButton::Left => Some(Key::MouseLeft),
        WinitMouseButton::Right => Some(Key::MouseRight),
        WinitMouseButton::Middle => Some(Key::MouseMiddle),
        WinitMouseButton::Back => Some(Key::MouseFour),
        WinitMouseButton::Forward => Some(Key::MouseFive),
        WinitMouseButton::Other(_) => None,
    }
}

/// Maps a vertical scroll amount to a wheel direction.
///
/// Zero scrolls (purely horizontal wheel events) map to `None`.
fn map_wheel(amount: f32) -> Option<WheelDirection> {
    if amount > 0.0 {
        Some(WheelDirection::Up)
    } else if amount < 0.0 {
        Some(WheelDirection::Down)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::{dpi::PhysicalPosition, keyboard::KeyCode};

    /// Test cases for translating keycodes to the engine's key set
    #[test]
    fn test_map_keycode_simple() {
        assert_eq!(map_keycode(KeyCode::KeyA), Some(Key::A));
        assert_eq!(map_keycode(KeyCode::KeyZ), Some(Key::Z));
        assert_eq!(map_keycode(KeyCode::Digit0), Some(Key::Digit0));
        assert_eq!(map_keycode(KeyCode::Digit9), Some(Key::Digit9));
        assert_eq!(map_keycode(KeyCode::Space), Some(Key::Space));
        assert_eq!(map_keycode(KeyCode::Escape), Some(Key::Escape));
    }

    /// Test cases for translating numpad keycodes
    #[test]
    fn test_map_keycode_numpad() {
        assert_eq!(map_keycode(KeyCode::Numpad0), Some(Key::Numpad0));
        assert_eq!(map_keycode(KeyCode::Numpad9), Some(Key::Numpad9));
        assert_eq!(map_keycode(KeyCode::NumpadMultiply), Some(Key::Multiply));
        assert_eq!(map_keycode(KeyCode::NumpadAdd), Some(Key::Add));
        assert_eq!(map_keycode(KeyCode::NumpadSubtract), Some(Key::Subtract));
        assert_eq!(map_keycode(KeyCode::NumpadDecimal), Some(Key::Decimal));
        assert_eq!(map_keycode(KeyCode::NumpadDivide), Some(Key::Divide));
    }

    /// Test cases for translating sided modifier keycodes
    #[test]
    fn test_map_keycode_sided_modifiers() {
        assert_eq!(map_keycode(KeyCode::ShiftLeft), Some(Key::LShift));
        assert_eq!(map_keycode(KeyCode::ShiftRight), Some(Key::RShift));
        assert_eq!(map_keycode(KeyCode::ControlLeft), Some(Key::LControl));
        assert_eq!(map_keycode(KeyCode::ControlRight), Some(Key::RControl));
        assert_eq!(map_keycode(KeyCode::AltLeft), Some(Key::LAlt));
        assert_eq!(map_keycode(KeyCode::AltRight), Some(Key::RAlt));
    }

    /// Test cases for keycodes outside the engine's key set
    #[test]
    fn test_map_keycode_outside_key_set() {
        assert_eq!(map_keycode(KeyCode::F1), None);
        assert_eq!(map_keycode(KeyCode::ArrowLeft), None);
        assert_eq!(map_keycode(KeyCode::CapsLock), None);
        assert_eq!(map_keycode(KeyCode::Home), None);
    }

    /// Test cases for translating mouse buttons to the engine's key set
    #[test]
    fn test_map_mouse_button_standard() {
        assert_eq!(
            map_mouse_button(WinitMouseButton::Left),
            Some(Key::MouseLeft)
        );
        assert_eq!(
            map_mouse_button(WinitMouseButton::Right),
            Some(Key::MouseRight)
        );
        assert_eq!(
            map_mouse_button(WinitMouseButton::Middle),
            Some(Key::MouseMiddle)
        );
        assert_eq!(
            map_mouse_button(WinitMouseButton::Back),
            Some(Key::MouseFour)
        );
        assert_eq!(
            map_mouse_button(WinitMouseButton::Forward),
            Some(Key::MouseFive)
        );
    }

    /// Test cases for mouse buttons the engine does not track
    #[test]
    fn test_map_mouse_button_other() {
        assert_eq!(map_mouse_button(WinitMouseButton::Other(8)), None);
        assert_eq!(map_mouse_button(WinitMouseButton::Other(15)), None);
    }

    /// Test cases for translating winit mouse press to the engine's representation
    #[test]
    fn test_translate_mouse_button_pressed() {
        let winit_event = WinitWindowEvent::MouseInput {
            device_id: winit::event::DeviceId::dummy(),
            state: ElementState::Pressed,
            button: WinitMouseButton::Left,
        };
        let expected = Some(WindowEvent::MouseButtonDown {
            button: Key::MouseLeft,
        });
        assert_eq!(translate_window_event(&winit_event), expected);
    }

    /// Test cases for translating winit mouse release to the engine's representation
    #[test]
    fn test_translate_mouse_button_released() {
        let winit_event = WinitWindowEvent::MouseInput {
            device_id: winit::event::DeviceId::dummy(),
            state: ElementState::Released,
            button: WinitMouseButton::Right,
        };
        let expected = Some(WindowEvent::MouseButtonUp {
            button: Key::MouseRight,
        });
        assert_eq!(translate_window_event(&winit_event), expected);
    }

    /// Test cases for translating winit cursor movement to the engine's representation
    #[test]
    fn test_translate_cursor_moved() {
        let winit_event = WinitWindowEvent::CursorMoved {
            device_id: winit::event::DeviceId::dummy(),
            position: PhysicalPosition::new(100.5, 200.75),
        };
        let expected = Some(WindowEvent::MouseMoved {
            x: 100.5,
            y: 200.75,
        });
        assert_eq!(translate_window_event(&winit_event), expected);
    }

    /// Test cases for translating winit line scrolls to a wheel direction
    #[test]
    fn test_translate_mouse_wheel_line() {
        let winit_event = WinitWindowEvent::MouseWheel {
            device_id: winit::event::DeviceId::dummy(),
            delta: MouseScrollDelta::LineDelta(0.0, 2.0),
            phase: winit::event::TouchPhase::Moved,
        };
        let expected = Some(WindowEvent::Wheel {
            direction: WheelDirection::Up,
        });
        assert_eq!(translate_window_event(&winit_event), expected);
    }

    /// Test cases for translating winit pixel scrolls to a wheel direction
    #[test]
    fn test_translate_mouse_wheel_pixel() {
        let winit_event = WinitWindowEvent::MouseWheel {
            device_id: winit::event::DeviceId::dummy(),
            delta: MouseScrollDelta::PixelDelta(PhysicalPosition::new(5.5, -10.0)),
            phase: winit::event::TouchPhase::Moved,
        };
        let expected = Some(WindowEvent::Wheel {
            direction: WheelDirection::Down,
        });
        assert_eq!(translate_window_event(&winit_event), expected);
    }

    /// Test cases for horizontal-only scrolls, which carry no vertical direction
    #[test]
    fn test_translate_mouse_wheel_horizontal_is_dropped() {
        let winit_event = WinitWindowEvent::MouseWheel {
            device_id: winit::event::DeviceId::dummy(),
            delta: MouseScrollDelta::LineDelta(3.0, 0.0),
            phase: winit::event::TouchPhase::Moved,
        };
        assert_eq!(translate_window_event(&winit_event), None);
    }

    /// Test cases for translating winit lifecycle events
    #[test]
    fn test_translate_lifecycle_events() {
        let winit_event_resize = WinitWindowEvent::Resized(winit::dpi::PhysicalSize::new(800, 600));
        let winit_event_blur = WinitWindowEvent::Focused(false);
        let winit_event_focus = WinitWindowEvent::Focused(true);
        let winit_event_close = WinitWindowEvent::CloseRequested;

        assert_eq!(
            translate_window_event(&winit_event_resize),
            Some(WindowEvent::Resized {
                width: 800,
                height: 600,
            })
        );
        assert_eq!(
            translate_window_event(&winit_event_blur),
            Some(WindowEvent::FocusLost)
        );
        assert_eq!(translate_window_event(&winit_event_focus), None);
        assert_eq!(
            translate_window_event(&winit_event_close),
            Some(WindowEvent::CloseRequested)
        );
    }

    /// Test cases for translating raw device motion to relative mouse movement
    #[test]
    fn test_translate_device_mouse_motion() {
        let device_event = DeviceEvent::MouseMotion { delta: (3.0, -2.5) };
        let expected = Some(WindowEvent::MouseMovedRelative { dx: 3.0, dy: -2.5 });
        assert_eq!(translate_device_event(&device_event), expected);
    }
}
