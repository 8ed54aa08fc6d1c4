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

use crate::input::keys::Key;
use crate::math::Vec2;
use crate::platform::event::{WheelDirection, WindowEvent};

const KEY_SPACE_SIZE: usize = 256;

/// The press state of a single key-space entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum KeyState {
    #[default]
    NotPressed,
    Pressed,
}

/// Frame-based keyboard and mouse state.
///
/// The system keeps three key-state tables: a live table mutated immediately
/// by incoming events, and current/previous per-frame snapshots that rotate
/// exactly once per [`update`] call. Level queries read the current snapshot;
/// edge queries compare current against previous, so they are true for
/// exactly one frame per physical transition.
///
/// [`update`] must be called exactly once per logical frame, after
/// [`process_events`]. Skipping it starves the edge queries (they stay false
/// forever); calling it twice in a frame rotates the press edge out before
/// anyone can observe it.
///
/// [`update`]: InputSystem::update
/// [`process_events`]: InputSystem::process_events
#[derive(Debug)]
pub struct InputSystem {
    live: [KeyState; KEY_SPACE_SIZE],
    current: [KeyState; KEY_SPACE_SIZE],
    previous: [KeyState; KEY_SPACE_SIZE],

    mouse_moved: bool,
    mouse_raw_movement: Vec2,
    mouse_frame_delta: Vec2,
    mouse_position: Vec2,
    mouse_frame_position: Vec2,

    wheel_pending: Option<WheelDirection>,
    wheel_active: Option<WheelDirection>,
}

impl InputSystem {
    /// Creates an input system with every key released.
    pub fn new() -> Self {
        Self {
            live: [KeyState::NotPressed; KEY_SPACE_SIZE],
            current: [KeyState::NotPressed; KEY_SPACE_SIZE],
            previous: [KeyState::NotPressed; KEY_SPACE_SIZE],
            mouse_moved: false,
            mouse_raw_movement: Vec2::ZERO,
            mouse_frame_delta: Vec2::ZERO,
            mouse_position: Vec2::ZERO,
            mouse_frame_position: Vec2::ZERO,
            wheel_pending: None,
            wheel_active: None,
        }
    }

    /// Drains every pending event from the window's queue into the live state.
    ///
    /// Call once per frame, before [`InputSystem::update`]. Lifecycle events
    /// ([`WindowEvent::CloseRequested`], [`WindowEvent::Resized`]) belong to
    /// the application loop and are ignored here.
    pub fn process_events(&mut self, receiver: &flume::Receiver<WindowEvent>) {
        for event in receiver.try_iter() {
            match event {
                WindowEvent::KeyDown { key } => self.on_key_down(key),
                WindowEvent::KeyUp { key } => self.on_key_up(key),
                WindowEvent::MouseButtonDown { button } => self.on_mouse_button_down(button),
                WindowEvent::MouseButtonUp { button } => self.on_mouse_button_up(button),
                WindowEvent::MouseMovedRelative { dx, dy } => {
                    self.on_mouse_relative_movement(dx, dy)
                }
                WindowEvent::MouseMoved { x, y } => self.on_mouse_movement(x, y),
                WindowEvent::Wheel { direction } => self.on_mouse_wheel(direction),
                WindowEvent::FocusLost => self.on_focus_lost(),
                WindowEvent::CloseRequested | WindowEvent::Resized { .. } => {}
            }
        }
    }

    /// Rotates the per-frame snapshots. Call exactly once per logical frame.
    ///
    /// Previous becomes a copy of current, current becomes a copy of the live
    /// table. The mouse delta takes the latest raw movement, or resets to
    /// zero on frames without a movement event. The wheel flag reports only
    /// rotations that arrived since the last call.
    pub fn update(&mut self) {
        self.previous = self.current;
        self.current = self.live;

        if self.mouse_moved {
            self.mouse_frame_delta = self.mouse_raw_movement;
            self.mouse_moved = false;
        } else {
            // Movement only arrives as events, so quiet frames reset to zero.
            self.mouse_frame_delta = Vec2::ZERO;
        }

        self.mouse_frame_position = self.mouse_position;

        self.wheel_active = self.wheel_pending.take();
    }

    /// Records a keyboard key press.
    ///
    /// An extended key (left/right modifier, numpad digit) also presses its
    /// regular alias, unconditionally and in the same call.
    pub fn on_key_down(&mut self, key: Key) {
        if let Some(alias) = key.regular_alias() {
            self.live[alias.code() as usize] = KeyState::Pressed;
        }
        self.live[key.code() as usize] = KeyState::Pressed;
    }

    /// Records a keyboard key release, releasing the regular alias alongside
    /// the extended key.
    pub fn on_key_up(&mut self, key: Key) {
        if let Some(alias) = key.regular_alias() {
            self.live[alias.code() as usize] = KeyState::NotPressed;
        }
        self.live[key.code() as usize] = KeyState::NotPressed;
    }

    /// Records a mouse button press. Buttons live in the same key space as
    /// keyboard keys and support the same queries.
    pub fn on_mouse_button_down(&mut self, button: Key) {
        self.live[button.code() as usize] = KeyState::Pressed;
    }

    /// Records a mouse button release.
    pub fn on_mouse_button_up(&mut self, button: Key) {
        self.live[button.code() as usize] = KeyState::NotPressed;
    }

    /// Records raw relative mouse movement.
    ///
    /// Several movements within one frame overwrite each other; the next
    /// [`InputSystem::update`] reports the latest one.
    pub fn on_mouse_relative_movement(&mut self, dx: f32, dy: f32) {
        self.mouse_moved = true;
        self.mouse_raw_movement = Vec2::new(dx, dy);
    }

    /// Records the cursor's absolute client-area position.
    pub fn on_mouse_movement(&mut self, x: f32, y: f32) {
        self.mouse_position = Vec2::new(x, y);
    }

    /// Records a wheel rotation in the given direction.
    pub fn on_mouse_wheel(&mut self, direction: WheelDirection) {
        self.wheel_pending = Some(direction);
    }

    /// Treats focus loss as a release of every key.
    ///
    /// The window never delivers the matching key-up events for keys held at
    /// the moment focus is lost, so the whole key space resets, without
    /// generating release edges.
    pub fn on_focus_lost(&mut self) {
        self.clear();
    }

    /// Returns `true` while the key is held, frame-based.
    ///
    /// Regular keys with extended counterparts report `true` while any of
    /// their extended variants is held; the reverse never happens.
    pub fn is_key_down(&self, key: Key) -> bool {
        self.current[key.code() as usize] == KeyState::Pressed
    }

    /// Returns `true` while the key is not held, frame-based.
    pub fn is_key_up(&self, key: Key) -> bool {
        !self.is_key_down(key)
    }

    /// Returns `true` only on the first frame the key is held (rising edge).
    pub fn is_key_pressed(&self, key: Key) -> bool {
        let index = key.code() as usize;
        self.previous[index] == KeyState::NotPressed && self.current[index] == KeyState::Pressed
    }

    /// Returns `true` only on the first frame the key is no longer held
    /// (falling edge).
    pub fn is_key_released(&self, key: Key) -> bool {
        let index = key.code() as usize;
        self.previous[index] == KeyState::Pressed && self.current[index] == KeyState::NotPressed
    }

    /// Detects a multi-key combination.
    ///
    /// The keys must go down in argument order, and the last-named key must
    /// be the one whose press edge fires this frame: the two-key form is
    /// `is_key_down(first) && is_key_pressed(second)`, the three-key form
    /// holds the first two and takes the press edge of the third.
    ///
    /// Combinations sharing held keys are not deduplicated: with `Control`
    /// and `D` held, pressing `S` fires `(Control, D, S)`, `(Control, S)`
    /// and `(D, S)` on the same frame. Give three-key combinations a
    /// trailing key no two-key combination uses to avoid the collision.
    pub fn is_key_combination_pressed(
        &self,
        first: Key,
        second: Key,
        third: Option<Key>,
    ) -> bool {
        let first_down = self.is_key_down(first);
        match third {
            None => first_down && self.is_key_pressed(second),
            Some(third) => {
                first_down && self.is_key_down(second) && self.is_key_pressed(third)
            }
        }
    }

    /// Returns the mouse movement reported for this frame, or zero on frames
    /// without movement.
    ///
    /// This is raw, unaccelerated motion for things like camera control. Do
    /// not accumulate it to reconstruct a cursor position; use
    /// [`InputSystem::mouse_position`] for that.
    pub fn mouse_relative_movement(&self) -> Vec2 {
        self.mouse_frame_delta
    }

    /// Returns the cursor position relative to the window's top-left corner,
    /// sampled at the last [`InputSystem::update`].
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_frame_position
    }

    /// Returns `true` when the wheel rotated in the given direction since
    /// the previous frame.
    ///
    /// Behaves like a press edge, but re-fires every frame while the user
    /// keeps scrolling, since each detent is its own rotation event.
    pub fn is_mouse_wheel_rotated(&self, direction: WheelDirection) -> bool {
        self.wheel_active == Some(direction)
    }

    fn clear(&mut self) {
        self.live = [KeyState::NotPressed; KEY_SPACE_SIZE];
        self.current = [KeyState::NotPressed; KEY_SPACE_SIZE];
        self.previous = [KeyState::NotPressed; KEY_SPACE_SIZE];
        self.mouse_moved = false;
        self.mouse_raw_movement = Vec2::ZERO;
        self.mouse_frame_delta = Vec2::ZERO;
        self.mouse_position = Vec2::ZERO;
        self.mouse_frame_position = Vec2::ZERO;
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::event::EventQueue;

    #[test]
    fn key_pressed_is_true_for_exactly_one_frame() {
        let mut input = InputSystem::new();
        input.on_key_down(Key::W);
        input.update();
        assert!(input.is_key_pressed(Key::W));
        assert!(input.is_key_down(Key::W));

        input.update();
        assert!(!input.is_key_pressed(Key::W));
        assert!(input.is_key_down(Key::W));
    }

    #[test]
    fn key_released_is_true_for_exactly_one_frame() {
        let mut input = InputSystem::new();
        input.on_key_down(Key::W);
        input.update();
        input.on_key_up(Key::W);
        input.update();
        assert!(input.is_key_released(Key::W));
        assert!(!input.is_key_down(Key::W));

        input.update();
        assert!(!input.is_key_released(Key::W));
    }

    #[test]
    fn queries_are_false_without_an_update() {
        let mut input = InputSystem::new();
        input.on_key_down(Key::A);
        assert!(!input.is_key_down(Key::A));
        assert!(!input.is_key_pressed(Key::A));
    }

    #[test]
    fn double_update_rotates_the_press_edge_out() {
        let mut input = InputSystem::new();
        input.on_key_down(Key::A);
        input.update();
        input.update();
        assert!(!input.is_key_pressed(Key::A));
        assert!(input.is_key_down(Key::A));
    }

    #[test]
    fn extended_shift_drives_generic_shift() {
        let mut input = InputSystem::new();
        input.on_key_down(Key::LShift);
        input.update();
        assert!(input.is_key_down(Key::LShift));
        assert!(input.is_key_down(Key::Shift));
        assert!(!input.is_key_down(Key::RShift));
    }

    #[test]
    fn releasing_an_extended_key_releases_the_alias() {
        let mut input = InputSystem::new();
        input.on_key_down(Key::RControl);
        input.update();
        input.on_key_up(Key::RControl);
        input.update();
        assert!(input.is_key_released(Key::RControl));
        assert!(input.is_key_released(Key::Control));
    }

    #[test]
    fn alias_follows_the_latest_event_not_a_held_count() {
        let mut input = InputSystem::new();
        input.on_key_down(Key::LShift);
        input.on_key_down(Key::RShift);
        input.on_key_up(Key::RShift);
        input.update();
        // The alias update is unconditional; the up event wins even though
        // the left shift is still physically held.
        assert!(input.is_key_down(Key::LShift));
        assert!(!input.is_key_down(Key::Shift));
    }

    #[test]
    fn numpad_digit_drives_the_main_row_digit() {
        let mut input = InputSystem::new();
        input.on_key_down(Key::Numpad7);
        input.update();
        assert!(input.is_key_down(Key::Numpad7));
        assert!(input.is_key_down(Key::Digit7));
        assert!(!input.is_key_down(Key::Numpad8));
    }

    #[test]
    fn two_key_combination_fires_on_the_trigger_press_frame() {
        let mut input = InputSystem::new();
        input.on_key_down(Key::Control);
        input.update();
        input.on_key_down(Key::S);
        input.update();
        assert!(input.is_key_combination_pressed(Key::Control, Key::S, None));

        input.update();
        assert!(!input.is_key_combination_pressed(Key::Control, Key::S, None));
        assert!(input.is_key_down(Key::Control));
        assert!(input.is_key_down(Key::S));
    }

    #[test]
    fn combination_is_order_sensitive() {
        let mut input = InputSystem::new();
        input.on_key_down(Key::S);
        input.update();
        input.on_key_down(Key::Control);
        input.update();
        assert!(!input.is_key_combination_pressed(Key::Control, Key::S, None));
        assert!(input.is_key_combination_pressed(Key::S, Key::Control, None));
    }

    #[test]
    fn three_key_combination_holds_two_and_triggers_on_the_third() {
        let mut input = InputSystem::new();
        input.on_key_down(Key::Control);
        input.update();
        input.on_key_down(Key::D);
        input.update();
        input.on_key_down(Key::S);
        input.update();
        assert!(input.is_key_combination_pressed(Key::Control, Key::D, Some(Key::S)));

        input.update();
        assert!(!input.is_key_combination_pressed(Key::Control, Key::D, Some(Key::S)));
    }

    #[test]
    fn overlapping_combinations_fire_on_the_same_frame() {
        let mut input = InputSystem::new();
        input.on_key_down(Key::Control);
        input.update();
        input.on_key_down(Key::D);
        input.update();
        input.on_key_down(Key::S);
        input.update();
        assert!(input.is_key_combination_pressed(Key::Control, Key::D, Some(Key::S)));
        assert!(input.is_key_combination_pressed(Key::Control, Key::S, None));
        assert!(input.is_key_combination_pressed(Key::D, Key::S, None));
    }

    #[test]
    fn focus_loss_clears_every_key_without_release_edges() {
        let mut input = InputSystem::new();
        input.on_key_down(Key::W);
        input.on_key_down(Key::LShift);
        input.on_mouse_button_down(Key::MouseLeft);
        input.update();
        input.on_focus_lost();
        input.update();
        for key in [Key::W, Key::LShift, Key::Shift, Key::MouseLeft] {
            assert!(!input.is_key_down(key), "{key:?} still down after focus loss");
            assert!(!input.is_key_released(key), "{key:?} produced a release edge");
        }
    }

    #[test]
    fn mouse_buttons_support_edge_queries() {
        let mut input = InputSystem::new();
        input.on_mouse_button_down(Key::MouseRight);
        input.update();
        assert!(input.is_key_pressed(Key::MouseRight));

        input.on_mouse_button_up(Key::MouseRight);
        input.update();
        assert!(input.is_key_released(Key::MouseRight));
    }

    #[test]
    fn mouse_delta_resets_on_quiet_frames() {
        let mut input = InputSystem::new();
        input.on_mouse_relative_movement(5.0, -3.0);
        input.update();
        assert_eq!(input.mouse_relative_movement(), Vec2::new(5.0, -3.0));

        input.update();
        assert_eq!(input.mouse_relative_movement(), Vec2::ZERO);
    }

    #[test]
    fn latest_relative_movement_wins_within_a_frame() {
        let mut input = InputSystem::new();
        input.on_mouse_relative_movement(1.0, 1.0);
        input.on_mouse_relative_movement(4.0, 2.0);
        input.update();
        assert_eq!(input.mouse_relative_movement(), Vec2::new(4.0, 2.0));
    }

    #[test]
    fn mouse_position_is_sampled_not_reset() {
        let mut input = InputSystem::new();
        input.on_mouse_movement(100.0, 200.0);
        input.update();
        assert_eq!(input.mouse_position(), Vec2::new(100.0, 200.0));

        input.update();
        assert_eq!(input.mouse_position(), Vec2::new(100.0, 200.0));
    }

    #[test]
    fn wheel_rotation_is_a_one_frame_flag() {
        let mut input = InputSystem::new();
        input.on_mouse_wheel(WheelDirection::Up);
        input.update();
        assert!(input.is_mouse_wheel_rotated(WheelDirection::Up));
        assert!(!input.is_mouse_wheel_rotated(WheelDirection::Down));

        input.update();
        assert!(!input.is_mouse_wheel_rotated(WheelDirection::Up));
    }

    #[test]
    fn continuous_scrolling_reports_every_frame() {
        let mut input = InputSystem::new();
        for _ in 0..3 {
            input.on_mouse_wheel(WheelDirection::Down);
            input.update();
            assert!(input.is_mouse_wheel_rotated(WheelDirection::Down));
        }
    }

    #[test]
    fn process_events_drains_the_queue_exactly_once() {
        let queue = EventQueue::new();
        queue.publish(WindowEvent::KeyDown { key: Key::W });
        queue.publish(WindowEvent::MouseMovedRelative { dx: 2.0, dy: 0.0 });

        let mut input = InputSystem::new();
        input.process_events(queue.receiver());
        input.update();

        assert!(input.is_key_pressed(Key::W));
        assert_eq!(input.mouse_relative_movement(), Vec2::new(2.0, 0.0));
        assert!(queue.is_empty());
    }

    #[test]
    fn per_key_event_ordering_is_preserved_through_the_queue() {
        let queue = EventQueue::new();
        queue.publish(WindowEvent::KeyDown { key: Key::A });
        queue.publish(WindowEvent::KeyUp { key: Key::A });

        let mut input = InputSystem::new();
        input.process_events(queue.receiver());
        input.update();
        // Down then up within one frame: no level, no edge.
        assert!(!input.is_key_down(Key::A));
        assert!(!input.is_key_pressed(Key::A));
    }

    #[test]
    fn lifecycle_events_do_not_disturb_input_state() {
        let queue = EventQueue::new();
        queue.publish(WindowEvent::KeyDown { key: Key::A });
        queue.publish(WindowEvent::CloseRequested);
        queue.publish(WindowEvent::Resized {
            width: 640,
            height: 480,
        });

        let mut input = InputSystem::new();
        input.process_events(queue.receiver());
        input.update();
        assert!(input.is_key_down(Key::A));
    }
}
