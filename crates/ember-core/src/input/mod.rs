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

//! Provides frame-based keyboard and mouse state built from raw window events.
//!
//! The [`InputSystem`] drains a window's event queue once per frame and turns
//! the discrete event stream into queryable state: level queries
//! ([`InputSystem::is_key_down`]), edge queries ([`InputSystem::is_key_pressed`],
//! [`InputSystem::is_key_released`]) that are true for exactly one frame, and
//! multi-key combination detection.

pub mod keys;
pub mod system;

pub use keys::Key;
pub use system::InputSystem;
