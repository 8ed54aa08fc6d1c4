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

//! # Ember Core
//!
//! Foundational crate of the Ember engine: resource descriptors, the
//! backend-agnostic capability traits, the input state machine, the window
//! and event contracts, and the math / timing / file leaves they depend on.
//!
//! Nothing in this crate touches a GPU driver or an OS window. The concrete
//! bindings live in `ember-infra` and implement the traits declared here.

#![warn(missing_docs)]

pub mod input;
pub mod io;
pub mod math;
pub mod platform;
pub mod renderer;
pub mod time;

pub use time::FrameTimer;
