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

//! Provides a high-resolution timer for frame pacing and simple profiling.

use std::time::{Duration, Instant};

/// A high-resolution timer that starts on creation.
///
/// Use the `elapsed_*` accessors for simple measurements, or [`delta`] in a
/// frame loop to get the time since the previous call.
///
/// [`delta`]: FrameTimer::delta
#[derive(Debug, Clone)]
pub struct FrameTimer {
    start_time: Option<Instant>,
}

impl FrameTimer {
    /// Creates a new timer and starts it immediately.
    #[inline]
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
        }
    }

    /// Returns the elapsed time since the timer started, or `None` if the
    /// timer has not been started.
    #[inline]
    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|start| start.elapsed())
    }

    /// Returns the elapsed time in microseconds.
    #[inline]
    pub fn elapsed_us(&self) -> Option<u64> {
        self.elapsed().map(|d| d.as_micros() as u64)
    }

    /// Returns the elapsed time in seconds as `f32`.
    #[inline]
    pub fn elapsed_secs_f32(&self) -> Option<f32> {
        self.elapsed().map(|d| d.as_secs_f32())
    }

    /// Restarts the timer so that the starting time is now.
    #[inline]
    pub fn reset(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Returns the time since the previous `delta` call (or since creation)
    /// and restarts the timer.
    ///
    /// Calling this once per frame yields the frame's delta time.
    #[inline]
    pub fn delta(&mut self) -> Duration {
        let now = Instant::now();
        let delta = self
            .start_time
            .map(|start| now.duration_since(start))
            .unwrap_or_default();
        self.start_time = Some(now);
        delta
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const SLEEP_DURATION_MS: u64 = 50;
    const SLEEP_MARGIN_MS: u64 = 200;

    #[test]
    fn timer_starts_on_creation() {
        let timer = FrameTimer::new();
        assert!(timer.elapsed().is_some());
        assert!(timer.elapsed_us().is_some());
        assert!(timer.elapsed_secs_f32().is_some());
    }

    #[test]
    fn elapsed_time_tracks_a_sleep() {
        let timer = FrameTimer::new();
        thread::sleep(Duration::from_millis(SLEEP_DURATION_MS));

        let elapsed = timer.elapsed().expect("timer was started");
        assert!(elapsed >= Duration::from_millis(SLEEP_DURATION_MS));
        assert!(elapsed < Duration::from_millis(SLEEP_DURATION_MS + SLEEP_MARGIN_MS));
    }

    #[test]
    fn reset_restarts_the_measurement() {
        let mut timer = FrameTimer::new();
        thread::sleep(Duration::from_millis(SLEEP_DURATION_MS));
        timer.reset();

        let elapsed = timer.elapsed().expect("timer was started");
        assert!(elapsed < Duration::from_millis(SLEEP_DURATION_MS));
    }

    #[test]
    fn delta_measures_between_calls() {
        let mut timer = FrameTimer::new();
        thread::sleep(Duration::from_millis(SLEEP_DURATION_MS));

        let first = timer.delta();
        assert!(first >= Duration::from_millis(SLEEP_DURATION_MS));

        let second = timer.delta();
        assert!(second < first, "delta should restart the timer");
    }
}
