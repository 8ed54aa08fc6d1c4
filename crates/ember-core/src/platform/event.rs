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

use crate::input::Key;
use log;

/// The direction of a mouse wheel rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelDirection {
    /// The wheel rotated away from the user.
    Up,
    /// The wheel rotated toward the user.
    Down,
}

/// A raw event published by the windowing backend.
///
/// Events are typed and self-contained: the input system can be driven from
/// a hand-built event sequence in tests exactly as it is driven from a real
/// window at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    /// A keyboard key transitioned to pressed. Not emitted for OS key repeats.
    KeyDown {
        /// The pressed key.
        key: Key,
    },
    /// A keyboard key transitioned to released.
    KeyUp {
        /// The released key.
        key: Key,
    },
    /// A mouse button transitioned to pressed.
    MouseButtonDown {
        /// The pressed button, one of the mouse button keys.
        button: Key,
    },
    /// A mouse button transitioned to released.
    MouseButtonUp {
        /// The released button.
        button: Key,
    },
    /// The mouse moved, expressed as raw relative motion.
    MouseMovedRelative {
        /// Horizontal movement since the last event.
        dx: f32,
        /// Vertical movement since the last event.
        dy: f32,
    },
    /// The cursor moved, expressed as an absolute client-area position.
    MouseMoved {
        /// The new x-coordinate of the cursor.
        x: f32,
        /// The new y-coordinate of the cursor.
        y: f32,
    },
    /// The mouse wheel rotated.
    Wheel {
        /// The rotation direction.
        direction: WheelDirection,
    },
    /// The window lost keyboard focus.
    ///
    /// Keys held at this moment will never receive a matching [`WindowEvent::KeyUp`];
    /// the input system treats this event as a release of every key.
    FocusLost,
    /// The user requested that the window close.
    CloseRequested,
    /// The window's client area was resized.
    Resized {
        /// The new client width in physical pixels.
        width: u32,
        /// The new client height in physical pixels.
        height: u32,
    },
}

/// The default capacity of an [`EventQueue`].
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// A bounded, thread-safe channel carrying [`WindowEvent`]s from the
/// windowing backend to the input system.
///
/// The queue decouples frame cadence from OS message delivery: the window
/// publishes whenever the OS delivers, the input system drains once per
/// frame. When the queue is full, new events are dropped with a warning
/// rather than blocking the message loop.
#[derive(Debug)]
pub struct EventQueue {
    sender: flume::Sender<WindowEvent>,
    receiver: flume::Receiver<WindowEvent>,
}

impl EventQueue {
    /// Creates a new queue with [`DEFAULT_EVENT_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a new queue holding at most `capacity` undelivered events.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, receiver) = flume::bounded(capacity);
        log::info!("Window event queue initialized (capacity {capacity}).");
        Self { sender, receiver }
    }

    /// Attempts to publish an event without blocking.
    ///
    /// A full queue drops the event and logs a warning; a disconnected
    /// receiver logs an error. Neither case propagates to the caller, since
    /// the OS message loop must never stall on the consumer.
    pub fn publish(&self, event: WindowEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(flume::TrySendError::Full(dropped)) => {
                log::warn!("Window event queue full, dropping {dropped:?}.");
            }
            Err(flume::TrySendError::Disconnected(_)) => {
                log::error!("Window event receiver disconnected.");
            }
        }
    }

    /// Returns a clone of the sender end of the channel.
    ///
    /// Hand this to the windowing backend via
    /// [`EngineWindow::set_event_sender`](crate::platform::window::EngineWindow::set_event_sender).
    pub fn sender(&self) -> flume::Sender<WindowEvent> {
        self.sender.clone()
    }

    /// Returns a reference to the receiver end of the channel.
    ///
    /// Intended for the input system to drain once per frame.
    pub fn receiver(&self) -> &flume::Receiver<WindowEvent> {
        &self.receiver
    }

    /// Returns the number of events waiting to be drained.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Returns `true` if no events are waiting.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flume::TryRecvError;

    #[test]
    fn event_queue_creation() {
        let queue = EventQueue::new();
        let _sender = queue.sender();
        assert!(queue.is_empty());
    }

    #[test]
    fn publish_then_drain_single_event() {
        let queue = EventQueue::new();
        let event = WindowEvent::KeyDown { key: Key::Space };

        queue.publish(event);

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.receiver().try_recv(), Ok(event));
        assert_eq!(queue.receiver().try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn events_arrive_in_publish_order() {
        let queue = EventQueue::new();
        let down = WindowEvent::KeyDown { key: Key::A };
        let up = WindowEvent::KeyUp { key: Key::A };
        let focus = WindowEvent::FocusLost;

        queue.publish(down);
        queue.publish(up);
        queue.publish(focus);

        let drained: Vec<_> = queue.receiver().try_iter().collect();
        assert_eq!(drained, vec![down, up, focus]);
        assert!(queue.is_empty());
    }

    #[test]
    fn full_queue_drops_new_events() {
        let queue = EventQueue::with_capacity(2);
        queue.publish(WindowEvent::KeyDown { key: Key::A });
        queue.publish(WindowEvent::KeyDown { key: Key::B });
        queue.publish(WindowEvent::KeyDown { key: Key::C });

        let drained: Vec<_> = queue.receiver().try_iter().collect();
        assert_eq!(
            drained,
            vec![
                WindowEvent::KeyDown { key: Key::A },
                WindowEvent::KeyDown { key: Key::B },
            ]
        );
    }

    #[test]
    fn each_event_is_delivered_exactly_once() {
        let queue = EventQueue::new();
        for _ in 0..10 {
            queue.publish(WindowEvent::Wheel {
                direction: WheelDirection::Up,
            });
        }

        assert_eq!(queue.receiver().try_iter().count(), 10);
        assert_eq!(queue.receiver().try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn detached_sender_feeds_the_same_queue() {
        let queue = EventQueue::new();
        let sender = queue.sender();

        sender
            .try_send(WindowEvent::CloseRequested)
            .expect("send should succeed");

        assert_eq!(
            queue.receiver().try_recv(),
            Ok(WindowEvent::CloseRequested)
        );
    }
}
