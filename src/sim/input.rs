//! Bounded input event queue
//!
//! Input capture pushes events between ticks; the tick drains them. When the
//! queue is full the oldest event is dropped: fresh input beats complete
//! history.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// A raw input event from the capture layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Key press or release, `key` as reported by the platform ("w", " ", ...)
    Keyboard { key: String, pressed: bool },
    /// Pointer position and button bitmask
    Pointer { x: f32, y: f32, buttons: u16 },
}

impl InputEvent {
    pub fn key_down(key: &str) -> Self {
        InputEvent::Keyboard {
            key: key.to_string(),
            pressed: true,
        }
    }

    pub fn key_up(key: &str) -> Self {
        InputEvent::Keyboard {
            key: key.to_string(),
            pressed: false,
        }
    }
}

/// Fixed-capacity FIFO that overwrites its oldest entry on overflow
#[derive(Debug, Clone)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
    capacity: usize,
}

impl InputQueue {
    /// Create a queue; capacity is at least one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an event, evicting the oldest one if full. Never fails.
    pub fn push(&mut self, event: InputEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Remove and return the oldest event
    pub fn pop(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Pending events, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new(crate::consts::INPUT_QUEUE_CAPACITY)
    }
}

/// Queue handle for hosts that capture input on another thread.
///
/// One producer pushes, the tick driver drains; both go through the mutex.
#[derive(Debug, Clone, Default)]
pub struct SharedInputQueue {
    inner: Arc<Mutex<InputQueue>>,
}

impl SharedInputQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(InputQueue::new(capacity))),
        }
    }

    pub fn push(&self, event: InputEvent) {
        // A panicked holder cannot leave the ring in a torn state
        let mut queue = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        queue.push(event);
    }

    /// Run `f` with exclusive access to the queue (used by the tick driver)
    pub fn drain_with<R>(&self, f: impl FnOnce(&mut InputQueue) -> R) -> R {
        let mut queue = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut queue)
    }

    /// Move up to `max` of the oldest events into a local queue.
    ///
    /// The lock is held only for the move, so the producer is not blocked
    /// while the caller ticks on the returned batch.
    pub fn take_batch(&self, max: usize) -> InputQueue {
        self.drain_with(|queue| {
            let mut batch = InputQueue::new(max);
            while batch.len() < max {
                let Some(event) = queue.pop() else {
                    break;
                };
                batch.push(event);
            }
            batch
        })
    }

    pub fn len(&self) -> usize {
        self.drain_with(|q| q.len())
    }

    pub fn is_empty(&self) -> bool {
        self.drain_with(|q| q.is_empty())
    }
}
