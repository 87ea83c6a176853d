use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
};

use chat_profiles::Color;
use serde::Serialize;

/// One rendered chat line as exposed to presentation sinks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatLine {
    pub author: String,
    pub message: String,
    pub color: Color,
}

/// Bounded, shared buffer of the most recent chat lines.
///
/// Single writer (the poller), any number of readers (overlay handlers).
/// Oldest entries are evicted first; the buffer is presentation-only and
/// never authoritative.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    inner: Arc<Mutex<VecDeque<ChatLine>>>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        HistoryBuffer {
            inner: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn push(&self, line: ChatLine) {
        if self.capacity == 0 {
            return;
        }
        let mut lines = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        while lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// All retained lines, oldest first.
    pub fn snapshot(&self) -> Vec<ChatLine> {
        let lines = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
