//! Blocking job queue shared by the producer and the copy workers.
//!
//! `pop` blocks while the queue is empty and still open. Once `close` has been
//! called, waiters are released and `pop` returns `None` as soon as the queue
//! is drained.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};

use crate::model::CopyJob;

/// Anything a worker can pull jobs from.
///
/// `None` means "no more input": the worker should exit.
pub trait JobSource: Sync {
    fn next_job(&self) -> Option<CopyJob>;
}

#[derive(Debug)]
struct State<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Multi-producer, multi-consumer FIFO with an explicit close signal.
#[derive(Debug)]
pub struct JobQueue<T> {
    state: Mutex<State<T>>,
    ready: Condvar,
}

impl<T> Default for JobQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> JobQueue<T> {
    pub fn new() -> Self {
        JobQueue {
            state: Mutex::new(State {
                items: VecDeque::new(),
                closed: false,
            }),
            ready: Condvar::new(),
        }
    }

    // Every critical section leaves the state consistent, poison or not.
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append an item and wake one waiting consumer.
    pub fn push(&self, item: T) {
        let mut state = self.lock();
        state.items.push_back(item);
        drop(state);
        self.ready.notify_one();
    }

    /// Take the next item, blocking while the queue is empty and open.
    ///
    /// Returns `None` once the queue is closed and empty.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            if state.closed {
                return None;
            }
            state = self
                .ready
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Signal that no more items will be pushed and wake every waiter.
    ///
    /// Calling it more than once has no further effect.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        drop(state);
        self.ready.notify_all();
    }

    /// Push every item, in order.
    pub fn push_all(&self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.push(item);
        }
    }
}

impl JobSource for JobQueue<CopyJob> {
    fn next_job(&self) -> Option<CopyJob> {
        self.pop()
    }
}
