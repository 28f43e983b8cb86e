//! Key-sequence matcher
//!
//! Keeps a sliding window of the most recent keys, exactly as long as the
//! target sequence. When the window equals the target every subscriber is
//! notified and the window is cleared, so overlapping matches need the full
//! sequence again.

use std::collections::VecDeque;

/// Up Up Down Down Left Right Left Right B A
pub const KONAMI_SEQUENCE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "KeyB",
    "KeyA",
];

/// Handle returned by [`SequenceMatcher::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut() + Send>;

/// Finite-state matcher over a stream of key codes
pub struct SequenceMatcher {
    target: Vec<String>,
    window: VecDeque<String>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u64,
}

impl SequenceMatcher {
    /// Matcher for an arbitrary non-empty key sequence
    pub fn new<I, K>(target: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let target: Vec<String> = target.into_iter().map(Into::into).collect();
        Self {
            window: VecDeque::with_capacity(target.len()),
            target,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn konami() -> Self {
        Self::new(KONAMI_SEQUENCE)
    }

    pub fn subscribe(&mut self, observer: impl FnMut() + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns whether a subscription was removed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Feed one key; returns true when it completed the sequence
    pub fn push(&mut self, key: impl Into<String>) -> bool {
        if self.target.is_empty() {
            return false;
        }

        self.window.push_back(key.into());
        if self.window.len() > self.target.len() {
            self.window.pop_front();
        }

        if self.window.len() == self.target.len() && self.window.iter().eq(self.target.iter()) {
            tracing::debug!("Key sequence matched");
            for (_, observer) in self.observers.iter_mut() {
                observer();
            }
            self.window.clear();
            return true;
        }

        false
    }

    pub fn reset(&mut self) {
        self.window.clear();
    }
}
