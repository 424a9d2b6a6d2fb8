use std::time::Duration;
use tokio::time::Instant;

/// Debounce state for the search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Debounce {
    Idle,
    Pending { deadline: Instant, text: String },
}

/// Trailing-edge debouncer: only the last value pushed within `delay`
/// survives, and it is released once the deadline has passed.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    state: Debounce,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: Debounce::Idle,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> &Debounce {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, Debounce::Pending { .. })
    }

    /// Restart the timer with `text` as the pending value.
    pub fn push(&mut self, text: String, now: Instant) {
        self.state = Debounce::Pending {
            deadline: now + self.delay,
            text,
        };
    }

    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            Debounce::Idle => None,
            Debounce::Pending { deadline, .. } => Some(*deadline),
        }
    }

    /// Release the pending value if its deadline is due.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.state {
            Debounce::Pending { deadline, .. } if now >= *deadline => {
                match std::mem::replace(&mut self.state, Debounce::Idle) {
                    Debounce::Pending { text, .. } => Some(text),
                    Debounce::Idle => None,
                }
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.state = Debounce::Idle;
    }
}
