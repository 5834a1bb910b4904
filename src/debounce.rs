//! Settle-window debouncing of free-text filter input.
//!
//! [`Debouncer`] is the synchronous state machine: every keystroke pushes the
//! current text and restarts the window, and polling after the window has
//! passed yields the settled value once. [`debounced`] drives it from a tokio
//! channel so a burst of input produces a single commit.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
    committed: Option<T>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            committed: None,
        }
    }

    /// Starts with a value already committed, as when a screen opens with a
    /// filter read from its location.
    #[must_use]
    pub const fn with_committed(delay: Duration, committed: T) -> Self {
        Self {
            delay,
            pending: None,
            committed: Some(committed),
        }
    }

    /// Records raw input at `now`, replacing any pending value.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// When the pending value settles, if there is one.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    /// Yields the settled value once its window has passed.
    ///
    /// A value equal to the last committed one settles silently, since
    /// committing it again would derive the same query.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.deadline().is_some_and(|at| at <= now);
        if !due {
            return None;
        }
        let (value, _) = self.pending.take()?;
        if self.committed.as_ref() == Some(&value) {
            return None;
        }
        self.committed = Some(value.clone());
        Some(value)
    }

    /// Commits whatever is pending right away, as on input close.
    pub fn flush(&mut self) -> Option<T> {
        let (value, _) = self.pending.take()?;
        if self.committed.as_ref() == Some(&value) {
            return None;
        }
        self.committed = Some(value.clone());
        Some(value)
    }

    #[must_use]
    pub const fn committed(&self) -> Option<&T> {
        self.committed.as_ref()
    }
}

/// Debounces a channel of raw input into a channel of committed values.
///
/// The returned receiver closes after the input closes and any pending value
/// has been flushed.
pub fn debounced<T>(mut input: mpsc::Receiver<T>, delay: Duration) -> mpsc::Receiver<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    let (tx, rx) = mpsc::channel(16);

    tokio::spawn(async move {
        let mut debouncer = Debouncer::new(delay);
        loop {
            let deadline = debouncer.deadline();
            tokio::select! {
                next = input.recv() => match next {
                    Some(value) => debouncer.push(value, Instant::now()),
                    None => {
                        if let Some(value) = debouncer.flush() {
                            let _ = tx.send(value).await;
                        }
                        break;
                    }
                },
                () = async { sleep_until(deadline.unwrap_or_else(Instant::now)).await },
                    if deadline.is_some() =>
                {
                    if let Some(value) = debouncer.poll(Instant::now())
                        && tx.send(value).await.is_err()
                    {
                        break;
                    }
                }
            }
        }
    });

    rx
}
