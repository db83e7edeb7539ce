//! Per-operation deadline shared with the stores.
//!
//! `run_bounded` arms a [`Deadline`] on the blocking thread that runs the
//! operation. Stores call [`check`] before touching data and again right
//! before a write commits, so an operation whose caller already got a
//! timeout stops there instead of finishing in the background.

use std::cell::Cell;
use std::time::{Duration, Instant};

use super::errors::DomainError;

#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    limit: Duration,
}

thread_local! {
    static CURRENT: Cell<Option<Deadline>> = const { Cell::new(None) };
}

impl Deadline {
    pub fn after(limit: Duration) -> Self {
        Self {
            at: Instant::now() + limit,
            limit,
        }
    }

    /// The deadline armed on this thread, if any.
    pub fn current() -> Option<Self> {
        CURRENT.with(Cell::get)
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn check(&self) -> Result<(), DomainError> {
        if Instant::now() >= self.at {
            Err(DomainError::Timeout(self.limit))
        } else {
            Ok(())
        }
    }

    /// Arm this deadline on the current thread until the guard drops.
    pub fn enter(self) -> DeadlineGuard {
        let previous = CURRENT.with(|cell| cell.replace(Some(self)));
        DeadlineGuard { previous }
    }
}

pub struct DeadlineGuard {
    previous: Option<Deadline>,
}

impl Drop for DeadlineGuard {
    fn drop(&mut self) {
        CURRENT.with(|cell| cell.set(self.previous));
    }
}

/// `Timeout` once the armed deadline has passed. Threads with no deadline
/// armed always pass.
pub fn check() -> Result<(), DomainError> {
    match Deadline::current() {
        Some(deadline) => deadline.check(),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unarmed_thread_always_passes() {
        assert!(Deadline::current().is_none());
        assert!(check().is_ok());
    }

    #[test]
    fn expired_deadline_reports_its_limit() {
        let limit = Duration::from_millis(10);
        let _armed = Deadline::after(limit).enter();
        assert!(check().is_ok());
        std::thread::sleep(Duration::from_millis(30));
        assert!(matches!(check(), Err(DomainError::Timeout(d)) if d == limit));
    }

    #[test]
    fn guard_restores_the_outer_deadline() {
        let outer = Deadline::after(Duration::from_secs(60)).enter();
        {
            let _inner = Deadline::after(Duration::ZERO).enter();
            assert!(check().is_err());
        }
        assert!(check().is_ok());
        drop(outer);
        assert!(Deadline::current().is_none());
    }
}
