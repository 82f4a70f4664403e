//! Injectable source of "now".
//!
//! Expiry checks compare certificate lifetimes against an injected clock
//! rather than ambient system time, so tests can pin the current instant.

use std::time::SystemTime;

/// A read-only source of the current instant.
///
/// Implementations must be side-effect-free; the checker shares one clock
/// across all concurrent calls without synchronization.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> SystemTime;
}

/// Production clock reading system wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}
