//! Cooperative read deadlines
//!
//! A capture session runs until a wall-clock deadline owned by the
//! caller elapses. Expiry is normal termination, not an error: the line
//! sequence simply ends, and whatever frame was accumulating is dropped
//! with it. Nothing downstream can tell a deadline apart from the
//! device stream ending.
//!
//! The check is cooperative, between line reads. The RXB6 chatters
//! continuously on a 433 MHz band full of traffic, so in practice the
//! check fires within a fraction of a second of the deadline.

use std::time::{Duration, Instant};

/// A wall-clock deadline, or none
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    expires_at: Option<Instant>,
}

impl Deadline {
    /// A deadline that never expires
    pub fn none() -> Self {
        Self { expires_at: None }
    }

    /// A deadline expiring after the given duration
    pub fn after(timeout: Duration) -> Self {
        Self {
            expires_at: Some(Instant::now() + timeout),
        }
    }

    /// Check whether the deadline has elapsed
    pub fn expired(&self) -> bool {
        self.expires_at.map_or(false, |at| Instant::now() >= at)
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::none()
    }
}

/// Line iterator that ends cleanly once a deadline elapses
pub struct DeadlineLines<I> {
    lines: I,
    deadline: Deadline,
}

impl<I> DeadlineLines<I> {
    /// Wrap a line source with a deadline
    pub fn new(lines: I, deadline: Deadline) -> Self {
        Self { lines, deadline }
    }
}

impl<I> Iterator for DeadlineLines<I>
where
    I: Iterator<Item = String>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.deadline.expired() {
            return None;
        }
        self.lines.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_deadline_passes_everything_through() {
        let lines = vec!["a".to_string(), "b".to_string()];
        let out: Vec<_> = DeadlineLines::new(lines.into_iter(), Deadline::none()).collect();
        assert_eq!(out, vec!["a", "b"]);
    }

    #[test]
    fn test_expired_deadline_ends_stream() {
        let lines = vec!["a".to_string(), "b".to_string()];
        let deadline = Deadline::after(Duration::from_secs(0));
        let out: Vec<_> = DeadlineLines::new(lines.into_iter(), deadline).collect();
        assert!(out.is_empty());
    }

    #[test]
    fn test_future_deadline_passes_through() {
        let lines = vec!["a".to_string()];
        let deadline = Deadline::after(Duration::from_secs(3600));
        let out: Vec<_> = DeadlineLines::new(lines.into_iter(), deadline).collect();
        assert_eq!(out, vec!["a"]);
    }

    #[test]
    fn test_deadline_expiry_check() {
        assert!(!Deadline::none().expired());
        assert!(Deadline::after(Duration::from_secs(0)).expired());
        assert!(!Deadline::after(Duration::from_secs(3600)).expired());
    }
}
