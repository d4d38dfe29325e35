// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Wall-clock deadline shared read-only by every worker of a run.

use std::time::{Duration, Instant};

const MAX_CLAMPED_BUDGET: Duration = Duration::from_secs(365 * 24 * 3600);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Deadline {
    started_at: Instant,
    expires_at: Instant,
}

impl Deadline {
    /// Creates a deadline `budget` from now. Budgets too large for the clock
    /// are clamped to one year.
    #[inline]
    pub fn after(budget: Duration) -> Self {
        let started_at = Instant::now();
        let expires_at = started_at
            .checked_add(budget)
            .or_else(|| started_at.checked_add(MAX_CLAMPED_BUDGET))
            .unwrap_or(started_at);
        Self {
            started_at,
            expires_at,
        }
    }

    #[inline]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    #[inline]
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Returns `true` once the deadline has passed. A zero budget is expired
    /// from the start.
    #[inline]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    #[inline]
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_budget_is_expired_immediately() {
        let deadline = Deadline::after(Duration::ZERO);
        assert!(deadline.is_expired());
        assert_eq!(deadline.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_generous_budget_is_not_expired() {
        let deadline = Deadline::after(Duration::from_secs(3600));
        assert!(!deadline.is_expired());
        assert!(deadline.remaining() > Duration::from_secs(3500));
    }

    #[test]
    fn test_short_budget_expires() {
        let deadline = Deadline::after(Duration::from_millis(5));
        std::thread::sleep(Duration::from_millis(20));
        assert!(deadline.is_expired());
        assert!(deadline.elapsed() >= Duration::from_millis(20));
    }
}
