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

//! The single check path for deadline and cancellation.

use crate::{
    monitor::{cancellation::CancellationToken, deadline::Deadline},
    result::StopReason,
};

/// Deadline plus optional cancellation token, polled at node boundaries.
///
/// Cancellation wins over the deadline when both trigger.
#[derive(Debug, Clone)]
pub struct StopCondition {
    deadline: Deadline,
    cancellation: Option<CancellationToken>,
}

impl StopCondition {
    #[inline]
    pub fn new(deadline: Deadline) -> Self {
        Self {
            deadline,
            cancellation: None,
        }
    }

    #[inline]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    #[inline]
    pub fn deadline(&self) -> &Deadline {
        &self.deadline
    }

    /// Returns why the search must stop, or `None` to keep going.
    #[inline]
    pub fn check(&self) -> Option<StopReason> {
        if self
            .cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
        {
            return Some(StopReason::Cancelled);
        }
        if self.deadline.is_expired() {
            return Some(StopReason::DeadlineReached);
        }
        None
    }
}
