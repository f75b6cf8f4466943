use std::time::Duration;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry; surface the error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// How many times a failed operation may be attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Keep retrying until the operation succeeds.
    Unbounded { pause: Duration },
    /// Give up after `attempts` total attempts (including the first).
    MaxAttempts { attempts: u32, pause: Duration },
}

impl RetryPolicy {
    /// A single attempt, never retried.
    pub fn once() -> Self {
        RetryPolicy::MaxAttempts {
            attempts: 1,
            pause: Duration::ZERO,
        }
    }

    /// Decide what to do after attempt number `attempt` (1-based) failed.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        match *self {
            RetryPolicy::Unbounded { pause } => RetryDecision::RetryAfter(pause),
            RetryPolicy::MaxAttempts { attempts, pause } => {
                if attempt >= attempts {
                    RetryDecision::NoRetry
                } else {
                    RetryDecision::RetryAfter(pause)
                }
            }
        }
    }
}
