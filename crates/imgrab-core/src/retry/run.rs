//! Retry loop: run an operation until success or the policy says stop.

use super::policy::{RetryDecision, RetryPolicy};

/// Runs `op` against `state` until it succeeds or `policy` says to stop.
///
/// After each retryable failure `recover` is called with the same state and
/// the error, then the loop sleeps for the policy pause. Both closures take the
/// state explicitly so they can share a `&mut` session.
pub fn run_with_retry<S, T, E, Op, Recover>(
    policy: &RetryPolicy,
    state: &mut S,
    mut op: Op,
    mut recover: Recover,
) -> Result<T, E>
where
    S: ?Sized,
    Op: FnMut(&mut S) -> Result<T, E>,
    Recover: FnMut(&mut S, &E),
{
    let mut attempt = 1u32;
    loop {
        match op(state) {
            Ok(value) => return Ok(value),
            Err(e) => match policy.decide(attempt) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(d) => {
                    recover(state, &e);
                    if !d.is_zero() {
                        std::thread::sleep(d);
                    }
                    attempt = attempt.saturating_add(1);
                }
            },
        }
    }
}
