//! Retry policy for session-recoverable failures.
//!
//! A failed operation is retried according to a tagged policy (unbounded or
//! capped attempts); between attempts a caller-supplied recovery action runs
//! (e.g. reloading the page) so the loop stays flat instead of recursing.

mod policy;
mod run;

pub use policy::{RetryDecision, RetryPolicy};
pub use run::run_with_retry;
