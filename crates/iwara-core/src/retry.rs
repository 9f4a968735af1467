//! Bounded re-invocation of read operations
//!
//! Scraped pages fail transiently (slow CDN nodes, half-rendered pages) often
//! enough that reads are simply tried again. There is no backoff and no
//! classification: any `Failure` triggers the next attempt.

use std::future::Future;

use tracing::debug;

use crate::response::Response;

/// Attempts for ordinary read operations
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Attempts for the site-wide media list
pub const MEDIA_LIST_MAX_ATTEMPTS: u32 = 3;

/// Runs `operation` until it succeeds or `max_attempts` is used up
///
/// Returns the first `Success`, or the last `Failure` unchanged. A
/// `max_attempts` of 0 is treated as 1.
pub async fn retry<T, F, Fut>(max_attempts: u32, mut operation: F) -> Response<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Response<T>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let result = operation().await;
        if result.is_success() || attempt >= max_attempts {
            return result;
        }
        debug!(
            attempt,
            max_attempts,
            error = result.message().unwrap_or_default(),
            "Attempt failed, retrying"
        );
        attempt += 1;
    }
}
