use std::future::Future;
use std::time::Duration;

use crate::application::ports::ChatModelError;

#[derive(Debug, Clone, Copy)]
pub struct RetrySchedule {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(65),
        }
    }
}

/// Runs an operation with linear backoff on rate-limit errors only. After
/// failed attempt n (1-indexed) the delay is `base_delay * n`, so three
/// attempts sleep `base` and then `2 * base`. Any non-rate-limit error aborts
/// immediately; exhausting all attempts re-raises the last rate-limit error.
pub async fn with_retry<T, F, Fut>(
    schedule: RetrySchedule,
    mut operation: F,
) -> Result<T, ChatModelError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ChatModelError>>,
{
    let attempts = schedule.max_attempts.max(1);
    let mut last_error = ChatModelError::RateLimited;

    for attempt in 1..=attempts {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_rate_limit() => {
                if attempt < attempts {
                    let delay = schedule.base_delay * attempt;
                    tracing::warn!(
                        attempt,
                        max_attempts = attempts,
                        delay_secs = delay.as_secs_f64(),
                        "Rate limit hit, backing off before retry"
                    );
                    tokio::time::sleep(delay).await;
                }
                last_error = error;
            }
            Err(error) => return Err(error),
        }
    }

    Err(last_error)
}
