use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use quellbot::application::ports::ChatModelError;
use quellbot::application::services::{with_retry, RetrySchedule};

const BASE_DELAY: Duration = Duration::from_millis(100);

fn schedule(max_attempts: u32) -> RetrySchedule {
    RetrySchedule {
        max_attempts,
        base_delay: BASE_DELAY,
    }
}

#[tokio::test(start_paused = true)]
async fn given_two_rate_limits_then_success_when_retrying_then_returns_result_after_linear_backoff()
{
    let calls = AtomicU32::new(0);
    let started = tokio::time::Instant::now();

    let result = with_retry(schedule(3), || {
        let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if attempt < 3 {
                Err(ChatModelError::RateLimited)
            } else {
                Ok("answer")
            }
        }
    })
    .await;

    assert_eq!(result.unwrap(), "answer");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // Sleeps of base*1 and base*2 between the three attempts.
    assert_eq!(started.elapsed(), BASE_DELAY * 3);
}

#[tokio::test(start_paused = true)]
async fn given_persistent_rate_limit_when_attempts_exhaust_then_last_error_is_reraised() {
    let calls = AtomicU32::new(0);

    let result: Result<(), _> = with_retry(schedule(3), || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err(ChatModelError::RateLimited) }
    })
    .await;

    assert!(matches!(result, Err(ChatModelError::RateLimited)));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn given_non_rate_limit_error_when_retrying_then_aborts_after_single_attempt() {
    let calls = AtomicU32::new(0);
    let started = tokio::time::Instant::now();

    let result: Result<(), _> = with_retry(schedule(3), || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err(ChatModelError::ApiRequestFailed("boom".to_string())) }
    })
    .await;

    assert!(matches!(result, Err(ChatModelError::ApiRequestFailed(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn given_immediate_success_when_retrying_then_no_backoff_happens() {
    let started = tokio::time::Instant::now();

    let result = with_retry(schedule(3), || async { Ok::<_, ChatModelError>(42) }).await;

    assert_eq!(result.unwrap(), 42);
    assert_eq!(started.elapsed(), Duration::ZERO);
}
