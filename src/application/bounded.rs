use std::time::Duration;

use crate::domain::deadline::Deadline;
use crate::domain::errors::DomainError;

/// Run a blocking store operation on the blocking pool and give up once
/// `limit` has elapsed since the call started.
///
/// On timeout the caller gets `DomainError::Timeout` right away. The same
/// deadline is armed on the blocking thread, so the detached task fails
/// its next store call with `Timeout` and never commits a write.
pub async fn run_bounded<T, F>(limit: Duration, op: F) -> Result<T, DomainError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    let deadline = Deadline::after(limit);
    let task = tokio::task::spawn_blocking(move || {
        let _armed = deadline.enter();
        op()
    });
    match tokio::time::timeout(limit, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(DomainError::Internal(join_err.to_string())),
        Err(_) => {
            log::warn!("operation exceeded its {:?} bound", limit);
            Err(DomainError::Timeout(limit))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_the_operation_result() {
        let value = run_bounded(Duration::from_secs(1), || Ok(42)).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn propagates_operation_errors_unchanged() {
        let err = run_bounded::<(), _>(Duration::from_secs(1), || {
            Err(DomainError::NotFound("invoice"))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, DomainError::NotFound("invoice")));
    }

    #[tokio::test]
    async fn slow_operation_times_out() {
        let err = run_bounded(Duration::from_millis(20), || {
            std::thread::sleep(Duration::from_millis(300));
            Ok(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, DomainError::Timeout(d) if d == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn detached_operation_stops_at_the_deadline() {
        let (tx, rx) = std::sync::mpsc::channel();
        let err = run_bounded(Duration::from_millis(20), move || {
            std::thread::sleep(Duration::from_millis(100));
            let after_sleep = crate::domain::deadline::check();
            let _ = tx.send(after_sleep.clone());
            after_sleep
        })
        .await
        .unwrap_err();
        assert!(matches!(err, DomainError::Timeout(_)));

        let seen = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(2)))
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(seen, Err(DomainError::Timeout(d)) if d == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn deadline_is_disarmed_after_the_operation() {
        run_bounded(Duration::from_millis(5), || Ok(())).await.unwrap();
        let leftover = run_bounded(Duration::from_secs(1), || {
            Ok(crate::domain::deadline::Deadline::current().map(|d| d.remaining()))
        })
        .await
        .unwrap();
        assert!(leftover.is_some_and(|left| left > Duration::from_millis(500)));
    }

    #[tokio::test]
    async fn panicking_operation_is_internal_error() {
        let err = run_bounded::<(), _>(Duration::from_secs(1), || panic!("boom"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }
}
