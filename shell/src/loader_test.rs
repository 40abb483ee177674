use super::*;
use crate::test_support::{Flaky, TokioTimer, instant_loader, recorded};

fn retries(n: u32) -> RetryPolicy {
    RetryPolicy { retries: n, ..RetryPolicy::default() }
}

// =============================================================================
// RetryPolicy
// =============================================================================

#[test]
fn default_policy_is_three_retries_one_second_apart() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.retries, DEFAULT_LOAD_RETRIES);
    assert_eq!(policy.delay, Duration::from_millis(DEFAULT_RETRY_DELAY_MS));
    assert_eq!(policy.retry_on, RetryOn::AnyFailure);
    assert_eq!(policy.max_attempts(), 4);
}

#[test]
fn any_failure_retries_missing_modules() {
    let policy = RetryPolicy::default();
    assert!(policy.should_retry(&LoadError::not_found("x")));
    assert!(policy.should_retry(&LoadError::fetch("x", "offline")));
}

#[test]
fn transient_only_skips_permanent_failures() {
    let policy = RetryPolicy { retry_on: RetryOn::TransientOnly, ..RetryPolicy::default() };
    assert!(!policy.should_retry(&LoadError::not_found("x")));
    assert!(policy.should_retry(&LoadError::fetch("x", "offline")));
}

#[test]
fn cancellation_is_never_retried() {
    assert!(!RetryPolicy::default().should_retry(&LoadError::cancelled("x")));
}

// =============================================================================
// load_with_retry
// =============================================================================

#[tokio::test]
async fn first_success_needs_no_retry() {
    let (loader, timer, sink) = instant_loader(retries(3));
    let source = Flaky::new(0);

    let loaded = loader.load_with_retry("team", || source.call("team")).await;

    assert_eq!(loaded, Ok("team"));
    assert_eq!(source.calls(), 1);
    assert!(timer.sleeps().is_empty());
    assert!(sink.events().is_empty());
}

#[tokio::test]
async fn fewer_failures_than_bound_resolve_without_error() {
    for failures in 1..=3 {
        let (loader, timer, sink) = instant_loader(retries(3));
        let source = Flaky::new(failures);

        let loaded = loader.load_with_retry("news", || source.call("news")).await;

        assert_eq!(loaded, Ok("news"), "failures={failures}");
        assert_eq!(source.calls(), failures + 1);
        assert_eq!(timer.sleeps().len(), failures as usize);
        assert_eq!(sink.count(|e| matches!(e, Diagnostic::LoadFailed { .. })), 0);
    }
}

#[tokio::test]
async fn always_failing_load_makes_bound_plus_one_attempts() {
    let (loader, timer, sink) = instant_loader(retries(3));
    let source = Flaky::always();

    let loaded = loader.load_with_retry("media", || source.call("media")).await;

    assert!(matches!(loaded, Err(LoadError::Fetch { .. })));
    assert_eq!(source.calls(), 4);
    assert_eq!(timer.sleeps(), vec![Duration::from_secs(1); 3]);
    assert_eq!(sink.count(|e| matches!(e, Diagnostic::LoadRetry { .. })), 3);
    assert_eq!(
        sink.count(|e| matches!(e, Diagnostic::LoadFailed { attempts: 4, .. })),
        1,
        "exactly one terminal failure"
    );
}

#[tokio::test]
async fn terminal_error_is_the_last_attempt() {
    let (loader, _timer, _sink) = instant_loader(retries(2));
    let source = Flaky::always();

    let loaded = loader.load_with_retry("media", || source.call("media")).await;

    assert_eq!(loaded, Err(LoadError::fetch("media", "attempt 3 failed")));
}

#[tokio::test]
async fn retry_diagnostics_count_down() {
    let (loader, _timer, sink) = instant_loader(retries(2));
    let source = Flaky::always();

    let _ = loader.load_with_retry("contacts", || source.call("contacts")).await;

    let remaining: Vec<u32> = sink
        .events()
        .into_iter()
        .filter_map(|e| match e {
            Diagnostic::LoadRetry { remaining, .. } => Some(remaining),
            _ => None,
        })
        .collect();
    assert_eq!(remaining, vec![2, 1]);
}

#[tokio::test]
async fn zero_retries_means_single_attempt() {
    let (loader, timer, _sink) = instant_loader(retries(0));
    let source = Flaky::always();

    assert!(loader.load_with_retry("x", || source.call("x")).await.is_err());
    assert_eq!(source.calls(), 1);
    assert!(timer.sleeps().is_empty());
}

#[tokio::test]
async fn transient_only_gives_up_on_missing_module() {
    let policy = RetryPolicy { retry_on: RetryOn::TransientOnly, ..RetryPolicy::default() };
    let (loader, timer, sink) = instant_loader(policy);
    let source = Flaky::missing();

    let loaded = loader.load_with_retry("gone", || source.call("gone")).await;

    assert_eq!(loaded, Err(LoadError::not_found("gone")));
    assert_eq!(source.calls(), 1);
    assert!(timer.sleeps().is_empty());
    assert_eq!(sink.count(|e| matches!(e, Diagnostic::LoadFailed { attempts: 1, .. })), 1);
}

#[tokio::test]
async fn any_failure_retries_missing_module_to_the_bound() {
    let (loader, _timer, _sink) = instant_loader(RetryPolicy::default());
    let source = Flaky::missing();

    assert!(loader.load_with_retry("gone", || source.call("gone")).await.is_err());
    assert_eq!(source.calls(), 4);
}

#[tokio::test]
async fn cancelled_attempt_stops_without_diagnostics() {
    let (loader, timer, sink) = instant_loader(RetryPolicy::default());

    let loaded: Result<(), LoadError> =
        loader.load_with_retry("x", || async { Err(LoadError::cancelled("x")) }).await;

    assert_eq!(loaded, Err(LoadError::cancelled("x")));
    assert!(timer.sleeps().is_empty());
    assert!(sink.events().is_empty());
}

// =============================================================================
// Timing (paused tokio clock)
// =============================================================================

#[tokio::test(start_paused = true)]
async fn delay_is_constant_between_attempts() {
    let (diagnostics, _sink) = recorded();
    let loader = Loader::new(RetryPolicy::default(), Arc::new(TokioTimer), diagnostics);
    let source = Flaky::always();
    let start = tokio::time::Instant::now();

    assert!(loader.load_with_retry("team", || source.call("team")).await.is_err());

    assert_eq!(start.elapsed(), Duration::from_secs(3));
    assert_eq!(source.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn independent_loads_do_not_interfere() {
    let (diagnostics, sink) = recorded();
    let loader = Loader::new(RetryPolicy::default(), Arc::new(TokioTimer), diagnostics);
    let flaky = Flaky::new(2);
    let steady = Flaky::new(0);

    let (a, b) = futures::join!(
        loader.load_with_retry("matches", || flaky.call("matches")),
        loader.load_with_retry("team", || steady.call("team")),
    );

    assert_eq!(a, Ok("matches"));
    assert_eq!(b, Ok("team"));
    assert_eq!(flaky.calls(), 3);
    assert_eq!(steady.calls(), 1);
    assert!(sink.events().iter().all(|e| match e {
        Diagnostic::LoadRetry { module, .. } => module == "matches",
        _ => false,
    }));
}
