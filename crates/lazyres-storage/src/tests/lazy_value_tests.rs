use super::*;
use std::cell::Cell;

#[derive(Debug, PartialEq, Eq)]
enum TestError {
    Failed,
    Recursion,
}

impl From<RecursionDetected> for TestError {
    fn from(_: RecursionDetected) -> Self {
        TestError::Recursion
    }
}

#[test]
fn test_lazy_value_computes_once() {
    let value = LazyValue::new();
    let calls = Cell::new(0);

    for _ in 0..3 {
        let got: Result<u32, TestError> = value.get_or_try_init(|| {
            calls.set(calls.get() + 1);
            Ok(42)
        });
        assert_eq!(got, Ok(42));
    }

    assert_eq!(calls.get(), 1);
    assert!(value.is_computed());
    assert_eq!(value.get(), Some(42));
}

#[test]
fn test_lazy_value_does_not_cache_errors() {
    let value: LazyValue<u32> = LazyValue::new();
    let calls = Cell::new(0);

    let first: Result<u32, TestError> = value.get_or_try_init(|| {
        calls.set(calls.get() + 1);
        Err(TestError::Failed)
    });
    assert_eq!(first, Err(TestError::Failed));
    assert!(!value.is_computed());

    let second: Result<u32, TestError> = value.get_or_try_init(|| {
        calls.set(calls.get() + 1);
        Ok(7)
    });
    assert_eq!(second, Ok(7));
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_lazy_value_reports_reentrant_read() {
    let value: LazyValue<u32> = LazyValue::new();

    let outer: Result<u32, TestError> = value.get_or_try_init(|| {
        let inner: Result<u32, TestError> = value.get_or_try_init(|| Ok(1));
        assert_eq!(inner, Err(TestError::Recursion));
        Ok(2)
    });

    assert_eq!(outer, Ok(2));
    assert_eq!(value.get(), Some(2));
}

#[test]
fn test_lazy_value_recovers_after_panic() {
    let value: LazyValue<u32> = LazyValue::new();

    let panicked = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _: Result<u32, TestError> = value.get_or_try_init(|| panic!("boom"));
    }));
    assert!(panicked.is_err());

    let retried: Result<u32, TestError> = value.get_or_try_init(|| Ok(5));
    assert_eq!(retried, Ok(5));
}

#[test]
fn test_recursion_tolerant_returns_fallback_without_caching_it() {
    let value: RecursionTolerantLazyValue<Vec<u32>> = RecursionTolerantLazyValue::new();

    let outer: Result<Vec<u32>, TestError> = value.get_or_try_init(
        || {
            let provisional: Result<Vec<u32>, TestError> =
                value.get_or_try_init(|| Ok(vec![99]), Vec::new);
            assert_eq!(provisional, Ok(Vec::new()));
            assert!(value.is_computing());
            Ok(vec![1, 2])
        },
        Vec::new,
    );

    assert_eq!(outer, Ok(vec![1, 2]));
    assert_eq!(value.get(), Some(vec![1, 2]));
    assert!(!value.is_computing());
}

#[test]
fn test_post_compute_runs_before_publication() {
    let value: RecursionTolerantLazyValue<Vec<u32>> = RecursionTolerantLazyValue::new();
    let hook_calls = Cell::new(0);

    let result: Result<Vec<u32>, TestError> = value.get_or_try_init_with_post_compute(
        || Ok(vec![1, 2, 3]),
        Vec::new,
        |computed| {
            hook_calls.set(hook_calls.get() + 1);
            // Reads from inside the hook still see the fallback.
            let during: Result<Vec<u32>, TestError> =
                value.get_or_try_init(|| Ok(vec![0]), || vec![77]);
            assert_eq!(during, Ok(vec![77]));
            computed.retain(|&n| n != 2);
            Ok(())
        },
    );

    assert_eq!(result, Ok(vec![1, 3]));
    assert_eq!(value.get(), Some(vec![1, 3]));

    let again: Result<Vec<u32>, TestError> = value.get_or_try_init_with_post_compute(
        || Ok(vec![]),
        Vec::new,
        |_| {
            hook_calls.set(hook_calls.get() + 1);
            Ok(())
        },
    );
    assert_eq!(again, Ok(vec![1, 3]));
    assert_eq!(hook_calls.get(), 1);
}

#[test]
fn test_failed_post_compute_is_not_cached() {
    let value: RecursionTolerantLazyValue<u32> = RecursionTolerantLazyValue::new();

    let failed: Result<u32, TestError> =
        value.get_or_try_init_with_post_compute(|| Ok(1), || 0, |_| Err(TestError::Failed));
    assert_eq!(failed, Err(TestError::Failed));
    assert!(!value.is_computed());

    let ok: Result<u32, TestError> = value.get_or_try_init(|| Ok(2), || 0);
    assert_eq!(ok, Ok(2));
}
