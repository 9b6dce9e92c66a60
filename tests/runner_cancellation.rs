// tests/runner_cancellation.rs
#![cfg(unix)]

use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use ffrun::errors::RunError;
use ffrun::exec::{CancelSignal, HookedRunner, StopMode, cancel_pair};
use ffrun_test_utils::fake_bin::FakeBin;
use ffrun_test_utils::recorder::HookRecorder;
use ffrun_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

const SIGKILL: i32 = 9;
const SIGTERM: i32 = 15;

#[tokio::test]
async fn cancellation_kills_running_process_once_and_returns() -> TestResult {
    init_tracing();

    let recorder = HookRecorder::new();
    let runner = recorder
        .install(HookedRunner::builder().binary("sleep"), StopMode::Kill)
        .build()?;

    let (canceller, signal) = cancel_pair();
    let run = tokio::spawn(async move { runner.run(signal, "30").await });

    // Let the process start before cancelling.
    while recorder.post_calls() == 0 {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(canceller.cancel());

    let err = with_timeout(run).await?.unwrap_err();

    assert!(err.is_cancelled(), "got {err:?}");
    match &err {
        RunError::Cancelled(failure) => assert_eq!(failure.signal(), Some(SIGKILL)),
        other => panic!("expected Cancelled error, got {other:?}"),
    }
    assert_eq!(recorder.cancel_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn natural_exit_never_runs_on_cancel_hook() -> TestResult {
    init_tracing();

    let recorder = HookRecorder::new();
    let runner = recorder
        .install(HookedRunner::builder().binary("true"), StopMode::Kill)
        .build()?;

    let (canceller, signal) = cancel_pair();
    with_timeout(runner.run(signal, "")).await?;

    // The signal was dropped together with the finished run.
    assert!(!canceller.cancel());
    assert_eq!(recorder.cancel_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn deadline_signal_cancels_long_running_process() -> TestResult {
    init_tracing();

    let recorder = HookRecorder::new();
    let runner = recorder
        .install(HookedRunner::builder().binary("sleep"), StopMode::Terminate)
        .build()?;

    let started = Instant::now();
    let cancel = CancelSignal::never().with_deadline(Duration::from_millis(200));
    let err = with_timeout(runner.run(cancel, "30")).await.unwrap_err();

    assert!(started.elapsed() >= Duration::from_millis(200));
    assert_eq!(recorder.cancel_calls(), 1);
    match &err {
        RunError::Cancelled(failure) => assert_eq!(failure.signal(), Some(SIGTERM)),
        other => panic!("expected Cancelled error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn graceful_exit_after_cancellation_is_ok() -> TestResult {
    init_tracing();

    let bin = FakeBin::new()?;
    let script = bin.script(
        "graceful",
        "trap 'exit 0' TERM\nsleep 5 &\nwait",
    )?;

    let recorder = HookRecorder::new();
    let runner = recorder
        .install(
            HookedRunner::builder().binary(script.display().to_string()),
            StopMode::Terminate,
        )
        .build()?;

    let cancel = CancelSignal::after(Duration::from_millis(300));
    with_timeout(runner.run(cancel, "")).await?;

    assert_eq!(recorder.cancel_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn cancellation_does_not_short_circuit_waiting_for_exit() -> TestResult {
    init_tracing();

    let cancel_calls = Arc::new(AtomicUsize::new(0));
    let calls = Arc::clone(&cancel_calls);

    // An on-cancel hook that leaves the process alone.
    let runner = HookedRunner::builder()
        .binary("sleep")
        .on_cancel(move |_process| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
        .build()?;

    let started = Instant::now();
    let cancel = CancelSignal::after(Duration::from_millis(50));
    with_timeout(runner.run(cancel, "1")).await?;

    assert!(started.elapsed() >= Duration::from_secs(1));
    assert_eq!(cancel_calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn custom_on_cancel_hook_can_send_signals() -> TestResult {
    init_tracing();

    let runner = HookedRunner::builder()
        .binary("sleep")
        .on_cancel(|process| {
            process
                .signal(ffrun::exec::Signal::SIGINT)
                .expect("process should still be running");
        })
        .build()?;

    let cancel = CancelSignal::after(Duration::from_millis(100));
    let err = with_timeout(runner.run(cancel, "30")).await.unwrap_err();

    match &err {
        RunError::Cancelled(failure) => assert_eq!(failure.signal(), Some(2)),
        other => panic!("expected Cancelled error, got {other:?}"),
    }
    Ok(())
}
