//! Worker lifecycle: start/stop, drain, failure isolation and routing errors

mod common;

use common::{
    create_scripted_worker, create_test_worker, custom, new_deliveries, snapshot,
    RecordingPlatform, ScriptedProcessor,
};
use ddbridge_core::{BridgeError, Target};
use std::time::Duration;

// ----------------------------------------------------------------------------
// Drain
// ----------------------------------------------------------------------------

#[test]
fn test_stop_drains_everything_queued_before_it() {
    const K: usize = 200;

    let deliveries = new_deliveries();
    let mut worker = create_test_worker(RecordingPlatform::new());
    worker
        .register_processor(
            Target::new("slow"),
            Box::new(ScriptedProcessor::new(deliveries.clone()).with_delay(Duration::from_micros(200))),
        )
        .unwrap();
    worker.start().unwrap();

    let handle = worker.handle();
    for i in 0..K {
        assert!(handle.enqueue(custom("slow", i.to_string())));
    }
    worker.stop().unwrap();

    assert_eq!(snapshot(&deliveries).len(), K);

    // Enqueued after stop: dropped, never delivered
    assert!(!handle.enqueue(custom("slow", "late")));
    assert!(!handle.is_accepting());
    assert_eq!(snapshot(&deliveries).len(), K);

    let stats = handle.stats();
    assert_eq!(stats.dispatched, K as u64);
    assert_eq!(stats.dropped, 1);
    assert_eq!(stats.depth, 0);
}

// ----------------------------------------------------------------------------
// Idempotence
// ----------------------------------------------------------------------------

#[test]
fn test_start_and_stop_are_idempotent() {
    let deliveries = new_deliveries();
    let mut worker = create_scripted_worker(RecordingPlatform::new(), &["a"], &deliveries);

    worker.start().unwrap();
    worker.start().unwrap();
    assert!(worker.is_running());

    worker.handle().enqueue(custom("a", "once"));

    worker.stop().unwrap();
    worker.stop().unwrap();
    assert!(worker.is_stopped());

    // Restart after stop does nothing
    worker.start().unwrap();
    assert!(!worker.is_running());
    assert_eq!(snapshot(&deliveries), vec!["a/once"]);
}

// ----------------------------------------------------------------------------
// Failure isolation
// ----------------------------------------------------------------------------

#[test]
fn test_failing_processor_does_not_block_next_message() {
    let platform = RecordingPlatform::new();
    let deliveries = new_deliveries();
    let mut worker = create_scripted_worker(platform.clone(), &["a", "b"], &deliveries);
    worker.start().unwrap();

    let handle = worker.handle();
    handle.enqueue(custom("a", "fail"));
    handle.enqueue(custom("b", "next"));
    worker.stop().unwrap();

    assert_eq!(snapshot(&deliveries), vec!["a/fail", "b/next"]);
    assert_eq!(handle.stats().failed, 1);

    let errors = platform.calls_with_prefix("telemetry.error:processor:");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("scripted failure"));
}

#[test]
fn test_panicking_processor_does_not_stop_the_loop() {
    let platform = RecordingPlatform::new();
    let deliveries = new_deliveries();
    let mut worker = create_scripted_worker(platform.clone(), &["a", "b"], &deliveries);
    worker.start().unwrap();

    let handle = worker.handle();
    handle.enqueue(custom("a", "panic"));
    handle.enqueue(custom("a", "after-panic"));
    handle.enqueue(custom("b", "next"));
    worker.stop().unwrap();

    assert_eq!(
        snapshot(&deliveries),
        vec!["a/panic", "a/after-panic", "b/next"]
    );
    assert_eq!(handle.stats().failed, 1);

    let errors = platform.calls_with_prefix("telemetry.error:processor_panic:");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("scripted panic"));
}

// ----------------------------------------------------------------------------
// Routing and registration errors
// ----------------------------------------------------------------------------

#[test]
fn test_unknown_target_dropped_and_reported_once() {
    let platform = RecordingPlatform::new();
    let deliveries = new_deliveries();
    let mut worker = create_scripted_worker(platform.clone(), &["a"], &deliveries);
    worker.start().unwrap();

    let handle = worker.handle();
    handle.enqueue(custom("nowhere", "1"));
    handle.enqueue(custom("nowhere", "2"));
    handle.enqueue(custom("a", "3"));
    worker.stop().unwrap();

    assert_eq!(snapshot(&deliveries), vec!["a/3"]);
    assert_eq!(handle.stats().dropped, 2);
    assert_eq!(
        platform.calls_with_prefix("telemetry.error:unknown_target").len(),
        1
    );
}

#[test]
fn test_duplicate_registration_keeps_first_and_reports_at_start() {
    let platform = RecordingPlatform::new();
    let first = new_deliveries();
    let second = new_deliveries();
    let mut worker = create_test_worker(platform.clone());

    worker
        .register_processor(Target::new("a"), Box::new(ScriptedProcessor::new(first.clone())))
        .unwrap();
    let err = worker
        .register_processor(Target::new("a"), Box::new(ScriptedProcessor::new(second.clone())))
        .unwrap_err();
    assert!(matches!(err, BridgeError::DuplicateProcessor { .. }));
    assert_eq!(worker.registered_targets(), vec![Target::new("a")]);
    assert!(platform
        .calls_with_prefix("telemetry.error:duplicate_processor")
        .is_empty());

    worker.start().unwrap();
    worker.handle().enqueue(custom("a", "x"));
    worker.stop().unwrap();

    assert_eq!(snapshot(&first), vec!["a/x"]);
    assert!(snapshot(&second).is_empty());
    assert_eq!(
        platform
            .calls_with_prefix("telemetry.error:duplicate_processor")
            .len(),
        1
    );
}

#[test]
fn test_stop_timeout_reports_warning() {
    let platform = RecordingPlatform::new();
    let deliveries = new_deliveries();
    let config = ddbridge_core::WorkerConfig {
        shutdown_timeout_ms: 20,
        ..ddbridge_core::WorkerConfig::testing()
    };
    let mut worker = ddbridge_runtime::Worker::new(
        config,
        ddbridge_runtime::InternalReporter::new(platform.clone()),
    );
    worker
        .register_processor(
            Target::new("slow"),
            Box::new(ScriptedProcessor::new(deliveries).with_delay(Duration::from_millis(300))),
        )
        .unwrap();
    worker.start().unwrap();
    worker.handle().enqueue(custom("slow", "stuck"));

    assert!(matches!(
        worker.stop(),
        Err(BridgeError::ShutdownTimeout { timeout_ms: 20 })
    ));
    let warnings = platform.calls_with_prefix("telemetry.debug:Worker did not drain");
    assert_eq!(warnings.len(), 1);
}
