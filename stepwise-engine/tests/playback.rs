//! Integration tests for pause, resume and speed control.

mod common;

use std::sync::{Arc, Weak};
use std::time::Duration;
use stepwise_core::params::{RunInput, RunRequest};
use stepwise_core::scheduler::{DEFAULT_POLL_INTERVAL, compute_delay};
use stepwise_engine::{RunController, RunStatus};

use common::{mock_controller, record, settled, stream, test_config, until};

fn sort_request() -> RunRequest {
    RunRequest::new("insertion_sort", RunInput::array(vec![7, 3, 9, 1, 4, 4, 0]))
}

#[tokio::test]
async fn pause_then_resume_leaves_the_stream_unchanged() {
    let (plain, _) = mock_controller(test_config());
    let expected = record(&plain);
    plain.start(sort_request()).unwrap();
    plain.wait().await.unwrap();

    let (paused, clock) = mock_controller(test_config());
    let actual = record(&paused);
    paused.start(sort_request()).unwrap();
    until(|| paused.snapshot().steps >= 2).await;

    paused.pause().unwrap();
    paused.resume().unwrap();
    paused.wait().await.unwrap();

    assert_eq!(stream(&expected.lock()), stream(&actual.lock()));
    assert!(
        clock
            .recorded_sleeps()
            .iter()
            .all(|d| *d == compute_delay(50))
    );
}

#[tokio::test]
async fn paused_run_parks_until_resumed() {
    let (controller, clock) = mock_controller(test_config());
    let expected = {
        let (reference, _) = mock_controller(test_config());
        let recorded = record(&reference);
        reference.start(sort_request()).unwrap();
        reference.wait().await.unwrap();
        let checkpoints = recorded.lock().clone();
        checkpoints
    };
    let actual = record(&controller);

    controller.start(sort_request()).unwrap();
    controller.pause().unwrap();

    // Parked at the gate before the first checkpoint.
    until(|| clock.sleep_count() >= 20).await;
    let state = controller.snapshot();
    assert_eq!(state.status, RunStatus::Running);
    assert!(!state.playing);
    assert_eq!(state.steps, 0);
    assert!(
        clock
            .recorded_sleeps()
            .iter()
            .all(|d| *d == DEFAULT_POLL_INTERVAL)
    );

    controller.resume().unwrap();
    assert!(controller.snapshot().playing);
    controller.wait().await.unwrap();

    assert_eq!(stream(&expected), stream(&actual.lock()));
}

#[tokio::test]
async fn pause_mid_run_holds_position() {
    let (controller, _) = mock_controller(test_config());
    controller.start(sort_request()).unwrap();
    until(|| controller.snapshot().steps >= 3).await;

    controller.pause().unwrap();
    let held = controller.snapshot();
    common::spin(100).await;

    let still = controller.snapshot();
    assert_eq!(still.steps, held.steps);
    assert_eq!(still.subject, held.subject);
    assert!(!settled(&controller));

    controller.resume().unwrap();
    controller.wait().await.unwrap();
    assert_eq!(controller.status(), RunStatus::Finished);
}

#[tokio::test]
async fn speed_change_applies_from_the_next_checkpoint() {
    let (controller, clock) = mock_controller(test_config());

    let weak: Weak<RunController> = Arc::downgrade(&controller);
    controller.on_checkpoint(move |checkpoint| {
        if checkpoint.seq == 1
            && let Some(controller) = weak.upgrade()
        {
            controller.set_speed(100).unwrap();
        }
    });

    controller
        .start(RunRequest::new("fibonacci", RunInput::Fibonacci { n: 6 }))
        .unwrap();
    controller.wait().await.unwrap();

    let mut expected = vec![compute_delay(50)];
    expected.extend(std::iter::repeat_n(Duration::from_millis(50), 4));
    assert_eq!(clock.recorded_sleeps(), expected);
    assert_eq!(controller.snapshot().speed_percent, 100);
}

#[tokio::test]
async fn tree_runs_use_the_traversal_delay() {
    let (controller, clock) = mock_controller(test_config());
    controller.set_speed(1).unwrap();

    controller
        .start(RunRequest::new("bst", RunInput::Tree {
            tree: stepwise_core::params::TreeKind::Bst,
            action: stepwise_core::params::TreeAction::Insert(10),
            base: None,
        }))
        .unwrap();
    controller.wait().await.unwrap();

    let sleeps = clock.recorded_sleeps();
    assert!(!sleeps.is_empty());
    assert!(sleeps.iter().all(|d| *d == Duration::from_millis(120)));
}

#[tokio::test]
async fn playback_log_entries() {
    let (controller, _) = mock_controller(test_config());
    let run_id = controller.start(sort_request()).unwrap();
    controller.pause().unwrap();
    controller.set_speed(80).unwrap();
    controller.resume().unwrap();
    controller.wait().await.unwrap();

    let messages: Vec<String> = controller
        .logs()
        .by_run(run_id)
        .into_iter()
        .map(|e| e.message)
        .collect();
    assert_eq!(
        messages,
        vec!["Run started", "Paused", "Speed changed", "Resumed", "Run finished"]
    );
}
