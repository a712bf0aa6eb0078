use crate::modules::time_tracking::adapters::outbound::in_memory_time_entry_service::ServiceCall;
use crate::modules::time_tracking::core::outcome::ActionOutcome;
use crate::modules::time_tracking::core::ports::RemoteError;
use crate::modules::time_tracking::core::time_entry::{NewTimeEntry, StartTimer};
use crate::modules::time_tracking::use_cases::tracker::TrackerOptions;
use crate::tests::fixtures::time_entry::{TimeEntryBuilder, at};
use crate::tests::fixtures::tracker::TrackerHarness;
use chrono::Duration;

#[tokio::test]
async fn never_shows_more_than_one_running_timer() {
    let harness = TrackerHarness::new();

    for step in 0..6 {
        if step % 3 == 2 {
            harness.tracker.stop_timer().await;
        } else {
            harness.tracker.start_timer(StartTimer::default()).await;
        }
        assert!(harness.tracker.snapshot().running_count() <= 1, "step {step}");
        let running_on_server = harness
            .service
            .entries()
            .await
            .iter()
            .filter(|entry| entry.is_running())
            .count();
        assert!(running_on_server <= 1, "step {step}");
    }
}

#[tokio::test]
async fn rolls_back_a_rejected_start() {
    let harness = TrackerHarness::new();
    harness
        .service
        .fail_next(
            ServiceCall::StartTimer,
            RemoteError::Rejected {
                status: 422,
                message: "Project is archived".into(),
            },
        )
        .await;

    let outcome = harness.tracker.start_timer(StartTimer::default()).await;

    assert_eq!(outcome, ActionOutcome::Failed("Project is archived".into()));
    assert_eq!(harness.tracker.active_timer(), None);
    assert!(harness.tracker.pending_operations().is_empty());
}

#[tokio::test]
async fn aggregates_total_and_billable_hours() {
    let harness = TrackerHarness::new();
    harness
        .service
        .seed(vec![
            TimeEntryBuilder::new().id("1").duration(3600).billable(true).build(),
            TimeEntryBuilder::new().id("2").duration(1800).billable(false).build(),
            TimeEntryBuilder::new().id("3").duration(900).billable(true).build(),
        ])
        .await;

    harness.tracker.fetch_time_entries().await;

    let stats = harness.tracker.stats();
    assert_eq!(stats.total_hours, 1.75);
    assert_eq!(stats.billable_hours, 1.25);
}

#[tokio::test]
async fn promotes_a_created_entry_to_its_server_id() {
    let harness = TrackerHarness::new();
    harness.service.assign_next_id("42").await;
    let start = at(2024, 3, 1, 9, 0);

    let outcome = harness
        .tracker
        .create_time_entry(NewTimeEntry {
            task_id: None,
            project_id: None,
            description: Some("Review".into()),
            start_time: start,
            end_time: Some(start + Duration::hours(2)),
            is_billable: false,
        })
        .await;

    assert_eq!(outcome, ActionOutcome::Synced);
    let entries = harness.tracker.time_entries();
    assert!(entries.iter().all(|entry| !entry.id.starts_with("temp-")));
    assert_eq!(entries.iter().filter(|entry| entry.id == "42").count(), 1);
}

#[tokio::test]
async fn reconciles_the_active_timer_after_start_and_stop() {
    let harness = TrackerHarness::with_options(TrackerOptions {
        reconcile_after_timer_change: true,
        ..TrackerHarness::options()
    });

    harness.tracker.start_timer(StartTimer::default()).await;
    let started = harness.tracker.active_timer().unwrap();
    harness.tracker.stop_timer().await;

    assert_eq!(harness.service.call_count(ServiceCall::ActiveTimer).await, 2);
    assert!(!started.is_provisional());
    assert_eq!(harness.tracker.active_timer(), None);
    assert_eq!(harness.tracker.time_entries()[0].id, started.id);
}
