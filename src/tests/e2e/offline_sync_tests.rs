use crate::modules::time_tracking::adapters::outbound::in_memory_time_entry_service::ServiceCall;
use crate::modules::time_tracking::core::outcome::ActionOutcome;
use crate::modules::time_tracking::core::pending_operation::{OperationKind, OperationPayload};
use crate::modules::time_tracking::core::ports::{QueueStore, RemoteError};
use crate::modules::time_tracking::core::time_entry::{NewTimeEntry, StartTimer};
use crate::modules::time_tracking::use_cases::tracker::TimeTracker;
use crate::shared::infrastructure::notifier::in_memory::InMemoryNotifier;
use crate::tests::fixtures::time_entry::{TimeEntryBuilder, at};
use crate::tests::fixtures::tracker::TrackerHarness;
use chrono::Duration;
use std::sync::Arc;

fn backfill() -> NewTimeEntry {
    let start = at(2024, 3, 1, 13, 0);
    NewTimeEntry {
        task_id: Some("t-2".into()),
        project_id: None,
        description: Some("Call with client".into()),
        start_time: start,
        end_time: Some(start + Duration::minutes(30)),
        is_billable: true,
    }
}

fn kinds(tracker: &TimeTracker) -> Vec<OperationKind> {
    tracker
        .pending_operations()
        .iter()
        .map(|operation| operation.kind())
        .collect()
}

#[tokio::test]
async fn queues_offline_actions_in_order_and_drains_them_on_sync() {
    let harness = TrackerHarness::new();
    harness
        .service
        .seed(vec![TimeEntryBuilder::new().id("7").running().build()])
        .await;
    harness.tracker.fetch_active_timer().await;
    harness.go_offline();

    assert_eq!(
        harness.tracker.start_timer(StartTimer::default()).await,
        ActionOutcome::SavedOffline
    );
    assert_eq!(harness.tracker.stop_timer().await, ActionOutcome::SavedOffline);
    assert_eq!(
        harness.tracker.create_time_entry(backfill()).await,
        ActionOutcome::SavedOffline
    );

    assert_eq!(
        kinds(&harness.tracker),
        vec![OperationKind::Start, OperationKind::Stop, OperationKind::Create]
    );
    assert_eq!(
        harness.tracker.pending_operations()[1].payload,
        OperationPayload::Stop { id: "7".into() }
    );
    assert_eq!(
        harness.queue_store.load().await.unwrap().pending_operations,
        harness.tracker.pending_operations()
    );

    harness.go_online();
    let lists_before = harness.service.call_count(ServiceCall::ListEntries).await;
    let actives_before = harness.service.call_count(ServiceCall::ActiveTimer).await;

    let report = harness.tracker.sync_pending_operations().await.unwrap();

    assert_eq!(report.replayed, 3);
    assert!(harness.tracker.pending_operations().is_empty());
    assert!(harness.queue_store.load().await.unwrap().is_empty());
    assert_eq!(
        harness.service.call_count(ServiceCall::ListEntries).await,
        lists_before + 1
    );
    assert_eq!(
        harness.service.call_count(ServiceCall::ActiveTimer).await,
        actives_before + 1
    );
    let snapshot = harness.tracker.snapshot();
    assert!(snapshot.running_count() <= 1);
    assert!(snapshot.time_entries.iter().any(|entry| entry.description.as_deref() == Some("Call with client")));
}

#[tokio::test]
async fn keeps_the_failed_head_in_place_until_a_later_sync_succeeds() {
    let harness = TrackerHarness::new();
    harness.go_offline();
    harness.tracker.start_timer(StartTimer::default()).await;
    harness.tracker.create_time_entry(backfill()).await;
    harness.go_online();
    harness
        .service
        .fail_next(
            ServiceCall::StartTimer,
            RemoteError::Rejected {
                status: 500,
                message: "Database unavailable".into(),
            },
        )
        .await;
    let creates_before = harness.service.call_count(ServiceCall::CreateEntry).await;

    let first = harness.tracker.sync_pending_operations().await.unwrap();

    assert_eq!(first.replayed, 0);
    assert_eq!(kinds(&harness.tracker), vec![OperationKind::Start, OperationKind::Create]);
    assert_eq!(harness.tracker.pending_operations()[0].retries, 1);
    assert_eq!(
        harness.service.call_count(ServiceCall::CreateEntry).await,
        creates_before
    );

    let second = harness.tracker.sync_pending_operations().await.unwrap();

    assert_eq!(second.replayed, 2);
    let replays: Vec<ServiceCall> = harness
        .service
        .calls()
        .await
        .into_iter()
        .filter(|call| matches!(call, ServiceCall::StartTimer | ServiceCall::CreateEntry))
        .collect();
    // Offline attempts, the failed replay, then the ordered drain.
    assert_eq!(
        replays,
        vec![
            ServiceCall::StartTimer,
            ServiceCall::CreateEntry,
            ServiceCall::StartTimer,
            ServiceCall::StartTimer,
            ServiceCall::CreateEntry,
        ]
    );
}

#[tokio::test]
async fn recovers_the_queue_after_a_restart() {
    let harness = TrackerHarness::new();
    harness.go_offline();
    harness.tracker.start_timer(StartTimer::default()).await;
    drop(harness.tracker);

    let restarted = TimeTracker::new(
        harness.service.clone(),
        harness.queue_store.clone(),
        Arc::new(harness.connectivity.clone()),
        Arc::new(InMemoryNotifier::new()),
        TrackerHarness::options(),
    );
    assert_eq!(restarted.restore().await.unwrap(), 1);
    assert_eq!(restarted.active_timer(), None);

    harness.service.set_offline(false);
    harness.connectivity.set_online();
    restarted.sync_pending_operations().await.unwrap();

    assert!(restarted.pending_operations().is_empty());
    assert!(restarted.active_timer().is_some_and(|timer| timer.is_running()));
}

#[tokio::test]
async fn persists_only_the_pending_queue() {
    let harness = TrackerHarness::new();
    harness
        .service
        .seed(vec![TimeEntryBuilder::new().id("1").build()])
        .await;
    harness.tracker.fetch_time_entries().await;
    harness.go_offline();
    harness.tracker.delete_time_entry("1").await;

    let raw: serde_json::Value =
        serde_json::from_str(&harness.queue_store.raw().await.unwrap()).unwrap();

    let keys: Vec<&str> = raw
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["pendingOperations"]);
    assert_eq!(raw["pendingOperations"][0]["type"], "delete");
    assert_eq!(raw["pendingOperations"][0]["data"]["id"], "1");
}

#[tokio::test]
async fn dead_letters_a_repeatedly_rejected_operation_and_requeues_it_on_demand() {
    let harness = TrackerHarness::new();
    harness.go_offline();
    harness.tracker.delete_time_entry("missing").await;
    harness.go_online();

    for _ in 0..TrackerHarness::options().max_replay_attempts {
        harness.tracker.sync_pending_operations().await;
    }

    assert!(harness.tracker.pending_operations().is_empty());
    assert_eq!(harness.tracker.failed_operations().len(), 1);
    assert_eq!(harness.tracker.sync_pending_operations().await, None);

    harness
        .service
        .seed(vec![TimeEntryBuilder::new().id("missing").build()])
        .await;
    assert_eq!(harness.tracker.retry_failed_operations().await, 1);
    let report = harness.tracker.sync_pending_operations().await.unwrap();

    assert_eq!(report.replayed, 1);
    assert!(harness.tracker.failed_operations().is_empty());
    assert!(harness.service.entries().await.is_empty());
}
