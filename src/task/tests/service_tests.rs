//! Orchestration tests for the task lifecycle service and facade.

use std::sync::Arc;

use super::support::FixedClock;
use crate::config::ReminderConfig;
use crate::scheduler::adapters::RecordingScheduler;
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{ActionItem, MeetingId, Priority, TaskId, TaskPatch, TaskStatus},
    ports::TaskFilter,
    services::{TaskFacade, TaskLifecycleError, TaskLifecycleService},
};
use rstest::{fixture, rstest};

type TestService = TaskLifecycleService<InMemoryTaskRepository, FixedClock>;
type TestFacade = TaskFacade<InMemoryTaskRepository, FixedClock>;

struct Harness {
    service: TestService,
    scheduler: RecordingScheduler,
}

#[fixture]
fn harness() -> Harness {
    let scheduler = RecordingScheduler::new();
    let service = TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(FixedClock::on_date(2024, 1, 15)),
        Arc::new(scheduler.clone()),
        ReminderConfig::default(),
    );
    Harness { service, scheduler }
}

#[fixture]
fn facade() -> TestFacade {
    TaskFacade::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(FixedClock::on_date(2024, 1, 15)),
        Arc::new(RecordingScheduler::new()),
        ReminderConfig::default(),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_persists_and_is_retrievable(harness: Harness) {
    let item = ActionItem::new("Review budget proposal")
        .with_assignee("alice")
        .with_priority("high");

    let task_id = harness
        .service
        .create(&item, Some(MeetingId::new("m-1")), None)
        .await
        .expect("creation should succeed");
    let fetched = harness
        .service
        .get(task_id)
        .await
        .expect("lookup should succeed")
        .expect("task should exist");

    assert_eq!(fetched.description(), "Review budget proposal");
    assert_eq!(fetched.assignee(), "alice");
    assert_eq!(fetched.priority(), Priority::High);
    assert_eq!(fetched.status(), TaskStatus::Pending);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_registers_reminder_jobs(harness: Harness) {
    let item = ActionItem::new("Ship the release").with_actual_deadline("2024-01-20");

    let task_id = harness
        .service
        .create(&item, None, None)
        .await
        .expect("creation should succeed");

    let keys: Vec<String> = harness
        .scheduler
        .scheduled_keys()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        keys,
        vec![
            format!("overdue_check_{task_id}"),
            format!("reminder_1day_{task_id}"),
            format!("reminder_deadline_{task_id}"),
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_batch_skips_invalid_items(harness: Harness) {
    let items = vec![
        ActionItem::new("Valid one"),
        ActionItem::new("   "),
        ActionItem::new("Also valid").with_actual_deadline("not-a-date"),
        ActionItem::new("Valid two"),
    ];

    let created = harness.service.create_batch(&items, None, None).await;

    assert_eq!(created.len(), 2);
    let stored = harness
        .service
        .query(&TaskFilter::new())
        .await
        .expect("query should succeed");
    assert_eq!(stored.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_fields_merges_and_reports_missing(harness: Harness) {
    let item = ActionItem::new("Draft agenda");
    let task_id = harness
        .service
        .create(&item, None, None)
        .await
        .expect("creation should succeed");

    harness
        .service
        .update_fields(
            task_id,
            TaskPatch::new()
                .with_assignee("bob")
                .with_priority(Priority::Low),
        )
        .await
        .expect("update should succeed");
    let fetched = harness
        .service
        .get(task_id)
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(fetched.assignee(), "bob");
    assert_eq!(fetched.priority(), Priority::Low);

    let missing = harness
        .service
        .update_fields(TaskId::new(), TaskPatch::new().with_assignee("carol"))
        .await;
    assert!(matches!(
        missing,
        Err(TaskLifecycleError::Repository(_))
    ));
    assert!(missing.is_err_and(|error| error.is_not_found()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_patch_description_is_rejected(harness: Harness) {
    let item = ActionItem::new("Draft agenda");
    let task_id = harness
        .service
        .create(&item, None, None)
        .await
        .expect("creation should succeed");

    let result = harness
        .service
        .update_fields(task_id, TaskPatch::new().with_description("   "))
        .await;

    assert!(matches!(result, Err(TaskLifecycleError::Domain(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_moves_through_lifecycle(harness: Harness) {
    let item = ActionItem::new("Prepare demo");
    let task_id = harness
        .service
        .create(&item, None, None)
        .await
        .expect("creation should succeed");

    harness
        .service
        .mark_in_progress(task_id)
        .await
        .expect("mark in progress should succeed");
    let fetched = harness
        .service
        .get(task_id)
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(fetched.status(), TaskStatus::InProgress);

    harness
        .service
        .mark_completed(task_id)
        .await
        .expect("mark completed should succeed");
    let fetched = harness
        .service
        .get(task_id)
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(fetched.status(), TaskStatus::Completed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_task_and_reminders(harness: Harness) {
    let item = ActionItem::new("Prune stale branches").with_actual_deadline("2024-01-25");
    let task_id = harness
        .service
        .create(&item, None, None)
        .await
        .expect("creation should succeed");
    assert_eq!(harness.scheduler.job_count(), 3);

    harness
        .service
        .delete(task_id)
        .await
        .expect("delete should succeed");

    assert_eq!(harness.scheduler.job_count(), 0);
    let fetched = harness
        .service
        .get(task_id)
        .await
        .expect("lookup should succeed");
    assert_eq!(fetched, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overdue_and_upcoming_split_on_today(harness: Harness) {
    let overdue_item = ActionItem::new("Late invoice").with_actual_deadline("2024-01-10");
    let today_item = ActionItem::new("Due today").with_actual_deadline("2024-01-15");
    let soon_item = ActionItem::new("Due soon").with_actual_deadline("2024-01-20");
    let far_item = ActionItem::new("Far out").with_actual_deadline("2024-03-01");
    for item in [&overdue_item, &today_item, &soon_item, &far_item] {
        harness
            .service
            .create(item, None, None)
            .await
            .expect("creation should succeed");
    }

    let overdue = harness
        .service
        .overdue()
        .await
        .expect("overdue query should succeed");
    let descriptions: Vec<&str> = overdue.iter().map(|task| task.description()).collect();
    assert_eq!(descriptions, vec!["Late invoice"]);

    let upcoming = harness
        .service
        .upcoming(7)
        .await
        .expect("upcoming query should succeed");
    let descriptions: Vec<&str> = upcoming.iter().map(|task| task.description()).collect();
    assert_eq!(descriptions, vec!["Due today", "Due soon"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_tasks_leave_overdue_view(harness: Harness) {
    let item = ActionItem::new("Late invoice").with_actual_deadline("2024-01-10");
    let task_id = harness
        .service
        .create(&item, None, None)
        .await
        .expect("creation should succeed");

    harness
        .service
        .mark_completed(task_id)
        .await
        .expect("mark completed should succeed");

    let overdue = harness
        .service
        .overdue()
        .await
        .expect("overdue query should succeed");
    assert!(overdue.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn query_filters_by_meeting_and_assignee(harness: Harness) {
    let first = ActionItem::new("From standup").with_assignee("alice");
    let second = ActionItem::new("From retro").with_assignee("bob");
    harness
        .service
        .create(&first, Some(MeetingId::new("standup")), None)
        .await
        .expect("creation should succeed");
    harness
        .service
        .create(&second, Some(MeetingId::new("retro")), None)
        .await
        .expect("creation should succeed");

    let from_standup = harness
        .service
        .query(&TaskFilter::new().for_meeting(MeetingId::new("standup")))
        .await
        .expect("query should succeed");
    assert_eq!(from_standup.len(), 1);
    assert_eq!(from_standup[0].description(), "From standup");

    let bobs = harness
        .service
        .query(&TaskFilter::new().with_assignee("bob"))
        .await
        .expect("query should succeed");
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].description(), "From retro");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn facade_reports_missing_tasks_as_false(facade: TestFacade) {
    let absent = TaskId::new();

    assert!(
        !facade
            .mark_task_in_progress(absent)
            .await
            .expect("call should succeed")
    );
    assert!(
        !facade
            .mark_task_completed(absent)
            .await
            .expect("call should succeed")
    );
    assert!(
        !facade
            .delete_task(absent)
            .await
            .expect("call should succeed")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn facade_round_trips_action_items(facade: TestFacade) {
    let items = vec![
        ActionItem::new("Publish minutes"),
        ActionItem::new("Schedule follow-up"),
    ];

    let created = facade
        .create_tasks_from_action_items(&items, Some(MeetingId::new("m-7")), None)
        .await;
    assert_eq!(created.len(), 2);

    let completed = facade
        .mark_task_completed(created[0])
        .await
        .expect("call should succeed");
    assert!(completed);

    let stored = facade
        .get_tasks(&TaskFilter::new().with_status(TaskStatus::Completed))
        .await
        .expect("query should succeed");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].description(), "Publish minutes");
}
