//! List and single-entity fetch through a synchronization store.

mod common;

use common::{options, teacher_store, three_teachers};
use schoolsync::domain::{Choice, TeacherFilter, TeacherStatus};
use schoolsync::service::ServiceError;
use schoolsync::sync::{RetryPolicy, SyncError, SyncOptions};
use std::time::Duration;

#[tokio::test]
async fn test_fetch_all_replaces_snapshot() {
    let (_service, store) = teacher_store(three_teachers(), options(true));
    assert!(store.snapshot().is_empty());

    let items = store
        .fetch_all_with(TeacherFilter {
            status: Some(Choice::All),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(items.len(), 3);
    let state = store.state();
    assert_eq!(state.snapshot.len(), 3);
    assert!(!state.loading());
    assert_eq!(state.error(), None);
}

#[tokio::test]
async fn test_fetch_failure_keeps_previous_snapshot() {
    let (service, store) = teacher_store(three_teachers(), options(true));
    store.fetch_all().await.unwrap();

    service.enqueue_failure(ServiceError::Unavailable("connection refused".into()));
    let err = store.fetch_all().await.unwrap_err();

    assert_eq!(
        err,
        SyncError::Service(ServiceError::Unavailable("connection refused".into()))
    );
    let state = store.state();
    assert_eq!(state.snapshot.len(), 3);
    assert_eq!(
        state.error(),
        Some("Service unavailable: connection refused")
    );
    assert!(!state.loading());
}

#[tokio::test]
async fn test_next_request_clears_error() {
    let (service, store) = teacher_store(three_teachers(), options(true));
    service.enqueue_failure(ServiceError::Unavailable("offline".into()));
    assert!(store.fetch_all().await.is_err());
    assert!(store.request().error.is_some());

    store.fetch_all().await.unwrap();
    assert_eq!(store.request().error, None);
}

#[tokio::test]
async fn test_loading_spans_overlapping_requests() {
    let (service, store) = teacher_store(three_teachers(), options(true));
    service.enqueue_latency(Duration::from_millis(60));
    service.enqueue_latency(Duration::from_millis(10));

    let mut rx = store.subscribe();
    let slow = store.clone();
    let fast = store.clone();
    let list = tokio::spawn(async move { slow.fetch_all().await });
    tokio::time::sleep(Duration::from_millis(5)).await;
    let select = tokio::spawn(async move { fast.fetch_one("201").await });

    select.await.unwrap().unwrap();
    // The list fetch is still outstanding.
    assert!(store.state().loading());
    assert_eq!(store.request().in_flight, 1);

    list.await.unwrap().unwrap();
    assert!(!store.state().loading());
    assert!(rx.has_changed().unwrap());
    assert!(!rx.borrow_and_update().loading());
}

#[tokio::test]
async fn test_filter_patch_keeps_unset_fields() {
    let (_service, store) = teacher_store(three_teachers(), options(true));
    store
        .fetch_all_with(TeacherFilter {
            status: Some(Choice::Only(TeacherStatus::Active)),
            ..Default::default()
        })
        .await
        .unwrap();

    let items = store
        .set_filter(TeacherFilter {
            search: Some("kumar".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let filter = store.filter();
    assert_eq!(filter.search.as_deref(), Some("kumar"));
    assert_eq!(filter.status, Some(Choice::Only(TeacherStatus::Active)));
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "202");
}

#[tokio::test]
async fn test_fetch_one_missing_id_selects_nothing() {
    let (_service, store) = teacher_store(three_teachers(), options(true));
    store.fetch_one("201").await.unwrap();
    assert!(store.selection().is_some());

    let found = store.fetch_one("999").await.unwrap();
    assert!(found.is_none());
    assert!(store.selection().is_none());
    assert_eq!(store.request().error, None);
}

#[tokio::test]
async fn test_fetch_one_failure_keeps_selection() {
    let (service, store) = teacher_store(three_teachers(), options(true));
    store.fetch_one("202").await.unwrap();

    service.enqueue_failure(ServiceError::Unavailable("offline".into()));
    assert!(store.fetch_one("203").await.is_err());

    assert_eq!(store.selection().unwrap().id, "202");
    assert!(store.request().error.is_some());
}

#[tokio::test]
async fn test_fetch_one_ignores_snapshot() {
    let (service, store) = teacher_store(three_teachers(), options(true));
    store.fetch_all().await.unwrap();
    let before = service.calls();

    store.fetch_one("201").await.unwrap();
    assert_eq!(service.calls(), before + 1);
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let opts = SyncOptions {
        retry: RetryPolicy {
            max_retries: 2,
            backoff_base: Duration::from_millis(5),
        },
        ..SyncOptions::default()
    };
    let (service, store) = teacher_store(three_teachers(), opts);
    service.enqueue_failure(ServiceError::Unavailable("blip".into()));

    let items = store.fetch_all().await.unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(service.calls(), 2);
    assert_eq!(store.request().error, None);
}

#[tokio::test]
async fn test_conflict_is_not_retried() {
    let opts = SyncOptions {
        retry: RetryPolicy {
            max_retries: 3,
            backoff_base: Duration::from_millis(5),
        },
        ..SyncOptions::default()
    };
    let (service, store) = teacher_store(three_teachers(), opts);
    service.enqueue_failure(ServiceError::Conflict("locked".into()));

    assert!(store.fetch_all().await.is_err());
    assert_eq!(service.calls(), 1);
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let opts = SyncOptions {
        request_timeout: Some(Duration::from_millis(30)),
        ..SyncOptions::default()
    };
    let (service, store) = teacher_store(three_teachers(), opts);
    service.enqueue_latency(Duration::from_millis(500));

    let err = store.fetch_all().await.unwrap_err();
    assert_eq!(err, SyncError::Service(ServiceError::Timeout { ms: 30 }));
    assert!(!store.state().loading());
    assert!(store.snapshot().is_empty());
}
