//! Increment behaviour against a real SQLite database.

mod common;

use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use std::sync::Arc;
use uuid::Uuid;

use tallyboard::adapters::sqlite::{SqliteGoalRepository, SqliteProgressRepository};
use tallyboard::domain::models::{Cap, IncrementPath, ProgressKey, WeekKey};
use tallyboard::domain::ports::ProgressRepository;
use tallyboard::services::ProgressService;

fn week() -> WeekKey {
    WeekKey::containing(NaiveDate::from_ymd_opt(2024, 9, 18).unwrap())
}

#[tokio::test]
async fn test_concurrent_atomic_increments_are_linearized() {
    common::setup_test_logging();
    let (_dir, pool) = common::file_pool(5).await;
    let store = Arc::new(SqliteProgressRepository::new(pool.clone()));
    let service = Arc::new(ProgressService::new(
        store.clone(),
        Arc::new(SqliteGoalRepository::new(pool)),
    ));
    let key = ProgressKey::new(Uuid::new_v4(), Uuid::new_v4(), week());

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.increment(key, Cap::UNBOUNDED).await })
        })
        .collect();

    let mut counts = Vec::new();
    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        assert_eq!(outcome.path, IncrementPath::Atomic);
        counts.push(outcome.count);
    }
    counts.sort_unstable();

    assert_eq!(counts, (1..=20).collect::<Vec<u32>>());
    assert_eq!(store.find_by_key(&key).await.unwrap().unwrap().completed_count, 20);
}

#[tokio::test]
async fn test_concurrent_increments_never_exceed_cap() {
    let (_dir, pool) = common::file_pool(5).await;
    let store = Arc::new(SqliteProgressRepository::new(pool.clone()));
    let service = Arc::new(ProgressService::new(
        store.clone(),
        Arc::new(SqliteGoalRepository::new(pool)),
    ));
    let key = ProgressKey::new(Uuid::new_v4(), Uuid::new_v4(), week());
    let cap = Cap::new(3).unwrap();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.increment(key, cap).await })
        })
        .collect();

    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        assert!(outcome.count <= 3);
    }
    assert_eq!(store.find_by_key(&key).await.unwrap().unwrap().completed_count, 3);
}

#[tokio::test]
async fn test_goal_target_saturates_through_request() {
    let goals = common::goal_repo().await;
    let subject = Uuid::new_v4();
    let goal = common::create_goal(&goals, subject, 3).await;
    let (_dir, pool) = common::file_pool(2).await;
    let service = ProgressService::new(Arc::new(SqliteProgressRepository::new(pool)), goals);

    let at = Utc.with_ymd_and_hms(2024, 9, 18, 12, 0, 0).unwrap();
    let mut counts = Vec::new();
    for _ in 0..4 {
        counts.push(service.request_increment(goal.id, subject, &at).await.unwrap().count);
    }
    assert_eq!(counts, vec![1, 2, 3, 3]);
}

#[tokio::test]
async fn test_duplicate_request_counts_twice() {
    let goals = common::goal_repo().await;
    let subject = Uuid::new_v4();
    let goal = common::create_goal(&goals, subject, 5).await;
    let (_dir, pool) = common::file_pool(2).await;
    let service = ProgressService::new(Arc::new(SqliteProgressRepository::new(pool)), goals);

    let at = Utc::now();
    service.request_increment(goal.id, subject, &at).await.unwrap();
    let second = service.request_increment(goal.id, subject, &at).await.unwrap();
    assert_eq!(second.count, 2);
}

#[tokio::test]
async fn test_disabled_procedure_uses_fallback_end_to_end() {
    let goals = common::goal_repo().await;
    let subject = Uuid::new_v4();
    let goal = common::create_goal(&goals, subject, 2).await;
    let (_dir, pool) = common::file_pool(2).await;
    let store = SqliteProgressRepository::new(pool).with_atomic_procedure(false);
    let service = ProgressService::new(Arc::new(store), goals);

    let at = Utc::now();
    let outcomes = vec![
        service.request_increment(goal.id, subject, &at).await.unwrap(),
        service.request_increment(goal.id, subject, &at).await.unwrap(),
        service.request_increment(goal.id, subject, &at).await.unwrap(),
    ];

    assert!(outcomes.iter().all(|o| o.path == IncrementPath::Fallback));
    assert_eq!(outcomes.iter().map(|o| o.count).collect::<Vec<_>>(), vec![1, 2, 2]);
}

#[tokio::test]
async fn test_week_key_follows_timestamp_offset() {
    let goals = common::goal_repo().await;
    let subject = Uuid::new_v4();
    let goal = common::create_goal(&goals, subject, 5).await;
    let (_dir, pool) = common::file_pool(2).await;
    let service = ProgressService::new(Arc::new(SqliteProgressRepository::new(pool)), goals);

    // Monday 01:00 at UTC+2 is still Sunday in UTC.
    let east = FixedOffset::east_opt(2 * 3600).unwrap();
    let local_monday = east.with_ymd_and_hms(2024, 9, 16, 1, 0, 0).unwrap();
    let outcome = service.request_increment(goal.id, subject, &local_monday).await.unwrap();

    assert_eq!(outcome.key.week.to_string(), "2024-09-16");
    assert_eq!(
        WeekKey::resolve(&local_monday.with_timezone(&Utc)).to_string(),
        "2024-09-09"
    );
}
