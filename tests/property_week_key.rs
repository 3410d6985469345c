use chrono::{Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Weekday};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use uuid::Uuid;

use tallyboard::adapters::memory::InMemoryProgressStore;
use tallyboard::adapters::sqlite::{create_migrated_test_pool, SqliteGoalRepository};
use tallyboard::domain::models::{AtomicAttempt, Cap, ProgressKey, WeekKey};
use tallyboard::domain::ports::AtomicIncrement;
use tallyboard::services::ProgressService;

fn epoch_day(days: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap() + Duration::days(days)
}

proptest! {
    /// Property: every resolved week key is a Monday at most six days
    /// before the timestamp's local date.
    #[test]
    fn prop_week_key_is_preceding_monday(
        days in 0i64..40_000,
        seconds in 0i64..86_400,
        offset_minutes in -840i32..=840,
    ) {
        let offset = FixedOffset::east_opt(offset_minutes * 60).unwrap();
        let naive = epoch_day(days).and_hms_opt(0, 0, 0).unwrap() + Duration::seconds(seconds);
        let at = offset.from_utc_datetime(&naive);

        let monday = WeekKey::resolve(&at).monday();
        let local_date = at.date_naive();

        prop_assert_eq!(monday.weekday(), Weekday::Mon);
        prop_assert!(monday <= local_date);
        prop_assert!((local_date - monday).num_days() <= 6);
    }

    /// Property: the key string parses back to the same key.
    #[test]
    fn prop_week_key_parses_own_display(days in 0i64..40_000) {
        let key = WeekKey::containing(epoch_day(days));
        prop_assert_eq!(WeekKey::parse(&key.to_string()).unwrap(), key);
    }

    /// Property: dates in the same Monday-to-Sunday span share a key.
    #[test]
    fn prop_week_days_share_key(days in 0i64..40_000, shift in 0i64..7) {
        let monday = WeekKey::containing(epoch_day(days)).monday();
        prop_assert_eq!(
            WeekKey::containing(monday + Duration::days(shift)),
            WeekKey::containing(monday)
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: N atomic increments against cap C leave min(N, C).
    #[test]
    fn prop_atomic_increments_saturate(n in 0u32..25, cap in 1u32..10) {
        let store = InMemoryProgressStore::new();
        let key = ProgressKey::new(Uuid::new_v4(), Uuid::new_v4(), WeekKey::current());
        let cap = Cap::new(cap).unwrap();

        let mut last = 0;
        for _ in 0..n {
            match tokio_test::block_on(store.increment_atomic(&key, cap)).unwrap() {
                AtomicAttempt::Applied(count) => {
                    prop_assert!(count >= last);
                    last = count;
                }
                AtomicAttempt::Unavailable(reason) => {
                    return Err(TestCaseError::fail(format!("unexpected outage: {reason}")));
                }
            }
        }
        prop_assert_eq!(last, n.min(cap.get()));
    }

    /// Property: the fallback path saturates the same way.
    #[test]
    fn prop_fallback_increments_saturate(n in 1u32..15, cap in 1u32..8) {
        let count = tokio_test::block_on(async {
            let pool = create_migrated_test_pool().await.unwrap();
            let store = InMemoryProgressStore::new();
            store.set_atomic_installed(false);
            let service = ProgressService::new(
                std::sync::Arc::new(store),
                std::sync::Arc::new(SqliteGoalRepository::new(pool)),
            );
            let key = ProgressKey::new(Uuid::new_v4(), Uuid::new_v4(), WeekKey::current());
            let cap = Cap::new(cap).unwrap();

            let mut count = 0;
            for _ in 0..n {
                count = service.increment(key, cap).await.unwrap().count;
            }
            count
        });
        prop_assert_eq!(count, n.min(cap));
    }
}
