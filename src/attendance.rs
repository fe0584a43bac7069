//! Attendance metrics: distinct-day counts for a named sport.
//!
//! A "day attended" is a calendar date with at least one workout of that
//! sport, so three sessions on one date count once. Unknown sport names
//! degrade to a zero count rather than erroring.

use chrono::{Datelike, Duration, NaiveDate};

use crate::db::DbPool;
use crate::error::Error;
use crate::repository;

/// ---------------------------------------------------------------------------
/// Week Windows
/// ---------------------------------------------------------------------------

/// Monday of the week containing `today`, through `today`, inclusive
pub fn this_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
  let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
  (monday, today)
}

/// The Monday..Sunday immediately preceding the week containing `today`
pub fn last_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
  let (monday, _) = this_week(today);
  (monday - Duration::days(7), monday - Duration::days(1))
}

/// ---------------------------------------------------------------------------
/// Distinct-Day Counts
/// ---------------------------------------------------------------------------

/// Count distinct workout dates for `sport_name` (case-insensitive) within
/// the inclusive window; either bound may be open
pub async fn count_distinct_days(
  pool: &DbPool,
  sport_name: &str,
  date_from: Option<NaiveDate>,
  date_to: Option<NaiveDate>,
) -> Result<i64, Error> {
  let Some(sport) = repository::sport_by_name_ci(pool, sport_name).await? else {
    return Ok(0);
  };

  let count: i64 = sqlx::query_scalar(
    r#"
    SELECT COUNT(DISTINCT date)
    FROM workouts
    WHERE sport_id = ?1
      AND (?2 IS NULL OR date >= ?2)
      AND (?3 IS NULL OR date <= ?3)
    "#,
  )
  .bind(sport.id)
  .bind(date_from)
  .bind(date_to)
  .fetch_one(pool)
  .await?;

  Ok(count)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
