//! Named attendance counters. These are user-agnostic: they count distinct
//! training days per sport across the whole log.

use chrono::{NaiveDate, Utc};

use crate::attendance::{count_distinct_days, last_week, this_week};
use crate::db::AppState;
use crate::error::Error;

const CROSSFIT: &str = "CrossFit";
const SWIMMING: &str = "Swimming";

fn today() -> NaiveDate {
  Utc::now().date_naive()
}

/// Distinct days this week (Monday through today) with a sport logged
pub async fn attendance_count(state: &AppState, sport: &str) -> Result<i64, Error> {
  let (from, to) = this_week(today());
  count_distinct_days(&state.db, sport, Some(from), Some(to)).await
}

/// Distinct days in the previous Monday..Sunday week with a sport logged
pub async fn attendance_last_week_count(state: &AppState, sport: &str) -> Result<i64, Error> {
  let (from, to) = last_week(today());
  count_distinct_days(&state.db, sport, Some(from), Some(to)).await
}

/// Distinct days ever with a sport logged
pub async fn attendance_total_count(state: &AppState, sport: &str) -> Result<i64, Error> {
  count_distinct_days(&state.db, sport, None, None).await
}

pub async fn crossfit_attendance_count(state: &AppState) -> Result<i64, Error> {
  attendance_count(state, CROSSFIT).await
}

pub async fn crossfit_attendance_last_week_count(state: &AppState) -> Result<i64, Error> {
  attendance_last_week_count(state, CROSSFIT).await
}

pub async fn crossfit_attendance_total_count(state: &AppState) -> Result<i64, Error> {
  attendance_total_count(state, CROSSFIT).await
}

pub async fn swimming_attendance_count(state: &AppState) -> Result<i64, Error> {
  attendance_count(state, SWIMMING).await
}

pub async fn swimming_attendance_last_week_count(state: &AppState) -> Result<i64, Error> {
  attendance_last_week_count(state, SWIMMING).await
}

pub async fn swimming_attendance_total_count(state: &AppState) -> Result<i64, Error> {
  attendance_total_count(state, SWIMMING).await
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
