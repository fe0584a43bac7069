//! Performance metrics: best weight lifted at each rep count for an
//! exercise.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::Row;

use crate::db::DbPool;
use crate::error::Error;
use crate::repository;

/// Best weight achieved at one rep count. `reps: None` is the bucket for
/// detail rows logged without a rep count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepsMaxWeight {
  pub reps: Option<i64>,
  pub max_weight: Option<Decimal>,
}

/// Group detail rows by rep count and keep the maximum weight per group.
///
/// Rows without a weight do not contribute to a group's maximum; a group
/// whose rows all lack weights keeps `max_weight: None`. Buckets are ordered
/// ascending by reps, with the null-reps bucket always last.
pub fn max_weight_by_reps(rows: &[(Option<i64>, Option<Decimal>)]) -> Vec<RepsMaxWeight> {
  let mut best: HashMap<Option<i64>, Option<Decimal>> = HashMap::new();

  for (reps, weight) in rows {
    let entry = best.entry(*reps).or_insert(None);
    if let Some(w) = weight {
      *entry = Some(match *entry {
        Some(current) => current.max(*w),
        None => *w,
      });
    }
  }

  let mut buckets: Vec<RepsMaxWeight> = best
    .into_iter()
    .map(|(reps, max_weight)| RepsMaxWeight { reps, max_weight })
    .collect();
  buckets.sort_by_key(|b| (b.reps.is_none(), b.reps));
  buckets
}

/// Max weight per rep count for a named exercise (exact match).
/// Fails with `NotFound` when no exercise has that name.
pub async fn max_weight_per_reps(
  pool: &DbPool,
  exercise_name: &str,
) -> Result<Vec<RepsMaxWeight>, Error> {
  let exercise = repository::exercise_by_name(pool, exercise_name)
    .await?
    .ok_or_else(|| Error::not_found(format!("Exercise with name '{}' does not exist.", exercise_name)))?;

  let rows = sqlx::query("SELECT reps, weight FROM workout_details WHERE exercise_id = ?1")
    .bind(exercise.id)
    .fetch_all(pool)
    .await?;

  let mut pairs = Vec::with_capacity(rows.len());
  for row in &rows {
    let reps: Option<i64> = row.get("reps");
    let weight: Option<String> = row.get("weight");
    let weight = weight
      .map(|raw| {
        Decimal::from_str(&raw)
          .map_err(|_| Error::Internal(format!("Stored weight is not a valid decimal: {}", raw)))
      })
      .transpose()?;
    pairs.push((reps, weight));
  }

  Ok(max_weight_by_reps(&pairs))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
