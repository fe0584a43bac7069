//! Workout mutation engine: create and update a workout together with its
//! ordered detail list.
//!
//! Every call runs inside a single transaction; a failure anywhere leaves
//! the store exactly as it was.

use std::collections::HashSet;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::db::DbPool;
use crate::error::Error;
use crate::models::{NewWorkout, Workout, WorkoutDetail, WorkoutUpdate};
use crate::repository;

/// ---------------------------------------------------------------------------
/// Input Validation
/// ---------------------------------------------------------------------------

/// Largest storable weight: 5 significant digits, 2 of them fractional
const MAX_WEIGHT: Decimal = Decimal::from_parts(99999, 0, 0, false, 2);

/// Parse a caller-supplied weight string into a 2-fractional-digit decimal
fn parse_weight(raw: Option<&str>) -> Result<Option<Decimal>, Error> {
  let Some(raw) = raw else { return Ok(None) };

  let weight = Decimal::from_str(raw)
    .map_err(|_| Error::validation(format!("Invalid weight value: {}", raw)))?
    .round_dp(2);
  if weight.abs() > MAX_WEIGHT {
    return Err(Error::validation(format!("Weight out of range: {}", raw)));
  }
  Ok(Some(weight))
}

fn require_non_negative(field: &str, value: Option<i64>) -> Result<(), Error> {
  match value {
    Some(v) if v < 0 => Err(Error::validation(format!("{} must be non-negative", field))),
    _ => Ok(()),
  }
}

fn validate_detail_numbers(
  reps: Option<i64>,
  calories: Option<i64>,
  distance: Option<i64>,
  duration: Option<i64>,
  order: Option<i64>,
) -> Result<(), Error> {
  require_non_negative("reps", reps)?;
  require_non_negative("calories", calories)?;
  require_non_negative("distance", distance)?;
  require_non_negative("duration", duration)?;
  require_non_negative("order", order)
}

/// ---------------------------------------------------------------------------
/// Create
/// ---------------------------------------------------------------------------

/// Create a workout owned by `user_id` together with its details, resolving
/// tag entities by name. All-or-nothing.
pub async fn create_workout(
  pool: &DbPool,
  user_id: i64,
  input: NewWorkout,
) -> Result<(Workout, Vec<WorkoutDetail>), Error> {
  let mut tx = pool.begin().await?;

  require_non_negative("duration", input.duration)?;
  let sport = repository::get_or_create_sport(&mut tx, &input.sport_name).await?;
  let location = repository::get_or_create_location(&mut tx, &input.location_name).await?;
  let category =
    repository::get_or_create_workout_category(&mut tx, &input.workout_category_name).await?;

  let workout = repository::insert_workout(
    &mut tx,
    user_id,
    input.date,
    sport.id,
    category.id,
    location.id,
    input.duration,
  )
  .await?;

  let mut details = Vec::with_capacity(input.details.len());
  for entry in &input.details {
    validate_detail_numbers(entry.reps, entry.calories, entry.distance, entry.duration, entry.order)?;
    let weight = parse_weight(entry.weight.as_deref())?;
    let exercise = repository::get_or_create_exercise(&mut tx, &entry.exercise_name).await?;

    let detail = repository::insert_detail(
      &mut tx,
      &WorkoutDetail {
        id: 0,
        workout_id: workout.id,
        exercise_id: exercise.id,
        reps: entry.reps,
        weight,
        calories: entry.calories,
        distance: entry.distance,
        duration: entry.duration,
        order: entry.order,
      },
    )
    .await?;
    details.push(detail);
  }

  tx.commit().await?;
  log::debug!("Created workout {} with {} details for user {}", workout.id, details.len(), user_id);

  Ok((workout, details))
}

/// ---------------------------------------------------------------------------
/// Update
/// ---------------------------------------------------------------------------

/// Update a workout's scalar fields and replace its detail set.
///
/// Scalars follow partial-update semantics. The detail list is
/// authoritative: entries with an id update that detail, entries without an
/// id create one, and any existing detail absent from the list is deleted
/// (an absent list behaves like an empty one). The acting user's ownership
/// of the workout is not re-checked here.
pub async fn update_workout(
  pool: &DbPool,
  workout_id: i64,
  patch: WorkoutUpdate,
) -> Result<(Workout, Vec<WorkoutDetail>), Error> {
  let mut tx = pool.begin().await?;

  let mut workout = match repository::workout_by_id(&mut tx, workout_id).await {
    Err(Error::NotFound(_)) => return Err(Error::not_found("Workout not found")),
    other => other?,
  };

  if let Some(date) = patch.date {
    workout.date = date;
  }
  if patch.duration.is_some() {
    require_non_negative("duration", patch.duration)?;
    workout.duration = patch.duration;
  }
  if let Some(name) = &patch.sport_name {
    workout.sport_id = repository::get_or_create_sport(&mut tx, name).await?.id;
  }
  if let Some(name) = &patch.workout_category_name {
    workout.workout_category_id =
      repository::get_or_create_workout_category(&mut tx, name).await?.id;
  }
  if let Some(name) = &patch.location_name {
    workout.location_id = repository::get_or_create_location(&mut tx, name).await?.id;
  }
  repository::save_workout(&mut tx, &workout).await?;

  let existing_ids: HashSet<i64> = repository::details_for_workout(&mut tx, workout_id)
    .await?
    .iter()
    .map(|d| d.id)
    .collect();
  let mut input_ids: HashSet<i64> = HashSet::new();

  let mut details = Vec::new();
  for entry in patch.details.iter().flatten() {
    validate_detail_numbers(entry.reps, entry.calories, entry.distance, entry.duration, entry.order)?;
    let weight = parse_weight(entry.weight.as_deref())?;
    let exercise = repository::get_or_create_exercise(&mut tx, &entry.exercise_name).await?;

    let detail = match entry.id {
      Some(id) => {
        if repository::detail_of_workout(&mut tx, workout_id, id).await?.is_none() {
          return Err(Error::not_found("Workout detail not found"));
        }
        input_ids.insert(id);
        let updated = WorkoutDetail {
          id,
          workout_id,
          exercise_id: exercise.id,
          reps: entry.reps,
          weight,
          calories: entry.calories,
          distance: entry.distance,
          duration: entry.duration,
          order: entry.order,
        };
        repository::save_detail(&mut tx, &updated).await?;
        updated
      }
      None => {
        repository::insert_detail(
          &mut tx,
          &WorkoutDetail {
            id: 0,
            workout_id,
            exercise_id: exercise.id,
            reps: entry.reps,
            weight,
            calories: entry.calories,
            distance: entry.distance,
            duration: entry.duration,
            order: entry.order,
          },
        )
        .await?
      }
    };
    details.push(detail);
  }

  // Prune every pre-existing detail the caller's list no longer names
  let mut pruned = 0;
  for id in existing_ids.difference(&input_ids) {
    repository::delete_detail(&mut tx, *id).await?;
    pruned += 1;
  }

  tx.commit().await?;
  log::debug!("Updated workout {} ({} details kept or added, {} pruned)", workout_id, details.len(), pruned);

  Ok((workout, details))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
