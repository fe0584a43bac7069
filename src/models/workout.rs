use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A logged workout. One row per session; several sessions may share a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Workout {
  pub id: i64,
  pub user_id: i64,
  pub date: NaiveDate,
  pub sport_id: i64,
  pub workout_category_id: i64,
  pub location_id: i64,
  /// Minutes, non-negative when present
  pub duration: Option<i64>,
}

/// One exercise entry within a workout.
///
/// Weight is a fixed-precision decimal (2 fractional digits). It is stored
/// as TEXT in sqlite, so rows are mapped by hand in the repository rather
/// than derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDetail {
  pub id: i64,
  pub workout_id: i64,
  pub exercise_id: i64,
  pub reps: Option<i64>,
  pub weight: Option<Decimal>,
  pub calories: Option<i64>,
  pub distance: Option<i64>,
  pub duration: Option<i64>,
  /// Display sequence within the workout; not guaranteed unique or contiguous
  pub order: Option<i64>,
}

/// For creating a workout (tag entities referenced by name)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkout {
  pub date: NaiveDate,
  pub sport_name: String,
  pub workout_category_name: String,
  pub location_name: String,
  pub duration: Option<i64>,
  #[serde(default)]
  pub details: Vec<NewWorkoutDetail>,
}

/// Detail payload for workout creation. Weight arrives as the caller's
/// string representation and is parsed into a decimal at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkoutDetail {
  pub exercise_name: String,
  pub reps: Option<i64>,
  pub weight: Option<String>,
  pub calories: Option<i64>,
  pub distance: Option<i64>,
  pub duration: Option<i64>,
  pub order: Option<i64>,
}

/// Partial update for a workout. Omitted scalar fields keep their value;
/// clearing date/sport/category/location to null is not supported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutUpdate {
  pub date: Option<NaiveDate>,
  pub sport_name: Option<String>,
  pub workout_category_name: Option<String>,
  pub location_name: Option<String>,
  pub duration: Option<i64>,
  /// When present, fully replaces the detail set: entries with an id update
  /// that detail, entries without create one, and existing details whose id
  /// is absent from the list are deleted.
  pub details: Option<Vec<WorkoutDetailInput>>,
}

/// Detail payload for workout updates; `id` selects an existing detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutDetailInput {
  pub id: Option<i64>,
  pub exercise_name: String,
  pub reps: Option<i64>,
  pub weight: Option<String>,
  pub calories: Option<i64>,
  pub distance: Option<i64>,
  pub duration: Option<i64>,
  pub order: Option<i64>,
}
