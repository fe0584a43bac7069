//! Protected workout operations: the caller's `Authorization` header is
//! authenticated once, then everything runs on behalf of that user.

use crate::auth;
use crate::db::AppState;
use crate::error::Error;
use crate::grouping::{paginate_by_date, WorkoutPage};
use crate::models::{NewWorkout, Workout, WorkoutDetail, WorkoutUpdate};
use crate::mutations;
use crate::repository;

/// A user's full workout history as date-groups, newest first, paginated
/// over groups
pub async fn all_workouts(
  state: &AppState,
  auth_header: Option<&str>,
  limit: Option<u32>,
  offset: Option<u32>,
) -> Result<WorkoutPage, Error> {
  let user = auth::authenticate(&state.db, &state.auth, auth_header).await?;
  let workouts = repository::workouts_for_user(&state.db, user.id).await?;
  Ok(paginate_by_date(workouts, limit, offset))
}

/// Create a workout owned by the authenticated user
pub async fn create_workout(
  state: &AppState,
  auth_header: Option<&str>,
  input: NewWorkout,
) -> Result<(Workout, Vec<WorkoutDetail>), Error> {
  let user = auth::authenticate(&state.db, &state.auth, auth_header).await?;
  mutations::create_workout(&state.db, user.id, input).await
}

/// Update a workout and replace its detail set.
///
/// Authentication is the only gate here; the workout's owner is not compared
/// against the acting user.
pub async fn update_workout(
  state: &AppState,
  auth_header: Option<&str>,
  workout_id: i64,
  patch: WorkoutUpdate,
) -> Result<(Workout, Vec<WorkoutDetail>), Error> {
  auth::authenticate(&state.db, &state.auth, auth_header).await?;
  mutations::update_workout(&state.db, workout_id, patch).await
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
