//! Catalog queries and mutations over the simple entities. These are plain
//! record access with no aggregation; get-by-id failures carry the
//! offending id in the message.

use crate::db::AppState;
use crate::error::Error;
use crate::models::{Exercise, Location, Sport, Workout, WorkoutCategory, WorkoutDetail};
use crate::repository;

/// ---------------------------------------------------------------------------
/// Queries
/// ---------------------------------------------------------------------------

pub async fn all_locations(state: &AppState) -> Result<Vec<Location>, Error> {
  repository::all_locations(&state.db).await
}

pub async fn all_sports(state: &AppState) -> Result<Vec<Sport>, Error> {
  repository::all_sports(&state.db).await
}

pub async fn all_workout_categories(state: &AppState) -> Result<Vec<WorkoutCategory>, Error> {
  repository::all_workout_categories(&state.db).await
}

pub async fn all_exercises(state: &AppState) -> Result<Vec<Exercise>, Error> {
  repository::all_exercises(&state.db).await
}

pub async fn all_workout_details(state: &AppState) -> Result<Vec<WorkoutDetail>, Error> {
  repository::all_workout_details(&state.db).await
}

pub async fn location(state: &AppState, id: i64) -> Result<Location, Error> {
  repository::location_by_id(&state.db, id).await
}

pub async fn sport(state: &AppState, id: i64) -> Result<Sport, Error> {
  repository::sport_by_id(&state.db, id).await
}

pub async fn workout_category(state: &AppState, id: i64) -> Result<WorkoutCategory, Error> {
  repository::workout_category_by_id(&state.db, id).await
}

pub async fn exercise(state: &AppState, id: i64) -> Result<Exercise, Error> {
  repository::exercise_by_id(&state.db, id).await
}

/// A single workout plus its details in insertion order
pub async fn workout(state: &AppState, id: i64) -> Result<(Workout, Vec<WorkoutDetail>), Error> {
  let mut conn = state.db.acquire().await?;
  let workout = repository::workout_by_id(&mut conn, id).await?;
  let details = repository::details_for_workout(&mut conn, id).await?;
  Ok((workout, details))
}

pub async fn workout_detail(state: &AppState, id: i64) -> Result<WorkoutDetail, Error> {
  repository::detail_by_id(&state.db, id).await
}

/// ---------------------------------------------------------------------------
/// Mutations (lazy get-or-create semantics)
/// ---------------------------------------------------------------------------

pub async fn create_location(state: &AppState, name: &str) -> Result<Location, Error> {
  let mut conn = state.db.acquire().await?;
  repository::get_or_create_location(&mut conn, name).await
}

pub async fn create_sport(state: &AppState, name: &str) -> Result<Sport, Error> {
  let mut conn = state.db.acquire().await?;
  repository::get_or_create_sport(&mut conn, name).await
}

pub async fn create_workout_category(state: &AppState, name: &str) -> Result<WorkoutCategory, Error> {
  let mut conn = state.db.acquire().await?;
  repository::get_or_create_workout_category(&mut conn, name).await
}

pub async fn create_exercise(
  state: &AppState,
  name: &str,
  description: Option<&str>,
) -> Result<Exercise, Error> {
  let mut conn = state.db.acquire().await?;
  repository::create_exercise(&mut conn, name, description.unwrap_or_default()).await
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
