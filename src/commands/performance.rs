//! Performance query surface.

use crate::db::AppState;
use crate::error::Error;
use crate::performance::{self, RepsMaxWeight};

/// Best weight at each rep count for a named exercise (exact match)
pub async fn max_weight_per_reps(
  state: &AppState,
  exercise_name: &str,
) -> Result<Vec<RepsMaxWeight>, Error> {
  performance::max_weight_per_reps(&state.db, exercise_name).await
}
