//! Entity access layer: CRUD and lookup-or-create over the persistent store.
//!
//! Functions that participate in mutation transactions take a
//! `&mut SqliteConnection`, so the same code runs against a pool connection
//! or inside an open transaction.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::db::DbPool;
use crate::error::Error;
use crate::models::{Exercise, Location, Sport, User, Workout, WorkoutCategory, WorkoutDetail};

/// ---------------------------------------------------------------------------
/// Tag Entities (get-or-create by name)
/// ---------------------------------------------------------------------------

/// Insert-if-absent, then read back. The unique constraint on `name` makes
/// this safe under concurrent callers racing on the same name.
async fn get_or_create_named(
  conn: &mut SqliteConnection,
  table: &str,
  name: &str,
) -> Result<(i64, String), Error> {
  let insert = format!("INSERT INTO {} (name) VALUES (?1) ON CONFLICT(name) DO NOTHING", table);
  sqlx::query(&insert).bind(name).execute(&mut *conn).await?;

  let select = format!("SELECT id, name FROM {} WHERE name = ?1", table);
  let row = sqlx::query(&select).bind(name).fetch_one(&mut *conn).await?;
  Ok((row.get("id"), row.get("name")))
}

pub async fn get_or_create_sport(conn: &mut SqliteConnection, name: &str) -> Result<Sport, Error> {
  let (id, name) = get_or_create_named(conn, "sports", name).await?;
  Ok(Sport { id, name })
}

pub async fn get_or_create_location(
  conn: &mut SqliteConnection,
  name: &str,
) -> Result<Location, Error> {
  let (id, name) = get_or_create_named(conn, "locations", name).await?;
  Ok(Location { id, name })
}

pub async fn get_or_create_workout_category(
  conn: &mut SqliteConnection,
  name: &str,
) -> Result<WorkoutCategory, Error> {
  let (id, name) = get_or_create_named(conn, "workout_categories", name).await?;
  Ok(WorkoutCategory { id, name })
}

pub async fn get_or_create_exercise(
  conn: &mut SqliteConnection,
  name: &str,
) -> Result<Exercise, Error> {
  sqlx::query("INSERT INTO exercises (name) VALUES (?1) ON CONFLICT(name) DO NOTHING")
    .bind(name)
    .execute(&mut *conn)
    .await?;

  sqlx::query_as::<_, Exercise>("SELECT id, name, description FROM exercises WHERE name = ?1")
    .bind(name)
    .fetch_one(&mut *conn)
    .await
    .map_err(Error::from)
}

/// Create an exercise with an explicit description, or return the existing
/// one untouched (descriptions are not overwritten on conflict)
pub async fn create_exercise(
  conn: &mut SqliteConnection,
  name: &str,
  description: &str,
) -> Result<Exercise, Error> {
  sqlx::query("INSERT INTO exercises (name, description) VALUES (?1, ?2) ON CONFLICT(name) DO NOTHING")
    .bind(name)
    .bind(description)
    .execute(&mut *conn)
    .await?;

  sqlx::query_as::<_, Exercise>("SELECT id, name, description FROM exercises WHERE name = ?1")
    .bind(name)
    .fetch_one(&mut *conn)
    .await
    .map_err(Error::from)
}

/// ---------------------------------------------------------------------------
/// Tag Entity Queries
/// ---------------------------------------------------------------------------

pub async fn all_sports(pool: &DbPool) -> Result<Vec<Sport>, Error> {
  sqlx::query_as("SELECT id, name FROM sports ORDER BY id")
    .fetch_all(pool)
    .await
    .map_err(Error::from)
}

pub async fn all_locations(pool: &DbPool) -> Result<Vec<Location>, Error> {
  sqlx::query_as("SELECT id, name FROM locations ORDER BY id")
    .fetch_all(pool)
    .await
    .map_err(Error::from)
}

pub async fn all_workout_categories(pool: &DbPool) -> Result<Vec<WorkoutCategory>, Error> {
  sqlx::query_as("SELECT id, name FROM workout_categories ORDER BY id")
    .fetch_all(pool)
    .await
    .map_err(Error::from)
}

pub async fn all_exercises(pool: &DbPool) -> Result<Vec<Exercise>, Error> {
  sqlx::query_as("SELECT id, name, description FROM exercises ORDER BY id")
    .fetch_all(pool)
    .await
    .map_err(Error::from)
}

pub async fn sport_by_id(pool: &DbPool, id: i64) -> Result<Sport, Error> {
  sqlx::query_as::<_, Sport>("SELECT id, name FROM sports WHERE id = ?1")
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::not_found(format!("Sport with ID {} does not exist.", id)))
}

pub async fn location_by_id(pool: &DbPool, id: i64) -> Result<Location, Error> {
  sqlx::query_as::<_, Location>("SELECT id, name FROM locations WHERE id = ?1")
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::not_found(format!("Location with ID {} does not exist.", id)))
}

pub async fn workout_category_by_id(pool: &DbPool, id: i64) -> Result<WorkoutCategory, Error> {
  sqlx::query_as::<_, WorkoutCategory>("SELECT id, name FROM workout_categories WHERE id = ?1")
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::not_found(format!("Workout category with ID {} does not exist.", id)))
}

pub async fn exercise_by_id(pool: &DbPool, id: i64) -> Result<Exercise, Error> {
  sqlx::query_as::<_, Exercise>("SELECT id, name, description FROM exercises WHERE id = ?1")
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::not_found(format!("Exercise with ID {} does not exist.", id)))
}

/// Sport lookup for attendance queries: case-insensitive, absence is not an
/// error (callers degrade to a zero count)
pub async fn sport_by_name_ci(pool: &DbPool, name: &str) -> Result<Option<Sport>, Error> {
  sqlx::query_as::<_, Sport>("SELECT id, name FROM sports WHERE name = ?1 COLLATE NOCASE")
    .bind(name)
    .fetch_optional(pool)
    .await
    .map_err(Error::from)
}

/// Exact-name exercise lookup for performance queries
pub async fn exercise_by_name(pool: &DbPool, name: &str) -> Result<Option<Exercise>, Error> {
  sqlx::query_as::<_, Exercise>("SELECT id, name, description FROM exercises WHERE name = ?1")
    .bind(name)
    .fetch_optional(pool)
    .await
    .map_err(Error::from)
}

/// ---------------------------------------------------------------------------
/// Users
/// ---------------------------------------------------------------------------

pub async fn user_by_username(pool: &DbPool, username: &str) -> Result<Option<User>, Error> {
  sqlx::query_as::<_, User>(
    "SELECT id, username, email, password_hash, created_at FROM users WHERE username = ?1",
  )
  .bind(username)
  .fetch_optional(pool)
  .await
  .map_err(Error::from)
}

pub async fn username_taken(pool: &DbPool, username: &str) -> Result<bool, Error> {
  let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?1")
    .bind(username)
    .fetch_one(pool)
    .await?;
  Ok(count > 0)
}

pub async fn email_taken(pool: &DbPool, email: &str) -> Result<bool, Error> {
  let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?1")
    .bind(email)
    .fetch_one(pool)
    .await?;
  Ok(count > 0)
}

pub async fn insert_user(
  pool: &DbPool,
  username: &str,
  email: &str,
  password_hash: &str,
) -> Result<User, Error> {
  sqlx::query("INSERT INTO users (username, email, password_hash) VALUES (?1, ?2, ?3)")
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .execute(pool)
    .await?;

  user_by_username(pool, username)
    .await?
    .ok_or_else(|| Error::Internal("User vanished after insert".to_string()))
}

/// ---------------------------------------------------------------------------
/// Workouts
/// ---------------------------------------------------------------------------

const WORKOUT_COLUMNS: &str = "id, user_id, date, sport_id, workout_category_id, location_id, duration";

/// All workouts owned by a user, newest date first. Rows sharing a date keep
/// insertion order, which the grouping engine relies on.
pub async fn workouts_for_user(pool: &DbPool, user_id: i64) -> Result<Vec<Workout>, Error> {
  sqlx::query_as(&format!(
    "SELECT {} FROM workouts WHERE user_id = ?1 ORDER BY date DESC, id ASC",
    WORKOUT_COLUMNS
  ))
  .bind(user_id)
  .fetch_all(pool)
  .await
  .map_err(Error::from)
}

pub async fn workout_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Workout, Error> {
  sqlx::query_as::<_, Workout>(&format!("SELECT {} FROM workouts WHERE id = ?1", WORKOUT_COLUMNS))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| Error::not_found(format!("Workout with ID {} does not exist.", id)))
}

pub async fn insert_workout(
  conn: &mut SqliteConnection,
  user_id: i64,
  date: NaiveDate,
  sport_id: i64,
  workout_category_id: i64,
  location_id: i64,
  duration: Option<i64>,
) -> Result<Workout, Error> {
  let result = sqlx::query(
    r#"
    INSERT INTO workouts (user_id, date, sport_id, workout_category_id, location_id, duration)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    "#,
  )
  .bind(user_id)
  .bind(date)
  .bind(sport_id)
  .bind(workout_category_id)
  .bind(location_id)
  .bind(duration)
  .execute(&mut *conn)
  .await?;

  Ok(Workout {
    id: result.last_insert_rowid(),
    user_id,
    date,
    sport_id,
    workout_category_id,
    location_id,
    duration,
  })
}

/// Write every mutable column of a workout back to its row
pub async fn save_workout(conn: &mut SqliteConnection, workout: &Workout) -> Result<(), Error> {
  sqlx::query(
    r#"
    UPDATE workouts
    SET date = ?1,
        sport_id = ?2,
        workout_category_id = ?3,
        location_id = ?4,
        duration = ?5
    WHERE id = ?6
    "#,
  )
  .bind(workout.date)
  .bind(workout.sport_id)
  .bind(workout.workout_category_id)
  .bind(workout.location_id)
  .bind(workout.duration)
  .bind(workout.id)
  .execute(&mut *conn)
  .await?;

  Ok(())
}

pub async fn delete_workout(pool: &DbPool, id: i64) -> Result<(), Error> {
  sqlx::query("DELETE FROM workouts WHERE id = ?1")
    .bind(id)
    .execute(pool)
    .await?;
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Workout Details
/// ---------------------------------------------------------------------------

const DETAIL_COLUMNS: &str =
  r#"id, workout_id, exercise_id, reps, weight, calories, distance, duration, "order""#;

/// Weight lives in a TEXT column; sqlite has no decimal type, so rows are
/// mapped by hand instead of deriving FromRow.
fn detail_from_row(row: &SqliteRow) -> Result<WorkoutDetail, Error> {
  let weight: Option<String> = row.get("weight");
  let weight = weight
    .map(|raw| {
      Decimal::from_str(&raw)
        .map_err(|_| Error::Internal(format!("Stored weight is not a valid decimal: {}", raw)))
    })
    .transpose()?;

  Ok(WorkoutDetail {
    id: row.get("id"),
    workout_id: row.get("workout_id"),
    exercise_id: row.get("exercise_id"),
    reps: row.get("reps"),
    weight,
    calories: row.get("calories"),
    distance: row.get("distance"),
    duration: row.get("duration"),
    order: row.get("order"),
  })
}

/// Details of one workout in insertion order
pub async fn details_for_workout(
  conn: &mut SqliteConnection,
  workout_id: i64,
) -> Result<Vec<WorkoutDetail>, Error> {
  let rows = sqlx::query(&format!(
    "SELECT {} FROM workout_details WHERE workout_id = ?1 ORDER BY id ASC",
    DETAIL_COLUMNS
  ))
  .bind(workout_id)
  .fetch_all(&mut *conn)
  .await?;

  rows.iter().map(detail_from_row).collect()
}

pub async fn all_workout_details(pool: &DbPool) -> Result<Vec<WorkoutDetail>, Error> {
  let mut conn = pool.acquire().await?;
  let rows = sqlx::query(&format!("SELECT {} FROM workout_details ORDER BY id ASC", DETAIL_COLUMNS))
    .fetch_all(&mut *conn)
    .await?;

  rows.iter().map(detail_from_row).collect()
}

pub async fn detail_by_id(pool: &DbPool, id: i64) -> Result<WorkoutDetail, Error> {
  let mut conn = pool.acquire().await?;
  let row = sqlx::query(&format!("SELECT {} FROM workout_details WHERE id = ?1", DETAIL_COLUMNS))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

  match row {
    Some(row) => detail_from_row(&row),
    None => Err(Error::not_found(format!("Workout detail with ID {} does not exist.", id))),
  }
}

/// A detail row only if it belongs to the given workout
pub async fn detail_of_workout(
  conn: &mut SqliteConnection,
  workout_id: i64,
  detail_id: i64,
) -> Result<Option<WorkoutDetail>, Error> {
  let row = sqlx::query(&format!(
    "SELECT {} FROM workout_details WHERE id = ?1 AND workout_id = ?2",
    DETAIL_COLUMNS
  ))
  .bind(detail_id)
  .bind(workout_id)
  .fetch_optional(&mut *conn)
  .await?;

  row.as_ref().map(detail_from_row).transpose()
}

/// Insert a detail row; `detail.id` is ignored and the assigned id returned
pub async fn insert_detail(
  conn: &mut SqliteConnection,
  detail: &WorkoutDetail,
) -> Result<WorkoutDetail, Error> {
  let result = sqlx::query(
    r#"
    INSERT INTO workout_details
      (workout_id, exercise_id, reps, weight, calories, distance, duration, "order")
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    "#,
  )
  .bind(detail.workout_id)
  .bind(detail.exercise_id)
  .bind(detail.reps)
  .bind(detail.weight.map(|w| w.to_string()))
  .bind(detail.calories)
  .bind(detail.distance)
  .bind(detail.duration)
  .bind(detail.order)
  .execute(&mut *conn)
  .await?;

  Ok(WorkoutDetail {
    id: result.last_insert_rowid(),
    ..detail.clone()
  })
}

/// Write every mutable column of a detail back to its row
pub async fn save_detail(conn: &mut SqliteConnection, detail: &WorkoutDetail) -> Result<(), Error> {
  sqlx::query(
    r#"
    UPDATE workout_details
    SET exercise_id = ?1,
        reps = ?2,
        weight = ?3,
        calories = ?4,
        distance = ?5,
        duration = ?6,
        "order" = ?7
    WHERE id = ?8
    "#,
  )
  .bind(detail.exercise_id)
  .bind(detail.reps)
  .bind(detail.weight.map(|w| w.to_string()))
  .bind(detail.calories)
  .bind(detail.distance)
  .bind(detail.duration)
  .bind(detail.order)
  .bind(detail.id)
  .execute(&mut *conn)
  .await?;

  Ok(())
}

pub async fn delete_detail(conn: &mut SqliteConnection, id: i64) -> Result<(), Error> {
  sqlx::query("DELETE FROM workout_details WHERE id = ?1")
    .bind(id)
    .execute(&mut *conn)
    .await?;
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{seed_test_user, seed_test_workout, setup_test_db, teardown_test_db};
  use rust_decimal::Decimal;

  #[tokio::test]
  async fn test_get_or_create_is_idempotent() {
    let pool = setup_test_db().await;
    let mut conn = pool.acquire().await.unwrap();

    let first = get_or_create_sport(&mut conn, "CrossFit").await.unwrap();
    let second = get_or_create_sport(&mut conn, "CrossFit").await.unwrap();
    assert_eq!(first.id, second.id);
    drop(conn);

    let sports = all_sports(&pool).await.unwrap();
    assert_eq!(sports.len(), 1);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_get_or_create_names_are_case_sensitive() {
    let pool = setup_test_db().await;
    let mut conn = pool.acquire().await.unwrap();

    let upper = get_or_create_sport(&mut conn, "CrossFit").await.unwrap();
    let lower = get_or_create_sport(&mut conn, "crossfit").await.unwrap();
    assert_ne!(upper.id, lower.id);

    drop(conn);
    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_create_exercise_keeps_existing_description() {
    let pool = setup_test_db().await;
    let mut conn = pool.acquire().await.unwrap();

    let first = create_exercise(&mut conn, "Bench Press", "Barbell press on flat bench").await.unwrap();
    let second = create_exercise(&mut conn, "Bench Press", "Something else").await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.description, "Barbell press on flat bench");

    drop(conn);
    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_sport_by_id_not_found_message() {
    let pool = setup_test_db().await;

    let err = sport_by_id(&pool, 42).await.unwrap_err();
    assert_eq!(err.to_string(), "Sport with ID 42 does not exist.");

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_sport_lookup_is_case_insensitive() {
    let pool = setup_test_db().await;
    let mut conn = pool.acquire().await.unwrap();
    get_or_create_sport(&mut conn, "CrossFit").await.unwrap();
    drop(conn);

    let found = sport_by_name_ci(&pool, "crossfit").await.unwrap();
    assert!(found.is_some());
    assert_eq!(found.unwrap().name, "CrossFit");

    let missing = sport_by_name_ci(&pool, "Rowing").await.unwrap();
    assert!(missing.is_none());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_workouts_for_user_ordering() {
    let pool = setup_test_db().await;
    let user = seed_test_user(&pool, "annika").await;

    let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let d3 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
    let first_on_d3 = seed_test_workout(&pool, user.id, d3, "CrossFit").await;
    let on_d1 = seed_test_workout(&pool, user.id, d1, "CrossFit").await;
    let second_on_d3 = seed_test_workout(&pool, user.id, d3, "Swimming").await;

    let workouts = workouts_for_user(&pool, user.id).await.unwrap();
    let ids: Vec<i64> = workouts.iter().map(|w| w.id).collect();
    // Newest date first; same-date rows keep insertion order
    assert_eq!(ids, vec![first_on_d3.id, second_on_d3.id, on_d1.id]);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_detail_weight_roundtrip() {
    let pool = setup_test_db().await;
    let user = seed_test_user(&pool, "annika").await;
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let workout = seed_test_workout(&pool, user.id, date, "CrossFit").await;

    let mut conn = pool.acquire().await.unwrap();
    let exercise = get_or_create_exercise(&mut conn, "Back Squat").await.unwrap();
    let inserted = insert_detail(
      &mut conn,
      &WorkoutDetail {
        id: 0,
        workout_id: workout.id,
        exercise_id: exercise.id,
        reps: Some(5),
        weight: Some(Decimal::new(10250, 2)), // 102.50
        calories: None,
        distance: None,
        duration: None,
        order: Some(1),
      },
    )
    .await
    .unwrap();

    let details = details_for_workout(&mut conn, workout.id).await.unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].id, inserted.id);
    assert_eq!(details[0].weight, Some(Decimal::new(10250, 2)));
    assert_eq!(details[0].reps, Some(5));

    drop(conn);
    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_deleting_workout_cascades_to_details() {
    let pool = setup_test_db().await;
    let user = seed_test_user(&pool, "annika").await;
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let workout = seed_test_workout(&pool, user.id, date, "CrossFit").await;

    let mut conn = pool.acquire().await.unwrap();
    let exercise = get_or_create_exercise(&mut conn, "Deadlift").await.unwrap();
    insert_detail(
      &mut conn,
      &WorkoutDetail {
        id: 0,
        workout_id: workout.id,
        exercise_id: exercise.id,
        reps: Some(3),
        weight: None,
        calories: None,
        distance: None,
        duration: None,
        order: None,
      },
    )
    .await
    .unwrap();
    drop(conn);

    delete_workout(&pool, workout.id).await.unwrap();

    let remaining = all_workout_details(&pool).await.unwrap();
    assert!(remaining.is_empty());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_detail_of_workout_rejects_foreign_detail() {
    let pool = setup_test_db().await;
    let user = seed_test_user(&pool, "annika").await;
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mine = seed_test_workout(&pool, user.id, date, "CrossFit").await;
    let other = seed_test_workout(&pool, user.id, date, "Swimming").await;

    let mut conn = pool.acquire().await.unwrap();
    let exercise = get_or_create_exercise(&mut conn, "Pull Up").await.unwrap();
    let detail = insert_detail(
      &mut conn,
      &WorkoutDetail {
        id: 0,
        workout_id: other.id,
        exercise_id: exercise.id,
        reps: Some(10),
        weight: None,
        calories: None,
        distance: None,
        duration: None,
        order: None,
      },
    )
    .await
    .unwrap();

    let found = detail_of_workout(&mut conn, mine.id, detail.id).await.unwrap();
    assert!(found.is_none());
    let found = detail_of_workout(&mut conn, other.id, detail.id).await.unwrap();
    assert!(found.is_some());

    drop(conn);
    teardown_test_db(pool).await;
  }
}
