//! Workout grouping and pagination.
//!
//! A user's history is presented as one group per calendar date, newest
//! date first, and pagination walks groups rather than rows: five sessions
//! on one day and one on another are two page items, not six.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Workout;

/// ---------------------------------------------------------------------------
/// Page Types
/// ---------------------------------------------------------------------------

/// All of one user's workouts sharing a calendar date, in repository order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutGroup {
  pub date: NaiveDate,
  pub workouts: Vec<Workout>,
}

/// One page of date-groups plus pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPage {
  pub groups: Vec<WorkoutGroup>,
  /// Number of distinct dates across the WHOLE history, not this page
  pub total_group_count: usize,
  pub has_next_page: bool,
  pub has_previous_page: bool,
}

/// ---------------------------------------------------------------------------
/// Grouping Engine
/// ---------------------------------------------------------------------------

/// Partition workouts into date groups, newest date first, and slice out the
/// requested page of groups.
///
/// `total_group_count` is computed before the slice. `has_next_page` needs
/// both a nonzero `limit` and an `offset`; `has_previous_page` needs an
/// `offset` greater than zero. Workouts must arrive in repository order;
/// rows sharing a date keep that order inside their group.
pub fn paginate_by_date(
  workouts: Vec<Workout>,
  limit: Option<u32>,
  offset: Option<u32>,
) -> WorkoutPage {
  let mut by_date: BTreeMap<NaiveDate, Vec<Workout>> = BTreeMap::new();
  for workout in workouts {
    by_date.entry(workout.date).or_default().push(workout);
  }

  let total_group_count = by_date.len();

  let skip = offset.unwrap_or(0) as usize;
  let take = limit.map(|l| l as usize).unwrap_or(usize::MAX);

  let groups: Vec<WorkoutGroup> = by_date
    .into_iter()
    .rev()
    .skip(skip)
    .take(take)
    .map(|(date, workouts)| WorkoutGroup { date, workouts })
    .collect();

  let has_next_page = match (limit, offset) {
    (Some(limit), Some(offset)) if limit > 0 => {
      (offset as usize) + (limit as usize) < total_group_count
    }
    _ => false,
  };
  let has_previous_page = offset.is_some_and(|o| o > 0);

  WorkoutPage {
    groups,
    total_group_count,
    has_next_page,
    has_previous_page,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn workout(id: i64, date: NaiveDate) -> Workout {
    Workout {
      id,
      user_id: 1,
      date,
      sport_id: 1,
      workout_category_id: 1,
      location_id: 1,
      duration: None,
    }
  }

  /// Two workouts on 2024-01-03, one on 2024-01-01, in repository order
  fn sample_history() -> Vec<Workout> {
    vec![
      workout(10, date(2024, 1, 3)),
      workout(11, date(2024, 1, 3)),
      workout(12, date(2024, 1, 1)),
    ]
  }

  #[test]
  fn test_groups_are_ordered_newest_first() {
    let page = paginate_by_date(sample_history(), None, None);

    assert_eq!(page.groups.len(), 2);
    assert_eq!(page.groups[0].date, date(2024, 1, 3));
    assert_eq!(page.groups[1].date, date(2024, 1, 1));
    assert_eq!(page.total_group_count, 2);
    assert!(!page.has_next_page);
    assert!(!page.has_previous_page);
  }

  #[test]
  fn test_equal_dates_share_one_group_in_insertion_order() {
    let page = paginate_by_date(sample_history(), None, None);

    let ids: Vec<i64> = page.groups[0].workouts.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![10, 11]);
  }

  #[test]
  fn test_first_page_of_one_group() {
    let page = paginate_by_date(sample_history(), Some(1), Some(0));

    assert_eq!(page.groups.len(), 1);
    assert_eq!(page.groups[0].date, date(2024, 1, 3));
    assert_eq!(page.groups[0].workouts.len(), 2);
    assert_eq!(page.total_group_count, 2);
    assert!(page.has_next_page);
    assert!(!page.has_previous_page);
  }

  #[test]
  fn test_second_page_of_one_group() {
    let page = paginate_by_date(sample_history(), Some(1), Some(1));

    assert_eq!(page.groups.len(), 1);
    assert_eq!(page.groups[0].date, date(2024, 1, 1));
    assert!(!page.has_next_page);
    assert!(page.has_previous_page);
  }

  #[test]
  fn test_total_count_ignores_pagination() {
    for (limit, offset) in [(None, None), (Some(1), Some(0)), (Some(1), Some(1)), (Some(0), Some(5))] {
      let page = paginate_by_date(sample_history(), limit, offset);
      assert_eq!(page.total_group_count, 2);
    }
  }

  #[test]
  fn test_zero_limit_returns_no_groups_but_counts_all() {
    let page = paginate_by_date(sample_history(), Some(0), Some(0));

    assert!(page.groups.is_empty());
    assert_eq!(page.total_group_count, 2);
    // A zero limit never reports a next page
    assert!(!page.has_next_page);
  }

  #[test]
  fn test_offset_past_the_end_is_empty() {
    let page = paginate_by_date(sample_history(), Some(1), Some(9));

    assert!(page.groups.is_empty());
    assert_eq!(page.total_group_count, 2);
    assert!(!page.has_next_page);
    assert!(page.has_previous_page);
  }

  #[test]
  fn test_limit_without_offset_never_has_next() {
    let page = paginate_by_date(sample_history(), Some(1), None);

    assert_eq!(page.groups.len(), 1);
    assert!(!page.has_next_page);
    assert!(!page.has_previous_page);
  }

  #[test]
  fn test_offset_without_limit_returns_the_tail() {
    let page = paginate_by_date(sample_history(), None, Some(1));

    assert_eq!(page.groups.len(), 1);
    assert_eq!(page.groups[0].date, date(2024, 1, 1));
    assert!(!page.has_next_page);
    assert!(page.has_previous_page);
  }

  #[test]
  fn test_empty_history() {
    let page = paginate_by_date(Vec::new(), Some(5), Some(0));

    assert!(page.groups.is_empty());
    assert_eq!(page.total_group_count, 0);
    assert!(!page.has_next_page);
    assert!(!page.has_previous_page);
  }
}
