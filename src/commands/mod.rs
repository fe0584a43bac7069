pub mod attendance;
pub mod catalog;
pub mod performance;
pub mod users;
pub mod workouts;
