pub mod tags;
pub mod user;
pub mod workout;

pub use tags::{Exercise, Location, Sport, WorkoutCategory};
pub use user::User;
pub use workout::{NewWorkout, NewWorkoutDetail, Workout, WorkoutDetail, WorkoutDetailInput, WorkoutUpdate};
