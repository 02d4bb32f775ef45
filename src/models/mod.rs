pub mod attendance;
pub mod coordinate;
pub mod last_attendance;
