pub mod gating;
pub mod reconcile;
pub mod resolver;
pub mod sequence;
pub mod state;

pub use resolver::GeoAttendanceResolver;
