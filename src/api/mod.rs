//! Backend contract: envelope decoding and the HTTP client.

pub mod client;
pub mod envelope;

pub use client::{AttendanceBackend, HttpBackend};
pub use envelope::ApiResponse;
