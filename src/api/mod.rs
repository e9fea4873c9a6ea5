mod appointments;
mod client;
mod providers;
mod reviews;
mod schedules;
mod voice;

pub use appointments::AvailabilitySnapshot;
pub use client::{ApiClient, ApiError};
