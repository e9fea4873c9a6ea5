//! Client core for the Pyske healthcare appointment platform.
//!
//! The crate has three parts: the [`availability`] engine (pure slot
//! computation over a provider's weekly work schedule and existing
//! bookings), the [`api`] client for the platform's REST endpoints, and the
//! [`transcription`] session for the realtime speech service.

pub mod api;
pub mod availability;
pub mod config;
pub mod error;
pub mod models;
pub mod transcription;

pub use error::{AppError, AppResult};
