//! RadioInfo Core Library
//!
//! This crate fetches a radio station schedule published as paginated XML,
//! keeps the episodes airing within a window around "now", and hands the
//! result to a presentation layer.
//!
//! # Features
//! - Lazy paginated reader shared by channel listings and schedules
//! - Time-window filtering of scheduled episodes
//! - Single-flight update runs with progress events and atomic snapshot swap
//! - Cooperative cancellation on shutdown

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod pagination;
pub mod parser;
pub mod types;
pub mod window;
pub mod xml;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use client::{ClientConfig, RadioClient};
pub use config::UpdateConfig;
pub use controller::{dispatch, EventReceiver, Presenter, UpdateController, UpdateEvent};
pub use error::{ErrorKind, RadioInfoError, Result};
pub use pagination::{Page, PageInfo, PaginatedReader};
pub use parser::{Progress, ScheduleParser};
pub use types::{Channel, Episode, UpdateSnapshot};
pub use window::TimeWindow;
