//! RadioInfo daemon integration
//!
//! Wires a [`radioinfo_core::UpdateController`] to the outside world:
//!
//! - [`UpdateTimer`] triggers a run on a fixed interval, skipping ticks
//!   while a run is still active
//! - [`LogPresenter`] reports progress, results and errors through `tracing`
//!
//! # Usage
//!
//! ```rust,no_run
//! use radioinfo_core::{UpdateConfig, UpdateController};
//! use radioinfo_daemon::{LogPresenter, UpdateTimer};
//!
//! # async fn example() -> Result<(), radioinfo_core::RadioInfoError> {
//! let config = UpdateConfig::from_env()?;
//! let interval = config.update_interval();
//! let (controller, events) = UpdateController::new(config)?;
//!
//! tokio::spawn(UpdateTimer::new(controller.clone(), interval).run());
//! let mut presenter = LogPresenter::default();
//! events.run(&controller, &mut presenter).await;
//! # Ok(())
//! # }
//! ```

pub mod presenter;
pub mod timer;

pub use presenter::LogPresenter;
pub use timer::UpdateTimer;
