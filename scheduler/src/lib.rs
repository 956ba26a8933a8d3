//! Memory-capacity scoring for the cluster scheduler.
//!
//! Scores candidate nodes with the figures published by an external capacity
//! oracle, normalizes them for the host scheduler, and reports committed
//! placements back to the oracle. The [`plugins::Plugin`] callbacks can be
//! driven in process or through the HTTP extender in [`api`].

pub mod api;
pub mod config;
pub mod cycle;
pub mod errors;
pub mod normalize;
pub mod oracle;
pub mod plugins;
pub mod state;
