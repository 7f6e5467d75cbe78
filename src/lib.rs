//! `dead-hours` library crate.
//!
//! The binary (`dh`) is a thin wrapper around this library so that:
//!
//! - core logic (normalization + simulation) is testable without spawning processes
//! - modules are reusable (e.g., future dashboard/daemon front-ends)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod normalize;
pub mod plot;
pub mod report;
pub mod sim;
