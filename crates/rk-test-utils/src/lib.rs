//! Shared test utilities for the rk-boot workspace.
//!
//! Standard fixtures used across crate test suites. This crate is a
//! dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`boot`]: [`BootFixture`] for boot documents on disk
//! - [`env`]: environment snapshots for override collectors

pub mod boot;
pub mod env;

pub use boot::{BootFixture, GIN_BOOT};
pub use env::env_vars;
