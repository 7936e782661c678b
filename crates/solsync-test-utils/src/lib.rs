//! Shared test utilities for the solsync workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`remote`]: [`FakeRemote`], an in-memory stand-in for the solution API
//! - [`project`]: [`TestProject`] builder for a project directory on disk

pub mod project;
pub mod remote;

pub use project::TestProject;
pub use remote::FakeRemote;
