//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`endpoints`] - List the configured endpoints
//! - [`fetch`] - Run the snapshot job (default command)
//! - [`init`] - Write a default configuration file

pub mod endpoints;
pub mod fetch;
pub mod init;
