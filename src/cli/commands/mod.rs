//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod demo;
pub mod init;
pub mod validate;
