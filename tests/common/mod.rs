//! Common test utilities and fixtures for parindex integration tests
//!
//! This module provides:
//! - `TestRepo` builder for creating source trees and running the CLI
//! - Assertions over index contents and JSON output

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod assertions;
pub mod test_repo;

pub use assertions::*;
pub use test_repo::TestRepo;
