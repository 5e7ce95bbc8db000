//! Shared test utilities for mailexport integration tests.
//!
//! This module provides:
//! - `TestHarness` for building a mail profile in a temp directory and
//!   exporting it
//! - `EmlBuilder` for writing RFC 5322 messages without fixture files

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
