//! Shared utilities.

pub mod bootstrap;
pub mod retry;
