//! Shared utilities.
//!
//! Directory helpers used by the build and scaffold code, plus test helpers.

pub mod dirs;

#[cfg(test)]
pub mod testutil;
