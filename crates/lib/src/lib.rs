//! kbuild-lib: incremental build pipeline for kore applications
//!
//! Turns an application directory into a single shared library:
//! - `walk` / `stale`: file discovery and exact-mtime staleness
//! - `asset`: static files embedded as generated C sources
//! - `registry`: the ordered set of build units
//! - `process`: compiler and linker child processes
//! - `build`: the driver tying it all together

pub mod asset;
pub mod build;
pub mod cert;
pub mod clean;
pub mod config;
pub mod consts;
pub mod create;
pub mod process;
pub mod registry;
pub mod serve;
pub mod stale;
pub mod util;
pub mod walk;
