//! Build settings taken from the environment.

use std::env;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_COMPILER: &str = "gcc";
pub const DEFAULT_CXX_LIB: &str = "stdc++";

/// Environment variables consulted by the build.
pub mod vars {
  pub const COMPILER: &str = "CC";
  pub const CFLAGS: &str = "CFLAGS";
  pub const LDFLAGS: &str = "LDFLAGS";
  pub const CXX_STD: &str = "CXXSTD";
  pub const CXX_LIB: &str = "CXXLIB";
  pub const TIMEOUT: &str = "KBUILD_TIMEOUT";
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("invalid {var} value {value:?}: expected a whole number of seconds")]
  InvalidTimeout { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
  /// Compiler driver used for both compiling and linking.
  pub compiler: String,
  pub cflags: Vec<String>,
  pub ldflags: Vec<String>,
  /// `-std=` value for C++ units.
  pub cxx_std: Option<String>,
  /// Runtime library linked in when any unit is C++.
  pub cxx_lib: String,
  /// Upper bound on a single compiler or linker run.
  pub timeout: Option<Duration>,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      compiler: DEFAULT_COMPILER.to_string(),
      cflags: Vec::new(),
      ldflags: Vec::new(),
      cxx_std: None,
      cxx_lib: DEFAULT_CXX_LIB.to_string(),
      timeout: None,
    }
  }
}

impl BuildConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();

    let timeout = match non_empty_var(vars::TIMEOUT) {
      Some(value) => {
        let secs: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidTimeout {
          var: vars::TIMEOUT,
          value: value.clone(),
        })?;
        (secs > 0).then(|| Duration::from_secs(secs))
      }
      None => None,
    };

    Ok(Self {
      compiler: non_empty_var(vars::COMPILER).unwrap_or(defaults.compiler),
      cflags: split_flags(env::var(vars::CFLAGS).ok().as_deref()),
      ldflags: split_flags(env::var(vars::LDFLAGS).ok().as_deref()),
      cxx_std: non_empty_var(vars::CXX_STD),
      cxx_lib: non_empty_var(vars::CXX_LIB).unwrap_or(defaults.cxx_lib),
      timeout,
    })
  }
}

fn non_empty_var(name: &str) -> Option<String> {
  env::var(name).ok().filter(|v| !v.is_empty())
}

/// Split a flags override on whitespace.
pub fn split_flags(value: Option<&str>) -> Vec<String> {
  value
    .map(|v| v.split_whitespace().map(str::to_string).collect())
    .unwrap_or_default()
}
