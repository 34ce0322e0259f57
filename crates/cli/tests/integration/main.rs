//! Integration tests running real builds against a fake compiler.

#![cfg(unix)]

mod clean_tests;
mod common;
