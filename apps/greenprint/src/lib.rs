//! # GreenPrint Application Library
//!
//! Shared modules of THE BINARY, exposed as a library so integration
//! tests can exercise the HTTP API and configuration loading directly.

pub mod api;
pub mod cli;
pub mod config;
