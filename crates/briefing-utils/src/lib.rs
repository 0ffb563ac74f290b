//! Shared utilities for stock-briefing
//!
//! This crate provides common functionality used across the workspace,
//! including logging setup and environment variable helpers.

pub mod config;
pub mod logging;

pub use config::{EnvError, EnvSource, load_dotenv, parse_flag};
pub use logging::{LogFormat, init_tracing};
