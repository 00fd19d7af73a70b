//! Configuration modules for the Slate API.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables via a `from_env()` constructor.

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
pub mod rate_limit;
