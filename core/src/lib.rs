//! Core components for signing object storage requests.
//!
//! This crate provides the foundational types shared by the r2sign crates.
//! It does no network I/O on its own: every capability that touches the
//! outside world is reached through a [`Context`].
//!
//! ## Overview
//!
//! - **Context**: A container that holds implementations for environment access,
//!   HTTP sending, file reading and the wall clock
//! - **Error**: A single error type with an [`ErrorKind`] and, for failed
//!   object requests, the response status and body
//!
//! ## Example
//!
//! ```
//! use r2sign_core::{Context, FixedClock, StaticEnv};
//! use r2sign_core::time::parse_rfc3339;
//! use std::collections::HashMap;
//!
//! # fn main() -> r2sign_core::Result<()> {
//! let ctx = Context::new()
//!     .with_env(StaticEnv {
//!         envs: HashMap::from([("R2_BUCKET_NAME".to_string(), "media".to_string())]),
//!     })
//!     .with_clock(FixedClock(parse_rfc3339("2024-01-01T00:00:00Z")?));
//!
//! assert_eq!(ctx.env_var("R2_BUCKET_NAME").as_deref(), Some("media"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Traits
//!
//! - [`Env`]: For environment variable access
//! - [`HttpSend`]: For executing signed HTTP requests
//! - [`FileRead`]: For asynchronous file reading
//! - [`Clock`]: For the signing timestamp
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time formatting utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Clock;
pub use context::Context;
pub use context::Env;
pub use context::FileRead;
pub use context::FixedClock;
pub use context::HttpSend;
pub use context::NoopEnv;
pub use context::NoopFileRead;
pub use context::NoopHttpSend;
pub use context::OsEnv;
pub use context::StaticEnv;
pub use context::SystemClock;

mod error;
pub use error::{Error, ErrorKind, Result};
