#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use r2sign_core::*;

#[cfg(feature = "default-context")]
mod context;
#[cfg(all(feature = "default-context", feature = "r2"))]
pub use context::default_client;
#[cfg(feature = "default-context")]
pub use context::default_context;

#[cfg(feature = "r2")]
pub mod r2 {
    pub use r2sign_r2::*;
}
