//! Common utilities for the shard document model.
//!
//! This crate provides shared infrastructure used by every shard component:
//! - **Errors** - the single [`Error`] enum returned across crate boundaries
//! - **Warning System** - deduplicated diagnostics routed through `log`

pub mod error;
pub mod warning;

pub use error::{Error, Result};
