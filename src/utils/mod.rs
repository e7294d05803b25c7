//! Shared utilities.
//!
//! - [`glob`]: Icon file discovery with glob patterns
//! - [`hash`]: Content fingerprinting for cache busting
//! - [`path`]: Filesystem path normalization

pub mod glob;
pub mod hash;
pub mod path;
