//! Business logic services.
//!
//! ## Available Services
//!
//! - [`index`] - Incremental indexing of a project against the remote service
//! - [`search`] - Re-index then query, rendering every failure as text

pub mod index;
pub mod search;
pub mod util;

#[cfg(test)]
mod __tests__;
