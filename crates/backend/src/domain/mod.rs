//! Domain types - core business entities
//!
//! These types are independent of persistence and transport concerns.

pub mod blob;
pub mod config;
pub mod index;
pub mod project;
