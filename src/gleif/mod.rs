//! GLEIF (Global Legal Entity Identifier Foundation) integration
//!
//! This module provides:
//! - API types for the GLEIF Level 1 entity data the lookup needs
//! - A paced client for full-text search and single-record fetches

pub mod client;
pub mod types;

pub use client::GleifClient;
pub use types::{is_valid_lei, LeiRecord};
