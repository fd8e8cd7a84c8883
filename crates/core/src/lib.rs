//! Polvo Planner Core - Shared types library.
//!
//! This crate provides common types used across all Polvo Planner components:
//! - `engine` - ROI engine, aggregation, calendar, reports and order decisions
//! - `cli` - Command-line tools over order files
//!
//! # Architecture
//!
//! The core crate contains only types and their validation rules - no I/O,
//! no configuration loading, no cost arithmetic. This keeps it lightweight and
//! allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, channels, statuses, ISO weeks, flavors,
//!   ingredients and orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
