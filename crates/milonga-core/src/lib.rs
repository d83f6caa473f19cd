//! Shared building blocks for the Milonga event discovery backend.
//!
//! Holds the pieces every other crate needs without pulling in a database or
//! an HTTP client: settings, the core error type, route constants and the
//! canonical event model.

pub mod config;
pub mod constants;
pub mod error;
pub mod model;
