//! Primary store for Milonga events: PostgreSQL through diesel-async.
//!
//! The primary store is the system of record. It alone assigns event ids and
//! row versions; everything else (the search mirror in particular) follows it.

pub mod db;
pub mod error;
pub mod model;
pub mod store;
