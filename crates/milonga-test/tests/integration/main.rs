//! Integration tests for the Milonga event server.

mod elastic_index;
mod events_http;
mod postgres_store;
