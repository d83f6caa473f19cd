//! Milonga event server - integration test support.
//!
//! Re-exports the workspace crates under `component::` and `app::` paths and
//! provides in-process stand-ins for the primary store and the search index.

#![allow(ambiguous_glob_reexports)]

pub mod fakes;

pub mod component {
    pub use milonga_core::*;
    pub use milonga_service::*;

    pub mod db {
        pub use milonga_db::db::*;
        pub use milonga_db::error::*;
        pub use milonga_db::store::*;
    }

    pub mod search {
        pub use milonga_search::*;
    }

    // Re-export config from both core and app
    pub mod config {
        pub use milonga_app::config::ConfigHandler;
        pub use milonga_core::config::*;
    }
}

pub mod app {
    pub use milonga_app::*;

    pub mod api {
        pub use milonga_app::app::api::*;
    }
}
