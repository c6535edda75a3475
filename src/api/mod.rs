//! Read-only status API.
//!
//! GET-only by construction: the API observes the engine, it never commands
//! it. Every payload is the serde form of the corresponding in-memory
//! record, so on-disk, in-memory and on-the-wire shapes stay identical.

mod config;
mod provider;
mod routes;
mod server;

pub use config::ApiConfig;
pub use provider::{DefaultStatusProvider, FileStatusProvider, StatusProvider};
pub use routes::status_routes;
pub use server::StatusServer;
