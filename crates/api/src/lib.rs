//! Bakehouse API server library.
//!
//! Exposes config, state, error handling, the image store and the route tree
//! so integration tests and the binary entrypoint share one assembly path.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod media;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
