//! Stagecraft API server library.
//!
//! Exposes config, state, error handling, identity and routes so that
//! integration tests and the binary entrypoint share the same router.

pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod query;
pub mod router;
pub mod routes;
pub mod state;
