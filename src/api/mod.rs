//! HTTP surface of the scan analysis service.
//!
//! `api_router()` returns a composable `Router`; `start_server()` binds it
//! and runs it in a background task.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;
pub mod upload;

pub use router::api_router;
pub use server::{start_server, ApiServer, ServerError};
pub use types::ApiContext;
