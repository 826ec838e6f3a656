//! Equipment portal HTTP API
//!
//! Login gate, static pages, and the equipment read/save endpoints.
//! Run with `equipment-portal serve`.

pub mod auth;
pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server, AppState};
