//! # soundctl-adapter-http-axum
//!
//! IPC adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Expose the daemon's commands as small JSON endpoints
//!   (`/api/volume_up`, `/api/cycle_outputs`, `/api/state`, …)
//! - Stream every `StateChanged` broadcast over Server-Sent Events
//! - Map command results into HTTP responses, and failures into a
//!   `{ "kind", "error" }` body with a matching status code
//!
//! ## Dependency rule
//! Depends on `soundctl-app` (for port traits and services) and
//! `soundctl-domain` (for the types serialized on the wire). Never leaks axum
//! types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;
