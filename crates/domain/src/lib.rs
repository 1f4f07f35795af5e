//! # soundctl-domain
//!
//! Pure domain model for the soundctl audio output daemon.
//!
//! ## Responsibilities
//! - Foundational types: output identifiers, error conventions, timestamps
//! - Define **Volumes** and **Steps** (clamped percentages)
//! - Define **Outputs** (selectable audio sinks) and the **OutputRegistry**
//!   that fixes their rotation order
//! - Define the **Selection** ring (`Output(index)` or `Muted`) and the
//!   **DaemonState** transitions planned against it
//! - Define **Commands** and **StateChanged** events
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod command;
pub mod event;
pub mod output;
pub mod registry;
pub mod state;
pub mod volume;
