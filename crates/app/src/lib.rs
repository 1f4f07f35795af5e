//! # soundctl-app
//!
//! Application layer — the state machine, the command service and **port
//! definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Mixer` — list outputs, read and write volumes, (de)activate outputs
//!   - `EventPublisher` — broadcast `StateChanged` events
//! - Define the **driving/inbound** use-cases:
//!   - `StateMachine` — applies commands to the daemon state and the mixer
//!   - `CommandService` — the single serialization point every request goes through
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `soundctl-domain` only (plus `tokio::sync`/`tokio::time`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod services;
pub mod state_machine;

#[cfg(test)]
mod testing;
