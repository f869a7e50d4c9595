//! `routegate-core` — shared building blocks for the route gate.
//!
//! This crate contains **pure** primitives (no storage, no navigation).

pub mod error;
pub mod id;

pub use error::{GateError, GateResult};
pub use id::{GroupId, RoleId};
