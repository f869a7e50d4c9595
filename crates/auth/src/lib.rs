//! `routegate-auth` — client-side route authorization gate.
//!
//! Decides, for every navigation into a protected area, whether the current
//! session may proceed and where to send it otherwise. This is UX routing over
//! an already-authenticated session snapshot; real authorization is enforced
//! server-side.
//!
//! This crate is intentionally decoupled from any browser API: session storage
//! and navigation are injected through [`SessionStore`] and [`Navigator`].

pub mod authorize;
pub mod config;
pub mod gate;
pub mod navigator;
pub mod resolve;
pub mod roles;
pub mod routes;
pub mod session;
pub mod user;

pub use authorize::{AccessDenied, AccessExplanation, DenialKind, Grant, authorize, explain_access};
pub use config::GateConfig;
pub use gate::{AccessDecision, AccessGate};
pub use navigator::{Navigator, RecordingNavigator, Redirect};
pub use resolve::{RoleSet, RoleSource};
pub use roles::{RequiredRole, RoleLabel};
pub use routes::RouteTable;
pub use session::{InMemorySessionStore, SessionKeys, SessionSnapshot, SessionStore};
pub use user::{AssignedRole, Group, GroupKey, UserRecord};
