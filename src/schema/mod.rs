//! # Schema Module
//!
//! Declarative request and response contracts.
//!
//! Input contracts are [`InputSchema`] descriptors: field name → [`FieldSpec`],
//! split into required and optional fields. They are interpreted by the single
//! generic routine [`crate::validator::validate`]; no route carries ad hoc checks.
//!
//! Output contracts are JSON Schema documents keyed by status code. They are
//! compiled once when the dispatcher is built and used to check what the
//! dispatcher is about to send.

mod items;
mod types;

pub use items::*;
pub use types::*;
