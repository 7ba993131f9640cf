//! Variable substitution for shortcut templates.
//!
//! Shortcut fields (URL, credentials, body, parameter and header entries) may
//! contain `{{variable}}` placeholders. This module replaces those
//! placeholders with values that were resolved ahead of time by the caller.
//! Resolution itself (prompting, storage lookups) happens outside the engine.

pub mod substitution;

pub use substitution::{substitute, ResolvedVariables, SubstitutionError};
