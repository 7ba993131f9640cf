//! Variable-templated HTTP request engine for user-defined shortcuts.
//!
//! A shortcut is an immutable template describing one HTTP request: method,
//! URL, headers, parameters, body, authentication mode, timeout and TLS
//! policy, any string field of which may contain `{{variable}}` placeholders.
//! Given a shortcut definition and a set of already-resolved variable values,
//! the engine instantiates every templated field, builds an immutable request
//! descriptor, configures a transport client matching the definition's TLS
//! and authentication policy, and executes the request asynchronously.
//!
//! # Architecture
//!
//! - **models**: shortcut definitions, request descriptors and responses
//! - **variables**: placeholder substitution over resolved variable values
//! - **builder**: validation and assembly of immutable request descriptors
//! - **auth**: basic credential encoding and digest challenge answering
//! - **client**: per-invocation transport client construction
//! - **executor**: asynchronous submission with single-fire outcome delivery
//!
//! # Usage
//!
//! ```no_run
//! use shortcut_engine::{execute_shortcut, HttpMethod, ResolvedVariables, ShortcutDefinition};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut definition = ShortcutDefinition::new(HttpMethod::GET, "https://{{host}}/status");
//! definition.add_header("Accept", "application/json");
//!
//! let variables: ResolvedVariables = [("host", "api.example.com")].into_iter().collect();
//!
//! let handle = execute_shortcut(&definition, &variables)?;
//! handle.on_success(|response| println!("status: {}", response.status_code));
//! handle.on_failure(|failure| eprintln!("failed: {}", failure));
//! handle.settled().await;
//! # Ok(())
//! # }
//! ```
//!
//! Variable *resolution* (prompting a user, reading stored values) happens
//! outside the engine; it only consumes the resulting name-to-value mapping.
//! Likewise the engine holds no state after delivering an outcome: each
//! invocation gets its own client and descriptor, so concurrent executions
//! need no coordination.

pub mod auth;
pub mod builder;
pub mod client;
pub mod executor;
pub mod models;
pub mod variables;

pub use builder::{BuildError, RequestBuilder};
pub use client::{create_client, ClientError, DigestCredentials, HttpClient};
pub use executor::{
    execute, execute_cancellable, execute_shortcut, prepare, CancellationToken, ExecutionHandle,
    ExecutionResult, FailureCategory, PreparedShortcut, RequestFailure, ShortcutError,
};
pub use models::{
    AuthenticationMode, Header, HttpMethod, Parameter, RequestAuth, RequestDescriptor,
    ShortcutDefinition, ShortcutResponse, DEFAULT_TIMEOUT_MS,
};
pub use variables::{substitute, ResolvedVariables, SubstitutionError};
