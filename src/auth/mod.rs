//! HTTP authentication support.
//!
//! Basic credentials are encoded directly onto the request as an
//! `Authorization` header. Digest credentials are held by the transport
//! client, which answers the server's challenge with a computed response on
//! retry.

pub mod basic;
pub mod digest;

use std::fmt;

/// Errors that can occur while answering an authentication challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The server's `WWW-Authenticate` challenge could not be parsed or
    /// answered.
    InvalidChallenge(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidChallenge(msg) => {
                write!(f, "invalid authentication challenge: {}", msg)
            }
        }
    }
}

impl std::error::Error for AuthError {}
