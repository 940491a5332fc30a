//! Token failures raised by the codec and the lifecycle manager

use thiserror::Error;

use super::jwt::TokenKind;

/// Why a token could not be issued or accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Claims could not be serialized or signed
    #[error("Failed to encode token: {0}")]
    Encoding(String),

    /// Bad signature, malformed structure or wrong algorithm
    #[error("Invalid token")]
    Invalid,

    /// Valid signature but the token is of the other kind
    #[error("Invalid token type: expected {expected}, got {actual}")]
    TypeMismatch { expected: TokenKind, actual: TokenKind },

    #[error("Token has expired")]
    Expired { kind: TokenKind },

    /// The refresh token presented to `refresh` has itself expired;
    /// the client has to log in again.
    #[error("Refresh token expired, please login again")]
    SessionExpired,
}
