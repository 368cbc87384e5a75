use thiserror::Error;

use crate::algorithm::Algorithm;

/// Broad class of a [`TokenError`].
///
/// Every kind is fatal to the call that produced it. Callers can use the kind
/// to tell a malformed token apart from a misconfigured verifier or a forged
/// signature without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong segment count, malformed base64url or malformed JSON.
    Structural,
    /// Unknown, disallowed or unavailable algorithm, or an unusable key.
    Algorithm,
    /// The recomputed signature does not match the one in the token.
    Signature,
}

/// Errors returned by the token codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Not enough segments: a token must have exactly 3 dot-separated segments")]
    NotEnoughSegments,

    #[error("Too many segments: a token must have exactly 3 dot-separated segments")]
    TooManySegments,

    #[error("Invalid segment encoding: {0}")]
    InvalidSegmentEncoding(String),

    #[error("Invalid header encoding: {0}")]
    InvalidHeaderEncoding(String),

    #[error("Invalid claims encoding: {0}")]
    InvalidClaimsEncoding(String),

    #[error("Failed to serialize segment: {0}")]
    Serialization(String),

    #[error("Invalid claim: {0}")]
    InvalidClaim(String),

    #[error("Algorithm not supported: {0:?}")]
    UnsupportedAlgorithm(String),

    #[error("Algorithm {0} is not allowed by the verifier")]
    AlgorithmNotAllowed(Algorithm),

    #[error("The hash for {0} is not available in this build")]
    HashUnavailable(Algorithm),

    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    #[error("Signature verification failed")]
    SignatureVerificationFailure,
}

impl TokenError {
    pub fn invalid_segment<S: Into<String>>(msg: S) -> Self {
        TokenError::InvalidSegmentEncoding(msg.into())
    }

    pub fn invalid_header<S: Into<String>>(msg: S) -> Self {
        TokenError::InvalidHeaderEncoding(msg.into())
    }

    pub fn invalid_claims<S: Into<String>>(msg: S) -> Self {
        TokenError::InvalidClaimsEncoding(msg.into())
    }

    pub fn invalid_claim<S: Into<String>>(msg: S) -> Self {
        TokenError::InvalidClaim(msg.into())
    }

    pub fn unsupported_algorithm<S: Into<String>>(id: S) -> Self {
        TokenError::UnsupportedAlgorithm(id.into())
    }

    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TokenError::NotEnoughSegments
            | TokenError::TooManySegments
            | TokenError::InvalidSegmentEncoding(_)
            | TokenError::InvalidHeaderEncoding(_)
            | TokenError::InvalidClaimsEncoding(_)
            | TokenError::Serialization(_)
            | TokenError::InvalidClaim(_) => ErrorKind::Structural,
            TokenError::UnsupportedAlgorithm(_)
            | TokenError::AlgorithmNotAllowed(_)
            | TokenError::HashUnavailable(_)
            | TokenError::InvalidKey(_) => ErrorKind::Algorithm,
            TokenError::SignatureVerificationFailure => ErrorKind::Signature,
        }
    }
}

impl From<base64::DecodeError> for TokenError {
    fn from(error: base64::DecodeError) -> Self {
        TokenError::InvalidSegmentEncoding(error.to_string())
    }
}
