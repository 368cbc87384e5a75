use std::collections::BTreeSet;

use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::algorithm::Algorithm;
use crate::error::TokenError;
use crate::segment::decode_segment;
use crate::value::{Claims, Header};

/// How [`decode`] treats the signature of a token.
///
/// A verifying `Validation` always carries the set of algorithms the caller
/// is prepared to accept. The `alg` header of the token is only used to pick
/// one of those; a token claiming any other algorithm is rejected with
/// [`TokenError::AlgorithmNotAllowed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    verify_signature: bool,
    algorithms: BTreeSet<Algorithm>,
}

impl Validation {
    /// Verify signatures made with exactly `algorithm`.
    pub fn new(algorithm: Algorithm) -> Self {
        Self::with_algorithms([algorithm])
    }

    /// Verify signatures made with any of `algorithms`.
    ///
    /// An empty set rejects every token.
    pub fn with_algorithms<I: IntoIterator<Item = Algorithm>>(algorithms: I) -> Self {
        Self {
            verify_signature: true,
            algorithms: algorithms.into_iter().collect(),
        }
    }

    /// Skip signature verification entirely.
    ///
    /// The claims of such a token are untrusted; use this only to inspect a
    /// token before the key is known.
    pub fn unverified() -> Self {
        Self {
            verify_signature: false,
            algorithms: BTreeSet::new(),
        }
    }

    /// Add another acceptable algorithm.
    pub fn allow(mut self, algorithm: Algorithm) -> Self {
        self.algorithms.insert(algorithm);
        self
    }

    pub fn verifies_signature(&self) -> bool {
        self.verify_signature
    }

    pub fn is_allowed(&self, algorithm: Algorithm) -> bool {
        self.algorithms.contains(&algorithm)
    }
}

struct Segments<'a> {
    header: &'a str,
    claims: &'a str,
    signature: &'a str,
}

impl<'a> Segments<'a> {
    fn split(token: &'a str) -> Result<Self, TokenError> {
        let mut parts = token.split('.');
        let (Some(header), Some(claims), Some(signature)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::NotEnoughSegments);
        };
        if parts.next().is_some() {
            return Err(TokenError::TooManySegments);
        }
        Ok(Self {
            header,
            claims,
            signature,
        })
    }

    /// The bytes the signature was computed over.
    fn signing_input(&self) -> String {
        format!("{}.{}", self.header, self.claims)
    }

    fn header(&self) -> Result<Header, TokenError> {
        let bytes = decode_segment(self.header)?;
        serde_json::from_slice(&bytes).map_err(|e| TokenError::invalid_header(e.to_string()))
    }

    fn claims(&self) -> Result<Claims, TokenError> {
        let bytes = decode_segment(self.claims)?;
        serde_json::from_slice(&bytes).map_err(|e| TokenError::invalid_claims(e.to_string()))
    }
}

/// Decode a token and return its claims.
///
/// When `validation` verifies signatures, the claims are only returned once
/// the signature has been recomputed and matched. Decoding either succeeds
/// completely or returns an error; partial claims are never returned.
///
/// # Arguments
///
/// * `token` - The three-segment token string
/// * `key` - The shared secret the token was signed with
/// * `validation` - Whether to verify, and which algorithms to accept
///
/// # Errors
///
/// * [`TokenError::NotEnoughSegments`] / [`TokenError::TooManySegments`] if the
///   token does not have exactly three segments
/// * [`TokenError::InvalidSegmentEncoding`] on malformed base64url
/// * [`TokenError::InvalidClaimsEncoding`] if the body is not a JSON object of
///   claim values
/// * any error from [`verify_signature`]
///
/// # Example
///
/// ```
/// use accesstoken_jwt::{claims, decode, encode, Algorithm, Validation};
///
/// let body = claims! { "sub" => "alice" };
/// let token = encode(&body, b"secret", Algorithm::Hs256, None)?;
/// let decoded = decode(&token, b"secret", &Validation::new(Algorithm::Hs256))?;
/// assert_eq!(decoded, body);
/// # Ok::<(), accesstoken_jwt::TokenError>(())
/// ```
pub fn decode(token: &str, key: &[u8], validation: &Validation) -> Result<Claims, TokenError> {
    let segments = Segments::split(token)?;
    let claims = segments.claims()?;

    if validation.verifies_signature() {
        verify_segments(&segments, key, validation)?;
    }

    Ok(claims)
}

/// Decode only the header of a token, without any verification.
///
/// # Errors
///
/// Returns a segment-count error, [`TokenError::InvalidSegmentEncoding`] or
/// [`TokenError::InvalidHeaderEncoding`].
pub fn decode_header(token: &str) -> Result<Header, TokenError> {
    Segments::split(token)?.header()
}

/// Check the signature of `token` and return the algorithm it was signed with.
///
/// # Errors
///
/// * a segment-count error or [`TokenError::InvalidSegmentEncoding`]
/// * [`TokenError::InvalidHeaderEncoding`] if the header is not valid JSON
/// * [`TokenError::UnsupportedAlgorithm`] if `alg` is missing or unknown
/// * [`TokenError::AlgorithmNotAllowed`] if `alg` is not accepted by `validation`
/// * [`TokenError::HashUnavailable`] if the hash is not compiled in
/// * [`TokenError::SignatureVerificationFailure`] if the signature does not match
pub fn verify_signature(
    token: &str,
    key: &[u8],
    validation: &Validation,
) -> Result<Algorithm, TokenError> {
    let segments = Segments::split(token)?;
    verify_segments(&segments, key, validation)
}

fn verify_segments(
    segments: &Segments<'_>,
    key: &[u8],
    validation: &Validation,
) -> Result<Algorithm, TokenError> {
    let header = segments.header()?;

    let algorithm = match header.get("alg").and_then(|alg| alg.as_str()) {
        Some(id) => Algorithm::resolve(id)?,
        None => return Err(TokenError::unsupported_algorithm("")),
    };

    if !validation.is_allowed(algorithm) {
        warn!(alg = %algorithm, "token algorithm rejected by verifier");
        return Err(TokenError::AlgorithmNotAllowed(algorithm));
    }

    if !algorithm.is_available() {
        return Err(TokenError::HashUnavailable(algorithm));
    }

    let signature = decode_segment(segments.signature)?;
    let expected = algorithm.sign(key, segments.signing_input().as_bytes())?;

    if bool::from(expected.as_slice().ct_eq(signature.as_slice())) {
        Ok(algorithm)
    } else {
        debug!(alg = %algorithm, "token signature mismatch");
        Err(TokenError::SignatureVerificationFailure)
    }
}
