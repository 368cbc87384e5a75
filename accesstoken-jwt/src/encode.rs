use tracing::debug;

use crate::algorithm::Algorithm;
use crate::error::TokenError;
use crate::segment::{encode_base64url, encode_segment};
use crate::value::{ClaimValue, Claims, Header};

/// Value of the mandatory `typ` header field.
pub const TOKEN_TYPE: &str = "JWT";

/// Build the header for a token signed with `algorithm`.
///
/// Custom fields are applied first; `typ` and `alg` are written last so a
/// caller can never override them.
pub fn build_header(algorithm: Algorithm, custom_headers: Option<&Header>) -> Header {
    let mut header = custom_headers.cloned().unwrap_or_default();
    header.insert("typ".to_string(), ClaimValue::from(TOKEN_TYPE));
    header.insert("alg".to_string(), ClaimValue::from(algorithm.as_str()));
    header
}

/// Create a signed token from `claims`.
///
/// The result is `base64url(header).base64url(claims).base64url(signature)`
/// where the signature is the HMAC of the first two segments joined by a dot.
/// Encoding is a pure function of its inputs: the same claims, key, algorithm
/// and headers always produce the same token.
///
/// # Arguments
///
/// * `claims` - The token body
/// * `key` - The shared secret
/// * `algorithm` - The signing algorithm, written to the `alg` header
/// * `custom_headers` - Optional extra header fields (e.g. `cty`)
///
/// # Errors
///
/// Returns [`TokenError::HashUnavailable`] if `algorithm` is not compiled in,
/// or [`TokenError::Serialization`] if a segment cannot be serialized.
///
/// # Example
///
/// ```
/// use accesstoken_jwt::{claims, encode, Algorithm};
///
/// let token = encode(&claims! { "sub" => "alice" }, b"secret", Algorithm::Hs256, None)?;
/// assert_eq!(token.split('.').count(), 3);
/// # Ok::<(), accesstoken_jwt::TokenError>(())
/// ```
pub fn encode(
    claims: &Claims,
    key: &[u8],
    algorithm: Algorithm,
    custom_headers: Option<&Header>,
) -> Result<String, TokenError> {
    if !algorithm.is_available() {
        return Err(TokenError::HashUnavailable(algorithm));
    }

    let header = build_header(algorithm, custom_headers);
    let mut token = encode_segment(&header)?;
    token.push('.');
    token.push_str(&encode_segment(claims)?);

    let signature = algorithm.sign(key, token.as_bytes())?;
    token.push('.');
    token.push_str(&encode_base64url(&signature));

    debug!(alg = %algorithm, len = token.len(), "encoded token");

    Ok(token)
}
