use base64::{
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
    Engine,
};
use serde::Serialize;

use crate::error::TokenError;

/// Encode raw bytes as URL-safe base64 with the `=` padding stripped.
pub fn encode_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Serialize `value` to compact JSON and encode it as a token segment.
///
/// Claim maps are sorted by key, so the same value always yields the same
/// segment text.
///
/// # Errors
///
/// Returns [`TokenError::Serialization`] if `value` cannot be written as JSON.
pub fn encode_segment<T: Serialize + ?Sized>(value: &T) -> Result<String, TokenError> {
    let json = serde_json::to_vec(value).map_err(|e| TokenError::Serialization(e.to_string()))?;
    Ok(encode_base64url(&json))
}

/// Decode a token segment back to its raw bytes.
///
/// Segments are written without padding, so a segment that already contains
/// `=` is rejected. Otherwise it is re-padded with `=` to a multiple of four
/// characters before decoding with the URL-safe alphabet.
///
/// # Errors
///
/// Returns [`TokenError::InvalidSegmentEncoding`] on any malformed input. No
/// partially decoded bytes are ever returned.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenError> {
    if segment.contains('=') {
        return Err(TokenError::invalid_segment(
            "segment must not carry '=' padding",
        ));
    }

    let mut padded = String::with_capacity(segment.len() + 3);
    padded.push_str(segment);
    let rem = segment.len() % 4;
    if rem > 0 {
        padded.extend(std::iter::repeat('=').take(4 - rem));
    }

    Ok(URL_SAFE.decode(padded)?)
}
