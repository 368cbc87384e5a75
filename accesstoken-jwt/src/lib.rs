//! # AccessToken JWT
//!
//! Compact codec for HMAC-signed JSON Web Tokens.
//!
//! A token is three base64url segments joined by dots: the JSON header, the
//! JSON claims and the raw HMAC signature over the first two segments. This
//! crate encodes and decodes that format and verifies signatures. It has no
//! networking dependencies and keeps no state between calls.
//!
//! ## Features
//!
//! - Token encoding: sign a claims map with `HS256`, `HS384` or `HS512`
//! - Token decoding: split, decode and optionally verify a token
//! - Algorithm pinning: verification only accepts algorithms the caller allows
//! - Constant-time signature comparison
//!
//! ## Usage
//!
//! ```
//! use accesstoken_jwt::{claims, decode, encode, Algorithm, Validation};
//!
//! fn main() -> Result<(), accesstoken_jwt::TokenError> {
//!     let secret = b"abvdefghijklmnopqrstuvwxyz01234567";
//!     let body = claims! {
//!         "iss" => "apiKey",
//!         "sub" => "accountSid",
//!         "exp" => 1_700_000_000i64,
//!     };
//!
//!     let token = encode(&body, secret, Algorithm::Hs256, None)?;
//!     let decoded = decode(&token, secret, &Validation::new(Algorithm::Hs256))?;
//!     assert_eq!(decoded, body);
//!     Ok(())
//! }
//! ```

mod algorithm;
mod decode;
mod encode;
mod error;
mod segment;
mod value;

pub use algorithm::Algorithm;
pub use decode::{decode, decode_header, verify_signature, Validation};
pub use encode::{build_header, encode, TOKEN_TYPE};
pub use error::{ErrorKind, TokenError};
pub use segment::{decode_segment, encode_base64url, encode_segment};
pub use value::{ClaimMap, ClaimValue, Claims, Header};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, RngCore};

    const SECRET: &str = "abvdefghijklmnopqrstuvwxyz01234567";

    fn account_claims() -> Claims {
        claims! {
            "iss" => "apiKey",
            "sub" => "accountSid",
            "exp" => 1_700_000_000i64,
            "grants" => claims! {
                "rtc" => claims! { "configuration_profile_sid" => "videoSid" },
                "identity" => "TestAccount",
            },
        }
    }

    #[test]
    fn test_account_token_scenario() {
        let claims = account_claims();
        let token = encode(&claims, SECRET.as_bytes(), Algorithm::Hs256, None).unwrap();

        let segments: Vec<&str> = token.split('.').collect();
        assert_eq!(segments.len(), 3);

        let header: serde_json::Value =
            serde_json::from_slice(&decode_segment(segments[0]).unwrap()).unwrap();
        assert_eq!(header, serde_json::json!({"typ": "JWT", "alg": "HS256"}));

        let validation = Validation::new(Algorithm::Hs256);
        let decoded = decode(&token, SECRET.as_bytes(), &validation).unwrap();
        assert_eq!(decoded, claims);

        let result = decode(&token, b"wrongsecret", &validation);
        assert_eq!(result, Err(TokenError::SignatureVerificationFailure));
    }

    #[test]
    fn test_round_trip_all_algorithms() {
        let samples = vec![
            Claims::new(),
            account_claims(),
            claims! {
                "list" => vec![ClaimValue::from(1i64), ClaimValue::from("two"), ClaimValue::from(false)],
                "nested" => claims! { "deeper" => claims! { "n" => -1i64 } },
                "unicode" => "ñ ✓ 漢字",
            },
        ];

        for alg in Algorithm::available() {
            for claims in &samples {
                let token = encode(claims, SECRET.as_bytes(), alg, None).unwrap();
                let decoded = decode(&token, SECRET.as_bytes(), &Validation::new(alg)).unwrap();
                assert_eq!(&decoded, claims, "round trip failed for {alg}");
            }
        }
    }

    #[test]
    fn test_flipping_any_signature_byte_fails_verification() {
        for alg in Algorithm::available() {
            let token = encode(&account_claims(), SECRET.as_bytes(), alg, None).unwrap();
            let (signing_input, signature) = token.rsplit_once('.').unwrap();
            let raw = decode_segment(signature).unwrap();

            for i in 0..raw.len() {
                let mut tampered = raw.clone();
                tampered[i] ^= 0x01;
                let forged = format!("{signing_input}.{}", encode_base64url(&tampered));
                assert_eq!(
                    decode(&forged, SECRET.as_bytes(), &Validation::new(alg)),
                    Err(TokenError::SignatureVerificationFailure),
                    "flipped byte {i} of a {alg} signature was accepted"
                );
            }
        }
    }

    #[test]
    fn test_random_wrong_keys_never_verify() {
        let token = encode(&account_claims(), SECRET.as_bytes(), Algorithm::Hs256, None).unwrap();
        let validation = Validation::new(Algorithm::Hs256);
        let mut rng = rand::thread_rng();

        for _ in 0..500 {
            let len = rng.gen_range(0..64);
            let mut key = vec![0u8; len];
            rng.fill_bytes(&mut key);
            if key == SECRET.as_bytes() {
                continue;
            }
            let err = decode(&token, &key, &validation).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Signature);
        }
    }

    #[test]
    fn test_algorithm_confusion_is_rejected() {
        let token = encode(&account_claims(), SECRET.as_bytes(), Algorithm::Hs512, None);
        let token = match token {
            Ok(token) => token,
            // hs512 compiled out, nothing to confuse
            Err(TokenError::HashUnavailable(_)) => return,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(
            decode(&token, SECRET.as_bytes(), &Validation::new(Algorithm::Hs256)),
            Err(TokenError::AlgorithmNotAllowed(Algorithm::Hs512))
        );
    }

    #[test]
    fn test_two_and_four_segments() {
        let token = encode(&account_claims(), SECRET.as_bytes(), Algorithm::Hs256, None).unwrap();
        let validation = Validation::new(Algorithm::Hs256);

        let (two, _) = token.rsplit_once('.').unwrap();
        assert_eq!(
            decode(two, SECRET.as_bytes(), &validation),
            Err(TokenError::NotEnoughSegments)
        );

        let four = format!("{token}.{}", encode_base64url(b"more"));
        assert_eq!(
            decode(&four, SECRET.as_bytes(), &validation),
            Err(TokenError::TooManySegments)
        );
    }

    #[test]
    fn test_unverified_decode_ignores_key() {
        let token = encode(&account_claims(), SECRET.as_bytes(), Algorithm::Hs256, None).unwrap();
        let decoded = decode(&token, b"", &Validation::unverified()).unwrap();
        assert_eq!(decoded, account_claims());
    }
}
