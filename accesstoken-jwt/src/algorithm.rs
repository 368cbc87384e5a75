use std::fmt;
use std::str::FromStr;

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::Sha256;
#[cfg(feature = "hs384")]
use sha2::Sha384;
#[cfg(feature = "hs512")]
use sha2::Sha512;

use crate::error::TokenError;

/// Keyed-hash signing algorithms understood by the codec.
///
/// The set is closed: resolving any other identifier fails with
/// [`TokenError::UnsupportedAlgorithm`]. `HS384` and `HS512` stay registered
/// when their cargo features are disabled, but report themselves unavailable
/// and fail with [`TokenError::HashUnavailable`] on use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    /// HMAC using SHA-256
    Hs256,
    /// HMAC using SHA-384
    Hs384,
    /// HMAC using SHA-512
    Hs512,
}

impl Algorithm {
    /// Every registered algorithm, available or not.
    pub const ALL: [Algorithm; 3] = [Algorithm::Hs256, Algorithm::Hs384, Algorithm::Hs512];

    /// Look up an algorithm by its `alg` header identifier (e.g. `"HS256"`).
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::UnsupportedAlgorithm`] if `id` is not registered.
    pub fn resolve(id: &str) -> Result<Self, TokenError> {
        match id {
            "HS256" => Ok(Algorithm::Hs256),
            "HS384" => Ok(Algorithm::Hs384),
            "HS512" => Ok(Algorithm::Hs512),
            other => Err(TokenError::unsupported_algorithm(other)),
        }
    }

    /// The identifier written to the `alg` header field.
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Hs256 => "HS256",
            Algorithm::Hs384 => "HS384",
            Algorithm::Hs512 => "HS512",
        }
    }

    /// Whether the hash primitive behind this algorithm is compiled in.
    pub fn is_available(self) -> bool {
        match self {
            Algorithm::Hs256 => true,
            Algorithm::Hs384 => cfg!(feature = "hs384"),
            Algorithm::Hs512 => cfg!(feature = "hs512"),
        }
    }

    /// All algorithms usable in this build.
    pub fn available() -> impl Iterator<Item = Algorithm> {
        Self::ALL.into_iter().filter(|alg| alg.is_available())
    }

    /// Compute the HMAC of `message` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::HashUnavailable`] if the hash is not compiled in.
    pub fn sign(self, key: &[u8], message: &[u8]) -> Result<Vec<u8>, TokenError> {
        match self {
            Algorithm::Hs256 => mac::<Hmac<Sha256>>(key, message),
            #[cfg(feature = "hs384")]
            Algorithm::Hs384 => mac::<Hmac<Sha384>>(key, message),
            #[cfg(feature = "hs512")]
            Algorithm::Hs512 => mac::<Hmac<Sha512>>(key, message),
            #[allow(unreachable_patterns)]
            unavailable => Err(TokenError::HashUnavailable(unavailable)),
        }
    }
}

fn mac<M: Mac + KeyInit>(key: &[u8], message: &[u8]) -> Result<Vec<u8>, TokenError> {
    // HMAC accepts keys of any length
    let mut mac =
        <M as KeyInit>::new_from_slice(key).map_err(|e| TokenError::InvalidKey(e.to_string()))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::resolve(s)
    }
}
