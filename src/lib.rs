//! # AccessToken
//!
//! Issue and verify signed access tokens for real-time communication and
//! messaging services.
//!
//! An access token is a compact HMAC-signed JWT. It is issued by an API key
//! on behalf of an account, carries the identity of the client it was handed
//! to, and lists the services that client may use as grants.
//!
//! ## Issuing a token
//!
//! ```
//! use accesstoken::{AccessToken, ConversationsGrant, IpMessagingGrant, DEFAULT_ALGORITHM};
//!
//! # fn main() -> Result<(), accesstoken::SdkError> {
//! let mut token = AccessToken::new("ACxxx", "SKxxx", "api-secret").with_identity("alice");
//! token.add_grant(ConversationsGrant::new("VSxxx"));
//! token.add_grant(IpMessagingGrant::for_service("ISxxx"));
//!
//! let jwt = token.to_jwt(DEFAULT_ALGORITHM)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Verifying a token
//!
//! Verification always names the algorithms the verifier accepts; the `alg`
//! header of an incoming token is never trusted on its own.
//!
//! ```
//! use accesstoken::{decode, AccessToken, Algorithm, Validation};
//!
//! # fn main() -> Result<(), accesstoken::SdkError> {
//! let jwt = AccessToken::new("ACxxx", "SKxxx", "api-secret").to_jwt(Algorithm::Hs256)?;
//! let claims = decode(&jwt, b"api-secret", &Validation::new(Algorithm::Hs256))?;
//! assert_eq!(claims["iss"].as_str(), Some("SKxxx"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Issuing from configuration
//!
//! ```no_run
//! use accesstoken::{issue_from_config, AccessTokenConfig};
//!
//! # fn main() -> Result<(), accesstoken::SdkError> {
//! // TW_ACCOUNT_SID, TW_API_KEY, TW_API_SECRET, TW_VIDEO_SID, ...
//! let config = AccessTokenConfig::from_env("TW")?;
//! let issued = issue_from_config(&config)?;
//! println!("{}", issued.token);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod access_token;
mod grant;

pub use access_token::{AccessToken, CONTENT_TYPE, DEFAULT_ALGORITHM};
pub use grant::{ConversationsGrant, Grant, IpMessagingGrant};

pub use accesstoken_config::{
    try_load_default_config, AccessTokenConfig, AccessTokenConfigBuilder, ConfigError, DEFAULT_TTL,
};
pub use accesstoken_jwt::{
    claims, decode, decode_header, encode, Algorithm, ClaimMap, ClaimValue, Claims, ErrorKind,
    Header, TokenError, Validation,
};

/// Errors returned by the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// A freshly issued token together with the identity it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub identity: String,
    pub token: String,
}

/// The signing algorithm named by `config`, or [`DEFAULT_ALGORITHM`].
///
/// # Errors
///
/// Returns [`TokenError::UnsupportedAlgorithm`] if the configured id is unknown.
pub fn algorithm_from_config(config: &AccessTokenConfig) -> Result<Algorithm, SdkError> {
    match &config.algorithm {
        Some(id) => Ok(Algorithm::resolve(id)?),
        None => Ok(DEFAULT_ALGORITHM),
    }
}

/// Issue a token from `config`, signed with the configured algorithm.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the algorithm is
/// unknown or unavailable.
pub fn issue_from_config(config: &AccessTokenConfig) -> Result<IssuedToken, SdkError> {
    config.validate()?;
    let algorithm = algorithm_from_config(config)?;
    let token = AccessToken::from_config(config);
    Ok(IssuedToken {
        identity: token.identity().to_string(),
        token: token.to_jwt(algorithm)?,
    })
}
