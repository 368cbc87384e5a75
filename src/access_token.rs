use accesstoken_config::{AccessTokenConfig, DEFAULT_TTL};
use accesstoken_jwt::{encode, Algorithm, ClaimMap, ClaimValue, Claims, Header, TokenError};
use chrono::Utc;
use tracing::info;

use crate::grant::{ConversationsGrant, Grant};

/// Algorithm callers use when they have no preference.
///
/// The codec never falls back to it on its own; pass it explicitly.
pub const DEFAULT_ALGORITHM: Algorithm = Algorithm::Hs256;

/// Content type header sent with every access token.
pub const CONTENT_TYPE: &str = "twilio-fpa;v=1";

/// A signed credential granting access to one or more services.
///
/// The token is issued by an API key (`iss`) on behalf of an account (`sub`)
/// and carries an identity plus any number of service grants.
///
/// # Example
///
/// ```
/// use accesstoken::{AccessToken, ConversationsGrant, DEFAULT_ALGORITHM};
///
/// let token = AccessToken::new("ACxxx", "SKxxx", "secret")
///     .with_identity("alice")
///     .with_grant(ConversationsGrant::new("VSxxx"))
///     .to_jwt(DEFAULT_ALGORITHM)?;
/// assert_eq!(token.split('.').count(), 3);
/// # Ok::<(), accesstoken::TokenError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AccessToken {
    account_sid: String,
    api_key: String,
    api_secret: String,
    identity: String,
    ttl: i64,
    not_before: Option<i64>,
    grants: Vec<Grant>,
}

impl AccessToken {
    /// Create a token with no identity, no grants and a one hour lifetime.
    pub fn new(
        account_sid: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            account_sid: account_sid.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            identity: String::new(),
            ttl: DEFAULT_TTL,
            not_before: None,
            grants: Vec::new(),
        }
    }

    /// Create a token from issuer configuration.
    ///
    /// The configured identity and TTL are applied, and a video grant is
    /// attached when `video_sid` is set.
    pub fn from_config(config: &AccessTokenConfig) -> Self {
        let mut token = Self::new(&config.account_sid, &config.api_key, &config.api_secret)
            .with_ttl(config.ttl_or_default());
        if let Some(identity) = &config.identity {
            token.set_identity(identity.as_str());
        }
        if let Some(video_sid) = &config.video_sid {
            token.add_grant(ConversationsGrant::new(video_sid.as_str()));
        }
        token
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn set_identity(&mut self, identity: impl Into<String>) {
        self.identity = identity.into();
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.set_identity(identity);
        self
    }

    /// Lifetime in seconds, counted from the issue time.
    pub fn with_ttl(mut self, ttl: i64) -> Self {
        self.ttl = ttl;
        self
    }

    /// Reject the token before `not_before` (UTC seconds since the epoch).
    pub fn with_not_before(mut self, not_before: i64) -> Self {
        self.not_before = Some(not_before);
        self
    }

    /// Attach a grant to this token
    pub fn add_grant(&mut self, grant: impl Into<Grant>) {
        self.grants.push(grant.into());
    }

    pub fn with_grant(mut self, grant: impl Into<Grant>) -> Self {
        self.add_grant(grant);
        self
    }

    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }

    /// The custom header fields sent alongside `typ` and `alg`.
    pub fn header() -> Header {
        let mut header = Header::new();
        header.insert("cty".to_string(), ClaimValue::from(CONTENT_TYPE));
        header
    }

    /// Expiry time for a token issued at `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidClaim`] if `issued_at + ttl` overflows.
    pub fn expires_at(&self, issued_at: i64) -> Result<i64, TokenError> {
        issued_at.checked_add(self.ttl).ok_or_else(|| {
            TokenError::invalid_claim(format!(
                "exp overflows: issued at {} with a ttl of {}s",
                issued_at, self.ttl
            ))
        })
    }

    /// Build the claims for a token issued at `issued_at` (UTC seconds).
    ///
    /// `grants` is only present when at least one grant is attached; the
    /// identity is written inside it when non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidClaim`] if the expiry overflows.
    pub fn to_claims(&self, issued_at: i64) -> Result<Claims, TokenError> {
        let exp = self.expires_at(issued_at)?;
        let mut claims = Claims::new();
        claims.insert(
            "jti".to_string(),
            ClaimValue::from(format!("{}-{}", self.api_key, issued_at)),
        );
        claims.insert("iss".to_string(), ClaimValue::from(self.api_key.as_str()));
        claims.insert(
            "sub".to_string(),
            ClaimValue::from(self.account_sid.as_str()),
        );
        claims.insert("exp".to_string(), ClaimValue::from(exp));

        if !self.grants.is_empty() {
            let mut grants = ClaimMap::new();
            if !self.identity.is_empty() {
                grants.insert(
                    "identity".to_string(),
                    ClaimValue::from(self.identity.as_str()),
                );
            }
            for grant in &self.grants {
                grants.insert(grant.key().to_string(), ClaimValue::from(grant.to_payload()));
            }
            claims.insert("grants".to_string(), ClaimValue::from(grants));
        }

        if let Some(not_before) = self.not_before {
            claims.insert("nbf".to_string(), ClaimValue::from(not_before));
        }

        Ok(claims)
    }

    /// Sign the token, issued now.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] if `algorithm` is unavailable in this build or
    /// the expiry overflows.
    pub fn to_jwt(&self, algorithm: Algorithm) -> Result<String, TokenError> {
        self.to_jwt_at(algorithm, Utc::now().timestamp())
    }

    /// Sign the token with an explicit issue time.
    pub fn to_jwt_at(&self, algorithm: Algorithm, issued_at: i64) -> Result<String, TokenError> {
        let exp = self.expires_at(issued_at)?;
        let claims = self.to_claims(issued_at)?;
        let token = encode(
            &claims,
            self.api_secret.as_bytes(),
            algorithm,
            Some(&Self::header()),
        )?;

        info!(
            iss = %self.api_key,
            sub = %self.account_sid,
            grants = self.grants.len(),
            exp,
            "issued access token"
        );

        Ok(token)
    }
}
