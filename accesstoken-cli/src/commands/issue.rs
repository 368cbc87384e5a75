use crate::error::Result;
use accesstoken::{
    algorithm_from_config, AccessToken, AccessTokenConfig, IpMessagingGrant, IssuedToken,
};
use std::path::PathBuf;
use tracing::debug;

/// Options of the `issue` command
#[derive(Debug, Default)]
pub struct IssueArgs {
    pub config: Option<PathBuf>,
    pub prefix: String,
    pub identity: Option<String>,
    pub video_sid: Option<String>,
    pub service_sid: Option<String>,
    pub endpoint_id: Option<String>,
    pub ttl: Option<i64>,
    pub nbf: Option<i64>,
    pub algorithm: Option<String>,
}

pub fn handle_issue_command(args: IssueArgs) -> Result<()> {
    let issued = issue(args)?;
    println!("{}", serde_json::to_string_pretty(&issued)?);
    Ok(())
}

fn load_config(args: &IssueArgs) -> Result<AccessTokenConfig> {
    let base = match &args.config {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration file");
            AccessTokenConfig::from_path(path)?
        }
        None => {
            debug!(prefix = %args.prefix, "loading configuration from environment");
            AccessTokenConfig::from_env_or_file(&args.prefix)?
        }
    };

    let mut builder = base.to_builder();
    if let Some(identity) = &args.identity {
        builder = builder.identity(identity);
    }
    if let Some(video_sid) = &args.video_sid {
        builder = builder.video_sid(video_sid);
    }
    if let Some(ttl) = args.ttl {
        builder = builder.ttl(ttl);
    }
    if let Some(algorithm) = &args.algorithm {
        builder = builder.algorithm(algorithm);
    }
    Ok(builder.build()?)
}

fn issue(args: IssueArgs) -> Result<IssuedToken> {
    let config = load_config(&args)?;
    let algorithm = algorithm_from_config(&config)?;

    let mut token = AccessToken::from_config(&config);
    if let Some(service_sid) = args.service_sid {
        let mut grant = IpMessagingGrant::for_service(service_sid);
        if let Some(endpoint_id) = args.endpoint_id {
            grant = grant.with_endpoint_id(endpoint_id);
        }
        token.add_grant(grant);
    }
    if let Some(nbf) = args.nbf {
        token = token.with_not_before(nbf);
    }

    Ok(IssuedToken {
        identity: token.identity().to_string(),
        token: token.to_jwt(algorithm)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use accesstoken::{decode, Algorithm, TokenError, Validation};
    use std::fs;

    fn config_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"account_sid":"AC123","api_key":"SK123","api_secret":"secret","identity":"cli.sample"}"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_issue_from_file_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let args = IssueArgs {
            config: Some(config_file(&dir)),
            video_sid: Some("VS123".to_string()),
            service_sid: Some("IS123".to_string()),
            endpoint_id: Some("cli:device".to_string()),
            nbf: Some(10),
            algorithm: Some("HS512".to_string()),
            ..IssueArgs::default()
        };

        let issued = issue(args).unwrap();
        assert_eq!(issued.identity, "cli.sample");

        let claims = decode(&issued.token, b"secret", &Validation::new(Algorithm::Hs512)).unwrap();
        assert_eq!(claims["nbf"].as_i64(), Some(10));
        let grants = claims["grants"].as_map().unwrap();
        assert!(grants.contains_key("rtc"));
        assert_eq!(
            grants["ip_messaging"].as_map().unwrap()["endpoint_id"].as_str(),
            Some("cli:device")
        );
    }

    #[test]
    fn test_issue_rejects_unknown_algorithm() {
        let dir = tempfile::tempdir().unwrap();
        let args = IssueArgs {
            config: Some(config_file(&dir)),
            algorithm: Some("RS256".to_string()),
            ..IssueArgs::default()
        };
        match issue(args) {
            Err(CliError::Sdk(accesstoken::SdkError::Token(TokenError::UnsupportedAlgorithm(
                id,
            )))) => assert_eq!(id, "RS256"),
            other => panic!("expected unsupported algorithm, got {other:?}"),
        }
    }

    #[test]
    fn test_issue_rejects_overflowing_ttl() {
        let dir = tempfile::tempdir().unwrap();
        let args = IssueArgs {
            config: Some(config_file(&dir)),
            ttl: Some(i64::MAX),
            ..IssueArgs::default()
        };
        assert!(matches!(
            issue(args),
            Err(CliError::Token(TokenError::InvalidClaim(_)))
        ));
    }

    #[test]
    fn test_issue_rejects_bad_ttl_override() {
        let dir = tempfile::tempdir().unwrap();
        for ttl in [0, -60] {
            let args = IssueArgs {
                config: Some(config_file(&dir)),
                ttl: Some(ttl),
                ..IssueArgs::default()
            };
            assert!(matches!(
                issue(args),
                Err(CliError::Config(accesstoken::ConfigError::InvalidTtl(t))) if t == ttl
            ));
        }
    }
}
