use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "accesstoken",
    version,
    about = "Issue and inspect signed access tokens",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Issue a signed access token and print it with its identity as JSON
    Issue {
        /// Configuration file (JSON, or TOML with a .toml extension).
        /// Credentials are read from the environment when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Prefix of the credential environment variables (<PREFIX>_ACCOUNT_SID, ...)
        #[arg(long, default_value = "TW")]
        prefix: String,

        /// Identity to embed in the token
        #[arg(short, long)]
        identity: Option<String>,

        /// Video configuration profile for the rtc grant
        #[arg(long)]
        video_sid: Option<String>,

        /// IP Messaging service for the ip_messaging grant
        #[arg(long)]
        service_sid: Option<String>,

        /// Endpoint id for the ip_messaging grant
        #[arg(long, requires = "service_sid")]
        endpoint_id: Option<String>,

        /// Token lifetime in seconds
        #[arg(long, allow_negative_numbers = true)]
        ttl: Option<i64>,

        /// Not-before time in UTC seconds since the epoch
        #[arg(long, allow_negative_numbers = true)]
        nbf: Option<i64>,

        /// Signing algorithm: HS256, HS384 or HS512
        #[arg(short, long)]
        algorithm: Option<String>,
    },

    /// Decode a token and print its claims as JSON
    Decode {
        /// The token, or "-" to read it from stdin
        token: String,

        /// Shared secret used to verify the signature
        #[arg(long, env = "TW_API_SECRET", hide_env_values = true)]
        secret: Option<String>,

        /// Algorithm the verifier accepts (repeat to accept several)
        #[arg(short, long = "algorithm", default_value = "HS256")]
        algorithms: Vec<String>,

        /// Print the claims without verifying the signature
        #[arg(long)]
        no_verify: bool,
    },

    /// Print the decoded header of a token without verifying it
    Header {
        /// The token, or "-" to read it from stdin
        token: String,
    },
}
