use crate::error::{CliError, Result};
use accesstoken::{decode, decode_header, Algorithm, Validation};
use colored::Colorize;
use std::io::{self, Read};

/// Read the token argument, or stdin when it is "-"
fn read_token(token: &str) -> Result<String> {
    if token == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf.trim().to_string())
    } else {
        Ok(token.trim().to_string())
    }
}

fn build_validation(algorithms: &[String], no_verify: bool) -> Result<Validation> {
    if no_verify {
        return Ok(Validation::unverified());
    }
    let algorithms = algorithms
        .iter()
        .map(|id| Algorithm::resolve(id))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Validation::with_algorithms(algorithms))
}

pub fn handle_decode_command(
    token: &str,
    secret: Option<String>,
    algorithms: &[String],
    no_verify: bool,
    verbose: bool,
) -> Result<()> {
    let token = read_token(token)?;
    let validation = build_validation(algorithms, no_verify)?;

    let secret = match secret {
        Some(secret) => secret,
        None if no_verify => String::new(),
        None => {
            return Err(CliError::InvalidInput(
                "a secret is required to verify the token (use --secret, TW_API_SECRET or --no-verify)"
                    .to_string(),
            ))
        }
    };

    let claims = decode(&token, secret.as_bytes(), &validation)?;

    if verbose {
        if validation.verifies_signature() {
            eprintln!("{} Signature verified", "✓".green());
        } else {
            eprintln!("{} Signature not verified", "!".yellow());
        }
    }

    println!("{}", serde_json::to_string_pretty(&claims)?);
    Ok(())
}

pub fn handle_header_command(token: &str) -> Result<()> {
    let token = read_token(token)?;
    let header = decode_header(&token)?;
    println!("{}", serde_json::to_string_pretty(&header)?);
    Ok(())
}
