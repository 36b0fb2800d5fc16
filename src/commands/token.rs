//! `mensa token` — inspect the stored access token

use anyhow::{Context, Result};
use jsonwebtoken::decode_header;

use crate::session::{jwt, Session};

/// Decode and display the stored access token (header, claims, validity)
///
/// Display only; the signature is never verified client-side.
pub fn show(session: &Session) -> Result<()> {
    super::require_login(session)?;

    let token = session
        .token()
        .context("no access token in the current session")?;

    let header = decode_header(&token).context("Failed to decode JWT header")?;
    println!("Header:");
    println!("  alg: {:?}", header.alg);
    println!("  typ: {}", header.typ.unwrap_or_else(|| "JWT".to_string()));
    println!();

    let claims = jwt::decode_claims(&token).context("Failed to decode JWT payload")?;
    println!("Claims:");
    if let Some(sub) = &claims.sub {
        println!("  sub: {}", sub);
    }
    if let Some(iat) = claims.iat {
        println!("  iat: {}", format_timestamp(iat));
    }
    if let Some(exp) = claims.exp {
        println!("  exp: {}", format_timestamp(exp));
    }
    println!();

    println!("Status: {}", validation_status(&token));
    Ok(())
}

fn format_timestamp(secs: i64) -> String {
    match chrono::DateTime::from_timestamp(secs, 0) {
        Some(dt) => format!("{} ({})", secs, dt.to_rfc3339()),
        None => format!("{} (out of range)", secs),
    }
}

fn validation_status(token: &str) -> String {
    let now = chrono::Utc::now();
    match jwt::expiration(token) {
        None => "INVALID (no expiration claim)".to_string(),
        Some(exp) if exp <= now => "EXPIRED".to_string(),
        Some(exp) => {
            let remaining = exp - now;
            let hours = remaining.num_hours();
            let minutes = remaining.num_minutes() % 60;
            if hours > 0 {
                format!("VALID (expires in {}h {}m)", hours, minutes)
            } else if minutes > 0 {
                format!("VALID (expires in {}m)", minutes)
            } else {
                format!("VALID (expires in {}s)", remaining.num_seconds())
            }
        }
    }
}
