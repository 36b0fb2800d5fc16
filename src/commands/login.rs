//! `mensa login`, `mensa logout`, `mensa whoami`

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

use crate::session::Session;

/// Authenticate and persist the session
///
/// When already logged in this refuses to proceed so that switching
/// accounts stays an explicit logout-then-login.
pub async fn login(session: &Session, identifier: &str, password: Option<String>) -> Result<()> {
    if session.is_authenticated() {
        let who = session
            .user()
            .map(|u| u.username)
            .unwrap_or_else(|| "another user".to_string());
        anyhow::bail!("already logged in as {}, run 'mensa logout' first", who);
    }

    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };

    let profile = session.login(identifier, &password).await?;

    println!(
        "Logged in as {} ({}){}",
        profile.username,
        profile.email,
        if profile.is_admin() { " [admin]" } else { "" }
    );
    Ok(())
}

pub fn logout(session: &Session) -> Result<()> {
    if !session.is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }
    session.logout();
    println!("Logged out.");
    Ok(())
}

/// Show the authenticated user, refetching the profile from the backend
pub async fn whoami(session: &Session) -> Result<()> {
    super::require_login(session)?;

    let profile = session.refresh_profile().await?;
    println!("Username: {}", profile.username);
    println!("Email:    {}", profile.email);
    println!(
        "Role:     {}",
        profile
            .role
            .as_ref()
            .map(|r| r.name.as_str())
            .unwrap_or("unknown")
    );
    Ok(())
}

fn prompt_password() -> Result<String> {
    print!("Password: ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut password = String::new();
    io::stdin()
        .lock()
        .read_line(&mut password)
        .context("Failed to read password from stdin")?;

    let password = password.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("password must not be empty");
    }
    Ok(password)
}
