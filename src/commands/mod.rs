//! Command implementations for the mensa CLI

pub mod admin;
pub mod configure;
pub mod login;
pub mod menu;
pub mod order;
pub mod token;

use anyhow::Result;

use crate::api::auth::UserProfile;
use crate::session::Session;

/// Require an authenticated session, or tell the user how to get one
pub fn require_login(session: &Session) -> Result<()> {
    if !session.is_authenticated() {
        anyhow::bail!("not logged in, run 'mensa login <identifier>' first");
    }
    Ok(())
}

/// Require the Admin role for the commands under `mensa admin`
///
/// The cached profile is used when present; otherwise it is refetched so a
/// role change on the backend takes effect without a fresh login.
pub async fn require_admin(session: &Session) -> Result<UserProfile> {
    require_login(session)?;

    let profile = match session.user() {
        Some(profile) => profile,
        None => session.refresh_profile().await?,
    };

    if !profile.is_admin() {
        anyhow::bail!("this command requires the Admin role");
    }
    Ok(profile)
}
