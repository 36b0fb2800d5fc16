//! `mensa admin users` — account management

use anyhow::Result;
use chrono::{Datelike, TimeZone, Utc};

use crate::api::ApiClient;
use crate::session::Session;

/// List users with their order count for the given month
/// (defaults to the current month)
pub async fn list(
    client: &ApiClient,
    session: &Session,
    search: Option<&str>,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<()> {
    super::super::require_admin(session).await?;

    let now = Utc::now();
    let year = year.unwrap_or_else(|| now.year());
    let month = month.unwrap_or_else(|| now.month());
    let (from, to) = month_bounds(year, month)?;

    let users = client.list_users(search, from, to).await?;
    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    println!("{:<6} {:<24} {:<32} {:<14} orders ({}-{:02})", "id", "username", "email", "role", year, month);
    for user in &users {
        println!(
            "{:<6} {:<24} {:<32} {:<14} {}{}",
            user.id,
            user.username,
            user.email,
            user.role.as_ref().map(|r| r.name.as_str()).unwrap_or("-"),
            user.order_count(),
            if user.blocked { "  [blocked]" } else { "" }
        );
    }
    Ok(())
}

/// Show one account
pub async fn show(client: &ApiClient, session: &Session, user_id: i64) -> Result<()> {
    super::super::require_admin(session).await?;

    let user = client.get_user(user_id).await?;
    println!("Id:       {}", user.id);
    println!("Username: {}", user.username);
    println!("Email:    {}", user.email);
    println!(
        "Role:     {}",
        user.role.as_ref().map(|r| r.name.as_str()).unwrap_or("-")
    );
    println!("Blocked:  {}", user.blocked);
    Ok(())
}

pub async fn create(
    client: &ApiClient,
    session: &Session,
    username: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    super::super::require_admin(session).await?;

    let user = client.create_user(username, email, password).await?;
    println!("Created user {} (id {}).", user.username, user.id);
    Ok(())
}

pub async fn update(
    client: &ApiClient,
    session: &Session,
    user_id: i64,
    email: Option<&str>,
    password: Option<&str>,
    blocked: Option<bool>,
) -> Result<()> {
    super::super::require_admin(session).await?;

    if email.is_none() && password.is_none() && blocked.is_none() {
        anyhow::bail!("nothing to update, pass --email, --password or --blocked");
    }

    let user = client.update_user(user_id, email, password, blocked).await?;
    println!("Updated user {} (id {}).", user.username, user.id);
    Ok(())
}

pub async fn delete(client: &ApiClient, session: &Session, user_id: i64) -> Result<()> {
    super::super::require_admin(session).await?;

    client.delete_user(user_id).await?;
    println!("Deleted user {}.", user_id);
    Ok(())
}

/// UTC bounds of a calendar month, for the order-count filter
fn month_bounds(
    year: i32,
    month: u32,
) -> Result<(chrono::DateTime<Utc>, chrono::DateTime<Utc>)> {
    let start = chrono::NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| anyhow::anyhow!("invalid month {}-{}", year, month))?;
    let next = if month == 12 {
        chrono::NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        chrono::NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| anyhow::anyhow!("invalid month {}-{}", year, month))?;
    let end = next.pred_opt().unwrap_or(start);

    Ok((
        Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0).unwrap_or_default()),
        Utc.from_utc_datetime(&end.and_hms_milli_opt(23, 59, 59, 999).unwrap_or_default()),
    ))
}
