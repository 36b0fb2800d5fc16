//! `mensa admin menus` — menu management

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};

use crate::api::menus::{MenuFilters, MenuUpdate};
use crate::api::ApiClient;
use crate::dates;
use crate::session::Session;

/// List menus in a day range (defaults to everything)
pub async fn list(
    client: &ApiClient,
    session: &Session,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    super::super::require_admin(session).await?;

    let menus = client.list_menus(MenuFilters { from, to }).await?;
    if menus.is_empty() {
        println!("No menus found.");
        return Ok(());
    }

    for menu in &menus {
        let local = dates::deadline_local(menu.day, menu.deadline);
        println!(
            "{}  deadline {}  {} item(s)  {}",
            menu.day,
            local.format("%H:%M"),
            menu.items.len(),
            menu.document_id
        );
    }
    Ok(())
}

/// Create a menu for a day with the default deadline
pub async fn create(client: &ApiClient, session: &Session, day: NaiveDate) -> Result<()> {
    super::super::require_admin(session).await?;

    if client.menu_by_date(day).await?.is_some() {
        anyhow::bail!("a menu for {} already exists", day);
    }

    let menu = client.create_menu(day, None).await?;
    println!("Created menu for {} ({}).", menu.day, menu.document_id);
    Ok(())
}

/// Update a menu's day or deadline
///
/// The deadline is given as local `HH:MM` and stored as UTC.
pub async fn update(
    client: &ApiClient,
    session: &Session,
    menu_id: &str,
    day: Option<NaiveDate>,
    deadline: Option<&str>,
) -> Result<()> {
    super::super::require_admin(session).await?;

    if day.is_none() && deadline.is_none() {
        anyhow::bail!("nothing to update, pass --day or --deadline");
    }

    let deadline_utc = match deadline {
        Some(raw) => {
            let local = NaiveTime::parse_from_str(raw, "%H:%M")
                .with_context(|| format!("invalid deadline '{}', expected HH:MM", raw))?;
            // Anchor the offset to the day the deadline will apply to
            let anchor = match day {
                Some(day) => day,
                None => client.get_menu(menu_id).await?.day,
            };
            Some(dates::local_time_to_utc(anchor, local))
        }
        None => None,
    };

    let menu = client
        .update_menu(
            menu_id,
            MenuUpdate {
                day,
                deadline_utc,
                items: None,
            },
        )
        .await?;
    println!("Updated menu for {}.", menu.day);
    Ok(())
}

pub async fn delete(client: &ApiClient, session: &Session, menu_id: &str) -> Result<()> {
    super::super::require_admin(session).await?;

    client.delete_menu(menu_id).await?;
    println!("Deleted menu {}.", menu_id);
    Ok(())
}

pub async fn add_item(
    client: &ApiClient,
    session: &Session,
    menu_id: &str,
    item_id: &str,
) -> Result<()> {
    super::super::require_admin(session).await?;

    let menu = client.add_menu_item(menu_id, item_id).await?;
    println!("Menu for {} now has {} item(s).", menu.day, menu.items.len());
    Ok(())
}

pub async fn remove_item(
    client: &ApiClient,
    session: &Session,
    menu_id: &str,
    item_id: &str,
) -> Result<()> {
    super::super::require_admin(session).await?;

    let menu = client.remove_menu_item(menu_id, item_id).await?;
    println!("Menu for {} now has {} item(s).", menu.day, menu.items.len());
    Ok(())
}
