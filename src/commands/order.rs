//! `mensa order` — show, place and edit today's order

use anyhow::{Context, Result};

use crate::api::menus::Menu;
use crate::api::orders::Order;
use crate::api::ApiClient;
use crate::dates;
use crate::session::Session;

/// Show today's order, if one was placed
pub async fn show(client: &ApiClient, session: &Session) -> Result<()> {
    super::require_login(session)?;
    let user = current_user(session)?;

    match client.current_order(&user.document_id).await? {
        Some(order) => print_order(&order),
        None => println!("No order placed today."),
    }
    Ok(())
}

/// Place today's order
///
/// Items are looked up by name on today's menu; ordering is refused after
/// the deadline or when an order already exists (edit instead).
pub async fn place(
    client: &ApiClient,
    session: &Session,
    items: &[String],
    note: Option<&str>,
) -> Result<()> {
    super::require_login(session)?;
    let user = current_user(session)?;

    let menu = client.menu_of_day().await.context("no menu for today")?;
    check_deadline(&menu)?;

    if client.current_order(&user.document_id).await?.is_some() {
        anyhow::bail!("an order already exists for today, use 'mensa order edit' to change it");
    }

    let item_ids = resolve_items(&menu, items)?;
    let order = client.place_order(user.id, &item_ids, note).await?;

    println!("Order placed.");
    print_order(&order);
    Ok(())
}

/// Replace the items of today's order
pub async fn edit(
    client: &ApiClient,
    session: &Session,
    items: &[String],
    note: Option<&str>,
) -> Result<()> {
    super::require_login(session)?;
    let user = current_user(session)?;

    let menu = client.menu_of_day().await.context("no menu for today")?;
    check_deadline(&menu)?;

    let existing = client
        .current_order(&user.document_id)
        .await?
        .context("no order to edit, use 'mensa order place' first")?;

    let item_ids = resolve_items(&menu, items)?;
    let order = client
        .update_order(&existing.document_id, &item_ids, note)
        .await?;

    println!("Order updated.");
    print_order(&order);
    Ok(())
}

fn current_user(session: &Session) -> Result<crate::api::auth::UserProfile> {
    session
        .user()
        .context("session has no user profile, run 'mensa login' again")
}

fn check_deadline(menu: &Menu) -> Result<()> {
    if dates::is_deadline_passed(menu.day, menu.deadline) {
        let local = dates::deadline_local(menu.day, menu.deadline);
        anyhow::bail!("ordering closed at {}", local.format("%H:%M"));
    }
    Ok(())
}

/// Map item names (case-insensitive) to document ids on today's menu
fn resolve_items(menu: &Menu, names: &[String]) -> Result<Vec<String>> {
    if names.is_empty() {
        anyhow::bail!("an order needs at least one item (--item <NAME>)");
    }

    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let found = menu
            .items
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case(name));
        match found {
            Some(item) => ids.push(item.document_id.clone()),
            None => anyhow::bail!(
                "'{}' is not on today's menu (available: {})",
                name,
                menu.items
                    .iter()
                    .map(|i| i.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
    Ok(ids)
}

fn print_order(order: &Order) {
    for item in &order.items {
        println!("  - {}", item.name);
    }
    if let Some(note) = &order.note {
        if !note.is_empty() {
            println!("  note: {}", note);
        }
    }
}
