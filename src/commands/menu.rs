//! `mensa menu` — today's menu with the ordering deadline

use anyhow::Result;
use std::collections::BTreeMap;

use crate::api::menus::Menu;
use crate::api::{ApiClient, ApiError};
use crate::dates;
use crate::session::Session;

/// Show today's menu; with `watch`, keep a countdown running until the
/// deadline passes
pub async fn show(client: &ApiClient, session: &Session, watch: bool) -> Result<()> {
    super::require_login(session)?;

    let menu = match client.menu_of_day().await {
        Ok(menu) => menu,
        Err(ApiError::NotFound) => {
            println!("No menu published for today.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    print_menu(&menu);

    if !watch {
        return Ok(());
    }

    let deadline = dates::deadline_instant(menu.day, menu.deadline);
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
    loop {
        ticker.tick().await;
        let now = chrono::Utc::now();
        if now >= deadline {
            println!("\rOrdering is closed.                    ");
            return Ok(());
        }
        print!("\rTime left to order: {}    ", dates::time_until(deadline, now));
        use std::io::Write;
        let _ = std::io::stdout().flush();
    }
}

fn print_menu(menu: &Menu) {
    println!("Menu for {}", menu.day.format("%A %d %B %Y"));

    let local = dates::deadline_local(menu.day, menu.deadline);
    if dates::is_deadline_passed(menu.day, menu.deadline) {
        println!("Ordering closed at {}.", local.format("%H:%M"));
    } else {
        let deadline = dates::deadline_instant(menu.day, menu.deadline);
        println!(
            "Order by {} ({} left).",
            local.format("%H:%M"),
            dates::time_until(deadline, chrono::Utc::now())
        );
    }
    println!();

    for (category, items) in group_by_category(menu) {
        println!("{}:", category);
        for item in items {
            println!("  - {}", item);
        }
    }
}

/// Group item names under their category name, in category display order
fn group_by_category(menu: &Menu) -> Vec<(String, Vec<String>)> {
    let mut groups: BTreeMap<(i64, String), Vec<String>> = BTreeMap::new();
    for item in &menu.items {
        let key = match &item.category {
            Some(c) => (c.order, c.name.clone()),
            None => (i64::MAX, "Other".to_string()),
        };
        groups.entry(key).or_default().push(item.name.clone());
    }

    groups
        .into_iter()
        .map(|((_, name), items)| (name, items))
        .collect()
}
