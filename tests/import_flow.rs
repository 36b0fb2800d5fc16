//! CSV menu import against an in-process mock backend

mod common;

use mensa::commands::admin::import::{import_sheet, parse_sheet};
use mensa::session::store::SessionStore;
use mensa::{ApiClient, Session};
use tempfile::TempDir;

const SHEET: &str = "\
giorno,primo,secondo,contorno,dessert\n\
lunedì,Lasagne,Arrosto,,\n\
,Risotto,,,\n\
venerdì,Pasta al pesto,Orata,Insalata,\n";

fn seed_categories(server: &common::MockServer) {
    server.lock().categories = vec![
        ("c1".into(), "Primo".into(), 1),
        ("c2".into(), "Secondo".into(), 2),
        ("c3".into(), "Contorno".into(), 3),
        ("c4".into(), "Dessert".into(), 4),
    ];
}

async fn admin_client(server: &common::MockServer, temp: &TempDir) -> ApiClient {
    let session = Session::with_store(
        server.base_url(),
        reqwest::Client::new(),
        SessionStore::at(temp.path().join("session.json")),
    );
    session.login("admin", "secret").await.unwrap();
    ApiClient::with_base(server.base_url(), session)
}

#[tokio::test]
async fn import_creates_menus_for_every_matching_date() {
    let server = common::spawn().await;
    seed_categories(&server);
    let temp = TempDir::new().unwrap();
    let client = admin_client(&server, &temp).await;

    let sheet = parse_sheet(SHEET.as_bytes()).unwrap();
    let summary = import_sheet(&client, &sheet, 2025, 3).await.unwrap();

    // March 2025: five Mondays, four Fridays
    assert_eq!(summary.menus_created, 9);
    assert_eq!(summary.menus_skipped, 0);
    // Three Monday dishes plus three Friday dishes, each created once
    assert_eq!(summary.products_created, 6);

    let state = server.lock();
    assert_eq!(state.menus.len(), 9);
    assert!(state.menus.iter().any(|(day, _)| day == "2025-03-31"));

    // Every Monday menu links the same three products
    let monday_items: Vec<&Vec<String>> = state
        .menus
        .iter()
        .filter(|(day, _)| ["2025-03-03", "2025-03-10", "2025-03-17", "2025-03-24", "2025-03-31"].contains(&day.as_str()))
        .map(|(_, items)| items)
        .collect();
    assert_eq!(monday_items.len(), 5);
    assert!(monday_items.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(monday_items[0].len(), 3);
}

#[tokio::test]
async fn import_reuses_existing_products_and_skips_existing_menus() {
    let server = common::spawn().await;
    seed_categories(&server);
    {
        let mut state = server.lock();
        state.products = vec![
            ("p1".into(), "lasagne".into(), "Primo".into()),
            ("p2".into(), "Arrosto".into(), "Secondo".into()),
        ];
        state.menus = vec![("2025-03-03".into(), vec!["p1".into()])];
    }
    let temp = TempDir::new().unwrap();
    let client = admin_client(&server, &temp).await;

    let sheet = parse_sheet(
        "giorno,primo,secondo\nlunedì,Lasagne,Arrosto\n".as_bytes(),
    )
    .unwrap();
    let summary = import_sheet(&client, &sheet, 2025, 3).await.unwrap();

    // Existing products matched case-insensitively, nothing recreated
    assert_eq!(summary.products_created, 0);
    // March 3rd already had a menu
    assert_eq!(summary.menus_skipped, 1);
    assert_eq!(summary.menus_created, 4);

    let state = server.lock();
    assert_eq!(state.products.len(), 2);
    assert!(state
        .menus
        .iter()
        .filter(|(day, _)| day == "2025-03-03")
        .count() == 1);
}

#[tokio::test]
async fn fully_covered_month_creates_no_products() {
    let server = common::spawn().await;
    seed_categories(&server);
    {
        let mut state = server.lock();
        // Every Monday of March 2025 already has a menu
        state.menus = ["2025-03-03", "2025-03-10", "2025-03-17", "2025-03-24", "2025-03-31"]
            .iter()
            .map(|day| (day.to_string(), vec!["p9".to_string()]))
            .collect();
    }
    let temp = TempDir::new().unwrap();
    let client = admin_client(&server, &temp).await;

    let sheet = parse_sheet("giorno,primo\nlunedì,Lasagne\n".as_bytes()).unwrap();
    let summary = import_sheet(&client, &sheet, 2025, 3).await.unwrap();

    assert_eq!(summary.menus_created, 0);
    assert_eq!(summary.menus_skipped, 5);
    // Nothing to create means no catalog writes at all
    assert_eq!(summary.products_created, 0);
    let state = server.lock();
    assert!(state.products.is_empty());
    assert_eq!(state.menus.len(), 5);
}

#[tokio::test]
async fn import_fails_on_unknown_category() {
    let server = common::spawn().await;
    // Only Primo exists
    server.lock().categories = vec![("c1".into(), "Primo".into(), 1)];
    let temp = TempDir::new().unwrap();
    let client = admin_client(&server, &temp).await;

    let sheet = parse_sheet("giorno,primo,dessert\nlunedì,Lasagne,Tiramisù\n".as_bytes()).unwrap();
    let err = import_sheet(&client, &sheet, 2025, 3).await.unwrap_err();
    assert!(err.to_string().contains("dessert"));

    // Nothing was created for the failed weekday
    assert!(server.lock().menus.is_empty());
}
