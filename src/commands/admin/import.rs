//! `mensa admin import` — bulk menu creation from a CSV sheet
//!
//! The sheet has one header row with a `giorno` column and one column per
//! dish category (primo, secondo, contorno, dessert). A row's `giorno`
//! cell names an Italian weekday; rows with an empty cell belong to the
//! last named weekday. Every weekday expands to all its dates in the
//! target month, skipping dates that already have a menu.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::path::Path;

use crate::api::{ApiClient, PageRequest};
use crate::session::Session;

/// Italian weekday labels, keyed to days-from-Monday; accent-less
/// spellings are accepted too
const WEEKDAYS: &[(&str, u32)] = &[
    ("lunedì", 0),
    ("lunedi", 0),
    ("martedì", 1),
    ("martedi", 1),
    ("mercoledì", 2),
    ("mercoledi", 2),
    ("giovedì", 3),
    ("giovedi", 3),
    ("venerdì", 4),
    ("venerdi", 4),
    ("sabato", 5),
    ("domenica", 6),
];

const DAY_COLUMN: &str = "giorno";
const DISH_COLUMNS: &[&str] = &["primo", "secondo", "contorno", "dessert"];

#[derive(Debug, Clone)]
struct Dish {
    category: String,
    name: String,
}

/// Dishes grouped by weekday (days from Monday), as parsed from the sheet
#[derive(Debug, Default)]
pub struct MenuSheet {
    by_weekday: std::collections::BTreeMap<u32, Vec<Dish>>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub products_created: usize,
    pub menus_created: usize,
    pub menus_skipped: usize,
}

/// Run the import end to end and print the summary
pub async fn run(
    client: &ApiClient,
    session: &Session,
    path: &Path,
    year: i32,
    month: u32,
) -> Result<()> {
    super::super::require_admin(session).await?;

    if month == 0 || month > 12 {
        anyhow::bail!("invalid month {}", month);
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let sheet = parse_sheet(file)?;

    let summary = import_sheet(client, &sheet, year, month).await?;
    println!(
        "Import complete: {} menu(s) created, {} skipped (already present), {} product(s) created.",
        summary.menus_created, summary.menus_skipped, summary.products_created
    );
    Ok(())
}

/// Parse the CSV into dishes grouped by weekday
pub fn parse_sheet(input: impl std::io::Read) -> Result<MenuSheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut columns: Option<Columns> = None;
    let mut sheet = MenuSheet::default();
    let mut current_weekday: Option<u32> = None;

    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV row {}", idx + 1))?;

        let cols = match &columns {
            Some(cols) => cols,
            None => {
                if let Some(found) = Columns::locate(&record) {
                    columns = Some(found);
                }
                continue;
            }
        };

        let day_cell = record.get(cols.day).unwrap_or("").trim();
        if !day_cell.is_empty() {
            current_weekday = Some(parse_weekday(day_cell)?);
        }
        let Some(weekday) = current_weekday else {
            // Data rows before the first weekday label have no home
            tracing::warn!(row = idx + 1, "skipping row with no weekday");
            continue;
        };

        for (category, col) in &cols.dishes {
            let cell = record.get(*col).unwrap_or("").trim();
            if cell.is_empty() {
                continue;
            }
            sheet.by_weekday.entry(weekday).or_default().push(Dish {
                category: category.clone(),
                name: cell.to_string(),
            });
        }
    }

    if sheet.by_weekday.is_empty() {
        anyhow::bail!("no menu rows found (is there a '{}' header column?)", DAY_COLUMN);
    }
    Ok(sheet)
}

/// Header-row column positions
struct Columns {
    day: usize,
    dishes: Vec<(String, usize)>,
}

impl Columns {
    /// Recognize the header row by its `giorno` column
    fn locate(record: &csv::StringRecord) -> Option<Self> {
        let day = record
            .iter()
            .position(|cell| cell.trim().eq_ignore_ascii_case(DAY_COLUMN))?;

        let dishes = record
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| {
                let cell = cell.trim();
                DISH_COLUMNS
                    .iter()
                    .find(|known| cell.eq_ignore_ascii_case(known))
                    .map(|_| (cell.to_string(), i))
            })
            .collect::<Vec<_>>();

        if dishes.is_empty() {
            return None;
        }
        Some(Self { day, dishes })
    }
}

fn parse_weekday(label: &str) -> Result<u32> {
    let normalized = label.trim().to_lowercase();
    WEEKDAYS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, num)| *num)
        .with_context(|| format!("unknown weekday '{}'", label))
}

/// All dates in a month falling on the given weekday (days from Monday)
fn dates_in_month(year: i32, month: u32, weekday: u32) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut day = 1;
    while let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
        if date.weekday().num_days_from_monday() == weekday {
            dates.push(date);
        }
        day += 1;
    }
    dates
}

/// Create the menus (and any missing products) for the target month
///
/// Existing menus are left alone; a failed existence probe aborts the
/// whole import rather than risking duplicates.
pub async fn import_sheet(
    client: &ApiClient,
    sheet: &MenuSheet,
    year: i32,
    month: u32,
) -> Result<ImportSummary> {
    let categories = client.list_categories().await?;

    // Prefetch the whole catalog so lookups stay local
    let mut cache: HashMap<(String, String), String> = HashMap::new();
    let mut start = 0u32;
    loop {
        let envelope = client
            .list_products(None, PageRequest { start, limit: 100 })
            .await?;
        let fetched = envelope.data.len() as u32;
        for product in envelope.data {
            if let Some(category) = product.category {
                cache.insert(
                    (product.name.to_lowercase(), category.name.to_lowercase()),
                    product.document_id,
                );
            }
        }
        if fetched == 0 {
            break;
        }
        start += fetched;
        let total = envelope
            .meta
            .and_then(|m| m.pagination)
            .and_then(|p| p.total);
        if total.map_or(true, |t| u64::from(start) >= t) {
            break;
        }
    }

    let mut summary = ImportSummary::default();

    for (weekday, dishes) in &sheet.by_weekday {
        // Products are resolved only once a date actually needs a menu, so
        // a fully skipped weekday creates nothing
        let mut item_ids: Option<Vec<String>> = None;

        for date in dates_in_month(year, month, *weekday) {
            if client.menu_by_date(date).await?.is_some() {
                summary.menus_skipped += 1;
                continue;
            }

            if item_ids.is_none() {
                let mut resolved = Vec::with_capacity(dishes.len());
                for dish in dishes {
                    let category = categories
                        .iter()
                        .find(|c| c.name.eq_ignore_ascii_case(&dish.category))
                        .with_context(|| format!("no category named '{}'", dish.category))?;

                    let key = (dish.name.to_lowercase(), category.name.to_lowercase());
                    let id = match cache.get(&key) {
                        Some(id) => id.clone(),
                        None => {
                            let product = client
                                .create_product(&dish.name, &category.document_id)
                                .await?;
                            summary.products_created += 1;
                            tracing::info!(name = %product.name, "created product");
                            cache.insert(key, product.document_id.clone());
                            product.document_id
                        }
                    };
                    resolved.push(id);
                }
                item_ids = Some(resolved);
            }

            client.create_menu(date, item_ids.clone()).await?;
            summary.menus_created += 1;
            tracing::info!(%date, "created menu");
        }
    }

    Ok(summary)
}
