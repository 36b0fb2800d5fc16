//! Daily menus: CRUD, lookup by date, item linking
//!
//! Menus live under `/api/menus` behind the `{ data, meta }` envelope.
//! Items are populated together with their category on every read so the
//! UI can group them; the deadline travels as a UTC `HH:MM:SS` wall time.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;

use super::{ApiClient, ApiError, Envelope, Query};

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    #[serde(rename = "documentId")]
    pub document_id: String,
    pub name: String,
    #[serde(default)]
    pub order: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenuItem {
    #[serde(rename = "documentId")]
    pub document_id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Menu {
    #[serde(rename = "documentId")]
    pub document_id: String,
    pub day: NaiveDate,
    /// UTC wall-clock cutoff for this day's orders
    pub deadline: NaiveTime,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// Optional day-range filter for [`ApiClient::list_menus`]
#[derive(Debug, Default, Clone, Copy)]
pub struct MenuFilters {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Partial update for [`ApiClient::update_menu`]
#[derive(Debug, Default, Clone)]
pub struct MenuUpdate {
    pub day: Option<NaiveDate>,
    /// Already converted to UTC wall time by the caller
    pub deadline_utc: Option<NaiveTime>,
    pub items: Option<Vec<String>>,
}

fn populated() -> Query {
    Query::new().populate_items_with_category()
}

impl ApiClient {
    /// List menus, optionally restricted to a day range
    pub async fn list_menus(&self, filters: MenuFilters) -> Result<Vec<Menu>, ApiError> {
        let mut query = populated();
        if let Some(from) = filters.from {
            query = query.filter("day", "gte", from);
        }
        if let Some(to) = filters.to {
            query = query.filter("day", "lte", to);
        }

        let envelope: Envelope<Vec<Menu>> = self.get("api/menus", &query).await?;
        Ok(envelope.data)
    }

    /// Fetch the menu for an exact date
    ///
    /// `Ok(None)` means confirmed absence (no matching menu, or the backend
    /// answered 404); any other failure is surfaced so callers never
    /// mistake a broken lookup for "does not exist".
    pub async fn menu_by_date(&self, date: NaiveDate) -> Result<Option<Menu>, ApiError> {
        let query = populated().filter("day", "eq", date);

        match self.get::<Envelope<Vec<Menu>>>("api/menus", &query).await {
            Ok(envelope) => Ok(envelope.data.into_iter().next()),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Fetch one menu by document id
    pub async fn get_menu(&self, menu_id: &str) -> Result<Menu, ApiError> {
        let envelope: Envelope<Menu> = self
            .get(&format!("api/menus/{}", menu_id), &populated())
            .await?;
        Ok(envelope.data)
    }

    /// Today's menu; absence is an error here because the menu view has
    /// nothing to show without one
    pub async fn menu_of_day(&self) -> Result<Menu, ApiError> {
        self.menu_by_date(crate::dates::today_local())
            .await?
            .ok_or(ApiError::NotFound)
    }

    /// Create a menu for a day, linking the given product ids
    ///
    /// New menus get the default deadline (09:30 local, stored UTC).
    pub async fn create_menu(
        &self,
        day: NaiveDate,
        items: Option<Vec<String>>,
    ) -> Result<Menu, ApiError> {
        let mut data = json!({
            "day": day,
            "deadline": crate::dates::default_deadline_utc(day).format("%H:%M:%S").to_string(),
        });
        if let Some(items) = items {
            data["items"] = json!({ "set": items });
        }

        let envelope: Envelope<Menu> = self
            .post("api/menus", &populated(), json!({ "data": data }))
            .await?;
        Ok(envelope.data)
    }

    /// Apply a partial update to a menu
    pub async fn update_menu(&self, menu_id: &str, update: MenuUpdate) -> Result<Menu, ApiError> {
        let mut data = json!({});
        if let Some(day) = update.day {
            data["day"] = json!(day);
        }
        if let Some(deadline) = update.deadline_utc {
            data["deadline"] = json!(deadline.format("%H:%M:%S").to_string());
        }
        if let Some(items) = update.items {
            data["items"] = json!({ "set": items });
        }

        let envelope: Envelope<Menu> = self
            .put(
                &format!("api/menus/{}", menu_id),
                &populated(),
                json!({ "data": data }),
            )
            .await?;
        Ok(envelope.data)
    }

    pub async fn delete_menu(&self, menu_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("api/menus/{}", menu_id)).await
    }

    /// Link one product into a menu without touching the others
    pub async fn add_menu_item(&self, menu_id: &str, item_id: &str) -> Result<Menu, ApiError> {
        let envelope: Envelope<Menu> = self
            .put(
                &format!("api/menus/{}", menu_id),
                &populated(),
                json!({ "data": { "items": { "connect": [item_id] } } }),
            )
            .await?;
        Ok(envelope.data)
    }

    /// Unlink one product from a menu
    pub async fn remove_menu_item(&self, menu_id: &str, item_id: &str) -> Result<Menu, ApiError> {
        let envelope: Envelope<Menu> = self
            .put(
                &format!("api/menus/{}", menu_id),
                &populated(),
                json!({ "data": { "items": { "disconnect": [item_id] } } }),
            )
            .await?;
        Ok(envelope.data)
    }
}
