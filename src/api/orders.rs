//! Order placement and today's-order lookup
//!
//! "Today" is the local calendar day converted to UTC bounds; the backend
//! stores `createdAt` in UTC, so filtering happens on the instant range.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{ApiClient, ApiError, Envelope, Query};

#[derive(Debug, Clone, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "documentId")]
    pub document_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    #[serde(rename = "documentId")]
    pub document_id: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl ApiClient {
    /// The order the given user placed today, if any
    ///
    /// Both an empty result set and a 404 mean "no order yet" and map to
    /// `Ok(None)`; other failures are surfaced.
    pub async fn current_order(
        &self,
        user_document_id: &str,
    ) -> Result<Option<Order>, ApiError> {
        let (start, end) = crate::dates::local_day_bounds_utc();
        let query = Query::new()
            .relation_filter("user", "documentId", "eq", user_document_id)
            .filter("createdAt", "gte", start.to_rfc3339())
            .filter("createdAt", "lte", end.to_rfc3339())
            .populate(0, "items");

        match self.get::<Envelope<Vec<Order>>>("api/orders", &query).await {
            Ok(envelope) => Ok(envelope.data.into_iter().next()),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Place a new order for the given user
    pub async fn place_order(
        &self,
        user_id: i64,
        item_ids: &[String],
        note: Option<&str>,
    ) -> Result<Order, ApiError> {
        let envelope: Envelope<Order> = self
            .post(
                "api/orders",
                &Query::new().populate(0, "items"),
                json!({
                    "data": {
                        "items": { "set": item_ids },
                        "note": note,
                        "user": user_id,
                    }
                }),
            )
            .await?;
        Ok(envelope.data)
    }

    /// Replace the item set (and note) of an existing order
    pub async fn update_order(
        &self,
        order_id: &str,
        item_ids: &[String],
        note: Option<&str>,
    ) -> Result<Order, ApiError> {
        let envelope: Envelope<Order> = self
            .put(
                &format!("api/orders/{}", order_id),
                &Query::new().populate(0, "items"),
                json!({
                    "data": {
                        "items": { "set": item_ids },
                        "note": note,
                    }
                }),
            )
            .await?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_deserializes_wire_shape() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "documentId": "o1",
            "items": [{ "documentId": "p1", "name": "Lasagne" }],
            "note": "niente formaggio",
            "createdAt": "2025-03-03T07:45:00.000Z"
        }))
        .unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.note.as_deref(), Some("niente formaggio"));
    }

    #[test]
    fn test_order_note_and_items_optional() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "documentId": "o2",
            "createdAt": "2025-03-03T07:45:00.000Z"
        }))
        .unwrap();
        assert!(order.items.is_empty());
        assert!(order.note.is_none());
    }
}
