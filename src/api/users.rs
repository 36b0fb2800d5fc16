//! Admin-side user management
//!
//! The users-permissions endpoints differ from the content endpoints: they
//! return bare payloads without the `{ data, meta }` envelope, and new
//! users are assigned the Authenticated role by numeric id.

use serde::Deserialize;
use serde_json::json;

use super::auth::Role;
use super::{ApiClient, ApiError, Query};

/// Numeric id of the Authenticated role assigned to new accounts
const AUTHENTICATED_ROLE_ID: i64 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(rename = "documentId")]
    pub document_id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub role: Option<Role>,
    /// Present only when the listing asked for the order count
    #[serde(default)]
    pub orders: Option<OrderCount>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OrderCount {
    pub count: u64,
}

impl User {
    pub fn order_count(&self) -> u64 {
        self.orders.map(|o| o.count).unwrap_or(0)
    }
}

impl ApiClient {
    /// List users, optionally matching a search term over username and
    /// email, counting each user's orders within the given UTC range
    pub async fn list_users(
        &self,
        search: Option<&str>,
        orders_from: chrono::DateTime<chrono::Utc>,
        orders_to: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<User>, ApiError> {
        let mut query = Query::new()
            .raw("populate[role]", "true")
            .raw("populate[orders][count]", "true")
            .raw(
                "populate[orders][filters][createdAt][$gte]",
                orders_from.to_rfc3339(),
            )
            .raw(
                "populate[orders][filters][createdAt][$lte]",
                orders_to.to_rfc3339(),
            );
        if let Some(term) = search {
            query = query
                .or_contains(0, "username", term)
                .or_contains(1, "email", term);
        }

        self.get("api/users", &query).await
    }

    pub async fn get_user(&self, user_id: i64) -> Result<User, ApiError> {
        self.get(
            &format!("api/users/{}", user_id),
            &Query::new().raw("populate[role]", "true"),
        )
        .await
    }

    /// Create an account with the Authenticated role
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        self.post(
            "api/users",
            &Query::new(),
            json!({
                "username": username,
                "email": email,
                "password": password,
                "role": AUTHENTICATED_ROLE_ID,
                "confirmed": true,
            }),
        )
        .await
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        email: Option<&str>,
        password: Option<&str>,
        blocked: Option<bool>,
    ) -> Result<User, ApiError> {
        let mut body = json!({});
        if let Some(email) = email {
            body["email"] = json!(email);
        }
        if let Some(password) = password {
            body["password"] = json!(password);
        }
        if let Some(blocked) = blocked {
            body["blocked"] = json!(blocked);
        }

        self.put(&format!("api/users/{}", user_id), &Query::new(), body)
            .await
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("api/users/{}", user_id)).await
    }
}
