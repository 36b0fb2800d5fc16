//! Wire types for the authentication endpoints
//!
//! `POST /api/auth/local`, `POST /api/auth/local/refresh` and
//! `GET /api/users/me` are called by the session manager itself (they must
//! work while no valid access token is held), so this module only defines
//! the shapes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub jwt: String,
    #[serde(rename = "refreshToken", default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub jwt: String,
    #[serde(rename = "refreshToken", default)]
    pub refresh_token: Option<String>,
}

/// Authenticated user profile, fetched from `/api/users/me?populate=role`
///
/// Replaced wholesale on login or profile refetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    #[serde(rename = "documentId")]
    pub document_id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
}

impl UserProfile {
    /// Whether this user holds the Admin role
    pub fn is_admin(&self) -> bool {
        self.role.as_ref().map(|r| r.name == "Admin").unwrap_or(false)
    }
}
