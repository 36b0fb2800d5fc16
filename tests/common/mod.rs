//! In-process mock of the meal-ordering backend for integration tests

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Mint an unsigned JWT with the given expiration
pub fn make_jwt(exp: i64) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload =
        general_purpose::URL_SAFE_NO_PAD.encode(json!({ "sub": 1, "exp": exp }).to_string());
    format!("{}.{}.sig", header, payload)
}

pub fn fresh_jwt() -> String {
    make_jwt(chrono::Utc::now().timestamp() + 3600)
}

pub fn expired_jwt() -> String {
    make_jwt(chrono::Utc::now().timestamp() - 3600)
}

/// Mutable backend state shared with the test body
#[derive(Default)]
pub struct Backend {
    /// The one token the backend currently accepts
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_calls: usize,
    pub fail_refresh: bool,
    pub fail_login: bool,
    /// Authorization headers seen by GET /api/orders, in order
    pub orders_auth_seen: Vec<Option<String>>,
    pub orders: Vec<Value>,
    /// (document id, name, category name)
    pub products: Vec<(String, String, String)>,
    pub products_created: usize,
    /// (day, item document ids)
    pub menus: Vec<(String, Vec<String>)>,
    /// (document id, name, display order)
    pub categories: Vec<(String, String, i64)>,
}

pub struct MockServer {
    pub addr: SocketAddr,
    pub state: Arc<Mutex<Backend>>,
}

impl MockServer {
    pub fn base_url(&self) -> url::Url {
        url::Url::parse(&format!("http://{}/", self.addr)).unwrap()
    }

    pub fn lock(&self) -> std::sync::MutexGuard<'_, Backend> {
        self.state.lock().unwrap()
    }
}

type Shared = Arc<Mutex<Backend>>;

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": { "status": 401, "name": "UnauthorizedError", "message": "Missing or invalid credentials" } })),
    )
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string())
}

fn authorized(state: &Shared, headers: &HeaderMap) -> bool {
    let expected = state.lock().unwrap().access_token.clone();
    bearer(headers).as_deref() == Some(expected.as_str())
}

async fn login(State(state): State<Shared>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let state = state.lock().unwrap();
    if state.fail_login {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "data": null, "error": { "status": 400, "name": "ValidationError", "message": "Invalid identifier or password" } })),
        ));
    }
    Ok(Json(json!({
        "jwt": state.access_token,
        "refreshToken": state.refresh_token,
        "user": { "id": 1, "username": "anna" }
    })))
}

async fn refresh(State(state): State<Shared>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let (fail, calls) = {
        let mut state = state.lock().unwrap();
        state.refresh_calls += 1;
        (state.fail_refresh, state.refresh_calls)
    };

    // Widen the race window so coalescing bugs would show up
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    if fail {
        return Err(unauthorized());
    }

    let token = make_jwt(chrono::Utc::now().timestamp() + 3600 + calls as i64);
    let mut state = state.lock().unwrap();
    state.access_token = token.clone();
    Ok(Json(json!({ "jwt": token, "refreshToken": state.refresh_token })))
}

async fn me(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !authorized(&state, &headers) {
        return Err(unauthorized());
    }
    Ok(Json(json!({
        "id": 1,
        "documentId": "u1",
        "username": "anna",
        "email": "anna@example.com",
        "role": { "name": "Admin" }
    })))
}

async fn list_orders(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let auth = bearer(&headers);
    {
        let mut state = state.lock().unwrap();
        state.orders_auth_seen.push(auth.clone());
    }
    if !authorized(&state, &headers) {
        return Err(unauthorized());
    }
    let state = state.lock().unwrap();
    Ok(Json(json!({ "data": state.orders, "meta": {} })))
}

async fn list_categories(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !authorized(&state, &headers) {
        return Err(unauthorized());
    }
    let state = state.lock().unwrap();
    let data: Vec<Value> = state
        .categories
        .iter()
        .map(|(id, name, order)| json!({ "documentId": id, "name": name, "order": order }))
        .collect();
    Ok(Json(json!({ "data": data })))
}

fn product_json(state: &Backend, id: &str, name: &str, category_name: &str) -> Value {
    let category = state
        .categories
        .iter()
        .find(|(_, n, _)| n == category_name)
        .map(|(cid, n, order)| json!({ "documentId": cid, "name": n, "order": order }));
    json!({ "documentId": id, "name": name, "category": category })
}

async fn list_products(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !authorized(&state, &headers) {
        return Err(unauthorized());
    }
    let start: usize = params
        .get("pagination[start]")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let limit: usize = params
        .get("pagination[limit]")
        .and_then(|v| v.parse().ok())
        .unwrap_or(25);

    let state = state.lock().unwrap();
    let total = state.products.len();
    let data: Vec<Value> = state
        .products
        .iter()
        .skip(start)
        .take(limit)
        .map(|(id, name, category)| product_json(&state, id, name, category))
        .collect();
    Ok(Json(json!({
        "data": data,
        "meta": { "pagination": { "total": total } }
    })))
}

async fn create_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !authorized(&state, &headers) {
        return Err(unauthorized());
    }
    let name = body["data"]["name"].as_str().unwrap_or_default().to_string();
    let category_id = body["data"]["category"].as_str().unwrap_or_default().to_string();

    let mut state = state.lock().unwrap();
    let category_name = state
        .categories
        .iter()
        .find(|(id, _, _)| *id == category_id)
        .map(|(_, n, _)| n.clone())
        .unwrap_or_default();
    let id = format!("p{}", state.products.len() + 1);
    state.products.push((id.clone(), name.clone(), category_name.clone()));
    state.products_created += 1;

    let data = product_json(&state, &id, &name, &category_name);
    Ok(Json(json!({ "data": data })))
}

fn menu_json(day: &str, items: &[String]) -> Value {
    let items: Vec<Value> = items
        .iter()
        .map(|id| json!({ "documentId": id, "name": id }))
        .collect();
    json!({ "documentId": format!("menu-{}", day), "day": day, "deadline": "07:30:00", "items": items })
}

async fn list_menus(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !authorized(&state, &headers) {
        return Err(unauthorized());
    }
    let day = params.get("filters[day][$eq]").cloned();

    let state = state.lock().unwrap();
    let data: Vec<Value> = state
        .menus
        .iter()
        .filter(|(menu_day, _)| day.as_ref().map_or(true, |d| d == menu_day))
        .map(|(menu_day, items)| menu_json(menu_day, items))
        .collect();
    Ok(Json(json!({ "data": data, "meta": {} })))
}

async fn create_menu(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !authorized(&state, &headers) {
        return Err(unauthorized());
    }
    let day = body["data"]["day"].as_str().unwrap_or_default().to_string();
    let items: Vec<String> = body["data"]["items"]["set"]
        .as_array()
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();

    let mut state = state.lock().unwrap();
    state.menus.push((day.clone(), items.clone()));
    Ok(Json(json!({ "data": menu_json(&day, &items) })))
}

/// Start the mock backend on an ephemeral port
pub async fn spawn() -> MockServer {
    let state: Shared = Arc::new(Mutex::new(Backend {
        access_token: fresh_jwt(),
        refresh_token: "refresh-1".to_string(),
        ..Backend::default()
    }));

    let app = Router::new()
        .route("/api/auth/local", post(login))
        .route("/api/auth/local/refresh", post(refresh))
        .route("/api/users/me", get(me))
        .route("/api/orders", get(list_orders))
        .route("/api/categories", get(list_categories))
        .route("/api/items", get(list_products).post(create_product))
        .route("/api/menus", get(list_menus).post(create_menu))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockServer { addr, state }
}
