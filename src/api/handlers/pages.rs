//! Portal page placeholders.
//!
//! The portals' UI is rendered elsewhere; these handlers exist so the route
//! guard has real routes to protect and tests have real targets to hit.

use axum::http::Uri;
use axum::Json;
use serde_json::{json, Value};

pub async fn page(uri: Uri) -> Json<Value> {
    Json(json!({ "page": uri.path() }))
}
