use axum::response::Json;
use reelview_core::CURRENT_VERSION;
use serde_json::{Value, json};

pub async fn ping() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": CURRENT_VERSION,
    }))
}
