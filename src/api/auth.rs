use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};

use super::extract::ApiJson;
use crate::services::auth::Registration;
use crate::state::AppState;
use crate::Result;

pub async fn register(State(s): State<AppState>, ApiJson(r): ApiJson<Registration>) -> Result<(StatusCode, Json<Value>)> {
    s.auth.register(r).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Account created successfully" }))))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(deserialize_with = "string_or_number")]
    pub phone_number: String,
    pub password: String,
}

pub async fn login(State(s): State<AppState>, ApiJson(r): ApiJson<LoginRequest>) -> Result<Json<Value>> {
    let token = s.auth.login(&r.phone_number, &r.password).await?;
    Ok(Json(json!({ "message": "Logged in successfully", "token": token })))
}

/// Older clients send the phone number as a JSON number.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw { Text(String), Number(u64) }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
