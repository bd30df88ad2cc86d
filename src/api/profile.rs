use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::extract::{ApiJson, CurrentOwner};
use crate::domain::{User, UserPatch};
use crate::state::AppState;
use crate::Result;

pub async fn list_profiles(State(s): State<AppState>, CurrentOwner(scope): CurrentOwner) -> Result<Json<Vec<User>>> {
    Ok(Json(s.profiles.profiles(scope).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub profile_id: Option<Uuid>,
    pub data_to_update: UserPatch,
}

pub async fn update_profile(
    State(s): State<AppState>,
    CurrentOwner(scope): CurrentOwner,
    ApiJson(r): ApiJson<UpdateProfileRequest>,
) -> Result<Json<Value>> {
    let updated = s.profiles.update_profile(scope, r.profile_id, r.data_to_update).await?;
    Ok(Json(json!({ "message": "Profile updated successfully", "updatedData": updated })))
}
