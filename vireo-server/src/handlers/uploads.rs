use axum::Json;
use axum::extract::{Path, State};

use vireo_model::{UploadCategory, UploadTicket};

use crate::errors::AppResult;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// Mint signed POST-policy credentials for one direct-to-storage upload.
/// The category path segment decides the enforced key prefix.
pub async fn create_upload_ticket_handler(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(category): Path<String>,
) -> AppResult<Json<UploadTicket>> {
    let category: UploadCategory = category.parse()?;
    Ok(Json(state.uploads.issue(category)))
}
