//! API request handlers
//!
//! Handlers for the equipment REST endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use super::server::AppState;
use crate::error::{PortalError, PortalResult};
use crate::excel;
use crate::locator::next_backup_name;
use crate::types::{EquipmentRecord, FolderReference, HeaderBlock};

/// Standard API response wrapper
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(rename = "request_id")]
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_file_preserved: Option<bool>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
            original_file_preserved: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
            original_file_preserved: None,
        }
    }
}

/// A `PortalError` on its way to the client
pub struct ApiError {
    error: PortalError,
    during_save: bool,
}

impl ApiError {
    /// Errors raised while writing a backup; the response states the
    /// original workbook was left untouched.
    pub fn during_save(error: PortalError) -> Self {
        Self {
            error,
            during_save: true,
        }
    }
}

impl From<PortalError> for ApiError {
    fn from(error: PortalError) -> Self {
        Self {
            error,
            during_save: false,
        }
    }
}

/// HTTP status for each error class
pub fn status_for(error: &PortalError) -> StatusCode {
    match error {
        PortalError::MalformedInput(_) => StatusCode::BAD_REQUEST,
        PortalError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        PortalError::DecodeAnomaly(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PortalError::RemoteUnavailable { .. } => StatusCode::BAD_GATEWAY,
        PortalError::Io(_) | PortalError::Transcode(_) | PortalError::Config(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.error);
        let mut body = ApiResponse::<()>::err(self.error.to_string());

        if self.during_save {
            body.error = Some(format!(
                "Failed to save backup file: {}; the original file was not modified",
                self.error
            ));
            body.original_file_preserved = Some(true);
        }

        (status, Json(body)).into_response()
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /health - Health check
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    }))
}

/// List folders query
#[derive(Deserialize)]
pub struct ListFoldersQuery {
    pub path: Option<String>,
}

/// GET /api/list-folders - Names of sub-folders
pub async fn list_folders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListFoldersQuery>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let folders = state.locator.list_folders(query.path.as_deref()).await?;
    Ok(Json(ApiResponse::ok(folders)))
}

/// Equipment data query
#[derive(Deserialize)]
pub struct ExcelDataQuery {
    #[serde(rename = "folderName")]
    pub folder_name: Option<String>,
}

/// Equipment data response
#[derive(Serialize, Deserialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ExcelDataResponse {
    pub header_block: HeaderBlock,
    pub records: Vec<EquipmentRecord>,
    pub file_name: String,
}

fn parse_folder(folder_name: Option<&str>) -> PortalResult<FolderReference> {
    let folder_name = folder_name
        .ok_or_else(|| PortalError::MalformedInput("Missing folderName".to_string()))?;
    FolderReference::parse(folder_name)
}

/// GET /api/excel-data - Read the newest equipment workbook of a folder
pub async fn excel_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExcelDataQuery>,
) -> Result<Json<ApiResponse<ExcelDataResponse>>, ApiError> {
    let folder = parse_folder(query.folder_name.as_deref())?;

    let resolved = state.locator.resolve(&folder).await?;
    let bytes = state.store.get_content(&resolved.locator).await?;
    let decoded = excel::read_workbook(bytes)?;

    info!(
        folder = %folder,
        file = %resolved.file_name,
        records = decoded.records.len(),
        "read equipment data"
    );

    Ok(Json(ApiResponse::ok(ExcelDataResponse {
        header_block: decoded.header_block,
        records: decoded.records,
        file_name: resolved.file_name,
    })))
}

/// Save request
#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub folder_name: Option<String>,
    #[serde(default)]
    pub header_block: Option<HeaderBlock>,
    #[serde(alias = "rows")]
    pub records: Option<Vec<EquipmentRecord>>,
}

/// Save response
#[derive(Serialize, Deserialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub file_name: String,
    pub message: String,
    pub original_file_preserved: bool,
}

/// POST /api/save-excel - Write edited records as a new timestamped backup
pub async fn save_excel(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SaveResponse>>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        PortalError::MalformedInput(format!("Invalid save request: {}", e.body_text()))
    })?;

    let folder = parse_folder(request.folder_name.as_deref())?;
    let records = request.records.ok_or_else(|| {
        PortalError::MalformedInput("Missing or invalid records".to_string())
    })?;

    let file_name = next_backup_name(&folder, Local::now().naive_local());
    let file_path = state.locator.file_path(&folder, &file_name);

    let bytes = excel::write_workbook(request.header_block.as_ref(), &records)
        .map_err(ApiError::during_save)?;
    state
        .store
        .put_content(&file_path, bytes)
        .await
        .map_err(|e| {
            error!(file = %file_path, error = %e, "backup upload failed");
            ApiError::during_save(e)
        })?;

    info!(file = %file_path, records = records.len(), "saved backup");

    Ok(Json(ApiResponse::ok(SaveResponse {
        file_name,
        message: "Backup file saved successfully".to_string(),
        original_file_preserved: true,
    })))
}
