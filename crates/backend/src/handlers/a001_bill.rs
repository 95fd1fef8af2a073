use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a001_bill::aggregate::{
    Bill, NewBillPayload, UpdateBillRequest, UploadedReceipt,
};
use sea_orm::DatabaseConnection;
use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::a001_bill::service::{self, BillServiceError};
use crate::shared::data::db::get_connection;

/// Where uploaded receipts go and how they are addressed
#[derive(Debug, Clone)]
pub struct ReceiptStorage {
    pub uploads_dir: PathBuf,
    pub public_url: String,
}

pub fn status_for(error: &BillServiceError) -> StatusCode {
    match error {
        BillServiceError::Validation(_)
        | BillServiceError::BadRequest(_)
        | BillServiceError::InvalidReceipt => StatusCode::BAD_REQUEST,
        BillServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        BillServiceError::Io(_) | BillServiceError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn reject(error: BillServiceError) -> StatusCode {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::error!("Bill request failed: {}", error);
    } else {
        tracing::warn!("Bill request rejected: {}", error);
    }
    status
}

fn db() -> Result<&'static DatabaseConnection, StatusCode> {
    get_connection().map_err(|e| {
        tracing::error!("{}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// GET /bills
pub async fn list_all() -> Result<Json<Vec<Bill>>, StatusCode> {
    service::list_all(db()?).await.map(Json).map_err(reject)
}

/// POST /bills
pub async fn create(Json(payload): Json<NewBillPayload>) -> Result<Json<Bill>, StatusCode> {
    service::create(db()?, payload).await.map(Json).map_err(reject)
}

/// PATCH /bills/:id
pub async fn update(
    Path(id): Path<String>,
    Json(request): Json<UpdateBillRequest>,
) -> Result<Json<Bill>, StatusCode> {
    service::update(db()?, &id, &request)
        .await
        .map(Json)
        .map_err(reject)
}

/// DELETE /bills/:id
pub async fn delete(Path(id): Path<String>) -> Result<StatusCode, StatusCode> {
    service::delete(db()?, &id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(reject)
}

/// POST /bills/receipt, multipart with `file` and `email`
pub async fn upload_receipt(
    State(storage): State<Arc<ReceiptStorage>>,
    mut multipart: Multipart,
) -> Result<Json<UploadedReceipt>, StatusCode> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut email = String::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Malformed multipart body: {}", e);
        StatusCode::BAD_REQUEST
    })? {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                file = Some((name, bytes.to_vec()));
            }
            Some("email") => {
                email = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            }
            _ => {}
        }
    }

    let Some((file_name, bytes)) = file else {
        tracing::warn!("Receipt upload without a file part");
        return Err(StatusCode::BAD_REQUEST);
    };

    service::store_receipt(
        &storage.uploads_dir,
        &storage.public_url,
        &file_name,
        &email,
        &bytes,
    )
    .await
    .map(Json)
    .map_err(reject)
}
