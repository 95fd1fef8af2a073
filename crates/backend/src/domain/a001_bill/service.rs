use super::repository;
use contracts::domain::a001_bill::aggregate::{
    is_accepted_receipt, sort_by_date_desc, Bill, BillStatus, NewBillPayload, UpdateBillRequest,
    UploadedReceipt, INVALID_RECEIPT_MESSAGE,
};
use sea_orm::DatabaseConnection;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BillServiceError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Bill not found: {0}")]
    NotFound(String),

    #[error("Malformed update request: {0}")]
    BadRequest(String),

    #[error("{}", INVALID_RECEIPT_MESSAGE)]
    InvalidReceipt,

    #[error("Receipt storage failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

/// Every bill, newest first
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Bill>, BillServiceError> {
    let mut bills = repository::list_all(db).await?;
    sort_by_date_desc(&mut bills);
    Ok(bills)
}

pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> Result<Bill, BillServiceError> {
    repository::get_by_id(db, id)
        .await?
        .ok_or_else(|| BillServiceError::NotFound(id.to_string()))
}

pub async fn create(
    db: &DatabaseConnection,
    payload: NewBillPayload,
) -> Result<Bill, BillServiceError> {
    payload.validate().map_err(BillServiceError::Validation)?;
    if payload.status != BillStatus::Pending {
        tracing::warn!(
            "Ignoring status {} on new bill from {}",
            payload.status.as_str(),
            payload.email
        );
    }
    // new bills always enter review as pending
    let mut bill = payload.into_bill(Uuid::new_v4().to_string());
    bill.status = BillStatus::Pending;
    repository::insert(db, &bill).await?;
    tracing::info!("Created bill {} for {}", bill.id, bill.email);
    Ok(bill)
}

/// Replace the stored bill `id` with the one carried by `request`.
/// Last write wins.
pub async fn update(
    db: &DatabaseConnection,
    id: &str,
    request: &UpdateBillRequest,
) -> Result<Bill, BillServiceError> {
    if request.selector != id {
        return Err(BillServiceError::BadRequest(format!(
            "selector {:?} does not match {:?}",
            request.selector, id
        )));
    }
    let mut bill = request
        .decode()
        .map_err(|e| BillServiceError::BadRequest(e.to_string()))?;
    bill.id = id.to_string();
    bill.validate().map_err(BillServiceError::Validation)?;

    // 404 rather than an upsert
    get_by_id(db, id).await?;
    repository::update(db, &bill).await?;
    tracing::info!("Updated bill {} to {}", bill.id, bill.status.as_str());
    Ok(bill)
}

pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<(), BillServiceError> {
    if repository::delete(db, id).await? {
        Ok(())
    } else {
        Err(BillServiceError::NotFound(id.to_string()))
    }
}

/// Name a receipt is stored under: `<key>-<base name>` with unsafe characters replaced
pub fn stored_file_name(key: &str, file_name: &str) -> String {
    let base = file_name.rsplit(['\\', '/']).next().unwrap_or(file_name);
    let safe: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}-{}", key, safe)
}

/// Write a receipt image under `uploads_dir` and describe where it is served
pub async fn store_receipt(
    uploads_dir: &Path,
    public_url: &str,
    file_name: &str,
    email: &str,
    bytes: &[u8],
) -> Result<UploadedReceipt, BillServiceError> {
    if !is_accepted_receipt(file_name) {
        tracing::warn!("Rejected receipt {:?} from {}", file_name, email);
        return Err(BillServiceError::InvalidReceipt);
    }

    let key = Uuid::new_v4().to_string();
    let stored = stored_file_name(&key, file_name);
    tokio::fs::create_dir_all(uploads_dir).await?;
    tokio::fs::write(uploads_dir.join(&stored), bytes).await?;
    tracing::info!("Stored receipt {} ({} bytes) for {}", stored, bytes.len(), email);

    Ok(UploadedReceipt {
        file_url: format!("{}/uploads/{}", public_url.trim_end_matches('/'), stored),
        key,
        file_name: file_name
            .rsplit(['\\', '/'])
            .next()
            .unwrap_or(file_name)
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::testing::temp_database;

    fn payload(name: &str, date: &str) -> NewBillPayload {
        NewBillPayload {
            email: "employee@test.tld".into(),
            expense_type: "Transports".into(),
            name: name.into(),
            amount: 42.0,
            date: date.into(),
            vat: "10".into(),
            pct: 20,
            commentary: String::new(),
            file_url: None,
            file_name: None,
            status: BillStatus::Pending,
        }
    }

    #[tokio::test]
    async fn test_create_then_list_newest_first() {
        let db = temp_database().await;
        create(&db, payload("old", "2022-01-01")).await.unwrap();
        create(&db, payload("new", "2023-06-01")).await.unwrap();
        create(&db, payload("bad date", "someday")).await.unwrap_err();

        let names: Vec<String> = list_all(&db).await.unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_create_always_starts_pending() {
        let db = temp_database().await;
        let mut approved = payload("taxi", "2023-01-01");
        approved.status = BillStatus::Accepted;

        let created = create(&db, approved).await.unwrap();
        assert_eq!(created.status, BillStatus::Pending);
        assert_eq!(
            get_by_id(&db, &created.id).await.unwrap().status,
            BillStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payload() {
        let db = temp_database().await;
        let mut bad = payload("", "2023-01-01");
        assert!(matches!(create(&db, bad.clone()).await, Err(BillServiceError::Validation(_))));
        bad.name = "ok".into();
        bad.amount = -1.0;
        assert!(matches!(create(&db, bad).await, Err(BillServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_overwrites_review_fields() {
        let db = temp_database().await;
        let bill = create(&db, payload("taxi", "2023-01-01")).await.unwrap();

        let reviewed = bill.reviewed(BillStatus::Refused, "no receipt");
        let request = UpdateBillRequest::for_bill(&reviewed).unwrap();
        let updated = update(&db, &bill.id, &request).await.unwrap();
        assert_eq!(updated.status, BillStatus::Refused);

        let stored = get_by_id(&db, &bill.id).await.unwrap();
        assert_eq!(stored.status, BillStatus::Refused);
        assert_eq!(stored.comment_admin.as_deref(), Some("no receipt"));

        // a second review simply replaces the first
        let accepted = bill.reviewed(BillStatus::Accepted, "ok");
        update(&db, &bill.id, &UpdateBillRequest::for_bill(&accepted).unwrap())
            .await
            .unwrap();
        assert_eq!(get_by_id(&db, &bill.id).await.unwrap().status, BillStatus::Accepted);
    }

    #[tokio::test]
    async fn test_update_errors() {
        let db = temp_database().await;
        let bill = create(&db, payload("taxi", "2023-01-01")).await.unwrap();
        let request = UpdateBillRequest::for_bill(&bill).unwrap();

        assert!(matches!(
            update(&db, "other", &request).await,
            Err(BillServiceError::BadRequest(_))
        ));

        let garbage = UpdateBillRequest {
            data: "{".into(),
            selector: bill.id.clone(),
        };
        assert!(matches!(
            update(&db, &bill.id, &garbage).await,
            Err(BillServiceError::BadRequest(_))
        ));

        let mut ghost = bill.clone();
        ghost.id = "ghost".into();
        let request = UpdateBillRequest::for_bill(&ghost).unwrap();
        assert!(matches!(
            update(&db, "ghost", &request).await,
            Err(BillServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = temp_database().await;
        let bill = create(&db, payload("taxi", "2023-01-01")).await.unwrap();
        delete(&db, &bill.id).await.unwrap();
        assert!(matches!(delete(&db, &bill.id).await, Err(BillServiceError::NotFound(_))));
        assert!(list_all(&db).await.unwrap().is_empty());
    }

    #[test]
    fn test_stored_file_name_is_sanitized() {
        assert_eq!(stored_file_name("k", "C:\\fakepath\\my photo.JPG"), "k-my_photo.JPG");
        assert_eq!(stored_file_name("k", "../../etc/a.png"), "k-a.png");
    }

    #[tokio::test]
    async fn test_store_receipt() {
        let dir = std::env::temp_dir().join("billed-uploads").join(Uuid::new_v4().to_string());
        let receipt = store_receipt(&dir, "http://localhost:3000/", "facture.png", "a@a", b"png")
            .await
            .unwrap();
        assert_eq!(receipt.file_name, "facture.png");
        assert!(receipt
            .file_url
            .starts_with(&format!("http://localhost:3000/uploads/{}-", receipt.key)));
        let stored = dir.join(stored_file_name(&receipt.key, "facture.png"));
        assert_eq!(std::fs::read(stored).unwrap(), b"png");
    }

    #[tokio::test]
    async fn test_store_receipt_rejects_other_formats() {
        let dir = std::env::temp_dir().join("billed-uploads-rejected");
        let err = store_receipt(&dir, "http://x", "facture.pdf", "a@a", b"%PDF")
            .await
            .unwrap_err();
        assert!(matches!(err, BillServiceError::InvalidReceipt));
        assert_eq!(err.to_string(), INVALID_RECEIPT_MESSAGE);
    }
}
