use chrono::Utc;
use contracts::domain::a001_bill::aggregate::{Bill, BillStatus};
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_bill")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub email: String,
    pub expense_type: String,
    pub name: String,
    pub amount: f64,
    pub date: String,
    pub vat: String,
    pub pct: i64,
    pub commentary: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub status: String,
    pub comment_admin: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Bill {
    fn from(m: Model) -> Self {
        let status = BillStatus::parse(&m.status).unwrap_or_else(|| {
            tracing::warn!("Unknown status {:?} on bill {}, reading as pending", m.status, m.id);
            BillStatus::Pending
        });
        Bill {
            id: m.id,
            email: m.email,
            expense_type: m.expense_type,
            name: m.name,
            amount: m.amount,
            date: m.date,
            vat: m.vat,
            pct: m.pct,
            commentary: m.commentary,
            file_url: m.file_url,
            file_name: m.file_name,
            status,
            comment_admin: m.comment_admin,
        }
    }
}

fn active_model(bill: &Bill) -> ActiveModel {
    ActiveModel {
        id: Set(bill.id.clone()),
        email: Set(bill.email.clone()),
        expense_type: Set(bill.expense_type.clone()),
        name: Set(bill.name.clone()),
        amount: Set(bill.amount),
        date: Set(bill.date.clone()),
        vat: Set(bill.vat.clone()),
        pct: Set(bill.pct),
        commentary: Set(bill.commentary.clone()),
        file_url: Set(bill.file_url.clone()),
        file_name: Set(bill.file_name.clone()),
        status: Set(bill.status.as_str().to_string()),
        comment_admin: Set(bill.comment_admin.clone()),
        created_at: sea_orm::ActiveValue::NotSet,
        updated_at: Set(Some(Utc::now())),
    }
}

pub async fn list_all(db: &DatabaseConnection) -> anyhow::Result<Vec<Bill>> {
    Ok(Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn get_by_id(db: &DatabaseConnection, id: &str) -> anyhow::Result<Option<Bill>> {
    let result = Entity::find_by_id(id.to_string()).one(db).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(db: &DatabaseConnection, bill: &Bill) -> anyhow::Result<()> {
    let mut active = active_model(bill);
    active.created_at = Set(Some(Utc::now()));
    active.insert(db).await?;
    Ok(())
}

/// Overwrites every field; no version check
pub async fn update(db: &DatabaseConnection, bill: &Bill) -> anyhow::Result<()> {
    active_model(bill).update(db).await?;
    Ok(())
}

pub async fn delete(db: &DatabaseConnection, id: &str) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(db).await?;
    Ok(result.rows_affected > 0)
}
