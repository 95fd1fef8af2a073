use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// Status
// ============================================================================

/// Lifecycle stage of a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    pub const ALL: [BillStatus; 3] = [
        BillStatus::Pending,
        BillStatus::Accepted,
        BillStatus::Refused,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Accepted => "accepted",
            BillStatus::Refused => "refused",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(BillStatus::Pending),
            "accepted" => Some(BillStatus::Accepted),
            "refused" => Some(BillStatus::Refused),
            _ => None,
        }
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// Employee expense claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub email: String,

    /// Expense category ("Transports", "Restaurants et bars", ...)
    #[serde(rename = "type")]
    pub expense_type: String,

    pub name: String,
    pub amount: f64,

    /// Raw date as entered, `YYYY-MM-DD` or RFC 3339
    pub date: String,

    #[serde(default)]
    pub vat: String,
    #[serde(default = "default_pct")]
    pub pct: i64,
    #[serde(default)]
    pub commentary: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    pub status: BillStatus,
    #[serde(default)]
    pub comment_admin: Option<String>,
}

pub const DEFAULT_PCT: i64 = 20;

fn default_pct() -> i64 {
    DEFAULT_PCT
}

impl Bill {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_bill_date(&self.date)
    }

    /// Copy of the bill carrying an administrator decision
    pub fn reviewed(&self, status: BillStatus, comment_admin: impl Into<String>) -> Bill {
        Bill {
            status,
            comment_admin: Some(comment_admin.into()),
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_fields(&self.email, &self.name, self.amount, &self.date)
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Payload of `create`: a bill without its store-assigned id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBillPayload {
    pub email: String,
    #[serde(rename = "type")]
    pub expense_type: String,
    pub name: String,
    pub amount: f64,
    pub date: String,
    #[serde(default)]
    pub vat: String,
    #[serde(default = "default_pct")]
    pub pct: i64,
    #[serde(default)]
    pub commentary: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub status: BillStatus,
}

impl NewBillPayload {
    pub fn validate(&self) -> Result<(), String> {
        validate_fields(&self.email, &self.name, self.amount, &self.date)
    }

    pub fn into_bill(self, id: String) -> Bill {
        Bill {
            id,
            email: self.email,
            expense_type: self.expense_type,
            name: self.name,
            amount: self.amount,
            date: self.date,
            vat: self.vat,
            pct: self.pct,
            commentary: self.commentary,
            file_url: self.file_url,
            file_name: self.file_name,
            status: self.status,
            comment_admin: None,
        }
    }
}

/// Payload of `update`: `data` is the JSON-encoded bill, `selector` its id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBillRequest {
    pub data: String,
    pub selector: String,
}

impl UpdateBillRequest {
    pub fn for_bill(bill: &Bill) -> serde_json::Result<Self> {
        Ok(Self {
            data: serde_json::to_string(bill)?,
            selector: bill.id.clone(),
        })
    }

    pub fn decode(&self) -> serde_json::Result<Bill> {
        serde_json::from_str(&self.data)
    }
}

/// Store answer to a receipt upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedReceipt {
    pub file_url: String,
    pub key: String,
    pub file_name: String,
}

// ============================================================================
// Receipts
// ============================================================================

pub const RECEIPT_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

pub const INVALID_RECEIPT_MESSAGE: &str =
    "Veuillez télécharger un fichier au format PNG, JPG ou JPEG.";

/// Case-insensitive check of the file name extension.
/// Accepts browser paths such as `C:\fakepath\photo.JPG`.
pub fn is_accepted_receipt(file_name: &str) -> bool {
    let base = file_name.rsplit(['\\', '/']).next().unwrap_or(file_name);
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => RECEIPT_EXTENSIONS
            .iter()
            .any(|allowed| ext.eq_ignore_ascii_case(allowed)),
        _ => false,
    }
}

// ============================================================================
// Dates
// ============================================================================

/// Local timestamps without an offset, `T` or space separated
const LOCAL_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a bill timestamp: `YYYY-MM-DD` (midnight), a local ISO datetime
/// or an RFC 3339 timestamp (offset dropped)
pub fn parse_bill_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Some(dt) = LOCAL_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.naive_local())
}

pub fn parse_bill_date(raw: &str) -> Option<NaiveDate> {
    parse_bill_datetime(raw).map(|dt| dt.date())
}

/// Newest first; unparseable dates go last
pub fn cmp_date_desc(a: &str, b: &str) -> Ordering {
    match (parse_bill_datetime(a), parse_bill_datetime(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort, newest bill first
pub fn sort_by_date_desc(bills: &mut [Bill]) {
    bills.sort_by(|a, b| cmp_date_desc(&a.date, &b.date));
}

fn validate_fields(email: &str, name: &str, amount: f64, date: &str) -> Result<(), String> {
    if email.trim().is_empty() {
        return Err("Email must not be empty".into());
    }
    if name.trim().is_empty() {
        return Err("Name must not be empty".into());
    }
    if !amount.is_finite() || amount < 0.0 {
        return Err(format!("Invalid amount: {}", amount));
    }
    if parse_bill_date(date).is_none() {
        return Err(format!("Invalid date: {}", date));
    }
    Ok(())
}
