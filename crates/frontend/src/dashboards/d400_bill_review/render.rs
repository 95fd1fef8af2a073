//! Pure mapping from dashboard state to what the page shows

use super::dropdown::{DropdownState, StatusBucket};
use super::filter::{filtered_bills, ExcludedAuthors};
use crate::shared::format::{format_date_or_raw, format_status};
use contracts::domain::a001_bill::aggregate::{Bill, BillStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct BillCard {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub name: String,
    pub amount: String,
    pub date: String,
    pub expense_type: String,
    pub highlighted: bool,
}

/// Split the email local part: "first.last@x" -> ("first", "last"), "bob@x" -> ("", "bob")
pub fn author_names(email: &str) -> (String, String) {
    let local = email.split('@').next().unwrap_or_default();
    match local.split_once('.') {
        Some((first, rest)) => {
            let last = rest.split('.').next().unwrap_or_default();
            (first.to_string(), last.to_string())
        }
        None => (String::new(), local.to_string()),
    }
}

pub fn card(bill: &Bill, highlighted: bool) -> BillCard {
    let (first_name, last_name) = author_names(&bill.email);
    BillCard {
        id: bill.id.clone(),
        first_name,
        last_name,
        name: bill.name.clone(),
        amount: format!("{} €", bill.amount),
        date: format_date_or_raw(&bill.date),
        expense_type: bill.expense_type.clone(),
        highlighted,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BucketView {
    pub bucket: StatusBucket,
    pub title: &'static str,
    pub count: usize,
    pub open: bool,
    pub arrow_rotation: &'static str,
    /// Empty while the bucket is closed
    pub cards: Vec<BillCard>,
}

/// Review form of the selected bill
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewForm {
    pub bill: Bill,
    pub date: String,
    pub status_label: &'static str,
    /// Accept/refuse buttons only for pending bills
    pub reviewable: bool,
}

impl ReviewForm {
    pub fn new(bill: Bill) -> Self {
        Self {
            date: format_date_or_raw(&bill.date),
            status_label: format_status(bill.status),
            reviewable: bill.status == BillStatus::Pending,
            bill,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailPanel {
    Placeholder,
    Form(ReviewForm),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub buckets: Vec<BucketView>,
    pub detail: DetailPanel,
}

pub fn render_dashboard(
    state: &DropdownState,
    detail: Option<&str>,
    bills: &[Bill],
    excluded: &ExcludedAuthors,
) -> DashboardView {
    let buckets = StatusBucket::ALL
        .iter()
        .map(|&bucket| {
            let bucket_state = state.bucket(bucket);
            let matching = filtered_bills(bills, bucket.status(), excluded);
            let open = bucket_state.is_open();
            let cards = if open {
                matching
                    .iter()
                    .map(|bill| card(bill, bucket_state.selected() == Some(bill.id.as_str())))
                    .collect()
            } else {
                Vec::new()
            };
            BucketView {
                bucket,
                title: bucket.title(),
                count: matching.len(),
                open,
                arrow_rotation: if open { "rotate(0deg)" } else { "rotate(90deg)" },
                cards,
            }
        })
        .collect();

    let detail = detail
        .and_then(|id| bills.iter().find(|bill| bill.id == id))
        .map(|bill| DetailPanel::Form(ReviewForm::new(bill.clone())))
        .unwrap_or(DetailPanel::Placeholder);

    DashboardView { buckets, detail }
}
