use crate::domain::a001_bill::store::{BillStore, StoreError};
use crate::routes::paths::{self, Navigate};
use crate::shared::format::{format_date, format_status};
use crate::shared::modal::ReceiptPreview;
use contracts::domain::a001_bill::aggregate::{sort_by_date_desc, Bill};
use std::rc::Rc;

/// Receipt image takes half of the modal
const PREVIEW_RATIO: f64 = 0.5;

/// One line of the employee bill table
#[derive(Debug, Clone, PartialEq)]
pub struct BillRow {
    /// Untouched store record
    pub bill: Bill,
    pub date: String,
    pub status: &'static str,
}

impl From<Bill> for BillRow {
    fn from(bill: Bill) -> Self {
        let date = match format_date(&bill.date) {
            Ok(date) => date,
            Err(e) => {
                log::error!("{} for {:?}", e, bill);
                bill.date.clone()
            }
        };
        Self {
            status: format_status(bill.status),
            date,
            bill,
        }
    }
}

/// Employee bill list
pub struct BillsListViewModel {
    store: Option<Rc<dyn BillStore>>,
    on_navigate: Navigate,
}

impl BillsListViewModel {
    pub fn new(store: Option<Rc<dyn BillStore>>, on_navigate: Navigate) -> Self {
        Self { store, on_navigate }
    }

    pub fn handle_click_new_bill(&self) {
        (self.on_navigate)(paths::NEW_BILL);
    }

    pub fn handle_click_icon_eye(&self, bill_url: &str, modal_width: f64) -> ReceiptPreview {
        ReceiptPreview::new(bill_url, modal_width, PREVIEW_RATIO)
    }

    /// Newest first, formatted for display. `Ok(None)` without a store.
    pub async fn get_bills(&self) -> Result<Option<Vec<BillRow>>, StoreError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };
        let mut snapshot = store.list().await?;
        sort_by_date_desc(&mut snapshot);
        Ok(Some(snapshot.into_iter().map(BillRow::from).collect()))
    }
}
