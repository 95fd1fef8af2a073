use crate::domain::a001_bill::store::{BillStore, ReceiptFile, StoreError};
use crate::routes::paths::{self, Navigate};
use contracts::domain::a001_bill::aggregate::{
    is_accepted_receipt, Bill, BillStatus, NewBillPayload, UploadedReceipt, DEFAULT_PCT,
    INVALID_RECEIPT_MESSAGE,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Raw values of the new-bill form inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBillForm {
    pub expense_type: String,
    pub name: String,
    pub date: String,
    pub amount: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

impl NewBillForm {
    /// Labels of required inputs that are still empty
    pub fn missing_required(&self, has_receipt: bool) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for (label, value) in [
            ("Type de dépense", &self.expense_type),
            ("Nom de la dépense", &self.name),
            ("Date", &self.date),
            ("Montant TTC", &self.amount),
            ("%", &self.pct),
        ] {
            if value.trim().is_empty() {
                missing.push(label);
            }
        }
        if !has_receipt {
            missing.push("Justificatif");
        }
        missing
    }

    pub fn to_payload(
        &self,
        email: &str,
        file_url: Option<String>,
        file_name: Option<String>,
    ) -> NewBillPayload {
        NewBillPayload {
            email: email.to_string(),
            expense_type: self.expense_type.clone(),
            name: self.name.clone(),
            amount: parse_amount(&self.amount),
            date: self.date.clone(),
            vat: self.vat.clone(),
            pct: parse_pct(&self.pct),
            commentary: self.commentary.clone(),
            file_url,
            file_name,
            status: BillStatus::Pending,
        }
    }
}

fn parse_amount(raw: &str) -> f64 {
    raw.trim().replace(',', ".").parse().unwrap_or(0.0)
}

/// Empty, invalid or zero percentages fall back to the default
fn parse_pct(raw: &str) -> i64 {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|pct| *pct != 0)
        .unwrap_or(DEFAULT_PCT)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBillState {
    /// Value of the file input; cleared when a file is rejected
    pub file_input: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub bill_key: Option<String>,
    pub validation_message: Option<&'static str>,
}

/// Result of picking a receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelection {
    Rejected,
    Uploaded(UploadedReceipt),
    UploadFailed(StoreError),
    /// Accepted but no store to send it to
    NotUploaded,
}

/// New bill form
pub struct NewBillViewModel {
    store: Option<Rc<dyn BillStore>>,
    on_navigate: Navigate,
    email: String,
    state: RefCell<NewBillState>,
}

impl NewBillViewModel {
    pub fn new(store: Option<Rc<dyn BillStore>>, on_navigate: Navigate, email: String) -> Self {
        Self {
            store,
            on_navigate,
            email,
            state: RefCell::new(NewBillState::default()),
        }
    }

    pub fn state(&self) -> NewBillState {
        self.state.borrow().clone()
    }

    pub fn has_receipt(&self) -> bool {
        self.state.borrow().file_url.is_some()
    }

    /// Name-only check run before the file content is read.
    /// Returns true and records the rejection when the name is not an image.
    pub fn reject_file_name(&self, name: &str) -> bool {
        if is_accepted_receipt(name) {
            return false;
        }
        log::warn!("Rejected receipt {:?}", name);
        let mut state = self.state.borrow_mut();
        state.file_input.clear();
        state.validation_message = Some(INVALID_RECEIPT_MESSAGE);
        true
    }

    /// Validate the picked file and upload it when it is an image
    pub async fn handle_change_file(&self, file: ReceiptFile) -> FileSelection {
        if self.reject_file_name(&file.name) {
            return FileSelection::Rejected;
        }

        let Some(store) = &self.store else {
            return FileSelection::NotUploaded;
        };
        match store.upload(&file, &self.email).await {
            Ok(receipt) => {
                let mut state = self.state.borrow_mut();
                state.file_input = file.name.clone();
                state.validation_message = None;
                state.file_url = Some(receipt.file_url.clone());
                state.file_name = Some(file.base_name().to_string());
                state.bill_key = Some(receipt.key.clone());
                FileSelection::Uploaded(receipt)
            }
            Err(e) => {
                log::error!("Receipt upload failed: {}", e);
                FileSelection::UploadFailed(e)
            }
        }
    }

    /// Create the bill, then go back to the bill list whatever the outcome
    pub async fn handle_submit(&self, form: &NewBillForm) -> Option<Bill> {
        let payload = {
            let state = self.state.borrow();
            form.to_payload(&self.email, state.file_url.clone(), state.file_name.clone())
        };

        let created = match &self.store {
            Some(store) => match store.create(&payload).await {
                Ok(bill) => Some(bill),
                Err(e) => {
                    log::error!("Bill creation failed: {}", e);
                    None
                }
            },
            None => None,
        };

        (self.on_navigate)(paths::BILLS);
        created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_bill::store::testing::{dyn_store, receipt, recorder, FakeStore};
    use futures::executor::block_on;

    fn filled_form() -> NewBillForm {
        NewBillForm {
            expense_type: "Transports".into(),
            name: "Taxi".into(),
            date: "2023-01-01".into(),
            amount: "42".into(),
            vat: "10".into(),
            pct: "20".into(),
            commentary: "test".into(),
        }
    }

    #[test]
    fn test_invalid_extension_resets_input_without_store_call() {
        let store = Rc::new(FakeStore::default());
        let (nav, visited) = recorder();
        let vm = NewBillViewModel::new(dyn_store(&store), nav, "a@a".into());

        for name in ["test.pdf", "photo.gif", "C:\\fakepath\\notes.txt", "noext"] {
            let outcome = block_on(vm.handle_change_file(receipt(name)));
            assert_eq!(outcome, FileSelection::Rejected);
            let state = vm.state();
            assert_eq!(state.file_input, "");
            assert_eq!(state.validation_message, Some(INVALID_RECEIPT_MESSAGE));
            assert!(state.file_url.is_none());
        }
        assert!(store.calls().is_empty());
        assert!(visited.borrow().is_empty());
    }

    #[test]
    fn test_file_name_checked_before_reading() {
        let store = Rc::new(FakeStore::default());
        let (nav, _) = recorder();
        let vm = NewBillViewModel::new(dyn_store(&store), nav, "a@a".into());

        assert!(!vm.reject_file_name("C:\\fakepath\\scan.JPEG"));
        assert_eq!(vm.state(), NewBillState::default());

        assert!(vm.reject_file_name("C:\\fakepath\\facture.pdf"));
        assert_eq!(vm.state().file_input, "");
        assert_eq!(vm.state().validation_message, Some(INVALID_RECEIPT_MESSAGE));
        assert!(store.calls().is_empty());
    }

    #[test]
    fn test_valid_file_is_uploaded_and_remembered() {
        let store = Rc::new(FakeStore::default());
        let (nav, _) = recorder();
        let vm = NewBillViewModel::new(dyn_store(&store), nav, "a@a".into());

        let outcome = block_on(vm.handle_change_file(receipt("C:\\fakepath\\TEST.PNG")));
        assert!(matches!(outcome, FileSelection::Uploaded(_)));
        let state = vm.state();
        assert_eq!(state.file_name.as_deref(), Some("TEST.PNG"));
        assert_eq!(
            state.file_url.as_deref(),
            Some("https://localhost:3456/images/TEST.PNG")
        );
        assert_eq!(state.bill_key.as_deref(), Some("1234"));
        assert_eq!(state.validation_message, None);
        assert_eq!(store.calls(), vec!["upload"]);
    }

    #[test]
    fn test_upload_failure_leaves_state_untouched() {
        let store = Rc::new(FakeStore::failing_writes(StoreError::new("API Error")));
        let (nav, _) = recorder();
        let vm = NewBillViewModel::new(dyn_store(&store), nav, "a@a".into());

        let outcome = block_on(vm.handle_change_file(receipt("test.jpg")));
        assert_eq!(
            outcome,
            FileSelection::UploadFailed(StoreError::new("API Error"))
        );
        assert_eq!(vm.state(), NewBillState::default());
        assert!(!vm.has_receipt());

        // a rejected pick followed by a failed upload keeps the rejection state
        block_on(vm.handle_change_file(receipt("notes.pdf")));
        let rejected = vm.state();
        block_on(vm.handle_change_file(receipt("scan.jpeg")));
        assert_eq!(vm.state(), rejected);
        assert_eq!(rejected.validation_message, Some(INVALID_RECEIPT_MESSAGE));
    }

    #[test]
    fn test_submit_creates_pending_bill_and_navigates_once() {
        let store = Rc::new(FakeStore::default());
        let (nav, visited) = recorder();
        let vm = NewBillViewModel::new(dyn_store(&store), nav, "a@a".into());

        block_on(vm.handle_change_file(receipt("test.png")));
        let created = block_on(vm.handle_submit(&filled_form())).unwrap();

        assert_eq!(*visited.borrow(), vec![paths::BILLS.to_string()]);
        assert_eq!(created.status, BillStatus::Pending);
        assert_eq!(created.email, "a@a");
        assert_eq!(created.amount, 42.0);
        assert_eq!(created.pct, 20);
        assert_eq!(created.file_name.as_deref(), Some("test.png"));
        assert_eq!(store.calls(), vec!["upload", "create"]);
    }

    #[test]
    fn test_submit_failure_is_logged_and_still_navigates() {
        let store = Rc::new(FakeStore::failing_writes(StoreError::new("API Error")));
        let (nav, visited) = recorder();
        let vm = NewBillViewModel::new(dyn_store(&store), nav, "a@a".into());

        assert_eq!(block_on(vm.handle_submit(&filled_form())), None);
        assert_eq!(*visited.borrow(), vec![paths::BILLS.to_string()]);
        assert_eq!(store.created.borrow().len(), 1);
    }

    #[test]
    fn test_payload_conversion() {
        let mut form = filled_form();
        form.amount = "12,5".into();
        form.pct = "".into();
        let payload = form.to_payload("a@a", None, None);
        assert_eq!(payload.amount, 12.5);
        assert_eq!(payload.pct, DEFAULT_PCT);

        form.amount = "abc".into();
        form.pct = "0".into();
        let payload = form.to_payload("a@a", None, None);
        assert_eq!(payload.amount, 0.0);
        assert_eq!(payload.pct, DEFAULT_PCT);

        form.pct = "15".into();
        assert_eq!(form.to_payload("a@a", None, None).pct, 15);
    }

    #[test]
    fn test_missing_required() {
        assert!(filled_form().missing_required(true).is_empty());
        assert_eq!(filled_form().missing_required(false), vec!["Justificatif"]);
        let empty = NewBillForm::default();
        assert_eq!(empty.missing_required(true).len(), 5);
    }
}
