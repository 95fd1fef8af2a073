use async_trait::async_trait;
use contracts::domain::a001_bill::aggregate::{
    Bill, NewBillPayload, UpdateBillRequest, UploadedReceipt,
};
use std::fmt;

/// Failure reported by the remote bill store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub message: String,
    pub status: Option<u16>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// Error for a non-2xx answer, e.g. "Erreur 404"
    pub fn http(status: u16) -> Self {
        Self {
            message: format!("Erreur {}", status),
            status: Some(status),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for StoreError {}

/// Receipt picked in the new-bill file input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptFile {
    /// Name as reported by the input, may be a browser "fakepath"
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ReceiptFile {
    /// File name without any directory part
    pub fn base_name(&self) -> &str {
        self.name.rsplit(['\\', '/']).next().unwrap_or(&self.name)
    }
}

/// Remote bill store used by the bill pages and the review dashboard
#[async_trait(?Send)]
pub trait BillStore {
    async fn list(&self) -> Result<Vec<Bill>, StoreError>;

    async fn create(&self, bill: &NewBillPayload) -> Result<Bill, StoreError>;

    async fn update(&self, request: &UpdateBillRequest) -> Result<Bill, StoreError>;

    /// Store a receipt image on behalf of `email`
    async fn upload(&self, file: &ReceiptFile, email: &str) -> Result<UploadedReceipt, StoreError>;
}

#[cfg(test)]
pub mod testing {
    //! In-memory store double shared by the view model tests

    use super::*;
    use crate::routes::paths::Navigate;
    use contracts::domain::a001_bill::aggregate::BillStatus;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    pub struct FakeStore {
        pub bills: RefCell<Vec<Bill>>,
        pub list_error: Option<StoreError>,
        pub write_error: Option<StoreError>,
        pub calls: RefCell<Vec<&'static str>>,
        pub created: RefCell<Vec<NewBillPayload>>,
        pub updated: RefCell<Vec<UpdateBillRequest>>,
    }

    impl FakeStore {
        pub fn with_bills(bills: Vec<Bill>) -> Self {
            Self {
                bills: RefCell::new(bills),
                ..Self::default()
            }
        }

        pub fn failing_list(error: StoreError) -> Self {
            Self {
                list_error: Some(error),
                ..Self::default()
            }
        }

        pub fn failing_writes(error: StoreError) -> Self {
            Self {
                write_error: Some(error),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.calls.borrow().clone()
        }
    }

    #[async_trait(?Send)]
    impl BillStore for FakeStore {
        async fn list(&self) -> Result<Vec<Bill>, StoreError> {
            self.calls.borrow_mut().push("list");
            match &self.list_error {
                Some(e) => Err(e.clone()),
                None => Ok(self.bills.borrow().clone()),
            }
        }

        async fn create(&self, bill: &NewBillPayload) -> Result<Bill, StoreError> {
            self.calls.borrow_mut().push("create");
            self.created.borrow_mut().push(bill.clone());
            if let Some(e) = &self.write_error {
                return Err(e.clone());
            }
            let created = bill.clone().into_bill(format!("bill-{}", self.created.borrow().len()));
            self.bills.borrow_mut().push(created.clone());
            Ok(created)
        }

        async fn update(&self, request: &UpdateBillRequest) -> Result<Bill, StoreError> {
            self.calls.borrow_mut().push("update");
            self.updated.borrow_mut().push(request.clone());
            if let Some(e) = &self.write_error {
                return Err(e.clone());
            }
            let bill = request
                .decode()
                .map_err(|e| StoreError::new(e.to_string()))?;
            let mut bills = self.bills.borrow_mut();
            match bills.iter_mut().find(|b| b.id == request.selector) {
                Some(slot) => *slot = bill.clone(),
                None => return Err(StoreError::http(404)),
            }
            Ok(bill)
        }

        async fn upload(
            &self,
            file: &ReceiptFile,
            _email: &str,
        ) -> Result<UploadedReceipt, StoreError> {
            self.calls.borrow_mut().push("upload");
            if let Some(e) = &self.write_error {
                return Err(e.clone());
            }
            Ok(UploadedReceipt {
                file_url: format!("https://localhost:3456/images/{}", file.base_name()),
                key: "1234".into(),
                file_name: file.base_name().to_string(),
            })
        }
    }

    /// Navigation callback that records every visited path
    pub fn recorder() -> (Navigate, Rc<RefCell<Vec<String>>>) {
        let visited = Rc::new(RefCell::new(Vec::new()));
        let sink = visited.clone();
        (
            Rc::new(move |path: &str| sink.borrow_mut().push(path.to_string())),
            visited,
        )
    }

    pub fn dyn_store(store: &Rc<FakeStore>) -> Option<Rc<dyn BillStore>> {
        Some(store.clone())
    }

    pub fn sample_bill(id: &str, email: &str, date: &str, status: BillStatus) -> Bill {
        Bill {
            id: id.into(),
            email: email.into(),
            expense_type: "Hôtel et logement".into(),
            name: format!("bill {}", id),
            amount: 400.0,
            date: date.into(),
            vat: "80".into(),
            pct: 20,
            commentary: "séminaire billed".into(),
            file_url: Some(format!("https://test.storage.tld/{}.jpg", id)),
            file_name: Some(format!("{}.jpg", id)),
            status,
            comment_admin: None,
        }
    }

    pub fn receipt(name: &str) -> ReceiptFile {
        ReceiptFile {
            name: name.into(),
            content_type: "image/png".into(),
            bytes: b"test".to_vec(),
        }
    }
}
