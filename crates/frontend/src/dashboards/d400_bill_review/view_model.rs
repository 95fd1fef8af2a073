use super::dropdown::{DropdownState, StatusBucket};
use super::filter::ExcludedAuthors;
use super::render::{render_dashboard, DashboardView};
use crate::domain::a001_bill::store::{BillStore, StoreError};
use crate::routes::paths::{self, Navigate};
use crate::shared::modal::ReceiptPreview;
use contracts::domain::a001_bill::aggregate::{Bill, BillStatus, UpdateBillRequest};
use std::cell::RefCell;
use std::rc::Rc;

/// Receipt image takes most of the admin modal
const PREVIEW_RATIO: f64 = 0.8;

/// Administrator review dashboard
pub struct BillReviewViewModel {
    store: Option<Rc<dyn BillStore>>,
    on_navigate: Navigate,
    excluded: ExcludedAuthors,
    dropdown: RefCell<DropdownState>,
    /// Bill whose review form is shown
    detail: RefCell<Option<String>>,
}

impl BillReviewViewModel {
    pub fn new(
        store: Option<Rc<dyn BillStore>>,
        on_navigate: Navigate,
        excluded: ExcludedAuthors,
    ) -> Self {
        Self {
            store,
            on_navigate,
            excluded,
            dropdown: RefCell::new(DropdownState::default()),
            detail: RefCell::new(None),
        }
    }

    /// Every bill of every user, unformatted. `Ok(None)` without a store.
    pub async fn get_bills_all_users(&self) -> Result<Option<Vec<Bill>>, StoreError> {
        match &self.store {
            Some(store) => store.list().await.map(Some),
            None => Ok(None),
        }
    }

    /// Open or close a bucket; returns whether it is now open
    pub fn handle_show_tickets(&self, bucket: StatusBucket) -> bool {
        self.dropdown.borrow_mut().toggle(bucket)
    }

    /// Select or deselect a bill in its bucket; returns the selected id
    pub fn handle_edit_ticket(&self, bill: &Bill, bucket: StatusBucket) -> Option<String> {
        let selected = self.dropdown.borrow_mut().select(bucket, &bill.id);
        *self.detail.borrow_mut() = selected.clone();
        selected
    }

    pub fn handle_click_icon_eye(&self, bill_url: &str, modal_width: f64) -> ReceiptPreview {
        ReceiptPreview::new(bill_url, modal_width, PREVIEW_RATIO)
    }

    pub async fn handle_accept_submit(&self, bill: &Bill, comment_admin: &str) -> Option<Bill> {
        self.submit_review(bill, BillStatus::Accepted, comment_admin).await
    }

    pub async fn handle_refuse_submit(&self, bill: &Bill, comment_admin: &str) -> Option<Bill> {
        self.submit_review(bill, BillStatus::Refused, comment_admin).await
    }

    async fn submit_review(
        &self,
        bill: &Bill,
        status: BillStatus,
        comment_admin: &str,
    ) -> Option<Bill> {
        let reviewed = bill.reviewed(status, comment_admin);
        let updated = self.update_bill(&reviewed).await;
        (self.on_navigate)(paths::DASHBOARD);
        updated
    }

    /// Persist a bill; failures are only logged
    pub async fn update_bill(&self, bill: &Bill) -> Option<Bill> {
        let store = self.store.as_ref()?;
        let request = match UpdateBillRequest::for_bill(bill) {
            Ok(request) => request,
            Err(e) => {
                log::error!("Cannot serialize bill {}: {}", bill.id, e);
                return None;
            }
        };
        match store.update(&request).await {
            Ok(updated) => Some(updated),
            Err(e) => {
                log::error!("Bill update failed for {}: {}", bill.id, e);
                None
            }
        }
    }

    pub fn render(&self, bills: &[Bill]) -> DashboardView {
        render_dashboard(
            &self.dropdown.borrow(),
            self.detail.borrow().as_deref(),
            bills,
            &self.excluded,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d400_bill_review::render::DetailPanel;
    use crate::domain::a001_bill::store::testing::{dyn_store, recorder, sample_bill, FakeStore};
    use futures::executor::block_on;

    fn fixtures() -> Vec<Bill> {
        vec![
            sample_bill("1", "a@a", "2023-01-01", BillStatus::Pending),
            sample_bill("2", "b@b", "2023-03-01", BillStatus::Pending),
            sample_bill("3", "a@a", "2022-05-01", BillStatus::Accepted),
        ]
    }

    #[test]
    fn test_get_bills_all_users_returns_raw_list() {
        let store = Rc::new(FakeStore::with_bills(fixtures()));
        let (nav, _) = recorder();
        let vm = BillReviewViewModel::new(dyn_store(&store), nav, ExcludedAuthors::none());
        let bills = block_on(vm.get_bills_all_users()).unwrap().unwrap();
        assert_eq!(bills, fixtures());
    }

    #[test]
    fn test_get_bills_all_users_rejection_is_returned() {
        let store = Rc::new(FakeStore::failing_list(StoreError::http(500)));
        let (nav, _) = recorder();
        let vm = BillReviewViewModel::new(dyn_store(&store), nav, ExcludedAuthors::none());
        assert_eq!(
            block_on(vm.get_bills_all_users()),
            Err(StoreError::http(500))
        );
    }

    #[test]
    fn test_show_tickets_renders_and_clears_cards() {
        let (nav, _) = recorder();
        let vm = BillReviewViewModel::new(None, nav, ExcludedAuthors::none());
        let bills = fixtures();

        assert!(vm.handle_show_tickets(StatusBucket::Pending));
        assert_eq!(vm.render(&bills).buckets[0].cards.len(), 2);

        assert!(!vm.handle_show_tickets(StatusBucket::Pending));
        assert!(vm.render(&bills).buckets[0].cards.is_empty());
    }

    #[test]
    fn test_edit_ticket_toggles_review_form() {
        let (nav, _) = recorder();
        let vm = BillReviewViewModel::new(None, nav, ExcludedAuthors::none());
        let bills = fixtures();
        vm.handle_show_tickets(StatusBucket::Pending);

        assert_eq!(vm.handle_edit_ticket(&bills[0], StatusBucket::Pending).as_deref(), Some("1"));
        assert!(matches!(vm.render(&bills).detail, DetailPanel::Form(ref f) if f.bill.id == "1"));

        assert_eq!(vm.handle_edit_ticket(&bills[1], StatusBucket::Pending).as_deref(), Some("2"));
        assert!(matches!(vm.render(&bills).detail, DetailPanel::Form(ref f) if f.bill.id == "2"));

        assert_eq!(vm.handle_edit_ticket(&bills[1], StatusBucket::Pending), None);
        assert_eq!(vm.render(&bills).detail, DetailPanel::Placeholder);
    }

    #[test]
    fn test_accept_updates_store_and_returns_to_dashboard() {
        let store = Rc::new(FakeStore::with_bills(fixtures()));
        let (nav, visited) = recorder();
        let vm = BillReviewViewModel::new(dyn_store(&store), nav, ExcludedAuthors::none());

        let updated = block_on(vm.handle_accept_submit(&fixtures()[0], "ok")).unwrap();
        assert_eq!(updated.status, BillStatus::Accepted);
        assert_eq!(updated.comment_admin.as_deref(), Some("ok"));
        assert_eq!(*visited.borrow(), vec![paths::DASHBOARD.to_string()]);

        let request = store.updated.borrow()[0].clone();
        assert_eq!(request.selector, "1");
        assert_eq!(request.decode().unwrap().status, BillStatus::Accepted);
    }

    #[test]
    fn test_refuse_failure_is_logged_and_still_navigates() {
        let store = Rc::new(FakeStore::failing_writes(StoreError::http(500)));
        let (nav, visited) = recorder();
        let vm = BillReviewViewModel::new(dyn_store(&store), nav, ExcludedAuthors::none());

        assert_eq!(block_on(vm.handle_refuse_submit(&fixtures()[1], "no receipt")), None);
        assert_eq!(*visited.borrow(), vec![paths::DASHBOARD.to_string()]);
        assert_eq!(
            store.updated.borrow()[0].decode().unwrap().status,
            BillStatus::Refused
        );
    }

    #[test]
    fn test_eye_icon_scales_receipt_to_most_of_modal() {
        let (nav, _) = recorder();
        let vm = BillReviewViewModel::new(None, nav, ExcludedAuthors::none());
        assert_eq!(vm.handle_click_icon_eye("u", 500.0).width, 400);
    }
}
