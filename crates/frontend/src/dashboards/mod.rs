pub mod d400_bill_review;

pub use d400_bill_review::ui::BillReviewDashboard;
