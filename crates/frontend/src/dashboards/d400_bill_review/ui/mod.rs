pub mod view;

pub use view::BillReviewDashboard;
