use contracts::domain::a001_bill::aggregate::{sort_by_date_desc, Bill, BillStatus};

/// Seed accounts whose bills never show up for review
pub const TEST_ACCOUNTS: [&str; 4] = [
    "employee@test.tld",
    "employee@company.tld",
    "admin@test.tld",
    "admin@company.tld",
];

/// Authors whose bills are hidden from the reviewer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludedAuthors(Vec<String>);

impl ExcludedAuthors {
    /// No exclusion, status filter only
    pub fn none() -> Self {
        Self::default()
    }

    /// Test accounts plus the reviewer's own email
    pub fn for_reviewer(email: &str) -> Self {
        let mut emails: Vec<String> = TEST_ACCOUNTS.iter().map(|e| e.to_string()).collect();
        if !email.is_empty() {
            emails.push(email.to_string());
        }
        Self(emails)
    }

    pub fn contains(&self, email: &str) -> bool {
        self.0.iter().any(|e| e == email)
    }
}

/// Bills with `status`, newest first
pub fn filtered_bills(data: &[Bill], status: BillStatus, excluded: &ExcludedAuthors) -> Vec<Bill> {
    let mut bills: Vec<Bill> = data
        .iter()
        .filter(|bill| bill.status == status && !excluded.contains(&bill.email))
        .cloned()
        .collect();
    sort_by_date_desc(&mut bills);
    bills
}
