use crate::shared::format::format_status;
use contracts::domain::a001_bill::aggregate::BillStatus;

/// One of the three status groups of the review dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusBucket {
    Pending,
    Accepted,
    Refused,
}

impl StatusBucket {
    pub const ALL: [StatusBucket; 3] = [
        StatusBucket::Pending,
        StatusBucket::Accepted,
        StatusBucket::Refused,
    ];

    /// Buckets are numbered 1..=3 in the page
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(StatusBucket::Pending),
            2 => Some(StatusBucket::Accepted),
            3 => Some(StatusBucket::Refused),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            StatusBucket::Pending => 1,
            StatusBucket::Accepted => 2,
            StatusBucket::Refused => 3,
        }
    }

    pub fn status(self) -> BillStatus {
        match self {
            StatusBucket::Pending => BillStatus::Pending,
            StatusBucket::Accepted => BillStatus::Accepted,
            StatusBucket::Refused => BillStatus::Refused,
        }
    }

    pub fn title(self) -> &'static str {
        format_status(self.status())
    }

    fn slot(self) -> usize {
        self.index() as usize - 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BucketState {
    #[default]
    Closed,
    Open {
        selected: Option<String>,
    },
}

impl BucketState {
    pub fn is_open(&self) -> bool {
        matches!(self, BucketState::Open { .. })
    }

    pub fn selected(&self) -> Option<&str> {
        match self {
            BucketState::Open { selected } => selected.as_deref(),
            BucketState::Closed => None,
        }
    }

    /// Open shows the bucket with nothing selected, close drops the selection
    pub fn toggled(self) -> Self {
        match self {
            BucketState::Closed => BucketState::Open { selected: None },
            BucketState::Open { .. } => BucketState::Closed,
        }
    }

    /// Clicking the selected bill deselects it, any other bill takes over
    pub fn select(self, bill_id: &str) -> Self {
        let selected = match self {
            BucketState::Open {
                selected: Some(current),
            } if current == bill_id => None,
            _ => Some(bill_id.to_string()),
        };
        BucketState::Open { selected }
    }
}

/// Open/selection state of the three buckets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropdownState {
    buckets: [BucketState; 3],
}

impl DropdownState {
    pub fn bucket(&self, bucket: StatusBucket) -> &BucketState {
        &self.buckets[bucket.slot()]
    }

    /// Returns whether the bucket is now open
    pub fn toggle(&mut self, bucket: StatusBucket) -> bool {
        let slot = &mut self.buckets[bucket.slot()];
        *slot = std::mem::take(slot).toggled();
        slot.is_open()
    }

    /// Returns the bill now selected in the bucket
    pub fn select(&mut self, bucket: StatusBucket, bill_id: &str) -> Option<String> {
        let slot = &mut self.buckets[bucket.slot()];
        *slot = std::mem::take(slot).select(bill_id);
        slot.selected().map(str::to_string)
    }
}
