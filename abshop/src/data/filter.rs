use super::SalesRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Selects the records entering a comparison.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    #[serde(alias = "storeId")]
    pub store_id: Option<u32>,
    #[serde(alias = "excludeHolidays")]
    #[serde(default)]
    pub exclude_holidays: bool,
}

impl RecordFilter {
    /// All stores and all days.
    pub fn all() -> Self {
        Self::default()
    }

    /// A single store, without holidays.
    pub fn usual_days(store_id: u32) -> Self {
        Self {
            store_id: Some(store_id),
            exclude_holidays: true,
        }
    }

    pub fn matches(&self, record: &SalesRecord) -> bool {
        if self.exclude_holidays && record.holiday {
            return false;
        }
        match self.store_id {
            Some(store_id) => record.store_id == store_id,
            None => true,
        }
    }
}

impl fmt::Display for RecordFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.store_id {
            Some(store_id) => write!(f, "store {}", store_id)?,
            None => write!(f, "all stores")?,
        }
        if self.exclude_holidays {
            write!(f, ", without holidays")
        } else {
            write!(f, ", all days")
        }
    }
}
