use crate::{AbShopError, AbShopResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The promotion flag, ordered `Without` < `With` like the flag values 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Promo {
    Without,
    With,
}

impl Promo {
    pub fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            0 => Some(Promo::Without),
            1 => Some(Promo::With),
            _ => None,
        }
    }

    pub fn flag(&self) -> u8 {
        match self {
            Promo::Without => 0,
            Promo::With => 1,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Promo::Without => "without promo",
            Promo::With => "with promo",
        }
    }
}

impl fmt::Display for Promo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.flag())
    }
}

/// A single day of sales of one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub store_id: u32,
    pub sales: f64,
    pub promo: Promo,
    pub holiday: bool,
}

/// A row as it appears in the CSV file.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRecord {
    #[serde(alias = "Date")]
    date: String,
    #[serde(alias = "Store_ID")]
    store: u32,
    #[serde(alias = "Sales")]
    sales: f64,
    #[serde(alias = "Promo")]
    promo: u8,
    #[serde(alias = "Holiday")]
    holiday: u8,
}

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT).map(|dt| dt.date()))
        .ok()
}

impl RawRecord {
    pub(crate) fn into_record(self, line: u64) -> AbShopResult<SalesRecord> {
        let invalid = |issue: String| AbShopError::InvalidRecord { line, issue };

        let date = parse_date(&self.date)
            .ok_or_else(|| invalid(format!("unable to parse date '{}'", self.date)))?;
        let promo = Promo::from_flag(self.promo)
            .ok_or_else(|| invalid(format!("promo flag has to be 0 or 1, got {}", self.promo)))?;
        let holiday = match self.holiday {
            0 => false,
            1 => true,
            other => {
                return Err(invalid(format!(
                    "holiday flag has to be 0 or 1, got {}",
                    other
                )))
            }
        };
        if !self.sales.is_finite() {
            return Err(invalid(format!("sales value {} is not finite", self.sales)));
        }

        Ok(SalesRecord {
            date,
            store_id: self.store,
            sales: self.sales,
            promo,
            holiday,
        })
    }
}
