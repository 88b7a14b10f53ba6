mod filter;
mod record;

pub use filter::RecordFilter;
pub use record::{Promo, SalesRecord};

use crate::AbShopResult;
use chrono::NaiveDate;
use log::{info, trace};
use record::RawRecord;
use std::{collections::BTreeMap, fs::File, io, path::Path};

/// The in-memory sales table.
#[derive(Debug, Default, Clone)]
pub struct Dataset {
    records: Vec<SalesRecord>,
}

impl From<Vec<SalesRecord>> for Dataset {
    fn from(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }
}

impl Dataset {
    /// Reads the CSV file with the columns `date, store, sales, promo, holiday`.
    pub fn load(path: &Path) -> AbShopResult<Self> {
        info!("Loading sales data from {:?}", path.as_os_str());
        let file = File::open(path)?;
        let dataset = Self::from_reader(file)?;
        info!("Loaded {} records", dataset.len());
        Ok(dataset)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> AbShopResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (idx, result) in reader.deserialize::<RawRecord>().enumerate() {
            // NOTE: the header is line 1
            let line = idx as u64 + 2;
            let record = result?.into_record(line)?;
            records.push(record);
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn filter(&self, filter: &RecordFilter) -> Dataset {
        let records: Vec<SalesRecord> = self
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        trace!(
            "Filter '{}' kept {} of {} records",
            filter,
            records.len(),
            self.len()
        );
        Dataset { records }
    }

    /// Sales values partitioned by the promotion flag.
    /// Both groups are present, possibly empty.
    pub fn sales_by_promo(&self) -> BTreeMap<Promo, Vec<f64>> {
        let mut groups = BTreeMap::from([(Promo::Without, Vec::new()), (Promo::With, Vec::new())]);
        for record in self.records.iter() {
            groups
                .entry(record.promo)
                .or_insert_with(Vec::new)
                .push(record.sales);
        }
        groups
    }

    /// Mean sales per day for each promotion group, ordered by date.
    pub fn daily_mean_sales(&self) -> BTreeMap<Promo, Vec<(NaiveDate, f64)>> {
        let mut totals: BTreeMap<Promo, BTreeMap<NaiveDate, (f64, usize)>> = BTreeMap::new();
        for record in self.records.iter() {
            totals
                .entry(record.promo)
                .or_default()
                .entry(record.date)
                .and_modify(|(total, count)| {
                    *total += record.sales;
                    *count += 1;
                })
                .or_insert((record.sales, 1));
        }

        totals
            .into_iter()
            .map(|(promo, by_date)| {
                let series = by_date
                    .into_iter()
                    .map(|(date, (total, count))| (date, total / count as f64))
                    .collect();
                (promo, series)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AbShopError;

    const CSV: &str = "date,store,sales,promo,holiday
2023-01-01,1,100.0,0,1
2023-01-01,2,150.0,1,1
2023-01-02,1,120.0,1,0
2023-01-02,2,80.0,1,0
2023-01-03,1,90.5,0,0
";

    fn dataset() -> Dataset {
        Dataset::from_reader(CSV.as_bytes()).unwrap()
    }

    #[test]
    fn test_from_reader() {
        let dataset = dataset();
        assert_eq!(dataset.len(), 5);

        let first = &dataset.records()[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(first.store_id, 1);
        assert_eq!(first.sales, 100.0);
        assert_eq!(first.promo, Promo::Without);
        assert!(first.holiday);
    }

    #[test]
    fn test_renamed_columns() {
        let csv = "Date,Store_ID,Sales,Promo,Holiday\n2023-01-01,4,10.0,1,0\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.records()[0].store_id, 4);
    }

    #[test]
    fn test_invalid_rows() {
        let csv = "date,store,sales,promo,holiday\n2023-01-01,1,10.0,1,0\n2023-01-02,1,12.0,3,0\n";
        assert!(matches!(
            Dataset::from_reader(csv.as_bytes()),
            Err(AbShopError::InvalidRecord { line: 3, .. })
        ));

        let csv = "date,store,sales,promo,holiday\n2023-01-01,1,many,1,0\n";
        assert!(matches!(
            Dataset::from_reader(csv.as_bytes()),
            Err(AbShopError::Csv(_))
        ));
    }

    #[test]
    fn test_filter() {
        let dataset = dataset();

        assert_eq!(dataset.filter(&RecordFilter::all()).len(), 5);

        let usual_days = dataset.filter(&RecordFilter::usual_days(1));
        assert_eq!(usual_days.len(), 2);
        assert!(usual_days
            .records()
            .iter()
            .all(|r| r.store_id == 1 && !r.holiday));

        let store_2 = RecordFilter {
            store_id: Some(2),
            exclude_holidays: false,
        };
        assert_eq!(dataset.filter(&store_2).len(), 2);
    }

    #[test]
    fn test_sales_by_promo() {
        let groups = dataset().sales_by_promo();
        assert_eq!(groups[&Promo::Without], vec![100.0, 90.5]);
        assert_eq!(groups[&Promo::With], vec![150.0, 120.0, 80.0]);

        let empty = Dataset::default().sales_by_promo();
        assert_eq!(empty.len(), 2);
        assert!(empty.values().all(|v| v.is_empty()));
    }

    #[test]
    fn test_daily_mean_sales() {
        let series = dataset().daily_mean_sales();
        let day = |d| NaiveDate::from_ymd_opt(2023, 1, d).unwrap();

        assert_eq!(series[&Promo::With], vec![(day(1), 150.0), (day(2), 100.0)]);
        assert_eq!(
            series[&Promo::Without],
            vec![(day(1), 100.0), (day(3), 90.5)]
        );
    }
}
