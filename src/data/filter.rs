use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{SalesDataset, Transaction};
use crate::error::ReportError;

// ---------------------------------------------------------------------------
// Filter criteria: selected regions, stores and sale period
// ---------------------------------------------------------------------------

/// Sale period as chosen in the date pickers. Either end may still be unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Both endpoints, in order, or `InvalidCriteria`.
    pub fn bounds(&self) -> Result<(NaiveDate, NaiveDate), ReportError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => Ok((start, end)),
            (Some(start), Some(end)) => Err(ReportError::InvalidCriteria(format!(
                "start date {start} is after end date {end}"
            ))),
            _ => Err(ReportError::InvalidCriteria(
                "select both a start and an end date".to_string(),
            )),
        }
    }
}

/// What the user selected in the side panel.
///
/// An empty region or store set selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub regions: BTreeSet<String>,
    pub stores: BTreeSet<String>,
    pub period: DateRange,
}

impl FilterCriteria {
    /// Everything selected: all regions, all stores, the dataset's own date bounds.
    pub fn select_all(dataset: &SalesDataset) -> Self {
        Self {
            regions: dataset.regions.iter().cloned().collect(),
            stores: dataset.stores.iter().cloned().collect(),
            period: dataset
                .date_bounds
                .map(|(lo, hi)| DateRange::new(lo, hi))
                .unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Transactions passing the current criteria, in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a SalesDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Indices into `dataset.transactions`.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Surviving transactions paired with their year-month label.
    pub fn iter(&self) -> impl Iterator<Item = (&'a Transaction, &'a str)> + '_ {
        let dataset = self.dataset;
        self.indices
            .iter()
            .map(move |&i| (&dataset.transactions[i], dataset.year_months[i].as_str()))
    }
}

/// Apply `criteria` to `dataset`.
///
/// A transaction passes when its region and store are selected and its date
/// lies within the period, both ends inclusive. Fails with `InvalidCriteria`
/// before looking at any row when the period is incomplete or reversed.
pub fn apply<'a>(
    dataset: &'a SalesDataset,
    criteria: &FilterCriteria,
) -> Result<FilteredView<'a>, ReportError> {
    let (start, end) = criteria.period.bounds()?;

    let indices = dataset
        .transactions
        .iter()
        .enumerate()
        .filter(|(_, tx)| {
            criteria.regions.contains(&tx.region)
                && criteria.stores.contains(&tx.store)
                && start <= tx.date
                && tx.date <= end
        })
        .map(|(i, _)| i)
        .collect();

    Ok(FilteredView { dataset, indices })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> SalesDataset {
        let rows = [
            ("SP", "A", date(2024, 1, 5), 100.0, 2),
            ("SP", "B", date(2024, 2, 10), 50.0, 1),
            ("RJ", "A", date(2024, 2, 20), 30.0, 1),
            ("MG", "C", date(2024, 3, 31), 10.0, 0),
        ];
        SalesDataset::from_transactions(
            rows.iter()
                .map(|&(region, store, date, amount, quantity)| Transaction {
                    region: region.to_string(),
                    store: store.to_string(),
                    date,
                    amount,
                    quantity,
                })
                .collect(),
        )
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_full_selection_returns_whole_dataset_in_order() {
        let ds = sample();
        let criteria = FilterCriteria::select_all(&ds);
        let view = apply(&ds, &criteria).unwrap();

        assert_eq!(view.indices(), &[0, 1, 2, 3]);
        let rows: Vec<&Transaction> = view.iter().map(|(tx, _)| tx).collect();
        let all: Vec<&Transaction> = ds.transactions.iter().collect();
        assert_eq!(rows, all);
    }

    #[test]
    fn test_region_filter() {
        let ds = sample();
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.regions = set(&["SP"]);

        let view = apply(&ds, &criteria).unwrap();
        assert_eq!(view.indices(), &[0, 1]);
    }

    #[test]
    fn test_all_three_predicates_are_combined() {
        let ds = sample();
        let criteria = FilterCriteria {
            regions: set(&["SP", "RJ"]),
            stores: set(&["A"]),
            period: DateRange::new(date(2024, 2, 1), date(2024, 12, 31)),
        };

        let view = apply(&ds, &criteria).unwrap();
        assert_eq!(view.indices(), &[2]);
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let ds = sample();
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.period = DateRange::new(date(2024, 2, 10), date(2024, 3, 31));

        let view = apply(&ds, &criteria).unwrap();
        assert_eq!(view.indices(), &[1, 2, 3]);
    }

    #[test]
    fn test_single_day_range() {
        let ds = sample();
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.period = DateRange::new(date(2024, 1, 5), date(2024, 1, 5));

        let view = apply(&ds, &criteria).unwrap();
        assert_eq!(view.indices(), &[0]);
    }

    #[test]
    fn test_empty_store_set_yields_empty_view() {
        let ds = sample();
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.stores.clear();

        let view = apply(&ds, &criteria).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn test_unknown_values_select_nothing() {
        let ds = sample();
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.regions = set(&["BA"]);

        assert_eq!(apply(&ds, &criteria).unwrap().len(), 0);
    }

    #[test]
    fn test_missing_endpoint_is_rejected() {
        let ds = sample();
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.period.end = None;

        assert!(matches!(
            apply(&ds, &criteria),
            Err(ReportError::InvalidCriteria(_))
        ));

        criteria.period = DateRange::default();
        assert!(apply(&ds, &criteria).is_err());
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let ds = sample();
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.period = DateRange::new(date(2024, 3, 1), date(2024, 1, 1));

        let err = apply(&ds, &criteria).unwrap_err();
        assert!(err.to_string().contains("after"));
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let ds = sample();
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.stores = set(&["A", "C"]);

        let first = apply(&ds, &criteria).unwrap();
        let second = apply(&ds, &criteria).unwrap();
        assert_eq!(first.indices(), second.indices());
    }

    #[test]
    fn test_empty_dataset_select_all_has_no_period() {
        let ds = SalesDataset::default();
        let criteria = FilterCriteria::select_all(&ds);
        assert!(apply(&ds, &criteria).is_err());
    }
}
