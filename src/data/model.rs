use std::collections::HashSet;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Transaction – one row of the sales sheet
// ---------------------------------------------------------------------------

/// A single sale event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Region (state) code of the purchase, e.g. `"SP"`.
    pub region: String,
    /// Store name.
    pub store: String,
    /// Sale date.
    pub date: NaiveDate,
    /// Sale amount in currency units.
    pub amount: f64,
    /// Units sold.
    pub quantity: u64,
}

/// `"YYYY-MM"` grouping key for a date. Lexicographic order is chronological.
pub fn year_month_label(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

// ---------------------------------------------------------------------------
// SalesDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed indices.
#[derive(Debug, Clone, Default)]
pub struct SalesDataset {
    /// All transactions in load order.
    pub transactions: Vec<Transaction>,
    /// `year_months[i]` is the year-month label of `transactions[i]`.
    pub year_months: Vec<String>,
    /// Unique region codes, first-appearance order.
    pub regions: Vec<String>,
    /// Unique store names, first-appearance order.
    pub stores: Vec<String>,
    /// Earliest and latest sale date.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
}

impl SalesDataset {
    /// Build labels and column indices from the loaded transactions.
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        let mut regions = Vec::new();
        let mut stores = Vec::new();
        let mut seen_regions: HashSet<&str> = HashSet::new();
        let mut seen_stores: HashSet<&str> = HashSet::new();
        let mut date_bounds: Option<(NaiveDate, NaiveDate)> = None;

        for tx in &transactions {
            if seen_regions.insert(&tx.region) {
                regions.push(tx.region.clone());
            }
            if seen_stores.insert(&tx.store) {
                stores.push(tx.store.clone());
            }
            date_bounds = Some(match date_bounds {
                None => (tx.date, tx.date),
                Some((lo, hi)) => (lo.min(tx.date), hi.max(tx.date)),
            });
        }

        let year_months = transactions
            .iter()
            .map(|tx| year_month_label(tx.date))
            .collect();

        SalesDataset {
            transactions,
            year_months,
            regions,
            stores,
            date_bounds,
        }
    }

    /// Number of transactions.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
