use std::collections::{BTreeMap, HashMap};

use super::filter::FilteredView;

// ---------------------------------------------------------------------------
// Summary rows
// ---------------------------------------------------------------------------

/// Total sold by one store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSummary {
    pub store: String,
    pub amount: f64,
}

/// Totals for one region code.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSummary {
    pub region: String,
    pub amount: f64,
    pub quantity: u64,
    /// `amount / quantity`; `None` when no units were sold.
    pub ticket_average: Option<f64>,
}

/// Total sold in one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    /// `"YYYY-MM"`.
    pub year_month: String,
    pub amount: f64,
}

/// Everything the dashboard shows for one filter selection.
///
/// Currency values are raw numbers; formatting belongs to the UI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesReport {
    /// Number of transactions in the filtered view.
    pub row_count: usize,
    pub total: f64,
    /// Descending by amount.
    pub stores: Vec<StoreSummary>,
    /// Ascending by region code.
    pub regions: Vec<RegionSummary>,
    /// Ascending by year-month.
    pub monthly: Vec<MonthlySummary>,
    pub best_month: Option<MonthlySummary>,
}

impl SalesReport {
    /// No transaction matched the criteria.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Compute total, per-store, per-region and per-month sums in one pass.
pub fn aggregate(view: &FilteredView<'_>) -> SalesReport {
    let mut total = 0.0;
    // Store groups keep first-seen order so the stable sort below breaks ties by it.
    let mut stores: Vec<StoreSummary> = Vec::new();
    let mut store_slot: HashMap<&str, usize> = HashMap::new();
    let mut regions: BTreeMap<&str, (f64, u64)> = BTreeMap::new();
    let mut monthly: BTreeMap<&str, f64> = BTreeMap::new();

    for (tx, year_month) in view.iter() {
        total += tx.amount;

        let slot = *store_slot.entry(tx.store.as_str()).or_insert_with(|| {
            stores.push(StoreSummary {
                store: tx.store.clone(),
                amount: 0.0,
            });
            stores.len() - 1
        });
        stores[slot].amount += tx.amount;

        let region = regions.entry(tx.region.as_str()).or_default();
        region.0 += tx.amount;
        // Saturates instead of wrapping; such a region's ticket average is then an upper bound.
        region.1 = region.1.saturating_add(tx.quantity);

        *monthly.entry(year_month).or_default() += tx.amount;
    }

    stores.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    let regions = regions
        .into_iter()
        .map(|(region, (amount, quantity))| RegionSummary {
            region: region.to_string(),
            amount,
            quantity,
            ticket_average: ticket_average(amount, quantity),
        })
        .collect();

    let monthly: Vec<MonthlySummary> = monthly
        .into_iter()
        .map(|(year_month, amount)| MonthlySummary {
            year_month: year_month.to_string(),
            amount,
        })
        .collect();

    let best_month = find_best_month(&monthly);

    SalesReport {
        row_count: view.len(),
        total,
        stores,
        regions,
        monthly,
        best_month,
    }
}

fn ticket_average(amount: f64, quantity: u64) -> Option<f64> {
    if quantity == 0 {
        None
    } else {
        Some(amount / quantity as f64)
    }
}

/// Month with the highest total. The earliest month wins a tie.
pub fn find_best_month(monthly: &[MonthlySummary]) -> Option<MonthlySummary> {
    let mut best: Option<&MonthlySummary> = None;
    for entry in monthly {
        match best {
            Some(b) if entry.amount <= b.amount => {}
            _ => best = Some(entry),
        }
    }
    best.cloned()
}
