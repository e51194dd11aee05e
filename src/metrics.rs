use crate::types::{MarketMetrics, MetricsTable, SourceTable};
use tracing::warn;

/// Derive CPL, Conversion_Rate and CTR-as-percentage for every row.
///
/// Division is unguarded: a missing operand yields `None`, and a zero click
/// count with leads present yields `+inf`.
pub fn derive_metrics(table: SourceTable) -> MetricsTable {
    let rows = table
        .rows
        .into_iter()
        .map(|row| {
            let cpl = match (row.cost, row.leads_number) {
                (Some(cost), Some(leads)) => Some(cost / leads as f64),
                _ => None,
            };
            let conversion_rate = match (row.leads_number, row.clicks) {
                (Some(leads), Some(clicks)) => Some(leads as f64 / clicks as f64),
                _ => None,
            };
            if conversion_rate.is_some_and(f64::is_infinite) {
                warn!("Market {:?} has leads but zero clicks; conversion rate is infinite", row.market);
            }
            MarketMetrics {
                market: row.market,
                cost: row.cost,
                clicks: row.clicks,
                leads_number: row.leads_number,
                ctr: row.ctr.map(|ctr| ctr * 100.0),
                cpl,
                conversion_rate,
                cells: row.cells,
            }
        })
        .collect();
    MetricsTable {
        columns: table.columns,
        rows,
    }
}
