use crate::config::{RANK_SIZE, RULE_WIDTH};
use crate::output::render_table_rows;
use crate::types::{CplRankingRow, CtrRankingRow, MarketMetrics, MetricsTable, Recommendations};
use crate::util::{cmp_metric, format_metric};
use std::collections::HashSet;
use std::fmt::Write;
use tracing::debug;

/// Top and bottom subsets, borrowed from the metrics table.
#[derive(Debug, Clone)]
pub struct PerformanceAnalysis<'a> {
    pub top_cpl: Vec<&'a MarketMetrics>,
    pub top_conversion: Vec<&'a MarketMetrics>,
    pub top_ctr: Vec<&'a MarketMetrics>,
    pub bottom_cpl: Vec<&'a MarketMetrics>,
    pub bottom_ctr: Vec<&'a MarketMetrics>,
}

/// Stable sort on one metric, then keep the first `RANK_SIZE` rows. Ties
/// stay in input order.
fn rank_by<'a, F>(rows: &[&'a MarketMetrics], key: F, ascending: bool) -> Vec<&'a MarketMetrics>
where
    F: Fn(&MarketMetrics) -> Option<f64>,
{
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| cmp_metric(key(*a), key(*b), ascending));
    sorted.truncate(RANK_SIZE);
    sorted
}

pub fn analyze_performance(table: &MetricsTable) -> PerformanceAnalysis<'_> {
    let all: Vec<&MarketMetrics> = table.rows.iter().collect();
    let valid: Vec<&MarketMetrics> = table.rows.iter().filter(|r| r.is_valid()).collect();
    debug!("{} of {} markets have leads", valid.len(), all.len());

    let analysis = PerformanceAnalysis {
        top_cpl: rank_by(&valid, |r| r.cpl, true),
        top_conversion: rank_by(&valid, |r| r.conversion_rate, false),
        top_ctr: rank_by(&all, |r| r.ctr, false),
        bottom_cpl: rank_by(&valid, |r| r.cpl, false),
        bottom_ctr: rank_by(&all, |r| r.ctr, true),
    };
    debug!(
        "Top conversion: {:?}",
        analysis.top_conversion.iter().map(|r| r.market.as_str()).collect::<Vec<_>>()
    );
    analysis
}

fn push_unique(list: &mut Vec<String>, seen: &mut HashSet<String>, rows: &[&MarketMetrics]) {
    for r in rows {
        if seen.insert(r.market.clone()) {
            list.push(r.market.clone());
        }
    }
}

/// Leaders on CPL and CTR get more budget, laggards on the same metrics get
/// less. Each list keeps first-seen order with duplicates dropped; the two
/// lists are independent, so a market can land in both.
pub fn budget_recommendations(analysis: &PerformanceAnalysis<'_>) -> Recommendations {
    let mut increase = Vec::new();
    let mut seen = HashSet::new();
    push_unique(&mut increase, &mut seen, &analysis.top_cpl);
    push_unique(&mut increase, &mut seen, &analysis.top_ctr);

    let mut decrease = Vec::new();
    let mut seen = HashSet::new();
    push_unique(&mut decrease, &mut seen, &analysis.bottom_cpl);
    push_unique(&mut decrease, &mut seen, &analysis.bottom_ctr);

    Recommendations { increase, decrease }
}

fn cpl_rows(rows: &[&MarketMetrics]) -> Vec<CplRankingRow> {
    rows.iter()
        .map(|r| CplRankingRow {
            market: r.market.clone(),
            cpl: format_metric(r.cpl),
            conversion_rate: format_metric(r.conversion_rate),
            ctr: format_metric(r.ctr),
        })
        .collect()
}

fn ctr_rows(rows: &[&MarketMetrics]) -> Vec<CtrRankingRow> {
    rows.iter()
        .map(|r| CtrRankingRow {
            market: r.market.clone(),
            ctr: format_metric(r.ctr),
            cpl: format_metric(r.cpl),
            conversion_rate: format_metric(r.conversion_rate),
        })
        .collect()
}

pub fn render_report(analysis: &PerformanceAnalysis<'_>, recs: &Recommendations) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "Key Performance Analysis");
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "\nTop {} Markets by Cost Per Lead:", RANK_SIZE);
    let _ = writeln!(out, "{}", render_table_rows(&cpl_rows(&analysis.top_cpl), RANK_SIZE));
    let _ = writeln!(out, "\nTop {} Markets by CTR:", RANK_SIZE);
    let _ = writeln!(out, "{}", render_table_rows(&ctr_rows(&analysis.top_ctr), RANK_SIZE));
    let _ = writeln!(out, "\n\nBudget Reallocation Recommendations");
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Increase budget for: {}", recs.increase.join(", "));
    let _ = writeln!(out, "Decrease budget for: {}", recs.decrease.join(", "));
    out
}
