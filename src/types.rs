use serde::Deserialize;
use tabled::Tabled;

pub const COL_MARKET: &str = "Market";
pub const COL_COST: &str = "Cost";
pub const COL_CLICKS: &str = "Clicks";
pub const COL_LEADS: &str = "Leads_Number";
pub const COL_CTR: &str = "CTR";
pub const COL_CPL: &str = "CPL";
pub const COL_CONVERSION_RATE: &str = "Conversion_Rate";

pub const REQUIRED_COLUMNS: [&str; 5] = [COL_MARKET, COL_COST, COL_CLICKS, COL_LEADS, COL_CTR];

/// Required fields of one CSV row, deserialized against the normalized header.
/// Empty cells and cells cut off by a short row both come through as `None`.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Market", default)]
    pub market: Option<String>,
    #[serde(rename = "Cost", default)]
    pub cost: Option<String>,
    #[serde(rename = "Clicks", default)]
    pub clicks: Option<String>,
    #[serde(rename = "Leads_Number", default)]
    pub leads_number: Option<String>,
    #[serde(rename = "CTR", default)]
    pub ctr: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub market: String,
    pub cost: Option<f64>,
    pub clicks: Option<u64>,
    pub leads_number: Option<u64>,
    /// CTR as a fraction, as exported.
    pub ctr: Option<f64>,
    /// Every cell of the row as read, aligned with `SourceTable::columns`.
    pub cells: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SourceTable {
    pub columns: Vec<String>,
    pub rows: Vec<SourceRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketMetrics {
    pub market: String,
    pub cost: Option<f64>,
    pub clicks: Option<u64>,
    pub leads_number: Option<u64>,
    /// CTR as a percentage.
    pub ctr: Option<f64>,
    pub cpl: Option<f64>,
    pub conversion_rate: Option<f64>,
    pub cells: Vec<String>,
}

impl MarketMetrics {
    /// A market with a lead count is eligible for the lead-based rankings.
    pub fn is_valid(&self) -> bool {
        self.leads_number.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct MetricsTable {
    /// Input columns in input order; `CPL` and `Conversion_Rate` follow on export.
    pub columns: Vec<String>,
    pub rows: Vec<MarketMetrics>,
}

#[derive(Debug, Clone, Tabled)]
pub struct CplRankingRow {
    #[tabled(rename = "Market")]
    pub market: String,
    #[tabled(rename = "CPL")]
    pub cpl: String,
    #[tabled(rename = "Conversion_Rate")]
    pub conversion_rate: String,
    #[tabled(rename = "CTR")]
    pub ctr: String,
}

#[derive(Debug, Clone, Tabled)]
pub struct CtrRankingRow {
    #[tabled(rename = "Market")]
    pub market: String,
    #[tabled(rename = "CTR")]
    pub ctr: String,
    #[tabled(rename = "CPL")]
    pub cpl: String,
    #[tabled(rename = "Conversion_Rate")]
    pub conversion_rate: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recommendations {
    pub increase: Vec<String>,
    pub decrease: Vec<String>,
}
