use crate::config::WORKSHEET_NAME;
use crate::error::Result;
use crate::types::{
    MarketMetrics, MetricsTable, COL_CLICKS, COL_CONVERSION_RATE, COL_COST, COL_CPL, COL_CTR,
    COL_LEADS, COL_MARKET,
};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

pub fn render_table_rows<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

/// Write a metric cell. Missing and NaN become blank cells, infinities the
/// strings `inf`/`-inf`.
fn write_metric(ws: &mut Worksheet, row: u32, col: u16, v: Option<f64>) -> Result<()> {
    match v {
        Some(x) if x.is_nan() => {}
        Some(x) if x.is_infinite() => {
            ws.write_string(row, col, if x > 0.0 { "inf" } else { "-inf" })?;
        }
        Some(x) => {
            ws.write_number(row, col, x)?;
        }
        None => {}
    }
    Ok(())
}

/// Columns the pipeline does not interpret go out as numbers when they look
/// like one, text otherwise.
fn write_passthrough(ws: &mut Worksheet, row: u32, col: u16, raw: &str) -> Result<()> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    match trimmed.parse::<f64>() {
        Ok(x) if x.is_finite() => {
            ws.write_number(row, col, x)?;
        }
        _ => {
            ws.write_string(row, col, raw)?;
        }
    }
    Ok(())
}

/// Value for a column the pipeline owns, or `None` for a pass-through column.
fn owned_value(m: &MarketMetrics, name: &str) -> Option<Option<f64>> {
    match name {
        COL_COST => Some(m.cost),
        COL_CLICKS => Some(m.clicks.map(|c| c as f64)),
        COL_LEADS => Some(m.leads_number.map(|l| l as f64)),
        COL_CTR => Some(m.ctr),
        COL_CPL => Some(m.cpl),
        COL_CONVERSION_RATE => Some(m.conversion_rate),
        _ => None,
    }
}

fn write_row(ws: &mut Worksheet, row: u32, headers: &[&str], m: &MarketMetrics) -> Result<()> {
    for (idx, name) in headers.iter().enumerate() {
        let col = idx as u16;
        if *name == COL_MARKET {
            ws.write_string(row, col, m.market.as_str())?;
        } else if let Some(value) = owned_value(m, name) {
            write_metric(ws, row, col, value)?;
        } else {
            let raw = m.cells.get(idx).map(String::as_str).unwrap_or("");
            write_passthrough(ws, row, col, raw)?;
        }
    }
    Ok(())
}

/// Input columns in order, then whichever derived columns the input did
/// not already carry. An input `CPL` column is overwritten in place.
fn export_headers(columns: &[String]) -> Vec<&str> {
    let mut headers: Vec<&str> = columns.iter().map(String::as_str).collect();
    for derived in [COL_CPL, COL_CONVERSION_RATE] {
        if !headers.contains(&derived) {
            headers.push(derived);
        }
    }
    headers
}

/// Export the full table to a single-sheet workbook, replacing any existing
/// file at `path`.
pub fn write_xlsx<P: AsRef<Path>>(path: P, table: &MetricsTable) -> Result<()> {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.set_name(WORKSHEET_NAME)?;

    let headers = export_headers(&table.columns);
    for (col, name) in headers.iter().enumerate() {
        ws.write_string(0, col as u16, *name)?;
    }

    for (idx, m) in table.rows.iter().enumerate() {
        write_row(ws, idx as u32 + 1, &headers, m)?;
    }

    workbook.save(path.as_ref())?;
    info!(
        "Exported {} rows to {}",
        crate::util::format_int(table.rows.len()),
        path.as_ref().display()
    );
    Ok(())
}
