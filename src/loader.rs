use crate::error::{AppError, Result};
use crate::types::{
    RawRow, SourceRow, SourceTable, COL_CLICKS, COL_COST, COL_CTR, COL_LEADS, REQUIRED_COLUMNS,
};
use crate::util::{parse_count_safe, parse_f64_safe};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub zero_lead_rows: usize,
}

/// Column names as exported can contain spaces (`Leads Number`); the rest
/// of the pipeline addresses them with underscores.
pub fn normalize_headers(headers: &StringRecord) -> StringRecord {
    headers.iter().map(|h| h.replace(' ', "_")).collect()
}

pub fn load_table<P: AsRef<Path>>(path: P) -> Result<SourceTable> {
    let rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    read_table(rdr)
}

pub fn read_table<R: Read>(mut rdr: csv::Reader<R>) -> Result<SourceTable> {
    let headers = normalize_headers(rdr.headers()?);
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(AppError::MissingColumn(required.to_string()));
        }
    }
    rdr.set_headers(headers.clone());

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let mut record = result?;
        // Ragged exports drop trailing empty cells; pad them back.
        while record.len() < headers.len() {
            record.push_field("");
        }
        let raw: RawRow = record.deserialize(Some(&headers))?;
        // Header row is line 1.
        let line = idx + 2;

        let cost = parse_cell(line, COL_COST, raw.cost.as_deref(), parse_f64_safe)?;
        let clicks = parse_cell(line, COL_CLICKS, raw.clicks.as_deref(), parse_count_safe)?;
        let leads_number =
            parse_cell(line, COL_LEADS, raw.leads_number.as_deref(), parse_count_safe)?;
        let ctr = parse_cell(line, COL_CTR, raw.ctr.as_deref(), parse_f64_safe)?;

        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
        cells.resize(headers.len(), String::new());

        rows.push(SourceRow {
            market: raw.market.unwrap_or_default(),
            cost,
            clicks,
            leads_number,
            ctr,
            cells,
        });
    }

    debug!("Read {} columns: {:?}", headers.len(), headers);
    Ok(SourceTable {
        columns: headers.iter().map(str::to_string).collect(),
        rows,
    })
}

/// Blank or absent cells are missing values. Anything else must parse; a
/// stray word in a numeric column stops the load.
fn parse_cell<T>(
    row: usize,
    column: &str,
    raw: Option<&str>,
    parse: fn(Option<&str>) -> Option<T>,
) -> Result<Option<T>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse(Some(value)).map(Some).ok_or_else(|| AppError::InvalidValue {
            row,
            column: column.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Zero leads means "no data" in these exports; mark it missing so it
/// never reaches a division as a real zero.
pub fn clean_table(table: SourceTable) -> (SourceTable, usize) {
    let mut zero_lead_rows = 0usize;
    let rows = table
        .rows
        .into_iter()
        .map(|mut row| {
            if row.leads_number == Some(0) {
                row.leads_number = None;
                zero_lead_rows += 1;
            }
            row
        })
        .collect();
    (
        SourceTable {
            columns: table.columns,
            rows,
        },
        zero_lead_rows,
    )
}

pub fn load_and_clean<P: AsRef<Path>>(path: P) -> Result<(SourceTable, LoadReport)> {
    let table = load_table(path)?;
    let total_rows = table.rows.len();
    let (table, zero_lead_rows) = clean_table(table);
    debug!("Cleaned {} rows", total_rows);
    Ok((
        table,
        LoadReport {
            total_rows,
            zero_lead_rows,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn reader(data: &str) -> csv::Reader<&[u8]> {
        ReaderBuilder::new().flexible(true).from_reader(data.as_bytes())
    }

    #[test]
    fn headers_with_spaces_are_normalized() {
        let table = read_table(reader(
            "Market,Cost,Clicks,Leads Number,CTR,Avg CPC\nA,100,50,10,0.05,2\n",
        ))
        .unwrap();
        assert_eq!(
            table.columns,
            vec!["Market", "Cost", "Clicks", "Leads_Number", "CTR", "Avg_CPC"]
        );
        let row = &table.rows[0];
        assert_eq!(row.market, "A");
        assert_eq!(row.cost, Some(100.0));
        assert_eq!(row.clicks, Some(50));
        assert_eq!(row.leads_number, Some(10));
        assert_eq!(row.ctr, Some(0.05));
        assert_eq!(row.cells[5], "2");
    }

    #[test]
    fn missing_column_is_fatal() {
        let err = read_table(reader("Market,Cost,Clicks,CTR\nA,1,2,0.1\n")).unwrap_err();
        assert!(matches!(err, AppError::MissingColumn(ref c) if c == "Leads_Number"));
    }

    #[test]
    fn unparseable_number_is_fatal() {
        let err = read_table(reader(
            "Market,Cost,Clicks,Leads_Number,CTR\nA,1,2,3,0.1\nB,abc,2,3,0.1\n",
        ))
        .unwrap_err();
        match err {
            AppError::InvalidValue { row, column, value } => {
                assert_eq!(row, 3);
                assert_eq!(column, "Cost");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn exponent_notation_ctr_is_read() {
        let table = read_table(reader(
            "Market,Cost,Clicks,Leads_Number,CTR\nA,100,50,10,5e-05\n",
        ))
        .unwrap();
        assert_eq!(table.rows[0].ctr, Some(0.00005));
    }

    #[test]
    fn empty_numeric_cells_are_missing() {
        let table = read_table(reader(
            "Market,Cost,Clicks,Leads_Number,CTR\nA,100,,10,0.05\nB,,20,5,\n",
        ))
        .unwrap();
        assert_eq!(table.rows[0].clicks, None);
        assert_eq!(table.rows[0].cost, Some(100.0));
        assert_eq!(table.rows[1].cost, None);
        assert_eq!(table.rows[1].ctr, None);
        assert_eq!(table.rows[1].clicks, Some(20));
    }

    #[test]
    fn short_rows_fill_missing_cells() {
        let table = read_table(reader(
            "Market,Cost,Clicks,Leads_Number,CTR,Note\nA,100,50\nB,50,20,5,0.01,x\n",
        ))
        .unwrap();
        let a = &table.rows[0];
        assert_eq!(a.cost, Some(100.0));
        assert_eq!(a.clicks, Some(50));
        assert_eq!(a.leads_number, None);
        assert_eq!(a.ctr, None);
        assert_eq!(a.cells.len(), 6);
        assert_eq!(a.cells[5], "");
        assert_eq!(table.rows[1].ctr, Some(0.01));
    }

    #[test]
    fn empty_leads_cell_is_missing() {
        let table =
            read_table(reader("Market,Cost,Clicks,Leads_Number,CTR\nA,1,2,,0.1\n")).unwrap();
        assert_eq!(table.rows[0].leads_number, None);
    }

    #[test]
    fn clean_table_nulls_zero_leads_only() {
        let table = read_table(reader(
            "Market,Cost,Clicks,Leads_Number,CTR\nA,100,50,10,0.05\nB,80,40,0,0.02\n",
        ))
        .unwrap();
        let (cleaned, zero) = clean_table(table);
        assert_eq!(zero, 1);
        assert_eq!(cleaned.rows[0].leads_number, Some(10));
        assert_eq!(cleaned.rows[1].leads_number, None);
        // Raw cells keep what the export said.
        assert_eq!(cleaned.rows[1].cells[3], "0");
    }

    #[test]
    fn load_and_clean_reads_from_disk() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "Market,Cost,Clicks,Leads Number,CTR").unwrap();
        writeln!(file, "A,100,50,10,0.05").unwrap();
        writeln!(file, "B,80,40,0,0.02").unwrap();
        file.flush().unwrap();

        let (table, report) = load_and_clean(file.path()).unwrap();
        assert_eq!(report.total_rows, 2);
        assert_eq!(report.zero_lead_rows, 1);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_and_clean(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, AppError::Csv(_)));
    }
}
