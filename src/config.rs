/// Campaign export read at startup, relative to the working directory.
pub const INPUT_PATH: &str = "SEA_Oct_2024 (1).csv";

/// Spreadsheet written after the report. Overwritten on every run.
pub const OUTPUT_PATH: &str = "SEA_analysis.xlsx";

pub const WORKSHEET_NAME: &str = "Sheet1";

/// Rows kept in each top/bottom ranking subset.
pub const RANK_SIZE: usize = 3;

/// Width of the `=` rule printed under each report section header.
pub const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone)]
pub struct Config {
    pub input_path: String,
    pub output_path: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: INPUT_PATH.to_string(),
            output_path: OUTPUT_PATH.to_string(),
            log_level: "info".to_string(),
        }
    }
}
