// Utility helpers for parsing, ordering and formatting numbers.
//
// CSV exports from ad platforms are loose about numeric formatting, so the
// loader funnels every numeric cell through here.
use num_format::{Locale, ToFormattedString};
use std::cmp::Ordering;

/// Parse a numeric cell. Surrounding whitespace and `,` thousands
/// separators are ignored; exponent notation (`5e-05`) is accepted since ad
/// platforms write small rates that way. `None` for empty or non-numeric.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.replace(',', "").parse::<f64>().ok()
}

/// Parse a non-negative whole count. Exports sometimes write counts as
/// `12.0`, which is accepted; `12.5` and negatives are not.
pub fn parse_count_safe(s: Option<&str>) -> Option<u64> {
    let v = parse_f64_safe(s)?;
    if v < 0.0 || v.fract() != 0.0 || v > u64::MAX as f64 {
        return None;
    }
    Some(v as u64)
}

/// Compare two optional metrics, keeping missing and NaN values last
/// regardless of direction.
pub fn cmp_metric(a: Option<f64>, b: Option<f64>, ascending: bool) -> Ordering {
    let a = a.filter(|v| !v.is_nan());
    let b = b.filter(|v| !v.is_nan());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        }
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with a fixed number of decimal places
    // and locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Past u64 range the digits go out without separators.
    let mut res = match int_part.parse::<u64>() {
        Ok(v) => v.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg && s.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", res)
    } else {
        res
    }
}

/// Render a metric cell for the console report.
pub fn format_metric(v: Option<f64>) -> String {
    match v {
        None => "NaN".to_string(),
        Some(x) if x.is_nan() => "NaN".to_string(),
        Some(x) if x.is_infinite() => {
            if x > 0.0 {
                "inf".to_string()
            } else {
                "-inf".to_string()
            }
        }
        Some(x) => format_number(x, 6),
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
