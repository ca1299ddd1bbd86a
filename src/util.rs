// Parsing and formatting helpers.
//
// Spreadsheet exports are messy: values come with thousands separators,
// currency symbols and dates in more than one layout. Everything dirty is
// handled here so the rest of the crate works with typed values.
use chrono::{NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64`, forgiving common export noise.
///
/// - Accepts `Option<&str>` so optional CSV fields pass straight through.
/// - Strips a leading `R$` and surrounding whitespace.
/// - Rejects anything else containing letters.
/// - Strips `,` thousands separators.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    let s = s.strip_prefix("R$").unwrap_or(s).trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a sale date. Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and
/// `DD/MM/YYYY`.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .ok()
}

/// Trimmed text, or `fallback` when the field is missing or blank.
pub fn text_or(s: Option<String>, fallback: &str) -> String {
    match s {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

/// Three-letter month abbreviation for a 1-based month number.
pub fn month_abbrev(month: u32) -> &'static str {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    MONTHS
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// Month number for an abbreviation, case-insensitive. Used to order months.
pub fn month_number(name: &str) -> Option<u32> {
    (1..=12).find(|m| month_abbrev(*m).eq_ignore_ascii_case(name.trim()))
}

/// Render an amount with a fixed number of decimals and en-locale thousands
/// separators, e.g. `1,234,567.89`.
///
/// Negative zero prints as `0` so empty totals never show a stray sign.
pub fn format_number(n: f64, decimals: usize) -> String {
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_currency(n: f64) -> String {
    format!("R$ {}", format_number(n, 2))
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
