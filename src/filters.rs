//! Display filters used by the askama templates.

use chrono::NaiveDate;

/// Formats an integer rupiah amount with thousands separators: `Rp 150.000`.
pub fn rupiah(value: &i64) -> askama::Result<String> {
    let negative = *value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if negative { "-" } else { "" };
    Ok(format!("Rp {sign}{grouped}"))
}

/// Renders a `YYYY-MM-DD` date as `01 Jun`; anything unparseable is shown
/// as-is.
pub fn short_date(value: &str) -> askama::Result<String> {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Ok(date.format("%d %b").to_string()),
        Err(_) => Ok(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rupiah_groups_thousands() {
        assert_eq!(rupiah(&0).unwrap(), "Rp 0");
        assert_eq!(rupiah(&950).unwrap(), "Rp 950");
        assert_eq!(rupiah(&150_000).unwrap(), "Rp 150.000");
        assert_eq!(rupiah(&1_250_000).unwrap(), "Rp 1.250.000");
    }

    #[test]
    fn short_date_formats_iso_dates() {
        assert_eq!(short_date("2025-06-01").unwrap(), "01 Jun");
        assert_eq!(short_date("not-a-date").unwrap(), "not-a-date");
    }
}
