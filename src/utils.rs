use chrono::{DateTime, NaiveDate, Utc};

/// Formats a dollar amount with thousands grouping, e.g. `$1,234.50`.
///
/// Non-finite inputs are passed through the plain float formatter
/// (`$NaN`, `$inf`) rather than guarded against.
pub fn format_currency(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return format!("${}", value);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let grouped = group_thousands(int_part);
    match frac_part {
        Some(frac) => format!("{}${}.{}", sign, grouped, frac),
        None => format!("{}${}", sign, grouped),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats a percentage number, e.g. `12.3` -> `"12.3%"`.
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}

/// Abbreviates large magnitudes with T/B/M/K suffixes.
pub fn format_large_number(value: f64, decimals: usize) -> String {
    if value >= 1e12 {
        format!("{:.*}T", decimals, value / 1e12)
    } else if value >= 1e9 {
        format!("{:.*}B", decimals, value / 1e9)
    } else if value >= 1e6 {
        format!("{:.*}M", decimals, value / 1e6)
    } else if value >= 1e3 {
        format!("{:.*}K", decimals, value / 1e3)
    } else {
        format!("{:.*}", decimals, value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    Short,
    Medium,
    Long,
}

pub fn format_date(date: NaiveDate, style: DateStyle) -> String {
    let pattern = match style {
        DateStyle::Short => "%b %-d",
        DateStyle::Medium => "%b %-d, %Y",
        DateStyle::Long => "%A, %B %-d, %Y",
    };
    date.format(pattern).to_string()
}

pub fn format_date_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %Y, %-I:%M %p").to_string()
}

/// Human-readable elapsed time between two instants; falls back to a short
/// date once the gap exceeds a week.
pub fn relative_time(earlier: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(*earlier);

    if elapsed.num_minutes() < 1 {
        "just now".to_string()
    } else if elapsed.num_minutes() < 60 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed.num_days() < 7 {
        format!("{}d ago", elapsed.num_days())
    } else {
        format_date(earlier.date_naive(), DateStyle::Short)
    }
}

/// Percent change from `old_value` to `new_value`; returns 0 when the old
/// value is 0 so callers never divide by zero.
pub fn calculate_percent_change(old_value: f64, new_value: f64) -> f64 {
    if old_value == 0.0 {
        return 0.0;
    }
    ((new_value - old_value) / old_value) * 100.0
}

/// Simple moving average over a trailing window.
///
/// The output has the same length as the input; the first `period - 1`
/// slots hold NaN because no full window exists yet.
pub fn calculate_sma(data: &[f64], period: usize) -> Vec<f64> {
    let mut result = Vec::with_capacity(data.len());

    for i in 0..data.len() {
        if period == 0 || i + 1 < period {
            result.push(f64::NAN);
        } else {
            let window = &data[i + 1 - period..=i];
            result.push(window.iter().sum::<f64>() / period as f64);
        }
    }

    result
}

/// Ticker symbols are 1-5 letters; case-insensitive.
pub fn is_valid_stock_symbol(symbol: &str) -> bool {
    !symbol.is_empty() && symbol.len() <= 5 && symbol.chars().all(|c| c.is_ascii_alphabetic())
}

pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !local.contains(char::is_whitespace)
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains(char::is_whitespace)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(1234.5, 2), "$1,234.50");
        assert_eq!(format_currency(987654321.0, 2), "$987,654,321.00");
        assert_eq!(format_currency(-1234.5, 2), "-$1,234.50");
        assert_eq!(format_currency(0.99, 2), "$0.99");
        assert_eq!(format_currency(42.0, 0), "$42");
    }

    #[test]
    fn currency_passes_non_finite_values_through() {
        assert_eq!(format_currency(f64::NAN, 2), "$NaN");
    }

    #[test]
    fn percent_keeps_the_input_scale() {
        assert_eq!(format_percent(12.3, 1), "12.3%");
        assert_eq!(format_percent(-5.0, 1), "-5.0%");
        assert_eq!(format_percent(0.456, 2), "0.46%");
    }

    #[test]
    fn large_numbers_abbreviate_by_magnitude() {
        assert_eq!(format_large_number(1.5e12, 1), "1.5T");
        assert_eq!(format_large_number(1.5e9, 1), "1.5B");
        assert_eq!(format_large_number(2_340_000.0, 1), "2.3M");
        assert_eq!(format_large_number(9_500.0, 1), "9.5K");
        assert_eq!(format_large_number(999.0, 1), "999.0");
    }

    #[test]
    fn date_styles() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_date(date, DateStyle::Short), "Jan 5");
        assert_eq!(format_date(date, DateStyle::Medium), "Jan 5, 2025");
        assert_eq!(format_date(date, DateStyle::Long), "Sunday, January 5, 2025");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();

        let t = now - chrono::Duration::seconds(30);
        assert_eq!(relative_time(&t, &now), "just now");

        let t = now - chrono::Duration::minutes(5);
        assert_eq!(relative_time(&t, &now), "5m ago");

        let t = now - chrono::Duration::hours(3);
        assert_eq!(relative_time(&t, &now), "3h ago");

        let t = now - chrono::Duration::days(2);
        assert_eq!(relative_time(&t, &now), "2d ago");

        let t = now - chrono::Duration::days(10);
        assert_eq!(relative_time(&t, &now), "Jan 5");
    }

    #[test]
    fn percent_change_guards_zero_baseline() {
        assert_eq!(calculate_percent_change(0.0, 123.0), 0.0);
        assert_eq!(calculate_percent_change(100.0, 110.0), 10.0);
        assert_eq!(calculate_percent_change(100.0, 75.0), -25.0);
    }

    #[test]
    fn sma_pads_the_warmup_with_nan() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let sma = calculate_sma(&data, 3);

        assert_eq!(sma.len(), data.len());
        assert!(sma[0].is_nan());
        assert!(sma[1].is_nan());
        assert_eq!(sma[2], 2.0);
        assert_eq!(sma[3], 3.0);
        assert_eq!(sma[4], 4.0);
    }

    #[test]
    fn sma_with_window_longer_than_data_is_all_nan() {
        let sma = calculate_sma(&[1.0, 2.0], 5);
        assert_eq!(sma.len(), 2);
        assert!(sma.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn symbol_validation() {
        assert!(is_valid_stock_symbol("AAPL"));
        assert!(is_valid_stock_symbol("aapl"));
        assert!(is_valid_stock_symbol("V"));
        assert!(!is_valid_stock_symbol(""));
        assert!(!is_valid_stock_symbol("TOOLONG"));
        assert!(!is_valid_stock_symbol("BRK.B"));
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("user@@example.com"));
    }
}
