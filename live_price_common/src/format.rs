//! Number formatting for the live price card.
//!
//! Every formatter takes `Option<f64>` so that an absent input renders as
//! [`NOT_AVAILABLE`] instead of a misleading zero. Non-finite values are treated
//! as absent.

/// Marker rendered for absent numeric inputs.
pub const NOT_AVAILABLE: &str = "N/A";

const TRILLION: f64 = 1e12;
const BILLION: f64 = 1e9;
const MILLION: f64 = 1e6;

/// Inserts thousands separators into a plain `format!` rendering
/// (`"-1234567.5"` → `"-1,234,567.5"`).
pub fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Grouped number with at most `max_decimals` fraction digits, trailing zeros
/// trimmed (`1234.50` → `1,234.5`, `150.00` → `150`).
pub fn grouped(value: Option<f64>, max_decimals: usize) -> String {
    let Some(value) = present(value) else {
        return NOT_AVAILABLE.to_string();
    };
    let formatted = format!("{:.1$}", value, max_decimals);
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };
    // "-0" after rounding a tiny negative number
    let trimmed = if trimmed == "-0" { "0" } else { trimmed };
    group_thousands(trimmed)
}

/// Money value with the currency sign in front (`$1,234.5`, `₹12,450`).
pub fn money(value: Option<f64>, sign: &str) -> String {
    match present(value) {
        Some(value) => format!("{sign}{}", grouped(Some(value), 2)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Large magnitudes with unit suffixes: `T`, `B`, `M` with exactly two decimals,
/// otherwise a grouped integer.
pub fn magnitude(value: Option<f64>) -> String {
    let Some(value) = present(value) else {
        return NOT_AVAILABLE.to_string();
    };
    let abs = value.abs();
    if abs >= TRILLION {
        format!("{:.2}T", value / TRILLION)
    } else if abs >= BILLION {
        format!("{:.2}B", value / BILLION)
    } else if abs >= MILLION {
        format!("{:.2}M", value / MILLION)
    } else {
        grouped(Some(value.round()), 0)
    }
}

/// Fixed two-decimal value with an explicit `+` when `positive`
/// (`+1.20`, `-1.20`). The sign decision is the caller's so that every
/// direction-aware field agrees on the zero boundary.
pub fn signed(value: Option<f64>, positive: bool) -> String {
    let Some(value) = present(value) else {
        return NOT_AVAILABLE.to_string();
    };
    // folds -0.0 into 0.0
    let value = if value == 0.0 { 0.0 } else { value };
    let plus = if positive && value >= 0.0 { "+" } else { "" };
    format!("{plus}{value:.2}")
}

/// Like [`signed`] with a `%` suffix.
pub fn signed_percent(value: Option<f64>, positive: bool) -> String {
    match present(value) {
        Some(_) => format!("{}%", signed(value, positive)),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands("-1234.56"), "-1,234.56");
        assert_eq!(group_thousands("123456.7"), "123,456.7");
    }

    #[test]
    fn test_grouped_trims_trailing_zeros() {
        assert_eq!(grouped(Some(150.0), 2), "150");
        assert_eq!(grouped(Some(150.5), 2), "150.5");
        assert_eq!(grouped(Some(1234.567), 2), "1,234.57");
        assert_eq!(grouped(Some(-0.001), 2), "0");
    }

    #[test]
    fn test_money() {
        assert_eq!(money(Some(150.0), "$"), "$150");
        assert_eq!(money(Some(12450.25), "₹"), "₹12,450.25");
        assert_eq!(money(None, "₹"), "N/A");
    }

    #[test]
    fn test_magnitude_thresholds() {
        assert_eq!(magnitude(Some(1_250_000.0)), "1.25M");
        assert_eq!(magnitude(Some(2_300_000_000.0)), "2.30B");
        assert_eq!(magnitude(Some(3_100_000_000_000.0)), "3.10T");
        assert_eq!(magnitude(Some(1_000_000.0)), "1.00M");
        assert_eq!(magnitude(Some(999_999.0)), "999,999");
        assert_eq!(magnitude(Some(0.0)), "0");
    }

    #[test]
    fn test_absent_is_not_available() {
        assert_eq!(magnitude(None), "N/A");
        assert_eq!(magnitude(Some(f64::NAN)), "N/A");
        assert_eq!(grouped(Some(f64::INFINITY), 2), "N/A");
        assert_eq!(signed(None, true), "N/A");
        assert_eq!(signed_percent(None, false), "N/A");
    }

    #[test]
    fn test_signed() {
        assert_eq!(signed(Some(1.2), true), "+1.20");
        assert_eq!(signed(Some(-1.2), false), "-1.20");
        assert_eq!(signed(Some(0.0), true), "+0.00");
        assert_eq!(signed(Some(-0.0), true), "+0.00");
        assert_eq!(signed(Some(-0.5), true), "-0.50");
        assert_eq!(signed_percent(Some(-0.8), false), "-0.80%");
        assert_eq!(signed_percent(Some(2.5), true), "+2.50%");
    }
}
