//! Display formatting for dashboard figures, fixed to `en-US` conventions.
//!
//! Every function here is pure: the same input always renders the same
//! string.

/// Abbreviated currency for tiles and list rows: `$2.6M`, `$883K`, `$950`.
#[must_use]
pub fn compact_currency(value: f64) -> String {
    if !value.is_finite() {
        return "$0".to_string();
    }
    if value < 0.0 {
        return format!("-{}", compact_currency(-value));
    }

    if value >= 1_000_000.0 {
        return format!("${}M", to_fixed(value / 1_000_000.0, 1));
    }
    if value >= 1_000.0 {
        return format!("${}K", to_fixed(value / 1_000.0, 0));
    }
    format!("${}", to_fixed(value, 0))
}

/// Whole-dollar currency with thousands separators: `$2,650,000`.
#[must_use]
pub fn full_currency(value: f64) -> String {
    if !value.is_finite() {
        return "$0".to_string();
    }
    let whole = to_fixed(value.abs(), 0);
    let sign = if value < 0.0 && whole.bytes().any(|digit| digit != b'0') {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_thousands(&whole))
}

#[must_use]
pub fn square_feet(value: u32) -> String {
    format!("{} SF", group_thousands(&value.to_string()))
}

#[must_use]
pub fn count(value: usize) -> String {
    group_thousands(&value.to_string())
}

#[must_use]
pub fn percent(value: u32) -> String {
    format!("{value}%")
}

/// `1 contact`, `0 contacts`, `12 notes`.
#[must_use]
pub fn plural(value: usize, singular: &str) -> String {
    let suffix = if value == 1 { "" } else { "s" };
    format!("{} {singular}{suffix}", count(value))
}

/// Renders a non-negative `value` with `decimals` fraction digits, rounding
/// the exact binary value with ties going up.
fn to_fixed(value: f64, decimals: usize) -> String {
    const GUARD_DIGITS: usize = 17;

    let expanded = format!("{:.*}", decimals + GUARD_DIGITS, value.abs());
    let digits = expanded
        .bytes()
        .filter(u8::is_ascii_digit)
        .collect::<Vec<_>>();
    let (kept, dropped) = digits.split_at(digits.len() - GUARD_DIGITS);

    let mut kept = kept.to_vec();
    if dropped.first().is_some_and(|digit| *digit >= b'5') {
        increment_digits(&mut kept);
    }

    let text = kept.into_iter().map(char::from).collect::<String>();
    if decimals == 0 {
        return text;
    }
    let (whole, fraction) = text.split_at(text.len() - decimals);
    format!("{whole}.{fraction}")
}

fn increment_digits(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_currency_uses_thresholds() {
        assert_eq!(compact_currency(2_650_000.0), "$2.6M");
        assert_eq!(compact_currency(1_000_000.0), "$1.0M");
        assert_eq!(compact_currency(12_460_000.0), "$12.5M");
        assert_eq!(compact_currency(1_250_000.0), "$1.3M");
        assert_eq!(compact_currency(9_960_000.0), "$10.0M");
        assert_eq!(compact_currency(883_333.33), "$883K");
        assert_eq!(compact_currency(1_000.0), "$1K");
        assert_eq!(compact_currency(1_499.0), "$1K");
        assert_eq!(compact_currency(1_500.0), "$2K");
        assert_eq!(compact_currency(999.0), "$999");
        assert_eq!(compact_currency(0.0), "$0");
    }

    #[test]
    fn compact_currency_just_below_a_million_stays_in_thousands() {
        assert_eq!(compact_currency(999_999.0), "$1000K");
    }

    #[test]
    fn full_currency_groups_thousands() {
        assert_eq!(full_currency(2_650_000.0), "$2,650,000");
        assert_eq!(full_currency(883_333.333), "$883,333");
        assert_eq!(full_currency(999.5), "$1,000");
        assert_eq!(full_currency(0.0), "$0");
        assert_eq!(full_currency(-1_250.0), "-$1,250");
    }

    #[test]
    fn non_finite_values_render_as_zero() {
        assert_eq!(compact_currency(f64::NAN), "$0");
        assert_eq!(full_currency(f64::INFINITY), "$0");
    }

    #[test]
    fn square_feet_and_counts_use_separators() {
        assert_eq!(square_feet(12_500), "12,500 SF");
        assert_eq!(square_feet(950), "950 SF");
        assert_eq!(square_feet(1_250_000), "1,250,000 SF");
        assert_eq!(count(1_234_567), "1,234,567");
        assert_eq!(count(0), "0");
    }

    #[test]
    fn plural_and_percent() {
        assert_eq!(plural(0, "contact"), "0 contacts");
        assert_eq!(plural(1, "contact"), "1 contact");
        assert_eq!(plural(3, "note"), "3 notes");
        assert_eq!(percent(38), "38%");
    }
}
