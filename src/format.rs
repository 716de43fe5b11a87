//! Number formatting shared by labels, the report and the story.

/// `1234567` → `"1,234,567"`.
pub fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Group the integer digits of an already formatted number: `"-2500"` →
/// `"-2,500"`. A rounded negative zero loses its sign.
fn group_digits(formatted: &str) -> String {
    let split = formatted
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(formatted.len());
    let (sign, digits) = formatted.split_at(split);
    let sign = if sign == "-" && digits.bytes().all(|b| b == b'0' || b == b'.') {
        ""
    } else {
        sign
    };
    let int_len = digits.find('.').unwrap_or(digits.len());
    let mut out = String::with_capacity(formatted.len() + int_len / 3);
    out.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && i < int_len && (int_len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole dollars, sign after the dollar: `-2500.0` → `"$-2,500"`.
pub fn currency(value: f64) -> String {
    format!("${}", group_digits(&format!("{value:.0}")))
}

/// Whole dollars with an explicit sign: `750.0` → `"$+750"`.
pub fn signed_currency(value: f64) -> String {
    let grouped = group_digits(&format!("{value:+.0}"));
    if grouped.starts_with(['+', '-']) {
        format!("${grouped}")
    } else {
        format!("$+{grouped}")
    }
}

/// One decimal with an explicit sign, rounded once: `1.25` → `"+1.2%"`.
pub fn signed_percent(value: f64) -> String {
    let text = format!("{value:+.1}");
    // -0.04 rounds to "-0.0"
    if text == "-0.0" {
        "+0.0%".to_string()
    } else {
        format!("{text}%")
    }
}

/// Population weight rounded up: `11999.2` → `"12,000"`.
pub fn weight(value: f64) -> String {
    thousands(value.ceil() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(-1_234_567), "-1,234,567");
    }

    #[test]
    fn currency_rounds_to_whole_dollars() {
        assert_eq!(currency(60_000.0), "$60,000");
        assert_eq!(currency(-1_234.6), "$-1,235");
        assert_eq!(currency(-2_500.0), "$-2,500");
        assert_eq!(currency(1_234_567.0), "$1,234,567");
        assert_eq!(currency(-0.3), "$0");
        assert_eq!(signed_currency(750.0), "$+750");
        assert_eq!(signed_currency(-12_500.0), "$-12,500");
    }

    #[test]
    fn percent_rounds_the_exact_value_once() {
        assert_eq!(signed_percent(1.25), "+1.2%");
        assert_eq!(signed_percent(0.15), "+0.1%");
        assert_eq!(signed_percent(1.26), "+1.3%");
    }

    #[test]
    fn percent_and_weight() {
        assert_eq!(signed_percent(-3.04), "-3.0%");
        assert_eq!(signed_percent(-0.04), "+0.0%");
        assert_eq!(signed_currency(-0.3), "$+0");
        assert_eq!(signed_percent(12.0), "+12.0%");
        assert_eq!(weight(12_000.0), "12,000");
        assert_eq!(weight(11_999.2), "12,000");
    }
}
