//! Display formatting for metric values

/// Currency symbol appended to amounts
pub const CURRENCY_SYMBOL: &str = "₽";

/// Insert a space between every group of three digits
fn group_thousands(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(' ');
        }
        result.push(c);
    }
    result
}

/// Format a currency amount rounded to whole units (e.g. `48 295 ₽`)
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{} {CURRENCY_SYMBOL}", group_thousands(&digits))
}

/// Format a value that is already expressed in percent (e.g. `6.20%`)
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Format a plain number with grouping and at most two decimals
pub fn format_number(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    let is_zero = int_part.chars().all(|c| c == '0') && frac.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if frac.is_empty() {
        format!("{sign}{}", group_thousands(int_part))
    } else {
        format!("{sign}{}.{frac}", group_thousands(int_part))
    }
}
