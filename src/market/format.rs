/// Formats a price as US dollars (`$1,500.00`, `$0.000035`).
///
/// Values below 1 get 6 fractional digits, everything else gets 2, with the
/// same rule for every category.
pub fn format_price(value: f64) -> String {
    let decimals = if value.abs() < 1.0 { 6 } else { 2 };
    format_usd(value, decimals)
}

pub fn format_usd(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "$-".to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (integer_part, fraction_part) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut formatted = String::with_capacity(fixed.len() + 6);
    let is_negative = value < 0.0 && fixed.bytes().any(|digit| matches!(digit, b'1'..=b'9'));
    if is_negative {
        formatted.push('-');
    }
    formatted.push('$');
    formatted.push_str(&group_thousands(integer_part));
    if let Some(fraction) = fraction_part {
        formatted.push('.');
        formatted.push_str(fraction);
    }
    formatted
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
