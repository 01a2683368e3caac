use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount for display in the given ISO currency.
///
/// Common currencies get their symbol, anything else is prefixed with its code.
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let code = currency.trim().to_uppercase();
    let digits = minor_digits(&code);

    let rounded = amount.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.*}", digits as usize, rounded.abs());

    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut formatted = String::new();
    if negative {
        formatted.push('-');
    }
    formatted.push_str(&currency_prefix(&code));
    formatted.push_str(&group_thousands(whole));
    if let Some(fraction) = fraction {
        formatted.push('.');
        formatted.push_str(fraction);
    }
    formatted
}

/// `"1 item"`, `"3 items"`
pub fn pluralize(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

fn currency_prefix(code: &str) -> String {
    match code {
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "JPY" => "¥".to_string(),
        "INR" => "₹".to_string(),
        other => format!("{} ", other),
    }
}

fn minor_digits(code: &str) -> u32 {
    match code {
        "JPY" | "KRW" => 0,
        _ => 2,
    }
}

fn group_thousands(whole: &str) -> String {
    let len = whole.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_money(dec!(100), "USD"), "$100.00");
        assert_eq!(format_money(dec!(49.5), "usd"), "$49.50");
        assert_eq!(format_money(dec!(0), "USD"), "$0.00");
    }

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(format_money(dec!(1234567.891), "USD"), "$1,234,567.89");
        assert_eq!(format_money(dec!(1000), "EUR"), "€1,000.00");
        assert_eq!(format_money(dec!(999), "GBP"), "£999.00");
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(format_money(dec!(0.125), "USD"), "$0.13");
        assert_eq!(format_money(dec!(-0.125), "USD"), "-$0.13");
    }

    #[test]
    fn test_zero_decimal_currency() {
        assert_eq!(format_money(dec!(1500.4), "JPY"), "¥1,500");
    }

    #[test]
    fn test_unknown_currency_uses_code() {
        assert_eq!(format_money(dec!(12), "CHF"), "CHF 12.00");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(0, "item"), "0 items");
        assert_eq!(pluralize(1, "item"), "1 item");
        assert_eq!(pluralize(2, "service"), "2 services");
    }
}
