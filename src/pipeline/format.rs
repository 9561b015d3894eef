/// `$1,234,567.89` style money with a fixed number of decimals.
pub fn currency(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match formatted.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(fraction) => format!("{sign}${grouped}.{fraction}"),
        None => format!("{sign}${grouped}"),
    }
}

/// Status label as shown on cards: `In-Progress` becomes `IN PROGRESS`.
pub fn status_badge(status: &str) -> String {
    status.replace('-', " ").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(currency(1_500_000_000.0, 2), "$1,500,000,000.00");
        assert_eq!(currency(999.5, 2), "$999.50");
        assert_eq!(currency(1234.4, 0), "$1,234");
        assert_eq!(currency(0.0, 2), "$0.00");
        assert_eq!(currency(-2500.0, 0), "-$2,500");
    }

    #[test]
    fn badge_uppercases_and_drops_hyphen() {
        assert_eq!(status_badge("In-Progress"), "IN PROGRESS");
        assert_eq!(status_badge("Planned"), "PLANNED");
    }
}
