/// `$1,234.56`, negatives as `-$1,234.56`.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, group_thousands(int_part), frac_part)
}

/// 千分位、最多一位小數，後接單位
pub fn format_number(value: f64, unit: &str) -> String {
    let fixed = format!("{:.1}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "0"));
    let sign = if value < 0.0 && fixed != "0.0" { "-" } else { "" };
    let mut out = format!("{}{}", sign, group_thousands(int_part));
    if frac_part != "0" {
        out.push('.');
        out.push_str(frac_part);
    }
    format!("{} {}", out, unit)
}

/// Fixed-precision percentage, e.g. `12.5%`.
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(30.0), "$30.00");
        assert_eq!(format_currency(1234.567), "$1,234.57");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(-3120.0), "-$3,120.00");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(9360.0, "litros"), "9,360 litros");
        assert_eq!(format_number(207.96, "horas"), "208 horas");
        assert_eq!(format_number(78.26, "horas"), "78.3 horas");
        assert_eq!(format_number(-1500.5, "L"), "-1,500.5 L");
        assert_eq!(format_number(0.0, "hrs"), "0 hrs");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(37.5, 1), "37.5%");
        assert_eq!(format_percentage(62.49, 0), "62%");
    }
}
