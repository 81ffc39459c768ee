use regex::Regex;
use std::sync::OnceLock;

fn amount_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\d.,\-]+").expect("static regex"))
}

/// Parse Dutch cost strings such as `€ 121,00 per maand` or
/// `€ 1.800,- per jaar` into whole euros per month.
///
/// `.` is the thousands separator and `,` the decimal separator. Yearly
/// amounts are divided by twelve. Anything that does not start with a number
/// after the currency sign yields `None`.
pub fn parse_monthly_cost(value: &str) -> Option<i64> {
    let stripped = value.replace('€', "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        return None;
    }

    let is_yearly = stripped.to_lowercase().contains("jaar");

    let number = amount_pattern().find(stripped)?.as_str();
    let number = number
        .trim_end_matches([',', '-'])
        .replace('.', "")
        .replace(',', ".");

    let mut amount: f64 = number.parse().ok()?;
    if !amount.is_finite() {
        return None;
    }
    if is_yearly {
        amount /= 12.0;
    }
    Some(amount.round_ties_even() as i64)
}

/// Convenience for characteristics that may be missing altogether.
pub fn parse_optional_cost(value: Option<&str>) -> Option<i64> {
    value.and_then(parse_monthly_cost)
}
