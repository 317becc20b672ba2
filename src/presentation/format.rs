//! Number formatting for dashboard metrics.

/// Format `value` with two decimals, switching to thousands ("Mil") and
/// millions ("Milhões") as it grows, prefixed by `prefix` (e.g. `"R$"`).
///
/// Empty parts are omitted, so `format_number(500.0, "")` is `"500.00"`.
///
/// ```
/// use sales_dashboard::presentation::format_number;
/// assert_eq!(format_number(1500.0, ""), "1.50 Mil");
/// assert_eq!(format_number(1_500_000.0, "R$"), "R$ 1.50 Milhões");
/// ```
pub fn format_number(value: f64, prefix: &str) -> String {
    let mut value = value;
    for unit in ["", "Mil"] {
        if value < 1000.0 {
            return join(prefix, value, unit);
        }
        value /= 1000.0;
    }
    join(prefix, value, "Milhões")
}

/// Currency flavour of [`format_number`].
pub fn format_currency(value: f64) -> String {
    format_number(value, "R$")
}

fn join(prefix: &str, value: f64, unit: &str) -> String {
    let number = format!("{:.2}", value);
    [prefix, number.as_str(), unit]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
