//! Display formatting for table cells and slider bounds.

use chrono::DateTime;

use crate::schema::{FieldKind, FieldSpec};

/// Whole-dollar US currency string, e.g. `$1,234,567`. Non-finite bounds
/// render as the `$∞` sentinel.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "$∞".to_string();
    }
    let negative = value < 0.0;
    let grouped = group_thousands(value.abs().round() as u64);
    if negative {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Two-decimal rendering for ratio fields like EPS.
pub fn format_ratio(value: f64) -> String {
    if !value.is_finite() {
        return "∞".to_string();
    }
    format!("{:.2}", value)
}

/// "Mon YYYY" rendering of an epoch-millisecond instant, e.g. `Jun 2023`.
pub fn format_month_year(epoch_ms: f64) -> String {
    if !epoch_ms.is_finite() {
        return "—".to_string();
    }
    match DateTime::from_timestamp_millis(epoch_ms as i64) {
        Some(instant) => instant.format("%b %Y").to_string(),
        None => "—".to_string(),
    }
}

/// Format one value according to its field's kind.
pub fn format_field_value(spec: &FieldSpec, value: f64) -> String {
    match spec.kind {
        FieldKind::Currency => format_currency(value),
        FieldKind::Ratio => format_ratio(value),
        FieldKind::Date => format_month_year(value),
    }
}

fn group_thousands(mut value: u64) -> String {
    let mut groups = Vec::new();
    loop {
        let chunk = value % 1000;
        value /= 1000;
        if value == 0 {
            groups.push(chunk.to_string());
            break;
        }
        groups.push(format!("{:03}", chunk));
    }
    groups.reverse();
    groups.join(",")
}
