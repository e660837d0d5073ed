//! The pure filter/sort pipeline and per-field range derivation.
//!
//! Everything here is recomputed from scratch whenever records, filters, or
//! sort change; nothing is cached between calls.

use std::collections::HashMap;

use crate::models::{FieldRange, SortDirection, SortState, StatementRecord};
use crate::schema::StatementSchema;

/// Compute the observed min/max for every schema field across the record set.
///
/// Called once per record-set replacement. An empty set falls back to the
/// schema's placeholder ranges; otherwise every returned range satisfies
/// `min <= max`, with `min == max` when only one record is loaded.
pub fn derive_ranges(
    schema: &StatementSchema,
    records: &[StatementRecord],
) -> HashMap<String, FieldRange> {
    if records.is_empty() {
        return schema.placeholder_ranges();
    }

    schema
        .fields
        .iter()
        .map(|spec| {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for record in records {
                // Ingestion guarantees every schema field is present.
                if let Some(value) = record.value(spec.key) {
                    min = min.min(value);
                    max = max.max(value);
                }
            }
            (spec.key.to_string(), FieldRange::new(min, max))
        })
        .collect()
}

/// Filter then sort the record set into the display order.
///
/// A record survives iff every filter's inclusive range contains its value
/// for that field (dates compared as epoch instants). Sorting only happens
/// when a sort key is set; `Vec::sort_by` is stable, so equal keys keep
/// their filter-stage order. Pure: identical inputs yield identical output.
pub fn apply(
    records: &[StatementRecord],
    filters: &HashMap<String, FieldRange>,
    sort: &SortState,
) -> Vec<StatementRecord> {
    let mut rows: Vec<StatementRecord> = records
        .iter()
        .filter(|record| {
            filters.iter().all(|(key, range)| {
                record
                    .value(key)
                    .map_or(false, |value| range.contains(value))
            })
        })
        .cloned()
        .collect();

    if let Some(key) = sort.key.as_deref() {
        rows.sort_by(|a, b| {
            let a_value = a.value(key).unwrap_or(f64::NAN);
            let b_value = b.value(key).unwrap_or(f64::NAN);
            let ordering = a_value.total_cmp(&b_value);
            match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    rows
}
