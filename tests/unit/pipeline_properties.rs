//! Pipeline properties exercised across all three statement schemas.

use pretty_assertions::assert_eq;
use test_log::test;

use statement_scope::models::{FieldRange, SortDirection, SortState, StatementRecord};
use statement_scope::pipeline::{apply, derive_ranges};
use statement_scope::schema::{StatementType, DATE_KEY};

use crate::common::test_data;

fn record_sets() -> Vec<(StatementType, Vec<StatementRecord>)> {
    vec![
        (
            StatementType::Income,
            vec![
                test_data::income_record(2021, 9, 30, 150.0),
                test_data::income_record(2022, 9, 30, 400.0),
                test_data::income_record(2023, 9, 30, 250.0),
            ],
        ),
        (
            StatementType::BalanceSheet,
            vec![
                test_data::balance_sheet_record(2021, 1_000_000.0),
                test_data::balance_sheet_record(2022, 3_000_000.0),
                test_data::balance_sheet_record(2023, 2_000_000.0),
            ],
        ),
        (
            StatementType::CashFlow,
            vec![
                test_data::cash_flow_record(2021, 500_000.0),
                test_data::cash_flow_record(2022, 900_000.0),
                test_data::cash_flow_record(2023, 700_000.0),
            ],
        ),
    ]
}

#[test]
fn test_derived_ranges_bound_every_field_for_every_schema() {
    for (statement, records) in record_sets() {
        let ranges = derive_ranges(statement.schema(), &records);
        for record in &records {
            for spec in statement.schema().fields {
                let value = record.value(spec.key).unwrap();
                let range = &ranges[spec.key];
                assert!(
                    range.min <= value && value <= range.max,
                    "{} field {} out of derived range",
                    statement.title(),
                    spec.key
                );
            }
        }
    }
}

#[test]
fn test_full_range_filters_keep_everything() {
    for (statement, records) in record_sets() {
        let filters = derive_ranges(statement.schema(), &records);
        let rows = apply(&records, &filters, &SortState::unsorted());
        assert_eq!(rows.len(), records.len());
    }
}

#[test]
fn test_filtered_output_is_a_subset_honoring_all_bounds() {
    for (statement, records) in record_sets() {
        let mut filters = derive_ranges(statement.schema(), &records);

        // Narrow the first non-date field to its lower half.
        let key = statement.schema().fields[1].key;
        let full = filters[key];
        filters.insert(
            key.to_string(),
            FieldRange::new(full.min, full.min + full.span() / 2.0),
        );

        let rows = apply(&records, &filters, &SortState::date_descending());
        assert!(rows.len() <= records.len());
        for row in &rows {
            for (filter_key, range) in &filters {
                assert!(range.contains(row.value(filter_key).unwrap()));
            }
        }
    }
}

#[test]
fn test_ascending_and_descending_are_reverses() {
    for (statement, records) in record_sets() {
        let filters = derive_ranges(statement.schema(), &records);
        for spec in statement.schema().fields {
            let ascending = SortState {
                key: Some(spec.key.to_string()),
                direction: SortDirection::Ascending,
            };
            let descending = SortState {
                key: Some(spec.key.to_string()),
                direction: SortDirection::Descending,
            };

            let mut forward = apply(&records, &filters, &ascending);
            let backward = apply(&records, &filters, &descending);
            forward.reverse();
            assert_eq!(forward, backward, "key {}", spec.key);
        }
    }
}

#[test]
fn test_repeated_application_is_deterministic() {
    for (statement, records) in record_sets() {
        let filters = derive_ranges(statement.schema(), &records);
        let sort = SortState::date_descending();
        assert_eq!(
            apply(&records, &filters, &sort),
            apply(&records, &filters, &sort)
        );
    }
}

#[test]
fn test_unsorted_pipeline_preserves_fetch_order() {
    let records = vec![
        test_data::income_record(2023, 3, 31, 300.0),
        test_data::income_record(2021, 3, 31, 100.0),
        test_data::income_record(2022, 3, 31, 200.0),
    ];
    let filters = derive_ranges(StatementType::Income.schema(), &records);

    let rows = apply(&records, &filters, &SortState::unsorted());
    let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
    let original: Vec<_> = records.iter().map(|r| r.date).collect();
    assert_eq!(dates, original);
}

#[test]
fn test_date_filter_uses_epoch_comparison() {
    let records = vec![
        test_data::income_record(2021, 3, 31, 100.0),
        test_data::income_record(2023, 3, 31, 300.0),
    ];
    let mut filters = derive_ranges(StatementType::Income.schema(), &records);

    // Clip the date ceiling just below the 2023 record's instant.
    let date_range = filters[DATE_KEY];
    filters.insert(
        DATE_KEY.to_string(),
        FieldRange::new(date_range.min, date_range.max - 1.0),
    );

    let rows = apply(&records, &filters, &SortState::unsorted());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value("revenue"), Some(100.0));
}
