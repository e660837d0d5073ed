//! Common test utilities and helpers

use serde_json::{json, Value};

/// Builders for in-memory statement records.
pub mod test_data {
    use chrono::NaiveDate;
    use statement_scope::models::StatementRecord;
    use std::collections::HashMap;

    /// An income-statement record with every schema field derived from the
    /// given revenue.
    pub fn income_record(year: i32, month: u32, day: u32, revenue: f64) -> StatementRecord {
        let values: HashMap<String, f64> = [
            ("revenue".to_string(), revenue),
            ("net_income".to_string(), revenue * 0.2),
            ("gross_profit".to_string(), revenue * 0.4),
            ("operating_income".to_string(), revenue * 0.3),
            ("eps".to_string(), revenue / 100.0),
        ]
        .into_iter()
        .collect();
        StatementRecord::from_parts(
            None,
            NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            values,
        )
    }

    /// A balance-sheet record with every schema field derived from assets.
    pub fn balance_sheet_record(year: i32, total_assets: f64) -> StatementRecord {
        let values: HashMap<String, f64> = [
            ("totalAssets".to_string(), total_assets),
            ("totalLiabilities".to_string(), total_assets * 0.6),
            ("totalEquity".to_string(), total_assets * 0.4),
            ("netDebt".to_string(), total_assets * 0.1),
            ("cashAndShortTermInvestments".to_string(), total_assets * 0.2),
        ]
        .into_iter()
        .collect();
        StatementRecord::from_parts(None, NaiveDate::from_ymd_opt(year, 12, 31).unwrap(), values)
    }

    /// A cash-flow record; investing is negative, as the schema expects.
    pub fn cash_flow_record(year: i32, operating: f64) -> StatementRecord {
        let values: HashMap<String, f64> = [
            (
                "net_cash_provided_by_operating_activities".to_string(),
                operating,
            ),
            (
                "net_cash_used_for_investing_activities".to_string(),
                -operating * 0.5,
            ),
            (
                "net_cash_used_provided_by_financing_activities".to_string(),
                operating * 0.1,
            ),
            ("free_cash_flow".to_string(), operating * 0.5),
            ("net_change_in_cash".to_string(), operating * 0.1),
        ]
        .into_iter()
        .collect();
        StatementRecord::from_parts(None, NaiveDate::from_ymd_opt(year, 12, 31).unwrap(), values)
    }
}

/// One raw income-statement entry as the API would serialize it.
pub fn income_json(id: i64, date: &str, revenue: f64) -> Value {
    json!({
        "id": id,
        "date": date,
        "revenue": revenue,
        "net_income": revenue * 0.2,
        "gross_profit": revenue * 0.4,
        "operating_income": revenue * 0.3,
        "eps": revenue / 100.0
    })
}

/// Wrap raw entries in the API's `{"data": [...]}` envelope.
pub fn envelope(entries: Vec<Value>) -> Value {
    json!({ "data": entries })
}
