use std::collections::HashMap;

use crate::models::FieldRange;

/// Field key used for the reporting date in every statement type.
pub const DATE_KEY: &str = "date";

/// Epoch milliseconds for 2000-01-01, the placeholder date floor.
pub const PLACEHOLDER_DATE_MIN_MS: f64 = 946_684_800_000.0;
/// Epoch milliseconds for 2024-12-31, the placeholder date ceiling.
pub const PLACEHOLDER_DATE_MAX_MS: f64 = 1_735_603_200_000.0;

const ONE_BILLION: f64 = 1_000_000_000.0;
const ONE_DAY_MS: f64 = 86_400_000.0;

/// How a field is rendered and stepped in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Currency,
    Date,
    Ratio,
}

/// Descriptor for one filterable column of a statement view.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    placeholder_min: f64,
    placeholder_max: f64,
}

impl FieldSpec {
    const fn currency(key: &'static str, label: &'static str, min: f64, max: f64) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Currency,
            placeholder_min: min,
            placeholder_max: max,
        }
    }

    const fn ratio(key: &'static str, label: &'static str, min: f64, max: f64) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Ratio,
            placeholder_min: min,
            placeholder_max: max,
        }
    }

    const fn date() -> Self {
        Self {
            key: DATE_KEY,
            label: "Date",
            kind: FieldKind::Date,
            placeholder_min: PLACEHOLDER_DATE_MIN_MS,
            placeholder_max: PLACEHOLDER_DATE_MAX_MS,
        }
    }

    /// Fixed fallback range shown before any data is loaded or after a reset.
    pub fn placeholder_range(&self) -> FieldRange {
        FieldRange::new(self.placeholder_min, self.placeholder_max)
    }

    /// Slider step for this field over the given derived range.
    ///
    /// Dates move a day at a time, ratios by a cent, currency by at least
    /// $10 or 1/1000th of the span.
    pub fn step(&self, min: f64, max: f64) -> f64 {
        match self.kind {
            FieldKind::Date => ONE_DAY_MS,
            FieldKind::Ratio => 0.01,
            FieldKind::Currency => ((max - min) / 1000.0).floor().max(10.0),
        }
    }
}

/// Ordered field descriptors for one statement type, date first.
#[derive(Debug)]
pub struct StatementSchema {
    pub fields: &'static [FieldSpec],
}

impl StatementSchema {
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.key == key)
    }

    /// Fallback ranges for every field, keyed by field name.
    pub fn placeholder_ranges(&self) -> HashMap<String, FieldRange> {
        self.fields
            .iter()
            .map(|spec| (spec.key.to_string(), spec.placeholder_range()))
            .collect()
    }
}

static INCOME_FIELDS: &[FieldSpec] = &[
    FieldSpec::date(),
    FieldSpec::currency("revenue", "Revenue", 0.0, ONE_BILLION),
    FieldSpec::currency("net_income", "Net Income", 0.0, ONE_BILLION),
    FieldSpec::currency("gross_profit", "Gross Profit", 0.0, ONE_BILLION),
    FieldSpec::currency("operating_income", "Operating Income", 0.0, ONE_BILLION),
    FieldSpec::ratio("eps", "EPS", 0.0, 10.0),
];

static BALANCE_SHEET_FIELDS: &[FieldSpec] = &[
    FieldSpec::date(),
    FieldSpec::currency("totalAssets", "Total Assets", 0.0, ONE_BILLION),
    FieldSpec::currency("totalLiabilities", "Total Liabilities", 0.0, ONE_BILLION),
    FieldSpec::currency("totalEquity", "Total Equity", 0.0, ONE_BILLION),
    FieldSpec::currency("netDebt", "Net Debt", 0.0, ONE_BILLION),
    FieldSpec::currency(
        "cashAndShortTermInvestments",
        "Cash & ST Investments",
        0.0,
        ONE_BILLION,
    ),
];

static CASH_FLOW_FIELDS: &[FieldSpec] = &[
    FieldSpec::date(),
    FieldSpec::currency(
        "net_cash_provided_by_operating_activities",
        "Operating Cash Flow",
        0.0,
        ONE_BILLION,
    ),
    FieldSpec::currency(
        "net_cash_used_for_investing_activities",
        "Investing Cash Flow",
        -ONE_BILLION,
        0.0,
    ),
    FieldSpec::currency(
        "net_cash_used_provided_by_financing_activities",
        "Financing Cash Flow",
        -ONE_BILLION,
        ONE_BILLION,
    ),
    FieldSpec::currency("free_cash_flow", "Free Cash Flow", -ONE_BILLION, ONE_BILLION),
    FieldSpec::currency("net_change_in_cash", "Net Change in Cash", -ONE_BILLION, ONE_BILLION),
];

static INCOME_SCHEMA: StatementSchema = StatementSchema {
    fields: INCOME_FIELDS,
};
static BALANCE_SHEET_SCHEMA: StatementSchema = StatementSchema {
    fields: BALANCE_SHEET_FIELDS,
};
static CASH_FLOW_SCHEMA: StatementSchema = StatementSchema {
    fields: CASH_FLOW_FIELDS,
};

/// The three statement views the application offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementType {
    Income,
    BalanceSheet,
    CashFlow,
}

impl StatementType {
    pub const ALL: [StatementType; 3] = [
        StatementType::Income,
        StatementType::BalanceSheet,
        StatementType::CashFlow,
    ];

    /// Path segment under the API base for this statement type.
    pub fn endpoint(&self) -> &'static str {
        match self {
            StatementType::Income => "income-statement",
            StatementType::BalanceSheet => "balance-sheet-statement",
            StatementType::CashFlow => "cash-flow-statement",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            StatementType::Income => "Income Statement",
            StatementType::BalanceSheet => "Balance Sheet",
            StatementType::CashFlow => "Cash Flow",
        }
    }

    pub fn schema(&self) -> &'static StatementSchema {
        match self {
            StatementType::Income => &INCOME_SCHEMA,
            StatementType::BalanceSheet => &BALANCE_SHEET_SCHEMA,
            StatementType::CashFlow => &CASH_FLOW_SCHEMA,
        }
    }
}
