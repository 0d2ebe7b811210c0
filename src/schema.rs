use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which convention a period amount was computed under. Resolved once per
/// asset (request override, then the account default, then `Monthly`) and
/// stored on every record so the figure stays traceable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationMethod {
    /// Annual amount spread over the exact calendar days of the year.
    Daily,
    /// Annual amount split into twelve equal parts, prorated in the
    /// acquisition month.
    Monthly,
}

impl Default for CalculationMethod {
    fn default() -> Self {
        Self::Monthly
    }
}

impl std::fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

/// Asset-class account, read-only to this engine. Supplies the default
/// calculation method and the code/name shown on report rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationAccount {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub default_method: Option<CalculationMethod>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Active,
    Disposed,
    WrittenOff,
}

/// A depreciable resource. Created by the registration workflow; this engine
/// only ever touches `accumulated_depreciation` and `book_value`, and only
/// through a committed period.
///
/// Invariants held after every successful commit:
/// - `book_value = acquisition_cost - accumulated_depreciation`
/// - `0 <= accumulated_depreciation <= acquisition_cost - salvage_value`
/// - `accumulated_depreciation` never decreases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedAsset {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Asset-class account supplying the default calculation method.
    pub account_id: Option<Uuid>,
    pub name: String,
    pub code: Option<String>,
    pub acquisition_date: NaiveDate,
    pub acquisition_cost: Decimal,
    pub initial_balance: Decimal,
    pub purchases: Decimal,
    pub salvage_value: Decimal,
    /// Annual depreciation rate, percent.
    pub depreciation_rate: Decimal,
    /// Declarative method label from registration (e.g. "linear").
    pub depreciation_method: String,
    pub accumulated_depreciation: Decimal,
    pub book_value: Decimal,
    pub status: AssetStatus,
}

impl FixedAsset {
    /// Total amount that can ever be depreciated.
    pub fn depreciable_base(&self) -> Decimal {
        self.acquisition_cost - self.salvage_value
    }
}

/// One immutable ledger entry for one (asset, year, month). Never mutated or
/// deleted by this engine; corrections are a separate workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationRecord {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub company_id: Uuid,
    pub year: i32,
    pub month: u32,
    /// Book value carried from the prior record, or the asset's book value
    /// if this is the first record.
    pub opening_balance: Decimal,
    pub depreciation_amount: Decimal,
    /// Accumulated depreciation after this period.
    pub accumulated_depreciation: Decimal,
    pub closing_balance: Decimal,
    pub method: CalculationMethod,
    /// Human-readable audit note describing method and day counts.
    pub note: String,
    /// Actor who triggered the computation.
    pub calculated_by: Uuid,
}

/// One compute call: depreciate a company's active assets for a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationRequest {
    pub company_id: Uuid,
    pub year: i32,
    /// 1-12.
    pub month: u32,
    /// Restrict the run to a subset of assets.
    #[serde(default)]
    pub asset_ids: Option<Vec<Uuid>>,
    /// Overrides the account default for every asset in the run.
    #[serde(default)]
    pub method_override: Option<CalculationMethod>,
    /// Restrict the run to assets under one account.
    #[serde(default)]
    pub account_id: Option<Uuid>,
    /// Recorded on each new ledger record.
    pub calculated_by: Uuid,
}

/// Calendar facts for the requested period, echoed back with the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationInfo {
    pub year: i32,
    pub month: u32,
    pub days_in_month: u32,
    pub days_in_year: u32,
    pub account_filter: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetResult {
    pub asset_id: Uuid,
    pub asset_name: String,
    pub calculation_method: CalculationMethod,
    /// Days actually depreciated this period (prorated in the first month).
    pub depreciable_days: u32,
    pub total_days_in_month: u32,
    pub is_first_month: bool,
    pub acquisition_date: NaiveDate,
    pub depreciation_amount: Decimal,
    pub accumulated_depreciation: Decimal,
    pub closing_balance: Decimal,
    /// True when the requested period does not immediately follow the
    /// asset's last record; a month of depreciation may be missing.
    pub non_contiguous: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub asset_id: Uuid,
    pub asset_name: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedDetail {
    pub asset_id: Uuid,
    pub asset_name: String,
    pub reason: String,
}

/// Aggregate outcome of a batch run. Every asset lands in exactly one of the
/// three buckets; one asset's failure never aborts the others.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub processed: usize,
    pub errors: usize,
    pub skipped: usize,
    pub calculation_info: CalculationInfo,
    pub results: Vec<AssetResult>,
    pub error_details: Vec<ErrorDetail>,
    pub skipped_details: Vec<SkippedDetail>,
    /// True when a cancel token stopped the loop before the asset set was
    /// exhausted; committed assets stay committed.
    pub cancelled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_method_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&CalculationMethod::Daily).unwrap(),
            "\"daily\""
        );
        let m: CalculationMethod = serde_json::from_str("\"monthly\"").unwrap();
        assert_eq!(m, CalculationMethod::Monthly);
    }

    #[test]
    fn test_depreciable_base() {
        let asset = FixedAsset {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            account_id: None,
            name: "Printer".to_string(),
            code: Some("FA-001".to_string()),
            acquisition_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            acquisition_cost: dec!(12000),
            initial_balance: dec!(12000),
            purchases: Decimal::ZERO,
            salvage_value: dec!(2000),
            depreciation_rate: dec!(10),
            depreciation_method: "linear".to_string(),
            accumulated_depreciation: Decimal::ZERO,
            book_value: dec!(12000),
            status: AssetStatus::Active,
        };
        assert_eq!(asset.depreciable_base(), dec!(10000));
    }
}
