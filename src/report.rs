use crate::error::Result;
use crate::schema::CalculationMethod;
use crate::store::LedgerStore;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One ledger record joined with asset identity for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub record_id: Uuid,
    pub asset_id: Uuid,
    pub asset_name: String,
    pub asset_code: Option<String>,
    pub account_id: Option<Uuid>,
    pub account_code: Option<String>,
    pub account_name: Option<String>,
    pub acquisition_cost: Decimal,
    pub depreciation_rate: Decimal,
    pub year: i32,
    pub month: u32,
    pub opening_balance: Decimal,
    pub depreciation_amount: Decimal,
    pub accumulated_depreciation: Decimal,
    pub closing_balance: Decimal,
    pub method: CalculationMethod,
    pub note: String,
}

/// Read-only report over previously written records for a company, newest
/// period first, optionally filtered by year and by account. No side effects.
pub fn depreciation_report<S: LedgerStore>(
    store: &S,
    company_id: Uuid,
    year: Option<i32>,
    account_id: Option<Uuid>,
) -> Result<Vec<ReportRow>> {
    let records = store.records_for_company(company_id, year)?;

    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let asset = match store.asset(record.asset_id)? {
            Some(asset) => asset,
            // Asset removed by another module; the record survives but has
            // no identity to display.
            None => continue,
        };

        if let Some(account) = account_id {
            if asset.account_id != Some(account) {
                continue;
            }
        }

        let account = match asset.account_id {
            Some(id) => store.account(id)?,
            None => None,
        };

        rows.push(ReportRow {
            record_id: record.id,
            asset_id: record.asset_id,
            asset_name: asset.name,
            asset_code: asset.code,
            account_id: asset.account_id,
            account_code: account.as_ref().map(|a| a.code.clone()),
            account_name: account.map(|a| a.name),
            acquisition_cost: asset.acquisition_cost,
            depreciation_rate: asset.depreciation_rate,
            year: record.year,
            month: record.month,
            opening_balance: record.opening_balance,
            depreciation_amount: record.depreciation_amount,
            accumulated_depreciation: record.accumulated_depreciation,
            closing_balance: record.closing_balance,
            method: record.method,
            note: record.note,
        });
    }

    Ok(rows)
}
