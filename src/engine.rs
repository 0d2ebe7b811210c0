use crate::calculator::period_depreciation;
use crate::calendar::{days_in_month, days_in_year, next_period};
use crate::eligibility::should_depreciate;
use crate::error::{AssetError, DepreciationError, Result};
use crate::proration::{depreciable_days, Proration};
use crate::schema::{
    AssetResult, BatchOutcome, CalculationInfo, CalculationMethod, DepreciationRecord,
    DepreciationRequest, ErrorDetail, FixedAsset, SkippedDetail,
};
use crate::store::LedgerStore;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Cooperative cancellation for a batch run. Checked between assets only;
/// already-committed periods are never rolled back, each asset's commit is
/// self-contained.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// Everything one asset's pipeline needs besides the asset itself.
struct PeriodContext {
    year: i32,
    month: u32,
    days_in_year: u32,
    calculated_by: Uuid,
    method_override: Option<CalculationMethod>,
}

enum AssetOutcome {
    Processed(AssetResult),
    Errored(AssetError),
    Skipped(String),
}

/// Batch orchestrator. Runs the per-asset pipeline (eligibility, duplicate
/// check, continuity read, proration, calculation, capped commit) over a
/// company's asset set, routing each asset to exactly one of three buckets.
/// One asset's failure never aborts the batch.
pub struct DepreciationEngine<'a, S: LedgerStore> {
    store: &'a S,
}

impl<'a, S: LedgerStore> DepreciationEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn run(&self, request: &DepreciationRequest) -> Result<BatchOutcome> {
        self.run_with_cancel(request, &CancelToken::new())
    }

    pub fn run_with_cancel(
        &self,
        request: &DepreciationRequest,
        cancel: &CancelToken,
    ) -> Result<BatchOutcome> {
        validate_request(request)?;

        let assets = self.store.active_assets(
            request.company_id,
            request.asset_ids.as_deref(),
            request.account_id,
        )?;
        if assets.is_empty() {
            return Err(DepreciationError::NoEligibleAssets);
        }

        info!(
            "Depreciating {} asset(s) for company {} period {}-{:02}",
            assets.len(),
            request.company_id,
            request.year,
            request.month
        );

        let ctx = PeriodContext {
            year: request.year,
            month: request.month,
            days_in_year: days_in_year(request.year),
            calculated_by: request.calculated_by,
            method_override: request.method_override,
        };

        let mut results = Vec::new();
        let mut error_details = Vec::new();
        let mut skipped_details = Vec::new();
        let mut cancelled = false;

        for asset in &assets {
            if cancel.is_cancelled() {
                warn!(
                    "Batch cancelled before asset {}; {} asset(s) left unprocessed",
                    asset.id,
                    assets.len() - results.len() - error_details.len() - skipped_details.len()
                );
                cancelled = true;
                break;
            }

            match self.process_asset(asset, &ctx) {
                AssetOutcome::Processed(result) => results.push(result),
                AssetOutcome::Errored(err) => error_details.push(ErrorDetail {
                    asset_id: asset.id,
                    asset_name: asset.name.clone(),
                    error: err.to_string(),
                }),
                AssetOutcome::Skipped(reason) => skipped_details.push(SkippedDetail {
                    asset_id: asset.id,
                    asset_name: asset.name.clone(),
                    reason,
                }),
            }
        }

        info!(
            "Batch complete: {} processed, {} errored, {} skipped",
            results.len(),
            error_details.len(),
            skipped_details.len()
        );

        Ok(BatchOutcome {
            processed: results.len(),
            errors: error_details.len(),
            skipped: skipped_details.len(),
            calculation_info: CalculationInfo {
                year: request.year,
                month: request.month,
                days_in_month: days_in_month(request.year, request.month),
                days_in_year: ctx.days_in_year,
                account_filter: request.account_id,
            },
            results,
            error_details,
            skipped_details,
            cancelled,
        })
    }

    fn process_asset(&self, asset: &FixedAsset, ctx: &PeriodContext) -> AssetOutcome {
        if !should_depreciate(asset.acquisition_date, ctx.year, ctx.month) {
            return AssetOutcome::Skipped(format!(
                "Acquired {}, after the end of period {}-{:02}",
                asset.acquisition_date, ctx.year, ctx.month
            ));
        }

        match self.depreciate_one(asset, ctx) {
            Ok(result) => AssetOutcome::Processed(result),
            Err(err) => AssetOutcome::Errored(err),
        }
    }

    fn depreciate_one(
        &self,
        asset: &FixedAsset,
        ctx: &PeriodContext,
    ) -> std::result::Result<AssetResult, AssetError> {
        let method = self.resolve_method(asset, ctx)?;

        if self
            .store
            .find_record(asset.id, ctx.year, ctx.month)
            .map_err(AssetError::from)?
            .is_some()
        {
            return Err(AssetError::DuplicatePeriod {
                year: ctx.year,
                month: ctx.month,
            });
        }

        let last = self.store.last_record(asset.id).map_err(AssetError::from)?;
        let (previous_accumulated, opening_balance) = match &last {
            Some(record) => (record.accumulated_depreciation, record.closing_balance),
            None => (rust_decimal::Decimal::ZERO, asset.book_value),
        };

        let non_contiguous = match &last {
            Some(record) => next_period(record.year, record.month) != (ctx.year, ctx.month),
            None => false,
        };
        if non_contiguous {
            let record = last.as_ref().expect("non_contiguous implies a last record");
            warn!(
                "Asset {} ({}): period {}-{:02} does not follow last record {}-{:02}; a month of depreciation may be missing",
                asset.id, asset.name, ctx.year, ctx.month, record.year, record.month
            );
        }

        let proration = depreciable_days(asset.acquisition_date, ctx.year, ctx.month);
        let computed = period_depreciation(
            asset.acquisition_cost,
            asset.salvage_value,
            asset.depreciation_rate,
            method,
            proration,
            ctx.days_in_year,
            previous_accumulated,
        );
        if computed.was_capped {
            debug!(
                "Asset {}: amount capped from {} to {} at the depreciable base",
                asset.id, computed.uncapped_amount, computed.amount
            );
        }

        let accumulated = previous_accumulated + computed.amount;
        let closing_balance = asset.acquisition_cost - accumulated;

        let record = DepreciationRecord {
            id: Uuid::new_v4(),
            asset_id: asset.id,
            company_id: asset.company_id,
            year: ctx.year,
            month: ctx.month,
            opening_balance,
            depreciation_amount: computed.amount,
            accumulated_depreciation: accumulated,
            closing_balance,
            method,
            note: audit_note(method, &proration, ctx.days_in_year, computed.was_capped),
            calculated_by: ctx.calculated_by,
        };

        self.store.commit_period(record).map_err(AssetError::from)?;

        debug!(
            "Asset {} ({}): {} for {}-{:02}, accumulated {}",
            asset.id, asset.name, computed.amount, ctx.year, ctx.month, accumulated
        );

        Ok(AssetResult {
            asset_id: asset.id,
            asset_name: asset.name.clone(),
            calculation_method: method,
            depreciable_days: proration.days,
            total_days_in_month: proration.total_days_in_month,
            is_first_month: proration.is_first_period,
            acquisition_date: asset.acquisition_date,
            depreciation_amount: computed.amount,
            accumulated_depreciation: accumulated,
            closing_balance,
            non_contiguous,
        })
    }

    // Request override wins, then the asset's account default, then monthly.
    fn resolve_method(
        &self,
        asset: &FixedAsset,
        ctx: &PeriodContext,
    ) -> std::result::Result<CalculationMethod, AssetError> {
        if let Some(method) = ctx.method_override {
            return Ok(method);
        }
        if let Some(account_id) = asset.account_id {
            if let Some(account) = self.store.account(account_id).map_err(AssetError::from)? {
                if let Some(method) = account.default_method {
                    return Ok(method);
                }
            }
        }
        Ok(CalculationMethod::default())
    }
}

pub fn validate_request(request: &DepreciationRequest) -> Result<()> {
    if !(1..=12).contains(&request.month) {
        return Err(DepreciationError::InvalidMonth(request.month));
    }
    if request.year <= 0 {
        return Err(DepreciationError::InvalidYear(request.year));
    }
    Ok(())
}

fn audit_note(
    method: CalculationMethod,
    proration: &Proration,
    days_in_year: u32,
    was_capped: bool,
) -> String {
    let mut note = match method {
        CalculationMethod::Daily => format!(
            "daily method: {}/{} days of {}-day year",
            proration.days, proration.total_days_in_month, days_in_year
        ),
        CalculationMethod::Monthly => {
            if proration.is_first_period {
                format!(
                    "monthly method: prorated {}/{} days",
                    proration.days, proration.total_days_in_month
                )
            } else {
                "monthly method: full period".to_string()
            }
        }
    };
    if proration.is_first_period {
        note.push_str(", first period");
    }
    if was_capped {
        note.push_str(", capped at depreciable base");
    }
    note
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_request_rejects_bad_month() {
        let request = DepreciationRequest {
            company_id: Uuid::new_v4(),
            year: 2024,
            month: 13,
            asset_ids: None,
            method_override: None,
            account_id: None,
            calculated_by: Uuid::new_v4(),
        };
        assert!(matches!(
            validate_request(&request),
            Err(DepreciationError::InvalidMonth(13))
        ));
    }

    #[test]
    fn test_validate_request_rejects_bad_year() {
        let request = DepreciationRequest {
            company_id: Uuid::new_v4(),
            year: 0,
            month: 1,
            asset_ids: None,
            method_override: None,
            account_id: None,
            calculated_by: Uuid::new_v4(),
        };
        assert!(matches!(
            validate_request(&request),
            Err(DepreciationError::InvalidYear(0))
        ));
    }

    #[test]
    fn test_audit_note_mentions_day_counts() {
        let proration = Proration {
            days: 16,
            is_first_period: true,
            total_days_in_month: 31,
        };
        let note = audit_note(CalculationMethod::Daily, &proration, 366, false);
        assert!(note.contains("16/31"));
        assert!(note.contains("366"));
        assert!(note.contains("first period"));
    }

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
