//! # Depreciation Ledger
//!
//! A fixed-asset depreciation ledger engine: for a given accounting period it
//! computes how much value each asset loses, appends an immutable
//! depreciation record, and advances the asset's running book value.
//!
//! ## Core Concepts
//!
//! - **Depreciable base**: acquisition cost minus salvage value, the total
//!   amount an asset can ever lose
//! - **Proration**: the acquisition month only depreciates the days the
//!   asset was actually owned (the acquisition day counts)
//! - **Conventions**: `daily` spreads the annual amount over the year's exact
//!   calendar days; `monthly` takes one twelfth, prorated in the first month
//! - **Ledger continuity**: each record's opening balance equals the prior
//!   record's closing balance; accumulated depreciation never decreases and
//!   never exceeds the base
//! - **Batch isolation**: each asset in a run lands in exactly one of three
//!   buckets (processed, errored, skipped) independently of the others
//!
//! ## Example
//!
//! ```rust,ignore
//! use depreciation_ledger::*;
//! use uuid::Uuid;
//!
//! let store = InMemoryStore::new();
//! // ... register assets into the store ...
//!
//! let request = DepreciationRequest {
//!     company_id,
//!     year: 2024,
//!     month: 1,
//!     asset_ids: None,
//!     method_override: None,
//!     account_id: None,
//!     calculated_by: Uuid::new_v4(),
//! };
//!
//! let outcome = run_depreciation(&store, &request)?;
//! println!("{} processed, {} errored, {} skipped",
//!     outcome.processed, outcome.errors, outcome.skipped);
//! ```

pub mod calculator;
pub mod calendar;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod proration;
pub mod report;
pub mod schema;
pub mod store;

pub use calculator::{period_depreciation, round2, PeriodDepreciation};
pub use calendar::{days_in_month, days_in_year, is_leap_year, last_day_of_month};
pub use eligibility::should_depreciate;
pub use engine::{validate_request, CancelToken, DepreciationEngine};
pub use error::{AssetError, DepreciationError, Result};
pub use proration::{depreciable_days, Proration};
pub use report::{depreciation_report, ReportRow};
pub use schema::*;
pub use store::{InMemoryStore, LedgerStore};

/// Runs one depreciation batch: validates the request, loads the company's
/// active assets, and executes the per-asset pipeline with failure isolation.
pub fn run_depreciation<S: LedgerStore>(
    store: &S,
    request: &DepreciationRequest,
) -> Result<BatchOutcome> {
    DepreciationEngine::new(store).run(request)
}

/// Like [`run_depreciation`] but checks the token before each asset; a
/// cancelled run returns the partial outcome with `cancelled: true`.
pub fn run_depreciation_with_cancel<S: LedgerStore>(
    store: &S,
    request: &DepreciationRequest,
    cancel: &CancelToken,
) -> Result<BatchOutcome> {
    DepreciationEngine::new(store).run_with_cancel(request, cancel)
}
