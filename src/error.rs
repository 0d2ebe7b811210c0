use thiserror::Error;

/// Request-level failures. These reject the whole call before (or instead of)
/// touching any asset; per-asset problems use [`AssetError`] and stay inside
/// the batch response.
#[derive(Error, Debug)]
pub enum DepreciationError {
    #[error("Invalid month {0}: must be between 1 and 12")]
    InvalidMonth(u32),

    #[error("Invalid year {0}: must be positive")]
    InvalidYear(i32),

    #[error("No active assets match the requested filter")]
    NoEligibleAssets,

    #[error("Asset {0} not found")]
    AssetNotFound(uuid::Uuid),

    #[error("Depreciation record already exists for period {year}-{month:02}")]
    DuplicateRecord { year: i32, month: u32 },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Per-asset failures captured during a batch run. Recorded in the response's
/// `error_details`, never propagated past the orchestrator loop.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Record already exists for period {year}-{month:02}")]
    DuplicatePeriod { year: i32, month: u32 },

    #[error("Store error: {0}")]
    Store(String),
}

impl From<DepreciationError> for AssetError {
    fn from(err: DepreciationError) -> Self {
        match err {
            DepreciationError::DuplicateRecord { year, month } => {
                AssetError::DuplicatePeriod { year, month }
            }
            other => AssetError::Store(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DepreciationError>;
