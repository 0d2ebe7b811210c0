use crate::error::{DepreciationError, Result};
use crate::schema::{AssetStatus, DepreciationAccount, DepreciationRecord, FixedAsset};
use std::collections::BTreeMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Storage seam between the engine and the shared application store.
///
/// The engine owns the record sequence per asset and the two derived fields
/// on the asset (accumulated depreciation, book value); everything else is
/// read-only to it. Implementations must make [`commit_period`] atomic: the
/// record insert and the asset update succeed or fail together, and the
/// (asset, year, month) uniqueness constraint is enforced inside the same
/// critical section so two concurrent runs cannot double-depreciate a
/// period.
///
/// [`commit_period`]: LedgerStore::commit_period
pub trait LedgerStore {
    /// Active assets for a company, optionally restricted to an explicit id
    /// subset and/or one account.
    fn active_assets(
        &self,
        company_id: Uuid,
        asset_ids: Option<&[Uuid]>,
        account_id: Option<Uuid>,
    ) -> Result<Vec<FixedAsset>>;

    /// Asset-class account: default calculation method plus the code and
    /// name displayed on report rows.
    fn account(&self, account_id: Uuid) -> Result<Option<DepreciationAccount>>;

    fn asset(&self, asset_id: Uuid) -> Result<Option<FixedAsset>>;

    /// The record for an exact (asset, year, month), if one exists. Used as
    /// the duplicate fast path before computing anything.
    fn find_record(
        &self,
        asset_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Option<DepreciationRecord>>;

    /// Most recent record for an asset, ordered (year desc, month desc).
    /// Supplies the previous accumulated figure and the opening balance.
    fn last_record(&self, asset_id: Uuid) -> Result<Option<DepreciationRecord>>;

    /// Atomically inserts the record and advances the asset's accumulated
    /// depreciation and book value to the record's closing figures. Returns
    /// the updated asset. On any failure the asset is left untouched.
    fn commit_period(&self, record: DepreciationRecord) -> Result<FixedAsset>;

    /// All records for a company, newest period first, optionally limited to
    /// one year. Read-only, used by the report.
    fn records_for_company(
        &self,
        company_id: Uuid,
        year: Option<i32>,
    ) -> Result<Vec<DepreciationRecord>>;
}

#[derive(Default)]
struct StoreInner {
    assets: BTreeMap<Uuid, FixedAsset>,
    records: BTreeMap<(Uuid, i32, u32), DepreciationRecord>,
    accounts: BTreeMap<Uuid, DepreciationAccount>,
}

/// Reference in-memory store. A single `RwLock` stands in for the database's
/// row locks; `commit_period` holds the write lock across the uniqueness
/// check, the insert, and the asset update.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_asset(&self, asset: FixedAsset) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.assets.insert(asset.id, asset);
    }

    pub fn insert_account(&self, account: DepreciationAccount) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.accounts.insert(account.id, account);
    }
}

impl LedgerStore for InMemoryStore {
    fn active_assets(
        &self,
        company_id: Uuid,
        asset_ids: Option<&[Uuid]>,
        account_id: Option<Uuid>,
    ) -> Result<Vec<FixedAsset>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .assets
            .values()
            .filter(|a| a.company_id == company_id && a.status == AssetStatus::Active)
            .filter(|a| match asset_ids {
                Some(ids) => ids.contains(&a.id),
                None => true,
            })
            .filter(|a| match account_id {
                Some(account) => a.account_id == Some(account),
                None => true,
            })
            .cloned()
            .collect())
    }

    fn account(&self, account_id: Uuid) -> Result<Option<DepreciationAccount>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.accounts.get(&account_id).cloned())
    }

    fn asset(&self, asset_id: Uuid) -> Result<Option<FixedAsset>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.assets.get(&asset_id).cloned())
    }

    fn find_record(
        &self,
        asset_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Option<DepreciationRecord>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.records.get(&(asset_id, year, month)).cloned())
    }

    fn last_record(&self, asset_id: Uuid) -> Result<Option<DepreciationRecord>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .records
            .values()
            .filter(|r| r.asset_id == asset_id)
            .max_by_key(|r| (r.year, r.month))
            .cloned())
    }

    fn commit_period(&self, record: DepreciationRecord) -> Result<FixedAsset> {
        let mut inner = self.inner.write().expect("store lock poisoned");

        let key = (record.asset_id, record.year, record.month);
        if inner.records.contains_key(&key) {
            return Err(DepreciationError::DuplicateRecord {
                year: record.year,
                month: record.month,
            });
        }
        if !inner.assets.contains_key(&record.asset_id) {
            return Err(DepreciationError::AssetNotFound(record.asset_id));
        }

        let accumulated = record.accumulated_depreciation;
        let closing = record.closing_balance;
        let asset_id = record.asset_id;

        inner.records.insert(key, record);

        let asset = inner
            .assets
            .get_mut(&asset_id)
            .expect("asset checked above");
        asset.accumulated_depreciation = accumulated;
        asset.book_value = closing;

        Ok(asset.clone())
    }

    fn records_for_company(
        &self,
        company_id: Uuid,
        year: Option<i32>,
    ) -> Result<Vec<DepreciationRecord>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut records: Vec<DepreciationRecord> = inner
            .records
            .values()
            .filter(|r| r.company_id == company_id)
            .filter(|r| match year {
                Some(y) => r.year == y,
                None => true,
            })
            .cloned()
            .collect();
        records.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
        Ok(records)
    }
}
