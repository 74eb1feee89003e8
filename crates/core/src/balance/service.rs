//! Balance service: reads a group's ledger and serves its derived views.

use std::future::Future;
use std::sync::Arc;

use divvy_shared::AppResult;
use divvy_shared::types::{GroupId, UserId};
use tracing::debug;

use super::cache::BalanceCache;
use super::error::BalanceError;
use super::raw::raw_balances;
use super::simplify::{net_balances, simplify};
use super::types::{GroupBalances, NetBalances, RawDebt, SettlementLine, SplitLine, Transfer};

/// Read access to a group's ledger.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait LedgerReader: Send + Sync {
    /// Returns true if the group exists.
    fn group_exists(&self, group_id: GroupId) -> impl Future<Output = AppResult<bool>> + Send;

    /// Every split of every expense in the group, in any order.
    fn list_expense_splits(
        &self,
        group_id: GroupId,
    ) -> impl Future<Output = AppResult<Vec<SplitLine<UserId>>>> + Send;

    /// Every settlement in the group, in any order.
    fn list_settlements(
        &self,
        group_id: GroupId,
    ) -> impl Future<Output = AppResult<Vec<SettlementLine<UserId>>>> + Send;

    /// Member ids in join order.
    fn list_group_member_ids(
        &self,
        group_id: GroupId,
    ) -> impl Future<Output = AppResult<Vec<UserId>>> + Send;
}

/// Derives every balance view of a group from its splits and settlements.
///
/// Members without any debt appear in the net view with a zero balance.
///
/// # Errors
///
/// Returns `BalanceError::ImbalancedNet` if the derived net positions do not
/// sum to zero, which would indicate corrupted input.
pub fn compute_group_balances(
    members: &[UserId],
    splits: &[SplitLine<UserId>],
    settlements: &[SettlementLine<UserId>],
) -> Result<GroupBalances, BalanceError> {
    let raw = raw_balances(splits, settlements);
    let mut net = net_balances(&raw);
    for member in members {
        net.entry(*member).or_default();
    }
    let simplified = simplify(&net)?;

    Ok(GroupBalances {
        raw,
        net,
        simplified,
    })
}

/// Serves raw, net and simplified balances with a per-group cache.
pub struct BalanceService<R: LedgerReader> {
    reader: Arc<R>,
    cache: BalanceCache,
}

impl<R: LedgerReader> BalanceService<R> {
    /// Creates a new balance service.
    #[must_use]
    pub fn new(reader: Arc<R>, cache: BalanceCache) -> Self {
        Self { reader, cache }
    }

    /// Returns the ledger reader.
    #[must_use]
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Drops the cached view of a group. Call after every expense or
    /// settlement write for that group.
    pub fn invalidate(&self, group_id: GroupId) {
        debug!(%group_id, "invalidating cached balances");
        self.cache.invalidate(group_id);
    }

    /// Returns every derived view of a group, from cache when possible.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::GroupNotFound` for an unknown group, or the
    /// reader's error if loading the ledger fails.
    pub async fn group_balances(&self, group_id: GroupId) -> Result<Arc<GroupBalances>, BalanceError> {
        if let Some(cached) = self.cache.get(group_id) {
            debug!(%group_id, "balance cache hit");
            return Ok(cached);
        }
        debug!(%group_id, "balance cache miss");
        let generation = self.cache.generation(group_id);

        if !self.reader.group_exists(group_id).await? {
            return Err(BalanceError::GroupNotFound(group_id));
        }

        let members = self.reader.list_group_member_ids(group_id).await?;
        let splits = self.reader.list_expense_splits(group_id).await?;
        let settlements = self.reader.list_settlements(group_id).await?;

        let balances = Arc::new(compute_group_balances(&members, &splits, &settlements)?);
        if !self.cache.insert_if_current(group_id, generation, Arc::clone(&balances)) {
            debug!(%group_id, "ledger changed during fill, not caching");
        }
        Ok(balances)
    }

    /// Directed pairwise debts of a group.
    ///
    /// # Errors
    ///
    /// See [`Self::group_balances`].
    pub async fn raw_balances(&self, group_id: GroupId) -> Result<Vec<RawDebt<UserId>>, BalanceError> {
        Ok(self.group_balances(group_id).await?.raw.clone())
    }

    /// Suggested transfers that settle a group.
    ///
    /// # Errors
    ///
    /// See [`Self::group_balances`].
    pub async fn simplified_balances(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<Transfer<UserId>>, BalanceError> {
        Ok(self.group_balances(group_id).await?.simplified.clone())
    }

    /// Net position of every member of a group.
    ///
    /// # Errors
    ///
    /// See [`Self::group_balances`].
    pub async fn net_balances(&self, group_id: GroupId) -> Result<NetBalances<UserId>, BalanceError> {
        Ok(self.group_balances(group_id).await?.net.clone())
    }
}
