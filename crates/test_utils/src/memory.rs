//! In-memory store adapters
//!
//! Mutex-guarded maps implementing the domain store ports. Conditional
//! updates are evaluated under the lock, so these adapters provide the
//! same claim/CAS guarantees the SQL adapters get from atomic row
//! updates. The wallet store can inject one failure on demand to drive
//! the partial-credit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{CasOutcome, InvestmentId, Money, StoreError, UserId};
use domain_investment::{Investment, InvestmentStatus, InvestmentStore};
use domain_wallet::{LedgerEntry, UserWallet, WalletStore};
use engine_processing::{EngineConfig, SettingsStore};

/// In-memory investment store
#[derive(Default)]
pub struct MemoryInvestmentStore {
    rows: Mutex<HashMap<InvestmentId, Investment>>,
}

impl MemoryInvestmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an investment directly (bypassing `insert` error handling)
    pub fn seed(&self, investment: Investment) {
        self.rows.lock().unwrap().insert(investment.id, investment);
    }

    /// Snapshot of one row for assertions
    pub fn snapshot(&self, id: InvestmentId) -> Option<Investment> {
        self.rows.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl InvestmentStore for MemoryInvestmentStore {
    async fn insert(&self, investment: &Investment) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&investment.id) {
            return Err(StoreError::conflict(format!(
                "investment {} already exists",
                investment.id
            )));
        }
        rows.insert(investment.id, investment.clone());
        Ok(())
    }

    async fn get(&self, id: InvestmentId) -> Result<Option<Investment>, StoreError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn list_accruable(
        &self,
        now: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Investment>, StoreError> {
        let rows = self.rows.lock().unwrap();
        let mut accruable: Vec<Investment> = rows
            .values()
            .filter(|i| i.status == InvestmentStatus::Active && i.maturity_date > now)
            .cloned()
            .collect();
        accruable.sort_by_key(|i| i.created_at);
        accruable.truncate(limit as usize);
        Ok(accruable)
    }

    async fn apply_accrual(
        &self,
        id: InvestmentId,
        observed_last_accrual: DateTime<Utc>,
        profit_delta: Money,
        accrued_at: DateTime<Utc>,
    ) -> Result<CasOutcome, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("Investment", id))?;

        // The guard: only the caller who read the current window wins.
        if row.status != InvestmentStatus::Active || row.last_accrual_at != observed_last_accrual {
            return Ok(CasOutcome::Lost);
        }

        row.accrued_profit = row.accrued_profit + profit_delta;
        row.last_accrual_at = accrued_at;
        Ok(CasOutcome::Applied)
    }

    async fn claim_matured(
        &self,
        now: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Investment>, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let mut due: Vec<InvestmentId> = rows
            .values()
            .filter(|i| i.status == InvestmentStatus::Active && i.maturity_date <= now)
            .map(|i| i.id)
            .collect();
        due.sort_by_key(|id| rows[id].maturity_date);
        due.truncate(limit as usize);

        let mut claimed = Vec::with_capacity(due.len());
        for id in due {
            let row = rows.get_mut(&id).expect("row disappeared under lock");
            row.status = InvestmentStatus::Completed;
            row.accrued_profit = row.final_profit();
            claimed.push(row.clone());
        }
        Ok(claimed)
    }

    async fn count_overdue_active(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .filter(|i| i.status == InvestmentStatus::Active && i.maturity_date <= now)
            .count() as u64)
    }

    async fn revert_premature_completions(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<InvestmentId>, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let mut reverted = Vec::new();
        for row in rows.values_mut() {
            if row.status == InvestmentStatus::Completed && row.maturity_date > now {
                row.status = InvestmentStatus::Active;
                reverted.push(row.id);
            }
        }
        Ok(reverted)
    }
}

#[derive(Default)]
struct WalletState {
    wallets: HashMap<UserId, UserWallet>,
    entries: Vec<LedgerEntry>,
}

/// In-memory wallet store
#[derive(Default)]
pub struct MemoryWalletStore {
    state: Mutex<WalletState>,
    fail_next_credit: AtomicBool,
}

impl MemoryWalletStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user with a zero wallet
    pub fn register_user(&self, user: UserId) {
        self.state
            .lock()
            .unwrap()
            .wallets
            .entry(user)
            .or_insert_with(|| UserWallet::new(user));
    }

    /// Makes the next `credit_with_entries` call fail, leaving no state
    /// behind; simulates the credit leg dying after a claim
    pub fn fail_next_credit(&self) {
        self.fail_next_credit.store(true, Ordering::SeqCst);
    }

    /// Snapshot of one wallet for assertions
    pub fn wallet(&self, user: UserId) -> Option<UserWallet> {
        self.state.lock().unwrap().wallets.get(&user).cloned()
    }
}

#[async_trait]
impl WalletStore for MemoryWalletStore {
    async fn balance(&self, user: UserId) -> Result<Money, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .wallets
            .get(&user)
            .map(|w| w.balance)
            .unwrap_or_else(Money::zero))
    }

    async fn credit_with_entries(
        &self,
        user: UserId,
        total: Money,
        entries: Vec<LedgerEntry>,
    ) -> Result<(), StoreError> {
        if self.fail_next_credit.swap(false, Ordering::SeqCst) {
            return Err(StoreError::connection("injected credit failure"));
        }

        let mut state = self.state.lock().unwrap();
        let wallet = state
            .wallets
            .entry(user)
            .or_insert_with(|| UserWallet::new(user));
        wallet.balance = wallet.balance + total;
        state.entries.extend(entries);
        Ok(())
    }

    async fn admin_debit(&self, user: UserId, amount: Money) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        let wallet = state
            .wallets
            .get_mut(&user)
            .ok_or_else(|| StoreError::not_found("UserWallet", user))?;
        if wallet.balance < amount {
            return Err(StoreError::conflict(format!(
                "balance {} is below debit {}",
                wallet.balance, amount
            )));
        }
        wallet.balance = wallet.balance - amount;
        Ok(())
    }

    async fn append_entry(&self, entry: &LedgerEntry) -> Result<(), StoreError> {
        self.state.lock().unwrap().entries.push(entry.clone());
        Ok(())
    }

    async fn entries_for(&self, user: UserId) -> Result<Vec<LedgerEntry>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .entries
            .iter()
            .filter(|e| e.owner_id == user)
            .cloned()
            .collect())
    }

    async fn completed_deposit_total(&self, user: UserId) -> Result<Money, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .entries
            .iter()
            .filter(|e| e.owner_id == user && e.is_completed_deposit())
            .map(|e| e.amount)
            .sum())
    }

    async fn set_vip_tier(&self, user: UserId, tier: u32) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        let wallet = state
            .wallets
            .entry(user)
            .or_insert_with(|| UserWallet::new(user));
        wallet.vip_tier = tier;
        Ok(())
    }

    async fn vip_tier(&self, user: UserId) -> Result<u32, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.wallets.get(&user).map(|w| w.vip_tier).unwrap_or(0))
    }

    async fn all_user_ids(&self) -> Result<Vec<UserId>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.wallets.keys().copied().collect())
    }
}

/// In-memory settings store
pub struct MemorySettingsStore {
    config: Mutex<EngineConfig>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self {
            config: Mutex::new(EngineConfig::default()),
        }
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config: Mutex::new(config),
        }
    }
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<EngineConfig, StoreError> {
        Ok(self.config.lock().unwrap().clone())
    }

    async fn save_rate_table(
        &self,
        table: &domain_investment::RateTable,
    ) -> Result<(), StoreError> {
        self.config.lock().unwrap().rate_table = table.clone();
        Ok(())
    }

    async fn save_vip_thresholds(
        &self,
        thresholds: &domain_wallet::VipThresholds,
    ) -> Result<(), StoreError> {
        self.config.lock().unwrap().vip_thresholds = thresholds.clone();
        Ok(())
    }
}
