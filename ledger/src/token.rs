//! The token ledger.
//!
//! A fee-paying transfer settles in a fixed order:
//!
//! 1. debit the sender the full amount and update its heap slot;
//! 2. draw the winner from the post-debit heap;
//! 3. burn from total supply;
//! 4. credit the winner its reward;
//! 5. credit the receiver the net amount.
//!
//! Because the winner is credited as an ordinary account, the three
//! settlement branches (sender wins, receiver wins, third party wins) fall
//! out of the same code path. All checks run before the first write, so a
//! rejected call leaves the ledger untouched.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, trace};

use shuffle_fees::{FeeEngine, FeeOutcome, NonceBook};
use shuffle_heap::{HeapChange, HeapEntry, TopHeap};
use shuffle_types::{Address, ConfigError, TokenParams, U256};
use shuffle_utils::StatsCounter;

use crate::error::LedgerError;
use crate::snapshot::{AccountSnapshot, LedgerSnapshot};

const STAT_NAMES: &[&str] = &["transfers", "fee_free_transfers", "rewards_paid", "evictions"];

/// Result of a successful transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TransferReceipt {
    pub from: Address,
    pub to: Address,
    pub amount: U256,
    /// `None` for zero-amount and whitelisted transfers.
    pub fees: Option<FeeOutcome>,
}

impl TransferReceipt {
    fn fee_free(from: Address, to: Address, amount: U256) -> Self {
        Self {
            from,
            to,
            amount,
            fees: None,
        }
    }

    /// Net increase of the receiver's balance.
    pub fn received(&self) -> U256 {
        self.fees.map_or(self.amount, |fees| fees.receiver_credit())
    }

    pub fn winner(&self) -> Option<Address> {
        self.fees.and_then(|fees| fees.winner)
    }
}

/// In-memory fee-shuffling token.
///
/// State transitions take `&mut self` and a `caller`; the ledger performs no
/// authentication of its own beyond comparing `caller` with the owner.
#[derive(Clone, Debug)]
pub struct ShuffleToken {
    owner: Address,
    name: String,
    extra_gas: u64,
    initialized: bool,
    total_supply: U256,
    total_burned: U256,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    whitelisted_to: HashSet<Address>,
    whitelisted_from: HashSet<Address>,
    heap: TopHeap,
    nonces: NonceBook,
    fees: FeeEngine,
    stats: StatsCounter,
}

impl ShuffleToken {
    pub fn new(owner: Address, params: &TokenParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            owner,
            name: params.name.clone(),
            extra_gas: params.extra_gas,
            initialized: false,
            total_supply: U256::ZERO,
            total_burned: U256::ZERO,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            whitelisted_to: HashSet::new(),
            whitelisted_from: HashSet::new(),
            heap: TopHeap::new(params.top_size),
            nonces: NonceBook::new(),
            fees: FeeEngine::new(params.fee_divisor),
            stats: StatsCounter::new(STAT_NAMES),
        })
    }

    fn only_owner(&self, caller: &Address) -> Result<(), LedgerError> {
        if *caller != self.owner {
            return Err(LedgerError::NotOwner { caller: *caller });
        }
        Ok(())
    }

    // ── Supply ──────────────────────────────────────────────────────────

    /// Mint the entire supply to `to`. Owner-only and single-use.
    pub fn init(&mut self, caller: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        self.only_owner(&caller)?;
        if self.initialized {
            return Err(LedgerError::AlreadyInitialized);
        }
        self.initialized = true;
        self.total_supply = amount;
        self.credit(to, amount);
        info!(%to, %amount, "supply minted");
        Ok(())
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Sum of every burn fee charged so far.
    pub fn total_burned(&self) -> U256 {
        self.total_burned
    }

    pub fn balance_of(&self, address: &Address) -> U256 {
        self.balances.get(address).copied().unwrap_or(U256::ZERO)
    }

    // ── Transfers ───────────────────────────────────────────────────────

    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<TransferReceipt, LedgerError> {
        if amount.is_zero() {
            return Ok(TransferReceipt::fee_free(from, to, amount));
        }
        self.require_balance(&from, amount)?;
        Ok(self.move_tokens(from, to, amount))
    }

    /// Move `amount` out of `from` on behalf of `spender`.
    ///
    /// The balance is checked before the allowance. An allowance of
    /// `U256::MAX` is unlimited and never decremented.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<TransferReceipt, LedgerError> {
        if amount.is_zero() {
            return Ok(TransferReceipt::fee_free(from, to, amount));
        }
        self.require_balance(&from, amount)?;
        let allowed = self.allowance(&from, &spender);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                needed: amount,
                available: allowed,
            });
        }
        if allowed != U256::MAX {
            self.write_allowance(from, spender, allowed - amount);
        }
        Ok(self.move_tokens(from, to, amount))
    }

    pub fn approve(&mut self, owner: Address, spender: Address, amount: U256) {
        self.write_allowance(owner, spender, amount);
        debug!(%owner, %spender, %amount, "approval");
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    fn write_allowance(&mut self, owner: Address, spender: Address, amount: U256) {
        if amount.is_zero() {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    fn require_balance(&self, from: &Address, amount: U256) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    /// Settle a transfer whose preconditions have been checked.
    fn move_tokens(&mut self, from: Address, to: Address, amount: U256) -> TransferReceipt {
        self.stats.increment("transfers");
        self.debit(from, amount);

        if self.whitelisted_to.contains(&to) || self.whitelisted_from.contains(&from) {
            self.credit(to, amount);
            self.stats.increment("fee_free_transfers");
            debug!(%from, %to, %amount, "fee-free transfer");
            return TransferReceipt::fee_free(from, to, amount);
        }

        let outcome = self
            .fees
            .apply_transfer_fees(&self.heap, &mut self.nonces, from, to, amount);

        self.total_supply -= outcome.burn;
        self.total_burned += outcome.burn;
        if let Some(winner) = outcome.winner {
            if !outcome.reward.is_zero() {
                self.credit(winner, outcome.reward);
                self.stats.increment("rewards_paid");
            }
        }
        self.credit(to, outcome.net_to_receiver);

        debug!(
            %from,
            %to,
            %amount,
            burn = %outcome.burn,
            reward = %outcome.reward,
            winner = ?outcome.winner,
            "transfer settled"
        );

        TransferReceipt {
            from,
            to,
            amount,
            fees: Some(outcome),
        }
    }

    fn debit(&mut self, address: Address, amount: U256) {
        let balance = self.balance_of(&address) - amount;
        self.write_balance(address, balance);
    }

    fn credit(&mut self, address: Address, amount: U256) {
        if amount.is_zero() {
            return;
        }
        let balance = self.balance_of(&address) + amount;
        self.write_balance(address, balance);
    }

    fn write_balance(&mut self, address: Address, balance: U256) {
        if balance.is_zero() {
            self.balances.remove(&address);
        } else {
            self.balances.insert(address, balance);
        }
        if let HeapChange::Evicted { evicted } = self.heap.insert_or_update(address, balance) {
            self.stats.increment("evictions");
            trace!(%address, evicted = %evicted.address, "heap root replaced");
        }
    }

    // ── Heap views ──────────────────────────────────────────────────────

    pub fn heap(&self) -> &TopHeap {
        &self.heap
    }

    pub fn heap_size(&self) -> usize {
        self.heap.size()
    }

    /// 1-based heap slot of `address`, 0 when not resident.
    pub fn heap_index(&self, address: &Address) -> usize {
        self.heap.index_of(address)
    }

    pub fn heap_entry(&self, index: usize) -> Result<HeapEntry, LedgerError> {
        Ok(self.heap.entry_at(index)?)
    }

    /// Smallest resident holder.
    pub fn heap_top(&self) -> Result<HeapEntry, LedgerError> {
        Ok(self.heap.top()?)
    }

    pub fn top_size(&self) -> usize {
        self.heap.capacity()
    }

    pub fn get_nonce(&self, address: &Address, magnitude: u32) -> u64 {
        self.nonces.get(address, magnitude)
    }

    /// Winner a fee-paying transfer of `amount` from `from` would draw next.
    ///
    /// Simulates the sender debit on a copy of the heap. Returns `None` when
    /// the transfer would fail, is zero, or finds the heap empty. Whitelist
    /// bypass depends on the receiver and is not considered.
    pub fn predict_winner(&self, from: &Address, amount: U256) -> Option<Address> {
        if amount.is_zero() || self.balance_of(from) < amount {
            return None;
        }
        let mut heap = self.heap.clone();
        heap.insert_or_update(*from, self.balance_of(from) - amount);
        self.fees.preview_winner(&heap, &self.nonces, from, amount)
    }

    // ── Admin ───────────────────────────────────────────────────────────

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extra_gas(&self) -> u64 {
        self.extra_gas
    }

    pub fn is_whitelisted_to(&self, address: &Address) -> bool {
        self.whitelisted_to.contains(address)
    }

    pub fn is_whitelisted_from(&self, address: &Address) -> bool {
        self.whitelisted_from.contains(address)
    }

    pub fn set_name(&mut self, caller: Address, name: impl Into<String>) -> Result<(), LedgerError> {
        self.only_owner(&caller)?;
        self.name = name.into();
        info!(name = %self.name, "name changed");
        Ok(())
    }

    pub fn set_extra_gas(&mut self, caller: Address, extra_gas: u64) -> Result<(), LedgerError> {
        self.only_owner(&caller)?;
        self.extra_gas = extra_gas;
        info!(extra_gas, "extra gas changed");
        Ok(())
    }

    pub fn set_whitelisted_to(
        &mut self,
        caller: Address,
        address: Address,
        whitelisted: bool,
    ) -> Result<(), LedgerError> {
        self.only_owner(&caller)?;
        toggle(&mut self.whitelisted_to, address, whitelisted);
        info!(%address, whitelisted, "destination whitelist changed");
        Ok(())
    }

    pub fn set_whitelisted_from(
        &mut self,
        caller: Address,
        address: Address,
        whitelisted: bool,
    ) -> Result<(), LedgerError> {
        self.only_owner(&caller)?;
        toggle(&mut self.whitelisted_from, address, whitelisted);
        info!(%address, whitelisted, "source whitelist changed");
        Ok(())
    }

    /// Install a replacement heap and return the previous one.
    ///
    /// The replacement keeps its own capacity but is reseeded from current
    /// balances, so residency always reflects the ledger.
    pub fn set_heap(&mut self, caller: Address, mut heap: TopHeap) -> Result<TopHeap, LedgerError> {
        self.only_owner(&caller)?;
        heap.rebuild(self.balances.iter().map(|(&address, &balance)| (address, balance)));
        info!(capacity = heap.capacity(), size = heap.size(), "heap replaced");
        Ok(std::mem::replace(&mut self.heap, heap))
    }

    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<(), LedgerError> {
        self.only_owner(&caller)?;
        info!(previous = %self.owner, %new_owner, "ownership transferred");
        self.owner = new_owner;
        Ok(())
    }

    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    // ── Snapshots ───────────────────────────────────────────────────────

    /// Capture balances, supply, heap layout and nonces.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let mut accounts: Vec<AccountSnapshot> = self
            .balances
            .iter()
            .map(|(&address, &balance)| AccountSnapshot {
                address,
                balance,
                heap_index: self.heap.index_of(&address),
            })
            .collect();
        accounts.sort_by_key(|account| account.address);

        LedgerSnapshot::create(
            accounts,
            self.total_supply,
            self.total_burned,
            self.heap.iter().copied().collect(),
            self.nonces.entries(),
        )
    }
}

fn toggle(set: &mut HashSet<Address>, address: Address, on: bool) {
    if on {
        set.insert(address);
    } else {
        set.remove(&address);
    }
}
