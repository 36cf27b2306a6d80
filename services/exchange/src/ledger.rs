//! Balance ledger: (trader, asset) → available quantity
//!
//! The ledger only redistributes: `credit` and `debit` are the only writers
//! and both are checked. A debit that exceeds the balance fails closed and a
//! credit that leaves the `u64` domain fails with `Overflow`; in both cases
//! the cell is untouched.
//!
//! Multi-step settlements go through a [`LedgerTransaction`]: reads fall
//! through to the ledger, writes land in an overlay, and the overlay is
//! applied in one step with [`BalanceLedger::commit`]. Dropping the
//! transaction discards everything it staged.

use std::collections::HashMap;
use types::asset::Ticker;
use types::errors::LedgerError;
use types::ids::TraderId;
use types::numeric::Quantity;

/// Per-trader token balances
#[derive(Debug, Clone, Default)]
pub struct BalanceLedger {
    /// Balances: trader -> (asset -> amount)
    balances: HashMap<TraderId, HashMap<Ticker, u64>>,
}

impl BalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Available balance; absent cells read as zero
    pub fn balance(&self, trader: &TraderId, asset: &Ticker) -> Quantity {
        Quantity::new(self.raw(trader, asset))
    }

    fn raw(&self, trader: &TraderId, asset: &Ticker) -> u64 {
        self.balances
            .get(trader)
            .and_then(|assets| assets.get(asset))
            .copied()
            .unwrap_or(0)
    }

    // ───────────────────────── Cell operations ─────────────────────────

    /// Credit with overflow protection
    pub fn credit(&mut self, trader: TraderId, asset: &Ticker, amount: Quantity) -> Result<(), LedgerError> {
        let current = self.raw(&trader, asset);
        let new_balance = checked_credit(current, asset, amount)?;
        self.set(trader, asset, new_balance);
        Ok(())
    }

    /// Debit with underflow protection
    pub fn debit(&mut self, trader: TraderId, asset: &Ticker, amount: Quantity) -> Result<(), LedgerError> {
        let current = self.raw(&trader, asset);
        let new_balance = checked_debit(current, asset, amount)?;
        self.set(trader, asset, new_balance);
        Ok(())
    }

    fn set(&mut self, trader: TraderId, asset: &Ticker, amount: u64) {
        self.balances
            .entry(trader)
            .or_default()
            .insert(asset.clone(), amount);
    }

    // ───────────────────────── Staging ─────────────────────────

    /// Start staging a multi-step settlement against this ledger
    pub fn transaction(&self) -> LedgerTransaction<'_> {
        LedgerTransaction {
            ledger: self,
            overlay: HashMap::new(),
        }
    }

    /// Apply the changes of a finished transaction
    pub fn commit(&mut self, changes: BalanceChanges) {
        for ((trader, asset), amount) in changes.cells {
            self.set(trader, &asset, amount);
        }
    }

    // ───────────────────────── Audit ─────────────────────────

    /// Sum of every trader's balance of `asset`
    pub fn total(&self, asset: &Ticker) -> u128 {
        self.balances
            .values()
            .filter_map(|assets| assets.get(asset))
            .map(|amount| u128::from(*amount))
            .sum()
    }
}

/// Balance updates staged on top of a ledger
///
/// Every check runs against the staged value, so a sequence of fills that is
/// fine cell-by-cell but not in aggregate is still rejected.
#[derive(Debug)]
pub struct LedgerTransaction<'a> {
    ledger: &'a BalanceLedger,
    overlay: HashMap<(TraderId, Ticker), u64>,
}

impl LedgerTransaction<'_> {
    /// Balance as seen through the staged updates
    pub fn balance(&self, trader: &TraderId, asset: &Ticker) -> Quantity {
        Quantity::new(self.raw(trader, asset))
    }

    fn raw(&self, trader: &TraderId, asset: &Ticker) -> u64 {
        self.overlay
            .get(&(*trader, asset.clone()))
            .copied()
            .unwrap_or_else(|| self.ledger.raw(trader, asset))
    }

    pub fn credit(&mut self, trader: TraderId, asset: &Ticker, amount: Quantity) -> Result<(), LedgerError> {
        let new_balance = checked_credit(self.raw(&trader, asset), asset, amount)?;
        self.overlay.insert((trader, asset.clone()), new_balance);
        Ok(())
    }

    pub fn debit(&mut self, trader: TraderId, asset: &Ticker, amount: Quantity) -> Result<(), LedgerError> {
        let new_balance = checked_debit(self.raw(&trader, asset), asset, amount)?;
        self.overlay.insert((trader, asset.clone()), new_balance);
        Ok(())
    }

    /// Release the ledger borrow, keeping the staged cells
    pub fn into_changes(self) -> BalanceChanges {
        BalanceChanges { cells: self.overlay }
    }
}

/// Final values of every cell a transaction touched
#[derive(Debug, Default)]
pub struct BalanceChanges {
    cells: HashMap<(TraderId, Ticker), u64>,
}

fn checked_credit(current: u64, asset: &Ticker, amount: Quantity) -> Result<u64, LedgerError> {
    current
        .checked_add(amount.as_u64())
        .ok_or_else(|| LedgerError::Overflow { asset: asset.clone() })
}

fn checked_debit(current: u64, asset: &Ticker, amount: Quantity) -> Result<u64, LedgerError> {
    current
        .checked_sub(amount.as_u64())
        .ok_or_else(|| LedgerError::InsufficientBalance {
            asset: asset.clone(),
            required: amount,
            available: Quantity::new(current),
        })
}
