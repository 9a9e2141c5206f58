// 8.0 ledger.rs: multi asset balance book shared by every market.
// one balance per (holder, asset id). claims can only be minted or burned by a registered market.
// it also owns the protocol parameters markets read on every call and the active logic pointer.

use crate::logic::MarketLogic;
use crate::types::{Address, Amount, AssetId, AssetKind, Bps};
use primitive_types::U256;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("{holder} holds {available} of {asset}, needs {requested}")]
    InsufficientBalance {
        holder: Address,
        asset: AssetId,
        requested: Amount,
        available: Amount,
    },

    #[error("{0} is not a registered market")]
    UnregisteredMarket(Address),

    #[error("collateral cannot be minted by a market")]
    CollateralNotMintable,

    #[error("balance overflow")]
    Overflow,
}

/// What a market needs from the ledger. Implemented by [`Ledger`]; hosts can
/// supply their own bookkeeping.
pub trait ReserveLedger {
    fn chain_id(&self) -> u64;

    fn balance_of(&self, holder: Address, asset: AssetId) -> Amount;

    fn total_supply(&self, asset: AssetId) -> Amount;

    fn transfer(
        &mut self,
        from: Address,
        to: Address,
        asset: AssetId,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    fn mint(
        &mut self,
        market: Address,
        to: Address,
        kind: AssetKind,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    fn burn(
        &mut self,
        market: Address,
        from: Address,
        kind: AssetKind,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    fn fee(&self) -> Bps;

    fn beneficiary(&self) -> Address;

    fn oracle_length(&self) -> usize;

    /// Logic every market runs on its next call.
    fn implementation(&self) -> Arc<dyn MarketLogic>;

    fn asset_id(&self, market: Address, kind: AssetKind) -> AssetId {
        AssetId::derive(self.chain_id(), market, kind)
    }
}

// 8.1: prior value of one entry written inside an open transaction. None means absent.
#[derive(Debug, Clone)]
enum Undo {
    Balance {
        holder: Address,
        asset: AssetId,
        previous: Option<Amount>,
    },
    Supply {
        asset: AssetId,
        previous: Option<Amount>,
    },
}

#[derive(Debug, Clone)]
pub struct Ledger {
    chain_id: u64,
    balances: HashMap<(Address, AssetId), Amount>,
    supplies: HashMap<AssetId, Amount>,
    markets: HashSet<Address>,
    fee: Bps,
    beneficiary: Address,
    oracle_length: usize,
    implementation: Arc<dyn MarketLogic>,
    journal: Option<Vec<Undo>>,
}

impl Ledger {
    pub fn new(
        chain_id: u64,
        fee: Bps,
        beneficiary: Address,
        oracle_length: usize,
        implementation: Arc<dyn MarketLogic>,
    ) -> Self {
        Self {
            chain_id,
            balances: HashMap::new(),
            supplies: HashMap::new(),
            markets: HashSet::new(),
            fee,
            beneficiary,
            oracle_length,
            implementation,
            journal: None,
        }
    }

    /// Starts recording balance and supply writes so they can be rolled back.
    /// An open transaction is discarded and restarted.
    pub fn begin(&mut self) {
        self.journal = Some(Vec::new());
    }

    /// Keeps every write since `begin`.
    pub fn commit(&mut self) {
        self.journal = None;
    }

    /// Undoes every write since `begin`, newest first. No-op without an open transaction.
    pub fn rollback(&mut self) {
        let journal = match self.journal.take() {
            Some(journal) => journal,
            None => return,
        };
        for undo in journal.into_iter().rev() {
            match undo {
                Undo::Balance {
                    holder,
                    asset,
                    previous: Some(amount),
                } => {
                    self.balances.insert((holder, asset), amount);
                }
                Undo::Balance {
                    holder,
                    asset,
                    previous: None,
                } => {
                    self.balances.remove(&(holder, asset));
                }
                Undo::Supply {
                    asset,
                    previous: Some(amount),
                } => {
                    self.supplies.insert(asset, amount);
                }
                Undo::Supply { asset, previous: None } => {
                    self.supplies.remove(&asset);
                }
            }
        }
    }

    pub fn in_transaction(&self) -> bool {
        self.journal.is_some()
    }

    fn write_balance(&mut self, holder: Address, asset: AssetId, amount: Amount) {
        let previous = self.balances.insert((holder, asset), amount);
        if let Some(journal) = self.journal.as_mut() {
            journal.push(Undo::Balance {
                holder,
                asset,
                previous,
            });
        }
    }

    fn write_supply(&mut self, asset: AssetId, amount: Amount) {
        let previous = self.supplies.insert(asset, amount);
        if let Some(journal) = self.journal.as_mut() {
            journal.push(Undo::Supply { asset, previous });
        }
    }

    pub fn register_market(&mut self, market: Address) {
        self.markets.insert(market);
    }

    pub fn is_market(&self, address: Address) -> bool {
        self.markets.contains(&address)
    }

    pub fn set_fee(&mut self, fee: Bps) {
        self.fee = fee;
    }

    pub fn set_beneficiary(&mut self, beneficiary: Address) {
        self.beneficiary = beneficiary;
    }

    pub fn set_oracle_length(&mut self, length: usize) {
        self.oracle_length = length;
    }

    pub fn set_implementation(&mut self, implementation: Arc<dyn MarketLogic>) {
        self.implementation = implementation;
    }

    // native collateral wrapping. the host moved real value in or out.
    pub fn deposit_collateral(&mut self, holder: Address, amount: Amount) -> Result<(), LedgerError> {
        self.credit(holder, AssetId::Collateral, amount)
    }

    pub fn withdraw_collateral(&mut self, holder: Address, amount: Amount) -> Result<(), LedgerError> {
        self.debit(holder, AssetId::Collateral, amount)
    }

    fn credit(&mut self, holder: Address, asset: AssetId, amount: Amount) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        let supply = self
            .total_supply(asset)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let balance = self
            .balance_of(holder, asset)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.write_supply(asset, supply);
        self.write_balance(holder, asset, balance);
        Ok(())
    }

    fn debit(&mut self, holder: Address, asset: AssetId, amount: Amount) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        let available = self.balance_of(holder, asset);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                holder,
                asset,
                requested: amount,
                available,
            });
        }
        let supply = self.total_supply(asset).saturating_sub(amount);
        self.write_balance(holder, asset, available - amount);
        self.write_supply(asset, supply);
        Ok(())
    }

    fn claim_id(&self, market: Address, kind: AssetKind) -> Result<AssetId, LedgerError> {
        if !self.is_market(market) {
            return Err(LedgerError::UnregisteredMarket(market));
        }
        if kind == AssetKind::Collateral {
            return Err(LedgerError::CollateralNotMintable);
        }
        Ok(self.asset_id(market, kind))
    }
}

impl ReserveLedger for Ledger {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn balance_of(&self, holder: Address, asset: AssetId) -> Amount {
        self.balances
            .get(&(holder, asset))
            .copied()
            .unwrap_or_else(U256::zero)
    }

    fn total_supply(&self, asset: AssetId) -> Amount {
        self.supplies.get(&asset).copied().unwrap_or_else(U256::zero)
    }

    // zero transfers are a no-op
    fn transfer(
        &mut self,
        from: Address,
        to: Address,
        asset: AssetId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if amount.is_zero() || from == to {
            return Ok(());
        }
        let available = self.balance_of(from, asset);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                holder: from,
                asset,
                requested: amount,
                available,
            });
        }
        let received = self
            .balance_of(to, asset)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.write_balance(from, asset, available - amount);
        self.write_balance(to, asset, received);
        Ok(())
    }

    fn mint(
        &mut self,
        market: Address,
        to: Address,
        kind: AssetKind,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let asset = self.claim_id(market, kind)?;
        self.credit(to, asset, amount)
    }

    fn burn(
        &mut self,
        market: Address,
        from: Address,
        kind: AssetKind,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let asset = self.claim_id(market, kind)?;
        self.debit(from, asset, amount)
    }

    fn fee(&self) -> Bps {
        self.fee
    }

    fn beneficiary(&self) -> Address {
        self.beneficiary
    }

    fn oracle_length(&self) -> usize {
        self.oracle_length
    }

    fn implementation(&self) -> Arc<dyn MarketLogic> {
        Arc::clone(&self.implementation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::StandardLogic;

    const MARKET: Address = Address(100);
    const ALICE: Address = Address(1);
    const BOB: Address = Address(2);

    fn ledger() -> Ledger {
        let mut ledger = Ledger::new(1, Bps::new(50), Address(99), 60, Arc::new(StandardLogic::default()));
        ledger.register_market(MARKET);
        ledger
    }

    #[test]
    fn collateral_deposit_and_transfer() {
        let mut ledger = ledger();
        ledger.deposit_collateral(ALICE, U256::from(100u64)).unwrap();
        ledger.transfer(ALICE, BOB, AssetId::Collateral, U256::from(40u64)).unwrap();

        assert_eq!(ledger.balance_of(ALICE, AssetId::Collateral), U256::from(60u64));
        assert_eq!(ledger.balance_of(BOB, AssetId::Collateral), U256::from(40u64));
        assert_eq!(ledger.total_supply(AssetId::Collateral), U256::from(100u64));

        let err = ledger.transfer(BOB, ALICE, AssetId::Collateral, U256::from(41u64)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
    }

    #[test]
    fn only_markets_mint_claims() {
        let mut ledger = ledger();
        ledger.mint(MARKET, ALICE, AssetKind::Bull, U256::from(5u64)).unwrap();
        let bull = ledger.asset_id(MARKET, AssetKind::Bull);
        assert_eq!(ledger.total_supply(bull), U256::from(5u64));

        assert_eq!(
            ledger.mint(ALICE, ALICE, AssetKind::Bull, U256::one()),
            Err(LedgerError::UnregisteredMarket(ALICE))
        );
        assert_eq!(
            ledger.mint(MARKET, ALICE, AssetKind::Collateral, U256::one()),
            Err(LedgerError::CollateralNotMintable)
        );
        assert_eq!(ledger.mint(MARKET, ALICE, AssetKind::Bear, U256::zero()), Err(LedgerError::ZeroAmount));
    }

    #[test]
    fn burn_checks_balance() {
        let mut ledger = ledger();
        ledger.mint(MARKET, ALICE, AssetKind::Bear, U256::from(5u64)).unwrap();
        let err = ledger.burn(MARKET, ALICE, AssetKind::Bear, U256::from(6u64)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));

        ledger.burn(MARKET, ALICE, AssetKind::Bear, U256::from(5u64)).unwrap();
        assert_eq!(ledger.total_supply(ledger.asset_id(MARKET, AssetKind::Bear)), U256::zero());
    }

    #[test]
    fn parameters_are_owned_here() {
        let mut ledger = ledger();
        ledger.set_fee(Bps::new(120));
        ledger.set_beneficiary(BOB);
        ledger.set_oracle_length(7);
        assert_eq!(ledger.fee(), Bps::new(120));
        assert_eq!(ledger.beneficiary(), BOB);
        assert_eq!(ledger.oracle_length(), 7);
    }

    #[test]
    fn rollback_restores_writes_since_begin() {
        let mut ledger = ledger();
        ledger.deposit_collateral(ALICE, U256::from(100u64)).unwrap();
        let bull = ledger.asset_id(MARKET, AssetKind::Bull);

        ledger.begin();
        ledger.transfer(ALICE, BOB, AssetId::Collateral, U256::from(30u64)).unwrap();
        ledger.transfer(ALICE, BOB, AssetId::Collateral, U256::from(20u64)).unwrap();
        ledger.mint(MARKET, BOB, AssetKind::Bull, U256::from(9u64)).unwrap();
        ledger.burn(MARKET, BOB, AssetKind::Bull, U256::from(4u64)).unwrap();
        ledger.withdraw_collateral(ALICE, U256::from(10u64)).unwrap();
        assert!(ledger.in_transaction());
        ledger.rollback();

        assert!(!ledger.in_transaction());
        assert_eq!(ledger.balance_of(ALICE, AssetId::Collateral), U256::from(100u64));
        assert_eq!(ledger.balance_of(BOB, AssetId::Collateral), U256::zero());
        assert_eq!(ledger.total_supply(AssetId::Collateral), U256::from(100u64));
        assert_eq!(ledger.balance_of(BOB, bull), U256::zero());
        assert_eq!(ledger.total_supply(bull), U256::zero());
        // entries created inside the transaction are gone, not zeroed
        assert!(!ledger.balances.contains_key(&(BOB, AssetId::Collateral)));
        assert!(!ledger.supplies.contains_key(&bull));
    }

    #[test]
    fn commit_keeps_writes() {
        let mut ledger = ledger();
        ledger.begin();
        ledger.deposit_collateral(ALICE, U256::from(5u64)).unwrap();
        ledger.commit();
        ledger.rollback();
        assert_eq!(ledger.balance_of(ALICE, AssetId::Collateral), U256::from(5u64));

        // writes outside a transaction are not journaled
        ledger.deposit_collateral(BOB, U256::from(3u64)).unwrap();
        ledger.begin();
        ledger.rollback();
        assert_eq!(ledger.balance_of(BOB, AssetId::Collateral), U256::from(3u64));
    }
}
