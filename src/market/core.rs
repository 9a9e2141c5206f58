// 11.1 market/core.rs: market state, reserve reads, locked collateral and the settlement gate.

use crate::curve::Curve;
use crate::error::MarketError;
use crate::guard::FlashloanGuard;
use crate::ledger::ReserveLedger;
use crate::math;
use crate::nft::{Receipt, UnderlyingDescriptor};
use crate::oracle::{OracleBuffer, OracleSample};
use crate::pool;
use crate::pricing::PoolReserves;
use crate::types::{Address, Amount, AssetId, AssetKind, CallContext, Timestamp};
use primitive_types::U256;

/** 11.1: one market per (contract, token id). identity is fixed at creation */
#[derive(Debug, Clone)]
pub struct Market {
    pub(super) address: Address,
    pub(super) underlying: UnderlyingDescriptor,
    pub(super) curve: Curve,
    // collateral backing the pair supply, net of fees
    pub(super) deposited: Amount,
    // collateral paid in by settlement buys and out by settlement sells
    pub(super) settlement_inflow: Amount,
    pub(super) settlement_outflow: Amount,
    pub(super) oracle: OracleBuffer,
    pub(super) guard: FlashloanGuard,
    pub(super) created_at: Timestamp,
}

impl Market {
    pub fn new(
        address: Address,
        underlying: UnderlyingDescriptor,
        curve: Curve,
        oracle_capacity: usize,
        created_at: Timestamp,
    ) -> Self {
        Self {
            address,
            underlying,
            curve,
            deposited: U256::zero(),
            settlement_inflow: U256::zero(),
            settlement_outflow: U256::zero(),
            oracle: OracleBuffer::new(oracle_capacity),
            guard: FlashloanGuard::new(),
            created_at,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn underlying(&self) -> &UnderlyingDescriptor {
        &self.underlying
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn deposited(&self) -> Amount {
        self.deposited
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn guard(&self) -> &FlashloanGuard {
        &self.guard
    }

    pub fn asset_id(&self, ledger: &dyn ReserveLedger, kind: AssetKind) -> AssetId {
        ledger.asset_id(self.address, kind)
    }

    /// Outstanding bull supply, always equal to bear supply.
    pub fn pair_supply(&self, ledger: &dyn ReserveLedger) -> Amount {
        ledger.total_supply(self.asset_id(ledger, AssetKind::Bull))
    }

    pub fn liquidity_supply(&self, ledger: &dyn ReserveLedger) -> Amount {
        ledger.total_supply(self.asset_id(ledger, AssetKind::Liquidity))
    }

    /// Pool reserve of `kind`. Collateral excludes what backs the curve and
    /// what settlements moved; liquidity is the market owned share.
    pub fn reserve(&self, ledger: &dyn ReserveLedger, kind: AssetKind) -> Amount {
        let held = ledger.balance_of(self.address, self.asset_id(ledger, kind));
        if kind != AssetKind::Collateral {
            return held;
        }
        held.saturating_add(self.settlement_outflow)
            .saturating_sub(self.settlement_inflow.saturating_add(self.deposited))
    }

    pub fn reserves(&self, ledger: &dyn ReserveLedger) -> PoolReserves {
        PoolReserves::new(
            self.reserve(ledger, AssetKind::Collateral),
            self.reserve(ledger, AssetKind::Bull),
            self.reserve(ledger, AssetKind::Bear),
        )
    }

    // 11.1.1: collateral value of protocol owned liquidity, adjusted by settlement flows
    pub fn locked_collateral(&self, ledger: &dyn ReserveLedger) -> Result<Amount, MarketError> {
        let owned = pool::owned_collateral(
            &self.curve,
            &self.reserves(ledger),
            self.liquidity_supply(ledger),
            self.reserve(ledger, AssetKind::Liquidity),
            self.deposited,
            self.pair_supply(ledger),
        )?;
        Ok(owned
            .saturating_add(self.settlement_inflow)
            .saturating_sub(self.settlement_outflow))
    }

    pub fn live_asset_value(&self, ledger: &dyn ReserveLedger) -> Result<Amount, MarketError> {
        ledger.implementation().asset_value(&self.reserves(ledger))
    }

    /// Latest sample, or the live value before the first sample exists.
    pub fn asset_value(&self, ledger: &dyn ReserveLedger) -> Result<Amount, MarketError> {
        match self.oracle.latest() {
            Some(sample) => Ok(sample.value),
            None => self.live_asset_value(ledger),
        }
    }

    pub fn asset_value_average(&self, n: usize) -> Result<Amount, MarketError> {
        self.oracle.average(n)
    }

    // averaged over the window the ledger configures
    pub fn asset_value_accumulated(&self, ledger: &dyn ReserveLedger) -> Result<Amount, MarketError> {
        self.oracle.average(ledger.oracle_length())
    }

    // 11.1.2: settlement gate. a not yet ready oracle disables, it does not fail
    pub fn swap_enabled(&self, ledger: &dyn ReserveLedger) -> Result<bool, MarketError> {
        if self.oracle.len() < ledger.oracle_length() {
            return Ok(false);
        }
        let margin = U256::from(ledger.implementation().settlement_margin());
        let required = math::mul(self.asset_value_accumulated(ledger)?, margin)?;
        Ok(self.locked_collateral(ledger)? >= required)
    }

    pub fn oracle_length(&self) -> usize {
        self.oracle.len()
    }

    pub fn oracle_capacity(&self) -> usize {
        self.oracle.capacity()
    }

    pub fn oracle_sample(&self, index: usize) -> Option<OracleSample> {
        self.oracle.get(index)
    }

    /// Transfer hook: anything but a single, well formed transfer of the
    /// underlying is refused.
    pub fn accept_underlying(&self, receipt: &Receipt) -> Result<(), MarketError> {
        self.underlying
            .validate_receipt(receipt)
            .map_err(MarketError::UnsupportedUnderlyingAsset)
    }

    pub(super) fn check_deadline(ctx: &CallContext, deadline: Timestamp) -> Result<(), MarketError> {
        if ctx.now > deadline {
            return Err(MarketError::ExpiredDeadline {
                deadline,
                now: ctx.now,
            });
        }
        Ok(())
    }

    // runs last in every successful operation
    pub(super) fn commit(&mut self, ctx: &CallContext) {
        self.guard.record(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::logic::StandardLogic;
    use crate::nft::ReceiptRejection;
    use crate::types::{unit, Bps, NftStandard, Tick};
    use std::sync::Arc;

    const MARKET: Address = Address(0x1000);

    fn setup() -> (Market, Ledger) {
        let underlying = UnderlyingDescriptor {
            contract: Address(500),
            token_id: U256::from(1u64),
            standard: NftStandard::SingleOwner,
        };
        let market = Market::new(MARKET, underlying, Curve::reference(), 16, Timestamp::from_secs(0));
        let mut ledger = Ledger::new(1, Bps::new(50), Address(99), 5, Arc::new(StandardLogic::default()));
        ledger.register_market(MARKET);
        (market, ledger)
    }

    #[test]
    fn collateral_reserve_excludes_curve_backing() {
        let (mut market, mut ledger) = setup();
        ledger.deposit_collateral(MARKET, unit() * U256::from(7u64)).unwrap();
        market.deposited = unit() * U256::from(5u64);
        assert_eq!(market.reserve(&ledger, AssetKind::Collateral), unit() * U256::from(2u64));

        market.settlement_outflow = unit();
        assert_eq!(market.reserve(&ledger, AssetKind::Collateral), unit() * U256::from(3u64));
    }

    #[test]
    fn gate_closed_until_oracle_fills() {
        let (mut market, ledger) = setup();
        assert!(!market.swap_enabled(&ledger).unwrap());
        for t in 0..4u64 {
            market.oracle.record(unit(), Tick(t));
        }
        assert!(!market.swap_enabled(&ledger).unwrap());
        assert!(matches!(
            market.asset_value_accumulated(&ledger),
            Err(MarketError::OracleNotReady { required: 5, available: 4 })
        ));
    }

    #[test]
    fn gate_needs_locked_collateral() {
        let (mut market, ledger) = setup();
        for t in 0..5u64 {
            market.oracle.record(unit(), Tick(t));
        }
        // window is full but nothing is locked
        assert!(!market.swap_enabled(&ledger).unwrap());

        market.settlement_inflow = unit();
        assert!(market.swap_enabled(&ledger).unwrap());
    }

    #[test]
    fn asset_value_prefers_latest_sample() {
        let (mut market, mut ledger) = setup();
        ledger.mint(MARKET, MARKET, AssetKind::Bull, unit()).unwrap();
        ledger.mint(MARKET, MARKET, AssetKind::Bear, unit() * U256::from(2u64)).unwrap();
        assert_eq!(market.asset_value(&ledger).unwrap(), unit() * U256::from(4u64));

        market.oracle.record(unit(), Tick(1));
        assert_eq!(market.asset_value(&ledger).unwrap(), unit());
    }

    #[test]
    fn deadline_check() {
        let ctx = CallContext::new(Address(1), Tick(1), Timestamp::from_secs(100));
        assert!(Market::check_deadline(&ctx, Timestamp::from_secs(100)).is_ok());
        assert!(matches!(
            Market::check_deadline(&ctx, Timestamp::from_secs(99)),
            Err(MarketError::ExpiredDeadline { .. })
        ));
    }

    #[test]
    fn rejects_foreign_receipts() {
        let (market, _) = setup();
        let receipt = Receipt {
            contract: Address(500),
            token_id: U256::from(2u64),
            standard: NftStandard::SingleOwner,
            amount: U256::one(),
            batch: false,
        };
        assert_eq!(
            market.accept_underlying(&receipt),
            Err(MarketError::UnsupportedUnderlyingAsset(ReceiptRejection::WrongTokenId))
        );
    }
}
