// 11.4 market/liquidity.rs: providers add and remove all three reserves at the current ratio.

use super::core::Market;
use super::params::{AddLiquidityParams, RemoveLiquidityParams};
use crate::error::MarketError;
use crate::ledger::ReserveLedger;
use crate::pool::{self, PoolShare};
use crate::types::{Amount, AssetKind, CallContext};
use log::debug;

fn check_max(bound: Amount, actual: Amount) -> Result<(), MarketError> {
    if actual > bound {
        return Err(MarketError::SlippageExceeded { bound, actual });
    }
    Ok(())
}

fn check_min(bound: Amount, actual: Amount) -> Result<(), MarketError> {
    if actual < bound {
        return Err(MarketError::SlippageExceeded { bound, actual });
    }
    Ok(())
}

impl Market {
    pub fn add_liquidity(
        &mut self,
        ledger: &mut dyn ReserveLedger,
        ctx: &CallContext,
        params: &AddLiquidityParams,
    ) -> Result<PoolShare, MarketError> {
        Self::check_deadline(ctx, params.deadline)?;

        let share = pool::quote_add(
            &self.reserves(ledger),
            self.liquidity_supply(ledger),
            params.collateral,
            params.max_bull,
            params.max_bear,
        )?;
        check_max(params.max_bull, share.bull)?;
        check_max(params.max_bear, share.bear)?;
        check_min(params.min_liquidity, share.liquidity)?;
        if share.liquidity.is_zero() {
            return Err(MarketError::InvalidAmount {
                amount: params.collateral,
                reason: "too small to mint liquidity",
            });
        }

        for (kind, amount) in [
            (AssetKind::Collateral, share.collateral),
            (AssetKind::Bull, share.bull),
            (AssetKind::Bear, share.bear),
        ] {
            let asset = self.asset_id(ledger, kind);
            ledger.transfer(ctx.sender, self.address, asset, amount)?;
        }
        ledger.mint(self.address, params.recipient, AssetKind::Liquidity, share.liquidity)?;

        self.commit(ctx);
        debug!(
            "market {} liquidity added {} (collateral {}, bull {}, bear {})",
            self.address, share.liquidity, share.collateral, share.bull, share.bear
        );
        Ok(share)
    }

    pub fn remove_liquidity(
        &mut self,
        ledger: &mut dyn ReserveLedger,
        ctx: &CallContext,
        params: &RemoveLiquidityParams,
    ) -> Result<PoolShare, MarketError> {
        Self::check_deadline(ctx, params.deadline)?;

        let share = pool::quote_remove(
            &self.reserves(ledger),
            self.liquidity_supply(ledger),
            params.liquidity,
        )?;
        check_min(params.min_collateral, share.collateral)?;
        check_min(params.min_bull, share.bull)?;
        check_min(params.min_bear, share.bear)?;

        ledger.burn(self.address, ctx.sender, AssetKind::Liquidity, share.liquidity)?;
        for (kind, amount) in [
            (AssetKind::Collateral, share.collateral),
            (AssetKind::Bull, share.bull),
            (AssetKind::Bear, share.bear),
        ] {
            let asset = self.asset_id(ledger, kind);
            ledger.transfer(self.address, params.recipient, asset, amount)?;
        }

        self.commit(ctx);
        debug!(
            "market {} liquidity removed {} (collateral {}, bull {}, bear {})",
            self.address, share.liquidity, share.collateral, share.bull, share.bear
        );
        Ok(share)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;
    use crate::ledger::{Ledger, LedgerError};
    use crate::logic::StandardLogic;
    use crate::market::CurveParams;
    use crate::nft::UnderlyingDescriptor;
    use crate::types::{unit, Address, AssetId, Bps, NftStandard, Tick, Timestamp};
    use primitive_types::U256;
    use std::sync::Arc;

    const MARKET: Address = Address(0x1000);
    const ALICE: Address = Address(1);
    const BOB: Address = Address(2);

    fn eth(n: u64) -> Amount {
        unit() * U256::from(n)
    }

    fn deadline() -> Timestamp {
        Timestamp::from_secs(1_000)
    }

    fn ctx(sender: Address) -> CallContext {
        CallContext::new(sender, Tick(1), Timestamp::from_secs(1))
    }

    fn setup() -> (Market, Ledger) {
        let underlying = UnderlyingDescriptor {
            contract: Address(500),
            token_id: U256::one(),
            standard: NftStandard::SingleOwner,
        };
        let mut market = Market::new(MARKET, underlying, Curve::reference(), 16, Timestamp::from_secs(0));
        let mut ledger = Ledger::new(1, Bps::new(0), Address(99), 5, Arc::new(StandardLogic::default()));
        ledger.register_market(MARKET);
        for who in [ALICE, BOB] {
            ledger.deposit_collateral(who, eth(100)).unwrap();
            market
                .mint(&mut ledger, &ctx(who), &CurveParams::given_in(eth(20), who, deadline()))
                .unwrap();
        }
        (market, ledger)
    }

    #[test]
    fn initial_and_additional_liquidity() {
        let (mut market, mut ledger) = setup();
        let first = market
            .add_liquidity(
                &mut ledger,
                &ctx(ALICE),
                &AddLiquidityParams::new(eth(3) / U256::from(2u64), eth(200), eth(1_000), ALICE, deadline()),
            )
            .unwrap();
        assert_eq!(first.liquidity, eth(3) / U256::from(2u64));
        assert_eq!(market.reserve(&ledger, AssetKind::Bull), eth(200));
        assert_eq!(market.reserve(&ledger, AssetKind::Bear), eth(1_000));

        // twice the collateral needs twice the claims
        let tight = AddLiquidityParams::new(eth(3), eth(399), eth(2_000), BOB, deadline());
        assert!(matches!(
            market.add_liquidity(&mut ledger, &ctx(BOB), &tight),
            Err(MarketError::SlippageExceeded { .. })
        ));
        let min_out = AddLiquidityParams::new(eth(3), eth(400), eth(2_000), BOB, deadline()).with_min_liquidity(eth(4));
        assert!(matches!(
            market.add_liquidity(&mut ledger, &ctx(BOB), &min_out),
            Err(MarketError::SlippageExceeded { .. })
        ));

        let second = market
            .add_liquidity(
                &mut ledger,
                &ctx(BOB),
                &AddLiquidityParams::new(eth(3), eth(400), eth(2_000), BOB, deadline()),
            )
            .unwrap();
        assert_eq!(second.liquidity, eth(3));
        assert_eq!(market.reserve(&ledger, AssetKind::Collateral), eth(9) / U256::from(2u64));
        assert_eq!(market.reserve(&ledger, AssetKind::Bull), eth(600));
        assert_eq!(market.reserve(&ledger, AssetKind::Bear), eth(3_000));
    }

    #[test]
    fn remove_returns_what_was_added() {
        let (mut market, mut ledger) = setup();
        let added = market
            .add_liquidity(
                &mut ledger,
                &ctx(ALICE),
                &AddLiquidityParams::new(eth(2), eth(500), eth(500), ALICE, deadline()),
            )
            .unwrap();
        let before = ledger.balance_of(ALICE, AssetId::Collateral);
        let removed = market
            .remove_liquidity(&mut ledger, &ctx(ALICE), &RemoveLiquidityParams::new(added.liquidity, ALICE, deadline()))
            .unwrap();
        assert_eq!(removed.collateral, added.collateral);
        assert_eq!(removed.bull, added.bull);
        assert_eq!(removed.bear, added.bear);
        assert_eq!(ledger.balance_of(ALICE, AssetId::Collateral), before + eth(2));
        assert_eq!(market.liquidity_supply(&ledger), U256::zero());
    }

    #[test]
    fn remove_guards() {
        let (mut market, mut ledger) = setup();
        assert_eq!(
            market.remove_liquidity(&mut ledger, &ctx(ALICE), &RemoveLiquidityParams::new(eth(1), ALICE, deadline())),
            Err(MarketError::ReserveUninitialized)
        );

        market
            .add_liquidity(
                &mut ledger,
                &ctx(ALICE),
                &AddLiquidityParams::new(eth(2), eth(500), eth(500), ALICE, deadline()),
            )
            .unwrap();
        let demanding = RemoveLiquidityParams::new(eth(1), ALICE, deadline()).with_minimums(eth(2), U256::zero(), U256::zero());
        assert!(matches!(
            market.remove_liquidity(&mut ledger, &ctx(ALICE), &demanding),
            Err(MarketError::SlippageExceeded { .. })
        ));

        // bob holds no liquidity claim
        let err = market
            .remove_liquidity(&mut ledger, &ctx(BOB), &RemoveLiquidityParams::new(eth(1), BOB, deadline()))
            .unwrap_err();
        assert!(matches!(err, MarketError::TransferFailed(LedgerError::InsufficientBalance { .. })));
    }

    #[test]
    fn first_provider_needs_both_claims() {
        let (mut market, mut ledger) = setup();
        let no_bull = AddLiquidityParams::new(eth(1), U256::zero(), eth(100), ALICE, deadline());
        assert_eq!(
            market.add_liquidity(&mut ledger, &ctx(ALICE), &no_bull),
            Err(MarketError::ZeroAmount)
        );
        let no_collateral = AddLiquidityParams::new(U256::zero(), eth(100), eth(100), ALICE, deadline());
        assert_eq!(
            market.add_liquidity(&mut ledger, &ctx(ALICE), &no_collateral),
            Err(MarketError::ZeroAmount)
        );
    }
}
