//! Market operations routed through the registry. Each runs atomically and emits
//! its event only after it succeeded.

use super::core::Registry;
use super::results::RegistryError;
use crate::events::{
    CurveEvent, EventPayload, LiquidityEvent, LiquidityLockedEvent, OracleSampledEvent, SettlementEvent,
    SwapEvent,
};
use crate::market::{
    AddLiquidityParams, CurveParams, CurveTrade, RemoveLiquidityParams, SettlementParams, SettlementResult,
    SwapParams, SwapResult,
};
use crate::nft::UnderlyingAsset;
use crate::pool::PoolShare;
use crate::types::{Address, CallContext};

impl Registry {
    pub fn mint(
        &mut self,
        ctx: &CallContext,
        market: Address,
        params: &CurveParams,
    ) -> Result<CurveTrade, RegistryError> {
        let trade = self.transact(market, |m, ledger| m.mint(ledger, ctx, params))?;
        self.emit_event(ctx, EventPayload::Minted(curve_event(market, ctx, params, &trade)));
        Ok(trade)
    }

    pub fn burn(
        &mut self,
        ctx: &CallContext,
        market: Address,
        params: &CurveParams,
    ) -> Result<CurveTrade, RegistryError> {
        let trade = self.transact(market, |m, ledger| m.burn(ledger, ctx, params))?;
        self.emit_event(ctx, EventPayload::Burned(curve_event(market, ctx, params, &trade)));
        Ok(trade)
    }

    pub fn swap(
        &mut self,
        ctx: &CallContext,
        market: Address,
        params: &SwapParams,
    ) -> Result<SwapResult, RegistryError> {
        let result = self.transact(market, |m, ledger| m.swap(ledger, ctx, params))?;

        if let Some(sample) = result.sample {
            self.emit_event(
                ctx,
                EventPayload::OracleSampled(OracleSampledEvent {
                    market,
                    value: sample.value,
                    sample_tick: sample.tick,
                }),
            );
        }
        self.emit_event(
            ctx,
            EventPayload::Swapped(SwapEvent {
                market,
                sender: ctx.sender,
                recipient: params.recipient,
                token_in: params.token_in,
                token_out: params.token_out,
                amount_in: result.amount_in,
                amount_out: result.amount_out,
                user_data: params.user_data.clone(),
            }),
        );
        if !result.locked_liquidity.is_zero() {
            self.emit_event(
                ctx,
                EventPayload::LiquidityLocked(LiquidityLockedEvent {
                    market,
                    liquidity: result.locked_liquidity,
                }),
            );
        }
        Ok(result)
    }

    pub fn add_liquidity(
        &mut self,
        ctx: &CallContext,
        market: Address,
        params: &AddLiquidityParams,
    ) -> Result<PoolShare, RegistryError> {
        let share = self.transact(market, |m, ledger| m.add_liquidity(ledger, ctx, params))?;
        self.emit_event(
            ctx,
            EventPayload::LiquidityAdded(liquidity_event(
                market,
                ctx,
                params.recipient,
                &share,
                &params.user_data,
            )),
        );
        Ok(share)
    }

    pub fn remove_liquidity(
        &mut self,
        ctx: &CallContext,
        market: Address,
        params: &RemoveLiquidityParams,
    ) -> Result<PoolShare, RegistryError> {
        let share = self.transact(market, |m, ledger| m.remove_liquidity(ledger, ctx, params))?;
        self.emit_event(
            ctx,
            EventPayload::LiquidityRemoved(liquidity_event(
                market,
                ctx,
                params.recipient,
                &share,
                &params.user_data,
            )),
        );
        Ok(share)
    }

    pub fn sell_underlying(
        &mut self,
        ctx: &CallContext,
        market: Address,
        nft: &mut dyn UnderlyingAsset,
        params: &SettlementParams,
    ) -> Result<SettlementResult, RegistryError> {
        let result = self.transact(market, |m, ledger| m.sell_underlying(ledger, nft, ctx, params))?;
        self.emit_event(
            ctx,
            EventPayload::UnderlyingSold(settlement_event(market, ctx, params.recipient, &result)),
        );
        Ok(result)
    }

    pub fn buy_underlying(
        &mut self,
        ctx: &CallContext,
        market: Address,
        nft: &mut dyn UnderlyingAsset,
        params: &SettlementParams,
    ) -> Result<SettlementResult, RegistryError> {
        let result = self.transact(market, |m, ledger| m.buy_underlying(ledger, nft, ctx, params))?;
        self.emit_event(
            ctx,
            EventPayload::UnderlyingPurchased(settlement_event(market, ctx, params.recipient, &result)),
        );
        Ok(result)
    }
}

fn curve_event(market: Address, ctx: &CallContext, params: &CurveParams, trade: &CurveTrade) -> CurveEvent {
    CurveEvent {
        market,
        sender: ctx.sender,
        recipient: params.recipient,
        kind: params.kind,
        amount_in: trade.amount_in,
        amount_out: trade.amount_out,
        fee: trade.fee,
        user_data: params.user_data.clone(),
    }
}

fn liquidity_event(
    market: Address,
    ctx: &CallContext,
    recipient: Address,
    share: &PoolShare,
    user_data: &[u8],
) -> LiquidityEvent {
    LiquidityEvent {
        market,
        sender: ctx.sender,
        recipient,
        collateral: share.collateral,
        bull: share.bull,
        bear: share.bear,
        liquidity: share.liquidity,
        user_data: user_data.to_vec(),
    }
}

fn settlement_event(
    market: Address,
    ctx: &CallContext,
    recipient: Address,
    result: &SettlementResult,
) -> SettlementEvent {
    SettlementEvent {
        market,
        sender: ctx.sender,
        recipient,
        amount: result.amount,
        gross: result.gross,
        net: result.net,
        royalty: result.royalty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProtocolConfig, RegistryConfig};
    use crate::error::MarketError;
    use crate::events::EventPayload;
    use crate::nft::NftCollection;
    use crate::types::{unit, AssetId, AssetKind, NftStandard, Tick, Timestamp};
    use primitive_types::U256;

    const ALICE: Address = Address(1);

    fn eth(n: u64) -> U256 {
        unit() * U256::from(n)
    }

    fn ctx(tick: u64) -> CallContext {
        CallContext::new(ALICE, Tick(tick), Timestamp::from_secs(tick as i64))
    }

    fn deadline() -> Timestamp {
        Timestamp::from_secs(1_000_000)
    }

    fn setup() -> (Registry, Address) {
        let mut registry =
            Registry::new(Address(0xfee), Address(7), ProtocolConfig::testnet(), RegistryConfig::default()).unwrap();
        let nft = NftCollection::new(Address(500), Some(NftStandard::SingleOwner));
        let market = registry.create_market(&ctx(0), &nft, U256::one()).unwrap();
        registry.deposit(&ctx(0), eth(100)).unwrap();
        (registry, market)
    }

    #[test]
    fn mint_emits_with_user_data() {
        let (mut registry, market) = setup();
        let params = CurveParams::given_in(eth(1), ALICE, deadline()).with_data(vec![9, 9]);
        let trade = registry.mint(&ctx(1), market, &params).unwrap();
        assert_eq!(registry.claim_balance(ALICE, market, AssetKind::Bull), trade.amount_out);

        match &registry.recent_events(1)[0].payload {
            EventPayload::Minted(event) => {
                assert_eq!(event.user_data, vec![9, 9]);
                assert_eq!(event.amount_out, trade.amount_out);
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn failed_operation_leaves_no_trace() {
        let (mut registry, market) = setup();
        registry
            .mint(&ctx(1), market, &CurveParams::given_in(eth(10), ALICE, deadline()))
            .unwrap();
        let events = registry.events().len();
        let collateral = registry.balance_of(ALICE, AssetId::Collateral);

        // the first provider needs both claims: fails after nothing moved
        let params = AddLiquidityParams::new(eth(1), U256::zero(), eth(10), ALICE, deadline());
        assert_eq!(
            registry.add_liquidity(&ctx(2), market, &params),
            Err(RegistryError::Market(MarketError::ZeroAmount))
        );
        assert_eq!(registry.events().len(), events);
        assert_eq!(registry.balance_of(ALICE, AssetId::Collateral), collateral);
        assert_eq!(registry.market(market).unwrap().guard().last_action(ALICE), Some(Tick(1)));
    }

    #[test]
    fn rollback_keeps_earlier_commits() {
        let (mut registry, market) = setup();
        let first = registry
            .mint(&ctx(1), market, &CurveParams::given_in(eth(10), ALICE, deadline()))
            .unwrap();
        let greedy = CurveParams::given_in(eth(5), ALICE, deadline()).with_slippage(U256::MAX);
        assert!(registry.mint(&ctx(2), market, &greedy).is_err());
        assert!(!registry.ledger().in_transaction());

        assert_eq!(registry.claim_balance(ALICE, market, AssetKind::Bull), first.amount_out);
        assert_eq!(registry.balance_of(ALICE, AssetId::Collateral), eth(90));

        let second = registry
            .mint(&ctx(3), market, &CurveParams::given_in(eth(5), ALICE, deadline()))
            .unwrap();
        assert_eq!(
            registry.claim_balance(ALICE, market, AssetKind::Bear),
            first.amount_out + second.amount_out
        );
        assert_eq!(registry.balance_of(ALICE, AssetId::Collateral), eth(85));
    }

    #[test]
    fn unknown_market() {
        let (mut registry, _) = setup();
        let params = CurveParams::given_in(eth(1), ALICE, deadline());
        assert_eq!(
            registry.mint(&ctx(1), Address(42), &params),
            Err(RegistryError::MarketNotFound(Address(42)))
        );
    }
}
