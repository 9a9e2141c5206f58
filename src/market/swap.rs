// 11.3 market/swap.rs: secondary market trades. collateral trades deepen the pool and
// mint liquidity to the market itself, the first swap of a tick writes the oracle sample.

use super::core::Market;
use super::params::SwapParams;
use super::results::SwapResult;
use crate::error::MarketError;
use crate::ledger::ReserveLedger;
use crate::oracle::OracleSample;
use crate::pool;
use crate::types::{AssetKind, CallContext, SwapKind};
use log::debug;
use primitive_types::U256;

impl Market {
    pub fn swap(
        &mut self,
        ledger: &mut dyn ReserveLedger,
        ctx: &CallContext,
        params: &SwapParams,
    ) -> Result<SwapResult, MarketError> {
        Self::check_deadline(ctx, params.deadline)?;
        if params.amount.is_zero() {
            return Err(MarketError::ZeroAmount);
        }

        let logic = ledger.implementation();
        let liquidity_supply = self.liquidity_supply(ledger);
        if liquidity_supply.is_zero() {
            return Err(MarketError::ReserveUninitialized);
        }
        let reserves = self.reserves(ledger);
        let pair = logic.swap_reserves(&reserves, params.token_in, params.token_out)?;
        let (amount_in, amount_out) = logic.quote_swap(params.kind, params.amount, pair)?;

        match params.kind {
            SwapKind::GivenIn if amount_out < params.slippage => {
                return Err(MarketError::SlippageExceeded {
                    bound: params.slippage,
                    actual: amount_out,
                });
            }
            SwapKind::GivenOut if amount_in > params.slippage => {
                return Err(MarketError::SlippageExceeded {
                    bound: params.slippage,
                    actual: amount_in,
                });
            }
            _ => {}
        }
        if amount_out.is_zero() {
            return Err(MarketError::InvalidAmount {
                amount: amount_in,
                reason: "swap returns nothing",
            });
        }

        // both measured before any balance moves
        let untraded = pool::untraded_claim(params.token_in, params.token_out);
        let pre_depth = match untraded {
            Some(claim) => Some((claim, reserves.collateral_depth(claim)?)),
            None => None,
        };
        let pending_sample = if self.oracle.needs_sample(ctx.tick) {
            Some(logic.asset_value(&reserves)?)
        } else {
            None
        };

        let asset_in = self.asset_id(ledger, params.token_in);
        let asset_out = self.asset_id(ledger, params.token_out);
        ledger.transfer(ctx.sender, self.address, asset_in, amount_in)?;
        ledger.transfer(self.address, params.recipient, asset_out, amount_out)?;

        let mut locked = U256::zero();
        if let Some((claim, pre)) = pre_depth {
            let post = self.reserves(ledger).collateral_depth(claim)?;
            locked = pool::locked_liquidity(liquidity_supply, pre, post)?;
            if !locked.is_zero() {
                ledger.mint(self.address, self.address, AssetKind::Liquidity, locked)?;
            }
        }

        let sample = pending_sample.map(|value| {
            self.oracle.record(value, ctx.tick);
            OracleSample {
                value,
                tick: ctx.tick,
            }
        });

        self.commit(ctx);
        debug!(
            "market {} swap {} {} -> {} {} (locked {})",
            self.address, amount_in, params.token_in, amount_out, params.token_out, locked
        );
        Ok(SwapResult {
            amount_in,
            amount_out,
            locked_liquidity: locked,
            sample,
        })
    }
}
