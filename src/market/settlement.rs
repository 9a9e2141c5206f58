// 11.5 market/settlement.rs: buying and selling the underlying itself at the accumulated
// oracle value, paid from and into locked collateral. the pool reserve is never touched.

use super::core::Market;
use super::params::SettlementParams;
use super::results::SettlementResult;
use crate::error::MarketError;
use crate::ledger::ReserveLedger;
use crate::math;
use crate::nft::{ReceiptRejection, UnderlyingAsset};
use crate::royalty;
use crate::types::{Amount, AssetId, CallContext, NftStandard};
use log::debug;
use primitive_types::U256;

impl Market {
    fn check_settlement_amount(&self, amount: Amount) -> Result<(), MarketError> {
        if amount.is_zero() {
            return Err(MarketError::ZeroAmount);
        }
        if self.underlying.standard == NftStandard::SingleOwner && amount != U256::one() {
            return Err(MarketError::InvalidAmount {
                amount,
                reason: "single owner assets settle one at a time",
            });
        }
        Ok(())
    }

    fn check_collection(&self, nft: &dyn UnderlyingAsset) -> Result<(), MarketError> {
        if nft.contract() != self.underlying.contract {
            return Err(MarketError::UnsupportedUnderlyingAsset(ReceiptRejection::WrongContract));
        }
        Ok(())
    }

    // guard, then gate, then the value both sides settle at
    fn settlement_value(&self, ledger: &dyn ReserveLedger, ctx: &CallContext) -> Result<Amount, MarketError> {
        self.guard.check(ctx)?;
        if !self.swap_enabled(ledger)? {
            return Err(MarketError::SettlementDisabled);
        }
        self.asset_value_accumulated(ledger)
    }

    /// Sell units of the underlying to the market.
    pub fn sell_underlying(
        &mut self,
        ledger: &mut dyn ReserveLedger,
        nft: &mut dyn UnderlyingAsset,
        ctx: &CallContext,
        params: &SettlementParams,
    ) -> Result<SettlementResult, MarketError> {
        Self::check_deadline(ctx, params.deadline)?;
        self.check_settlement_amount(params.amount)?;
        self.check_collection(nft)?;
        let value = self.settlement_value(ledger, ctx)?;

        let gross = royalty::quote_purchase(params.amount, value)?;
        let declared = nft.royalty_info(self.underlying.token_id, gross);
        let quote = royalty::quote_sale(
            params.amount,
            value,
            declared,
            ledger.implementation().royalty_cap(),
        )?;
        let locked = self.locked_collateral(ledger)?;
        if quote.gross > locked {
            return Err(MarketError::InsufficientLockedCollateral {
                required: quote.gross,
                available: locked,
            });
        }
        if quote.net < params.price_bound {
            return Err(MarketError::SlippageExceeded {
                bound: params.price_bound,
                actual: quote.net,
            });
        }

        ledger.transfer(self.address, params.recipient, AssetId::Collateral, quote.net)?;
        if let Some(payment) = quote.royalty {
            ledger.transfer(self.address, payment.recipient, AssetId::Collateral, payment.amount)?;
        }
        self.settlement_outflow = math::add(self.settlement_outflow, quote.gross)?;

        let receipt = nft.safe_transfer(
            ctx.sender,
            self.address,
            self.underlying.token_id,
            params.amount,
            &params.user_data,
        )?;
        if let Err(rejected) = self.accept_underlying(&receipt) {
            // the receiver hook refused it, hand the tokens back
            nft.safe_transfer(self.address, ctx.sender, receipt.token_id, receipt.amount, &[])?;
            return Err(rejected);
        }

        self.commit(ctx);
        debug!(
            "market {} bought {} underlying for {} (net {})",
            self.address, params.amount, quote.gross, quote.net
        );
        Ok(SettlementResult {
            amount: params.amount,
            gross: quote.gross,
            net: quote.net,
            royalty: quote.royalty,
        })
    }

    /// Buy units of the underlying out of the market's inventory.
    pub fn buy_underlying(
        &mut self,
        ledger: &mut dyn ReserveLedger,
        nft: &mut dyn UnderlyingAsset,
        ctx: &CallContext,
        params: &SettlementParams,
    ) -> Result<SettlementResult, MarketError> {
        Self::check_deadline(ctx, params.deadline)?;
        self.check_settlement_amount(params.amount)?;
        self.check_collection(nft)?;
        let inventory = nft.balance_of(self.address, self.underlying.token_id);
        if params.amount > inventory {
            return Err(MarketError::InvalidAmount {
                amount: params.amount,
                reason: "exceeds market inventory",
            });
        }
        let value = self.settlement_value(ledger, ctx)?;

        let cost = royalty::quote_purchase(params.amount, value)?;
        if cost > params.price_bound {
            return Err(MarketError::SlippageExceeded {
                bound: params.price_bound,
                actual: cost,
            });
        }

        ledger.transfer(ctx.sender, self.address, AssetId::Collateral, cost)?;
        self.settlement_inflow = math::add(self.settlement_inflow, cost)?;
        nft.safe_transfer(
            self.address,
            params.recipient,
            self.underlying.token_id,
            params.amount,
            &params.user_data,
        )?;

        self.commit(ctx);
        debug!("market {} sold {} underlying for {}", self.address, params.amount, cost);
        Ok(SettlementResult {
            amount: params.amount,
            gross: cost,
            net: cost,
            royalty: None,
        })
    }
}
