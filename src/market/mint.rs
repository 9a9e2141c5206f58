// 11.2 market/mint.rs: issuance and redemption of bull/bear pairs along the curve.

use super::core::Market;
use super::params::CurveParams;
use super::results::CurveTrade;
use crate::curve::{deduct_fee, gross_up};
use crate::error::MarketError;
use crate::ledger::ReserveLedger;
use crate::math;
use crate::types::{AssetId, AssetKind, CallContext, SwapKind};
use log::debug;

impl Market {
    /// Deposit collateral for an equal amount of bull and bear.
    pub fn mint(
        &mut self,
        ledger: &mut dyn ReserveLedger,
        ctx: &CallContext,
        params: &CurveParams,
    ) -> Result<CurveTrade, MarketError> {
        Self::check_deadline(ctx, params.deadline)?;
        if params.amount.is_zero() {
            return Err(MarketError::ZeroAmount);
        }

        let fee = ledger.fee();
        let supply = self.pair_supply(ledger);
        let (split, minted) = match params.kind {
            SwapKind::GivenIn => {
                let split = deduct_fee(params.amount, fee)?;
                let minted = self.curve.mint_out_given_in(self.deposited, supply, split.net)?;
                if minted < params.slippage {
                    return Err(MarketError::SlippageExceeded {
                        bound: params.slippage,
                        actual: minted,
                    });
                }
                (split, minted)
            }
            SwapKind::GivenOut => {
                let net = self.curve.mint_in_given_out(self.deposited, supply, params.amount)?;
                let split = gross_up(net, fee)?;
                if split.gross > params.slippage {
                    return Err(MarketError::SlippageExceeded {
                        bound: params.slippage,
                        actual: split.gross,
                    });
                }
                (split, params.amount)
            }
        };
        if minted.is_zero() {
            return Err(MarketError::InvalidAmount {
                amount: params.amount,
                reason: "mints no pairs",
            });
        }

        let beneficiary = ledger.beneficiary();
        ledger.transfer(ctx.sender, self.address, AssetId::Collateral, split.gross)?;
        ledger.transfer(self.address, beneficiary, AssetId::Collateral, split.fee)?;
        ledger.mint(self.address, params.recipient, AssetKind::Bull, minted)?;
        ledger.mint(self.address, params.recipient, AssetKind::Bear, minted)?;
        self.deposited = math::add(self.deposited, split.net)?;

        self.commit(ctx);
        debug!(
            "market {} minted {} pairs for {} (fee {})",
            self.address, minted, split.gross, split.fee
        );
        Ok(CurveTrade {
            amount_in: split.gross,
            amount_out: minted,
            fee: split.fee,
        })
    }

    /// Return pairs for collateral.
    pub fn burn(
        &mut self,
        ledger: &mut dyn ReserveLedger,
        ctx: &CallContext,
        params: &CurveParams,
    ) -> Result<CurveTrade, MarketError> {
        Self::check_deadline(ctx, params.deadline)?;
        if params.amount.is_zero() {
            return Err(MarketError::ZeroAmount);
        }

        let fee = ledger.fee();
        let supply = self.pair_supply(ledger);
        let (split, pairs) = match params.kind {
            SwapKind::GivenIn => {
                let released = self.curve.burn_out_given_in(self.deposited, supply, params.amount)?;
                let split = deduct_fee(released, fee)?;
                if split.net < params.slippage {
                    return Err(MarketError::SlippageExceeded {
                        bound: params.slippage,
                        actual: split.net,
                    });
                }
                (split, params.amount)
            }
            SwapKind::GivenOut => {
                let split = gross_up(params.amount, fee)?;
                let pairs = self.curve.burn_in_given_out(self.deposited, supply, split.gross)?;
                if pairs > params.slippage {
                    return Err(MarketError::SlippageExceeded {
                        bound: params.slippage,
                        actual: pairs,
                    });
                }
                (split, pairs)
            }
        };
        if split.gross.is_zero() {
            return Err(MarketError::InvalidAmount {
                amount: params.amount,
                reason: "releases no collateral",
            });
        }

        let beneficiary = ledger.beneficiary();
        ledger.burn(self.address, ctx.sender, AssetKind::Bull, pairs)?;
        ledger.burn(self.address, ctx.sender, AssetKind::Bear, pairs)?;
        ledger.transfer(self.address, params.recipient, AssetId::Collateral, split.net)?;
        ledger.transfer(self.address, beneficiary, AssetId::Collateral, split.fee)?;
        self.deposited = math::sub(self.deposited, split.gross)?;

        self.commit(ctx);
        debug!(
            "market {} burned {} pairs for {} (fee {})",
            self.address, pairs, split.net, split.fee
        );
        Ok(CurveTrade {
            amount_in: pairs,
            amount_out: split.net,
            fee: split.fee,
        })
    }
}
