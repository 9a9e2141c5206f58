// 4.0 pricing.rs: constant product swap pricing over the pooled reserves.
// trades touching collateral price against a virtual collateral reserve blended
// with the untraded claim, which keeps bull and bear tied to one collateral pool.

use crate::error::MarketError;
use crate::math::{self, mul_div, mul_div_up};
use crate::types::{Amount, AssetKind};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// The three pooled reserves of a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolReserves {
    pub collateral: Amount,
    pub bull: Amount,
    pub bear: Amount,
}

impl PoolReserves {
    pub fn new(collateral: Amount, bull: Amount, bear: Amount) -> Self {
        Self {
            collateral,
            bull,
            bear,
        }
    }

    pub fn get(&self, kind: AssetKind) -> Amount {
        match kind {
            AssetKind::Collateral => self.collateral,
            AssetKind::Bull => self.bull,
            AssetKind::Bear => self.bear,
            AssetKind::Liquidity => U256::zero(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.collateral.is_zero() || self.bull.is_zero() || self.bear.is_zero()
    }

    /// Virtual collateral reserve seen by a trade against `claim`:
    /// Reth * R_other / (R_claim + R_other).
    pub fn collateral_depth(&self, claim: AssetKind) -> Result<Amount, MarketError> {
        let other = claim.opposite_claim().ok_or(MarketError::DisallowedAssetSwap {
            token_in: AssetKind::Collateral,
            token_out: claim,
        })?;
        let claim_reserve = self.get(claim);
        let other_reserve = self.get(other);
        let total = math::add(claim_reserve, other_reserve)?;
        if total.is_zero() {
            return Err(MarketError::ReserveUninitialized);
        }
        Ok(mul_div(self.collateral, other_reserve, total)?)
    }
}

/// Reserves a single swap prices against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapReserves {
    pub reserve_in: Amount,
    pub reserve_out: Amount,
}

// 4.1: pick (and blend) the reserves for a token pair
pub fn swap_reserves(
    reserves: &PoolReserves,
    token_in: AssetKind,
    token_out: AssetKind,
) -> Result<SwapReserves, MarketError> {
    if token_in == token_out
        || token_in == AssetKind::Liquidity
        || token_out == AssetKind::Liquidity
    {
        return Err(MarketError::DisallowedAssetSwap {
            token_in,
            token_out,
        });
    }

    let (reserve_in, reserve_out) = match (token_in, token_out) {
        (AssetKind::Collateral, claim) => (reserves.collateral_depth(claim)?, reserves.get(claim)),
        (claim, AssetKind::Collateral) => (reserves.get(claim), reserves.collateral_depth(claim)?),
        (claim_in, claim_out) => (reserves.get(claim_in), reserves.get(claim_out)),
    };

    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(MarketError::ReserveUninitialized);
    }
    Ok(SwapReserves {
        reserve_in,
        reserve_out,
    })
}

// 4.2: given in. the input is damped to a*R/(a+R) before the constant product step
pub fn out_given_in(amount_in: Amount, reserves: SwapReserves) -> Result<Amount, MarketError> {
    if amount_in.is_zero() {
        return Err(MarketError::ZeroAmount);
    }
    let SwapReserves {
        reserve_in,
        reserve_out,
    } = reserves;
    let effective = mul_div(amount_in, reserve_in, math::add(amount_in, reserve_in)?)?;
    Ok(mul_div(reserve_out, effective, math::add(reserve_in, effective)?)?)
}

// 4.3: given out. exact inverse of 4.2, rounded up at both steps
pub fn in_given_out(amount_out: Amount, reserves: SwapReserves) -> Result<Amount, MarketError> {
    if amount_out.is_zero() {
        return Err(MarketError::ZeroAmount);
    }
    let SwapReserves {
        reserve_in,
        reserve_out,
    } = reserves;
    if amount_out >= reserve_out {
        return Err(MarketError::MaxReserveExceeded {
            requested: amount_out,
            reserve: reserve_out,
        });
    }
    let effective = mul_div_up(reserve_in, amount_out, reserve_out - amount_out)?;
    if effective >= reserve_in {
        return Err(MarketError::MaxInputExceeded {
            required: effective,
            reserve: reserve_in,
        });
    }
    Ok(mul_div_up(effective, reserve_in, reserve_in - effective)?)
}
