// 3.0 curve.rs: issuance curve. deposited collateral E <-> pair supply T.
// E(T) = M*S/(M-T) - S, T(E) = M - M*S/(E+S). divisions round up so the curve
// always holds at least the collateral its supply implies.

use crate::error::MarketError;
use crate::math::{self, ceil_div, mul_div_up};
use crate::types::{unit, Amount, Bps, BPS_DENOMINATOR};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Curve constants. `max_supply` is the asymptote M, `stretch` the offset S.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curve {
    pub max_supply: Amount,
    pub stretch: Amount,
}

impl Curve {
    pub fn new(max_supply: Amount, stretch: Amount) -> Self {
        Self {
            max_supply,
            stretch,
        }
    }

    /// M = 1,000,000e18, S = 100e18
    pub fn reference() -> Self {
        Self {
            max_supply: unit() * U256::from(1_000_000u64),
            stretch: unit() * U256::from(100u64),
        }
    }

    fn product(&self) -> Result<Amount, MarketError> {
        Ok(math::mul(self.max_supply, self.stretch)?)
    }

    // 3.1: collateral implied by a pair supply
    pub fn collateral_for_supply(&self, supply: Amount) -> Result<Amount, MarketError> {
        if supply >= self.max_supply {
            return Err(MarketError::MaxSupplyExceeded);
        }
        let remaining = self.max_supply - supply;
        let scaled = ceil_div(self.product()?, remaining)?;
        Ok(math::sub(scaled, self.stretch)?)
    }

    // 3.2: pair supply reachable with a collateral amount
    pub fn supply_for_collateral(&self, collateral: Amount) -> Result<Amount, MarketError> {
        let denominator = math::add(collateral, self.stretch)?;
        let product = self.product()?;
        // less than one unit of supply would remain below the asymptote
        if denominator > product {
            return Err(MarketError::MaxSupplyExceeded);
        }
        let remaining = ceil_div(product, denominator)?;
        Ok(math::sub(self.max_supply, remaining)?)
    }

    // 3.3: pairs minted for `amount_in` collateral, already net of fees
    pub fn mint_out_given_in(
        &self,
        deposited: Amount,
        supply: Amount,
        amount_in: Amount,
    ) -> Result<Amount, MarketError> {
        if amount_in.is_zero() {
            return Err(MarketError::ZeroAmount);
        }
        let new_supply = self.supply_for_collateral(math::add(deposited, amount_in)?)?;
        Ok(new_supply.saturating_sub(supply))
    }

    // 3.4: collateral needed to mint `amount_out` pairs. ((E+S)(T+y) - M*E) / (M-T-y) + 1
    pub fn mint_in_given_out(
        &self,
        deposited: Amount,
        supply: Amount,
        amount_out: Amount,
    ) -> Result<Amount, MarketError> {
        if amount_out.is_zero() {
            return Err(MarketError::ZeroAmount);
        }
        let target = math::add(supply, amount_out)?;
        if target >= self.max_supply {
            return Err(MarketError::MaxSupplyExceeded);
        }
        let remaining = self.max_supply - target;
        let reached = math::mul(math::add(deposited, self.stretch)?, target)?;
        let held = math::mul(self.max_supply, deposited)?;
        // a deposit already ahead of its supply covers the target with one wei
        let numerator = reached.saturating_sub(held);
        Ok(math::add(numerator / remaining, U256::one())?)
    }

    // 3.5: collateral released by burning `amount_in` pairs
    pub fn burn_out_given_in(
        &self,
        deposited: Amount,
        supply: Amount,
        amount_in: Amount,
    ) -> Result<Amount, MarketError> {
        if amount_in.is_zero() {
            return Err(MarketError::ZeroAmount);
        }
        if amount_in > supply {
            return Err(MarketError::InsufficientSupplyToBurn {
                requested: amount_in,
                available: supply,
            });
        }
        let remaining = self.collateral_for_supply(supply - amount_in)?;
        Ok(deposited.saturating_sub(remaining))
    }

    // 3.6: pairs to burn for `amount_out` collateral. ceil((M-T)^2 * z / (M*S - z*(M-T)))
    pub fn burn_in_given_out(
        &self,
        deposited: Amount,
        supply: Amount,
        amount_out: Amount,
    ) -> Result<Amount, MarketError> {
        if amount_out.is_zero() {
            return Err(MarketError::ZeroAmount);
        }
        if amount_out > deposited {
            return Err(MarketError::InsufficientSupplyToBurn {
                requested: amount_out,
                available: deposited,
            });
        }
        if supply >= self.max_supply {
            return Err(MarketError::MaxSupplyExceeded);
        }
        let remaining = self.max_supply - supply;
        let drawn = math::mul(amount_out, remaining)?;
        let product = self.product()?;
        if drawn >= product {
            return Err(MarketError::InsufficientSupplyToBurn {
                requested: amount_out,
                available: deposited,
            });
        }
        let numerator = math::mul(remaining, remaining)?;
        let pairs = mul_div_up(numerator, amount_out, product - drawn)?;
        if pairs > supply {
            return Err(MarketError::InsufficientSupplyToBurn {
                requested: pairs,
                available: supply,
            });
        }
        Ok(pairs)
    }
}

/// Fee split for a curve trade. `gross = net + fee`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    pub gross: Amount,
    pub net: Amount,
    pub fee: Amount,
}

// 3.7: fee carved out of a gross amount, rounded up
pub fn deduct_fee(gross: Amount, fee: Bps) -> Result<FeeSplit, MarketError> {
    let charged = mul_div_up(gross, fee.as_amount(), U256::from(BPS_DENOMINATOR))?;
    let charged = charged.min(gross);
    Ok(FeeSplit {
        gross,
        net: gross - charged,
        fee: charged,
    })
}

// 3.8: gross amount whose fee-deducted remainder covers `net`
pub fn gross_up(net: Amount, fee: Bps) -> Result<FeeSplit, MarketError> {
    if fee.value() >= BPS_DENOMINATOR {
        return Err(MarketError::InvalidAmount {
            amount: fee.as_amount(),
            reason: "fee must be below 100%",
        });
    }
    let gross = mul_div_up(
        net,
        U256::from(BPS_DENOMINATOR),
        U256::from(BPS_DENOMINATOR - fee.value()),
    )?;
    Ok(FeeSplit {
        gross,
        net,
        fee: gross - net,
    })
}
