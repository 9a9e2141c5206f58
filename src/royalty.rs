// 7.0 royalty.rs: settlement pricing. sells pay a capped royalty, buys do not.

use crate::error::MarketError;
use crate::math::{self, mul_div};
use crate::types::{Address, Amount, Bps, BPS_DENOMINATOR};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyPayment {
    pub recipient: Address,
    pub amount: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleQuote {
    pub gross: Amount,
    pub royalty: Option<RoyaltyPayment>,
    pub net: Amount,
}

pub fn royalty_cap(gross: Amount, cap: Bps) -> Result<Amount, MarketError> {
    Ok(mul_div(gross, cap.as_amount(), U256::from(BPS_DENOMINATOR))?)
}

// 7.1: units * value, then royalty capped at `cap` of gross
pub fn quote_sale(
    units: Amount,
    value: Amount,
    declared: Option<(Address, Amount)>,
    cap: Bps,
) -> Result<SaleQuote, MarketError> {
    let gross = math::mul(units, value)?;
    let royalty = match declared {
        Some((recipient, amount)) if !amount.is_zero() && !recipient.is_zero() => {
            let amount = amount.min(royalty_cap(gross, cap)?);
            (!amount.is_zero()).then_some(RoyaltyPayment { recipient, amount })
        }
        _ => None,
    };
    let paid = royalty.map(|r| r.amount).unwrap_or_default();
    Ok(SaleQuote {
        gross,
        royalty,
        net: gross - paid,
    })
}

pub fn quote_purchase(units: Amount, value: Amount) -> Result<Amount, MarketError> {
    Ok(math::mul(units, value)?)
}
