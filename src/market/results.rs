// 11.0.2: what each market operation reports back.

use crate::oracle::OracleSample;
use crate::royalty::RoyaltyPayment;
use crate::types::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveTrade {
    pub amount_in: Amount,
    pub amount_out: Amount,
    pub fee: Amount, // paid to the beneficiary, in collateral
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapResult {
    pub amount_in: Amount,
    pub amount_out: Amount,
    pub locked_liquidity: Amount,
    pub sample: Option<OracleSample>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementResult {
    pub amount: Amount,
    pub gross: Amount,
    pub net: Amount,
    pub royalty: Option<RoyaltyPayment>,
}
