// 10.0 logic.rs: shared market logic. the ledger holds one pointer to it and every market
// resolves it per call, so an owner upgrade reaches all markets at once.

use crate::error::MarketError;
use crate::oracle;
use crate::pricing::{self, PoolReserves, SwapReserves};
use crate::types::{Amount, AssetKind, Bps, SwapKind};
use std::fmt::Debug;

/// Pricing strategy and gate parameters. Default methods carry the standard
/// math; an upgrade overrides what it changes.
pub trait MarketLogic: Debug + Send + Sync {
    fn version(&self) -> u32;

    /// Locked collateral must cover `margin` times the accumulated value.
    fn settlement_margin(&self) -> u32;

    fn royalty_cap(&self) -> Bps {
        Bps::new(1_000)
    }

    fn asset_value(&self, reserves: &PoolReserves) -> Result<Amount, MarketError> {
        oracle::asset_value(reserves.bull, reserves.bear)
    }

    fn swap_reserves(
        &self,
        reserves: &PoolReserves,
        token_in: AssetKind,
        token_out: AssetKind,
    ) -> Result<SwapReserves, MarketError> {
        pricing::swap_reserves(reserves, token_in, token_out)
    }

    /// Returns (amount_in, amount_out).
    fn quote_swap(
        &self,
        kind: SwapKind,
        amount: Amount,
        reserves: SwapReserves,
    ) -> Result<(Amount, Amount), MarketError> {
        match kind {
            SwapKind::GivenIn => Ok((amount, pricing::out_given_in(amount, reserves)?)),
            SwapKind::GivenOut => Ok((pricing::in_given_out(amount, reserves)?, amount)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StandardLogic {
    pub version: u32,
    pub settlement_margin: u32,
    pub royalty_cap: Bps,
}

impl StandardLogic {
    pub fn new(version: u32, settlement_margin: u32, royalty_cap: Bps) -> Self {
        Self {
            version,
            settlement_margin,
            royalty_cap,
        }
    }
}

impl Default for StandardLogic {
    fn default() -> Self {
        Self::new(1, 1, Bps::new(1_000))
    }
}

impl MarketLogic for StandardLogic {
    fn version(&self) -> u32 {
        self.version
    }

    fn settlement_margin(&self) -> u32 {
        self.settlement_margin
    }

    fn royalty_cap(&self) -> Bps {
        self.royalty_cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::U256;

    #[test]
    fn standard_logic_quotes_both_kinds() {
        let logic = StandardLogic::default();
        let reserves = SwapReserves {
            reserve_in: U256::from(1_000u64),
            reserve_out: U256::from(1_000u64),
        };
        let (amount_in, out) = logic.quote_swap(SwapKind::GivenIn, U256::from(1_000u64), reserves).unwrap();
        assert_eq!(amount_in, U256::from(1_000u64));
        assert_eq!(out, U256::from(333u64));

        let (amount_in, out) = logic.quote_swap(SwapKind::GivenOut, U256::from(333u64), reserves).unwrap();
        assert_eq!(out, U256::from(333u64));
        assert!(amount_in <= U256::from(1_000u64));
    }

    #[test]
    fn defaults() {
        let logic = StandardLogic::default();
        assert_eq!(logic.version(), 1);
        assert_eq!(logic.settlement_margin(), 1);
        assert_eq!(MarketLogic::royalty_cap(&logic), Bps::new(1_000));
    }
}
