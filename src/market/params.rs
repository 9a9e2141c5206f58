// 11.0.1: call parameters. slippage bounds are a minimum output for given-in calls
// and a maximum input for given-out calls.

use crate::types::{Address, Amount, AssetKind, SwapKind, Timestamp};
use primitive_types::U256;

/// Mint or burn request against the issuance curve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveParams {
    pub amount: Amount,
    pub kind: SwapKind,
    pub recipient: Address,
    pub slippage: Amount,
    pub deadline: Timestamp,
    pub user_data: Vec<u8>,
}

impl CurveParams {
    pub fn given_in(amount: Amount, recipient: Address, deadline: Timestamp) -> Self {
        Self {
            amount,
            kind: SwapKind::GivenIn,
            recipient,
            slippage: U256::zero(),
            deadline,
            user_data: Vec::new(),
        }
    }

    pub fn given_out(amount: Amount, recipient: Address, deadline: Timestamp) -> Self {
        Self {
            amount,
            kind: SwapKind::GivenOut,
            recipient,
            slippage: U256::MAX,
            deadline,
            user_data: Vec::new(),
        }
    }

    pub fn with_slippage(mut self, bound: Amount) -> Self {
        self.slippage = bound;
        self
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.user_data = data;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapParams {
    pub amount: Amount,
    pub token_in: AssetKind,
    pub token_out: AssetKind,
    pub kind: SwapKind,
    pub recipient: Address,
    pub slippage: Amount,
    pub deadline: Timestamp,
    pub user_data: Vec<u8>,
}

impl SwapParams {
    pub fn given_in(
        token_in: AssetKind,
        token_out: AssetKind,
        amount: Amount,
        recipient: Address,
        deadline: Timestamp,
    ) -> Self {
        Self {
            amount,
            token_in,
            token_out,
            kind: SwapKind::GivenIn,
            recipient,
            slippage: U256::zero(),
            deadline,
            user_data: Vec::new(),
        }
    }

    pub fn given_out(
        token_in: AssetKind,
        token_out: AssetKind,
        amount: Amount,
        recipient: Address,
        deadline: Timestamp,
    ) -> Self {
        Self {
            kind: SwapKind::GivenOut,
            slippage: U256::MAX,
            ..Self::given_in(token_in, token_out, amount, recipient, deadline)
        }
    }

    pub fn with_slippage(mut self, bound: Amount) -> Self {
        self.slippage = bound;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLiquidityParams {
    pub collateral: Amount,
    pub max_bull: Amount,
    pub max_bear: Amount,
    pub min_liquidity: Amount,
    pub recipient: Address,
    pub deadline: Timestamp,
    pub user_data: Vec<u8>,
}

impl AddLiquidityParams {
    pub fn new(
        collateral: Amount,
        max_bull: Amount,
        max_bear: Amount,
        recipient: Address,
        deadline: Timestamp,
    ) -> Self {
        Self {
            collateral,
            max_bull,
            max_bear,
            min_liquidity: U256::zero(),
            recipient,
            deadline,
            user_data: Vec::new(),
        }
    }

    pub fn with_min_liquidity(mut self, min_liquidity: Amount) -> Self {
        self.min_liquidity = min_liquidity;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveLiquidityParams {
    pub liquidity: Amount,
    pub min_collateral: Amount,
    pub min_bull: Amount,
    pub min_bear: Amount,
    pub recipient: Address,
    pub deadline: Timestamp,
    pub user_data: Vec<u8>,
}

impl RemoveLiquidityParams {
    pub fn new(liquidity: Amount, recipient: Address, deadline: Timestamp) -> Self {
        Self {
            liquidity,
            min_collateral: U256::zero(),
            min_bull: U256::zero(),
            min_bear: U256::zero(),
            recipient,
            deadline,
            user_data: Vec::new(),
        }
    }

    pub fn with_minimums(mut self, collateral: Amount, bull: Amount, bear: Amount) -> Self {
        self.min_collateral = collateral;
        self.min_bull = bull;
        self.min_bear = bear;
        self
    }
}

/// Buy or sell of the underlying. `price_bound` is the minimum net proceeds
/// of a sell and the maximum cost of a buy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementParams {
    pub amount: Amount,
    pub price_bound: Amount,
    pub recipient: Address,
    pub deadline: Timestamp,
    pub user_data: Vec<u8>,
}

impl SettlementParams {
    pub fn new(amount: Amount, price_bound: Amount, recipient: Address, deadline: Timestamp) -> Self {
        Self {
            amount,
            price_bound,
            recipient,
            deadline,
            user_data: Vec::new(),
        }
    }
}
