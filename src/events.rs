// 13.0: every state change produces an event. used for indexing and audit trails.
// the EventPayload enum lists all event types.

use crate::royalty::RoyaltyPayment;
use crate::types::{Address, Amount, AssetKind, Bps, NftStandard, SwapKind, Tick, Timestamp, TokenId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub tick: Tick,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, tick: Tick, timestamp: Timestamp, payload: EventPayload) -> Self {
        Self {
            id,
            tick,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    // Curve events
    Minted(CurveEvent),
    Burned(CurveEvent),

    // Pool events
    Swapped(SwapEvent),
    LiquidityAdded(LiquidityEvent),
    LiquidityRemoved(LiquidityEvent),
    LiquidityLocked(LiquidityLockedEvent),
    OracleSampled(OracleSampledEvent),

    // Settlement events
    UnderlyingSold(SettlementEvent),
    UnderlyingPurchased(SettlementEvent),

    // Collateral wrapping
    CollateralDeposited(CollateralEvent),
    CollateralWithdrawn(CollateralEvent),

    // Registry events
    MarketCreated(MarketCreatedEvent),
    FeeUpdated(FeeUpdatedEvent),
    BeneficiaryUpdated(AddressUpdatedEvent),
    OracleLengthUpdated(OracleLengthUpdatedEvent),
    OwnershipProposed(AddressUpdatedEvent),
    OwnershipTransferred(AddressUpdatedEvent),
    ImplementationUpgraded(ImplementationUpgradedEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveEvent {
    pub market: Address,
    pub sender: Address,
    pub recipient: Address,
    pub kind: SwapKind,
    pub amount_in: Amount,
    pub amount_out: Amount,
    pub fee: Amount,
    pub user_data: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapEvent {
    pub market: Address,
    pub sender: Address,
    pub recipient: Address,
    pub token_in: AssetKind,
    pub token_out: AssetKind,
    pub amount_in: Amount,
    pub amount_out: Amount,
    pub user_data: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidityEvent {
    pub market: Address,
    pub sender: Address,
    pub recipient: Address,
    pub collateral: Amount,
    pub bull: Amount,
    pub bear: Amount,
    pub liquidity: Amount,
    pub user_data: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidityLockedEvent {
    pub market: Address,
    pub liquidity: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleSampledEvent {
    pub market: Address,
    pub value: Amount,
    pub sample_tick: Tick,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementEvent {
    pub market: Address,
    pub sender: Address,
    pub recipient: Address,
    pub amount: Amount,
    pub gross: Amount,
    pub net: Amount,
    pub royalty: Option<RoyaltyPayment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollateralEvent {
    pub holder: Address,
    pub amount: Amount,
    pub new_balance: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketCreatedEvent {
    pub market: Address,
    pub contract: Address,
    pub token_id: TokenId,
    pub standard: NftStandard,
    pub creator: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeUpdatedEvent {
    pub previous: Bps,
    pub fee: Bps,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressUpdatedEvent {
    pub previous: Option<Address>,
    pub address: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleLengthUpdatedEvent {
    pub previous: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImplementationUpgradedEvent {
    pub previous_version: u32,
    pub version: u32,
}
