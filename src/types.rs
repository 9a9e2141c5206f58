// 1.0: all the primitives live here. nothing in the market works without these types.
// addresses, asset ids, amounts, ticks, timestamps. each is a newtype so the compiler catches mixups.

use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 18-decimal fixed point token amount.
pub type Amount = U256;

/// Token id inside an underlying collection.
pub type TokenId = U256;

/// One whole collateral unit (1e18).
pub const UNIT: u64 = 1_000_000_000_000_000_000;

pub const BPS_DENOMINATOR: u32 = 10_000;

pub fn unit() -> Amount {
    U256::from(UNIT)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub u64);

impl Address {
    pub const ZERO: Address = Address(0);

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

// 1.1: the four asset classes a market issues or holds. discriminants are part of the id derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetKind {
    Collateral = 0,
    Bull = 1,
    Bear = 2,
    Liquidity = 3,
}

impl AssetKind {
    pub fn index(&self) -> u8 {
        *self as u8
    }

    pub fn is_claim(&self) -> bool {
        matches!(self, AssetKind::Bull | AssetKind::Bear)
    }

    /// bull <-> bear. None for collateral and liquidity.
    pub fn opposite_claim(&self) -> Option<AssetKind> {
        match self {
            AssetKind::Bull => Some(AssetKind::Bear),
            AssetKind::Bear => Some(AssetKind::Bull),
            _ => None,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetKind::Collateral => "collateral",
            AssetKind::Bull => "bull",
            AssetKind::Bear => "bear",
            AssetKind::Liquidity => "liquidity",
        };
        f.write_str(name)
    }
}

/// Ledger asset id. Collateral is shared by every market, claims are scoped to
/// (chain, market, kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetId {
    Collateral,
    Claim {
        chain_id: u64,
        market: Address,
        kind: AssetKind,
    },
}

impl AssetId {
    pub fn derive(chain_id: u64, market: Address, kind: AssetKind) -> Self {
        match kind {
            AssetKind::Collateral => AssetId::Collateral,
            _ => AssetId::Claim {
                chain_id,
                market,
                kind,
            },
        }
    }

    pub fn kind(&self) -> AssetKind {
        match self {
            AssetId::Collateral => AssetKind::Collateral,
            AssetId::Claim { kind, .. } => *kind,
        }
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetId::Collateral => f.write_str("collateral"),
            AssetId::Claim {
                chain_id,
                market,
                kind,
            } => write!(f, "{}:{}:{}", chain_id, market, kind),
        }
    }
}

// 1.2: which side of a trade the caller fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapKind {
    GivenIn,
    GivenOut,
}

// single owner (erc721 style) or multi balance (erc1155 style)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NftStandard {
    SingleOwner,
    MultiBalance,
}

// 1.3: basis points. 100 bps = 1%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Bps(u32);

impl Bps {
    pub fn new(bps: u32) -> Self {
        Self(bps)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn as_fraction(&self) -> Decimal {
        Decimal::new(self.0 as i64, 4)
    }

    pub fn as_amount(&self) -> Amount {
        U256::from(self.0)
    }
}

impl fmt::Display for Bps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bps", self.0)
    }
}

// 1.4: opaque monotonic execution unit supplied by the host. guard and oracle key on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tick(pub u64);

impl Tick {
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

// 1.5: second resolution timestamp. deadlines compare against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp())
    }

    pub fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> i64 {
        self.0
    }

    pub fn plus_secs(&self, secs: i64) -> Self {
        Self(self.0 + secs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match chrono::DateTime::from_timestamp(self.0, 0) {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            None => write!(f, "{}s", self.0),
        }
    }
}

/** 1.6: who is calling and when. sender is the direct caller, origin the account that started the call chain */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub sender: Address,
    pub origin: Address,
    pub tick: Tick,
    pub now: Timestamp,
}

impl CallContext {
    pub fn new(sender: Address, tick: Tick, now: Timestamp) -> Self {
        Self {
            sender,
            origin: sender,
            tick,
            now,
        }
    }

    pub fn via(mut self, origin: Address) -> Self {
        self.origin = origin;
        self
    }
}

// 1.7: decimal <-> fixed point. only used at the edges (sim output, tests, config).
pub fn ether(value: Decimal) -> Option<Amount> {
    if value.is_sign_negative() {
        return None;
    }
    let value = value.normalize();
    let scale = value.scale();
    if scale > 18 {
        return None;
    }
    let mantissa = U256::from(value.mantissa() as u128);
    mantissa.checked_mul(U256::exp10((18 - scale) as usize))
}

pub fn to_ether(amount: Amount) -> Option<Decimal> {
    if amount.bits() > 96 {
        return None;
    }
    Decimal::try_from_i128_with_scale(amount.low_u128() as i128, 18)
        .ok()
        .map(|d| d.normalize())
}
