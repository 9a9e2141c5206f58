// 2.1 error.rs: every way a market operation can fail. all failures abort the whole call.

use crate::ledger::LedgerError;
use crate::math::MathError;
use crate::nft::{NftError, ReceiptRejection};
use crate::types::{Address, Amount, AssetKind, Tick, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketError {
    #[error("deadline {deadline} passed (now {now})")]
    ExpiredDeadline { deadline: Timestamp, now: Timestamp },

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("invalid amount {amount}: {reason}")]
    InvalidAmount { amount: Amount, reason: &'static str },

    #[error("slippage bound {bound} violated: actual {actual}")]
    SlippageExceeded { bound: Amount, actual: Amount },

    #[error("swap reserves not initialized")]
    ReserveUninitialized,

    #[error("requested {requested} but only {reserve} in reserve")]
    MaxReserveExceeded { requested: Amount, reserve: Amount },

    #[error("input {required} would exhaust reserve {reserve}")]
    MaxInputExceeded { required: Amount, reserve: Amount },

    #[error("cannot swap {token_in} for {token_out}")]
    DisallowedAssetSwap { token_in: AssetKind, token_out: AssetKind },

    #[error("unsupported underlying asset: {0}")]
    UnsupportedUnderlyingAsset(ReceiptRejection),

    #[error("pair supply would reach max supply")]
    MaxSupplyExceeded,

    #[error("burn of {requested} exceeds available {available}")]
    InsufficientSupplyToBurn { requested: Amount, available: Amount },

    #[error("oracle holds {available} samples, {required} required")]
    OracleNotReady { required: usize, available: usize },

    #[error("settlement disabled")]
    SettlementDisabled,

    #[error("locked collateral {available} below required {required}")]
    InsufficientLockedCollateral { required: Amount, available: Amount },

    #[error("{caller} already acted in tick {tick:?}")]
    FlashloanGuardTriggered { caller: Address, tick: Tick },

    #[error("transfer failed: {0}")]
    TransferFailed(#[from] LedgerError),

    #[error("underlying transfer failed: {0}")]
    UnderlyingTransferFailed(#[from] NftError),

    #[error("math error: {0}")]
    Math(#[from] MathError),
}
