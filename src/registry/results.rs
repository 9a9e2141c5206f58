// 12.0.2: registry errors. market, ledger and config failures pass through unchanged.

use crate::config::ConfigError;
use crate::error::MarketError;
use crate::ledger::LedgerError;
use crate::types::{Address, TokenId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Market {0} not found")]
    MarketNotFound(Address),

    #[error("Market for {contract} token {token_id} already exists")]
    MarketAlreadyExists { contract: Address, token_id: TokenId },

    #[error("{0} is the registry or one of its markets")]
    SelfReferential(Address),

    #[error("{0} implements no supported ownership model")]
    UnsupportedUnderlyingAsset(Address),

    #[error("{0} is not the owner")]
    NotOwner(Address),

    #[error("{0} is not the pending owner")]
    NotPendingOwner(Address),

    #[error("No ownership transfer pending")]
    NoPendingOwner,

    #[error("Fee {requested} bps above maximum {max} bps")]
    FeeTooHigh { requested: u32, max: u32 },

    #[error("Oracle length {requested} outside {min}..={max}")]
    OracleLengthOutOfRange { requested: usize, min: usize, max: usize },

    #[error("Market error: {0}")]
    Market(#[from] MarketError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
