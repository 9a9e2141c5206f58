// 9.0 config.rs: protocol settings in one place. curve constants, fees, oracle window, gate margin.
// 9.1 the fee is one flat rate on curve trades. no tiers.
// 9.2 registry host settings: event retention, event log level, market address space.

use crate::curve::Curve;
use crate::logic::StandardLogic;
use crate::oracle::MIN_ORACLE_LENGTH;
use crate::types::{unit, Address, Amount, Bps, BPS_DENOMINATOR};
use serde::{Deserialize, Serialize};

/// Hard ceiling on the curve fee, 2%.
pub const MAX_FEE_BPS: u32 = 200;

/// Market addresses are this prefix or'd with a creation nonce.
pub const MARKET_ADDRESS_PREFIX: u64 = 0x4d4b_0000_0000_0000;

// low bits of a market address hold the creation nonce
const MARKET_NONCE_MASK: u64 = 0xffff_ffff;

// Complete configuration for a deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolConfig {
    // Scopes every claim asset id
    pub chain_id: u64,
    // Curve asymptote M
    pub max_supply: Amount,
    // Curve offset S
    pub curve_stretch: Amount,
    // Fee on curve mints and burns
    pub fee_bps: u32,
    // Upper bound the owner may set the fee to
    pub max_fee_bps: u32,
    // Samples averaged for the settlement value
    pub oracle_length: usize,
    // Smallest window the owner may configure
    pub min_oracle_length: usize,
    // Samples each market retains
    pub oracle_capacity: usize,
    // Locked collateral must cover this multiple of the accumulated value
    pub settlement_margin: u32,
    // Cap on royalties paid out of a settlement sale
    pub royalty_cap_bps: u32,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        let reference = Curve::reference();
        Self {
            chain_id: 1,
            max_supply: reference.max_supply,
            curve_stretch: reference.stretch,
            fee_bps: 50, // 0.5%
            max_fee_bps: MAX_FEE_BPS,
            oracle_length: 60,
            min_oracle_length: MIN_ORACLE_LENGTH,
            oracle_capacity: 256,
            settlement_margin: 1,
            royalty_cap_bps: 1_000, // 10%
        }
    }
}

impl ProtocolConfig {
    // Cheap and fast to gate: short window, no fee
    pub fn testnet() -> Self {
        Self {
            chain_id: 5,
            fee_bps: 0,
            oracle_length: MIN_ORACLE_LENGTH,
            oracle_capacity: 64,
            ..Self::default()
        }
    }

    // Longer window and a wide margin before settlement opens
    pub fn mainnet_conservative() -> Self {
        Self {
            oracle_length: 120,
            settlement_margin: 10,
            royalty_cap_bps: 500,
            ..Self::default()
        }
    }

    pub fn curve(&self) -> Curve {
        Curve::new(self.max_supply, self.curve_stretch)
    }

    pub fn fee(&self) -> Bps {
        Bps::new(self.fee_bps)
    }

    /// Logic version 1 built from these settings.
    pub fn logic(&self) -> StandardLogic {
        StandardLogic::new(1, self.settlement_margin, Bps::new(self.royalty_cap_bps))
    }

    // Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.curve_stretch.is_zero() || self.max_supply <= unit() {
            return Err(ConfigError::InvalidCurve {
                reason: "max supply must exceed one unit and stretch must be positive".to_string(),
            });
        }
        if self.max_supply.checked_mul(self.curve_stretch).is_none() {
            return Err(ConfigError::InvalidCurve {
                reason: "max supply times stretch overflows".to_string(),
            });
        }

        if self.max_fee_bps > MAX_FEE_BPS {
            return Err(ConfigError::InvalidFees {
                reason: format!("fee ceiling above {} bps", MAX_FEE_BPS),
            });
        }
        if self.fee_bps > self.max_fee_bps {
            return Err(ConfigError::InvalidFees {
                reason: "fee above its ceiling".to_string(),
            });
        }

        if self.min_oracle_length < MIN_ORACLE_LENGTH {
            return Err(ConfigError::InvalidOracle {
                reason: format!("window floor below {}", MIN_ORACLE_LENGTH),
            });
        }
        if self.oracle_length < self.min_oracle_length || self.oracle_length > self.oracle_capacity {
            return Err(ConfigError::InvalidOracle {
                reason: "window must lie between its floor and the buffer capacity".to_string(),
            });
        }

        if self.settlement_margin == 0 {
            return Err(ConfigError::InvalidSettlement {
                reason: "margin must be at least 1".to_string(),
            });
        }
        if self.royalty_cap_bps > BPS_DENOMINATOR {
            return Err(ConfigError::InvalidSettlement {
                reason: "royalty cap above 100%".to_string(),
            });
        }

        Ok(())
    }
}

// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid curve: {reason}")]
    InvalidCurve { reason: String },

    #[error("invalid fees: {reason}")]
    InvalidFees { reason: String },

    #[error("invalid oracle: {reason}")]
    InvalidOracle { reason: String },

    #[error("invalid settlement: {reason}")]
    InvalidSettlement { reason: String },

    #[error("invalid registry: {reason}")]
    InvalidRegistry { reason: String },
}

/// 9.2: settings of the registry host itself, apart from protocol parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Events retained in memory; older ones are dropped first.
    pub max_events: usize,
    /// Log every event at info level instead of debug.
    pub verbose: bool,
    /// High bits of every market address this registry creates.
    pub market_address_prefix: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_events: 100_000,
            verbose: false,
            market_address_prefix: MARKET_ADDRESS_PREFIX,
        }
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_events == 0 {
            return Err(ConfigError::InvalidRegistry {
                reason: "event log must retain at least one event".to_string(),
            });
        }
        if self.market_address_prefix & MARKET_NONCE_MASK != 0 {
            return Err(ConfigError::InvalidRegistry {
                reason: "address prefix overlaps the nonce bits".to_string(),
            });
        }
        Ok(())
    }

    /// Address of the market created with `nonce`.
    pub fn market_address(&self, nonce: u64) -> Address {
        Address(self.market_address_prefix | (nonce & MARKET_NONCE_MASK))
    }
}

// Environment presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    Testnet,
    Mainnet,
}

impl Environment {
    pub fn config(&self) -> ProtocolConfig {
        match self {
            Environment::Development => ProtocolConfig::default(),
            Environment::Testnet => ProtocolConfig::testnet(),
            Environment::Mainnet => ProtocolConfig::mainnet_conservative(),
        }
    }

    // development hosts narrate every event
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            verbose: *self == Environment::Development,
            ..RegistryConfig::default()
        }
    }
}
