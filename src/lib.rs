// bullbear-core: valuation markets for single NFTs.
// each market issues bull/bear claim pairs on a bonding curve, trades them in a
// three asset constant product pool, and settles the underlying itself at an
// oracle averaged value once enough protocol owned collateral is locked.
// all computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: Address, AssetId, Bps, Tick, Timestamp, CallContext
//   1.5  math.rs: U256 mul/div with 512-bit intermediates, isqrt
//   2.x  error.rs: MarketError taxonomy
//   3.x  curve.rs: issuance curve, fee split
//   4.x  pricing.rs: constant product swap quotes
//   5.x  pool.rs: liquidity shares, protocol owned liquidity, locked collateral
//   6.x  oracle.rs: per tick value samples, averaging
//   6.4  guard.rs: same tick repeat action lock
//   7.x  royalty.rs: settlement sale/purchase pricing
//   8.x  ledger.rs: multi asset balances and protocol parameters
//   8.5  nft.rs: underlying asset adapter and receipt checks
//   9.x  config.rs: protocol and registry settings, env presets
//   10.x logic.rs: upgradeable market logic
//   11.x market/: mint, swap, liquidity, settlement
//   12.x registry/: market factory, admin, atomic operation host
//   13.x events.rs: state transition events for audit

// core market modules
pub mod curve;
pub mod error;
pub mod market;
pub mod math;
pub mod oracle;
pub mod pool;
pub mod pricing;
pub mod royalty;
pub mod types;

// safety modules
pub mod guard;

// host modules
pub mod config;
pub mod events;
pub mod ledger;
pub mod logic;
pub mod nft;
pub mod registry;

// re exports for convenience
pub use config::{ConfigError, Environment, ProtocolConfig, RegistryConfig, MARKET_ADDRESS_PREFIX};
pub use curve::{Curve, FeeSplit};
pub use error::MarketError;
pub use events::*;
pub use guard::FlashloanGuard;
pub use ledger::{Ledger, LedgerError, ReserveLedger};
pub use logic::{MarketLogic, StandardLogic};
pub use market::*;
pub use math::MathError;
pub use nft::{NftCollection, NftError, Receipt, ReceiptRejection, UnderlyingAsset, UnderlyingDescriptor};
pub use oracle::{OracleBuffer, OracleSample, MIN_ORACLE_LENGTH};
pub use pool::PoolShare;
pub use pricing::{PoolReserves, SwapReserves};
pub use registry::{Registry, RegistryError};
pub use royalty::{RoyaltyPayment, SaleQuote};
pub use types::*;
