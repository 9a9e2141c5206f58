// 11.0: per asset market. composes curve, pool, oracle, guard and settlement behind
// one operation surface. every call checks the deadline first and commits only on success.

mod core;
mod liquidity;
mod mint;
mod params;
mod results;
mod settlement;
mod swap;

pub use self::core::Market;
pub use params::{AddLiquidityParams, CurveParams, RemoveLiquidityParams, SettlementParams, SwapParams};
pub use results::{CurveTrade, SettlementResult, SwapResult};
