//! Liquidity pool math: provider shares, protocol owned liquidity sizing, and
//! the collateral value of the market's own share.

use crate::curve::Curve;
use crate::error::MarketError;
use crate::math::{self, isqrt, mul_div, mul_div_up};
use crate::pricing::PoolReserves;
use crate::types::{Amount, AssetKind};
use primitive_types::U256;

/// Amounts moved by a liquidity add or remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolShare {
    pub collateral: Amount,
    pub bull: Amount,
    pub bear: Amount,
    pub liquidity: Amount,
}

/// 5.1: what a provider must deposit and what it receives.
///
/// The first provider sets the ratio. Later providers match it, rounded up
/// against them, and receive claim proportional to the collateral reserve.
pub fn quote_add(
    reserves: &PoolReserves,
    liquidity_supply: Amount,
    collateral: Amount,
    max_bull: Amount,
    max_bear: Amount,
) -> Result<PoolShare, MarketError> {
    if collateral.is_zero() {
        return Err(MarketError::ZeroAmount);
    }

    if liquidity_supply.is_zero() {
        if max_bull.is_zero() || max_bear.is_zero() {
            return Err(MarketError::ZeroAmount);
        }
        return Ok(PoolShare {
            collateral,
            bull: max_bull,
            bear: max_bear,
            liquidity: collateral,
        });
    }

    if reserves.collateral.is_zero() {
        return Err(MarketError::ReserveUninitialized);
    }
    let bull = mul_div_up(collateral, reserves.bull, reserves.collateral)?;
    let bear = mul_div_up(collateral, reserves.bear, reserves.collateral)?;
    let liquidity = mul_div(collateral, liquidity_supply, reserves.collateral)?;
    Ok(PoolShare {
        collateral,
        bull,
        bear,
        liquidity,
    })
}

// 5.2: proportional floor share of every reserve
pub fn quote_remove(
    reserves: &PoolReserves,
    liquidity_supply: Amount,
    liquidity: Amount,
) -> Result<PoolShare, MarketError> {
    if liquidity.is_zero() {
        return Err(MarketError::ZeroAmount);
    }
    if liquidity_supply.is_zero() {
        return Err(MarketError::ReserveUninitialized);
    }
    if liquidity > liquidity_supply {
        return Err(MarketError::InvalidAmount {
            amount: liquidity,
            reason: "exceeds liquidity supply",
        });
    }
    Ok(PoolShare {
        collateral: mul_div(liquidity, reserves.collateral, liquidity_supply)?,
        bull: mul_div(liquidity, reserves.bull, liquidity_supply)?,
        bear: mul_div(liquidity, reserves.bear, liquidity_supply)?,
        liquidity,
    })
}

// 5.3: new protocol owned liquidity after a trade moved the collateral depth from pre to post
pub fn locked_liquidity(
    liquidity_supply: Amount,
    pre_depth: Amount,
    post_depth: Amount,
) -> Result<Amount, MarketError> {
    if pre_depth.is_zero() || post_depth <= pre_depth {
        return Ok(U256::zero());
    }
    Ok(mul_div(liquidity_supply, post_depth - pre_depth, pre_depth)?)
}

/// 5.4: number of bull/bear pairs the owned share is worth once its excess
/// claim is swapped into the scarce one against the rest of the pool.
///
/// Swapping `x` of the excess `d` yields `P_out*x/(P_in+x)`; equalising both
/// sides gives `x^2 + (P_in + P_out - d)x - d*P_in = 0`.
pub fn pair_equivalent(
    owned: &PoolReserves,
    rest: &PoolReserves,
) -> Result<Amount, MarketError> {
    let (high, low, pool_in, pool_out) = if owned.bull >= owned.bear {
        (owned.bull, owned.bear, rest.bull, rest.bear)
    } else {
        (owned.bear, owned.bull, rest.bear, rest.bull)
    };
    let excess = high - low;
    if excess.is_zero() {
        return Ok(high);
    }
    if pool_in.is_zero() || pool_out.is_zero() {
        return Ok(low);
    }

    let sum = math::add(pool_in, pool_out)?;
    let four_c = math::mul(math::mul(U256::from(4u64), excess)?, pool_in)?;
    let x = if sum >= excess {
        let b = sum - excess;
        let root = isqrt(math::add(math::mul(b, b)?, four_c)?);
        root.saturating_sub(b) / U256::from(2u64)
    } else {
        let b = excess - sum;
        let root = isqrt(math::add(math::mul(b, b)?, four_c)?);
        math::add(root, b)? / U256::from(2u64)
    };
    let x = x.min(excess);
    let received = mul_div(pool_out, x, math::add(pool_in, x)?)?;
    Ok((high - x).min(math::add(low, received)?))
}

/// 5.5: collateral value of the market owned share of the pool.
pub fn owned_collateral(
    curve: &Curve,
    reserves: &PoolReserves,
    liquidity_supply: Amount,
    owned_liquidity: Amount,
    deposited: Amount,
    pair_supply: Amount,
) -> Result<Amount, MarketError> {
    if liquidity_supply.is_zero() || owned_liquidity.is_zero() {
        return Ok(U256::zero());
    }
    let owned = PoolReserves::new(
        mul_div(reserves.collateral, owned_liquidity, liquidity_supply)?,
        mul_div(reserves.bull, owned_liquidity, liquidity_supply)?,
        mul_div(reserves.bear, owned_liquidity, liquidity_supply)?,
    );
    let rest = PoolReserves::new(
        reserves.collateral - owned.collateral,
        reserves.bull - owned.bull,
        reserves.bear - owned.bear,
    );
    let pairs = pair_equivalent(&owned, &rest)?.min(pair_supply);
    let redeemed = if pairs.is_zero() {
        U256::zero()
    } else {
        curve.burn_out_given_in(deposited, pair_supply, pairs)?
    };
    Ok(math::add(owned.collateral, redeemed)?)
}

/// Depth of collateral behind the claim a trade did *not* touch.
pub fn untraded_claim(token_in: AssetKind, token_out: AssetKind) -> Option<AssetKind> {
    match (token_in, token_out) {
        (AssetKind::Collateral, claim) | (claim, AssetKind::Collateral) => claim.opposite_claim(),
        _ => None,
    }
}
