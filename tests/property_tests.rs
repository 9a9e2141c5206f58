//! Property-based tests for stress testing core math.
//!
//! These tests verify curve, pricing, fee and oracle invariants hold under random inputs.

use bullbear_core::curve::{deduct_fee, gross_up};
use bullbear_core::pricing::{in_given_out, out_given_in, swap_reserves};
use bullbear_core::*;
use primitive_types::U256;
use proptest::prelude::*;

fn eth(n: u64) -> Amount {
    unit() * U256::from(n)
}

// Strategies for generating test data
fn supply_strategy() -> impl Strategy<Value = Amount> {
    (0u64..900_000u64).prop_map(eth) // up to 90% of max supply
}

fn collateral_strategy() -> impl Strategy<Value = Amount> {
    (0u64..1_000_000u64).prop_map(eth)
}

fn step_strategy() -> impl Strategy<Value = Amount> {
    (1u64..10_000u64).prop_map(eth)
}

fn trade_strategy() -> impl Strategy<Value = Amount> {
    (1u64..1_000_000u64).prop_map(|x| unit() / U256::from(1_000u64) * U256::from(x)) // 0.001 to 1000
}

fn reserve_strategy() -> impl Strategy<Value = Amount> {
    (1u64..1_000_000u64).prop_map(eth)
}

fn claim_strategy() -> impl Strategy<Value = AssetKind> {
    prop_oneof![Just(AssetKind::Bull), Just(AssetKind::Bear)]
}

fn fee_strategy() -> impl Strategy<Value = Bps> {
    (0u32..=200u32).prop_map(Bps::new)
}

proptest! {
    /// E(T) strictly increasing and convex
    #[test]
    fn collateral_curve_increasing_and_convex(
        supply in supply_strategy(),
        step in step_strategy(),
    ) {
        let curve = Curve::reference();
        let e1 = curve.collateral_for_supply(supply).unwrap();
        let e2 = curve.collateral_for_supply(supply + step).unwrap();
        let e3 = curve.collateral_for_supply(supply + step + step).unwrap();

        prop_assert!(e2 > e1);
        prop_assert!(e3 > e2);
        prop_assert!(e3 - e2 > e2 - e1, "E should be convex");
    }

    /// T(E) strictly increasing and concave
    #[test]
    fn supply_curve_increasing_and_concave(
        collateral in collateral_strategy(),
        step in step_strategy(),
    ) {
        let curve = Curve::reference();
        let t1 = curve.supply_for_collateral(collateral).unwrap();
        let t2 = curve.supply_for_collateral(collateral + step).unwrap();
        let t3 = curve.supply_for_collateral(collateral + step + step).unwrap();

        prop_assert!(t2 > t1);
        prop_assert!(t3 > t2);
        prop_assert!(t2 - t1 > t3 - t2, "T should be concave");
        prop_assert!(t3 < curve.max_supply);
    }

    /// Pricing a mint by its output then minting that input yields at least the output
    #[test]
    fn mint_given_out_covers_target(
        deposited in (0u64..1_000u64).prop_map(eth),
        target in step_strategy(),
    ) {
        let curve = Curve::reference();
        let supply = curve.supply_for_collateral(deposited).unwrap();
        let cost = curve.mint_in_given_out(deposited, supply, target).unwrap();
        let minted = curve.mint_out_given_in(deposited, supply, cost).unwrap();
        prop_assert!(minted >= target);
    }

    /// Without a fee, given out charges the given in amount or one wei more.
    /// Past E+S = sqrt(M*S) one wei of collateral buys less than one pair, so
    /// deposits stay below that point.
    #[test]
    fn mint_round_trip_at_zero_fee(
        deposited in (0u64..8_000u64).prop_map(eth),
        amount in trade_strategy(),
    ) {
        let curve = Curve::reference();
        let supply = curve.supply_for_collateral(deposited).unwrap();
        let minted = curve.mint_out_given_in(deposited, supply, amount).unwrap();
        let back = curve.mint_in_given_out(deposited, supply, minted).unwrap();

        prop_assert!(back >= amount, "given out undercharged by {}", amount - back);
        prop_assert!(back - amount <= U256::one(), "given out overcharged by {}", back - amount);
    }

    /// Burning what a mint issued returns its input plus at most the curve's rounding dust
    #[test]
    fn mint_then_burn_returns_input(
        deposited in (0u64..100_000u64).prop_map(eth),
        amount in trade_strategy(),
    ) {
        let curve = Curve::reference();
        let supply = curve.supply_for_collateral(deposited).unwrap();
        let minted = curve.mint_out_given_in(deposited, supply, amount).unwrap();
        prop_assume!(!minted.is_zero());
        let released = curve
            .burn_out_given_in(deposited + amount, supply + minted, minted)
            .unwrap();
        prop_assert!(released >= amount);
        prop_assert!(released - amount <= U256::from(1_000_000u64));
        prop_assert!(released <= deposited + amount);
    }

    /// Fee split is exact, and a grossed up amount nets at least the target
    #[test]
    fn fee_split_consistent(
        amount in trade_strategy(),
        fee in fee_strategy(),
    ) {
        let split = deduct_fee(amount, fee).unwrap();
        prop_assert_eq!(split.net + split.fee, split.gross);

        let grossed = gross_up(amount, fee).unwrap();
        prop_assert!(grossed.gross >= amount);
        prop_assert!(deduct_fee(grossed.gross, fee).unwrap().net >= amount);
    }

    /// Constant product never shrinks across a given in swap
    #[test]
    fn swap_product_never_shrinks(
        collateral in (1u64..10_000u64).prop_map(eth),
        bull in reserve_strategy(),
        bear in reserve_strategy(),
        claim in claim_strategy(),
        amount in trade_strategy(),
        buy in any::<bool>(),
    ) {
        let reserves = PoolReserves::new(collateral, bull, bear);
        let (token_in, token_out) = if buy {
            (AssetKind::Collateral, claim)
        } else {
            (claim, AssetKind::Collateral)
        };
        let pair = swap_reserves(&reserves, token_in, token_out).unwrap();
        let out = out_given_in(amount, pair).unwrap();

        prop_assert!(out < pair.reserve_out);
        let before = pair.reserve_in * pair.reserve_out;
        let after = (pair.reserve_in + amount) * (pair.reserve_out - out);
        prop_assert!(after >= before);
    }

    /// Quoting a claim swap output back costs no more than the input that produced it
    #[test]
    fn claim_swap_given_out_covers_output(
        bull in reserve_strategy(),
        bear in reserve_strategy(),
        amount in trade_strategy(),
    ) {
        let reserves = PoolReserves::new(eth(1), bull, bear);
        let pair = swap_reserves(&reserves, AssetKind::Bull, AssetKind::Bear).unwrap();
        let out = out_given_in(amount, pair).unwrap();
        prop_assume!(!out.is_zero());

        let cost = in_given_out(out, pair).unwrap();
        prop_assert!(cost <= amount, "quoting the output back costs no more than was paid");
        prop_assert!(out_given_in(cost, pair).unwrap() >= out);
    }

    /// Average over n identical samples is that sample
    #[test]
    fn oracle_average_of_constant(
        value in trade_strategy(),
        n in 5usize..40usize,
        extra in 0usize..40usize,
    ) {
        let mut oracle = OracleBuffer::new(n + extra);
        for tick in 0..(n + extra) as u64 {
            oracle.record(value, Tick(tick));
        }
        prop_assert_eq!(oracle.average(n).unwrap(), value);
        prop_assert_eq!(oracle.latest().unwrap().value, value);
    }

    /// Only the first record in a tick lands
    #[test]
    fn oracle_one_sample_per_tick(
        values in proptest::collection::vec(1u64..1_000_000u64, 1..50),
        per_tick in 1usize..5usize,
    ) {
        let mut oracle = OracleBuffer::new(256);
        for (i, chunk) in values.chunks(per_tick).enumerate() {
            for v in chunk {
                oracle.record(U256::from(*v), Tick(i as u64));
            }
        }
        let ticks = (values.len() + per_tick - 1) / per_tick;
        prop_assert_eq!(oracle.len(), ticks);
        for i in 0..ticks {
            prop_assert_eq!(oracle.get(i).unwrap().value, U256::from(values[i * per_tick]));
        }
    }

    /// Asset value is exactly one unit whenever bull and bear reserves match
    #[test]
    fn asset_value_balanced(reserve in reserve_strategy()) {
        prop_assert_eq!(oracle::asset_value(reserve, reserve).unwrap(), unit());
    }
}
