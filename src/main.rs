//! Bull/Bear Market Simulation.
//!
//! Walks one market through its lifecycle: curve issuance, pool seeding,
//! swaps that lock protocol owned liquidity, oracle warm up, settlement of
//! the underlying, and owner administration.

use bullbear_core::*;
use primitive_types::U256;
use rust_decimal_macros::dec;

const REGISTRY: Address = Address(0xb0b0);
const OWNER: Address = Address(0xa11ce);
const ALICE: Address = Address(1);
const BOB: Address = Address(2);
const ARTIST: Address = Address(3);
const COLLECTION: Address = Address(0xc0de);

fn main() -> Result<(), RegistryError> {
    env_logger::init();

    println!("Bull/Bear Valuation Market Simulation");
    println!("Single NFT, Curve Issuance, Oracle Gated Settlement");
    println!("Started {} UTC\n", Timestamp::now());

    scenario_1_curve_issuance()?;
    scenario_2_pool_and_swaps()?;
    scenario_3_oracle_and_settlement()?;
    scenario_4_flashloan_guard()?;
    scenario_5_administration()?;

    println!("\nAll simulations completed successfully.");
    Ok(())
}

fn eth(value: rust_decimal::Decimal) -> Amount {
    ether(value).unwrap_or_else(U256::zero)
}

fn show(amount: Amount) -> String {
    match to_ether(amount) {
        Some(value) => value.round_dp(6).to_string(),
        None => amount.to_string(),
    }
}

fn at(sender: Address, tick: u64) -> CallContext {
    CallContext::new(sender, Tick(tick), Timestamp::from_secs(1_700_000_000 + tick as i64 * 12))
}

fn deadline() -> Timestamp {
    Timestamp::from_secs(1_800_000_000)
}

/// Registry with one market on a single owner token held by alice.
fn setup() -> Result<(Registry, NftCollection, Address), RegistryError> {
    let mut registry = Registry::new(REGISTRY, OWNER, ProtocolConfig::testnet(), RegistryConfig::default())?;
    let mut nft = NftCollection::new(COLLECTION, Some(NftStandard::SingleOwner)).with_royalty(ARTIST, 500);
    nft.mint(ALICE, U256::one(), U256::one()).map_err(MarketError::from)?;
    let market = registry.create_market(&at(ALICE, 0), &nft, U256::one())?;
    registry.deposit(&at(ALICE, 0), eth(dec!(200)))?;
    registry.deposit(&at(BOB, 0), eth(dec!(200)))?;
    Ok((registry, nft, market))
}

fn seed_pool(registry: &mut Registry, market: Address) -> Result<(), RegistryError> {
    registry.mint(&at(ALICE, 0), market, &CurveParams::given_in(eth(dec!(50)), ALICE, deadline()))?;
    registry.add_liquidity(
        &at(ALICE, 0),
        market,
        &AddLiquidityParams::new(eth(dec!(10)), eth(dec!(100000)), eth(dec!(100000)), ALICE, deadline()),
    )?;
    Ok(())
}

/// Curve mint and burn.
fn scenario_1_curve_issuance() -> Result<(), RegistryError> {
    println!("Scenario 1: Curve Issuance\n");

    let (mut registry, _, market) = setup()?;
    let minted = registry.mint(&at(ALICE, 1), market, &CurveParams::given_in(eth(dec!(1)), ALICE, deadline()))?;
    println!("  Alice deposits 1 collateral");
    println!("  Minted {} bull and bear, fee {}", show(minted.amount_out), show(minted.fee));

    let more = registry.mint(&at(ALICE, 2), market, &CurveParams::given_in(eth(dec!(1)), ALICE, deadline()))?;
    println!("  Second collateral mints {} pairs (curve steepens)", show(more.amount_out));

    let half = minted.amount_out / U256::from(2u64);
    let burned = registry.burn(&at(ALICE, 3), market, &CurveParams::given_in(half, ALICE, deadline()))?;
    println!("  Burning {} pairs returns {} collateral\n", show(half), show(burned.amount_out));
    Ok(())
}

/// Seeding the pool and trading claims.
fn scenario_2_pool_and_swaps() -> Result<(), RegistryError> {
    println!("Scenario 2: Pool And Swaps\n");

    let (mut registry, _, market) = setup()?;
    seed_pool(&mut registry, market)?;
    println!("  Alice seeds the pool: 10 collateral, 100,000 bull, 100,000 bear");

    let buy = SwapParams::given_in(AssetKind::Collateral, AssetKind::Bull, eth(dec!(1)), BOB, deadline());
    let result = registry.swap(&at(BOB, 1), market, &buy)?;
    println!(
        "  Bob swaps 1 collateral for {} bull, {} liquidity locked",
        show(result.amount_out),
        show(result.locked_liquidity)
    );

    let flip = SwapParams::given_in(AssetKind::Bull, AssetKind::Bear, result.amount_out, BOB, deadline());
    let result = registry.swap(&at(BOB, 2), market, &flip)?;
    println!("  Bob flips his bull into {} bear", show(result.amount_out));

    if let Some(state) = registry.market(market) {
        let reserves = state.reserves(registry.ledger());
        println!(
            "  Reserves: {} collateral, {} bull, {} bear\n",
            show(reserves.collateral),
            show(reserves.bull),
            show(reserves.bear)
        );
    }
    Ok(())
}

/// Swap across ticks until the gate opens, then settle the token both ways.
fn scenario_3_oracle_and_settlement() -> Result<(), RegistryError> {
    println!("Scenario 3: Oracle Warm Up And Settlement\n");

    let (mut registry, mut nft, market) = setup()?;
    seed_pool(&mut registry, market)?;

    let mut tick = 1;
    let mut enabled = false;
    while !enabled && tick <= 200 {
        let out = if tick % 2 == 0 { AssetKind::Bull } else { AssetKind::Bear };
        let params = SwapParams::given_in(AssetKind::Collateral, out, eth(dec!(1)), BOB, deadline());
        registry.swap(&at(BOB, tick), market, &params)?;
        tick += 1;
        if let Some(state) = registry.market(market) {
            enabled = state.swap_enabled(registry.ledger())?;
        }
    }
    println!("  Settlement enabled after {} ticks of swaps", tick - 1);

    if let Some(state) = registry.market(market) {
        let value = state.asset_value_accumulated(registry.ledger())?;
        let locked = state.locked_collateral(registry.ledger())?;
        println!("  Accumulated value {}, locked collateral {}", show(value), show(locked));
    }

    let sell = SettlementParams::new(U256::one(), U256::zero(), ALICE, deadline());
    let sold = registry.sell_underlying(&at(ALICE, tick), market, &mut nft, &sell)?;
    println!(
        "  Alice sells the token: gross {}, net {}, royalty {}",
        show(sold.gross),
        show(sold.net),
        show(sold.royalty.map(|r| r.amount).unwrap_or_else(U256::zero))
    );

    let still_open = registry
        .market(market)
        .map(|state| state.swap_enabled(registry.ledger()))
        .transpose()?
        .unwrap_or(false);
    if still_open {
        let buy = SettlementParams::new(U256::one(), U256::MAX, BOB, deadline());
        let bought = registry.buy_underlying(&at(BOB, tick + 1), market, &mut nft, &buy)?;
        println!("  Bob buys it back for {}\n", show(bought.gross));
    } else {
        println!("  Gate closed again after the sale, buy back waits for more locked collateral\n");
    }
    Ok(())
}

/// A caller cannot trade and settle in the same tick.
fn scenario_4_flashloan_guard() -> Result<(), RegistryError> {
    println!("Scenario 4: Flash Loan Guard\n");

    let (mut registry, mut nft, market) = setup()?;
    seed_pool(&mut registry, market)?;
    let params = SwapParams::given_in(AssetKind::Collateral, AssetKind::Bull, eth(dec!(1)), ALICE, deadline());
    registry.swap(&at(ALICE, 7), market, &params)?;

    let sell = SettlementParams::new(U256::one(), U256::zero(), ALICE, deadline());
    match registry.sell_underlying(&at(ALICE, 7), market, &mut nft, &sell) {
        Err(e) => println!("  Same tick settlement rejected: {}\n", e),
        Ok(_) => println!("  Unexpected: same tick settlement went through\n"),
    }
    Ok(())
}

/// Owner changes fee, oracle window and logic; ownership moves in two steps.
fn scenario_5_administration() -> Result<(), RegistryError> {
    println!("Scenario 5: Administration\n");

    let (mut registry, _, _) = setup()?;
    registry.set_fee(&at(OWNER, 1), Bps::new(100))?;
    println!("  Fee set to {}", registry.ledger().fee());

    if let Err(e) = registry.set_fee(&at(OWNER, 1), Bps::new(500)) {
        println!("  Fee of 5% rejected: {}", e);
    }

    registry.set_oracle_length(&at(OWNER, 2), 10)?;
    println!("  Oracle window set to {}", registry.ledger().oracle_length());

    registry.upgrade_implementation(&at(OWNER, 3), std::sync::Arc::new(StandardLogic::new(2, 2, Bps::new(750))))?;
    println!("  Logic upgraded to v{}", registry.implementation_version());

    registry.propose_owner(&at(OWNER, 4), BOB)?;
    registry.claim_ownership(&at(BOB, 5))?;
    println!("  Ownership transferred to {}", registry.owner());
    println!("  {} events recorded\n", registry.events().len());
    Ok(())
}
