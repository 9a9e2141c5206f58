// 12.0 registry/core.rs: registry state, market creation, collateral wrapping and the
// snapshot/restore wrapper every market operation runs inside.

use super::results::RegistryError;
use crate::config::{ProtocolConfig, RegistryConfig};
use crate::error::MarketError;
use crate::events::{CollateralEvent, Event, EventId, EventPayload, MarketCreatedEvent};
use crate::ledger::{Ledger, ReserveLedger};
use crate::market::Market;
use crate::nft::{UnderlyingAsset, UnderlyingDescriptor};
use crate::types::{Address, Amount, AssetId, AssetKind, CallContext, TokenId};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

/** 12.1: the registry. all markets and the ledger they share live here */
#[derive(Debug)]
pub struct Registry {
    pub(super) address: Address,
    pub(super) config: RegistryConfig,
    pub(super) protocol: ProtocolConfig,
    pub(super) ledger: Ledger,
    pub(super) markets: HashMap<Address, Market>,
    pub(super) by_underlying: HashMap<(Address, TokenId), Address>,
    pub(super) owner: Address,
    pub(super) pending_owner: Option<Address>,
    pub(super) next_market_nonce: u64,
    pub(super) events: Vec<Event>,
    pub(super) next_event_id: u64,
}

impl Registry {
    /// The owner starts as fee beneficiary.
    pub fn new(
        address: Address,
        owner: Address,
        protocol: ProtocolConfig,
        config: RegistryConfig,
    ) -> Result<Self, RegistryError> {
        protocol.validate()?;
        config.validate()?;
        let ledger = Ledger::new(
            protocol.chain_id,
            protocol.fee(),
            owner,
            protocol.oracle_length,
            Arc::new(protocol.logic()),
        );
        Ok(Self {
            address,
            config,
            protocol,
            ledger,
            markets: HashMap::new(),
            by_underlying: HashMap::new(),
            owner,
            pending_owner: None,
            next_market_nonce: 1,
            events: Vec::new(),
            next_event_id: 1,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn pending_owner(&self) -> Option<Address> {
        self.pending_owner
    }

    pub fn protocol(&self) -> &ProtocolConfig {
        &self.protocol
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    // 12.1.1: one market per (contract, token id)
    pub fn create_market(
        &mut self,
        ctx: &CallContext,
        nft: &dyn UnderlyingAsset,
        token_id: TokenId,
    ) -> Result<Address, RegistryError> {
        let contract = nft.contract();
        if contract == self.address || self.markets.contains_key(&contract) {
            return Err(RegistryError::SelfReferential(contract));
        }
        let standard = nft
            .standard()
            .ok_or(RegistryError::UnsupportedUnderlyingAsset(contract))?;
        if self.by_underlying.contains_key(&(contract, token_id)) {
            return Err(RegistryError::MarketAlreadyExists { contract, token_id });
        }

        let address = self.config.market_address(self.next_market_nonce);
        self.next_market_nonce += 1;
        let underlying = UnderlyingDescriptor {
            contract,
            token_id,
            standard,
        };
        let market = Market::new(
            address,
            underlying,
            self.protocol.curve(),
            self.protocol.oracle_capacity,
            ctx.now,
        );

        self.ledger.register_market(address);
        self.markets.insert(address, market);
        self.by_underlying.insert((contract, token_id), address);

        info!("created market {} for {} token {}", address, contract, token_id);
        self.emit_event(
            ctx,
            EventPayload::MarketCreated(MarketCreatedEvent {
                market: address,
                contract,
                token_id,
                standard,
                creator: ctx.sender,
            }),
        );
        Ok(address)
    }

    pub fn market(&self, address: Address) -> Option<&Market> {
        self.markets.get(&address)
    }

    pub fn market_for(&self, contract: Address, token_id: TokenId) -> Option<Address> {
        self.by_underlying.get(&(contract, token_id)).copied()
    }

    pub fn markets_iter(&self) -> impl Iterator<Item = (&Address, &Market)> {
        self.markets.iter()
    }

    pub fn balance_of(&self, holder: Address, asset: AssetId) -> Amount {
        self.ledger.balance_of(holder, asset)
    }

    /// Holder's balance of one of a market's claims.
    pub fn claim_balance(&self, holder: Address, market: Address, kind: AssetKind) -> Amount {
        self.ledger.balance_of(holder, self.ledger.asset_id(market, kind))
    }

    // 12.1.2: native collateral wrapping
    pub fn deposit(&mut self, ctx: &CallContext, amount: Amount) -> Result<(), RegistryError> {
        self.ledger.deposit_collateral(ctx.sender, amount)?;
        let new_balance = self.ledger.balance_of(ctx.sender, AssetId::Collateral);
        self.emit_event(
            ctx,
            EventPayload::CollateralDeposited(CollateralEvent {
                holder: ctx.sender,
                amount,
                new_balance,
            }),
        );
        Ok(())
    }

    pub fn withdraw(&mut self, ctx: &CallContext, amount: Amount) -> Result<(), RegistryError> {
        self.ledger.withdraw_collateral(ctx.sender, amount)?;
        let new_balance = self.ledger.balance_of(ctx.sender, AssetId::Collateral);
        self.emit_event(
            ctx,
            EventPayload::CollateralWithdrawn(CollateralEvent {
                holder: ctx.sender,
                amount,
                new_balance,
            }),
        );
        Ok(())
    }

    pub fn recent_events(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Runs `op` on a market; on error the market and the ledger are restored
    /// to their state before the call. The ledger journals only the entries
    /// `op` writes.
    pub(super) fn transact<T, F>(&mut self, address: Address, op: F) -> Result<T, RegistryError>
    where
        F: FnOnce(&mut Market, &mut Ledger) -> Result<T, MarketError>,
    {
        let market = self
            .markets
            .get_mut(&address)
            .ok_or(RegistryError::MarketNotFound(address))?;
        let market_snapshot = market.clone();

        self.ledger.begin();
        match op(market, &mut self.ledger) {
            Ok(value) => {
                self.ledger.commit();
                Ok(value)
            }
            Err(e) => {
                *market = market_snapshot;
                self.ledger.rollback();
                warn!("market {} operation rolled back: {}", address, e);
                Err(RegistryError::Market(e))
            }
        }
    }

    pub(super) fn emit_event(&mut self, ctx: &CallContext, payload: EventPayload) {
        let event = Event::new(EventId(self.next_event_id), ctx.tick, ctx.now, payload);
        self.next_event_id += 1;

        if self.config.verbose {
            info!("[Event {}] {:?}", event.id.0, event.payload);
        } else {
            debug!("[Event {}] {:?}", event.id.0, event.payload);
        }

        self.events.push(event);

        if self.events.len() > self.config.max_events {
            let drain_count = self.events.len() - self.config.max_events;
            self.events.drain(0..drain_count);
        }
    }
}
