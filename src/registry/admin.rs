//! Owner controlled protocol parameters and the two step ownership handover.

use super::core::Registry;
use super::results::RegistryError;
use crate::events::{
    AddressUpdatedEvent, EventPayload, FeeUpdatedEvent, ImplementationUpgradedEvent,
    OracleLengthUpdatedEvent,
};
use crate::ledger::ReserveLedger;
use crate::logic::MarketLogic;
use crate::types::{Address, Bps, CallContext};
use log::info;
use std::sync::Arc;

impl Registry {
    fn ensure_owner(&self, ctx: &CallContext) -> Result<(), RegistryError> {
        if ctx.sender != self.owner {
            return Err(RegistryError::NotOwner(ctx.sender));
        }
        Ok(())
    }

    /// Fee on curve trades, read by every market on its next call.
    pub fn set_fee(&mut self, ctx: &CallContext, fee: Bps) -> Result<(), RegistryError> {
        self.ensure_owner(ctx)?;
        if fee.value() > self.protocol.max_fee_bps {
            return Err(RegistryError::FeeTooHigh {
                requested: fee.value(),
                max: self.protocol.max_fee_bps,
            });
        }
        let previous = self.ledger.fee();
        self.ledger.set_fee(fee);
        self.protocol.fee_bps = fee.value();

        info!("fee {} -> {}", previous, fee);
        self.emit_event(ctx, EventPayload::FeeUpdated(FeeUpdatedEvent { previous, fee }));
        Ok(())
    }

    pub fn set_beneficiary(&mut self, ctx: &CallContext, beneficiary: Address) -> Result<(), RegistryError> {
        self.ensure_owner(ctx)?;
        let previous = self.ledger.beneficiary();
        self.ledger.set_beneficiary(beneficiary);

        info!("beneficiary {} -> {}", previous, beneficiary);
        self.emit_event(
            ctx,
            EventPayload::BeneficiaryUpdated(AddressUpdatedEvent {
                previous: Some(previous),
                address: beneficiary,
            }),
        );
        Ok(())
    }

    /// Window for the accumulated value. Bounded by the buffer every market keeps.
    pub fn set_oracle_length(&mut self, ctx: &CallContext, length: usize) -> Result<(), RegistryError> {
        self.ensure_owner(ctx)?;
        let min = self.protocol.min_oracle_length;
        let max = self.protocol.oracle_capacity;
        if length < min || length > max {
            return Err(RegistryError::OracleLengthOutOfRange {
                requested: length,
                min,
                max,
            });
        }
        let previous = self.ledger.oracle_length();
        self.ledger.set_oracle_length(length);
        self.protocol.oracle_length = length;

        info!("oracle length {} -> {}", previous, length);
        self.emit_event(
            ctx,
            EventPayload::OracleLengthUpdated(OracleLengthUpdatedEvent { previous, length }),
        );
        Ok(())
    }

    // 12.2: ownership moves only once the proposed owner claims it
    pub fn propose_owner(&mut self, ctx: &CallContext, candidate: Address) -> Result<(), RegistryError> {
        self.ensure_owner(ctx)?;
        let previous = self.pending_owner.replace(candidate);
        self.emit_event(
            ctx,
            EventPayload::OwnershipProposed(AddressUpdatedEvent {
                previous,
                address: candidate,
            }),
        );
        Ok(())
    }

    pub fn claim_ownership(&mut self, ctx: &CallContext) -> Result<(), RegistryError> {
        let pending = self.pending_owner.ok_or(RegistryError::NoPendingOwner)?;
        if ctx.sender != pending {
            return Err(RegistryError::NotPendingOwner(ctx.sender));
        }
        let previous = self.owner;
        self.owner = pending;
        self.pending_owner = None;

        info!("ownership {} -> {}", previous, pending);
        self.emit_event(
            ctx,
            EventPayload::OwnershipTransferred(AddressUpdatedEvent {
                previous: Some(previous),
                address: pending,
            }),
        );
        Ok(())
    }

    /// Swaps the logic all markets run. Balances and market state are untouched.
    pub fn upgrade_implementation(
        &mut self,
        ctx: &CallContext,
        logic: Arc<dyn MarketLogic>,
    ) -> Result<(), RegistryError> {
        self.ensure_owner(ctx)?;
        let previous_version = self.ledger.implementation().version();
        let version = logic.version();
        self.ledger.set_implementation(logic);

        info!("implementation v{} -> v{}", previous_version, version);
        self.emit_event(
            ctx,
            EventPayload::ImplementationUpgraded(ImplementationUpgradedEvent {
                previous_version,
                version,
            }),
        );
        Ok(())
    }

    pub fn implementation_version(&self) -> u32 {
        self.ledger.implementation().version()
    }
}
