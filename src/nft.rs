//! Underlying asset adapter.
//!
//! Markets never touch an NFT collection directly: they go through
//! [`UnderlyingAsset`] and validate every incoming transfer with
//! [`UnderlyingDescriptor::validate_receipt`].

use crate::types::{Address, Amount, NftStandard, TokenId, BPS_DENOMINATOR};
use crate::math::mul_div;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NftError {
    #[error("{holder} holds {available} of token {token_id}, needs {requested}")]
    InsufficientBalance {
        holder: Address,
        token_id: TokenId,
        requested: Amount,
        available: Amount,
    },

    #[error("single owner tokens move one at a time")]
    InvalidAmount,

    #[error("token {0} already exists")]
    AlreadyMinted(TokenId),

    #[error("transfer rejected by receiver: {0}")]
    Rejected(ReceiptRejection),
}

/// Why a market refused an incoming transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptRejection {
    NoSupportedStandard,
    WrongContract,
    WrongTokenId,
    WrongStandard,
    InvalidAmount,
    BatchTransfer,
}

impl fmt::Display for ReceiptRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ReceiptRejection::NoSupportedStandard => "no supported ownership model",
            ReceiptRejection::WrongContract => "wrong contract",
            ReceiptRejection::WrongTokenId => "wrong token id",
            ReceiptRejection::WrongStandard => "wrong ownership model",
            ReceiptRejection::InvalidAmount => "single owner amount must be 1",
            ReceiptRejection::BatchTransfer => "batch transfers not accepted",
        };
        f.write_str(reason)
    }
}

/// Transfer notification a receiving market inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub contract: Address,
    pub token_id: TokenId,
    pub standard: NftStandard,
    pub amount: Amount,
    pub batch: bool,
}

/// The one asset a market is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnderlyingDescriptor {
    pub contract: Address,
    pub token_id: TokenId,
    pub standard: NftStandard,
}

impl UnderlyingDescriptor {
    pub fn validate_receipt(&self, receipt: &Receipt) -> Result<(), ReceiptRejection> {
        if receipt.batch {
            return Err(ReceiptRejection::BatchTransfer);
        }
        if receipt.contract != self.contract {
            return Err(ReceiptRejection::WrongContract);
        }
        if receipt.token_id != self.token_id {
            return Err(ReceiptRejection::WrongTokenId);
        }
        if receipt.standard != self.standard {
            return Err(ReceiptRejection::WrongStandard);
        }
        if self.standard == NftStandard::SingleOwner && receipt.amount != U256::one() {
            return Err(ReceiptRejection::InvalidAmount);
        }
        Ok(())
    }
}

pub trait UnderlyingAsset {
    fn contract(&self) -> Address;

    /// None if the contract implements neither ownership model.
    fn standard(&self) -> Option<NftStandard>;

    fn balance_of(&self, holder: Address, token_id: TokenId) -> Amount;

    /// Moves tokens and returns the receipt the receiver is shown.
    fn safe_transfer(
        &mut self,
        from: Address,
        to: Address,
        token_id: TokenId,
        amount: Amount,
        data: &[u8],
    ) -> Result<Receipt, NftError>;

    /// Declared royalty on a sale of `token_id` for `sale_price`.
    fn royalty_info(&self, token_id: TokenId, sale_price: Amount) -> Option<(Address, Amount)>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyTerms {
    pub recipient: Address,
    pub bps: u32,
}

/// In memory collection for hosts without a real token contract.
#[derive(Debug, Clone)]
pub struct NftCollection {
    contract: Address,
    standard: Option<NftStandard>,
    balances: HashMap<(Address, TokenId), Amount>,
    royalty: Option<RoyaltyTerms>,
}

impl NftCollection {
    pub fn new(contract: Address, standard: Option<NftStandard>) -> Self {
        Self {
            contract,
            standard,
            balances: HashMap::new(),
            royalty: None,
        }
    }

    pub fn with_royalty(mut self, recipient: Address, bps: u32) -> Self {
        self.royalty = Some(RoyaltyTerms { recipient, bps });
        self
    }

    pub fn mint(&mut self, to: Address, token_id: TokenId, amount: Amount) -> Result<(), NftError> {
        if self.standard == Some(NftStandard::SingleOwner) {
            if amount != U256::one() {
                return Err(NftError::InvalidAmount);
            }
            if self.balances.iter().any(|((_, id), bal)| *id == token_id && !bal.is_zero()) {
                return Err(NftError::AlreadyMinted(token_id));
            }
        }
        let balance = self.balances.entry((to, token_id)).or_default();
        *balance = balance.saturating_add(amount);
        Ok(())
    }
}

impl UnderlyingAsset for NftCollection {
    fn contract(&self) -> Address {
        self.contract
    }

    fn standard(&self) -> Option<NftStandard> {
        self.standard
    }

    fn balance_of(&self, holder: Address, token_id: TokenId) -> Amount {
        self.balances
            .get(&(holder, token_id))
            .copied()
            .unwrap_or_else(U256::zero)
    }

    fn safe_transfer(
        &mut self,
        from: Address,
        to: Address,
        token_id: TokenId,
        amount: Amount,
        _data: &[u8],
    ) -> Result<Receipt, NftError> {
        let standard = self
            .standard
            .ok_or(NftError::Rejected(ReceiptRejection::NoSupportedStandard))?;
        if standard == NftStandard::SingleOwner && amount != U256::one() {
            return Err(NftError::InvalidAmount);
        }
        let available = self.balance_of(from, token_id);
        if available < amount {
            return Err(NftError::InsufficientBalance {
                holder: from,
                token_id,
                requested: amount,
                available,
            });
        }
        self.balances.insert((from, token_id), available - amount);
        let received = self.balance_of(to, token_id).saturating_add(amount);
        self.balances.insert((to, token_id), received);
        Ok(Receipt {
            contract: self.contract,
            token_id,
            standard,
            amount,
            batch: false,
        })
    }

    fn royalty_info(&self, _token_id: TokenId, sale_price: Amount) -> Option<(Address, Amount)> {
        let terms = self.royalty?;
        let amount = mul_div(sale_price, U256::from(terms.bps), U256::from(BPS_DENOMINATOR)).ok()?;
        Some((terms.recipient, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: Address = Address(500);

    fn descriptor(standard: NftStandard) -> UnderlyingDescriptor {
        UnderlyingDescriptor {
            contract: COLLECTION,
            token_id: U256::from(7u64),
            standard,
        }
    }

    fn receipt(amount: u64) -> Receipt {
        Receipt {
            contract: COLLECTION,
            token_id: U256::from(7u64),
            standard: NftStandard::SingleOwner,
            amount: U256::from(amount),
            batch: false,
        }
    }

    #[test]
    fn receipt_validation() {
        let single = descriptor(NftStandard::SingleOwner);
        assert!(single.validate_receipt(&receipt(1)).is_ok());
        assert_eq!(single.validate_receipt(&receipt(2)), Err(ReceiptRejection::InvalidAmount));
        assert_eq!(
            single.validate_receipt(&Receipt { batch: true, ..receipt(1) }),
            Err(ReceiptRejection::BatchTransfer)
        );
        assert_eq!(
            single.validate_receipt(&Receipt { contract: Address(1), ..receipt(1) }),
            Err(ReceiptRejection::WrongContract)
        );
        assert_eq!(
            single.validate_receipt(&Receipt { token_id: U256::from(8u64), ..receipt(1) }),
            Err(ReceiptRejection::WrongTokenId)
        );

        let multi = descriptor(NftStandard::MultiBalance);
        assert_eq!(multi.validate_receipt(&receipt(1)), Err(ReceiptRejection::WrongStandard));
        let fungible = Receipt {
            standard: NftStandard::MultiBalance,
            ..receipt(40)
        };
        assert!(multi.validate_receipt(&fungible).is_ok());
    }

    #[test]
    fn single_owner_collection() {
        let mut nft = NftCollection::new(COLLECTION, Some(NftStandard::SingleOwner));
        nft.mint(Address(1), U256::from(7u64), U256::one()).unwrap();
        assert_eq!(
            nft.mint(Address(2), U256::from(7u64), U256::one()),
            Err(NftError::AlreadyMinted(U256::from(7u64)))
        );

        let receipt = nft.safe_transfer(Address(1), Address(2), U256::from(7u64), U256::one(), &[]).unwrap();
        assert_eq!(receipt.standard, NftStandard::SingleOwner);
        assert_eq!(nft.balance_of(Address(2), U256::from(7u64)), U256::one());
        assert!(nft.safe_transfer(Address(1), Address(2), U256::from(7u64), U256::one(), &[]).is_err());
    }

    #[test]
    fn royalty_terms() {
        let nft = NftCollection::new(COLLECTION, Some(NftStandard::MultiBalance)).with_royalty(Address(3), 250);
        assert_eq!(
            nft.royalty_info(U256::zero(), U256::from(1_000u64)),
            Some((Address(3), U256::from(25u64)))
        );
        let plain = NftCollection::new(COLLECTION, Some(NftStandard::MultiBalance));
        assert_eq!(plain.royalty_info(U256::zero(), U256::from(1_000u64)), None);
    }
}
