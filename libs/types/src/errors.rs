//! Error types for the exchange core
//!
//! Comprehensive error taxonomy using thiserror

use crate::asset::Ticker;
use crate::numeric::Quantity;
use thiserror::Error;

/// Rejection of a request by the exchange
///
/// Every variant is local to the rejected request: the ledger and the book
/// are left exactly as they were before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("Unknown asset: {ticker}")]
    UnknownAsset { ticker: Ticker },

    #[error("Reference asset {ticker} cannot be traded")]
    ReferenceAssetNotTradable { ticker: Ticker },

    #[error("Insufficient {asset} balance: required {required}, available {available}")]
    InsufficientAssetBalance {
        asset: Ticker,
        required: Quantity,
        available: Quantity,
    },

    #[error("Insufficient reference balance: required {required}, available {available}")]
    InsufficientReferenceBalance {
        required: Quantity,
        available: Quantity,
    },

    #[error("Arithmetic overflow in quantity or balance calculation")]
    Overflow,

    #[error("Quantity must be positive")]
    ZeroQuantity,

    #[error("Asset already registered: {ticker}")]
    AssetAlreadyRegistered { ticker: Ticker },
}

impl ExchangeError {
    /// Stable machine-readable code for wire responses
    pub fn code(&self) -> &'static str {
        match self {
            ExchangeError::UnknownAsset { .. } => "UNKNOWN_ASSET",
            ExchangeError::ReferenceAssetNotTradable { .. } => "REFERENCE_ASSET_NOT_TRADABLE",
            ExchangeError::InsufficientAssetBalance { .. } => "INSUFFICIENT_ASSET_BALANCE",
            ExchangeError::InsufficientReferenceBalance { .. } => "INSUFFICIENT_REFERENCE_BALANCE",
            ExchangeError::Overflow => "OVERFLOW",
            ExchangeError::ZeroQuantity => "ZERO_QUANTITY",
            ExchangeError::AssetAlreadyRegistered { .. } => "ASSET_ALREADY_REGISTERED",
        }
    }
}

/// Failure of a single ledger cell operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient balance for asset {asset}: required {required}, available {available}")]
    InsufficientBalance {
        asset: Ticker,
        required: Quantity,
        available: Quantity,
    },

    #[error("Balance overflow for asset {asset}")]
    Overflow { asset: Ticker },
}

impl LedgerError {
    /// Translate a ledger failure into the request-level failure kind
    ///
    /// Shortfalls of the reference asset are reported as
    /// `InsufficientReferenceBalance`, everything else as
    /// `InsufficientAssetBalance`.
    pub fn into_exchange_error(self, reference: &Ticker) -> ExchangeError {
        match self {
            LedgerError::InsufficientBalance { asset, required, available } => {
                if &asset == reference {
                    ExchangeError::InsufficientReferenceBalance { required, available }
                } else {
                    ExchangeError::InsufficientAssetBalance { asset, required, available }
                }
            }
            LedgerError::Overflow { .. } => ExchangeError::Overflow,
        }
    }

    /// Translate a failed withdrawal debit
    ///
    /// A withdrawal names the asset it moves, so every shortfall is an
    /// `InsufficientAssetBalance`, the reference asset included.
    /// `InsufficientReferenceBalance` only ever describes an order's
    /// reference-asset cost.
    pub fn into_withdrawal_error(self) -> ExchangeError {
        match self {
            LedgerError::InsufficientBalance { asset, required, available } => {
                ExchangeError::InsufficientAssetBalance { asset, required, available }
            }
            LedgerError::Overflow { .. } => ExchangeError::Overflow,
        }
    }
}
