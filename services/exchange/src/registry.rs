//! Asset registry
//!
//! Maps tickers to the external token handle backing them and tells the
//! exchange which ticker is the reference (quote) asset. The reference asset
//! is registered at construction; every other asset enters through
//! [`AssetRegistry::add_asset`] and becomes tradable immediately.

use std::collections::HashMap;
use types::asset::{Asset, Ticker, TokenHandle};
use types::errors::ExchangeError;

/// Registered assets in registration order
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    reference: Ticker,
    /// Registration order, reference asset first
    assets: Vec<Asset>,
    /// Ticker → position in `assets`
    positions: HashMap<Ticker, usize>,
}

impl AssetRegistry {
    /// Create a registry holding only the reference asset
    pub fn new(reference: Ticker, handle: TokenHandle) -> Self {
        let mut positions = HashMap::new();
        positions.insert(reference.clone(), 0);
        Self {
            reference: reference.clone(),
            assets: vec![Asset {
                ticker: reference,
                handle,
            }],
            positions,
        }
    }

    /// Register a new asset
    ///
    /// Registering a ticker twice is rejected; the first handle stays.
    pub fn add_asset(&mut self, ticker: Ticker, handle: TokenHandle) -> Result<(), ExchangeError> {
        if self.positions.contains_key(&ticker) {
            return Err(ExchangeError::AssetAlreadyRegistered { ticker });
        }

        self.positions.insert(ticker.clone(), self.assets.len());
        self.assets.push(Asset { ticker, handle });
        Ok(())
    }

    /// Look up a registered asset
    pub fn resolve(&self, ticker: &Ticker) -> Result<&Asset, ExchangeError> {
        self.positions
            .get(ticker)
            .and_then(|&position| self.assets.get(position))
            .ok_or_else(|| ExchangeError::UnknownAsset {
                ticker: ticker.clone(),
            })
    }

    pub fn is_registered(&self, ticker: &Ticker) -> bool {
        self.positions.contains_key(ticker)
    }

    pub fn is_reference(&self, ticker: &Ticker) -> bool {
        &self.reference == ticker
    }

    /// Resolve an asset that can carry a book
    pub fn resolve_tradable(&self, ticker: &Ticker) -> Result<&Asset, ExchangeError> {
        let asset = self.resolve(ticker)?;
        if self.is_reference(ticker) {
            return Err(ExchangeError::ReferenceAssetNotTradable {
                ticker: ticker.clone(),
            });
        }
        Ok(asset)
    }

    pub fn reference(&self) -> &Ticker {
        &self.reference
    }

    /// Every registered asset, in registration order
    pub fn tokens(&self) -> &[Asset] {
        &self.assets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AssetRegistry {
        AssetRegistry::new(Ticker::new("DAI"), TokenHandle::new("0xdai"))
    }

    #[test]
    fn test_reference_is_registered_but_not_tradable() {
        let registry = registry();
        let dai = Ticker::new("DAI");

        assert!(registry.is_registered(&dai));
        assert!(registry.is_reference(&dai));
        assert_eq!(registry.resolve(&dai).unwrap().handle, TokenHandle::new("0xdai"));
        assert_eq!(
            registry.resolve_tradable(&dai).unwrap_err(),
            ExchangeError::ReferenceAssetNotTradable { ticker: dai }
        );
    }

    #[test]
    fn test_add_asset_keeps_registration_order() {
        let mut registry = registry();
        registry.add_asset(Ticker::new("BAT"), TokenHandle::new("0xbat")).unwrap();
        registry.add_asset(Ticker::new("REP"), TokenHandle::new("0xrep")).unwrap();
        registry.add_asset(Ticker::new("ZRX"), TokenHandle::new("0xzrx")).unwrap();

        let tickers: Vec<&str> = registry.tokens().iter().map(|a| a.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["DAI", "BAT", "REP", "ZRX"]);
        assert!(registry.resolve_tradable(&Ticker::new("REP")).is_ok());
    }

    #[test]
    fn test_add_asset_twice_rejected() {
        let mut registry = registry();
        registry.add_asset(Ticker::new("BAT"), TokenHandle::new("0xbat")).unwrap();

        let err = registry
            .add_asset(Ticker::new("BAT"), TokenHandle::new("0xother"))
            .unwrap_err();
        assert_eq!(err, ExchangeError::AssetAlreadyRegistered { ticker: Ticker::new("BAT") });
        assert_eq!(registry.resolve(&Ticker::new("BAT")).unwrap().handle, TokenHandle::new("0xbat"));
        assert_eq!(registry.tokens().len(), 2);
    }

    #[test]
    fn test_unknown_asset() {
        let registry = registry();
        let err = registry.resolve(&Ticker::new("SHIB")).unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_ASSET");
        assert!(matches!(
            registry.resolve_tradable(&Ticker::new("SHIB")),
            Err(ExchangeError::UnknownAsset { .. })
        ));
    }
}
