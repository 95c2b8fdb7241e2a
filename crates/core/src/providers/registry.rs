use std::collections::HashMap;

use crate::models::zakat::Metal;

use super::metalprice_api::MetalpriceApiProvider;
use super::metals_dev::MetalsDevProvider;
use super::traits::MetalPriceProvider;

/// Settings key holding the metalpriceapi.com API key.
pub const METALPRICE_API_KEY: &str = "metalpriceapi";

/// Settings key holding the metals.dev API key.
pub const METALS_DEV_KEY: &str = "metals_dev";

/// Ordered set of metal price providers. Earlier registrations are tried
/// first; later ones serve as fallbacks.
pub struct MetalPriceRegistry {
    providers: Vec<Box<dyn MetalPriceProvider>>,
}

impl MetalPriceRegistry {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Registry with every provider whose API key is configured.
    /// metalpriceapi.com is primary, metals.dev the fallback.
    pub fn new_with_defaults(api_keys: &HashMap<String, String>) -> Self {
        let mut registry = Self::new();

        if let Some(key) = api_keys.get(METALPRICE_API_KEY) {
            registry.register(Box::new(MetalpriceApiProvider::new(key.clone())));
        }

        if let Some(key) = api_keys.get(METALS_DEV_KEY) {
            registry.register(Box::new(MetalsDevProvider::new(key.clone())));
        }

        registry
    }

    pub fn register(&mut self, provider: Box<dyn MetalPriceProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// First provider quoting `metal`.
    pub fn get_provider_for(&self, metal: Metal) -> Option<&dyn MetalPriceProvider> {
        self.providers
            .iter()
            .find(|p| p.supported_metals().contains(&metal))
            .map(|p| p.as_ref())
    }

    /// Every provider quoting `metal`, in fallback order.
    pub fn get_providers_for(&self, metal: Metal) -> Vec<&dyn MetalPriceProvider> {
        self.providers
            .iter()
            .filter(|p| p.supported_metals().contains(&metal))
            .map(|p| p.as_ref())
            .collect()
    }
}

impl Default for MetalPriceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
