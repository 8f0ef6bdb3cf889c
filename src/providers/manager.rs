use crate::apple_music::AppleMusicProvider;
use crate::errors::CoreError;
use crate::providers::traits::CatalogProvider;
use crate::spotify::SpotifyProvider;
use crate::providers::types::ServiceType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Per-service settings: an on/off switch plus the service's own
/// credential blob (see each provider's `from_config`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub config: serde_json::Value,
}

fn enabled_by_default() -> bool {
    true
}

/// Registry of connected catalogs, passed explicitly to whoever needs one.
pub struct ProviderManager {
    providers: Arc<RwLock<HashMap<ServiceType, Arc<dyn CatalogProvider>>>>,
    active_provider: Arc<RwLock<Option<ServiceType>>>,
}

impl Default for ProviderManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderManager {
    pub fn new() -> Self {
        Self {
            providers: Arc::new(RwLock::new(HashMap::new())),
            active_provider: Arc::new(RwLock::new(None)),
        }
    }

    /// Register a provider; the first one registered becomes active.
    pub async fn register_provider(&self, provider: Arc<dyn CatalogProvider>) {
        let service = provider.service_type();
        log::info!("Registering catalog provider: {} ({})", provider.name(), service);
        self.providers.write().await.insert(service, provider);

        let mut active = self.active_provider.write().await;
        if active.is_none() {
            *active = Some(service);
        }
    }

    /// Build and register the concrete client for `service`.
    ///
    /// Returns `Ok(false)` without touching the registry when the entry is
    /// disabled.
    pub async fn register_from_config(
        &self,
        service: ServiceType,
        config: &ProviderConfig,
    ) -> Result<bool, CoreError> {
        if !config.enabled {
            log::info!("Catalog provider {} disabled in config", service);
            return Ok(false);
        }

        let provider: Arc<dyn CatalogProvider> = match service {
            ServiceType::Spotify => Arc::new(SpotifyProvider::from_config(&config.config)?),
            ServiceType::AppleMusic => {
                Arc::new(AppleMusicProvider::from_config(&config.config)?)
            }
        };
        self.register_provider(provider).await;
        Ok(true)
    }

    pub async fn get_provider(&self, service: ServiceType) -> Option<Arc<dyn CatalogProvider>> {
        self.providers.read().await.get(&service).cloned()
    }

    pub async fn get_active_provider(&self) -> Option<Arc<dyn CatalogProvider>> {
        let active = *self.active_provider.read().await;
        match active {
            Some(service) => self.get_provider(service).await,
            None => None,
        }
    }

    pub async fn set_active_provider(&self, service: ServiceType) -> Result<(), CoreError> {
        let providers = self.providers.read().await;
        if providers.contains_key(&service) {
            *self.active_provider.write().await = Some(service);
            Ok(())
        } else {
            Err(CoreError::Config(format!("Provider {} not registered", service)))
        }
    }

    pub async fn list_providers(&self) -> Vec<ServiceType> {
        self.providers.read().await.keys().copied().collect()
    }
}
