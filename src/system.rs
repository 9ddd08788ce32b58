//! # Process-wide Lookup Wiring
//!
//! Builds the lookup stack once from [`LookupSettings`] and hands out the
//! pieces by reference; there is no global instance.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                LookupSystem                  │
//! │  ┌────────────┐  ┌────────────┐  ┌─────────┐ │
//! │  │  Lookup    │─▶│  Lookup    │─▶│Provider │ │
//! │  │  Service   │  │  Manager   │  │ Clients │ │
//! │  └────────────┘  └────────────┘  └─────────┘ │
//! │        │                              ▲      │
//! │    WordCache              ConnectivityMonitor│
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use word_lookup::{LookupSettings, LookupSystem};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let system = LookupSystem::from_settings(LookupSettings::default()).await?;
//!
//!     let info = system.service().get_word_info("  Hello ", None, None).await?;
//!     println!("{}: {}", info.word, info.definitions[0].definition);
//!     Ok(())
//! }
//! ```

use crate::config::{ConfigError, LookupSettings};
use crate::lexicon::connectivity::ConnectivityMonitor;
use crate::lexicon::provider::ProviderFactory;
use crate::lexicon::types::ProviderId;
use crate::lookup::manager::{LookupConfig, LookupManager};
use crate::lookup::service::LookupService;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct LookupSystem {
    service: Arc<LookupService>,
    connectivity: ConnectivityMonitor,
    settings: LookupSettings,
}

impl LookupSystem {
    /// Build the stack. When the settings disable the service no provider
    /// client is constructed at all.
    pub async fn from_settings(settings: LookupSettings) -> Result<Self, ConfigError> {
        settings.validate()?;

        let connectivity = ConnectivityMonitor::default();
        let manager = Arc::new(LookupManager::new(LookupConfig {
            primary_provider: settings.primary_provider,
            timeout_ms: settings.timeout_ms,
            retry_attempts: settings.retry_attempts,
            backoff_base_ms: settings.backoff_base_ms,
            backoff_jitter: settings.backoff_jitter,
        }));

        if settings.enabled {
            Self::register_providers(&manager, &settings, &connectivity).await?;
        } else {
            warn!("Lookup service is disabled by configuration; no providers registered");
        }

        let service = LookupService::new(Arc::clone(&manager), settings.cache_ttl())
            .with_default_target_language(settings.default_target_language.clone());
        service.set_disabled(!settings.enabled);

        info!(
            "Lookup system ready (primary provider: {}, enabled: {})",
            settings.primary_provider, settings.enabled
        );

        Ok(Self {
            service: Arc::new(service),
            connectivity,
            settings,
        })
    }

    /// The primary provider must be constructible; the others are
    /// registered when their configuration allows it so a runtime switch
    /// of the primary provider finds them.
    async fn register_providers(
        manager: &LookupManager,
        settings: &LookupSettings,
        connectivity: &ConnectivityMonitor,
    ) -> Result<(), ConfigError> {
        let primary = ProviderFactory::create(settings.primary_provider, settings, connectivity)?;
        manager
            .register_provider(settings.primary_provider, primary)
            .await;

        for provider in ProviderId::ALL
            .into_iter()
            .filter(|p| *p != settings.primary_provider)
        {
            match ProviderFactory::create(provider, settings, connectivity) {
                Ok(pair) => manager.register_provider(provider, pair).await,
                Err(e) => debug!("Secondary provider {} not registered: {}", provider, e),
            }
        }

        Ok(())
    }

    pub fn service(&self) -> &Arc<LookupService> {
        &self.service
    }

    pub fn manager(&self) -> &Arc<LookupManager> {
        self.service.manager()
    }

    /// Publish connectivity changes here; every client follows.
    pub fn connectivity(&self) -> &ConnectivityMonitor {
        &self.connectivity
    }

    pub fn settings(&self) -> &LookupSettings {
        &self.settings
    }
}
