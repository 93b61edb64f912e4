use std::sync::Arc;
use advert_core::{ContentRepository, TargetingGroupRepository};
use advert_selection::{AdvertisementSelector, SelectionStrategy};
use advert_store::app_config::{Config, StoreBackend};
use advert_store::{CatalogSnapshot, InMemoryCatalog, RedisCatalog};
use anyhow::Context;

#[derive(Clone)]
pub struct AppState {
    pub selector: Arc<AdvertisementSelector>,
    pub strategy: SelectionStrategy,
}

impl AppState {
    pub fn new(selector: AdvertisementSelector, strategy: SelectionStrategy) -> Self {
        Self {
            selector: Arc::new(selector),
            strategy,
        }
    }

    /// Wires the configured catalog backend into a selector.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let (content_repo, targeting_repo): (
            Arc<dyn ContentRepository>,
            Arc<dyn TargetingGroupRepository>,
        ) =
            match config.store.backend {
                StoreBackend::Memory => {
                    let catalog = match &config.store.catalog_path {
                        Some(path) => InMemoryCatalog::load_from_file(path)
                            .await
                            .with_context(|| format!("loading catalog from {}", path))?,
                        None => {
                            tracing::warn!("No catalog_path configured; serving an empty catalog");
                            InMemoryCatalog::new()
                        }
                    };
                    let catalog = Arc::new(catalog);
                    (
                        catalog.clone() as Arc<dyn ContentRepository>,
                        catalog as Arc<dyn TargetingGroupRepository>,
                    )
                }
                StoreBackend::Redis => {
                    let url = config
                        .store
                        .redis_url
                        .as_deref()
                        .context("store.redis_url is required for the redis backend")?;
                    let catalog = RedisCatalog::new(url)?;
                    if let Some(path) = &config.store.catalog_path {
                        let snapshot = CatalogSnapshot::from_file(path).await?;
                        catalog.seed(&snapshot).await?;
                    }
                    let catalog = Arc::new(catalog);
                    (
                        catalog.clone() as Arc<dyn ContentRepository>,
                        catalog as Arc<dyn TargetingGroupRepository>,
                    )
                }
            };

        tracing::info!(
            "Using {:?} store with {:?} selection",
            config.store.backend,
            config.selection.strategy
        );

        Ok(Self::new(
            AdvertisementSelector::new(content_repo, targeting_repo),
            config.selection.strategy,
        ))
    }
}
