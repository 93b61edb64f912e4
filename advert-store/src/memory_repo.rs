use advert_core::{
    AdvertisementContent, ContentRepository, TargetingGroup, TargetingGroupRepository,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::StoreError;

/// On-disk catalog layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub contents: Vec<AdvertisementContent>,
    #[serde(default)]
    pub targeting_groups: Vec<TargetingGroup>,
}

impl CatalogSnapshot {
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Default)]
struct CatalogData {
    // Insertion order is preserved per marketplace.
    contents_by_marketplace: HashMap<String, Vec<AdvertisementContent>>,
    groups_by_content: HashMap<String, Vec<TargetingGroup>>,
}

impl CatalogData {
    fn has_content(&self, content_id: &str) -> bool {
        self.contents_by_marketplace
            .values()
            .flatten()
            .any(|c| c.content_id == content_id)
    }
}

/// Process-local catalog backing both repositories
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    data: Arc<RwLock<CatalogData>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Self, StoreError> {
        let catalog = Self::new();
        for content in snapshot.contents {
            catalog.insert_content(content).await?;
        }
        for group in snapshot.targeting_groups {
            catalog.insert_targeting_group(group).await?;
        }
        Ok(catalog)
    }

    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let snapshot = CatalogSnapshot::from_file(path).await?;
        let (contents, groups) = (snapshot.contents.len(), snapshot.targeting_groups.len());
        let catalog = Self::from_snapshot(snapshot).await?;
        info!(
            "Loaded {} contents and {} targeting groups from {}",
            contents,
            groups,
            path.display()
        );
        Ok(catalog)
    }

    pub async fn insert_content(&self, content: AdvertisementContent) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        if data.has_content(&content.content_id) {
            return Err(StoreError::Validation(format!(
                "duplicate content id {}",
                content.content_id
            )));
        }
        data.contents_by_marketplace
            .entry(content.marketplace_id.clone())
            .or_default()
            .push(content);
        Ok(())
    }

    pub async fn insert_targeting_group(&self, group: TargetingGroup) -> Result<(), StoreError> {
        group.validate()?;
        let mut data = self.data.write().await;
        if !data.has_content(&group.content_id) {
            return Err(StoreError::Validation(format!(
                "targeting group {} references unknown content {}",
                group.targeting_group_id, group.content_id
            )));
        }
        data.groups_by_content
            .entry(group.content_id.clone())
            .or_default()
            .push(group);
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for InMemoryCatalog {
    async fn get_contents(
        &self,
        marketplace_id: &str,
    ) -> Result<Vec<AdvertisementContent>, Box<dyn std::error::Error + Send + Sync>> {
        let data = self.data.read().await;
        Ok(data
            .contents_by_marketplace
            .get(marketplace_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl TargetingGroupRepository for InMemoryCatalog {
    async fn get_targeting_groups(
        &self,
        content_id: &str,
    ) -> Result<Option<Vec<TargetingGroup>>, Box<dyn std::error::Error + Send + Sync>> {
        let data = self.data.read().await;
        Ok(data.groups_by_content.get(content_id).cloned())
    }
}
