use advert_core::{
    AdvertisementContent, ContentRepository, TargetingGroup, TargetingGroupRepository,
};
use async_trait::async_trait;
use redis::AsyncCommands;
use std::collections::BTreeMap;
use tracing::info;

use crate::memory_repo::CatalogSnapshot;
use crate::StoreError;

fn content_key(marketplace_id: &str) -> String {
    format!("content:{}", marketplace_id)
}

fn targeting_key(content_id: &str) -> String {
    format!("targeting:{}", content_id)
}

/// Catalog stored in Redis as JSON arrays per marketplace and per content
#[derive(Clone)]
pub struct RedisCatalog {
    client: redis::Client,
}

impl RedisCatalog {
    pub fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    /// Overwrites the keys of every marketplace and content in the snapshot.
    pub async fn seed(&self, snapshot: &CatalogSnapshot) -> Result<(), StoreError> {
        let mut contents: BTreeMap<&str, Vec<&AdvertisementContent>> = BTreeMap::new();
        for content in &snapshot.contents {
            contents.entry(content.marketplace_id.as_str()).or_default().push(content);
        }
        let mut groups: BTreeMap<&str, Vec<&TargetingGroup>> = BTreeMap::new();
        for group in &snapshot.targeting_groups {
            group.validate()?;
            groups.entry(group.content_id.as_str()).or_default().push(group);
        }

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let mut pipe = redis::pipe();
        pipe.atomic();
        for (marketplace_id, items) in &contents {
            pipe.set(content_key(marketplace_id), serde_json::to_string(items)?).ignore();
        }
        for (content_id, items) in &groups {
            pipe.set(targeting_key(content_id), serde_json::to_string(items)?).ignore();
        }
        pipe.query_async::<()>(&mut conn).await?;

        info!(
            "Seeded {} marketplaces and {} targeting sets into Redis",
            contents.len(),
            groups.len()
        );
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for RedisCatalog {
    async fn get_contents(
        &self,
        marketplace_id: &str,
    ) -> Result<Vec<AdvertisementContent>, Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(content_key(marketplace_id)).await?;
        match raw {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl TargetingGroupRepository for RedisCatalog {
    async fn get_targeting_groups(
        &self,
        content_id: &str,
    ) -> Result<Option<Vec<TargetingGroup>>, Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(targeting_key(content_id)).await?;
        let Some(json) = raw else {
            return Ok(None);
        };
        let groups: Vec<TargetingGroup> = serde_json::from_str(&json)?;
        for group in &groups {
            group.validate()?;
        }
        Ok(Some(groups))
    }
}
