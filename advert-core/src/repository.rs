use async_trait::async_trait;
use crate::content::AdvertisementContent;
use crate::targeting::TargetingGroup;

/// Repository trait for advertisement content, keyed by marketplace
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// An unknown marketplace yields an empty list.
    async fn get_contents(
        &self,
        marketplace_id: &str,
    ) -> Result<Vec<AdvertisementContent>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for targeting groups, keyed by content id
#[async_trait]
pub trait TargetingGroupRepository: Send + Sync {
    async fn get_targeting_groups(
        &self,
        content_id: &str,
    ) -> Result<Option<Vec<TargetingGroup>>, Box<dyn std::error::Error + Send + Sync>>;
}
