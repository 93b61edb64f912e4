use serde::{Deserialize, Serialize};

/// Advertisement creative owned by the content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvertisementContent {
    pub content_id: String,
    pub marketplace_id: String,
    /// Markup rendered on the page when this content wins.
    pub rendered_content: String,
}

impl AdvertisementContent {
    pub fn new(
        content_id: impl Into<String>,
        marketplace_id: impl Into<String>,
        rendered_content: impl Into<String>,
    ) -> Self {
        Self {
            content_id: content_id.into(),
            marketplace_id: marketplace_id.into(),
            rendered_content: rendered_content.into(),
        }
    }
}
