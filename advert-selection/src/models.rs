use advert_core::AdvertisementContent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An advertisement produced for a single request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedAdvertisement {
    pub id: Uuid,
    pub content: AdvertisementContent,
    pub generated_at: DateTime<Utc>,
}

impl GeneratedAdvertisement {
    pub fn new(content: AdvertisementContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            generated_at: Utc::now(),
        }
    }
}

/// Outcome of one selection call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionResult {
    Selected(GeneratedAdvertisement),
    Empty,
}

impl SelectionResult {
    pub fn selected(content: AdvertisementContent) -> Self {
        SelectionResult::Selected(GeneratedAdvertisement::new(content))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SelectionResult::Empty)
    }

    pub fn content(&self) -> Option<&AdvertisementContent> {
        match self {
            SelectionResult::Selected(ad) => Some(&ad.content),
            SelectionResult::Empty => None,
        }
    }

    pub fn content_id(&self) -> Option<&str> {
        self.content().map(|c| c.content_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_result_exposes_content() {
        let result = SelectionResult::selected(AdvertisementContent::new("c1", "US", "<div/>"));
        assert!(!result.is_empty());
        assert_eq!(result.content_id(), Some("c1"));

        assert!(SelectionResult::Empty.is_empty());
        assert!(SelectionResult::Empty.content().is_none());
    }

    #[test]
    fn test_each_generation_gets_fresh_id() {
        let content = AdvertisementContent::new("c1", "US", "<div/>");
        let a = GeneratedAdvertisement::new(content.clone());
        let b = GeneratedAdvertisement::new(content);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_result_json_is_tagged() {
        let json = serde_json::to_value(SelectionResult::Empty).unwrap();
        assert_eq!(json["status"], "EMPTY");
    }
}
