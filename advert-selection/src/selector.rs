use crate::evaluator::{PredicateEvaluator, TargetingEvaluator};
use crate::models::SelectionResult;
use advert_core::{
    AdvertisementContent, ContentRepository, RequestContext, TargetingError, TargetingGroup,
    TargetingGroupRepository,
};
use rand::Rng;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// How the served advertisement is picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Highest click-through rate among contents with a matching targeting group
    #[default]
    ClickThroughRate,
    /// Uniformly random content of the marketplace, targeting ignored
    Random,
}

/// Picks the advertisement to render for a customer on a marketplace.
///
/// Holds no mutable state; one instance is shared by all requests.
pub struct AdvertisementSelector {
    content_repo: Arc<dyn ContentRepository>,
    targeting_repo: Arc<dyn TargetingGroupRepository>,
    evaluator: Arc<dyn PredicateEvaluator>,
}

impl AdvertisementSelector {
    pub fn new(
        content_repo: Arc<dyn ContentRepository>,
        targeting_repo: Arc<dyn TargetingGroupRepository>,
    ) -> Self {
        Self::with_evaluator(content_repo, targeting_repo, Arc::new(TargetingEvaluator::new()))
    }

    pub fn with_evaluator(
        content_repo: Arc<dyn ContentRepository>,
        targeting_repo: Arc<dyn TargetingGroupRepository>,
        evaluator: Arc<dyn PredicateEvaluator>,
    ) -> Self {
        Self { content_repo, targeting_repo, evaluator }
    }

    /// Returns the eligible content with the highest click-through rate, or
    /// `SelectionResult::Empty` when nothing is eligible.
    ///
    /// A content is eligible when at least one of its targeting groups
    /// evaluates to `True`; it then competes with its best such group.
    /// When two contents tie on click-through rate, the one listed first by
    /// the content repository wins.
    pub async fn select(
        &self,
        customer_id: &str,
        marketplace_id: &str,
    ) -> Result<SelectionResult, SelectionError> {
        if marketplace_id.is_empty() {
            warn!("MarketplaceId cannot be null or empty. Returning empty ad.");
            return Ok(SelectionResult::Empty);
        }

        let context = RequestContext::new(customer_id, marketplace_id);
        let contents = self
            .content_repo
            .get_contents(marketplace_id)
            .await
            .map_err(SelectionError::Repository)?;

        let mut winner: Option<(f64, AdvertisementContent)> = None;

        for content in contents {
            let Some(group) = self.best_matching_group(&content, &context).await? else {
                continue;
            };
            debug!(
                "Content {} eligible via group {} (ctr {})",
                content.content_id, group.targeting_group_id, group.click_through_rate
            );

            // Strict comparison keeps the earlier candidate on a tie.
            let beats_current = match &winner {
                Some((best_ctr, _)) => group.click_through_rate > *best_ctr,
                None => true,
            };
            if beats_current {
                winner = Some((group.click_through_rate, content));
            }
        }

        match winner {
            Some((ctr, content)) => {
                debug!(
                    "Selected content {} for marketplace {} (ctr {})",
                    content.content_id, marketplace_id, ctr
                );
                Ok(SelectionResult::selected(content))
            }
            None => {
                debug!("No eligible content for marketplace {}", marketplace_id);
                Ok(SelectionResult::Empty)
            }
        }
    }

    /// Picks any content of the marketplace uniformly at random, without
    /// consulting targeting groups.
    pub async fn select_random<R: Rng>(
        &self,
        customer_id: &str,
        marketplace_id: &str,
        rng: &mut R,
    ) -> Result<SelectionResult, SelectionError> {
        if marketplace_id.is_empty() {
            warn!("MarketplaceId cannot be null or empty. Returning empty ad.");
            return Ok(SelectionResult::Empty);
        }

        let mut contents = self
            .content_repo
            .get_contents(marketplace_id)
            .await
            .map_err(SelectionError::Repository)?;

        if contents.is_empty() {
            return Ok(SelectionResult::Empty);
        }

        let content = contents.swap_remove(rng.gen_range(0..contents.len()));
        debug!("Randomly selected content {} for customer {}", content.content_id, customer_id);
        Ok(SelectionResult::selected(content))
    }

    /// The highest click-through-rate group of `content` that matches, if any.
    async fn best_matching_group(
        &self,
        content: &AdvertisementContent,
        context: &RequestContext,
    ) -> Result<Option<TargetingGroup>, SelectionError> {
        let groups = self
            .targeting_repo
            .get_targeting_groups(&content.content_id)
            .await
            .map_err(SelectionError::Repository)?;

        let Some(groups) = groups else {
            debug!("No targeting groups for content {}", content.content_id);
            return Ok(None);
        };

        let mut best: Option<TargetingGroup> = None;
        for group in groups {
            let verdict = self.evaluator.evaluate(&group, context).map_err(|source| {
                SelectionError::Evaluation {
                    group_id: group.targeting_group_id.clone(),
                    source,
                }
            })?;
            if !verdict.is_true() {
                continue;
            }
            let better = best
                .as_ref()
                .map_or(true, |b| group.click_through_rate > b.click_through_rate);
            if better {
                best = Some(group);
            }
        }

        Ok(best)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("Targeting evaluation failed for group {group_id}: {source}")]
    Evaluation {
        group_id: String,
        #[source]
        source: TargetingError,
    },

    #[error("Repository lookup failed: {0}")]
    Repository(Box<dyn std::error::Error + Send + Sync>),
}
