use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use advert_selection::{SelectionResult, SelectionStrategy};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AdvertisementQuery {
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub marketplace_id: String,
}

/// Rendered advertisement; every field is empty when nothing was selected.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AdvertisementResponse {
    pub id: String,
    pub content_id: String,
    pub content: String,
}

impl From<SelectionResult> for AdvertisementResponse {
    fn from(result: SelectionResult) -> Self {
        match result {
            SelectionResult::Selected(ad) => Self {
                id: ad.id.to_string(),
                content_id: ad.content.content_id,
                content: ad.content.rendered_content,
            },
            SelectionResult::Empty => Self {
                id: String::new(),
                content_id: String::new(),
                content: String::new(),
            },
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/advertisements", get(generate_advertisement))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/advertisements?customer_id=..&marketplace_id=..
pub async fn generate_advertisement(
    State(state): State<AppState>,
    Query(query): Query<AdvertisementQuery>,
) -> Result<Json<AdvertisementResponse>, AppError> {
    let result = match state.strategy {
        SelectionStrategy::ClickThroughRate => {
            state
                .selector
                .select(&query.customer_id, &query.marketplace_id)
                .await?
        }
        SelectionStrategy::Random => {
            let mut rng = StdRng::from_entropy();
            state
                .selector
                .select_random(&query.customer_id, &query.marketplace_id, &mut rng)
                .await?
        }
    };

    if result.is_empty() {
        tracing::debug!(
            "No advertisement for customer {} on marketplace {:?}",
            query.customer_id,
            query.marketplace_id
        );
    }

    Ok(Json(result.into()))
}
