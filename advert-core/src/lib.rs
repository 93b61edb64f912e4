pub mod content;
pub mod context;
pub mod repository;
pub mod targeting;

pub use content::AdvertisementContent;
pub use context::RequestContext;
pub use repository::{ContentRepository, TargetingGroupRepository};
pub use targeting::{
    MatchVerdict, PredicateCondition, TargetingError, TargetingGroup, TargetingPredicate,
};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
