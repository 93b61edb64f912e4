pub mod evaluator;
pub mod models;
pub mod selector;

pub use evaluator::{PredicateEvaluator, TargetingEvaluator};
pub use models::{GeneratedAdvertisement, SelectionResult};
pub use selector::{AdvertisementSelector, SelectionError, SelectionStrategy};
