use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::context::RequestContext;
use crate::{CoreError, CoreResult};

/// Outcome of evaluating a predicate against a request context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchVerdict {
    True,
    False,
    /// Not enough information about the customer to decide.
    Indeterminate,
}

impl MatchVerdict {
    pub fn is_true(self) -> bool {
        self == MatchVerdict::True
    }

    pub fn negate(self) -> Self {
        match self {
            MatchVerdict::True => MatchVerdict::False,
            MatchVerdict::False => MatchVerdict::True,
            MatchVerdict::Indeterminate => MatchVerdict::Indeterminate,
        }
    }

    /// Conjunction: any `False` wins, then any `Indeterminate`.
    pub fn all<I: IntoIterator<Item = MatchVerdict>>(verdicts: I) -> Self {
        let mut result = MatchVerdict::True;
        for verdict in verdicts {
            match verdict {
                MatchVerdict::False => return MatchVerdict::False,
                MatchVerdict::Indeterminate => result = MatchVerdict::Indeterminate,
                MatchVerdict::True => {}
            }
        }
        result
    }

    /// Disjunction: any `True` wins, then any `Indeterminate`.
    pub fn any<I: IntoIterator<Item = MatchVerdict>>(verdicts: I) -> Self {
        let mut result = MatchVerdict::False;
        for verdict in verdicts {
            match verdict {
                MatchVerdict::True => return MatchVerdict::True,
                MatchVerdict::Indeterminate => result = MatchVerdict::Indeterminate,
                MatchVerdict::False => {}
            }
        }
        result
    }
}

impl From<bool> for MatchVerdict {
    fn from(value: bool) -> Self {
        if value {
            MatchVerdict::True
        } else {
            MatchVerdict::False
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TargetingError {
    #[error("Invalid predicate configuration: {0}")]
    InvalidPredicate(String),

    /// Returned by custom `PredicateEvaluator` implementations whose backing
    /// lookup (e.g. a customer profile service) cannot answer.
    #[error("Predicate evaluation failed: {0}")]
    EvaluationFailed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredicateCondition {
    Recognized,
    Marketplace { marketplace_ids: HashSet<String> },
    CustomerIn { customer_ids: HashSet<String> },
    /// Admits `accepted` out of `buckets` customers, keyed on a stable hash of the customer id.
    TrafficSplit { buckets: u32, accepted: u32 },
    Any { predicates: Vec<TargetingPredicate> },
    All { predicates: Vec<TargetingPredicate> },
}

/// A single eligibility condition; `inverse` flips a definite verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetingPredicate {
    pub condition: PredicateCondition,
    #[serde(default)]
    pub inverse: bool,
}

impl TargetingPredicate {
    pub fn new(condition: PredicateCondition) -> Self {
        Self { condition, inverse: false }
    }

    pub fn inverted(condition: PredicateCondition) -> Self {
        Self { condition, inverse: true }
    }

    pub fn evaluate(&self, context: &RequestContext) -> Result<MatchVerdict, TargetingError> {
        let verdict = match &self.condition {
            PredicateCondition::Recognized => context.is_recognized().into(),
            PredicateCondition::Marketplace { marketplace_ids } => {
                marketplace_ids.contains(&context.marketplace_id).into()
            }
            PredicateCondition::CustomerIn { customer_ids } => {
                customer_ids.contains(&context.customer_id).into()
            }
            PredicateCondition::TrafficSplit { buckets, accepted } => {
                if *buckets == 0 || accepted > buckets {
                    return Err(TargetingError::InvalidPredicate(format!(
                        "traffic split accepts {} of {} buckets",
                        accepted, buckets
                    )));
                }
                if !context.is_recognized() {
                    MatchVerdict::Indeterminate
                } else {
                    let bucket = fnv1a(context.customer_id.as_bytes()) % u64::from(*buckets);
                    (bucket < u64::from(*accepted)).into()
                }
            }
            PredicateCondition::Any { predicates } => MatchVerdict::any(
                predicates
                    .iter()
                    .map(|p| p.evaluate(context))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            PredicateCondition::All { predicates } => MatchVerdict::all(
                predicates
                    .iter()
                    .map(|p| p.evaluate(context))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        };

        Ok(if self.inverse { verdict.negate() } else { verdict })
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes.iter().fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME))
}

/// A scored set of predicates attached to one advertisement content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetingGroup {
    pub targeting_group_id: String,
    pub content_id: String,
    pub click_through_rate: f64,
    #[serde(default)]
    pub predicates: Vec<TargetingPredicate>,
}

impl TargetingGroup {
    pub fn new(
        targeting_group_id: impl Into<String>,
        content_id: impl Into<String>,
        click_through_rate: f64,
        predicates: Vec<TargetingPredicate>,
    ) -> CoreResult<Self> {
        let group = Self {
            targeting_group_id: targeting_group_id.into(),
            content_id: content_id.into(),
            click_through_rate,
            predicates,
        };
        group.validate()?;
        Ok(group)
    }

    /// Rejects groups whose click-through rate cannot be ranked.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.click_through_rate.is_finite() {
            return Err(CoreError::Validation(format!(
                "targeting group {} has non-finite click-through rate",
                self.targeting_group_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marketplace(ids: &[&str]) -> PredicateCondition {
        PredicateCondition::Marketplace {
            marketplace_ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_marketplace_predicate() {
        let predicate = TargetingPredicate::new(marketplace(&["US", "CA"]));
        let verdict = predicate.evaluate(&RequestContext::new("c1", "US")).unwrap();
        assert_eq!(verdict, MatchVerdict::True);

        let verdict = predicate.evaluate(&RequestContext::new("c1", "EU")).unwrap();
        assert_eq!(verdict, MatchVerdict::False);
    }

    #[test]
    fn test_inverse_flips_definite_verdicts_only() {
        let predicate = TargetingPredicate::inverted(PredicateCondition::Recognized);
        assert_eq!(
            predicate.evaluate(&RequestContext::new("", "US")).unwrap(),
            MatchVerdict::True
        );

        let split = TargetingPredicate::inverted(PredicateCondition::TrafficSplit {
            buckets: 10,
            accepted: 5,
        });
        assert_eq!(
            split.evaluate(&RequestContext::new("", "US")).unwrap(),
            MatchVerdict::Indeterminate
        );
    }

    #[test]
    fn test_traffic_split_is_stable() {
        let predicate = TargetingPredicate::new(PredicateCondition::TrafficSplit {
            buckets: 100,
            accepted: 50,
        });
        let context = RequestContext::new("customer-42", "US");
        let first = predicate.evaluate(&context).unwrap();
        for _ in 0..10 {
            assert_eq!(predicate.evaluate(&context).unwrap(), first);
        }

        let everyone = TargetingPredicate::new(PredicateCondition::TrafficSplit {
            buckets: 4,
            accepted: 4,
        });
        assert!(everyone.evaluate(&context).unwrap().is_true());
    }

    #[test]
    fn test_traffic_split_rejects_bad_configuration() {
        let context = RequestContext::new("c1", "US");
        let zero =
            TargetingPredicate::new(PredicateCondition::TrafficSplit { buckets: 0, accepted: 0 });
        assert!(matches!(zero.evaluate(&context), Err(TargetingError::InvalidPredicate(_))));

        let over =
            TargetingPredicate::new(PredicateCondition::TrafficSplit { buckets: 2, accepted: 3 });
        assert!(over.evaluate(&context).is_err());
    }

    #[test]
    fn test_composites() {
        let context = RequestContext::new("c1", "US");
        let any = TargetingPredicate::new(PredicateCondition::Any {
            predicates: vec![
                TargetingPredicate::new(marketplace(&["EU"])),
                TargetingPredicate::new(marketplace(&["US"])),
            ],
        });
        assert!(any.evaluate(&context).unwrap().is_true());

        let all = TargetingPredicate::new(PredicateCondition::All {
            predicates: vec![
                TargetingPredicate::new(PredicateCondition::Recognized),
                TargetingPredicate::new(marketplace(&["EU"])),
            ],
        });
        assert_eq!(all.evaluate(&context).unwrap(), MatchVerdict::False);

        let empty_any = TargetingPredicate::new(PredicateCondition::Any { predicates: vec![] });
        assert_eq!(empty_any.evaluate(&context).unwrap(), MatchVerdict::False);
    }

    #[test]
    fn test_verdict_combinators() {
        use MatchVerdict::*;
        assert_eq!(MatchVerdict::all([True, Indeterminate]), Indeterminate);
        assert_eq!(MatchVerdict::all([Indeterminate, False]), False);
        assert_eq!(MatchVerdict::any([False, Indeterminate]), Indeterminate);
        assert_eq!(MatchVerdict::any([Indeterminate, True]), True);
        assert_eq!(MatchVerdict::all(Vec::new()), True);
    }

    #[test]
    fn test_group_rejects_non_finite_ctr() {
        assert!(TargetingGroup::new("g1", "c1", f64::NAN, vec![]).is_err());
        assert!(TargetingGroup::new("g1", "c1", f64::INFINITY, vec![]).is_err());
        assert!(TargetingGroup::new("g1", "c1", 0.42, vec![]).is_ok());
    }

    #[test]
    fn test_predicate_json_shape() {
        let json = serde_json::json!({
            "condition": { "type": "CUSTOMER_IN", "customer_ids": ["alice"] },
            "inverse": true
        });
        let predicate: TargetingPredicate = serde_json::from_value(json).unwrap();
        assert!(predicate.inverse);
        assert_eq!(
            predicate.evaluate(&RequestContext::new("alice", "US")).unwrap(),
            MatchVerdict::False
        );

        let json = serde_json::json!({ "condition": { "type": "RECOGNIZED" } });
        let predicate: TargetingPredicate = serde_json::from_value(json).unwrap();
        assert!(!predicate.inverse);
    }
}
