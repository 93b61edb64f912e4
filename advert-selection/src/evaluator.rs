use advert_core::{MatchVerdict, RequestContext, TargetingError, TargetingGroup};

/// Decides whether a targeting group applies to a request.
///
/// Only a `MatchVerdict::True` verdict makes a group eligible for ranking.
/// Errors are surfaced to the selector rather than read as a non-match.
pub trait PredicateEvaluator: Send + Sync {
    fn evaluate(
        &self,
        group: &TargetingGroup,
        context: &RequestContext,
    ) -> Result<MatchVerdict, TargetingError>;
}

/// Evaluates the group's own predicates; every one of them has to hold.
#[derive(Debug, Default, Clone, Copy)]
pub struct TargetingEvaluator;

impl TargetingEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl PredicateEvaluator for TargetingEvaluator {
    fn evaluate(
        &self,
        group: &TargetingGroup,
        context: &RequestContext,
    ) -> Result<MatchVerdict, TargetingError> {
        let mut verdicts = Vec::with_capacity(group.predicates.len());
        for predicate in &group.predicates {
            verdicts.push(predicate.evaluate(context)?);
        }
        Ok(MatchVerdict::all(verdicts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advert_core::targeting::{PredicateCondition, TargetingPredicate};

    fn group(predicates: Vec<TargetingPredicate>) -> TargetingGroup {
        TargetingGroup::new("g1", "c1", 0.5, predicates).unwrap()
    }

    #[test]
    fn test_group_without_predicates_matches_everyone() {
        let verdict = TargetingEvaluator::new()
            .evaluate(&group(vec![]), &RequestContext::new("", "US"))
            .unwrap();
        assert_eq!(verdict, MatchVerdict::True);
    }

    #[test]
    fn test_all_predicates_must_hold() {
        let g = group(vec![
            TargetingPredicate::new(PredicateCondition::Recognized),
            TargetingPredicate::new(PredicateCondition::Marketplace {
                marketplace_ids: ["US".to_string()].into_iter().collect(),
            }),
        ]);
        let evaluator = TargetingEvaluator::new();

        assert!(evaluator.evaluate(&g, &RequestContext::new("c", "US")).unwrap().is_true());
        assert_eq!(
            evaluator.evaluate(&g, &RequestContext::new("", "US")).unwrap(),
            MatchVerdict::False
        );
    }

    #[test]
    fn test_indeterminate_is_not_a_match() {
        let g = group(vec![TargetingPredicate::new(PredicateCondition::TrafficSplit {
            buckets: 10,
            accepted: 10,
        })]);
        let verdict = TargetingEvaluator::new()
            .evaluate(&g, &RequestContext::new("", "US"))
            .unwrap();
        assert_eq!(verdict, MatchVerdict::Indeterminate);
        assert!(!verdict.is_true());
    }

    #[test]
    fn test_invalid_predicate_propagates() {
        let g = group(vec![TargetingPredicate::new(PredicateCondition::TrafficSplit {
            buckets: 0,
            accepted: 0,
        })]);
        let result = TargetingEvaluator::new().evaluate(&g, &RequestContext::new("c", "US"));
        assert!(matches!(result, Err(TargetingError::InvalidPredicate(_))));
    }
}
