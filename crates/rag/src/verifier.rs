//! Answer grounding verification

use docqa_core::{ScoredHit, VerificationResult};

/// Checks that a produced answer is plausibly grounded in the retrieved
/// evidence.
pub trait AnswerVerifier: Send + Sync {
    fn verify(&self, question: &str, answer: &str, contexts: &[ScoredHit]) -> VerificationResult;
}

/// Structural grounding check.
///
/// Flags an empty answer, an empty context set, and all-zero context
/// scores — each independently. Necessary but not sufficient: the answer
/// text is never compared semantically against the contexts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextGroundingVerifier;

impl ContextGroundingVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl AnswerVerifier for ContextGroundingVerifier {
    fn verify(&self, _question: &str, answer: &str, contexts: &[ScoredHit]) -> VerificationResult {
        let mut issues = Vec::new();

        if answer.trim().is_empty() {
            issues.push("Empty answer returned.".to_string());
        }

        if contexts.is_empty() {
            issues.push("No retrieved contexts.".to_string());
        }

        if !contexts.iter().any(|ctx| ctx.score > 0.0) {
            issues.push("All retrieved chunk scores are zero.".to_string());
        }

        VerificationResult::from_issues(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contexts() -> Vec<ScoredHit> {
        vec![ScoredHit::new("c1", "some evidence", 0.8)]
    }

    #[test]
    fn test_valid_answer() {
        let result = ContextGroundingVerifier.verify("q", "an answer", &contexts());
        assert!(result.is_valid);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_empty_answer_is_the_only_issue() {
        let result = ContextGroundingVerifier.verify("q", "", &contexts());
        assert!(!result.is_valid);
        assert_eq!(result.issues, vec!["Empty answer returned.".to_string()]);
    }

    #[test]
    fn test_whitespace_answer_flagged() {
        let result = ContextGroundingVerifier.verify("q", "  \n ", &contexts());
        assert!(!result.is_valid);
    }

    #[test]
    fn test_no_contexts_flags_two_issues() {
        let result = ContextGroundingVerifier.verify("q", "answer", &[]);
        assert_eq!(
            result.issues,
            vec![
                "No retrieved contexts.".to_string(),
                "All retrieved chunk scores are zero.".to_string(),
            ]
        );
    }

    #[test]
    fn test_zero_scores_flagged() {
        let zero = vec![ScoredHit::new("c1", "text", 0.0)];
        let result = ContextGroundingVerifier.verify("q", "answer", &zero);
        assert_eq!(
            result.issues,
            vec!["All retrieved chunk scores are zero.".to_string()]
        );
    }

    #[test]
    fn test_issue_order_is_stable() {
        let result = ContextGroundingVerifier.verify("q", " ", &[]);
        assert_eq!(
            result.issues,
            vec![
                "Empty answer returned.".to_string(),
                "No retrieved contexts.".to_string(),
                "All retrieved chunk scores are zero.".to_string(),
            ]
        );
    }
}
