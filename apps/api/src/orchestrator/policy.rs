//! Auto-Continuation Policy — the self-correcting ATS optimization loop.
//!
//! Modeled as an explicit state machine with a bounded counter rather than
//! implicit recursive callbacks, so the termination guarantee is testable in
//! isolation from the network. The counter is the only state carried across
//! iterations and the sole loop guard.

use serde::Serialize;

use crate::llm_client::prompts;

/// Minimum ATS score that settles the loop. Product policy constant.
pub const ATS_ACCEPTANCE_THRESHOLD: f64 = 80.0;

/// Consecutive automatic regeneration attempts allowed per resume artifact.
/// Product policy constant.
pub const MAX_OPTIMIZATION_ATTEMPTS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyState {
    Idle,
    AwaitingAtsCheck,
    Optimizing,
    Settled,
}

/// A synthesized silent turn to feed back through the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowUp {
    pub prompt: String,
    /// Automatic follow-ups are latency-sensitive and use the fast variant.
    pub fast: bool,
}

/// What the policy decided after an ATS score came in.
#[derive(Debug, Clone, PartialEq)]
pub enum AtsDecision {
    /// Score below threshold with budget left: regenerate with the named
    /// missing keywords. The optimizing indicator goes on.
    Optimize { follow_up: FollowUp, attempt: u32 },
    /// Score cleared the threshold, or the budget is exhausted. The counter
    /// is back at zero and the optimizing indicator goes off.
    Settled,
}

#[derive(Debug)]
pub struct AtsPolicy {
    state: PolicyState,
    attempts: u32,
    threshold: f64,
    max_attempts: u32,
}

impl Default for AtsPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl AtsPolicy {
    pub fn new() -> Self {
        AtsPolicy {
            state: PolicyState::Idle,
            attempts: 0,
            threshold: ATS_ACCEPTANCE_THRESHOLD,
            max_attempts: MAX_OPTIMIZATION_ATTEMPTS,
        }
    }

    /// Overridable limits for tests. Not wired to configuration: the
    /// production constants are product policy, not tunables.
    pub fn with_limits(threshold: f64, max_attempts: u32) -> Self {
        AtsPolicy {
            state: PolicyState::Idle,
            attempts: 0,
            threshold,
            max_attempts,
        }
    }

    pub fn state(&self) -> PolicyState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// A fresh, user-initiated cycle begins: the retry budget renews.
    pub fn begin_user_cycle(&mut self) {
        self.state = PolicyState::Idle;
        self.attempts = 0;
    }

    /// A resume was just generated: silently request an ATS check against it.
    pub fn on_resume_generated(&mut self) -> FollowUp {
        self.state = PolicyState::AwaitingAtsCheck;
        FollowUp {
            prompt: prompts::ATS_CHECK_FOLLOW_UP.to_string(),
            fast: true,
        }
    }

    /// An ATS check completed. The counter is checked before incrementing,
    /// so it can never exceed `max_attempts`.
    pub fn on_ats_scored(&mut self, score: f64, missing_skills: &[String]) -> AtsDecision {
        if score < self.threshold && self.attempts < self.max_attempts {
            self.attempts += 1;
            self.state = PolicyState::Optimizing;
            return AtsDecision::Optimize {
                follow_up: FollowUp {
                    prompt: prompts::ats_optimization_follow_up(score, missing_skills),
                    fast: true,
                },
                attempt: self.attempts,
            };
        }

        // Either the score cleared the threshold or the budget is spent.
        // Reset so a future, independently-triggered generation gets its own
        // full budget.
        self.state = PolicyState::Settled;
        self.attempts = 0;
        AtsDecision::Settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing() -> Vec<String> {
        vec!["SQL".into(), "Docker".into()]
    }

    #[test]
    fn test_resume_generated_requests_fast_ats_check() {
        let mut policy = AtsPolicy::new();
        let follow_up = policy.on_resume_generated();
        assert_eq!(policy.state(), PolicyState::AwaitingAtsCheck);
        assert!(follow_up.fast);
        assert!(follow_up.prompt.contains("ATS check"));
    }

    #[test]
    fn test_low_score_increments_counter_and_names_keywords() {
        let mut policy = AtsPolicy::new();
        policy.on_resume_generated();
        match policy.on_ats_scored(65.0, &missing()) {
            AtsDecision::Optimize { follow_up, attempt } => {
                assert_eq!(attempt, 1);
                assert!(follow_up.prompt.contains("SQL, Docker"));
                assert!(follow_up.fast);
            }
            AtsDecision::Settled => panic!("expected an optimization attempt"),
        }
        assert_eq!(policy.attempts(), 1);
        assert_eq!(policy.state(), PolicyState::Optimizing);
    }

    #[test]
    fn test_counter_never_exceeds_budget_and_resets_at_cap() {
        let mut policy = AtsPolicy::new();
        policy.on_resume_generated();

        assert!(matches!(
            policy.on_ats_scored(60.0, &missing()),
            AtsDecision::Optimize { attempt: 1, .. }
        ));
        assert!(matches!(
            policy.on_ats_scored(62.0, &missing()),
            AtsDecision::Optimize { attempt: 2, .. }
        ));
        // Third consecutive low score: budget exhausted, no further silent
        // request, counter back to zero.
        assert_eq!(policy.on_ats_scored(63.0, &missing()), AtsDecision::Settled);
        assert_eq!(policy.attempts(), 0);
        assert_eq!(policy.state(), PolicyState::Settled);
    }

    #[test]
    fn test_passing_score_settles_immediately_at_any_counter() {
        let mut policy = AtsPolicy::new();
        policy.on_resume_generated();
        policy.on_ats_scored(60.0, &missing());
        assert_eq!(policy.attempts(), 1);

        assert_eq!(policy.on_ats_scored(92.0, &[]), AtsDecision::Settled);
        assert_eq!(policy.attempts(), 0);
    }

    #[test]
    fn test_fresh_user_cycle_renews_the_budget() {
        let mut policy = AtsPolicy::new();
        policy.on_resume_generated();
        policy.on_ats_scored(60.0, &missing());
        policy.on_ats_scored(61.0, &missing());
        policy.on_ats_scored(62.0, &missing()); // settled at cap

        policy.begin_user_cycle();
        policy.on_resume_generated();
        assert!(matches!(
            policy.on_ats_scored(60.0, &missing()),
            AtsDecision::Optimize { attempt: 1, .. }
        ));
    }

    #[test]
    fn test_exact_threshold_counts_as_passing() {
        let mut policy = AtsPolicy::new();
        policy.on_resume_generated();
        assert_eq!(
            policy.on_ats_scored(ATS_ACCEPTANCE_THRESHOLD, &[]),
            AtsDecision::Settled
        );
    }

    #[test]
    fn test_with_limits_overrides_for_tests() {
        let mut policy = AtsPolicy::with_limits(50.0, 1);
        policy.on_resume_generated();
        assert_eq!(policy.on_ats_scored(55.0, &[]), AtsDecision::Settled);
    }
}
