//! Tool Dispatcher — routes a model tool invocation to exactly one local
//! effect: an atomic state-slice write, at most one view switch, at most one
//! chat message, and at most one auto-continuation follow-up.
//!
//! Total over all tool names. Unknown names and undecodable payloads are
//! logged no-ops, never faults: the payload is an untrusted external shape.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::artifacts::{
    AtsResult, InterviewPrepData, JobData, ResumeData, RoadmapData, SlideDeck,
};
use crate::models::view::AppView;
use crate::orchestrator::conversation::{Role, TurnKind};
use crate::orchestrator::policy::{AtsDecision, FollowUp};
use crate::orchestrator::session::ChatSession;
use crate::tools::{missing_required_fields, registry, ToolInvocation, ToolName};

/// Applies one invocation to the session. Returns the follow-up to queue
/// when the effect triggers the auto-continuation policy.
pub fn apply(session: &mut ChatSession, invocation: &ToolInvocation) -> Option<FollowUp> {
    let Some(name) = ToolName::parse(&invocation.name) else {
        // Unreachable when schema and dispatcher are in lockstep; treat an
        // occurrence as a logged anomaly, not a fatal error.
        warn!("Ignoring unrecognized tool invocation '{}'", invocation.name);
        return None;
    };

    log_missing_required(name, &invocation.args);

    match name {
        ToolName::NavigateApp => {
            let args: NavigateArgs = decode(name, &invocation.args)?;
            session.active_view = args.target_view;
            None
        }
        ToolName::AnalyzeJob => {
            let job: JobData = decode(name, &invocation.args)?;
            let notice = format!("Analyzing opportunity at {}...", job.company);
            session.log.append_with_payload(
                Role::Assistant,
                TurnKind::Result,
                notice,
                true,
                Some(invocation.args.clone()),
            );
            session.job = Some(job);
            session.active_view = AppView::Dashboard;
            None
        }
        ToolName::GenerateResume => {
            let resume: ResumeData = decode(name, &invocation.args)?;
            session.resume = Some(resume);
            session.active_view = AppView::Resume;
            session.log.append(
                Role::Assistant,
                TurnKind::Text,
                "Resume generated. Running automatic ATS screening...",
                true,
            );
            Some(session.policy.on_resume_generated())
        }
        ToolName::GenerateRoadmap => {
            let roadmap: RoadmapData = decode(name, &invocation.args)?;
            session.roadmap = Some(roadmap);
            session.active_view = AppView::Roadmap;
            None
        }
        ToolName::CheckAts => {
            let ats: AtsResult = decode(name, &invocation.args)?;
            let decision = session.policy.on_ats_scored(ats.score, &ats.missing_skills);
            let score = format_score(ats.score);
            session.ats = Some(ats);
            session.active_view = AppView::Ats;
            match decision {
                AtsDecision::Optimize { follow_up, attempt } => {
                    debug!("ATS below threshold, optimization attempt {attempt}");
                    session.optimizing = true;
                    session.log.append(
                        Role::Assistant,
                        TurnKind::Text,
                        format!("ATS score is {score}%. Auto-optimizing keywords..."),
                        true,
                    );
                    Some(follow_up)
                }
                AtsDecision::Settled => {
                    session.optimizing = false;
                    None
                }
            }
        }
        ToolName::PrepareInterview => {
            let interview: InterviewPrepData = decode(name, &invocation.args)?;
            session.interview = Some(interview);
            session.active_view = AppView::Interview;
            None
        }
        ToolName::GenerateProjectsPpt => {
            let deck: SlideDeck = decode(name, &invocation.args)?;
            session.deck = Some(deck);
            session.active_view = AppView::Projects;
            None
        }
        ToolName::SyncProfileData => {
            // Declared capability; the profile-editing layer consumes it.
            debug!("syncProfileData invocation acknowledged, no session effect");
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct NavigateArgs {
    #[serde(rename = "targetView")]
    target_view: AppView,
}

/// Single malformed-payload path: a payload that cannot be decoded at all is
/// logged and skipped. Individually missing fields degrade to defaults via
/// serde instead.
fn decode<T: DeserializeOwned>(name: ToolName, args: &Value) -> Option<T> {
    match serde_json::from_value(args.clone()) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!("Malformed {} payload, skipping dispatch: {e}", name.as_str());
            None
        }
    }
}

fn log_missing_required(name: ToolName, args: &Value) {
    if let Some(declaration) = registry().into_iter().find(|d| d.name == name) {
        let missing = missing_required_fields(&declaration, args);
        if !missing.is_empty() {
            warn!(
                "{} invocation missing required fields {:?}, continuing with defaults",
                name.as_str(),
                missing
            );
        }
    }
}

fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        format!("{score}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invocation(name: &str, args: Value) -> ToolInvocation {
        ToolInvocation {
            name: name.to_string(),
            args,
        }
    }

    #[test]
    fn test_navigate_switches_view_and_is_idempotent() {
        let mut session = ChatSession::new();
        let nav = invocation("navigateApp", json!({"targetView": "roadmap"}));

        assert!(apply(&mut session, &nav).is_none());
        assert_eq!(session.active_view, AppView::Roadmap);

        apply(&mut session, &nav);
        assert_eq!(session.active_view, AppView::Roadmap);
        assert_eq!(session.log.len(), 0);
    }

    #[test]
    fn test_analyze_job_sets_slice_view_and_result_message() {
        let mut session = ChatSession::new();
        apply(
            &mut session,
            &invocation(
                "analyzeJob",
                json!({"title": "Backend Engineer", "company": "Initech"}),
            ),
        );

        assert_eq!(session.job.as_ref().unwrap().company, "Initech");
        assert_eq!(session.active_view, AppView::Dashboard);
        let turns = session.log.turns();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].kind, TurnKind::Result);
        assert!(turns[0].text.contains("Initech"));
    }

    #[test]
    fn test_generate_resume_triggers_exactly_one_ats_follow_up() {
        let mut session = ChatSession::new();
        let follow_up = apply(
            &mut session,
            &invocation(
                "generateResume",
                json!({"personalInfo": {"name": "Ada"}, "summary": "s", "skills": []}),
            ),
        );

        assert_eq!(session.active_view, AppView::Resume);
        assert!(session.resume.is_some());
        let follow_up = follow_up.expect("resume generation must request an ATS check");
        assert!(follow_up.prompt.contains("ATS check"));
        assert!(follow_up.fast);
    }

    #[test]
    fn test_low_ats_score_starts_optimization() {
        let mut session = ChatSession::new();
        let follow_up = apply(
            &mut session,
            &invocation(
                "checkATS",
                json!({"score": 65, "missingSkills": ["SQL", "Docker"]}),
            ),
        );

        assert_eq!(session.active_view, AppView::Ats);
        assert!(session.optimizing);
        assert_eq!(session.policy.attempts(), 1);
        let follow_up = follow_up.unwrap();
        assert!(follow_up.prompt.contains("SQL, Docker"));
        let last = session.log.turns().last().unwrap();
        assert!(last.text.contains("ATS score is 65%"));
    }

    #[test]
    fn test_third_low_score_settles_and_clears_indicator() {
        let mut session = ChatSession::new();
        let low = invocation("checkATS", json!({"score": 60, "missingSkills": ["Go"]}));

        assert!(apply(&mut session, &low).is_some());
        assert!(apply(&mut session, &low).is_some());
        let third = apply(&mut session, &low);

        assert!(third.is_none());
        assert!(!session.optimizing);
        assert_eq!(session.policy.attempts(), 0);
    }

    #[test]
    fn test_passing_score_settles_without_follow_up() {
        let mut session = ChatSession::new();
        session.optimizing = true;
        let follow_up = apply(
            &mut session,
            &invocation("checkATS", json!({"score": 92})),
        );

        assert!(follow_up.is_none());
        assert!(!session.optimizing);
        assert_eq!(session.policy.attempts(), 0);
        assert_eq!(session.ats.as_ref().unwrap().score, 92.0);
    }

    #[test]
    fn test_unrecognized_tool_is_a_no_op() {
        let mut session = ChatSession::new();
        let follow_up = apply(&mut session, &invocation("launchRocket", json!({})));
        assert!(follow_up.is_none());
        assert_eq!(session.active_view, AppView::Dashboard);
        assert!(session.log.is_empty());
    }

    #[test]
    fn test_malformed_navigate_payload_is_skipped_not_fatal() {
        let mut session = ChatSession::new();
        session.active_view = AppView::Resume;
        apply(
            &mut session,
            &invocation("navigateApp", json!({"targetView": "the-moon"})),
        );
        assert_eq!(session.active_view, AppView::Resume);
    }

    #[test]
    fn test_missing_optional_fields_degrade_to_defaults() {
        let mut session = ChatSession::new();
        apply(
            &mut session,
            &invocation("generateRoadmap", json!({"steps": [{"title": "Learn Rust"}]})),
        );
        let roadmap = session.roadmap.as_ref().unwrap();
        assert_eq!(roadmap.steps.len(), 1);
        assert!(roadmap.recommended_resources.is_empty());
    }

    #[test]
    fn test_sequence_applies_in_order_with_one_write_each() {
        let mut session = ChatSession::new();
        let calls = [
            invocation("analyzeJob", json!({"company": "Acme", "title": "SRE"})),
            invocation("prepareInterview", json!({"questions": [], "technicalTopics": []})),
            invocation("navigateApp", json!({"targetView": "dashboard"})),
        ];
        for call in &calls {
            apply(&mut session, call);
        }
        assert!(session.job.is_some());
        assert!(session.interview.is_some());
        assert!(session.resume.is_none());
        assert!(session.roadmap.is_none());
        // Last invocation wins the view.
        assert_eq!(session.active_view, AppView::Dashboard);
    }

    #[test]
    fn test_sync_profile_data_has_no_session_effect() {
        let mut session = ChatSession::new();
        let follow_up = apply(
            &mut session,
            &invocation(
                "syncProfileData",
                json!({"platform": "github", "url": "https://github.com/ada", "name": "Ada", "skills": []}),
            ),
        );
        assert!(follow_up.is_none());
        assert!(session.log.is_empty());
        assert_eq!(session.active_view, AppView::Dashboard);
    }
}
