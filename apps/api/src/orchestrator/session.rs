//! Session state and the orchestration run loop.
//!
//! One logical writer: the session lives behind a `tokio::sync::Mutex` in
//! `AppState`, and the `processing` flag covers an entire chain (the
//! user-initiated round-trip plus every chained auto-continuation), so two
//! dispatch batches never interleave against the same slice.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{Attachment, TurnRequest, TurnTransport};
use crate::models::artifacts::{
    AtsResult, InterviewPrepData, JobData, ResumeData, RoadmapData, SlideDeck,
};
use crate::models::view::AppView;
use crate::orchestrator::conversation::{ConversationLog, ConversationTurn, Role, TurnKind};
use crate::orchestrator::dispatcher;
use crate::orchestrator::policy::AtsPolicy;

/// The uniform user-visible text for a failed model round-trip.
pub const SERVICE_ERROR_TEXT: &str = "Service error. Please try again.";

/// Per-session application state. Slices are written only by the dispatcher;
/// the view layer reads them through `snapshot()`.
#[derive(Debug)]
pub struct ChatSession {
    pub log: ConversationLog,
    pub active_view: AppView,
    pub job: Option<JobData>,
    pub resume: Option<ResumeData>,
    pub roadmap: Option<RoadmapData>,
    pub ats: Option<AtsResult>,
    pub interview: Option<InterviewPrepData>,
    pub deck: Option<SlideDeck>,
    pub optimizing: bool,
    pub processing: bool,
    pub policy: AtsPolicy,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        ChatSession {
            log: ConversationLog::new(),
            active_view: AppView::Dashboard,
            job: None,
            resume: None,
            roadmap: None,
            ats: None,
            interview: None,
            deck: None,
            optimizing: false,
            processing: false,
            policy: AtsPolicy::new(),
        }
    }

    /// Read-only view of the session for the HTTP layer.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            messages: self.log.visible().cloned().collect(),
            active_view: self.active_view,
            job: self.job.clone(),
            resume: self.resume.clone(),
            roadmap: self.roadmap.clone(),
            ats: self.ats.clone(),
            interview: self.interview.clone(),
            deck: self.deck.clone(),
            optimizing: self.optimizing,
            processing: self.processing,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub messages: Vec<ConversationTurn>,
    pub active_view: AppView,
    pub job: Option<JobData>,
    pub resume: Option<ResumeData>,
    pub roadmap: Option<RoadmapData>,
    pub ats: Option<AtsResult>,
    pub interview: Option<InterviewPrepData>,
    pub deck: Option<SlideDeck>,
    pub optimizing: bool,
    pub processing: bool,
}

/// A turn waiting to go through the transport. Auto-continuations are
/// invisible and fast.
#[derive(Debug)]
struct PendingTurn {
    text: String,
    attachment: Option<Attachment>,
    visible: bool,
    fast: bool,
}

/// Owns the send loop. Stateless apart from the transport handle: all
/// mutable state lives in the `ChatSession` passed in.
#[derive(Clone)]
pub struct Orchestrator {
    transport: Arc<dyn TurnTransport>,
}

impl Orchestrator {
    pub fn new(transport: Arc<dyn TurnTransport>) -> Self {
        Orchestrator { transport }
    }

    /// A user-typed message or upload. Starts a fresh policy cycle.
    pub async fn send_user_message(
        &self,
        session: &mut ChatSession,
        text: String,
        attachment: Option<Attachment>,
    ) -> Result<(), AppError> {
        self.send(session, text, attachment, false).await
    }

    /// A user-initiated request whose prompt should not clutter the chat
    /// view (e.g. the resume architect prompt for a reference upload).
    pub async fn send_silent_message(
        &self,
        session: &mut ChatSession,
        text: String,
        attachment: Option<Attachment>,
    ) -> Result<(), AppError> {
        self.send(session, text, attachment, true).await
    }

    async fn send(
        &self,
        session: &mut ChatSession,
        text: String,
        attachment: Option<Attachment>,
        silent: bool,
    ) -> Result<(), AppError> {
        if text.is_empty() && attachment.is_none() {
            return Err(AppError::Validation(
                "message text or attachment required".to_string(),
            ));
        }
        if session.processing {
            return Err(AppError::Busy);
        }

        session.processing = true;
        // A fresh, non-automatic cycle renews the optimization budget.
        session.policy.begin_user_cycle();

        self.run_chain(
            session,
            PendingTurn {
                text,
                attachment,
                visible: !silent,
                fast: false,
            },
        )
        .await;

        session.processing = false;
        Ok(())
    }

    /// Drains the turn queue. Continuations spawned by a reply are pushed to
    /// the front so each one is fully processed — nested tool calls included —
    /// before any later continuation from the same batch runs.
    async fn run_chain(&self, session: &mut ChatSession, first: PendingTurn) {
        let mut queue: VecDeque<PendingTurn> = VecDeque::new();
        queue.push_back(first);

        while let Some(turn) = queue.pop_front() {
            let history = session.log.history();
            session
                .log
                .append(Role::User, TurnKind::Text, &turn.text, turn.visible);

            let request = TurnRequest {
                text: turn.text,
                history,
                attachment: turn.attachment,
                fast: turn.fast,
            };

            match self.transport.send(request).await {
                Ok(reply) => {
                    if let Some(text) = reply.text {
                        session.log.append(Role::Assistant, TurnKind::Text, text, true);
                    }
                    let mut continuations = Vec::new();
                    for call in &reply.tool_calls {
                        if let Some(follow_up) = dispatcher::apply(session, call) {
                            continuations.push(follow_up);
                        }
                    }
                    for follow_up in continuations.into_iter().rev() {
                        queue.push_front(PendingTurn {
                            text: follow_up.prompt,
                            attachment: None,
                            visible: false,
                            fast: follow_up.fast,
                        });
                    }
                }
                Err(e) => {
                    warn!("Model round-trip failed: {e}");
                    session
                        .log
                        .append(Role::Assistant, TurnKind::Text, SERVICE_ERROR_TEXT, true);
                    // Abandon the rest of the chain; control returns to the
                    // user with exactly one error message.
                    queue.clear();
                }
            }
        }

        info!(
            "Chain settled: {} turns in log, view {:?}",
            session.log.len(),
            session.active_view
        );
    }
}
