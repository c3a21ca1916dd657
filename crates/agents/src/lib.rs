use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use globalbot_catalog::{CatalogSource, CatalogStore};
use globalbot_core::catalog::find_by_id;
use globalbot_core::{
    quick_prompts, resolve_detailed, ConversationMessage, NormalizedDestination, QueryCues,
    Resolution, ResponseBranch, GREETING,
};
use globalbot_observability::{AnswerKind, AppMetrics};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

pub const MAX_TRANSCRIPT_MESSAGES: usize = 80;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatInput {
    pub session_id: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub session_id: String,
    pub reply_text: String,
    pub lines: Vec<String>,
    pub branch: ResponseBranch,
    pub days: u64,
    pub destination: Option<String>,
    pub cues: QueryCues,
    pub transcript_len: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<ConversationMessage>,
}

impl ChatSession {
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            created_at: now,
            updated_at: now,
            messages: vec![ConversationMessage::bot(GREETING)],
        }
    }

    /// Appends in arrival order; once full, the oldest messages are dropped.
    pub fn push(&mut self, message: ConversationMessage) {
        self.messages.push(message);
        if self.messages.len() > MAX_TRANSCRIPT_MESSAGES {
            let overflow = self.messages.len() - MAX_TRANSCRIPT_MESSAGES;
            self.messages.drain(..overflow);
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Clone)]
pub struct TravelAssistant {
    catalog: Arc<CatalogStore>,
    metrics: Arc<AppMetrics>,
    sessions: Arc<RwLock<HashMap<String, ChatSession>>>,
}

impl TravelAssistant {
    pub fn new(catalog: Arc<CatalogStore>, metrics: Arc<AppMetrics>) -> Self {
        metrics.add_skipped_records(catalog.snapshot().skipped.len());

        Self {
            catalog,
            metrics,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    /// One stateless answer against the current catalog snapshot.
    pub fn answer(&self, text: &str) -> Resolution {
        let started = Instant::now();
        self.metrics.inc_request();

        let snapshot = self.catalog.snapshot();
        let resolution = resolve_detailed(text, &snapshot.destinations);

        self.metrics.record_answer(answer_kind(resolution.branch));
        self.metrics.observe_latency(started.elapsed());
        resolution
    }

    /// Blank input produces no turn, same as the chat panel ignoring an
    /// empty send.
    #[instrument(skip(self, input), fields(session_id = input.session_id.as_deref()))]
    pub fn handle_chat(&self, input: ChatInput) -> Option<ChatReply> {
        let text = input.text.trim();
        if text.is_empty() {
            return None;
        }

        let resolution = self.answer(text);
        let session_id = input
            .session_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let transcript_len = {
            let mut sessions = self.sessions.write();
            let session = sessions
                .entry(session_id.clone())
                .or_insert_with(|| ChatSession::new(session_id.clone()));
            session.push(ConversationMessage::user(text));
            session.push(ConversationMessage::bot(resolution.text.clone()));
            session.messages.len()
        };

        info!(
            session_id = %session_id,
            branch = resolution.branch.as_str(),
            days = resolution.days,
            destination = resolution.destination.as_deref().unwrap_or("-"),
            "chat handled"
        );

        Some(ChatReply {
            session_id,
            lines: resolution.text.split('\n').map(ToString::to_string).collect(),
            reply_text: resolution.text,
            branch: resolution.branch,
            days: resolution.days,
            destination: resolution.destination,
            cues: resolution.cues,
            transcript_len,
        })
    }

    pub fn transcript(&self, session_id: &str) -> Option<ChatSession> {
        self.sessions.read().get(session_id).cloned()
    }

    pub fn quick_prompts(&self) -> Vec<String> {
        quick_prompts(&self.catalog.snapshot().destinations)
    }

    pub fn destinations(&self, region: Option<&str>) -> Vec<NormalizedDestination> {
        self.catalog.snapshot().filtered(region)
    }

    pub fn destination(&self, id: u32) -> Option<NormalizedDestination> {
        find_by_id(&self.catalog.snapshot().destinations, id).cloned()
    }

    pub fn regions(&self) -> Vec<String> {
        self.catalog.snapshot().regions()
    }

    pub fn reload_catalog(&self, source: &dyn CatalogSource) -> Result<usize> {
        let snapshot = self.catalog.reload(source)?;
        self.metrics.add_skipped_records(snapshot.skipped.len());
        Ok(snapshot.destinations.len())
    }

    /// Drops sessions idle for longer than `max_idle`; returns how many went.
    pub fn purge_idle(&self, max_idle: Duration) -> usize {
        let Some(cutoff) = Utc::now().checked_sub_signed(max_idle) else {
            return 0;
        };
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| session.updated_at > cutoff);
        before - sessions.len()
    }
}

fn answer_kind(branch: ResponseBranch) -> AnswerKind {
    match branch {
        ResponseBranch::Destination => AnswerKind::Destination,
        ResponseBranch::BudgetGuide => AnswerKind::BudgetGuide,
        ResponseBranch::SeasonGuide => AnswerKind::SeasonGuide,
        ResponseBranch::ItinerarySkeleton => AnswerKind::ItinerarySkeleton,
        ResponseBranch::Fallback => AnswerKind::Fallback,
    }
}
