//! The conversation session state machine.
//!
//! A session walks `MoodSelection → Chat → Summarizing → MoodSelection`. It
//! owns the transient working data (mood, transcript, pending summary) and
//! nothing else: persistent state lives in the `DiaryStore` handed to the
//! methods that need it, and text comes from a `Generator`.
//!
//! Failed operations leave the session in the state it was in. A failed chat
//! turn also drops the user message it had appended, so the transcript only
//! holds messages the assistant actually answered.

use crate::ai::postprocess::tidy_response;
use crate::ai::prompts::{self, ChatContext};
use crate::ai::Generator;
use crate::constants::{
    CHAT_MAX_TOKENS, CHAT_TEMPERATURE, CONTEXT_SUMMARY_LIMIT, DEFAULT_AI_NAME,
    KEYWORDS_MAX_TOKENS, KEYWORDS_TEMPERATURE, SUMMARY_MAX_TOKENS, SUMMARY_TEMPERATURE,
};
use crate::diary_core::{select_keywords, ChatMessage, EntryId, Mood, NewEntry};
use crate::errors::{AIError, AppResult, ValidationError};
use crate::extract::{default_keywords_for, extract_summary, parse_keyword_suggestions, SummaryDraft};
use crate::safety::{classify, SafetyAssessment};
use crate::store::DiaryStore;
use chrono::{NaiveDateTime, Timelike};
use std::fmt;
use tracing::{debug, info, info_span, warn, Span};
use uuid::Uuid;

/// Where the session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    MoodSelection,
    Chat,
    Summarizing,
    Trash,
    Calendar,
    Statistics,
    Settings,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::MoodSelection => "mood selection",
            SessionState::Chat => "chat",
            SessionState::Summarizing => "summary review",
            SessionState::Trash => "the trash view",
            SessionState::Calendar => "the calendar view",
            SessionState::Statistics => "the statistics view",
            SessionState::Settings => "the settings view",
        };
        f.write_str(name)
    }
}

/// Side views reachable from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxView {
    Trash,
    Calendar,
    Statistics,
    Settings,
}

impl From<AuxView> for SessionState {
    fn from(view: AuxView) -> Self {
        match view {
            AuxView::Trash => SessionState::Trash,
            AuxView::Calendar => SessionState::Calendar,
            AuxView::Statistics => SessionState::Statistics,
            AuxView::Settings => SessionState::Settings,
        }
    }
}

/// Generator output waiting for keyword confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSummary {
    pub draft: SummaryDraft,
    /// Keywords offered to the user; exactly five.
    pub suggested_keywords: Vec<String>,
}

/// Outcome of one successful chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub reply: String,
    pub safety: SafetyAssessment,
    pub tokens_used: u64,
}

/// Outcome of a confirmed save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedEntry {
    pub id: EntryId,
    /// Recomputed streak, `None` if it could not be stored.
    pub streak: Option<u32>,
}

/// One interactive conversation.
pub struct ConversationSession<G> {
    id: Uuid,
    generator: G,
    state: SessionState,
    mood: Option<Mood>,
    transcript: Vec<ChatMessage>,
    pending: Option<PendingSummary>,
    tokens_used: u64,
    span: Span,
}

impl<G: Generator> ConversationSession<G> {
    /// Starts a session in `MoodSelection`.
    pub fn new(generator: G) -> Self {
        let id = Uuid::new_v4();
        let span = info_span!("conversation_session", session_id = %id);
        span.in_scope(|| info!("Session started"));
        Self {
            id,
            generator,
            state: SessionState::MoodSelection,
            mood: None,
            transcript: Vec::new(),
            pending: None,
            tokens_used: 0,
            span,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mood(&self) -> Option<Mood> {
        self.mood
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn pending(&self) -> Option<&PendingSummary> {
        self.pending.as_ref()
    }

    /// Tokens spent on chat turns in this session.
    pub fn tokens_used(&self) -> u64 {
        self.tokens_used
    }

    fn require(&self, expected: SessionState, action: &'static str) -> AppResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ValidationError::InvalidTransition {
                action,
                state: self.state.to_string(),
            }
            .into())
        }
    }

    fn transition(&mut self, to: SessionState) {
        if self.state != to {
            debug!("Session {} -> {}", self.state, to);
        }
        self.state = to;
    }

    /// Picks the mood and enters `Chat` with an empty transcript.
    ///
    /// Returns the greeting to show; it is not added to the transcript.
    pub fn select_mood(&mut self, mood: Mood, ai_name: &str) -> AppResult<String> {
        let _enter = self.span.clone().entered();
        self.require(SessionState::MoodSelection, "choose a mood")?;

        self.mood = Some(mood);
        self.transcript.clear();
        self.pending = None;
        self.transition(SessionState::Chat);
        info!("Mood selected: {}", mood.as_str());
        Ok(prompts::greeting(mood, ai_name))
    }

    /// Sends one user message and records the assistant's reply.
    ///
    /// # Errors
    ///
    /// - `ValidationError::EmptyMessage` for blank text
    /// - Any generator error; the user message is dropped again
    pub fn submit(&mut self, store: &DiaryStore, text: &str) -> AppResult<ChatTurn> {
        let _enter = self.span.clone().entered();
        self.require(SessionState::Chat, "send a message")?;

        let message = text.trim();
        if message.is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }

        let safety = classify(text);
        if safety.flagged() {
            warn!(
                "Safety screen flagged message (self_harm={}, violence={})",
                safety.self_harm, safety.violence
            );
        }

        let ai_name = load_ai_name(store);
        let prior_summaries = store
            .recent_summaries(CONTEXT_SUMMARY_LIMIT)
            .unwrap_or_else(|e| {
                warn!("Continuing without earlier summaries: {}", e);
                Vec::new()
            });

        self.transcript.push(ChatMessage::user(message));
        let history_len = self.transcript.len() - 1;
        let prompt = prompts::chat_prompt(
            &ChatContext {
                mood: self.mood.unwrap_or(Mood::Neutral),
                ai_name: &ai_name,
                history: &self.transcript[..history_len],
                prior_summaries: &prior_summaries,
                safety,
            },
            message,
        );

        let reply = self
            .generator
            .generate(&prompt, CHAT_MAX_TOKENS, CHAT_TEMPERATURE)
            .and_then(|generation| {
                let text = tidy_response(&generation.text);
                if text.is_empty() {
                    Err(AIError::InvalidResponse("empty reply".to_string()).into())
                } else {
                    Ok((text, generation.tokens_used))
                }
            });

        let (reply, tokens_used) = match reply {
            Ok(ok) => ok,
            Err(e) => {
                self.transcript.pop();
                warn!("Chat turn failed, message rolled back: {}", e);
                return Err(e);
            }
        };

        self.transcript.push(ChatMessage::assistant(reply.clone()));
        self.tokens_used += tokens_used;
        if let Err(e) = store.add_token_usage(tokens_used) {
            warn!("Failed to record token usage: {}", e);
        }

        debug!(
            "Chat turn complete ({} chars in, {} chars out, {} tokens)",
            message.chars().count(),
            reply.chars().count(),
            tokens_used
        );
        Ok(ChatTurn {
            reply,
            safety,
            tokens_used,
        })
    }

    /// Asks the generator for a summary and keyword suggestions and enters
    /// `Summarizing`.
    ///
    /// # Errors
    ///
    /// - `ValidationError::EmptyTranscript` if nothing was said yet
    /// - Any generator error; the session stays in `Chat`
    pub fn request_save(&mut self) -> AppResult<&PendingSummary> {
        let _enter = self.span.clone().entered();
        self.require(SessionState::Chat, "save the conversation")?;
        if self.transcript.is_empty() {
            return Err(ValidationError::EmptyTranscript.into());
        }

        let mood = self.mood.unwrap_or(Mood::Neutral);
        let pending = match prompts::user_excerpt(&self.transcript) {
            Some(excerpt) => {
                let summary = self.generator.generate(
                    &prompts::summary_prompt(&excerpt),
                    SUMMARY_MAX_TOKENS,
                    SUMMARY_TEMPERATURE,
                )?;
                let keywords = self.generator.generate(
                    &prompts::keywords_prompt(&excerpt, mood),
                    KEYWORDS_MAX_TOKENS,
                    KEYWORDS_TEMPERATURE,
                )?;
                PendingSummary {
                    draft: extract_summary(&summary.text),
                    suggested_keywords: parse_keyword_suggestions(&keywords.text),
                }
            }
            None => PendingSummary {
                draft: SummaryDraft::fallback(),
                suggested_keywords: default_keywords_for(mood),
            },
        };

        if pending.draft.defaulted {
            info!("Summary used default values");
        }
        self.transition(SessionState::Summarizing);
        let pending: &PendingSummary = self.pending.insert(pending);
        Ok(pending)
    }

    /// Saves the entry with the selected keywords and returns to
    /// `MoodSelection`.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if the keyword selection is empty or over a limit
    /// - A storage error if the entry could not be written
    ///
    /// In both cases the session stays in `Summarizing` with its draft.
    pub fn confirm(
        &mut self,
        store: &DiaryStore,
        selected_keywords: &[String],
        now: NaiveDateTime,
    ) -> AppResult<SavedEntry> {
        let _enter = self.span.clone().entered();
        self.require(SessionState::Summarizing, "confirm keywords")?;
        let pending = self
            .pending
            .as_ref()
            .ok_or(ValidationError::EmptyTranscript)?;

        let keywords = select_keywords(selected_keywords, &pending.suggested_keywords)?;
        let entry = NewEntry {
            date: now.date(),
            time: now.time().with_nanosecond(0).unwrap_or_else(|| now.time()),
            mood: self.mood.unwrap_or(Mood::Neutral),
            summary: pending.draft.summary.clone(),
            keywords,
            suggested_keywords: pending.suggested_keywords.clone(),
            action_items: pending.draft.action_items.clone(),
            transcript: self.transcript.clone(),
        };

        let id = store.create_entry(&entry).map_err(|e| {
            warn!("Saving entry failed, draft kept: {}", e);
            e
        })?;

        // The entry is stored; a streak failure must not make it look unsaved
        let streak = match store.record_streak(entry.date) {
            Ok(streak) => Some(streak),
            Err(e) => {
                warn!("Entry {} saved but streak update failed: {}", id, e);
                None
            }
        };

        self.clear();
        self.transition(SessionState::MoodSelection);
        info!("Entry {} saved", id);
        Ok(SavedEntry { id, streak })
    }

    /// Clears everything and returns to `MoodSelection`.
    pub fn reset(&mut self) {
        let _enter = self.span.clone().entered();
        self.clear();
        self.transition(SessionState::MoodSelection);
    }

    /// Switches to a side view. Working data is kept.
    pub fn open_view(&mut self, view: AuxView) {
        let _enter = self.span.clone().entered();
        self.transition(view.into());
    }

    /// Leaves a side view for `MoodSelection`.
    pub fn close_view(&mut self) -> AppResult<()> {
        let _enter = self.span.clone().entered();
        match self.state {
            SessionState::Trash
            | SessionState::Calendar
            | SessionState::Statistics
            | SessionState::Settings => {
                self.transition(SessionState::MoodSelection);
                Ok(())
            }
            state => Err(ValidationError::InvalidTransition {
                action: "close a view",
                state: state.to_string(),
            }
            .into()),
        }
    }

    fn clear(&mut self) {
        self.mood = None;
        self.transcript.clear();
        self.pending = None;
    }
}

fn load_ai_name(store: &DiaryStore) -> String {
    match store.settings() {
        Ok(settings) => settings.ai_name,
        Err(e) => {
            warn!("Using default assistant name: {}", e);
            DEFAULT_AI_NAME.to_string()
        }
    }
}
