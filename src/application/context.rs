//! # Context Store
//!
//! Per-actor and per-conversation scratch state, created on first access
//! and retained for the process lifetime. All mutation happens inside the
//! single sequential dispatch path, so the store needs no finer locking
//! than the one mutex the dispatcher shares with its handlers.
//!
//! The mutually-exclusive "who consumes this actor's next free-text
//! message" states are a single tagged [`PendingAction`] per actor, so
//! the priority invariant (review note > question edit > admin toggle >
//! application flow) is enforced structurally: installing one kind
//! replaces whatever was there.

use std::collections::HashMap;

use tokio::time::Instant;

use crate::application::form::QuestionDefinition;
use crate::domain::callback::{PanelView, ReviewVerdict};
use crate::domain::types::UserId;

/// One accepted answer in an application flow.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRecord {
    pub question_id: String,
    pub question: String,
    pub answer: String,
}

/// Transient state of one actor's application intake.
#[derive(Debug, Clone, Default)]
pub struct FlowState {
    pub answers: Vec<AnswerRecord>,
    pub answered_values: HashMap<String, String>,
    /// Form snapshot taken when the flow started. If a pending question
    /// id stops resolving against it (concurrent form edit), the engine
    /// recomputes the next eligible question instead of failing.
    pub form_snapshot: Vec<QuestionDefinition>,
    pub pending_question_id: Option<String>,
    pub locale: String,
}

/// Review verdict awaiting its optional note.
#[derive(Debug, Clone)]
pub struct PendingReviewNote {
    pub verdict: ReviewVerdict,
    pub target_id: UserId,
    pub applicant_name: String,
    pub applicant_chat_id: Option<String>,
    pub applicant_locale: Option<String>,
    /// Application text already rendered for the review message.
    pub application_text: String,
    pub origin_chat_id: String,
    pub origin_message_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionEditKind {
    Add,
    Edit,
    Import,
    Delete,
    Reset,
}

/// Question-definition edit awaiting its payload or confirmation.
#[derive(Debug, Clone)]
pub struct PendingQuestionEdit {
    pub action: QuestionEditKind,
    pub locale: String,
    pub question_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminToggle {
    Promote,
    Demote,
}

/// The at-most-one state that claims an actor's next free-text message.
#[derive(Debug, Clone, Default)]
pub enum PendingAction {
    #[default]
    None,
    ReviewNote(PendingReviewNote),
    QuestionEdit(PendingQuestionEdit),
    AdminToggle(AdminToggle),
    Flow(FlowState),
}

impl PendingAction {
    pub fn is_none(&self) -> bool {
        matches!(self, PendingAction::None)
    }
}

/// Per-actor scratch space.
#[derive(Debug, Clone, Default)]
pub struct ActorState {
    pub preferred_language: Option<String>,
    pub pending: PendingAction,
    pub panel: PersonalPanelState,
}

/// Personal-panel delivery state (view memory plus send cooldown).
#[derive(Debug, Clone, Default)]
pub struct PersonalPanelState {
    pub last_view: Option<PanelView>,
    pub last_sent: Option<Instant>,
}

/// Prompted group-panel action whose next group message from the
/// prompting admin carries the argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPrompt {
    AddXp,
    RemoveXp,
}

/// Per-conversation scratch space.
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pub preferred_language: Option<String>,
    pub active_panel_menu: Option<String>,
    pub panel_prompts: HashMap<UserId, PanelPrompt>,
}

/// Process-lifetime state service: actor and conversation scratch maps,
/// created on demand, removed only by the explicit contracts above.
#[derive(Debug, Default)]
pub struct ContextStore {
    actors: HashMap<UserId, ActorState>,
    chats: HashMap<String, ChatState>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actor(&mut self, id: UserId) -> &mut ActorState {
        self.actors.entry(id).or_default()
    }

    pub fn chat(&mut self, id: &str) -> &mut ChatState {
        self.chats.entry(id.to_string()).or_default()
    }

    /// Peek without creating; used by tests and read-only paths.
    pub fn actor_if_present(&self, id: UserId) -> Option<&ActorState> {
        self.actors.get(&id)
    }

    /// Clear every pending record for the actor. Cancel semantics: total
    /// and unconditional, whatever state the actor was in.
    pub fn clear_pending(&mut self, id: UserId) {
        if let Some(actor) = self.actors.get_mut(&id) {
            actor.pending = PendingAction::None;
        }
    }

    /// Take the actor's pending action, leaving `None` behind.
    pub fn take_pending(&mut self, id: UserId) -> PendingAction {
        std::mem::take(&mut self.actor(id).pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_state_is_created_on_demand_and_retained() {
        let mut store = ContextStore::new();
        assert!(store.actor_if_present(9).is_none());
        store.actor(9).preferred_language = Some("en".into());
        assert_eq!(
            store.actor(9).preferred_language.as_deref(),
            Some("en")
        );
    }

    #[test]
    fn pending_action_is_mutually_exclusive_by_construction() {
        let mut store = ContextStore::new();
        store.actor(1).pending = PendingAction::AdminToggle(AdminToggle::Promote);
        store.actor(1).pending = PendingAction::Flow(FlowState::default());
        match &store.actor(1).pending {
            PendingAction::Flow(_) => {}
            other => panic!("expected flow, got {other:?}"),
        }
    }

    #[test]
    fn clear_pending_resets_to_none() {
        let mut store = ContextStore::new();
        store.actor(1).pending = PendingAction::AdminToggle(AdminToggle::Demote);
        store.clear_pending(1);
        assert!(store.actor(1).pending.is_none());
    }
}
