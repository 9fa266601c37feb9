//! # Predicate Algebra
//!
//! Composable boolean tests over an inbound [`Update`]. Predicates are a
//! small tagged expression tree with one `matches` capability; the
//! combinators are pure, total and short-circuiting. Nothing here can
//! fail: a predicate either matches or it does not.

use crate::domain::types::{ChatKind, Update};

/// Discriminant of a decoded callback action, used to bind handlers to
/// one callback namespace without re-parsing the wire string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    Apply,
    AdminPanelHome,
    AdminPanel,
    ApplicationStatus,
    ApplicationWithdraw,
    LanguageMenu,
    CloseLanguageMenu,
    SetLanguage,
    Review,
    LeaderboardRefresh,
    GroupPanel,
    PersonalPanel,
    Malformed,
}

impl CallbackKind {
    pub fn of(action: &crate::domain::callback::CallbackAction) -> Self {
        use crate::domain::callback::CallbackAction::*;
        match action {
            Apply => CallbackKind::Apply,
            AdminPanelHome => CallbackKind::AdminPanelHome,
            AdminPanel(_) => CallbackKind::AdminPanel,
            ApplicationStatus => CallbackKind::ApplicationStatus,
            ApplicationWithdraw => CallbackKind::ApplicationWithdraw,
            LanguageMenu => CallbackKind::LanguageMenu,
            CloseLanguageMenu => CallbackKind::CloseLanguageMenu,
            SetLanguage { .. } => CallbackKind::SetLanguage,
            Review { .. } => CallbackKind::Review,
            LeaderboardRefresh { .. } => CallbackKind::LeaderboardRefresh,
            GroupPanel(_) => CallbackKind::GroupPanel,
            PersonalPanel { .. } => CallbackKind::PersonalPanel,
            Malformed => CallbackKind::Malformed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every update.
    Any,
    /// Update is a plain message.
    MessagePresent,
    /// Update is a message with non-empty text.
    TextPresent,
    /// Message text starts with `/`.
    CommandPrefix,
    /// Message is the given `/command` (case-insensitive).
    Command(String),
    Private,
    Group,
    /// Update is a callback press of the given decoded kind.
    Callback(CallbackKind),
    Not(Box<Predicate>),
    All(Vec<Predicate>),
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    pub fn command(name: &str) -> Self {
        Predicate::Command(name.to_lowercase())
    }

    pub fn callback(kind: CallbackKind) -> Self {
        Predicate::Callback(kind)
    }

    pub fn and(self, other: Predicate) -> Self {
        Predicate::All(vec![self, other])
    }

    pub fn or(self, other: Predicate) -> Self {
        Predicate::AnyOf(vec![self, other])
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Predicate::Not(Box::new(self))
    }

    pub fn matches(&self, update: &Update) -> bool {
        match self {
            Predicate::Any => true,
            Predicate::MessagePresent => update.message().is_some(),
            Predicate::TextPresent => update
                .message()
                .and_then(|message| message.text.as_deref())
                .is_some_and(|text| !text.is_empty()),
            Predicate::CommandPrefix => update
                .text()
                .is_some_and(|text| text.starts_with('/')),
            Predicate::Command(name) => update
                .message()
                .and_then(|message| message.command())
                .is_some_and(|command| &command == name),
            Predicate::Private => update.chat_kind() == ChatKind::Private,
            Predicate::Group => update.chat_kind() == ChatKind::Group,
            Predicate::Callback(kind) => update
                .callback()
                .is_some_and(|press| CallbackKind::of(&press.action) == *kind),
            Predicate::Not(inner) => !inner.matches(update),
            Predicate::All(inner) => inner.iter().all(|p| p.matches(update)),
            Predicate::AnyOf(inner) => inner.iter().any(|p| p.matches(update)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::callback::CallbackAction;
    use crate::domain::types::{CallbackPress, IncomingMessage, Sender};

    fn text_update(text: &str, kind: ChatKind) -> Update {
        Update::Message(IncomingMessage {
            id: "m".into(),
            chat_id: if kind == ChatKind::Group { "g1" } else { "b1" }.into(),
            chat_kind: kind,
            sender: Sender::new(5),
            text: Some(text.into()),
        })
    }

    fn callback_update(data: &str) -> Update {
        Update::CallbackPress(CallbackPress {
            id: "m".into(),
            chat_id: "b1".into(),
            chat_kind: ChatKind::Private,
            message_id: "m".into(),
            sender: Sender::new(5),
            action: CallbackAction::decode(data),
            raw: data.into(),
        })
    }

    #[test]
    fn command_predicate_is_case_insensitive() {
        let update = text_update("/START now", ChatKind::Private);
        assert!(Predicate::command("start").matches(&update));
        assert!(!Predicate::command("cancel").matches(&update));
    }

    #[test]
    fn combinators_compose() {
        let free_text = Predicate::Private
            .and(Predicate::TextPresent)
            .and(Predicate::CommandPrefix.not());
        assert!(free_text.matches(&text_update("hello", ChatKind::Private)));
        assert!(!free_text.matches(&text_update("/start", ChatKind::Private)));
        assert!(!free_text.matches(&text_update("hello", ChatKind::Group)));
    }

    #[test]
    fn or_matches_either_side() {
        let either = Predicate::command("xp").or(Predicate::command("cups"));
        assert!(either.matches(&text_update("/cups", ChatKind::Group)));
        assert!(!either.matches(&text_update("/help", ChatKind::Group)));
    }

    #[test]
    fn callback_kind_predicate() {
        let press = callback_update("application:7:approve");
        assert!(Predicate::callback(CallbackKind::Review).matches(&press));
        assert!(!Predicate::callback(CallbackKind::Apply).matches(&press));
        assert!(!Predicate::MessagePresent.matches(&press));
    }

    #[test]
    fn malformed_callback_matches_only_malformed() {
        let press = callback_update("application:forty:approve");
        assert!(Predicate::callback(CallbackKind::Malformed).matches(&press));
        assert!(!Predicate::callback(CallbackKind::Review).matches(&press));
    }
}
