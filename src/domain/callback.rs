//! # Callback Protocol
//!
//! Colon-delimited, namespace-first payloads carried by keypad buttons.
//! The weakly-typed wire string is decoded exactly once, at the update
//! parse boundary, into a tagged [`CallbackAction`]; anything that does
//! not decode becomes [`CallbackAction::Malformed`], which is
//! acknowledged downstream but triggers no behavior.

use crate::domain::types::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewVerdict {
    Approve,
    Deny,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardKind {
    Xp,
    Cups,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelView {
    Profile,
    Leaderboard,
}

impl PanelView {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelView::Profile => "profile",
            PanelView::Leaderboard => "leaderboard",
        }
    }

    fn decode(raw: &str) -> Option<Self> {
        match raw {
            "profile" => Some(PanelView::Profile),
            "leaderboard" => Some(PanelView::Leaderboard),
            _ => None,
        }
    }
}

/// Subactions reachable from the DM admin panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminPanelAction {
    ViewApplications,
    ViewMembers,
    ManageAdmins,
    ManageAdminsAdd,
    ManageAdminsRemove,
    ManageAdminsList,
    QuestionsMenu,
    QuestionsBack,
    QuestionsAdd,
    QuestionsImport,
    QuestionsExport,
    QuestionsReset,
    QuestionsEdit { question_id: String },
    QuestionsDelete { question_id: String },
    Back,
}

/// Operations reachable from the group admin panel sub-menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupPanelOp {
    AddXp,
    RemoveXp,
    XpMembers,
    CupsLatest,
    CupsHelp,
    AdminsList,
    AdminsHelp,
    SettingsTools,
    SettingsHelp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupPanelScope {
    Close,
    Refresh,
    Help,
    Menu(String),
    Action(GroupPanelOp),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonalPanelRequest {
    View(PanelView),
    Refresh(Option<PanelView>),
}

/// Fully decoded callback payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Apply,
    AdminPanelHome,
    AdminPanel(AdminPanelAction),
    ApplicationStatus,
    ApplicationWithdraw,
    LanguageMenu,
    CloseLanguageMenu,
    SetLanguage { code: String },
    Review { target: UserId, verdict: ReviewVerdict },
    LeaderboardRefresh { board: BoardKind, chat_id: String },
    GroupPanel(GroupPanelScope),
    PersonalPanel { request: PersonalPanelRequest, chat_id: String },
    Malformed,
}

impl CallbackAction {
    /// Positional decode of the wire string. Total: never fails, anything
    /// undecodable maps to `Malformed`.
    pub fn decode(data: &str) -> Self {
        match try_decode(data) {
            Some(action) => action,
            None => CallbackAction::Malformed,
        }
    }
}

fn try_decode(data: &str) -> Option<CallbackAction> {
    let mut parts = data.split(':');
    let namespace = parts.next()?;
    let rest: Vec<&str> = parts.collect();

    match (namespace, rest.as_slice()) {
        ("apply_for_guild", []) => Some(CallbackAction::Apply),
        ("admin_panel", []) => Some(CallbackAction::AdminPanelHome),
        ("admin_panel", sub) => decode_admin_panel(sub).map(CallbackAction::AdminPanel),
        ("application_status", []) => Some(CallbackAction::ApplicationStatus),
        ("application_withdraw", []) => Some(CallbackAction::ApplicationWithdraw),
        ("language_menu", []) => Some(CallbackAction::LanguageMenu),
        ("close_language_menu", []) => Some(CallbackAction::CloseLanguageMenu),
        ("set_language", [code]) if !code.is_empty() => Some(CallbackAction::SetLanguage {
            code: (*code).to_string(),
        }),
        ("application", [target, verdict]) => {
            let target: UserId = target.parse().ok()?;
            let verdict = match *verdict {
                "approve" => ReviewVerdict::Approve,
                "deny" => ReviewVerdict::Deny,
                "skip" => ReviewVerdict::Skip,
                _ => return None,
            };
            Some(CallbackAction::Review { target, verdict })
        }
        ("leaderboard", [board, chat_id, "refresh"]) => {
            let board = match *board {
                "xp" => BoardKind::Xp,
                "cups" => BoardKind::Cups,
                _ => return None,
            };
            Some(CallbackAction::LeaderboardRefresh {
                board,
                chat_id: (*chat_id).to_string(),
            })
        }
        ("group_panel", sub) => decode_group_panel(sub).map(CallbackAction::GroupPanel),
        ("personal_panel", ["view", chat_id, view]) => Some(CallbackAction::PersonalPanel {
            request: PersonalPanelRequest::View(PanelView::decode(view)?),
            chat_id: (*chat_id).to_string(),
        }),
        ("personal_panel", ["refresh", chat_id]) => Some(CallbackAction::PersonalPanel {
            request: PersonalPanelRequest::Refresh(None),
            chat_id: (*chat_id).to_string(),
        }),
        ("personal_panel", ["refresh", chat_id, view]) => Some(CallbackAction::PersonalPanel {
            request: PersonalPanelRequest::Refresh(Some(PanelView::decode(view)?)),
            chat_id: (*chat_id).to_string(),
        }),
        _ => None,
    }
}

fn decode_admin_panel(sub: &[&str]) -> Option<AdminPanelAction> {
    match sub {
        ["view_applications"] => Some(AdminPanelAction::ViewApplications),
        ["view_members"] => Some(AdminPanelAction::ViewMembers),
        ["manage_admins"] => Some(AdminPanelAction::ManageAdmins),
        ["manage_admins", "add"] => Some(AdminPanelAction::ManageAdminsAdd),
        ["manage_admins", "remove"] => Some(AdminPanelAction::ManageAdminsRemove),
        ["manage_admins", "list"] => Some(AdminPanelAction::ManageAdminsList),
        ["manage_questions"] | ["manage_questions", "menu"] => {
            Some(AdminPanelAction::QuestionsMenu)
        }
        ["manage_questions", "back"] => Some(AdminPanelAction::QuestionsBack),
        ["manage_questions", "add"] => Some(AdminPanelAction::QuestionsAdd),
        ["manage_questions", "import"] => Some(AdminPanelAction::QuestionsImport),
        ["manage_questions", "export"] => Some(AdminPanelAction::QuestionsExport),
        ["manage_questions", "reset"] => Some(AdminPanelAction::QuestionsReset),
        ["manage_questions", "edit", question_id] if !question_id.is_empty() => {
            Some(AdminPanelAction::QuestionsEdit {
                question_id: (*question_id).to_string(),
            })
        }
        ["manage_questions", "delete", question_id] if !question_id.is_empty() => {
            Some(AdminPanelAction::QuestionsDelete {
                question_id: (*question_id).to_string(),
            })
        }
        ["back"] => Some(AdminPanelAction::Back),
        _ => None,
    }
}

fn decode_group_panel(sub: &[&str]) -> Option<GroupPanelScope> {
    match sub {
        ["close"] => Some(GroupPanelScope::Close),
        ["refresh"] => Some(GroupPanelScope::Refresh),
        ["help"] => Some(GroupPanelScope::Help),
        ["menu"] => Some(GroupPanelScope::Menu("root".to_string())),
        ["menu", name] if !name.is_empty() => Some(GroupPanelScope::Menu((*name).to_string())),
        ["action", op] => {
            let op = match *op {
                "add_xp" => GroupPanelOp::AddXp,
                "remove_xp" => GroupPanelOp::RemoveXp,
                "xp_members" => GroupPanelOp::XpMembers,
                "cups_latest" => GroupPanelOp::CupsLatest,
                "cups_help" => GroupPanelOp::CupsHelp,
                "admins_list" => GroupPanelOp::AdminsList,
                "admins_help" => GroupPanelOp::AdminsHelp,
                "settings_tools" => GroupPanelOp::SettingsTools,
                "settings_help" => GroupPanelOp::SettingsHelp,
                _ => return None,
            };
            Some(GroupPanelScope::Action(op))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_simple_namespaces() {
        assert_eq!(CallbackAction::decode("apply_for_guild"), CallbackAction::Apply);
        assert_eq!(
            CallbackAction::decode("admin_panel"),
            CallbackAction::AdminPanelHome
        );
        assert_eq!(
            CallbackAction::decode("application_status"),
            CallbackAction::ApplicationStatus
        );
        assert_eq!(
            CallbackAction::decode("set_language:en"),
            CallbackAction::SetLanguage { code: "en".into() }
        );
    }

    #[test]
    fn decodes_review_actions() {
        assert_eq!(
            CallbackAction::decode("application:42:approve"),
            CallbackAction::Review {
                target: 42,
                verdict: ReviewVerdict::Approve
            }
        );
        assert_eq!(
            CallbackAction::decode("application:42:skip"),
            CallbackAction::Review {
                target: 42,
                verdict: ReviewVerdict::Skip
            }
        );
    }

    #[test]
    fn decodes_nested_admin_panel_subactions() {
        assert_eq!(
            CallbackAction::decode("admin_panel:manage_questions:edit:role"),
            CallbackAction::AdminPanel(AdminPanelAction::QuestionsEdit {
                question_id: "role".into()
            })
        );
        assert_eq!(
            CallbackAction::decode("admin_panel:manage_admins:add"),
            CallbackAction::AdminPanel(AdminPanelAction::ManageAdminsAdd)
        );
    }

    #[test]
    fn decodes_leaderboard_and_panels() {
        assert_eq!(
            CallbackAction::decode("leaderboard:xp:g55:refresh"),
            CallbackAction::LeaderboardRefresh {
                board: BoardKind::Xp,
                chat_id: "g55".into()
            }
        );
        assert_eq!(
            CallbackAction::decode("group_panel:menu:cups"),
            CallbackAction::GroupPanel(GroupPanelScope::Menu("cups".into()))
        );
        assert_eq!(
            CallbackAction::decode("personal_panel:view:g55:leaderboard"),
            CallbackAction::PersonalPanel {
                request: PersonalPanelRequest::View(PanelView::Leaderboard),
                chat_id: "g55".into()
            }
        );
    }

    #[test]
    fn malformed_payloads_decode_to_malformed() {
        for raw in [
            "",
            "unknown",
            "application:notanumber:approve",
            "application:42:maybe",
            "leaderboard:xp:g55",
            "group_panel:action:launch_missiles",
            "personal_panel:view:g55:settings",
        ] {
            assert_eq!(CallbackAction::decode(raw), CallbackAction::Malformed, "{raw}");
        }
    }
}
