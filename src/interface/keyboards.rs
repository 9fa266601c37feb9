//! # Keypad Builders
//!
//! Every inline keypad the bot sends is assembled here so button labels
//! and callback payloads stay in one place. Payloads must round-trip
//! through [`crate::domain::callback::CallbackAction::decode`].

use crate::application::form::QuestionDefinition;
use crate::domain::callback::{BoardKind, PanelView};
use crate::domain::types::{Keypad, KeypadButton, UserId};
use crate::strings::{TextPack, AVAILABLE_LANGUAGES};

pub fn welcome_keyboard(texts: &TextPack, is_admin: bool) -> Keypad {
    let mut rows = vec![
        vec![KeypadButton::simple(texts.btn_apply, "apply_for_guild")],
        vec![
            KeypadButton::simple(texts.btn_status, "application_status"),
            KeypadButton::simple(texts.btn_withdraw, "application_withdraw"),
        ],
        vec![KeypadButton::simple(texts.btn_language, "language_menu")],
    ];
    if is_admin {
        rows.push(vec![KeypadButton::simple(
            texts.btn_admin_panel,
            "admin_panel",
        )]);
    }
    Keypad::from_rows(rows)
}

pub fn admin_panel_keyboard(texts: &TextPack) -> Keypad {
    Keypad::from_rows(vec![
        vec![KeypadButton::simple(
            texts.btn_admin_view_applications,
            "admin_panel:view_applications",
        )],
        vec![KeypadButton::simple(
            texts.btn_admin_view_members,
            "admin_panel:view_members",
        )],
        vec![
            KeypadButton::simple(texts.btn_admin_manage_admins, "admin_panel:manage_admins"),
            KeypadButton::simple(
                texts.btn_admin_manage_questions,
                "admin_panel:manage_questions",
            ),
        ],
    ])
}

pub fn admin_management_keyboard(texts: &TextPack) -> Keypad {
    Keypad::from_rows(vec![
        vec![
            KeypadButton::simple(texts.btn_admin_add, "admin_panel:manage_admins:add"),
            KeypadButton::simple(texts.btn_admin_remove, "admin_panel:manage_admins:remove"),
        ],
        vec![KeypadButton::simple(
            texts.btn_admin_list,
            "admin_panel:manage_admins:list",
        )],
        vec![KeypadButton::simple(texts.btn_back, "admin_panel:back")],
    ])
}

/// One edit/delete row per question, then the form-wide tools.
pub fn admin_questions_keyboard(texts: &TextPack, form: &[QuestionDefinition]) -> Keypad {
    let mut rows: Vec<Vec<KeypadButton>> = form
        .iter()
        .map(|question| {
            vec![
                KeypadButton::simple(
                    texts
                        .question_row_edit
                        .replace("{title}", question.display_title()),
                    format!("admin_panel:manage_questions:edit:{}", question.question_id),
                ),
                KeypadButton::simple(
                    texts
                        .question_row_delete
                        .replace("{title}", question.display_title()),
                    format!(
                        "admin_panel:manage_questions:delete:{}",
                        question.question_id
                    ),
                ),
            ]
        })
        .collect();
    rows.push(vec![
        KeypadButton::simple(texts.btn_question_add, "admin_panel:manage_questions:add"),
        KeypadButton::simple(
            texts.btn_question_import,
            "admin_panel:manage_questions:import",
        ),
    ]);
    rows.push(vec![
        KeypadButton::simple(
            texts.btn_question_export,
            "admin_panel:manage_questions:export",
        ),
        KeypadButton::simple(
            texts.btn_question_reset,
            "admin_panel:manage_questions:reset",
        ),
    ]);
    rows.push(vec![KeypadButton::simple(
        texts.btn_back,
        "admin_panel:manage_questions:back",
    )]);
    Keypad::from_rows(rows)
}

pub fn application_review_keyboard(texts: &TextPack, user_id: UserId) -> Keypad {
    Keypad::from_rows(vec![
        vec![
            KeypadButton::simple(
                texts.btn_review_approve,
                format!("application:{user_id}:approve"),
            ),
            KeypadButton::simple(texts.btn_review_deny, format!("application:{user_id}:deny")),
        ],
        vec![KeypadButton::simple(
            texts.btn_review_skip,
            format!("application:{user_id}:skip"),
        )],
    ])
}

pub fn language_options_keyboard(texts: &TextPack, active: &str) -> Keypad {
    let mut rows: Vec<Vec<KeypadButton>> = AVAILABLE_LANGUAGES
        .iter()
        .map(|(code, name)| {
            let label = if *code == active {
                format!("✅ {name}")
            } else {
                (*name).to_string()
            };
            vec![KeypadButton::simple(label, format!("set_language:{code}"))]
        })
        .collect();
    rows.push(vec![KeypadButton::simple(
        texts.btn_language_close,
        "close_language_menu",
    )]);
    Keypad::from_rows(rows)
}

pub fn leaderboard_refresh_keyboard(texts: &TextPack, board: BoardKind, chat_id: &str) -> Keypad {
    let board = match board {
        BoardKind::Xp => "xp",
        BoardKind::Cups => "cups",
    };
    Keypad::from_rows(vec![vec![KeypadButton::simple(
        texts.btn_refresh,
        format!("leaderboard:{board}:{chat_id}:refresh"),
    )]])
}

/// Panel keypad for the named sub-menu; `"root"` is the section picker.
pub fn group_panel_keyboard(texts: &TextPack, menu: &str) -> Keypad {
    let back = || vec![KeypadButton::simple(texts.btn_panel_back, "group_panel:menu")];
    match menu {
        "xp" => Keypad::from_rows(vec![
            vec![
                KeypadButton::simple(texts.btn_panel_add_xp, "group_panel:action:add_xp"),
                KeypadButton::simple(texts.btn_panel_remove_xp, "group_panel:action:remove_xp"),
            ],
            vec![KeypadButton::simple(
                texts.btn_panel_xp_members,
                "group_panel:action:xp_members",
            )],
            back(),
        ]),
        "cups" => Keypad::from_rows(vec![
            vec![KeypadButton::simple(
                texts.btn_panel_cups_latest,
                "group_panel:action:cups_latest",
            )],
            vec![KeypadButton::simple(
                texts.btn_panel_cups_help,
                "group_panel:action:cups_help",
            )],
            back(),
        ]),
        "admins" => Keypad::from_rows(vec![
            vec![KeypadButton::simple(
                texts.btn_panel_admins_list,
                "group_panel:action:admins_list",
            )],
            vec![KeypadButton::simple(
                texts.btn_panel_admins_help,
                "group_panel:action:admins_help",
            )],
            back(),
        ]),
        "settings" => Keypad::from_rows(vec![
            vec![KeypadButton::simple(
                texts.btn_panel_settings_tools,
                "group_panel:action:settings_tools",
            )],
            vec![KeypadButton::simple(
                texts.btn_panel_settings_help,
                "group_panel:action:settings_help",
            )],
            back(),
        ]),
        _ => Keypad::from_rows(vec![
            vec![
                KeypadButton::simple(texts.btn_panel_xp, "group_panel:menu:xp"),
                KeypadButton::simple(texts.btn_panel_cups, "group_panel:menu:cups"),
            ],
            vec![
                KeypadButton::simple(texts.btn_panel_admins, "group_panel:menu:admins"),
                KeypadButton::simple(texts.btn_panel_settings, "group_panel:menu:settings"),
            ],
            vec![
                KeypadButton::simple(texts.btn_panel_help, "group_panel:help"),
                KeypadButton::simple(texts.btn_panel_close, "group_panel:close"),
            ],
        ]),
    }
}

pub fn personal_panel_keyboard(
    texts: &TextPack,
    chat_id: &str,
    view: Option<PanelView>,
) -> Keypad {
    let refresh = match view {
        Some(view) => format!("personal_panel:refresh:{chat_id}:{}", view.as_str()),
        None => format!("personal_panel:refresh:{chat_id}"),
    };
    Keypad::from_rows(vec![
        vec![
            KeypadButton::simple(
                texts.btn_personal_profile,
                format!("personal_panel:view:{chat_id}:profile"),
            ),
            KeypadButton::simple(
                texts.btn_personal_leaderboard,
                format!("personal_panel:view:{chat_id}:leaderboard"),
            ),
        ],
        vec![KeypadButton::simple(texts.btn_refresh, refresh)],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::callback::CallbackAction;
    use crate::strings::ENGLISH_TEXTS;

    fn all_button_ids(keypad: &Keypad) -> Vec<String> {
        keypad
            .rows
            .iter()
            .flat_map(|row| row.buttons.iter().map(|b| b.id.clone()))
            .collect()
    }

    #[test]
    fn every_button_payload_decodes() {
        let form = crate::application::form::default_form("en");
        let keypads = vec![
            welcome_keyboard(&ENGLISH_TEXTS, true),
            admin_panel_keyboard(&ENGLISH_TEXTS),
            admin_management_keyboard(&ENGLISH_TEXTS),
            admin_questions_keyboard(&ENGLISH_TEXTS, &form),
            application_review_keyboard(&ENGLISH_TEXTS, 42),
            language_options_keyboard(&ENGLISH_TEXTS, "fa"),
            leaderboard_refresh_keyboard(&ENGLISH_TEXTS, BoardKind::Xp, "g9"),
            group_panel_keyboard(&ENGLISH_TEXTS, "root"),
            group_panel_keyboard(&ENGLISH_TEXTS, "xp"),
            group_panel_keyboard(&ENGLISH_TEXTS, "cups"),
            group_panel_keyboard(&ENGLISH_TEXTS, "admins"),
            group_panel_keyboard(&ENGLISH_TEXTS, "settings"),
            personal_panel_keyboard(&ENGLISH_TEXTS, "g9", Some(PanelView::Profile)),
            personal_panel_keyboard(&ENGLISH_TEXTS, "g9", None),
        ];
        for keypad in &keypads {
            for id in all_button_ids(keypad) {
                assert_ne!(
                    CallbackAction::decode(&id),
                    CallbackAction::Malformed,
                    "payload {id} must decode"
                );
            }
        }
    }

    #[test]
    fn language_menu_marks_the_active_language() {
        let keypad = language_options_keyboard(&ENGLISH_TEXTS, "en");
        let english = keypad
            .rows
            .iter()
            .flat_map(|row| &row.buttons)
            .find(|b| b.id == "set_language:en")
            .expect("english option present");
        assert!(english.button_text.starts_with("✅"));
    }
}
