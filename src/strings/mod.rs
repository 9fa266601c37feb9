//! # Localized Texts
//!
//! Every user-visible string lives here, in one [`TextPack`] per
//! supported language. Handlers pick a pack per actor (preferred
//! language first, then the transport-reported language code, then the
//! Persian default) and fill `{placeholder}` slots with `replace`.

mod en;
mod fa;

pub use en::ENGLISH_TEXTS;
pub use fa::PERSIAN_TEXTS;

pub const DEFAULT_LANGUAGE: &str = "fa";

/// `(code, native name)` pairs offered in the language menu.
pub const AVAILABLE_LANGUAGES: [(&str, &str); 2] = [("fa", "فارسی"), ("en", "English")];

/// Collapse a transport-reported language code onto a supported one.
/// Region suffixes are ignored (`en-US` is `en`); anything unsupported
/// falls back to the default.
pub fn normalize_language_code(code: Option<&str>) -> &'static str {
    let base = code
        .unwrap_or(DEFAULT_LANGUAGE)
        .split(['-', '_'])
        .next()
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_lowercase();
    AVAILABLE_LANGUAGES
        .iter()
        .find(|(supported, _)| *supported == base)
        .map(|(supported, _)| *supported)
        .unwrap_or(DEFAULT_LANGUAGE)
}

pub fn get_text_pack(code: Option<&str>) -> &'static TextPack {
    match normalize_language_code(code) {
        "en" => &ENGLISH_TEXTS,
        _ => &PERSIAN_TEXTS,
    }
}

/// Escape user-supplied text before it is embedded in HTML-formatted
/// messages.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub struct TextPack {
    // DM entry
    pub welcome: &'static str,
    pub welcome_admin_hint: &'static str,
    pub btn_apply: &'static str,
    pub btn_status: &'static str,
    pub btn_withdraw: &'static str,
    pub btn_language: &'static str,
    pub btn_admin_panel: &'static str,

    // application flow
    pub apply_already_member: &'static str,
    pub apply_duplicate: &'static str,
    pub flow_started: &'static str,
    pub flow_no_questions: &'static str,
    pub flow_choice_hint: &'static str,
    pub flow_invalid_choice: &'static str,
    pub flow_empty_answer: &'static str,
    pub flow_rate_limited: &'static str,
    pub flow_summary_header: &'static str,
    pub flow_submitted: &'static str,
    pub flow_submit_failed: &'static str,
    pub cancel_done: &'static str,
    pub cancel_nothing: &'static str,

    // status / withdraw
    pub status_none: &'static str,
    pub status_pending: &'static str,
    pub status_approved: &'static str,
    pub status_denied: &'static str,
    pub status_withdrawn: &'static str,
    pub status_note_suffix: &'static str,
    pub withdraw_done: &'static str,
    pub withdraw_none: &'static str,

    // language menu
    pub language_menu_title: &'static str,
    pub language_set: &'static str,
    pub language_closed: &'static str,
    pub btn_language_close: &'static str,

    // permissions
    pub admin_only: &'static str,
    pub owner_only: &'static str,

    // admin panel
    pub admin_panel_title: &'static str,
    pub btn_admin_view_applications: &'static str,
    pub btn_admin_view_members: &'static str,
    pub btn_admin_manage_admins: &'static str,
    pub btn_admin_manage_questions: &'static str,
    pub btn_back: &'static str,
    pub pending_empty: &'static str,
    pub pending_header: &'static str,
    pub members_empty: &'static str,
    pub members_header: &'static str,
    pub manage_admins_title: &'static str,
    pub btn_admin_add: &'static str,
    pub btn_admin_remove: &'static str,
    pub btn_admin_list: &'static str,
    pub admin_add_prompt: &'static str,
    pub admin_remove_prompt: &'static str,
    pub admin_added: &'static str,
    pub admin_add_duplicate: &'static str,
    pub admin_removed: &'static str,
    pub admin_remove_missing: &'static str,
    pub admin_invalid_id: &'static str,
    pub admins_header: &'static str,
    pub admins_empty: &'static str,

    // review
    pub review_forward_header: &'static str,
    pub review_note_prompt: &'static str,
    pub review_not_found: &'static str,
    pub review_done_admin: &'static str,
    pub review_skipped: &'static str,
    pub review_approved_applicant: &'static str,
    pub review_denied_applicant: &'static str,
    pub review_note_line: &'static str,
    pub btn_review_approve: &'static str,
    pub btn_review_deny: &'static str,
    pub btn_review_skip: &'static str,

    // question management
    pub questions_menu_title: &'static str,
    pub btn_question_add: &'static str,
    pub btn_question_import: &'static str,
    pub btn_question_export: &'static str,
    pub btn_question_reset: &'static str,
    pub question_row_edit: &'static str,
    pub question_row_delete: &'static str,
    pub question_add_prompt: &'static str,
    pub question_edit_prompt: &'static str,
    pub question_import_prompt: &'static str,
    pub question_delete_confirm: &'static str,
    pub question_reset_confirm: &'static str,
    pub question_saved: &'static str,
    pub question_deleted: &'static str,
    pub question_missing: &'static str,
    pub question_invalid_payload: &'static str,
    pub question_reset_done: &'static str,
    pub question_edit_cancelled: &'static str,
    pub question_export_header: &'static str,

    // group commands
    pub group_help: &'static str,
    pub group_help_admin: &'static str,
    pub myxp_summary: &'static str,
    pub myxp_none: &'static str,
    pub xp_leaderboard_header: &'static str,
    pub xp_leaderboard_empty: &'static str,
    pub cups_header: &'static str,
    pub cups_empty: &'static str,
    pub cup_entry_podium: &'static str,
    pub add_cup_usage: &'static str,
    pub add_cup_invalid: &'static str,
    pub cup_added: &'static str,
    pub addxp_usage: &'static str,
    pub addxp_done: &'static str,
    pub level_up: &'static str,
    pub btn_refresh: &'static str,

    // group panel
    pub panel_admins_only: &'static str,
    pub panel_title: &'static str,
    pub panel_closed: &'static str,
    pub panel_help: &'static str,
    pub btn_panel_xp: &'static str,
    pub btn_panel_cups: &'static str,
    pub btn_panel_admins: &'static str,
    pub btn_panel_settings: &'static str,
    pub btn_panel_close: &'static str,
    pub btn_panel_help: &'static str,
    pub btn_panel_back: &'static str,
    pub btn_panel_add_xp: &'static str,
    pub btn_panel_remove_xp: &'static str,
    pub btn_panel_xp_members: &'static str,
    pub btn_panel_cups_latest: &'static str,
    pub btn_panel_cups_help: &'static str,
    pub btn_panel_admins_list: &'static str,
    pub btn_panel_admins_help: &'static str,
    pub btn_panel_settings_tools: &'static str,
    pub btn_panel_settings_help: &'static str,
    pub panel_menu_xp: &'static str,
    pub panel_menu_cups: &'static str,
    pub panel_menu_admins: &'static str,
    pub panel_menu_settings: &'static str,
    pub panel_add_xp_prompt: &'static str,
    pub panel_remove_xp_prompt: &'static str,
    pub panel_prompt_cancelled: &'static str,
    pub panel_prompt_invalid: &'static str,
    pub panel_xp_adjusted: &'static str,
    pub panel_xp_members_header: &'static str,
    pub panel_xp_members_empty: &'static str,
    pub panel_cups_hint: &'static str,
    pub panel_admins_hint: &'static str,
    pub panel_settings_tools: &'static str,
    pub panel_settings_hint: &'static str,

    // personal panel
    pub btn_personal_profile: &'static str,
    pub btn_personal_leaderboard: &'static str,
    pub personal_panel_cooldown: &'static str,
    pub personal_profile_header: &'static str,
    pub personal_rank_line: &'static str,
    pub personal_rank_unranked: &'static str,
    pub personal_trophies_header: &'static str,
    pub personal_trophies_none: &'static str,
    pub personal_leaderboard_header: &'static str,

    // keywords
    pub skip_keyword: &'static str,
    pub cancel_keyword: &'static str,
    pub confirm_keyword: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_normalize_with_region_suffixes() {
        assert_eq!(normalize_language_code(Some("en-US")), "en");
        assert_eq!(normalize_language_code(Some("EN")), "en");
        assert_eq!(normalize_language_code(Some("fa")), "fa");
        assert_eq!(normalize_language_code(Some("de")), "fa");
        assert_eq!(normalize_language_code(None), "fa");
    }

    #[test]
    fn pack_selection_follows_normalization() {
        assert!(std::ptr::eq(get_text_pack(Some("en-GB")), &ENGLISH_TEXTS));
        assert!(std::ptr::eq(get_text_pack(Some("fr")), &PERSIAN_TEXTS));
    }

    #[test]
    fn html_escape_covers_markup_characters() {
        assert_eq!(escape_html("<b>&x</b>"), "&lt;b&gt;&amp;x&lt;/b&gt;");
    }
}
