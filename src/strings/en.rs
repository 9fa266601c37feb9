use super::TextPack;

pub static ENGLISH_TEXTS: TextPack = TextPack {
    welcome: "Hi {name}! This is the guild assistant. Use the buttons below to apply, check your application or change the language.",
    welcome_admin_hint: "\nYou are an admin: the admin panel button is available.",
    btn_apply: "Apply to the guild",
    btn_status: "Application status",
    btn_withdraw: "Withdraw application",
    btn_language: "Language",
    btn_admin_panel: "Admin panel",

    apply_already_member: "You are already a guild admin, no application needed.",
    apply_duplicate: "You already have a pending application. You can check its status or withdraw it.",
    flow_started: "Let's go through the application together. Send /cancel at any time to stop.",
    flow_no_questions: "There are no application questions configured right now. Please try again later.",
    flow_choice_hint: "Please answer with one of: {options}",
    flow_invalid_choice: "That is not one of the offered options. Please answer with one of: {options}",
    flow_empty_answer: "Please send a non-empty answer.",
    flow_rate_limited: "You are sending answers too quickly. Please wait a moment and try again.",
    flow_summary_header: "Here is what you submitted:",
    flow_submitted: "Your application has been submitted. The admins will review it soon.",
    flow_submit_failed: "Something went wrong while saving your application. Please start again with the apply button.",
    cancel_done: "Cancelled. Nothing from the interrupted step was kept.",
    cancel_nothing: "There was nothing to cancel.",

    status_none: "You have no application on file.",
    status_pending: "Your application is pending review.",
    status_approved: "Your application was approved. Welcome to the guild!",
    status_denied: "Your application was denied.",
    status_withdrawn: "You withdrew your application.",
    status_note_suffix: "\nReviewer note: {note}",
    withdraw_done: "Your application has been withdrawn.",
    withdraw_none: "You have no pending application to withdraw.",

    language_menu_title: "Pick your language:",
    language_set: "Language set to {language}.",
    language_closed: "Language menu closed.",
    btn_language_close: "Close",

    admin_only: "This action is limited to guild admins.",
    owner_only: "This action is limited to the bot owner.",

    admin_panel_title: "Admin panel. Pick a section:",
    btn_admin_view_applications: "Pending applications",
    btn_admin_view_members: "Approved members",
    btn_admin_manage_admins: "Manage admins",
    btn_admin_manage_questions: "Manage questions",
    btn_back: "Back",
    pending_empty: "No pending applications.",
    pending_header: "Pending applications:",
    members_empty: "No approved members yet.",
    members_header: "Approved members:",
    manage_admins_title: "Admin management:",
    btn_admin_add: "Promote",
    btn_admin_remove: "Demote",
    btn_admin_list: "List admins",
    admin_add_prompt: "Send the numeric user id to promote.",
    admin_remove_prompt: "Send the numeric user id to demote.",
    admin_added: "User {user_id} is now an admin.",
    admin_add_duplicate: "User {user_id} is already an admin.",
    admin_removed: "User {user_id} is no longer an admin.",
    admin_remove_missing: "User {user_id} is not an admin.",
    admin_invalid_id: "That does not look like a numeric user id. Try again or send /cancel.",
    admins_header: "Current admins:",
    admins_empty: "No admins registered yet.",

    review_forward_header: "New application from {name}:",
    review_note_prompt: "Reply with a note for {name}, or send \"{keyword}\" to finish without one.",
    review_not_found: "This application was already handled.",
    review_done_admin: "Done. {name} has been notified.",
    review_skipped: "Left for another reviewer.",
    review_approved_applicant: "Good news! Your guild application was approved.",
    review_denied_applicant: "Your guild application was denied.",
    review_note_line: "\nNote from the reviewers: {note}",
    btn_review_approve: "Approve",
    btn_review_deny: "Deny",
    btn_review_skip: "Skip",

    questions_menu_title: "Application questions ({count}). Edit or delete one, or use the tools below:",
    btn_question_add: "Add question",
    btn_question_import: "Import form",
    btn_question_export: "Export form",
    btn_question_reset: "Reset to defaults",
    question_row_edit: "Edit: {title}",
    question_row_delete: "Delete: {title}",
    question_add_prompt: "Send the new question as JSON, for example:\n{\"question_id\": \"clan_tag\", \"prompt\": \"What is your clan tag?\", \"order\": 9}\nSend /cancel to stop.",
    question_edit_prompt: "Send the replacement definition for \"{question}\" as JSON. Send /cancel to stop.",
    question_import_prompt: "Send the full form as a JSON array of question definitions. Send /cancel to stop.",
    question_delete_confirm: "Send \"{keyword}\" to delete \"{question}\", or /cancel to keep it.",
    question_reset_confirm: "Send \"{keyword}\" to discard the customized form and restore the defaults, or /cancel to keep it.",
    question_saved: "Question saved.",
    question_deleted: "Question deleted.",
    question_missing: "That question no longer exists.",
    question_invalid_payload: "That JSON did not parse as a question definition. Try again or send /cancel.",
    question_reset_done: "Form reset to the built-in defaults.",
    question_edit_cancelled: "Question editing cancelled.",
    question_export_header: "Current form as JSON:",

    group_help: "Guild bot commands:\n/myxp - your XP and level\n/xp - XP leaderboard\n/cups - latest cups\n/help - this message",
    group_help_admin: "\nAdmin commands:\n/add_cup title|description|podium,names\n/addxp user_id amount\n/panel - admin panel",
    myxp_summary: "{name}: level {level} with {xp} XP ({to_next} XP to the next level).",
    myxp_none: "No XP recorded for you in this group yet.",
    xp_leaderboard_header: "XP leaderboard:",
    xp_leaderboard_empty: "No XP recorded in this group yet.",
    cups_header: "Latest cups:",
    cups_empty: "No cups recorded in this group yet.",
    cup_entry_podium: "Podium: {podium}",
    add_cup_usage: "Usage: /add_cup title|description|comma,separated,podium",
    add_cup_invalid: "Cup rejected: title up to 100 characters, description up to 300, at most 10 podium entries of up to 100 characters each.",
    cup_added: "Cup \"{title}\" recorded.",
    addxp_usage: "Usage: /addxp user_id amount",
    addxp_done: "Adjusted XP of user {user_id} by {amount}; new total {total}.",
    level_up: "{name} reached level {level}!",
    btn_refresh: "Refresh",

    panel_admins_only: "The group panel is for guild admins.",
    panel_title: "Group admin panel:",
    panel_closed: "Panel closed.",
    panel_help: "Pick a section to manage XP, cups, admins or settings. Close removes the panel message.",
    btn_panel_xp: "XP",
    btn_panel_cups: "Cups",
    btn_panel_admins: "Admins",
    btn_panel_settings: "Settings",
    btn_panel_close: "Close",
    btn_panel_help: "Help",
    btn_panel_back: "Back",
    btn_panel_add_xp: "Add XP",
    btn_panel_remove_xp: "Remove XP",
    btn_panel_xp_members: "Tracked members",
    btn_panel_cups_latest: "Latest cups",
    btn_panel_cups_help: "How cups work",
    btn_panel_admins_list: "List admins",
    btn_panel_admins_help: "How admins work",
    btn_panel_settings_tools: "Tools",
    btn_panel_settings_help: "About settings",
    panel_menu_xp: "XP management:",
    panel_menu_cups: "Cup management:",
    panel_menu_admins: "Admin overview:",
    panel_menu_settings: "Group settings:",
    panel_add_xp_prompt: "Send \"user_id amount\" to add XP, or \"{keyword}\" to cancel.",
    panel_remove_xp_prompt: "Send \"user_id amount\" to remove XP, or \"{keyword}\" to cancel.",
    panel_prompt_cancelled: "Okay, nothing changed.",
    panel_prompt_invalid: "Expected \"user_id amount\" with numbers. Try again or send \"{keyword}\".",
    panel_xp_adjusted: "XP of user {user_id} is now {total}.",
    panel_xp_members_header: "Members with tracked XP:",
    panel_xp_members_empty: "No members tracked yet.",
    panel_cups_hint: "Record cups with /add_cup title|description|podium,names.",
    panel_admins_hint: "Admins are managed from the bot's private admin panel.",
    panel_settings_tools: "Available tools: /addxp, /add_cup and this panel.",
    panel_settings_hint: "XP rates and cooldowns are set in the bot configuration file.",

    btn_personal_profile: "My profile",
    btn_personal_leaderboard: "Leaderboard",
    personal_panel_cooldown: "Your panel was just sent. Try again in a moment.",
    personal_profile_header: "Profile of {name}",
    personal_rank_line: "Rank #{rank} of {count} tracked members",
    personal_rank_unranked: "Not ranked yet",
    personal_trophies_header: "Trophies:",
    personal_trophies_none: "No trophies yet.",
    personal_leaderboard_header: "Top members:",

    skip_keyword: "skip",
    cancel_keyword: "cancel",
    confirm_keyword: "confirm",
};
