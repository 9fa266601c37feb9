//! # Group-Chat Handlers
//!
//! Activity-based XP with per-member cooldowns and milestone notices,
//! the `/xp` and `/cups` leaderboards with refresh buttons, cup
//! recording, the admin group panel with its sub-menus and prompted XP
//! adjustments, and the per-member personal panel.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::application::context::PanelPrompt;
use crate::application::dispatcher::{action_of, HandlerAction, SharedContext};
use crate::application::leveling::level_progress;
use crate::application::predicate::{CallbackKind, Predicate};
use crate::domain::callback::{
    BoardKind, CallbackAction, GroupPanelOp, GroupPanelScope, PanelView, PersonalPanelRequest,
};
use crate::domain::config::{CupsConfig, XpConfig};
use crate::domain::traits::Transport;
use crate::domain::types::{IncomingMessage, Sender, Update, UserId};
use crate::infrastructure::storage::Storage;
use crate::interface::keyboards;
use crate::strings::{escape_html, get_text_pack, TextPack};

const PERSONAL_PANEL_COOLDOWN: Duration = Duration::from_secs(30);
const PERSONAL_PANEL_TTL: Duration = Duration::from_secs(60);
const PROGRESS_BAR_WIDTH: usize = 10;
const CUP_TITLE_LIMIT: usize = 100;
const CUP_DESCRIPTION_LIMIT: usize = 300;
const CUP_PODIUM_LIMIT: usize = 10;
const CUP_PODIUM_ENTRY_LIMIT: usize = 100;

pub struct GroupHandlers {
    storage: Arc<Storage>,
    transport: Arc<dyn Transport>,
    owner_id: UserId,
    xp: XpConfig,
    cups: CupsConfig,
    /// Last rewarded message per (chat, member).
    message_rewards: Mutex<HashMap<(String, UserId), Instant>>,
    /// Last milestone notice per (chat, member).
    milestone_notices: Mutex<HashMap<(String, UserId), Instant>>,
}

fn progress_bar(xp_into_level: i64, span: i64) -> String {
    let filled = if span <= 0 {
        PROGRESS_BAR_WIDTH
    } else {
        ((xp_into_level.max(0) as f64 / span as f64) * PROGRESS_BAR_WIDTH as f64) as usize
    }
    .min(PROGRESS_BAR_WIDTH);
    let mut bar = "▰".repeat(filled);
    bar.push_str(&"▱".repeat(PROGRESS_BAR_WIDTH - filled));
    bar
}

impl GroupHandlers {
    pub fn new(
        storage: Arc<Storage>,
        transport: Arc<dyn Transport>,
        owner_id: UserId,
        xp: XpConfig,
        cups: CupsConfig,
    ) -> Self {
        Self {
            storage,
            transport,
            owner_id,
            xp,
            cups,
            message_rewards: Mutex::new(HashMap::new()),
            milestone_notices: Mutex::new(HashMap::new()),
        }
    }

    pub fn bindings(self: &Arc<Self>) -> Vec<(Predicate, HandlerAction)> {
        let group = || Predicate::Group;
        vec![
            (
                group()
                    .and(Predicate::TextPresent)
                    .and(Predicate::CommandPrefix.not()),
                action_of(self, Self::on_activity),
            ),
            (
                group().and(Predicate::command("help")),
                action_of(self, Self::on_help),
            ),
            (
                group().and(Predicate::command("myxp")),
                action_of(self, Self::on_myxp),
            ),
            (
                group().and(Predicate::command("xp")),
                action_of(self, Self::on_xp_board),
            ),
            (
                group().and(Predicate::command("cups")),
                action_of(self, Self::on_cups_board),
            ),
            (
                group().and(Predicate::command("add_cup")),
                action_of(self, Self::on_add_cup),
            ),
            (
                group().and(Predicate::command("addxp")),
                action_of(self, Self::on_addxp),
            ),
            (
                group().and(Predicate::command("panel")),
                action_of(self, Self::on_panel),
            ),
            (
                group().and(Predicate::command("profile")),
                action_of(self, Self::on_profile_command),
            ),
            (
                Predicate::callback(CallbackKind::LeaderboardRefresh),
                action_of(self, Self::on_leaderboard_refresh),
            ),
            (
                Predicate::callback(CallbackKind::GroupPanel),
                action_of(self, Self::on_group_panel),
            ),
            (
                Predicate::callback(CallbackKind::PersonalPanel),
                action_of(self, Self::on_personal_panel),
            ),
        ]
    }

    async fn is_admin(&self, user_id: UserId) -> bool {
        user_id == self.owner_id || self.storage.is_admin(user_id).await
    }

    /// Group-facing texts follow the conversation's language, which
    /// defaults to Persian.
    async fn chat_texts(&self, context: &SharedContext, chat_id: &str) -> &'static TextPack {
        let preferred = {
            let mut store = context.store.lock().await;
            store.chat(chat_id).preferred_language.clone()
        };
        get_text_pack(preferred.as_deref())
    }

    async fn actor_texts(&self, context: &SharedContext, sender: &Sender) -> &'static TextPack {
        let preferred = {
            let mut store = context.store.lock().await;
            store.actor(sender.id).preferred_language.clone()
        };
        get_text_pack(preferred.as_deref().or(sender.language_code.as_deref()))
    }

    async fn send(&self, chat_id: &str, text: &str) -> Result<()> {
        self.transport.send_message(chat_id, text, None).await?;
        Ok(())
    }

    // --- activity and XP ---

    async fn on_activity(self: Arc<Self>, update: Update, context: SharedContext) -> Result<()> {
        let Some(message) = update.message() else {
            return Ok(());
        };
        let message = message.clone();
        let Some(text) = message.text.clone() else {
            return Ok(());
        };
        let texts = self.chat_texts(&context, &message.chat_id).await;

        // A prompted panel action consumes this member's next message.
        let prompt = {
            let mut store = context.store.lock().await;
            store
                .chat(&message.chat_id)
                .panel_prompts
                .get(&message.sender.id)
                .copied()
        };
        if let Some(prompt) = prompt {
            return self
                .consume_panel_prompt(&message, prompt, text.trim(), texts, &context)
                .await;
        }

        self.award_activity_xp(&message, &text, texts).await
    }

    async fn consume_panel_prompt(
        &self,
        message: &IncomingMessage,
        prompt: PanelPrompt,
        text: &str,
        texts: &'static TextPack,
        context: &SharedContext,
    ) -> Result<()> {
        if text.eq_ignore_ascii_case(texts.cancel_keyword) {
            context
                .store
                .lock()
                .await
                .chat(&message.chat_id)
                .panel_prompts
                .remove(&message.sender.id);
            return self.send(&message.chat_id, texts.panel_prompt_cancelled).await;
        }

        let mut parts = text.split_whitespace();
        let parsed = match (parts.next(), parts.next(), parts.next()) {
            (Some(user), Some(amount), None) => {
                match (user.parse::<UserId>(), amount.parse::<i64>()) {
                    (Ok(user), Ok(amount)) => Some((user, amount)),
                    _ => None,
                }
            }
            _ => None,
        };
        let Some((user_id, amount)) = parsed else {
            // Prompt stays armed for a retry.
            return self
                .send(
                    &message.chat_id,
                    &texts
                        .panel_prompt_invalid
                        .replace("{keyword}", texts.cancel_keyword),
                )
                .await;
        };

        context
            .store
            .lock()
            .await
            .chat(&message.chat_id)
            .panel_prompts
            .remove(&message.sender.id);
        let delta = match prompt {
            PanelPrompt::AddXp => amount.abs(),
            PanelPrompt::RemoveXp => -amount.abs(),
        };
        let total = self
            .storage
            .add_xp(&message.chat_id, user_id, delta, None, None)
            .await?;
        self.send(
            &message.chat_id,
            &texts
                .panel_xp_adjusted
                .replace("{user_id}", &user_id.to_string())
                .replace("{total}", &total.to_string()),
        )
        .await
    }

    async fn award_activity_xp(
        &self,
        message: &IncomingMessage,
        text: &str,
        texts: &'static TextPack,
    ) -> Result<()> {
        let characters = text.chars().count() as f64;
        let reward = ((characters * self.xp.message_character_reward) as i64)
            .min(self.xp.message_reward_limit);
        if reward <= 0 {
            return Ok(());
        }

        let key = (message.chat_id.clone(), message.sender.id);
        let cooldown = Duration::from_secs_f64(self.xp.message_reward_cooldown.max(0.0));
        {
            let mut rewards = self.message_rewards.lock().await;
            let now = Instant::now();
            if let Some(last) = rewards.get(&key) {
                if now.duration_since(*last) < cooldown {
                    return Ok(());
                }
            }
            rewards.insert(key.clone(), now);
        }

        let total = self
            .storage
            .add_xp(
                &message.chat_id,
                message.sender.id,
                reward,
                message.sender.full_name.clone(),
                message.sender.username.clone(),
            )
            .await?;

        let before = level_progress(total - reward).level;
        let after = level_progress(total).level;
        let interval = self.xp.milestone_interval.max(1) as u32;
        if after > before && after % interval == 0 {
            let notice_cooldown =
                Duration::from_secs_f64(self.xp.notification_cooldown.max(0.0));
            let mut notices = self.milestone_notices.lock().await;
            let now = Instant::now();
            let due = notices
                .get(&key)
                .is_none_or(|last| now.duration_since(*last) >= notice_cooldown);
            if due {
                notices.insert(key, now);
                drop(notices);
                self.send(
                    &message.chat_id,
                    &texts
                        .level_up
                        .replace("{name}", &escape_html(&message.sender.display_name()))
                        .replace("{level}", &after.to_string()),
                )
                .await?;
            }
        }
        Ok(())
    }

    // --- commands ---

    async fn on_help(self: Arc<Self>, update: Update, context: SharedContext) -> Result<()> {
        let texts = self.chat_texts(&context, update.chat_id()).await;
        let mut text = texts.group_help.to_string();
        if self.is_admin(update.sender().id).await {
            text.push_str(texts.group_help_admin);
        }
        self.send(update.chat_id(), &text).await
    }

    async fn on_myxp(self: Arc<Self>, update: Update, context: SharedContext) -> Result<()> {
        let texts = self.chat_texts(&context, update.chat_id()).await;
        let sender = update.sender().clone();
        let Some(xp) = self.storage.user_xp(update.chat_id(), sender.id).await else {
            return self.send(update.chat_id(), texts.myxp_none).await;
        };
        let progress = level_progress(xp);
        let text = texts
            .myxp_summary
            .replace("{name}", &escape_html(&sender.display_name()))
            .replace("{level}", &progress.level.to_string())
            .replace("{xp}", &xp.to_string())
            .replace("{to_next}", &progress.xp_to_next.to_string());
        self.send(update.chat_id(), &text).await
    }

    async fn render_board(&self, board: BoardKind, chat_id: &str, texts: &'static TextPack) -> String {
        match board {
            BoardKind::Xp => {
                let entries = self
                    .storage
                    .xp_leaderboard(chat_id, self.xp.leaderboard_size)
                    .await;
                if entries.is_empty() {
                    return texts.xp_leaderboard_empty.to_string();
                }
                let mut text = texts.xp_leaderboard_header.to_string();
                for (rank, (user_id, xp)) in entries.iter().enumerate() {
                    let name = self
                        .storage
                        .display_name(*user_id)
                        .await
                        .unwrap_or_else(|| user_id.to_string());
                    text.push_str(&format!("\n{}. {}: {xp}", rank + 1, escape_html(&name)));
                }
                text
            }
            BoardKind::Cups => {
                let cups = self.storage.cups(chat_id, self.cups.leaderboard_size).await;
                if cups.is_empty() {
                    return texts.cups_empty.to_string();
                }
                let mut text = texts.cups_header.to_string();
                for cup in cups {
                    text.push_str(&format!(
                        "\n\n🏆 {} ({})\n{}",
                        escape_html(&cup.title),
                        cup.created_at,
                        escape_html(&cup.description)
                    ));
                    if !cup.podium.is_empty() {
                        text.push('\n');
                        text.push_str(
                            &texts
                                .cup_entry_podium
                                .replace("{podium}", &escape_html(&cup.podium.join("، "))),
                        );
                    }
                }
                text
            }
        }
    }

    async fn on_xp_board(self: Arc<Self>, update: Update, context: SharedContext) -> Result<()> {
        let texts = self.chat_texts(&context, update.chat_id()).await;
        let text = self.render_board(BoardKind::Xp, update.chat_id(), texts).await;
        self.transport
            .send_message(
                update.chat_id(),
                &text,
                Some(keyboards::leaderboard_refresh_keyboard(
                    texts,
                    BoardKind::Xp,
                    update.chat_id(),
                )),
            )
            .await?;
        Ok(())
    }

    async fn on_cups_board(self: Arc<Self>, update: Update, context: SharedContext) -> Result<()> {
        let texts = self.chat_texts(&context, update.chat_id()).await;
        let text = self.render_board(BoardKind::Cups, update.chat_id(), texts).await;
        self.transport
            .send_message(
                update.chat_id(),
                &text,
                Some(keyboards::leaderboard_refresh_keyboard(
                    texts,
                    BoardKind::Cups,
                    update.chat_id(),
                )),
            )
            .await?;
        Ok(())
    }

    async fn on_leaderboard_refresh(
        self: Arc<Self>,
        update: Update,
        context: SharedContext,
    ) -> Result<()> {
        let Some(press) = update.callback() else {
            return Ok(());
        };
        let CallbackAction::LeaderboardRefresh { board, chat_id } = press.action.clone() else {
            return Ok(());
        };
        let texts = self.chat_texts(&context, &chat_id).await;
        let text = self.render_board(board, &chat_id, texts).await;
        self.transport
            .edit_message(
                &press.chat_id,
                &press.message_id,
                &text,
                Some(keyboards::leaderboard_refresh_keyboard(texts, board, &chat_id)),
            )
            .await
    }

    async fn on_add_cup(self: Arc<Self>, update: Update, context: SharedContext) -> Result<()> {
        let Some(message) = update.message() else {
            return Ok(());
        };
        let texts = self.chat_texts(&context, &message.chat_id).await;
        if !self.is_admin(message.sender.id).await {
            return self.send(&message.chat_id, texts.admin_only).await;
        }

        let argument = message
            .text
            .as_deref()
            .and_then(|text| text.split_once(' '))
            .map(|(_, rest)| rest.trim())
            .unwrap_or_default();
        let parts: Vec<&str> = argument.split('|').map(str::trim).collect();
        let [title, description, podium_raw] = parts.as_slice() else {
            return self.send(&message.chat_id, texts.add_cup_usage).await;
        };
        let podium: Vec<String> = podium_raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();

        let valid = !title.is_empty()
            && title.chars().count() <= CUP_TITLE_LIMIT
            && description.chars().count() <= CUP_DESCRIPTION_LIMIT
            && podium.len() <= CUP_PODIUM_LIMIT
            && podium
                .iter()
                .all(|entry| entry.chars().count() <= CUP_PODIUM_ENTRY_LIMIT);
        if !valid {
            return self.send(&message.chat_id, texts.add_cup_invalid).await;
        }

        self.storage
            .add_cup(
                &message.chat_id,
                title.to_string(),
                description.to_string(),
                podium,
            )
            .await?;
        self.send(
            &message.chat_id,
            &texts.cup_added.replace("{title}", &escape_html(title)),
        )
        .await
    }

    async fn on_addxp(self: Arc<Self>, update: Update, context: SharedContext) -> Result<()> {
        let Some(message) = update.message() else {
            return Ok(());
        };
        let texts = self.chat_texts(&context, &message.chat_id).await;
        if !self.is_admin(message.sender.id).await {
            return self.send(&message.chat_id, texts.admin_only).await;
        }
        let args = message.args();
        let parsed = match args.as_slice() {
            [user, amount] => match (user.parse::<UserId>(), amount.parse::<i64>()) {
                (Ok(user), Ok(amount)) => Some((user, amount)),
                _ => None,
            },
            _ => None,
        };
        let Some((user_id, amount)) = parsed else {
            return self.send(&message.chat_id, texts.addxp_usage).await;
        };
        let total = self
            .storage
            .add_xp(&message.chat_id, user_id, amount, None, None)
            .await?;
        self.send(
            &message.chat_id,
            &texts
                .addxp_done
                .replace("{user_id}", &user_id.to_string())
                .replace("{amount}", &amount.to_string())
                .replace("{total}", &total.to_string()),
        )
        .await
    }

    // --- group panel ---

    async fn on_panel(self: Arc<Self>, update: Update, context: SharedContext) -> Result<()> {
        let texts = self.chat_texts(&context, update.chat_id()).await;
        if !self.is_admin(update.sender().id).await {
            return self.send(update.chat_id(), texts.panel_admins_only).await;
        }
        context
            .store
            .lock()
            .await
            .chat(update.chat_id())
            .active_panel_menu = Some("root".to_string());
        self.transport
            .send_message(
                update.chat_id(),
                texts.panel_title,
                Some(keyboards::group_panel_keyboard(texts, "root")),
            )
            .await?;
        Ok(())
    }

    fn panel_menu_title(texts: &'static TextPack, menu: &str) -> &'static str {
        match menu {
            "xp" => texts.panel_menu_xp,
            "cups" => texts.panel_menu_cups,
            "admins" => texts.panel_menu_admins,
            "settings" => texts.panel_menu_settings,
            _ => texts.panel_title,
        }
    }

    async fn on_group_panel(self: Arc<Self>, update: Update, context: SharedContext) -> Result<()> {
        let Some(press) = update.callback() else {
            return Ok(());
        };
        let CallbackAction::GroupPanel(scope) = press.action.clone() else {
            return Ok(());
        };
        let press = press.clone();
        let texts = self.chat_texts(&context, &press.chat_id).await;
        if !self.is_admin(press.sender.id).await {
            return self.send(&press.chat_id, texts.panel_admins_only).await;
        }

        match scope {
            GroupPanelScope::Close => {
                context
                    .store
                    .lock()
                    .await
                    .chat(&press.chat_id)
                    .active_panel_menu = None;
                if self
                    .transport
                    .delete_message(&press.chat_id, &press.message_id)
                    .await
                    .is_err()
                {
                    self.transport
                        .edit_message(&press.chat_id, &press.message_id, texts.panel_closed, None)
                        .await?;
                }
                Ok(())
            }
            GroupPanelScope::Refresh => {
                let menu = {
                    let mut store = context.store.lock().await;
                    store
                        .chat(&press.chat_id)
                        .active_panel_menu
                        .clone()
                        .unwrap_or_else(|| "root".to_string())
                };
                self.transport
                    .edit_message(
                        &press.chat_id,
                        &press.message_id,
                        Self::panel_menu_title(texts, &menu),
                        Some(keyboards::group_panel_keyboard(texts, &menu)),
                    )
                    .await
            }
            GroupPanelScope::Help => self.send(&press.chat_id, texts.panel_help).await,
            GroupPanelScope::Menu(menu) => {
                context
                    .store
                    .lock()
                    .await
                    .chat(&press.chat_id)
                    .active_panel_menu = Some(menu.clone());
                self.transport
                    .edit_message(
                        &press.chat_id,
                        &press.message_id,
                        Self::panel_menu_title(texts, &menu),
                        Some(keyboards::group_panel_keyboard(texts, &menu)),
                    )
                    .await
            }
            GroupPanelScope::Action(op) => self.run_panel_action(&press.chat_id, press.sender.id, op, texts, &context).await,
        }
    }

    async fn run_panel_action(
        &self,
        chat_id: &str,
        sender_id: UserId,
        op: GroupPanelOp,
        texts: &'static TextPack,
        context: &SharedContext,
    ) -> Result<()> {
        match op {
            GroupPanelOp::AddXp | GroupPanelOp::RemoveXp => {
                let (prompt, text) = if op == GroupPanelOp::AddXp {
                    (PanelPrompt::AddXp, texts.panel_add_xp_prompt)
                } else {
                    (PanelPrompt::RemoveXp, texts.panel_remove_xp_prompt)
                };
                context
                    .store
                    .lock()
                    .await
                    .chat(chat_id)
                    .panel_prompts
                    .insert(sender_id, prompt);
                self.send(
                    chat_id,
                    &text.replace("{keyword}", texts.cancel_keyword),
                )
                .await
            }
            GroupPanelOp::XpMembers => {
                let entries = self.storage.xp_leaderboard(chat_id, usize::MAX).await;
                if entries.is_empty() {
                    return self.send(chat_id, texts.panel_xp_members_empty).await;
                }
                let mut text = texts.panel_xp_members_header.to_string();
                for (user_id, xp) in entries {
                    let name = self
                        .storage
                        .display_name(user_id)
                        .await
                        .unwrap_or_else(|| user_id.to_string());
                    text.push_str(&format!("\n• {} ({user_id}): {xp}", escape_html(&name)));
                }
                self.send(chat_id, &text).await
            }
            GroupPanelOp::CupsLatest => {
                let text = self.render_board(BoardKind::Cups, chat_id, texts).await;
                self.send(chat_id, &text).await
            }
            GroupPanelOp::CupsHelp => self.send(chat_id, texts.panel_cups_hint).await,
            GroupPanelOp::AdminsList => {
                let admins = self.storage.admin_details().await;
                if admins.is_empty() {
                    return self.send(chat_id, texts.admins_empty).await;
                }
                let mut text = texts.admins_header.to_string();
                for admin in admins {
                    let name = admin
                        .full_name
                        .or(admin.username)
                        .unwrap_or_else(|| admin.user_id.to_string());
                    text.push_str(&format!("\n• {} ({})", escape_html(&name), admin.user_id));
                }
                self.send(chat_id, &text).await
            }
            GroupPanelOp::AdminsHelp => self.send(chat_id, texts.panel_admins_hint).await,
            GroupPanelOp::SettingsTools => self.send(chat_id, texts.panel_settings_tools).await,
            GroupPanelOp::SettingsHelp => self.send(chat_id, texts.panel_settings_hint).await,
        }
    }

    // --- personal panel ---

    async fn on_profile_command(
        self: Arc<Self>,
        update: Update,
        context: SharedContext,
    ) -> Result<()> {
        let Some(message) = update.message() else {
            return Ok(());
        };
        let message = message.clone();
        self.send_personal_panel(&message.chat_id, &message.sender, PanelView::Profile, &context)
            .await
    }

    async fn compose_panel_view(
        &self,
        chat_id: &str,
        sender: &Sender,
        view: PanelView,
        texts: &'static TextPack,
    ) -> String {
        match view {
            PanelView::Profile => self.compose_profile(chat_id, sender, texts).await,
            PanelView::Leaderboard => {
                let entries = self
                    .storage
                    .xp_leaderboard(chat_id, self.xp.leaderboard_size)
                    .await;
                if entries.is_empty() {
                    return texts.xp_leaderboard_empty.to_string();
                }
                let mut text = texts.personal_leaderboard_header.to_string();
                for (rank, (user_id, xp)) in entries.iter().enumerate() {
                    let name = self
                        .storage
                        .display_name(*user_id)
                        .await
                        .unwrap_or_else(|| user_id.to_string());
                    text.push_str(&format!("\n{}. {}: {xp}", rank + 1, escape_html(&name)));
                }
                text
            }
        }
    }

    async fn compose_profile(
        &self,
        chat_id: &str,
        sender: &Sender,
        texts: &'static TextPack,
    ) -> String {
        let xp = self.storage.user_xp(chat_id, sender.id).await.unwrap_or(0);
        let progress = level_progress(xp);
        let span = progress.next_threshold - progress.current_threshold;
        let (rank, tracked) = self.storage.xp_rank(chat_id, sender.id).await;

        let mut text = texts
            .personal_profile_header
            .replace("{name}", &escape_html(&sender.display_name()));
        text.push_str(&format!(
            "\n{} {}/{}",
            progress_bar(progress.xp_into_level, span),
            xp,
            progress.next_threshold
        ));
        text.push('\n');
        match rank {
            Some(rank) => text.push_str(
                &texts
                    .personal_rank_line
                    .replace("{rank}", &rank.to_string())
                    .replace("{count}", &tracked.to_string()),
            ),
            None => text.push_str(texts.personal_rank_unranked),
        }

        // Trophies: cup podium entries naming this member.
        let needles: Vec<String> = [
            Some(sender.id.to_string()),
            sender.username.clone(),
            sender.full_name.clone(),
        ]
        .into_iter()
        .flatten()
        .map(|needle| needle.to_lowercase())
        .collect();
        let cups = self.storage.cups(chat_id, usize::MAX).await;
        let trophies: Vec<String> = cups
            .iter()
            .filter(|cup| {
                cup.podium
                    .iter()
                    .any(|entry| needles.contains(&entry.trim().to_lowercase()))
            })
            .map(|cup| cup.title.clone())
            .collect();
        text.push('\n');
        if trophies.is_empty() {
            text.push_str(texts.personal_trophies_none);
        } else {
            text.push_str(texts.personal_trophies_header);
            for title in trophies {
                text.push_str(&format!("\n🏆 {}", escape_html(&title)));
            }
        }
        text
    }

    async fn send_personal_panel(
        &self,
        chat_id: &str,
        sender: &Sender,
        view: PanelView,
        context: &SharedContext,
    ) -> Result<()> {
        let texts = self.actor_texts(context, sender).await;
        {
            let mut store = context.store.lock().await;
            let panel = &mut store.actor(sender.id).panel;
            if panel
                .last_sent
                .is_some_and(|last| last.elapsed() < PERSONAL_PANEL_COOLDOWN)
            {
                drop(store);
                return self.send(chat_id, texts.personal_panel_cooldown).await;
            }
            panel.last_sent = Some(Instant::now());
            panel.last_view = Some(view);
        }

        let text = self.compose_panel_view(chat_id, sender, view, texts).await;
        let message_id = self
            .transport
            .send_message(
                chat_id,
                &text,
                Some(keyboards::personal_panel_keyboard(texts, chat_id, Some(view))),
            )
            .await?;

        // Panels are ephemeral: remove them after a minute.
        if let Some(message_id) = message_id {
            let transport = Arc::clone(&self.transport);
            let chat_id = chat_id.to_string();
            tokio::spawn(async move {
                tokio::time::sleep(PERSONAL_PANEL_TTL).await;
                if let Err(error) = transport.delete_message(&chat_id, &message_id).await {
                    tracing::debug!("Failed to remove expired panel: {error:#}");
                }
            });
        }
        Ok(())
    }

    async fn on_personal_panel(
        self: Arc<Self>,
        update: Update,
        context: SharedContext,
    ) -> Result<()> {
        let Some(press) = update.callback() else {
            return Ok(());
        };
        let CallbackAction::PersonalPanel { request, chat_id } = press.action.clone() else {
            return Ok(());
        };
        let press = press.clone();
        let sender = press.sender.clone();
        let texts = self.actor_texts(&context, &sender).await;

        let view = match request {
            PersonalPanelRequest::View(view) => view,
            PersonalPanelRequest::Refresh(view) => {
                let remembered = {
                    let mut store = context.store.lock().await;
                    store.actor(sender.id).panel.last_view
                };
                view.or(remembered).unwrap_or(PanelView::Profile)
            }
        };
        context.store.lock().await.actor(sender.id).panel.last_view = Some(view);

        let text = self.compose_panel_view(&chat_id, &sender, view, texts).await;
        self.transport
            .edit_message(
                &press.chat_id,
                &press.message_id,
                &text,
                Some(keyboards::personal_panel_keyboard(texts, &chat_id, Some(view))),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dispatcher::Dispatcher;
    use crate::domain::types::{CallbackPress, ChatKind, Keypad};
    use crate::strings::PERSIAN_TEXTS;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(String, String, Option<Keypad>)>>,
        edits: Mutex<Vec<(String, String, String)>>,
        counter: AtomicUsize,
    }

    impl RecordingTransport {
        async fn last_text(&self) -> String {
            self.sent
                .lock()
                .await
                .last()
                .map(|(_, text, _)| text.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn fetch(&self, _cursor: Option<&str>) -> Result<(Vec<Value>, Option<String>)> {
            Ok((Vec::new(), None))
        }

        async fn send_message(
            &self,
            chat_id: &str,
            text: &str,
            keypad: Option<Keypad>,
        ) -> Result<Option<String>> {
            self.sent
                .lock()
                .await
                .push((chat_id.to_string(), text.to_string(), keypad));
            let id = self.counter.fetch_add(1, Ordering::SeqCst);
            Ok(Some(format!("sent-{id}")))
        }

        async fn edit_message(
            &self,
            chat_id: &str,
            message_id: &str,
            text: &str,
            _keypad: Option<Keypad>,
        ) -> Result<()> {
            self.edits.lock().await.push((
                chat_id.to_string(),
                message_id.to_string(),
                text.to_string(),
            ));
            Ok(())
        }

        async fn delete_message(&self, _chat_id: &str, _message_id: &str) -> Result<()> {
            Ok(())
        }
    }

    struct Fixture {
        transport: Arc<RecordingTransport>,
        storage: Arc<Storage>,
        dispatcher: Dispatcher,
    }

    fn fixture() -> Fixture {
        let storage = Arc::new(Storage::in_memory());
        let transport = Arc::new(RecordingTransport::default());
        let handlers = Arc::new(GroupHandlers::new(
            storage.clone(),
            transport.clone() as Arc<dyn Transport>,
            1,
            XpConfig::default(),
            CupsConfig::default(),
        ));
        let mut dispatcher = Dispatcher::new(SharedContext::new());
        for (predicate, action) in handlers.bindings() {
            dispatcher.register(predicate, action);
        }
        Fixture {
            transport,
            storage,
            dispatcher,
        }
    }

    fn member(id: UserId) -> Sender {
        let mut sender = Sender::new(id);
        sender.full_name = Some(format!("Member {id}"));
        sender
    }

    fn group_text(sender: &Sender, text: &str) -> Update {
        Update::Message(IncomingMessage {
            id: "m".into(),
            chat_id: "g1".into(),
            chat_kind: ChatKind::Group,
            sender: sender.clone(),
            text: Some(text.to_string()),
        })
    }

    fn press(sender: &Sender, message_id: &str, data: &str) -> Update {
        Update::CallbackPress(CallbackPress {
            id: message_id.to_string(),
            chat_id: "g1".to_string(),
            chat_kind: ChatKind::Group,
            message_id: message_id.to_string(),
            sender: sender.clone(),
            action: CallbackAction::decode(data),
            raw: data.to_string(),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn activity_awards_capped_xp_with_cooldown() {
        let fx = fixture();
        let sender = member(10);

        // 200 characters at 0.5 XP each would be 100, capped at 25.
        fx.dispatcher.dispatch(group_text(&sender, &"x".repeat(200))).await;
        assert_eq!(fx.storage.user_xp("g1", 10).await, Some(25));

        // Within the cooldown nothing further accrues.
        fx.dispatcher.dispatch(group_text(&sender, &"y".repeat(200))).await;
        assert_eq!(fx.storage.user_xp("g1", 10).await, Some(25));

        tokio::time::advance(Duration::from_secs(21)).await;
        fx.dispatcher.dispatch(group_text(&sender, &"z".repeat(200))).await;
        assert_eq!(fx.storage.user_xp("g1", 10).await, Some(50));
    }

    #[tokio::test]
    async fn panel_is_admins_only() {
        let fx = fixture();
        fx.dispatcher.dispatch(group_text(&member(10), "/panel")).await;
        assert_eq!(fx.transport.last_text().await, PERSIAN_TEXTS.panel_admins_only);

        fx.dispatcher.dispatch(group_text(&member(1), "/panel")).await;
        assert_eq!(fx.transport.last_text().await, PERSIAN_TEXTS.panel_title);
    }

    #[tokio::test]
    async fn panel_prompt_adjusts_xp_from_the_next_message() {
        let fx = fixture();
        let admin = member(1);

        fx.dispatcher.dispatch(press(&admin, "p1", "group_panel:menu:xp")).await;
        fx.dispatcher
            .dispatch(press(&admin, "p1", "group_panel:action:add_xp"))
            .await;

        // Malformed argument keeps the prompt armed.
        fx.dispatcher.dispatch(group_text(&admin, "ten points")).await;
        assert_eq!(fx.storage.user_xp("g1", 10).await, None);

        fx.dispatcher.dispatch(group_text(&admin, "10 30")).await;
        assert_eq!(fx.storage.user_xp("g1", 10).await, Some(30));

        // Prompt consumed: the next message is plain activity again.
        fx.dispatcher.dispatch(group_text(&admin, "hello everyone")).await;
        assert!(fx.storage.user_xp("g1", 10).await == Some(30));
    }

    #[tokio::test]
    async fn addxp_command_requires_admin_and_reports_total() {
        let fx = fixture();
        fx.dispatcher.dispatch(group_text(&member(10), "/addxp 5 40")).await;
        assert_eq!(fx.transport.last_text().await, PERSIAN_TEXTS.admin_only);

        fx.dispatcher.dispatch(group_text(&member(1), "/addxp 5 40")).await;
        assert_eq!(fx.storage.user_xp("g1", 5).await, Some(40));

        fx.dispatcher.dispatch(group_text(&member(1), "/addxp 5 -100")).await;
        assert_eq!(fx.storage.user_xp("g1", 5).await, Some(0));
    }

    #[tokio::test]
    async fn add_cup_validates_shape_and_limits() {
        let fx = fixture();
        let admin = member(1);

        fx.dispatcher.dispatch(group_text(&admin, "/add_cup missing pipes")).await;
        assert_eq!(fx.transport.last_text().await, PERSIAN_TEXTS.add_cup_usage);

        let oversized = format!("/add_cup {}|d|a", "t".repeat(101));
        fx.dispatcher.dispatch(group_text(&admin, &oversized)).await;
        assert_eq!(fx.transport.last_text().await, PERSIAN_TEXTS.add_cup_invalid);

        fx.dispatcher
            .dispatch(group_text(&admin, "/add_cup Spring Cup|Season opener|Alpha, Beta"))
            .await;
        let cups = fx.storage.cups("g1", 10).await;
        assert_eq!(cups.len(), 1);
        assert_eq!(cups[0].podium, vec!["Alpha".to_string(), "Beta".to_string()]);
    }

    #[tokio::test]
    async fn leaderboard_refresh_edits_in_place() {
        let fx = fixture();
        fx.storage
            .add_xp("g1", 10, 40, Some("Member 10".into()), None)
            .await
            .expect("seed xp");

        fx.dispatcher
            .dispatch(press(&member(10), "board-1", "leaderboard:xp:g1:refresh"))
            .await;
        let edits = fx.transport.edits.lock().await;
        let (_, message_id, text) = edits.last().expect("edit recorded");
        assert_eq!(message_id, "board-1");
        assert!(text.contains("Member 10"), "got: {text}");
    }

    #[tokio::test(start_paused = true)]
    async fn personal_panel_is_cooldown_gated_and_ephemeral() {
        let fx = fixture();
        let sender = member(10);
        fx.storage
            .add_xp("g1", 10, 150, Some("Member 10".into()), None)
            .await
            .expect("seed xp");

        fx.dispatcher.dispatch(group_text(&sender, "/profile")).await;
        {
            let sent = fx.transport.sent.lock().await;
            let (_, text, keypad) = sent.last().expect("panel sent");
            assert!(text.contains("Member 10"), "got: {text}");
            assert!(keypad.is_some());
        }

        // A second request inside the window only gets the cooldown notice.
        fx.dispatcher.dispatch(group_text(&sender, "/profile")).await;
        assert_eq!(
            fx.transport.last_text().await,
            PERSIAN_TEXTS.personal_panel_cooldown
        );

        tokio::time::advance(Duration::from_secs(31)).await;
        fx.dispatcher.dispatch(group_text(&sender, "/profile")).await;
        let last = fx.transport.last_text().await;
        assert!(last.contains("Member 10"), "got: {last}");
    }

    #[tokio::test]
    async fn personal_panel_views_switch_via_buttons() {
        let fx = fixture();
        let sender = member(10);
        fx.storage
            .add_xp("g1", 10, 150, Some("Member 10".into()), None)
            .await
            .expect("seed xp");

        fx.dispatcher
            .dispatch(press(&sender, "panel-1", "personal_panel:view:g1:leaderboard"))
            .await;
        let edits = fx.transport.edits.lock().await;
        let (_, _, text) = edits.last().expect("edit recorded");
        assert!(
            text.starts_with(PERSIAN_TEXTS.personal_leaderboard_header),
            "got: {text}"
        );
    }
}
