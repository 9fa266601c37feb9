//! # Private-Chat Handlers
//!
//! Everything the bot does in direct messages: the welcome surface, the
//! guild-application intake flow, application status and withdrawal, the
//! language menu, the admin panel with admin and question management,
//! and the review cycle for forwarded applications.
//!
//! Free text is routed by the actor's single pending action; a review
//! note in progress always wins over anything else because installing it
//! replaced whatever was pending before.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;

use crate::application::context::{
    AdminToggle, AnswerRecord, FlowState, PendingAction, PendingQuestionEdit, PendingReviewNote,
    QuestionEditKind,
};
use crate::application::dispatcher::{action_of, HandlerAction, SharedContext};
use crate::application::form::{
    find_question, next_eligible_question, parse_form, parse_question, QuestionDefinition,
    QuestionKind,
};
use crate::application::guard::RateLimitGuard;
use crate::application::predicate::{CallbackKind, Predicate};
use crate::domain::callback::{AdminPanelAction, CallbackAction, ReviewVerdict};
use crate::domain::traits::Transport;
use crate::domain::types::{ChatKind, IncomingMessage, Keypad, Sender, Update, UserId};
use crate::infrastructure::storage::{
    ApplicationHistoryEntry, ApplicationResponse, ApplicationStatus, Storage,
};
use crate::interface::keyboards;
use crate::strings::{
    escape_html, get_text_pack, normalize_language_code, TextPack, AVAILABLE_LANGUAGES,
};

pub struct DmHandlers {
    storage: Arc<Storage>,
    transport: Arc<dyn Transport>,
    guard: Arc<RateLimitGuard>,
    owner_id: UserId,
    review_chat_id: Option<String>,
}

fn question_prompt(texts: &TextPack, question: &QuestionDefinition) -> String {
    if question.kind == QuestionKind::Choice && !question.options.is_empty() {
        let options = question.option_labels().join(" / ");
        format!(
            "{}\n{}",
            question.prompt,
            texts.flow_choice_hint.replace("{options}", &options)
        )
    } else {
        question.prompt.clone()
    }
}

fn render_application(
    texts: &TextPack,
    full_name: &str,
    responses: &[ApplicationResponse],
    fallback_answer: &str,
    created_at: &str,
) -> String {
    let mut text = texts
        .review_forward_header
        .replace("{name}", &escape_html(full_name));
    if responses.is_empty() {
        text.push_str("\n\n");
        text.push_str(&escape_html(fallback_answer));
    } else {
        for response in responses {
            text.push_str(&format!(
                "\n\n{}\n{}",
                escape_html(&response.question),
                escape_html(&response.answer)
            ));
        }
    }
    text.push_str(&format!("\n\n{created_at}"));
    text
}

fn status_text(texts: &TextPack, entry: Option<&ApplicationHistoryEntry>) -> String {
    let Some(entry) = entry else {
        return texts.status_none.to_string();
    };
    let base = match entry.status {
        ApplicationStatus::Pending => texts.status_pending,
        ApplicationStatus::Approved => texts.status_approved,
        ApplicationStatus::Denied => texts.status_denied,
        ApplicationStatus::Withdrawn => texts.status_withdrawn,
    };
    let mut text = base.to_string();
    if let Some(note) = entry.note.as_deref().filter(|note| !note.is_empty()) {
        text.push_str(&texts.status_note_suffix.replace("{note}", &escape_html(note)));
    }
    text
}

impl DmHandlers {
    pub fn new(
        storage: Arc<Storage>,
        transport: Arc<dyn Transport>,
        guard: Arc<RateLimitGuard>,
        owner_id: UserId,
        review_chat_id: Option<String>,
    ) -> Self {
        Self {
            storage,
            transport,
            guard,
            owner_id,
            review_chat_id,
        }
    }

    /// Bindings in dispatch order. Commands come before the free-text
    /// consumer so `/cancel` is never swallowed as a pending answer.
    pub fn bindings(self: &Arc<Self>) -> Vec<(Predicate, HandlerAction)> {
        let private = || Predicate::Private;
        vec![
            (
                private().and(Predicate::command("start")),
                action_of(self, Self::on_start),
            ),
            (Predicate::command("cancel"), action_of(self, Self::on_cancel)),
            (
                private().and(Predicate::command("status")),
                action_of(self, Self::on_status),
            ),
            (
                private().and(Predicate::command("withdraw")),
                action_of(self, Self::on_withdraw),
            ),
            (
                private().and(Predicate::command("pending")),
                action_of(self, Self::on_pending_command),
            ),
            (
                private().and(Predicate::command("admins")),
                action_of(self, Self::on_admins_command),
            ),
            (
                private().and(Predicate::command("promote")),
                action_of(self, Self::on_promote_command),
            ),
            (
                private().and(Predicate::command("demote")),
                action_of(self, Self::on_demote_command),
            ),
            (
                Predicate::TextPresent.and(Predicate::CommandPrefix.not()),
                action_of(self, Self::on_free_text),
            ),
            (
                Predicate::callback(CallbackKind::Apply),
                action_of(self, Self::on_apply),
            ),
            (
                Predicate::callback(CallbackKind::AdminPanelHome),
                action_of(self, Self::on_admin_panel_home),
            ),
            (
                Predicate::callback(CallbackKind::AdminPanel),
                action_of(self, Self::on_admin_panel),
            ),
            (
                Predicate::callback(CallbackKind::ApplicationStatus),
                action_of(self, Self::on_status),
            ),
            (
                Predicate::callback(CallbackKind::ApplicationWithdraw),
                action_of(self, Self::on_withdraw),
            ),
            (
                Predicate::callback(CallbackKind::LanguageMenu),
                action_of(self, Self::on_language_menu),
            ),
            (
                Predicate::callback(CallbackKind::SetLanguage),
                action_of(self, Self::on_set_language),
            ),
            (
                Predicate::callback(CallbackKind::CloseLanguageMenu),
                action_of(self, Self::on_close_language_menu),
            ),
            (
                Predicate::callback(CallbackKind::Review),
                action_of(self, Self::on_review),
            ),
        ]
    }

    async fn is_admin(&self, user_id: UserId) -> bool {
        user_id == self.owner_id || self.storage.is_admin(user_id).await
    }

    async fn locale_for(&self, context: &SharedContext, sender: &Sender) -> &'static str {
        let preferred = {
            let mut store = context.store.lock().await;
            store.actor(sender.id).preferred_language.clone()
        };
        normalize_language_code(preferred.as_deref().or(sender.language_code.as_deref()))
    }

    async fn texts_for(&self, context: &SharedContext, sender: &Sender) -> &'static TextPack {
        get_text_pack(Some(self.locale_for(context, sender).await))
    }

    async fn send(&self, chat_id: &str, text: &str, keypad: Option<Keypad>) -> Result<()> {
        self.transport.send_message(chat_id, text, keypad).await?;
        Ok(())
    }

    // --- entry points ---

    async fn on_start(self: Arc<Self>, update: Update, context: SharedContext) -> Result<()> {
        let sender = update.sender().clone();
        let texts = self.texts_for(&context, &sender).await;
        let is_admin = self.is_admin(sender.id).await;

        let mut text = texts
            .welcome
            .replace("{name}", &escape_html(&sender.display_name()));
        if is_admin {
            text.push_str(texts.welcome_admin_hint);
        }
        self.send(
            update.chat_id(),
            &text,
            Some(keyboards::welcome_keyboard(texts, is_admin)),
        )
        .await
    }

    async fn on_cancel(self: Arc<Self>, update: Update, context: SharedContext) -> Result<()> {
        let sender = update.sender().clone();
        let texts = self.texts_for(&context, &sender).await;
        let pending = {
            let mut store = context.store.lock().await;
            store.take_pending(sender.id)
        };
        match pending {
            PendingAction::None => self.send(update.chat_id(), texts.cancel_nothing, None).await,
            PendingAction::ReviewNote(note) => {
                // The application was popped when review started; put it
                // back so another reviewer can pick it up.
                self.storage
                    .add_application(
                        note.target_id,
                        note.applicant_chat_id.clone(),
                        note.applicant_name.clone(),
                        None,
                        note.application_text.clone(),
                        Vec::new(),
                        note.applicant_locale.clone(),
                    )
                    .await?;
                let review_texts = get_text_pack(None);
                if let Err(error) = self
                    .transport
                    .edit_message(
                        &note.origin_chat_id,
                        &note.origin_message_id,
                        &note.application_text,
                        Some(keyboards::application_review_keyboard(
                            review_texts,
                            note.target_id,
                        )),
                    )
                    .await
                {
                    tracing::warn!("Failed to restore review message: {error:#}");
                }
                self.send(update.chat_id(), texts.cancel_done, None).await
            }
            _ => self.send(update.chat_id(), texts.cancel_done, None).await,
        }
    }

    /// Route a non-command text message by the sender's pending action.
    async fn on_free_text(self: Arc<Self>, update: Update, context: SharedContext) -> Result<()> {
        let Some(message) = update.message() else {
            return Ok(());
        };
        let Some(text) = message.text.clone() else {
            return Ok(());
        };
        let message = message.clone();
        let sender = message.sender.clone();
        let texts = self.texts_for(&context, &sender).await;

        let pending = {
            let mut store = context.store.lock().await;
            store.actor(sender.id).pending.clone()
        };
        match pending {
            PendingAction::None => Ok(()),
            PendingAction::ReviewNote(note) => {
                // Finalization always clears the pending state, even when
                // a later step fails.
                context.store.lock().await.clear_pending(sender.id);
                self.finish_review(&message, note, text.trim(), texts).await
            }
            PendingAction::QuestionEdit(edit) if message.chat_kind == ChatKind::Private => {
                self.handle_question_edit(&message, edit, text.trim(), texts, &context)
                    .await
            }
            PendingAction::AdminToggle(toggle) if message.chat_kind == ChatKind::Private => {
                self.handle_admin_toggle(&message, toggle, text.trim(), texts, &context)
                    .await
            }
            PendingAction::Flow(flow) if message.chat_kind == ChatKind::Private => {
                self.handle_flow_step(&message, flow, text.trim(), texts, &context)
                    .await
            }
            _ => Ok(()),
        }
    }

    // --- application flow ---

    async fn on_apply(self: Arc<Self>, update: Update, context: SharedContext) -> Result<()> {
        let sender = update.sender().clone();
        let texts = self.texts_for(&context, &sender).await;
        let chat_id = update.chat_id().to_string();

        let already_member = self
            .storage
            .application_status(sender.id)
            .await
            .is_some_and(|entry| entry.status == ApplicationStatus::Approved);
        if already_member {
            return self.send(&chat_id, texts.apply_already_member, None).await;
        }
        if self.storage.has_application(sender.id).await {
            return self.send(&chat_id, texts.apply_duplicate, None).await;
        }

        let locale = self.locale_for(&context, &sender).await;
        let form = self.storage.application_form(locale).await;
        let Some(first) = next_eligible_question(&form, &HashMap::new()).cloned() else {
            return self.send(&chat_id, texts.flow_no_questions, None).await;
        };

        let flow = FlowState {
            answers: Vec::new(),
            answered_values: HashMap::new(),
            form_snapshot: form,
            pending_question_id: Some(first.question_id.clone()),
            locale: locale.to_string(),
        };
        context.store.lock().await.actor(sender.id).pending = PendingAction::Flow(flow);

        self.send(&chat_id, texts.flow_started, None).await?;
        self.send(&chat_id, &question_prompt(texts, &first), None).await
    }

    async fn handle_flow_step(
        &self,
        message: &IncomingMessage,
        mut flow: FlowState,
        answer: &str,
        texts: &'static TextPack,
        context: &SharedContext,
    ) -> Result<()> {
        if !self.guard.is_allowed(message.sender.id).await {
            return self.send(&message.chat_id, texts.flow_rate_limited, None).await;
        }
        // Self-healing: if the recorded question id stopped resolving
        // against the snapshot, recompute and re-prompt. The current
        // message answers a prompt nobody saw, so it is not consumed.
        let resolved = flow
            .pending_question_id
            .as_deref()
            .and_then(|id| find_question(&flow.form_snapshot, id))
            .cloned();
        let question = match resolved {
            Some(question) => question,
            None => {
                match next_eligible_question(&flow.form_snapshot, &flow.answered_values).cloned() {
                    Some(next) => {
                        flow.pending_question_id = Some(next.question_id.clone());
                        context.store.lock().await.actor(message.sender.id).pending =
                            PendingAction::Flow(flow);
                        return self
                            .send(&message.chat_id, &question_prompt(texts, &next), None)
                            .await;
                    }
                    None => return self.finalize_flow(message, flow, texts, context).await,
                }
            }
        };

        let (stored_value, display_answer) = match question.kind {
            QuestionKind::Choice => match question.match_option(answer) {
                Some((value, label)) => (value.to_string(), label.to_string()),
                None => {
                    let options = question.option_labels().join(" / ");
                    return self
                        .send(
                            &message.chat_id,
                            &texts.flow_invalid_choice.replace("{options}", &options),
                            None,
                        )
                        .await;
                }
            },
            QuestionKind::Text => {
                if answer.is_empty() && question.required {
                    return self.send(&message.chat_id, texts.flow_empty_answer, None).await;
                }
                (answer.to_string(), answer.to_string())
            }
        };

        flow.answers.push(AnswerRecord {
            question_id: question.question_id.clone(),
            question: question.display_title().to_string(),
            answer: display_answer,
        });
        flow.answered_values
            .insert(question.question_id.clone(), stored_value);

        match next_eligible_question(&flow.form_snapshot, &flow.answered_values).cloned() {
            Some(next) => {
                flow.pending_question_id = Some(next.question_id.clone());
                context.store.lock().await.actor(message.sender.id).pending =
                    PendingAction::Flow(flow);
                self.send(&message.chat_id, &question_prompt(texts, &next), None)
                    .await
            }
            None => self.finalize_flow(message, flow, texts, context).await,
        }
    }

    async fn finalize_flow(
        &self,
        message: &IncomingMessage,
        flow: FlowState,
        texts: &'static TextPack,
        context: &SharedContext,
    ) -> Result<()> {
        context.store.lock().await.clear_pending(message.sender.id);

        let responses: Vec<ApplicationResponse> = flow
            .answers
            .iter()
            .map(|record| ApplicationResponse {
                question_id: record.question_id.clone(),
                question: record.question.clone(),
                answer: record.answer.clone(),
            })
            .collect();
        let collapsed = flow
            .answers
            .iter()
            .map(|record| format!("{}: {}", record.question, record.answer))
            .collect::<Vec<_>>()
            .join("\n");

        let added = self
            .storage
            .add_application(
                message.sender.id,
                Some(message.chat_id.clone()),
                message.sender.display_name(),
                message.sender.username.clone(),
                collapsed.clone(),
                responses,
                Some(flow.locale.clone()),
            )
            .await;
        match added {
            Ok(true) => {
                let summary = format!("{}\n{}", texts.flow_summary_header, escape_html(&collapsed));
                self.send(&message.chat_id, &summary, None).await?;
                self.send(&message.chat_id, texts.flow_submitted, None).await?;
                self.forward_for_review(message.sender.id).await
            }
            Ok(false) => self.send(&message.chat_id, texts.apply_duplicate, None).await,
            Err(error) => {
                tracing::error!("Failed to persist application: {error:#}");
                self.send(&message.chat_id, texts.flow_submit_failed, None).await
            }
        }
    }

    async fn forward_for_review(&self, user_id: UserId) -> Result<()> {
        let Some(review_chat) = self.review_chat_id.as_deref() else {
            tracing::warn!("No review chat configured, application stays queued");
            return Ok(());
        };
        let Some(application) = self.storage.get_application(user_id).await else {
            return Ok(());
        };
        let texts = get_text_pack(None);
        let text = render_application(
            texts,
            &application.full_name,
            &application.responses,
            &application.answer,
            &application.created_at,
        );
        self.send(
            review_chat,
            &text,
            Some(keyboards::application_review_keyboard(texts, user_id)),
        )
        .await
    }

    // --- status / withdraw ---

    async fn on_status(self: Arc<Self>, update: Update, context: SharedContext) -> Result<()> {
        let sender = update.sender().clone();
        let texts = self.texts_for(&context, &sender).await;
        let entry = self.storage.application_status(sender.id).await;
        self.send(update.chat_id(), &status_text(texts, entry.as_ref()), None)
            .await
    }

    async fn on_withdraw(self: Arc<Self>, update: Update, context: SharedContext) -> Result<()> {
        let sender = update.sender().clone();
        let texts = self.texts_for(&context, &sender).await;
        let withdrawn = self.storage.withdraw_application(sender.id).await?;
        let text = if withdrawn {
            texts.withdraw_done
        } else {
            texts.withdraw_none
        };
        self.send(update.chat_id(), text, None).await
    }

    // --- language ---

    async fn on_language_menu(
        self: Arc<Self>,
        update: Update,
        context: SharedContext,
    ) -> Result<()> {
        let sender = update.sender().clone();
        let texts = self.texts_for(&context, &sender).await;
        let active = self.locale_for(&context, &sender).await;
        self.send(
            update.chat_id(),
            texts.language_menu_title,
            Some(keyboards::language_options_keyboard(texts, active)),
        )
        .await
    }

    async fn on_set_language(
        self: Arc<Self>,
        update: Update,
        context: SharedContext,
    ) -> Result<()> {
        let Some(press) = update.callback() else {
            return Ok(());
        };
        let CallbackAction::SetLanguage { code } = press.action.clone() else {
            return Ok(());
        };
        let normalized = normalize_language_code(Some(&code));
        context
            .store
            .lock()
            .await
            .actor(press.sender.id)
            .preferred_language = Some(normalized.to_string());

        let texts = get_text_pack(Some(normalized));
        let name = AVAILABLE_LANGUAGES
            .iter()
            .find(|(supported, _)| *supported == normalized)
            .map(|(_, name)| *name)
            .unwrap_or(normalized);
        self.transport
            .edit_message(
                &press.chat_id,
                &press.message_id,
                &texts.language_set.replace("{language}", name),
                None,
            )
            .await
    }

    async fn on_close_language_menu(
        self: Arc<Self>,
        update: Update,
        context: SharedContext,
    ) -> Result<()> {
        let Some(press) = update.callback() else {
            return Ok(());
        };
        let sender = press.sender.clone();
        let texts = self.texts_for(&context, &sender).await;
        if self
            .transport
            .delete_message(&press.chat_id, &press.message_id)
            .await
            .is_err()
        {
            self.transport
                .edit_message(&press.chat_id, &press.message_id, texts.language_closed, None)
                .await?;
        }
        Ok(())
    }

    // --- admin panel ---

    async fn on_admin_panel_home(
        self: Arc<Self>,
        update: Update,
        context: SharedContext,
    ) -> Result<()> {
        let sender = update.sender().clone();
        let texts = self.texts_for(&context, &sender).await;
        if !self.is_admin(sender.id).await {
            return self.send(update.chat_id(), texts.admin_only, None).await;
        }
        self.send(
            update.chat_id(),
            texts.admin_panel_title,
            Some(keyboards::admin_panel_keyboard(texts)),
        )
        .await
    }

    async fn on_admin_panel(self: Arc<Self>, update: Update, context: SharedContext) -> Result<()> {
        let Some(press) = update.callback() else {
            return Ok(());
        };
        let CallbackAction::AdminPanel(action) = press.action.clone() else {
            return Ok(());
        };
        let press = press.clone();
        let sender = press.sender.clone();
        let texts = self.texts_for(&context, &sender).await;
        if !self.is_admin(sender.id).await {
            return self.send(&press.chat_id, texts.admin_only, None).await;
        }
        let locale = self.locale_for(&context, &sender).await;

        match action {
            AdminPanelAction::ViewApplications => {
                self.list_pending(&press.chat_id, texts).await
            }
            AdminPanelAction::ViewMembers => {
                let approved = self
                    .storage
                    .applicants_by_status(ApplicationStatus::Approved)
                    .await;
                if approved.is_empty() {
                    return self.send(&press.chat_id, texts.members_empty, None).await;
                }
                let mut text = texts.members_header.to_string();
                for (user_id, entry) in approved {
                    let name = self
                        .storage
                        .display_name(user_id)
                        .await
                        .unwrap_or_else(|| user_id.to_string());
                    text.push_str(&format!(
                        "\n• {} ({user_id}) {}",
                        escape_html(&name),
                        entry.updated_at
                    ));
                }
                self.send(&press.chat_id, &text, None).await
            }
            AdminPanelAction::ManageAdmins => {
                if sender.id != self.owner_id {
                    return self.send(&press.chat_id, texts.owner_only, None).await;
                }
                self.send(
                    &press.chat_id,
                    texts.manage_admins_title,
                    Some(keyboards::admin_management_keyboard(texts)),
                )
                .await
            }
            AdminPanelAction::ManageAdminsAdd | AdminPanelAction::ManageAdminsRemove => {
                if sender.id != self.owner_id {
                    return self.send(&press.chat_id, texts.owner_only, None).await;
                }
                let (toggle, prompt) = if action == AdminPanelAction::ManageAdminsAdd {
                    (AdminToggle::Promote, texts.admin_add_prompt)
                } else {
                    (AdminToggle::Demote, texts.admin_remove_prompt)
                };
                context.store.lock().await.actor(sender.id).pending =
                    PendingAction::AdminToggle(toggle);
                self.send(&press.chat_id, prompt, None).await
            }
            AdminPanelAction::ManageAdminsList => self.list_admins(&press.chat_id, texts).await,
            AdminPanelAction::QuestionsMenu => {
                let form = self.storage.application_form(locale).await;
                self.transport
                    .edit_message(
                        &press.chat_id,
                        &press.message_id,
                        &texts
                            .questions_menu_title
                            .replace("{count}", &form.len().to_string()),
                        Some(keyboards::admin_questions_keyboard(texts, &form)),
                    )
                    .await
            }
            AdminPanelAction::QuestionsBack | AdminPanelAction::Back => {
                self.transport
                    .edit_message(
                        &press.chat_id,
                        &press.message_id,
                        texts.admin_panel_title,
                        Some(keyboards::admin_panel_keyboard(texts)),
                    )
                    .await
            }
            AdminPanelAction::QuestionsAdd => {
                context.store.lock().await.actor(sender.id).pending =
                    PendingAction::QuestionEdit(PendingQuestionEdit {
                        action: QuestionEditKind::Add,
                        locale: locale.to_string(),
                        question_id: None,
                    });
                self.send(&press.chat_id, texts.question_add_prompt, None).await
            }
            AdminPanelAction::QuestionsImport => {
                context.store.lock().await.actor(sender.id).pending =
                    PendingAction::QuestionEdit(PendingQuestionEdit {
                        action: QuestionEditKind::Import,
                        locale: locale.to_string(),
                        question_id: None,
                    });
                self.send(&press.chat_id, texts.question_import_prompt, None).await
            }
            AdminPanelAction::QuestionsExport => {
                let form = self.storage.application_form(locale).await;
                let json = serde_json::to_string_pretty(&form)?;
                self.send(
                    &press.chat_id,
                    &format!("{}\n{json}", texts.question_export_header),
                    None,
                )
                .await
            }
            AdminPanelAction::QuestionsReset => {
                context.store.lock().await.actor(sender.id).pending =
                    PendingAction::QuestionEdit(PendingQuestionEdit {
                        action: QuestionEditKind::Reset,
                        locale: locale.to_string(),
                        question_id: None,
                    });
                self.send(
                    &press.chat_id,
                    &texts
                        .question_reset_confirm
                        .replace("{keyword}", texts.confirm_keyword),
                    None,
                )
                .await
            }
            AdminPanelAction::QuestionsEdit { question_id } => {
                let form = self.storage.application_form(locale).await;
                let Some(question) = find_question(&form, &question_id) else {
                    return self.send(&press.chat_id, texts.question_missing, None).await;
                };
                let prompt = texts
                    .question_edit_prompt
                    .replace("{question}", question.display_title());
                context.store.lock().await.actor(sender.id).pending =
                    PendingAction::QuestionEdit(PendingQuestionEdit {
                        action: QuestionEditKind::Edit,
                        locale: locale.to_string(),
                        question_id: Some(question_id),
                    });
                self.send(&press.chat_id, &prompt, None).await
            }
            AdminPanelAction::QuestionsDelete { question_id } => {
                let form = self.storage.application_form(locale).await;
                let Some(question) = find_question(&form, &question_id) else {
                    return self.send(&press.chat_id, texts.question_missing, None).await;
                };
                let prompt = texts
                    .question_delete_confirm
                    .replace("{question}", question.display_title())
                    .replace("{keyword}", texts.confirm_keyword);
                context.store.lock().await.actor(sender.id).pending =
                    PendingAction::QuestionEdit(PendingQuestionEdit {
                        action: QuestionEditKind::Delete,
                        locale: locale.to_string(),
                        question_id: Some(question_id),
                    });
                self.send(&press.chat_id, &prompt, None).await
            }
        }
    }

    async fn list_pending(&self, chat_id: &str, texts: &'static TextPack) -> Result<()> {
        let pending = self.storage.pending_applications().await;
        if pending.is_empty() {
            return self.send(chat_id, texts.pending_empty, None).await;
        }
        self.send(chat_id, texts.pending_header, None).await?;
        let review_texts = get_text_pack(None);
        for application in pending {
            let text = render_application(
                review_texts,
                &application.full_name,
                &application.responses,
                &application.answer,
                &application.created_at,
            );
            self.send(
                chat_id,
                &text,
                Some(keyboards::application_review_keyboard(
                    review_texts,
                    application.user_id,
                )),
            )
            .await?;
        }
        Ok(())
    }

    async fn list_admins(&self, chat_id: &str, texts: &'static TextPack) -> Result<()> {
        let admins = self.storage.admin_details().await;
        if admins.is_empty() {
            return self.send(chat_id, texts.admins_empty, None).await;
        }
        let mut text = texts.admins_header.to_string();
        for admin in admins {
            let name = admin
                .full_name
                .or(admin.username)
                .unwrap_or_else(|| admin.user_id.to_string());
            text.push_str(&format!("\n• {} ({})", escape_html(&name), admin.user_id));
        }
        self.send(chat_id, &text, None).await
    }

    async fn handle_admin_toggle(
        &self,
        message: &IncomingMessage,
        toggle: AdminToggle,
        text: &str,
        texts: &'static TextPack,
        context: &SharedContext,
    ) -> Result<()> {
        let Ok(user_id) = text.parse::<UserId>() else {
            return self.send(&message.chat_id, texts.admin_invalid_id, None).await;
        };
        context.store.lock().await.clear_pending(message.sender.id);
        self.apply_admin_toggle(&message.chat_id, toggle, user_id, texts)
            .await
    }

    async fn apply_admin_toggle(
        &self,
        chat_id: &str,
        toggle: AdminToggle,
        user_id: UserId,
        texts: &'static TextPack,
    ) -> Result<()> {
        let reply = match toggle {
            AdminToggle::Promote => {
                if self.storage.add_admin(user_id, None, None).await? {
                    texts.admin_added
                } else {
                    texts.admin_add_duplicate
                }
            }
            AdminToggle::Demote => {
                if self.storage.remove_admin(user_id).await? {
                    texts.admin_removed
                } else {
                    texts.admin_remove_missing
                }
            }
        };
        self.send(chat_id, &reply.replace("{user_id}", &user_id.to_string()), None)
            .await
    }

    // --- question editing ---

    async fn handle_question_edit(
        &self,
        message: &IncomingMessage,
        edit: PendingQuestionEdit,
        text: &str,
        texts: &'static TextPack,
        context: &SharedContext,
    ) -> Result<()> {
        let chat_id = message.chat_id.clone();
        match edit.action {
            QuestionEditKind::Add | QuestionEditKind::Edit => {
                let Some(definition) = parse_question(text) else {
                    // Not terminal: the prompt stays armed for a retry.
                    return self.send(&chat_id, texts.question_invalid_payload, None).await;
                };
                if let Some(old_id) = edit
                    .question_id
                    .as_deref()
                    .filter(|old_id| *old_id != definition.question_id)
                {
                    self.storage.delete_question(&edit.locale, old_id).await?;
                }
                self.storage.upsert_question(&edit.locale, definition).await?;
                context.store.lock().await.clear_pending(message.sender.id);
                self.send(&chat_id, texts.question_saved, None).await
            }
            QuestionEditKind::Import => {
                let Some(definitions) = parse_form(text) else {
                    return self.send(&chat_id, texts.question_invalid_payload, None).await;
                };
                self.storage.import_form(&edit.locale, definitions).await?;
                context.store.lock().await.clear_pending(message.sender.id);
                self.send(&chat_id, texts.question_saved, None).await
            }
            QuestionEditKind::Delete => {
                context.store.lock().await.clear_pending(message.sender.id);
                if !text.eq_ignore_ascii_case(texts.confirm_keyword) {
                    return self.send(&chat_id, texts.question_edit_cancelled, None).await;
                }
                let question_id = edit.question_id.as_deref().unwrap_or_default();
                let deleted = self.storage.delete_question(&edit.locale, question_id).await?;
                let reply = if deleted {
                    texts.question_deleted
                } else {
                    texts.question_missing
                };
                self.send(&chat_id, reply, None).await
            }
            QuestionEditKind::Reset => {
                context.store.lock().await.clear_pending(message.sender.id);
                if !text.eq_ignore_ascii_case(texts.confirm_keyword) {
                    return self.send(&chat_id, texts.question_edit_cancelled, None).await;
                }
                self.storage.reset_form(&edit.locale).await?;
                self.send(&chat_id, texts.question_reset_done, None).await
            }
        }
    }

    // --- review cycle ---

    async fn on_review(self: Arc<Self>, update: Update, context: SharedContext) -> Result<()> {
        let Some(press) = update.callback() else {
            return Ok(());
        };
        let CallbackAction::Review { target, verdict } = press.action else {
            return Ok(());
        };
        let press = press.clone();
        let sender = press.sender.clone();
        let texts = self.texts_for(&context, &sender).await;
        if !self.is_admin(sender.id).await {
            return self.send(&press.chat_id, texts.admin_only, None).await;
        }
        if verdict == ReviewVerdict::Skip {
            return self.send(&press.chat_id, texts.review_skipped, None).await;
        }

        // At-most-once: the first press wins, later presses see None.
        let Some(application) = self.storage.pop_application(target).await? else {
            return self.send(&press.chat_id, texts.review_not_found, None).await;
        };

        let review_texts = get_text_pack(None);
        let application_text = render_application(
            review_texts,
            &application.full_name,
            &application.responses,
            &application.answer,
            &application.created_at,
        );
        context.store.lock().await.actor(sender.id).pending =
            PendingAction::ReviewNote(PendingReviewNote {
                verdict,
                target_id: target,
                applicant_name: application.full_name.clone(),
                applicant_chat_id: application.chat_id.clone(),
                applicant_locale: application.language_code.clone(),
                application_text: application_text.clone(),
                origin_chat_id: press.chat_id.clone(),
                origin_message_id: press.message_id.clone(),
            });

        let prompt = texts
            .review_note_prompt
            .replace("{name}", &escape_html(&application.full_name))
            .replace("{keyword}", texts.skip_keyword);
        self.transport
            .edit_message(
                &press.chat_id,
                &press.message_id,
                &format!("{application_text}\n\n{prompt}"),
                None,
            )
            .await
    }

    async fn finish_review(
        &self,
        message: &IncomingMessage,
        note_state: PendingReviewNote,
        text: &str,
        texts: &'static TextPack,
    ) -> Result<()> {
        let note = if text.is_empty()
            || text == "-"
            || text.eq_ignore_ascii_case(texts.skip_keyword)
        {
            None
        } else {
            Some(text.to_string())
        };
        let status = match note_state.verdict {
            ReviewVerdict::Approve => ApplicationStatus::Approved,
            ReviewVerdict::Deny => ApplicationStatus::Denied,
            ReviewVerdict::Skip => return Ok(()),
        };
        self.storage
            .mark_application_status(
                note_state.target_id,
                status,
                note.clone(),
                note_state.applicant_locale.clone(),
            )
            .await?;

        if let Some(applicant_chat) = note_state.applicant_chat_id.as_deref() {
            let applicant_texts = get_text_pack(note_state.applicant_locale.as_deref());
            let mut notice = match status {
                ApplicationStatus::Approved => applicant_texts.review_approved_applicant,
                _ => applicant_texts.review_denied_applicant,
            }
            .to_string();
            if let Some(note) = &note {
                notice.push_str(
                    &applicant_texts
                        .review_note_line
                        .replace("{note}", &escape_html(note)),
                );
            }
            if let Err(error) = self.transport.send_message(applicant_chat, &notice, None).await {
                tracing::warn!("Failed to notify applicant: {error:#}");
            }
        }

        let outcome = texts
            .review_done_admin
            .replace("{name}", &escape_html(&note_state.applicant_name));
        if let Err(error) = self
            .transport
            .edit_message(
                &note_state.origin_chat_id,
                &note_state.origin_message_id,
                &format!("{}\n\n{outcome}", note_state.application_text),
                None,
            )
            .await
        {
            tracing::warn!("Failed to update review message: {error:#}");
        }
        if message.chat_id != note_state.origin_chat_id {
            self.send(&message.chat_id, &outcome, None).await?;
        }
        Ok(())
    }

    // --- admin commands ---

    async fn on_pending_command(
        self: Arc<Self>,
        update: Update,
        context: SharedContext,
    ) -> Result<()> {
        let sender = update.sender().clone();
        let texts = self.texts_for(&context, &sender).await;
        if !self.is_admin(sender.id).await {
            return self.send(update.chat_id(), texts.admin_only, None).await;
        }
        self.list_pending(update.chat_id(), texts).await
    }

    async fn on_admins_command(
        self: Arc<Self>,
        update: Update,
        context: SharedContext,
    ) -> Result<()> {
        let sender = update.sender().clone();
        let texts = self.texts_for(&context, &sender).await;
        if !self.is_admin(sender.id).await {
            return self.send(update.chat_id(), texts.admin_only, None).await;
        }
        self.list_admins(update.chat_id(), texts).await
    }

    async fn on_promote_command(
        self: Arc<Self>,
        update: Update,
        context: SharedContext,
    ) -> Result<()> {
        self.toggle_command(update, context, AdminToggle::Promote).await
    }

    async fn on_demote_command(
        self: Arc<Self>,
        update: Update,
        context: SharedContext,
    ) -> Result<()> {
        self.toggle_command(update, context, AdminToggle::Demote).await
    }

    /// `/promote 42` acts immediately; the bare command arms a prompt for
    /// the id instead.
    async fn toggle_command(
        &self,
        update: Update,
        context: SharedContext,
        toggle: AdminToggle,
    ) -> Result<()> {
        let Some(message) = update.message() else {
            return Ok(());
        };
        let sender = message.sender.clone();
        let texts = self.texts_for(&context, &sender).await;
        if sender.id != self.owner_id {
            return self.send(&message.chat_id, texts.owner_only, None).await;
        }
        match message.args().first() {
            Some(argument) => match argument.parse::<UserId>() {
                Ok(user_id) => {
                    self.apply_admin_toggle(&message.chat_id, toggle, user_id, texts)
                        .await
                }
                Err(_) => self.send(&message.chat_id, texts.admin_invalid_id, None).await,
            },
            None => {
                let prompt = match toggle {
                    AdminToggle::Promote => texts.admin_add_prompt,
                    AdminToggle::Demote => texts.admin_remove_prompt,
                };
                context.store.lock().await.actor(sender.id).pending =
                    PendingAction::AdminToggle(toggle);
                self.send(&message.chat_id, prompt, None).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dispatcher::Dispatcher;
    use crate::application::form::default_form;
    use crate::strings::{ENGLISH_TEXTS, PERSIAN_TEXTS};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(String, String, Option<Keypad>)>>,
        edits: Mutex<Vec<(String, String, String)>>,
        counter: AtomicUsize,
    }

    impl RecordingTransport {
        async fn sent_to(&self, chat_id: &str) -> Vec<String> {
            self.sent
                .lock()
                .await
                .iter()
                .filter(|(chat, _, _)| chat == chat_id)
                .map(|(_, text, _)| text.clone())
                .collect()
        }

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
        let guard = Arc::new(RateLimitGuard::from_seconds(0.0, 1000));
        let handlers = Arc::new(DmHandlers::new(
            storage.clone(),
            transport.clone() as Arc<dyn Transport>,
            guard,
            1,
            Some("g900".to_string()),
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

    fn english_sender(id: UserId) -> Sender {
        let mut sender = Sender::new(id);
        sender.full_name = Some(format!("User {id}"));
        sender.language_code = Some("en".to_string());
        sender
    }

    fn private_text(sender: &Sender, text: &str) -> Update {
        Update::Message(IncomingMessage {
            id: "m".into(),
            chat_id: format!("b{}", sender.id),
            chat_kind: ChatKind::Private,
            sender: sender.clone(),
            text: Some(text.to_string()),
        })
    }

    fn group_text(sender: &Sender, chat_id: &str, text: &str) -> Update {
        Update::Message(IncomingMessage {
            id: "m".into(),
            chat_id: chat_id.to_string(),
            chat_kind: ChatKind::Group,
            sender: sender.clone(),
            text: Some(text.to_string()),
        })
    }

    fn press(sender: &Sender, chat_id: &str, message_id: &str, data: &str) -> Update {
        Update::CallbackPress(crate::domain::types::CallbackPress {
            id: message_id.to_string(),
            chat_id: chat_id.to_string(),
            chat_kind: if chat_id.starts_with('g') {
                ChatKind::Group
            } else {
                ChatKind::Private
            },
            message_id: message_id.to_string(),
            sender: sender.clone(),
            action: CallbackAction::decode(data),
            raw: data.to_string(),
        })
    }

    async fn seed_application(storage: &Storage, user_id: UserId) {
        storage
            .add_application(
                user_id,
                Some(format!("b{user_id}")),
                format!("User {user_id}"),
                None,
                "Role: Combat".to_string(),
                Vec::new(),
                Some("en".to_string()),
            )
            .await
            .expect("seed application");
    }

    #[tokio::test]
    async fn application_flow_runs_to_submission_and_review_forward() {
        let fx = fixture();
        let applicant = english_sender(100);

        fx.dispatcher
            .dispatch(press(&applicant, "b100", "m1", "apply_for_guild"))
            .await;
        for answer in ["combat", "years of raids", "to win cups", "evenings"] {
            fx.dispatcher.dispatch(private_text(&applicant, answer)).await;
        }

        assert!(fx.storage.has_application(100).await);
        let application = fx.storage.get_application(100).await.expect("stored");
        assert_eq!(application.responses.len(), 4);
        assert_eq!(application.chat_id.as_deref(), Some("b100"));

        // Forwarded to the review chat with the verdict keypad attached.
        let review = fx
            .transport
            .sent
            .lock()
            .await
            .iter()
            .find(|(chat, _, keypad)| chat == "g900" && keypad.is_some())
            .cloned();
        assert!(review.is_some(), "review forward expected");

        // Pending state cleared after submission.
        let context = fx.dispatcher.context();
        let store = context.store.lock().await;
        assert!(store
            .actor_if_present(100)
            .is_none_or(|actor| actor.pending.is_none()));
    }

    #[tokio::test]
    async fn invalid_choice_reprompts_without_losing_the_flow() {
        let fx = fixture();
        let applicant = english_sender(100);

        fx.dispatcher
            .dispatch(press(&applicant, "b100", "m1", "apply_for_guild"))
            .await;
        fx.dispatcher.dispatch(private_text(&applicant, "wizard")).await;

        assert!(!fx.storage.has_application(100).await);
        let last = fx.transport.last_text().await;
        assert!(last.contains("Combat / Support"), "got: {last}");

        // The flow is still armed and accepts the corrected answer.
        fx.dispatcher.dispatch(private_text(&applicant, "combat")).await;
        let context = fx.dispatcher.context();
        let store = context.store.lock().await;
        match &store.actor_if_present(100).expect("actor exists").pending {
            PendingAction::Flow(flow) => {
                assert_eq!(flow.answered_values.get("role").map(String::as_str), Some("combat"));
            }
            other => panic!("expected flow, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn approved_member_cannot_start_a_new_application() {
        let fx = fixture();
        let applicant = english_sender(100);
        fx.storage
            .mark_application_status(100, ApplicationStatus::Approved, None, Some("en".into()))
            .await
            .expect("mark approved");

        fx.dispatcher
            .dispatch(press(&applicant, "b100", "m1", "apply_for_guild"))
            .await;
        assert_eq!(
            fx.transport.last_text().await,
            ENGLISH_TEXTS.apply_already_member
        );

        let context = fx.dispatcher.context();
        let store = context.store.lock().await;
        assert!(store
            .actor_if_present(100)
            .is_none_or(|actor| actor.pending.is_none()));
    }

    #[tokio::test]
    async fn admin_without_membership_can_still_apply() {
        let fx = fixture();
        let admin = english_sender(1);

        fx.dispatcher
            .dispatch(press(&admin, "b1", "m1", "apply_for_guild"))
            .await;

        let context = fx.dispatcher.context();
        let store = context.store.lock().await;
        match &store.actor_if_present(1).expect("actor exists").pending {
            PendingAction::Flow(flow) => {
                assert_eq!(flow.pending_question_id.as_deref(), Some("role"));
            }
            other => panic!("expected flow, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn stale_question_pointer_reprompts_without_consuming_the_message() {
        let fx = fixture();
        let applicant = english_sender(100);
        {
            let context = fx.dispatcher.context();
            let mut store = context.store.lock().await;
            store.actor(100).pending = PendingAction::Flow(FlowState {
                answers: Vec::new(),
                answered_values: HashMap::new(),
                form_snapshot: default_form("en"),
                pending_question_id: Some("ghost".to_string()),
                locale: "en".to_string(),
            });
        }

        fx.dispatcher
            .dispatch(private_text(&applicant, "not meant as an answer"))
            .await;

        // Nothing submitted, nothing recorded; the applicant was shown
        // the recomputed question instead.
        assert!(!fx.storage.has_application(100).await);
        let last = fx.transport.last_text().await;
        assert!(last.contains("combat / support"), "got: {last}");

        let context = fx.dispatcher.context();
        let store = context.store.lock().await;
        match &store.actor_if_present(100).expect("actor exists").pending {
            PendingAction::Flow(flow) => {
                assert_eq!(flow.pending_question_id.as_deref(), Some("role"));
                assert!(flow.answers.is_empty());
            }
            other => panic!("expected flow, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn optional_text_question_accepts_a_blank_answer() {
        let fx = fixture();
        let applicant = english_sender(100);
        let motto = parse_question(
            r#"{"question_id": "motto", "prompt": "A motto, if you have one:", "required": false}"#,
        )
        .expect("valid definition");
        {
            let context = fx.dispatcher.context();
            let mut store = context.store.lock().await;
            store.actor(100).pending = PendingAction::Flow(FlowState {
                answers: Vec::new(),
                answered_values: HashMap::new(),
                form_snapshot: vec![motto],
                pending_question_id: Some("motto".to_string()),
                locale: "en".to_string(),
            });
        }

        fx.dispatcher.dispatch(private_text(&applicant, "   ")).await;

        let application = fx.storage.get_application(100).await.expect("submitted");
        assert_eq!(application.responses.len(), 1);
        assert_eq!(application.responses[0].answer, "");
    }

    #[tokio::test]
    async fn required_text_question_rejects_a_blank_answer() {
        let fx = fixture();
        let applicant = english_sender(100);
        let goals = parse_question(
            r#"{"question_id": "goals", "prompt": "What are your goals?"}"#,
        )
        .expect("valid definition");
        {
            let context = fx.dispatcher.context();
            let mut store = context.store.lock().await;
            store.actor(100).pending = PendingAction::Flow(FlowState {
                answers: Vec::new(),
                answered_values: HashMap::new(),
                form_snapshot: vec![goals],
                pending_question_id: Some("goals".to_string()),
                locale: "en".to_string(),
            });
        }

        fx.dispatcher.dispatch(private_text(&applicant, "   ")).await;

        assert!(!fx.storage.has_application(100).await);
        assert_eq!(fx.transport.last_text().await, ENGLISH_TEXTS.flow_empty_answer);
        let context = fx.dispatcher.context();
        let store = context.store.lock().await;
        match &store.actor_if_present(100).expect("actor exists").pending {
            PendingAction::Flow(flow) => assert!(flow.answers.is_empty()),
            other => panic!("expected flow, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn review_approval_notifies_applicant_and_is_at_most_once() {
        let fx = fixture();
        seed_application(&fx.storage, 100).await;
        let admin = Sender::new(1);

        fx.dispatcher
            .dispatch(press(&admin, "g900", "m-rev", "application:100:approve"))
            .await;
        fx.dispatcher
            .dispatch(group_text(&admin, "g900", "welcome aboard"))
            .await;

        let entry = fx.storage.application_status(100).await.expect("history");
        assert_eq!(entry.status, ApplicationStatus::Approved);
        assert_eq!(entry.note.as_deref(), Some("welcome aboard"));

        // Applicant notified in their own chat, in their language.
        let notices = fx.transport.sent_to("b100").await;
        assert!(
            notices.iter().any(|text| text.contains("approved")),
            "got: {notices:?}"
        );

        // A second press finds the application gone.
        fx.dispatcher
            .dispatch(press(&admin, "g900", "m-rev", "application:100:approve"))
            .await;
        assert_eq!(fx.transport.last_text().await, PERSIAN_TEXTS.review_not_found);
    }

    #[tokio::test]
    async fn skip_keyword_finishes_review_without_a_note() {
        let fx = fixture();
        seed_application(&fx.storage, 100).await;
        let admin = Sender::new(1);

        fx.dispatcher
            .dispatch(press(&admin, "g900", "m-rev", "application:100:deny"))
            .await;
        fx.dispatcher
            .dispatch(group_text(&admin, "g900", PERSIAN_TEXTS.skip_keyword))
            .await;

        let entry = fx.storage.application_status(100).await.expect("history");
        assert_eq!(entry.status, ApplicationStatus::Denied);
        assert!(entry.note.is_none());
    }

    #[tokio::test]
    async fn cancel_during_review_restores_the_application() {
        let fx = fixture();
        seed_application(&fx.storage, 100).await;
        let admin = Sender::new(1);

        fx.dispatcher
            .dispatch(press(&admin, "g900", "m-rev", "application:100:approve"))
            .await;
        assert!(!fx.storage.has_application(100).await);

        fx.dispatcher.dispatch(group_text(&admin, "g900", "/cancel")).await;
        assert!(fx.storage.has_application(100).await);
    }

    #[tokio::test]
    async fn question_add_retries_on_bad_json_then_saves() {
        let fx = fixture();
        let admin = Sender::new(1);

        fx.dispatcher
            .dispatch(press(&admin, "b1", "m1", "admin_panel:manage_questions:add"))
            .await;
        fx.dispatcher.dispatch(private_text(&admin, "{nope")).await;
        assert_eq!(
            fx.transport.last_text().await,
            PERSIAN_TEXTS.question_invalid_payload
        );

        fx.dispatcher
            .dispatch(private_text(
                &admin,
                r#"{"question_id": "clan_tag", "prompt": "Clan tag?", "order": 9}"#,
            ))
            .await;
        assert_eq!(fx.transport.last_text().await, PERSIAN_TEXTS.question_saved);
        let form = fx.storage.application_form("fa").await;
        assert!(form.iter().any(|q| q.question_id == "clan_tag"));
    }

    #[tokio::test]
    async fn admin_panel_rejects_non_admins() {
        let fx = fixture();
        let outsider = english_sender(5);
        fx.dispatcher.dispatch(press(&outsider, "b5", "m1", "admin_panel")).await;
        assert_eq!(
            fx.transport.last_text().await,
            crate::strings::ENGLISH_TEXTS.admin_only
        );
    }

    #[tokio::test]
    async fn bare_promote_arms_a_prompt_and_consumes_the_next_id() {
        let fx = fixture();
        let owner = Sender::new(1);

        fx.dispatcher.dispatch(private_text(&owner, "/promote")).await;
        fx.dispatcher.dispatch(private_text(&owner, "not a number")).await;
        assert_eq!(fx.transport.last_text().await, PERSIAN_TEXTS.admin_invalid_id);

        fx.dispatcher.dispatch(private_text(&owner, "42")).await;
        assert!(fx.storage.is_admin(42).await);
    }

    #[tokio::test]
    async fn language_switch_is_remembered_per_actor() {
        let fx = fixture();
        let user = Sender::new(7);

        fx.dispatcher.dispatch(press(&user, "b7", "m1", "language_menu")).await;
        fx.dispatcher.dispatch(press(&user, "b7", "m1", "set_language:en")).await;

        let context = fx.dispatcher.context();
        {
            let store = context.store.lock().await;
            assert_eq!(
                store
                    .actor_if_present(7)
                    .and_then(|actor| actor.preferred_language.as_deref()),
                Some("en")
            );
        }
        fx.dispatcher.dispatch(private_text(&user, "/status")).await;
        assert_eq!(
            fx.transport.last_text().await,
            crate::strings::ENGLISH_TEXTS.status_none
        );
    }

    #[tokio::test]
    async fn withdraw_removes_the_pending_application() {
        let fx = fixture();
        seed_application(&fx.storage, 100).await;
        let applicant = english_sender(100);

        fx.dispatcher.dispatch(private_text(&applicant, "/withdraw")).await;
        assert!(!fx.storage.has_application(100).await);
        let entry = fx.storage.application_status(100).await.expect("history");
        assert_eq!(entry.status, ApplicationStatus::Withdrawn);
    }
}
