//! # Storage Service
//!
//! Durable collections behind the conversation core: admins,
//! applications with their review history, the XP ledger, cup records
//! and per-locale question definitions. One JSON snapshot on disk,
//! written atomically (temp file + rename) after every mutation, with an
//! optional backup copy of the previous snapshot.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::application::form::{default_form, QuestionDefinition};
use crate::domain::types::UserId;

fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Denied,
    Withdrawn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationResponse {
    pub question_id: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub user_id: UserId,
    /// Private chat the applicant can be notified in.
    #[serde(default)]
    pub chat_id: Option<String>,
    pub full_name: String,
    #[serde(default)]
    pub username: Option<String>,
    /// Collapsed question/answer text used in notifications.
    pub answer: String,
    #[serde(default)]
    pub responses: Vec<ApplicationResponse>,
    #[serde(default)]
    pub language_code: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationHistoryEntry {
    pub status: ApplicationStatus,
    #[serde(default)]
    pub note: Option<String>,
    pub updated_at: String,
    #[serde(default)]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRecord {
    pub user_id: UserId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cup {
    pub title: String,
    pub description: String,
    pub podium: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StorageData {
    #[serde(default)]
    admins: Vec<AdminRecord>,
    #[serde(default)]
    applications: HashMap<UserId, Application>,
    #[serde(default)]
    history: HashMap<UserId, ApplicationHistoryEntry>,
    /// chat id -> user id -> xp total.
    #[serde(default)]
    xp: HashMap<String, HashMap<UserId, i64>>,
    #[serde(default)]
    profiles: HashMap<UserId, ProfileRecord>,
    #[serde(default)]
    cups: HashMap<String, Vec<Cup>>,
    /// locale -> customized question definitions.
    #[serde(default)]
    forms: HashMap<String, Vec<QuestionDefinition>>,
}

pub struct Storage {
    path: Option<PathBuf>,
    backup_path: Option<PathBuf>,
    data: RwLock<StorageData>,
}

impl Storage {
    /// Storage without a disk snapshot. Used by tests.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            backup_path: None,
            data: RwLock::new(StorageData::default()),
        }
    }

    /// Load the snapshot at `path`, or start empty when none exists yet.
    pub fn load(path: impl AsRef<Path>, backup_path: Option<PathBuf>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            StorageData::default()
        };
        Ok(Self {
            path: Some(path),
            backup_path,
            data: RwLock::new(data),
        })
    }

    async fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = {
            let data = self.data.read().await;
            serde_json::to_string_pretty(&*data).context("Failed to serialize storage")?
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        if let (Some(backup), true) = (&self.backup_path, path.exists()) {
            if let Err(error) = fs::copy(path, backup) {
                tracing::warn!("Failed to write storage backup: {error}");
            }
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }

    // --- admins ---

    pub async fn is_admin(&self, user_id: UserId) -> bool {
        self.data
            .read()
            .await
            .admins
            .iter()
            .any(|admin| admin.user_id == user_id)
    }

    pub async fn admin_details(&self) -> Vec<AdminRecord> {
        self.data.read().await.admins.clone()
    }

    /// Returns `Ok(false)` when the user already is an admin.
    pub async fn add_admin(
        &self,
        user_id: UserId,
        username: Option<String>,
        full_name: Option<String>,
    ) -> Result<bool> {
        {
            let mut data = self.data.write().await;
            if data.admins.iter().any(|admin| admin.user_id == user_id) {
                return Ok(false);
            }
            data.admins.push(AdminRecord {
                user_id,
                username,
                full_name,
            });
        }
        self.persist().await?;
        Ok(true)
    }

    /// Returns `Ok(false)` when the user was not an admin.
    pub async fn remove_admin(&self, user_id: UserId) -> Result<bool> {
        {
            let mut data = self.data.write().await;
            let before = data.admins.len();
            data.admins.retain(|admin| admin.user_id != user_id);
            if data.admins.len() == before {
                return Ok(false);
            }
        }
        self.persist().await?;
        Ok(true)
    }

    // --- applications ---

    pub async fn has_application(&self, user_id: UserId) -> bool {
        self.data.read().await.applications.contains_key(&user_id)
    }

    /// Store a new pending application. Returns `Ok(false)` on duplicate.
    #[allow(clippy::too_many_arguments)]
    pub async fn add_application(
        &self,
        user_id: UserId,
        chat_id: Option<String>,
        full_name: String,
        username: Option<String>,
        answer: String,
        responses: Vec<ApplicationResponse>,
        language_code: Option<String>,
    ) -> Result<bool> {
        {
            let mut data = self.data.write().await;
            if data.applications.contains_key(&user_id) {
                return Ok(false);
            }
            let now = timestamp();
            data.applications.insert(
                user_id,
                Application {
                    user_id,
                    chat_id,
                    full_name,
                    username,
                    answer,
                    responses,
                    language_code: language_code.clone(),
                    created_at: now.clone(),
                },
            );
            data.history.insert(
                user_id,
                ApplicationHistoryEntry {
                    status: ApplicationStatus::Pending,
                    note: None,
                    updated_at: now,
                    language_code,
                },
            );
        }
        self.persist().await?;
        Ok(true)
    }

    pub async fn get_application(&self, user_id: UserId) -> Option<Application> {
        self.data.read().await.applications.get(&user_id).cloned()
    }

    pub async fn pending_applications(&self) -> Vec<Application> {
        let data = self.data.read().await;
        let mut pending: Vec<Application> = data.applications.values().cloned().collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.user_id.cmp(&b.user_id)));
        pending
    }

    /// Atomic remove-and-return: a second caller observes `None`.
    pub async fn pop_application(&self, user_id: UserId) -> Result<Option<Application>> {
        let removed = self.data.write().await.applications.remove(&user_id);
        if removed.is_some() {
            self.persist().await?;
        }
        Ok(removed)
    }

    pub async fn mark_application_status(
        &self,
        user_id: UserId,
        status: ApplicationStatus,
        note: Option<String>,
        language_code: Option<String>,
    ) -> Result<()> {
        {
            let mut data = self.data.write().await;
            data.history.insert(
                user_id,
                ApplicationHistoryEntry {
                    status,
                    note,
                    updated_at: timestamp(),
                    language_code,
                },
            );
        }
        self.persist().await
    }

    /// Withdraw a pending application. Returns `Ok(false)` when none exists.
    pub async fn withdraw_application(&self, user_id: UserId) -> Result<bool> {
        {
            let mut data = self.data.write().await;
            let Some(application) = data.applications.remove(&user_id) else {
                return Ok(false);
            };
            data.history.insert(
                user_id,
                ApplicationHistoryEntry {
                    status: ApplicationStatus::Withdrawn,
                    note: None,
                    updated_at: timestamp(),
                    language_code: application.language_code,
                },
            );
        }
        self.persist().await?;
        Ok(true)
    }

    pub async fn application_status(&self, user_id: UserId) -> Option<ApplicationHistoryEntry> {
        self.data.read().await.history.get(&user_id).cloned()
    }

    pub async fn applicants_by_status(
        &self,
        status: ApplicationStatus,
    ) -> Vec<(UserId, ApplicationHistoryEntry)> {
        let data = self.data.read().await;
        let mut entries: Vec<(UserId, ApplicationHistoryEntry)> = data
            .history
            .iter()
            .filter(|(_, entry)| entry.status == status)
            .map(|(id, entry)| (*id, entry.clone()))
            .collect();
        entries.sort_by(|a, b| b.1.updated_at.cmp(&a.1.updated_at).then(a.0.cmp(&b.0)));
        entries
    }

    // --- xp ledger ---

    /// Add (or subtract) XP and return the new total, clamped at zero.
    pub async fn add_xp(
        &self,
        chat_id: &str,
        user_id: UserId,
        amount: i64,
        full_name: Option<String>,
        username: Option<String>,
    ) -> Result<i64> {
        let total = {
            let mut data = self.data.write().await;
            let ledger = data.xp.entry(chat_id.to_string()).or_default();
            let entry = ledger.entry(user_id).or_insert(0);
            *entry = (*entry + amount).max(0);
            let total = *entry;

            let profile = data.profiles.entry(user_id).or_default();
            if full_name.is_some() {
                profile.full_name = full_name;
            }
            if username.is_some() {
                profile.username = username;
            }
            total
        };
        self.persist().await?;
        Ok(total)
    }

    pub async fn user_xp(&self, chat_id: &str, user_id: UserId) -> Option<i64> {
        self.data
            .read()
            .await
            .xp
            .get(chat_id)
            .and_then(|ledger| ledger.get(&user_id))
            .copied()
    }

    /// Highest totals first; ties broken by user id for stable output.
    pub async fn xp_leaderboard(&self, chat_id: &str, limit: usize) -> Vec<(UserId, i64)> {
        let data = self.data.read().await;
        let Some(ledger) = data.xp.get(chat_id) else {
            return Vec::new();
        };
        let mut entries: Vec<(UserId, i64)> =
            ledger.iter().map(|(id, xp)| (*id, *xp)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.truncate(limit);
        entries
    }

    /// 1-based rank of the actor plus the number of tracked members.
    pub async fn xp_rank(&self, chat_id: &str, user_id: UserId) -> (Option<usize>, usize) {
        let data = self.data.read().await;
        let Some(ledger) = data.xp.get(chat_id) else {
            return (None, 0);
        };
        let mut entries: Vec<(UserId, i64)> =
            ledger.iter().map(|(id, xp)| (*id, *xp)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let rank = entries
            .iter()
            .position(|(id, _)| *id == user_id)
            .map(|index| index + 1);
        (rank, entries.len())
    }

    pub async fn display_name(&self, user_id: UserId) -> Option<String> {
        let data = self.data.read().await;
        let profile = data.profiles.get(&user_id)?;
        profile
            .full_name
            .clone()
            .or_else(|| profile.username.clone())
    }

    // --- cups ---

    pub async fn add_cup(
        &self,
        chat_id: &str,
        title: String,
        description: String,
        podium: Vec<String>,
    ) -> Result<()> {
        {
            let mut data = self.data.write().await;
            data.cups.entry(chat_id.to_string()).or_default().push(Cup {
                title,
                description,
                podium,
                created_at: timestamp(),
            });
        }
        self.persist().await
    }

    /// Most recent cups first.
    pub async fn cups(&self, chat_id: &str, limit: usize) -> Vec<Cup> {
        let data = self.data.read().await;
        let Some(cups) = data.cups.get(chat_id) else {
            return Vec::new();
        };
        cups.iter().rev().take(limit).cloned().collect()
    }

    // --- question definitions ---

    /// Customized form for the locale, or the built-in default.
    pub async fn application_form(&self, locale: &str) -> Vec<QuestionDefinition> {
        self.data
            .read()
            .await
            .forms
            .get(locale)
            .cloned()
            .unwrap_or_else(|| default_form(locale))
    }

    pub async fn upsert_question(
        &self,
        locale: &str,
        definition: QuestionDefinition,
    ) -> Result<()> {
        {
            let mut data = self.data.write().await;
            let form = data
                .forms
                .entry(locale.to_string())
                .or_insert_with(|| default_form(locale));
            match form
                .iter_mut()
                .find(|existing| existing.question_id == definition.question_id)
            {
                Some(existing) => *existing = definition,
                None => form.push(definition),
            }
        }
        self.persist().await
    }

    /// Returns `Ok(false)` when the question does not exist.
    pub async fn delete_question(&self, locale: &str, question_id: &str) -> Result<bool> {
        {
            let mut data = self.data.write().await;
            let form = data
                .forms
                .entry(locale.to_string())
                .or_insert_with(|| default_form(locale));
            let before = form.len();
            form.retain(|definition| definition.question_id != question_id);
            if form.len() == before {
                return Ok(false);
            }
        }
        self.persist().await?;
        Ok(true)
    }

    pub async fn import_form(
        &self,
        locale: &str,
        definitions: Vec<QuestionDefinition>,
    ) -> Result<()> {
        self.data
            .write()
            .await
            .forms
            .insert(locale.to_string(), definitions);
        self.persist().await
    }

    /// Drop the customized form so the built-in default applies again.
    pub async fn reset_form(&self, locale: &str) -> Result<()> {
        self.data.write().await.forms.remove(locale);
        self.persist().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_application_is_rejected() {
        let storage = Storage::in_memory();
        let added = storage
            .add_application(7, None, "A".into(), None, "answers".into(), Vec::new(), None)
            .await
            .expect("first insert succeeds");
        assert!(added);
        let duplicate = storage
            .add_application(7, None, "A".into(), None, "again".into(), Vec::new(), None)
            .await
            .expect("duplicate insert returns");
        assert!(!duplicate);
        assert!(storage.has_application(7).await);
    }

    #[tokio::test]
    async fn pop_application_is_at_most_once() {
        let storage = Storage::in_memory();
        storage
            .add_application(7, None, "A".into(), None, "x".into(), Vec::new(), None)
            .await
            .expect("insert");
        assert!(storage.pop_application(7).await.expect("pop").is_some());
        assert!(storage.pop_application(7).await.expect("pop again").is_none());
    }

    #[tokio::test]
    async fn withdraw_updates_history() {
        let storage = Storage::in_memory();
        storage
            .add_application(7, None, "A".into(), None, "x".into(), Vec::new(), Some("en".into()))
            .await
            .expect("insert");
        assert!(storage.withdraw_application(7).await.expect("withdraw"));
        let entry = storage.application_status(7).await.expect("history entry");
        assert_eq!(entry.status, ApplicationStatus::Withdrawn);
        assert!(!storage.withdraw_application(7).await.expect("second withdraw"));
    }

    #[tokio::test]
    async fn xp_ledger_ranks_and_clamps() {
        let storage = Storage::in_memory();
        storage.add_xp("g1", 1, 30, None, None).await.expect("xp");
        storage.add_xp("g1", 2, 50, None, None).await.expect("xp");
        let total = storage.add_xp("g1", 1, -100, None, None).await.expect("xp");
        assert_eq!(total, 0);

        let board = storage.xp_leaderboard("g1", 10).await;
        assert_eq!(board, vec![(2, 50), (1, 0)]);
        assert_eq!(storage.xp_rank("g1", 2).await, (Some(1), 2));
        assert_eq!(storage.xp_rank("g1", 9).await, (None, 2));
    }

    #[tokio::test]
    async fn form_edits_seed_from_default_and_reset_restores() {
        let storage = Storage::in_memory();
        let default_len = storage.application_form("en").await.len();
        assert!(storage
            .delete_question("en", "goals")
            .await
            .expect("delete known question"));
        assert_eq!(storage.application_form("en").await.len(), default_len - 1);
        storage.reset_form("en").await.expect("reset");
        assert_eq!(storage.application_form("en").await.len(), default_len);
        assert!(!storage
            .delete_question("en", "missing")
            .await
            .expect("delete unknown question"));
    }

    #[tokio::test]
    async fn snapshot_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");
        {
            let storage = Storage::load(&path, None).expect("load empty");
            storage
                .add_admin(3, Some("mod".into()), None)
                .await
                .expect("add admin");
            storage.add_xp("g1", 3, 10, None, None).await.expect("xp");
        }
        let reloaded = Storage::load(&path, None).expect("reload");
        assert!(reloaded.is_admin(3).await);
        assert_eq!(reloaded.user_xp("g1", 3).await, Some(10));
    }
}
