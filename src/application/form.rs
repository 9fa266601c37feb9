//! # Application Form Model
//!
//! Declarative question definitions for the guild-application intake
//! flow, including ordering and conditional dependencies, plus the
//! eligibility rules the flow engine walks.
//!
//! A question whose `depends_on` references an unanswered question is
//! "not yet eligible" rather than skipped forever: it becomes eligible
//! the moment its dependency is answered with the expected value.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    #[default]
    Text,
    Choice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl QuestionOption {
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }

    /// Case-insensitive match of a trimmed answer against label or value.
    pub fn matches(&self, answer: &str) -> bool {
        let answer = answer.trim().to_lowercase();
        answer == self.value.to_lowercase()
            || self
                .label
                .as_deref()
                .is_some_and(|label| answer == label.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    pub question_id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub prompt: String,
    #[serde(default)]
    pub kind: QuestionKind,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub depends_on: Option<String>,
    #[serde(default)]
    pub depends_value: Option<String>,
}

fn default_required() -> bool {
    true
}

impl QuestionDefinition {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(&self.prompt)
    }

    pub fn option_labels(&self) -> Vec<&str> {
        self.options
            .iter()
            .map(QuestionOption::display_label)
            .collect()
    }

    /// Find the option the answer selects, returning the canonical value
    /// and the display label. First match wins.
    pub fn match_option(&self, answer: &str) -> Option<(&str, &str)> {
        if answer.trim().is_empty() {
            return None;
        }
        self.options
            .iter()
            .find(|option| option.matches(answer))
            .map(|option| (option.value.as_str(), option.display_label()))
    }
}

/// Decode one question definition from an admin-supplied JSON payload.
pub fn parse_question(payload: &str) -> Option<QuestionDefinition> {
    let definition: QuestionDefinition = serde_json::from_str(payload).ok()?;
    if definition.question_id.is_empty() {
        return None;
    }
    Some(definition)
}

/// Decode a full form from an admin-supplied JSON array payload.
pub fn parse_form(payload: &str) -> Option<Vec<QuestionDefinition>> {
    let definitions: Vec<QuestionDefinition> = serde_json::from_str(payload).ok()?;
    if definitions.iter().any(|d| d.question_id.is_empty()) {
        return None;
    }
    Some(definitions)
}

pub fn find_question<'a>(
    form: &'a [QuestionDefinition],
    question_id: &str,
) -> Option<&'a QuestionDefinition> {
    form.iter()
        .find(|definition| definition.question_id == question_id)
}

/// First definition, in ascending `order`, that is unanswered and whose
/// dependency (if any) is satisfied by the answers given so far.
pub fn next_eligible_question<'a>(
    form: &'a [QuestionDefinition],
    answered: &HashMap<String, String>,
) -> Option<&'a QuestionDefinition> {
    let mut ordered: Vec<&QuestionDefinition> = form.iter().collect();
    ordered.sort_by_key(|definition| definition.order);

    ordered.into_iter().find(|definition| {
        if answered.contains_key(&definition.question_id) {
            return false;
        }
        match &definition.depends_on {
            None => true,
            Some(dependency) => match answered.get(dependency) {
                None => false,
                Some(value) => definition
                    .depends_value
                    .as_deref()
                    .map_or(true, |expected| value == expected),
            },
        }
    })
}

/// Built-in form used until admins customize one for a locale.
pub fn default_form(locale: &str) -> Vec<QuestionDefinition> {
    let persian = locale == "fa";
    let option = |value: &str, fa: &str, en: &str| QuestionOption {
        value: value.to_string(),
        label: Some(if persian { fa.to_string() } else { en.to_string() }),
    };
    let text = |id: &str, order: i64, fa: &str, en: &str| QuestionDefinition {
        question_id: id.to_string(),
        title: None,
        prompt: if persian { fa.to_string() } else { en.to_string() },
        kind: QuestionKind::Text,
        required: true,
        order,
        options: Vec::new(),
        depends_on: None,
        depends_value: None,
    };

    let mut form = vec![QuestionDefinition {
        question_id: "role".to_string(),
        title: None,
        prompt: if persian {
            "نقش مورد نظر خود در گیلد را انتخاب کنید (رزمی / پشتیبانی):".to_string()
        } else {
            "Pick the guild role you are applying for (combat / support):".to_string()
        },
        kind: QuestionKind::Choice,
        required: true,
        order: 1,
        options: vec![
            option("combat", "رزمی", "Combat"),
            option("support", "پشتیبانی", "Support"),
        ],
        depends_on: None,
        depends_value: None,
    }];

    let mut followup_combat = text(
        "followup_combat",
        2,
        "تجربه‌های رزمی خود را شرح دهید:",
        "Describe your combat experience:",
    );
    followup_combat.depends_on = Some("role".to_string());
    followup_combat.depends_value = Some("combat".to_string());
    form.push(followup_combat);

    let mut followup_support = text(
        "followup_support",
        2,
        "تجربه‌های پشتیبانی خود را شرح دهید:",
        "Describe your support experience:",
    );
    followup_support.depends_on = Some("role".to_string());
    followup_support.depends_value = Some("support".to_string());
    form.push(followup_support);

    form.push(text(
        "goals",
        3,
        "هدف شما از پیوستن به گیلد چیست؟",
        "What are your goals in joining the guild?",
    ));
    form.push(text(
        "availability",
        4,
        "چه روزها و ساعاتی در دسترس هستید؟",
        "Which days and hours are you available?",
    ));
    form
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answered(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn first_eligible_is_lowest_order_unanswered() {
        let form = default_form("en");
        let next = next_eligible_question(&form, &HashMap::new()).expect("role is eligible");
        assert_eq!(next.question_id, "role");
    }

    #[test]
    fn dependent_question_is_gated_until_dependency_matches() {
        let form = default_form("en");

        // Unanswered dependency: neither follow-up is eligible.
        let next = next_eligible_question(&form, &answered(&[("goals", "win")]))
            .expect("role still pending");
        assert_eq!(next.question_id, "role");

        // Combat answer unlocks only the combat follow-up.
        let next = next_eligible_question(&form, &answered(&[("role", "combat")]))
            .expect("follow-up eligible");
        assert_eq!(next.question_id, "followup_combat");

        // The support follow-up never becomes eligible on this path.
        let all_but_support = answered(&[
            ("role", "combat"),
            ("followup_combat", "x"),
            ("goals", "y"),
            ("availability", "z"),
        ]);
        assert!(next_eligible_question(&form, &all_but_support).is_none());
    }

    #[test]
    fn choice_matching_is_case_insensitive_on_label_and_value() {
        let form = default_form("en");
        let role = find_question(&form, "role").expect("role exists");
        assert_eq!(role.match_option("COMBAT"), Some(("combat", "Combat")));
        assert_eq!(role.match_option("  combat "), Some(("combat", "Combat")));
        assert_eq!(role.match_option("Support"), Some(("support", "Support")));
        assert_eq!(role.match_option("wizard"), None);
        assert_eq!(role.match_option(""), None);
    }

    #[test]
    fn question_payload_round_trip() {
        let payload = r#"{
            "question_id": "clan_tag",
            "title": "Clan tag",
            "prompt": "What is your clan tag?",
            "kind": "text",
            "order": 9,
            "required": false
        }"#;
        let definition = parse_question(payload).expect("valid payload parses");
        assert_eq!(definition.question_id, "clan_tag");
        assert!(!definition.required);
        assert_eq!(definition.kind, QuestionKind::Text);

        assert!(parse_question("{not json").is_none());
        assert!(parse_question(r#"{"question_id": "", "prompt": "p"}"#).is_none());
    }

    #[test]
    fn form_payload_rejects_non_arrays_and_bad_entries() {
        assert!(parse_form(r#"{"question_id": "a", "prompt": "p"}"#).is_none());
        assert!(parse_form(r#"[{"question_id": "", "prompt": "p"}]"#).is_none());
        let parsed = parse_form(r#"[{"question_id": "a", "prompt": "p"}]"#)
            .expect("valid array parses");
        assert_eq!(parsed.len(), 1);
    }
}
