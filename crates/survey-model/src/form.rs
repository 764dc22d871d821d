//! Form state and the serializer that turns it into answers.
//!
//! The survey form is modelled as its entries in layout order, the same
//! view a browser gives of a submitted form: one `(name, value)` pair per
//! checked/filled control, so a multi-select contributes one pair per
//! checked box.

use crate::error::{Result, SurveyError};
use crate::types::{Answer, AnswerValue};
use std::collections::HashSet;

// =============================================================================
// Question Catalogue
// =============================================================================

pub const Q_ISSUE_FAMILY: &str = "q_issue_family";
pub const Q_IMPACT_MODE: &str = "q_impact_mode";
pub const Q_GEOGRAPHY: &str = "q_geography";
pub const Q_LOCATION: &str = "q_location";

/// The one multi-select question; all its values fold into a single answer
pub const Q_TOPICS: &str = "q_topics";

/// Questions that must have a value before a submission is valid
pub const REQUIRED_QUESTIONS: [&str; 3] = [Q_ISSUE_FAMILY, Q_IMPACT_MODE, Q_GEOGRAPHY];

// =============================================================================
// FormState
// =============================================================================

/// Current field values of the survey form, in layout order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    entries: Vec<(String, String)>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a form from `(name, value)` pairs in layout order
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }

    /// Parse `name=value` entries, as typed on a command line
    pub fn parse_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut form = Self::new();
        for entry in entries {
            let entry = entry.as_ref();
            let (name, value) = entry.split_once('=').ok_or_else(|| SurveyError::InvalidEntry {
                entry: entry.to_string(),
                reason: "expected name=value".to_string(),
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(SurveyError::InvalidEntry {
                    entry: entry.to_string(),
                    reason: "field name is empty".to_string(),
                });
            }
            form.push(name, value);
        }
        Ok(form)
    }

    /// Append an entry (builder-style use goes through `with`)
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// First non-empty value for a field, if any
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.entries()
            .find(|(field, value)| *field == name && !is_blank(value))
            .map(|(_, value)| value)
    }

    /// Number of required questions that currently have a selected value
    pub fn answered_required(&self) -> usize {
        REQUIRED_QUESTIONS
            .iter()
            .filter(|question| self.value_of(question).is_some())
            .count()
    }

    /// Required questions still unanswered, in catalogue order
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_QUESTIONS
            .iter()
            .copied()
            .filter(|question| self.value_of(question).is_none())
            .collect()
    }

    /// Check that every required question is answered
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SurveyError::MissingRequired {
                missing: missing.into_iter().map(String::from).collect(),
            })
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

// =============================================================================
// Serializer
// =============================================================================

/// Convert form state into the ordered answer list sent to the service.
///
/// ## Algorithm
/// 1. Walk entries in layout order, skipping the multi-select field
/// 2. Skip blank values
/// 3. Skip names already answered (first occurrence wins)
/// 4. Gather every non-blank multi-select value and, if any remain,
///    append one answer holding them in order
///
/// Pure function of the form; the result is never mutated afterwards.
pub fn serialize_answers(form: &FormState) -> Vec<Answer> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut answers = Vec::new();

    for (name, value) in form.entries() {
        if name == Q_TOPICS || is_blank(value) || !seen.insert(name) {
            continue;
        }
        answers.push(Answer::new(name, value));
    }

    let topics: Vec<String> = form
        .entries()
        .filter(|(name, value)| *name == Q_TOPICS && !is_blank(value))
        .map(|(_, value)| value.to_string())
        .collect();
    if !topics.is_empty() {
        answers.push(Answer::new(Q_TOPICS, AnswerValue::Multiple(topics)));
    }

    answers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_form() -> FormState {
        FormState::new()
            .with(Q_ISSUE_FAMILY, "health")
            .with(Q_IMPACT_MODE, "direct")
            .with(Q_GEOGRAPHY, "global")
    }

    #[test]
    fn test_serialize_preserves_layout_order() {
        let answers = serialize_answers(&full_form());

        assert_eq!(
            answers,
            vec![
                Answer::new(Q_ISSUE_FAMILY, "health"),
                Answer::new(Q_IMPACT_MODE, "direct"),
                Answer::new(Q_GEOGRAPHY, "global"),
            ]
        );
    }

    #[test]
    fn test_duplicate_names_keep_first_value() {
        let form = FormState::new()
            .with(Q_ISSUE_FAMILY, "health")
            .with(Q_ISSUE_FAMILY, "education");

        let answers = serialize_answers(&form);
        assert_eq!(answers, vec![Answer::new(Q_ISSUE_FAMILY, "health")]);
    }

    #[test]
    fn test_blank_first_occurrence_does_not_claim_name() {
        let form = FormState::new()
            .with(Q_LOCATION, "  ")
            .with(Q_LOCATION, "Minneapolis");

        let answers = serialize_answers(&form);
        assert_eq!(answers, vec![Answer::new(Q_LOCATION, "Minneapolis")]);
    }

    #[test]
    fn test_topics_fold_into_single_trailing_answer() {
        let form = FormState::new()
            .with(Q_TOPICS, "a")
            .with(Q_ISSUE_FAMILY, "health")
            .with(Q_TOPICS, "")
            .with(Q_TOPICS, "b");

        let answers = serialize_answers(&form);
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0], Answer::new(Q_ISSUE_FAMILY, "health"));
        assert_eq!(
            answers[1],
            Answer::new(Q_TOPICS, vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_all_blank_topics_are_omitted() {
        let form = full_form().with(Q_TOPICS, "").with(Q_TOPICS, " ");
        let answers = serialize_answers(&form);
        assert!(answers.iter().all(|answer| answer.question_id != Q_TOPICS));
    }

    #[test]
    fn test_empty_form_serializes_to_nothing() {
        assert!(serialize_answers(&FormState::new()).is_empty());
    }

    #[test]
    fn test_answered_required_counter() {
        assert_eq!(FormState::new().answered_required(), 0);

        let partial = FormState::new()
            .with(Q_ISSUE_FAMILY, "arts")
            .with(Q_GEOGRAPHY, "")
            .with(Q_LOCATION, "Duluth");
        assert_eq!(partial.answered_required(), 1);
        assert_eq!(partial.missing_required(), vec![Q_IMPACT_MODE, Q_GEOGRAPHY]);

        assert_eq!(full_form().answered_required(), 3);
        assert!(full_form().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_missing() {
        let err = FormState::new().with(Q_IMPACT_MODE, "direct").validate().unwrap_err();
        assert_eq!(
            err,
            SurveyError::MissingRequired {
                missing: vec![Q_ISSUE_FAMILY.to_string(), Q_GEOGRAPHY.to_string()],
            }
        );
    }

    #[test]
    fn test_parse_entries() {
        let form = FormState::parse_entries(["q_issue_family=health", "q_topics=water=life"]).unwrap();
        assert_eq!(form.value_of(Q_ISSUE_FAMILY), Some("health"));
        assert_eq!(form.value_of(Q_TOPICS), Some("water=life"));

        assert!(matches!(
            FormState::parse_entries(["no-separator"]),
            Err(SurveyError::InvalidEntry { .. })
        ));
        assert!(matches!(
            FormState::parse_entries(["=value"]),
            Err(SurveyError::InvalidEntry { .. })
        ));
    }
}
