use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Deserializer, Serialize};

pub type QuestionId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_index: Option<usize>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub correct_indices: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub answer_explanations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
}

impl Question {
    /// Multi-select when more than one correct index is declared, or when the
    /// text asks to "select all".
    pub fn is_multi_select(&self) -> bool {
        self.correct_indices.len() > 1 || self.text.to_lowercase().contains("select all")
    }

    pub fn code(&self) -> Option<&str> {
        self.code_snippet
            .as_deref()
            .filter(|c| !c.trim().is_empty())
    }
}

/// A user's choice for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Single(usize),
    Multi(BTreeSet<usize>),
}

impl Selection {
    pub fn contains(&self, idx: usize) -> bool {
        match self {
            Selection::Single(i) => *i == idx,
            Selection::Multi(set) => set.contains(&idx),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Selection::Single(_) => false,
            Selection::Multi(set) => set.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub counts: BTreeMap<usize, u64>,
}

impl Stats {
    /// Rounded share of answers that picked `idx`, or None with no answers yet.
    pub fn percent(&self, idx: usize) -> Option<u32> {
        if self.total == 0 {
            return None;
        }
        let count = self.counts.get(&idx).copied().unwrap_or(0);
        Some(((count as f64 / self.total as f64) * 100.0).round() as u32)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub correct: bool,
    #[serde(default)]
    pub correct_index: Option<usize>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub correct_indices: Vec<usize>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub answer_explanations: Vec<String>,
    #[serde(default)]
    pub stats: Option<Stats>,
}

impl Feedback {
    pub fn is_correct_option(&self, idx: usize) -> bool {
        self.correct_index == Some(idx) || self.correct_indices.contains(&idx)
    }
}

/// A checked answer: what was picked and what the server said about it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRecord {
    pub selection: Selection,
    pub feedback: Feedback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: serde_json::Value,
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAnswerRequest {
    pub question_id: QuestionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_option_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_indices: Option<Vec<usize>>,
}

impl CheckAnswerRequest {
    pub fn new(
        question_id: QuestionId,
        selection: Option<&Selection>,
        username: Option<&str>,
    ) -> Self {
        let (selected_option_index, selected_indices) = match selection {
            Some(Selection::Single(i)) => (Some(*i), None),
            Some(Selection::Multi(set)) => (None, Some(set.iter().copied().collect())),
            None => (None, None),
        };
        Self {
            question_id,
            selected_option_index,
            username: username.map(str::to_string),
            selected_indices,
        }
    }
}

/// One previously checked answer from `/user/{name}/progress`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedAnswer {
    #[serde(default)]
    pub selected_index: Option<usize>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub selected_indices: Vec<usize>,
    pub feedback: Feedback,
}

impl SavedAnswer {
    pub fn into_record(self) -> AnswerRecord {
        let selection = if self.selected_indices.is_empty() {
            Selection::Single(self.selected_index.unwrap_or_default())
        } else {
            Selection::Multi(self.selected_indices.into_iter().collect())
        };
        AnswerRecord {
            selection,
            feedback: self.feedback,
        }
    }
}

pub type Progress = HashMap<QuestionId, SavedAnswer>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPage {
    #[serde(default)]
    pub content: Vec<Question>,
    #[serde(default)]
    pub total_pages: u32,
}

/// Payload for `POST /admin/questions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    pub options: Vec<String>,
    pub correct_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
