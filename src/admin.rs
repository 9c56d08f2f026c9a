//! Admin authoring: the single-question form and bulk JSON import.

use crate::error::InputError;
use crate::model::NewQuestion;

pub const OPTION_COUNT: usize = 4;

/// Fields of the "post new question" form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Text,
    Code,
    Option(usize),
    CorrectIndex,
    Explanation,
}

impl FormField {
    pub const ORDER: [FormField; 8] = [
        FormField::Text,
        FormField::Code,
        FormField::Option(0),
        FormField::Option(1),
        FormField::Option(2),
        FormField::Option(3),
        FormField::CorrectIndex,
        FormField::Explanation,
    ];

    pub fn next(self) -> Self {
        let pos = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(pos + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let pos = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(pos + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn label(self) -> String {
        match self {
            FormField::Text => "Question".to_string(),
            FormField::Code => "Code snippet".to_string(),
            FormField::Option(i) => format!("Option {}", i + 1),
            FormField::CorrectIndex => "Correct option".to_string(),
            FormField::Explanation => "Explanation".to_string(),
        }
    }

    pub fn is_multiline(self) -> bool {
        matches!(self, FormField::Text | FormField::Code | FormField::Explanation)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionForm {
    pub text: String,
    pub code_snippet: String,
    pub options: [String; OPTION_COUNT],
    /// None asks the server to detect the correct option.
    pub correct_index: Option<usize>,
    pub explanation: String,
    pub submitting: bool,
}

impl QuestionForm {
    pub fn field_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Text => Some(&mut self.text),
            FormField::Code => Some(&mut self.code_snippet),
            FormField::Option(i) => self.options.get_mut(i),
            FormField::Explanation => Some(&mut self.explanation),
            FormField::CorrectIndex => None,
        }
    }

    pub fn field(&self, field: FormField) -> String {
        match field {
            FormField::Text => self.text.clone(),
            FormField::Code => self.code_snippet.clone(),
            FormField::Option(i) => self.options.get(i).cloned().unwrap_or_default(),
            FormField::Explanation => self.explanation.clone(),
            FormField::CorrectIndex => match self.correct_index {
                Some(i) => format!("Option {}", i + 1),
                None => "Auto-detect (AI)".to_string(),
            },
        }
    }

    /// Cycle auto -> 1 -> 2 -> 3 -> 4 -> auto.
    pub fn cycle_correct_index(&mut self) {
        self.correct_index = match self.correct_index {
            None => Some(0),
            Some(i) if i + 1 < OPTION_COUNT => Some(i + 1),
            Some(_) => None,
        };
    }

    pub fn to_payload(&self) -> Result<NewQuestion, InputError> {
        if self.text.trim().is_empty() {
            return Err(InputError::MissingField("Question text"));
        }
        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err(InputError::MissingField("Every option"));
        }
        if let Some(i) = self.correct_index {
            if i >= OPTION_COUNT {
                return Err(InputError::CorrectIndexOutOfRange { max: OPTION_COUNT });
            }
        }
        Ok(NewQuestion {
            text: self.text.trim().to_string(),
            code_snippet: non_empty(&self.code_snippet),
            options: self.options.iter().map(|o| o.trim().to_string()).collect(),
            correct_index: self.correct_index,
            explanation: non_empty(&self.explanation),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim_end();
    if t.trim().is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// Parse bulk input. Anything but a JSON array is rejected here, before any
/// request is made.
pub fn parse_bulk(input: &str) -> Result<Vec<serde_json::Value>, InputError> {
    match serde_json::from_str::<serde_json::Value>(input)? {
        serde_json::Value::Array(items) => Ok(items),
        _ => Err(InputError::NotAnArray),
    }
}

/// Bulk import screen state.
#[derive(Debug, Clone, Default)]
pub struct BulkImport {
    pub input: String,
    pub status: String,
    pub in_flight: bool,
}

impl BulkImport {
    pub fn begin(&mut self) -> Option<Vec<serde_json::Value>> {
        if self.in_flight {
            return None;
        }
        match parse_bulk(&self.input) {
            Ok(items) => {
                self.status = "Processing... this may take a moment for AI analysis.".to_string();
                self.in_flight = true;
                Some(items)
            }
            Err(e) => {
                self.status = format!("Error: {}", e);
                None
            }
        }
    }

    pub fn finish(&mut self, imported: Result<usize, String>) {
        self.in_flight = false;
        match imported {
            Ok(n) => {
                self.input.clear();
                self.status = format!("Imported {} questions", n);
            }
            Err(e) => self.status = format!("Error: {}", e),
        }
    }
}
