use crate::model::{Feedback, Question, Selection};

/// One option as the card should show it.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionView {
    pub label: char,
    pub text: String,
    pub selected: bool,
    /// The server marked this option correct.
    pub correct: bool,
    /// Picked, but the answer was judged wrong.
    pub wrong_pick: bool,
    pub percent: Option<u32>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub correct: bool,
    pub explanation: Option<String>,
}

/// Renderable projection of a question. Pure: the same inputs always give
/// the same view.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: i64,
    pub text: String,
    pub code: Option<String>,
    pub multi: bool,
    pub options: Vec<OptionView>,
    pub selectable: bool,
    pub shows_submit: bool,
    pub banner: Option<Banner>,
}

pub fn option_label(idx: usize) -> char {
    (b'a' + (idx % 26) as u8) as char
}

pub fn label_index(c: char) -> Option<usize> {
    c.is_ascii_lowercase().then(|| (c as u8 - b'a') as usize)
}

impl CardView {
    pub fn build(
        question: &Question,
        selection: Option<&Selection>,
        feedback: Option<&Feedback>,
        locked: bool,
    ) -> Self {
        let multi = question.is_multi_select();
        let selectable = feedback.is_none() && !locked;
        let stats = feedback.and_then(|f| f.stats.as_ref());

        let options = question
            .options
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let selected = selection.map(|s| s.contains(i)).unwrap_or(false);
                let correct = feedback.map(|f| f.is_correct_option(i)).unwrap_or(false);
                let wrong_pick = feedback.map(|f| !f.correct).unwrap_or(false) && selected && !correct;
                let explanation = feedback.and_then(|f| {
                    f.answer_explanations
                        .get(i)
                        .or_else(|| question.answer_explanations.get(i))
                        .filter(|e| !e.trim().is_empty())
                        .cloned()
                });
                OptionView {
                    label: option_label(i),
                    text: text.clone(),
                    selected,
                    correct,
                    wrong_pick,
                    percent: stats.and_then(|s| s.percent(i)),
                    explanation,
                }
            })
            .collect();

        let banner = feedback.map(|f| Banner {
            correct: f.correct,
            explanation: f
                .explanation
                .clone()
                .or_else(|| question.explanation.clone())
                .filter(|e| !e.trim().is_empty()),
        });

        Self {
            id: question.id,
            text: question.text.clone(),
            code: question.code().map(str::to_string),
            multi,
            options,
            selectable,
            shows_submit: multi && selectable,
            banner,
        }
    }
}
