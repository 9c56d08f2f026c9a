//! Paginated question browser with one-shot answering.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{info, warn};

use crate::api::QuizApi;
use crate::error::ApiError;
use crate::model::{
    AnswerRecord, CheckAnswerRequest, Feedback, Progress, Question, QuestionId, QuestionPage,
    Selection,
};

#[derive(Debug, Clone)]
pub struct Browser {
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub questions: Vec<Question>,
    pub answers: HashMap<QuestionId, AnswerRecord>,
    /// Multi-select picks not yet sent for checking.
    pub drafts: HashMap<QuestionId, BTreeSet<usize>>,
    pub pending: HashSet<QuestionId>,
    pub score: usize,
    pub loading: bool,
}

impl Browser {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 0,
            page_size,
            total_pages: 0,
            questions: Vec::new(),
            answers: HashMap::new(),
            drafts: HashMap::new(),
            pending: HashSet::new(),
            score: 0,
            loading: false,
        }
    }

    pub fn begin_load(&mut self) -> (u32, u32) {
        self.loading = true;
        (self.page, self.page_size)
    }

    pub fn apply_page(&mut self, page: u32, result: Result<QuestionPage, ApiError>) {
        if page != self.page {
            // a newer page was requested meanwhile
            return;
        }
        self.loading = false;
        match result {
            Ok(data) => {
                self.questions = data.content;
                self.total_pages = data.total_pages;
            }
            Err(e) => {
                warn!(page, "failed to load questions: {}", e);
                self.questions.clear();
            }
        }
    }

    pub async fn load<A: QuizApi>(&mut self, api: &A) {
        let (page, size) = self.begin_load();
        let result = api.questions(page, size).await;
        self.apply_page(page, result);
    }

    /// Move to `page` if it exists. Returns true when a reload is needed.
    pub fn goto_page(&mut self, page: u32) -> bool {
        if page == self.page || page >= self.total_pages {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        if self.page + 1 >= self.total_pages {
            return false;
        }
        self.goto_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.goto_page(self.page - 1)
    }

    /// Merge answers saved on the server. The score is recomputed from them.
    pub fn merge_progress(&mut self, progress: Progress) {
        let saved: HashMap<QuestionId, AnswerRecord> = progress
            .into_iter()
            .map(|(id, saved)| (id, saved.into_record()))
            .collect();
        self.score = saved.values().filter(|r| r.feedback.correct).count();
        info!(saved = saved.len(), score = self.score, "merged saved progress");
        for id in saved.keys() {
            self.drafts.remove(id);
        }
        self.answers.extend(saved);
    }

    pub fn is_locked(&self, id: QuestionId) -> bool {
        self.answers.contains_key(&id) || self.pending.contains(&id)
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Current (possibly unsent) selection for display.
    pub fn selection(&self, id: QuestionId) -> Option<Selection> {
        if let Some(record) = self.answers.get(&id) {
            return Some(record.selection.clone());
        }
        self.drafts.get(&id).map(|set| Selection::Multi(set.clone()))
    }

    /// Toggle an option in a multi-select draft. No-op once answered.
    pub fn toggle_draft(&mut self, id: QuestionId, idx: usize) {
        if self.is_locked(id) {
            return;
        }
        let set = self.drafts.entry(id).or_default();
        if !set.remove(&idx) {
            set.insert(idx);
        }
    }

    /// Start checking an answer. Returns None when the question is already
    /// answered, being checked, or the selection is empty.
    pub fn begin_answer(
        &mut self,
        id: QuestionId,
        selection: Selection,
        username: Option<&str>,
    ) -> Option<CheckAnswerRequest> {
        if self.is_locked(id) || selection.is_empty() {
            return None;
        }
        let question = self.question(id)?;
        let valid = match &selection {
            Selection::Single(i) => *i < question.options.len(),
            Selection::Multi(set) => set.iter().all(|i| *i < question.options.len()),
        };
        if !valid {
            return None;
        }
        self.pending.insert(id);
        Some(CheckAnswerRequest::new(id, Some(&selection), username))
    }

    /// Single-select answers on pick; multi-select submits its draft.
    pub fn answer_request(
        &mut self,
        id: QuestionId,
        idx: Option<usize>,
        username: Option<&str>,
    ) -> Option<CheckAnswerRequest> {
        let multi = self.question(id)?.is_multi_select();
        let selection = if multi {
            Selection::Multi(self.drafts.get(&id).cloned().unwrap_or_default())
        } else {
            Selection::Single(idx?)
        };
        self.begin_answer(id, selection, username)
    }

    pub fn finish_answer(
        &mut self,
        request: &CheckAnswerRequest,
        result: Result<Feedback, ApiError>,
    ) {
        let id = request.question_id;
        self.pending.remove(&id);
        let feedback = match result {
            Ok(feedback) => feedback,
            Err(e) => {
                warn!(question = id, "check failed: {}", e);
                return;
            }
        };
        if self.answers.contains_key(&id) {
            return;
        }
        let selection = match (&request.selected_indices, request.selected_option_index) {
            (Some(indices), _) => Selection::Multi(indices.iter().copied().collect()),
            (None, Some(i)) => Selection::Single(i),
            (None, None) => return,
        };
        if feedback.correct {
            self.score += 1;
        }
        self.drafts.remove(&id);
        self.answers.insert(id, AnswerRecord { selection, feedback });
    }

    pub async fn answer<A: QuizApi>(
        &mut self,
        api: &A,
        id: QuestionId,
        selection: Selection,
        username: Option<&str>,
    ) -> bool {
        let Some(request) = self.begin_answer(id, selection, username) else {
            return false;
        };
        let result = api.check_answer(&request).await;
        self.finish_answer(&request, result);
        self.answers.contains_key(&id)
    }

    pub fn add_question(&mut self, question: Question) {
        self.questions.push(question);
    }

    /// Drop a question the server has deleted.
    pub fn remove_question(&mut self, id: QuestionId) {
        self.questions.retain(|q| q.id != id);
        self.drafts.remove(&id);
    }

    pub fn all_answered(&self) -> bool {
        !self.questions.is_empty() && self.questions.iter().all(|q| self.answers.contains_key(&q.id))
    }

    pub fn answered_on_page(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| self.answers.contains_key(&q.id))
            .count()
    }

    /// Start over from page 0 with no answers. The caller reloads the page and
    /// re-merges saved progress.
    pub fn restart(&mut self) {
        let page_size = self.page_size;
        *self = Self::new(page_size);
    }
}
