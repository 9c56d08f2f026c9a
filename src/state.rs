use tracing::{info, warn};

use crate::admin::{BulkImport, FormField, QuestionForm};
use crate::auth::{AuthContext, AuthMode};
use crate::browser::Browser;
use crate::card::CardView;
use crate::event::{AppEvent, Command};
use crate::model::{Question, QuestionId};
use crate::session::{Phase, QuizSession, SubmitKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Browse,
    Login,
    Quiz,
    AdminForm,
    BulkImport,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    ConfirmSubmit,
    ConfirmQuitQuiz,
    ConfirmDelete(QuestionId),
    ConfirmExit,
    Alert(String),
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Navigation,
    TextInput,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Username,
    Password,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub auth: AuthContext,
    pub auth_mode: AuthMode,
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub browser: Browser,
    pub session: QuizSession,
    pub admin_form: QuestionForm,
    pub form_field: FormField,
    pub bulk: BulkImport,
    pub dialog_stack: Vec<Dialog>,
    /// Selected question in the browser list.
    pub current_question: usize,
    /// Selected question in the quiz list.
    pub quiz_question: usize,
    pub choice_cursor: usize,
    pub setup_cursor: usize,
    pub sidebar_scroll: usize,
    pub question_scroll: usize,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(page_size: u32) -> Self {
        Self {
            screen: Screen::Browse,
            auth: AuthContext::new(),
            auth_mode: AuthMode::Login,
            login_username: String::new(),
            login_password: String::new(),
            login_focus: LoginFocus::Username,
            browser: Browser::new(page_size),
            session: QuizSession::new(),
            admin_form: QuestionForm::default(),
            form_field: FormField::Text,
            bulk: BulkImport::default(),
            dialog_stack: Vec::new(),
            current_question: 0,
            quiz_question: 0,
            choice_cursor: 0,
            setup_cursor: 0,
            sidebar_scroll: 0,
            question_scroll: 0,
            status_message: None,
            should_quit: false,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        match self.screen {
            Screen::Login | Screen::AdminForm | Screen::BulkImport => InputMode::TextInput,
            Screen::Browse | Screen::Quiz => InputMode::Navigation,
        }
    }

    pub fn startup(&mut self, username: Option<&str>, password: Option<&str>) -> Vec<Command> {
        let mut commands = vec![self.load_page_command()];
        if let (Some(user), Some(pass)) = (username, password) {
            self.login_username = user.to_string();
            self.login_password = pass.to_string();
            commands.extend(self.submit_auth());
        }
        commands
    }

    fn load_page_command(&mut self) -> Command {
        let (page, size) = self.browser.begin_load();
        Command::LoadPage { page, size }
    }

    // ---- dialogs ----

    pub fn has_dialog(&self) -> bool {
        !self.dialog_stack.is_empty()
    }

    pub fn top_dialog(&self) -> Option<&Dialog> {
        self.dialog_stack.last()
    }

    pub fn push_dialog(&mut self, dialog: Dialog) {
        self.dialog_stack.push(dialog);
    }

    pub fn pop_dialog(&mut self) -> Option<Dialog> {
        self.dialog_stack.pop()
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.push_dialog(Dialog::Alert(message.into()));
    }

    /// Accept the top dialog.
    pub fn confirm_dialog(&mut self) -> Vec<Command> {
        let Some(dialog) = self.pop_dialog() else {
            return Vec::new();
        };
        match dialog {
            Dialog::ConfirmSubmit => self.submit_quiz(SubmitKind::Manual),
            Dialog::ConfirmQuitQuiz => {
                self.session.quit();
                self.quiz_question = 0;
                self.choice_cursor = 0;
                vec![Command::StopCountdown]
            }
            Dialog::ConfirmDelete(id) => vec![Command::DeleteQuestion(id)],
            Dialog::ConfirmExit => {
                self.should_quit = true;
                vec![Command::StopCountdown]
            }
            Dialog::Alert(_) | Dialog::Help => Vec::new(),
        }
    }

    pub fn cancel_dialog(&mut self) {
        self.pop_dialog();
    }

    // ---- auth ----

    pub fn open_login(&mut self, mode: AuthMode) {
        self.auth_mode = mode;
        self.auth.error = None;
        self.login_focus = LoginFocus::Username;
        self.screen = Screen::Login;
    }

    pub fn toggle_auth_mode(&mut self) {
        self.auth_mode = match self.auth_mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.auth.error = None;
    }

    pub fn submit_auth(&mut self) -> Vec<Command> {
        let Some(credentials) = self.auth.begin(&self.login_username, &self.login_password) else {
            return Vec::new();
        };
        match self.auth_mode {
            AuthMode::Login => vec![Command::Login(credentials)],
            AuthMode::Register => vec![Command::Register(credentials)],
        }
    }

    fn after_login(&mut self) -> Vec<Command> {
        self.login_password.clear();
        self.screen = Screen::Browse;
        self.status_message = self
            .auth
            .username()
            .map(|name| format!("Welcome, {}", name));
        match &self.auth.user {
            Some(user) if !user.is_admin => vec![Command::LoadProgress(user.name.clone())],
            _ => Vec::new(),
        }
    }

    pub fn logout(&mut self) {
        self.auth.logout();
        if matches!(self.screen, Screen::AdminForm | Screen::BulkImport) {
            self.screen = Screen::Browse;
        }
        self.status_message = Some("Logged out".to_string());
    }

    // ---- browser ----

    pub fn current_browser_question(&self) -> Option<&Question> {
        self.browser.questions.get(self.current_question)
    }

    pub fn browser_card(&self, question: &Question) -> CardView {
        let record = self.browser.answers.get(&question.id);
        CardView::build(
            question,
            self.browser.selection(question.id).as_ref(),
            record.map(|r| &r.feedback),
            self.browser.pending.contains(&question.id),
        )
    }

    pub fn navigate_to(&mut self, idx: usize) {
        let len = match self.screen {
            Screen::Quiz => self.session.questions.len(),
            _ => self.browser.questions.len(),
        };
        if idx < len {
            match self.screen {
                Screen::Quiz => self.quiz_question = idx,
                _ => self.current_question = idx,
            }
            self.choice_cursor = 0;
            self.question_scroll = 0;
        }
    }

    pub fn current_index(&self) -> usize {
        match self.screen {
            Screen::Quiz => self.quiz_question,
            _ => self.current_question,
        }
    }

    /// Pick an option on the current browser question. Single-select questions
    /// are checked right away; multi-select ones only toggle the draft.
    pub fn browser_pick(&mut self, idx: usize) -> Vec<Command> {
        let Some(question) = self.current_browser_question() else {
            return Vec::new();
        };
        let id = question.id;
        if idx >= question.options.len() {
            return Vec::new();
        }
        if question.is_multi_select() {
            self.browser.toggle_draft(id, idx);
            return Vec::new();
        }
        let username = self.auth.username().map(str::to_string);
        self.browser
            .answer_request(id, Some(idx), username.as_deref())
            .map(Command::CheckAnswer)
            .into_iter()
            .collect()
    }

    /// Send the multi-select draft of the current browser question.
    pub fn browser_submit_multi(&mut self) -> Vec<Command> {
        let Some(question) = self.current_browser_question() else {
            return Vec::new();
        };
        if !question.is_multi_select() {
            return Vec::new();
        }
        let id = question.id;
        let username = self.auth.username().map(str::to_string);
        self.browser
            .answer_request(id, None, username.as_deref())
            .map(Command::CheckAnswer)
            .into_iter()
            .collect()
    }

    pub fn change_page(&mut self, changed: bool) -> Vec<Command> {
        if !changed {
            return Vec::new();
        }
        self.current_question = 0;
        self.choice_cursor = 0;
        self.sidebar_scroll = 0;
        vec![self.load_page_command()]
    }

    pub fn request_delete_current(&mut self) {
        if !self.auth.is_admin() {
            return;
        }
        if let Some(q) = self.current_browser_question() {
            let id = q.id;
            self.push_dialog(Dialog::ConfirmDelete(id));
        }
    }

    pub fn restart_browser(&mut self) -> Vec<Command> {
        info!("restarting question browser");
        self.browser.restart();
        self.current_question = 0;
        self.choice_cursor = 0;
        self.sidebar_scroll = 0;
        let mut commands = vec![self.load_page_command()];
        if let Some(user) = &self.auth.user {
            if !user.is_admin {
                commands.push(Command::LoadProgress(user.name.clone()));
            }
        }
        commands
    }

    // ---- quiz ----

    pub fn open_quiz(&mut self) -> Vec<Command> {
        self.screen = Screen::Quiz;
        if self.session.phase == Phase::Setup && self.session.available_chapters.is_empty() {
            vec![Command::LoadChapters]
        } else {
            Vec::new()
        }
    }

    pub fn start_quiz(&mut self) -> Vec<Command> {
        match self.session.begin_start() {
            Some(config) => vec![Command::StartQuiz(config)],
            None => Vec::new(),
        }
    }

    pub fn current_quiz_question(&self) -> Option<&Question> {
        self.session.questions.get(self.quiz_question)
    }

    pub fn quiz_card(&self, question: &Question) -> CardView {
        CardView::build(
            question,
            self.session.answers.get(&question.id),
            self.session.feedback.get(&question.id),
            self.session.is_read_only(),
        )
    }

    pub fn quiz_pick(&mut self, idx: usize) {
        if let Some(id) = self.current_quiz_question().map(|q| q.id) {
            self.session.select(id, idx);
        }
    }

    /// Manual submission goes through a confirmation dialog.
    pub fn request_quiz_submit(&mut self) {
        if self.session.phase == Phase::Active && !self.session.grading {
            self.push_dialog(Dialog::ConfirmSubmit);
        }
    }

    fn submit_quiz(&mut self, kind: SubmitKind) -> Vec<Command> {
        match self.session.begin_submit(kind, None) {
            Some(requests) => vec![Command::StopCountdown, Command::GradeQuiz(requests)],
            None => Vec::new(),
        }
    }

    /// Esc on the quiz screen: confirm before abandoning an active quiz,
    /// otherwise step back.
    pub fn request_quiz_quit(&mut self) {
        match self.session.phase {
            Phase::Active if !self.session.grading => self.push_dialog(Dialog::ConfirmQuitQuiz),
            Phase::Active => {}
            Phase::Submitted => {
                if !self.session.grading {
                    self.session.reset();
                    self.quiz_question = 0;
                }
            }
            Phase::Setup => {
                self.session.abandon_start();
                self.screen = Screen::Browse;
            }
        }
    }

    // ---- admin ----

    pub fn open_admin_form(&mut self) {
        if self.auth.is_admin() {
            self.form_field = FormField::Text;
            self.screen = Screen::AdminForm;
        }
    }

    pub fn open_bulk_import(&mut self) {
        if self.auth.is_admin() {
            self.bulk.status.clear();
            self.screen = Screen::BulkImport;
        }
    }

    pub fn submit_admin_form(&mut self) -> Vec<Command> {
        if self.admin_form.submitting {
            return Vec::new();
        }
        match self.admin_form.to_payload() {
            Ok(payload) => {
                self.admin_form.submitting = true;
                self.status_message = Some("Posting...".to_string());
                vec![Command::CreateQuestion(payload)]
            }
            Err(e) => {
                self.status_message = Some(e.to_string());
                Vec::new()
            }
        }
    }

    pub fn submit_bulk(&mut self) -> Vec<Command> {
        match self.bulk.begin() {
            Some(items) => vec![Command::ImportQuestions(items)],
            None => Vec::new(),
        }
    }

    /// Insert pasted or typed text into whatever field has focus.
    pub fn insert_text(&mut self, text: &str) {
        match self.screen {
            Screen::Login => {
                let target = match self.login_focus {
                    LoginFocus::Username => &mut self.login_username,
                    LoginFocus::Password => &mut self.login_password,
                };
                target.extend(text.chars().filter(|c| !c.is_control()));
            }
            Screen::AdminForm => {
                let multiline = self.form_field.is_multiline();
                if let Some(field) = self.admin_form.field_mut(self.form_field) {
                    if multiline {
                        field.push_str(text);
                    } else {
                        field.extend(text.chars().filter(|c| !c.is_control()));
                    }
                }
            }
            Screen::BulkImport => self.bulk.input.push_str(text),
            Screen::Browse | Screen::Quiz => {}
        }
    }

    pub fn delete_char(&mut self) {
        match self.screen {
            Screen::Login => {
                match self.login_focus {
                    LoginFocus::Username => self.login_username.pop(),
                    LoginFocus::Password => self.login_password.pop(),
                };
            }
            Screen::AdminForm => {
                if let Some(field) = self.admin_form.field_mut(self.form_field) {
                    field.pop();
                }
            }
            Screen::BulkImport => {
                self.bulk.input.pop();
            }
            Screen::Browse | Screen::Quiz => {}
        }
    }

    // ---- results ----

    /// Fold a finished request back into the state.
    pub fn apply(&mut self, event: AppEvent) -> Vec<Command> {
        match event {
            AppEvent::PageLoaded { page, result } => {
                self.browser.apply_page(page, result);
                if self.current_question >= self.browser.questions.len() {
                    self.current_question = self.browser.questions.len().saturating_sub(1);
                }
                Vec::new()
            }
            AppEvent::ProgressLoaded(result) => {
                match result {
                    Ok(progress) => self.browser.merge_progress(progress),
                    Err(e) => warn!("cannot load progress: {}", e),
                }
                Vec::new()
            }
            AppEvent::AnswerChecked { request, result } => {
                self.browser.finish_answer(&request, result);
                Vec::new()
            }
            AppEvent::LoggedIn(result) => {
                if self.auth.finish_login(result) {
                    self.after_login()
                } else {
                    Vec::new()
                }
            }
            AppEvent::Registered(result) => {
                if self.auth.finish_register(result) {
                    self.after_login()
                } else {
                    Vec::new()
                }
            }
            AppEvent::ChaptersLoaded(result) => {
                self.session.set_chapters(result);
                Vec::new()
            }
            AppEvent::QuizLoaded(result) => {
                if self.session.finish_start(result) {
                    self.quiz_question = 0;
                    self.choice_cursor = 0;
                    vec![Command::StartCountdown]
                } else {
                    Vec::new()
                }
            }
            AppEvent::QuizGraded(grading) => {
                self.session.finish_submit(grading);
                if self.session.submit_kind == Some(SubmitKind::Auto) {
                    self.alert("Time's up! Quiz submitted.");
                }
                Vec::new()
            }
            AppEvent::Tick => {
                if self.session.tick() {
                    // the dialog stack may hold a stale confirm for a quiz
                    // that is now being submitted anyway
                    self.dialog_stack
                        .retain(|d| !matches!(d, Dialog::ConfirmSubmit | Dialog::ConfirmQuitQuiz));
                    self.submit_quiz(SubmitKind::Auto)
                } else {
                    Vec::new()
                }
            }
            AppEvent::QuestionCreated(result) => {
                self.admin_form.submitting = false;
                match result {
                    Ok(question) => {
                        info!(id = question.id, "question posted");
                        self.browser.add_question(question);
                        self.admin_form.clear();
                        self.form_field = FormField::Text;
                        self.screen = Screen::Browse;
                        self.status_message = Some("Question posted".to_string());
                    }
                    Err(e) => {
                        warn!("failed to post question: {}", e);
                        self.status_message = None;
                        self.alert("Failed to post question");
                    }
                }
                Vec::new()
            }
            AppEvent::QuestionsImported(result) => match result {
                Ok(questions) => {
                    info!(count = questions.len(), "bulk import done");
                    self.bulk.finish(Ok(questions.len()));
                    self.alert(format!("Bulk import successful: {} questions", questions.len()));
                    self.screen = Screen::Browse;
                    vec![self.load_page_command()]
                }
                Err(e) => {
                    warn!("bulk import failed: {}", e);
                    self.bulk.finish(Err(e.to_string()));
                    self.alert(format!("Import failed: {}", e));
                    Vec::new()
                }
            },
            AppEvent::QuestionDeleted { id, result } => {
                match result {
                    Ok(()) => {
                        info!(id, "question deleted");
                        self.browser.remove_question(id);
                        if self.current_question >= self.browser.questions.len() {
                            self.current_question = self.browser.questions.len().saturating_sub(1);
                        }
                    }
                    Err(e) => {
                        warn!(id, "failed to delete question: {}", e);
                        self.alert("Failed to delete question");
                    }
                }
                Vec::new()
            }
        }
    }
}
