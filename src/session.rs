//! Quiz session state machine.
//!
//! Owns one live quiz run: the current question pointer, the candidate
//! answer, feedback visibility, and both countdowns. The machine is purely
//! synchronous; wall-clock time arrives as 1-second [`QuizSession::tick`]
//! calls and every mutation happens on the single event loop in
//! [`crate::runtime`], so no two operations ever interleave mid-update.
//!
//! Timer staleness is handled with a generation stamp: every (re)arm or
//! cancel bumps `timer_epoch`, and deferred callbacks carry the epoch they
//! were scheduled under. A callback whose epoch no longer matches is a
//! guaranteed no-op, not an "unlikely" race.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::config::{self, FeedbackMode, QuizConfig};
use crate::domain::{Muscle, MuscleCategory, Question, Quiz};
use crate::generator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No quiz running (pre-start, or after reset).
    Idle,
    /// A question is on screen with its countdown running.
    InProgress,
    /// Immediate mode only: correctness is on screen, waiting for the
    /// auto-advance countdown or a manual next.
    ShowingFeedback,
    /// Terminal: questions, score and duration no longer change.
    Completed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InProgress => "in_progress",
            Self::ShowingFeedback => "showing_feedback",
            Self::Completed => "completed",
        }
    }
}

/// Deferred work a tick can request from the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEffect {
    /// The auto-advance countdown ran out; advance after a short grace delay
    /// so the terminal value gets rendered. Only valid while `epoch` is
    /// current.
    ScheduleAdvance { epoch: u64 },
}

pub struct QuizSession {
    config: QuizConfig,
    rng: StdRng,
    quiz: Option<Quiz>,
    started_at: Option<DateTime<Utc>>,
    state: SessionState,
    current_index: usize,
    /// Candidate answer, selected but possibly not yet submitted.
    selected_answer: Option<String>,
    /// Pinned copy of the question being shown during feedback, so the view
    /// cannot swap questions under the user while feedback is visible.
    displayed_question: Option<Question>,
    show_next_button: bool,
    question_time_remaining: u32,
    question_timer_running: bool,
    /// Auto-advance countdown (3,2,1,0); `None` when not armed.
    auto_advance_remaining: Option<u32>,
    timer_epoch: u64,
}

impl QuizSession {
    pub fn new(config: QuizConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Construct with an explicit random source for deterministic tests.
    pub fn with_rng(config: QuizConfig, rng: StdRng) -> Self {
        Self {
            config,
            rng,
            quiz: None,
            started_at: None,
            state: SessionState::Idle,
            current_index: 0,
            selected_answer: None,
            displayed_question: None,
            show_next_button: false,
            question_time_remaining: 0,
            question_timer_running: false,
            auto_advance_remaining: None,
            timer_epoch: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The finished quiz, available only once the session is complete.
    pub fn completed_quiz(&self) -> Option<&Quiz> {
        match self.state {
            SessionState::Completed => self.quiz.as_ref(),
            _ => None,
        }
    }

    fn current_question(&self) -> Option<&Question> {
        self.quiz.as_ref()?.questions.get(self.current_index)
    }

    fn bump_epoch(&mut self) {
        self.timer_epoch += 1;
    }

    fn arm_question_timer(&mut self) {
        self.bump_epoch();
        self.question_time_remaining = self.config.time_per_question;
        self.question_timer_running = true;
        self.auto_advance_remaining = None;
    }

    fn stop_question_timer(&mut self) {
        self.question_timer_running = false;
    }

    /// Start a new quiz for the given category filter (None = all muscles).
    /// A zero-question quiz (empty pool, degenerate config) completes
    /// immediately; that is a valid session, not an error.
    pub fn start(&mut self, pool: &[Muscle], category: Option<MuscleCategory>) {
        self.reset();
        self.started_at = Some(Utc::now());
        let quiz = generator::generate_quiz(pool, category, &self.config, &mut self.rng);
        tracing::info!(
            questions = quiz.questions.len(),
            category = ?category,
            "quiz started"
        );
        let empty = quiz.questions.is_empty();
        self.quiz = Some(quiz);
        if empty {
            self.complete();
        } else {
            self.state = SessionState::InProgress;
            self.arm_question_timer();
        }
    }

    /// Record a candidate answer. In immediate mode this also submits it and
    /// shows feedback; in deferred mode nothing else happens until
    /// [`Self::submit_answer`]. A no-op while feedback is showing, after
    /// completion, or with no current question.
    pub fn select_answer(&mut self, answer: &str) {
        if self.state != SessionState::InProgress || self.current_question().is_none() {
            return;
        }
        self.selected_answer = Some(answer.to_string());
        if self.config.feedback == FeedbackMode::Immediate {
            self.submit_answer();
        }
    }

    /// Apply the candidate answer to the current question. No-op without a
    /// candidate or a current question. Deferred mode advances immediately
    /// and never shows feedback; immediate mode pins the answered question
    /// and either arms the auto-advance countdown (correct) or surfaces the
    /// manual next button (incorrect). The at-most-once contract of
    /// [`Question::answer`] makes a second submission harmless.
    pub fn submit_answer(&mut self) {
        if self.state != SessionState::InProgress {
            return;
        }
        let Some(candidate) = self.selected_answer.clone() else {
            return;
        };
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        let Some(question) = quiz.questions.get_mut(self.current_index) else {
            return;
        };

        question.answer(&candidate);
        let answered = question.clone();
        quiz.refresh_score();
        self.stop_question_timer();

        match self.config.feedback {
            FeedbackMode::Deferred => self.advance(),
            FeedbackMode::Immediate => {
                self.displayed_question = Some(answered.clone());
                self.state = SessionState::ShowingFeedback;
                if answered.is_correct {
                    self.bump_epoch();
                    self.auto_advance_remaining = Some(config::AUTO_ADVANCE_SECS);
                } else {
                    self.show_next_button = true;
                }
            }
        }
    }

    /// Move to the next question, or complete the quiz if none remain.
    /// Cancels any outstanding countdown and clears all feedback state.
    pub fn advance(&mut self) {
        if !matches!(
            self.state,
            SessionState::InProgress | SessionState::ShowingFeedback
        ) {
            return;
        }
        self.bump_epoch();
        self.displayed_question = None;
        self.show_next_button = false;
        self.auto_advance_remaining = None;
        self.selected_answer = None;

        let total = self.quiz.as_ref().map(|q| q.questions.len()).unwrap_or(0);
        if self.current_index + 1 < total {
            self.current_index += 1;
            self.state = SessionState::InProgress;
            self.arm_question_timer();
        } else {
            self.complete();
        }
    }

    /// Advance only if `epoch` is still the current timer generation. This is
    /// the landing point for the delayed auto-advance callback; a stale epoch
    /// means the session moved on (reset, restart, manual advance) and the
    /// callback must do nothing.
    pub fn advance_if_epoch(&mut self, epoch: u64) {
        if self.state == SessionState::ShowingFeedback && epoch == self.timer_epoch {
            self.advance();
        }
    }

    /// One second of wall-clock time. Drives the per-question countdown while
    /// a question is live and the auto-advance countdown during feedback.
    pub fn tick(&mut self) -> Option<TickEffect> {
        match self.state {
            SessionState::InProgress if self.question_timer_running => {
                if self.question_time_remaining > 0 {
                    self.question_time_remaining -= 1;
                }
                if self.question_time_remaining == 0 {
                    self.handle_timeout();
                }
                None
            }
            SessionState::ShowingFeedback => match self.auto_advance_remaining {
                Some(0) => Some(TickEffect::ScheduleAdvance {
                    epoch: self.timer_epoch,
                }),
                Some(n) => {
                    self.auto_advance_remaining = Some(n - 1);
                    None
                }
                None => None,
            },
            _ => None,
        }
    }

    /// Per-question timer expired. A pending candidate goes through the
    /// normal submit path instead of being discarded; otherwise the question
    /// is recorded as a blank, incorrect answer and the session moves on.
    fn handle_timeout(&mut self) {
        tracing::debug!(index = self.current_index, "question timed out");
        if self.selected_answer.is_some() {
            self.submit_answer();
            return;
        }
        self.stop_question_timer();
        if let Some(quiz) = self.quiz.as_mut() {
            if let Some(question) = quiz.questions.get_mut(self.current_index) {
                question.answer("");
            }
            quiz.refresh_score();
        }
        self.advance();
    }

    fn complete(&mut self) {
        if let Some(quiz) = self.quiz.as_mut() {
            if let Some(started) = self.started_at {
                quiz.duration_secs = (Utc::now() - started).num_seconds();
            }
            // Recompute rather than trusting incremental updates.
            quiz.refresh_score();
            tracing::info!(
                score = quiz.score,
                total = quiz.total_questions,
                "quiz completed"
            );
        }
        self.stop_question_timer();
        self.auto_advance_remaining = None;
        self.state = SessionState::Completed;
    }

    /// Back to the pre-start state. Already-persisted quizzes are untouched.
    pub fn reset(&mut self) {
        self.bump_epoch();
        self.quiz = None;
        self.started_at = None;
        self.state = SessionState::Idle;
        self.current_index = 0;
        self.selected_answer = None;
        self.displayed_question = None;
        self.show_next_button = false;
        self.question_time_remaining = 0;
        self.question_timer_running = false;
        self.auto_advance_remaining = None;
    }

    /// Read-only view of everything the presentation layer renders.
    pub fn snapshot(&self) -> SessionView {
        // Once completed the view shows only the result, never a question.
        let question = match self.state {
            SessionState::Completed => None,
            _ => self
                .displayed_question
                .as_ref()
                .or_else(|| self.current_question()),
        };

        let feedback_visible = self.state == SessionState::ShowingFeedback;
        let total = self
            .quiz
            .as_ref()
            .map(|q| q.total_questions)
            .unwrap_or(0);

        let progress = if total > 0 {
            self.current_index as f64 / total as f64
        } else {
            0.0
        };
        let progress_text = if self.quiz.is_some() && total > 0 {
            format!("{} sur {}", self.current_index + 1, total)
        } else {
            String::new()
        };

        SessionView {
            state: self.state.as_str().to_string(),
            question: question.map(|q| QuestionView {
                question: q.question.clone(),
                options: q.options.clone(),
            }),
            selected_answer: self.selected_answer.clone(),
            feedback_visible,
            is_correct: if feedback_visible {
                self.displayed_question.as_ref().map(|q| q.is_correct)
            } else {
                None
            },
            show_next_button: self.show_next_button,
            question_time_remaining: self.question_time_remaining,
            auto_advance_remaining: self.auto_advance_remaining,
            progress,
            progress_text,
            haptic_feedback: self.config.haptic_feedback,
            result: self.completed_quiz().map(|q| ResultView {
                score: q.score,
                total_questions: q.total_questions,
                percentage: q.percentage(),
                grade: q.grade(),
                duration_secs: q.duration_secs,
            }),
        }
    }
}

/// Everything the presentation layer gets to see.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionView {
    pub state: String,
    pub question: Option<QuestionView>,
    pub selected_answer: Option<String>,
    pub feedback_visible: bool,
    pub is_correct: Option<bool>,
    pub show_next_button: bool,
    pub question_time_remaining: u32,
    pub auto_advance_remaining: Option<u32>,
    pub progress: f64,
    pub progress_text: String,
    pub haptic_feedback: bool,
    pub result: Option<ResultView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionView {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultView {
    pub score: i64,
    pub total_questions: i64,
    pub percentage: f64,
    pub grade: u8,
    pub duration_secs: i64,
}
