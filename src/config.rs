//! Application configuration.
//!
//! Centralizes the tunable constants and loads user settings with the
//! priority config.toml > environment > defaults. The quiz engine itself
//! only ever sees an immutable [`QuizConfig`] snapshot taken at session
//! start; nothing in the core reads ambient settings.

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::AttributeKind;

// ==================== Quiz Configuration ====================

/// Feedback timing for answered questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackMode {
    /// Show correctness right after selection, auto-advance on correct.
    Immediate,
    /// Record silently; advance on submit without showing feedback.
    Deferred,
}

/// Read-only session parameters, snapshotted per quiz.
#[derive(Debug, Clone)]
pub struct QuizConfig {
    /// Number of questions per quiz (>= 1).
    pub question_count: usize,
    /// Attribute kinds questions may target.
    pub enabled_kinds: Vec<AttributeKind>,
    pub feedback: FeedbackMode,
    /// Per-question time limit in seconds (>= 1).
    pub time_per_question: u32,
    /// Presentation-only: vibrate on a completed quiz. The engine just
    /// forwards it to the view.
    pub haptic_feedback: bool,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_count: 20,
            enabled_kinds: vec![
                AttributeKind::Origin,
                AttributeKind::Insertion,
                AttributeKind::Innervation,
            ],
            feedback: FeedbackMode::Immediate,
            time_per_question: 30,
            haptic_feedback: true,
        }
    }
}

impl QuizConfig {
    /// Enabled kinds with the empty-set degeneracy removed: an empty list
    /// falls back to origin-only rather than producing zero kinds.
    pub fn effective_kinds(&self) -> Vec<AttributeKind> {
        if self.enabled_kinds.is_empty() {
            vec![AttributeKind::Origin]
        } else {
            self.enabled_kinds.clone()
        }
    }
}

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct AppConfig {
    database: Option<DatabaseSection>,
    quiz: Option<QuizSection>,
}

#[derive(Debug, Deserialize)]
struct DatabaseSection {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuizSection {
    question_count: Option<usize>,
    time_per_question: Option<u32>,
    feedback: Option<FeedbackMode>,
    haptic_feedback: Option<bool>,
    enable_origin: Option<bool>,
    enable_insertion: Option<bool>,
    enable_innervation: Option<bool>,
    enable_vascularization: Option<bool>,
}

fn read_config_file() -> AppConfig {
    match std::fs::read_to_string("config.toml") {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!("Invalid config.toml, using defaults: {}", e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
    let _ = dotenvy::dotenv();

    if let Some(db) = read_config_file().database {
        if let Some(path) = db.path {
            tracing::info!("Using database from config.toml: {}", path);
            return PathBuf::from(path);
        }
    }

    if let Ok(path) = std::env::var("DATABASE_PATH") {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    let default = PathBuf::from("data/myoquiz.db");
    tracing::info!("Using default database path: {}", default.display());
    default
}

/// Load quiz settings from config.toml, falling back to defaults.
///
/// Out-of-range values are clamped rather than rejected: a quiz session must
/// never fail over a degenerate setting.
pub fn load_quiz_config() -> QuizConfig {
    let defaults = QuizConfig::default();
    let Some(section) = read_config_file().quiz else {
        return defaults;
    };

    let mut enabled_kinds = Vec::new();
    if section.enable_origin.unwrap_or(true) {
        enabled_kinds.push(AttributeKind::Origin);
    }
    if section.enable_insertion.unwrap_or(true) {
        enabled_kinds.push(AttributeKind::Insertion);
    }
    if section.enable_innervation.unwrap_or(true) {
        enabled_kinds.push(AttributeKind::Innervation);
    }
    if section.enable_vascularization.unwrap_or(false) {
        enabled_kinds.push(AttributeKind::Vascularization);
    }

    QuizConfig {
        question_count: section.question_count.unwrap_or(defaults.question_count).max(1),
        enabled_kinds,
        feedback: section.feedback.unwrap_or(defaults.feedback),
        time_per_question: section
            .time_per_question
            .unwrap_or(defaults.time_per_question)
            .max(1),
        haptic_feedback: section.haptic_feedback.unwrap_or(defaults.haptic_feedback),
    }
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Get the full server bind address
pub fn server_bind_addr() -> String {
    format!("{}:{}", SERVER_ADDR, SERVER_PORT)
}

// ==================== Question Generation ====================

/// Total choices per question (1 correct + 3 distractors)
pub const OPTION_COUNT: usize = 4;

/// Maximum random draws when collecting distinct distractors
pub const DISTRACTOR_RETRY_BUDGET: usize = 100;

/// Maximum random draws when picking an unused muscle for a question slot
pub const MUSCLE_RETRY_BUDGET: usize = 50;

// ==================== Session Timing ====================

/// Auto-advance countdown start value after a correct answer (counts 3,2,1,0)
pub const AUTO_ADVANCE_SECS: u32 = 3;

/// Grace delay before the auto-advance fires, so the terminal countdown value
/// gets a chance to render
pub const ADVANCE_GRACE_MS: u64 = 250;

// ==================== Grading ====================

/// Grade bands as (minimum percentage, grade), highest first. `Quiz::grade`
/// walks this table; keeping the boundaries as data keeps them independently
/// testable.
pub const GRADE_BANDS: [(f64, u8); 6] = [
    (92.0, 6),
    (85.0, 5),
    (72.0, 4),
    (50.0, 3),
    (30.0, 2),
    (0.0, 1),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QuizConfig::default();
        assert_eq!(config.question_count, 20);
        assert_eq!(config.feedback, FeedbackMode::Immediate);
        assert_eq!(config.time_per_question, 30);
        assert_eq!(config.enabled_kinds.len(), 3);
        assert!(!config.enabled_kinds.contains(&AttributeKind::Vascularization));
    }

    #[test]
    fn test_effective_kinds_substitutes_default() {
        let config = QuizConfig {
            enabled_kinds: vec![],
            ..QuizConfig::default()
        };
        assert_eq!(config.effective_kinds(), vec![AttributeKind::Origin]);
    }

    #[test]
    fn test_effective_kinds_passthrough() {
        let config = QuizConfig::default();
        assert_eq!(config.effective_kinds(), config.enabled_kinds);
    }

    #[test]
    fn test_grade_bands_cover_zero() {
        let (min_pct, grade) = GRADE_BANDS[GRADE_BANDS.len() - 1];
        assert_eq!(min_pct, 0.0);
        assert_eq!(grade, 1);
    }
}
