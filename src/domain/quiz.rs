use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MuscleCategory, Question};
use crate::config;

/// One quiz run: an ordered set of questions plus its score and timing.
///
/// Mutable while the session plays it, immutable once completed and stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
  /// SQLite rowid; 0 until first saved.
  pub id: i64,
  pub date: DateTime<Utc>,
  pub category: Option<MuscleCategory>,
  pub score: i64,
  pub total_questions: i64,
  pub questions: Vec<Question>,
  /// Set once, at completion.
  pub duration_secs: i64,
}

impl Quiz {
  pub fn new(category: Option<MuscleCategory>, questions: Vec<Question>) -> Self {
    let total = questions.len() as i64;
    Self {
      id: 0,
      date: Utc::now(),
      category,
      score: 0,
      total_questions: total,
      questions,
      duration_secs: 0,
    }
  }

  /// Recompute the score from the questions. Called after every answer and
  /// again at completion, so the `score == count(is_correct)` invariant holds
  /// even if an incremental update was missed.
  pub fn refresh_score(&mut self) {
    self.score = self.questions.iter().filter(|q| q.is_correct).count() as i64;
  }

  pub fn percentage(&self) -> f64 {
    if self.total_questions == 0 {
      return 0.0;
    }
    (self.score as f64 / self.total_questions as f64) * 100.0
  }

  /// Grade on the 1-6 scale, looked up in [`config::GRADE_BANDS`].
  pub fn grade(&self) -> u8 {
    let pct = self.percentage();
    config::GRADE_BANDS
      .iter()
      .find(|(min_pct, _)| pct >= *min_pct)
      .map(|(_, grade)| *grade)
      .unwrap_or(1)
  }
}
