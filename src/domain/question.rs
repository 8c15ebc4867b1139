use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AttributeKind, Muscle};

/// A single multiple-choice question.
///
/// Muscle name and correct answer are denormalized so a stored question
/// survives later edits or deletion of the source muscle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
  pub muscle_id: i64,
  pub muscle_name: String,
  pub kind: AttributeKind,
  pub question: String,
  pub correct_answer: String,
  /// Exactly four options, correct answer included once, order shuffled.
  pub options: Vec<String>,
  pub user_answer: Option<String>,
  pub is_correct: bool,
  pub answered_at: Option<DateTime<Utc>>,
}

impl Question {
  pub fn new(muscle: &Muscle, kind: AttributeKind, options: Vec<String>) -> Self {
    Self {
      muscle_id: muscle.id,
      muscle_name: muscle.name.clone(),
      kind,
      question: kind.question_text(&muscle.name),
      correct_answer: kind.value_of(muscle).to_string(),
      options,
      user_answer: None,
      is_correct: false,
      answered_at: None,
    }
  }

  pub fn is_answered(&self) -> bool {
    self.answered_at.is_some()
  }

  /// Apply an answer. At most once: a second call is a no-op, which guards
  /// against the auto-advance countdown and a manual tap racing for the same
  /// question.
  ///
  /// Source data and generated options can carry incidental whitespace and
  /// case variance, so correctness compares trimmed, case-folded strings.
  /// The raw candidate is what gets stored.
  pub fn answer(&mut self, candidate: &str) {
    if self.is_answered() {
      return;
    }
    self.user_answer = Some(candidate.to_string());
    self.is_correct = normalize(candidate) == normalize(&self.correct_answer);
    self.answered_at = Some(Utc::now());
  }
}

fn normalize(s: &str) -> String {
  s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{MuscleCategory, MuscleSubcategory};

  fn sample_muscle() -> Muscle {
    Muscle {
      id: 7,
      name: "deltoïde".to_string(),
      origin: "Clavicule, acromion et épine de la scapula".to_string(),
      insertion: "Tubérosité deltoïdienne de l'humérus".to_string(),
      innervation: "Nerf axillaire".to_string(),
      vascularization: "Artère circonflexe postérieure".to_string(),
      category: MuscleCategory::UpperLimb,
      subcategory: MuscleSubcategory::ShoulderAnterior,
    }
  }

  fn sample_question() -> Question {
    let m = sample_muscle();
    let options = vec![
      "Nerf axillaire".to_string(),
      "Nerf radial".to_string(),
      "Nerf médian".to_string(),
      "Nerf ulnaire".to_string(),
    ];
    Question::new(&m, AttributeKind::Innervation, options)
  }

  #[test]
  fn test_new_question_is_unanswered() {
    let q = sample_question();
    assert!(!q.is_answered());
    assert!(q.user_answer.is_none());
    assert!(!q.is_correct);
    assert_eq!(q.correct_answer, "Nerf axillaire");
    assert_eq!(q.question, "Quelle est l'innervation du deltoïde?");
  }

  #[test]
  fn test_answer_correct() {
    let mut q = sample_question();
    q.answer("Nerf axillaire");
    assert!(q.is_correct);
    assert!(q.is_answered());
    assert_eq!(q.user_answer.as_deref(), Some("Nerf axillaire"));
  }

  #[test]
  fn test_answer_wrong() {
    let mut q = sample_question();
    q.answer("Nerf radial");
    assert!(!q.is_correct);
    assert!(q.is_answered());
  }

  #[test]
  fn test_answer_tolerates_whitespace_and_case() {
    let mut q = sample_question();
    q.answer("  nerf AXILLAIRE  ");
    assert!(q.is_correct);
    // Raw candidate is stored, not the normalized form
    assert_eq!(q.user_answer.as_deref(), Some("  nerf AXILLAIRE  "));
  }

  #[test]
  fn test_answer_is_applied_at_most_once() {
    let mut q = sample_question();
    q.answer("Nerf radial");
    let first_at = q.answered_at;

    // Second application with a different (correct) answer must not win
    q.answer("Nerf axillaire");
    assert!(!q.is_correct);
    assert_eq!(q.user_answer.as_deref(), Some("Nerf radial"));
    assert_eq!(q.answered_at, first_at);
  }

  #[test]
  fn test_blank_answer_is_incorrect_but_answered() {
    let mut q = sample_question();
    q.answer("");
    assert!(!q.is_correct);
    assert!(q.is_answered());
    assert_eq!(q.user_answer.as_deref(), Some(""));
  }
}
