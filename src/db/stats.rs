//! Lifetime answer statistics, aggregated across all completed quizzes.

use rusqlite::{params, Connection, Result};
use serde::Serialize;

use crate::domain::Quiz;

#[derive(Debug, Clone, Default, Serialize)]
pub struct OverallStats {
  pub total_questions_answered: i64,
  pub total_correct: i64,
  pub total_incorrect: i64,
}

impl OverallStats {
  pub fn success_rate(&self) -> f64 {
    if self.total_questions_answered == 0 {
      return 0.0;
    }
    (self.total_correct as f64 / self.total_questions_answered as f64) * 100.0
  }
}

fn bump_counter(conn: &Connection, key: &str, delta: i64) -> Result<()> {
  conn.execute(
    r#"
    INSERT INTO stats (key, value) VALUES (?1, ?2)
    ON CONFLICT(key) DO UPDATE SET value = value + excluded.value
    "#,
    params![key, delta],
  )?;
  Ok(())
}

fn read_counter(conn: &Connection, key: &str) -> Result<i64> {
  conn.query_row(
    "SELECT COALESCE((SELECT value FROM stats WHERE key = ?1), 0)",
    params![key],
    |row| row.get(0),
  )
}

/// Fold a completed quiz into the running totals.
pub fn record_quiz_completion(conn: &Connection, quiz: &Quiz) -> Result<()> {
  bump_counter(conn, "total_questions_answered", quiz.total_questions)?;
  bump_counter(conn, "total_correct", quiz.score)?;
  bump_counter(conn, "total_incorrect", quiz.total_questions - quiz.score)?;
  Ok(())
}

pub fn get_overall_stats(conn: &Connection) -> Result<OverallStats> {
  Ok(OverallStats {
    total_questions_answered: read_counter(conn, "total_questions_answered")?,
    total_correct: read_counter(conn, "total_correct")?,
    total_incorrect: read_counter(conn, "total_incorrect")?,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::open_test_db;
  use crate::domain::Quiz;

  fn quiz_with_score(score: i64, total: i64) -> Quiz {
    let mut quiz = Quiz::new(None, Vec::new());
    quiz.score = score;
    quiz.total_questions = total;
    quiz
  }

  #[test]
  fn test_empty_stats() {
    let conn = open_test_db();
    let stats = get_overall_stats(&conn).unwrap();
    assert_eq!(stats.total_questions_answered, 0);
    assert_eq!(stats.success_rate(), 0.0);
  }

  #[test]
  fn test_record_accumulates() {
    let conn = open_test_db();
    record_quiz_completion(&conn, &quiz_with_score(3, 4)).unwrap();
    record_quiz_completion(&conn, &quiz_with_score(1, 4)).unwrap();

    let stats = get_overall_stats(&conn).unwrap();
    assert_eq!(stats.total_questions_answered, 8);
    assert_eq!(stats.total_correct, 4);
    assert_eq!(stats.total_incorrect, 4);
    assert_eq!(stats.success_rate(), 50.0);
  }
}
