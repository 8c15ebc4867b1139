use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use crate::domain::{AttributeKind, MuscleCategory, Question, Quiz};

/// Persist a completed quiz with all of its questions in one transaction, so
/// a failed question insert never leaves a partial history entry. Returns the
/// quiz's rowid.
pub fn save_quiz(conn: &Connection, quiz: &Quiz) -> Result<i64> {
  let tx = conn.unchecked_transaction()?;
  tx.execute(
    r#"
    INSERT INTO quizzes (date, category, score, total_questions, duration_secs)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
    params![
      quiz.date.to_rfc3339(),
      quiz.category.map(|c| c.as_str()),
      quiz.score,
      quiz.total_questions,
      quiz.duration_secs,
    ],
  )?;
  let quiz_id = tx.last_insert_rowid();

  for (position, question) in quiz.questions.iter().enumerate() {
    let options = serde_json::to_string(&question.options)
      .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    tx.execute(
      r#"
      INSERT INTO quiz_questions (quiz_id, position, muscle_id, muscle_name, kind, question,
                                  correct_answer, options, user_answer, is_correct, answered_at)
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
      "#,
      params![
        quiz_id,
        position as i64,
        question.muscle_id,
        question.muscle_name,
        question.kind.as_str(),
        question.question,
        question.correct_answer,
        options,
        question.user_answer,
        question.is_correct as i64,
        question.answered_at.map(|dt| dt.to_rfc3339()),
      ],
    )?;
  }

  tx.commit()?;
  Ok(quiz_id)
}

/// All stored quizzes, newest first, with their questions.
pub fn list_quizzes(conn: &Connection) -> Result<Vec<Quiz>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, date, category, score, total_questions, duration_secs
    FROM quizzes
    ORDER BY date DESC, id DESC
    "#,
  )?;

  let mut quizzes = stmt
    .query_map([], |row| row_to_quiz(row))?
    .collect::<Result<Vec<_>>>()?;

  for quiz in &mut quizzes {
    quiz.questions = load_questions(conn, quiz.id)?;
  }
  Ok(quizzes)
}

pub fn delete_quiz(conn: &Connection, quiz_id: i64) -> Result<()> {
  conn.execute("DELETE FROM quiz_questions WHERE quiz_id = ?1", params![quiz_id])?;
  conn.execute("DELETE FROM quizzes WHERE id = ?1", params![quiz_id])?;
  Ok(())
}

fn load_questions(conn: &Connection, quiz_id: i64) -> Result<Vec<Question>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT muscle_id, muscle_name, kind, question, correct_answer, options,
           user_answer, is_correct, answered_at
    FROM quiz_questions
    WHERE quiz_id = ?1
    ORDER BY position ASC
    "#,
  )?;

  let questions = stmt
    .query_map(params![quiz_id], |row| row_to_question(row))?
    .collect::<Result<Vec<_>>>()?;
  Ok(questions)
}

fn row_to_quiz(row: &rusqlite::Row) -> Result<Quiz> {
  let date_str: String = row.get(1)?;
  let category_str: Option<String> = row.get(2)?;

  Ok(Quiz {
    id: row.get(0)?,
    date: parse_timestamp(&date_str),
    category: category_str.as_deref().and_then(MuscleCategory::from_str),
    score: row.get(3)?,
    total_questions: row.get(4)?,
    questions: Vec::new(),
    duration_secs: row.get(5)?,
  })
}

fn row_to_question(row: &rusqlite::Row) -> Result<Question> {
  let kind_str: String = row.get(2)?;
  let options_json: String = row.get(5)?;
  let is_correct: i64 = row.get(7)?;
  let answered_at_str: Option<String> = row.get(8)?;

  Ok(Question {
    muscle_id: row.get(0)?,
    muscle_name: row.get(1)?,
    kind: AttributeKind::from_str(&kind_str).unwrap_or(AttributeKind::Origin),
    question: row.get(3)?,
    correct_answer: row.get(4)?,
    options: serde_json::from_str(&options_json).unwrap_or_default(),
    user_answer: row.get(6)?,
    is_correct: is_correct == 1,
    answered_at: answered_at_str.as_deref().map(parse_timestamp),
  })
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .unwrap_or_else(|_| Utc::now())
}
