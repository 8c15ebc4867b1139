//! End-to-end quiz flow over the HTTP surface.

use axum_test::TestServer;
use tempfile::TempDir;

use myoquiz::config::{FeedbackMode, QuizConfig};
use myoquiz::domain::AttributeKind;
use myoquiz::runtime::EngineHandle;
use myoquiz::session::SessionView;
use myoquiz::state::AppState;
use myoquiz::{db, handlers};

fn test_server(temp: &TempDir, config: QuizConfig) -> TestServer {
    let pool = db::init_db(&temp.path().join("quiz.db")).unwrap();
    {
        let conn = pool.lock().unwrap();
        db::seed_muscles(&conn).unwrap();
    }
    let engine = EngineHandle::spawn(pool.clone(), config);
    TestServer::new(handlers::router(AppState::new(pool, engine))).unwrap()
}

fn deferred_config(count: usize) -> QuizConfig {
    QuizConfig {
        question_count: count,
        enabled_kinds: vec![AttributeKind::Origin, AttributeKind::Innervation],
        feedback: FeedbackMode::Deferred,
        time_per_question: 30,
        haptic_feedback: false,
    }
}

#[tokio::test]
async fn test_full_quiz_flow() {
    let temp = TempDir::new().unwrap();
    let server = test_server(&temp, deferred_config(2));

    // Nothing running yet
    let response = server.get("/quiz").await;
    response.assert_status_ok();
    let view: SessionView = response.json();
    assert_eq!(view.state, "idle");

    // Start an unfiltered quiz
    let response = server
        .post("/quiz/start")
        .json(&serde_json::json!({ "category": null }))
        .await;
    response.assert_status_ok();
    let mut view: SessionView = response.json();
    assert_eq!(view.state, "in_progress");
    assert_eq!(view.progress_text, "1 sur 2");

    // Answer both questions (deferred mode: select, then submit)
    for _ in 0..2 {
        let question = view.question.expect("question on screen");
        assert_eq!(question.options.len(), 4);

        let response = server
            .post("/quiz/answer")
            .json(&serde_json::json!({ "answer": question.options[0] }))
            .await;
        response.assert_status_ok();
        let selected: SessionView = response.json();
        assert!(!selected.feedback_visible);

        let response = server.post("/quiz/submit").await;
        response.assert_status_ok();
        view = response.json();
    }

    assert_eq!(view.state, "completed");
    let result = view.result.expect("completed result");
    assert_eq!(result.total_questions, 2);
    assert!(result.score >= 0 && result.score <= 2);

    // Completion was persisted
    let response = server.get("/history").await;
    response.assert_status_ok();
    let history: Vec<serde_json::Value> = response.json();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["total_questions"], 2);
    let quiz_id = history[0]["id"].as_i64().unwrap();

    let response = server.get("/stats").await;
    response.assert_status_ok();
    let stats: serde_json::Value = response.json();
    assert_eq!(stats["total_questions_answered"], 2);

    // History entries can be removed
    let response = server.delete(&format!("/history/{}", quiz_id)).await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);
    let response = server.get("/history").await;
    let history: Vec<serde_json::Value> = response.json();
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_reset_over_http() {
    let temp = TempDir::new().unwrap();
    let server = test_server(&temp, deferred_config(3));

    let response = server
        .post("/quiz/start")
        .json(&serde_json::json!({ "category": "upper_limb" }))
        .await;
    let view: SessionView = response.json();
    assert_eq!(view.state, "in_progress");

    let response = server.post("/quiz/reset").await;
    let view: SessionView = response.json();
    assert_eq!(view.state, "idle");
    assert!(view.question.is_none());
}
