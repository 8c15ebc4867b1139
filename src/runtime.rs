//! Single-threaded event loop around the quiz session.
//!
//! One tokio task owns the [`QuizSession`]. User intents, the 1-second
//! heartbeat, and delayed auto-advance callbacks all funnel through the same
//! channel/select loop, so mutations are serialized by construction: a timer
//! can never race a tap for the same question. Stale auto-advance callbacks
//! re-enter the queue carrying their epoch stamp and die in
//! [`QuizSession::advance_if_epoch`].
//!
//! Persistence is fire-and-forget: a failed save is logged and the completed
//! session stays visible in memory.

use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval, sleep, Duration, MissedTickBehavior};

use crate::config::{self, QuizConfig};
use crate::db::{self, DbPool};
use crate::domain::{Muscle, MuscleCategory};
use crate::session::{QuizSession, SessionView, TickEffect};

enum Command {
    Start {
        category: Option<MuscleCategory>,
        reply: oneshot::Sender<SessionView>,
    },
    SelectAnswer {
        answer: String,
        reply: oneshot::Sender<SessionView>,
    },
    Submit {
        reply: oneshot::Sender<SessionView>,
    },
    Advance {
        reply: oneshot::Sender<SessionView>,
    },
    Reset {
        reply: oneshot::Sender<SessionView>,
    },
    View {
        reply: oneshot::Sender<SessionView>,
    },
    /// Delayed auto-advance callback; inert if `epoch` is stale.
    AdvanceIfCurrent { epoch: u64 },
}

/// Cloneable handle the presentation layer uses to reach the engine task.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<Command>,
}

impl EngineHandle {
    /// Spawn the engine task and return a handle to it.
    pub fn spawn(pool: DbPool, config: QuizConfig) -> Self {
        let (handle, _task) = Self::spawn_with_task(pool, config);
        handle
    }

    fn spawn_with_task(pool: DbPool, config: QuizConfig) -> (Self, tokio::task::JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(32);
        // The loop keeps only a weak self-sender, so dropping every handle
        // closes the channel and lets the task exit.
        let task = tokio::spawn(run(rx, tx.downgrade(), pool, config));
        (Self { tx }, task)
    }

    pub async fn start(&self, category: Option<MuscleCategory>) -> SessionView {
        self.request(|reply| Command::Start { category, reply }).await
    }

    pub async fn select_answer(&self, answer: String) -> SessionView {
        self.request(|reply| Command::SelectAnswer { answer, reply }).await
    }

    pub async fn submit(&self) -> SessionView {
        self.request(|reply| Command::Submit { reply }).await
    }

    pub async fn advance(&self) -> SessionView {
        self.request(|reply| Command::Advance { reply }).await
    }

    pub async fn reset(&self) -> SessionView {
        self.request(|reply| Command::Reset { reply }).await
    }

    pub async fn view(&self) -> SessionView {
        self.request(|reply| Command::View { reply }).await
    }

    async fn request<F>(&self, make: F) -> SessionView
    where
        F: FnOnce(oneshot::Sender<SessionView>) -> Command,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send(make(reply_tx)).await.is_err() {
            tracing::warn!("Quiz engine task is gone");
            return SessionView::default();
        }
        reply_rx.await.unwrap_or_else(|_| {
            tracing::warn!("Quiz engine dropped a reply");
            SessionView::default()
        })
    }
}

async fn run(
    mut rx: mpsc::Receiver<Command>,
    tx: mpsc::WeakSender<Command>,
    pool: DbPool,
    config: QuizConfig,
) {
    let mut session = QuizSession::new(config);
    // Nothing to persist until a quiz starts
    let mut persisted = true;

    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            cmd = rx.recv() => {
                let Some(cmd) = cmd else { break };
                match cmd {
                    Command::Start { category, reply } => {
                        let muscles = load_pool(&pool);
                        session.start(&muscles, category);
                        persisted = false;
                        let _ = reply.send(session.snapshot());
                    }
                    Command::SelectAnswer { answer, reply } => {
                        session.select_answer(&answer);
                        let _ = reply.send(session.snapshot());
                    }
                    Command::Submit { reply } => {
                        session.submit_answer();
                        let _ = reply.send(session.snapshot());
                    }
                    Command::Advance { reply } => {
                        session.advance();
                        let _ = reply.send(session.snapshot());
                    }
                    Command::Reset { reply } => {
                        session.reset();
                        let _ = reply.send(session.snapshot());
                    }
                    Command::View { reply } => {
                        let _ = reply.send(session.snapshot());
                    }
                    Command::AdvanceIfCurrent { epoch } => {
                        session.advance_if_epoch(epoch);
                    }
                }
            }
            _ = ticker.tick() => {
                if let Some(TickEffect::ScheduleAdvance { epoch }) = session.tick() {
                    if let Some(tx) = tx.upgrade() {
                        tokio::spawn(async move {
                            sleep(Duration::from_millis(config::ADVANCE_GRACE_MS)).await;
                            let _ = tx.send(Command::AdvanceIfCurrent { epoch }).await;
                        });
                    }
                }
            }
        }
        maybe_persist(&session, &pool, &mut persisted);
    }
}

/// Blocking repository read at session start.
fn load_pool(pool: &DbPool) -> Vec<Muscle> {
    match db::try_lock(pool) {
        Ok(conn) => match db::load_all_muscles(&conn) {
            Ok(muscles) => muscles,
            Err(e) => {
                tracing::warn!("Failed to load muscles: {}", e);
                Vec::new()
            }
        },
        Err(e) => {
            tracing::warn!("Failed to load muscles: {}", e);
            Vec::new()
        }
    }
}

/// Store a freshly completed quiz, once. A failure here must not roll back
/// the in-memory result, so errors only get logged.
fn maybe_persist(session: &QuizSession, pool: &DbPool, persisted: &mut bool) {
    if *persisted {
        return;
    }
    let Some(quiz) = session.completed_quiz() else {
        return;
    };
    *persisted = true;

    match db::try_lock(pool) {
        Ok(conn) => {
            if let Err(e) = db::save_quiz(&conn, quiz) {
                tracing::warn!("Failed to save completed quiz: {}", e);
                return;
            }
            if let Err(e) = db::record_quiz_completion(&conn, quiz) {
                tracing::warn!("Failed to update statistics: {}", e);
            }
        }
        Err(e) => tracing::warn!("Failed to save completed quiz: {}", e),
    }
}
