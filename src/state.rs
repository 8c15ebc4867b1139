//! Application state passed to all handlers.

use crate::db::DbPool;
use crate::runtime::EngineHandle;

#[derive(Clone)]
pub struct AppState {
    /// Shared database (muscle bank, quiz history, stats)
    pub pool: DbPool,

    /// Handle to the quiz engine task
    pub engine: EngineHandle,
}

impl AppState {
    pub fn new(pool: DbPool, engine: EngineHandle) -> Self {
        Self { pool, engine }
    }
}
