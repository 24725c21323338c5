// src/state.rs
use sqlx::SqlitePool;

/// Estado partilhado por todos os handlers da aplicação.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
}

// Deixa os handlers extraírem o pool diretamente quando não precisam
// do resto do estado
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}
