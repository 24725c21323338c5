// src/models/evento.rs
use sqlx::FromRow;

/// Evento da plataforma (tabela `events`), exibido no painel.
#[derive(Debug, Clone, FromRow)]
pub struct Evento {
    pub id: String,
    pub title: String,
    pub event_date: String,
    pub location: Option<String>,
    pub description: Option<String>,
}
