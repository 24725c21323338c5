// src/models/vaga.rs
use sqlx::FromRow;

/// Uma vaga lida da tabela `job_posts`, já com o nome da empresa e com
/// os flags de candidatura/guardado resolvidos para o utilizador atual.
#[derive(Debug, Clone, FromRow)]
pub struct VagaRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub skills: String, // separado por vírgulas
    pub posted_at: String,
    pub company_name: String,
    pub ja_candidatado: bool,
    pub guardada: bool,
}

/// Vaga pronta para exibição: a linha da DB mais a pontuação de
/// compatibilidade (0 a 100) calculada para o utilizador atual.
/// A pontuação serve apenas para ordenar e exibir.
#[derive(Debug, Clone)]
pub struct VagaComScore {
    pub id: String,
    pub title: String,
    pub company_name: String,
    pub description: Option<String>,
    pub skills: Vec<String>,
    pub posted_at: String,
    pub score: i64,
    pub ja_candidatado: bool,
    pub guardada: bool,
}
