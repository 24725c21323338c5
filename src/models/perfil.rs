// src/models/perfil.rs
use serde::Deserialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Atividade {
    pub id: String,
    pub student_id: String,
    pub title: String,
    pub description: Option<String>,
    pub activity_date: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Qualificacao {
    pub id: String,
    pub student_id: String,
    pub title: String,
    pub institution: Option<String>,
    pub year: Option<i64>,
}

// --- Formulários da página de perfil ---

#[derive(Debug, Deserialize)]
pub struct AtualizarSkillsForm {
    pub skills: String, // separado por vírgulas, normalizado no serviço
}

#[derive(Debug, Deserialize)]
pub struct NovaAtividadeForm {
    pub title: String,
    pub description: Option<String>,
    pub activity_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NovaQualificacaoForm {
    pub title: String,
    pub institution: Option<String>,
    // Chega como texto do formulário; um campo vazio não é erro
    pub year: Option<String>,
}
