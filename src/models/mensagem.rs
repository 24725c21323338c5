// src/models/mensagem.rs
use serde::Deserialize;
use sqlx::FromRow;

/// Mensagem recebida, já com o nome do remetente resolvido (JOIN com users).
#[derive(Debug, Clone, FromRow)]
pub struct MensagemRecebida {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub subject: Option<String>,
    pub body: String,
    pub is_read: bool,
    pub sent_at: String,
}

/// Formulário de envio (página de mensagens).
#[derive(Debug, Deserialize)]
pub struct EnviarMensagemForm {
    pub para_email: String,
    pub subject: Option<String>,
    pub body: String,
}
