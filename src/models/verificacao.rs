// src/models/verificacao.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Uma linha da tabela `approvals`: o registo autoritativo de um pedido
/// de verificação de perfil. O estado efetivo de cada estudante é sempre
/// derivado do pedido mais recente (ver verificacao_service).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PedidoVerificacao {
    pub id: String,
    pub student_id: String,
    pub student_email: String,
    pub document_ref: String,
    pub status: String, // "pending" | "approved" | "rejected"
    pub rejection_reason: Option<String>,
    pub submitted_at: String,
    pub resolved_at: Option<String>,
}

/// Estado de verificação efetivo de um perfil, derivado do histórico.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstadoVerificacao {
    NaoVerificado,
    Pendente,
    Verificado,
    Rejeitado,
}

impl EstadoVerificacao {
    /// Converte o status guardado num pedido para o estado efetivo.
    pub fn from_request_status(status: &str) -> Self {
        match status {
            "pending" => EstadoVerificacao::Pendente,
            "approved" => EstadoVerificacao::Verificado,
            "rejected" => EstadoVerificacao::Rejeitado,
            _ => EstadoVerificacao::NaoVerificado,
        }
    }

    /// Texto apresentado nas páginas.
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoVerificacao::NaoVerificado => "não verificado",
            EstadoVerificacao::Pendente => "pendente",
            EstadoVerificacao::Verificado => "verificado",
            EstadoVerificacao::Rejeitado => "rejeitado",
        }
    }
}

/// Formulário de submissão de pedido (página de perfil).
#[derive(Debug, Deserialize)]
pub struct SubmeterVerificacaoForm {
    pub document_ref: String,
}

/// Formulário de rejeição (página de verificações do admin).
#[derive(Debug, Deserialize)]
pub struct RejeitarForm {
    pub motivo: String,
}
