// src/services/auth_service.rs
use crate::error::{AppError, AppResult};

/// Compara uma senha em claro com o hash guardado na tabela users.
/// O bcrypt é caro de propósito, por isso corre fora do executor async.
pub async fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(&password, &stored_hash))
        .await
        .map_err(|e| {
            tracing::error!("Task bloqueante de verificação falhou: {:?}", e);
            AppError::InternalServerError
        })?
        .map_err(|e| {
            tracing::error!("bcrypt recusou o hash guardado: {:?}", e);
            AppError::PasswordHashingError
        })
}

/// Gera o hash bcrypt de uma senha nova.
pub async fn hash_password(password: &str) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| {
            tracing::error!("Task bloqueante de hashing falhou: {:?}", e);
            AppError::InternalServerError
        })?
        .map_err(|e| {
            tracing::error!("bcrypt falhou ao gerar hash: {:?}", e);
            AppError::PasswordHashingError
        })
}
