// src/web/mw_admin.rs
use crate::{
    error::AppError,
    services::user_service,
    state::AppState,
    web::mw_auth::UserId,
};
use axum::{
    extract::{Extension, Request, State},
    middleware::Next,
    response::Response,
};

/// Middleware que verifica se o utilizador logado tem o papel "admin".
/// Deve ser executado *depois* do middleware `require_auth`.
pub async fn require_admin(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = user_id_ext.0;
    tracing::debug!("Admin MW: verificando papel 'admin' para {}", user_id);

    match user_service::find_user_by_id(&state.db_pool, &user_id).await {
        Ok(Some(user)) if user.role == "admin" => {
            tracing::debug!("Admin MW: acesso admin concedido para {}", user_id);
            Ok(next.run(request).await)
        }
        Ok(_) => {
            tracing::warn!("Admin MW: acesso negado para {} (sem papel admin).", user_id);
            Err(AppError::Unauthorized)
        }
        Err(e) => {
            tracing::error!("Admin MW: erro ao buscar utilizador {}: {:?}", user_id, e);
            Err(e)
        }
    }
}
