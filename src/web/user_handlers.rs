// src/web/user_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::evento::Evento,
    services::{mensagem_service, user_service, verificacao_service},
    state::AppState,
    templates::PainelPage,
    web::mw_auth::UserId,
};
use askama::Template;
use axum::{
    extract::{Extension, State},
    response::{Html, IntoResponse},
};

// Handler para GET /painel (protegido pelo middleware)
pub async fn painel_handler(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
) -> AppResult<impl IntoResponse> {
    let user_id = user_id_ext.0;
    tracing::debug!("GET /painel: acesso para {}", user_id);

    let user = user_service::find_user_by_id(&state.db_pool, &user_id)
        .await?
        .ok_or_else(|| {
            // user_id validado pelo middleware mas já não existe na DB (!)
            tracing::error!("CRÍTICO: user_id '{}' autenticado não encontrado na DB!", user_id);
            AppError::InternalServerError
        })?;

    let is_admin = user.role == "admin";
    let estado = verificacao_service::estado_para_email(&state.db_pool, &user.email).await?;
    let nao_lidas = mensagem_service::contar_nao_lidas(&state.db_pool, &user.id).await?;

    // Próximos eventos da plataforma (se a busca falhar, o painel abre na mesma)
    let eventos = sqlx::query_as::<_, Evento>(
        "SELECT id, title, event_date, location, description FROM events \
         WHERE event_date >= date('now') ORDER BY event_date ASC LIMIT 5",
    )
    .fetch_all(&state.db_pool)
    .await
    .unwrap_or_default();

    let template = PainelPage {
        user_name: user.name,
        role: user.role,
        is_admin,
        estado_verificacao: estado.as_str().to_string(),
        nao_lidas,
        eventos,
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template PainelPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}
