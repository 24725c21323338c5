// src/web/verificacao_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::verificacao::RejeitarForm,
    services::verificacao_service,
    state::AppState,
    templates::AdminVerificacoesPage,
    web::admin_handlers::FeedbackParams,
};
use askama::Template;
use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect},
};

/// GET /admin/verificacoes - fila de revisão de pedidos pendentes
pub async fn show_admin_verificacoes_page(
    State(state): State<AppState>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("GET /admin/verificacoes: carregando fila de revisão...");

    let (pedidos, error_message) =
        match verificacao_service::listar_pendentes(&state.db_pool).await {
            Ok(p) => (p, params.error),
            Err(e) => {
                tracing::error!("Erro ao carregar pedidos pendentes: {:?}", e);
                (vec![], Some("Falha ao carregar os pedidos.".to_string()))
            }
        };

    let template = AdminVerificacoesPage {
        pedidos,
        success_message: params.success,
        error_message,
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar AdminVerificacoesPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

/// POST /admin/verificacoes/{id}/aprovar
pub async fn handle_aprovar(
    State(state): State<AppState>,
    Path(pedido_id): Path<String>,
) -> AppResult<Redirect> {
    let resultado = verificacao_service::aprovar_pedido(&state.db_pool, &pedido_id).await;

    let redirect_url = match resultado {
        Ok(msg) => format!("/admin/verificacoes?success={}", urlencoding::encode(&msg)),
        Err(e) => format!("/admin/verificacoes?error={}", urlencoding::encode(&e)),
    };
    Ok(Redirect::to(&redirect_url))
}

/// POST /admin/verificacoes/{id}/rejeitar - o motivo é obrigatório
pub async fn handle_rejeitar(
    State(state): State<AppState>,
    Path(pedido_id): Path<String>,
    Form(form): Form<RejeitarForm>,
) -> AppResult<Redirect> {
    let resultado =
        verificacao_service::rejeitar_pedido(&state.db_pool, &pedido_id, &form.motivo).await;

    let redirect_url = match resultado {
        Ok(msg) => format!("/admin/verificacoes?success={}", urlencoding::encode(&msg)),
        Err(e) => format!("/admin/verificacoes?error={}", urlencoding::encode(&e)),
    };
    Ok(Redirect::to(&redirect_url))
}
