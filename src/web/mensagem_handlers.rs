// src/web/mensagem_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::mensagem::EnviarMensagemForm,
    services::mensagem_service,
    state::AppState,
    templates::MensagensPage,
    web::{admin_handlers::FeedbackParams, mw_auth::UserId},
};
use askama::Template;
use axum::{
    extract::{Extension, Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect},
};

/// GET /mensagens - caixa de entrada
pub async fn show_mensagens_page(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    let user_id = user_id_ext.0;
    tracing::debug!("GET /mensagens: caixa de entrada de {}", user_id);

    let (mensagens, error_message) =
        match mensagem_service::listar_recebidas(&state.db_pool, &user_id).await {
            Ok(m) => (m, params.error),
            Err(e) => {
                tracing::error!("Erro ao carregar mensagens de {}: {:?}", user_id, e);
                (vec![], Some("Falha ao carregar as mensagens.".to_string()))
            }
        };

    let template = MensagensPage {
        mensagens,
        success_message: params.success,
        error_message,
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar MensagensPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

/// POST /mensagens/enviar
pub async fn handle_enviar(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Form(form): Form<EnviarMensagemForm>,
) -> AppResult<Redirect> {
    let resultado = mensagem_service::enviar_mensagem(
        &state.db_pool,
        &user_id_ext.0,
        &form.para_email,
        form.subject.as_deref(),
        &form.body,
    )
    .await;

    let redirect_url = match resultado {
        Ok(msg) => format!("/mensagens?success={}", urlencoding::encode(&msg)),
        Err(e) => format!("/mensagens?error={}", urlencoding::encode(&e)),
    };
    Ok(Redirect::to(&redirect_url))
}

/// POST /mensagens/{id}/lida
pub async fn handle_marcar_lida(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Path(mensagem_id): Path<String>,
) -> AppResult<Redirect> {
    let resultado =
        mensagem_service::marcar_lida(&state.db_pool, &user_id_ext.0, &mensagem_id).await;

    let redirect_url = match resultado {
        Ok(_) => "/mensagens".to_string(),
        Err(e) => format!("/mensagens?error={}", urlencoding::encode(&e)),
    };
    Ok(Redirect::to(&redirect_url))
}
