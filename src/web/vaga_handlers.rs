// src/web/vaga_handlers.rs
use crate::{
    error::{AppError, AppResult},
    services::vaga_service,
    state::AppState,
    templates::VagasPage,
    web::{admin_handlers::FeedbackParams, mw_auth::UserId},
};
use askama::Template;
use axum::{
    extract::{Extension, Path, Query, State},
    response::{Html, IntoResponse, Redirect},
};

/// GET /vagas - listagem ordenada pela compatibilidade com o utilizador
pub async fn show_vagas_page(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    let user_id = user_id_ext.0;
    tracing::debug!("GET /vagas: listando vagas para {}", user_id);

    let (vagas, error_message) =
        match vaga_service::listar_vagas_para_user(&state.db_pool, &user_id).await {
            Ok(v) => (v, params.error),
            Err(e) => {
                tracing::error!("Erro ao listar vagas para {}: {:?}", user_id, e);
                (vec![], Some("Falha ao carregar as vagas.".to_string()))
            }
        };

    let template = VagasPage {
        vagas,
        success_message: params.success,
        error_message,
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar VagasPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

/// POST /vagas/{id}/candidatar
pub async fn handle_candidatar(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Path(vaga_id): Path<String>,
) -> AppResult<Redirect> {
    let resultado = vaga_service::candidatar(&state.db_pool, &user_id_ext.0, &vaga_id).await;

    let redirect_url = match resultado {
        Ok(msg) => format!("/vagas?success={}", urlencoding::encode(&msg)),
        Err(e) => format!("/vagas?error={}", urlencoding::encode(&e)),
    };
    Ok(Redirect::to(&redirect_url))
}

/// POST /vagas/{id}/guardar
pub async fn handle_guardar(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Path(vaga_id): Path<String>,
) -> AppResult<Redirect> {
    let resultado = vaga_service::guardar_vaga(&state.db_pool, &user_id_ext.0, &vaga_id).await;

    let redirect_url = match resultado {
        Ok(msg) => format!("/vagas?success={}", urlencoding::encode(&msg)),
        Err(e) => format!("/vagas?error={}", urlencoding::encode(&e)),
    };
    Ok(Redirect::to(&redirect_url))
}

/// POST /vagas/{id}/esquecer
pub async fn handle_esquecer(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Path(vaga_id): Path<String>,
) -> AppResult<Redirect> {
    let resultado = vaga_service::esquecer_vaga(&state.db_pool, &user_id_ext.0, &vaga_id).await;

    let redirect_url = match resultado {
        Ok(msg) => format!("/vagas?success={}", urlencoding::encode(&msg)),
        Err(e) => format!("/vagas?error={}", urlencoding::encode(&e)),
    };
    Ok(Redirect::to(&redirect_url))
}
