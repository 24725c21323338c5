// src/web/mentoria_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::mentoria::{AssignPayload, AtribuirForm, MentoriaIndex, UnassignParams},
    services::{mentoria_service, user_service},
    state::AppState,
    templates::{AdminMentoriaPage, MentorCarga},
    web::admin_handlers::FeedbackParams,
};
use askama::Template;
use axum::{
    extract::{Form, Json, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize, Debug)]
pub struct RemoverForm {
    student_id: String,
    // Motivo opcional mostrado no diálogo de confirmação; não é persistido
    #[allow(dead_code)]
    reason: Option<String>,
}

// --- PÁGINA DE ADMINISTRAÇÃO (GET /admin/mentoria) ---

pub async fn show_admin_mentoria_page(
    State(state): State<AppState>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("GET /admin/mentoria: carregando quadro de atribuições...");

    // 1. Lista completa + índices derivados
    let (atribuicoes, mut error_message) =
        match mentoria_service::load_all_assignments(&state.db_pool).await {
            Ok(rows) => (rows, params.error),
            Err(e) => {
                tracing::error!("Erro ao carregar atribuições: {}", e);
                (vec![], Some("Falha ao carregar as atribuições.".to_string()))
            }
        };
    let index = MentoriaIndex::from_rows(&atribuicoes);

    // 2. Carga de cada mentor (nº de estudantes via índice)
    let mentores = match user_service::find_users_by_role(&state.db_pool, "mentor").await {
        Ok(users) => users
            .into_iter()
            .map(|m| MentorCarga {
                num_estudantes: index.student_count_for_mentor(&m.id),
                id: m.id,
                name: m.name,
            })
            .collect(),
        Err(e) => {
            tracing::error!("Erro ao buscar mentores: {:?}", e);
            error_message.get_or_insert("Falha ao carregar os mentores.".to_string());
            vec![]
        }
    };

    // 3. Estudantes para o formulário de atribuição
    let estudantes = user_service::find_users_by_role(&state.db_pool, "student")
        .await
        .unwrap_or_default();

    let template = AdminMentoriaPage {
        atribuicoes,
        mentores,
        estudantes,
        success_message: params.success,
        error_message,
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar AdminMentoriaPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

/// POST /admin/mentoria/atribuir (formulário da página)
pub async fn handle_atribuir(
    State(state): State<AppState>,
    Form(form): Form<AtribuirForm>,
) -> AppResult<Redirect> {
    // Campo de notas vazio conta como ausente
    let notes = form.notes.as_deref().map(str::trim).filter(|n| !n.is_empty());

    let resultado = mentoria_service::assign_student_to_mentor(
        &state.db_pool,
        &form.mentor_id,
        &form.student_id,
        notes,
    )
    .await;

    let redirect_url = match resultado {
        Ok(msg) => format!("/admin/mentoria?success={}", urlencoding::encode(&msg)),
        Err(e) => format!("/admin/mentoria?error={}", urlencoding::encode(&e)),
    };
    Ok(Redirect::to(&redirect_url))
}

/// POST /admin/mentoria/remover (formulário da página)
pub async fn handle_remover(
    State(state): State<AppState>,
    Form(form): Form<RemoverForm>,
) -> AppResult<Redirect> {
    let resultado = mentoria_service::unassign_student(&state.db_pool, &form.student_id).await;

    let redirect_url = match resultado {
        Ok(msg) => format!("/admin/mentoria?success={}", urlencoding::encode(&msg)),
        Err(e) => format!("/admin/mentoria?error={}", urlencoding::encode(&e)),
    };
    Ok(Redirect::to(&redirect_url))
}

// --- API JSON (/api/admin/mentorship) ---
// Contrato: 2xx com JSON em caso de sucesso; non-2xx com {"error": ...}.

/// GET /api/admin/mentorship - todas as atribuições
pub async fn api_list_assignments(State(state): State<AppState>) -> impl IntoResponse {
    match mentoria_service::load_all_assignments(&state.db_pool).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e })),
        )
            .into_response(),
    }
}

/// POST /api/admin/mentorship - atribui {mentor_id, student_id, notes}
pub async fn api_assign(
    State(state): State<AppState>,
    Json(payload): Json<AssignPayload>,
) -> impl IntoResponse {
    match mentoria_service::assign_student_to_mentor(
        &state.db_pool,
        &payload.mentor_id,
        &payload.student_id,
        payload.notes.as_deref(),
    )
    .await
    {
        Ok(msg) => Json(json!({ "message": msg })).into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, Json(json!({ "error": e }))).into_response(),
    }
}

/// DELETE /api/admin/mentorship?student_id=... - remove a atribuição.
/// Aceita também um `reason` na query string, que é descartado.
pub async fn api_unassign(
    State(state): State<AppState>,
    Query(params): Query<UnassignParams>,
) -> impl IntoResponse {
    match mentoria_service::unassign_student(&state.db_pool, &params.student_id).await {
        Ok(msg) => Json(json!({ "message": msg })).into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, Json(json!({ "error": e }))).into_response(),
    }
}

/// GET /api/admin/mentorship/students/{mentor_id} - estudantes de um mentor
pub async fn api_students_for_mentor(
    State(state): State<AppState>,
    Path(mentor_id): Path<String>,
) -> impl IntoResponse {
    match mentoria_service::students_for_mentor(&state.db_pool, &mentor_id).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e })),
        )
            .into_response(),
    }
}

/// GET /api/admin/mentorship/mentor/{student_id} - o mentor de um
/// estudante (null se não tiver)
pub async fn api_mentor_for_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> impl IntoResponse {
    match mentoria_service::mentor_for_student(&state.db_pool, &student_id).await {
        Ok(row) => Json(row).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e })),
        )
            .into_response(),
    }
}
