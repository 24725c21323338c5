// src/web/perfil_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        perfil::{AtualizarSkillsForm, NovaAtividadeForm, NovaQualificacaoForm},
        user::User,
        verificacao::{EstadoVerificacao, SubmeterVerificacaoForm},
    },
    services::{mentoria_service, perfil_service, user_service, vaga_service, verificacao_service},
    state::AppState,
    templates::{CvPage, PerfilPage},
    web::{admin_handlers::FeedbackParams, mw_auth::UserId},
};
use askama::Template;
use axum::{
    extract::{Extension, Form, Query, State},
    response::{Html, IntoResponse, Redirect},
};

async fn user_da_sessao(state: &AppState, user_id: &str) -> AppResult<User> {
    user_service::find_user_by_id(&state.db_pool, user_id)
        .await?
        .ok_or_else(|| {
            tracing::error!("CRÍTICO: user_id '{}' autenticado não encontrado na DB!", user_id);
            AppError::InternalServerError
        })
}

/// GET /perfil - página de perfil do utilizador logado
pub async fn show_perfil_page(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    let user = user_da_sessao(&state, &user_id_ext.0).await?;
    tracing::debug!("GET /perfil: perfil de {}", user.email);

    let estado = verificacao_service::estado_para_email(&state.db_pool, &user.email).await?;
    // Só faz sentido submeter se não houver pedido pendente nem perfil verificado
    let pode_submeter = user.role == "student"
        && !matches!(estado, EstadoVerificacao::Pendente | EstadoVerificacao::Verificado);

    let historico = verificacao_service::historico_para_email(&state.db_pool, &user.email).await?;
    let atividades = perfil_service::listar_atividades(&state.db_pool, &user.id).await?;
    let qualificacoes = perfil_service::listar_qualificacoes(&state.db_pool, &user.id).await?;

    let mentor_nome = match mentoria_service::mentor_for_student(&state.db_pool, &user.id).await {
        Ok(m) => m.map(|a| a.mentor_name),
        Err(e) => {
            tracing::warn!("Erro ao buscar mentor de {}: {}. Mostrando sem ele.", user.id, e);
            None
        }
    };

    let template = PerfilPage {
        user_name: user.name,
        email: user.email,
        role: user.role,
        skills: vaga_service::parse_skills(&user.skills),
        estado: estado.as_str().to_string(),
        pode_submeter,
        historico,
        atividades,
        qualificacoes,
        mentor_nome,
        success_message: params.success,
        error_message: params.error,
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar PerfilPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

/// POST /perfil/skills - atualiza as competências declaradas
pub async fn handle_atualizar_skills(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Form(form): Form<AtualizarSkillsForm>,
) -> AppResult<Redirect> {
    match user_service::update_own_skills(&state.db_pool, &user_id_ext.0, &form.skills).await {
        Ok(_) => {
            let msg = urlencoding::encode("Competências atualizadas.").to_string();
            Ok(Redirect::to(&format!("/perfil?success={}", msg)))
        }
        Err(e) => {
            tracing::error!("Erro ao atualizar skills de {}: {:?}", user_id_ext.0, e);
            let msg = urlencoding::encode("Falha ao atualizar competências.");
            Ok(Redirect::to(&format!("/perfil?error={}", msg)))
        }
    }
}

/// POST /perfil/atividades - adiciona uma atividade
pub async fn handle_adicionar_atividade(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Form(form): Form<NovaAtividadeForm>,
) -> AppResult<Redirect> {
    let resultado = perfil_service::adicionar_atividade(
        &state.db_pool,
        &user_id_ext.0,
        &form.title,
        form.description.as_deref(),
        form.activity_date.as_deref(),
    )
    .await;

    let redirect_url = match resultado {
        Ok(msg) => format!("/perfil?success={}", urlencoding::encode(&msg)),
        Err(e) => format!("/perfil?error={}", urlencoding::encode(&e)),
    };
    Ok(Redirect::to(&redirect_url))
}

/// POST /perfil/qualificacoes - adiciona uma qualificação
pub async fn handle_adicionar_qualificacao(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Form(form): Form<NovaQualificacaoForm>,
) -> AppResult<Redirect> {
    // Campo numérico opcional: vazio ou não numérico conta como ausente
    let year = form
        .year
        .as_deref()
        .and_then(|y| y.trim().parse::<i64>().ok());

    let resultado = perfil_service::adicionar_qualificacao(
        &state.db_pool,
        &user_id_ext.0,
        &form.title,
        form.institution.as_deref(),
        year,
    )
    .await;

    let redirect_url = match resultado {
        Ok(msg) => format!("/perfil?success={}", urlencoding::encode(&msg)),
        Err(e) => format!("/perfil?error={}", urlencoding::encode(&e)),
    };
    Ok(Redirect::to(&redirect_url))
}

/// POST /perfil/verificacao - submete o pedido de verificação de perfil
pub async fn handle_submeter_verificacao(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
    Form(form): Form<SubmeterVerificacaoForm>,
) -> AppResult<Redirect> {
    let user = user_da_sessao(&state, &user_id_ext.0).await?;

    if user.role != "student" {
        let msg = urlencoding::encode("Só estudantes podem pedir verificação de perfil.");
        return Ok(Redirect::to(&format!("/perfil?error={}", msg)));
    }

    let resultado = verificacao_service::submeter_pedido(
        &state.db_pool,
        &user.id,
        &user.email,
        &form.document_ref,
    )
    .await;

    let redirect_url = match resultado {
        Ok(msg) => format!("/perfil?success={}", urlencoding::encode(&msg)),
        Err(e) => format!("/perfil?error={}", urlencoding::encode(&e)),
    };
    Ok(Redirect::to(&redirect_url))
}

/// GET /perfil/cv - gera o CV do utilizador como página imprimível
pub async fn show_cv_page(
    State(state): State<AppState>,
    Extension(user_id_ext): Extension<UserId>,
) -> AppResult<impl IntoResponse> {
    let user = user_da_sessao(&state, &user_id_ext.0).await?;
    tracing::debug!("GET /perfil/cv: gerando CV de {}", user.email);

    let estado = verificacao_service::estado_para_email(&state.db_pool, &user.email).await?;
    let qualificacoes = perfil_service::listar_qualificacoes(&state.db_pool, &user.id).await?;
    let atividades = perfil_service::listar_atividades(&state.db_pool, &user.id).await?;

    let mentor_nome = match mentoria_service::mentor_for_student(&state.db_pool, &user.id).await {
        Ok(m) => m.map(|a| a.mentor_name),
        Err(_) => None,
    };

    let template = CvPage {
        user_name: user.name,
        email: user.email,
        verificado: estado == EstadoVerificacao::Verificado,
        skills: vaga_service::parse_skills(&user.skills),
        qualificacoes,
        atividades,
        mentor_nome,
        gerado_em: chrono::Local::now().format("%d/%m/%Y %H:%M").to_string(),
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar CvPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}
